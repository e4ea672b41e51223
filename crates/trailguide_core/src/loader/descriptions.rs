//! Route description loading.
//!
//! # Responsibility
//! - Map route numbers to their prose descriptions from the delimited
//!   descriptions file.
//!
//! # Invariants
//! - The first line is a header and is never interpreted.
//! - A non-numeric route number aborts the phase: the caller receives a
//!   `ParseError` and no partial mapping.

use crate::loader::{LoadError, LoadResult};
use log::info;
use std::collections::HashMap;
use std::io::{BufRead, BufReader, Read};

const CONTEXT: &str = "route descriptions";

/// Reads the descriptions file into a route-number keyed mapping.
///
/// Each data line is split naively on commas; the first field is the
/// route number, the second the description. Additional fields and
/// blank lines are ignored.
///
/// # Errors
/// - `LoadError::Stream` when the input cannot be read.
/// - `LoadError::Parse` when a line has no description field or a
///   non-numeric route number (chosen abort-phase policy).
pub fn load_descriptions(reader: impl Read) -> LoadResult<HashMap<i64, String>> {
    let mut lines = BufReader::new(reader).lines();

    match lines.next() {
        None => return Ok(HashMap::new()),
        Some(Err(err)) => return Err(LoadError::Stream(err)),
        Some(Ok(_)) => {}
    }

    let mut mapping = HashMap::new();
    for line in lines {
        let line = line.map_err(LoadError::Stream)?;
        if line.trim().is_empty() {
            continue;
        }

        let mut fields = line.split(',');
        let key = fields.next().unwrap_or_default().trim();
        let Some(description) = fields.next() else {
            return Err(LoadError::Parse {
                context: CONTEXT,
                message: format!("line `{line}` has no description field"),
            });
        };

        let route_number: i64 = key.parse().map_err(|_| LoadError::Parse {
            context: CONTEXT,
            message: format!("route number `{key}` is not numeric"),
        })?;
        mapping.insert(route_number, description.to_string());
    }

    info!(
        "event=load_descriptions module=loader status=ok count={}",
        mapping.len()
    );
    Ok(mapping)
}

#[cfg(test)]
mod tests {
    use super::load_descriptions;
    use crate::loader::LoadError;

    #[test]
    fn discards_header_and_maps_first_two_fields() {
        let input = "route_no,description\n7,Coastal loop\n12,Woodland climb,extra\n";
        let mapping = load_descriptions(input.as_bytes()).unwrap();

        assert_eq!(mapping.len(), 2);
        assert_eq!(mapping.get(&7).map(String::as_str), Some("Coastal loop"));
        assert_eq!(
            mapping.get(&12).map(String::as_str),
            Some("Woodland climb")
        );
    }

    #[test]
    fn blank_lines_are_ignored() {
        let input = "header\n\n3,Short stroll\n\n";
        let mapping = load_descriptions(input.as_bytes()).unwrap();
        assert_eq!(mapping.len(), 1);
    }

    #[test]
    fn non_numeric_route_number_aborts_the_phase() {
        let input = "header\n7,ok\nseven,not ok\n";
        let err = load_descriptions(input.as_bytes()).unwrap_err();
        assert!(matches!(err, LoadError::Parse { .. }));
    }

    #[test]
    fn missing_description_field_aborts_the_phase() {
        let input = "header\n7\n";
        let err = load_descriptions(input.as_bytes()).unwrap_err();
        assert!(matches!(err, LoadError::Parse { .. }));
    }

    #[test]
    fn empty_input_yields_empty_mapping() {
        let mapping = load_descriptions("".as_bytes()).unwrap();
        assert!(mapping.is_empty());
    }
}
