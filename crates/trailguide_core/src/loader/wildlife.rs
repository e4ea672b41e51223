//! Wildlife reference loading.
//!
//! # Responsibility
//! - Parse the wildlife file row by row and associate each species with
//!   the routes it is found on.
//!
//! # Invariants
//! - A wildlife row is committed even when none of its route references
//!   resolve; sightings exist independent of route association.
//! - Junction rows are staged per wildlife row and inserted as one
//!   batch, only for routes already present in the store.
//! - Unresolvable or unparseable route tokens are logged and skipped,
//!   never fatal.

use crate::loader::delimited::split_quoted;
use crate::loader::{LoadError, LoadResult};
use crate::model::{Wildlife, WildlifeOnRoute, NO_IMAGE};
use crate::router::{
    Filter, OrderBy, QueryOptions, ResourcePattern, ResourceRouter, RouterError,
};
use log::{debug, info};
use once_cell::sync::Lazy;
use regex::Regex;
use rusqlite::types::Value;
use std::io::{BufRead, BufReader, Read};

/// Leading junk column plus name, category, description, routes and
/// when-seen; the image column is optional.
const MIN_FIELDS: usize = 6;

/// Characters wrapping the found-on-routes list in the source file.
const LIST_WRAPPERS: &[char] = &['"', '\'', '[', ']', ' '];

static LEADING_NUMBER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\s*(\d+)").expect("leading-number pattern is valid"));

/// Diagnostics from one wildlife load pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct WildlifeLoadStats {
    pub wildlife: usize,
    pub route_links: usize,
    pub skipped_rows: usize,
    pub skipped_links: usize,
}

/// Loads the wildlife file, inserting each species immediately and its
/// resolved route associations as one batch per row.
///
/// # Errors
/// - `LoadError::Stream` when the input cannot be read.
/// - `LoadError::Router` when the store rejects a write.
pub fn load_wildlife<R: ResourceRouter>(
    reader: impl Read,
    router: &R,
) -> LoadResult<WildlifeLoadStats> {
    let mut lines = BufReader::new(reader).lines();
    let mut stats = WildlifeLoadStats::default();

    // The source format carries a two-line header.
    for _ in 0..2 {
        match lines.next() {
            None => return Ok(stats),
            Some(Err(err)) => return Err(LoadError::Stream(err)),
            Some(Ok(_)) => {}
        }
    }

    for line in lines {
        let line = line.map_err(LoadError::Stream)?;
        if line.trim().is_empty() {
            continue;
        }

        let fields = split_quoted(&line, ',');
        if fields.len() < MIN_FIELDS {
            debug!(
                "event=load_wildlife module=loader status=skip reason=short_row fields={}",
                fields.len()
            );
            stats.skipped_rows += 1;
            continue;
        }

        let image_name = fields
            .get(6)
            .map(|raw| raw.trim())
            .filter(|raw| !raw.is_empty())
            .map_or_else(|| NO_IMAGE.to_string(), str::to_string);
        let species = Wildlife {
            id: None,
            name: fields[1].clone(),
            category: fields[2].clone(),
            description: fields[3].clone(),
            when_seen: fields[5].clone(),
            image_name,
        };

        let item = router.insert(&ResourcePattern::Wildlife, &species.to_record())?;
        let wildlife_id = item.item_id().ok_or_else(|| {
            LoadError::Router(RouterError::Write {
                pattern: ResourcePattern::Wildlife,
                message: "insert did not return an item pattern".to_string(),
            })
        })?;
        stats.wildlife += 1;

        let mut staged = Vec::new();
        for token in fields[4].trim().trim_matches(LIST_WRAPPERS).split(',') {
            let Some(base) = leading_number(token) else {
                if !token.trim().is_empty() {
                    debug!(
                        "event=load_wildlife module=loader status=skip reason=bad_route_token token={}",
                        token.trim()
                    );
                    stats.skipped_links += 1;
                }
                continue;
            };

            match find_route_by_number_prefix(router, base)? {
                Some(route_id) => {
                    staged.push(WildlifeOnRoute::link(wildlife_id, route_id).to_record());
                }
                None => {
                    debug!(
                        "event=load_wildlife module=loader status=skip reason=route_not_found route_number={base}"
                    );
                    stats.skipped_links += 1;
                }
            }
        }

        if !staged.is_empty() {
            stats.route_links += router.bulk_insert(&ResourcePattern::WildlifeOnRoute, &staged)?;
        }
    }

    info!(
        "event=load_wildlife module=loader status=ok wildlife={} route_links={} skipped_rows={} skipped_links={}",
        stats.wildlife, stats.route_links, stats.skipped_rows, stats.skipped_links
    );
    Ok(stats)
}

/// Truncates a route token such as `12.1` to its leading integer.
fn leading_number(token: &str) -> Option<i64> {
    LEADING_NUMBER
        .captures(token)
        .and_then(|captures| captures.get(1))
        .and_then(|base| base.as_str().parse().ok())
}

/// Resolves a base route number to a route id by prefix match.
///
/// Tie-break when several routes share the prefix: an exact
/// `route_number` match wins, otherwise the matching row with the
/// lowest id.
fn find_route_by_number_prefix<R: ResourceRouter>(
    router: &R,
    base: i64,
) -> LoadResult<Option<i64>> {
    let options = QueryOptions {
        columns: Some(vec!["id".to_string(), "route_number".to_string()]),
        filters: vec![Filter::like("route_number", Value::Text(format!("{base}%")))],
        order: Some(OrderBy::asc("id")),
    };
    let rows = router.query(&ResourcePattern::Routes, &options)?;

    for index in 0..rows.len() {
        if rows.integer(index, "route_number") == Some(base) {
            return Ok(rows.integer(index, "id"));
        }
    }
    Ok(rows.integer(0, "id"))
}
