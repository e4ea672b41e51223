//! Query and mutation vocabulary for the resource router.
//!
//! # Responsibility
//! - Define the caller-facing shapes: records, filters, projections,
//!   sort orders and materialized result sets.
//!
//! # Invariants
//! - Values travel exclusively through bind parameters; these types never
//!   render caller data into SQL text.

use rusqlite::types::Value;

/// An insertable/updatable row: ordered column/value pairs.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Record {
    entries: Vec<(String, Value)>,
}

impl Record {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style setter.
    pub fn with(mut self, column: impl Into<String>, value: Value) -> Self {
        self.set(column, value);
        self
    }

    /// Sets a column value, replacing any previous value for the column.
    pub fn set(&mut self, column: impl Into<String>, value: Value) {
        let column = column.into();
        if let Some(entry) = self.entries.iter_mut().find(|(name, _)| *name == column) {
            entry.1 = value;
        } else {
            self.entries.push((column, value));
        }
    }

    pub fn get(&self, column: &str) -> Option<&Value> {
        self.entries
            .iter()
            .find(|(name, _)| name == column)
            .map(|(_, value)| value)
    }

    /// Convenience accessor for integer-typed columns.
    pub fn integer(&self, column: &str) -> Option<i64> {
        match self.get(column) {
            Some(Value::Integer(value)) => Some(*value),
            _ => None,
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.entries
            .iter()
            .map(|(name, value)| (name.as_str(), value))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Comparison operators usable in a [`Filter`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Compare {
    Eq,
    Ne,
    Lt,
    Le,
    Gt,
    Ge,
    Like,
}

impl Compare {
    pub(crate) fn sql(self) -> &'static str {
        match self {
            Self::Eq => "=",
            Self::Ne => "<>",
            Self::Lt => "<",
            Self::Le => "<=",
            Self::Gt => ">",
            Self::Ge => ">=",
            Self::Like => "LIKE",
        }
    }
}

/// One boolean predicate on a column; multiple filters are ANDed.
#[derive(Debug, Clone, PartialEq)]
pub struct Filter {
    pub column: String,
    pub compare: Compare,
    pub value: Value,
}

impl Filter {
    pub fn new(column: impl Into<String>, compare: Compare, value: Value) -> Self {
        Self {
            column: column.into(),
            compare,
            value,
        }
    }

    pub fn eq(column: impl Into<String>, value: Value) -> Self {
        Self::new(column, Compare::Eq, value)
    }

    pub fn like(column: impl Into<String>, value: Value) -> Self {
        Self::new(column, Compare::Like, value)
    }
}

/// Sort order for direct table queries.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderBy {
    pub column: String,
    pub descending: bool,
}

impl OrderBy {
    pub fn asc(column: impl Into<String>) -> Self {
        Self {
            column: column.into(),
            descending: false,
        }
    }

    pub fn desc(column: impl Into<String>) -> Self {
        Self {
            column: column.into(),
            descending: true,
        }
    }
}

/// Read constraints: optional projection, predicates and sort order.
///
/// Join patterns run fixed query shapes and do not honor these; direct
/// table patterns delegate them through unchanged.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct QueryOptions {
    /// Columns to return; `None` selects the table's full column list.
    pub columns: Option<Vec<String>>,
    pub filters: Vec<Filter>,
    pub order: Option<OrderBy>,
}

/// Materialized query result with column names in normative order.
#[derive(Debug, Clone, PartialEq)]
pub struct RowSet {
    columns: Vec<String>,
    rows: Vec<Vec<Value>>,
}

impl RowSet {
    pub(crate) fn new(columns: Vec<String>) -> Self {
        Self {
            columns,
            rows: Vec::new(),
        }
    }

    pub(crate) fn push(&mut self, row: Vec<Value>) {
        self.rows.push(row);
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn rows(&self) -> impl Iterator<Item = &[Value]> {
        self.rows.iter().map(Vec::as_slice)
    }

    /// Value at `(row, column)`, or `None` when either is absent.
    pub fn value(&self, row: usize, column: &str) -> Option<&Value> {
        let index = self.columns.iter().position(|name| name == column)?;
        self.rows.get(row)?.get(index)
    }

    pub fn integer(&self, row: usize, column: &str) -> Option<i64> {
        match self.value(row, column) {
            Some(Value::Integer(value)) => Some(*value),
            _ => None,
        }
    }

    pub fn text(&self, row: usize, column: &str) -> Option<&str> {
        match self.value(row, column) {
            Some(Value::Text(value)) => Some(value.as_str()),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{Record, RowSet};
    use rusqlite::types::Value;

    #[test]
    fn record_set_replaces_existing_column() {
        let mut record = Record::new().with("name", Value::Text("otter".to_string()));
        record.set("name", Value::Text("badger".to_string()));

        assert_eq!(record.len(), 1);
        assert_eq!(record.get("name"), Some(&Value::Text("badger".to_string())));
    }

    #[test]
    fn record_preserves_insertion_order() {
        let record = Record::new()
            .with("b", Value::Integer(2))
            .with("a", Value::Integer(1));
        let columns: Vec<&str> = record.iter().map(|(name, _)| name).collect();
        assert_eq!(columns, ["b", "a"]);
    }

    #[test]
    fn row_set_addresses_values_by_column_name() {
        let mut set = RowSet::new(vec!["id".to_string(), "name".to_string()]);
        set.push(vec![Value::Integer(7), Value::Text("west".to_string())]);

        assert_eq!(set.integer(0, "id"), Some(7));
        assert_eq!(set.text(0, "name"), Some("west"));
        assert_eq!(set.value(0, "missing"), None);
        assert_eq!(set.integer(1, "id"), None);
    }
}
