//! Resource router: the single gateway for reads and writes.
//!
//! # Responsibility
//! - Resolve hierarchical resource patterns to table or join queries.
//! - Keep SQL details inside the persistence boundary.
//! - Publish change notifications after committed mutations.
//!
//! # Invariants
//! - Identifier and column names are never interpolated from caller
//!   input; every query binds values through `?` placeholders against
//!   validated column allowlists.
//! - Unrecognized patterns fail the request, never the process.

use crate::db::DbError;
use std::error::Error;
use std::fmt::{Display, Formatter};

pub mod notify;
pub mod pattern;
pub mod query;
pub mod resource_router;

pub use notify::{ChangeEvent, ChangeHub, ChangeListener};
pub use pattern::{PatternKind, ResourcePattern};
pub use query::{Compare, Filter, OrderBy, QueryOptions, Record, RowSet};
pub use resource_router::{ResourceRouter, SqliteResourceRouter};

pub type RouterResult<T> = Result<T, RouterError>;

/// Routing and persistence errors surfaced by the resource router.
#[derive(Debug)]
pub enum RouterError {
    /// The raw text does not resolve to any known resource pattern.
    UnrecognizedPattern(String),
    /// The pattern is valid but does not support the requested verb.
    UnsupportedOperation {
        pattern: ResourcePattern,
        verb: &'static str,
    },
    /// A caller-supplied column name is not part of the resolved table.
    UnknownColumn {
        table: &'static str,
        column: String,
    },
    /// The store accepted the statement but the write had no usable
    /// effect (no row identifier assigned, empty record, ...).
    Write {
        pattern: ResourcePattern,
        message: String,
    },
    Db(DbError),
}

impl Display for RouterError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::UnrecognizedPattern(raw) => write!(f, "unrecognized resource pattern: {raw}"),
            Self::UnsupportedOperation { pattern, verb } => {
                write!(f, "pattern {pattern} does not support {verb}")
            }
            Self::UnknownColumn { table, column } => {
                write!(f, "unknown column `{column}` for table {table}")
            }
            Self::Write { pattern, message } => {
                write!(f, "write to {pattern} failed: {message}")
            }
            Self::Db(err) => write!(f, "{err}"),
        }
    }
}

impl Error for RouterError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Db(err) => Some(err),
            _ => None,
        }
    }
}

impl From<DbError> for RouterError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for RouterError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}
