//! Data layer for the trail-guide application.
//! This crate owns the local store, the bulk loader for the bundled
//! reference files, and the resource router every other part of the
//! application reads and writes through.

pub mod config;
pub mod db;
pub mod loader;
pub mod logging;
pub mod model;
pub mod router;

pub use config::RoutePalette;
pub use db::{open_db, open_db_in_memory, DbError, DbResult};
pub use loader::{
    load_dataset, load_descriptions, load_routes, load_wildlife, LoadError, LoadResult,
    LoadSummary, WildlifeLoadStats,
};
pub use logging::{default_log_level, init_logging, logging_status};
pub use model::{
    Area, AreaId, LogEntry, LogEntryId, Route, RouteId, RouteInArea, Wildlife, WildlifeId,
    WildlifeOnRoute, NO_DESCRIPTION, NO_IMAGE, SURFACE_UNKNOWN,
};
pub use router::{
    ChangeEvent, ChangeHub, ChangeListener, Compare, Filter, OrderBy, PatternKind, QueryOptions,
    Record, ResourcePattern, ResourceRouter, RouterError, RouterResult, RowSet,
    SqliteResourceRouter,
};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::core_version;

    #[test]
    fn version_is_not_empty() {
        assert!(!core_version().is_empty());
    }
}
