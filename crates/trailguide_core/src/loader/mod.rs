//! Bulk loader for the bundled reference files.
//!
//! # Responsibility
//! - Transform the three bundled files into store rows, in fixed order:
//!   descriptions, then routes, then wildlife.
//! - Contain structural parse failures so a damaged file degrades the
//!   dataset instead of blocking it.
//!
//! # Invariants
//! - Wildlife loading runs only after routes are committed; junction
//!   rows reference routes that already exist.
//! - Stream errors and store write failures are fatal for the load;
//!   parse failures in descriptions or route geometry abandon just that
//!   phase.

use crate::router::{ResourceRouter, RouterError};
use log::{info, warn};
use std::collections::HashMap;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::io::Read;

pub mod descriptions;
pub mod routes;
pub mod wildlife;

mod delimited;

pub use descriptions::load_descriptions;
pub use routes::load_routes;
pub use wildlife::{load_wildlife, WildlifeLoadStats};

pub type LoadResult<T> = Result<T, LoadError>;

/// Errors raised while loading the bundled reference files.
#[derive(Debug)]
pub enum LoadError {
    /// The input stream could not be read; fatal for the load step.
    Stream(std::io::Error),
    /// Structurally invalid content; the affected phase is abandoned.
    Parse {
        context: &'static str,
        message: String,
    },
    /// The store rejected a write issued by the loader.
    Router(RouterError),
}

impl Display for LoadError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Stream(err) => write!(f, "input stream error: {err}"),
            Self::Parse { context, message } => write!(f, "cannot parse {context}: {message}"),
            Self::Router(err) => write!(f, "{err}"),
        }
    }
}

impl Error for LoadError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Stream(err) => Some(err),
            Self::Parse { .. } => None,
            Self::Router(err) => Some(err),
        }
    }
}

impl From<RouterError> for LoadError {
    fn from(value: RouterError) -> Self {
        Self::Router(value)
    }
}

/// Row counts and diagnostics from one full load pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LoadSummary {
    pub descriptions: usize,
    pub routes: usize,
    pub wildlife: usize,
    pub route_links: usize,
    pub skipped_rows: usize,
    pub skipped_links: usize,
}

/// Runs the three load phases in dependency order.
///
/// A parse failure in the descriptions file falls back to an empty
/// mapping (routes keep the description sentinel); a parse failure in
/// the geometry file leaves the route table untouched. Wildlife rows
/// are loaded against whatever routes made it into the store.
///
/// # Errors
/// Returns `LoadError` for stream failures and store write failures.
pub fn load_dataset<R: ResourceRouter>(
    router: &R,
    descriptions: impl Read,
    routes: impl Read,
    wildlife: impl Read,
) -> LoadResult<LoadSummary> {
    let descriptions = match load_descriptions(descriptions) {
        Ok(mapping) => mapping,
        Err(LoadError::Parse { context, message }) => {
            warn!("event=load_descriptions module=loader status=abandoned context={context} error={message}");
            HashMap::new()
        }
        Err(err) => return Err(err),
    };

    let routes_loaded = match load_routes(routes, &descriptions, router) {
        Ok(count) => count,
        Err(LoadError::Parse { context, message }) => {
            warn!("event=load_routes module=loader status=abandoned context={context} error={message}");
            0
        }
        Err(err) => return Err(err),
    };

    let stats = load_wildlife(wildlife, router)?;

    let summary = LoadSummary {
        descriptions: descriptions.len(),
        routes: routes_loaded,
        wildlife: stats.wildlife,
        route_links: stats.route_links,
        skipped_rows: stats.skipped_rows,
        skipped_links: stats.skipped_links,
    };
    info!(
        "event=load_dataset module=loader status=ok descriptions={} routes={} wildlife={} route_links={} skipped_rows={} skipped_links={}",
        summary.descriptions,
        summary.routes,
        summary.wildlife,
        summary.route_links,
        summary.skipped_rows,
        summary.skipped_links
    );

    Ok(summary)
}
