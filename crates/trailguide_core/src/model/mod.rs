//! Domain records for the trail-guide store.
//!
//! # Responsibility
//! - Define the row shapes for the five related tables.
//! - Provide conversions into router [`Record`](crate::router::Record)s.
//!
//! # Invariants
//! - Synthetic identifiers are store-assigned; `id` is `None` until the
//!   row has been inserted and never changes afterwards.
//! - Missing source data is represented by sentinel values, never by
//!   literal nulls.

pub mod log_entry;
pub mod route;
pub mod wildlife;

pub use log_entry::{LogEntry, LogEntryId};
pub use route::{Area, AreaId, Route, RouteId, RouteInArea, NO_DESCRIPTION, SURFACE_UNKNOWN};
pub use wildlife::{Wildlife, WildlifeId, WildlifeOnRoute, NO_IMAGE};
