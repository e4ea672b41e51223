//! Route and area records.
//!
//! # Invariants
//! - `route_number` is a natural key used for prefix lookups; the store
//!   does not enforce its uniqueness.
//! - `coordinates` is an opaque serialized point/line/polygon sequence;
//!   this layer never interprets it geometrically.

use crate::router::Record;
use rusqlite::types::Value;
use serde::{Deserialize, Serialize};

/// Store-assigned identifier of a route row.
pub type RouteId = i64;

/// Store-assigned identifier of an area row.
pub type AreaId = i64;

/// Sentinel stored when the source surface field is null or `"null"`.
pub const SURFACE_UNKNOWN: &str = "unknown";

/// Sentinel stored when no description exists for a route number.
pub const NO_DESCRIPTION: &str = "no description available";

/// One walking route from the bundled geometry file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Route {
    /// `None` until the store assigns an identifier at insert time.
    pub id: Option<RouteId>,
    /// Natural key from the source data; not unique by schema.
    pub route_number: i64,
    /// Serialized coordinate sequence, preserved verbatim from the source.
    pub coordinates: String,
    pub path_type: String,
    pub length: i64,
    pub surface: String,
    pub description: String,
}

impl Route {
    /// Converts this route into an insertable record (without `id`).
    pub fn to_record(&self) -> Record {
        Record::new()
            .with("route_number", Value::Integer(self.route_number))
            .with("coordinates", Value::Text(self.coordinates.clone()))
            .with("path_type", Value::Text(self.path_type.clone()))
            .with("length", Value::Integer(self.length))
            .with("surface", Value::Text(self.surface.clone()))
            .with("description", Value::Text(self.description.clone()))
    }
}

/// A named area that routes pass through.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Area {
    pub id: Option<AreaId>,
    pub name: String,
}

impl Area {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: None,
            name: name.into(),
        }
    }

    pub fn to_record(&self) -> Record {
        Record::new().with("name", Value::Text(self.name.clone()))
    }
}

/// Junction row linking a route to an area it passes through.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RouteInArea {
    pub id: Option<i64>,
    pub route_id: RouteId,
    pub area_id: AreaId,
}

impl RouteInArea {
    pub fn link(route_id: RouteId, area_id: AreaId) -> Self {
        Self {
            id: None,
            route_id,
            area_id,
        }
    }

    pub fn to_record(&self) -> Record {
        Record::new()
            .with("route_id", Value::Integer(self.route_id))
            .with("area_id", Value::Integer(self.area_id))
    }
}
