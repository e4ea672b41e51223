//! Route geometry loading.
//!
//! # Responsibility
//! - Parse the feature-collection document into route rows and commit
//!   them in one bulk insert.
//!
//! # Invariants
//! - Rows are staged in memory and inserted only after the whole
//!   document parses; a structural failure commits nothing.
//! - Surface and description are never stored as literal nulls.

use crate::loader::{LoadError, LoadResult};
use crate::model::{Route, NO_DESCRIPTION, SURFACE_UNKNOWN};
use crate::router::{ResourcePattern, ResourceRouter};
use log::info;
use serde::Deserialize;
use std::collections::HashMap;
use std::io::Read;

const CONTEXT: &str = "route geometry";

#[derive(Debug, Deserialize)]
struct FeatureCollection {
    features: Vec<Feature>,
}

#[derive(Debug, Deserialize)]
struct Feature {
    properties: RouteProperties,
    geometry: Geometry,
}

#[derive(Debug, Deserialize)]
struct RouteProperties {
    route_no: i64,
    path_type: String,
    length: i64,
    surface: Option<String>,
}

#[derive(Debug, Deserialize)]
struct Geometry {
    /// Arbitrarily nested point/line/polygon array, kept opaque.
    coordinates: serde_json::Value,
}

/// Parses the geometry document and bulk-inserts one row per feature.
///
/// Descriptions are resolved from `descriptions` by route number,
/// falling back to the description sentinel.
///
/// # Errors
/// - `LoadError::Stream` when the input cannot be read.
/// - `LoadError::Parse` when the document is structurally invalid; in
///   that case no row is inserted.
/// - `LoadError::Router` when the store rejects the bulk insert.
pub fn load_routes<R: ResourceRouter>(
    mut reader: impl Read,
    descriptions: &HashMap<i64, String>,
    router: &R,
) -> LoadResult<usize> {
    let mut raw = String::new();
    reader.read_to_string(&mut raw).map_err(LoadError::Stream)?;

    let collection: FeatureCollection =
        serde_json::from_str(&raw).map_err(|err| LoadError::Parse {
            context: CONTEXT,
            message: err.to_string(),
        })?;

    let mut staged = Vec::with_capacity(collection.features.len());
    for feature in collection.features {
        let properties = feature.properties;
        let route = Route {
            id: None,
            route_number: properties.route_no,
            coordinates: feature.geometry.coordinates.to_string(),
            path_type: properties.path_type,
            length: properties.length,
            surface: normalize_surface(properties.surface),
            description: resolve_description(descriptions.get(&properties.route_no)),
        };
        staged.push(route.to_record());
    }

    let inserted = router.bulk_insert(&ResourcePattern::Routes, &staged)?;
    info!("event=load_routes module=loader status=ok count={inserted}");
    Ok(inserted)
}

fn normalize_surface(raw: Option<String>) -> String {
    match raw {
        Some(value) if !value.eq_ignore_ascii_case("null") => value,
        _ => SURFACE_UNKNOWN.to_string(),
    }
}

fn resolve_description(found: Option<&String>) -> String {
    match found {
        Some(text) if !text.eq_ignore_ascii_case("null") => text.clone(),
        _ => NO_DESCRIPTION.to_string(),
    }
}
