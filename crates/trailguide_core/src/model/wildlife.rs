//! Wildlife records and their route associations.

use crate::model::route::RouteId;
use crate::router::Record;
use rusqlite::types::Value;
use serde::{Deserialize, Serialize};

/// Store-assigned identifier of a wildlife row.
pub type WildlifeId = i64;

/// Sentinel stored when the source row carries no image file name.
pub const NO_IMAGE: &str = "no_image";

/// One wildlife species from the bundled reference file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Wildlife {
    /// `None` until the store assigns an identifier at insert time.
    pub id: Option<WildlifeId>,
    /// Natural key for display purposes; not unique by schema.
    pub name: String,
    pub category: String,
    pub description: String,
    pub when_seen: String,
    pub image_name: String,
}

impl Wildlife {
    pub fn to_record(&self) -> Record {
        Record::new()
            .with("name", Value::Text(self.name.clone()))
            .with("category", Value::Text(self.category.clone()))
            .with("description", Value::Text(self.description.clone()))
            .with("when_seen", Value::Text(self.when_seen.clone()))
            .with("image_name", Value::Text(self.image_name.clone()))
    }
}

/// Junction row linking a wildlife species to a route it is found on.
///
/// Only ever created after both sides exist in the store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct WildlifeOnRoute {
    pub id: Option<i64>,
    pub wildlife_id: WildlifeId,
    pub route_id: RouteId,
}

impl WildlifeOnRoute {
    pub fn link(wildlife_id: WildlifeId, route_id: RouteId) -> Self {
        Self {
            id: None,
            wildlife_id,
            route_id,
        }
    }

    pub fn to_record(&self) -> Record {
        Record::new()
            .with("wildlife_id", Value::Integer(self.wildlife_id))
            .with("route_id", Value::Integer(self.route_id))
    }
}
