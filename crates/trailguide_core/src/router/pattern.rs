//! Resource pattern parsing and classification.
//!
//! # Responsibility
//! - Turn raw `{collection}[/{id}][/{related}[/{id}]]` text into a closed
//!   set of pattern variants.
//! - Classify every pattern as collection-shaped or item-shaped.
//!
//! # Invariants
//! - The pattern set is closed: parsing either yields a variant below or
//!   an `UnrecognizedPattern` error, and all dispatch over patterns is an
//!   exhaustive match.
//! - `Display` output round-trips through [`ResourcePattern::parse`].

use crate::router::{RouterError, RouterResult};
use std::fmt::{Display, Formatter};

/// Tables addressable through the router.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Table {
    Route,
    Area,
    RouteInArea,
    Wildlife,
    WildlifeOnRoute,
    LogEntry,
}

impl Table {
    pub(crate) fn name(self) -> &'static str {
        match self {
            Self::Route => "route",
            Self::Area => "area",
            Self::RouteInArea => "route_in_area",
            Self::Wildlife => "wildlife",
            Self::WildlifeOnRoute => "wildlife_on_route",
            Self::LogEntry => "log_entry",
        }
    }

    /// Column allowlist in normative result order.
    pub(crate) fn columns(self) -> &'static [&'static str] {
        match self {
            Self::Route => &[
                "id",
                "route_number",
                "coordinates",
                "path_type",
                "length",
                "surface",
                "description",
            ],
            Self::Area => &["id", "name"],
            Self::RouteInArea => &["id", "route_id", "area_id"],
            Self::Wildlife => &["id", "name", "category", "description", "when_seen", "image_name"],
            Self::WildlifeOnRoute => &["id", "wildlife_id", "route_id"],
            Self::LogEntry => &["id", "wildlife_id", "logged_at", "notes"],
        }
    }

    /// Collection pattern addressing this table.
    pub(crate) fn collection_pattern(self) -> ResourcePattern {
        match self {
            Self::Route => ResourcePattern::Routes,
            Self::Area => ResourcePattern::Areas,
            Self::RouteInArea => ResourcePattern::RouteInArea,
            Self::Wildlife => ResourcePattern::Wildlife,
            Self::WildlifeOnRoute => ResourcePattern::WildlifeOnRoute,
            Self::LogEntry => ResourcePattern::LogEntries,
        }
    }

    /// Canonical single-item pattern for a row of this table.
    pub(crate) fn item_pattern(self, id: i64) -> ResourcePattern {
        match self {
            Self::Route => ResourcePattern::RouteById(id),
            Self::Area => ResourcePattern::AreaById(id),
            Self::RouteInArea => ResourcePattern::RouteInAreaById(id),
            Self::Wildlife => ResourcePattern::WildlifeById(id),
            Self::WildlifeOnRoute => ResourcePattern::WildlifeOnRouteById(id),
            Self::LogEntry => ResourcePattern::LogEntryById(id),
        }
    }
}

/// MIME-like result shape of a resolved pattern.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PatternKind {
    /// The pattern resolves to zero or more rows.
    Collection,
    /// The pattern resolves to at most one row.
    Item,
}

impl Display for PatternKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Collection => write!(f, "collection"),
            Self::Item => write!(f, "item"),
        }
    }
}

/// The closed set of resource patterns the router accepts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResourcePattern {
    /// `route`: all routes.
    Routes,
    /// `route/{id}`: one route.
    RouteById(i64),
    /// `route/{id}/area`: areas a route passes through.
    AreasForRoute(i64),
    /// `route/{id}/wildlife`: wildlife found on a route.
    WildlifeForRoute(i64),
    /// `area`: all areas.
    Areas,
    /// `area/{id}`: one area.
    AreaById(i64),
    /// `area/{id}/route`: routes within an area.
    RoutesForArea(i64),
    /// `area/routes`: every route joined to every area it belongs to.
    RoutesForAllAreas,
    /// `route_in_area`: the route/area junction table.
    RouteInArea,
    /// `route_in_area/{id}`: one junction row.
    RouteInAreaById(i64),
    /// `wildlife`: all wildlife.
    Wildlife,
    /// `wildlife/{id}`: one wildlife species.
    WildlifeById(i64),
    /// `wildlife/{id}/route`: routes a species is found on.
    RoutesForWildlife(i64),
    /// `wildlife_on_route`: the wildlife/route junction table.
    WildlifeOnRoute,
    /// `wildlife_on_route/{id}`: one junction row.
    WildlifeOnRouteById(i64),
    /// `log_entry`: all sighting log entries.
    LogEntries,
    /// `log_entry/{id}`: one log entry.
    LogEntryById(i64),
    /// `log_entry/wildlife`: wildlife with their log entry counts.
    WildlifeWithLogEntries,
    /// `log_entry/wildlife/{id}`: log entries for one wildlife id.
    LogEntriesForWildlife(i64),
}

impl ResourcePattern {
    /// Parses raw pattern text into a variant.
    ///
    /// # Errors
    /// Returns `RouterError::UnrecognizedPattern` for anything outside
    /// the closed set, including malformed or negative identifiers.
    pub fn parse(raw: &str) -> RouterResult<Self> {
        let unrecognized = || RouterError::UnrecognizedPattern(raw.to_string());
        let trimmed = raw.trim().trim_matches('/');
        let segments: Vec<&str> = trimmed.split('/').collect();

        let pattern = match segments.as_slice() {
            ["route"] => Self::Routes,
            ["route", id] => Self::RouteById(parse_id(id).ok_or_else(unrecognized)?),
            ["route", id, "area"] => Self::AreasForRoute(parse_id(id).ok_or_else(unrecognized)?),
            ["route", id, "wildlife"] => {
                Self::WildlifeForRoute(parse_id(id).ok_or_else(unrecognized)?)
            }
            ["area"] => Self::Areas,
            ["area", "routes"] => Self::RoutesForAllAreas,
            ["area", id] => Self::AreaById(parse_id(id).ok_or_else(unrecognized)?),
            ["area", id, "route"] => Self::RoutesForArea(parse_id(id).ok_or_else(unrecognized)?),
            ["route_in_area"] => Self::RouteInArea,
            ["route_in_area", id] => Self::RouteInAreaById(parse_id(id).ok_or_else(unrecognized)?),
            ["wildlife"] => Self::Wildlife,
            ["wildlife", id] => Self::WildlifeById(parse_id(id).ok_or_else(unrecognized)?),
            ["wildlife", id, "route"] => {
                Self::RoutesForWildlife(parse_id(id).ok_or_else(unrecognized)?)
            }
            ["wildlife_on_route"] => Self::WildlifeOnRoute,
            ["wildlife_on_route", id] => {
                Self::WildlifeOnRouteById(parse_id(id).ok_or_else(unrecognized)?)
            }
            ["log_entry"] => Self::LogEntries,
            ["log_entry", "wildlife"] => Self::WildlifeWithLogEntries,
            ["log_entry", "wildlife", id] => {
                Self::LogEntriesForWildlife(parse_id(id).ok_or_else(unrecognized)?)
            }
            ["log_entry", id] => Self::LogEntryById(parse_id(id).ok_or_else(unrecognized)?),
            _ => return Err(unrecognized()),
        };

        Ok(pattern)
    }

    /// Collection/item classification of this pattern.
    pub fn kind(&self) -> PatternKind {
        match self {
            Self::RouteById(_)
            | Self::AreaById(_)
            | Self::RouteInAreaById(_)
            | Self::WildlifeById(_)
            | Self::WildlifeOnRouteById(_)
            | Self::LogEntryById(_) => PatternKind::Item,
            Self::Routes
            | Self::AreasForRoute(_)
            | Self::WildlifeForRoute(_)
            | Self::Areas
            | Self::RoutesForArea(_)
            | Self::RoutesForAllAreas
            | Self::RouteInArea
            | Self::Wildlife
            | Self::RoutesForWildlife(_)
            | Self::WildlifeOnRoute
            | Self::LogEntries
            | Self::WildlifeWithLogEntries
            | Self::LogEntriesForWildlife(_) => PatternKind::Collection,
        }
    }

    /// Identifier embedded in a single-item pattern.
    pub fn item_id(&self) -> Option<i64> {
        match self {
            Self::RouteById(id)
            | Self::AreaById(id)
            | Self::RouteInAreaById(id)
            | Self::WildlifeById(id)
            | Self::WildlifeOnRouteById(id)
            | Self::LogEntryById(id) => Some(*id),
            _ => None,
        }
    }

    /// Whether this pattern is a segment-prefix of `other`.
    ///
    /// Used by the notification hub: a subscriber registered on `route`
    /// observes changes to `route/7`, but not to `route_in_area`.
    pub fn is_prefix_of(&self, other: &Self) -> bool {
        let mine = self.to_string();
        let theirs = other.to_string();
        theirs == mine || (theirs.starts_with(&mine) && theirs.as_bytes()[mine.len()] == b'/')
    }
}

impl Display for ResourcePattern {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Routes => write!(f, "route"),
            Self::RouteById(id) => write!(f, "route/{id}"),
            Self::AreasForRoute(id) => write!(f, "route/{id}/area"),
            Self::WildlifeForRoute(id) => write!(f, "route/{id}/wildlife"),
            Self::Areas => write!(f, "area"),
            Self::AreaById(id) => write!(f, "area/{id}"),
            Self::RoutesForArea(id) => write!(f, "area/{id}/route"),
            Self::RoutesForAllAreas => write!(f, "area/routes"),
            Self::RouteInArea => write!(f, "route_in_area"),
            Self::RouteInAreaById(id) => write!(f, "route_in_area/{id}"),
            Self::Wildlife => write!(f, "wildlife"),
            Self::WildlifeById(id) => write!(f, "wildlife/{id}"),
            Self::RoutesForWildlife(id) => write!(f, "wildlife/{id}/route"),
            Self::WildlifeOnRoute => write!(f, "wildlife_on_route"),
            Self::WildlifeOnRouteById(id) => write!(f, "wildlife_on_route/{id}"),
            Self::LogEntries => write!(f, "log_entry"),
            Self::LogEntryById(id) => write!(f, "log_entry/{id}"),
            Self::WildlifeWithLogEntries => write!(f, "log_entry/wildlife"),
            Self::LogEntriesForWildlife(id) => write!(f, "log_entry/wildlife/{id}"),
        }
    }
}

fn parse_id(raw: &str) -> Option<i64> {
    if raw.is_empty() || !raw.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    raw.parse().ok()
}
