//! Router contract and SQLite implementation.
//!
//! # Responsibility
//! - Dispatch resource patterns to single-table statements or to the
//!   fixed join shapes, exclusively through bind parameters.
//! - Raise change notifications after committed mutations.
//!
//! # Invariants
//! - Caller-supplied column names are resolved against per-table
//!   allowlists before they reach SQL text.
//! - Single-id reads rewrite the id into a primary-key equality and
//!   ignore caller predicates for that position.
//! - Mutations are accepted on collection patterns only.

use crate::router::notify::{ChangeEvent, ChangeHub, ChangeListener};
use crate::router::pattern::{ResourcePattern, Table};
use crate::router::query::{Filter, OrderBy, QueryOptions, Record, RowSet};
use crate::router::{RouterError, RouterResult};
use rusqlite::types::Value;
use rusqlite::{params_from_iter, Connection};

const AREAS_FOR_ROUTE_SQL: &str = "SELECT area.id AS id, area.name AS name
 FROM area
 INNER JOIN route_in_area ON route_in_area.area_id = area.id
 WHERE route_in_area.route_id = ?1;";

const WILDLIFE_FOR_ROUTE_SQL: &str = "SELECT wildlife.id AS id,
    wildlife.name AS name,
    wildlife.category AS category,
    wildlife.description AS description,
    wildlife.image_name AS image_name,
    wildlife.when_seen AS when_seen
 FROM wildlife
 INNER JOIN wildlife_on_route ON wildlife_on_route.wildlife_id = wildlife.id
 WHERE wildlife_on_route.route_id = ?1;";

const ROUTES_FOR_AREA_SQL: &str = "SELECT route.id AS id,
    route.route_number AS route_number,
    route.coordinates AS coordinates,
    route.path_type AS path_type,
    route.length AS length,
    route.surface AS surface,
    route.description AS description,
    route_in_area.area_id AS area_id
 FROM route
 INNER JOIN route_in_area ON route_in_area.route_id = route.id
 WHERE route_in_area.area_id = ?1;";

const ROUTES_FOR_ALL_AREAS_SQL: &str = "SELECT area.id AS area_id,
    area.name AS area_name,
    route.id AS route_id,
    route.route_number AS route_number,
    route.coordinates AS coordinates,
    route.path_type AS path_type,
    route.length AS length,
    route.surface AS surface
 FROM area
 INNER JOIN route_in_area ON route_in_area.area_id = area.id
 INNER JOIN route ON route.id = route_in_area.route_id
 ORDER BY area.id, route.id;";

const ROUTES_FOR_WILDLIFE_SQL: &str = "SELECT route.id AS id,
    route.route_number AS route_number,
    route.coordinates AS coordinates,
    route.path_type AS path_type,
    route.length AS length,
    route.surface AS surface,
    route.description AS description
 FROM route
 INNER JOIN wildlife_on_route ON wildlife_on_route.route_id = route.id
 WHERE wildlife_on_route.wildlife_id = ?1;";

const WILDLIFE_WITH_LOG_ENTRIES_SQL: &str = "SELECT wildlife.id AS id,
    wildlife.name AS name,
    wildlife.image_name AS image_name,
    count(*) AS num_log_entries
 FROM wildlife
 INNER JOIN log_entry ON log_entry.wildlife_id = wildlife.id
 GROUP BY wildlife.id
 ORDER BY wildlife.id;";

/// The single sanctioned access path to the trail-guide store.
pub trait ResourceRouter {
    /// Resolves `pattern` and returns the matching rows.
    fn query(&self, pattern: &ResourcePattern, options: &QueryOptions) -> RouterResult<RowSet>;

    /// Inserts one record and returns the canonical item pattern of the
    /// new row.
    fn insert(&self, pattern: &ResourcePattern, record: &Record) -> RouterResult<ResourcePattern>;

    /// Inserts all records in one transaction; nothing is committed when
    /// any row fails.
    fn bulk_insert(&self, pattern: &ResourcePattern, records: &[Record]) -> RouterResult<usize>;

    /// Applies `changes` to rows matching `filters`; returns the number
    /// of affected rows.
    fn update(
        &self,
        pattern: &ResourcePattern,
        changes: &Record,
        filters: &[Filter],
    ) -> RouterResult<usize>;

    /// Deletes rows matching `filters`; returns the number of affected
    /// rows.
    fn delete(&self, pattern: &ResourcePattern, filters: &[Filter]) -> RouterResult<usize>;

    /// Registers a change subscriber for `prefix`.
    fn subscribe(&self, prefix: ResourcePattern) -> ChangeListener;
}

/// SQLite-backed resource router.
pub struct SqliteResourceRouter<'conn> {
    conn: &'conn Connection,
    hub: ChangeHub,
}

impl<'conn> SqliteResourceRouter<'conn> {
    pub fn new(conn: &'conn Connection) -> Self {
        Self {
            conn,
            hub: ChangeHub::new(),
        }
    }

    /// The notification hub backing [`ResourceRouter::subscribe`].
    pub fn hub(&self) -> &ChangeHub {
        &self.hub
    }

    fn fetch(&self, sql: &str, binds: Vec<Value>) -> RouterResult<RowSet> {
        let mut stmt = self.conn.prepare(sql)?;
        let columns: Vec<String> = stmt.column_names().into_iter().map(String::from).collect();
        let width = columns.len();

        let mut rows = stmt.query(params_from_iter(binds))?;
        let mut set = RowSet::new(columns);
        while let Some(row) = rows.next()? {
            let mut values = Vec::with_capacity(width);
            for index in 0..width {
                values.push(row.get::<_, Value>(index)?);
            }
            set.push(values);
        }

        Ok(set)
    }

    fn run_select(
        &self,
        table: Table,
        projection: Option<&[String]>,
        filters: &[Filter],
        order: Option<&OrderBy>,
    ) -> RouterResult<RowSet> {
        let columns = resolve_projection(table, projection)?;
        let mut sql = format!("SELECT {} FROM {}", columns.join(", "), table.name());
        let mut binds = Vec::with_capacity(filters.len());

        for (index, filter) in filters.iter().enumerate() {
            sql.push_str(if index == 0 { " WHERE " } else { " AND " });
            sql.push_str(resolve_column(table, &filter.column)?);
            sql.push(' ');
            sql.push_str(filter.compare.sql());
            sql.push_str(" ?");
            binds.push(filter.value.clone());
        }

        if let Some(order) = order {
            sql.push_str(" ORDER BY ");
            sql.push_str(resolve_column(table, &order.column)?);
            if order.descending {
                sql.push_str(" DESC");
            }
        }

        self.fetch(&sql, binds)
    }

    fn execute_insert(&self, table: Table, record: &Record) -> RouterResult<i64> {
        let (sql, binds) = build_insert(table, record)?;
        let changed = self.conn.execute(&sql, params_from_iter(binds))?;
        let id = self.conn.last_insert_rowid();
        if changed == 0 || id <= 0 {
            return Err(RouterError::Write {
                pattern: table.collection_pattern(),
                message: "store returned no row identifier".to_string(),
            });
        }
        Ok(id)
    }

    fn publish(&self, pattern: ResourcePattern) {
        self.hub.publish(&ChangeEvent { pattern });
    }

    /// Junction and log mutations also affect the joins hanging off the
    /// parent items, so their subscribers are informed as well.
    fn publish_related(&self, table: Table, record: &Record) {
        for pattern in related_patterns(table, record) {
            self.publish(pattern);
        }
    }
}

impl ResourceRouter for SqliteResourceRouter<'_> {
    fn query(&self, pattern: &ResourcePattern, options: &QueryOptions) -> RouterResult<RowSet> {
        let projection = options.columns.as_deref();
        let order = options.order.as_ref();

        match pattern {
            ResourcePattern::Routes => {
                self.run_select(Table::Route, projection, &options.filters, order)
            }
            ResourcePattern::RouteById(id) => self.run_select(
                Table::Route,
                projection,
                &[Filter::eq("id", Value::Integer(*id))],
                order,
            ),
            ResourcePattern::AreasForRoute(id) => {
                self.fetch(AREAS_FOR_ROUTE_SQL, vec![Value::Integer(*id)])
            }
            ResourcePattern::WildlifeForRoute(id) => {
                self.fetch(WILDLIFE_FOR_ROUTE_SQL, vec![Value::Integer(*id)])
            }
            ResourcePattern::Areas => {
                self.run_select(Table::Area, projection, &options.filters, order)
            }
            ResourcePattern::AreaById(id) => self.run_select(
                Table::Area,
                projection,
                &[Filter::eq("id", Value::Integer(*id))],
                order,
            ),
            ResourcePattern::RoutesForArea(id) => {
                self.fetch(ROUTES_FOR_AREA_SQL, vec![Value::Integer(*id)])
            }
            ResourcePattern::RoutesForAllAreas => self.fetch(ROUTES_FOR_ALL_AREAS_SQL, Vec::new()),
            ResourcePattern::RouteInArea => {
                self.run_select(Table::RouteInArea, projection, &options.filters, order)
            }
            ResourcePattern::RouteInAreaById(id) => self.run_select(
                Table::RouteInArea,
                projection,
                &[Filter::eq("id", Value::Integer(*id))],
                order,
            ),
            ResourcePattern::Wildlife => {
                self.run_select(Table::Wildlife, projection, &options.filters, order)
            }
            ResourcePattern::WildlifeById(id) => self.run_select(
                Table::Wildlife,
                projection,
                &[Filter::eq("id", Value::Integer(*id))],
                order,
            ),
            ResourcePattern::RoutesForWildlife(id) => {
                self.fetch(ROUTES_FOR_WILDLIFE_SQL, vec![Value::Integer(*id)])
            }
            ResourcePattern::WildlifeOnRoute => {
                self.run_select(Table::WildlifeOnRoute, projection, &options.filters, order)
            }
            ResourcePattern::WildlifeOnRouteById(id) => self.run_select(
                Table::WildlifeOnRoute,
                projection,
                &[Filter::eq("id", Value::Integer(*id))],
                order,
            ),
            ResourcePattern::LogEntries => {
                self.run_select(Table::LogEntry, projection, &options.filters, order)
            }
            ResourcePattern::LogEntryById(id) => self.run_select(
                Table::LogEntry,
                projection,
                &[Filter::eq("id", Value::Integer(*id))],
                order,
            ),
            ResourcePattern::WildlifeWithLogEntries => {
                self.fetch(WILDLIFE_WITH_LOG_ENTRIES_SQL, Vec::new())
            }
            ResourcePattern::LogEntriesForWildlife(id) => self.run_select(
                Table::LogEntry,
                projection,
                &[Filter::eq("wildlife_id", Value::Integer(*id))],
                order,
            ),
        }
    }

    fn insert(&self, pattern: &ResourcePattern, record: &Record) -> RouterResult<ResourcePattern> {
        let table = mutation_table(pattern, "insert")?;
        let id = self.execute_insert(table, record)?;

        self.publish(pattern.clone());
        self.publish_related(table, record);

        Ok(table.item_pattern(id))
    }

    fn bulk_insert(&self, pattern: &ResourcePattern, records: &[Record]) -> RouterResult<usize> {
        let table = mutation_table(pattern, "bulk_insert")?;
        if records.is_empty() {
            return Ok(0);
        }

        let tx = self.conn.unchecked_transaction()?;
        let mut inserted = 0;
        for record in records {
            let (sql, binds) = build_insert(table, record)?;
            inserted += tx.execute(&sql, params_from_iter(binds))?;
        }
        tx.commit()?;

        self.publish(pattern.clone());
        let mut related_seen: Vec<ResourcePattern> = Vec::new();
        for record in records {
            for related in related_patterns(table, record) {
                if !related_seen.contains(&related) {
                    self.publish(related.clone());
                    related_seen.push(related);
                }
            }
        }

        Ok(inserted)
    }

    fn update(
        &self,
        pattern: &ResourcePattern,
        changes: &Record,
        filters: &[Filter],
    ) -> RouterResult<usize> {
        let table = mutation_table(pattern, "update")?;
        if changes.is_empty() {
            return Err(RouterError::Write {
                pattern: pattern.clone(),
                message: "update record has no columns".to_string(),
            });
        }

        let mut sql = format!("UPDATE {} SET ", table.name());
        let mut binds = Vec::with_capacity(changes.len() + filters.len());
        for (index, (column, value)) in changes.iter().enumerate() {
            if index > 0 {
                sql.push_str(", ");
            }
            sql.push_str(resolve_column(table, column)?);
            sql.push_str(" = ?");
            binds.push(value.clone());
        }
        for (index, filter) in filters.iter().enumerate() {
            sql.push_str(if index == 0 { " WHERE " } else { " AND " });
            sql.push_str(resolve_column(table, &filter.column)?);
            sql.push(' ');
            sql.push_str(filter.compare.sql());
            sql.push_str(" ?");
            binds.push(filter.value.clone());
        }

        let changed = self.conn.execute(&sql, params_from_iter(binds))?;
        if filters.is_empty() || changed > 0 {
            self.publish(pattern.clone());
        }

        Ok(changed)
    }

    fn delete(&self, pattern: &ResourcePattern, filters: &[Filter]) -> RouterResult<usize> {
        let table = mutation_table(pattern, "delete")?;

        let mut sql = format!("DELETE FROM {}", table.name());
        let mut binds = Vec::with_capacity(filters.len());
        for (index, filter) in filters.iter().enumerate() {
            sql.push_str(if index == 0 { " WHERE " } else { " AND " });
            sql.push_str(resolve_column(table, &filter.column)?);
            sql.push(' ');
            sql.push_str(filter.compare.sql());
            sql.push_str(" ?");
            binds.push(filter.value.clone());
        }

        let changed = self.conn.execute(&sql, params_from_iter(binds))?;
        if filters.is_empty() || changed > 0 {
            self.publish(pattern.clone());
        }

        Ok(changed)
    }

    fn subscribe(&self, prefix: ResourcePattern) -> ChangeListener {
        self.hub.subscribe(prefix)
    }
}

fn mutation_table(pattern: &ResourcePattern, verb: &'static str) -> RouterResult<Table> {
    match pattern {
        ResourcePattern::Routes => Ok(Table::Route),
        ResourcePattern::Areas => Ok(Table::Area),
        ResourcePattern::RouteInArea => Ok(Table::RouteInArea),
        ResourcePattern::Wildlife => Ok(Table::Wildlife),
        ResourcePattern::WildlifeOnRoute => Ok(Table::WildlifeOnRoute),
        ResourcePattern::LogEntries => Ok(Table::LogEntry),
        other => Err(RouterError::UnsupportedOperation {
            pattern: other.clone(),
            verb,
        }),
    }
}

fn resolve_column(table: Table, requested: &str) -> RouterResult<&'static str> {
    table
        .columns()
        .iter()
        .copied()
        .find(|known| *known == requested)
        .ok_or_else(|| RouterError::UnknownColumn {
            table: table.name(),
            column: requested.to_string(),
        })
}

fn resolve_projection(
    table: Table,
    requested: Option<&[String]>,
) -> RouterResult<Vec<&'static str>> {
    match requested {
        None => Ok(table.columns().to_vec()),
        Some(columns) => columns
            .iter()
            .map(|column| resolve_column(table, column))
            .collect(),
    }
}

fn build_insert(table: Table, record: &Record) -> RouterResult<(String, Vec<Value>)> {
    if record.is_empty() {
        return Err(RouterError::Write {
            pattern: table.collection_pattern(),
            message: "record has no columns".to_string(),
        });
    }

    let mut columns = Vec::with_capacity(record.len());
    let mut binds = Vec::with_capacity(record.len());
    for (column, value) in record.iter() {
        columns.push(resolve_column(table, column)?);
        binds.push(value.clone());
    }

    let placeholders = vec!["?"; columns.len()].join(", ");
    let sql = format!(
        "INSERT INTO {} ({}) VALUES ({});",
        table.name(),
        columns.join(", "),
        placeholders
    );

    Ok((sql, binds))
}

fn related_patterns(table: Table, record: &Record) -> Vec<ResourcePattern> {
    let mut related = Vec::new();
    match table {
        Table::WildlifeOnRoute => {
            if let Some(route_id) = record.integer("route_id") {
                related.push(ResourcePattern::RouteById(route_id));
            }
            if let Some(wildlife_id) = record.integer("wildlife_id") {
                related.push(ResourcePattern::WildlifeById(wildlife_id));
            }
        }
        Table::RouteInArea => {
            if let Some(route_id) = record.integer("route_id") {
                related.push(ResourcePattern::RouteById(route_id));
            }
            if let Some(area_id) = record.integer("area_id") {
                related.push(ResourcePattern::AreaById(area_id));
            }
        }
        Table::LogEntry => {
            if let Some(wildlife_id) = record.integer("wildlife_id") {
                related.push(ResourcePattern::LogEntriesForWildlife(wildlife_id));
            }
        }
        Table::Route | Table::Area | Table::Wildlife => {}
    }
    related
}
