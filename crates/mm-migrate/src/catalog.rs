//! Read-through cache over the destination catalog
//!
//! All cross-instance identity is name-based: numeric ids are never assumed
//! to match between instances. The cache fetches the destination table list,
//! per-table field lists, and the metric list on first use and keeps them
//! for the rest of the run; the destination catalog is assumed stable for a
//! run's duration, so entries are never invalidated.
//!
//! Matching is exact and case-sensitive. Duplicate names within one table's
//! field list are unsupported; the first match wins.

use crate::error::{MigrateError, MigrateResult};
use mm_api::DestinationApi;
use mm_core::model::{Field, Metric, Table};
use std::collections::HashMap;

/// Memoized destination catalog, scoped to one migration run
#[derive(Default)]
pub struct CatalogCache {
    tables: Option<Vec<Table>>,
    fields: HashMap<u64, Vec<Field>>,
    metrics: Option<Vec<Metric>>,
}

impl CatalogCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Destination table matching `(name, schema, database id)` exactly
    pub fn resolve_table(
        &mut self,
        dest: &dyn DestinationApi,
        name: &str,
        schema: &str,
        database_id: u64,
    ) -> MigrateResult<Table> {
        let tables = match &mut self.tables {
            Some(tables) => tables,
            tables @ None => tables.insert(dest.tables()?),
        };

        tables
            .iter()
            .find(|t| t.name == name && t.schema == schema && t.db_id == database_id)
            .cloned()
            .ok_or_else(|| MigrateError::TableNotFound {
                name: name.to_string(),
                schema: schema.to_string(),
                database_id,
            })
    }

    /// Id of the destination field named `name` on `table_id`
    pub fn resolve_field(
        &mut self,
        dest: &dyn DestinationApi,
        table_id: u64,
        name: &str,
    ) -> MigrateResult<u64> {
        let fields = match self.fields.entry(table_id) {
            std::collections::hash_map::Entry::Occupied(entry) => entry.into_mut(),
            std::collections::hash_map::Entry::Vacant(entry) => {
                entry.insert(dest.table_fields(table_id)?)
            }
        };

        fields
            .iter()
            .find(|f| f.name == name)
            .map(|f| f.id)
            .ok_or_else(|| MigrateError::FieldNotFound {
                name: name.to_string(),
                table_id,
            })
    }

    /// Id of the destination metric named `name` whose definition is scoped
    /// to `table_id`
    pub fn resolve_metric(
        &mut self,
        dest: &dyn DestinationApi,
        table_id: u64,
        name: &str,
    ) -> MigrateResult<u64> {
        let metrics = match &mut self.metrics {
            Some(metrics) => metrics,
            metrics @ None => metrics.insert(dest.metrics()?),
        };

        metrics
            .iter()
            .find(|m| m.name == name && m.definition.source_table == table_id)
            .map(|m| m.id)
            .ok_or_else(|| MigrateError::MetricNotFound {
                name: name.to_string(),
                table_id,
            })
    }
}

#[cfg(test)]
#[path = "catalog_test.rs"]
mod tests;
