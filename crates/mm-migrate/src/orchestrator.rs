//! Copy orchestrator
//!
//! Sequences a migration run and owns all created-destination-id
//! bookkeeping. Creation order follows the dependency chain: collection,
//! then per dashboard its card placements, then the placement layout and
//! parameter-mapping patches that need the freshly created card ids.
//!
//! Failure policy: collection and dashboard creation failures abort the
//! run; anything that goes wrong while copying a single placement is
//! recorded as a skip and the loop continues.

use crate::catalog::CatalogCache;
use crate::error::{MigrateError, MigrateResult};
use crate::report::RunReport;
use crate::resolver::{self, ResolveContext};
use mm_api::{DestinationApi, SourceReader};
use mm_core::config::CollectionRef;
use mm_core::model::{Card, DashboardCard};
use mm_core::query::QueryNode;
use serde_json::Value;

/// Suffix appended to the source collection's name on the destination
const COLLECTION_SUFFIX: &str = " migrated";

/// Drives one migration run
pub struct Migrator<'a> {
    source: &'a dyn SourceReader,
    dest: &'a dyn DestinationApi,
    /// Destination warehouse database id, from the run configuration
    database_id: u64,
    catalog: CatalogCache,
    report: RunReport,
}

impl<'a> Migrator<'a> {
    pub fn new(source: &'a dyn SourceReader, dest: &'a dyn DestinationApi, database_id: u64) -> Self {
        Self {
            source,
            dest,
            database_id,
            catalog: CatalogCache::new(),
            report: RunReport::new(),
        }
    }

    /// Copy `collection` and everything under it to the destination.
    /// A fresh destination collection is created every run; there is no
    /// merging into an existing collection of the same name.
    pub fn run(mut self, collection: &CollectionRef) -> MigrateResult<RunReport> {
        let source_name = self.source.collection_name(collection)?;
        let dest_name = format!("{source_name}{COLLECTION_SUFFIX}");
        let created = self
            .dest
            .create_collection(&dest_name)
            .map_err(|source| MigrateError::CollectionCreate {
                name: dest_name.clone(),
                source,
            })?;
        log::info!("Created destination collection {dest_name:?} (id {})", created.id);

        for summary in self.source.collection_dashboards(collection)? {
            self.copy_dashboard(summary.id, created.id)?;
        }

        self.report.finish();
        Ok(self.report)
    }

    fn copy_dashboard(&mut self, dashboard_id: u64, dest_collection_id: u64) -> MigrateResult<()> {
        let mut dashboard = self.source.dashboard(dashboard_id)?;
        log::info!("Copying dashboard {:?}", dashboard.name);

        dashboard.collection_id = Some(dest_collection_id);
        let placements = std::mem::take(&mut dashboard.ordered_cards);

        let dest_dashboard_id =
            self.dest
                .create_dashboard(&dashboard)
                .map_err(|source| MigrateError::DashboardCreate {
                    name: dashboard.name.clone(),
                    source,
                })?;
        // parameters cannot be set atomically at creation
        self.dest
            .update_dashboard_parameters(dest_dashboard_id, &dashboard.parameters)?;

        for placement in placements {
            self.copy_placement(dest_dashboard_id, dest_collection_id, placement);
        }

        self.report.record_dashboard();
        Ok(())
    }

    /// Copy one placement; every failure here is card-local
    fn copy_placement(
        &mut self,
        dest_dashboard_id: u64,
        dest_collection_id: u64,
        placement: DashboardCard,
    ) {
        let source_card = match placement.card_id {
            Some(card_id) => match self.source.card(card_id) {
                Ok(card) => Some(card),
                Err(err) => {
                    log::warn!("Skipping card {card_id}: {err}");
                    self.report
                        .record_skipped(format!("card {card_id}"), err.to_string());
                    return;
                }
            },
            None => None,
        };
        let label = source_card.as_ref().map(|c| c.display_name().to_string());

        match self.place(dest_dashboard_id, dest_collection_id, placement, source_card) {
            Ok(()) => {
                if let Some(name) = label {
                    log::info!("Created card {name:?}");
                    self.report.record_migrated(name);
                }
            }
            Err(err) => {
                let name = label.unwrap_or_else(|| "(text tile)".to_string());
                log::warn!("Skipping card {name:?}: {err}");
                self.report.record_skipped(name, err.to_string());
            }
        }
    }

    fn place(
        &mut self,
        dest_dashboard_id: u64,
        dest_collection_id: u64,
        mut placement: DashboardCard,
        source_card: Option<Card>,
    ) -> MigrateResult<()> {
        // mapping targets resolve before anything is created, so a lookup
        // failure in them leaves no card behind on the destination
        for mapping in &mut placement.parameter_mappings {
            let mut target = QueryNode::from_value(mapping.target.take());
            let mut ctx = ResolveContext {
                source: self.source,
                dest: self.dest,
                catalog: &mut self.catalog,
                database_id: self.database_id,
            };
            resolver::resolve_query(&mut ctx, &mut target)?;
            mapping.target = target.into_value();
        }

        // text tiles have no card; their placement passes through as-is
        let dest_card_id = match source_card {
            Some(card) => Some(self.copy_card(card, dest_collection_id)?.id),
            None => None,
        };

        let dashcard_id = self.dest.add_dashboard_card(dest_dashboard_id, dest_card_id)?;

        placement.id = dashcard_id;
        placement.card_id = dest_card_id;
        for mapping in &mut placement.parameter_mappings {
            mapping.card_id = dest_card_id;
        }

        self.dest
            .update_dashboard_card(dest_dashboard_id, &placement)?;
        Ok(())
    }

    /// Recreate one source card on the destination. The query body is fully
    /// resolved before the create call, so a lookup failure leaves nothing
    /// behind on the destination.
    fn copy_card(&mut self, mut card: Card, dest_collection_id: u64) -> MigrateResult<Card> {
        // empty-description normalization happens before collection
        // assignment; one contract, applied in one place
        card.normalize_description();
        card.collection_id = Some(dest_collection_id);

        let missing = card.missing_parts();
        if !missing.is_empty() {
            return Err(MigrateError::InvalidCard {
                name: card.display_name().to_string(),
                missing: missing.join(", "),
            });
        }
        let Some(source_table_id) = card.table_id else {
            return Err(MigrateError::InvalidCard {
                name: card.display_name().to_string(),
                missing: "table_id".to_string(),
            });
        };

        let mut ctx = ResolveContext {
            source: self.source,
            dest: self.dest,
            catalog: &mut self.catalog,
            database_id: self.database_id,
        };
        let dest_table = resolver::destination_table_for(&mut ctx, source_table_id)?;

        if let Some(dataset_query) = card.dataset_query.as_mut() {
            let mut body = QueryNode::from_value(dataset_query.query.take());
            resolver::resolve_query(&mut ctx, &mut body)?;
            let mut body = body.into_value();
            if let Value::Object(map) = &mut body {
                map.insert("source-table".to_string(), Value::from(dest_table.id));
            }
            dataset_query.query = body;
            dataset_query.database = self.database_id;
        }
        card.table_id = Some(dest_table.id);

        let created = ctx.dest.create_card(&card)?;
        Ok(created)
    }
}

#[cfg(test)]
#[path = "orchestrator_test.rs"]
mod tests;
