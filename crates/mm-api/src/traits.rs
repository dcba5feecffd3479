//! Reader/writer trait seams the migration core is written against

use crate::error::ApiResult;
use mm_core::config::CollectionRef;
use mm_core::model::{
    Card, Collection, Dashboard, DashboardCard, DashboardSummary, Field, Metric, Table,
};
use serde_json::Value;

/// Read access to the source instance
pub trait SourceReader {
    /// Name of a collection (including the root sentinel)
    fn collection_name(&self, collection: &CollectionRef) -> ApiResult<String>;

    /// Dashboards listed under a collection
    fn collection_dashboards(&self, collection: &CollectionRef)
        -> ApiResult<Vec<DashboardSummary>>;

    /// Dashboard detail: ordered placements and parameters
    fn dashboard(&self, dashboard_id: u64) -> ApiResult<Dashboard>;

    /// Card detail
    fn card(&self, card_id: u64) -> ApiResult<Card>;

    /// Table detail
    fn table(&self, table_id: u64) -> ApiResult<Table>;

    /// Field detail
    fn field(&self, field_id: u64) -> ApiResult<Field>;

    /// Metric detail
    fn metric(&self, metric_id: u64) -> ApiResult<Metric>;
}

/// Read and write access to the destination instance
pub trait DestinationApi {
    /// All tables visible on the destination
    fn tables(&self) -> ApiResult<Vec<Table>>;

    /// Field list of one destination table
    fn table_fields(&self, table_id: u64) -> ApiResult<Vec<Field>>;

    /// All metrics on the destination
    fn metrics(&self) -> ApiResult<Vec<Metric>>;

    /// Create a collection, returning the created object
    fn create_collection(&self, name: &str) -> ApiResult<Collection>;

    /// Create a dashboard, returning its id
    fn create_dashboard(&self, dashboard: &Dashboard) -> ApiResult<u64>;

    /// Patch a dashboard's parameters (cannot be set at creation)
    fn update_dashboard_parameters(&self, dashboard_id: u64, parameters: &[Value])
        -> ApiResult<()>;

    /// Create a card, returning the created object
    fn create_card(&self, card: &Card) -> ApiResult<Card>;

    /// Attach a card (or a card-less text tile) to a dashboard, returning
    /// the new placement's id
    fn add_dashboard_card(&self, dashboard_id: u64, card_id: Option<u64>) -> ApiResult<u64>;

    /// Patch a placement's layout and parameter mappings
    fn update_dashboard_card(&self, dashboard_id: u64, placement: &DashboardCard) -> ApiResult<()>;

    /// Patch destination field metadata (foreign-key target, semantic type)
    fn update_field(&self, field_id: u64, patch: &Value) -> ApiResult<()>;
}
