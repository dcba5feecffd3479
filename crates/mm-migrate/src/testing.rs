//! In-memory source/destination fakes for exercising migrations without a
//! live server. Test support only; not part of the public migration API.

use mm_api::{ApiError, ApiResult, DestinationApi, SourceReader};
use mm_core::config::CollectionRef;
use mm_core::model::{
    Card, Collection, Dashboard, DashboardCard, DashboardSummary, Field, Metric, Table,
};
use serde_json::{json, Map, Value};
use std::cell::{Cell, RefCell};
use std::collections::HashMap;

fn not_found(what: String) -> ApiError {
    ApiError::Request {
        method: "GET",
        url: format!("fake://{what}"),
        status: 404,
        body: String::new(),
    }
}

/// Build a catalog table
pub fn table(id: u64, name: &str, schema: &str, db_id: u64) -> Table {
    serde_json::from_value(json!({"id": id, "name": name, "schema": schema, "db_id": db_id}))
        .unwrap()
}

/// Build a catalog field
pub fn field(id: u64, name: &str, table_id: u64) -> Field {
    serde_json::from_value(json!({"id": id, "name": name, "table_id": table_id})).unwrap()
}

/// Build a catalog metric scoped to `source_table`
pub fn metric(id: u64, name: &str, source_table: u64) -> Metric {
    serde_json::from_value(json!({
        "id": id,
        "name": name,
        "definition": {"source-table": source_table}
    }))
    .unwrap()
}

/// Read-only fake of the source instance
#[derive(Default)]
pub struct FakeSource {
    pub collections: HashMap<CollectionRef, String>,
    pub collection_dashboards: HashMap<CollectionRef, Vec<DashboardSummary>>,
    pub dashboards: HashMap<u64, Dashboard>,
    pub cards: HashMap<u64, Card>,
    pub tables: HashMap<u64, Table>,
    pub fields: HashMap<u64, Field>,
    pub metrics: HashMap<u64, Metric>,
}

impl SourceReader for FakeSource {
    fn collection_name(&self, collection: &CollectionRef) -> ApiResult<String> {
        self.collections
            .get(collection)
            .cloned()
            .ok_or_else(|| not_found(format!("collection/{collection}")))
    }

    fn collection_dashboards(
        &self,
        collection: &CollectionRef,
    ) -> ApiResult<Vec<DashboardSummary>> {
        Ok(self
            .collection_dashboards
            .get(collection)
            .cloned()
            .unwrap_or_default())
    }

    fn dashboard(&self, dashboard_id: u64) -> ApiResult<Dashboard> {
        self.dashboards
            .get(&dashboard_id)
            .cloned()
            .ok_or_else(|| not_found(format!("dashboard/{dashboard_id}")))
    }

    fn card(&self, card_id: u64) -> ApiResult<Card> {
        self.cards
            .get(&card_id)
            .cloned()
            .ok_or_else(|| not_found(format!("card/{card_id}")))
    }

    fn table(&self, table_id: u64) -> ApiResult<Table> {
        self.tables
            .get(&table_id)
            .cloned()
            .ok_or_else(|| not_found(format!("table/{table_id}")))
    }

    fn field(&self, field_id: u64) -> ApiResult<Field> {
        self.fields
            .get(&field_id)
            .cloned()
            .ok_or_else(|| not_found(format!("field/{field_id}")))
    }

    fn metric(&self, metric_id: u64) -> ApiResult<Metric> {
        self.metrics
            .get(&metric_id)
            .cloned()
            .ok_or_else(|| not_found(format!("metric/{metric_id}")))
    }
}

/// Fake of the destination instance: a fixed catalog plus interior-mutable
/// records of every write, so tests can assert on exactly what was created.
pub struct FakeDestination {
    pub tables: Vec<Table>,
    pub fields: HashMap<u64, Vec<Field>>,
    pub metrics: Vec<Metric>,

    /// Reject collection creation (fatal-path tests)
    pub reject_collection_create: bool,
    /// Reject dashboard creation (fatal-path tests)
    pub reject_dashboard_create: bool,

    next_id: Cell<u64>,
    pub table_fetches: Cell<usize>,
    pub field_fetches: RefCell<HashMap<u64, usize>>,

    pub created_collections: RefCell<Vec<Collection>>,
    pub created_dashboards: RefCell<Vec<Dashboard>>,
    pub created_cards: RefCell<Vec<Card>>,
    pub attached_cards: RefCell<Vec<(u64, Option<u64>)>>,
    pub placement_patches: RefCell<Vec<(u64, DashboardCard)>>,
    pub parameter_patches: RefCell<Vec<(u64, Vec<Value>)>>,
    pub field_patches: RefCell<Vec<(u64, Value)>>,
}

impl Default for FakeDestination {
    fn default() -> Self {
        Self {
            tables: Vec::new(),
            fields: HashMap::new(),
            metrics: Vec::new(),
            reject_collection_create: false,
            reject_dashboard_create: false,
            // destination ids start far from any source id so tests catch
            // accidental id passthrough
            next_id: Cell::new(1000),
            table_fetches: Cell::new(0),
            field_fetches: RefCell::new(HashMap::new()),
            created_collections: RefCell::new(Vec::new()),
            created_dashboards: RefCell::new(Vec::new()),
            created_cards: RefCell::new(Vec::new()),
            attached_cards: RefCell::new(Vec::new()),
            placement_patches: RefCell::new(Vec::new()),
            parameter_patches: RefCell::new(Vec::new()),
            field_patches: RefCell::new(Vec::new()),
        }
    }
}

impl FakeDestination {
    fn alloc_id(&self) -> u64 {
        let id = self.next_id.get();
        self.next_id.set(id + 1);
        id
    }
}

impl DestinationApi for FakeDestination {
    fn tables(&self) -> ApiResult<Vec<Table>> {
        self.table_fetches.set(self.table_fetches.get() + 1);
        Ok(self.tables.clone())
    }

    fn table_fields(&self, table_id: u64) -> ApiResult<Vec<Field>> {
        *self
            .field_fetches
            .borrow_mut()
            .entry(table_id)
            .or_insert(0) += 1;
        Ok(self.fields.get(&table_id).cloned().unwrap_or_default())
    }

    fn metrics(&self) -> ApiResult<Vec<Metric>> {
        Ok(self.metrics.clone())
    }

    fn create_collection(&self, name: &str) -> ApiResult<Collection> {
        if self.reject_collection_create {
            return Err(ApiError::Request {
                method: "POST",
                url: "fake://collection".to_string(),
                status: 403,
                body: "forbidden".to_string(),
            });
        }
        let collection = Collection {
            id: self.alloc_id(),
            name: name.to_string(),
            color: Some("#000000".to_string()),
            extra: Map::new(),
        };
        self.created_collections.borrow_mut().push(collection.clone());
        Ok(collection)
    }

    fn create_dashboard(&self, dashboard: &Dashboard) -> ApiResult<u64> {
        if self.reject_dashboard_create {
            return Err(ApiError::Request {
                method: "POST",
                url: "fake://dashboard".to_string(),
                status: 403,
                body: "forbidden".to_string(),
            });
        }
        let mut created = dashboard.clone();
        created.id = self.alloc_id();
        let id = created.id;
        self.created_dashboards.borrow_mut().push(created);
        Ok(id)
    }

    fn update_dashboard_parameters(
        &self,
        dashboard_id: u64,
        parameters: &[Value],
    ) -> ApiResult<()> {
        self.parameter_patches
            .borrow_mut()
            .push((dashboard_id, parameters.to_vec()));
        Ok(())
    }

    fn create_card(&self, card: &Card) -> ApiResult<Card> {
        let mut created = card.clone();
        created.id = self.alloc_id();
        self.created_cards.borrow_mut().push(created.clone());
        Ok(created)
    }

    fn add_dashboard_card(&self, dashboard_id: u64, card_id: Option<u64>) -> ApiResult<u64> {
        self.attached_cards
            .borrow_mut()
            .push((dashboard_id, card_id));
        Ok(self.alloc_id())
    }

    fn update_dashboard_card(&self, dashboard_id: u64, placement: &DashboardCard) -> ApiResult<()> {
        self.placement_patches
            .borrow_mut()
            .push((dashboard_id, placement.clone()));
        Ok(())
    }

    fn update_field(&self, field_id: u64, patch: &Value) -> ApiResult<()> {
        self.field_patches
            .borrow_mut()
            .push((field_id, patch.clone()));
        Ok(())
    }
}
