//! Analytics-server object model
//!
//! These types mirror the server's JSON payloads for the objects the
//! migration touches. Only the fields the migration reads or rewrites are
//! typed; everything else the server sends rides along in the flattened
//! `extra` map so created objects round-trip faithfully.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// A folder-like grouping of dashboards and cards
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Collection {
    pub id: u64,
    pub name: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Dashboard entry as listed under a collection's items
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DashboardSummary {
    pub id: u64,
    pub name: String,
}

/// A named canvas of laid-out card placements and shared parameters
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Dashboard {
    pub id: u64,
    pub name: String,

    #[serde(default)]
    pub description: Option<String>,

    #[serde(default)]
    pub collection_id: Option<u64>,

    /// Dashboard-level filter definitions
    #[serde(default)]
    pub parameters: Vec<Value>,

    /// Ordered card placements
    #[serde(default)]
    pub ordered_cards: Vec<DashboardCard>,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// A placement record on a dashboard
///
/// `card_id` is `None` for text/markdown tiles, which carry no saved query.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DashboardCard {
    pub id: u64,

    #[serde(default)]
    pub card_id: Option<u64>,

    pub row: i64,
    pub col: i64,

    #[serde(rename = "sizeX")]
    pub size_x: i64,
    #[serde(rename = "sizeY")]
    pub size_y: i64,

    #[serde(default)]
    pub series: Value,

    #[serde(default)]
    pub visualization_settings: Map<String, Value>,

    /// Bindings from dashboard parameters to targets inside the card's query
    #[serde(default)]
    pub parameter_mappings: Vec<ParameterMapping>,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Binds one dashboard parameter to a target expression in a card's query
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ParameterMapping {
    pub parameter_id: String,

    #[serde(default)]
    pub card_id: Option<u64>,

    /// Target expression; may embed field/metric references
    pub target: Value,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// A saved, parameterizable query plus its visualization configuration
///
/// `name`, `display`, and `dataset_query` are optional here because source
/// instances do serve partial cards; the orchestrator skips those rather
/// than attempting creation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Card {
    pub id: u64,

    #[serde(default)]
    pub name: Option<String>,

    #[serde(default)]
    pub display: Option<String>,

    #[serde(default)]
    pub description: Option<String>,

    #[serde(default)]
    pub collection_id: Option<u64>,

    #[serde(default)]
    pub table_id: Option<u64>,

    #[serde(default)]
    pub dataset_query: Option<DatasetQuery>,

    #[serde(default)]
    pub visualization_settings: Map<String, Value>,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Card {
    /// Mandatory fields a card must carry before it can be recreated.
    /// Returns the names of the ones that are missing.
    pub fn missing_parts(&self) -> Vec<&'static str> {
        let mut missing = Vec::new();
        if self.name.is_none() {
            missing.push("name");
        }
        if self.dataset_query.is_none() {
            missing.push("dataset_query");
        }
        if self.display.is_none() {
            missing.push("display");
        }
        missing
    }

    /// The source API serves both `null` and `""` for absent descriptions;
    /// collapse the empty string to `None` so one contract reaches the
    /// destination.
    pub fn normalize_description(&mut self) {
        if self.description.as_deref() == Some("") {
            self.description = None;
        }
    }

    /// Card name, or a placeholder for partial cards in log output
    pub fn display_name(&self) -> &str {
        self.name.as_deref().unwrap_or("(unnamed card)")
    }
}

/// A card's saved query: a type tag, a target database, and the query body
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatasetQuery {
    #[serde(rename = "type")]
    pub query_type: String,

    pub database: u64,

    /// Structured query body; absent for native-SQL queries
    #[serde(default)]
    pub query: Value,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Catalog table
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Table {
    pub id: u64,
    pub name: String,

    #[serde(default)]
    pub schema: String,

    pub db_id: u64,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Catalog field
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Field {
    pub id: u64,
    pub name: String,
    pub table_id: u64,

    #[serde(default)]
    pub fk_target_field_id: Option<u64>,

    #[serde(default)]
    pub semantic_type: Option<String>,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Catalog metric
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Metric {
    pub id: u64,
    pub name: String,

    pub definition: MetricDefinition,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// A metric's definition; the migration only needs its owning table
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MetricDefinition {
    #[serde(rename = "source-table")]
    pub source_table: u64,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[cfg(test)]
#[path = "model_test.rs"]
mod tests;
