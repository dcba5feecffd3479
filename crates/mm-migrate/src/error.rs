//! Error types for mm-migrate

use mm_api::ApiError;
use thiserror::Error;

/// Migration errors
///
/// M003-M006 are card-local: the orchestrator records a skip and moves to
/// the next placement. Everything else aborts the run.
#[derive(Error, Debug)]
pub enum MigrateError {
    /// M001: Destination rejected the top-level collection create
    #[error("[M001] Failed to create destination collection {name:?}: {source}")]
    CollectionCreate { name: String, source: ApiError },

    /// M002: Destination rejected a dashboard create
    #[error("[M002] Failed to create destination dashboard {name:?}: {source}")]
    DashboardCreate { name: String, source: ApiError },

    /// M003: No destination table matches the source table's natural key
    #[error("[M003] No table named {schema}.{name} in destination database {database_id}")]
    TableNotFound {
        name: String,
        schema: String,
        database_id: u64,
    },

    /// M004: No destination field with this name on the resolved table
    #[error("[M004] No field named {name:?} in destination table {table_id}")]
    FieldNotFound { name: String, table_id: u64 },

    /// M005: No destination metric with this name on the resolved table
    #[error("[M005] No metric named {name:?} for destination table {table_id}")]
    MetricNotFound { name: String, table_id: u64 },

    /// M006: Source card lacks a field required to reconstruct it
    #[error("[M006] Card {name:?} is missing {missing}")]
    InvalidCard { name: String, missing: String },

    /// M007: Internal serialization failure
    #[error("[M007] Serialization error: {0}")]
    Serialize(#[from] serde_json::Error),

    /// Transport-level failure from either instance
    #[error(transparent)]
    Api(#[from] ApiError),
}

/// Result type alias for MigrateError
pub type MigrateResult<T> = Result<T, MigrateError>;
