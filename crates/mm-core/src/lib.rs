//! mm-core - Core library for Metamigrate
//!
//! This crate provides the run configuration, the error taxonomy shared by
//! all Metamigrate components, the analytics-server object model
//! (collections, dashboards, cards, tables, fields, metrics), and the
//! tagged query tree the reference resolver walks.

pub mod config;
pub mod error;
pub mod model;
pub mod query;

pub use config::{CollectionRef, Credentials, RunConfig};
pub use error::{CoreError, CoreResult};
pub use model::{
    Card, Collection, Dashboard, DashboardCard, DashboardSummary, DatasetQuery, Field, Metric,
    MetricDefinition, ParameterMapping, Table,
};
pub use query::QueryNode;
