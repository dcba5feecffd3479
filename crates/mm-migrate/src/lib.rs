//! mm-migrate - Migration core for Metamigrate
//!
//! Three pieces drive a run: the `CatalogCache` answers name-based lookups
//! against the destination catalog, the resolver rewrites every field/metric
//! reference inside a query body to destination ids, and the `Migrator`
//! sequences collection → dashboard → card → placement creation while
//! tracking per-card skips in a `RunReport`.

pub mod catalog;
pub mod error;
pub mod orchestrator;
pub mod report;
pub mod resolver;
pub mod testing;

pub use catalog::CatalogCache;
pub use error::{MigrateError, MigrateResult};
pub use orchestrator::Migrator;
pub use report::{RunReport, SkippedCard};
pub use resolver::{resolve_query, ResolveContext};
