//! mm-api - REST client for the analytics server
//!
//! One authenticated `Client` per instance. The migration core is written
//! against the `SourceReader` and `DestinationApi` traits so tests can stand
//! in with in-memory catalogs; `Client` implements both.

pub mod client;
pub mod error;
pub mod traits;

pub use client::Client;
pub use error::{ApiError, ApiResult};
pub use traits::{DestinationApi, SourceReader};
