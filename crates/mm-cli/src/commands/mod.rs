//! Command implementations

pub mod common;
pub mod export;
pub mod flush;
pub mod migrate;
