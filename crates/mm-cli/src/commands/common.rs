//! Shared helpers for command implementations

use anyhow::{Context, Result};
use mm_api::Client;
use mm_core::config::{Credentials, RunConfig};
use std::path::Path;

/// Load and validate the run configuration file
pub fn load_config(path: &Path) -> Result<RunConfig> {
    RunConfig::load(path).context("Failed to load configuration")
}

/// Open an authenticated session against one instance
pub fn connect(credentials: &Credentials) -> Result<Client> {
    Client::connect(credentials)
        .with_context(|| format!("Failed to authenticate against {}", credentials.base_url))
}
