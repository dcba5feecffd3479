//! Run configuration parsing for the migration config file (JSON)

use crate::error::{CoreError, CoreResult};
use serde::de::{self, Deserializer};
use serde::ser::Serializer;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;

/// Connection credentials for one analytics-server instance
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Credentials {
    /// Login username (email)
    pub username: String,

    /// Login password
    pub password: String,

    /// Server base URL, e.g. `https://analytics.example.com`
    pub base_url: String,

    /// Warehouse database id on this instance
    pub database_id: u64,
}

/// Reference to a collection: a numeric id or the `"root"` sentinel
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CollectionRef {
    /// The implicit top-level collection
    Root,
    /// A concrete collection id
    Id(u64),
}

impl fmt::Display for CollectionRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CollectionRef::Root => write!(f, "root"),
            CollectionRef::Id(id) => write!(f, "{id}"),
        }
    }
}

impl Serialize for CollectionRef {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            CollectionRef::Root => serializer.serialize_str("root"),
            CollectionRef::Id(id) => serializer.serialize_u64(*id),
        }
    }
}

impl<'de> Deserialize<'de> for CollectionRef {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = serde_json::Value::deserialize(deserializer)?;
        match value {
            serde_json::Value::String(s) if s == "root" => Ok(CollectionRef::Root),
            serde_json::Value::Number(n) => n
                .as_u64()
                .map(CollectionRef::Id)
                .ok_or_else(|| de::Error::custom("collection id must be a non-negative integer")),
            other => Err(de::Error::custom(format!(
                "expected a collection id or \"root\", got {other}"
            ))),
        }
    }
}

/// Full migration run configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunConfig {
    /// Instance to read from
    pub source: Credentials,

    /// Instance to create objects on
    pub destination: Credentials,

    /// Collection on the source instance to migrate
    pub source_collection_id: CollectionRef,
}

impl RunConfig {
    /// Load and validate a configuration file
    pub fn load(path: &Path) -> CoreResult<Self> {
        if !path.exists() {
            return Err(CoreError::ConfigNotFound {
                path: path.display().to_string(),
            });
        }

        let raw = std::fs::read_to_string(path)?;
        let mut config: RunConfig =
            serde_json::from_str(&raw).map_err(|e| CoreError::ConfigParse {
                message: e.to_string(),
            })?;

        config.source.normalize();
        config.destination.normalize();
        config.source.validate("source")?;
        config.destination.validate("destination")?;
        Ok(config)
    }
}

impl Credentials {
    fn normalize(&mut self) {
        while self.base_url.ends_with('/') {
            self.base_url.pop();
        }
    }

    fn validate(&self, which: &str) -> CoreResult<()> {
        for (field, value) in [
            ("username", &self.username),
            ("password", &self.password),
            ("base_url", &self.base_url),
        ] {
            if value.is_empty() {
                return Err(CoreError::ConfigInvalid {
                    message: format!("{which}.{field} must not be empty"),
                });
            }
        }
        Ok(())
    }
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
