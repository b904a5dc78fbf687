//! Query configuration
//!
//! The search ceilings the engine relies on are named configuration, not
//! magic numbers buried in the algorithms.

use std::fs;
use std::path::Path;

use serde::Deserialize;

use crate::error::Result;

/// Ceiling for the shortest-path pre-search in "shortest + k" queries.
/// Without it, a query between disconnected nodes would sweep the whole
/// graph looking for a shortest path that does not exist.
pub const DEFAULT_SP_SEARCH_LIMIT: u32 = 25;

/// Default distance limit for queries that do not specify one.
pub const DEFAULT_LIMIT: u32 = 1;

/// Tunable limits for the query engine
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct QueryConfig {
    /// Search ceiling used by shortest+k point-of-interest queries
    pub sp_search_limit: u32,
    /// Distance limit used when a caller does not supply one
    pub default_limit: u32,
}

impl Default for QueryConfig {
    fn default() -> Self {
        QueryConfig {
            sp_search_limit: DEFAULT_SP_SEARCH_LIMIT,
            default_limit: DEFAULT_LIMIT,
        }
    }
}

impl QueryConfig {
    /// Parse configuration from a TOML string
    pub fn from_toml_str(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }

    /// Load configuration from a file
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }
}
