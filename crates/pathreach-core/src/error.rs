//! Error types for pathreach
//!
//! Invalid query configuration (a bothstream BFS, an edge to an unknown
//! key) is an error. Empty source sets, zero limits, and queries with no
//! finite shortest path are valid inputs with empty results, not errors.

use thiserror::Error;

use crate::graph::types::Direction;

/// Errors that can occur while building a graph or configuring a query
#[derive(Error, Debug)]
pub enum PathreachError {
    #[error("invalid direction for traversal: {0} (expected: upstream or downstream)")]
    InvalidDirection(Direction),

    #[error("unknown direction '{0}' (expected: upstream, downstream, or bothstream)")]
    UnknownDirection(String),

    #[error("node not found: {0}")]
    NodeNotFound(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML error: {0}")]
    Toml(#[from] toml::de::Error),
}

impl PathreachError {
    /// Get the error type identifier
    fn error_type(&self) -> &'static str {
        match self {
            PathreachError::InvalidDirection(_) => "invalid_direction",
            PathreachError::UnknownDirection(_) => "unknown_direction",
            PathreachError::NodeNotFound(_) => "node_not_found",
            PathreachError::Io(_) => "io_error",
            PathreachError::Toml(_) => "toml_error",
        }
    }

    /// Convert error to JSON representation for structured error output
    pub fn to_json(&self) -> serde_json::Value {
        serde_json::json!({
            "error": {
                "type": self.error_type(),
                "message": self.to_string(),
            }
        })
    }
}

/// Result type alias for pathreach operations
pub type Result<T> = std::result::Result<T, PathreachError>;
