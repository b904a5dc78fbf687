//! Pathreach Core Library
//!
//! Bounded-distance, direction-aware reachability queries over
//! biological pathway graphs: neighborhood, common stream, and
//! paths-between / point-of-interest searches.

pub mod config;
pub mod error;
pub mod graph;
pub mod logging;
pub mod query;
