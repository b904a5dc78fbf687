//! Graph object model
//!
//! An arena-style graph over which all queries run:
//! - index-based nodes and edges with key interning
//! - two-phase construction (wrap nodes, then wire edges)
//! - a provider trait for pluggable domain sources

pub mod model;
pub mod source;
pub mod types;

pub use model::{Graph, GraphBuilder};
pub use source::GraphSource;
pub use types::{Direction, EdgeId, GraphObject, NodeId, NodeKind, Sign};
