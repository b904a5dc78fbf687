//! Reachability queries
//!
//! All queries compose the BFS primitive:
//! - neighborhood: union of an upstream and a downstream search
//! - common stream: per-group searches intersected by reached counts
//! - point-of-interest / paths-between: dual-direction searches with a
//!   distance-sum filter, finished by cycle breaking and pruning

pub mod bfs;
pub mod common_stream;
pub mod cycle_breaker;
pub mod executer;
pub mod neighborhood;
pub mod paths_between;
pub mod poi;
pub mod prune;

#[cfg(test)]
pub(crate) mod testutil;

pub use bfs::Bfs;
pub use common_stream::CommonStreamQuery;
pub use cycle_breaker::CycleBreaker;
pub use executer::QueryExecuter;
pub use neighborhood::NeighborhoodQuery;
pub use paths_between::PathsBetweenQuery;
pub use poi::{LimitType, PoiQuery};
pub use prune::Prune;
