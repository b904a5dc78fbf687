//! Shared graph fixtures for query tests

use std::collections::HashSet;

use crate::graph::{Graph, GraphBuilder, NodeId, NodeKind};

/// Chain of entity nodes linked head to tail
pub(crate) fn entity_chain(keys: &[&str]) -> Graph {
    let mut b = GraphBuilder::new();
    for key in keys {
        b.node(key, NodeKind::Entity);
    }
    for pair in keys.windows(2) {
        b.edge(pair[0], pair[1]).unwrap();
    }
    b.build()
}

/// Resolve keys into a node set, panicking on unknown keys
pub(crate) fn node_set(graph: &Graph, keys: &[&str]) -> HashSet<NodeId> {
    keys.iter()
        .map(|key| {
            graph
                .node_by_key(key)
                .unwrap_or_else(|| panic!("fixture has no node {key}"))
        })
        .collect()
}
