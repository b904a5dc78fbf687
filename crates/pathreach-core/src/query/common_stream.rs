use std::collections::{HashMap, HashSet};

use crate::error::Result;
use crate::graph::{Direction, Graph, GraphObject, NodeId};
use crate::query::bfs::Bfs;

/// What is commonly downstream (or upstream) of several query entities.
///
/// Each source group holds the alternative states of one logical entity.
/// Every group gets its own BFS so its internal equivalence handling
/// cannot pollute the distances of the others; an object is in the
/// common stream when every group reached it within the limit.
pub struct CommonStreamQuery<'a> {
    graph: &'a Graph,
    groups: Vec<HashSet<NodeId>>,
    direction: Direction,
    limit: u32,
}

impl<'a> CommonStreamQuery<'a> {
    pub fn new(
        graph: &'a Graph,
        groups: Vec<HashSet<NodeId>>,
        direction: Direction,
        limit: u32,
    ) -> Result<Self> {
        if direction == Direction::Bothstream {
            return Err(crate::error::PathreachError::InvalidDirection(direction));
        }
        Ok(CommonStreamQuery {
            graph,
            groups,
            direction,
            limit,
        })
    }

    /// Treat each selected node as its own singleton group.
    pub fn from_nodes(
        graph: &'a Graph,
        sources: &HashSet<NodeId>,
        direction: Direction,
        limit: u32,
    ) -> Result<Self> {
        let groups = sources
            .iter()
            .map(|&node| HashSet::from([node]))
            .collect();
        Self::new(graph, groups, direction, limit)
    }

    #[tracing::instrument(skip(self), fields(groups = self.groups.len(), direction = %self.direction, limit = self.limit))]
    pub fn run(&self) -> Result<HashSet<GraphObject>> {
        let mut reached_count: HashMap<GraphObject, usize> = HashMap::new();

        for group in &self.groups {
            let labels = Bfs::new(self.graph, group, None, self.direction, self.limit)?.run();
            for go in labels.into_keys() {
                *reached_count.entry(go).or_insert(0) += 1;
            }
        }

        let needed = self.groups.len();
        Ok(reached_count
            .into_iter()
            .filter(|&(_, count)| count == needed && needed > 0)
            .map(|(go, _)| go)
            .collect())
    }

    /// The node subset of the common stream.
    pub fn run_nodes(&self) -> Result<HashSet<NodeId>> {
        Ok(self.run()?.into_iter().filter_map(GraphObject::as_node).collect())
    }
}
