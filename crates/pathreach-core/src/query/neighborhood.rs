use std::collections::HashSet;

use crate::error::Result;
use crate::graph::{Direction, Graph, GraphObject, NodeId};
use crate::query::bfs::Bfs;

/// Everything within `limit` of a source set, looking upstream and/or
/// downstream. A thin union of one BFS per requested direction; no
/// cycle breaking or pruning is applied.
pub struct NeighborhoodQuery<'a> {
    graph: &'a Graph,
    sources: HashSet<NodeId>,
    upstream: bool,
    downstream: bool,
    limit: u32,
}

impl<'a> NeighborhoodQuery<'a> {
    pub fn new(
        graph: &'a Graph,
        sources: &HashSet<NodeId>,
        upstream: bool,
        downstream: bool,
        limit: u32,
    ) -> Self {
        NeighborhoodQuery {
            graph,
            sources: sources.clone(),
            upstream,
            downstream,
            limit,
        }
    }

    #[tracing::instrument(skip(self), fields(sources = self.sources.len(), upstream = self.upstream, downstream = self.downstream, limit = self.limit))]
    pub fn run(&self) -> Result<HashSet<GraphObject>> {
        let mut result = HashSet::new();

        if self.upstream {
            let bfs = Bfs::new(self.graph, &self.sources, None, Direction::Upstream, self.limit)?;
            result.extend(bfs.run().into_keys());
        }

        if self.downstream {
            let bfs = Bfs::new(
                self.graph,
                &self.sources,
                None,
                Direction::Downstream,
                self.limit,
            )?;
            result.extend(bfs.run().into_keys());
        }

        Ok(result)
    }
}
