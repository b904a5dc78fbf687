use std::collections::{HashMap, HashSet};

use crate::config::QueryConfig;
use crate::error::Result;
use crate::graph::{Direction, Graph, GraphObject, NodeId};
use crate::query::bfs::Bfs;
use crate::query::cycle_breaker::CycleBreaker;
use crate::query::prune::Prune;

/// How the distance limit of a paths query is interpreted
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LimitType {
    /// The limit is the stop distance itself
    Normal,
    /// The limit is added to the length of the shortest path found
    ShortestPlusK,
}

/// Paths-of-interest: everything lying on an admissible path from a
/// source set to a target set.
///
/// Runs a forward (downstream) search from the sources and a reverse
/// (upstream) search from the targets, keeps the objects whose two
/// labels sum within the limit, then cuts unproductive cycles and prunes
/// dangling scaffolding. In strict mode paths may not pass through
/// interior members of the opposite endpoint set.
pub struct PoiQuery<'a> {
    graph: &'a Graph,
    sources: HashSet<NodeId>,
    targets: HashSet<NodeId>,
    limit_type: LimitType,
    limit: u32,
    strict: bool,
    sp_search_limit: u32,
}

impl<'a> PoiQuery<'a> {
    pub fn new(
        graph: &'a Graph,
        sources: &HashSet<NodeId>,
        targets: &HashSet<NodeId>,
        limit_type: LimitType,
        limit: u32,
        strict: bool,
    ) -> Self {
        PoiQuery {
            graph,
            sources: sources.clone(),
            targets: targets.clone(),
            limit_type,
            limit,
            strict,
            sp_search_limit: QueryConfig::default().sp_search_limit,
        }
    }

    /// Use the search ceilings from `config` instead of the defaults.
    pub fn with_config(mut self, config: &QueryConfig) -> Self {
        self.sp_search_limit = config.sp_search_limit;
        self
    }

    #[tracing::instrument(skip(self), fields(sources = self.sources.len(), targets = self.targets.len(), limit = self.limit, limit_type = ?self.limit_type, strict = self.strict))]
    pub fn run(&self) -> Result<HashSet<GraphObject>> {
        let search_limit = match self.limit_type {
            LimitType::Normal => self.limit,
            LimitType::ShortestPlusK => self.sp_search_limit,
        };

        let fwd_stop = self.strict.then_some(&self.targets);
        let rev_stop = self.strict.then_some(&self.sources);

        let fwd = Bfs::new(
            self.graph,
            &self.sources,
            fwd_stop,
            Direction::Downstream,
            search_limit,
        )?
        .run();
        let rev = Bfs::new(
            self.graph,
            &self.targets,
            rev_stop,
            Direction::Upstream,
            search_limit,
        )?
        .run();

        let limit = match self.limit_type {
            LimitType::Normal => self.limit,
            LimitType::ShortestPlusK => {
                // The minimum label sum over objects seen from both ends
                // is the shortest path length
                match shortest_sum(&fwd, &rev) {
                    Some(shortest) => shortest + self.limit,
                    // No finite shortest path: empty result, not an error
                    None => return Ok(HashSet::new()),
                }
            }
        };

        let mut result: HashSet<GraphObject> = fwd
            .iter()
            .filter(|&(go, &f)| rev.get(go).is_some_and(|&r| f + r <= limit))
            .map(|(&go, _)| go)
            .collect();

        let st: HashSet<NodeId> = self.sources.union(&self.targets).copied().collect();
        CycleBreaker::new(self.graph, &mut result, &st, limit).run();
        Prune::new(self.graph, &mut result, &st).run();

        Ok(result)
    }
}

fn shortest_sum(
    fwd: &HashMap<GraphObject, u32>,
    rev: &HashMap<GraphObject, u32>,
) -> Option<u32> {
    fwd.iter()
        .filter_map(|(go, &f)| rev.get(go).map(|&r| f + r))
        .min()
}
