use std::collections::{HashMap, HashSet};

use crate::error::Result;
use crate::graph::{Direction, Graph, GraphObject, NodeId};
use crate::query::bfs::Bfs;
use crate::query::cycle_breaker::CycleBreaker;
use crate::query::prune::Prune;

/// Paths between the members of several entity groups.
///
/// Each group gets a forward and a reverse search of its own. An object
/// belongs to the result when some path of admissible length runs from
/// one group to a different group through it; paths from a group back to
/// itself never qualify. Cycle breaking and pruning finish the result
/// the same way a paths-of-interest query does.
pub struct PathsBetweenQuery<'a> {
    graph: &'a Graph,
    groups: Vec<HashSet<NodeId>>,
    limit: u32,
}

impl<'a> PathsBetweenQuery<'a> {
    pub fn new(graph: &'a Graph, groups: Vec<HashSet<NodeId>>, limit: u32) -> Self {
        PathsBetweenQuery {
            graph,
            groups,
            limit,
        }
    }

    /// Treat each selected node as its own singleton group.
    pub fn from_nodes(graph: &'a Graph, sources: &HashSet<NodeId>, limit: u32) -> Self {
        let groups = sources
            .iter()
            .map(|&node| HashSet::from([node]))
            .collect();
        Self::new(graph, groups, limit)
    }

    #[tracing::instrument(skip(self), fields(groups = self.groups.len(), limit = self.limit))]
    pub fn run(&self) -> Result<HashSet<GraphObject>> {
        // Per object, the best forward and reverse distance from each group
        let mut fwd: HashMap<GraphObject, Vec<(usize, u32)>> = HashMap::new();
        let mut rev: HashMap<GraphObject, Vec<(usize, u32)>> = HashMap::new();

        for (idx, group) in self.groups.iter().enumerate() {
            let labels = Bfs::new(self.graph, group, None, Direction::Downstream, self.limit)?.run();
            for (go, dist) in labels {
                fwd.entry(go).or_default().push((idx, dist));
            }
            let labels = Bfs::new(self.graph, group, None, Direction::Upstream, self.limit)?.run();
            for (go, dist) in labels {
                rev.entry(go).or_default().push((idx, dist));
            }
        }

        let mut result: HashSet<GraphObject> = fwd
            .iter()
            .filter(|&(go, from)| {
                rev.get(go).is_some_and(|to| self.on_cross_path(from, to))
            })
            .map(|(&go, _)| go)
            .collect();

        let st: HashSet<NodeId> = self.groups.iter().flatten().copied().collect();
        CycleBreaker::new(self.graph, &mut result, &st, self.limit).run();
        Prune::new(self.graph, &mut result, &st).run();

        Ok(result)
    }

    /// Some path through the object connects two distinct groups within
    /// the limit.
    fn on_cross_path(&self, from: &[(usize, u32)], to: &[(usize, u32)]) -> bool {
        from.iter().any(|&(g1, d1)| {
            to.iter()
                .any(|&(g2, d2)| g1 != g2 && d1 + d2 <= self.limit)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::{GraphBuilder, NodeKind};
    use crate::query::testutil::{entity_chain, node_set};

    #[test]
    fn test_path_between_two_nodes() {
        let g = entity_chain(&["a", "m", "b"]);
        let sources = node_set(&g, &["a", "b"]);

        let result = PathsBetweenQuery::from_nodes(&g, &sources, 2)
            .run()
            .unwrap();

        let a = g.node_by_key("a").unwrap();
        let m = g.node_by_key("m").unwrap();
        let bn = g.node_by_key("b").unwrap();
        let expected = HashSet::from([
            GraphObject::Node(a),
            GraphObject::Node(m),
            GraphObject::Node(bn),
            GraphObject::Edge(g.downstream(a)[0]),
            GraphObject::Edge(g.downstream(m)[0]),
        ]);
        assert_eq!(result, expected);
    }

    #[test]
    fn test_single_group_has_no_paths() {
        // A path from a group back to itself never qualifies, even
        // through a real cycle
        let mut b = GraphBuilder::new();
        b.node("a", NodeKind::Entity);
        b.node("x", NodeKind::Entity);
        b.edge("a", "x").unwrap();
        b.edge("x", "a").unwrap();
        let g = b.build();

        let result = PathsBetweenQuery::from_nodes(&g, &node_set(&g, &["a"]), 4)
            .run()
            .unwrap();
        assert!(result.is_empty());
    }

    #[test]
    fn test_direction_of_connection_does_not_matter() {
        // b is downstream of a; with both as singleton groups the chain
        // is found regardless of which one is listed first
        let g = entity_chain(&["a", "b"]);
        let result = PathsBetweenQuery::new(
            &g,
            vec![node_set(&g, &["b"]), node_set(&g, &["a"])],
            1,
        )
        .run()
        .unwrap();

        assert!(result.contains(&GraphObject::Node(g.node_by_key("a").unwrap())));
        assert!(result.contains(&GraphObject::Node(g.node_by_key("b").unwrap())));
    }

    #[test]
    fn test_members_of_one_group_do_not_pair() {
        // a1 -> m -> a2 within one group, a2 -> t towards the other: at
        // limit 2 only the a2..t stretch qualifies, the intra-group
        // stretch through m does not
        let mut b = GraphBuilder::new();
        for key in ["a1", "a2", "m", "t"] {
            b.node(key, NodeKind::Entity);
        }
        b.edge("a1", "m").unwrap();
        b.edge("m", "a2").unwrap();
        let e_at = b.edge("a2", "t").unwrap();
        let g = b.build();

        let result = PathsBetweenQuery::new(
            &g,
            vec![node_set(&g, &["a1", "a2"]), node_set(&g, &["t"])],
            2,
        )
        .run()
        .unwrap();

        assert!(!result.contains(&GraphObject::Node(g.node_by_key("m").unwrap())));
        assert!(result.contains(&GraphObject::Edge(e_at)));
    }

    #[test]
    fn test_limit_cuts_long_connections() {
        let g = entity_chain(&["a", "m1", "m2", "b"]);
        let sources = node_set(&g, &["a", "b"]);

        let within = PathsBetweenQuery::from_nodes(&g, &sources, 3)
            .run()
            .unwrap();
        let beyond = PathsBetweenQuery::from_nodes(&g, &sources, 2)
            .run()
            .unwrap();

        assert!(within.contains(&GraphObject::Node(g.node_by_key("m1").unwrap())));
        assert!(beyond.is_empty());
    }
}
