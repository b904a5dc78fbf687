use std::collections::{HashSet, VecDeque};

use crate::graph::{Graph, GraphObject, NodeId};

/// Removes dangling interior nodes from a result set.
///
/// A retained node outside the source/target set is dangling when it is
/// not on any through-path: it lacks both a retained incoming and a
/// retained outgoing edge, and lacks a retained equivalent paired with
/// at least one retained incident edge. Removing a node drops its
/// retained incident edges, which can strand its neighbors, so every
/// neighbor of a removal is rechecked until a fixed point.
pub struct Prune<'a> {
    graph: &'a Graph,
    result: &'a mut HashSet<GraphObject>,
    st: &'a HashSet<NodeId>,
}

impl<'a> Prune<'a> {
    pub fn new(
        graph: &'a Graph,
        result: &'a mut HashSet<GraphObject>,
        st: &'a HashSet<NodeId>,
    ) -> Self {
        Prune { graph, result, st }
    }

    #[tracing::instrument(skip(self), fields(result = self.result.len()))]
    pub fn run(&mut self) {
        let mut worklist: VecDeque<NodeId> = self
            .result
            .iter()
            .filter_map(|&go| go.as_node())
            .collect();

        while let Some(node) = worklist.pop_front() {
            if !self.is_dangling(node) {
                continue;
            }

            self.result.remove(&GraphObject::Node(node));
            tracing::trace!(node = self.graph.key_of(GraphObject::Node(node)), "pruned");

            for &edge in self.graph.upstream(node) {
                self.result.remove(&GraphObject::Edge(edge));
                worklist.push_back(self.graph.edge_source(edge));
            }
            for &edge in self.graph.downstream(node) {
                self.result.remove(&GraphObject::Edge(edge));
                worklist.push_back(self.graph.edge_target(edge));
            }
            for &equiv in self.graph.upper_equivalent(node) {
                worklist.push_back(equiv);
            }
            for &equiv in self.graph.lower_equivalent(node) {
                worklist.push_back(equiv);
            }
        }
    }

    fn is_dangling(&self, node: NodeId) -> bool {
        if !self.result.contains(&GraphObject::Node(node)) {
            return false;
        }
        if self.st.contains(&node) {
            return false;
        }

        let has_incoming = self
            .graph
            .upstream(node)
            .iter()
            .any(|&e| self.result.contains(&GraphObject::Edge(e)));
        let has_outgoing = self
            .graph
            .downstream(node)
            .iter()
            .any(|&e| self.result.contains(&GraphObject::Edge(e)));

        if has_incoming && has_outgoing {
            return false;
        }

        let has_parent = self
            .graph
            .upper_equivalent(node)
            .iter()
            .any(|&n| self.result.contains(&GraphObject::Node(n)));
        let has_child = self
            .graph
            .lower_equivalent(node)
            .iter()
            .any(|&n| self.result.contains(&GraphObject::Node(n)));

        !((has_parent || has_child) && (has_incoming || has_outgoing))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::{GraphBuilder, NodeKind};
    use crate::query::testutil::node_set;

    #[test]
    fn test_endpoints_are_never_pruned() {
        let mut b = GraphBuilder::new();
        b.node("s", NodeKind::Entity);
        b.node("t", NodeKind::Entity);
        let g = b.build();

        let mut result = HashSet::from([
            GraphObject::Node(g.node_by_key("s").unwrap()),
            GraphObject::Node(g.node_by_key("t").unwrap()),
        ]);
        let st = node_set(&g, &["s", "t"]);
        Prune::new(&g, &mut result, &st).run();

        assert_eq!(result.len(), 2);
    }

    #[test]
    fn test_through_node_survives() {
        let mut b = GraphBuilder::new();
        for key in ["s", "m", "t"] {
            b.node(key, NodeKind::Entity);
        }
        let e1 = b.edge("s", "m").unwrap();
        let e2 = b.edge("m", "t").unwrap();
        let g = b.build();

        let mut result = HashSet::from([
            GraphObject::Node(g.node_by_key("s").unwrap()),
            GraphObject::Node(g.node_by_key("m").unwrap()),
            GraphObject::Node(g.node_by_key("t").unwrap()),
            GraphObject::Edge(e1),
            GraphObject::Edge(e2),
        ]);
        let st = node_set(&g, &["s", "t"]);
        Prune::new(&g, &mut result, &st).run();

        assert_eq!(result.len(), 5);
    }

    #[test]
    fn test_dead_end_cascade() {
        // s -> a -> b where b goes nowhere: removing b strands a
        let mut b = GraphBuilder::new();
        for key in ["s", "t", "a", "b"] {
            b.node(key, NodeKind::Entity);
        }
        let e_sa = b.edge("s", "a").unwrap();
        let e_ab = b.edge("a", "b").unwrap();
        let g = b.build();

        let mut result = HashSet::from([
            GraphObject::Node(g.node_by_key("s").unwrap()),
            GraphObject::Node(g.node_by_key("t").unwrap()),
            GraphObject::Node(g.node_by_key("a").unwrap()),
            GraphObject::Node(g.node_by_key("b").unwrap()),
            GraphObject::Edge(e_sa),
            GraphObject::Edge(e_ab),
        ]);
        let st = node_set(&g, &["s", "t"]);
        Prune::new(&g, &mut result, &st).run();

        let expected: HashSet<GraphObject> = HashSet::from([
            GraphObject::Node(g.node_by_key("s").unwrap()),
            GraphObject::Node(g.node_by_key("t").unwrap()),
        ]);
        assert_eq!(result, expected);
    }

    #[test]
    fn test_cycle_remnant_is_fully_removed() {
        // After cycle breaking cut b -> a, the stranded pair and its
        // remaining edge must disappear
        let mut b = GraphBuilder::new();
        for key in ["s", "t", "a", "b"] {
            b.node(key, NodeKind::Entity);
        }
        let e_ab = b.edge("a", "b").unwrap();
        b.edge("b", "a").unwrap();
        let g = b.build();

        let mut result = HashSet::from([
            GraphObject::Node(g.node_by_key("s").unwrap()),
            GraphObject::Node(g.node_by_key("t").unwrap()),
            GraphObject::Node(g.node_by_key("a").unwrap()),
            GraphObject::Node(g.node_by_key("b").unwrap()),
            GraphObject::Edge(e_ab),
        ]);
        let st = node_set(&g, &["s", "t"]);
        Prune::new(&g, &mut result, &st).run();

        assert!(!result.contains(&GraphObject::Node(g.node_by_key("a").unwrap())));
        assert!(!result.contains(&GraphObject::Node(g.node_by_key("b").unwrap())));
        assert!(!result.contains(&GraphObject::Edge(e_ab)));
    }

    #[test]
    fn test_equivalent_with_edge_survives() {
        // m has no outgoing edge but aliases a retained parent and has a
        // retained incoming edge, so it stays
        let mut b = GraphBuilder::new();
        for key in ["s", "m", "p"] {
            b.node(key, NodeKind::Entity);
        }
        let e_sm = b.edge("s", "m").unwrap();
        let e_ps = b.edge("p", "s").unwrap();
        b.equivalence("p", "m").unwrap();
        let g = b.build();

        let mut result = HashSet::from([
            GraphObject::Node(g.node_by_key("s").unwrap()),
            GraphObject::Node(g.node_by_key("m").unwrap()),
            GraphObject::Node(g.node_by_key("p").unwrap()),
            GraphObject::Edge(e_sm),
            GraphObject::Edge(e_ps),
        ]);
        let st = node_set(&g, &["s"]);
        Prune::new(&g, &mut result, &st).run();

        assert!(result.contains(&GraphObject::Node(g.node_by_key("m").unwrap())));
    }

    #[test]
    fn test_prune_is_idempotent() {
        let mut b = GraphBuilder::new();
        for key in ["s", "t", "a", "b", "c"] {
            b.node(key, NodeKind::Entity);
        }
        let e1 = b.edge("s", "a").unwrap();
        let e2 = b.edge("a", "t").unwrap();
        b.edge("a", "b").unwrap();
        let e4 = b.edge("b", "c").unwrap();
        let g = b.build();

        let mut result = HashSet::from([
            GraphObject::Node(g.node_by_key("s").unwrap()),
            GraphObject::Node(g.node_by_key("t").unwrap()),
            GraphObject::Node(g.node_by_key("a").unwrap()),
            GraphObject::Node(g.node_by_key("b").unwrap()),
            GraphObject::Node(g.node_by_key("c").unwrap()),
            GraphObject::Edge(e1),
            GraphObject::Edge(e2),
            GraphObject::Edge(e4),
        ]);
        let st = node_set(&g, &["s", "t"]);

        Prune::new(&g, &mut result, &st).run();
        let after_first = result.clone();
        Prune::new(&g, &mut result, &st).run();

        assert_eq!(result, after_first);
        // The b -> c spur is gone, the s -> a -> t path stays
        assert!(result.contains(&GraphObject::Node(g.node_by_key("a").unwrap())));
        assert!(!result.contains(&GraphObject::Node(g.node_by_key("b").unwrap())));
        assert!(!result.contains(&GraphObject::Node(g.node_by_key("c").unwrap())));
    }
}
