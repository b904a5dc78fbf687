use std::collections::HashSet;

use crate::graph::{EdgeId, Graph, GraphObject, NodeId};
use crate::query::bfs::{equivalent_in_set, Color, TraversalState};

/// Removes result edges that only close unproductive cycles.
///
/// A downstream edge `u -> v` survives when a bounded local search from
/// `v` (with `u` pre-painted so the edge cannot be immediately retraced),
/// walking retained result edges in either direction, reaches a source or
/// target node, or the distance limit, before its queue drains. Edges
/// failing the check loop back without ever progressing towards the
/// query endpoints and are cut.
pub struct CycleBreaker<'a> {
    graph: &'a Graph,
    result: &'a mut HashSet<GraphObject>,
    st: &'a HashSet<NodeId>,
    limit: u32,
}

impl<'a> CycleBreaker<'a> {
    pub fn new(
        graph: &'a Graph,
        result: &'a mut HashSet<GraphObject>,
        st: &'a HashSet<NodeId>,
        limit: u32,
    ) -> Self {
        CycleBreaker {
            graph,
            result,
            st,
            limit,
        }
    }

    #[tracing::instrument(skip(self), fields(result = self.result.len(), limit = self.limit))]
    pub fn run(&mut self) {
        let nodes: Vec<NodeId> = self
            .result
            .iter()
            .filter_map(|&go| go.as_node())
            .collect();

        for node in nodes {
            for &edge in self.graph.downstream(node) {
                if self.result.contains(&GraphObject::Edge(edge)) && !self.is_safe(node, edge) {
                    self.result.remove(&GraphObject::Edge(edge));
                    tracing::debug!(
                        edge = self.graph.key_of(GraphObject::Edge(edge)),
                        "removed cycle-closing edge"
                    );
                }
            }
        }
    }

    fn is_safe(&self, node: NodeId, edge: EdgeId) -> bool {
        let mut state = TraversalState::new();

        state.set_color(node, Color::Black);
        state.set_label(GraphObject::Node(node), 0);
        state.set_label(GraphObject::Edge(edge), 0);
        state.label_equiv(self.graph, node, true, 0, false, false);
        state.label_equiv(self.graph, node, false, 0, false, false);

        let neigh = self.graph.edge_target(edge);

        // Target already aliases the edge source: an immediate cycle
        if state.color(neigh) != Color::White {
            return false;
        }

        state.set_color(neigh, Color::Gray);
        state.set_label(GraphObject::Node(neigh), 0);
        state.queue.push_back(neigh);
        state.label_equiv(self.graph, neigh, true, 0, true, false);
        state.label_equiv(self.graph, neigh, false, 0, true, false);

        while let Some(current) = state.queue.pop_front() {
            if self.st.contains(&current) {
                return true;
            }

            if self.expand(&mut state, current) {
                return true;
            }

            state.set_color(current, Color::Black);
        }

        false
    }

    /// Expand one node over retained edges in both directions. Returns
    /// true as soon as the search is provably safe.
    fn expand(&self, state: &mut TraversalState, current: NodeId) -> bool {
        self.process_edges(state, current, self.graph.downstream(current))
            || self.process_edges(state, current, self.graph.upstream(current))
    }

    fn process_edges(&self, state: &mut TraversalState, current: NodeId, edges: &[EdgeId]) -> bool {
        for &edge in edges {
            if !self.result.contains(&GraphObject::Edge(edge)) {
                continue;
            }

            let current_dist = state.label(GraphObject::Node(current)).unwrap_or(0);
            state.set_label(GraphObject::Edge(edge), current_dist);

            let neigh = if self.graph.edge_source(edge) == current {
                self.graph.edge_target(edge)
            } else {
                self.graph.edge_source(edge)
            };

            if state.color(neigh) != Color::White {
                continue;
            }

            let neigh_dist = if self.graph.is_breadth(neigh) {
                current_dist + 1
            } else {
                current_dist
            };
            state.set_label(GraphObject::Node(neigh), neigh_dist);

            // Reaching the limit, or an endpoint through equivalence,
            // proves the edge safe
            if neigh_dist == self.limit || equivalent_in_set(self.graph, neigh, self.st) {
                return true;
            }

            state.set_color(neigh, Color::Gray);
            let head = !self.graph.is_breadth(neigh);
            if head {
                state.queue.push_front(neigh);
            } else {
                state.queue.push_back(neigh);
            }

            state.label_equiv(self.graph, neigh, true, neigh_dist, true, head);
            state.label_equiv(self.graph, neigh, false, neigh_dist, true, head);
        }
        false
    }
}
