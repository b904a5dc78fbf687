use std::collections::{HashMap, HashSet, VecDeque};

use crate::error::{PathreachError, Result};
use crate::graph::{Direction, Graph, GraphObject, NodeId};

/// Discovery colors. A node absent from the map is White.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Color {
    White,
    Gray,
    Black,
}

/// Per-run labeling state shared by the BFS primitive and the local
/// cycle-safety search. Distances and colors are maps keyed by graph
/// object; a missing distance reads as infinite, a missing color as
/// White. The state is discarded when the run ends and never touches
/// the graph itself.
#[derive(Debug, Default)]
pub(crate) struct TraversalState {
    dist: HashMap<GraphObject, u32>,
    color: HashMap<NodeId, Color>,
    pub(crate) queue: VecDeque<NodeId>,
}

impl TraversalState {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn color(&self, node: NodeId) -> Color {
        self.color.get(&node).copied().unwrap_or(Color::White)
    }

    pub(crate) fn set_color(&mut self, node: NodeId, color: Color) {
        self.color.insert(node, color);
    }

    /// Distance label; `None` reads as infinite.
    pub(crate) fn label(&self, go: GraphObject) -> Option<u32> {
        self.dist.get(&go).copied()
    }

    pub(crate) fn set_label(&mut self, go: GraphObject, dist: u32) {
        self.dist.insert(go, dist);
    }

    pub(crate) fn into_labels(self) -> HashMap<GraphObject, u32> {
        self.dist
    }

    /// Label the equivalence closure of `node` in one direction at
    /// `dist`. Equivalence aliasing is free and transitive. The color
    /// map doubles as the visited guard, so a cyclic equivalence
    /// relation terminates.
    pub(crate) fn label_equiv(
        &mut self,
        graph: &Graph,
        node: NodeId,
        upward: bool,
        dist: u32,
        enqueue: bool,
        head: bool,
    ) {
        let equivalents = if upward {
            graph.upper_equivalent(node)
        } else {
            graph.lower_equivalent(node)
        };

        for &equiv in equivalents {
            if self.color(equiv) != Color::White {
                continue;
            }

            self.set_label(GraphObject::Node(equiv), dist);

            if enqueue {
                self.set_color(equiv, Color::Gray);
                if head {
                    self.queue.push_front(equiv);
                } else {
                    self.queue.push_back(equiv);
                }
            } else {
                self.set_color(equiv, Color::Black);
            }

            self.label_equiv(graph, equiv, upward, dist, enqueue, head);
        }
    }
}

/// Whether `node` or anything in its equivalence closure belongs to
/// `set`. Guarded against cycles in the equivalence relation.
pub(crate) fn equivalent_in_set(graph: &Graph, node: NodeId, set: &HashSet<NodeId>) -> bool {
    if set.contains(&node) {
        return true;
    }
    let mut seen = HashSet::new();
    closure_hits(graph, node, true, set, &mut seen)
        || closure_hits(graph, node, false, set, &mut seen)
}

fn closure_hits(
    graph: &Graph,
    node: NodeId,
    upward: bool,
    set: &HashSet<NodeId>,
    seen: &mut HashSet<NodeId>,
) -> bool {
    let equivalents = if upward {
        graph.upper_equivalent(node)
    } else {
        graph.lower_equivalent(node)
    };

    for &equiv in equivalents {
        if !seen.insert(equiv) {
            continue;
        }
        if set.contains(&equiv) || closure_hits(graph, equiv, upward, set, seen) {
            return true;
        }
    }
    false
}

/// Breadth-first labeling from a source set towards one direction.
///
/// Labels every reached node and edge with its minimum breadth distance:
/// the number of entity (breadth) nodes crossed on the way. Event and
/// control nodes are distance-transparent, so they ride at the front of
/// the queue to keep levels resolved in order. Ubiquitous nodes are
/// discovered but never expanded.
pub struct Bfs<'a> {
    graph: &'a Graph,
    sources: HashSet<NodeId>,
    stop: HashSet<NodeId>,
    direction: Direction,
    limit: u32,
    state: TraversalState,
}

impl<'a> Bfs<'a> {
    /// Bothstream is not a valid direction for this primitive and is
    /// rejected here rather than at run time.
    pub fn new(
        graph: &'a Graph,
        sources: &HashSet<NodeId>,
        stop: Option<&HashSet<NodeId>>,
        direction: Direction,
        limit: u32,
    ) -> Result<Self> {
        if direction == Direction::Bothstream {
            return Err(PathreachError::InvalidDirection(direction));
        }

        Ok(Bfs {
            graph,
            sources: sources.clone(),
            stop: stop.cloned().unwrap_or_default(),
            direction,
            limit,
            state: TraversalState::new(),
        })
    }

    /// Run the search and return the distance labels of every reached
    /// node and edge.
    #[tracing::instrument(skip(self), fields(direction = %self.direction, limit = self.limit, sources = self.sources.len()))]
    pub fn run(mut self) -> HashMap<GraphObject, u32> {
        // With a zero limit only the sources and their equivalence
        // closure are labeled; nothing is expanded.
        let expand = self.limit > 0;

        if expand {
            for &source in &self.sources {
                self.state.queue.push_back(source);
            }
        }

        let sources: Vec<NodeId> = self.sources.iter().copied().collect();
        for source in sources {
            self.state.set_label(GraphObject::Node(source), 0);
            self.state.set_color(source, Color::Gray);
            self.state.label_equiv(self.graph, source, true, 0, expand, false);
            self.state.label_equiv(self.graph, source, false, 0, expand, false);
        }

        while let Some(current) = self.state.queue.pop_front() {
            self.process_node(current);
            self.state.set_color(current, Color::Black);
        }

        self.state.into_labels()
    }

    fn process_node(&mut self, current: NodeId) {
        // Ubiquitous nodes terminate traversal through them
        if self.graph.is_ubique(current) {
            return;
        }

        let current_dist = self.state.label(GraphObject::Node(current)).unwrap_or(0);
        // Bothstream was rejected at construction, so the direction picks
        // exactly one edge list
        let downstream = self.direction == Direction::Downstream;
        let edges = if downstream {
            self.graph.downstream(current)
        } else {
            self.graph.upstream(current)
        };

        for &edge in edges {
            // Going downstream the edge carries the current label; going
            // upstream the increment happens at the edge when leaving a
            // breadth node. Either way distance grows only when a breadth
            // node is crossed.
            let edge_dist = if downstream || !self.graph.is_breadth(current) {
                current_dist
            } else {
                current_dist + 1
            };
            self.state.set_label(GraphObject::Edge(edge), edge_dist);

            let neigh = if downstream {
                self.graph.edge_target(edge)
            } else {
                self.graph.edge_source(edge)
            };

            if self.state.color(neigh) != Color::White {
                continue;
            }

            let neigh_dist = if !self.graph.is_breadth(neigh) || !downstream {
                edge_dist
            } else {
                current_dist + 1
            };
            self.state.set_label(GraphObject::Node(neigh), neigh_dist);

            // Stop-set membership is checked through the neighbor's
            // equivalence closure.
            let further = !(!self.stop.is_empty()
                && equivalent_in_set(self.graph, neigh, &self.stop))
                && (!self.graph.is_breadth(neigh) || neigh_dist < self.limit)
                && !self.graph.is_ubique(neigh);

            if further {
                self.state.set_color(neigh, Color::Gray);
                if self.graph.is_breadth(neigh) {
                    self.state.queue.push_back(neigh);
                } else {
                    // Event and control nodes resolve before the next
                    // distance increment
                    self.state.queue.push_front(neigh);
                }
            } else {
                self.state.set_color(neigh, Color::Black);
            }

            let head = !self.graph.is_breadth(neigh);
            self.state
                .label_equiv(self.graph, neigh, true, neigh_dist, further, head);
            self.state
                .label_equiv(self.graph, neigh, false, neigh_dist, further, head);
        }
    }
}
