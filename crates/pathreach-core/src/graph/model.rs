use std::collections::{HashMap, HashSet};

use crate::error::{PathreachError, Result};
use crate::graph::types::{EdgeId, GraphObject, NodeId, NodeKind, Sign};

/// Node storage: identity, kind flags, and index-based adjacency.
#[derive(Debug)]
struct NodeData {
    key: String,
    kind: NodeKind,
    ubique: bool,
    sign: Sign,
    upstream: Vec<EdgeId>,
    downstream: Vec<EdgeId>,
    upper_equivalent: Vec<NodeId>,
    lower_equivalent: Vec<NodeId>,
}

/// Edge storage: a directed link owned by the graph.
#[derive(Debug)]
struct EdgeData {
    source: NodeId,
    target: NodeId,
    key: String,
}

/// An immutable pathway graph.
///
/// The graph is an arena: it owns all nodes and edges, which reference
/// each other by index. It is built once through a [`GraphBuilder`] and
/// never mutated afterwards, so any number of queries may borrow it
/// concurrently. Per-query bookkeeping lives in the queries themselves.
#[derive(Debug)]
pub struct Graph {
    nodes: Vec<NodeData>,
    edges: Vec<EdgeData>,
    by_key: HashMap<String, NodeId>,
}

impl Graph {
    pub fn builder() -> GraphBuilder {
        GraphBuilder::new()
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    /// Look up the node wrapping the domain object with this key.
    pub fn node_by_key(&self, key: &str) -> Option<NodeId> {
        self.by_key.get(key).copied()
    }

    /// Stable identity key of a node or edge. This is the unwrap
    /// surface: result sets map back to domain identifiers through it.
    pub fn key_of(&self, go: GraphObject) -> &str {
        match go {
            GraphObject::Node(id) => &self.nodes[id.index()].key,
            GraphObject::Edge(id) => &self.edges[id.index()].key,
        }
    }

    /// Map a result set back to the keys of the wrapped domain objects.
    pub fn unwrap_keys(&self, result: &HashSet<GraphObject>) -> HashSet<String> {
        result.iter().map(|&go| self.key_of(go).to_string()).collect()
    }

    /// Resolve a collection of keys to node ids, skipping unknown keys
    /// the way the wrapper cache skips unwrappable domain objects.
    pub fn wrapper_set<'a>(&self, keys: impl IntoIterator<Item = &'a str>) -> HashSet<NodeId> {
        let mut set = HashSet::new();
        for key in keys {
            match self.node_by_key(key) {
                Some(id) => {
                    set.insert(id);
                }
                None => {
                    tracing::warn!(key, "no graph node for key, skipping");
                }
            }
        }
        set
    }

    pub fn kind(&self, node: NodeId) -> NodeKind {
        self.nodes[node.index()].kind
    }

    /// Whether crossing this node increments hop distance
    pub fn is_breadth(&self, node: NodeId) -> bool {
        self.nodes[node.index()].kind.is_breadth()
    }

    /// Whether this node is ubiquitous: discoverable but never expanded
    pub fn is_ubique(&self, node: NodeId) -> bool {
        self.nodes[node.index()].ubique
    }

    pub fn sign(&self, node: NodeId) -> Sign {
        self.nodes[node.index()].sign
    }

    pub fn upstream(&self, node: NodeId) -> &[EdgeId] {
        &self.nodes[node.index()].upstream
    }

    pub fn downstream(&self, node: NodeId) -> &[EdgeId] {
        &self.nodes[node.index()].downstream
    }

    /// Parent equivalents (more generic states of the same concept)
    pub fn upper_equivalent(&self, node: NodeId) -> &[NodeId] {
        &self.nodes[node.index()].upper_equivalent
    }

    /// Child equivalents (member states of the same concept)
    pub fn lower_equivalent(&self, node: NodeId) -> &[NodeId] {
        &self.nodes[node.index()].lower_equivalent
    }

    pub fn edge_source(&self, edge: EdgeId) -> NodeId {
        self.edges[edge.index()].source
    }

    pub fn edge_target(&self, edge: EdgeId) -> NodeId {
        self.edges[edge.index()].target
    }
}

/// Append-only construction phase of a [`Graph`].
///
/// Wrapping is memoized: calling [`GraphBuilder::node`] twice with the
/// same key returns the same id, so at most one node exists per distinct
/// domain object. Edges and equivalence links are wired in a second
/// phase against keys that already have nodes.
#[derive(Debug, Default)]
pub struct GraphBuilder {
    nodes: Vec<NodeData>,
    edges: Vec<EdgeData>,
    by_key: HashMap<String, NodeId>,
}

impl GraphBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Wrap a domain object as a node, memoized by key.
    pub fn node(&mut self, key: &str, kind: NodeKind) -> NodeId {
        if let Some(&id) = self.by_key.get(key) {
            return id;
        }
        let id = NodeId(self.nodes.len() as u32);
        self.nodes.push(NodeData {
            key: key.to_string(),
            kind,
            ubique: false,
            sign: Sign::Positive,
            upstream: Vec::new(),
            downstream: Vec::new(),
            upper_equivalent: Vec::new(),
            lower_equivalent: Vec::new(),
        });
        self.by_key.insert(key.to_string(), id);
        id
    }

    /// Mark a node as ubiquitous (e.g. water, ATP)
    pub fn set_ubique(&mut self, node: NodeId, ubique: bool) {
        self.nodes[node.index()].ubique = ubique;
    }

    pub fn set_sign(&mut self, node: NodeId, sign: Sign) {
        self.nodes[node.index()].sign = sign;
    }

    fn resolve(&self, key: &str) -> Result<NodeId> {
        self.by_key
            .get(key)
            .copied()
            .ok_or_else(|| PathreachError::NodeNotFound(key.to_string()))
    }

    /// Wire a directed edge between two wrapped nodes.
    pub fn edge(&mut self, source: &str, target: &str) -> Result<EdgeId> {
        let source_id = self.resolve(source)?;
        let target_id = self.resolve(target)?;
        Ok(self.edge_ids(source_id, target_id))
    }

    pub(crate) fn edge_ids(&mut self, source: NodeId, target: NodeId) -> EdgeId {
        let id = EdgeId(self.edges.len() as u32);
        let key = format!(
            "{} -> {}",
            self.nodes[source.index()].key,
            self.nodes[target.index()].key
        );
        self.edges.push(EdgeData { source, target, key });
        self.nodes[source.index()].downstream.push(id);
        self.nodes[target.index()].upstream.push(id);
        id
    }

    /// Wire a generic/member equivalence link. Traversal across it is
    /// free: both nodes alias the same concept at different specificity.
    pub fn equivalence(&mut self, upper: &str, lower: &str) -> Result<()> {
        let upper_id = self.resolve(upper)?;
        let lower_id = self.resolve(lower)?;
        self.equivalence_ids(upper_id, lower_id);
        Ok(())
    }

    pub(crate) fn equivalence_ids(&mut self, upper: NodeId, lower: NodeId) {
        self.nodes[upper.index()].lower_equivalent.push(lower);
        self.nodes[lower.index()].upper_equivalent.push(upper);
    }

    /// Freeze the arena.
    pub fn build(self) -> Graph {
        Graph {
            nodes: self.nodes,
            edges: self.edges,
            by_key: self.by_key,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_node_wrapping_is_memoized() {
        let mut b = Graph::builder();
        let a1 = b.node("a", NodeKind::Entity);
        let a2 = b.node("a", NodeKind::Entity);
        let c = b.node("c", NodeKind::Event);
        assert_eq!(a1, a2);
        assert_ne!(a1, c);
        let g = b.build();
        assert_eq!(g.node_count(), 2);
        assert_eq!(g.node_by_key("a"), Some(a1));
        assert_eq!(g.node_by_key("missing"), None);
    }

    #[test]
    fn test_edge_wiring_is_consistent() {
        let mut b = Graph::builder();
        let a = b.node("a", NodeKind::Entity);
        let r = b.node("r", NodeKind::Event);
        let e = b.edge("a", "r").unwrap();
        let g = b.build();

        assert_eq!(g.edge_source(e), a);
        assert_eq!(g.edge_target(e), r);
        assert!(g.downstream(a).contains(&e));
        assert!(g.upstream(r).contains(&e));
        assert!(g.upstream(a).is_empty());
        assert!(g.downstream(r).is_empty());
    }

    #[test]
    fn test_edge_to_unknown_key_fails() {
        let mut b = Graph::builder();
        b.node("a", NodeKind::Entity);
        assert!(matches!(
            b.edge("a", "ghost"),
            Err(PathreachError::NodeNotFound(_))
        ));
    }

    #[test]
    fn test_equivalence_links_are_mirrored() {
        let mut b = Graph::builder();
        let p = b.node("generic", NodeKind::Entity);
        let c = b.node("member", NodeKind::Entity);
        b.equivalence("generic", "member").unwrap();
        let g = b.build();

        assert_eq!(g.lower_equivalent(p), &[c]);
        assert_eq!(g.upper_equivalent(c), &[p]);
        assert!(g.upper_equivalent(p).is_empty());
        assert!(g.lower_equivalent(c).is_empty());
    }

    #[test]
    fn test_wrapper_set_skips_unknown_keys() {
        let mut b = Graph::builder();
        let a = b.node("a", NodeKind::Entity);
        let g = b.build();

        let set = g.wrapper_set(["a", "ghost"]);
        assert_eq!(set.len(), 1);
        assert!(set.contains(&a));
    }

    #[test]
    fn test_unwrap_keys() {
        let mut b = Graph::builder();
        let a = b.node("a", NodeKind::Entity);
        b.node("r", NodeKind::Event);
        let e = b.edge("a", "r").unwrap();
        let g = b.build();

        let mut result = HashSet::new();
        result.insert(GraphObject::Node(a));
        result.insert(GraphObject::Edge(e));
        let keys = g.unwrap_keys(&result);
        assert!(keys.contains("a"));
        assert!(keys.contains("a -> r"));
    }

    #[test]
    fn test_ubique_and_sign_flags() {
        let mut b = Graph::builder();
        let atp = b.node("atp", NodeKind::Entity);
        b.set_ubique(atp, true);
        b.set_sign(atp, Sign::Negative);
        let g = b.build();

        assert!(g.is_ubique(atp));
        assert_eq!(g.sign(atp), Sign::Negative);
    }
}
