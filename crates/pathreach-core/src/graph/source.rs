use crate::graph::model::{Graph, GraphBuilder};
use crate::graph::types::{NodeKind, Sign};

/// Collaborator seam for building a graph from a domain model.
///
/// Implementors expose the domain as stable string keys plus adjacency.
/// The engine never sees domain objects: it wraps every key as a node,
/// then wires edges and equivalence links, all up front, so that queries
/// run against a frozen graph.
pub trait GraphSource {
    /// Keys of every domain object that becomes a node.
    fn node_keys(&self) -> Vec<String>;

    /// Kind of the node for a key (entity, event, or control).
    fn kind(&self, key: &str) -> NodeKind;

    /// Whether the object is ubiquitous (e.g. water, ATP).
    fn is_ubique(&self, _key: &str) -> bool {
        false
    }

    /// Effect sign of the object, carried through for callers.
    fn sign(&self, _key: &str) -> Sign {
        Sign::Positive
    }

    /// Keys directly downstream of `key`.
    fn downstream(&self, key: &str) -> Vec<String>;

    /// Keys of member (more specific) equivalents of `key`.
    fn lower_equivalents(&self, _key: &str) -> Vec<String> {
        Vec::new()
    }
}

impl Graph {
    /// Build a graph from a domain source in two phases: wrap every key
    /// as a node, then wire edges and equivalence links. Links pointing
    /// at keys the source never listed are skipped with a warning.
    pub fn from_source(source: &impl GraphSource) -> Graph {
        let keys = source.node_keys();
        let mut builder = GraphBuilder::new();

        for key in &keys {
            let id = builder.node(key, source.kind(key));
            builder.set_ubique(id, source.is_ubique(key));
            builder.set_sign(id, source.sign(key));
        }

        for key in &keys {
            for target in source.downstream(key) {
                if builder.edge(key, &target).is_err() {
                    tracing::warn!(from = %key, to = %target, "edge target is not a node, skipping");
                }
            }
            for member in source.lower_equivalents(key) {
                if builder.equivalence(key, &member).is_err() {
                    tracing::warn!(generic = %key, member = %member, "equivalent is not a node, skipping");
                }
            }
        }

        builder.build()
    }
}
