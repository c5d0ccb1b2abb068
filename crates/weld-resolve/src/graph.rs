use std::fmt;
use std::ops::Index;

use enum_as_inner::EnumAsInner;
use weld_decls::FuncDecl;
use weld_types::TypeRef;

/// Index of a provider in the graph's arena. Stable for the lifetime of a
/// resolution run; edges are ids rather than owned pointers so shared
/// subgraphs stay shared and iteration order is trivially stable.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct NodeId(u32);

impl NodeId {
    pub fn as_usize(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Debug for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "NodeId({})", self.0)
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A pointer identity adjustment between a provider and its consumer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Coercion {
    /// Take the address of the inner value.
    Ref,
    /// Dereference the inner pointer.
    Deref,
}

/// How a provider produces its value.
#[derive(Debug, Clone, EnumAsInner)]
pub enum ProviderKind {
    /// Supplied by the caller through the descriptor's parameter list.
    External { index: usize },
    /// Supplied by the caller through a parameter synthesized by the hoist
    /// analysis.
    Hoisted { index: usize },
    /// Invocation of a discovered constructor.
    Call {
        func: FuncDecl,
        args: Vec<NodeId>,
        has_error: bool,
    },
    /// A struct literal assembled field by field.
    Literal { fields: Vec<(String, NodeId)> },
    /// Pointer identity wrapper around a shared child.
    Coerce { inner: NodeId, op: Coercion },
}

/// One node of the provider graph.
#[derive(Debug, Clone)]
pub struct Provider {
    /// The reference this node provides, spelled the way the demand spelled
    /// it, with the indirection the node actually produces.
    pub type_ref: TypeRef,
    /// Alias hops traversed to reach the terminal declaration; empty when
    /// the demand named it directly.
    pub trail: Vec<TypeRef>,
    pub kind: ProviderKind,
}

impl Provider {
    pub fn new(type_ref: TypeRef, kind: ProviderKind) -> Self {
        Self {
            type_ref,
            trail: Vec::new(),
            kind,
        }
    }

    pub fn with_trail(type_ref: TypeRef, trail: Vec<TypeRef>, kind: ProviderKind) -> Self {
        Self {
            type_ref,
            trail,
            kind,
        }
    }

    /// The user-visible spelling of this node's type: the first alias hop
    /// when one exists, the node's own reference otherwise, carrying the
    /// node's indirection either way.
    pub fn display_ref(&self) -> TypeRef {
        match self.trail.first() {
            Some(first) => first.with_pointer(self.type_ref.is_pointer()),
            None => self.type_ref.clone(),
        }
    }

    /// Ids of the nodes this provider consumes.
    pub fn children(&self) -> Vec<NodeId> {
        match &self.kind {
            ProviderKind::External { .. } | ProviderKind::Hoisted { .. } => Vec::new(),
            ProviderKind::Call { args, .. } => args.clone(),
            ProviderKind::Literal { fields } => fields.iter().map(|(_, id)| *id).collect(),
            ProviderKind::Coerce { inner, .. } => vec![*inner],
        }
    }

    fn children_mut(&mut self) -> Vec<&mut NodeId> {
        match &mut self.kind {
            ProviderKind::External { .. } | ProviderKind::Hoisted { .. } => Vec::new(),
            ProviderKind::Call { args, .. } => args.iter_mut().collect(),
            ProviderKind::Literal { fields } => fields.iter_mut().map(|(_, id)| id).collect(),
            ProviderKind::Coerce { inner, .. } => vec![inner],
        }
    }
}

/// The acyclic provider graph for one resolution run.
///
/// Nodes are appended in post-order (children before parents), so ascending
/// id order is a topological order of the original graph and doubles as the
/// deterministic emission order.
#[derive(Debug, Clone, Default)]
pub struct Graph {
    nodes: Vec<Provider>,
    roots: Vec<NodeId>,
}

impl Graph {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, provider: Provider) -> NodeId {
        let id = NodeId(self.nodes.len() as u32);
        self.nodes.push(provider);
        id
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn roots(&self) -> &[NodeId] {
        &self.roots
    }

    pub fn add_root(&mut self, id: NodeId) {
        self.roots.push(id);
    }

    pub fn iter(&self) -> impl Iterator<Item = (NodeId, &Provider)> {
        self.nodes
            .iter()
            .enumerate()
            .map(|(i, node)| (NodeId(i as u32), node))
    }

    /// Rewrites every edge pointing at a key of `mapping` to its value.
    pub(crate) fn rewrite_edges(&mut self, mapping: &indexmap::IndexMap<NodeId, NodeId>) {
        for node in &mut self.nodes {
            for child in node.children_mut() {
                if let Some(&replacement) = mapping.get(child) {
                    *child = replacement;
                }
            }
        }
    }

    /// Which nodes are reachable from the roots, following current edges.
    pub fn reachable(&self) -> Vec<bool> {
        let mut reachable = vec![false; self.nodes.len()];
        let mut stack: Vec<NodeId> = self.roots.clone();
        while let Some(id) = stack.pop() {
            if reachable[id.as_usize()] {
                continue;
            }
            reachable[id.as_usize()] = true;
            stack.extend(self[id].children());
        }
        reachable
    }
}

impl Index<NodeId> for Graph {
    type Output = Provider;

    fn index(&self, id: NodeId) -> &Provider {
        &self.nodes[id.as_usize()]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn leaf(name: &str) -> Provider {
        Provider::new(
            TypeRef::new("app.com/x", format!("*{name}")),
            ProviderKind::Literal { fields: Vec::new() },
        )
    }

    #[test]
    fn ids_ascend_in_insertion_order() {
        let mut graph = Graph::new();
        let a = graph.push(leaf("A"));
        let b = graph.push(leaf("B"));
        assert!(a < b);
        assert_eq!(graph.len(), 2);
    }

    #[test]
    fn reachability_follows_edges_from_the_roots() {
        let mut graph = Graph::new();
        let a = graph.push(leaf("A"));
        let orphan = graph.push(leaf("Orphan"));
        let parent = graph.push(Provider::new(
            TypeRef::new("app.com/x", "*Parent"),
            ProviderKind::Literal {
                fields: vec![("A".to_owned(), a)],
            },
        ));
        graph.add_root(parent);

        let reachable = graph.reachable();
        assert!(reachable[a.as_usize()]);
        assert!(reachable[parent.as_usize()]);
        assert!(!reachable[orphan.as_usize()]);
    }

    #[test]
    fn display_ref_prefers_the_first_alias_hop() {
        let node = Provider::with_trail(
            TypeRef::new("app.com/runtime/transpiler", "*Transpiler"),
            vec![
                TypeRef::new("app.com/runtime/transpiler", "Transpiler"),
                TypeRef::new("app.com/library/transpiler", "Transpiler"),
            ],
            ProviderKind::Literal { fields: Vec::new() },
        );
        let display = node.display_ref();
        assert_eq!(display.import(), "app.com/runtime/transpiler");
        assert!(display.is_pointer());
    }
}
