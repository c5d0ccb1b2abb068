use indexmap::{IndexMap, IndexSet};
use log::debug;
use weld_types::{Function, TypeRef};

use crate::graph::{Graph, NodeId, Provider, ProviderKind};

/// A parameter synthesized by the hoist analysis: the provider it replaces
/// and the reference the caller must now supply.
#[derive(Debug, Clone)]
pub struct HoistedParam {
    /// The `Hoisted` node spliced into the graph.
    pub node: NodeId,
    /// The provider the caller now constructs on the outside.
    pub source: NodeId,
    /// User-visible spelling of the parameter's type.
    pub type_ref: TypeRef,
}

/// Lifts request-independent subgraphs into the caller's scope.
///
/// A provider is request-bound when it transitively reaches an external
/// input tagged `hoist` on the descriptor. Walking from the roots (which
/// are exempt — the function must still build its own results), every edge
/// into a subtree that is not request-bound is replaced by a synthesized
/// input slot; the caller constructs that value once and passes it into
/// each invocation. Shared subtrees collapse onto one slot, and slots are
/// ordered by first occurrence in resolution order.
pub fn hoist(graph: &mut Graph, function: &Function) -> Vec<HoistedParam> {
    if !function.hoist {
        return Vec::new();
    }

    // Bottom-up request-bound marking; children always precede parents in
    // id order.
    let mut bound = vec![false; graph.len()];
    for (id, node) in graph.iter() {
        bound[id.as_usize()] = match &node.kind {
            ProviderKind::External { index } => function.params[*index].hoist,
            ProviderKind::Hoisted { .. } => false,
            _ => node
                .children()
                .into_iter()
                .any(|child| bound[child.as_usize()]),
        };
    }

    // Maximal hoistable subtrees, found from the roots without descending
    // into them.
    let mut hoistable: IndexSet<NodeId> = IndexSet::new();
    let mut seen = vec![false; graph.len()];
    let mut visit: Vec<NodeId> = graph.roots().to_vec();
    while let Some(id) = visit.pop() {
        if seen[id.as_usize()] {
            continue;
        }
        seen[id.as_usize()] = true;
        for child in graph[id].children() {
            let external = matches!(graph[child].kind, ProviderKind::External { .. });
            if !bound[child.as_usize()] && !external {
                hoistable.insert(child);
            } else {
                visit.push(child);
            }
        }
    }

    let mut sources: Vec<NodeId> = hoistable.into_iter().collect();
    sources.sort();

    let mut mapping: IndexMap<NodeId, NodeId> = IndexMap::new();
    let mut params = Vec::with_capacity(sources.len());
    for (index, &source) in sources.iter().enumerate() {
        let type_ref = graph[source].display_ref();
        debug!("hoisting {type_ref} into parameter {index}");
        let provided = graph[source].type_ref.clone();
        let trail = graph[source].trail.clone();
        let node = graph.push(Provider::with_trail(
            provided,
            trail,
            ProviderKind::Hoisted { index },
        ));
        mapping.insert(source, node);
        params.push(HoistedParam {
            node,
            source,
            type_ref,
        });
    }
    graph.rewrite_edges(&mapping);
    params
}
