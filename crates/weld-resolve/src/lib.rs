//! Resolution core of the weld injector: turns a function descriptor and a
//! declaration index into an acyclic provider graph.
//!
//! Resolution is demand-driven and type-directed. Each result of the
//! descriptor is a demand; the candidate selector ranks the ways a demand
//! can be satisfied (external input, alias redirection, discovered
//! constructor, synthesized struct literal) and the resolver recurses into
//! the winner's own dependencies, memoizing by type reference so shared
//! values collapse onto shared nodes. Pointer mismatches between a provider
//! and its consumer become explicit coercion nodes rather than copies, and
//! the hoist analysis may afterwards lift request-independent subtrees into
//! caller-supplied parameters.
//!
//! The graph is an index arena: nodes are appended children-first, so
//! ascending id order is already a topological order and downstream
//! emission needs no further sorting.

pub mod error;
pub mod graph;
pub mod hoist;
pub mod resolver;
pub mod select;

pub mod prelude {
    pub use crate::error::{CyclePath, Error};
    pub use crate::graph::{Coercion, Graph, NodeId, Provider, ProviderKind};
    pub use crate::hoist::{hoist, HoistedParam};
    pub use crate::resolver::Resolver;
    pub use crate::select::{select, Candidate};
}

pub use error::{CyclePath, Error};
pub use graph::{Coercion, Graph, NodeId, Provider, ProviderKind};
pub use hoist::{hoist, HoistedParam};
pub use resolver::Resolver;
pub use select::{select, Candidate};
