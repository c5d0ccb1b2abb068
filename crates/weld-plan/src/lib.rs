//! Turns a resolved provider graph into the ordered initialization plan a
//! code printer renders: named bindings in dependency order, a deduplicated
//! import table and the final function signature.

pub mod emit;
pub mod imports;
pub mod names;
pub mod plan;

pub mod prelude {
    pub use crate::emit::emit;
    pub use crate::imports::Import;
    pub use crate::names::NameTable;
    pub use crate::plan::{Binding, BindingValue, ParamSig, Plan, ResultSig, Signature};
}

pub use emit::emit;
pub use imports::Import;
pub use names::NameTable;
pub use plan::{Binding, BindingValue, ParamSig, Plan, ResultSig, Signature};
