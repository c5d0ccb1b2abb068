use serde::{Deserialize, Serialize};
use weld_types::TypeRef;

use crate::imports::Import;

/// The resolver's final output: an ordered list of bindings plus the
/// signature of the function to print. Byte-identical across runs on
/// identical inputs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Plan {
    pub signature: Signature,
    /// Initialization steps in dependency order; every referenced name is
    /// either a parameter or an earlier binding.
    pub bindings: Vec<Binding>,
    /// Imports the printed file needs, with collision-free qualifiers.
    pub imports: Vec<Import>,
}

/// The signature of the generated function.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Signature {
    pub name: String,
    /// Import path of the package the function is emitted into.
    pub target_import: String,
    /// Original descriptor parameters first, hoisted additions after.
    pub params: Vec<ParamSig>,
    pub results: Vec<ResultSig>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParamSig {
    pub name: String,
    pub type_ref: TypeRef,
    /// True for parameters synthesized by the hoist analysis.
    pub hoisted: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ResultSig {
    Value(TypeRef),
    Error,
}

/// One initialization step.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Binding {
    /// Fresh local name, unique within the plan.
    pub name: String,
    /// The bound value's type, spelled the way the user first wrote it.
    pub type_ref: TypeRef,
    pub value: BindingValue,
    /// Whether the step also yields an error the printed code must check.
    pub has_error: bool,
}

/// What the binding's right-hand side looks like; children are referenced
/// by the names of earlier bindings or parameters.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum BindingValue {
    /// Call a constructor: `qualifier.Func(args...)`.
    Call {
        import: String,
        func: String,
        args: Vec<String>,
    },
    /// Assemble a struct literal field by field. The binding's own
    /// `type_ref` carries the indirection (`&T{...}` versus `T{...}`).
    Literal { fields: Vec<(String, String)> },
    /// Take the address of an earlier binding.
    Ref { inner: String },
    /// Dereference an earlier binding.
    Deref { inner: String },
}
