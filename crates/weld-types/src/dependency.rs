use enum_as_inner::EnumAsInner;
use serde::{Deserialize, Serialize};

use crate::typeref::TypeRef;

/// A slot the generated function must fill: a typed value, a struct literal
/// assembled field by field, or an error result.
#[derive(Debug, Clone, PartialEq, Eq, EnumAsInner, Serialize, Deserialize)]
pub enum Dependency {
    /// A value of the referenced type, produced however the resolver sees fit.
    Type(TypeRef),
    /// A struct literal with a caller-supplied field list, bypassing any
    /// constructor the owning package may have.
    Struct(StructDep),
    /// The generated function must return an error result.
    Error,
}

impl Dependency {
    pub fn to_type(import: impl Into<String>, name: impl Into<String>) -> Self {
        Dependency::Type(TypeRef::new(import, name))
    }
}

impl From<TypeRef> for Dependency {
    fn from(type_ref: TypeRef) -> Self {
        Dependency::Type(type_ref)
    }
}

/// A struct literal demand: the struct's own reference plus the ordered
/// fields to populate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StructDep {
    pub type_ref: TypeRef,
    pub fields: Vec<FieldDep>,
}

/// One field of a [`StructDep`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldDep {
    pub name: String,
    pub type_ref: TypeRef,
}

impl FieldDep {
    pub fn new(name: impl Into<String>, type_ref: TypeRef) -> Self {
        Self {
            name: name.into(),
            type_ref,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn to_type_folds_pointers_like_typeref() {
        let dep = Dependency::to_type("app.com/web", "*Web");
        let type_ref = dep.as_type().unwrap();
        assert!(type_ref.is_pointer());
        assert_eq!(type_ref.name(), "Web");
    }
}
