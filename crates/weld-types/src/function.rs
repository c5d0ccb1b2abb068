use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::dependency::Dependency;
use crate::typeref::TypeRef;

/// An externally supplied input to the generated function.
///
/// `hoist` marks the request-scoped inputs: anything that transitively
/// depends on a hoist-tagged parameter stays inside the function body, while
/// independent subgraphs may be lifted into the caller's scope.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Param {
    pub type_ref: TypeRef,
    pub hoist: bool,
}

impl Param {
    pub fn new(type_ref: TypeRef) -> Self {
        Self {
            type_ref,
            hoist: false,
        }
    }

    pub fn hoisted(type_ref: TypeRef) -> Self {
        Self {
            type_ref,
            hoist: true,
        }
    }
}

impl From<TypeRef> for Param {
    fn from(type_ref: TypeRef) -> Self {
        Param::new(type_ref)
    }
}

/// Caller-supplied redirections from interface (or alias) references to the
/// concrete references that should satisfy them. Lookup is exact, pointer
/// flag included; chains are followed to a fixed point by the selector.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Aliases {
    entries: IndexMap<TypeRef, TypeRef>,
}

impl Aliases {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, from: TypeRef, to: TypeRef) {
        self.entries.insert(from, to);
    }

    pub fn get(&self, from: &TypeRef) -> Option<&TypeRef> {
        self.entries.get(from)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&TypeRef, &TypeRef)> {
        self.entries.iter()
    }
}

impl FromIterator<(TypeRef, TypeRef)> for Aliases {
    fn from_iter<I: IntoIterator<Item = (TypeRef, TypeRef)>>(iter: I) -> Self {
        Self {
            entries: iter.into_iter().collect(),
        }
    }
}

/// The descriptor of the provider function to generate: where it lives, what
/// the caller passes in, and what it must produce.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Function {
    /// Name of the generated function.
    pub name: String,
    /// Import path of the package the function will be emitted into.
    pub target_import: String,
    /// Externally supplied inputs, in signature order.
    pub params: Vec<Param>,
    /// Results the function must produce, in signature order.
    pub results: Vec<Dependency>,
    /// Interface-to-concrete redirections.
    pub aliases: Aliases,
    /// Enables the hoist analysis over the resolved graph.
    pub hoist: bool,
}

impl Function {
    pub fn new(name: impl Into<String>, target_import: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            target_import: target_import.into(),
            params: Vec::new(),
            results: Vec::new(),
            aliases: Aliases::new(),
            hoist: false,
        }
    }

    /// True when the descriptor declares an error result.
    pub fn declares_error(&self) -> bool {
        self.results
            .iter()
            .any(|dep| matches!(dep, Dependency::Error))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn aliases_preserve_insertion_order() {
        let mut aliases = Aliases::new();
        aliases.insert(
            TypeRef::new("app.com/js", "VM"),
            TypeRef::new("app.com/js/v8", "*V8"),
        );
        aliases.insert(
            TypeRef::new("app.com/log", "Log"),
            TypeRef::new("app.com/log/console", "Console"),
        );

        let keys: Vec<_> = aliases.iter().map(|(from, _)| from.name()).collect();
        assert_eq!(keys, ["VM", "Log"]);
    }

    #[test]
    fn declares_error_scans_results() {
        let mut function = Function::new("Load", "app.com/gen/web");
        assert!(!function.declares_error());

        function.results.push(Dependency::to_type("app.com/web", "*Web"));
        function.results.push(Dependency::Error);
        assert!(function.declares_error());
    }
}
