use derive_more::Display;
use serde::{Deserialize, Serialize};
use std::fmt;

/// What a type reference ultimately names, as determined by the declaration
/// index. Callers never supply a kind themselves.
#[derive(Debug, Display, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Kind {
    #[display("struct")]
    Struct,
    #[display("interface")]
    Interface,
    #[display("alias")]
    Alias,
    /// Primitives, named non-struct types and anything the parser has no
    /// declaration for.
    #[display("opaque")]
    Opaque,
}

/// A reference to a named type in a package: the owning import path, the
/// local identifier and whether the reference is through a pointer.
///
/// Equality is content-based and includes the pointer flag; two references
/// that differ only in indirection are distinct dependencies unless a
/// coercion bridges them.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct TypeRef {
    import: String,
    name: String,
    pointer: bool,
}

impl TypeRef {
    /// Builds a reference from an import path and a local name. A single
    /// leading `*` on the name is folded into the pointer flag, so
    /// `TypeRef::new("app.com/web", "*Web")` and
    /// `TypeRef::new("app.com/web", "Web").as_pointer()` are the same
    /// reference. Composite spellings such as `[]*Log` pass through verbatim.
    pub fn new(import: impl Into<String>, name: impl Into<String>) -> Self {
        let import = import.into();
        let name = name.into();
        match name.strip_prefix('*') {
            Some(rest) => Self {
                import,
                name: rest.to_owned(),
                pointer: true,
            },
            None => Self {
                import,
                name,
                pointer: false,
            },
        }
    }

    pub fn import(&self) -> &str {
        &self.import
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn is_pointer(&self) -> bool {
        self.pointer
    }

    /// The same reference with the given indirection.
    pub fn with_pointer(&self, pointer: bool) -> Self {
        Self {
            import: self.import.clone(),
            name: self.name.clone(),
            pointer,
        }
    }

    /// The value form of this reference (pointer flag cleared).
    pub fn as_value(&self) -> Self {
        self.with_pointer(false)
    }

    /// The pointer form of this reference.
    pub fn as_pointer(&self) -> Self {
        self.with_pointer(true)
    }
}

impl fmt::Display for TypeRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.pointer {
            write!(f, "'{}'.*{}", self.import, self.name)
        } else {
            write!(f, "'{}'.{}", self.import, self.name)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_quotes_the_import() {
        let vm = TypeRef::new("app.com/js", "VM");
        assert_eq!(vm.to_string(), "'app.com/js'.VM");

        let web = TypeRef::new("app.com/web", "*Web");
        assert_eq!(web.to_string(), "'app.com/web'.*Web");
    }

    #[test]
    fn leading_star_folds_into_the_pointer_flag() {
        let starred = TypeRef::new("app.com/web", "*Web");
        let plain = TypeRef::new("app.com/web", "Web").as_pointer();
        assert_eq!(starred, plain);
        assert!(starred.is_pointer());
        assert_eq!(starred.name(), "Web");

        // Only a single leading star is folded; composite spellings keep
        // their modifiers in the name.
        let slice = TypeRef::new("app.com/log", "[]*Log");
        assert!(!slice.is_pointer());
        assert_eq!(slice.name(), "[]*Log");
    }

    #[test]
    fn pointer_depth_is_part_of_identity() {
        let value = TypeRef::new("app.com/web", "Middleware");
        let pointer = value.as_pointer();
        assert_ne!(value, pointer);
        assert_eq!(value, pointer.as_value());
    }
}
