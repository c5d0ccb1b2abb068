use weld_types::TypeRef;

use crate::decl::{AliasDecl, FuncDecl, InterfaceDecl, StructDecl, TypeDecl};

/// An immutable snapshot of one package's declarations, as produced by the
/// parser for a single directory.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Package {
    /// Fully-qualified import path.
    pub import: String,
    /// The package's declared name, which may differ from the last segment
    /// of the import path.
    pub name: String,
    pub funcs: Vec<FuncDecl>,
    pub structs: Vec<StructDecl>,
    pub interfaces: Vec<InterfaceDecl>,
    pub aliases: Vec<AliasDecl>,
}

impl Package {
    pub fn new(import: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            import: import.into(),
            name: name.into(),
            ..Self::default()
        }
    }

    /// True when the parser found no declarations at all.
    pub fn is_empty(&self) -> bool {
        self.funcs.is_empty()
            && self.structs.is_empty()
            && self.interfaces.is_empty()
            && self.aliases.is_empty()
    }

    /// Looks up a named type declaration.
    pub fn find_type(&self, name: &str) -> Option<TypeDecl> {
        if let Some(decl) = self.structs.iter().find(|s| s.type_ref.name() == name) {
            return Some(TypeDecl::Struct(decl.clone()));
        }
        if let Some(decl) = self.interfaces.iter().find(|i| i.type_ref.name() == name) {
            return Some(TypeDecl::Interface(decl.clone()));
        }
        if let Some(decl) = self.aliases.iter().find(|a| a.type_ref.name() == name) {
            return Some(TypeDecl::Alias(decl.clone()));
        }
        None
    }

    /// Receiver-less functions whose first result names the given type,
    /// indirection ignored. Methods never qualify.
    pub fn constructors_of<'p>(&'p self, type_ref: &TypeRef) -> impl Iterator<Item = &'p FuncDecl> {
        let want = type_ref.as_value();
        self.funcs.iter().filter(move |func| {
            func.receiver.is_none()
                && func
                    .provides()
                    .map(|result| result.as_value() == want)
                    .unwrap_or(false)
        })
    }
}
