use enum_as_inner::EnumAsInner;
use weld_types::{Kind, TypeRef};

/// A package-level function as reported by the parser.
///
/// Functions with a receiver are methods; they never qualify as
/// constructors, even when their result type matches a demand.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FuncDecl {
    /// Import path of the package the function is declared in.
    pub import: String,
    pub name: String,
    /// The receiver's type name when the function is a method.
    pub receiver: Option<String>,
    pub params: Vec<TypeRef>,
    pub results: Vec<TypeRef>,
    /// Whether the source signature carries a trailing error result.
    pub has_error: bool,
}

impl FuncDecl {
    /// The first (primary) result, which decides what the function provides.
    pub fn provides(&self) -> Option<&TypeRef> {
        self.results.first()
    }
}

/// One field of a struct declaration. Embedded fields carry the embedded
/// type's local name as their field name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Field {
    pub name: String,
    pub type_ref: TypeRef,
    pub embedded: bool,
    pub exported: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StructDecl {
    /// The struct's own reference, in value form.
    pub type_ref: TypeRef,
    pub fields: Vec<Field>,
}

/// A method signature inside an interface declaration. Carried for
/// declaration fidelity; satisfaction checks never compare method sets.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MethodSig {
    pub name: String,
    pub params: Vec<TypeRef>,
    pub results: Vec<TypeRef>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InterfaceDecl {
    pub type_ref: TypeRef,
    pub methods: Vec<MethodSig>,
}

/// A source-level type alias. Aliases may chain and cross packages.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AliasDecl {
    pub type_ref: TypeRef,
    pub target: TypeRef,
}

/// A named type declaration.
#[derive(Debug, Clone, PartialEq, Eq, EnumAsInner)]
pub enum TypeDecl {
    Struct(StructDecl),
    Interface(InterfaceDecl),
    Alias(AliasDecl),
}

impl TypeDecl {
    pub fn kind(&self) -> Kind {
        match self {
            TypeDecl::Struct(_) => Kind::Struct,
            TypeDecl::Interface(_) => Kind::Interface,
            TypeDecl::Alias(_) => Kind::Alias,
        }
    }

    pub fn type_ref(&self) -> &TypeRef {
        match self {
            TypeDecl::Struct(decl) => &decl.type_ref,
            TypeDecl::Interface(decl) => &decl.type_ref,
            TypeDecl::Alias(decl) => &decl.type_ref,
        }
    }
}
