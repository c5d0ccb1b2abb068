//! Declarations discovered in the target application's packages, the
//! contracts of the external collaborators that discover them, and a
//! per-run memoized index over both.
//!
//! The core never reads source text itself: a [`Parser`] turns a package
//! directory into a [`Package`] snapshot and a [`Modules`] resolver maps
//! import paths to directories. The [`DeclIndex`] sits on top, caching one
//! immutable snapshot per import path for the duration of a resolution run
//! and following source-level alias chains to their terminal declaration.

pub mod decl;
pub mod index;
pub mod package;
pub mod source;

pub mod prelude {
    pub use crate::decl::{AliasDecl, Field, FuncDecl, InterfaceDecl, MethodSig, StructDecl, TypeDecl};
    pub use crate::index::{DeclIndex, IndexError, Resolved};
    pub use crate::package::Package;
    pub use crate::source::{Modules, ParseError, Parser};
}

pub use decl::{AliasDecl, Field, FuncDecl, InterfaceDecl, MethodSig, StructDecl, TypeDecl};
pub use index::{DeclIndex, IndexError, Resolved};
pub use package::Package;
pub use source::{Modules, ParseError, Parser};
