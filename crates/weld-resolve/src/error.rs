use std::fmt;

use camino::Utf8PathBuf;
use miette::Diagnostic;
use thiserror::Error;
use weld_decls::{IndexError, ParseError};
use weld_types::TypeRef;

/// A dependency path that loops back on itself, printed as
/// `'a'.A -> 'b'.B -> 'a'.A`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CyclePath(pub Vec<TypeRef>);

impl fmt::Display for CyclePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, type_ref) in self.0.iter().enumerate() {
            if i > 0 {
                write!(f, " -> ")?;
            }
            write!(f, "{type_ref}")?;
        }
        Ok(())
    }
}

/// Fatal resolution errors. Every message carries the stable `di: ` prefix
/// and the fully-qualified reference of the demand in question; the exact
/// strings are part of the observable contract.
#[derive(Debug, Error, Diagnostic)]
pub enum Error {
    #[error("di: unable to find a declaration for {0}")]
    #[diagnostic(code(di::type_not_found))]
    TypeNotFound(TypeRef),

    #[error("di: unclear how to provide {0}")]
    #[diagnostic(
        code(di::unclear_provider),
        help("map the interface to a concrete type with an alias, or pass one in as a parameter")
    )]
    UnclearProvider(TypeRef),

    #[error("di: ambiguous constructors for {0}")]
    #[diagnostic(
        code(di::ambiguous_constructor),
        help("keep a single constructor for the type, or name the intended one `New`")
    )]
    AmbiguousConstructor(TypeRef),

    #[error("di: dependency cycle {path}")]
    #[diagnostic(code(di::cycle))]
    Cycle { path: CyclePath },

    #[error("di: alias cycle for {0}")]
    #[diagnostic(code(di::alias_cycle))]
    AliasCycle(TypeRef),

    #[error("di: {0} can fail, but no error result is declared")]
    #[diagnostic(
        code(di::error_unexpected),
        help("declare an error result on the function descriptor")
    )]
    ErrorUnexpected(TypeRef),

    #[error("di: unable to provide field {field} of {type_ref}")]
    #[diagnostic(code(di::field_unresolved))]
    FieldUnresolved {
        field: String,
        type_ref: TypeRef,
        #[source]
        source: Box<Error>,
    },

    #[error("di: unable to find an import path for {0}")]
    #[diagnostic(code(di::target_not_found))]
    TargetNotFound(Utf8PathBuf),

    #[error(transparent)]
    Parse(#[from] ParseError),
}

impl From<IndexError> for Error {
    fn from(err: IndexError) -> Self {
        match err {
            IndexError::Parse(parse) => Error::Parse(parse),
            IndexError::AliasCycle(type_ref) => Error::AliasCycle(type_ref),
        }
    }
}
