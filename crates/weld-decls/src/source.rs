use camino::{Utf8Path, Utf8PathBuf};
use thiserror::Error;

use crate::package::Package;

/// The external source parser. Given a package directory it returns the
/// package's declarations; the core treats the result as immutable.
pub trait Parser {
    fn parse(&self, dir: &Utf8Path) -> Result<Package, ParseError>;
}

/// The external module resolver: maps import paths to directories and back.
/// `import_path_for` is only consulted for emitter-side naming.
pub trait Modules {
    fn directory_for(&self, import: &str) -> Option<Utf8PathBuf>;
    fn import_path_for(&self, dir: &Utf8Path) -> Option<String>;
}

/// Failure reported by the external parser for a directory it could locate
/// but not parse.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("di: unable to parse {dir}: {message}")]
pub struct ParseError {
    pub dir: Utf8PathBuf,
    pub message: String,
}

impl ParseError {
    pub fn new(dir: impl Into<Utf8PathBuf>, message: impl Into<String>) -> Self {
        Self {
            dir: dir.into(),
            message: message.into(),
        }
    }
}
