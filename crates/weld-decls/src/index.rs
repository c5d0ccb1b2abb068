use std::sync::Arc;

use indexmap::IndexMap;
use log::debug;
use thiserror::Error;
use weld_types::TypeRef;

use crate::decl::TypeDecl;
use crate::package::Package;
use crate::source::{Modules, ParseError, Parser};

/// Longest source-level alias chain the index will follow before declaring
/// a cycle.
const MAX_ALIAS_HOPS: usize = 32;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum IndexError {
    #[error(transparent)]
    Parse(#[from] ParseError),
    #[error("di: alias cycle for {0}")]
    AliasCycle(TypeRef),
}

/// A type reference resolved to its terminal (non-alias) declaration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resolved {
    pub decl: TypeDecl,
    /// Every reference visited on the way, in value form: the demand first,
    /// the terminal reference last. Length one when no alias was involved.
    /// The emitter prints the first spelling, preserving what the user wrote.
    pub trail: Vec<TypeRef>,
}

impl Resolved {
    pub fn terminal(&self) -> &TypeRef {
        self.trail.last().unwrap_or(self.decl.type_ref())
    }
}

/// Memoized directory of package declarations for one resolution run.
///
/// Misses go through the module resolver and the parser exactly once per
/// import path; a miss (unlocatable directory or empty parse) is memoized
/// as well so repeated demands stay cheap.
pub struct DeclIndex<'a> {
    parser: &'a dyn Parser,
    modules: &'a dyn Modules,
    packages: IndexMap<String, Option<Arc<Package>>>,
}

impl<'a> DeclIndex<'a> {
    pub fn new(parser: &'a dyn Parser, modules: &'a dyn Modules) -> Self {
        Self {
            parser,
            modules,
            packages: IndexMap::new(),
        }
    }

    /// The declarations of a package, or `None` when the module resolver
    /// cannot locate the import or the parser yields no declarations.
    pub fn package(&mut self, import: &str) -> Result<Option<Arc<Package>>, ParseError> {
        if let Some(hit) = self.packages.get(import) {
            return Ok(hit.clone());
        }
        let entry = match self.modules.directory_for(import) {
            None => {
                debug!("no directory for import {import}");
                None
            }
            Some(dir) => {
                let package = self.parser.parse(&dir)?;
                debug!(
                    "indexed {import}: {} funcs, {} structs, {} interfaces, {} aliases",
                    package.funcs.len(),
                    package.structs.len(),
                    package.interfaces.len(),
                    package.aliases.len()
                );
                if package.is_empty() {
                    None
                } else {
                    Some(Arc::new(package))
                }
            }
        };
        self.packages.insert(import.to_owned(), entry.clone());
        Ok(entry)
    }

    /// Resolves a reference to its terminal declaration, following
    /// source-level alias chains across packages. `None` when the owning
    /// package has no declarations or no type of that name.
    pub fn lookup_type(&mut self, type_ref: &TypeRef) -> Result<Option<Resolved>, IndexError> {
        let mut current = type_ref.as_value();
        let mut trail = vec![current.clone()];
        for _ in 0..MAX_ALIAS_HOPS {
            let Some(package) = self.package(current.import())? else {
                return Ok(None);
            };
            match package.find_type(current.name()) {
                Some(TypeDecl::Alias(alias)) => {
                    current = alias.target.as_value();
                    trail.push(current.clone());
                }
                Some(decl) => return Ok(Some(Resolved { decl, trail })),
                None => return Ok(None),
            }
        }
        Err(IndexError::AliasCycle(type_ref.clone()))
    }
}

#[cfg(test)]
mod tests {
    use std::cell::Cell;

    use camino::{Utf8Path, Utf8PathBuf};
    use weld_types::Kind;

    use super::*;
    use crate::decl::AliasDecl;

    struct MapModules;

    impl Modules for MapModules {
        fn directory_for(&self, import: &str) -> Option<Utf8PathBuf> {
            import
                .strip_prefix("app.com")
                .map(|rest| Utf8PathBuf::from(format!("/app{rest}")))
        }

        fn import_path_for(&self, dir: &Utf8Path) -> Option<String> {
            dir.as_str()
                .strip_prefix("/app")
                .map(|rest| format!("app.com{rest}"))
        }
    }

    struct CountingParser {
        calls: Cell<usize>,
        packages: Vec<Package>,
    }

    impl Parser for CountingParser {
        fn parse(&self, dir: &Utf8Path) -> Result<Package, ParseError> {
            self.calls.set(self.calls.get() + 1);
            let import = MapModules.import_path_for(dir).unwrap();
            Ok(self
                .packages
                .iter()
                .find(|p| p.import == import)
                .cloned()
                .unwrap_or_else(|| {
                    Package::new(import, dir.file_name().unwrap_or("main"))
                }))
        }
    }

    fn alias_package(import: &str, name: &str, target: TypeRef) -> Package {
        let mut package = Package::new(import, import.rsplit('/').next().unwrap());
        package.aliases.push(AliasDecl {
            type_ref: TypeRef::new(import, name),
            target,
        });
        package
    }

    fn struct_package(import: &str, name: &str) -> Package {
        let mut package = Package::new(import, import.rsplit('/').next().unwrap());
        package.structs.push(crate::decl::StructDecl {
            type_ref: TypeRef::new(import, name),
            fields: Vec::new(),
        });
        package
    }

    #[test]
    fn packages_are_parsed_once_per_run() {
        let parser = CountingParser {
            calls: Cell::new(0),
            packages: vec![struct_package("app.com/web", "Web")],
        };
        let modules = MapModules;
        let mut index = DeclIndex::new(&parser, &modules);

        assert!(index.package("app.com/web").unwrap().is_some());
        assert!(index.package("app.com/web").unwrap().is_some());
        assert_eq!(parser.calls.get(), 1);

        // Empty parses are memoized as misses.
        assert!(index.package("app.com/empty").unwrap().is_none());
        assert!(index.package("app.com/empty").unwrap().is_none());
        assert_eq!(parser.calls.get(), 2);

        // Unlocatable imports never reach the parser.
        assert!(index.package("net/http").unwrap().is_none());
        assert_eq!(parser.calls.get(), 2);
    }

    #[test]
    fn lookup_follows_alias_chains_and_keeps_the_trail() {
        let parser = CountingParser {
            calls: Cell::new(0),
            packages: vec![
                alias_package(
                    "app.com/runtime/transpiler",
                    "Transpiler",
                    TypeRef::new("app.com/library/transpiler", "Transpiler"),
                ),
                struct_package("app.com/library/transpiler", "Transpiler"),
            ],
        };
        let modules = MapModules;
        let mut index = DeclIndex::new(&parser, &modules);

        let demand = TypeRef::new("app.com/runtime/transpiler", "*Transpiler");
        let resolved = index.lookup_type(&demand).unwrap().unwrap();
        assert_eq!(resolved.decl.kind(), Kind::Struct);
        assert_eq!(
            resolved.trail,
            vec![
                TypeRef::new("app.com/runtime/transpiler", "Transpiler"),
                TypeRef::new("app.com/library/transpiler", "Transpiler"),
            ]
        );
        assert_eq!(
            resolved.terminal(),
            &TypeRef::new("app.com/library/transpiler", "Transpiler")
        );
    }

    #[test]
    fn alias_chains_are_depth_limited() {
        // A self-referential source alias never terminates.
        let parser = CountingParser {
            calls: Cell::new(0),
            packages: vec![alias_package(
                "app.com/loop",
                "T",
                TypeRef::new("app.com/loop", "T"),
            )],
        };
        let modules = MapModules;
        let mut index = DeclIndex::new(&parser, &modules);

        let demand = TypeRef::new("app.com/loop", "T");
        let err = index.lookup_type(&demand).unwrap_err();
        assert_eq!(err.to_string(), "di: alias cycle for 'app.com/loop'.T");
    }
}
