use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// One import the printed file needs: the path, the package's declared
/// name, and the qualifier the plan's bindings use. The qualifier differs
/// from the package name only when two packages share a name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Import {
    pub path: String,
    pub package: String,
    pub qualifier: String,
}

impl Import {
    pub fn aliased(&self) -> bool {
        self.qualifier != self.package
    }
}

/// Builds the import table for one plan. Paths register once; qualifiers
/// are deduplicated in registration order, so two packages both named
/// `comments` come out as `comments` and `comments1`.
#[derive(Debug)]
pub(crate) struct ImportTable {
    target: String,
    entries: IndexMap<String, Import>,
    taken: IndexMap<String, usize>,
}

impl ImportTable {
    pub(crate) fn new(target: impl Into<String>) -> Self {
        Self {
            target: target.into(),
            entries: IndexMap::new(),
            taken: IndexMap::new(),
        }
    }

    /// Registers a path and returns the qualifier to use for it. Types
    /// declared in the target package itself need no import and no
    /// qualifier.
    pub(crate) fn register(&mut self, path: &str, package: &str) -> Option<String> {
        if path.is_empty() || path == self.target {
            return None;
        }
        if let Some(import) = self.entries.get(path) {
            return Some(import.qualifier.clone());
        }
        let count = self.taken.entry(package.to_owned()).or_insert(0);
        let qualifier = if *count == 0 {
            package.to_owned()
        } else {
            format!("{package}{count}")
        };
        *count += 1;
        self.entries.insert(
            path.to_owned(),
            Import {
                path: path.to_owned(),
                package: package.to_owned(),
                qualifier: qualifier.clone(),
            },
        );
        Some(qualifier)
    }

    pub(crate) fn finish(self) -> Vec<Import> {
        self.entries.into_values().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn same_named_packages_get_distinct_qualifiers() {
        let mut table = ImportTable::new("app.com/gen/web");
        let first = table.register("app.com/comments", "comments").unwrap();
        let second = table.register("app.com/posts/comments", "comments").unwrap();
        assert_eq!(first, "comments");
        assert_eq!(second, "comments1");

        // Re-registration is idempotent.
        let again = table.register("app.com/posts/comments", "comments").unwrap();
        assert_eq!(again, "comments1");

        let imports = table.finish();
        assert_eq!(imports.len(), 2);
        assert!(!imports[0].aliased());
        assert!(imports[1].aliased());
    }

    #[test]
    fn the_target_package_is_never_imported() {
        let mut table = ImportTable::new("app.com/gen/web");
        assert!(table.register("app.com/gen/web", "web").is_none());
        assert!(table.register("", "main").is_none());
        assert!(table.finish().is_empty());
    }
}
