use indexmap::IndexSet;
use log::debug;
use weld_decls::{DeclIndex, FuncDecl, StructDecl, TypeDecl};
use weld_types::{Function, Kind, TypeRef};

use crate::error::Error;

/// The canonical constructor name; preferred when several constructors in
/// one package provide the same type.
const CANONICAL_CONSTRUCTOR: &str = "New";

/// How a demand can be satisfied, in priority order: an external input wins
/// over an alias redirection, which wins over a discovered constructor,
/// which wins over a synthesized struct literal.
#[derive(Debug, Clone)]
pub enum Candidate {
    /// The demand equals the type of a descriptor parameter, indirection
    /// included.
    External { index: usize },
    /// The demand is a key of the alias map; selection restarts on the
    /// redirected reference.
    Redirect { target: TypeRef },
    /// A receiver-less function providing the demanded type, found in the
    /// demand's own package or, through source aliases, the terminal one.
    Constructor {
        func: FuncDecl,
        kind: Option<Kind>,
        trail: Vec<TypeRef>,
    },
    /// The demand names a struct with no constructor; a literal can be
    /// assembled from its fields.
    Literal { decl: StructDecl, trail: Vec<TypeRef> },
}

/// Picks the highest-priority candidate for a demand, or fails with the
/// error the failed selection implies: `UnclearProvider` for interfaces and
/// constructor-less structs the resolver must not guess at, `TypeNotFound`
/// when the demand names nothing the index knows.
pub fn select(
    function: &Function,
    index: &mut DeclIndex<'_>,
    demand: &TypeRef,
) -> Result<Candidate, Error> {
    // External inputs short-circuit everything else.
    for (i, param) in function.params.iter().enumerate() {
        if param.type_ref == *demand {
            debug!("{demand} satisfied by param {i}");
            return Ok(Candidate::External { index: i });
        }
    }

    // Alias redirection, followed to a fixed point.
    if function.aliases.get(demand).is_some() {
        let target = follow_aliases(function, demand)?;
        debug!("{demand} redirected to {target}");
        return Ok(Candidate::Redirect { target });
    }

    let resolved = index.lookup_type(demand)?;
    let (terminal, kind, trail) = match &resolved {
        Some(res) => (
            res.terminal().clone(),
            Some(res.decl.kind()),
            if res.trail.len() > 1 {
                res.trail.clone()
            } else {
                Vec::new()
            },
        ),
        None => (demand.as_value(), None, Vec::new()),
    };

    // A constructor in the demand's own package, or in the terminal package
    // when a source alias redirects there.
    let mut ctors = constructors_in(index, demand)?;
    if ctors.is_empty() && terminal != demand.as_value() {
        ctors = constructors_in(index, &terminal)?;
    }
    if !ctors.is_empty() {
        let func = disambiguate(demand, ctors)?;
        debug!("{demand} satisfied by constructor {}.{}", func.import, func.name);
        return Ok(Candidate::Constructor { func, kind, trail });
    }

    match resolved.map(|res| res.decl) {
        Some(TypeDecl::Struct(decl)) => {
            // Implicit literals are only synthesized when every field is
            // exported; otherwise the struct guards its invariants and the
            // resolver refuses to guess.
            if decl.fields.iter().any(|field| !field.exported) {
                return Err(Error::UnclearProvider(demand.clone()));
            }
            debug!("{demand} satisfied by struct literal");
            Ok(Candidate::Literal { decl, trail })
        }
        Some(TypeDecl::Interface(_)) => Err(Error::UnclearProvider(demand.clone())),
        Some(TypeDecl::Alias(_)) | None => Err(Error::TypeNotFound(demand.clone())),
    }
}

fn constructors_in(
    index: &mut DeclIndex<'_>,
    type_ref: &TypeRef,
) -> Result<Vec<FuncDecl>, Error> {
    let Some(package) = index.package(type_ref.import())? else {
        return Ok(Vec::new());
    };
    Ok(package.constructors_of(type_ref).cloned().collect())
}

fn disambiguate(demand: &TypeRef, mut ctors: Vec<FuncDecl>) -> Result<FuncDecl, Error> {
    if ctors.len() == 1 {
        return Ok(ctors.swap_remove(0));
    }
    let mut canonical = ctors.iter().filter(|f| f.name == CANONICAL_CONSTRUCTOR);
    match (canonical.next(), canonical.next()) {
        (Some(func), None) => Ok(func.clone()),
        _ => Err(Error::AmbiguousConstructor(demand.clone())),
    }
}

/// Chases the caller's alias map to its fixed point, erroring on loops.
fn follow_aliases(function: &Function, demand: &TypeRef) -> Result<TypeRef, Error> {
    let mut seen: IndexSet<TypeRef> = IndexSet::new();
    seen.insert(demand.clone());
    let mut current = match function.aliases.get(demand) {
        Some(target) => target.clone(),
        None => return Ok(demand.clone()),
    };
    loop {
        if !seen.insert(current.clone()) {
            return Err(Error::AliasCycle(demand.clone()));
        }
        match function.aliases.get(&current) {
            Some(next) => current = next.clone(),
            None => return Ok(current),
        }
    }
}

#[cfg(test)]
mod tests {
    use camino::{Utf8Path, Utf8PathBuf};
    use weld_decls::{Field, Modules, Package, ParseError, Parser, StructDecl};
    use weld_types::{Aliases, Param};

    use super::*;

    struct OnePackage(Package);

    impl Parser for OnePackage {
        fn parse(&self, _dir: &Utf8Path) -> Result<Package, ParseError> {
            Ok(self.0.clone())
        }
    }

    struct AnyDir;

    impl Modules for AnyDir {
        fn directory_for(&self, import: &str) -> Option<Utf8PathBuf> {
            import
                .strip_prefix("app.com")
                .map(|rest| Utf8PathBuf::from(format!("/app{rest}")))
        }

        fn import_path_for(&self, _dir: &Utf8Path) -> Option<String> {
            None
        }
    }

    fn middleware_package() -> Package {
        let import = "app.com/web";
        let mut package = Package::new(import, "web");
        package.structs.push(StructDecl {
            type_ref: TypeRef::new(import, "Middleware"),
            fields: vec![Field {
                name: "v".to_owned(),
                type_ref: TypeRef::new("", "string"),
                embedded: false,
                exported: false,
            }],
        });
        package.funcs.push(FuncDecl {
            import: import.to_owned(),
            name: "Middlewares".to_owned(),
            receiver: None,
            params: Vec::new(),
            results: vec![TypeRef::new(import, "*Middleware")],
            has_error: false,
        });
        package
    }

    #[test]
    fn external_inputs_win_over_constructors() {
        let parser = OnePackage(middleware_package());
        let modules = AnyDir;
        let mut index = DeclIndex::new(&parser, &modules);

        let demand = TypeRef::new("app.com/web", "*Middleware");
        let mut function = Function::new("Load", "app.com/gen/web");
        function.params.push(Param::new(demand.clone()));

        let candidate = select(&function, &mut index, &demand).unwrap();
        assert!(matches!(candidate, Candidate::External { index: 0 }));
    }

    #[test]
    fn constructors_beat_struct_literals() {
        let parser = OnePackage(middleware_package());
        let modules = AnyDir;
        let mut index = DeclIndex::new(&parser, &modules);

        let function = Function::new("Load", "app.com/gen/web");
        let demand = TypeRef::new("app.com/web", "*Middleware");
        let candidate = select(&function, &mut index, &demand).unwrap();
        match candidate {
            Candidate::Constructor { func, kind, .. } => {
                assert_eq!(func.name, "Middlewares");
                assert_eq!(kind, Some(Kind::Struct));
            }
            other => panic!("expected a constructor, got {other:?}"),
        }
    }

    #[test]
    fn unexported_fields_block_implicit_literals() {
        // Same package, minus the constructor: the unexported field keeps
        // the literal off the table.
        let mut package = middleware_package();
        package.funcs.clear();
        let parser = OnePackage(package);
        let modules = AnyDir;
        let mut index = DeclIndex::new(&parser, &modules);

        let function = Function::new("Load", "app.com/gen/web");
        let demand = TypeRef::new("app.com/web", "*Middleware");
        let err = select(&function, &mut index, &demand).unwrap_err();
        assert_eq!(
            err.to_string(),
            "di: unclear how to provide 'app.com/web'.*Middleware"
        );
    }

    #[test]
    fn alias_chains_reach_a_fixed_point() {
        let mut function = Function::new("Load", "app.com/gen/web");
        function.aliases = Aliases::from_iter([
            (
                TypeRef::new("app.com/a", "A"),
                TypeRef::new("app.com/b", "B"),
            ),
            (
                TypeRef::new("app.com/b", "B"),
                TypeRef::new("app.com/c", "*C"),
            ),
        ]);

        let target = follow_aliases(&function, &TypeRef::new("app.com/a", "A")).unwrap();
        assert_eq!(target, TypeRef::new("app.com/c", "*C"));
    }

    #[test]
    fn alias_loops_are_reported_on_the_original_demand() {
        let mut function = Function::new("Load", "app.com/gen/web");
        function.aliases = Aliases::from_iter([
            (
                TypeRef::new("app.com/a", "A"),
                TypeRef::new("app.com/b", "B"),
            ),
            (
                TypeRef::new("app.com/b", "B"),
                TypeRef::new("app.com/a", "A"),
            ),
        ]);

        let err = follow_aliases(&function, &TypeRef::new("app.com/a", "A")).unwrap_err();
        assert_eq!(err.to_string(), "di: alias cycle for 'app.com/a'.A");
    }

    #[test]
    fn two_plain_constructors_are_ambiguous_unless_one_is_canonical() {
        let import = "app.com/m";
        let ctor = |name: &str| FuncDecl {
            import: import.to_owned(),
            name: name.to_owned(),
            receiver: None,
            params: Vec::new(),
            results: vec![TypeRef::new(import, "*M")],
            has_error: false,
        };
        let demand = TypeRef::new(import, "*M");

        let err = disambiguate(&demand, vec![ctor("Alpha"), ctor("Beta")]).unwrap_err();
        assert_eq!(err.to_string(), "di: ambiguous constructors for 'app.com/m'.*M");

        let func = disambiguate(&demand, vec![ctor("Alpha"), ctor("New")]).unwrap();
        assert_eq!(func.name, "New");
    }
}
