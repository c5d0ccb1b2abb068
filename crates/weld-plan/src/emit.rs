use indexmap::IndexMap;
use log::debug;
use weld_decls::{DeclIndex, ParseError};
use weld_resolve::{Coercion, Error, Graph, HoistedParam, NodeId, ProviderKind};
use weld_types::{Dependency, Function};

use crate::imports::ImportTable;
use crate::names::NameTable;
use crate::plan::{Binding, BindingValue, ParamSig, Plan, ResultSig, Signature};

/// Linearizes a resolved (and possibly hoisted) graph into a plan.
///
/// Bindings come out in ascending node-id order, which the graph guarantees
/// is a topological order; ties were already broken by resolution order, so
/// identical inputs produce identical plans. The single error result is
/// threaded here: a reachable fallible constructor demands a declared error
/// result, and a declared error result survives even when nothing can fail.
pub fn emit(
    graph: &Graph,
    function: &Function,
    hoisted: &[HoistedParam],
    index: &mut DeclIndex<'_>,
) -> Result<Plan, Error> {
    let reachable = graph.reachable();

    // Error threading over the post-hoist graph: obligations inside a
    // hoisted subtree moved to the caller along with the subtree.
    if !function.declares_error() {
        let failing = graph.iter().find(|(id, node)| {
            reachable[id.as_usize()]
                && matches!(node.kind, ProviderKind::Call { has_error: true, .. })
        });
        if let Some((_, node)) = failing {
            return Err(Error::ErrorUnexpected(node.display_ref()));
        }
    }

    let mut names = NameTable::new();
    let mut node_names: IndexMap<NodeId, String> = IndexMap::new();
    let mut params = Vec::with_capacity(function.params.len() + hoisted.len());

    for param in &function.params {
        params.push(ParamSig {
            name: names.fresh(param.type_ref.name()),
            type_ref: param.type_ref.clone(),
            hoisted: false,
        });
    }
    for (id, node) in graph.iter() {
        if let ProviderKind::External { index } = &node.kind {
            node_names.insert(id, params[*index].name.clone());
        }
    }
    for hp in hoisted {
        let name = names.fresh(hp.type_ref.name());
        node_names.insert(hp.node, name.clone());
        params.push(ParamSig {
            name,
            type_ref: hp.type_ref.clone(),
            hoisted: true,
        });
    }

    let mut bindings = Vec::new();
    for (id, node) in graph.iter() {
        if !reachable[id.as_usize()] {
            continue;
        }
        let value = match &node.kind {
            ProviderKind::External { .. } | ProviderKind::Hoisted { .. } => continue,
            ProviderKind::Call { func, args, .. } => BindingValue::Call {
                import: func.import.clone(),
                func: func.name.clone(),
                args: args.iter().map(|arg| node_names[arg].clone()).collect(),
            },
            ProviderKind::Literal { fields } => BindingValue::Literal {
                fields: fields
                    .iter()
                    .map(|(field, child)| (field.clone(), node_names[child].clone()))
                    .collect(),
            },
            ProviderKind::Coerce { inner, op } => {
                let inner = node_names[inner].clone();
                match op {
                    Coercion::Ref => BindingValue::Ref { inner },
                    Coercion::Deref => BindingValue::Deref { inner },
                }
            }
        };
        let type_ref = node.display_ref();
        let name = names.fresh(type_ref.name());
        let has_error = matches!(node.kind, ProviderKind::Call { has_error: true, .. });
        node_names.insert(id, name.clone());
        bindings.push(Binding {
            name,
            type_ref,
            value,
            has_error,
        });
    }
    debug!(
        "emitted {} bindings for {}",
        bindings.len(),
        function.name
    );

    let results = function
        .results
        .iter()
        .map(|dep| match dep {
            Dependency::Type(type_ref) => ResultSig::Value(type_ref.clone()),
            Dependency::Struct(dep) => ResultSig::Value(dep.type_ref.clone()),
            Dependency::Error => ResultSig::Error,
        })
        .collect();

    let mut imports = ImportTable::new(&function.target_import);
    for param in &params {
        register(&mut imports, index, param.type_ref.import())?;
    }
    for dep in &function.results {
        match dep {
            Dependency::Type(type_ref) => {
                register(&mut imports, index, type_ref.import())?;
            }
            Dependency::Struct(dep) => {
                register(&mut imports, index, dep.type_ref.import())?;
            }
            Dependency::Error => {}
        }
    }
    for binding in &bindings {
        register(&mut imports, index, binding.type_ref.import())?;
        if let BindingValue::Call { import, .. } = &binding.value {
            register(&mut imports, index, import)?;
        }
    }

    Ok(Plan {
        signature: Signature {
            name: function.name.clone(),
            target_import: function.target_import.clone(),
            params,
            results,
        },
        bindings,
        imports: imports.finish(),
    })
}

/// Registers one import path, naming it after the parsed package when the
/// index knows it and after the last path segment otherwise.
fn register(
    table: &mut ImportTable,
    index: &mut DeclIndex<'_>,
    path: &str,
) -> Result<(), ParseError> {
    if path.is_empty() {
        return Ok(());
    }
    let package = match index.package(path)? {
        Some(package) => package.name.clone(),
        None => path.rsplit('/').next().unwrap_or(path).to_owned(),
    };
    table.register(path, &package);
    Ok(())
}
