use log::debug;
use weld_decls::{DeclIndex, FuncDecl, StructDecl};
use weld_types::{Dependency, Function, Kind, StructDep, TypeRef};

use crate::error::{CyclePath, Error};
use crate::graph::{Coercion, Graph, NodeId, Provider, ProviderKind};
use crate::select::{select, Candidate};

/// Depth-first, memoized construction of the provider graph for one
/// function descriptor.
///
/// Memoization keys are demanded type references; since the alias map is
/// constant for the duration of a run, a reference demanded from two places
/// resolves to one shared node. Constructor nodes are additionally memoized
/// under the reference they actually provide, so a value demand and a
/// pointer demand over the same constructor share the call and differ only
/// in a coercion wrapper.
pub struct Resolver<'a, 'i> {
    index: &'a mut DeclIndex<'i>,
    function: &'a Function,
    graph: Graph,
    memo: indexmap::IndexMap<TypeRef, NodeId>,
    stack: Vec<TypeRef>,
}

impl<'a, 'i> Resolver<'a, 'i> {
    pub fn new(index: &'a mut DeclIndex<'i>, function: &'a Function) -> Self {
        Self {
            index,
            function,
            graph: Graph::new(),
            memo: indexmap::IndexMap::new(),
            stack: Vec::new(),
        }
    }

    /// Resolves every result of the descriptor, returning the finished
    /// graph. Any error aborts the run; partial graphs are never returned.
    pub fn resolve(mut self) -> Result<Graph, Error> {
        for result in &self.function.results {
            match result {
                Dependency::Type(type_ref) => {
                    let id = self.demand(type_ref)?;
                    self.graph.add_root(id);
                }
                Dependency::Struct(dep) => {
                    let id = self.struct_dep(dep)?;
                    self.graph.add_root(id);
                }
                Dependency::Error => {}
            }
        }
        Ok(self.graph)
    }

    /// Satisfies one demand, reusing the shared node when the reference was
    /// resolved before and detecting cycles through the in-progress stack.
    fn demand(&mut self, type_ref: &TypeRef) -> Result<NodeId, Error> {
        if let Some(&id) = self.memo.get(type_ref) {
            return Ok(id);
        }
        if let Some(pos) = self.stack.iter().position(|t| t == type_ref) {
            let mut path = self.stack[pos..].to_vec();
            path.push(type_ref.clone());
            return Err(Error::Cycle {
                path: CyclePath(path),
            });
        }
        self.stack.push(type_ref.clone());
        let provided = self.provide(type_ref);
        self.stack.pop();
        let id = provided?;
        self.memo.insert(type_ref.clone(), id);
        Ok(id)
    }

    fn provide(&mut self, demand: &TypeRef) -> Result<NodeId, Error> {
        debug!("providing {demand}");
        match select(self.function, self.index, demand)? {
            Candidate::External { index } => Ok(self.graph.push(Provider::new(
                demand.clone(),
                ProviderKind::External { index },
            ))),
            Candidate::Redirect { target } => self.demand(&target),
            Candidate::Constructor { func, kind, trail } => {
                self.call(demand, func, kind, trail)
            }
            Candidate::Literal { decl, trail } => self.literal(demand, &decl, trail),
        }
    }

    /// Builds (or reuses) a constructor call, bridging a single level of
    /// pointer mismatch with a coercion node so both spellings share the
    /// underlying call.
    fn call(
        &mut self,
        demand: &TypeRef,
        func: FuncDecl,
        kind: Option<Kind>,
        trail: Vec<TypeRef>,
    ) -> Result<NodeId, Error> {
        let provided_pointer = func.provides().map(TypeRef::is_pointer).unwrap_or(false);
        let provided = demand.with_pointer(provided_pointer);

        let call_id = match self.memo.get(&provided) {
            Some(&id) => id,
            None => {
                let mut args = Vec::with_capacity(func.params.len());
                for param in &func.params {
                    args.push(self.demand(param)?);
                }
                let has_error = func.has_error;
                let id = self.graph.push(Provider::with_trail(
                    provided.clone(),
                    trail.clone(),
                    ProviderKind::Call {
                        func,
                        args,
                        has_error,
                    },
                ));
                self.memo.insert(provided.clone(), id);
                id
            }
        };

        if provided_pointer == demand.is_pointer() {
            return Ok(call_id);
        }
        // A one-level identity adjustment; only struct values can be
        // addressed or dereferenced by the emitted code.
        if kind != Some(Kind::Struct) {
            return Err(Error::UnclearProvider(demand.clone()));
        }
        let op = if demand.is_pointer() {
            Coercion::Ref
        } else {
            Coercion::Deref
        };
        Ok(self.graph.push(Provider::with_trail(
            demand.clone(),
            trail,
            ProviderKind::Coerce { inner: call_id, op },
        )))
    }

    /// Synthesizes a struct literal from a discovered declaration, resolving
    /// every field as a fresh demand.
    fn literal(
        &mut self,
        demand: &TypeRef,
        decl: &StructDecl,
        trail: Vec<TypeRef>,
    ) -> Result<NodeId, Error> {
        let mut fields = Vec::with_capacity(decl.fields.len());
        for field in &decl.fields {
            let child = self.field_demand(demand, &field.name, &field.type_ref)?;
            fields.push((field.name.clone(), child));
        }
        Ok(self.graph.push(Provider::with_trail(
            demand.clone(),
            trail,
            ProviderKind::Literal { fields },
        )))
    }

    /// Builds a literal from a caller-supplied field list, bypassing any
    /// constructor the owning package may have.
    fn struct_dep(&mut self, dep: &StructDep) -> Result<NodeId, Error> {
        if let Some(&id) = self.memo.get(&dep.type_ref) {
            return Ok(id);
        }
        let mut fields = Vec::with_capacity(dep.fields.len());
        for field in &dep.fields {
            let child = self.field_demand(&dep.type_ref, &field.name, &field.type_ref)?;
            fields.push((field.name.clone(), child));
        }
        let id = self.graph.push(Provider::new(
            dep.type_ref.clone(),
            ProviderKind::Literal { fields },
        ));
        self.memo.insert(dep.type_ref.clone(), id);
        Ok(id)
    }

    /// Resolves one literal field. A field whose type has no declaration
    /// anywhere is reported against the enclosing struct; richer failures
    /// (unclear interfaces, cycles) surface unchanged.
    fn field_demand(
        &mut self,
        owner: &TypeRef,
        field: &str,
        type_ref: &TypeRef,
    ) -> Result<NodeId, Error> {
        self.demand(type_ref).map_err(|err| match err {
            Error::TypeNotFound(_) => Error::FieldUnresolved {
                field: field.to_owned(),
                type_ref: owner.clone(),
                source: Box::new(err),
            },
            other => other,
        })
    }
}
