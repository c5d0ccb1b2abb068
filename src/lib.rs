//! weld — a compile-time dependency injector.
//!
//! Given a [`Function`] descriptor (name, target package, caller-supplied
//! parameters, required results, interface aliases) and two collaborators —
//! a [`Parser`] producing package declarations and a [`Modules`] resolver
//! mapping import paths to directories — weld resolves every transitive
//! dependency into an acyclic provider graph and emits a [`Plan`]: ordered,
//! named initialization steps plus the signature of a provider function a
//! code printer can render verbatim.
//!
//! ```no_run
//! # fn collaborators() -> (Box<dyn weld::Parser>, Box<dyn weld::Modules>) { unimplemented!() }
//! use weld::{Dependency, Function, Injector};
//!
//! let (parser, modules) = collaborators();
//! let mut function = Function::new("Load", "app.com/gen/web");
//! function.results.push(Dependency::to_type("app.com/web", "*Web"));
//! function.results.push(Dependency::Error);
//!
//! let injector = Injector::new(parser.as_ref(), modules.as_ref());
//! let plan = injector.load(&function)?;
//! println!("{} bindings", plan.bindings.len());
//! # Ok::<(), weld::Error>(())
//! ```
//!
//! Resolution is a one-shot computation: each call owns its memo tables and
//! holds only shared references to the collaborators, so independent runs
//! may proceed in parallel from separate threads.

mod injector;


pub use injector::Injector;

pub use weld_decls::{
    AliasDecl, DeclIndex, Field, FuncDecl, InterfaceDecl, MethodSig, Modules, Package, ParseError,
    Parser, StructDecl, TypeDecl,
};
pub use weld_plan::{Binding, BindingValue, Import, ParamSig, Plan, ResultSig, Signature};
pub use weld_resolve::Error;
pub use weld_types::{Aliases, Dependency, FieldDep, Function, Kind, Param, StructDep, TypeRef};
