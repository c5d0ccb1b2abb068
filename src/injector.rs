use camino::Utf8Path;
use log::debug;
use weld_decls::{DeclIndex, Modules, Parser};
use weld_plan::{emit, Plan};
use weld_resolve::{hoist, Error, Resolver};
use weld_types::Function;

/// The injector front door: owns nothing, borrows the two collaborators and
/// runs one-shot resolutions against them.
pub struct Injector<'a> {
    parser: &'a dyn Parser,
    modules: &'a dyn Modules,
}

impl<'a> Injector<'a> {
    pub fn new(parser: &'a dyn Parser, modules: &'a dyn Modules) -> Self {
        Self { parser, modules }
    }

    /// Resolves a descriptor into a plan, or the first fatal error.
    ///
    /// One call is one run: the declaration cache lives and dies here, and
    /// identical inputs yield byte-identical plans.
    pub fn load(&self, function: &Function) -> Result<Plan, Error> {
        debug!("loading {} for {}", function.name, function.target_import);
        let mut index = DeclIndex::new(self.parser, self.modules);
        let mut graph = Resolver::new(&mut index, function).resolve()?;
        let hoisted = hoist(&mut graph, function);
        emit(&graph, function, &hoisted, &mut index)
    }

    /// Like [`load`](Self::load), but with the target spelled as a
    /// directory; the module resolver maps it back to an import path.
    pub fn load_dir(&self, dir: &Utf8Path, function: &Function) -> Result<Plan, Error> {
        let target = self
            .modules
            .import_path_for(dir)
            .ok_or_else(|| Error::TargetNotFound(dir.to_owned()))?;
        let function = Function {
            target_import: target,
            ..function.clone()
        };
        self.load(&function)
    }
}
