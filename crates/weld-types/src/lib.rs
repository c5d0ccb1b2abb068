//! Value types shared across the weld workspace: type references, dependency
//! slots and the function descriptor that callers hand to the injector.

pub mod dependency;
pub mod function;
pub mod typeref;

pub mod prelude {
    pub use crate::dependency::{Dependency, FieldDep, StructDep};
    pub use crate::function::{Aliases, Function, Param};
    pub use crate::typeref::{Kind, TypeRef};
}

pub use dependency::{Dependency, FieldDep, StructDep};
pub use function::{Aliases, Function, Param};
pub use typeref::{Kind, TypeRef};
