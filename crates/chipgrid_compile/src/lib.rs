//! Compiles a chip design into program text.
//!
//! The input is a [`ChipSource`]: a root chip and the definitions of the
//! types it uses. Compilation runs in stages:
//!
//! 1. **Checks**: the root must be a custom type in the source, every type
//!    reachable through wired children must be known, and the type graph
//!    must be acyclic.
//! 2. **Ordering**: within each type, wired children are scored by how far
//!    they sit from the type's inputs and emitted in ascending score order.
//! 3. **Emission**: standard children render their code template with
//!    instance-qualified variable names, custom children call the compiled
//!    object of their type, and every wire becomes an assignment.
//! 4. **Assembly**: one block per custom type, dependencies first, wrapped in
//!    the program template.
//!
//! The output targets a JavaScript host. Nothing here evaluates it.
//!
//! [`ChipSource`]: chipgrid_ir::ChipSource

#![warn(missing_docs)]

pub mod codes;
pub mod compiler;
pub mod deps;
pub mod emit;
pub mod error;
pub mod ident;
pub mod order;
pub mod templates;

pub use compiler::{CompileSettings, CompiledProgram, CompiledType, Compiler};
pub use error::CompileError;
pub use templates::Templates;
