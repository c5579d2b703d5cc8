//! Lowering of a parsed cyrus program into an LLVM module
//!
//! [`CodeGenerator`] walks the top-level statements in source order and
//! fills one [`inkwell::module::Module`] together with the module's
//! function, global and type tables. The first error aborts the walk.

#![allow(
    clippy::multiple_inherent_impl,
    reason = "CodeGenerator lowering is split by syntax category across modules"
)]

mod error;
mod exprs;
mod functions;
mod generator;
mod globals;
mod scope;
mod stmts;
mod types;
mod values;

#[cfg(test)]
mod test_utils;

pub use error::{CodegenError, ErrorKind, Result};
pub use generator::{CodeGenerator, FunctionRecord, GlobalRecord, Scope, Variadic};
pub use scope::{ScopeData, ScopeId, ScopeTree};
pub use types::{CodegenKind, CodegenType, TypeTable};
pub use values::{EValue, EValueRef, Literal, ValueCategory};
