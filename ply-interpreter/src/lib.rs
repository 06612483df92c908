//! Ply Interpreter
//!
//! Tree-walking evaluation of checked Ply host programs. The code generator's
//! output is run through here to compare specialized programs against the
//! behaviour their source promised.
//!
//! ## Architecture
//!
//! - **Values** (`value`): Go-style values with shared slice and map storage
//! - **Environment** (`environment`): lexical scopes of shared variable cells
//! - **Interpreter** (`interpreter`): statements and function calls
//! - **Evaluator** (`evaluator`): expressions and assignment
//! - **Built-ins** (`builtins`, `stdlib`): `len`, `append`, `make`, `copy`
//!   and the `fmt`, `sort` and `strings` packages

#![allow(clippy::result_large_err)]
#![allow(clippy::uninlined_format_args)]

mod builtins;
pub mod environment;
pub mod error;
mod evaluator;
pub mod interpreter;
mod stdlib;
pub mod value;

pub use error::{RuntimeError, RuntimeResult};
pub use interpreter::Interpreter;
pub use value::{format_float, Function, MapKey, MapValue, SliceValue, Value};

use ply_parser::File;
use ply_typechecker::TypeTable;
use std::io::Write;

/// Run the package's `main`, writing program output to `out`
pub fn run<'a>(files: &'a [File], table: &'a TypeTable, out: &'a mut dyn Write) -> RuntimeResult<()> {
    tracing::debug!(files = files.len(), "running package");
    Interpreter::new(files, table, out)?.run_main()
}

/// Run the package and return everything it printed
pub fn run_to_string(files: &[File], table: &TypeTable) -> RuntimeResult<String> {
    let mut out = Vec::new();
    run(files, table, &mut out)?;
    Ok(String::from_utf8_lossy(&out).into_owned())
}

#[cfg(test)]
mod tests;
