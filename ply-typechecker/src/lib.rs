//! Ply Type Checker
//!
//! Static checking for the Ply host language, with the generic collection
//! built-ins of the dialect enabled through [`Config::dialect`].
//!
//! ## Architecture
//!
//! - **Types** (`types`): structural types plus declared named types
//! - **Constants** (`constant`): untyped constant values and folding
//! - **Type table** (`table`): per-expression types, constant values and
//!   selector resolutions, keyed by [`ply_parser::ExprId`]
//! - **Importer** (`importer`): pluggable package resolution
//! - **Checker** (`checker`): phase-ordered checking of a whole package

#![allow(clippy::result_large_err)]
#![allow(clippy::uninlined_format_args)]

mod checker;
pub mod config;
pub mod constant;
pub mod error;
pub mod importer;
pub mod table;
pub mod types;

pub use checker::GENERIC_METHODS;
pub use config::Config;
pub use constant::ConstValue;
pub use error::{CheckError, CheckResult};
pub use importer::{ImportError, Importer, Package, StdImporter};
pub use table::{Mode, NamedType, Selection, TypeAndValue, TypeTable};
pub use types::{BasicKind, Field, FuncType, Type};

use ply_parser::File;

/// Type-check all files of one package together.
///
/// Imports are resolved before any declaration is checked, so an unknown
/// import is reported even when the file has other errors.
pub fn check_package(files: &[File], config: &Config) -> CheckResult<TypeTable> {
    tracing::debug!(files = files.len(), dialect = config.dialect, "checking package");
    let table = checker::Checker::new(files, config).check()?;
    tracing::debug!(expressions = table.len(), "package checked");
    Ok(table)
}

#[cfg(test)]
mod tests;
