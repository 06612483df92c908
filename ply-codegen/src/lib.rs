//! Ply Code Generator
//!
//! Specializes the generic collection operations of the Ply dialect into
//! plain host-language code. Each dialect file is type-checked together with
//! the rest of its package, then walked by a [`Specializer`] that replaces
//! every generic call with a call to a monomorphized declaration.
//!
//! ## Architecture
//!
//! - **Registry** (`registry`): static generator tables for free-function and
//!   method-style generics
//! - **Pipeline** (`pipeline`): detection and fusion of chained method calls
//! - **Specializer** (`specializer`): the per-file rewriting walk
//! - **Synthetic package** (`synthetic`): generated declarations, unique by name
//! - **Merge** (`merge`): one generated unit for the whole compile

#![allow(clippy::result_large_err)]

mod error;
pub mod mangle;
pub mod merge;
mod options;
pub mod pipeline;
pub mod registry;
pub mod specializer;
pub mod synthetic;

pub use error::{CompileError, CompileResult};
pub use options::Options;
pub use pipeline::{PipelinePlan, Rejection};
pub use registry::{CallRewrite, Generator, Specialization};
pub use specializer::Specializer;
pub use synthetic::{ImportSet, SyntheticPackage};

use indexmap::IndexMap;
use ply_parser::{parse_file, print_file, FileId};
use ply_typechecker::{check_package, Config};

/// Compile one package with the standard importer.
///
/// `sources` are `(path, source)` pairs. Files with the dialect extension are
/// rewritten; all files are checked together. The result maps each output
/// path to its source: one rewritten file per dialect input, then the file of
/// generated declarations. Without dialect files the result is empty.
pub fn compile(sources: &[(String, String)], options: &Options) -> CompileResult<IndexMap<String, Vec<u8>>> {
    compile_with(sources, options, &Config::default())
}

/// [`compile`] with an explicit checker configuration
pub fn compile_with(
    sources: &[(String, String)],
    options: &Options,
    config: &Config,
) -> CompileResult<IndexMap<String, Vec<u8>>> {
    let mut files = Vec::with_capacity(sources.len());
    for (index, (path, source)) in sources.iter().enumerate() {
        files.push(parse_file(source, FileId(index as u32), path.as_str())?);
    }

    let dialect: Vec<usize> = sources
        .iter()
        .enumerate()
        .filter(|(_, (path, _))| options.is_dialect(path))
        .map(|(index, _)| index)
        .collect();
    let Some(&first) = dialect.first() else {
        tracing::info!(files = sources.len(), "no dialect files to compile");
        return Ok(IndexMap::new());
    };

    let table = check_package(&files, config)?;

    let mut outputs = IndexMap::new();
    let mut parts = Vec::with_capacity(dialect.len());
    for &index in &dialect {
        let mut file = files[index].clone();
        let package = file.package.name.clone();
        let (synthetic, imports) = Specializer::new(&table, &package).specialize(&mut file);
        outputs.insert(options.output_path(&sources[index].0), print_file(&file).into_bytes());
        parts.push((synthetic, imports));
    }

    let merged = merge::merge(&files[first].package.name, parts);
    tracing::info!(
        rewritten = dialect.len(),
        declarations = merged.decls.len(),
        imports = merged.imports.len(),
        "compiled package"
    );
    outputs.insert(options.impls_path(&sources[first].0), print_file(&merged).into_bytes());
    Ok(outputs)
}

#[cfg(test)]
mod tests;
