//! The compile, check and run pipelines behind each subcommand
//!
//! Every function takes `(path, source)` pairs so tests can drive them
//! without touching the filesystem.

use indexmap::IndexMap;
use miette::{Diagnostic, Result};
use ply_codegen::Options;
use ply_parser::{FileId, parse_file};
use ply_typechecker::{Config, check_package};
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Error, Diagnostic, Debug)]
pub enum DriverError {
    #[error("Failed to read {path}")]
    #[diagnostic(code(ply::cli::read))]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to write {path}")]
    #[diagnostic(code(ply::cli::write))]
    Write {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("No source files given")]
    #[diagnostic(code(ply::cli::no_input), help("pass one or more .ply or .go files"))]
    NoInput,
}

/// Read every path into a `(path, source)` pair
pub fn read_sources(paths: &[PathBuf]) -> Result<Vec<(String, String)>, DriverError> {
    if paths.is_empty() {
        return Err(DriverError::NoInput);
    }
    paths
        .iter()
        .map(|path| {
            let name = path.display().to_string();
            match fs::read_to_string(path) {
                Ok(source) => Ok((name, source)),
                Err(source) => Err(DriverError::Read { path: name, source }),
            }
        })
        .collect()
}

pub fn build(sources: &[(String, String)], options: &Options) -> Result<IndexMap<String, Vec<u8>>> {
    Ok(ply_codegen::compile(sources, options)?)
}

/// Write outputs under `dir`, keeping only each output's file name.
///
/// Returns the written paths in output order.
pub fn write_outputs(outputs: &IndexMap<String, Vec<u8>>, dir: &Path) -> Result<Vec<PathBuf>, DriverError> {
    fs::create_dir_all(dir).map_err(|source| DriverError::Write {
        path: dir.display().to_string(),
        source,
    })?;
    let mut written = Vec::with_capacity(outputs.len());
    for (path, contents) in outputs {
        let name = Path::new(path).file_name().map_or_else(|| path.into(), PathBuf::from);
        let target = dir.join(name);
        fs::write(&target, contents).map_err(|source| DriverError::Write {
            path: target.display().to_string(),
            source,
        })?;
        tracing::debug!(path = %target.display(), bytes = contents.len(), "wrote output");
        written.push(target);
    }
    Ok(written)
}

/// Print every output to `out`, each preceded by a comment naming its path
pub fn print_outputs(outputs: &IndexMap<String, Vec<u8>>, out: &mut dyn Write) -> Result<(), DriverError> {
    let failed = |source: std::io::Error| DriverError::Write {
        path: "<stdout>".to_string(),
        source,
    };
    for (path, contents) in outputs {
        writeln!(out, "// {path}").map_err(failed)?;
        out.write_all(contents).map_err(failed)?;
    }
    Ok(())
}

/// Parse and type-check the package with the dialect enabled.
///
/// Returns the number of checked expressions.
pub fn check(sources: &[(String, String)]) -> Result<usize> {
    let files = sources
        .iter()
        .enumerate()
        .map(|(index, (path, source))| parse_file(source, FileId(index as u32), path.as_str()))
        .collect::<Result<Vec<_>, _>>()?;
    let table = check_package(&files, &Config::default()).map_err(ply_codegen::CompileError::from)?;
    Ok(table.len())
}

/// The host package `ply run` executes: untouched host inputs followed by
/// every compiled output.
pub fn host_package(sources: &[(String, String)], options: &Options) -> Result<Vec<(String, String)>> {
    let outputs = build(sources, options)?;
    let mut package: Vec<(String, String)> = sources
        .iter()
        .filter(|(path, _)| !options.is_dialect(path))
        .cloned()
        .collect();
    for (path, contents) in outputs {
        package.push((path, String::from_utf8_lossy(&contents).into_owned()));
    }
    Ok(package)
}

/// Compile, re-check the result with the dialect disabled, then run `main`
pub fn run(sources: &[(String, String)], options: &Options, out: &mut dyn Write) -> Result<()> {
    let package = host_package(sources, options)?;
    let files = package
        .iter()
        .enumerate()
        .map(|(index, (path, source))| parse_file(source, FileId(index as u32), path.as_str()))
        .collect::<Result<Vec<_>, _>>()?;
    let table = check_package(&files, &Config::host())?;
    tracing::debug!(files = files.len(), "running host package");
    ply_interpreter::run(&files, &table, out)?;
    Ok(())
}
