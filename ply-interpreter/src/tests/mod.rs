//! Interpreter tests
//!
//! Programs are parsed and checked in host mode, then run with their
//! output captured.

use crate::error::RuntimeError;
use ply_parser::{parse_file, FileId};
use ply_typechecker::{check_package, Config};

mod test_errors;
mod test_formatting;
mod test_programs;
mod test_slices_and_maps;

/// Run a `package main` source and return what it printed
pub(crate) fn run_program(source: &str) -> String {
    let files = vec![parse_file(source, FileId(0), "main.go").expect("program should parse")];
    let table = check_package(&files, &Config::host()).expect("program should type-check");
    crate::run_to_string(&files, &table).expect("program should run")
}

/// Run a program that is expected to fail at runtime
pub(crate) fn run_failure(source: &str) -> RuntimeError {
    let files = vec![parse_file(source, FileId(0), "main.go").expect("program should parse")];
    let table = check_package(&files, &Config::host()).expect("program should type-check");
    crate::run_to_string(&files, &table).expect_err("program should fail")
}

/// Wrap statements in a main function that imports fmt
pub(crate) fn main_body(body: &str) -> String {
    format!("package main\n\nimport \"fmt\"\n\nfunc main() {{\n{body}\n}}\n")
}
