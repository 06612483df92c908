//! Code generator tests
//!
//! Most tests compile a dialect program, re-check the output as a plain
//! host package and run it, so a rewrite is only accepted if the program
//! still type-checks and prints what the source promised.

use crate::{compile, Options};
use indexmap::IndexMap;
use ply_parser::{parse_file, Decl, Expr, File, FileId, StmtKind};
use ply_typechecker::{check_package, Config, TypeTable};

mod test_compile;
mod test_errors;
mod test_fusion;
mod test_mangle;
mod test_synthetic;

/// Compile `(path, source)` pairs and return the outputs as text
pub(crate) fn compile_sources(sources: &[(&str, &str)]) -> IndexMap<String, String> {
    let sources: Vec<(String, String)> = sources
        .iter()
        .map(|(path, source)| (path.to_string(), source.to_string()))
        .collect();
    compile(&sources, &Options::default())
        .expect("program should compile")
        .into_iter()
        .map(|(path, bytes)| (path, String::from_utf8(bytes).expect("output is UTF-8")))
        .collect()
}

/// Compile a single `main.ply`
pub(crate) fn compile_main(source: &str) -> IndexMap<String, String> {
    compile_sources(&[("main.ply", source)])
}

/// Parse and host-check compiled outputs, then run them
pub(crate) fn run_outputs(outputs: &IndexMap<String, String>) -> String {
    let files: Vec<File> = outputs
        .iter()
        .enumerate()
        .map(|(i, (path, source))| {
            parse_file(source, FileId(i as u32), path.as_str())
                .unwrap_or_else(|err| panic!("{path} does not parse: {err}\n{source}"))
        })
        .collect();
    let table = check_package(&files, &Config::host())
        .unwrap_or_else(|err| panic!("output does not type-check: {err}\n{outputs:#?}"));
    ply_interpreter::run_to_string(&files, &table).expect("output should run")
}

/// Names of the declarations in the generated file
pub(crate) fn generated_decls(outputs: &IndexMap<String, String>) -> Vec<String> {
    let source = &outputs["ply_impls.go"];
    let file = parse_file(source, FileId(0), "ply_impls.go").expect("generated file parses");
    file.decls.iter().map(|decl| decl.name().to_string()).collect()
}

/// Parse and check a dialect source without rewriting it
pub(crate) fn check_dialect(source: &str) -> (File, TypeTable) {
    let file = parse_file(source, FileId(0), "main.ply").expect("source should parse");
    let files = vec![file];
    let table = check_package(&files, &Config::default()).expect("source should type-check");
    let [file] = <[File; 1]>::try_from(files).expect("one file");
    (file, table)
}

/// The value of `name := ...` inside `func main`
pub(crate) fn short_var<'f>(file: &'f File, name: &str) -> &'f Expr {
    let main = file
        .decls
        .iter()
        .find_map(|decl| match decl {
            Decl::Func(func) if func.name.name == "main" => Some(func),
            _ => None,
        })
        .expect("file declares main");
    main.body
        .stmts
        .iter()
        .find_map(|stmt| match &stmt.kind {
            StmtKind::ShortVar { name: var, value } if var.name == name => Some(value),
            _ => None,
        })
        .unwrap_or_else(|| panic!("no `{name} :=` in main"))
}

/// Shared declarations for dialect programs
pub(crate) const PRELUDE: &str = r#"
package main

import "fmt"

func isEven(n int) bool {
    return n%2 == 0
}

func square(n int) int {
    return n * n
}
"#;

/// `PRELUDE` followed by a main function with `body`
pub(crate) fn program(body: &str) -> String {
    format!("{PRELUDE}\nfunc main() {{\n{body}\n}}\n")
}
