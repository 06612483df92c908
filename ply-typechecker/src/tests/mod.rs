//! Type checker tests

use crate::*;
use ply_parser::{parse_file, Decl, Expr, File, FileId, StmtKind};

mod test_constants;
mod test_errors;

/// Parse and check a single file with the dialect enabled
pub(crate) fn check(src: &str) -> (File, CheckResult<TypeTable>) {
    check_with(src, &Config::default())
}

pub(crate) fn check_with(src: &str, config: &Config) -> (File, CheckResult<TypeTable>) {
    let file = parse_file(src, FileId(0), "main.ply").expect("test source should parse");
    let result = check_package(std::slice::from_ref(&file), config);
    (file, result)
}

/// Initializer of the `name := ...` statement at the top level of `func main`
pub(crate) fn short_var<'a>(file: &'a File, name: &str) -> &'a Expr {
    let main = file
        .decls
        .iter()
        .find_map(|decl| match decl {
            Decl::Func(func) if func.name.name == "main" => Some(func),
            _ => None,
        })
        .expect("file should declare main");
    main.body
        .stmts
        .iter()
        .find_map(|stmt| match &stmt.kind {
            StmtKind::ShortVar { name: var, value } if var.name == name => Some(value),
            _ => None,
        })
        .unwrap_or_else(|| panic!("main should declare {name}"))
}
