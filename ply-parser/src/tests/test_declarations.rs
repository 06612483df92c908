use crate::*;
use pretty_assertions::assert_eq;

fn parse(source: &str) -> File {
    parse_file(source, FileId(0), "test.ply").unwrap()
}

#[test]
fn test_package_and_imports() {
    let file = parse(
        r#"
package main

import "sort"
import (
    "fmt"
    "strings"
)
"#,
    );

    assert_eq!(file.package.name, "main");
    let paths: Vec<_> = file.imports.iter().map(|i| i.path.as_str()).collect();
    assert_eq!(paths, vec!["sort", "fmt", "strings"]);
    assert_eq!(file.name.as_deref(), Some("test.ply"));
}

#[test]
fn test_function_with_grouped_params() {
    let file = parse("package main\nfunc add(a, b int, rest ...int) int { return a + b }");

    let Decl::Func(func) = &file.decls[0] else {
        panic!("expected function declaration");
    };
    assert_eq!(func.name.name, "add");
    assert!(func.receiver.is_none());
    let params: Vec<_> = func
        .signature
        .params
        .iter()
        .map(|p| (p.name.name.as_str(), p.variadic))
        .collect();
    assert_eq!(params, vec![("a", false), ("b", false), ("rest", true)]);
    assert_eq!(
        func.signature.result.as_ref().map(|t| t.to_string()),
        Some("int".to_string())
    );
}

#[test]
fn test_method_declaration() {
    let file = parse(
        "package main\ntype Names []string\nfunc (n Names) sort() Names { return n }",
    );

    assert_eq!(file.decls.len(), 2);
    let Decl::Func(func) = &file.decls[1] else {
        panic!("expected method declaration");
    };
    let receiver = func.receiver.as_ref().unwrap();
    assert_eq!(receiver.name.name, "n");
    assert_eq!(receiver.ty.to_string(), "Names");
    assert_eq!(func.name.name, "sort");
}

#[test]
fn test_type_declarations() {
    let file = parse(
        r#"package main
type Ints []int
type Index map[string][]int
type Pred func(int) bool
type Point struct {
    x int
    y int
}
type Any interface{}
"#,
    );

    let rendered: Vec<_> = file.decls.iter().map(|d| d.to_string()).collect();
    assert_eq!(
        rendered,
        vec![
            "type Ints []int",
            "type Index map[string][]int",
            "type Pred func(int) bool",
            "type Point struct { x int; y int }",
            "type Any interface{}",
        ]
    );
}

#[test]
fn test_const_and_var_declarations() {
    let file = parse("package main\nconst limit = 10\nvar total int\nvar name string = \"x\"\nvar ys = []int{1}");

    let names: Vec<_> = file.decls.iter().map(|d| d.name()).collect();
    assert_eq!(names, vec!["limit", "total", "name", "ys"]);

    let Decl::Var(total) = &file.decls[1] else {
        panic!("expected var");
    };
    assert!(total.value.is_none());
    assert_eq!(total.ty.as_ref().unwrap().to_string(), "int");
}

#[test]
fn test_keywords_are_not_identifier_prefixes() {
    let file = parse("package main\nfunc format(forward int, imported int) int { return forward + imported }");
    assert_eq!(file.decls[0].name(), "format");
}

#[test]
fn test_expression_ids_are_unique_within_file() {
    let file = parse("package main\nfunc f() int { return 1 + 2 * 3 }");
    let Decl::Func(func) = &file.decls[0] else {
        panic!("expected function");
    };
    let StmtKind::Return(Some(expr)) = &func.body.stmts[0].kind else {
        panic!("expected return");
    };

    let mut ids = Vec::new();
    collect_ids(expr, &mut ids);
    let count = ids.len();
    ids.sort();
    ids.dedup();
    assert_eq!(ids.len(), count);
    assert_eq!(count, 5);
    assert!(ids.iter().all(|id| id.file == FileId(0)));
}

fn collect_ids(expr: &Expr, ids: &mut Vec<ExprId>) {
    ids.push(expr.id);
    if let ExprKind::Binary(binary) = &expr.kind {
        collect_ids(&binary.left, ids);
        collect_ids(&binary.right, ids);
    }
}
