use crate::*;
use pretty_assertions::assert_eq;

fn body(source: &str) -> Vec<Stmt> {
    let source = format!("package main\nfunc f() {{\n{}\n}}", source);
    let file = parse_file(&source, FileId(0), "test.ply").unwrap();
    match file.decls.into_iter().next() {
        Some(Decl::Func(func)) => func.body.stmts,
        _ => panic!("expected function"),
    }
}

#[test]
fn test_simple_statements() {
    let stmts = body("x := 1\nx += 2\nx++\nys[0] = x\nvar z int\nconst k = 3\nprintln(x)");

    assert!(matches!(stmts[0].kind, StmtKind::ShortVar { .. }));
    assert!(matches!(stmts[1].kind, StmtKind::Assign { op: AssignOp::Add, .. }));
    assert!(matches!(stmts[2].kind, StmtKind::IncDec { increment: true, .. }));
    assert!(matches!(stmts[3].kind, StmtKind::Assign { op: AssignOp::Assign, .. }));
    assert!(matches!(stmts[4].kind, StmtKind::Var(_)));
    assert!(matches!(stmts[5].kind, StmtKind::Const(_)));
    assert!(matches!(stmts[6].kind, StmtKind::Expr(_)));
}

#[test]
fn test_semicolons_are_optional() {
    let stmts = body("a := 1; b := 2;; c := a + b");
    assert_eq!(stmts.len(), 3);
}

#[test]
fn test_if_else_chain() {
    let stmts = body("if x > 1 { return } else if x < 0 { x = 0 } else { x-- }");

    let StmtKind::If(if_stmt) = &stmts[0].kind else {
        panic!("expected if");
    };
    let Some(branch) = &if_stmt.else_branch else {
        panic!("expected else");
    };
    let ElseBranch::If(nested) = branch.as_ref() else {
        panic!("expected else if");
    };
    assert!(matches!(
        nested.else_branch.as_deref(),
        Some(ElseBranch::Block(_))
    ));
}

#[test]
fn test_for_forms() {
    let stmts = body(
        "for { break }\nfor i < 3 { i++ }\nfor i := 0; i < 3; i++ { continue }\nfor _, v := range xs { total += v }\nfor k := range m {}\nfor range xs {}",
    );

    let StmtKind::For(infinite) = &stmts[0].kind else {
        panic!("expected for");
    };
    assert!(infinite.cond.is_none() && infinite.init.is_none());

    let StmtKind::For(while_loop) = &stmts[1].kind else {
        panic!("expected for");
    };
    assert!(while_loop.cond.is_some() && while_loop.init.is_none());

    let StmtKind::For(counted) = &stmts[2].kind else {
        panic!("expected for");
    };
    assert!(counted.init.is_some() && counted.post.is_some());

    let StmtKind::Range(range) = &stmts[3].kind else {
        panic!("expected range");
    };
    assert_eq!(range.key.as_ref().unwrap().name, "_");
    assert_eq!(range.value.as_ref().unwrap().name, "v");

    let StmtKind::Range(keys) = &stmts[4].kind else {
        panic!("expected range");
    };
    assert!(keys.value.is_none());

    let StmtKind::Range(bare) = &stmts[5].kind else {
        panic!("expected range");
    };
    assert!(bare.key.is_none());
}

#[test]
fn test_composite_literal_in_range_header() {
    let stmts = body("for _, v := range []int{1, 2} { println(v) }");
    let StmtKind::Range(range) = &stmts[0].kind else {
        panic!("expected range");
    };
    assert!(matches!(range.iterable.kind, ExprKind::Composite(_)));
}
