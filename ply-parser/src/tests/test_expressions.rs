use crate::*;
use pretty_assertions::assert_eq;

#[test]
fn test_binary_precedence() {
    let expr = parse_expression("1 + 2 * 3 == 7 && !done").unwrap();

    let ExprKind::Binary(and) = &expr.kind else {
        panic!("expected &&");
    };
    assert_eq!(and.op, BinaryOp::And);
    let ExprKind::Binary(eq) = &and.left.kind else {
        panic!("expected ==");
    };
    assert_eq!(eq.op, BinaryOp::Eq);
    let ExprKind::Binary(add) = &eq.left.kind else {
        panic!("expected +");
    };
    assert_eq!(add.op, BinaryOp::Add);
    assert!(matches!(add.right.kind, ExprKind::Binary(BinaryExpr { op: BinaryOp::Mul, .. })));
    assert!(matches!(and.right.kind, ExprKind::Unary(UnaryExpr { op: UnaryOp::Not, .. })));
}

#[test]
fn test_left_associative_subtraction() {
    let expr = parse_expression("10 - 3 - 2").unwrap();
    let ExprKind::Binary(outer) = &expr.kind else {
        panic!("expected binary");
    };
    assert!(matches!(outer.left.kind, ExprKind::Binary(_)));
    assert_eq!(outer.right.kind, ExprKind::Int(2));
}

#[test]
fn test_method_chain() {
    let expr = parse_expression("xs.filter(isEven).map(square).sum()").unwrap();

    let call = expr.as_call().unwrap();
    let (receiver, method) = call.method().unwrap();
    assert_eq!(method.name, "sum");
    assert!(call.args.is_empty());

    let inner = receiver.as_call().unwrap();
    let (receiver, method) = inner.method().unwrap();
    assert_eq!(method.name, "map");
    assert_eq!(inner.args[0].as_ident(), Some("square"));

    let innermost = receiver.as_call().unwrap();
    let (receiver, method) = innermost.method().unwrap();
    assert_eq!(method.name, "filter");
    assert_eq!(receiver.as_ident(), Some("xs"));
}

#[test]
fn test_keyword_selector() {
    let expr = parse_expression("m.range(1)").unwrap();
    let (_, method) = expr.as_call().unwrap().method().unwrap();
    assert_eq!(method.name, "range");
}

#[test]
fn test_variadic_spread_call() {
    let expr = parse_expression("append(xs, ys...)").unwrap();
    let call = expr.as_call().unwrap();
    assert!(call.ellipsis);
    assert_eq!(call.args.len(), 2);
}

#[test]
fn test_index_and_slice() {
    let expr = parse_expression("xs[1:len(xs)][0]").unwrap();
    let ExprKind::Index(index) = &expr.kind else {
        panic!("expected index");
    };
    let ExprKind::Slice(slice) = &index.operand.kind else {
        panic!("expected slice");
    };
    assert_eq!(slice.low.as_ref().unwrap().kind, ExprKind::Int(1));
    assert!(slice.high.is_some());

    let open = parse_expression("xs[:2]").unwrap();
    let ExprKind::Slice(slice) = &open.kind else {
        panic!("expected slice");
    };
    assert!(slice.low.is_none());
}

#[test]
fn test_composite_literals() {
    let slice = parse_expression("[]int{1, 2, 3}").unwrap();
    let ExprKind::Composite(lit) = &slice.kind else {
        panic!("expected composite");
    };
    assert_eq!(lit.ty.to_string(), "[]int");
    assert_eq!(lit.elements.len(), 3);

    let map = parse_expression(r#"map[string]int{"a": 1, "b": 2}"#).unwrap();
    let ExprKind::Composite(lit) = &map.kind else {
        panic!("expected composite");
    };
    assert!(lit.elements.iter().all(|e| e.key.is_some()));

    let point = parse_expression("Point{x: 1, y: 2}").unwrap();
    let ExprKind::Composite(lit) = &point.kind else {
        panic!("expected composite");
    };
    assert_eq!(lit.elements[0].key.as_ref().unwrap().as_ident(), Some("x"));
}

#[test]
fn test_function_literal() {
    let expr = parse_expression("func(x int) bool { return x%2 == 0 }").unwrap();
    let ExprKind::FuncLit(func) = &expr.kind else {
        panic!("expected func literal");
    };
    assert_eq!(func.signature.params[0].name.name, "x");
    assert_eq!(func.body.stmts.len(), 1);
}

#[test]
fn test_string_escapes() {
    let expr = parse_expression(r#""a\tb\n\"q\"\x41""#).unwrap();
    let ExprKind::String(lit) = &expr.kind else {
        panic!("expected string");
    };
    assert_eq!(lit.value, "a\tb\n\"q\"A");
    assert_eq!(lit.format, StringFormat::Interpreted);

    let raw = parse_expression(r"`a\nb`").unwrap();
    let ExprKind::String(lit) = &raw.kind else {
        panic!("expected string");
    };
    assert_eq!(lit.value, r"a\nb");
    assert_eq!(lit.format, StringFormat::Raw);
}

#[test]
fn test_float_literal_keeps_source_text() {
    let expr = parse_expression("1.50").unwrap();
    let ExprKind::Float(float) = &expr.kind else {
        panic!("expected float");
    };
    assert_eq!(float.value, 1.5);
    assert_eq!(float.raw, "1.50");
}
