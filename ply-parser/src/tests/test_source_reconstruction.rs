use crate::*;
use pretty_assertions::assert_eq;

/// Printing a parsed file and parsing it again must produce the same text.
fn assert_stable(source: &str) -> String {
    let first = parse_file(source, FileId(0), "a.ply").unwrap().to_string();
    let second = parse_file(&first, FileId(1), "b.ply").unwrap().to_string();
    assert_eq!(first, second);
    first
}

#[test]
fn test_print_function() {
    let printed = assert_stable(
        "package main\nimport \"fmt\"\nfunc main() { xs := []int{1,2,3}\n for _, x := range xs { if x > 1 { fmt.Println(x) } } }",
    );

    assert_eq!(
        printed,
        "package main\n\nimport \"fmt\"\n\nfunc main() {\n\txs := []int{1, 2, 3}\n\tfor _, x := range xs {\n\t\tif x > 1 {\n\t\t\tfmt.Println(x)\n\t\t}\n\t}\n}\n"
    );
}

#[test]
fn test_parentheses_follow_precedence() {
    let expr = parse_expression("(a + b) * c - (d - e)").unwrap();
    assert_eq!(expr.to_string(), "(a + b) * c - (d - e)");

    let expr = parse_expression("a * (b * c)").unwrap();
    assert_eq!(expr.to_string(), "a * (b * c)");
}

#[test]
fn test_synthetic_nodes_get_parentheses() {
    let sum = Expr::synthetic(ExprKind::Binary(BinaryExpr {
        left: Box::new(Expr::ident("a")),
        op: BinaryOp::Add,
        right: Box::new(Expr::ident("b")),
    }));
    let product = Expr::synthetic(ExprKind::Binary(BinaryExpr {
        left: Box::new(sum.clone()),
        op: BinaryOp::Mul,
        right: Box::new(Expr::ident("c")),
    }));
    assert_eq!(product.to_string(), "(a + b) * c");

    let negated = Expr::synthetic(ExprKind::Unary(UnaryExpr {
        op: UnaryOp::Neg,
        operand: Box::new(Expr::synthetic(ExprKind::Int(-3))),
    }));
    assert_eq!(negated.to_string(), "-(-3)");

    let selected = Expr::synthetic(ExprKind::Selector(SelectorExpr {
        operand: Box::new(sum),
        field: Ident::synthetic("len"),
    }));
    assert_eq!(selected.to_string(), "(a + b).len");
}

#[test]
fn test_print_strings() {
    let expr = parse_expression(r#""tab\there \"quoted\"""#).unwrap();
    assert_eq!(expr.to_string(), r#""tab\there \"quoted\"""#);

    let raw = parse_expression(r"`C:\path`").unwrap();
    assert_eq!(raw.to_string(), r"`C:\path`");
}

#[test]
fn test_print_loops_and_declarations() {
    assert_stable(
        r#"package main

type Names []string

const limit = 3

var count int

func (n Names) first() string { return n[0] }

func sum(xs []int) int {
	total := 0
	for i := 0; i < len(xs); i++ {
		total += xs[i]
	}
	for total > 100 {
		total -= 100
	}
	for {
		break
	}
	return total
}

func pick(f func(int) bool, xs ...int) []int {
	out := make([]int, 0, len(xs))
	for _, x := range xs {
		if !f(x) {
			continue
		} else if x < 0 {
			out = append(out, -x)
		} else {
			out = append(out, x)
		}
	}
	return out[:len(out)]
}
"#,
    );
}

#[test]
fn test_print_func_literal_indentation() {
    let printed = assert_stable(
        "package main\nfunc main() { f := func(x int) bool {\nreturn x > 0\n}\n f(1) }",
    );
    assert!(printed.contains("\tf := func(x int) bool {\n\t\treturn x > 0\n\t}\n"));
}
