use super::{check, check_with, short_var};
use crate::*;
use ply_parser::ExprKind;
use pretty_assertions::assert_eq;

#[test]
fn test_constant_arithmetic_folds() {
    let (file, result) = check(
        r#"package main

const base = 10

func main() {
	a := base * 2 + 1
	b := 7 / 2
	c := 7 / 2.0
	d := "ab" + "cd"
	e := 1 < 2 && true
}"#,
    );
    let table = result.unwrap();

    assert_eq!(table.value_of(short_var(&file, "a")), Some(&ConstValue::Int(21)));
    assert_eq!(table.value_of(short_var(&file, "b")), Some(&ConstValue::Int(3)));
    assert_eq!(table.value_of(short_var(&file, "c")), Some(&ConstValue::Float(3.5)));
    assert_eq!(
        table.value_of(short_var(&file, "d")),
        Some(&ConstValue::String("abcd".to_string()))
    );
    assert_eq!(table.value_of(short_var(&file, "e")), Some(&ConstValue::Bool(true)));
}

#[test]
fn test_untyped_constants_settle_to_default_types() {
    let (file, result) = check("package main\n\nfunc main() {\n\ta := 1 + 2\n\tb := 1 + 2.5\n}");
    let table = result.unwrap();

    assert_eq!(table.type_of(short_var(&file, "a")), Some(&Type::int()));
    assert_eq!(table.type_of(short_var(&file, "b")), Some(&Type::float64()));
}

#[test]
fn test_untyped_constant_takes_context_type() {
    let (file, result) = check(
        r#"package main

func main() {
	x := 2.5
	y := x * 2
}"#,
    );
    let table = result.unwrap();

    let ExprKind::Binary(binary) = &short_var(&file, "y").kind else {
        panic!("expected a binary expression");
    };
    assert_eq!(table.type_of(&binary.right), Some(&Type::float64()));
    assert_eq!(table.value_of(&binary.right), Some(&ConstValue::Float(2.0)));
}

#[test]
fn test_max_of_constants_folds() {
    let (file, result) = check("package main\n\nfunc main() {\n\tm := max(3, 7, 2)\n\tn := min(3, 1.5)\n}");
    let table = result.unwrap();

    let m = short_var(&file, "m");
    assert_eq!(table.mode_of(m), Some(Mode::Constant));
    assert_eq!(table.value_of(m), Some(&ConstValue::Int(7)));
    assert_eq!(table.type_of(m), Some(&Type::int()));
    assert_eq!(table.value_of(short_var(&file, "n")), Some(&ConstValue::Float(1.5)));
}

#[test]
fn test_max_of_variables_is_a_value() {
    let (file, result) = check("package main\n\nfunc main() {\n\tx := 4\n\tm := max(x, 9)\n}");
    let table = result.unwrap();

    let m = short_var(&file, "m");
    assert_eq!(table.mode_of(m), Some(Mode::Value));
    assert_eq!(table.type_of(m), Some(&Type::int()));
    let call = m.as_call().unwrap();
    assert_eq!(table.mode_of(&call.func), Some(Mode::Builtin));
}

#[test]
fn test_user_defined_max_shadows_builtin() {
    let (file, result) = check(
        r#"package main

func max(a int, b int) int {
	if a > b {
		return a
	}
	return b
}

func main() {
	m := max(3, 7)
}"#,
    );
    let table = result.unwrap();

    let m = short_var(&file, "m");
    assert_eq!(table.mode_of(m), Some(Mode::Value));
    assert_eq!(table.mode_of(&m.as_call().unwrap().func), Some(Mode::Value));
}

#[test]
fn test_len_of_constant_string() {
    let (file, result) = check("package main\n\nfunc main() {\n\tn := len(\"hello\")\n}");
    let table = result.unwrap();

    assert_eq!(table.value_of(short_var(&file, "n")), Some(&ConstValue::Int(5)));
}

#[test]
fn test_constant_division_by_zero() {
    let (_, result) = check("package main\n\nfunc main() {\n\tx := 1 / 0\n}");

    let err = result.unwrap_err();
    assert_eq!(err.to_string(), "invalid operation: division by zero");
}

#[test]
fn test_host_mode_has_no_max() {
    let (_, result) = check_with("package main\n\nfunc main() {\n\tm := max(3, 7)\n}", &Config::host());

    assert!(matches!(result, Err(CheckError::Undefined { ref name, .. }) if name == "max"));
}
