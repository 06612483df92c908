use super::{main_body, run_failure};
use crate::error::RuntimeError;
use pretty_assertions::assert_eq;

#[test]
fn test_index_out_of_range() {
    let err = run_failure(&main_body(
        r#"
    xs := []int{1, 2}
    i := 5
    fmt.Println(xs[i])
"#,
    ));
    assert!(matches!(err, RuntimeError::IndexOutOfRange { index: 5, length: 2, .. }));
    assert_eq!(err.to_string(), "index out of range [5] with length 2");
}

#[test]
fn test_integer_division_by_zero() {
    let err = run_failure(&main_body(
        r#"
    zero := 0
    fmt.Println(1 / zero)
"#,
    ));
    assert!(matches!(err, RuntimeError::DivisionByZero { .. }));
}

#[test]
fn test_write_to_nil_map() {
    let err = run_failure(&main_body(
        r#"
    var m map[string]int
    m["a"] = 1
    fmt.Println(m)
"#,
    ));
    assert_eq!(err.to_string(), "assignment to entry in nil map");
}

#[test]
fn test_slice_bounds() {
    let err = run_failure(&main_body(
        r#"
    xs := []int{1, 2, 3}
    hi := 9
    fmt.Println(xs[1:hi])
"#,
    ));
    assert!(matches!(err, RuntimeError::SliceBounds { low: 1, high: 9, capacity: 3, .. }));
}

#[test]
fn test_missing_main() {
    let err = run_failure("package main\n\nfunc helper() {}\n");
    assert_eq!(err, RuntimeError::MissingMain);
}
