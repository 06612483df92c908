use super::{compile_main, generated_decls, program, run_outputs};
use pretty_assertions::assert_eq;

/// Compile a chained expression and the same steps held in variables, and
/// check both print the same thing. Returns the fused program's outputs.
fn assert_fusion_equivalent(setup: &str, chained: &str, stepwise: &str) -> indexmap::IndexMap<String, String> {
    let fused = compile_main(&program(&format!("{setup}\n    fmt.Println({chained})")));
    let unfused = compile_main(&program(&format!("{setup}\n{stepwise}")));
    assert_eq!(run_outputs(&fused), run_outputs(&unfused));
    fused
}

#[test]
fn test_filter_map_sum_fuses_into_one_loop() {
    let outputs = assert_fusion_equivalent(
        "    xs := []int{1, 2, 3, 4, 5, 6}",
        "xs.filter(isEven).map(square).sum()",
        r#"
    evens := xs.filter(isEven)
    squares := evens.map(square)
    fmt.Println(squares.sum())
"#,
    );

    let impls = &outputs["ply_impls.go"];
    assert_eq!(generated_decls(&outputs).len(), 1);
    assert_eq!(impls.matches("for ").count(), 1, "{impls}");
    // No intermediate slices for a terminal pipeline
    assert!(!impls.contains("append"), "{impls}");
}

#[test]
fn test_streaming_only_chain_builds_one_slice() {
    let outputs = assert_fusion_equivalent(
        "    xs := []int{1, 2, 3, 4, 5, 6, 7, 8}",
        "xs.drop(1).filter(isEven).map(square).take(2)",
        r#"
    a := xs.drop(1)
    b := a.filter(isEven)
    c := b.map(square)
    fmt.Println(c.take(2))
"#,
    );
    assert_eq!(run_outputs(&outputs), "[4 16]\n");

    let impls = &outputs["ply_impls.go"];
    assert_eq!(impls.matches("for ").count(), 1, "{impls}");
    assert_eq!(impls.matches("make(").count(), 1, "{impls}");
}

#[test]
fn test_map_changes_element_type() {
    let outputs = assert_fusion_equivalent(
        "    xs := []int{3, 10, 7}",
        "xs.map(func(n int) string { return fmt.Sprint(n) }).filter(func(s string) bool { return len(s) == 1 })",
        r#"
    strs := xs.map(func(n int) string { return fmt.Sprint(n) })
    fmt.Println(strs.filter(func(s string) bool { return len(s) == 1 }))
"#,
    );
    assert_eq!(run_outputs(&outputs), "[3 7]\n");
    assert_eq!(
        generated_decls(&outputs),
        vec!["map_sliceOfint_string_then_filter_sliceOfstring"]
    );
}

#[test]
fn test_reduce_forms_fuse() {
    let outputs = assert_fusion_equivalent(
        "    xs := []int{1, 2, 3, 4}\n    add := func(a int, b int) int { return a + b }",
        "xs.map(square).reduce(add), xs.filter(isEven).reduce(func(acc string, n int) string { return acc + fmt.Sprint(n) }, \">\")",
        r#"
    sq := xs.map(square)
    evens := xs.filter(isEven)
    fmt.Println(sq.reduce(add), evens.reduce(func(acc string, n int) string { return acc + fmt.Sprint(n) }, ">"))
"#,
    );
    assert_eq!(run_outputs(&outputs), "30 >24\n");
}

#[test]
fn test_reduce_of_empty_pipeline_is_zero() {
    let outputs = assert_fusion_equivalent(
        "    xs := []int{1, 3}",
        "xs.filter(isEven).reduce(func(a int, b int) int { return a * b })",
        r#"
    evens := xs.filter(isEven)
    fmt.Println(evens.reduce(func(a int, b int) int { return a * b }))
"#,
    );
    assert_eq!(run_outputs(&outputs), "0\n");
}

#[test]
fn test_short_circuit_terminals() {
    let outputs = assert_fusion_equivalent(
        "    xs := []int{1, 2, 3, 4}",
        "xs.map(square).contains(9), xs.map(square).any(isEven), xs.filter(isEven).all(isEven)",
        r#"
    sq := xs.map(square)
    evens := xs.filter(isEven)
    fmt.Println(sq.contains(9), sq.any(isEven), evens.all(isEven))
"#,
    );
    assert_eq!(run_outputs(&outputs), "true true true\n");
}

#[test]
fn test_foreach_terminal() {
    let setup = "    xs := []int{1, 2, 3, 4}\n    total := 0\n    add := func(n int) { total += n }";
    let fused = compile_main(&program(&format!("{setup}\n    xs.filter(isEven).foreach(add)\n    fmt.Println(total)")));
    let unfused = compile_main(&program(&format!(
        "{setup}\n    evens := xs.filter(isEven)\n    evens.foreach(add)\n    fmt.Println(total)"
    )));

    assert_eq!(run_outputs(&fused), "6\n");
    assert_eq!(run_outputs(&fused), run_outputs(&unfused));
    assert_eq!(
        generated_decls(&fused),
        vec!["filter_sliceOfint_then_foreach_sliceOfint"]
    );
}

#[test]
fn test_float_sum_over_named_elements() {
    let source = r#"
package main

import "fmt"

type Celsius float64

func warm(c Celsius) bool {
    return c > 20
}

func main() {
    temps := []Celsius{12.5, 21, 30.5}
    fmt.Println(temps.filter(warm).sum())
}
"#;
    let outputs = compile_main(source);
    assert_eq!(
        generated_decls(&outputs),
        vec!["filter_sliceOfCelsius_then_sum_sliceOfCelsius"]
    );
    assert_eq!(run_outputs(&outputs), "51.5\n");
}
