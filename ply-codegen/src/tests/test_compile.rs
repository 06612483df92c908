use super::{compile_main, compile_sources, generated_decls, program, run_outputs};
use pretty_assertions::assert_eq;

#[test]
fn test_fused_pipeline_end_to_end() {
    let outputs = compile_main(&program(
        r#"
    xs := []int{1, 2, 3, 4, 5, 6}
    fmt.Println(xs.filter(isEven).map(square).sum())
"#,
    ));

    assert_eq!(outputs.keys().collect::<Vec<_>>(), vec!["main.go", "ply_impls.go"]);
    assert_eq!(
        generated_decls(&outputs),
        vec!["filter_sliceOfint_then_map_sliceOfint_int_then_sum_sliceOfint"]
    );
    assert!(outputs["main.go"]
        .contains("filter_sliceOfint_then_map_sliceOfint_int_then_sum_sliceOfint(xs, isEven, square)"));
    assert_eq!(run_outputs(&outputs), "56\n");
}

#[test]
fn test_constant_max_folds_to_literal() {
    let outputs = compile_main(&program("    fmt.Println(max(3, 7, 2), min(-3, 2), max(1.5, 2))"));

    assert!(outputs["main.go"].contains("fmt.Println(7, -3, 2.0)"), "{}", outputs["main.go"]);
    assert!(generated_decls(&outputs).is_empty());
    assert_eq!(run_outputs(&outputs), "7 -3 2\n");
}

#[test]
fn test_folded_constant_keeps_named_type() {
    let outputs = compile_main(
        r#"
package main

import "fmt"

type Celsius int

func (c Celsius) Show() string {
    return fmt.Sprint(c, "C")
}

const hot Celsius = 30

func main() {
    x := max(hot, 7)
    y := min(hot, -4)
    fmt.Println(x.Show(), y.Show(), x)
}
"#,
    );

    assert!(outputs["main.go"].contains("x := Celsius(30)"), "{}", outputs["main.go"]);
    assert!(outputs["main.go"].contains("y := Celsius(-4)"), "{}", outputs["main.go"]);
    assert!(generated_decls(&outputs).is_empty());
    assert_eq!(run_outputs(&outputs), "30C -4C 30\n");
}

#[test]
fn test_runtime_max_is_specialized() {
    let outputs = compile_main(&program(
        r#"
    x := 4
    y := 2.5
    fmt.Println(max(x, 9, 1), min(y, 1))
"#,
    ));

    assert_eq!(generated_decls(&outputs), vec!["max_int", "min_float64"]);
    assert!(outputs["main.go"].contains("max_int(x, 9, 1)"));
    assert_eq!(run_outputs(&outputs), "9 1\n");
}

#[test]
fn test_identical_instantiations_share_one_declaration() {
    let outputs = compile_main(&program(
        r#"
    a := []int{3, 1, 2}
    b := []int{9, 8}
    fmt.Println(a.sort(), b.sort(), a)
"#,
    ));

    assert_eq!(generated_decls(&outputs), vec!["sort_sliceOfint"]);
    assert_eq!(outputs["ply_impls.go"].matches("import").count(), 1);
    assert!(outputs["ply_impls.go"].contains("import \"sort\""));
    assert!(!outputs["main.go"].contains("\"sort\""));
    // sort returns a sorted copy
    assert_eq!(run_outputs(&outputs), "[1 2 3] [8 9] [3 1 2]\n");
}

#[test]
fn test_declarations_deduplicated_across_files() {
    let first = r#"
package main

import "fmt"

func main() {
    xs := []int{1, 2, 3}
    fmt.Println(xs.reverse(), other())
}
"#;
    let second = r#"
package main

func other() []int {
    ys := []int{4, 5}
    return ys.reverse()
}
"#;
    let outputs = compile_sources(&[("app/main.ply", first), ("app/other.ply", second)]);

    assert_eq!(
        outputs.keys().collect::<Vec<_>>(),
        vec!["app/main.go", "app/other.go", "app/ply_impls.go"]
    );
    let impls = &outputs["app/ply_impls.go"];
    assert_eq!(impls.matches("func reverse_sliceOfint(").count(), 1);
    assert_eq!(run_outputs(&outputs), "[3 2 1] [5 4]\n");
}

#[test]
fn test_named_slice_result_is_converted_back() {
    let outputs = compile_main(
        r#"
package main

import "fmt"

type Names []string

func (n Names) First() string {
    return n[0]
}

func main() {
    ns := Names{"alice", "bob", "al"}
    short := ns.filter(func(s string) bool { return len(s) <= 3 })
    fmt.Println(short.First(), short)
}
"#,
    );

    assert_eq!(generated_decls(&outputs), vec!["filter_sliceOfstring"]);
    assert!(outputs["main.go"].contains("Names(filter_sliceOfstring(ns, "));
    assert_eq!(run_outputs(&outputs), "bob [bob al]\n");
}

#[test]
fn test_nested_func_types_get_distinct_declarations() {
    let outputs = compile_main(&program(
        r#"
    a := []func(int, func() int){}
    b := []func(int, func()) int{}
    fmt.Println(len(a.reverse()), len(b.reverse()))
"#,
    ));

    assert_eq!(
        generated_decls(&outputs),
        vec![
            "reverse_sliceOffuncOfintAndfuncOfRetintRetvoid",
            "reverse_sliceOffuncOfintAndfuncOfRetvoidRetint",
        ]
    );
    assert_eq!(run_outputs(&outputs), "0 0\n");
}

#[test]
fn test_native_method_takes_precedence() {
    let outputs = compile_main(
        r#"
package main

import "fmt"

type Names []string

func (n Names) reverse() Names {
    return n
}

func main() {
    ns := Names{"a", "b"}
    plain := []string{"a", "b"}
    fmt.Println(ns.reverse(), plain.reverse())
}
"#,
    );

    assert_eq!(generated_decls(&outputs), vec!["reverse_sliceOfstring"]);
    assert!(outputs["main.go"].contains("ns.reverse()"));
    assert_eq!(run_outputs(&outputs), "[a b] [b a]\n");
}

#[test]
fn test_free_function_generics() {
    let outputs = compile_main(&program(
        r#"
    a := map[string]int{"x": 1, "y": 2}
    b := map[string]int{"y": 20, "z": 30}
    nums := []int{1, 2, 3, 4}
    odd := nums.filter(not(isEven))
    pairs := zip(func(n int, s string) string { return fmt.Sprint(s, n) }, []int{1, 2, 3}, []string{"a", "b"})
    fmt.Println(merge(a, b), odd, repeat("ab", 3), repeat(1, -2), pairs)
"#,
    ));

    let decls = generated_decls(&outputs);
    for name in [
        "merge_mapOfstringToint",
        "not_int",
        "repeat_string",
        "repeat_int",
        "zip_int_string_string",
        "filter_sliceOfint",
    ] {
        assert!(decls.iter().any(|decl| decl == name), "missing {name} in {decls:?}");
    }
    assert_eq!(run_outputs(&outputs), "map[x:1 y:20 z:30] [1 3] [ab ab ab] [] [a1 b2]\n");
}

#[test]
fn test_map_methods_and_unfusible_chains() {
    let outputs = compile_main(&program(
        r#"
    ages := map[string]int{"bo": 30, "al": 25}
    names := ages.keys().sort()
    total := ages.elems().reduce(func(a int, b int) int { return a + b })
    empty := []int{}
    fmt.Println(names, total, empty.reduce(func(a int, b int) int { return a + b }))
"#,
    ));

    let decls = generated_decls(&outputs);
    assert!(decls.contains(&"keys_mapOfstringToint".to_string()), "{decls:?}");
    assert!(decls.contains(&"elems_mapOfstringToint".to_string()), "{decls:?}");
    assert!(decls.contains(&"sort_sliceOfstring".to_string()), "{decls:?}");
    assert_eq!(run_outputs(&outputs), "[al bo] 55 0\n");
}

#[test]
fn test_host_files_pass_through() {
    let host = r#"
package main

func helper() int {
    return 1
}
"#;
    let outputs = compile_sources(&[("helper.go", host)]);
    assert!(outputs.is_empty());
}

#[test]
fn test_generated_file_is_emitted_without_generics() {
    let outputs = compile_main(&program("    fmt.Println(square(3))"));

    assert!(generated_decls(&outputs).is_empty());
    assert!(outputs["ply_impls.go"].starts_with("package main"));
    assert_eq!(run_outputs(&outputs), "9\n");
}
