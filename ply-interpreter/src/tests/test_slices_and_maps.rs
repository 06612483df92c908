use super::{main_body, run_program};
use pretty_assertions::assert_eq;

#[test]
fn test_subslices_share_backing_array() {
    let output = run_program(&main_body(
        r#"
    xs := []int{1, 2, 3, 4}
    ys := xs[1:3]
    ys[0] = 20
    fmt.Println(xs, ys, len(ys))
"#,
    ));
    assert_eq!(output, "[1 20 3 4] [20 3] 2\n");
}

#[test]
fn test_append_within_capacity_writes_through() {
    let output = run_program(&main_body(
        r#"
    base := make([]int, 2, 4)
    a := append(base, 1)
    b := append(base, 2)
    fmt.Println(a, b)
"#,
    ));
    // Both appends reuse base's spare capacity
    assert_eq!(output, "[0 0 2] [0 0 2]\n");
}

#[test]
fn test_append_beyond_capacity_copies() {
    let output = run_program(&main_body(
        r#"
    xs := []int{1, 2}
    ys := append(xs, 3)
    ys[0] = 100
    fmt.Println(xs, ys)
"#,
    ));
    assert_eq!(output, "[1 2] [100 2 3]\n");
}

#[test]
fn test_copy_returns_count() {
    let output = run_program(&main_body(
        r#"
    dst := make([]int, 2)
    n := copy(dst, []int{7, 8, 9})
    fmt.Println(n, dst)
"#,
    ));
    assert_eq!(output, "2 [7 8]\n");
}

#[test]
fn test_maps_keep_insertion_order_when_ranged() {
    let output = run_program(&main_body(
        r#"
    ages := map[string]int{"zed": 30}
    ages["amy"] = 25
    ages["zed"] = 31
    keys := []string{}
    for k := range ages {
        keys = append(keys, k)
    }
    fmt.Println(keys, ages["missing"], len(ages))
"#,
    ));
    assert_eq!(output, "[zed amy] 0 2\n");
}

#[test]
fn test_nil_slice_and_map_reads() {
    let output = run_program(&main_body(
        r#"
    var xs []int
    var m map[string]bool
    fmt.Println(len(xs), xs == nil, m["x"], len(m))
"#,
    ));
    assert_eq!(output, "0 true false 0\n");
}

#[test]
fn test_struct_fields_inside_slices() {
    let source = r#"
package main

import "fmt"

type Item struct {
    Name string
    Qty  int
}

func main() {
    items := []Item{Item{Name: "a", Qty: 1}, Item{Name: "b", Qty: 2}}
    items[1].Qty = 5
    total := 0
    for _, item := range items {
        total += item.Qty
    }
    fmt.Println(items, total)
}
"#;
    assert_eq!(run_program(source), "[{a 1} {b 5}] 6\n");
}
