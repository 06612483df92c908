use super::{main_body, run_program};
use pretty_assertions::assert_eq;

#[test]
fn test_arithmetic_and_control_flow() {
    let output = run_program(&main_body(
        r#"
    total := 0
    for i := 1; i <= 10; i++ {
        if i%2 == 0 {
            continue
        }
        total += i
    }
    fmt.Println(total, 7/2, -7/2, 7%3, 7.0/2)
"#,
    ));
    assert_eq!(output, "25 3 -3 1 3.5\n");
}

#[test]
fn test_functions_methods_and_recursion() {
    let source = r#"
package main

import "fmt"

type Celsius float64

func (c Celsius) Fahrenheit() float64 {
    return float64(c)*9/5 + 32
}

func fib(n int) int {
    if n < 2 {
        return n
    }
    return fib(n-1) + fib(n-2)
}

func main() {
    c := Celsius(100)
    fmt.Println(fib(15), c.Fahrenheit())
}
"#;
    assert_eq!(run_program(source), "610 212\n");
}

#[test]
fn test_closures_capture_variables() {
    let output = run_program(&main_body(
        r#"
    count := 0
    inc := func() int {
        count++
        return count
    }
    inc()
    inc()
    fmt.Println(inc(), count)
"#,
    ));
    assert_eq!(output, "3 3\n");
}

#[test]
fn test_struct_values_are_copied() {
    let source = r#"
package main

import "fmt"

type Point struct {
    X int
    Y int
}

func main() {
    p := Point{X: 1, Y: 2}
    q := p
    q.X = 10
    fmt.Println(p, q, p.X+q.Y)
}
"#;
    assert_eq!(run_program(source), "{1 2} {10 2} 3\n");
}

#[test]
fn test_variadic_functions() {
    let source = r#"
package main

import "fmt"

func sum(xs ...int) int {
    total := 0
    for _, x := range xs {
        total += x
    }
    return total
}

func main() {
    nums := []int{4, 5, 6}
    fmt.Println(sum(), sum(1, 2, 3), sum(nums...))
}
"#;
    assert_eq!(run_program(source), "0 6 15\n");
}

#[test]
fn test_package_variables_and_constants() {
    let source = r#"
package main

import "fmt"

const base = 10

var scale = base * 2

var names []string

func main() {
    names = append(names, "a")
    fmt.Println(scale, len(names), names == nil)
}
"#;
    assert_eq!(run_program(source), "20 1 false\n");
}

#[test]
fn test_sort_and_strings_packages() {
    let source = r#"
package main

import (
    "fmt"
    "sort"
    "strings"
)

func main() {
    words := []string{"pear", "fig", "apple"}
    sort.Slice(words, func(i int, j int) bool { return len(words[i]) < len(words[j]) })
    nums := []int{3, 1, 2}
    sort.Ints(nums)
    fmt.Println(words, nums, strings.ToUpper("ply"), strings.Repeat("ab", 2), strings.Contains("ply", "l"))
}
"#;
    assert_eq!(run_program(source), "[fig pear apple] [1 2 3] PLY abab true\n");
}

#[test]
fn test_range_over_int_and_break() {
    let output = run_program(&main_body(
        r#"
    last := 0
    for i := range 10 {
        if i == 4 {
            break
        }
        last = i
    }
    fmt.Println(last)
"#,
    ));
    assert_eq!(output, "3\n");
}
