use super::sources;
use crate::driver::{self, DriverError};
use ply_codegen::Options;
use pretty_assertions::assert_eq;
use std::fs;
use std::path::PathBuf;

const SCENARIO: &str = r#"package main

import "fmt"

func isEven(x int) bool { return x%2 == 0 }

func square(x int) int { return x * x }

func main() {
	xs := []int{1, 2, 3, 4, 5, 6}
	fmt.Println(xs.filter(isEven).map(square).sum(), max(3, 7, 2))
}
"#;

const HELPER: &str = r#"package main

func double(x int) int { return x * 2 }
"#;

fn run(pairs: &[(&str, &str)]) -> String {
    let mut out = Vec::new();
    driver::run(&sources(pairs), &Options::default(), &mut out).expect("program should run");
    String::from_utf8(out).expect("output is UTF-8")
}

#[test]
fn test_run_prints_program_output() {
    assert_eq!(run(&[("main.ply", SCENARIO)]), "56 7\n");
}

#[test]
fn test_run_includes_host_files() {
    let main = r#"package main

import "fmt"

func main() {
	xs := []int{1, 2, 3}
	fmt.Println(xs.map(double).sum())
}
"#;
    assert_eq!(run(&[("main.ply", main), ("helper.go", HELPER)]), "12\n");
}

#[test]
fn test_run_host_only_package() {
    let main = r#"package main

import "fmt"

func main() {
	fmt.Println(double(21))
}
"#;
    assert_eq!(run(&[("main.go", main), ("helper.go", HELPER)]), "42\n");
}

#[test]
fn test_host_package_order() {
    let package = driver::host_package(
        &sources(&[("main.ply", SCENARIO), ("helper.go", HELPER)]),
        &Options::default(),
    )
    .expect("package should compile");
    let paths: Vec<&str> = package.iter().map(|(path, _)| path.as_str()).collect();
    assert_eq!(paths, vec!["helper.go", "main.go", "ply_impls.go"]);
}

#[test]
fn test_run_reports_runtime_error() {
    let main = r#"package main

import "fmt"

func main() {
	xs := []int{1}
	i := 3
	fmt.Println(xs[i])
}
"#;
    let mut out = Vec::new();
    let err = driver::run(&sources(&[("main.ply", main)]), &Options::default(), &mut out)
        .expect_err("index is out of range");
    assert_eq!(err.to_string(), "index out of range [3] with length 1");
}

#[test]
fn test_check_counts_expressions() {
    let count = driver::check(&sources(&[("main.ply", SCENARIO)])).expect("package should check");
    assert!(count > 0);
}

#[test]
fn test_check_reports_type_errors() {
    let main = r#"package main

func main() {
	var s string = 1
}
"#;
    assert!(driver::check(&sources(&[("main.ply", main)])).is_err());
}

#[test]
fn test_print_outputs_names_each_file() {
    let outputs = driver::build(&sources(&[("main.ply", SCENARIO)]), &Options::default())
        .expect("package should compile");
    let mut out = Vec::new();
    driver::print_outputs(&outputs, &mut out).expect("writes to a buffer");
    let text = String::from_utf8(out).expect("output is UTF-8");
    assert!(text.starts_with("// main.go\npackage main"));
    assert!(text.contains("// ply_impls.go\npackage main"));
}

#[test]
fn test_write_outputs_flattens_into_directory() {
    let dir = std::env::temp_dir().join(format!("ply-driver-test-{}", std::process::id()));
    let outputs = driver::build(&sources(&[("app/main.ply", SCENARIO)]), &Options::default())
        .expect("package should compile");

    let written = driver::write_outputs(&outputs, &dir).expect("outputs should be written");
    assert_eq!(written, vec![dir.join("main.go"), dir.join("ply_impls.go")]);
    let main = fs::read_to_string(dir.join("main.go")).expect("main.go exists");
    assert!(main.contains("filter_sliceOfint_then_map_sliceOfint_int_then_sum_sliceOfint(xs, isEven, square)"));

    fs::remove_dir_all(&dir).ok();
}

#[test]
fn test_read_sources_errors() {
    assert!(matches!(driver::read_sources(&[]), Err(DriverError::NoInput)));
    let missing = PathBuf::from("/nonexistent/ply/main.ply");
    match driver::read_sources(&[missing]) {
        Err(DriverError::Read { path, .. }) => assert_eq!(path, "/nonexistent/ply/main.ply"),
        other => panic!("expected a read error, got {other:?}"),
    }
}
