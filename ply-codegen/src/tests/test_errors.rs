use crate::{compile, CompileError, Options};
use ply_typechecker::ImportError;
use pretty_assertions::assert_eq;

fn compile_err(source: &str) -> CompileError {
    compile(&[("main.ply".to_string(), source.to_string())], &Options::default())
        .expect_err("compile should fail")
}

#[test]
fn test_parse_errors_are_reported() {
    let err = compile_err("package main\n\nfunc main( {\n}\n");
    assert!(matches!(err, CompileError::Parse(_)), "{err:?}");
}

#[test]
fn test_import_errors_are_lifted() {
    let err = compile_err("package main\n\nimport \"nope\"\n\nfunc main() {}\n");
    let CompileError::Import(import) = &err else {
        panic!("expected an import error, got {err:?}");
    };
    assert!(matches!(import, ImportError::NotFound { path, .. } if path == "nope"));
    assert_eq!(err.to_string(), "could not import nope (package not found)");
}

#[test]
fn test_type_errors_are_reported() {
    let err = compile_err("package main\n\nfunc main() {\n    xs := []string{\"a\"}\n    n := xs.sum()\n}\n");
    let CompileError::Check(check) = &err else {
        panic!("expected a check error, got {err:?}");
    };
    assert_eq!(check.file(), "main.ply");
    assert!(err.to_string().contains("sum requires numeric elements"), "{err}");
}

#[test]
fn test_errors_in_host_files_fail_the_compile() {
    let sources = vec![
        ("main.ply".to_string(), "package main\n\nfunc main() {\n    helper()\n}\n".to_string()),
        ("helper.go".to_string(), "package main\n\nfunc helper() {\n    undefinedThing()\n}\n".to_string()),
    ];
    let err = compile(&sources, &Options::default()).expect_err("compile should fail");
    let CompileError::Check(check) = &err else {
        panic!("expected a check error, got {err:?}");
    };
    assert_eq!(check.file(), "helper.go");
}
