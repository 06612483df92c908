use super::check;
use crate::*;
use pretty_assertions::assert_eq;

#[test]
fn test_unknown_import() {
    let (_, result) = check("package main\n\nimport \"nope\"\n\nfunc main() {}");

    let err = result.unwrap_err();
    assert_eq!(err.to_string(), "could not import nope (package not found)");
    assert_eq!(err.file(), "main.ply");
    assert!(matches!(
        err,
        CheckError::Import {
            source: ImportError::NotFound { .. },
            ..
        }
    ));
}

#[test]
fn test_custom_importer() {
    struct Only;

    impl Importer for Only {
        fn import(&self, path: &str) -> Result<Package, ImportError> {
            Err(ImportError::Failed {
                path: path.to_string(),
                message: "offline".to_string(),
            })
        }
    }

    let (_, result) = super::check_with(
        "package main\n\nimport \"fmt\"\n\nfunc main() {}",
        &Config::new(Only, true),
    );

    assert_eq!(result.unwrap_err().to_string(), "could not import fmt: offline");
}

#[test]
fn test_undefined_name() {
    let (_, result) = check("package main\n\nfunc main() {\n\tx := y\n}");

    assert!(matches!(result, Err(CheckError::Undefined { ref name, .. }) if name == "y"));
}

#[test]
fn test_assignment_mismatch() {
    let (_, result) = check("package main\n\nfunc main() {\n\tvar s string = 1\n}");

    let err = result.unwrap_err();
    assert_eq!(
        err.to_string(),
        "cannot use untyped int as string value in variable declaration"
    );
}

#[test]
fn test_redeclared_local() {
    let (_, result) = check("package main\n\nfunc main() {\n\tx := 1\n\tx := 2\n}");

    assert!(matches!(result, Err(CheckError::Redeclared { ref name, .. }) if name == "x"));
}

#[test]
fn test_missing_return() {
    let (_, result) = check("package main\n\nfunc f(n int) int {\n\tif n > 0 {\n\t\treturn 1\n\t}\n}");

    assert!(matches!(result, Err(CheckError::MissingReturn { ref name, .. }) if name == "f"));
}

#[test]
fn test_wrong_argument_count() {
    let (_, result) = check("package main\n\nfunc f(a int) {}\n\nfunc main() {\n\tf(1, 2)\n}");

    let err = result.unwrap_err();
    assert_eq!(
        err.to_string(),
        "wrong number of arguments in call to f: want 1, have 2"
    );
}

#[test]
fn test_recursive_type() {
    let (_, result) = check("package main\n\ntype A B\ntype B A\n");

    assert!(matches!(result, Err(CheckError::InvalidOperation { .. })));
}
