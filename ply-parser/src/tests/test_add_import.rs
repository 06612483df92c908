use crate::*;
use pretty_assertions::assert_eq;

#[test]
fn test_add_missing_import() {
    let mut file = parse_file("package main\nimport \"fmt\"", FileId(0), "a.go").unwrap();

    assert!(add_import(&mut file, "sort"));
    let paths: Vec<_> = file.imports.iter().map(|i| i.path.as_str()).collect();
    assert_eq!(paths, vec!["fmt", "sort"]);
}

#[test]
fn test_add_existing_import_is_noop() {
    let mut file = parse_file("package main\nimport \"sort\"", FileId(0), "a.go").unwrap();

    assert!(!add_import(&mut file, "sort"));
    assert_eq!(file.imports.len(), 1);
}

#[test]
fn test_added_imports_print_as_group() {
    let mut file = parse_file("package main", FileId(0), "a.go").unwrap();
    add_import(&mut file, "sort");
    add_import(&mut file, "fmt");
    add_import(&mut file, "sort");

    assert_eq!(
        file.to_string(),
        "package main\n\nimport (\n\t\"sort\"\n\t\"fmt\"\n)\n"
    );
}
