use crate::merge::merge;
use crate::synthetic::{ImportSet, SyntheticPackage, GENERATED_FILE};
use crate::Options;
use pretty_assertions::assert_eq;

const DOUBLE: &str = "func double_int(x int) int {\n\treturn x * 2\n}\n";
const HALVE: &str = "func halve_int(x int) int {\n\treturn x / 2\n}\n";

#[test]
fn test_insert_skips_existing_names() {
    let mut package = SyntheticPackage::new("main");
    assert!(package.insert("double_int", DOUBLE));
    assert!(!package.insert("double_int", "this is not parsed again"));
    assert!(package.contains("double_int"));
    assert_eq!(package.len(), 1);
    assert_eq!(package.decls("double_int").map(<[_]>::len), Some(1));
}

#[test]
#[should_panic(expected = "generated declaration broken does not parse")]
fn test_unparseable_generated_code_panics() {
    let mut package = SyntheticPackage::new("main");
    package.insert("broken", "func broken( {");
}

#[test]
fn test_import_set_deduplicates() {
    let mut imports = ImportSet::new();
    assert!(imports.insert("sort"));
    assert!(!imports.insert("sort"));
    assert!(imports.insert("strings"));
    assert_eq!(imports.iter().collect::<Vec<_>>(), vec!["sort", "strings"]);
}

#[test]
fn test_merge_unions_declarations_and_imports() {
    let mut first = SyntheticPackage::new("main");
    first.insert("double_int", DOUBLE);
    let mut first_imports = ImportSet::new();
    first_imports.insert("sort");

    let mut second = SyntheticPackage::new("main");
    second.insert("double_int", DOUBLE);
    second.insert("halve_int", HALVE);
    let mut second_imports = ImportSet::new();
    second_imports.insert("sort");
    second_imports.insert("strings");

    let merged = merge("main", vec![(first, first_imports), (second, second_imports)]);

    assert_eq!(merged.id, GENERATED_FILE);
    assert_eq!(merged.package.name, "main");
    let names: Vec<&str> = merged.decls.iter().map(|decl| decl.name()).collect();
    assert_eq!(names, vec!["double_int", "halve_int"]);
    let imports: Vec<&str> = merged.imports.iter().map(|import| import.path.as_str()).collect();
    assert_eq!(imports, vec!["sort", "strings"]);
}

#[test]
fn test_output_paths() {
    let options = Options::default();
    assert!(options.is_dialect("cmd/app/main.ply"));
    assert!(!options.is_dialect("cmd/app/main.go"));
    assert!(!options.is_dialect("ply"));
    assert_eq!(options.output_path("cmd/app/main.ply"), "cmd/app/main.go");
    assert_eq!(options.impls_path("cmd/app/main.ply"), "cmd/app/ply_impls.go");
    assert_eq!(options.impls_path("main.ply"), "ply_impls.go");
}
