use crate::*;

#[test]
fn test_missing_package_clause() {
    let error = parse_file("func main() {}", FileId(0), "bad.ply").unwrap_err();
    assert!(matches!(error, ParseError::Syntax { .. }));
    assert_eq!(error.file(), "bad.ply");
    assert_eq!(error.offset(), 0);
}

#[test]
fn test_unclosed_block_reports_position() {
    let source = "package main\nfunc main() {\n  x := 1\n";
    let error = parse_file(source, FileId(0), "open.ply").unwrap_err();
    assert!(matches!(error, ParseError::Syntax { .. }));
    assert!(error.offset() >= source.find('x').unwrap());
}

#[test]
fn test_integer_overflow() {
    let error = parse_expression("99999999999999999999").unwrap_err();
    match error {
        ParseError::InvalidInteger { found, .. } => assert_eq!(found, "99999999999999999999"),
        other => panic!("expected invalid integer, got {:?}", other),
    }
}

#[test]
fn test_trailing_input_in_expression() {
    let error = parse_expression("1 + 2 )").unwrap_err();
    assert!(matches!(error, ParseError::Syntax { .. }));
}

#[test]
fn test_error_renders_file_name() {
    let error = parse_file("package", FileId(0), "short.ply").unwrap_err();
    assert!(error.to_string().contains("short.ply"));
}
