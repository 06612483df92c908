// Ply Parser Library
// Pest-based parser and printer for the Ply host language

pub mod ast;
pub mod error;
pub mod parser;
pub mod printer;

pub use ast::*;
pub use error::*;
pub use parser::*;
pub use printer::{print_decl, print_expr, print_file, print_type, Printer};

#[cfg(test)]
mod tests;

/// Parse one source file. Expression ids are namespaced by `file`.
pub fn parse_file(input: &str, file: FileId, name: impl Into<String>) -> ParseResult<File> {
    FileParser::new(input, file, name).parse_file()
}

/// Parse a standalone expression with detached-file ids.
pub fn parse_expression(input: &str) -> ParseResult<Expr> {
    FileParser::new(input, FileId::DETACHED, "<expr>").parse_expression()
}

/// Add `import "path"` to `file` unless it is already imported.
///
/// Returns `true` when the import was inserted.
pub fn add_import(file: &mut File, path: &str) -> bool {
    if file.imports.iter().any(|import| import.path == path) {
        return false;
    }
    file.imports.push(Import {
        path: path.to_string(),
        span: Span::synthetic(),
    });
    true
}

pub const VERSION: &str = env!("CARGO_PKG_VERSION");
pub const NAME: &str = env!("CARGO_PKG_NAME");
