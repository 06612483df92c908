//! Parser, printer and import-editing tests

mod test_add_import;
mod test_declarations;
mod test_expressions;
mod test_parse_errors;
mod test_source_reconstruction;
mod test_statements;
