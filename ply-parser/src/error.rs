// Ply Parser Error Handling
// Error reporting with miette integration

use crate::parser::Rule;
use miette::{Diagnostic, NamedSource, SourceSpan};
use thiserror::Error;

/// Main parse error type with miette integration
#[derive(Error, Diagnostic, Debug)]
pub enum ParseError {
    #[error("Syntax error in {file}: {message}")]
    #[diagnostic(
        code(ply::parse::syntax),
        help("Check the syntax near the highlighted location")
    )]
    Syntax {
        file: String,
        #[source_code]
        src: NamedSource<String>,
        #[label("error occurred here")]
        span: SourceSpan,
        message: String,
    },

    #[error("Invalid integer literal `{found}` in {file}")]
    #[diagnostic(
        code(ply::parse::invalid_integer),
        help("Integer literals must fit in a signed 64-bit integer")
    )]
    InvalidInteger {
        file: String,
        #[source_code]
        src: NamedSource<String>,
        #[label("invalid integer")]
        span: SourceSpan,
        found: String,
    },

    #[error("Invalid float literal `{found}` in {file}")]
    #[diagnostic(code(ply::parse::invalid_float))]
    InvalidFloat {
        file: String,
        #[source_code]
        src: NamedSource<String>,
        #[label("invalid float")]
        span: SourceSpan,
        found: String,
    },

    #[error("Invalid string escape sequence `{found}` in {file}")]
    #[diagnostic(
        code(ply::parse::invalid_string_escape),
        help("Valid escape sequences: \\n, \\t, \\r, \\\\, \\\", \\', \\0, \\xHH")
    )]
    InvalidStringEscape {
        file: String,
        #[source_code]
        src: NamedSource<String>,
        #[label("invalid escape sequence")]
        span: SourceSpan,
        found: String,
    },
}

impl ParseError {
    /// Create a parse error from a Pest parsing error
    pub fn from_pest_error(error: pest::error::Error<Rule>, file: &str, src: &str) -> Self {
        let span = match error.location {
            pest::error::InputLocation::Pos(pos) => SourceSpan::new(pos.into(), 1),
            pest::error::InputLocation::Span((start, end)) => {
                SourceSpan::new(start.into(), end - start)
            }
        };

        let message = match &error.variant {
            pest::error::ErrorVariant::ParsingError { positives, .. } if !positives.is_empty() => {
                let expected: Vec<String> =
                    positives.iter().map(rule_to_user_friendly_description).collect();
                format!("expected {}", expected.join(", "))
            }
            pest::error::ErrorVariant::ParsingError { .. } => "unexpected input".to_string(),
            pest::error::ErrorVariant::CustomError { message } => message.clone(),
        };

        ParseError::Syntax {
            file: file.to_string(),
            src: NamedSource::new(file, src.to_string()),
            span,
            message,
        }
    }

    /// Name of the file the error was found in
    pub fn file(&self) -> &str {
        match self {
            ParseError::Syntax { file, .. }
            | ParseError::InvalidInteger { file, .. }
            | ParseError::InvalidFloat { file, .. }
            | ParseError::InvalidStringEscape { file, .. } => file,
        }
    }

    /// Byte offset of the error in its file
    pub fn offset(&self) -> usize {
        match self {
            ParseError::Syntax { span, .. }
            | ParseError::InvalidInteger { span, .. }
            | ParseError::InvalidFloat { span, .. }
            | ParseError::InvalidStringEscape { span, .. } => span.offset(),
        }
    }
}

/// Result type for parsing operations
pub type ParseResult<T> = Result<T, ParseError>;

/// Convert a parser rule to a user-friendly description
fn rule_to_user_friendly_description(rule: &Rule) -> String {
    match rule {
        Rule::ident => "an identifier".to_string(),
        Rule::field_name => "a field or method name".to_string(),
        Rule::int_lit => "an integer (like 42)".to_string(),
        Rule::float_lit => "a float (like 3.14)".to_string(),
        Rule::string_lit | Rule::raw_string_lit => "a string".to_string(),
        Rule::expr | Rule::hdr_expr => "an expression".to_string(),
        Rule::type_expr => "a type".to_string(),
        Rule::block => "a block ({ ... })".to_string(),
        Rule::package_clause => "a package clause (package name)".to_string(),
        Rule::import_spec => "an import path".to_string(),
        Rule::func_decl => "a function declaration".to_string(),
        Rule::type_decl => "a type declaration".to_string(),
        Rule::const_decl => "a const declaration".to_string(),
        Rule::var_decl => "a var declaration".to_string(),
        Rule::signature | Rule::params => "a parameter list".to_string(),
        Rule::assign_op => "an assignment operator".to_string(),
        Rule::inc_dec_op => "++ or --".to_string(),
        Rule::call_suffix => "a call (...)".to_string(),
        Rule::selector_suffix => "a selector (.name)".to_string(),
        Rule::index_suffix | Rule::slice_suffix => "an index or slice ([...])".to_string(),
        Rule::lit_body => "a composite literal body ({ ... })".to_string(),
        Rule::EOI => "end of input".to_string(),
        _ => format!("a {:?}", rule).replace('_', " "),
    }
}
