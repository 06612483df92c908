//! Error types for the Ply type checker
//!
//! Every variant carries the file name and source so miette can render the
//! offending code.

use crate::importer::ImportError;
use miette::{Diagnostic, NamedSource, SourceSpan};
use thiserror::Error;

#[derive(Error, Diagnostic, Debug)]
pub enum CheckError {
    #[error("{source}")]
    #[diagnostic(code(ply::check::import))]
    Import {
        #[diagnostic_source]
        source: ImportError,
        file: String,
        #[source_code]
        src: NamedSource<String>,
        #[label("imported here")]
        span: SourceSpan,
    },

    #[error("undefined: {name}")]
    #[diagnostic(code(ply::check::undefined))]
    Undefined {
        name: String,
        file: String,
        #[source_code]
        src: NamedSource<String>,
        #[label("not declared in this scope")]
        span: SourceSpan,
    },

    #[error("{name} redeclared in this block")]
    #[diagnostic(code(ply::check::redeclared))]
    Redeclared {
        name: String,
        file: String,
        #[source_code]
        src: NamedSource<String>,
        #[label("already declared")]
        span: SourceSpan,
    },

    #[error("cannot use {found} as {expected} value in {context}")]
    #[diagnostic(
        code(ply::check::mismatch),
        help("The types {found} and {expected} are not assignable")
    )]
    Mismatch {
        expected: String,
        found: String,
        context: String,
        file: String,
        #[source_code]
        src: NamedSource<String>,
        #[label("has type {found}")]
        span: SourceSpan,
    },

    #[error("wrong number of arguments in call to {name}: want {expected}, have {found}")]
    #[diagnostic(code(ply::check::argument_count))]
    ArgumentCount {
        name: String,
        expected: String,
        found: usize,
        file: String,
        #[source_code]
        src: NamedSource<String>,
        #[label("in this call")]
        span: SourceSpan,
    },

    #[error("{ty} has no field or method {name}")]
    #[diagnostic(code(ply::check::unknown_selector))]
    UnknownSelector {
        ty: String,
        name: String,
        file: String,
        #[source_code]
        src: NamedSource<String>,
        #[label("unknown selector")]
        span: SourceSpan,
    },

    #[error("invalid operation: {message}")]
    #[diagnostic(code(ply::check::invalid_operation))]
    InvalidOperation {
        message: String,
        file: String,
        #[source_code]
        src: NamedSource<String>,
        #[label("here")]
        span: SourceSpan,
    },

    #[error("missing return in {name}")]
    #[diagnostic(
        code(ply::check::missing_return),
        help("Functions with a result must end in a return statement")
    )]
    MissingReturn {
        name: String,
        file: String,
        #[source_code]
        src: NamedSource<String>,
        #[label("function body ends here")]
        span: SourceSpan,
    },
}

impl CheckError {
    pub fn file(&self) -> &str {
        match self {
            CheckError::Import { file, .. }
            | CheckError::Undefined { file, .. }
            | CheckError::Redeclared { file, .. }
            | CheckError::Mismatch { file, .. }
            | CheckError::ArgumentCount { file, .. }
            | CheckError::UnknownSelector { file, .. }
            | CheckError::InvalidOperation { file, .. }
            | CheckError::MissingReturn { file, .. } => file,
        }
    }
}

pub type CheckResult<T> = Result<T, CheckError>;
