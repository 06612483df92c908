//! Runtime error types for the Ply interpreter.
//!
//! Go would panic in each of these situations; the interpreter stops and
//! reports instead.

use miette::{Diagnostic, SourceSpan};
use ply_parser::Span;
use thiserror::Error;

#[derive(Error, Diagnostic, Debug, Clone, PartialEq)]
pub enum RuntimeError {
    #[error("index out of range [{index}] with length {length}")]
    #[diagnostic(
        code(ply::runtime::index_out_of_range),
        help("Ensure the index is within the valid range [0, {length})")
    )]
    IndexOutOfRange {
        index: i64,
        length: usize,
        #[label("invalid index")]
        span: Option<SourceSpan>,
    },

    #[error("slice bounds out of range [{low}:{high}] with capacity {capacity}")]
    #[diagnostic(code(ply::runtime::slice_bounds))]
    SliceBounds {
        low: i64,
        high: i64,
        capacity: usize,
        #[label("invalid slice bounds")]
        span: Option<SourceSpan>,
    },

    #[error("integer divide by zero")]
    #[diagnostic(
        code(ply::runtime::division_by_zero),
        help("Ensure the divisor is not zero before division")
    )]
    DivisionByZero {
        #[label("division by zero here")]
        span: Option<SourceSpan>,
    },

    #[error("assignment to entry in nil map")]
    #[diagnostic(
        code(ply::runtime::nil_map),
        help("Initialize the map with make or a map literal first")
    )]
    NilMapWrite {
        #[label("map is nil")]
        span: Option<SourceSpan>,
    },

    #[error("call of nil function")]
    #[diagnostic(code(ply::runtime::nil_function))]
    NilCall {
        #[label("function value is nil")]
        span: Option<SourceSpan>,
    },

    #[error("makeslice: len out of range")]
    #[diagnostic(code(ply::runtime::make_len))]
    MakeLength {
        #[label("negative length or capacity")]
        span: Option<SourceSpan>,
    },

    #[error("Undefined: {name}")]
    #[diagnostic(
        code(ply::runtime::undefined),
        help("The program must be type-checked before it is run")
    )]
    Undefined {
        name: String,
        #[label("not defined")]
        span: Option<SourceSpan>,
    },

    #[error("{name} must be specialized before the program can run")]
    #[diagnostic(
        code(ply::runtime::generic),
        help("Compile dialect files with `ply build` first")
    )]
    Unspecialized {
        name: String,
        #[label("generic call")]
        span: Option<SourceSpan>,
    },

    #[error("Type error: expected {expected}, found {found}")]
    #[diagnostic(code(ply::runtime::type_error))]
    TypeError {
        expected: String,
        found: String,
        #[label("type mismatch here")]
        span: Option<SourceSpan>,
    },

    #[error("panic: {message}")]
    #[diagnostic(code(ply::runtime::panic))]
    Panic {
        message: String,
        #[label("panicked here")]
        span: Option<SourceSpan>,
    },

    #[error("function main is undeclared in the main package")]
    #[diagnostic(code(ply::runtime::no_main))]
    MissingMain,

    #[error("write failed: {message}")]
    #[diagnostic(code(ply::runtime::output))]
    Output { message: String },
}

impl RuntimeError {
    pub fn index_out_of_range(index: i64, length: usize, span: Span) -> Self {
        Self::IndexOutOfRange {
            index,
            length,
            span: span_to_source_span(span),
        }
    }

    pub fn division_by_zero(span: Span) -> Self {
        Self::DivisionByZero {
            span: span_to_source_span(span),
        }
    }

    pub fn undefined(name: impl Into<String>, span: Span) -> Self {
        Self::Undefined {
            name: name.into(),
            span: span_to_source_span(span),
        }
    }

    pub fn type_error(expected: &str, found: &str, span: Span) -> Self {
        Self::TypeError {
            expected: expected.to_string(),
            found: found.to_string(),
            span: span_to_source_span(span),
        }
    }

    pub fn panic(message: impl Into<String>, span: Span) -> Self {
        Self::Panic {
            message: message.into(),
            span: span_to_source_span(span),
        }
    }

    pub fn unspecialized(name: impl Into<String>, span: Span) -> Self {
        Self::Unspecialized {
            name: name.into(),
            span: span_to_source_span(span),
        }
    }
}

impl From<std::io::Error> for RuntimeError {
    fn from(err: std::io::Error) -> Self {
        Self::Output {
            message: err.to_string(),
        }
    }
}

/// Synthetic spans carry no location.
pub(crate) fn span_to_source_span(span: Span) -> Option<SourceSpan> {
    if span == Span::synthetic() {
        None
    } else {
        Some(SourceSpan::new(span.start.into(), span.len()))
    }
}

pub type RuntimeResult<T> = Result<T, RuntimeError>;
