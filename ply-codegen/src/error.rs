//! Compile errors
//!
//! Front-end errors pass through unchanged. Import failures are lifted out of
//! the checker's error so the importer's message is reported as it is.

use miette::Diagnostic;
use ply_parser::ParseError;
use ply_typechecker::{CheckError, ImportError};
use thiserror::Error;

#[derive(Error, Diagnostic, Debug)]
pub enum CompileError {
    #[error(transparent)]
    #[diagnostic(transparent)]
    Parse(#[from] ParseError),

    #[error(transparent)]
    #[diagnostic(transparent)]
    Import(ImportError),

    #[error(transparent)]
    #[diagnostic(transparent)]
    Check(CheckError),
}

impl From<CheckError> for CompileError {
    fn from(err: CheckError) -> Self {
        match err {
            CheckError::Import { source, .. } => CompileError::Import(source),
            other => CompileError::Check(other),
        }
    }
}

pub type CompileResult<T> = Result<T, CompileError>;
