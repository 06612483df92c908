//! Package import resolution
//!
//! The checker asks an [`Importer`] for every import path a file declares.
//! [`StdImporter`] knows the small standard library the language ships with.

use crate::types::{FuncType, Type};
use indexmap::IndexMap;
use lazy_static::lazy_static;
use miette::Diagnostic;
use thiserror::Error;

/// Exported members of an imported package
#[derive(Debug, Clone, PartialEq)]
pub struct Package {
    pub path: String,
    /// Name the package is referred to by in source
    pub name: String,
    pub members: IndexMap<String, Type>,
}

impl Package {
    pub fn new(path: impl Into<String>) -> Self {
        let path = path.into();
        let name = path.rsplit('/').next().unwrap_or(&path).to_string();
        Self {
            path,
            name,
            members: IndexMap::new(),
        }
    }

    pub fn with_func(mut self, name: &str, func: FuncType) -> Self {
        self.members.insert(name.to_string(), Type::Func(func));
        self
    }

    pub fn member(&self, name: &str) -> Option<&Type> {
        self.members.get(name)
    }
}

#[derive(Error, Diagnostic, Debug, Clone, PartialEq)]
pub enum ImportError {
    #[error("could not import {path} (package not found)")]
    #[diagnostic(
        code(ply::import::not_found),
        help("Available packages: {available}")
    )]
    NotFound { path: String, available: String },

    #[error("could not import {path}: {message}")]
    #[diagnostic(code(ply::import::failed))]
    Failed { path: String, message: String },
}

impl ImportError {
    pub fn path(&self) -> &str {
        match self {
            ImportError::NotFound { path, .. } | ImportError::Failed { path, .. } => path,
        }
    }
}

/// Resolves import paths to packages
pub trait Importer {
    fn import(&self, path: &str) -> Result<Package, ImportError>;
}

lazy_static! {
    static ref STD_PACKAGES: IndexMap<&'static str, Package> = {
        let mut packages = IndexMap::new();

        packages.insert(
            "fmt",
            Package::new("fmt")
                .with_func("Println", FuncType::new(vec![Type::slice(Type::Any)], None).variadic())
                .with_func(
                    "Sprint",
                    FuncType::new(vec![Type::slice(Type::Any)], Some(Type::string())).variadic(),
                ),
        );

        packages.insert(
            "sort",
            Package::new("sort")
                .with_func(
                    "Slice",
                    FuncType::new(
                        vec![Type::Any, Type::func(vec![Type::int(), Type::int()], Some(Type::bool()))],
                        None,
                    ),
                )
                .with_func("Ints", FuncType::new(vec![Type::slice(Type::int())], None))
                .with_func("Strings", FuncType::new(vec![Type::slice(Type::string())], None))
                .with_func("Float64s", FuncType::new(vec![Type::slice(Type::float64())], None)),
        );

        packages.insert(
            "strings",
            Package::new("strings")
                .with_func("ToUpper", FuncType::new(vec![Type::string()], Some(Type::string())))
                .with_func(
                    "Repeat",
                    FuncType::new(vec![Type::string(), Type::int()], Some(Type::string())),
                )
                .with_func(
                    "Contains",
                    FuncType::new(vec![Type::string(), Type::string()], Some(Type::bool())),
                ),
        );

        packages
    };
}

/// Importer for the standard packages: `fmt`, `sort` and `strings`
#[derive(Debug, Clone, Copy, Default)]
pub struct StdImporter;

impl Importer for StdImporter {
    fn import(&self, path: &str) -> Result<Package, ImportError> {
        STD_PACKAGES
            .get(path)
            .cloned()
            .ok_or_else(|| ImportError::NotFound {
                path: path.to_string(),
                available: STD_PACKAGES.keys().copied().collect::<Vec<_>>().join(", "),
            })
    }
}
