//! Generated declarations collected while one file is specialized

use indexmap::{IndexMap, IndexSet};
use ply_parser::{parse_file, Decl, FileId};

/// File id given to parsed generated code
pub const GENERATED_FILE: FileId = FileId(u32::MAX - 1);

/// Generated declarations keyed by their unique name.
///
/// Inserting a name that is already present is a no-op, so identical
/// instantiations collapse and their text is parsed once.
#[derive(Debug, Clone, Default)]
pub struct SyntheticPackage {
    package: String,
    decls: IndexMap<String, Vec<Decl>>,
}

impl SyntheticPackage {
    pub fn new(package: impl Into<String>) -> Self {
        Self {
            package: package.into(),
            decls: IndexMap::new(),
        }
    }

    pub fn contains(&self, name: &str) -> bool {
        self.decls.contains_key(name)
    }

    /// Parse and add the declaration `source` under `name` unless present.
    ///
    /// Returns `true` when the declaration was added.
    ///
    /// # Panics
    ///
    /// Panics when `source` is not valid host-language code. Generators must
    /// only produce parseable declarations.
    pub fn insert(&mut self, name: &str, source: &str) -> bool {
        if self.contains(name) {
            tracing::trace!(name, "declaration already generated");
            return false;
        }
        let text = format!("package {}\n\n{source}", self.package);
        let file = match parse_file(&text, GENERATED_FILE, name) {
            Ok(file) => file,
            Err(err) => panic!("generated declaration {name} does not parse: {err}\n{text}"),
        };
        self.decls.insert(name.to_string(), file.decls);
        true
    }

    pub fn len(&self) -> usize {
        self.decls.len()
    }

    pub fn is_empty(&self) -> bool {
        self.decls.is_empty()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.decls.keys().map(String::as_str)
    }

    pub fn decls(&self, name: &str) -> Option<&[Decl]> {
        self.decls.get(name).map(Vec::as_slice)
    }

    pub fn into_decls(self) -> impl Iterator<Item = (String, Vec<Decl>)> {
        self.decls.into_iter()
    }
}

/// Import paths generated code needs, separate from a file's own imports
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ImportSet(IndexSet<String>);

impl ImportSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns `true` when `path` was not yet required.
    pub fn insert(&mut self, path: &str) -> bool {
        self.0.insert(path.to_string())
    }

    pub fn contains(&self, path: &str) -> bool {
        self.0.contains(path)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }
}
