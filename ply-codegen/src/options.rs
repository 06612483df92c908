//! Compile options

use std::path::Path;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Options {
    /// Extension of files that are specialized and rewritten
    pub dialect_extension: String,
    /// Extension given to rewritten files
    pub host_extension: String,
    /// File receiving every generated declaration, placed next to the first
    /// dialect file
    pub impls_file_name: String,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            dialect_extension: "ply".to_string(),
            host_extension: "go".to_string(),
            impls_file_name: "ply_impls.go".to_string(),
        }
    }
}

impl Options {
    pub fn is_dialect(&self, path: &str) -> bool {
        Path::new(path)
            .extension()
            .is_some_and(|ext| ext == self.dialect_extension.as_str())
    }

    /// `<dir>/<stem>.<host_extension>`
    pub fn output_path(&self, path: &str) -> String {
        Path::new(path)
            .with_extension(&self.host_extension)
            .to_string_lossy()
            .into_owned()
    }

    /// `<dir of path>/<impls_file_name>`
    pub fn impls_path(&self, path: &str) -> String {
        let dir = Path::new(path).parent().unwrap_or_else(|| Path::new(""));
        dir.join(&self.impls_file_name).to_string_lossy().into_owned()
    }
}
