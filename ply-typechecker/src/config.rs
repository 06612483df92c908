//! Checker configuration

use crate::importer::{Importer, StdImporter};
use std::fmt;

pub struct Config {
    pub importer: Box<dyn Importer>,
    /// Enables the generic built-ins (`max`, `merge`, `xs.filter(..)`, ...)
    pub dialect: bool,
}

impl Config {
    pub fn new(importer: impl Importer + 'static, dialect: bool) -> Self {
        Self {
            importer: Box::new(importer),
            dialect,
        }
    }

    /// Plain host-language checking: generic built-ins are not in scope
    pub fn host() -> Self {
        Self::new(StdImporter, false)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::new(StdImporter, true)
    }
}

impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("dialect", &self.dialect)
            .finish_non_exhaustive()
    }
}
