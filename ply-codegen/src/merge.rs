//! Merging generated declarations into one unit

use crate::synthetic::{ImportSet, SyntheticPackage, GENERATED_FILE};
use indexmap::IndexSet;
use ply_parser::{add_import, File, Ident, Span};

/// Combine the generated declarations of every specialized file.
///
/// Declarations are deduplicated by name, first occurrence first; imports are
/// added once per path.
pub fn merge<I>(package: &str, parts: I) -> File
where
    I: IntoIterator<Item = (SyntheticPackage, ImportSet)>,
{
    let mut file = File {
        id: GENERATED_FILE,
        name: None,
        source: String::new(),
        package: Ident::synthetic(package),
        imports: Vec::new(),
        decls: Vec::new(),
        span: Span::synthetic(),
    };

    let mut seen = IndexSet::new();
    for (synthetic, imports) in parts {
        for path in imports.iter() {
            add_import(&mut file, path);
        }
        for (name, decls) in synthetic.into_decls() {
            if seen.insert(name.clone()) {
                file.decls.extend(decls);
            } else {
                tracing::trace!(name = %name, "dropping duplicate declaration");
            }
        }
    }
    file
}
