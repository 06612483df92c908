//! Declaration names that encode their instantiating types
//!
//! `filter` over `[]int` becomes `filter_sliceOfint`, `merge` over
//! `map[string]int` becomes `merge_mapOfstringToint`. Distinct instantiations
//! never share a name, identical ones always do.

use ply_typechecker::{BasicKind, Type, TypeTable};

/// Mangled spelling of a type. Untyped constants are defaulted first.
pub fn mangle(ty: &Type) -> String {
    match ty.defaulted() {
        Type::Basic(BasicKind::UntypedNil) => "nil".to_string(),
        Type::Basic(kind) => kind.name().to_string(),
        Type::Named(name) => name,
        Type::Slice(elem) => format!("sliceOf{}", mangle(&elem)),
        Type::Map(key, value) => format!("mapOf{}To{}", mangle(&key), mangle(&value)),
        Type::Func(func) => {
            // `Ret` always ends the parameter list
            let mut params: Vec<String> = func.params.iter().map(mangle).collect();
            if func.variadic {
                if let Some(last) = params.last_mut() {
                    last.insert_str(0, "variadic");
                }
            }
            let result = func.result.as_deref().map_or_else(|| "void".to_string(), mangle);
            format!("funcOf{}Ret{}", params.join("And"), result)
        }
        Type::Struct(fields) => {
            let fields: Vec<String> = fields
                .iter()
                .map(|field| format!("{}{}", field.name, mangle(&field.ty)))
                .collect();
            format!("structOf{}End", fields.join("And"))
        }
        Type::Any => "any".to_string(),
        Type::Void => "void".to_string(),
    }
}

/// `<op>_<type>_<type>...`
pub fn decl_name(op: &str, types: &[Type]) -> String {
    let mut name = op.to_string();
    for ty in types {
        name.push('_');
        name.push_str(&mangle(ty));
    }
    name
}

/// Name of a fused pipeline: the stage names joined with `_then_`
pub fn fused_name<S: AsRef<str>>(stages: &[S]) -> String {
    stages
        .iter()
        .map(AsRef::as_ref)
        .collect::<Vec<_>>()
        .join("_then_")
}

/// Type a generated declaration is written against.
///
/// Named slice, map and function types are replaced by their underlying type
/// so that `Names` and `[]string` share one instantiation; the call site is
/// converted back to the named type after rewriting. Other named types (a
/// `Celsius float64` element, say) are kept, since a generated body needs
/// their operators and identity.
pub fn instance_type(table: &TypeTable, ty: &Type) -> Type {
    match table.underlying(ty) {
        underlying @ (Type::Slice(_) | Type::Map(..) | Type::Func(_)) => underlying,
        _ => ty.defaulted(),
    }
}
