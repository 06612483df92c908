// Free-function generics: max, min, merge, not, repeat, zip

use super::{CallSite, Generator, Specialization};
use crate::mangle::{decl_name, instance_type};
use ply_parser::Expr;
use ply_typechecker::{FuncType, Type};

pub(super) fn generators() -> Vec<Generator> {
    vec![
        Generator {
            name: "max",
            stage: None,
            generate: |site| extremum(site, "max", ">"),
        },
        Generator {
            name: "min",
            stage: None,
            generate: |site| extremum(site, "min", "<"),
        },
        Generator {
            name: "merge",
            stage: None,
            generate: merge,
        },
        Generator {
            name: "not",
            stage: None,
            generate: not,
        },
        Generator {
            name: "repeat",
            stage: None,
            generate: repeat,
        },
        Generator {
            name: "zip",
            stage: None,
            generate: zip,
        },
    ]
}

fn arg_type(site: &CallSite<'_>, arg: &Expr) -> Option<Type> {
    site.table.type_of(arg).map(|ty| instance_type(site.table, ty))
}

fn func_arg(site: &CallSite<'_>, index: usize) -> Option<FuncType> {
    match arg_type(site, site.call.args.get(index)?)? {
        Type::Func(func) => Some(func),
        _ => None,
    }
}

/// `max(x, rest...)` and `min(x, rest...)` over the call's settled type
fn extremum(site: &CallSite<'_>, op: &str, better: &str) -> Option<Specialization> {
    let ty = site.table.type_of(site.expr)?.defaulted();
    let name = decl_name(op, &[ty.clone()]);
    let source = format!(
        "func {name}(x {ty}, rest ...{ty}) {ty} {{\n\
         \tfor _, v := range rest {{\n\
         \t\tif v {better} x {{\n\
         \t\t\tx = v\n\
         \t\t}}\n\
         \t}}\n\
         \treturn x\n\
         }}\n"
    );
    Some(Specialization::callee(name, source))
}

/// `merge(a, b)`: a new map holding the entries of both; `b` wins
fn merge(site: &CallSite<'_>) -> Option<Specialization> {
    let ty = arg_type(site, site.call.args.first()?)?;
    if !matches!(ty, Type::Map(..)) {
        return None;
    }
    let name = decl_name("merge", &[ty.clone()]);
    let source = format!(
        "func {name}(a {ty}, b {ty}) {ty} {{\n\
         \tout := make({ty}, len(a)+len(b))\n\
         \tfor k, v := range a {{\n\
         \t\tout[k] = v\n\
         \t}}\n\
         \tfor k, v := range b {{\n\
         \t\tout[k] = v\n\
         \t}}\n\
         \treturn out\n\
         }}\n"
    );
    Some(Specialization::callee(name, source))
}

/// `not(f)`: the negated predicate
fn not(site: &CallSite<'_>) -> Option<Specialization> {
    let func = func_arg(site, 0)?;
    let [param] = func.params.as_slice() else {
        return None;
    };
    let pred = Type::Func(func.clone());
    let name = decl_name("not", &[param.clone()]);
    let source = format!(
        "func {name}(f {pred}) {pred} {{\n\
         \treturn func(x {param}) bool {{\n\
         \t\treturn !f(x)\n\
         \t}}\n\
         }}\n"
    );
    Some(Specialization::callee(name, source))
}

/// `repeat(x, n)`: `n` copies of `x`
fn repeat(site: &CallSite<'_>) -> Option<Specialization> {
    let Type::Slice(elem) = site.table.type_of(site.expr)? else {
        return None;
    };
    let slice = Type::Slice(elem.clone());
    let name = decl_name("repeat", &[(**elem).clone()]);
    let source = format!(
        "func {name}(x {elem}, n int) {slice} {{\n\
         \tif n < 0 {{\n\
         \t\tn = 0\n\
         \t}}\n\
         \tout := make({slice}, 0, n)\n\
         \tfor i := 0; i < n; i++ {{\n\
         \t\tout = append(out, x)\n\
         \t}}\n\
         \treturn out\n\
         }}\n"
    );
    Some(Specialization::callee(name, source))
}

/// `zip(f, a, b)`: `f` applied pairwise, as long as the shorter input
fn zip(site: &CallSite<'_>) -> Option<Specialization> {
    let func = func_arg(site, 0)?;
    let ([a, b], Some(c)) = (func.params.as_slice(), func.result.as_deref()) else {
        return None;
    };
    let f = Type::Func(func.clone());
    let (slice_a, slice_b, slice_c) = (Type::slice(a.clone()), Type::slice(b.clone()), Type::slice(c.clone()));
    let name = decl_name("zip", &[a.clone(), b.clone(), c.clone()]);
    let source = format!(
        "func {name}(f {f}, a {slice_a}, b {slice_b}) {slice_c} {{\n\
         \tn := len(a)\n\
         \tif len(b) < n {{\n\
         \t\tn = len(b)\n\
         \t}}\n\
         \tout := make({slice_c}, 0, n)\n\
         \tfor i := 0; i < n; i++ {{\n\
         \t\tout = append(out, f(a[i], b[i]))\n\
         \t}}\n\
         \treturn out\n\
         }}\n"
    );
    Some(Specialization::callee(name, source))
}
