// Collection methods: slice and map generics called with method syntax

use super::{CallSite, Generator, Specialization, Stage};
use crate::mangle::{decl_name, instance_type};
use ply_parser::CallExpr;
use ply_typechecker::{Selection, Type, TypeTable};

pub(super) fn generators() -> Vec<Generator> {
    let streaming = Some(Stage::Streaming);
    let terminal = Some(Stage::Terminal);
    vec![
        Generator { name: "filter", stage: streaming, generate: filter },
        Generator { name: "map", stage: streaming, generate: map },
        Generator { name: "take", stage: streaming, generate: take },
        Generator { name: "drop", stage: streaming, generate: drop },
        Generator { name: "reduce", stage: terminal, generate: reduce },
        Generator { name: "sum", stage: terminal, generate: sum },
        Generator { name: "contains", stage: terminal, generate: contains },
        Generator { name: "any", stage: terminal, generate: any },
        Generator { name: "all", stage: terminal, generate: all },
        Generator { name: "foreach", stage: terminal, generate: foreach },
        Generator { name: "reverse", stage: None, generate: reverse },
        Generator { name: "sort", stage: None, generate: sort },
        Generator { name: "keys", stage: None, generate: keys },
        Generator { name: "elems", stage: None, generate: elems },
    ]
}

/// A checked `recv.op(args..)` collection method call, with the types the
/// generated code is written against
#[derive(Debug, Clone, PartialEq)]
pub struct MethodCall {
    pub op: String,
    pub receiver: Type,
    /// Slice element, or map value
    pub elem: Type,
    /// Instantiated parameter types
    pub params: Vec<Type>,
    /// Result type, [`Type::Void`] for `foreach`
    pub result: Type,
}

impl MethodCall {
    /// Resolve a call the checker recorded as a generic method.
    pub fn resolve(call: &CallExpr, table: &TypeTable) -> Option<Self> {
        let (receiver, method) = call.method()?;
        if table.selection(&call.func) != Some(&Selection::GenericMethod) {
            return None;
        }
        let Some(Type::Func(signature)) = table.type_of(&call.func) else {
            return None;
        };
        let receiver = instance_type(table, table.type_of(receiver)?);
        let elem = match &receiver {
            Type::Slice(elem) => (**elem).clone(),
            Type::Map(_, value) => (**value).clone(),
            _ => return None,
        };
        Some(Self {
            op: method.name.clone(),
            receiver,
            elem,
            params: signature.params.clone(),
            result: instance_type(table, &signature.result_type()),
        })
    }

    /// Name of the single-call specialization.
    ///
    /// The receiver type always takes part; `map` adds its element result,
    /// the two-argument `reduce` its accumulator and `sort` its comparison.
    pub fn decl_name(&self) -> String {
        let mut types = vec![self.receiver.clone()];
        match (self.op.as_str(), &self.result, self.params.as_slice()) {
            ("map", Type::Slice(mapped), _) => types.push((**mapped).clone()),
            ("reduce", _, [_, acc]) => types.push(acc.clone()),
            ("sort", _, [less]) => types.push(less.clone()),
            _ => {}
        }
        decl_name(&self.op, &types)
    }

    fn param(&self, index: usize) -> Option<&Type> {
        self.params.get(index)
    }
}

fn resolve(site: &CallSite<'_>) -> Option<MethodCall> {
    MethodCall::resolve(site.call, site.table)
}

fn filter(site: &CallSite<'_>) -> Option<Specialization> {
    let m = resolve(site)?;
    let (name, s, pred) = (m.decl_name(), &m.receiver, m.param(0)?);
    let source = format!(
        "func {name}(s {s}, pred {pred}) {s} {{\n\
         \tout := make({s}, 0, len(s))\n\
         \tfor _, v := range s {{\n\
         \t\tif pred(v) {{\n\
         \t\t\tout = append(out, v)\n\
         \t\t}}\n\
         \t}}\n\
         \treturn out\n\
         }}\n"
    );
    Some(Specialization::receiver_first(name, source))
}

fn map(site: &CallSite<'_>) -> Option<Specialization> {
    let m = resolve(site)?;
    let (name, s, f, out) = (m.decl_name(), &m.receiver, m.param(0)?, &m.result);
    let source = format!(
        "func {name}(s {s}, f {f}) {out} {{\n\
         \tout := make({out}, 0, len(s))\n\
         \tfor _, v := range s {{\n\
         \t\tout = append(out, f(v))\n\
         \t}}\n\
         \treturn out\n\
         }}\n"
    );
    Some(Specialization::receiver_first(name, source))
}

fn take(site: &CallSite<'_>) -> Option<Specialization> {
    let m = resolve(site)?;
    let (name, s) = (m.decl_name(), &m.receiver);
    let source = format!(
        "func {name}(s {s}, n int) {s} {{\n\
         \tif n < 0 {{\n\
         \t\tn = 0\n\
         \t}}\n\
         \tif n > len(s) {{\n\
         \t\tn = len(s)\n\
         \t}}\n\
         \tout := make({s}, 0, n)\n\
         \treturn append(out, s[:n]...)\n\
         }}\n"
    );
    Some(Specialization::receiver_first(name, source))
}

fn drop(site: &CallSite<'_>) -> Option<Specialization> {
    let m = resolve(site)?;
    let (name, s) = (m.decl_name(), &m.receiver);
    let source = format!(
        "func {name}(s {s}, n int) {s} {{\n\
         \tif n < 0 {{\n\
         \t\tn = 0\n\
         \t}}\n\
         \tif n > len(s) {{\n\
         \t\tn = len(s)\n\
         \t}}\n\
         \tout := make({s}, 0, len(s)-n)\n\
         \treturn append(out, s[n:]...)\n\
         }}\n"
    );
    Some(Specialization::receiver_first(name, source))
}

fn reduce(site: &CallSite<'_>) -> Option<Specialization> {
    let m = resolve(site)?;
    let (name, s, f, acc) = (m.decl_name(), &m.receiver, m.param(0)?, &m.result);
    let source = match m.param(1) {
        Some(init) => format!(
            "func {name}(s {s}, f {f}, acc {init}) {acc} {{\n\
             \tfor _, v := range s {{\n\
             \t\tacc = f(acc, v)\n\
             \t}}\n\
             \treturn acc\n\
             }}\n"
        ),
        None => format!(
            "func {name}(s {s}, f {f}) {acc} {{\n\
             \tvar acc {acc}\n\
             \tfor i, v := range s {{\n\
             \t\tif i == 0 {{\n\
             \t\t\tacc = v\n\
             \t\t}} else {{\n\
             \t\t\tacc = f(acc, v)\n\
             \t\t}}\n\
             \t}}\n\
             \treturn acc\n\
             }}\n"
        ),
    };
    Some(Specialization::receiver_first(name, source))
}

fn sum(site: &CallSite<'_>) -> Option<Specialization> {
    let m = resolve(site)?;
    let (name, s, elem) = (m.decl_name(), &m.receiver, &m.elem);
    let source = format!(
        "func {name}(s {s}) {elem} {{\n\
         \tvar acc {elem}\n\
         \tfor _, v := range s {{\n\
         \t\tacc += v\n\
         \t}}\n\
         \treturn acc\n\
         }}\n"
    );
    Some(Specialization::receiver_first(name, source))
}

fn contains(site: &CallSite<'_>) -> Option<Specialization> {
    let m = resolve(site)?;
    let (name, s, elem) = (m.decl_name(), &m.receiver, &m.elem);
    let source = format!(
        "func {name}(s {s}, x {elem}) bool {{\n\
         \tfor _, v := range s {{\n\
         \t\tif v == x {{\n\
         \t\t\treturn true\n\
         \t\t}}\n\
         \t}}\n\
         \treturn false\n\
         }}\n"
    );
    Some(Specialization::receiver_first(name, source))
}

fn any(site: &CallSite<'_>) -> Option<Specialization> {
    let m = resolve(site)?;
    let (name, s, pred) = (m.decl_name(), &m.receiver, m.param(0)?);
    let source = format!(
        "func {name}(s {s}, pred {pred}) bool {{\n\
         \tfor _, v := range s {{\n\
         \t\tif pred(v) {{\n\
         \t\t\treturn true\n\
         \t\t}}\n\
         \t}}\n\
         \treturn false\n\
         }}\n"
    );
    Some(Specialization::receiver_first(name, source))
}

fn all(site: &CallSite<'_>) -> Option<Specialization> {
    let m = resolve(site)?;
    let (name, s, pred) = (m.decl_name(), &m.receiver, m.param(0)?);
    let source = format!(
        "func {name}(s {s}, pred {pred}) bool {{\n\
         \tfor _, v := range s {{\n\
         \t\tif !pred(v) {{\n\
         \t\t\treturn false\n\
         \t\t}}\n\
         \t}}\n\
         \treturn true\n\
         }}\n"
    );
    Some(Specialization::receiver_first(name, source))
}

fn foreach(site: &CallSite<'_>) -> Option<Specialization> {
    let m = resolve(site)?;
    let (name, s, f) = (m.decl_name(), &m.receiver, m.param(0)?);
    let source = format!(
        "func {name}(s {s}, f {f}) {{\n\
         \tfor _, v := range s {{\n\
         \t\tf(v)\n\
         \t}}\n\
         }}\n"
    );
    Some(Specialization::receiver_first(name, source))
}

fn reverse(site: &CallSite<'_>) -> Option<Specialization> {
    let m = resolve(site)?;
    let (name, s) = (m.decl_name(), &m.receiver);
    let source = format!(
        "func {name}(s {s}) {s} {{\n\
         \tout := make({s}, len(s))\n\
         \tfor i, v := range s {{\n\
         \t\tout[len(s)-1-i] = v\n\
         \t}}\n\
         \treturn out\n\
         }}\n"
    );
    Some(Specialization::receiver_first(name, source))
}

/// Sorted copy of the receiver, backed by `sort.Slice`
fn sort(site: &CallSite<'_>) -> Option<Specialization> {
    let m = resolve(site)?;
    let (name, s) = (m.decl_name(), &m.receiver);
    let source = match m.param(0) {
        Some(less) => format!(
            "func {name}(s {s}, less {less}) {s} {{\n\
             \tout := make({s}, len(s))\n\
             \tcopy(out, s)\n\
             \tsort.Slice(out, func(i int, j int) bool {{\n\
             \t\treturn less(out[i], out[j])\n\
             \t}})\n\
             \treturn out\n\
             }}\n"
        ),
        None => format!(
            "func {name}(s {s}) {s} {{\n\
             \tout := make({s}, len(s))\n\
             \tcopy(out, s)\n\
             \tsort.Slice(out, func(i int, j int) bool {{\n\
             \t\treturn out[i] < out[j]\n\
             \t}})\n\
             \treturn out\n\
             }}\n"
        ),
    };
    Some(Specialization::receiver_first(name, source).with_import("sort"))
}

fn keys(site: &CallSite<'_>) -> Option<Specialization> {
    let m = resolve(site)?;
    let (name, recv, out) = (m.decl_name(), &m.receiver, &m.result);
    let source = format!(
        "func {name}(m {recv}) {out} {{\n\
         \tout := make({out}, 0, len(m))\n\
         \tfor k := range m {{\n\
         \t\tout = append(out, k)\n\
         \t}}\n\
         \treturn out\n\
         }}\n"
    );
    Some(Specialization::receiver_first(name, source))
}

fn elems(site: &CallSite<'_>) -> Option<Specialization> {
    let m = resolve(site)?;
    let (name, recv, out) = (m.decl_name(), &m.receiver, &m.result);
    let source = format!(
        "func {name}(m {recv}) {out} {{\n\
         \tout := make({out}, 0, len(m))\n\
         \tfor _, v := range m {{\n\
         \t\tout = append(out, v)\n\
         \t}}\n\
         \treturn out\n\
         }}\n"
    );
    Some(Specialization::receiver_first(name, source))
}
