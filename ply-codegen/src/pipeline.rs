//! Pipeline detection and fusion
//!
//! A chain such as `xs.filter(p).map(f).sum()` is walked from the outermost
//! call inwards. When every stage can stream, the whole chain becomes one
//! generated function with a single loop over `xs` and no intermediate
//! slices.

use crate::mangle::fused_name;
use crate::registry::{method_generator, CallRewrite, MethodCall, Specialization, Stage};
use ply_parser::CallExpr;
use ply_typechecker::{Type, TypeTable};
use std::fmt;

/// Why a chain was not fused. Rejected chains fall back to one
/// specialization per call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Rejection {
    TooShort,
    Unrecognized(String),
    NotFusible(String),
    NativeMethod(String),
    TerminalNotLast(String),
    Untyped,
}

impl fmt::Display for Rejection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Rejection::TooShort => write!(f, "fewer than two chained calls"),
            Rejection::Unrecognized(name) => write!(f, "{name} is not a generic method"),
            Rejection::NotFusible(name) => write!(f, "{name} needs the whole collection"),
            Rejection::NativeMethod(name) => write!(f, "receiver declares its own {name}"),
            Rejection::TerminalNotLast(name) => write!(f, "{name} ends a pipeline but is not last"),
            Rejection::Untyped => write!(f, "a stage has no usable slice type"),
        }
    }
}

/// One fusible stage of a plan
#[derive(Debug, Clone, PartialEq)]
pub struct PlanStage {
    pub method: MethodCall,
    pub stage: Stage,
}

/// A fusible chain, valid for the call site it was built from
#[derive(Debug, Clone, PartialEq)]
pub struct PipelinePlan<'a> {
    /// Chained calls, outermost first
    pub calls: Vec<&'a CallExpr>,
    /// Resolved stages, innermost first
    pub stages: Vec<PlanStage>,
}

/// Calls of `recv.a().b().c()`, outermost first.
///
/// The walk continues while a call's receiver is itself a call through a
/// selector; identifiers, parentheses, index and slice expressions,
/// literals and plain calls end the chain.
pub fn collect_chain(call: &CallExpr) -> Vec<&CallExpr> {
    let mut chain = Vec::new();
    let mut current = Some(call);
    while let Some(call) = current {
        let Some((receiver, _)) = call.method() else {
            break;
        };
        chain.push(call);
        current = receiver.as_call();
    }
    chain
}

/// Build a fusion plan for the chain ending in `call`.
pub fn build<'a>(call: &'a CallExpr, table: &TypeTable) -> Result<PipelinePlan<'a>, Rejection> {
    let calls = collect_chain(call);
    if calls.len() < 2 {
        return Err(Rejection::TooShort);
    }

    let mut stages = Vec::with_capacity(calls.len());
    let last = calls.len() - 1;
    for (position, call) in calls.iter().rev().enumerate() {
        let Some((receiver, method)) = call.method() else {
            return Err(Rejection::Untyped);
        };
        let name = method.name.as_str();
        let Some(generator) = method_generator(name) else {
            return Err(Rejection::Unrecognized(name.to_string()));
        };
        let Some(receiver_ty) = table.type_of(receiver) else {
            return Err(Rejection::Untyped);
        };
        if table.has_method(receiver_ty, name) {
            return Err(Rejection::NativeMethod(name.to_string()));
        }
        let Some(stage) = generator.stage else {
            return Err(Rejection::NotFusible(name.to_string()));
        };
        if stage == Stage::Terminal && position != last {
            return Err(Rejection::TerminalNotLast(name.to_string()));
        }
        let method = MethodCall::resolve(call, table).ok_or(Rejection::Untyped)?;
        if !matches!(method.receiver, Type::Slice(_)) {
            return Err(Rejection::Untyped);
        }
        stages.push(PlanStage { method, stage });
    }

    Ok(PipelinePlan { calls, stages })
}

impl PipelinePlan<'_> {
    pub fn name(&self) -> String {
        let names: Vec<String> = self.stages.iter().map(|s| s.method.decl_name()).collect();
        fused_name(&names)
    }

    /// The fused declaration and its call-site rewrite
    pub fn generate(&self) -> Specialization {
        let name = self.name();
        let mut fused = Fused::default();
        let source = self.stages.first().map(|s| s.method.receiver.clone()).unwrap_or(Type::Void);
        fused.params.push(format!("s {source}"));

        let mut current = "v0".to_string();
        let mut terminal = None;
        for (index, stage) in self.stages.iter().enumerate() {
            let method = &stage.method;
            match method.op.as_str() {
                "filter" => {
                    let pred = fused.param(&method.params[0]);
                    fused.body(&[&format!("if !{pred}({current}) {{"), "\tcontinue", "}"]);
                }
                "map" => {
                    let f = fused.param(&method.params[0]);
                    let next = format!("v{}", index + 1);
                    fused.body(&[&format!("{next} := {f}({current})")]);
                    current = next;
                }
                "take" => {
                    let n = fused.param(&Type::int());
                    let count = format!("c{index}");
                    fused.setup.push(format!("{count} := 0"));
                    fused.body(&[
                        &format!("if {count} >= {n} {{"),
                        "\tbreak",
                        "}",
                        &format!("{count}++"),
                    ]);
                }
                "drop" => {
                    let n = fused.param(&Type::int());
                    let count = format!("c{index}");
                    fused.setup.push(format!("{count} := 0"));
                    fused.body(&[
                        &format!("if {count} < {n} {{"),
                        &format!("\t{count}++"),
                        "\tcontinue",
                        "}",
                    ]);
                }
                _ => {
                    fused.terminal(method, &current);
                    terminal = Some(method);
                }
            }
        }

        let result = match terminal {
            Some(method) => method.result.clone(),
            None => {
                let out = self.stages.last().map(|s| s.method.result.clone()).unwrap_or(Type::Void);
                fused.setup.push(format!("out := make({out}, 0, len(s))"));
                fused.body(&[&format!("out = append(out, {current})")]);
                fused.finish.push("return out".to_string());
                out
            }
        };

        Specialization {
            source: fused.render(&name, &result),
            rewrite: CallRewrite::Fused {
                name: name.clone(),
                stages: self.calls.len(),
            },
            name,
            imports: Vec::new(),
        }
    }
}

/// Pieces of a fused function body
#[derive(Debug, Default)]
struct Fused {
    params: Vec<String>,
    /// Statements before the loop
    setup: Vec<String>,
    /// Statements inside the loop
    body: Vec<String>,
    /// Statements after the loop
    finish: Vec<String>,
}

impl Fused {
    /// Declare the next stage argument as a parameter
    fn param(&mut self, ty: &Type) -> String {
        let name = format!("a{}", self.params.len() - 1);
        self.params.push(format!("{name} {ty}"));
        name
    }

    fn body(&mut self, lines: &[&str]) {
        self.body.extend(lines.iter().map(|line| line.to_string()));
    }

    fn terminal(&mut self, method: &MethodCall, current: &str) {
        match (method.op.as_str(), method.params.as_slice()) {
            ("reduce", [f, init]) => {
                let (f, init) = (self.param(f), self.param(init));
                self.setup.push(format!("acc := {init}"));
                self.body(&[&format!("acc = {f}(acc, {current})")]);
                self.finish.push("return acc".to_string());
            }
            ("reduce", [f]) => {
                let f = self.param(f);
                self.setup.push(format!("var acc {}", method.result));
                self.setup.push("started := false".to_string());
                self.body(&[
                    "if started {",
                    &format!("\tacc = {f}(acc, {current})"),
                    "} else {",
                    &format!("\tacc = {current}"),
                    "\tstarted = true",
                    "}",
                ]);
                self.finish.push("return acc".to_string());
            }
            ("sum", _) => {
                self.setup.push(format!("var acc {}", method.elem));
                self.body(&[&format!("acc += {current}")]);
                self.finish.push("return acc".to_string());
            }
            ("contains", [x]) => {
                let x = self.param(x);
                self.body(&[&format!("if {current} == {x} {{"), "\treturn true", "}"]);
                self.finish.push("return false".to_string());
            }
            ("any", [pred]) => {
                let pred = self.param(pred);
                self.body(&[&format!("if {pred}({current}) {{"), "\treturn true", "}"]);
                self.finish.push("return false".to_string());
            }
            ("all", [pred]) => {
                let pred = self.param(pred);
                self.body(&[&format!("if !{pred}({current}) {{"), "\treturn false", "}"]);
                self.finish.push("return true".to_string());
            }
            ("foreach", [f]) => {
                let f = self.param(f);
                self.body(&[&format!("{f}({current})")]);
            }
            (op, _) => unreachable!("{op} is not a terminal stage"),
        }
    }

    fn render(&self, name: &str, result: &Type) -> String {
        let mut out = format!("func {name}({})", self.params.join(", "));
        if *result != Type::Void {
            out.push_str(&format!(" {result}"));
        }
        out.push_str(" {\n");
        for line in &self.setup {
            out.push_str(&format!("\t{line}\n"));
        }
        out.push_str("\tfor _, v0 := range s {\n");
        for line in &self.body {
            out.push_str(&format!("\t\t{line}\n"));
        }
        out.push_str("\t}\n");
        for line in &self.finish {
            out.push_str(&format!("\t{line}\n"));
        }
        out.push_str("}\n");
        out
    }
}
