//! Generator registries
//!
//! Two static tables map a generic's name to the function that writes its
//! specialized declaration: one for free functions (`max(a, b)`) and one for
//! collection methods (`xs.filter(f)`). A lookup miss means the call is not
//! generic and stays as written.

use indexmap::IndexMap;
use lazy_static::lazy_static;
use ply_parser::{CallExpr, Expr, ExprKind};
use ply_typechecker::TypeTable;

mod funcs;
mod methods;

pub use methods::MethodCall;

/// A call the specializer asks a generator about
#[derive(Debug, Clone, Copy)]
pub struct CallSite<'a> {
    pub expr: &'a Expr,
    pub call: &'a CallExpr,
    pub table: &'a TypeTable,
}

impl<'a> CallSite<'a> {
    pub fn new(expr: &'a Expr, call: &'a CallExpr, table: &'a TypeTable) -> Self {
        Self { expr, call, table }
    }
}

/// How a method takes part in a fused pipeline
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    /// Transforms the element stream (`filter`, `map`, `take`, `drop`)
    Streaming,
    /// Folds the stream into a result (`sum`, `reduce`, `any`, ...)
    Terminal,
}

/// A registry entry: the trigger name and its generation function
pub struct Generator {
    pub name: &'static str,
    /// `None` for generics that need the whole collection materialized
    pub stage: Option<Stage>,
    /// Returns `None` when the call's types are unusable; the call is then
    /// left unchanged.
    pub generate: fn(&CallSite<'_>) -> Option<Specialization>,
}

impl Generator {
    pub fn is_fusible(&self) -> bool {
        self.stage.is_some()
    }
}

impl std::fmt::Debug for Generator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Generator")
            .field("name", &self.name)
            .field("stage", &self.stage)
            .finish_non_exhaustive()
    }
}

/// One specialized declaration and how to call it
#[derive(Debug, Clone, PartialEq)]
pub struct Specialization {
    /// Unique declaration name, encoding the instantiating types
    pub name: String,
    /// Complete declaration source, without a package clause
    pub source: String,
    pub rewrite: CallRewrite,
    /// Import paths the declaration's body refers to
    pub imports: Vec<&'static str>,
}

impl Specialization {
    pub fn callee(name: String, source: String) -> Self {
        Self {
            rewrite: CallRewrite::Callee(name.clone()),
            name,
            source,
            imports: Vec::new(),
        }
    }

    pub fn receiver_first(name: String, source: String) -> Self {
        Self {
            rewrite: CallRewrite::ReceiverFirst(name.clone()),
            name,
            source,
            imports: Vec::new(),
        }
    }

    pub fn with_import(mut self, path: &'static str) -> Self {
        self.imports.push(path);
        self
    }
}

/// Call-site rewrites, from the original call to a call of the generated
/// declaration
#[derive(Debug, Clone, PartialEq)]
pub enum CallRewrite {
    /// `f(args..)` becomes `name(args..)`
    Callee(String),
    /// `recv.m(args..)` becomes `name(recv, args..)`
    ReceiverFirst(String),
    /// `recv.a(x).b(y)` becomes `name(recv, x, y)`; `stages` calls are folded
    Fused { name: String, stages: usize },
}

impl CallRewrite {
    pub fn name(&self) -> &str {
        match self {
            CallRewrite::Callee(name) | CallRewrite::ReceiverFirst(name) => name,
            CallRewrite::Fused { name, .. } => name,
        }
    }

    /// Build the replacement for `call`. Argument expressions keep their ids.
    pub fn apply(&self, call: &CallExpr) -> Expr {
        match self {
            CallRewrite::Callee(name) => {
                let mut rewritten = Expr::call(name, call.args.clone());
                if let ExprKind::Call(new_call) = &mut rewritten.kind {
                    new_call.ellipsis = call.ellipsis;
                }
                rewritten
            }
            CallRewrite::ReceiverFirst(name) => match call.method() {
                Some((receiver, _)) => {
                    let mut args = Vec::with_capacity(call.args.len() + 1);
                    args.push(receiver.clone());
                    args.extend(call.args.iter().cloned());
                    Expr::call(name, args)
                }
                None => CallRewrite::Callee(name.clone()).apply(call),
            },
            CallRewrite::Fused { name, stages } => {
                // Outer to inner, then reversed so arguments read inner to outer
                let mut chain = vec![call];
                let mut receiver = call.method().map(|(receiver, _)| receiver);
                while chain.len() < *stages {
                    let Some(inner) = receiver.and_then(Expr::as_call) else {
                        break;
                    };
                    chain.push(inner);
                    receiver = inner.method().map(|(receiver, _)| receiver);
                }

                let mut args = Vec::new();
                if let Some(receiver) = receiver {
                    args.push(receiver.clone());
                }
                for stage in chain.iter().rev() {
                    args.extend(stage.args.iter().cloned());
                }
                Expr::call(name, args)
            }
        }
    }
}

lazy_static! {
    static ref FUNC_GENERATORS: IndexMap<&'static str, Generator> = funcs::generators()
        .into_iter()
        .map(|generator| (generator.name, generator))
        .collect();
    static ref METHOD_GENERATORS: IndexMap<&'static str, Generator> = methods::generators()
        .into_iter()
        .map(|generator| (generator.name, generator))
        .collect();
}

/// Generator for a free-function generic such as `max`
pub fn func_generator(name: &str) -> Option<&'static Generator> {
    FUNC_GENERATORS.get(name)
}

/// Generator for a collection method such as `filter`
pub fn method_generator(name: &str) -> Option<&'static Generator> {
    METHOD_GENERATORS.get(name)
}

pub fn func_generators() -> impl Iterator<Item = &'static Generator> {
    FUNC_GENERATORS.values()
}

pub fn method_generators() -> impl Iterator<Item = &'static Generator> {
    METHOD_GENERATORS.values()
}
