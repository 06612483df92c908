//! Statement execution and function calls.

use crate::environment::Scope;
use crate::error::{RuntimeError, RuntimeResult};
use crate::value::{Function, MapValue, SliceValue, Value};
use ply_parser::{Block, Decl, ElseBranch, File, FuncDecl, FuncLit, IfStmt, Signature, Span, Stmt, StmtKind, TypeExpr, TypeExprKind};
use ply_typechecker::{BasicKind, Field, Type, TypeTable};
use std::collections::HashMap;
use std::io::Write;
use std::rc::Rc;

/// Control flow out of a statement
#[derive(Debug)]
pub(crate) enum Flow<'a> {
    Normal,
    Break,
    Continue,
    Return(Value<'a>),
}

/// Evaluates one checked package.
///
/// The interpreter trusts the type table: it never re-derives types, and a
/// node the checker did not record is reported as undefined.
pub struct Interpreter<'a> {
    pub(crate) table: &'a TypeTable,
    pub(crate) functions: HashMap<&'a str, &'a FuncDecl>,
    pub(crate) methods: HashMap<(&'a str, &'a str), &'a FuncDecl>,
    pub(crate) globals: Rc<Scope<'a>>,
    pub(crate) env: Rc<Scope<'a>>,
    pub(crate) out: &'a mut dyn Write,
}

impl<'a> Interpreter<'a> {
    /// Index the package's functions and initialize its variables
    pub fn new(files: &'a [File], table: &'a TypeTable, out: &'a mut dyn Write) -> RuntimeResult<Self> {
        let mut functions = HashMap::new();
        let mut methods = HashMap::new();
        for decl in files.iter().flat_map(|file| &file.decls) {
            let Decl::Func(func) = decl else { continue };
            match &func.receiver {
                Some(receiver) => {
                    if let TypeExprKind::Name(type_name) = &receiver.ty.kind {
                        methods.insert((type_name.as_str(), func.name.name.as_str()), func);
                    }
                }
                None => {
                    functions.insert(func.name.name.as_str(), func);
                }
            }
        }

        let globals = Scope::root();
        let mut interpreter = Self {
            table,
            functions,
            methods,
            env: Rc::clone(&globals),
            globals,
            out,
        };

        for decl in files.iter().flat_map(|file| &file.decls) {
            if let Decl::Var(var) = decl {
                let value = match (&var.value, &var.ty) {
                    (Some(value), _) => interpreter.eval(value)?,
                    (None, Some(ty)) => interpreter.zero_of(ty),
                    (None, None) => Value::Nil,
                };
                interpreter.globals.define(&var.name.name, value);
            }
        }
        tracing::trace!(
            functions = interpreter.functions.len(),
            methods = interpreter.methods.len(),
            "package initialized"
        );
        Ok(interpreter)
    }

    /// Call `main` and flush the output
    pub fn run_main(&mut self) -> RuntimeResult<()> {
        let main = *self.functions.get("main").ok_or(RuntimeError::MissingMain)?;
        self.call_function(&Function::Decl(main), Vec::new(), main.span)?;
        self.out.flush()?;
        Ok(())
    }

    /// Call a function value with already evaluated arguments.
    ///
    /// Variadic arguments arrive packed into a slice as the last argument.
    pub fn call_function(&mut self, func: &Function<'a>, args: Vec<Value<'a>>, span: Span) -> RuntimeResult<Value<'a>> {
        let (signature, body, scope): (&'a Signature, &'a Block, _) = match func {
            Function::Decl(decl) => {
                let decl: &'a FuncDecl = *decl;
                (&decl.signature, &decl.body, Scope::child(&self.globals))
            }
            Function::Method { decl, receiver } => {
                let decl: &'a FuncDecl = *decl;
                let scope = Scope::child(&self.globals);
                if let Some(binding) = &decl.receiver {
                    scope.define(&binding.name.name, (**receiver).clone());
                }
                (&decl.signature, &decl.body, scope)
            }
            Function::Closure { lit, env } => {
                let lit: &'a FuncLit = *lit;
                (&lit.signature, &lit.body, Scope::child(env))
            }
            Function::Native { package, name } => return self.call_native(package, name, args, span),
        };
        bind_params(&scope, signature, args);

        let saved = std::mem::replace(&mut self.env, scope);
        let flow = self.exec_stmts(&body.stmts);
        self.env = saved;
        match flow? {
            Flow::Return(value) => Ok(value),
            _ => Ok(Value::Nil),
        }
    }

    /// Run `body` in a fresh scope nested in the current one
    pub(crate) fn scoped<T>(&mut self, body: impl FnOnce(&mut Self) -> RuntimeResult<T>) -> RuntimeResult<T> {
        let inner = Scope::child(&self.env);
        let saved = std::mem::replace(&mut self.env, inner);
        let result = body(self);
        self.env = saved;
        result
    }

    pub(crate) fn exec_block(&mut self, block: &'a Block) -> RuntimeResult<Flow<'a>> {
        self.scoped(|this| this.exec_stmts(&block.stmts))
    }

    pub(crate) fn exec_stmts(&mut self, stmts: &'a [Stmt]) -> RuntimeResult<Flow<'a>> {
        for stmt in stmts {
            match self.exec(stmt)? {
                Flow::Normal => {}
                flow => return Ok(flow),
            }
        }
        Ok(Flow::Normal)
    }

    fn exec(&mut self, stmt: &'a Stmt) -> RuntimeResult<Flow<'a>> {
        match &stmt.kind {
            StmtKind::Expr(expr) => {
                self.eval(expr)?;
            }
            StmtKind::ShortVar { name, value } => {
                let value = self.eval(value)?;
                self.env.define(&name.name, value);
            }
            StmtKind::Var(var) => {
                let value = match (&var.value, &var.ty) {
                    (Some(value), _) => self.eval(value)?,
                    (None, Some(ty)) => self.zero_of(ty),
                    (None, None) => Value::Nil,
                };
                self.env.define(&var.name.name, value);
            }
            // Constant uses are folded by the checker
            StmtKind::Const(_) => {}
            StmtKind::Assign { target, op, value } => {
                let value = self.eval(value)?;
                let value = match op.binary() {
                    Some(op) => {
                        let current = self.eval(target)?;
                        self.binary_op(op, current, value, stmt.span)?
                    }
                    None => value,
                };
                self.assign(target, value)?;
            }
            StmtKind::IncDec { target, increment } => {
                let current = self.eval(target)?;
                let step = if *increment { 1 } else { -1 };
                let value = match current {
                    Value::Int(n) => Value::Int(n.wrapping_add(step)),
                    Value::Float(f) => Value::Float(f + step as f64),
                    other => return Err(RuntimeError::type_error("number", other.type_name(), stmt.span)),
                };
                self.assign(target, value)?;
            }
            StmtKind::Return(value) => {
                let value = match value {
                    Some(expr) => self.eval(expr)?,
                    None => Value::Nil,
                };
                return Ok(Flow::Return(value));
            }
            StmtKind::Break => return Ok(Flow::Break),
            StmtKind::Continue => return Ok(Flow::Continue),
            StmtKind::Block(block) => return self.exec_block(block),
            StmtKind::If(if_stmt) => return self.exec_if(if_stmt),
            StmtKind::For(for_stmt) => {
                return self.scoped(|this| {
                    if let Some(init) = &for_stmt.init {
                        this.exec(init)?;
                    }
                    loop {
                        if let Some(cond) = &for_stmt.cond {
                            if !this.condition(cond)? {
                                break;
                            }
                        }
                        match this.exec_block(&for_stmt.body)? {
                            Flow::Break => break,
                            flow @ Flow::Return(_) => return Ok(flow),
                            Flow::Continue | Flow::Normal => {}
                        }
                        if let Some(post) = &for_stmt.post {
                            this.exec(post)?;
                        }
                    }
                    Ok(Flow::Normal)
                });
            }
            StmtKind::Range(range) => {
                let iterable = self.eval(&range.iterable)?;
                let pairs: Box<dyn Iterator<Item = (Value<'a>, Value<'a>)> + 'a> = match iterable {
                    // The header is fixed when the loop starts; elements are read live.
                    Value::Slice(slice) => Box::new(
                        (0..slice.len()).map(move |i| (Value::Int(i as i64), slice.get(i).unwrap_or(Value::Nil))),
                    ),
                    Value::Map(map) => Box::new(map.entries().into_iter()),
                    Value::Int(n) => Box::new((0..n.max(0)).map(|i| (Value::Int(i), Value::Nil))),
                    other => {
                        return Err(RuntimeError::type_error("slice, map or int", other.type_name(), range.iterable.span));
                    }
                };
                for (key, value) in pairs {
                    let flow = self.scoped(|this| {
                        if let Some(name) = &range.key {
                            this.env.define(&name.name, key);
                        }
                        if let Some(name) = &range.value {
                            this.env.define(&name.name, value);
                        }
                        this.exec_stmts(&range.body.stmts)
                    })?;
                    match flow {
                        Flow::Break => break,
                        flow @ Flow::Return(_) => return Ok(flow),
                        Flow::Continue | Flow::Normal => {}
                    }
                }
            }
        }
        Ok(Flow::Normal)
    }

    fn exec_if(&mut self, if_stmt: &'a IfStmt) -> RuntimeResult<Flow<'a>> {
        if self.condition(&if_stmt.cond)? {
            return self.exec_block(&if_stmt.then_block);
        }
        match if_stmt.else_branch.as_deref() {
            Some(ElseBranch::If(nested)) => self.exec_if(nested),
            Some(ElseBranch::Block(block)) => self.exec_block(block),
            None => Ok(Flow::Normal),
        }
    }

    fn condition(&mut self, cond: &'a ply_parser::Expr) -> RuntimeResult<bool> {
        let value = self.eval(cond)?;
        value
            .as_bool()
            .ok_or_else(|| RuntimeError::type_error("bool", value.type_name(), cond.span))
    }

    /// Zero value of a checked type
    pub(crate) fn zero(&self, ty: &Type) -> Value<'a> {
        match self.table.underlying(ty) {
            Type::Basic(kind) => match kind.default_kind() {
                BasicKind::Bool => Value::Bool(false),
                BasicKind::Int => Value::Int(0),
                BasicKind::Float64 => Value::Float(0.0),
                BasicKind::String => Value::String(String::new()),
                _ => Value::Nil,
            },
            Type::Slice(_) => Value::Slice(SliceValue::nil()),
            Type::Map(..) => Value::Map(MapValue::nil()),
            Type::Struct(fields) => Value::Struct(
                fields
                    .iter()
                    .map(|field| (field.name.clone(), self.zero(&field.ty)))
                    .collect(),
            ),
            Type::Func(_) | Type::Named(_) | Type::Any | Type::Void => Value::Nil,
        }
    }

    /// Zero value of a declared type, for `var x T`
    pub(crate) fn zero_of(&self, ty: &TypeExpr) -> Value<'a> {
        self.zero(&type_of_syntax(ty))
    }
}

fn bind_params<'a>(scope: &Scope<'a>, signature: &Signature, args: Vec<Value<'a>>) {
    for (param, arg) in signature.params.iter().zip(args) {
        scope.define(&param.name.name, arg);
    }
}

/// Type named by syntax; only the shape matters for zero values
fn type_of_syntax(ty: &TypeExpr) -> Type {
    match &ty.kind {
        TypeExprKind::Name(name) => match name.as_str() {
            "int" => Type::int(),
            "float64" => Type::float64(),
            "string" => Type::string(),
            "bool" => Type::bool(),
            "any" => Type::Any,
            other => Type::named(other),
        },
        TypeExprKind::Slice(elem) => Type::slice(type_of_syntax(elem)),
        TypeExprKind::Map(key, value) => Type::map(type_of_syntax(key), type_of_syntax(value)),
        TypeExprKind::Func(_) => Type::func(Vec::new(), None),
        TypeExprKind::Struct(fields) => Type::Struct(
            fields
                .iter()
                .map(|field| Field {
                    name: field.name.name.clone(),
                    ty: type_of_syntax(&field.ty),
                })
                .collect(),
        ),
        TypeExprKind::Interface => Type::Any,
    }
}
