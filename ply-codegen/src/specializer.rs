//! The specializer: rewrites generic calls in a dialect file
//!
//! The walk is pre-order. Each call is rewritten first, then the walk
//! continues into the children of the replacement, which are the original
//! arguments. Nodes built by a rewrite carry detached ids and are never
//! rewritten again.

use crate::pipeline::{self, Rejection};
use crate::registry::{func_generator, method_generator, CallSite, Specialization};
use crate::synthetic::{ImportSet, SyntheticPackage};
use ply_parser::{
    Block, CallExpr, Decl, ElseBranch, Expr, ExprKind, File, FloatLiteral, IfStmt, Stmt, StmtKind,
    StringFormat, StringLiteral, UnaryExpr, UnaryOp,
};
use ply_typechecker::{ConstValue, Mode, Type, TypeTable};

/// Per-file rewriting state
pub struct Specializer<'a> {
    table: &'a TypeTable,
    package: SyntheticPackage,
    imports: ImportSet,
}

impl<'a> Specializer<'a> {
    pub fn new(table: &'a TypeTable, package: &str) -> Self {
        Self {
            table,
            package: SyntheticPackage::new(package),
            imports: ImportSet::new(),
        }
    }

    /// Rewrite every generic call in `file`, returning the declarations and
    /// imports the rewritten calls need.
    pub fn specialize(mut self, file: &mut File) -> (SyntheticPackage, ImportSet) {
        let span = tracing::debug_span!("specialize", file = file.name.as_deref().unwrap_or("<unknown>"));
        let _entered = span.enter();
        for decl in &mut file.decls {
            self.decl(decl);
        }
        tracing::debug!(
            declarations = self.package.len(),
            imports = self.imports.len(),
            "file specialized"
        );
        (self.package, self.imports)
    }

    fn decl(&mut self, decl: &mut Decl) {
        match decl {
            Decl::Func(func) => self.block(&mut func.body),
            Decl::Const(decl) => self.expr(&mut decl.value),
            Decl::Var(decl) => {
                if let Some(value) = &mut decl.value {
                    self.expr(value);
                }
            }
            Decl::Type(_) => {}
        }
    }

    fn block(&mut self, block: &mut Block) {
        for stmt in &mut block.stmts {
            self.stmt(stmt);
        }
    }

    fn stmt(&mut self, stmt: &mut Stmt) {
        match &mut stmt.kind {
            StmtKind::Expr(expr) => self.expr(expr),
            StmtKind::ShortVar { value, .. } => self.expr(value),
            StmtKind::Var(decl) => {
                if let Some(value) = &mut decl.value {
                    self.expr(value);
                }
            }
            StmtKind::Const(decl) => self.expr(&mut decl.value),
            StmtKind::Assign { target, value, .. } => {
                self.expr(target);
                self.expr(value);
            }
            StmtKind::IncDec { target, .. } => self.expr(target),
            StmtKind::Return(value) => {
                if let Some(value) = value {
                    self.expr(value);
                }
            }
            StmtKind::Break | StmtKind::Continue => {}
            StmtKind::Block(block) => self.block(block),
            StmtKind::If(if_stmt) => self.if_stmt(if_stmt),
            StmtKind::For(for_stmt) => {
                if let Some(init) = &mut for_stmt.init {
                    self.stmt(init);
                }
                if let Some(cond) = &mut for_stmt.cond {
                    self.expr(cond);
                }
                if let Some(post) = &mut for_stmt.post {
                    self.stmt(post);
                }
                self.block(&mut for_stmt.body);
            }
            StmtKind::Range(range) => {
                self.expr(&mut range.iterable);
                self.block(&mut range.body);
            }
        }
    }

    fn if_stmt(&mut self, if_stmt: &mut IfStmt) {
        self.expr(&mut if_stmt.cond);
        self.block(&mut if_stmt.then_block);
        match if_stmt.else_branch.as_deref_mut() {
            Some(ElseBranch::If(else_if)) => self.if_stmt(else_if),
            Some(ElseBranch::Block(block)) => self.block(block),
            None => {}
        }
    }

    fn expr(&mut self, expr: &mut Expr) {
        if !expr.id.is_detached() {
            if let Some(replacement) = self.rewrite(expr) {
                *expr = replacement;
            }
        }
        self.children(expr);
    }

    fn children(&mut self, expr: &mut Expr) {
        match &mut expr.kind {
            ExprKind::Ident(_)
            | ExprKind::Int(_)
            | ExprKind::Float(_)
            | ExprKind::String(_)
            | ExprKind::Type(_) => {}
            ExprKind::Binary(binary) => {
                self.expr(&mut binary.left);
                self.expr(&mut binary.right);
            }
            ExprKind::Unary(unary) => self.expr(&mut unary.operand),
            ExprKind::Call(call) => {
                self.expr(&mut call.func);
                for arg in &mut call.args {
                    self.expr(arg);
                }
            }
            ExprKind::Selector(sel) => self.expr(&mut sel.operand),
            ExprKind::Index(index) => {
                self.expr(&mut index.operand);
                self.expr(&mut index.index);
            }
            ExprKind::Slice(slice) => {
                self.expr(&mut slice.operand);
                if let Some(low) = &mut slice.low {
                    self.expr(low);
                }
                if let Some(high) = &mut slice.high {
                    self.expr(high);
                }
            }
            ExprKind::Paren(inner) => self.expr(inner),
            ExprKind::Composite(lit) => {
                for element in &mut lit.elements {
                    if let Some(key) = &mut element.key {
                        self.expr(key);
                    }
                    self.expr(&mut element.value);
                }
            }
            ExprKind::FuncLit(func) => self.block(&mut func.body),
        }
    }

    /// Replacement for a generic call, or `None` to leave `expr` as written
    fn rewrite(&mut self, expr: &Expr) -> Option<Expr> {
        let ExprKind::Call(call) = &expr.kind else {
            return None;
        };
        let site = CallSite::new(expr, call, self.table);

        let rewritten = match &call.func.kind {
            ExprKind::Ident(name) => {
                let generator = func_generator(name)?;
                // A user declaration of the same name shadows the generic
                if self.table.mode_of(&call.func) != Some(Mode::Builtin) {
                    return None;
                }
                if let Some(value) = self.table.value_of(expr) {
                    tracing::debug!(call = name.as_str(), value = %value, "folded constant call");
                    // A typed constant keeps its named type
                    return Some(match self.table.type_of(expr) {
                        Some(Type::Named(named)) => Expr::call(named, vec![literal(value)]),
                        _ => literal(value),
                    });
                }
                let specialization = (generator.generate)(&site)?;
                self.emit(specialization, call)
            }
            ExprKind::Selector(sel) => match pipeline::build(call, self.table) {
                Ok(plan) => {
                    let specialization = plan.generate();
                    tracing::debug!(
                        name = %specialization.name,
                        stages = plan.stages.len(),
                        "fused pipeline"
                    );
                    self.emit(specialization, call)
                }
                Err(rejection) => {
                    if rejection != Rejection::TooShort {
                        tracing::debug!(reason = %rejection, "pipeline rejected");
                    }
                    let name = sel.field.name.as_str();
                    let generator = method_generator(name)?;
                    let receiver = self.table.type_of(&sel.operand)?;
                    if self.table.has_method(receiver, name) {
                        tracing::debug!(method = name, receiver = %receiver, "native method takes precedence");
                        return None;
                    }
                    let specialization = (generator.generate)(&site)?;
                    self.emit(specialization, call)
                }
            },
            _ => return None,
        };

        // Generated declarations return unnamed types; restore the call's
        // named type so inference at the call site is unchanged.
        match self.table.type_of(expr) {
            Some(Type::Named(name)) => Some(Expr::call(name, vec![rewritten])),
            _ => Some(rewritten),
        }
    }

    /// Register a specialization's declaration and imports; returns the
    /// rewritten call.
    fn emit(&mut self, specialization: Specialization, call: &CallExpr) -> Expr {
        if self.package.insert(&specialization.name, &specialization.source) {
            tracing::debug!(name = %specialization.name, "generated declaration");
        }
        for path in &specialization.imports {
            self.imports.insert(path);
        }
        specialization.rewrite.apply(call)
    }
}

/// Literal expression for a folded constant
fn literal(value: &ConstValue) -> Expr {
    let negative = match value {
        ConstValue::Int(v) => *v < 0 && *v != i64::MIN,
        ConstValue::Float(v) => v.is_sign_negative() && *v != 0.0,
        _ => false,
    };
    if negative {
        let magnitude = match value {
            ConstValue::Int(v) => ConstValue::Int(-v),
            ConstValue::Float(v) => ConstValue::Float(-v),
            other => other.clone(),
        };
        return Expr::synthetic(ExprKind::Unary(UnaryExpr {
            op: UnaryOp::Neg,
            operand: Box::new(literal(&magnitude)),
        }));
    }

    Expr::synthetic(match value {
        ConstValue::Bool(b) => ExprKind::Ident(b.to_string()),
        ConstValue::Int(v) => ExprKind::Int(*v),
        ConstValue::Float(v) => ExprKind::Float(FloatLiteral {
            value: *v,
            raw: value.to_string(),
        }),
        ConstValue::String(s) => ExprKind::String(StringLiteral {
            value: s.clone(),
            format: StringFormat::Interpreted,
        }),
    })
}
