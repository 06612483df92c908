// Statement checking

use super::{Checker, Entity};
use crate::error::CheckResult;
use crate::table::Selection;
use crate::types::{BasicKind, Type};
use ply_parser::{AssignOp, Block, ElseBranch, Expr, ExprKind, IfStmt, Stmt, StmtKind};

impl Checker<'_> {
    pub(crate) fn check_block(&mut self, block: &Block) -> CheckResult<()> {
        self.push_scope();
        let result = block.stmts.iter().try_for_each(|stmt| self.check_stmt(stmt));
        self.pop_scope();
        result
    }

    fn check_stmt(&mut self, stmt: &Stmt) -> CheckResult<()> {
        match &stmt.kind {
            StmtKind::Expr(expr) => {
                self.expr(expr)?;
                Ok(())
            }
            StmtKind::ShortVar { name, value } => {
                let tv = self.value(value)?;
                let ty = self.default_type(value, &tv)?;
                self.declare(&name.name, Entity::Var(ty), name.span)
            }
            StmtKind::Var(decl) => {
                let ty = self.var_type(decl)?;
                self.declare(&decl.name.name, Entity::Var(ty), decl.name.span)
            }
            StmtKind::Const(decl) => {
                let entity = self.const_entity(decl)?;
                self.declare(&decl.name.name, entity, decl.name.span)
            }
            StmtKind::Assign { target, op, value } => self.check_assign(target, *op, value),
            StmtKind::IncDec { target, .. } => {
                let ty = self.assignment_target(target)?;
                if !self.is_numeric(&ty) {
                    return Err(self.invalid(
                        format!("{} (variable of type {ty}) is not numeric", ply_parser::print_expr(target)),
                        target.span,
                    ));
                }
                Ok(())
            }
            StmtKind::Return(value) => {
                let expected = self.results.last().cloned().flatten();
                match (value, expected) {
                    (None, None) => Ok(()),
                    (Some(value), Some(expected)) => {
                        let tv = self.value(value)?;
                        self.use_as(value, &tv, &expected, "return statement")
                    }
                    (None, Some(expected)) => Err(self.invalid(
                        format!("not enough return values (want {expected})"),
                        stmt.span,
                    )),
                    (Some(value), None) => Err(self.invalid(
                        "too many return values".to_string(),
                        value.span,
                    )),
                }
            }
            StmtKind::Break | StmtKind::Continue => Ok(()),
            StmtKind::Block(block) => self.check_block(block),
            StmtKind::If(if_stmt) => self.check_if(if_stmt),
            StmtKind::For(for_stmt) => {
                self.push_scope();
                let result = (|| {
                    if let Some(init) = &for_stmt.init {
                        self.check_stmt(init)?;
                    }
                    if let Some(cond) = &for_stmt.cond {
                        self.condition(cond)?;
                    }
                    if let Some(post) = &for_stmt.post {
                        self.check_stmt(post)?;
                    }
                    self.check_block(&for_stmt.body)
                })();
                self.pop_scope();
                result
            }
            StmtKind::Range(range) => {
                let tv = self.value(&range.iterable)?;
                let (key, value) = match self.underlying(&tv.ty) {
                    Type::Slice(elem) => (Type::int(), Some(*elem)),
                    Type::Map(key, value) => (*key, Some(*value)),
                    Type::Basic(BasicKind::Int | BasicKind::UntypedInt) => {
                        self.convert_untyped(&range.iterable, &Type::int());
                        (Type::int(), None)
                    }
                    other => {
                        return Err(self.invalid(
                            format!("cannot range over {} (value of type {other})", ply_parser::print_expr(&range.iterable)),
                            range.iterable.span,
                        ))
                    }
                };

                self.push_scope();
                let result = (|| {
                    if let Some(name) = &range.key {
                        self.declare(&name.name, Entity::Var(key), name.span)?;
                    }
                    if let Some(name) = &range.value {
                        let Some(value) = value else {
                            return Err(self.invalid(
                                "range over int permits only one iteration variable".to_string(),
                                name.span,
                            ));
                        };
                        self.declare(&name.name, Entity::Var(value), name.span)?;
                    }
                    self.check_block(&range.body)
                })();
                self.pop_scope();
                result
            }
        }
    }

    fn check_if(&mut self, if_stmt: &IfStmt) -> CheckResult<()> {
        self.condition(&if_stmt.cond)?;
        self.check_block(&if_stmt.then_block)?;
        match if_stmt.else_branch.as_deref() {
            Some(ElseBranch::If(nested)) => self.check_if(nested),
            Some(ElseBranch::Block(block)) => self.check_block(block),
            None => Ok(()),
        }
    }

    fn condition(&mut self, cond: &Expr) -> CheckResult<()> {
        let tv = self.value(cond)?;
        if !self.basic_kind(&tv.ty).is_some_and(BasicKind::is_boolean) {
            return Err(self.mismatch(&Type::bool(), &tv.ty, "condition", cond.span));
        }
        self.convert_untyped(cond, &Type::bool());
        Ok(())
    }

    fn check_assign(&mut self, target: &Expr, op: AssignOp, value: &Expr) -> CheckResult<()> {
        if target.as_ident() == Some("_") && op == AssignOp::Assign {
            let tv = self.value(value)?;
            self.default_type(value, &tv)?;
            return Ok(());
        }

        let target_ty = self.assignment_target(target)?;
        let tv = self.value(value)?;
        match op.binary() {
            None => self.use_as(value, &tv, &target_ty, "assignment"),
            Some(binary) => {
                let target_tv = crate::table::TypeAndValue::value(target_ty.clone());
                let result = self.binary_type(binary, target, &target_tv, value, &tv, target.span)?;
                if !self.assignable(&result, None, &target_ty) {
                    return Err(self.mismatch(&target_ty, &result, "assignment", value.span));
                }
                Ok(())
            }
        }
    }

    /// Type of an assignable location: a variable, slice or map element, or field
    fn assignment_target(&mut self, target: &Expr) -> CheckResult<Type> {
        match &target.kind {
            ExprKind::Ident(name) => match self.lookup(name) {
                Some(Entity::Var(ty)) => {
                    self.record(target, crate::table::TypeAndValue::value(ty.clone()));
                    Ok(ty)
                }
                Some(_) => Err(self.invalid(format!("cannot assign to {name}"), target.span)),
                None => Err(self.undefined(name, target.span)),
            },
            ExprKind::Index(_) => {
                let tv = self.value(target)?;
                Ok(tv.ty)
            }
            ExprKind::Selector(_) => {
                let tv = self.value(target)?;
                match self.table.selection(target) {
                    Some(Selection::Field) => Ok(tv.ty),
                    _ => Err(self.invalid(
                        format!("cannot assign to {}", ply_parser::print_expr(target)),
                        target.span,
                    )),
                }
            }
            ExprKind::Paren(inner) => self.assignment_target(inner),
            _ => Err(self.invalid(
                format!("cannot assign to {}", ply_parser::print_expr(target)),
                target.span,
            )),
        }
    }

    pub(crate) fn is_terminating_block(block: &Block) -> bool {
        block.stmts.last().is_some_and(Self::is_terminating)
    }

    fn is_terminating(stmt: &Stmt) -> bool {
        match &stmt.kind {
            StmtKind::Return(_) => true,
            StmtKind::Block(block) => Self::is_terminating_block(block),
            StmtKind::If(if_stmt) => Self::is_terminating_if(if_stmt),
            StmtKind::For(for_stmt) => for_stmt.cond.is_none() && !Self::has_break(&for_stmt.body),
            _ => false,
        }
    }

    fn is_terminating_if(if_stmt: &IfStmt) -> bool {
        Self::is_terminating_block(&if_stmt.then_block)
            && match if_stmt.else_branch.as_deref() {
                Some(ElseBranch::If(nested)) => Self::is_terminating_if(nested),
                Some(ElseBranch::Block(block)) => Self::is_terminating_block(block),
                None => false,
            }
    }

    /// Whether a `break` in `block` targets the enclosing loop
    fn has_break(block: &Block) -> bool {
        block.stmts.iter().any(|stmt| match &stmt.kind {
            StmtKind::Break => true,
            StmtKind::Block(inner) => Self::has_break(inner),
            StmtKind::If(if_stmt) => Self::if_has_break(if_stmt),
            _ => false,
        })
    }

    fn if_has_break(if_stmt: &IfStmt) -> bool {
        Self::has_break(&if_stmt.then_block)
            || match if_stmt.else_branch.as_deref() {
                Some(ElseBranch::If(nested)) => Self::if_has_break(nested),
                Some(ElseBranch::Block(block)) => Self::has_break(block),
                None => false,
            }
    }
}
