// Expression checking
//
// Every checked expression is recorded in the type table. Untyped constants
// keep their untyped type until a context settles it (see `use_as`).

use super::{Checker, Entity};
use crate::constant::ConstValue;
use crate::error::CheckResult;
use crate::table::{Mode, Selection, TypeAndValue};
use crate::types::{BasicKind, FuncType, Type};
use ply_parser::{
    print_expr, BinaryOp, CallExpr, CompositeLit, Expr, ExprKind, SelectorExpr, Span, UnaryOp,
};

impl Checker<'_> {
    /// Check an expression in any mode and record it
    pub(crate) fn expr(&mut self, expr: &Expr) -> CheckResult<TypeAndValue> {
        let tv = match &expr.kind {
            ExprKind::Ident(name) => self.ident(name, expr.span)?,
            ExprKind::Int(value) => {
                TypeAndValue::constant(Type::Basic(BasicKind::UntypedInt), ConstValue::Int(*value))
            }
            ExprKind::Float(float) => TypeAndValue::constant(
                Type::Basic(BasicKind::UntypedFloat),
                ConstValue::Float(float.value),
            ),
            ExprKind::String(lit) => TypeAndValue::constant(
                Type::Basic(BasicKind::UntypedString),
                ConstValue::String(lit.value.clone()),
            ),
            ExprKind::Binary(binary) => {
                let left = self.value(&binary.left)?;
                let right = self.value(&binary.right)?;
                let ty = self.binary_type(binary.op, &binary.left, &left, &binary.right, &right, expr.span)?;
                match (&left.value, &right.value) {
                    (Some(l), Some(r)) if left.is_constant() && right.is_constant() => {
                        let folded = ConstValue::binary(binary.op, l, r)
                            .map_err(|message| self.invalid(message, expr.span))?;
                        let folded = match self.basic_kind(&ty) {
                            Some(kind) if !kind.is_untyped() => folded.convert(kind).unwrap_or(folded),
                            _ => folded,
                        };
                        TypeAndValue::constant(ty, folded)
                    }
                    _ => TypeAndValue::value(ty),
                }
            }
            ExprKind::Unary(unary) => {
                let operand = self.value(&unary.operand)?;
                let valid = match unary.op {
                    UnaryOp::Neg | UnaryOp::Plus => self.is_numeric(&operand.ty),
                    UnaryOp::Not => self.basic_kind(&operand.ty).is_some_and(BasicKind::is_boolean),
                };
                if !valid {
                    return Err(self.invalid(
                        format!("operator {} not defined on {} (value of type {})", unary.op, print_expr(&unary.operand), operand.ty),
                        expr.span,
                    ));
                }
                match &operand.value {
                    Some(value) if operand.is_constant() => {
                        let folded = ConstValue::unary(unary.op, value)
                            .map_err(|message| self.invalid(message, expr.span))?;
                        TypeAndValue::constant(operand.ty.clone(), folded)
                    }
                    _ => TypeAndValue::value(operand.ty.clone()),
                }
            }
            ExprKind::Call(call) => self.call(expr, call)?,
            ExprKind::Selector(sel) => self.selector(expr, sel)?,
            ExprKind::Index(index) => {
                let operand = self.value(&index.operand)?;
                match self.underlying(&operand.ty) {
                    Type::Slice(elem) => {
                        let idx = self.value(&index.index)?;
                        self.use_as(&index.index, &idx, &Type::int(), "index")?;
                        TypeAndValue::value(*elem)
                    }
                    Type::Map(key, value) => {
                        let idx = self.value(&index.index)?;
                        self.use_as(&index.index, &idx, &key, "map index")?;
                        TypeAndValue::value(*value)
                    }
                    other => {
                        return Err(self.invalid(
                            format!("cannot index {} (value of type {other})", print_expr(&index.operand)),
                            expr.span,
                        ))
                    }
                }
            }
            ExprKind::Slice(slice) => {
                let operand = self.value(&slice.operand)?;
                let ty = match self.underlying(&operand.ty) {
                    Type::Slice(_) => operand.ty.clone(),
                    Type::Basic(kind) if kind.is_string() => operand.ty.defaulted(),
                    other => {
                        return Err(self.invalid(
                            format!("cannot slice {} (value of type {other})", print_expr(&slice.operand)),
                            expr.span,
                        ))
                    }
                };
                self.convert_untyped(&slice.operand, &ty);
                for bound in [&slice.low, &slice.high].into_iter().flatten() {
                    let tv = self.value(bound)?;
                    self.use_as(bound, &tv, &Type::int(), "slice index")?;
                }
                TypeAndValue::value(ty)
            }
            ExprKind::Paren(inner) => self.expr(inner)?,
            ExprKind::Composite(lit) => self.composite(lit, expr.span)?,
            ExprKind::FuncLit(func) => {
                let signature = self.resolve_signature(&func.signature)?;
                self.push_scope();
                let checked = self.check_function_body("func literal", &func.signature, &signature, &func.body);
                self.pop_scope();
                checked?;
                TypeAndValue::value(Type::Func(signature))
            }
            ExprKind::Type(ty) => TypeAndValue::of_mode(self.resolve_type(ty)?, Mode::TypeExpr),
        };
        Ok(self.record(expr, tv))
    }

    /// Check an expression that must produce a value
    pub(crate) fn value(&mut self, expr: &Expr) -> CheckResult<TypeAndValue> {
        let tv = self.expr(expr)?;
        match tv.mode {
            Mode::Value | Mode::Constant => Ok(tv),
            Mode::NoValue => Err(self.invalid(
                format!("{} (no value) used as value", print_expr(expr)),
                expr.span,
            )),
            Mode::TypeExpr => Err(self.invalid(
                format!("{} (type) is not an expression", print_expr(expr)),
                expr.span,
            )),
            Mode::Builtin => Err(self.invalid(
                format!("{} (built-in) must be called", print_expr(expr)),
                expr.span,
            )),
            Mode::Package => Err(self.invalid(
                format!("use of package {} without selector", print_expr(expr)),
                expr.span,
            )),
        }
    }

    fn ident(&mut self, name: &str, span: Span) -> CheckResult<TypeAndValue> {
        if name == "_" {
            return Err(self.invalid("cannot use _ as value".to_string(), span));
        }
        match self.lookup(name) {
            Some(Entity::Var(ty)) => Ok(TypeAndValue::value(ty)),
            Some(Entity::Const(ty, value)) => Ok(TypeAndValue::constant(ty, value)),
            Some(Entity::TypeName(ty)) => Ok(TypeAndValue::of_mode(ty, Mode::TypeExpr)),
            Some(Entity::Func(func)) => Ok(TypeAndValue::value(Type::Func(func))),
            Some(Entity::Builtin(_)) => Ok(TypeAndValue::of_mode(Type::Void, Mode::Builtin)),
            Some(Entity::Package(_)) => Ok(TypeAndValue::of_mode(Type::Void, Mode::Package)),
            Some(Entity::Nil) => Ok(TypeAndValue::value(Type::Basic(BasicKind::UntypedNil))),
            None => Err(self.undefined(name, span)),
        }
    }

    /// Result type of `left op right`; untyped operands are settled against typed ones
    pub(crate) fn binary_type(
        &mut self,
        op: BinaryOp,
        left_expr: &Expr,
        left: &TypeAndValue,
        right_expr: &Expr,
        right: &TypeAndValue,
        span: Span,
    ) -> CheckResult<Type> {
        let operand = self.match_operands(left_expr, left, right_expr, right, span)?;

        if op.is_logical() {
            if !self.basic_kind(&operand).is_some_and(BasicKind::is_boolean) {
                return Err(self.invalid(format!("operator {op} not defined on {operand}"), span));
            }
            return Ok(operand);
        }

        if op.is_comparison() {
            let nil_comparison = left.ty == Type::Basic(BasicKind::UntypedNil)
                || right.ty == Type::Basic(BasicKind::UntypedNil);
            let valid = match op {
                BinaryOp::Eq | BinaryOp::Ne => nil_comparison || self.is_comparable(&operand),
                _ => self.is_ordered(&operand),
            };
            if !valid {
                return Err(self.invalid(format!("operator {op} not defined on {operand}"), span));
            }
            return Ok(Type::Basic(BasicKind::UntypedBool));
        }

        let kind = self.basic_kind(&operand);
        let valid = match op {
            BinaryOp::Add => kind.is_some_and(|k| k.is_numeric() || k.is_string()),
            BinaryOp::Rem => kind.is_some_and(BasicKind::is_integer),
            _ => kind.is_some_and(BasicKind::is_numeric),
        };
        if !valid {
            return Err(self.invalid(format!("operator {op} not defined on {operand}"), span));
        }
        Ok(operand)
    }

    /// Common operand type of a binary operation
    fn match_operands(
        &mut self,
        left_expr: &Expr,
        left: &TypeAndValue,
        right_expr: &Expr,
        right: &TypeAndValue,
        span: Span,
    ) -> CheckResult<Type> {
        let nil = Type::Basic(BasicKind::UntypedNil);
        match (left.ty.is_untyped(), right.ty.is_untyped()) {
            (true, true) => {
                let (Some(l), Some(r)) = (left.ty.basic_kind(), right.ty.basic_kind()) else {
                    return Err(self.invalid("mismatched operands".to_string(), span));
                };
                if l == r {
                    return Ok(left.ty.clone());
                }
                if l.is_numeric() && r.is_numeric() {
                    return Ok(Type::Basic(BasicKind::UntypedFloat));
                }
                Err(self.invalid(
                    format!("mismatched types {} and {}", left.ty, right.ty),
                    span,
                ))
            }
            (true, false) => {
                if left.ty == nil {
                    return self.nil_operand(&right.ty, span);
                }
                self.use_as(left_expr, left, &right.ty, "binary operation")?;
                Ok(right.ty.clone())
            }
            (false, true) => {
                if right.ty == nil {
                    return self.nil_operand(&left.ty, span);
                }
                self.use_as(right_expr, right, &left.ty, "binary operation")?;
                Ok(left.ty.clone())
            }
            (false, false) => {
                if left.ty != right.ty {
                    return Err(self.invalid(
                        format!("mismatched types {} and {}", left.ty, right.ty),
                        span,
                    ));
                }
                Ok(left.ty.clone())
            }
        }
    }

    fn nil_operand(&self, other: &Type, span: Span) -> CheckResult<Type> {
        match self.underlying(other) {
            Type::Slice(_) | Type::Map(..) | Type::Func(_) | Type::Any => Ok(other.clone()),
            _ => Err(self.invalid(format!("mismatched types {other} and untyped nil"), span)),
        }
    }

    fn call(&mut self, expr: &Expr, call: &CallExpr) -> CheckResult<TypeAndValue> {
        if let ExprKind::Selector(sel) = &call.func.kind {
            if self.package_ref(&sel.operand).is_none() {
                let receiver = self.value(&sel.operand)?;
                if self.is_generic_method_call(&receiver.ty, &sel.field.name) {
                    return self.generic_method(expr, call, sel, &receiver);
                }
                let func = self.member(&call.func, sel, &receiver)?;
                let func = self.record(&call.func, func);
                return self.call_value(expr, call, &func);
            }
        }

        let func = self.expr(&call.func)?;
        match func.mode {
            Mode::TypeExpr => self.conversion(expr, call, &func.ty),
            Mode::Builtin => {
                let Some(Entity::Builtin(builtin)) = call.func.as_ident().and_then(|name| self.lookup(name)) else {
                    return Err(self.invalid("invalid built-in call".to_string(), expr.span));
                };
                self.builtin(expr, call, builtin)
            }
            _ => self.call_value(expr, call, &func),
        }
    }

    /// Call of a function-typed value
    fn call_value(&mut self, expr: &Expr, call: &CallExpr, func: &TypeAndValue) -> CheckResult<TypeAndValue> {
        let Type::Func(signature) = self.underlying(&func.ty) else {
            return Err(self.invalid(
                format!("invalid operation: cannot call non-function {} (value of type {})", print_expr(&call.func), func.ty),
                expr.span,
            ));
        };
        let name = print_expr(&call.func);
        self.arguments(&name, call, &signature, expr.span)?;
        Ok(match &signature.result {
            Some(result) => TypeAndValue::value((**result).clone()),
            None => TypeAndValue::of_mode(Type::Void, Mode::NoValue),
        })
    }

    /// Check call arguments against a signature, including variadic spreading
    pub(crate) fn arguments(
        &mut self,
        name: &str,
        call: &CallExpr,
        signature: &FuncType,
        span: Span,
    ) -> CheckResult<()> {
        let params = &signature.params;
        let args = &call.args;

        if call.ellipsis {
            if !signature.variadic || args.len() != params.len() {
                return Err(self.invalid(
                    format!("have (...) in call to non-variadic or mismatched {name}"),
                    span,
                ));
            }
        } else if signature.variadic {
            if args.len() + 1 < params.len() {
                return Err(self.argument_count(name, format!("at least {}", params.len() - 1), args.len(), span));
            }
        } else if args.len() != params.len() {
            return Err(self.argument_count(name, params.len().to_string(), args.len(), span));
        }

        let fixed = if signature.variadic { params.len() - 1 } else { params.len() };
        for (i, arg) in args.iter().enumerate() {
            let tv = self.value(arg)?;
            let target = if i < fixed || call.ellipsis {
                params[i].clone()
            } else {
                match &params[fixed] {
                    Type::Slice(elem) => (**elem).clone(),
                    other => other.clone(),
                }
            };
            self.use_as(arg, &tv, &target, &format!("argument to {name}"))?;
        }
        Ok(())
    }

    /// `T(x)` conversions
    fn conversion(&mut self, expr: &Expr, call: &CallExpr, target: &Type) -> CheckResult<TypeAndValue> {
        let [arg] = call.args.as_slice() else {
            return Err(self.argument_count(&target.to_string(), "1".to_string(), call.args.len(), expr.span));
        };
        let tv = self.value(arg)?;
        let from = self.underlying(&tv.ty);
        let to = self.underlying(target);

        let numeric = self.is_numeric(&tv.ty) && self.is_numeric(target);
        let convertible = self.assignable(&tv.ty, tv.value.as_ref(), target)
            || numeric
            || from.defaulted() == to;
        if !convertible {
            return Err(self.invalid(
                format!("cannot convert {} (value of type {}) to type {target}", print_expr(arg), tv.ty),
                expr.span,
            ));
        }

        match (&tv.value, to.basic_kind()) {
            (Some(value), Some(kind)) if tv.is_constant() => {
                let converted = value.convert(kind).ok_or_else(|| {
                    self.invalid(format!("cannot convert {value} to type {target} (truncated)"), expr.span)
                })?;
                self.convert_untyped(arg, target);
                Ok(TypeAndValue::constant(target.clone(), converted))
            }
            _ => {
                if tv.ty.is_untyped() {
                    self.convert_untyped(arg, &tv.ty.defaulted());
                }
                Ok(TypeAndValue::value(target.clone()))
            }
        }
    }

    /// Name of the imported package `expr` refers to, if it is one
    pub(crate) fn package_ref(&self, expr: &Expr) -> Option<String> {
        match expr.as_ident().and_then(|name| self.lookup(name)) {
            Some(Entity::Package(name)) => Some(name),
            _ => None,
        }
    }

    fn selector(&mut self, expr: &Expr, sel: &SelectorExpr) -> CheckResult<TypeAndValue> {
        if let Some(package_name) = self.package_ref(&sel.operand) {
            self.record(&sel.operand, TypeAndValue::of_mode(Type::Void, Mode::Package));
            let member = self
                .imported(&package_name)
                .and_then(|package| package.member(&sel.field.name))
                .cloned();
            let Some(ty) = member else {
                return Err(self.undefined(&format!("{}.{}", package_name, sel.field.name), sel.field.span));
            };
            self.table.record_selection(expr.id, Selection::PackageMember { package: package_name });
            return Ok(TypeAndValue::value(ty));
        }

        let receiver = self.value(&sel.operand)?;
        if self.is_generic_method_call(&receiver.ty, &sel.field.name) {
            return Err(self.invalid(
                format!("generic method {} must be called", sel.field.name),
                expr.span,
            ));
        }
        self.member(expr, sel, &receiver)
    }

    /// Method or field `sel` of a receiver value
    fn member(&mut self, expr: &Expr, sel: &SelectorExpr, receiver: &TypeAndValue) -> CheckResult<TypeAndValue> {
        let name = &sel.field.name;
        if let Some(method) = self.table.method(&receiver.ty, name).cloned() {
            let Type::Named(type_name) = &receiver.ty else {
                unreachable!("methods are only declared on named types");
            };
            self.table.record_selection(
                expr.id,
                Selection::Method { receiver: type_name.clone() },
            );
            return Ok(TypeAndValue::value(Type::Func(method)));
        }
        if let Type::Struct(fields) = self.underlying(&receiver.ty) {
            if let Some(field) = fields.iter().find(|field| &field.name == name) {
                self.table.record_selection(expr.id, Selection::Field);
                return Ok(TypeAndValue::value(field.ty.clone()));
            }
        }
        Err(self.unknown_selector(&receiver.ty, name, sel.field.span))
    }

    fn composite(&mut self, lit: &CompositeLit, span: Span) -> CheckResult<TypeAndValue> {
        let ty = self.resolve_type(&lit.ty)?;
        match self.underlying(&ty) {
            Type::Slice(elem) => {
                for element in &lit.elements {
                    if let Some(key) = &element.key {
                        return Err(self.invalid("keyed slice literals are not supported".to_string(), key.span));
                    }
                    let tv = self.value(&element.value)?;
                    self.use_as(&element.value, &tv, &elem, "slice literal")?;
                }
            }
            Type::Map(key_ty, value_ty) => {
                for element in &lit.elements {
                    let Some(key) = &element.key else {
                        return Err(self.invalid("missing key in map literal".to_string(), element.value.span));
                    };
                    let key_tv = self.value(key)?;
                    self.use_as(key, &key_tv, &key_ty, "map literal")?;
                    let tv = self.value(&element.value)?;
                    self.use_as(&element.value, &tv, &value_ty, "map literal")?;
                }
            }
            Type::Struct(fields) => {
                let keyed = lit.elements.iter().any(|e| e.key.is_some());
                if !keyed && !lit.elements.is_empty() && lit.elements.len() != fields.len() {
                    return Err(self.invalid(format!("too few values in {ty} literal"), span));
                }
                for (i, element) in lit.elements.iter().enumerate() {
                    let field = match &element.key {
                        Some(key) => {
                            let Some(name) = key.as_ident() else {
                                return Err(self.invalid("invalid field name".to_string(), key.span));
                            };
                            fields
                                .iter()
                                .find(|f| f.name == name)
                                .ok_or_else(|| self.unknown_selector(&ty, name, key.span))?
                        }
                        None if keyed => {
                            return Err(self.invalid(
                                "mixture of field:value and value elements in struct literal".to_string(),
                                element.value.span,
                            ))
                        }
                        None => &fields[i],
                    };
                    let tv = self.value(&element.value)?;
                    self.use_as(&element.value, &tv, &field.ty, "struct literal")?;
                }
            }
            other => {
                return Err(self.invalid(format!("invalid composite literal type {other}"), span));
            }
        }
        Ok(TypeAndValue::value(ty))
    }
}
