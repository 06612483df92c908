//! Expression evaluation and assignment.

use crate::error::{RuntimeError, RuntimeResult};
use crate::interpreter::Interpreter;
use crate::value::{Function, MapValue, SliceValue, Value};
use ply_parser::{BinaryOp, CallExpr, CompositeLit, Expr, ExprKind, SelectorExpr, Span, UnaryOp};
use ply_typechecker::{ConstValue, Mode, Selection, Type};
use std::cmp::Ordering;

impl<'a> Interpreter<'a> {
    pub fn eval(&mut self, expr: &'a Expr) -> RuntimeResult<Value<'a>> {
        let table = self.table;
        if let Some(tv) = table.type_and_value(expr) {
            if let (Mode::Constant, Some(value)) = (tv.mode, &tv.value) {
                return Ok(self.constant(value, &tv.ty));
            }
        }

        match &expr.kind {
            ExprKind::Ident(name) => self.ident(name, expr.span),
            ExprKind::Int(value) => Ok(Value::Int(*value)),
            ExprKind::Float(float) => Ok(Value::Float(float.value)),
            ExprKind::String(lit) => Ok(Value::string(lit.value.as_str())),
            ExprKind::Binary(binary) => {
                if binary.op.is_logical() {
                    let left = self.eval(&binary.left)?;
                    let left = left
                        .as_bool()
                        .ok_or_else(|| RuntimeError::type_error("bool", left.type_name(), binary.left.span))?;
                    // Short-circuit
                    if left == (binary.op == BinaryOp::Or) {
                        return Ok(Value::Bool(left));
                    }
                    return self.eval(&binary.right);
                }
                let left = self.eval(&binary.left)?;
                let right = self.eval(&binary.right)?;
                self.binary_op(binary.op, left, right, expr.span)
            }
            ExprKind::Unary(unary) => {
                let operand = self.eval(&unary.operand)?;
                match (unary.op, operand) {
                    (UnaryOp::Neg, Value::Int(n)) => Ok(Value::Int(n.wrapping_neg())),
                    (UnaryOp::Neg, Value::Float(f)) => Ok(Value::Float(-f)),
                    (UnaryOp::Plus, value @ (Value::Int(_) | Value::Float(_))) => Ok(value),
                    (UnaryOp::Not, Value::Bool(b)) => Ok(Value::Bool(!b)),
                    (op, value) => Err(RuntimeError::type_error(
                        if op == UnaryOp::Not { "bool" } else { "number" },
                        value.type_name(),
                        expr.span,
                    )),
                }
            }
            ExprKind::Call(call) => self.call(expr, call),
            ExprKind::Selector(sel) => self.select(expr, sel),
            ExprKind::Index(index) => {
                let operand = self.eval(&index.operand)?;
                let key = self.eval(&index.index)?;
                match operand {
                    Value::Slice(slice) => {
                        let i = self.int(&key, index.index.span)?;
                        usize::try_from(i)
                            .ok()
                            .and_then(|i| slice.get(i))
                            .ok_or_else(|| RuntimeError::index_out_of_range(i, slice.len(), index.index.span))
                    }
                    Value::Map(map) => {
                        let found = key.to_key().and_then(|key| map.get(&key));
                        Ok(match found {
                            Some(value) => value,
                            None => self.zero_of_expr(expr),
                        })
                    }
                    other => Err(RuntimeError::type_error("slice or map", other.type_name(), index.operand.span)),
                }
            }
            ExprKind::Slice(slice_expr) => {
                let operand = self.eval(&slice_expr.operand)?;
                let low = match &slice_expr.low {
                    Some(low) => {
                        let value = self.eval(low)?;
                        Some(self.int(&value, low.span)?)
                    }
                    None => None,
                };
                let high = match &slice_expr.high {
                    Some(high) => {
                        let value = self.eval(high)?;
                        Some(self.int(&value, high.span)?)
                    }
                    None => None,
                };
                self.reslice(operand, low, high, expr.span)
            }
            ExprKind::Paren(inner) => self.eval(inner),
            ExprKind::Composite(lit) => self.composite(expr, lit),
            ExprKind::FuncLit(lit) => Ok(Value::Func(Function::Closure {
                lit,
                env: self.env.clone(),
            })),
            ExprKind::Type(_) => Err(RuntimeError::type_error("value", "type", expr.span)),
        }
    }

    /// Runtime form of a folded constant, in the representation of its type
    fn constant(&self, value: &ConstValue, ty: &Type) -> Value<'a> {
        let converted = self
            .table
            .underlying(ty)
            .basic_kind()
            .and_then(|kind| value.convert(kind));
        match converted.as_ref().unwrap_or(value) {
            ConstValue::Bool(b) => Value::Bool(*b),
            ConstValue::Int(n) => Value::Int(*n),
            ConstValue::Float(f) => Value::Float(*f),
            ConstValue::String(s) => Value::string(s.as_str()),
        }
    }

    fn ident(&self, name: &str, span: Span) -> RuntimeResult<Value<'a>> {
        if let Some(value) = self.env.get(name) {
            return Ok(value);
        }
        if let Some(&decl) = self.functions.get(name) {
            return Ok(Value::Func(Function::Decl(decl)));
        }
        if name == "nil" {
            return Ok(Value::Nil);
        }
        Err(RuntimeError::undefined(name, span))
    }

    pub(crate) fn int(&self, value: &Value<'a>, span: Span) -> RuntimeResult<i64> {
        value
            .as_int()
            .ok_or_else(|| RuntimeError::type_error("int", value.type_name(), span))
    }

    /// Zero value of the type the checker recorded for `expr`
    pub(crate) fn zero_of_expr(&self, expr: &Expr) -> Value<'a> {
        match self.table.type_of(expr) {
            Some(ty) => self.zero(ty),
            None => Value::Nil,
        }
    }

    pub(crate) fn binary_op(&self, op: BinaryOp, left: Value<'a>, right: Value<'a>, span: Span) -> RuntimeResult<Value<'a>> {
        match op {
            BinaryOp::Eq => return Ok(Value::Bool(left.equals(&right))),
            BinaryOp::Ne => return Ok(Value::Bool(!left.equals(&right))),
            BinaryOp::Lt | BinaryOp::Le | BinaryOp::Gt | BinaryOp::Ge => {
                let ordering = left
                    .compare(&right)
                    .ok_or_else(|| RuntimeError::type_error("ordered operands", left.type_name(), span))?;
                let result = match op {
                    BinaryOp::Lt => ordering == Ordering::Less,
                    BinaryOp::Le => ordering != Ordering::Greater,
                    BinaryOp::Gt => ordering == Ordering::Greater,
                    _ => ordering != Ordering::Less,
                };
                return Ok(Value::Bool(result));
            }
            _ => {}
        }

        match (left, right) {
            (Value::Int(a), Value::Int(b)) => Ok(Value::Int(match op {
                BinaryOp::Add => a.wrapping_add(b),
                BinaryOp::Sub => a.wrapping_sub(b),
                BinaryOp::Mul => a.wrapping_mul(b),
                BinaryOp::Div | BinaryOp::Rem if b == 0 => return Err(RuntimeError::division_by_zero(span)),
                BinaryOp::Div => a.wrapping_div(b),
                BinaryOp::Rem => a.wrapping_rem(b),
                _ => return Err(RuntimeError::type_error("bool", "int", span)),
            })),
            (Value::String(a), Value::String(b)) if op == BinaryOp::Add => Ok(Value::String(a + &b)),
            (left, right) => match (left.as_f64(), right.as_f64()) {
                (Some(a), Some(b)) => Ok(Value::Float(match op {
                    BinaryOp::Add => a + b,
                    BinaryOp::Sub => a - b,
                    BinaryOp::Mul => a * b,
                    BinaryOp::Div => a / b,
                    BinaryOp::Rem => a % b,
                    _ => return Err(RuntimeError::type_error("bool", "float64", span)),
                })),
                _ => Err(RuntimeError::type_error(left.type_name(), right.type_name(), span)),
            },
        }
    }

    fn reslice(&self, operand: Value<'a>, low: Option<i64>, high: Option<i64>, span: Span) -> RuntimeResult<Value<'a>> {
        match operand {
            Value::Slice(slice) => {
                let low = low.unwrap_or(0);
                let high = high.unwrap_or(slice.len() as i64);
                let out_of_range = || RuntimeError::SliceBounds {
                    low,
                    high,
                    capacity: slice.cap(),
                    span: crate::error::span_to_source_span(span),
                };
                let (Ok(lo), Ok(hi)) = (usize::try_from(low), usize::try_from(high)) else {
                    return Err(out_of_range());
                };
                slice.reslice(lo, hi).map(Value::Slice).ok_or_else(out_of_range)
            }
            Value::String(text) => {
                let low = low.unwrap_or(0);
                let high = high.unwrap_or(text.len() as i64);
                match (usize::try_from(low), usize::try_from(high)) {
                    (Ok(lo), Ok(hi)) if lo <= hi && hi <= text.len() => {
                        Ok(Value::String(String::from_utf8_lossy(&text.as_bytes()[lo..hi]).into_owned()))
                    }
                    _ => Err(RuntimeError::SliceBounds {
                        low,
                        high,
                        capacity: text.len(),
                        span: crate::error::span_to_source_span(span),
                    }),
                }
            }
            other => Err(RuntimeError::type_error("slice or string", other.type_name(), span)),
        }
    }

    fn call(&mut self, expr: &'a Expr, call: &'a CallExpr) -> RuntimeResult<Value<'a>> {
        let table = self.table;
        match table.mode_of(&call.func) {
            Some(Mode::Builtin) => return self.builtin(expr, call),
            Some(Mode::TypeExpr) => return self.conversion(expr, call),
            _ => {}
        }

        let callee = self.eval(&call.func)?;
        let args = self.arguments(call)?;
        match callee {
            Value::Func(func) => self.call_function(&func, args, expr.span),
            Value::Nil => Err(RuntimeError::NilCall {
                span: crate::error::span_to_source_span(expr.span),
            }),
            other => Err(RuntimeError::type_error("func", other.type_name(), call.func.span)),
        }
    }

    /// Evaluate call arguments, packing variadic extras into a slice
    fn arguments(&mut self, call: &'a CallExpr) -> RuntimeResult<Vec<Value<'a>>> {
        let signature = self
            .table
            .type_of(&call.func)
            .map(|ty| self.table.underlying(ty));
        let fixed = match &signature {
            Some(Type::Func(func)) if func.variadic && !call.ellipsis => func.params.len() - 1,
            _ => usize::MAX,
        };

        let mut args = Vec::with_capacity(call.args.len());
        let mut rest = Vec::new();
        for (i, arg) in call.args.iter().enumerate() {
            let value = self.eval(arg)?;
            if i < fixed {
                args.push(value);
            } else {
                rest.push(value);
            }
        }
        if fixed != usize::MAX {
            args.push(if rest.is_empty() {
                Value::Slice(SliceValue::nil())
            } else {
                Value::Slice(SliceValue::from_vec(rest))
            });
        }
        Ok(args)
    }

    fn select(&mut self, expr: &'a Expr, sel: &'a SelectorExpr) -> RuntimeResult<Value<'a>> {
        let table = self.table;
        match table.selection(expr) {
            Some(Selection::PackageMember { package }) => Ok(Value::Func(Function::Native {
                package: package.as_str(),
                name: sel.field.name.as_str(),
            })),
            Some(Selection::Method { receiver }) => {
                let decl = *self
                    .methods
                    .get(&(receiver.as_str(), sel.field.name.as_str()))
                    .ok_or_else(|| RuntimeError::undefined(format!("{receiver}.{}", sel.field.name), sel.field.span))?;
                let receiver = self.eval(&sel.operand)?;
                Ok(Value::Func(Function::Method {
                    decl,
                    receiver: Box::new(receiver),
                }))
            }
            Some(Selection::Field) => match self.eval(&sel.operand)? {
                Value::Struct(mut fields) => fields
                    .swap_remove(&sel.field.name)
                    .ok_or_else(|| RuntimeError::undefined(&sel.field.name, sel.field.span)),
                other => Err(RuntimeError::type_error("struct", other.type_name(), sel.operand.span)),
            },
            Some(Selection::GenericMethod) => Err(RuntimeError::unspecialized(&sel.field.name, expr.span)),
            None => Err(RuntimeError::undefined(&sel.field.name, sel.field.span)),
        }
    }

    fn composite(&mut self, expr: &'a Expr, lit: &'a CompositeLit) -> RuntimeResult<Value<'a>> {
        let table = self.table;
        let Some(ty) = table.type_of(expr) else {
            return Err(RuntimeError::undefined("composite literal", expr.span));
        };
        match table.underlying(ty) {
            Type::Slice(_) => {
                let mut values = Vec::with_capacity(lit.elements.len());
                for element in &lit.elements {
                    values.push(self.eval(&element.value)?);
                }
                Ok(Value::Slice(SliceValue::from_vec(values)))
            }
            Type::Map(..) => {
                let map = MapValue::new();
                for element in &lit.elements {
                    let Some(key_expr) = &element.key else { continue };
                    let key = self.eval(key_expr)?;
                    let value = self.eval(&element.value)?;
                    let hashed = key
                        .to_key()
                        .ok_or_else(|| RuntimeError::type_error("comparable key", key.type_name(), key_expr.span))?;
                    map.insert(hashed, key, value);
                }
                Ok(Value::Map(map))
            }
            Type::Struct(fields) => {
                let Value::Struct(mut values) = self.zero(ty) else {
                    return Err(RuntimeError::type_error("struct", ty.to_string().as_str(), expr.span));
                };
                for (i, element) in lit.elements.iter().enumerate() {
                    let name = match element.key.as_ref().and_then(|key| key.as_ident()) {
                        Some(name) => name,
                        None => match fields.get(i) {
                            Some(field) => field.name.as_str(),
                            None => continue,
                        },
                    };
                    let value = self.eval(&element.value)?;
                    values.insert(name.to_string(), value);
                }
                Ok(Value::Struct(values))
            }
            other => Err(RuntimeError::type_error("composite type", other.to_string().as_str(), expr.span)),
        }
    }

    /// Store `value` into an assignable expression.
    ///
    /// Struct fields are written by rebuilding the enclosing struct value
    /// and assigning it back to its own target.
    pub(crate) fn assign(&mut self, target: &'a Expr, value: Value<'a>) -> RuntimeResult<()> {
        match &target.kind {
            ExprKind::Ident(name) if name == "_" => Ok(()),
            ExprKind::Ident(name) => {
                if self.env.set(name, value) {
                    Ok(())
                } else {
                    Err(RuntimeError::undefined(name, target.span))
                }
            }
            ExprKind::Paren(inner) => self.assign(inner, value),
            ExprKind::Index(index) => {
                let operand = self.eval(&index.operand)?;
                let key = self.eval(&index.index)?;
                match operand {
                    Value::Slice(slice) => {
                        let i = self.int(&key, index.index.span)?;
                        let stored = usize::try_from(i).is_ok_and(|i| slice.set(i, value));
                        if stored {
                            Ok(())
                        } else {
                            Err(RuntimeError::index_out_of_range(i, slice.len(), index.index.span))
                        }
                    }
                    Value::Map(map) => {
                        let hashed = key
                            .to_key()
                            .ok_or_else(|| RuntimeError::type_error("comparable key", key.type_name(), index.index.span))?;
                        if map.insert(hashed, key, value) {
                            Ok(())
                        } else {
                            Err(RuntimeError::NilMapWrite {
                                span: crate::error::span_to_source_span(target.span),
                            })
                        }
                    }
                    other => Err(RuntimeError::type_error("slice or map", other.type_name(), index.operand.span)),
                }
            }
            ExprKind::Selector(sel) => match self.eval(&sel.operand)? {
                Value::Struct(mut fields) => {
                    fields.insert(sel.field.name.clone(), value);
                    self.assign(&sel.operand, Value::Struct(fields))
                }
                other => Err(RuntimeError::type_error("struct", other.type_name(), sel.operand.span)),
            },
            _ => Err(RuntimeError::type_error("assignable expression", "value", target.span)),
        }
    }
}
