// Predeclared functions and conversions

use crate::error::{RuntimeError, RuntimeResult, span_to_source_span};
use crate::interpreter::Interpreter;
use crate::value::{MapValue, SliceValue, Value};
use ply_parser::{CallExpr, Expr};
use ply_typechecker::{BasicKind, Type};

impl<'a> Interpreter<'a> {
    pub(crate) fn builtin(&mut self, expr: &'a Expr, call: &'a CallExpr) -> RuntimeResult<Value<'a>> {
        let name = call.func.as_ident().unwrap_or_default();
        match name {
            "len" => {
                let value = self.eval(self.arg(call, 0, expr)?)?;
                let len = match &value {
                    Value::String(text) => text.len(),
                    Value::Slice(slice) => slice.len(),
                    Value::Map(map) => map.len(),
                    other => return Err(RuntimeError::type_error("string, slice or map", other.type_name(), expr.span)),
                };
                Ok(Value::Int(len as i64))
            }
            "append" => {
                let target = self.eval(self.arg(call, 0, expr)?)?;
                let slice = match target {
                    Value::Slice(slice) => slice,
                    other => return Err(RuntimeError::type_error("slice", other.type_name(), expr.span)),
                };
                let mut values = Vec::new();
                for arg in &call.args[1..] {
                    let value = self.eval(arg)?;
                    if call.ellipsis {
                        match value {
                            Value::Slice(spread) => values.extend(spread.to_vec()),
                            other => return Err(RuntimeError::type_error("slice", other.type_name(), arg.span)),
                        }
                    } else {
                        values.push(value);
                    }
                }
                Ok(Value::Slice(slice.append(values)))
            }
            "make" => self.make(expr, call),
            "copy" => {
                let dst = self.eval(self.arg(call, 0, expr)?)?;
                let src = self.eval(self.arg(call, 1, expr)?)?;
                let (Value::Slice(dst), Value::Slice(src)) = (dst, src) else {
                    return Err(RuntimeError::type_error("slices", "other values", expr.span));
                };
                // Snapshot first so overlapping slices copy correctly
                let values = src.to_vec();
                let count = dst.len().min(values.len());
                for (i, value) in values.into_iter().take(count).enumerate() {
                    dst.set(i, value);
                }
                Ok(Value::Int(count as i64))
            }
            other => Err(RuntimeError::unspecialized(other, expr.span)),
        }
    }

    fn arg(&self, call: &'a CallExpr, index: usize, expr: &Expr) -> RuntimeResult<&'a Expr> {
        call.args
            .get(index)
            .ok_or_else(|| RuntimeError::undefined(format!("argument {index}"), expr.span))
    }

    fn make(&mut self, expr: &'a Expr, call: &'a CallExpr) -> RuntimeResult<Value<'a>> {
        let table = self.table;
        let ty = table
            .type_of(self.arg(call, 0, expr)?)
            .map(|ty| table.underlying(ty))
            .unwrap_or(Type::Void);
        let mut sizes = Vec::new();
        for size in &call.args[1..] {
            let value = self.eval(size)?;
            sizes.push(self.int(&value, size.span)?);
        }

        match ty {
            Type::Slice(elem) => {
                let len = sizes.first().copied().unwrap_or(0);
                let cap = sizes.get(1).copied().unwrap_or(len);
                if len < 0 || cap < len {
                    return Err(RuntimeError::MakeLength {
                        span: span_to_source_span(expr.span),
                    });
                }
                let zero = self.zero(&elem);
                Ok(Value::Slice(SliceValue::make(len as usize, cap as usize, &zero)))
            }
            Type::Map(..) => Ok(Value::Map(MapValue::new())),
            other => Err(RuntimeError::type_error("slice or map type", other.to_string().as_str(), expr.span)),
        }
    }

    /// `T(x)`: numeric conversions change representation, others keep it
    pub(crate) fn conversion(&mut self, expr: &'a Expr, call: &'a CallExpr) -> RuntimeResult<Value<'a>> {
        let table = self.table;
        let target = table
            .type_of(&call.func)
            .map(|ty| table.underlying(ty))
            .unwrap_or(Type::Void);
        let value = self.eval(self.arg(call, 0, expr)?)?;
        Ok(match (target.basic_kind(), value) {
            (Some(BasicKind::Int), Value::Float(f)) => Value::Int(f as i64),
            (Some(BasicKind::Float64), Value::Int(n)) => Value::Float(n as f64),
            (_, value) => value,
        })
    }
}
