// Predeclared functions: len, append, make, copy

use super::{Builtin, Checker};
use crate::constant::ConstValue;
use crate::error::CheckResult;
use crate::table::{Mode, TypeAndValue};
use crate::types::{BasicKind, Type};
use ply_parser::{print_expr, CallExpr, Expr};

impl Checker<'_> {
    pub(super) fn builtin(&mut self, expr: &Expr, call: &CallExpr, builtin: Builtin) -> CheckResult<TypeAndValue> {
        if call.ellipsis && builtin != Builtin::Append {
            return Err(self.invalid(
                format!("invalid use of ... with built-in {}", builtin.name()),
                expr.span,
            ));
        }
        match builtin {
            Builtin::Len => self.builtin_len(expr, call),
            Builtin::Append => self.builtin_append(expr, call),
            Builtin::Make => self.builtin_make(expr, call),
            Builtin::Copy => self.builtin_copy(expr, call),
            Builtin::Max | Builtin::Min => self.generic_extremum(expr, call, builtin),
            Builtin::Merge => self.generic_merge(expr, call),
            Builtin::Not => self.generic_not(expr, call),
            Builtin::Repeat => self.generic_repeat(expr, call),
            Builtin::Zip => self.generic_zip(expr, call),
        }
    }

    /// Check that a built-in got exactly `count` arguments
    pub(super) fn expect_args<'e>(&self, expr: &Expr, call: &'e CallExpr, name: &str, count: usize) -> CheckResult<&'e [Expr]> {
        if call.args.len() != count {
            return Err(self.argument_count(name, count.to_string(), call.args.len(), expr.span));
        }
        Ok(&call.args)
    }

    fn builtin_len(&mut self, expr: &Expr, call: &CallExpr) -> CheckResult<TypeAndValue> {
        let [arg] = self.expect_args(expr, call, "len", 1)? else {
            unreachable!("argument count checked");
        };
        let tv = self.value(arg)?;
        match self.underlying(&tv.ty) {
            Type::Basic(kind) if kind.is_string() => match &tv.value {
                Some(ConstValue::String(value)) if tv.is_constant() => {
                    self.convert_untyped(arg, &Type::string());
                    Ok(TypeAndValue::constant(Type::int(), ConstValue::Int(value.len() as i64)))
                }
                _ => Ok(TypeAndValue::value(Type::int())),
            },
            Type::Slice(_) | Type::Map(..) => Ok(TypeAndValue::value(Type::int())),
            other => Err(self.invalid(
                format!("invalid argument: {} (value of type {other}) for built-in len", print_expr(arg)),
                arg.span,
            )),
        }
    }

    fn builtin_append(&mut self, expr: &Expr, call: &CallExpr) -> CheckResult<TypeAndValue> {
        let Some((slice, rest)) = call.args.split_first() else {
            return Err(self.argument_count("append", "at least 1".to_string(), 0, expr.span));
        };
        let tv = self.value(slice)?;
        let Type::Slice(elem) = self.underlying(&tv.ty) else {
            return Err(self.invalid(
                format!("invalid argument: {} (value of type {}) is not a slice", print_expr(slice), tv.ty),
                slice.span,
            ));
        };

        if call.ellipsis {
            let [spread] = rest else {
                return Err(self.argument_count("append", "2".to_string(), call.args.len(), expr.span));
            };
            let spread_tv = self.value(spread)?;
            self.use_as(spread, &spread_tv, &Type::slice((*elem).clone()), "argument to append")?;
        } else {
            for arg in rest {
                let arg_tv = self.value(arg)?;
                self.use_as(arg, &arg_tv, &elem, "argument to append")?;
            }
        }
        Ok(TypeAndValue::value(tv.ty))
    }

    fn builtin_make(&mut self, expr: &Expr, call: &CallExpr) -> CheckResult<TypeAndValue> {
        let Some((first, sizes)) = call.args.split_first() else {
            return Err(self.argument_count("make", "at least 1".to_string(), 0, expr.span));
        };
        let tv = self.expr(first)?;
        if tv.mode != Mode::TypeExpr {
            return Err(self.invalid(format!("{} is not a type", print_expr(first)), first.span));
        }
        let allowed = match self.underlying(&tv.ty) {
            Type::Slice(_) => 1..=2,
            Type::Map(..) => 0..=1,
            other => {
                return Err(self.invalid(format!("invalid argument: cannot make {other}"), first.span));
            }
        };
        if !allowed.contains(&sizes.len()) {
            return Err(self.argument_count(
                "make",
                format!("{} to {}", allowed.start() + 1, allowed.end() + 1),
                call.args.len(),
                expr.span,
            ));
        }
        for size in sizes {
            let size_tv = self.value(size)?;
            if !self.basic_kind(&size_tv.ty).is_some_and(BasicKind::is_integer)
                && !size_tv.value.as_ref().is_some_and(|v| v.convert(BasicKind::Int).is_some())
            {
                return Err(self.mismatch(&Type::int(), &size_tv.ty, "argument to make", size.span));
            }
            self.convert_untyped(size, &Type::int());
        }
        Ok(TypeAndValue::value(tv.ty))
    }

    fn builtin_copy(&mut self, expr: &Expr, call: &CallExpr) -> CheckResult<TypeAndValue> {
        let [dst, src] = self.expect_args(expr, call, "copy", 2)? else {
            unreachable!("argument count checked");
        };
        let dst_tv = self.value(dst)?;
        let src_tv = self.value(src)?;
        match (self.underlying(&dst_tv.ty), self.underlying(&src_tv.ty)) {
            (Type::Slice(a), Type::Slice(b)) if a == b => Ok(TypeAndValue::value(Type::int())),
            _ => Err(self.invalid(
                format!("arguments to copy {} and {} have different element types", print_expr(dst), print_expr(src)),
                expr.span,
            )),
        }
    }
}
