// Typing rules for the dialect's generic built-ins
//
// Each rule instantiates the generic signature from the argument types and
// records the call with its concrete result type.

use super::{Builtin, Checker};
use crate::constant::ConstValue;
use crate::error::CheckResult;
use crate::table::{Mode, Selection, TypeAndValue};
use crate::types::{BasicKind, FuncType, Type};
use ply_parser::{print_expr, CallExpr, Expr, SelectorExpr};
use std::cmp::Ordering;

/// Collection methods available on slice and map receivers in the dialect
pub const GENERIC_METHODS: &[&str] = &[
    "filter", "map", "take", "drop", "reduce", "sum", "contains", "any", "all", "foreach",
    "reverse", "sort", "keys", "elems",
];

impl Checker<'_> {
    /// Whether `recv.name(..)` is a dialect collection method call.
    /// Methods declared on the receiver's type take precedence.
    pub(super) fn is_generic_method_call(&self, receiver: &Type, name: &str) -> bool {
        self.config.dialect
            && GENERIC_METHODS.contains(&name)
            && !self.table.has_method(receiver, name)
            && matches!(self.underlying(receiver), Type::Slice(_) | Type::Map(..))
    }

    pub(super) fn generic_method(
        &mut self,
        expr: &Expr,
        call: &CallExpr,
        sel: &SelectorExpr,
        receiver: &TypeAndValue,
    ) -> CheckResult<TypeAndValue> {
        let name = sel.field.name.as_str();
        if call.ellipsis {
            return Err(self.invalid(format!("invalid use of ... with {name}"), expr.span));
        }
        let recv_ty = receiver.ty.clone();
        let underlying = self.underlying(&recv_ty);

        let (params, result): (Vec<Type>, Type) = match (name, &underlying) {
            ("keys", Type::Map(key, _)) => {
                self.expect_args(expr, call, name, 0)?;
                (vec![], Type::slice((**key).clone()))
            }
            ("elems", Type::Map(_, value)) => {
                self.expect_args(expr, call, name, 0)?;
                (vec![], Type::slice((**value).clone()))
            }
            (_, Type::Slice(elem)) => {
                let elem = (**elem).clone();
                self.slice_method(expr, call, name, &recv_ty, &elem)?
            }
            _ => {
                return Err(self.invalid(
                    format!("{name} is not defined on {} (value of type {recv_ty})", print_expr(&sel.operand)),
                    sel.field.span,
                ))
            }
        };

        let signature = FuncType::new(params, (result != Type::Void).then(|| result.clone()));
        self.table.record_selection(call.func.id, Selection::GenericMethod);
        self.record(&call.func, TypeAndValue::value(Type::Func(signature)));

        Ok(match result {
            Type::Void => TypeAndValue::of_mode(Type::Void, Mode::NoValue),
            ty => TypeAndValue::value(ty),
        })
    }

    /// Parameter types and result of a slice method; arguments are checked here
    fn slice_method(
        &mut self,
        expr: &Expr,
        call: &CallExpr,
        name: &str,
        recv: &Type,
        elem: &Type,
    ) -> CheckResult<(Vec<Type>, Type)> {
        let predicate = Type::func(vec![elem.clone()], Some(Type::bool()));
        match name {
            "filter" | "any" | "all" => {
                let [f] = self.expect_args(expr, call, name, 1)? else {
                    unreachable!("argument count checked");
                };
                self.argument(f, &predicate, name)?;
                let result = if name == "filter" { recv.clone() } else { Type::bool() };
                Ok((vec![predicate], result))
            }
            "map" => {
                let [f] = self.expect_args(expr, call, name, 1)? else {
                    unreachable!("argument count checked");
                };
                let func = self.func_argument(f, name)?;
                let (Some(mapped), [param]) = (func.result.as_deref(), func.params.as_slice()) else {
                    return Err(self.invalid(format!("map expects func({elem}) U, got {}", Type::Func(func.clone())), f.span));
                };
                if param != elem || func.variadic {
                    return Err(self.invalid(format!("map expects func({elem}) U, got {}", Type::Func(func.clone())), f.span));
                }
                Ok((vec![Type::Func(func.clone())], Type::slice(mapped.clone())))
            }
            "take" | "drop" => {
                let [n] = self.expect_args(expr, call, name, 1)? else {
                    unreachable!("argument count checked");
                };
                self.argument(n, &Type::int(), name)?;
                Ok((vec![Type::int()], recv.clone()))
            }
            "reduce" => match call.args.as_slice() {
                [f] => {
                    let combine = Type::func(vec![elem.clone(), elem.clone()], Some(elem.clone()));
                    self.argument(f, &combine, name)?;
                    Ok((vec![combine], elem.clone()))
                }
                [f, init] => {
                    let func = self.func_argument(f, name)?;
                    let acc = match (func.params.as_slice(), func.result.as_deref()) {
                        ([acc, item], Some(result)) if item == elem && acc == result && !func.variadic => acc.clone(),
                        _ => {
                            return Err(self.invalid(
                                format!("reduce expects func(U, {elem}) U, got {}", Type::Func(func.clone())),
                                f.span,
                            ))
                        }
                    };
                    self.argument(init, &acc, name)?;
                    Ok((vec![Type::Func(func), acc.clone()], acc))
                }
                args => Err(self.argument_count(name, "1 or 2".to_string(), args.len(), expr.span)),
            },
            "sum" => {
                self.expect_args(expr, call, name, 0)?;
                if !self.is_numeric(elem) {
                    return Err(self.invalid(format!("sum requires numeric elements, have {elem}"), expr.span));
                }
                Ok((vec![], elem.clone()))
            }
            "contains" => {
                let [x] = self.expect_args(expr, call, name, 1)? else {
                    unreachable!("argument count checked");
                };
                if !self.is_comparable(elem) {
                    return Err(self.invalid(format!("contains requires comparable elements, have {elem}"), expr.span));
                }
                self.argument(x, elem, name)?;
                Ok((vec![elem.clone()], Type::bool()))
            }
            "foreach" => {
                let [f] = self.expect_args(expr, call, name, 1)? else {
                    unreachable!("argument count checked");
                };
                let action = Type::func(vec![elem.clone()], None);
                self.argument(f, &action, name)?;
                Ok((vec![action], Type::Void))
            }
            "reverse" => {
                self.expect_args(expr, call, name, 0)?;
                Ok((vec![], recv.clone()))
            }
            "sort" => match call.args.as_slice() {
                [] => {
                    if !self.is_ordered(elem) {
                        return Err(self.invalid(
                            format!("sort without a comparison requires ordered elements, have {elem}"),
                            expr.span,
                        ));
                    }
                    Ok((vec![], recv.clone()))
                }
                [less] => {
                    let less_ty = Type::func(vec![elem.clone(), elem.clone()], Some(Type::bool()));
                    self.argument(less, &less_ty, name)?;
                    Ok((vec![less_ty], recv.clone()))
                }
                args => Err(self.argument_count(name, "0 or 1".to_string(), args.len(), expr.span)),
            },
            _ => Err(self.invalid(format!("{name} is not defined on {recv}"), expr.span)),
        }
    }

    fn argument(&mut self, arg: &Expr, target: &Type, name: &str) -> CheckResult<()> {
        let tv = self.value(arg)?;
        self.use_as(arg, &tv, target, &format!("argument to {name}"))
    }

    /// Check an argument that must be a function and return its signature
    fn func_argument(&mut self, arg: &Expr, name: &str) -> CheckResult<FuncType> {
        let tv = self.value(arg)?;
        match self.underlying(&tv.ty) {
            Type::Func(func) => Ok(func),
            other => Err(self.invalid(
                format!("argument to {name} must be a function, have {other}"),
                arg.span,
            )),
        }
    }

    /// `max(x, rest...)` and `min(x, rest...)`
    pub(super) fn generic_extremum(&mut self, expr: &Expr, call: &CallExpr, builtin: Builtin) -> CheckResult<TypeAndValue> {
        let name = builtin.name();
        if call.args.is_empty() {
            return Err(self.argument_count(name, "at least 1".to_string(), 0, expr.span));
        }
        let mut tvs = Vec::with_capacity(call.args.len());
        for arg in &call.args {
            tvs.push(self.value(arg)?);
        }

        let typed = tvs.iter().find(|tv| !tv.ty.is_untyped()).map(|tv| tv.ty.clone());
        let ty = match typed {
            Some(ty) => {
                for (arg, tv) in call.args.iter().zip(&tvs) {
                    self.use_as(arg, tv, &ty, &format!("argument to {name}"))?;
                }
                ty
            }
            None => {
                let mut kind: Option<BasicKind> = None;
                for (arg, tv) in call.args.iter().zip(&tvs) {
                    let Some(arg_kind) = tv.ty.basic_kind().filter(|k| k.is_ordered()) else {
                        return Err(self.invalid(format!("{name} requires ordered arguments, have {}", tv.ty), arg.span));
                    };
                    kind = Some(match kind {
                        None => arg_kind,
                        Some(current) if current == arg_kind => current,
                        Some(current) if current.is_numeric() && arg_kind.is_numeric() => BasicKind::UntypedFloat,
                        Some(_) => {
                            return Err(self.invalid(format!("mismatched types in call to {name}"), arg.span));
                        }
                    });
                }
                Type::Basic(kind.unwrap_or(BasicKind::UntypedInt))
            }
        };
        if !self.is_ordered(&ty) {
            return Err(self.invalid(format!("{name} requires ordered arguments, have {ty}"), expr.span));
        }

        let constants: Option<Vec<&ConstValue>> = tvs
            .iter()
            .map(|tv| tv.value.as_ref().filter(|_| tv.is_constant()))
            .collect();
        if let Some(values) = constants {
            let mut best = values[0];
            for value in &values[1..] {
                let ordering = value
                    .compare(best)
                    .ok_or_else(|| self.invalid(format!("mismatched types in call to {name}"), expr.span))?;
                let better = match builtin {
                    Builtin::Max => ordering == Ordering::Greater,
                    _ => ordering == Ordering::Less,
                };
                if better {
                    best = value;
                }
            }
            let folded = match self.basic_kind(&ty) {
                Some(kind) => best.convert(kind).unwrap_or_else(|| best.clone()),
                None => best.clone(),
            };
            tracing::trace!(builtin = name, value = %folded, "folded constant call");
            return Ok(TypeAndValue::constant(ty, folded));
        }
        Ok(TypeAndValue::value(ty.defaulted()))
    }

    /// `merge(a, b map[K]V) map[K]V`
    pub(super) fn generic_merge(&mut self, expr: &Expr, call: &CallExpr) -> CheckResult<TypeAndValue> {
        let [a, b] = self.expect_args(expr, call, "merge", 2)? else {
            unreachable!("argument count checked");
        };
        let a_tv = self.value(a)?;
        if !matches!(self.underlying(&a_tv.ty), Type::Map(..)) {
            return Err(self.invalid(format!("merge requires map arguments, have {}", a_tv.ty), a.span));
        }
        self.argument(b, &a_tv.ty, "merge")?;
        Ok(TypeAndValue::value(a_tv.ty))
    }

    /// `not(f func(T) bool) func(T) bool`
    pub(super) fn generic_not(&mut self, expr: &Expr, call: &CallExpr) -> CheckResult<TypeAndValue> {
        let [f] = self.expect_args(expr, call, "not", 1)? else {
            unreachable!("argument count checked");
        };
        let func = self.func_argument(f, "not")?;
        let is_predicate = func.params.len() == 1
            && !func.variadic
            && func
                .result
                .as_deref()
                .is_some_and(|result| self.basic_kind(result) == Some(BasicKind::Bool));
        if !is_predicate {
            return Err(self.invalid(
                format!("not expects func(T) bool, got {}", Type::Func(func)),
                f.span,
            ));
        }
        Ok(TypeAndValue::value(Type::Func(func)))
    }

    /// `repeat(x T, n int) []T`
    pub(super) fn generic_repeat(&mut self, expr: &Expr, call: &CallExpr) -> CheckResult<TypeAndValue> {
        let [x, n] = self.expect_args(expr, call, "repeat", 2)? else {
            unreachable!("argument count checked");
        };
        let x_tv = self.value(x)?;
        let elem = self.default_type(x, &x_tv)?;
        self.argument(n, &Type::int(), "repeat")?;
        Ok(TypeAndValue::value(Type::slice(elem)))
    }

    /// `zip(f func(A, B) C, a []A, b []B) []C`
    pub(super) fn generic_zip(&mut self, expr: &Expr, call: &CallExpr) -> CheckResult<TypeAndValue> {
        let [f, a, b] = self.expect_args(expr, call, "zip", 3)? else {
            unreachable!("argument count checked");
        };
        let func = self.func_argument(f, "zip")?;
        let (Some(result), [first, second]) = (func.result.as_deref(), func.params.as_slice()) else {
            return Err(self.invalid(
                format!("zip expects func(A, B) C, got {}", Type::Func(func.clone())),
                f.span,
            ));
        };
        let (result, first, second) = (result.clone(), first.clone(), second.clone());
        self.argument(a, &Type::slice(first), "zip")?;
        self.argument(b, &Type::slice(second), "zip")?;
        Ok(TypeAndValue::value(Type::slice(result)))
    }
}
