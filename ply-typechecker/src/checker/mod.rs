//! Package checker
//!
//! Checking runs in phases over all files of the package: imports, type
//! declarations, function signatures, package constants and variables, and
//! finally function bodies. The first error aborts the check.

use crate::config::Config;
use crate::constant::ConstValue;
use crate::error::{CheckError, CheckResult};
use crate::importer::Package;
use crate::table::{NamedType, TypeAndValue, TypeTable};
use crate::types::{BasicKind, Field, FuncType, Type};
use indexmap::IndexMap;
use miette::{NamedSource, SourceSpan};
use ply_parser::{Expr, ExprKind, File, Span, TypeExpr, TypeExprKind};
use std::collections::HashMap;

mod builtins;
mod decls;
mod exprs;
mod generics;
mod stmts;

pub use generics::GENERIC_METHODS;

/// What a name in scope refers to
#[derive(Debug, Clone)]
pub(crate) enum Entity {
    Var(Type),
    Const(Type, ConstValue),
    TypeName(Type),
    Func(FuncType),
    Builtin(Builtin),
    Package(String),
    Nil,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Builtin {
    Len,
    Append,
    Make,
    Copy,
    Max,
    Min,
    Merge,
    Not,
    Repeat,
    Zip,
}

impl Builtin {
    pub(crate) fn name(self) -> &'static str {
        match self {
            Builtin::Len => "len",
            Builtin::Append => "append",
            Builtin::Make => "make",
            Builtin::Copy => "copy",
            Builtin::Max => "max",
            Builtin::Min => "min",
            Builtin::Merge => "merge",
            Builtin::Not => "not",
            Builtin::Repeat => "repeat",
            Builtin::Zip => "zip",
        }
    }
}

pub(crate) struct Checker<'a> {
    config: &'a Config,
    files: &'a [File],
    table: TypeTable,
    universe: HashMap<String, Entity>,
    package: IndexMap<String, Entity>,
    /// Imported packages of each file, keyed by package name
    imports: Vec<HashMap<String, Package>>,
    scopes: Vec<HashMap<String, Entity>>,
    /// Result types of the enclosing functions, innermost last
    results: Vec<Option<Type>>,
    file: usize,
}

impl<'a> Checker<'a> {
    pub(crate) fn new(files: &'a [File], config: &'a Config) -> Self {
        Self {
            config,
            files,
            table: TypeTable::new(),
            universe: universe(config.dialect),
            package: IndexMap::new(),
            imports: vec![HashMap::new(); files.len()],
            scopes: Vec::new(),
            results: Vec::new(),
            file: 0,
        }
    }

    pub(crate) fn check(mut self) -> CheckResult<TypeTable> {
        self.resolve_imports()?;
        self.collect_types()?;
        self.collect_functions()?;
        self.collect_values()?;
        self.check_bodies()?;
        Ok(self.table)
    }

    // -----------------------------------------------------------------------
    // Scopes

    pub(crate) fn push_scope(&mut self) {
        self.scopes.push(HashMap::new());
    }

    pub(crate) fn pop_scope(&mut self) {
        self.scopes.pop();
    }

    /// Declare a local. `_` is never bound.
    pub(crate) fn declare(&mut self, name: &str, entity: Entity, span: Span) -> CheckResult<()> {
        if name == "_" {
            return Ok(());
        }
        let Some(scope) = self.scopes.last_mut() else {
            return Err(self.invalid(format!("{name} declared outside a function"), span));
        };
        if scope.contains_key(name) {
            return Err(self.redeclared(name, span));
        }
        scope.insert(name.to_string(), entity);
        Ok(())
    }

    pub(crate) fn lookup(&self, name: &str) -> Option<Entity> {
        for scope in self.scopes.iter().rev() {
            if let Some(entity) = scope.get(name) {
                return Some(entity.clone());
            }
        }
        if self.imports[self.file].contains_key(name) {
            return Some(Entity::Package(name.to_string()));
        }
        self.package
            .get(name)
            .or_else(|| self.universe.get(name))
            .cloned()
    }

    pub(crate) fn imported(&self, name: &str) -> Option<&Package> {
        self.imports[self.file].get(name)
    }

    // -----------------------------------------------------------------------
    // Types

    pub(crate) fn resolve_type(&self, ty: &TypeExpr) -> CheckResult<Type> {
        match &ty.kind {
            TypeExprKind::Name(name) => match self.lookup(name) {
                Some(Entity::TypeName(resolved)) => Ok(resolved),
                Some(_) => Err(self.invalid(format!("{name} is not a type"), ty.span)),
                None => Err(self.undefined(name, ty.span)),
            },
            TypeExprKind::Slice(elem) => Ok(Type::slice(self.resolve_type(elem)?)),
            TypeExprKind::Map(key, value) => {
                let key = self.resolve_type(key)?;
                if matches!(key, Type::Slice(_) | Type::Map(..) | Type::Func(_)) {
                    return Err(self.invalid(format!("invalid map key type {key}"), ty.span));
                }
                Ok(Type::map(key, self.resolve_type(value)?))
            }
            TypeExprKind::Func(func) => {
                let mut params = Vec::with_capacity(func.params.len());
                let last = func.params.len().saturating_sub(1);
                for (i, param) in func.params.iter().enumerate() {
                    let resolved = self.resolve_type(param)?;
                    if func.variadic && i == last {
                        params.push(Type::slice(resolved));
                    } else {
                        params.push(resolved);
                    }
                }
                let result = match &func.result {
                    Some(result) => Some(Box::new(self.resolve_type(result)?)),
                    None => None,
                };
                Ok(Type::Func(FuncType {
                    params,
                    variadic: func.variadic,
                    result,
                }))
            }
            TypeExprKind::Struct(fields) => {
                let mut resolved: Vec<Field> = Vec::with_capacity(fields.len());
                for field in fields {
                    if resolved.iter().any(|f| f.name == field.name.name) {
                        return Err(self.redeclared(&field.name.name, field.name.span));
                    }
                    resolved.push(Field {
                        name: field.name.name.clone(),
                        ty: self.resolve_type(&field.ty)?,
                    });
                }
                Ok(Type::Struct(resolved))
            }
            TypeExprKind::Interface => Ok(Type::Any),
        }
    }

    pub(crate) fn underlying(&self, ty: &Type) -> Type {
        self.table.underlying(ty)
    }

    pub(crate) fn basic_kind(&self, ty: &Type) -> Option<BasicKind> {
        self.underlying(ty).basic_kind()
    }

    pub(crate) fn is_comparable(&self, ty: &Type) -> bool {
        match self.underlying(ty) {
            Type::Basic(kind) => kind != BasicKind::UntypedNil,
            Type::Struct(fields) => fields.iter().all(|f| self.is_comparable(&f.ty)),
            Type::Any => true,
            _ => false,
        }
    }

    pub(crate) fn is_ordered(&self, ty: &Type) -> bool {
        self.basic_kind(ty).is_some_and(BasicKind::is_ordered)
    }

    pub(crate) fn is_numeric(&self, ty: &Type) -> bool {
        self.basic_kind(ty).is_some_and(BasicKind::is_numeric)
    }

    /// Go assignability of a value of type `from` (with constant `value`) to `to`
    pub(crate) fn assignable(&self, from: &Type, value: Option<&ConstValue>, to: &Type) -> bool {
        if from == to {
            return true;
        }
        if matches!(from, Type::Void) {
            return false;
        }
        let target = self.underlying(to);
        if target == Type::Any {
            return true;
        }
        match from {
            Type::Basic(BasicKind::UntypedNil) => {
                return matches!(target, Type::Slice(_) | Type::Map(..) | Type::Func(_));
            }
            Type::Basic(kind) if kind.is_untyped() => {
                let Type::Basic(target) = target else {
                    return false;
                };
                return untyped_fits(*kind, value, target);
            }
            _ => {}
        }
        (!from.is_defined() || !to.is_defined()) && self.underlying(from) == target
    }

    /// Record the final type of an untyped expression once its context is known
    pub(crate) fn convert_untyped(&mut self, expr: &Expr, target: &Type) {
        let Some(tv) = self.table.get(expr.id).cloned() else {
            return;
        };
        if !tv.ty.is_untyped() || tv.ty == Type::Basic(BasicKind::UntypedNil) {
            return;
        }
        let final_ty = match self.underlying(target) {
            Type::Basic(kind) if !kind.is_untyped() => target.clone(),
            _ => tv.ty.defaulted(),
        };
        let value = match (&tv.value, self.basic_kind(&final_ty)) {
            (Some(value), Some(kind)) => value.convert(kind).or(Some(value.clone())),
            (value, _) => value.clone(),
        };
        self.table.record(
            expr.id,
            TypeAndValue {
                ty: final_ty.clone(),
                mode: tv.mode,
                value,
            },
        );
        if let ExprKind::Paren(inner) = &expr.kind {
            self.convert_untyped(inner, &final_ty);
        }
    }

    /// Check that `expr` can be assigned to `target` and settle its untyped type
    pub(crate) fn use_as(
        &mut self,
        expr: &Expr,
        tv: &TypeAndValue,
        target: &Type,
        context: &str,
    ) -> CheckResult<()> {
        if !self.assignable(&tv.ty, tv.value.as_ref(), target) {
            return Err(self.mismatch(target, &tv.ty, context, expr.span));
        }
        self.convert_untyped(expr, target);
        Ok(())
    }

    /// Type a value takes when declared without an explicit type
    pub(crate) fn default_type(&mut self, expr: &Expr, tv: &TypeAndValue) -> CheckResult<Type> {
        match &tv.ty {
            Type::Basic(BasicKind::UntypedNil) => {
                Err(self.invalid("use of untyped nil in assignment".to_string(), expr.span))
            }
            Type::Void => Err(self.invalid(
                format!("{} (no value) used as value", ply_parser::print_expr(expr)),
                expr.span,
            )),
            ty => {
                let ty = ty.defaulted();
                self.convert_untyped(expr, &ty);
                Ok(ty)
            }
        }
    }

    // -----------------------------------------------------------------------
    // Diagnostics

    fn source(&self) -> (String, NamedSource<String>) {
        let file = &self.files[self.file];
        let name = file.name.clone().unwrap_or_else(|| "<unknown>".to_string());
        let src = NamedSource::new(&name, file.source.clone());
        (name, src)
    }

    fn source_span(span: Span) -> SourceSpan {
        SourceSpan::new(span.start.into(), span.len())
    }

    pub(crate) fn undefined(&self, name: &str, span: Span) -> CheckError {
        let (file, src) = self.source();
        CheckError::Undefined {
            name: name.to_string(),
            file,
            src,
            span: Self::source_span(span),
        }
    }

    pub(crate) fn redeclared(&self, name: &str, span: Span) -> CheckError {
        let (file, src) = self.source();
        CheckError::Redeclared {
            name: name.to_string(),
            file,
            src,
            span: Self::source_span(span),
        }
    }

    pub(crate) fn mismatch(&self, expected: &Type, found: &Type, context: &str, span: Span) -> CheckError {
        let (file, src) = self.source();
        CheckError::Mismatch {
            expected: expected.to_string(),
            found: found.to_string(),
            context: context.to_string(),
            file,
            src,
            span: Self::source_span(span),
        }
    }

    pub(crate) fn argument_count(&self, name: &str, expected: String, found: usize, span: Span) -> CheckError {
        let (file, src) = self.source();
        CheckError::ArgumentCount {
            name: name.to_string(),
            expected,
            found,
            file,
            src,
            span: Self::source_span(span),
        }
    }

    pub(crate) fn unknown_selector(&self, ty: &Type, name: &str, span: Span) -> CheckError {
        let (file, src) = self.source();
        CheckError::UnknownSelector {
            ty: ty.to_string(),
            name: name.to_string(),
            file,
            src,
            span: Self::source_span(span),
        }
    }

    pub(crate) fn invalid(&self, message: String, span: Span) -> CheckError {
        let (file, src) = self.source();
        CheckError::InvalidOperation {
            message,
            file,
            src,
            span: Self::source_span(span),
        }
    }

    pub(crate) fn missing_return(&self, name: &str, span: Span) -> CheckError {
        let (file, src) = self.source();
        CheckError::MissingReturn {
            name: name.to_string(),
            file,
            src,
            span: Self::source_span(Span::new(span.end.saturating_sub(1), span.end)),
        }
    }

    pub(crate) fn declare_named(&mut self, name: &str) {
        self.table.declare_named(NamedType {
            name: name.to_string(),
            underlying: Type::Void,
            methods: IndexMap::new(),
        });
    }
}

/// Whether an untyped constant of `kind` can be used as a `target` value
fn untyped_fits(kind: BasicKind, value: Option<&ConstValue>, target: BasicKind) -> bool {
    if target.is_untyped() {
        return kind == target
            || (kind.is_numeric() && target.is_numeric())
            || (kind.is_boolean() && target.is_boolean());
    }
    match (kind, target) {
        (BasicKind::UntypedBool, BasicKind::Bool) => true,
        (BasicKind::UntypedString, BasicKind::String) => true,
        (BasicKind::UntypedInt, BasicKind::Int | BasicKind::Float64) => true,
        (BasicKind::UntypedFloat, BasicKind::Float64) => true,
        (BasicKind::UntypedFloat, BasicKind::Int) => {
            value.is_some_and(|value| value.convert(BasicKind::Int).is_some())
        }
        _ => false,
    }
}

fn universe(dialect: bool) -> HashMap<String, Entity> {
    let mut scope = HashMap::new();
    for (name, ty) in [
        ("int", Type::int()),
        ("float64", Type::float64()),
        ("string", Type::string()),
        ("bool", Type::bool()),
        ("any", Type::Any),
    ] {
        scope.insert(name.to_string(), Entity::TypeName(ty));
    }
    scope.insert(
        "true".to_string(),
        Entity::Const(Type::Basic(BasicKind::UntypedBool), ConstValue::Bool(true)),
    );
    scope.insert(
        "false".to_string(),
        Entity::Const(Type::Basic(BasicKind::UntypedBool), ConstValue::Bool(false)),
    );
    scope.insert("nil".to_string(), Entity::Nil);

    let mut builtins = vec![Builtin::Len, Builtin::Append, Builtin::Make, Builtin::Copy];
    if dialect {
        builtins.extend([
            Builtin::Max,
            Builtin::Min,
            Builtin::Merge,
            Builtin::Not,
            Builtin::Repeat,
            Builtin::Zip,
        ]);
    }
    for builtin in builtins {
        scope.insert(builtin.name().to_string(), Entity::Builtin(builtin));
    }
    scope
}
