// Package-level declarations: imports, types, signatures, constants, variables

use super::{Checker, Entity};
use crate::error::{CheckError, CheckResult};
use crate::table::TypeAndValue;
use crate::types::{FuncType, Type};
use ply_parser::{ConstDecl, Decl, FuncDecl, Signature, Span, VarDecl};

impl Checker<'_> {
    pub(super) fn resolve_imports(&mut self) -> CheckResult<()> {
        let files = self.files;
        for (index, file) in files.iter().enumerate() {
            self.file = index;
            for import in &file.imports {
                let package = match self.config.importer.import(&import.path) {
                    Ok(package) => package,
                    Err(source) => {
                        let (file, src) = self.source();
                        return Err(CheckError::Import {
                            source,
                            file,
                            src,
                            span: Self::source_span(import.span),
                        });
                    }
                };
                tracing::trace!(path = %import.path, name = %package.name, "resolved import");
                self.imports[index].insert(package.name.clone(), package);
            }
        }
        Ok(())
    }

    pub(super) fn collect_types(&mut self) -> CheckResult<()> {
        let files = self.files;
        for (index, file) in files.iter().enumerate() {
            self.file = index;
            for decl in &file.decls {
                if let Decl::Type(decl) = decl {
                    self.declare_package(&decl.name.name, Entity::TypeName(Type::named(&decl.name.name)), decl.name.span)?;
                    self.declare_named(&decl.name.name);
                }
            }
        }

        let files = self.files;
        for (index, file) in files.iter().enumerate() {
            self.file = index;
            for decl in &file.decls {
                if let Decl::Type(decl) = decl {
                    let underlying = self.resolve_type(&decl.ty)?;
                    if self.refers_to(&underlying, &decl.name.name) {
                        return Err(self.invalid(
                            format!("invalid recursive type {}", decl.name.name),
                            decl.span,
                        ));
                    }
                    if let Some(named) = self.table.named_mut(&decl.name.name) {
                        named.underlying = underlying;
                    }
                }
            }
        }
        Ok(())
    }

    /// Whether `ty` is, or is defined as, the named type `name`
    fn refers_to(&self, ty: &Type, name: &str) -> bool {
        let mut current = ty.clone();
        for _ in 0..=self.package.len() {
            match current {
                Type::Named(ref other) if other == name => return true,
                Type::Named(ref other) => match self.table.named(other) {
                    Some(named) => current = named.underlying.clone(),
                    None => return false,
                },
                _ => return false,
            }
        }
        true
    }

    pub(super) fn collect_functions(&mut self) -> CheckResult<()> {
        let files = self.files;
        for (index, file) in files.iter().enumerate() {
            self.file = index;
            for decl in &file.decls {
                let Decl::Func(func) = decl else {
                    continue;
                };
                let signature = self.resolve_signature(&func.signature)?;
                match &func.receiver {
                    None => {
                        self.declare_package(&func.name.name, Entity::Func(signature), func.name.span)?
                    }
                    Some(receiver) => {
                        let receiver_ty = self.resolve_type(&receiver.ty)?;
                        let Type::Named(type_name) = receiver_ty else {
                            return Err(self.invalid(
                                format!("invalid receiver type {receiver_ty}"),
                                receiver.ty.span,
                            ));
                        };
                        let duplicate = self
                            .table
                            .named(&type_name)
                            .is_some_and(|named| named.methods.contains_key(&func.name.name));
                        if duplicate {
                            return Err(self.redeclared(
                                &format!("method {}.{}", type_name, func.name.name),
                                func.name.span,
                            ));
                        }
                        if let Some(named) = self.table.named_mut(&type_name) {
                            named.methods.insert(func.name.name.clone(), signature);
                        }
                    }
                }
            }
        }
        Ok(())
    }

    pub(super) fn collect_values(&mut self) -> CheckResult<()> {
        let files = self.files;
        for (index, file) in files.iter().enumerate() {
            self.file = index;
            for decl in &file.decls {
                match decl {
                    Decl::Const(decl) => {
                        let entity = self.const_entity(decl)?;
                        self.declare_package(&decl.name.name, entity, decl.name.span)?;
                    }
                    Decl::Var(decl) => {
                        let ty = self.var_type(decl)?;
                        self.declare_package(&decl.name.name, Entity::Var(ty), decl.name.span)?;
                    }
                    Decl::Func(_) | Decl::Type(_) => {}
                }
            }
        }
        Ok(())
    }

    pub(super) fn check_bodies(&mut self) -> CheckResult<()> {
        let files = self.files;
        for (index, file) in files.iter().enumerate() {
            self.file = index;
            for decl in &file.decls {
                if let Decl::Func(func) = decl {
                    self.check_func_decl(func)?;
                }
            }
        }
        Ok(())
    }

    fn check_func_decl(&mut self, func: &FuncDecl) -> CheckResult<()> {
        let signature = self.resolve_signature(&func.signature)?;
        self.push_scope();
        if let Some(receiver) = &func.receiver {
            let ty = self.resolve_type(&receiver.ty)?;
            self.declare(&receiver.name.name, Entity::Var(ty), receiver.name.span)?;
        }
        let result = self.check_function_body(&func.name.name, &func.signature, &signature, &func.body);
        self.pop_scope();
        result
    }

    /// Check a function body in the current (parameter) scope
    pub(crate) fn check_function_body(
        &mut self,
        name: &str,
        syntax: &Signature,
        signature: &FuncType,
        body: &ply_parser::Block,
    ) -> CheckResult<()> {
        for (param, ty) in syntax.params.iter().zip(&signature.params) {
            self.declare(&param.name.name, Entity::Var(ty.clone()), param.name.span)?;
        }
        self.results.push(signature.result.as_deref().cloned());
        let checked = self.check_block(body);
        self.results.pop();
        checked?;

        if signature.result.is_some() && !Self::is_terminating_block(body) {
            return Err(self.missing_return(name, body.span));
        }
        Ok(())
    }

    pub(crate) fn resolve_signature(&self, signature: &Signature) -> CheckResult<FuncType> {
        let mut params = Vec::with_capacity(signature.params.len());
        let mut variadic = false;
        let last = signature.params.len().saturating_sub(1);
        for (i, param) in signature.params.iter().enumerate() {
            let ty = self.resolve_type(&param.ty)?;
            if param.variadic {
                if i != last {
                    return Err(self.invalid(
                        "can only use ... with final parameter in list".to_string(),
                        param.name.span,
                    ));
                }
                variadic = true;
                params.push(Type::slice(ty));
            } else {
                params.push(ty);
            }
        }
        let result = match &signature.result {
            Some(result) => Some(Box::new(self.resolve_type(result)?)),
            None => None,
        };
        Ok(FuncType {
            params,
            variadic,
            result,
        })
    }

    pub(crate) fn const_entity(&mut self, decl: &ConstDecl) -> CheckResult<Entity> {
        let tv = self.value(&decl.value)?;
        let Some(value) = tv.value.clone().filter(|_| tv.is_constant()) else {
            return Err(self.invalid(
                format!("{} is not constant", ply_parser::print_expr(&decl.value)),
                decl.value.span,
            ));
        };
        match &decl.ty {
            Some(ty) => {
                let ty = self.resolve_type(ty)?;
                self.use_as(&decl.value, &tv, &ty, "constant declaration")?;
                let value = self
                    .basic_kind(&ty)
                    .and_then(|kind| value.convert(kind))
                    .ok_or_else(|| self.invalid(format!("invalid constant type {ty}"), decl.span))?;
                Ok(Entity::Const(ty, value))
            }
            None => Ok(Entity::Const(tv.ty, value)),
        }
    }

    pub(crate) fn var_type(&mut self, decl: &VarDecl) -> CheckResult<Type> {
        let declared = match &decl.ty {
            Some(ty) => Some(self.resolve_type(ty)?),
            None => None,
        };
        match (&decl.value, declared) {
            (Some(value), Some(ty)) => {
                let tv = self.value(value)?;
                self.use_as(value, &tv, &ty, "variable declaration")?;
                Ok(ty)
            }
            (Some(value), None) => {
                let tv = self.value(value)?;
                self.default_type(value, &tv)
            }
            (None, Some(ty)) => Ok(ty),
            (None, None) => Err(self.invalid(
                format!("missing type or initializer for {}", decl.name.name),
                decl.span,
            )),
        }
    }

    fn declare_package(&mut self, name: &str, entity: Entity, span: Span) -> CheckResult<()> {
        if name == "_" {
            return Ok(());
        }
        if self.package.contains_key(name) {
            return Err(self.redeclared(name, span));
        }
        self.package.insert(name.to_string(), entity);
        Ok(())
    }

    pub(crate) fn record(&mut self, expr: &ply_parser::Expr, tv: TypeAndValue) -> TypeAndValue {
        self.table.record(expr.id, tv.clone());
        tv
    }
}
