//! The type table: everything the checker learned about a compilation unit

use crate::constant::ConstValue;
use crate::types::{FuncType, Type};
use indexmap::IndexMap;
use ply_parser::{Expr, ExprId};
use std::collections::HashMap;

/// How an expression may be used
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    Value,
    Constant,
    /// The expression denotes a type (`[]int`, `Names`)
    TypeExpr,
    /// A predeclared function such as `len` or a dialect generic such as `max`
    Builtin,
    /// A call to a function without a result
    NoValue,
    /// An imported package name
    Package,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TypeAndValue {
    pub ty: Type,
    pub mode: Mode,
    pub value: Option<ConstValue>,
}

impl TypeAndValue {
    pub fn value(ty: Type) -> Self {
        Self {
            ty,
            mode: Mode::Value,
            value: None,
        }
    }

    pub fn constant(ty: Type, value: ConstValue) -> Self {
        Self {
            ty,
            mode: Mode::Constant,
            value: Some(value),
        }
    }

    pub fn of_mode(ty: Type, mode: Mode) -> Self {
        Self {
            ty,
            mode,
            value: None,
        }
    }

    pub fn is_constant(&self) -> bool {
        self.mode == Mode::Constant && self.value.is_some()
    }
}

/// What a selector expression `x.name` resolved to
#[derive(Debug, Clone, PartialEq)]
pub enum Selection {
    Field,
    /// A method declared on the named type
    Method { receiver: String },
    /// A member of an imported package
    PackageMember { package: String },
    /// A dialect collection method, specialized by the code generator
    GenericMethod,
}

/// A declared type with its underlying type and method set
#[derive(Debug, Clone, PartialEq)]
pub struct NamedType {
    pub name: String,
    pub underlying: Type,
    pub methods: IndexMap<String, FuncType>,
}

#[derive(Debug, Clone, Default)]
pub struct TypeTable {
    types: HashMap<ExprId, TypeAndValue>,
    selections: HashMap<ExprId, Selection>,
    named: IndexMap<String, NamedType>,
}

impl TypeTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, id: ExprId, tv: TypeAndValue) {
        self.types.insert(id, tv);
    }

    pub fn record_selection(&mut self, id: ExprId, selection: Selection) {
        self.selections.insert(id, selection);
    }

    pub fn declare_named(&mut self, named: NamedType) {
        self.named.insert(named.name.clone(), named);
    }

    pub(crate) fn named_mut(&mut self, name: &str) -> Option<&mut NamedType> {
        self.named.get_mut(name)
    }

    pub fn get(&self, id: ExprId) -> Option<&TypeAndValue> {
        self.types.get(&id)
    }

    pub fn type_and_value(&self, expr: &Expr) -> Option<&TypeAndValue> {
        self.get(expr.id)
    }

    pub fn type_of(&self, expr: &Expr) -> Option<&Type> {
        self.get(expr.id).map(|tv| &tv.ty)
    }

    /// Constant value of `expr`, if the checker folded it
    pub fn value_of(&self, expr: &Expr) -> Option<&ConstValue> {
        self.get(expr.id)
            .filter(|tv| tv.mode == Mode::Constant)
            .and_then(|tv| tv.value.as_ref())
    }

    pub fn mode_of(&self, expr: &Expr) -> Option<Mode> {
        self.get(expr.id).map(|tv| tv.mode)
    }

    pub fn selection(&self, expr: &Expr) -> Option<&Selection> {
        self.selections.get(&expr.id)
    }

    pub fn named(&self, name: &str) -> Option<&NamedType> {
        self.named.get(name)
    }

    pub fn named_types(&self) -> impl Iterator<Item = &NamedType> {
        self.named.values()
    }

    /// Underlying type, following named types to their definition
    pub fn underlying(&self, ty: &Type) -> Type {
        let mut current = ty.clone();
        // Named types are declared with a non-named underlying, but guard
        // against cycles in malformed input.
        for _ in 0..=self.named.len() {
            match &current {
                Type::Named(name) => match self.named.get(name) {
                    Some(named) => current = named.underlying.clone(),
                    None => return current,
                },
                _ => return current,
            }
        }
        current
    }

    /// Whether `ty` declares a method called `name`
    pub fn has_method(&self, ty: &Type, name: &str) -> bool {
        self.method(ty, name).is_some()
    }

    pub fn method(&self, ty: &Type, name: &str) -> Option<&FuncType> {
        match ty {
            Type::Named(type_name) => self.named.get(type_name)?.methods.get(name),
            _ => None,
        }
    }

    /// Number of expressions with a recorded type
    pub fn len(&self) -> usize {
        self.types.len()
    }

    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }
}
