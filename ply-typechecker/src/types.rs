//! Static types of the Ply host language
//!
//! Types are structural except for [`Type::Named`], which refers to a declared
//! type by name. The underlying type of a named type lives in the
//! [`TypeTable`](crate::TypeTable).

use std::fmt;

/// Predeclared basic types, including the kinds of untyped constants
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BasicKind {
    Bool,
    Int,
    Float64,
    String,
    UntypedBool,
    UntypedInt,
    UntypedFloat,
    UntypedString,
    UntypedNil,
}

impl BasicKind {
    pub fn is_untyped(self) -> bool {
        matches!(
            self,
            BasicKind::UntypedBool
                | BasicKind::UntypedInt
                | BasicKind::UntypedFloat
                | BasicKind::UntypedString
                | BasicKind::UntypedNil
        )
    }

    /// Typed kind an untyped constant takes when nothing else constrains it
    pub fn default_kind(self) -> BasicKind {
        match self {
            BasicKind::UntypedBool => BasicKind::Bool,
            BasicKind::UntypedInt => BasicKind::Int,
            BasicKind::UntypedFloat => BasicKind::Float64,
            BasicKind::UntypedString => BasicKind::String,
            other => other,
        }
    }

    pub fn is_numeric(self) -> bool {
        matches!(
            self,
            BasicKind::Int | BasicKind::Float64 | BasicKind::UntypedInt | BasicKind::UntypedFloat
        )
    }

    pub fn is_integer(self) -> bool {
        matches!(self, BasicKind::Int | BasicKind::UntypedInt)
    }

    pub fn is_string(self) -> bool {
        matches!(self, BasicKind::String | BasicKind::UntypedString)
    }

    pub fn is_boolean(self) -> bool {
        matches!(self, BasicKind::Bool | BasicKind::UntypedBool)
    }

    pub fn is_ordered(self) -> bool {
        self.is_numeric() || self.is_string()
    }

    pub fn name(self) -> &'static str {
        match self {
            BasicKind::Bool => "bool",
            BasicKind::Int => "int",
            BasicKind::Float64 => "float64",
            BasicKind::String => "string",
            BasicKind::UntypedBool => "untyped bool",
            BasicKind::UntypedInt => "untyped int",
            BasicKind::UntypedFloat => "untyped float",
            BasicKind::UntypedString => "untyped string",
            BasicKind::UntypedNil => "untyped nil",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Type {
    Basic(BasicKind),
    Slice(Box<Type>),
    Map(Box<Type>, Box<Type>),
    Func(FuncType),
    Struct(Vec<Field>),
    /// A declared type, identified by its name within the package
    Named(String),
    /// The empty interface (`any`, `interface{}`)
    Any,
    /// Result of a call to a function without a result
    Void,
}

#[derive(Debug, Clone, PartialEq)]
pub struct FuncType {
    pub params: Vec<Type>,
    /// The last parameter is `...T`, stored as `[]T`
    pub variadic: bool,
    pub result: Option<Box<Type>>,
}

impl FuncType {
    pub fn new(params: Vec<Type>, result: Option<Type>) -> Self {
        Self {
            params,
            variadic: false,
            result: result.map(Box::new),
        }
    }

    pub fn variadic(mut self) -> Self {
        self.variadic = true;
        self
    }

    pub fn result_type(&self) -> Type {
        match &self.result {
            Some(result) => (**result).clone(),
            None => Type::Void,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Field {
    pub name: String,
    pub ty: Type,
}

impl Type {
    pub fn int() -> Self {
        Type::Basic(BasicKind::Int)
    }

    pub fn float64() -> Self {
        Type::Basic(BasicKind::Float64)
    }

    pub fn string() -> Self {
        Type::Basic(BasicKind::String)
    }

    pub fn bool() -> Self {
        Type::Basic(BasicKind::Bool)
    }

    pub fn slice(elem: Type) -> Self {
        Type::Slice(Box::new(elem))
    }

    pub fn map(key: Type, value: Type) -> Self {
        Type::Map(Box::new(key), Box::new(value))
    }

    pub fn func(params: Vec<Type>, result: Option<Type>) -> Self {
        Type::Func(FuncType::new(params, result))
    }

    pub fn named(name: impl Into<String>) -> Self {
        Type::Named(name.into())
    }

    pub fn basic_kind(&self) -> Option<BasicKind> {
        match self {
            Type::Basic(kind) => Some(*kind),
            _ => None,
        }
    }

    pub fn is_untyped(&self) -> bool {
        self.basic_kind().is_some_and(BasicKind::is_untyped)
    }

    /// Untyped constants take their default type; everything else is unchanged.
    pub fn defaulted(&self) -> Type {
        match self {
            Type::Basic(kind) if kind.is_untyped() => Type::Basic(kind.default_kind()),
            other => other.clone(),
        }
    }

    pub fn is_named(&self) -> bool {
        matches!(self, Type::Named(_))
    }

    /// Declared and predeclared types; assignability between two of them
    /// requires identical types.
    pub fn is_defined(&self) -> bool {
        match self {
            Type::Named(_) => true,
            Type::Basic(kind) => !kind.is_untyped(),
            _ => false,
        }
    }

    pub fn as_func(&self) -> Option<&FuncType> {
        match self {
            Type::Func(func) => Some(func),
            _ => None,
        }
    }
}

impl fmt::Display for Type {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Type::Basic(kind) => write!(f, "{}", kind.name()),
            Type::Slice(elem) => write!(f, "[]{elem}"),
            Type::Map(key, value) => write!(f, "map[{key}]{value}"),
            Type::Func(func) => write!(f, "{func}"),
            Type::Struct(fields) => {
                if fields.is_empty() {
                    return write!(f, "struct{{}}");
                }
                write!(f, "struct {{ ")?;
                for (i, field) in fields.iter().enumerate() {
                    if i > 0 {
                        write!(f, "; ")?;
                    }
                    write!(f, "{} {}", field.name, field.ty)?;
                }
                write!(f, " }}")
            }
            Type::Named(name) => write!(f, "{name}"),
            Type::Any => write!(f, "any"),
            Type::Void => write!(f, "()"),
        }
    }
}

impl fmt::Display for FuncType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "func(")?;
        let last = self.params.len().saturating_sub(1);
        for (i, param) in self.params.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            match param {
                Type::Slice(elem) if self.variadic && i == last => write!(f, "...{elem}")?,
                _ => write!(f, "{param}")?,
            }
        }
        write!(f, ")")?;
        if let Some(result) = &self.result {
            write!(f, " {result}")?;
        }
        Ok(())
    }
}
