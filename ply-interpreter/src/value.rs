//! Runtime values for the Ply interpreter.
//!
//! Slices and maps are reference values: copying a `Value` shares the
//! backing storage, the way Go copies a slice header or a map pointer.
//! Structs are plain values and are copied on assignment.

use crate::environment::Scope;
use indexmap::IndexMap;
use ply_parser::{FuncDecl, FuncLit};
use std::cell::RefCell;
use std::cmp::Ordering;
use std::fmt;
use std::rc::Rc;

#[derive(Debug, Clone)]
pub enum Value<'a> {
    /// Nil function or `any` value
    Nil,
    Bool(bool),
    Int(i64),
    Float(f64),
    String(String),
    Slice(SliceValue<'a>),
    Map(MapValue<'a>),
    Struct(IndexMap<String, Value<'a>>),
    Func(Function<'a>),
}

impl<'a> Value<'a> {
    pub fn string(value: impl Into<String>) -> Self {
        Value::String(value.into())
    }

    /// Value of the same shape with every part zeroed
    pub fn zero_like(&self) -> Self {
        match self {
            Value::Nil | Value::Func(_) => Value::Nil,
            Value::Bool(_) => Value::Bool(false),
            Value::Int(_) => Value::Int(0),
            Value::Float(_) => Value::Float(0.0),
            Value::String(_) => Value::String(String::new()),
            Value::Slice(_) => Value::Slice(SliceValue::nil()),
            Value::Map(_) => Value::Map(MapValue::nil()),
            Value::Struct(fields) => Value::Struct(
                fields
                    .iter()
                    .map(|(name, value)| (name.clone(), value.zero_like()))
                    .collect(),
            ),
        }
    }

    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Nil => "nil",
            Value::Bool(_) => "bool",
            Value::Int(_) => "int",
            Value::Float(_) => "float64",
            Value::String(_) => "string",
            Value::Slice(_) => "slice",
            Value::Map(_) => "map",
            Value::Struct(_) => "struct",
            Value::Func(_) => "func",
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(value) => Some(*value),
            _ => None,
        }
    }

    pub fn as_int(&self) -> Option<i64> {
        match self {
            Value::Int(value) => Some(*value),
            _ => None,
        }
    }

    /// Numeric value widened to float; constants may arrive in either form
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Int(value) => Some(*value as f64),
            Value::Float(value) => Some(*value),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(value) => Some(value),
            _ => None,
        }
    }

    pub fn as_slice(&self) -> Option<&SliceValue<'a>> {
        match self {
            Value::Slice(slice) => Some(slice),
            _ => None,
        }
    }

    /// Whether the value is the nil of its type
    pub fn is_nil(&self) -> bool {
        match self {
            Value::Nil => true,
            Value::Slice(slice) => slice.is_nil(),
            Value::Map(map) => map.is_nil(),
            _ => false,
        }
    }

    /// `==` for comparable values; slices, maps and funcs only compare to nil
    pub fn equals(&self, other: &Value<'a>) -> bool {
        match (self, other) {
            (Value::Nil, other) | (other, Value::Nil) => other.is_nil(),
            (Value::Bool(a), Value::Bool(b)) => a == b,
            (Value::String(a), Value::String(b)) => a == b,
            (Value::Int(a), Value::Int(b)) => a == b,
            (a, b) if a.as_f64().is_some() && b.as_f64().is_some() => a.as_f64() == b.as_f64(),
            (Value::Struct(a), Value::Struct(b)) => {
                a.len() == b.len()
                    && a.iter().zip(b.iter()).all(|((n1, v1), (n2, v2))| n1 == n2 && v1.equals(v2))
            }
            _ => false,
        }
    }

    /// Ordering for `<` and friends on numbers and strings
    pub fn compare(&self, other: &Value<'a>) -> Option<Ordering> {
        match (self, other) {
            (Value::Int(a), Value::Int(b)) => Some(a.cmp(b)),
            (Value::String(a), Value::String(b)) => Some(a.cmp(b)),
            (Value::Bool(a), Value::Bool(b)) => Some(a.cmp(b)),
            (a, b) => a.as_f64()?.partial_cmp(&b.as_f64()?),
        }
    }

    /// Hashable form of a map key, `None` for values that cannot be keys
    pub fn to_key(&self) -> Option<MapKey> {
        Some(match self {
            Value::Nil => MapKey::Nil,
            Value::Bool(value) => MapKey::Bool(*value),
            Value::Int(value) => MapKey::Int(*value),
            // -0.0 and 0.0 are the same key
            Value::Float(value) => MapKey::Float(if *value == 0.0 { 0 } else { value.to_bits() }),
            Value::String(value) => MapKey::String(value.clone()),
            Value::Struct(fields) => {
                MapKey::Struct(fields.values().map(Value::to_key).collect::<Option<Vec<_>>>()?)
            }
            Value::Slice(_) | Value::Map(_) | Value::Func(_) => return None,
        })
    }
}

/// A slice header over a shared backing array.
///
/// `array` holds at least `offset + cap` elements; writes through any
/// header that shares the array are visible through all of them.
#[derive(Clone, Default)]
pub struct SliceValue<'a> {
    array: Option<Rc<RefCell<Vec<Value<'a>>>>>,
    offset: usize,
    len: usize,
    cap: usize,
}

impl<'a> SliceValue<'a> {
    pub fn nil() -> Self {
        Self::default()
    }

    pub fn from_vec(values: Vec<Value<'a>>) -> Self {
        let len = values.len();
        Self {
            array: Some(Rc::new(RefCell::new(values))),
            offset: 0,
            len,
            cap: len,
        }
    }

    /// `make([]T, len, cap)` with every slot set to `zero`
    pub fn make(len: usize, cap: usize, zero: &Value<'a>) -> Self {
        let cap = cap.max(len);
        Self {
            array: Some(Rc::new(RefCell::new(vec![zero.clone(); cap]))),
            offset: 0,
            len,
            cap,
        }
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn cap(&self) -> usize {
        self.cap
    }

    pub fn is_nil(&self) -> bool {
        self.array.is_none()
    }

    pub fn get(&self, index: usize) -> Option<Value<'a>> {
        if index >= self.len {
            return None;
        }
        let array = self.array.as_ref()?;
        array.borrow().get(self.offset + index).cloned()
    }

    /// Store into the shared array; false when out of range
    pub fn set(&self, index: usize, value: Value<'a>) -> bool {
        match &self.array {
            Some(array) if index < self.len => {
                array.borrow_mut()[self.offset + index] = value;
                true
            }
            _ => false,
        }
    }

    pub fn swap(&self, i: usize, j: usize) {
        if let Some(array) = &self.array {
            if i < self.len && j < self.len {
                array.borrow_mut().swap(self.offset + i, self.offset + j);
            }
        }
    }

    /// `s[low:high]`; `high` may reach into the capacity
    pub fn reslice(&self, low: usize, high: usize) -> Option<Self> {
        if low > high || high > self.cap {
            return None;
        }
        Some(Self {
            array: self.array.clone(),
            offset: self.offset + low,
            len: high - low,
            cap: self.cap - low,
        })
    }

    pub fn to_vec(&self) -> Vec<Value<'a>> {
        match &self.array {
            Some(array) => array.borrow()[self.offset..self.offset + self.len].to_vec(),
            None => Vec::new(),
        }
    }

    /// Go's `append`: reuses spare capacity in place, otherwise copies into
    /// a new array with doubled capacity.
    pub fn append(&self, values: Vec<Value<'a>>) -> Self {
        if values.is_empty() {
            return self.clone();
        }
        let needed = self.len + values.len();
        if let Some(array) = &self.array {
            if needed <= self.cap {
                {
                    let mut array = array.borrow_mut();
                    for (i, value) in values.into_iter().enumerate() {
                        array[self.offset + self.len + i] = value;
                    }
                }
                return Self {
                    array: self.array.clone(),
                    offset: self.offset,
                    len: needed,
                    cap: self.cap,
                };
            }
        }

        let cap = needed.max(self.cap * 2);
        let padding = values[0].zero_like();
        let mut array = self.to_vec();
        array.extend(values);
        array.resize(cap, padding);
        Self {
            array: Some(Rc::new(RefCell::new(array))),
            offset: 0,
            len: needed,
            cap,
        }
    }
}

impl fmt::Debug for SliceValue<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_nil() {
            return write!(f, "nil");
        }
        f.debug_list().entries(self.to_vec()).finish()
    }
}

/// Hashable projection of a comparable value
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum MapKey {
    Nil,
    Bool(bool),
    Int(i64),
    Float(u64),
    String(String),
    Struct(Vec<MapKey>),
}

type Entries<'a> = IndexMap<MapKey, (Value<'a>, Value<'a>)>;

/// A map reference; entries iterate in insertion order.
#[derive(Clone, Default)]
pub struct MapValue<'a> {
    entries: Option<Rc<RefCell<Entries<'a>>>>,
}

impl<'a> MapValue<'a> {
    pub fn nil() -> Self {
        Self::default()
    }

    pub fn new() -> Self {
        Self {
            entries: Some(Rc::new(RefCell::new(IndexMap::new()))),
        }
    }

    pub fn is_nil(&self) -> bool {
        self.entries.is_none()
    }

    pub fn len(&self) -> usize {
        self.entries.as_ref().map_or(0, |entries| entries.borrow().len())
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn get(&self, key: &MapKey) -> Option<Value<'a>> {
        let entries = self.entries.as_ref()?;
        entries.borrow().get(key).map(|(_, value)| value.clone())
    }

    /// Insert or overwrite; false when the map is nil
    pub fn insert(&self, key: MapKey, key_value: Value<'a>, value: Value<'a>) -> bool {
        match &self.entries {
            Some(entries) => {
                entries.borrow_mut().insert(key, (key_value, value));
                true
            }
            None => false,
        }
    }

    /// Snapshot of the entries, for ranging while the body mutates the map
    pub fn entries(&self) -> Vec<(Value<'a>, Value<'a>)> {
        match &self.entries {
            Some(entries) => entries.borrow().values().cloned().collect(),
            None => Vec::new(),
        }
    }
}

impl fmt::Debug for MapValue<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_nil() {
            return write!(f, "nil");
        }
        f.debug_map().entries(self.entries()).finish()
    }
}

/// Callable values
#[derive(Clone)]
pub enum Function<'a> {
    /// Top-level function declaration
    Decl(&'a FuncDecl),
    /// Method value with its receiver bound
    Method {
        decl: &'a FuncDecl,
        receiver: Box<Value<'a>>,
    },
    /// Function literal with the scope it closes over
    Closure { lit: &'a FuncLit, env: Rc<Scope<'a>> },
    /// Standard package function such as `strings.ToUpper`
    Native { package: &'a str, name: &'a str },
}

impl fmt::Debug for Function<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Function::Decl(decl) => write!(f, "func {}", decl.name.name),
            Function::Method { decl, .. } => write!(f, "method {}", decl.name.name),
            Function::Closure { .. } => write!(f, "func literal"),
            Function::Native { package, name } => write!(f, "func {package}.{name}"),
        }
    }
}

/// Go's `%v` rendering, as used by `fmt.Println` and `fmt.Sprint`
impl fmt::Display for Value<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Nil => write!(f, "<nil>"),
            Value::Bool(value) => write!(f, "{value}"),
            Value::Int(value) => write!(f, "{value}"),
            Value::Float(value) => write!(f, "{}", format_float(*value)),
            Value::String(value) => write!(f, "{value}"),
            Value::Slice(slice) => {
                write!(f, "[")?;
                for (i, value) in slice.to_vec().iter().enumerate() {
                    if i > 0 {
                        write!(f, " ")?;
                    }
                    write!(f, "{value}")?;
                }
                write!(f, "]")
            }
            Value::Map(map) => {
                // fmt sorts map keys
                let mut entries = map.entries();
                entries.sort_by(|(a, _), (b, _)| a.compare(b).unwrap_or(Ordering::Equal));
                write!(f, "map[")?;
                for (i, (key, value)) in entries.iter().enumerate() {
                    if i > 0 {
                        write!(f, " ")?;
                    }
                    write!(f, "{key}:{value}")?;
                }
                write!(f, "]")
            }
            Value::Struct(fields) => {
                write!(f, "{{")?;
                for (i, value) in fields.values().enumerate() {
                    if i > 0 {
                        write!(f, " ")?;
                    }
                    write!(f, "{value}")?;
                }
                write!(f, "}}")
            }
            Value::Func(_) => write!(f, "0x1"),
        }
    }
}

/// Shortest representation that round-trips, switching to exponent form
/// outside `[1e-4, 1e6)` like Go's `%v`.
pub fn format_float(value: f64) -> String {
    if value.is_nan() {
        return "NaN".to_string();
    }
    if value.is_infinite() {
        return if value > 0.0 { "+Inf" } else { "-Inf" }.to_string();
    }
    let abs = value.abs();
    if abs != 0.0 && !(1e-4..1e6).contains(&abs) {
        let formatted = format!("{value:e}");
        let Some((mantissa, exponent)) = formatted.split_once('e') else {
            return formatted;
        };
        let (sign, digits) = match exponent.strip_prefix('-') {
            Some(digits) => ('-', digits),
            None => ('+', exponent),
        };
        return format!("{mantissa}e{sign}{digits:0>2}");
    }
    format!("{value}")
}
