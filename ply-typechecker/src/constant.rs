//! Compile-time constant values and constant folding

use crate::types::BasicKind;
use ply_parser::{BinaryOp, UnaryOp};
use std::cmp::Ordering;
use std::fmt;

#[derive(Debug, Clone, PartialEq)]
pub enum ConstValue {
    Bool(bool),
    Int(i64),
    Float(f64),
    String(String),
}

impl ConstValue {
    /// Kind of the untyped constant this value would be if written as a literal
    pub fn untyped_kind(&self) -> BasicKind {
        match self {
            ConstValue::Bool(_) => BasicKind::UntypedBool,
            ConstValue::Int(_) => BasicKind::UntypedInt,
            ConstValue::Float(_) => BasicKind::UntypedFloat,
            ConstValue::String(_) => BasicKind::UntypedString,
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            ConstValue::Int(value) => Some(*value as f64),
            ConstValue::Float(value) => Some(*value),
            _ => None,
        }
    }

    /// Convert to the representation `kind` uses, if the value fits exactly.
    pub fn convert(&self, kind: BasicKind) -> Option<ConstValue> {
        match (self, kind.default_kind()) {
            (ConstValue::Bool(value), BasicKind::Bool) => Some(ConstValue::Bool(*value)),
            (ConstValue::String(value), BasicKind::String) => Some(ConstValue::String(value.clone())),
            (ConstValue::Int(value), BasicKind::Int) => Some(ConstValue::Int(*value)),
            (ConstValue::Int(value), BasicKind::Float64) => Some(ConstValue::Float(*value as f64)),
            (ConstValue::Float(value), BasicKind::Float64) => Some(ConstValue::Float(*value)),
            (ConstValue::Float(value), BasicKind::Int) => {
                let truncated = value.trunc();
                if truncated == *value && truncated.abs() < i64::MAX as f64 {
                    Some(ConstValue::Int(truncated as i64))
                } else {
                    None
                }
            }
            _ => None,
        }
    }

    pub fn unary(op: UnaryOp, operand: &ConstValue) -> Result<ConstValue, String> {
        match (op, operand) {
            (UnaryOp::Plus, ConstValue::Int(_) | ConstValue::Float(_)) => Ok(operand.clone()),
            (UnaryOp::Neg, ConstValue::Int(value)) => value
                .checked_neg()
                .map(ConstValue::Int)
                .ok_or_else(|| "constant overflow".to_string()),
            (UnaryOp::Neg, ConstValue::Float(value)) => Ok(ConstValue::Float(-value)),
            (UnaryOp::Not, ConstValue::Bool(value)) => Ok(ConstValue::Bool(!value)),
            _ => Err(format!("operator {op} not defined on constant {operand}")),
        }
    }

    /// Fold `left op right`. Mixed int/float operands are evaluated as floats.
    pub fn binary(op: BinaryOp, left: &ConstValue, right: &ConstValue) -> Result<ConstValue, String> {
        use ConstValue::*;

        if op.is_comparison() {
            let ordering = left
                .compare(right)
                .ok_or_else(|| format!("cannot compare {left} and {right}"))?;
            let result = match op {
                BinaryOp::Eq => ordering == Ordering::Equal,
                BinaryOp::Ne => ordering != Ordering::Equal,
                BinaryOp::Lt => ordering == Ordering::Less,
                BinaryOp::Le => ordering != Ordering::Greater,
                BinaryOp::Gt => ordering == Ordering::Greater,
                _ => ordering != Ordering::Less,
            };
            return Ok(Bool(result));
        }

        let overflow = || "constant overflow".to_string();
        match (left, right) {
            (Bool(a), Bool(b)) => match op {
                BinaryOp::And => Ok(Bool(*a && *b)),
                BinaryOp::Or => Ok(Bool(*a || *b)),
                _ => Err(format!("operator {op} not defined on untyped bool")),
            },
            (String(a), String(b)) if op == BinaryOp::Add => Ok(String(format!("{a}{b}"))),
            (Int(a), Int(b)) => match op {
                BinaryOp::Add => a.checked_add(*b).map(Int).ok_or_else(overflow),
                BinaryOp::Sub => a.checked_sub(*b).map(Int).ok_or_else(overflow),
                BinaryOp::Mul => a.checked_mul(*b).map(Int).ok_or_else(overflow),
                BinaryOp::Div | BinaryOp::Rem if *b == 0 => Err("division by zero".to_string()),
                BinaryOp::Div => a.checked_div(*b).map(Int).ok_or_else(overflow),
                BinaryOp::Rem => a.checked_rem(*b).map(Int).ok_or_else(overflow),
                _ => Err(format!("operator {op} not defined on untyped int")),
            },
            (Int(_) | Float(_), Int(_) | Float(_)) => {
                let (a, b) = (left.as_f64().unwrap_or_default(), right.as_f64().unwrap_or_default());
                match op {
                    BinaryOp::Add => Ok(Float(a + b)),
                    BinaryOp::Sub => Ok(Float(a - b)),
                    BinaryOp::Mul => Ok(Float(a * b)),
                    BinaryOp::Div if b == 0.0 => Err("division by zero".to_string()),
                    BinaryOp::Div => Ok(Float(a / b)),
                    _ => Err(format!("operator {op} not defined on untyped float")),
                }
            }
            _ => Err(format!("invalid operation: {left} {op} {right}")),
        }
    }

    pub fn compare(&self, other: &ConstValue) -> Option<Ordering> {
        match (self, other) {
            (ConstValue::Bool(a), ConstValue::Bool(b)) => Some(a.cmp(b)),
            (ConstValue::String(a), ConstValue::String(b)) => Some(a.cmp(b)),
            (ConstValue::Int(a), ConstValue::Int(b)) => Some(a.cmp(b)),
            _ => self.as_f64()?.partial_cmp(&other.as_f64()?),
        }
    }
}

impl fmt::Display for ConstValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConstValue::Bool(value) => write!(f, "{value}"),
            ConstValue::Int(value) => write!(f, "{value}"),
            ConstValue::Float(value) => {
                if value.fract() == 0.0 && value.is_finite() {
                    write!(f, "{value:.1}")
                } else {
                    write!(f, "{value}")
                }
            }
            ConstValue::String(value) => write!(f, "{value:?}"),
        }
    }
}
