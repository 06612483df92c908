// Standard packages: fmt, sort, strings

use crate::error::{RuntimeError, RuntimeResult};
use crate::interpreter::Interpreter;
use crate::value::{Function, SliceValue, Value};
use ply_parser::Span;
use std::cmp::Ordering;

impl<'a> Interpreter<'a> {
    pub(crate) fn call_native(&mut self, package: &str, name: &str, args: Vec<Value<'a>>, span: Span) -> RuntimeResult<Value<'a>> {
        tracing::trace!(package, name, args = args.len(), "native call");
        match (package, name) {
            ("fmt", "Println") => {
                let operands = variadic(&args);
                let line = operands
                    .iter()
                    .map(ToString::to_string)
                    .collect::<Vec<_>>()
                    .join(" ");
                writeln!(self.out, "{line}")?;
                Ok(Value::Nil)
            }
            ("fmt", "Sprint") => Ok(Value::String(sprint(&variadic(&args)))),
            ("sort", "Slice") => {
                let (Some(Value::Slice(slice)), Some(Value::Func(less))) = (args.first(), args.get(1)) else {
                    return Err(RuntimeError::type_error("slice and less function", "other values", span));
                };
                self.sort_slice(slice, less, span)?;
                Ok(Value::Nil)
            }
            ("sort", "Ints" | "Strings" | "Float64s") => {
                let Some(Value::Slice(slice)) = args.first() else {
                    return Err(RuntimeError::type_error("slice", "other value", span));
                };
                let mut values = slice.to_vec();
                values.sort_by(|a, b| a.compare(b).unwrap_or(Ordering::Equal));
                for (i, value) in values.into_iter().enumerate() {
                    slice.set(i, value);
                }
                Ok(Value::Nil)
            }
            ("strings", "ToUpper") => Ok(Value::String(string_arg(&args, 0, span)?.to_uppercase())),
            ("strings", "Repeat") => {
                let text = string_arg(&args, 0, span)?;
                let count = args.get(1).and_then(Value::as_int).unwrap_or(0);
                if count < 0 {
                    return Err(RuntimeError::panic("strings: negative Repeat count", span));
                }
                Ok(Value::String(text.repeat(count as usize)))
            }
            ("strings", "Contains") => {
                let text = string_arg(&args, 0, span)?;
                let needle = string_arg(&args, 1, span)?;
                Ok(Value::Bool(text.contains(needle)))
            }
            _ => Err(RuntimeError::undefined(format!("{package}.{name}"), span)),
        }
    }

    /// Insertion sort driven by the program's `less(i, j)`, swapping in
    /// place so `less` always sees the current order.
    fn sort_slice(&mut self, slice: &SliceValue<'a>, less: &Function<'a>, span: Span) -> RuntimeResult<()> {
        for i in 1..slice.len() {
            let mut j = i;
            while j > 0 {
                let ordered = self.call_function(less, vec![Value::Int(j as i64), Value::Int(j as i64 - 1)], span)?;
                if ordered.as_bool() != Some(true) {
                    break;
                }
                slice.swap(j, j - 1);
                j -= 1;
            }
        }
        Ok(())
    }
}

fn variadic<'a>(args: &[Value<'a>]) -> Vec<Value<'a>> {
    match args.first() {
        Some(Value::Slice(slice)) => slice.to_vec(),
        _ => Vec::new(),
    }
}

fn string_arg<'v>(args: &'v [Value<'_>], index: usize, span: Span) -> RuntimeResult<&'v str> {
    match args.get(index) {
        Some(Value::String(text)) => Ok(text),
        Some(other) => Err(RuntimeError::type_error("string", other.type_name(), span)),
        None => Err(RuntimeError::type_error("string", "nothing", span)),
    }
}

/// `fmt.Sprint` puts spaces between operands when neither side is a string
fn sprint(operands: &[Value<'_>]) -> String {
    let mut out = String::new();
    for (i, operand) in operands.iter().enumerate() {
        let is_string = matches!(operand, Value::String(_));
        if i > 0 && !is_string && !matches!(operands[i - 1], Value::String(_)) {
            out.push(' ');
        }
        out.push_str(&operand.to_string());
    }
    out
}
