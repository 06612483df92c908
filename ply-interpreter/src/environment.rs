//! Variable scopes for the Ply interpreter.
//!
//! Every variable lives in its own shared cell, so a closure that captures
//! a scope observes later assignments to the variables it references.

use crate::value::Value;
use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

pub type Cell<'a> = Rc<RefCell<Value<'a>>>;

/// One lexical scope, linked to its enclosing scope
#[derive(Default)]
pub struct Scope<'a> {
    variables: RefCell<HashMap<String, Cell<'a>>>,
    parent: Option<Rc<Scope<'a>>>,
}

impl<'a> Scope<'a> {
    /// The package scope
    pub fn root() -> Rc<Self> {
        Rc::new(Self::default())
    }

    pub fn child(parent: &Rc<Self>) -> Rc<Self> {
        Rc::new(Self {
            variables: RefCell::new(HashMap::new()),
            parent: Some(Rc::clone(parent)),
        })
    }

    pub fn parent(&self) -> Option<&Rc<Self>> {
        self.parent.as_ref()
    }

    /// Declare a variable in this scope, shadowing any outer one
    pub fn define(&self, name: &str, value: Value<'a>) {
        if name == "_" {
            return;
        }
        self.variables
            .borrow_mut()
            .insert(name.to_string(), Rc::new(RefCell::new(value)));
    }

    /// Find the cell for `name`, searching outwards
    pub fn lookup(&self, name: &str) -> Option<Cell<'a>> {
        if let Some(cell) = self.variables.borrow().get(name) {
            return Some(Rc::clone(cell));
        }
        self.parent.as_ref()?.lookup(name)
    }

    pub fn get(&self, name: &str) -> Option<Value<'a>> {
        self.lookup(name).map(|cell| cell.borrow().clone())
    }

    /// Assign to an existing variable; false when it is not declared
    pub fn set(&self, name: &str, value: Value<'a>) -> bool {
        match self.lookup(name) {
            Some(cell) => {
                *cell.borrow_mut() = value;
                true
            }
            None => false,
        }
    }

    /// Number of scopes from here to the package scope
    pub fn depth(&self) -> usize {
        self.parent.as_ref().map_or(0, |parent| parent.depth() + 1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_shadowing_and_assignment() {
        let root = Scope::root();
        root.define("x", Value::Int(1));
        let inner = Scope::child(&root);
        inner.define("x", Value::Int(2));

        assert_eq!(inner.get("x").and_then(|v| v.as_int()), Some(2));
        assert!(inner.set("x", Value::Int(3)));
        assert_eq!(root.get("x").and_then(|v| v.as_int()), Some(1));
        assert_eq!(inner.depth(), 1);
    }

    #[test]
    fn test_captured_cell_sees_updates() {
        let root = Scope::root();
        root.define("count", Value::Int(0));
        let captured = Scope::child(&root);

        assert!(root.set("count", Value::Int(5)));
        assert_eq!(captured.get("count").and_then(|v| v.as_int()), Some(5));
        assert!(!captured.set("missing", Value::Nil));
    }
}
