//! The environment chain.

use std::cell::RefCell;
use std::collections::HashMap;
use std::fmt;
use std::rc::Rc;

use crate::keywords::is_reserved;
use crate::value::Value;

/// Attempt to bind a special-form keyword. This is a configuration error,
/// not a recoverable one.
#[derive(Debug, Clone)]
pub struct ReservedName(pub Rc<str>);

impl fmt::Display for ReservedName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "`{}` is a reserved word and cannot be bound", self.0)
    }
}

impl std::error::Error for ReservedName {}

/// One scope frame: a mutable name→value map plus an optional outer frame.
struct Frame {
    bindings: RefCell<HashMap<Rc<str>, Value>>,
    outer: Option<Env>,
}

/// A handle to a frame in the environment chain.
///
/// Handles are cheap to clone and share the underlying frame, which is how
/// several closures can capture (and later observe mutations to) the same
/// scope. `clone_deep` is the escape hatch that severs that sharing for a
/// fresh session.
#[derive(Clone)]
pub struct Env {
    frame: Rc<Frame>,
}

impl Env {
    /// A new root frame with no bindings.
    pub fn new() -> Self {
        Env {
            frame: Rc::new(Frame {
                bindings: RefCell::new(HashMap::new()),
                outer: None,
            }),
        }
    }

    /// A fresh empty frame chained onto `self`.
    pub fn child(&self) -> Self {
        Env {
            frame: Rc::new(Frame {
                bindings: RefCell::new(HashMap::new()),
                outer: Some(self.clone()),
            }),
        }
    }

    /// The nearest frame (walking outward) that binds `name`.
    pub fn find(&self, name: &str) -> Option<Env> {
        if self.frame.bindings.borrow().contains_key(name) {
            return Some(self.clone());
        }
        self.frame.outer.as_ref().and_then(|outer| outer.find(name))
    }

    /// Read `name` from this frame only.
    pub fn get(&self, name: &str) -> Option<Value> {
        self.frame.bindings.borrow().get(name).cloned()
    }

    /// Read `name` from the nearest frame that binds it.
    pub fn lookup(&self, name: &str) -> Option<Value> {
        self.find(name).and_then(|frame| frame.get(name))
    }

    /// Bind `name` in this frame, shadowing any outer binding.
    ///
    /// Redefinition protection is the evaluator's job; the chain itself
    /// only refuses the reserved special-form keywords.
    pub fn set(&self, name: impl Into<Rc<str>>, value: Value) -> Result<(), ReservedName> {
        let name = name.into();
        if is_reserved(&name) {
            return Err(ReservedName(name));
        }
        self.frame.bindings.borrow_mut().insert(name, value);
        Ok(())
    }

    /// Copy the whole chain: every frame's map is copied (values shallowly),
    /// the chain shape is preserved, and the result shares no frame with
    /// the original.
    pub fn clone_deep(&self) -> Env {
        Env {
            frame: Rc::new(Frame {
                bindings: RefCell::new(self.frame.bindings.borrow().clone()),
                outer: self.frame.outer.as_ref().map(Env::clone_deep),
            }),
        }
    }

    /// The names bound in this frame, sorted. Used by the REPL's `:env`.
    pub fn local_names(&self) -> Vec<Rc<str>> {
        let mut names: Vec<Rc<str>> = self.frame.bindings.borrow().keys().cloned().collect();
        names.sort();
        names
    }
}

impl Default for Env {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lookup_walks_outward() {
        let root = Env::new();
        root.set("x", Value::Number(1.0)).unwrap();
        let inner = root.child().child();
        assert_eq!(inner.lookup("x"), Some(Value::Number(1.0)));
        assert_eq!(inner.get("x"), None);
    }

    #[test]
    fn set_shadows_without_touching_outer() {
        let root = Env::new();
        root.set("x", Value::Number(1.0)).unwrap();
        let inner = root.child();
        inner.set("x", Value::Number(2.0)).unwrap();
        assert_eq!(inner.lookup("x"), Some(Value::Number(2.0)));
        assert_eq!(root.get("x"), Some(Value::Number(1.0)));
    }

    #[test]
    fn reserved_names_are_rejected() {
        let env = Env::new();
        assert!(env.set("lambda", Value::Number(1.0)).is_err());
        assert!(env.set("run*", Value::Number(1.0)).is_err());
    }

    #[test]
    fn clone_deep_is_independent_at_depth() {
        let root = Env::new();
        root.set("x", Value::Number(1.0)).unwrap();
        let mid = root.child();
        mid.set("y", Value::Number(2.0)).unwrap();
        let leaf = mid.child();

        let copy = leaf.clone_deep();
        copy.set("y", Value::Number(99.0)).unwrap();
        copy.find("x").unwrap().set("x", Value::Number(98.0)).unwrap();

        // Originals are untouched at every depth.
        assert_eq!(mid.get("y"), Some(Value::Number(2.0)));
        assert_eq!(root.get("x"), Some(Value::Number(1.0)));
        // The copy sees its own mutations.
        assert_eq!(copy.lookup("x"), Some(Value::Number(98.0)));
    }

    #[test]
    fn shared_frames_observe_mutation() {
        let root = Env::new();
        let alias = root.clone();
        root.set("n", Value::Number(5.0)).unwrap();
        assert_eq!(alias.get("n"), Some(Value::Number(5.0)));
    }
}
