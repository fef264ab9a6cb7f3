//! Runtime values.

use std::fmt;
use std::rc::Rc;

use crate::env::Env;
use crate::print::{print, ListStyle};

/// A runtime value (and, equally, one node of a parsed datum tree).
#[derive(Clone)]
pub enum Value {
    /// IEEE double
    Number(f64),
    /// Boolean
    Bool(bool),
    /// Interned-by-content name; compares textually
    Symbol(Rc<str>),
    /// String literal; never equal to the same-spelled symbol
    Text(Rc<str>),
    /// Immutable sequence; a `.` symbol before the last element marks an
    /// improper (dotted) tail
    List(Rc<Vec<Value>>),
    /// Tagged vector; compares by identity, which is what makes a
    /// one-element vector usable as a logic-variable token
    Vector(Rc<Vec<Value>>),
    /// A struct instance produced by a generated constructor
    Record(Rc<Record>),
    /// Native procedure
    Native(Rc<NativeFn>),
    /// User procedure capturing its defining environment
    Closure(Rc<Closure>),
    /// Result of side-effecting forms; prints as nothing
    Void,
}

/// A struct instance: type name plus declared fields in order.
pub struct Record {
    pub type_name: Rc<str>,
    pub fields: Vec<(Rc<str>, Value)>,
}

impl Record {
    /// Look up a field by name.
    pub fn field(&self, name: &str) -> Option<&Value> {
        self.fields
            .iter()
            .find(|(field, _)| field.as_ref() == name)
            .map(|(_, value)| value)
    }
}

/// A native procedure: a name for error messages plus the function itself.
///
/// The function is boxed rather than a plain `fn` pointer because struct
/// constructors and accessors capture their struct's metadata.
pub struct NativeFn {
    pub name: Rc<str>,
    pub func: Box<dyn Fn(&[Value]) -> Result<Value, String>>,
}

impl NativeFn {
    pub fn new(
        name: impl Into<Rc<str>>,
        func: impl Fn(&[Value]) -> Result<Value, String> + 'static,
    ) -> Value {
        Value::Native(Rc::new(NativeFn {
            name: name.into(),
            func: Box::new(func),
        }))
    }
}

/// A user procedure: parameter names, body datum, defining environment.
pub struct Closure {
    pub params: Vec<Rc<str>>,
    pub body: Value,
    pub env: Env,
}

impl Value {
    /// The empty list.
    pub fn nil() -> Value {
        Value::List(Rc::new(Vec::new()))
    }

    pub fn symbol(name: &str) -> Value {
        Value::Symbol(Rc::from(name))
    }

    pub fn text(text: &str) -> Value {
        Value::Text(Rc::from(text))
    }

    pub fn list(items: Vec<Value>) -> Value {
        Value::List(Rc::new(items))
    }

    /// Everything but `#f` counts as true in a test position.
    pub fn is_truthy(&self) -> bool {
        !matches!(self, Value::Bool(false))
    }

    /// Is this the reserved improper-tail marker `.`?
    pub fn is_dot(&self) -> bool {
        matches!(self, Value::Symbol(s) if s.as_ref() == ".")
    }

    /// Is this a symbol spelled exactly `name`?
    pub fn is_symbol(&self, name: &str) -> bool {
        matches!(self, Value::Symbol(s) if s.as_ref() == name)
    }

    /// The symbol's text, if this is a symbol.
    pub fn as_symbol(&self) -> Option<&Rc<str>> {
        match self {
            Value::Symbol(s) => Some(s),
            _ => None,
        }
    }

    /// The sequence's elements, if this is a sequence.
    pub fn as_list(&self) -> Option<&[Value]> {
        match self {
            Value::List(items) => Some(items),
            _ => None,
        }
    }

    /// Structural equality: `equal?`.
    ///
    /// Deep for sequences, field-by-field for records of the same type
    /// name, content for text and symbols, value for numbers and booleans,
    /// identity for vectors and procedures.
    pub fn equal(&self, other: &Value) -> bool {
        match (self, other) {
            (Value::Number(a), Value::Number(b)) => a == b,
            (Value::Bool(a), Value::Bool(b)) => a == b,
            (Value::Symbol(a), Value::Symbol(b)) => a == b,
            (Value::Text(a), Value::Text(b)) => a == b,
            (Value::List(a), Value::List(b)) => {
                a.len() == b.len() && a.iter().zip(b.iter()).all(|(x, y)| x.equal(y))
            }
            (Value::Vector(a), Value::Vector(b)) => Rc::ptr_eq(a, b),
            (Value::Record(a), Value::Record(b)) => {
                a.type_name == b.type_name
                    && a.fields.len() == b.fields.len()
                    && a.fields
                        .iter()
                        .zip(b.fields.iter())
                        .all(|((_, x), (_, y))| x.equal(y))
            }
            (Value::Native(a), Value::Native(b)) => Rc::ptr_eq(a, b),
            (Value::Closure(a), Value::Closure(b)) => Rc::ptr_eq(a, b),
            (Value::Void, Value::Void) => true,
            _ => false,
        }
    }

    /// Identity-leaning equality: `eqv?`.
    ///
    /// Like `equal?` for atoms (numbers, booleans, symbols, text), but
    /// non-empty sequences and records compare by identity. The empty
    /// list is one value no matter how it was produced. The logic
    /// engine's `walk` depends on vectors comparing by identity and its
    /// `unify` on empty lists comparing equal.
    pub fn eqv(&self, other: &Value) -> bool {
        match (self, other) {
            (Value::List(a), Value::List(b)) => {
                (a.is_empty() && b.is_empty()) || Rc::ptr_eq(a, b)
            }
            (Value::Record(a), Value::Record(b)) => Rc::ptr_eq(a, b),
            _ => self.equal(other),
        }
    }
}

/// Prepend `first` onto `rest`, producing a dotted pair when `rest` is not
/// a sequence.
pub fn cons(first: Value, rest: Value) -> Value {
    match rest {
        Value::List(items) => {
            let mut out = Vec::with_capacity(items.len() + 1);
            out.push(first);
            out.extend(items.iter().cloned());
            Value::List(Rc::new(out))
        }
        other => Value::List(Rc::new(vec![first, Value::symbol("."), other])),
    }
}

/// The head of a non-empty sequence.
pub fn car(value: &Value) -> Option<Value> {
    match value {
        Value::List(items) => items.first().cloned(),
        _ => None,
    }
}

/// Everything after the head; collapses a dotted tail to its value.
pub fn cdr(value: &Value) -> Option<Value> {
    match value {
        Value::List(items) if !items.is_empty() => {
            let rest = &items[1..];
            if rest.len() == 2 && rest[0].is_dot() {
                Some(rest[1].clone())
            } else {
                Some(Value::List(Rc::new(rest.to_vec())))
            }
        }
        _ => None,
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", print(self, ListStyle::Parens))
    }
}

impl fmt::Debug for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            // Void prints as nothing for users; make it visible in debug output.
            Value::Void => write!(f, "#<void>"),
            other => write!(f, "{other}"),
        }
    }
}

impl PartialEq for Value {
    /// Structural `equal?`, so tests can use `assert_eq!` on values.
    fn eq(&self, other: &Self) -> bool {
        self.equal(other)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn equal_is_reflexive() {
        let values = [
            Value::Number(3.5),
            Value::Bool(true),
            Value::symbol("kiwi"),
            Value::text("kiwi"),
            Value::list(vec![Value::Number(1.0), Value::list(vec![])]),
            Value::Vector(Rc::new(vec![Value::symbol("q")])),
            Value::Void,
        ];
        for v in &values {
            assert!(v.equal(v));
        }
    }

    #[test]
    fn symbol_never_equals_text() {
        assert!(!Value::symbol("foo").equal(&Value::text("foo")));
    }

    #[test]
    fn vectors_compare_by_identity() {
        let a = Value::Vector(Rc::new(vec![Value::symbol("q")]));
        let b = Value::Vector(Rc::new(vec![Value::symbol("q")]));
        assert!(!a.equal(&b));
        assert!(a.equal(&a.clone()));
    }

    #[test]
    fn cons_onto_list_prepends() {
        let pair = cons(Value::Number(1.0), Value::list(vec![Value::Number(2.0)]));
        assert_eq!(car(&pair), Some(Value::Number(1.0)));
        assert_eq!(cdr(&pair), Some(Value::list(vec![Value::Number(2.0)])));
    }

    #[test]
    fn cons_onto_atom_makes_dotted_pair() {
        let pair = cons(Value::Number(1.0), Value::Number(2.0));
        assert_eq!(car(&pair), Some(Value::Number(1.0)));
        assert_eq!(cdr(&pair), Some(Value::Number(2.0)));
        assert_eq!(print(&pair, ListStyle::Parens), "(1 . 2)");
    }

    #[test]
    fn cdr_walks_improper_tails() {
        // (1 2 . 3)
        let improper = cons(Value::Number(1.0), cons(Value::Number(2.0), Value::Number(3.0)));
        let rest = cdr(&improper).unwrap();
        assert_eq!(cdr(&rest), Some(Value::Number(3.0)));
    }
}
