//! User-defined record types.
//!
//! `(define-struct point (x y))` installs `make-point`, `point?`,
//! `point=?`, `point-x`, and `point-y` into the current frame. Unlike
//! `define`, re-running a `define-struct` silently rebinds the whole
//! family.

use std::rc::Rc;

use rackling_datum::{Env, NativeFn, Record, Value};

use crate::EvalError;

/// Evaluate a `(define-struct name (field ...))` form.
pub fn define_struct_form(items: &[Value], env: &Env) -> Result<Value, EvalError> {
    let [_, name_datum, fields_datum] = items else {
        return Err(EvalError::malformed(
            "define-struct",
            "expected a name and a field list",
        ));
    };
    let Some(type_name) = name_datum.as_symbol() else {
        return Err(EvalError::malformed(
            "define-struct",
            "struct name should be a symbol",
        ));
    };
    let Some(field_datums) = fields_datum.as_list() else {
        return Err(EvalError::malformed(
            "define-struct",
            "fields should be a list of symbols",
        ));
    };
    let fields: Vec<Rc<str>> = field_datums
        .iter()
        .map(|datum| {
            datum.as_symbol().cloned().ok_or_else(|| {
                EvalError::malformed("define-struct", "fields should be a list of symbols")
            })
        })
        .collect::<Result<_, _>>()?;

    env.set(
        format!("make-{type_name}"),
        constructor(type_name.clone(), fields.clone()),
    )?;
    env.set(format!("{type_name}?"), predicate(type_name.clone()))?;
    env.set(format!("{type_name}=?"), equality(type_name.clone()))?;
    for field in &fields {
        env.set(
            format!("{type_name}-{field}"),
            accessor(type_name.clone(), field.clone()),
        )?;
    }

    Ok(Value::Void)
}

/// `make-<name>`: packs positional arguments into the declared fields.
/// Arity is not validated: missing arguments leave Void in the remaining
/// fields, extras are dropped.
fn constructor(type_name: Rc<str>, fields: Vec<Rc<str>>) -> Value {
    let name = format!("make-{type_name}");
    NativeFn::new(name, move |args: &[Value]| {
        let fields = fields
            .iter()
            .enumerate()
            .map(|(i, field)| (field.clone(), args.get(i).cloned().unwrap_or(Value::Void)))
            .collect();
        Ok(Value::Record(Rc::new(Record {
            type_name: type_name.clone(),
            fields,
        })))
    })
}

/// `<name>?`: a record of exactly this declared type.
fn predicate(type_name: Rc<str>) -> Value {
    let name = format!("{type_name}?");
    NativeFn::new(name, move |args: &[Value]| match args {
        [value] => Ok(Value::Bool(
            matches!(value, Value::Record(record) if record.type_name == type_name),
        )),
        _ => Err(format!("{type_name}? expects one argument")),
    })
}

/// `<name>=?`: structural field-by-field equality; `#f` on any type-name
/// mismatch (including non-records) rather than an error.
fn equality(type_name: Rc<str>) -> Value {
    let name = format!("{type_name}=?");
    NativeFn::new(name, move |args: &[Value]| match args {
        [a, b] => {
            let same_type = |value: &Value| {
                matches!(value, Value::Record(record) if record.type_name == type_name)
            };
            Ok(Value::Bool(same_type(a) && same_type(b) && a.equal(b)))
        }
        _ => Err(format!("{type_name}=? expects two arguments")),
    })
}

/// `<name>-<field>`: field projection, fatal on a wrong-typed argument.
fn accessor(type_name: Rc<str>, field: Rc<str>) -> Value {
    let name: Rc<str> = Rc::from(format!("{type_name}-{field}"));
    let who = name.clone();
    NativeFn::new(name, move |args: &[Value]| match args {
        [Value::Record(record)] if record.type_name == type_name => record
            .field(&field)
            .cloned()
            .ok_or_else(|| format!("{who}: no `{field}` field present")),
        [other] => Err(format!("{who} expects a {type_name}, got {other}")),
        _ => Err(format!("{who} expects one argument")),
    })
}
