//! Rendering values back to display text.

use crate::value::Value;

/// How sequences are rendered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ListStyle {
    /// `(1 2 3)` — parenthesized, space-joined.
    #[default]
    Parens,
    /// `(cons 1 (cons 2 (cons 3 empty)))` — explicit constructor chain.
    ConsChain,
}

/// Render a value to its canonical display text.
///
/// Void renders as the empty string, which is what lets the REPL stay
/// silent after a `define` and what makes two Voids compare equal under
/// `check-equal?`'s printed-text comparison.
pub fn print(value: &Value, style: ListStyle) -> String {
    let mut out = String::new();
    write_value(&mut out, value, style);
    out
}

fn write_value(out: &mut String, value: &Value, style: ListStyle) {
    match value {
        Value::Number(n) => out.push_str(&format_number(*n)),
        Value::Bool(true) => out.push_str("#t"),
        Value::Bool(false) => out.push_str("#f"),
        Value::Symbol(s) => out.push_str(s),
        Value::Text(s) => {
            out.push('"');
            for ch in s.chars() {
                match ch {
                    '"' => out.push_str("\\\""),
                    '\\' => out.push_str("\\\\"),
                    '\n' => out.push_str("\\n"),
                    '\t' => out.push_str("\\t"),
                    _ => out.push(ch),
                }
            }
            out.push('"');
        }
        Value::List(items) => match style {
            ListStyle::Parens => write_seq(out, items, style),
            ListStyle::ConsChain => write_cons_chain(out, items, style),
        },
        Value::Vector(items) => {
            out.push('#');
            write_seq(out, items, style);
        }
        Value::Record(record) => {
            out.push_str("(make-");
            out.push_str(&record.type_name);
            for (_, field) in &record.fields {
                out.push(' ');
                write_value(out, field, style);
            }
            out.push(')');
        }
        Value::Native(_) | Value::Closure(_) => out.push_str("#<procedure>"),
        Value::Void => {}
    }
}

/// `(a b c)`; a dotted tail prints through the `.` marker symbol.
fn write_seq(out: &mut String, items: &[Value], style: ListStyle) {
    out.push('(');
    for (i, item) in items.iter().enumerate() {
        if i > 0 {
            out.push(' ');
        }
        write_value(out, item, style);
    }
    out.push(')');
}

/// `(cons a (cons b empty))`, collapsing a dotted tail onto the last cons.
fn write_cons_chain(out: &mut String, items: &[Value], style: ListStyle) {
    if items.is_empty() {
        out.push_str("empty");
        return;
    }

    // Split off an improper tail if present.
    let (heads, tail) = if items.len() >= 2 && items[items.len() - 2].is_dot() {
        (&items[..items.len() - 2], Some(&items[items.len() - 1]))
    } else {
        (&items[..], None)
    };

    for head in heads {
        out.push_str("(cons ");
        write_value(out, head, style);
        out.push(' ');
    }
    match tail {
        // Dotted: the final cdr is the tail value itself.
        Some(tail) => write_value(out, tail, style),
        None => out.push_str("empty"),
    }
    for _ in 0..heads.len() {
        out.push(')');
    }
}

/// Racket-style: integral doubles print without a decimal point.
fn format_number(n: f64) -> String {
    if n.fract() == 0.0 && n.is_finite() && n.abs() < 1e15 {
        format!("{}", n as i64)
    } else {
        format!("{n}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value::cons;
    use std::rc::Rc;

    #[test]
    fn numbers_print_racket_style() {
        assert_eq!(print(&Value::Number(20.0), ListStyle::Parens), "20");
        assert_eq!(print(&Value::Number(-3.0), ListStyle::Parens), "-3");
        assert_eq!(print(&Value::Number(2.5), ListStyle::Parens), "2.5");
    }

    #[test]
    fn void_prints_as_nothing() {
        assert_eq!(print(&Value::Void, ListStyle::Parens), "");
    }

    #[test]
    fn text_is_quoted_and_escaped() {
        assert_eq!(print(&Value::text("hi \"there\""), ListStyle::Parens), "\"hi \\\"there\\\"\"");
        assert_eq!(print(&Value::symbol("hi"), ListStyle::Parens), "hi");
    }

    #[test]
    fn sequences_in_both_styles() {
        let list = Value::list(vec![Value::Number(1.0), Value::Number(2.0)]);
        assert_eq!(print(&list, ListStyle::Parens), "(1 2)");
        assert_eq!(print(&list, ListStyle::ConsChain), "(cons 1 (cons 2 empty))");
        assert_eq!(print(&Value::nil(), ListStyle::Parens), "()");
        assert_eq!(print(&Value::nil(), ListStyle::ConsChain), "empty");
    }

    #[test]
    fn dotted_pairs_in_both_styles() {
        let pair = cons(Value::Number(1.0), Value::Number(2.0));
        assert_eq!(print(&pair, ListStyle::Parens), "(1 . 2)");
        assert_eq!(print(&pair, ListStyle::ConsChain), "(cons 1 2)");
    }

    #[test]
    fn vectors_carry_the_hash_marker() {
        let vec = Value::Vector(Rc::new(vec![Value::symbol("q")]));
        assert_eq!(print(&vec, ListStyle::Parens), "#(q)");
    }

    #[test]
    fn records_print_as_constructor_calls() {
        let record = Value::Record(Rc::new(crate::value::Record {
            type_name: Rc::from("person"),
            fields: vec![
                (Rc::from("name"), Value::text("ryan")),
                (Rc::from("age"), Value::Number(19.0)),
            ],
        }));
        assert_eq!(print(&record, ListStyle::Parens), "(make-person \"ryan\" 19)");
    }
}
