//! The standard environment.
//!
//! Natives are installed first, then a small in-language prelude (the
//! higher-order list procedures) is evaluated on top — the same bootstrap
//! mechanism the logic engine uses for its relation library.

use std::rc::Rc;

use rackling_datum::{car, cdr, cons, Env, ListStyle, NativeFn, Value, print};

use crate::Interp;

/// Higher-order list procedures, written in the language itself.
const PRELUDE: &str = r#"
(define (map f l)
  (cond
    [(null? l) '()]
    [else (cons (f (car l)) (map f (cdr l)))]))

(define (filter f l)
  (cond
    [(null? l) '()]
    [(f (car l)) (cons (car l) (filter f (cdr l)))]
    [else (filter f (cdr l))]))

(define (foldl f init l)
  (cond
    [(null? l) init]
    [else (foldl f (f (car l) init) (cdr l))]))

(define (foldr f init l)
  (cond
    [(null? l) init]
    [else (f (car l) (foldr f init (cdr l)))]))

(define (andmap f l)
  (cond
    [(null? l) #t]
    [(f (car l)) (andmap f (cdr l))]
    [else #f]))

(define (ormap f l)
  (cond
    [(null? l) #f]
    [(f (car l)) #t]
    [else (ormap f (cdr l))]))
"#;

/// Build a fresh standard environment: every native plus the prelude.
pub fn standard_env() -> Env {
    let env = Env::new();
    for (name, value) in builtins() {
        env.set(name, value).expect("builtin names are not reserved");
    }
    let mut boot = Interp::with_env(env.clone());
    boot.eval_source(PRELUDE).expect("standard prelude is well-formed");
    env
}

// --- argument helpers, all surfacing the offending value by display ---

fn one<'a>(who: &str, args: &'a [Value]) -> Result<&'a Value, String> {
    match args {
        [value] => Ok(value),
        _ => Err(format!("{who} expects 1 argument, got {}", args.len())),
    }
}

fn two<'a>(who: &str, args: &'a [Value]) -> Result<(&'a Value, &'a Value), String> {
    match args {
        [a, b] => Ok((a, b)),
        _ => Err(format!("{who} expects 2 arguments, got {}", args.len())),
    }
}

fn num(who: &str, value: &Value) -> Result<f64, String> {
    match value {
        Value::Number(n) => Ok(*n),
        other => Err(format!("{who} expects a number, got {other}")),
    }
}

fn text(who: &str, value: &Value) -> Result<Rc<str>, String> {
    match value {
        Value::Text(s) => Ok(s.clone()),
        other => Err(format!("{who} expects a string, got {other}")),
    }
}

fn seq(who: &str, value: &Value) -> Result<Rc<Vec<Value>>, String> {
    match value {
        Value::List(items) => Ok(items.clone()),
        other => Err(format!("{who} expects a list, got {other}")),
    }
}

fn proper(who: &str, items: &[Value]) -> Result<(), String> {
    if items.len() >= 2 && items[items.len() - 2].is_dot() {
        Err(format!("{who} expects a proper list"))
    } else {
        Ok(())
    }
}

fn index(who: &str, value: &Value) -> Result<usize, String> {
    let n = num(who, value)?;
    if n.fract() == 0.0 && n >= 0.0 {
        Ok(n as usize)
    } else {
        Err(format!("{who} expects a non-negative integer, got {value}"))
    }
}

// --- entry constructors for the repetitive families ---

fn math1(name: &'static str, f: fn(f64) -> f64) -> (&'static str, Value) {
    (
        name,
        NativeFn::new(name, move |args: &[Value]| {
            Ok(Value::Number(f(num(name, one(name, args)?)?)))
        }),
    )
}

/// Numeric predicates answer `#f` for non-numbers instead of failing;
/// the logic prelude leans on that.
fn numpred(name: &'static str, f: fn(f64) -> bool) -> (&'static str, Value) {
    (
        name,
        NativeFn::new(name, move |args: &[Value]| {
            Ok(Value::Bool(matches!(one(name, args)?, Value::Number(n) if f(*n))))
        }),
    )
}

fn pred(name: &'static str, f: fn(&Value) -> bool) -> (&'static str, Value) {
    (
        name,
        NativeFn::new(name, move |args: &[Value]| {
            Ok(Value::Bool(f(one(name, args)?)))
        }),
    )
}

fn cmp(name: &'static str, f: fn(f64, f64) -> bool) -> (&'static str, Value) {
    (
        name,
        NativeFn::new(name, move |args: &[Value]| {
            let (a, b) = two(name, args)?;
            Ok(Value::Bool(f(num(name, a)?, num(name, b)?)))
        }),
    )
}

fn is_integral(n: f64) -> bool {
    n.fract() == 0.0
}

/// Every native, in registration order.
pub fn builtins() -> Vec<(&'static str, Value)> {
    vec![
        // === arithmetic ===
        ("+", NativeFn::new("+", |args: &[Value]| {
            let mut sum = 0.0;
            for arg in args {
                sum += num("+", arg)?;
            }
            Ok(Value::Number(sum))
        })),
        ("-", NativeFn::new("-", |args: &[Value]| {
            let [first, rest @ ..] = args else {
                return Err("- expects at least 1 argument".to_string());
            };
            let first = num("-", first)?;
            if rest.is_empty() {
                return Ok(Value::Number(-first));
            }
            let mut out = first;
            for arg in rest {
                out -= num("-", arg)?;
            }
            Ok(Value::Number(out))
        })),
        ("*", NativeFn::new("*", |args: &[Value]| {
            let mut product = 1.0;
            for arg in args {
                product *= num("*", arg)?;
            }
            Ok(Value::Number(product))
        })),
        ("/", NativeFn::new("/", |args: &[Value]| {
            let [first, rest @ ..] = args else {
                return Err("/ expects at least 1 argument".to_string());
            };
            let first = num("/", first)?;
            if rest.is_empty() {
                return Ok(Value::Number(1.0 / first));
            }
            let mut out = first;
            for arg in rest {
                out /= num("/", arg)?;
            }
            Ok(Value::Number(out))
        })),
        ("%", NativeFn::new("%", |args: &[Value]| {
            let (a, b) = two("%", args)?;
            Ok(Value::Number(num("%", a)? % num("%", b)?))
        })),
        ("modulo", NativeFn::new("modulo", |args: &[Value]| {
            let (a, b) = two("modulo", args)?;
            let (a, b) = (num("modulo", a)?, num("modulo", b)?);
            Ok(Value::Number(((a % b) + b) % b))
        })),
        ("quotient", NativeFn::new("quotient", |args: &[Value]| {
            let (a, b) = two("quotient", args)?;
            Ok(Value::Number((num("quotient", a)? / num("quotient", b)?).trunc()))
        })),
        ("add1", NativeFn::new("add1", |args: &[Value]| {
            Ok(Value::Number(num("add1", one("add1", args)?)? + 1.0))
        })),
        ("sub1", NativeFn::new("sub1", |args: &[Value]| {
            Ok(Value::Number(num("sub1", one("sub1", args)?)? - 1.0))
        })),
        ("expt", NativeFn::new("expt", |args: &[Value]| {
            let (a, b) = two("expt", args)?;
            Ok(Value::Number(num("expt", a)?.powf(num("expt", b)?)))
        })),
        ("min", NativeFn::new("min", |args: &[Value]| {
            let [first, rest @ ..] = args else {
                return Err("min expects at least 1 argument".to_string());
            };
            let mut out = num("min", first)?;
            for arg in rest {
                out = out.min(num("min", arg)?);
            }
            Ok(Value::Number(out))
        })),
        ("max", NativeFn::new("max", |args: &[Value]| {
            let [first, rest @ ..] = args else {
                return Err("max expects at least 1 argument".to_string());
            };
            let mut out = num("max", first)?;
            for arg in rest {
                out = out.max(num("max", arg)?);
            }
            Ok(Value::Number(out))
        })),
        math1("abs", f64::abs),
        math1("floor", f64::floor),
        math1("ceiling", f64::ceil),
        math1("round", f64::round),
        math1("sqrt", f64::sqrt),
        math1("sqr", |n| n * n),
        math1("exp", f64::exp),
        math1("log", f64::ln),
        math1("sin", f64::sin),
        math1("cos", f64::cos),
        math1("tan", f64::tan),
        math1("asin", f64::asin),
        math1("acos", f64::acos),
        math1("atan", f64::atan),
        math1("sinh", f64::sinh),
        math1("cosh", f64::cosh),
        math1("sgn", |n| {
            if n > 0.0 {
                1.0
            } else if n < 0.0 {
                -1.0
            } else {
                n
            }
        }),
        ("pi", Value::Number(std::f64::consts::PI)),
        ("e", Value::Number(std::f64::consts::E)),

        // === numeric predicates ===
        numpred("zero?", |n| n == 0.0),
        numpred("positive?", |n| n > 0.0),
        numpred("negative?", |n| n < 0.0),
        numpred("even?", |n| is_integral(n) && n % 2.0 == 0.0),
        numpred("odd?", |n| is_integral(n) && n % 2.0 != 0.0),

        // === type predicates ===
        pred("number?", |v| matches!(v, Value::Number(_))),
        pred("boolean?", |v| matches!(v, Value::Bool(_))),
        pred("symbol?", |v| matches!(v, Value::Symbol(_))),
        pred("string?", |v| matches!(v, Value::Text(_))),
        pred("vector?", |v| matches!(v, Value::Vector(_))),
        pred("procedure?", |v| {
            matches!(v, Value::Native(_) | Value::Closure(_))
        }),
        pred("false?", |v| matches!(v, Value::Bool(false))),
        pred("list?", |v| matches!(v, Value::List(_))),
        pred("cons?", |v| matches!(v, Value::List(items) if !items.is_empty())),
        pred("pair?", |v| matches!(v, Value::List(items) if !items.is_empty())),
        pred("null?", |v| matches!(v, Value::List(items) if items.is_empty())),
        pred("empty?", |v| matches!(v, Value::List(items) if items.is_empty())),

        // === comparison ===
        cmp("<", |a, b| a < b),
        cmp(">", |a, b| a > b),
        cmp("<=", |a, b| a <= b),
        cmp(">=", |a, b| a >= b),
        cmp("=", |a, b| a == b),
        ("equal?", NativeFn::new("equal?", |args: &[Value]| {
            let (a, b) = two("equal?", args)?;
            Ok(Value::Bool(a.equal(b)))
        })),
        ("eqv?", NativeFn::new("eqv?", |args: &[Value]| {
            let (a, b) = two("eqv?", args)?;
            Ok(Value::Bool(a.eqv(b)))
        })),
        ("boolean=?", NativeFn::new("boolean=?", |args: &[Value]| {
            let (a, b) = two("boolean=?", args)?;
            match (a, b) {
                (Value::Bool(a), Value::Bool(b)) => Ok(Value::Bool(a == b)),
                _ => Err(format!("boolean=? expects booleans, got {a} and {b}")),
            }
        })),
        ("symbol=?", NativeFn::new("symbol=?", |args: &[Value]| {
            let (a, b) = two("symbol=?", args)?;
            match (a, b) {
                (Value::Symbol(a), Value::Symbol(b)) => Ok(Value::Bool(a == b)),
                _ => Err(format!("symbol=? expects symbols, got {a} and {b}")),
            }
        })),
        ("string=?", NativeFn::new("string=?", |args: &[Value]| {
            let (a, b) = two("string=?", args)?;
            Ok(Value::Bool(text("string=?", a)? == text("string=?", b)?))
        })),
        ("not", NativeFn::new("not", |args: &[Value]| {
            Ok(Value::Bool(!one("not", args)?.is_truthy()))
        })),

        // === lists ===
        ("list", NativeFn::new("list", |args: &[Value]| {
            Ok(Value::list(args.to_vec()))
        })),
        ("cons", NativeFn::new("cons", |args: &[Value]| {
            let (first, rest) = two("cons", args)?;
            Ok(cons(first.clone(), rest.clone()))
        })),
        ("car", NativeFn::new("car", |args: &[Value]| {
            let value = one("car", args)?;
            car(value).ok_or_else(|| format!("car expects a pair, got {value}"))
        })),
        ("cdr", NativeFn::new("cdr", |args: &[Value]| {
            let value = one("cdr", args)?;
            cdr(value).ok_or_else(|| format!("cdr expects a pair, got {value}"))
        })),
        ("first", NativeFn::new("first", |args: &[Value]| {
            let value = one("first", args)?;
            car(value).ok_or_else(|| format!("first expects a non-empty list, got {value}"))
        })),
        ("rest", NativeFn::new("rest", |args: &[Value]| {
            let value = one("rest", args)?;
            cdr(value).ok_or_else(|| format!("rest expects a non-empty list, got {value}"))
        })),
        ("length", NativeFn::new("length", |args: &[Value]| {
            let items = seq("length", one("length", args)?)?;
            proper("length", &items)?;
            Ok(Value::Number(items.len() as f64))
        })),
        ("append", NativeFn::new("append", |args: &[Value]| {
            let Some((last, heads)) = args.split_last() else {
                return Ok(Value::nil());
            };
            let mut elems = Vec::new();
            for head in heads {
                let items = seq("append", head)?;
                proper("append", &items)?;
                elems.extend(items.iter().cloned());
            }
            // The last argument may be anything; a non-list makes the
            // result improper, as in Racket.
            let mut out = last.clone();
            for elem in elems.into_iter().rev() {
                out = cons(elem, out);
            }
            Ok(out)
        })),
        ("reverse", NativeFn::new("reverse", |args: &[Value]| {
            let items = seq("reverse", one("reverse", args)?)?;
            proper("reverse", &items)?;
            Ok(Value::list(items.iter().rev().cloned().collect()))
        })),
        ("list-ref", NativeFn::new("list-ref", |args: &[Value]| {
            let (lst, i) = two("list-ref", args)?;
            let items = seq("list-ref", lst)?;
            let i = index("list-ref", i)?;
            items
                .get(i)
                .cloned()
                .ok_or_else(|| format!("list-ref: index {i} out of range for {lst}"))
        })),
        ("make-list", NativeFn::new("make-list", |args: &[Value]| {
            let (n, fill) = two("make-list", args)?;
            let n = index("make-list", n)?;
            Ok(Value::list(vec![fill.clone(); n]))
        })),
        ("member", NativeFn::new("member", |args: &[Value]| {
            let (x, lst) = two("member", args)?;
            let items = seq("member", lst)?;
            Ok(Value::Bool(items.iter().any(|item| item.equal(x))))
        })),
        ("member?", NativeFn::new("member?", |args: &[Value]| {
            let (x, lst) = two("member?", args)?;
            let items = seq("member?", lst)?;
            Ok(Value::Bool(items.iter().any(|item| item.equal(x))))
        })),
        ("remove", NativeFn::new("remove", |args: &[Value]| {
            let (x, lst) = two("remove", args)?;
            let items = seq("remove", lst)?;
            let mut out = Vec::with_capacity(items.len());
            let mut removed = false;
            for item in items.iter() {
                if !removed && item.equal(x) {
                    removed = true;
                } else {
                    out.push(item.clone());
                }
            }
            Ok(Value::list(out))
        })),
        ("remove-all", NativeFn::new("remove-all", |args: &[Value]| {
            let (x, lst) = two("remove-all", args)?;
            let items = seq("remove-all", lst)?;
            Ok(Value::list(
                items.iter().filter(|item| !item.equal(x)).cloned().collect(),
            ))
        })),
        assoc_like("assoc", Value::equal),
        assoc_like("assq", Value::eqv),
        assoc_like("assv", Value::eqv),
        ("empty", Value::nil()),
        ("null", Value::nil()),

        // === strings & symbols ===
        ("string-append", NativeFn::new("string-append", |args: &[Value]| {
            let mut out = String::new();
            for arg in args {
                out.push_str(&text("string-append", arg)?);
            }
            Ok(Value::text(&out))
        })),
        ("substring", NativeFn::new("substring", |args: &[Value]| {
            let (s, i, j) = match args {
                [s, i] => (s, i, None),
                [s, i, j] => (s, i, Some(j)),
                _ => return Err(format!("substring expects 2 or 3 arguments, got {}", args.len())),
            };
            let s = text("substring", s)?;
            let chars: Vec<char> = s.chars().collect();
            let i = index("substring", i)?;
            let j = match j {
                Some(j) => index("substring", j)?,
                None => chars.len(),
            };
            if i > j || j > chars.len() {
                return Err(format!("substring: range {i}..{j} out of bounds for \"{s}\""));
            }
            Ok(Value::text(&chars[i..j].iter().collect::<String>()))
        })),
        ("explode", NativeFn::new("explode", |args: &[Value]| {
            let s = text("explode", one("explode", args)?)?;
            Ok(Value::list(
                s.chars().map(|ch| Value::text(&ch.to_string())).collect(),
            ))
        })),
        ("string->number", NativeFn::new("string->number", |args: &[Value]| {
            let s = text("string->number", one("string->number", args)?)?;
            Ok(match s.trim().parse::<f64>() {
                Ok(n) => Value::Number(n),
                Err(_) => Value::Bool(false),
            })
        })),
        ("number->string", NativeFn::new("number->string", |args: &[Value]| {
            let value = one("number->string", args)?;
            num("number->string", value)?;
            Ok(Value::text(&print(value, ListStyle::Parens)))
        })),
        ("string->symbol", NativeFn::new("string->symbol", |args: &[Value]| {
            let s = text("string->symbol", one("string->symbol", args)?)?;
            Ok(Value::Symbol(s))
        })),
        ("symbol->string", NativeFn::new("symbol->string", |args: &[Value]| {
            match one("symbol->string", args)? {
                Value::Symbol(s) => Ok(Value::Text(s.clone())),
                other => Err(format!("symbol->string expects a symbol, got {other}")),
            }
        })),
        ("boolean->string", NativeFn::new("boolean->string", |args: &[Value]| {
            match one("boolean->string", args)? {
                Value::Bool(true) => Ok(Value::text("#t")),
                Value::Bool(false) => Ok(Value::text("#f")),
                other => Err(format!("boolean->string expects a boolean, got {other}")),
            }
        })),

        // === vectors ===
        // Each call allocates a fresh identity, which is exactly what the
        // logic engine's variable allocator needs.
        ("vector", NativeFn::new("vector", |args: &[Value]| {
            Ok(Value::Vector(Rc::new(args.to_vec())))
        })),

        // === misc ===
        ("identity", NativeFn::new("identity", |args: &[Value]| {
            Ok(one("identity", args)?.clone())
        })),
    ]
}

/// `assoc`/`assq`/`assv`: scan a list of pairs, comparing keys with the
/// given equivalence; the matching pair or `#f`.
fn assoc_like(
    name: &'static str,
    key_eq: fn(&Value, &Value) -> bool,
) -> (&'static str, Value) {
    (
        name,
        NativeFn::new(name, move |args: &[Value]| {
            let (x, lst) = two(name, args)?;
            let items = seq(name, lst)?;
            for item in items.iter() {
                if let Some(key) = car(item) {
                    if key_eq(&key, x) {
                        return Ok(item.clone());
                    }
                }
            }
            Ok(Value::Bool(false))
        }),
    )
}
