//! The logic engine's surface forms and relation library.
//!
//! The binding forms (`fresh`, `conde`, `defrel`, `run`, …) are
//! macro-style rewrites: each expands to a datum built from the relation
//! library's procedures (`conj2`, `disj2`, `call/fresh`, `ifte`, `once`,
//! `run-goal`, `reify`) and hands that datum back to the evaluator. The
//! library itself is ordinary source text, evaluated once per session —
//! the evaluator bootstraps the logic engine rather than the engine being
//! a separate native module.
//!
//! Unification failure never raises an error anywhere below: it is the
//! value `#f`, and an empty stream is the value `'()`.

use rackling_datum::Value;

use crate::eval::Interp;
use crate::EvalError;

/// The relation library, evaluated into a session by
/// [`Interp::load_logic`].
///
/// A goal is a procedure from a substitution to a stream; a stream is
/// `'()` (no solutions), a pair (a ready solution and the rest), or a
/// zero-argument procedure (a suspension of unforced work). `append-inf`
/// swaps its operands each time it forces a suspension, which is the
/// fairness guarantee that keeps an infinite disjunct from starving the
/// other side.
pub const KANREN_PRELUDE: &str = r#"
(define (var name) (vector name))
(define (var? x) (vector? x))

(define empty-s '())

(define (walk v s)
  (let [(a (and (var? v) (assv v s)))]
    (cond
      [(pair? a) (walk (cdr a) s)]
      [else v])))

(define (occurs? x v s)
  (let [(v (walk v s))]
    (cond
      [(var? v) (eqv? v x)]
      [(pair? v)
       (or (occurs? x (car v) s)
           (occurs? x (cdr v) s))]
      [else #f])))

(define (ext-s x v s)
  (cond
    [(occurs? x v s) #f]
    [else (cons `(,x . ,v) s)]))

(define (unify u v s)
  (let [(u (walk u s)) (v (walk v s))]
    (cond
      [(eqv? u v) s]
      [(var? u) (ext-s u v s)]
      [(var? v) (ext-s v u s)]
      [(and (pair? u) (pair? v))
       (let [(s (unify (car u) (car v) s))]
         (and s
              (unify (cdr u) (cdr v) s)))]
      [else #f])))

(define (== u v)
  (lambda (s)
    (let [(s (unify u v s))]
      (if s `(,s) '()))))

(define succeed
  (lambda (s)
    `(,s)))

(define fail
  (lambda (s)
    '()))

(define (append-inf s-inf t-inf)
  (cond
    [(null? s-inf) t-inf]
    [(pair? s-inf)
     (cons (car s-inf)
           (append-inf (cdr s-inf) t-inf))]
    [else (lambda ()
            (append-inf t-inf (s-inf)))]))

(define (disj2 g1 g2)
  (lambda (s)
    (append-inf (g1 s) (g2 s))))

(define (take-inf n s-inf)
  (cond
    [(and n (zero? n)) '()]
    [(null? s-inf) '()]
    [(pair? s-inf)
     (cons (car s-inf)
           (take-inf (if n (- n 1) #f) (cdr s-inf)))]
    [else (take-inf n (s-inf))]))

(define (append-map-inf g s-inf)
  (cond
    [(null? s-inf) '()]
    [(pair? s-inf)
     (append-inf (g (car s-inf))
                 (append-map-inf g (cdr s-inf)))]
    [else (lambda ()
            (append-map-inf g (s-inf)))]))

(define (conj2 g1 g2)
  (lambda (s)
    (append-map-inf g2 (g1 s))))

(define (call/fresh name f)
  (f (var name)))

(define (reify-name n)
  (string->symbol
   (string-append "_"
                  (number->string n))))

(define (walk* v s)
  (let [(v (walk v s))]
    (cond
      [(var? v) v]
      [(pair? v)
       (cons
        (walk* (car v) s)
        (walk* (cdr v) s))]
      [else v])))

(define (reify-s v r)
  (let [(v (walk v r))]
    (cond
      [(var? v)
       (let [(n (length r))]
         (let [(rn (reify-name n))]
           (cons `(,v . ,rn) r)))]
      [(pair? v)
       (let [(r (reify-s (car v) r))]
         (reify-s (cdr v) r))]
      [else r])))

(define (reify v)
  (lambda (s)
    (let [(v (walk* v s))]
      (let [(r (reify-s v empty-s))]
        (walk* v r)))))

(define (run-goal n g)
  (take-inf n (g empty-s)))

(define (ifte g1 g2 g3)
  (lambda (s)
    (let loop ([s-inf (g1 s)])
      (cond
        [(null? s-inf) (g3 s)]
        [(pair? s-inf)
         (append-map-inf g2 s-inf)]
        [else (lambda ()
                (loop (s-inf)))]))))

(define (once g)
  (lambda (s)
    (let loop ([s-inf (g s)])
      (cond
        [(null? s-inf) '()]
        [(pair? s-inf)
         (cons (car s-inf) '())]
        [else (lambda ()
                (loop (s-inf)))]))))

(define (nevero)
  (lambda (s)
    (lambda ()
      ((nevero) s))))

(define (alwayso)
  (lambda (s)
    (lambda ()
      ((disj2 succeed (alwayso)) s))))

(defrel (conso f r out)
  (== (cons f r) out))

(defrel (caro l out)
  (fresh (r)
         (conso out r l)))

(defrel (cdro l out)
  (fresh (f)
         (conso f out l)))

(defrel (nullo l)
  (conde
   [(== l '())]))

(defrel (appendo l t out)
  (conde
   [(nullo l) (== t out)]
   [(fresh (a d res)
           (conso a d l)
           (conso a res out)
           (appendo d t res))]))
"#;

/// Is `name` one of the macro-style logic forms?
pub fn is_logic_form(name: &str) -> bool {
    matches!(
        name,
        "fresh" | "conde" | "conda" | "condu" | "defrel" | "run" | "run*" | "conj" | "disj"
    )
}

/// Expand a logic form to the datum the evaluator should run instead.
pub fn expand(interp: &mut Interp, items: &[Value]) -> Result<Value, EvalError> {
    let head = items[0]
        .as_symbol()
        .map(|s| s.as_ref())
        .unwrap_or_default();
    match head {
        "conj" => Ok(conj_of(&items[1..])),
        "disj" => Ok(disj_of(&items[1..])),
        "fresh" => {
            let [_, names, goals @ ..] = items else {
                return Err(EvalError::malformed("fresh", "expected a name list and goals"));
            };
            let Some(names) = names.as_list() else {
                return Err(EvalError::malformed("fresh", "expected a name list and goals"));
            };
            fresh_of(names, goals)
        }
        "conde" => conde_of(&items[1..]),
        "conda" => committed_of("conda", &items[1..], false),
        "condu" => committed_of("condu", &items[1..], true),
        "defrel" => defrel_of(interp, items),
        "run" => {
            let [_, n, query, goals @ ..] = items else {
                return Err(EvalError::malformed(
                    "run",
                    "expected a count, a query list, and goals",
                ));
            };
            run_of("run", n.clone(), query, goals)
        }
        "run*" => {
            let [_, query, goals @ ..] = items else {
                return Err(EvalError::malformed("run*", "expected a query list and goals"));
            };
            run_of("run*", Value::Bool(false), query, goals)
        }
        _ => Err(EvalError::malformed("logic", format!("unknown form {head}"))),
    }
}

fn sym(name: &str) -> Value {
    Value::symbol(name)
}

fn form(items: Vec<Value>) -> Value {
    Value::list(items)
}

/// Right-associated conjunction; vacuously true when empty.
fn conj_of(goals: &[Value]) -> Value {
    match goals {
        [] => sym("succeed"),
        [goal] => goal.clone(),
        [goal, rest @ ..] => form(vec![sym("conj2"), goal.clone(), conj_of(rest)]),
    }
}

/// Right-associated disjunction; vacuously false when empty.
fn disj_of(goals: &[Value]) -> Value {
    match goals {
        [] => sym("fail"),
        [goal] => goal.clone(),
        [goal, rest @ ..] => form(vec![sym("disj2"), goal.clone(), disj_of(rest)]),
    }
}

/// `(fresh (x y) g …)` nests one `call/fresh` + `lambda` per name, so
/// each name gets a freshly allocated variable in its own child frame.
fn fresh_of(names: &[Value], goals: &[Value]) -> Result<Value, EvalError> {
    match names {
        [] => Ok(conj_of(goals)),
        [name, rest @ ..] => {
            if name.as_symbol().is_none() {
                return Err(EvalError::malformed("fresh", "names should be symbols"));
            }
            Ok(form(vec![
                sym("call/fresh"),
                form(vec![sym("quote"), name.clone()]),
                form(vec![
                    sym("lambda"),
                    form(vec![name.clone()]),
                    fresh_of(rest, goals)?,
                ]),
            ]))
        }
    }
}

/// `conde`: disjunction of per-clause conjunctions.
fn conde_of(clauses: &[Value]) -> Result<Value, EvalError> {
    let conjs = clauses
        .iter()
        .map(|clause| {
            clause
                .as_list()
                .map(conj_of)
                .ok_or_else(|| EvalError::malformed("conde", "clauses should be goal lists"))
        })
        .collect::<Result<Vec<_>, _>>()?;
    Ok(disj_of(&conjs))
}

/// `conda`/`condu`: try clauses in order, committing to the first whose
/// head goal succeeds. `condu` additionally truncates the head goal with
/// `once`.
fn committed_of(who: &'static str, clauses: &[Value], once: bool) -> Result<Value, EvalError> {
    let [clause, rest @ ..] = clauses else {
        return Ok(sym("fail"));
    };
    let Some([head, body @ ..]) = clause.as_list() else {
        return Err(EvalError::malformed(who, "clauses should be goal lists"));
    };
    let head = if once {
        form(vec![sym("once"), head.clone()])
    } else {
        head.clone()
    };
    Ok(form(vec![
        sym("ifte"),
        head,
        conj_of(body),
        committed_of(who, rest, once)?,
    ]))
}

/// `(defrel (name p …) g …)` defines a procedure whose result is a goal
/// that suspends before running the body conjunction — which is what lets
/// a relation call itself without expanding forever. The substitution
/// parameter gets a generated name so user parameters cannot capture it.
fn defrel_of(interp: &mut Interp, items: &[Value]) -> Result<Value, EvalError> {
    let [_, header, goals @ ..] = items else {
        return Err(EvalError::malformed("defrel", "expected a header and goals"));
    };
    if header
        .as_list()
        .and_then(|h| h.first())
        .and_then(Value::as_symbol)
        .is_none()
    {
        return Err(EvalError::malformed(
            "defrel",
            "expected a (name params ...) header",
        ));
    }

    let s = Value::Symbol(interp.gensym("s"));
    Ok(form(vec![
        sym("define"),
        header.clone(),
        form(vec![
            sym("lambda"),
            form(vec![s.clone()]),
            form(vec![
                sym("lambda"),
                form(vec![]),
                form(vec![conj_of(goals), s]),
            ]),
        ]),
    ]))
}

/// `run`/`run*`: bind one fresh variable per query name, drive the goal
/// conjunction from the empty substitution, and reify the query term over
/// each surviving substitution.
fn run_of(
    who: &'static str,
    count: Value,
    query: &Value,
    goals: &[Value],
) -> Result<Value, EvalError> {
    let Some(names) = query.as_list() else {
        return Err(EvalError::malformed(who, "query should be a list of names"));
    };
    if names.is_empty() || names.iter().any(|name| name.as_symbol().is_none()) {
        return Err(EvalError::malformed(who, "query should be a list of names"));
    }

    let bindings: Vec<Value> = names
        .iter()
        .map(|name| {
            form(vec![
                name.clone(),
                form(vec![sym("var"), form(vec![sym("quote"), name.clone()])]),
            ])
        })
        .collect();

    let query_term = if names.len() == 1 {
        names[0].clone()
    } else {
        let mut listing = vec![sym("list")];
        listing.extend(names.iter().cloned());
        form(listing)
    };

    Ok(form(vec![
        sym("let"),
        form(bindings),
        form(vec![
            sym("map"),
            form(vec![sym("reify"), query_term]),
            form(vec![sym("run-goal"), count, conj_of(goals)]),
        ]),
    ]))
}
