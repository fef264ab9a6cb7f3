//! The recursive evaluator and special-form dispatcher.

use std::rc::Rc;

use rackling_datum::{print, Closure, Env, ListStyle, Value};

use crate::builtin::standard_env;
use crate::logic;
use crate::structs;
use crate::EvalError;

/// One interpreter session: a root environment, the display mode, the
/// `check-equal?` counter, and a counter for generated names.
pub struct Interp {
    env: Env,
    style: ListStyle,
    tests_run: u32,
    gensym: u32,
}

impl Interp {
    /// A session over a fresh standard environment, logic engine not loaded.
    pub fn new() -> Self {
        Self::with_env(standard_env())
    }

    /// A session over a caller-supplied environment.
    pub fn with_env(env: Env) -> Self {
        Self {
            env,
            style: ListStyle::default(),
            tests_run: 0,
            gensym: 0,
        }
    }

    /// A session with the miniKanren relation library bootstrapped in.
    pub fn with_logic() -> Result<Self, EvalError> {
        let mut interp = Self::new();
        interp.load_logic()?;
        Ok(interp)
    }

    /// Evaluate the embedded relation library into this session's
    /// environment. Safe to call at most once per environment (the library
    /// is a stack of `define`s, and redefinition is an error).
    pub fn load_logic(&mut self) -> Result<(), EvalError> {
        self.eval_source(logic::KANREN_PRELUDE)?;
        Ok(())
    }

    pub fn env(&self) -> &Env {
        &self.env
    }

    pub fn style(&self) -> ListStyle {
        self.style
    }

    pub fn set_style(&mut self, style: ListStyle) {
        self.style = style;
    }

    /// How many `check-equal?` assertions have run in this session.
    pub fn tests_run(&self) -> u32 {
        self.tests_run
    }

    /// Render a value in this session's display mode.
    pub fn show(&self, value: &Value) -> String {
        print(value, self.style)
    }

    /// Read and evaluate source text; the last form's value is returned.
    pub fn eval_source(&mut self, source: &str) -> Result<Value, EvalError> {
        let (datums, diagnostics) = rackling_reader::read(source);
        if let Some(diag) = diagnostics.first() {
            return Err(EvalError::Syntax(diag.message.clone()));
        }
        self.eval_program(&datums)
    }

    /// Evaluate a sequence of top-level datums; the last value is returned.
    pub fn eval_program(&mut self, datums: &[Value]) -> Result<Value, EvalError> {
        let mut result = Value::Void;
        for datum in datums {
            result = self.eval(datum)?;
        }
        Ok(result)
    }

    /// Evaluate one datum in the session environment.
    pub fn eval(&mut self, datum: &Value) -> Result<Value, EvalError> {
        let env = self.env.clone();
        self.eval_in(datum, &env)
    }

    /// The recursive evaluator.
    pub fn eval_in(&mut self, datum: &Value, env: &Env) -> Result<Value, EvalError> {
        match datum {
            Value::Symbol(name) => env
                .lookup(name)
                .ok_or_else(|| EvalError::Unbound(name.clone())),

            Value::List(items) if !items.is_empty() => self.eval_form(items, env),

            // Everything else is self-evaluating, including the empty
            // list and values re-injected by macro-style expansions.
            other => Ok(other.clone()),
        }
    }

    /// Dispatch a non-empty list: special form or application.
    fn eval_form(&mut self, items: &[Value], env: &Env) -> Result<Value, EvalError> {
        if let Some(head) = items[0].as_symbol() {
            match head.as_ref() {
                "quote" => return self.quote(items),
                "quasiquote" => return self.quasiquote_form(items, env),
                "unquote" => return self.unquote_form(items, env),
                "if" => return self.if_form(items, env),
                "cond" => return self.cond_form(items, env),
                "and" => return self.and_form(items, env),
                "or" => return self.or_form(items, env),
                "let" => return self.let_form(items, env),
                "define" => return self.define_form(items, env),
                "define-struct" => return structs::define_struct_form(items, env),
                "local" => return self.local_form(items, env),
                "lambda" => return self.lambda_form(items, env),
                "check-equal?" => return self.check_equal_form(items, env),
                name if logic::is_logic_form(name) => {
                    let expansion = logic::expand(self, items)?;
                    return self.eval_in(&expansion, env);
                }
                _ => {}
            }
        }

        // Application: head, then arguments, left to right.
        let proc = self.eval_in(&items[0], env)?;
        let mut args = Vec::with_capacity(items.len() - 1);
        for arg in &items[1..] {
            args.push(self.eval_in(arg, env)?);
        }
        self.apply(&proc, &args)
    }

    /// Invoke a procedure value on already-evaluated arguments.
    ///
    /// Closures get one fresh frame per call. No arity checking: missing
    /// parameters stay unbound (an error surfaces only if the body reads
    /// them), extra arguments are dropped.
    pub fn apply(&mut self, proc: &Value, args: &[Value]) -> Result<Value, EvalError> {
        match proc {
            Value::Native(native) => (native.func)(args).map_err(EvalError::WrongType),
            Value::Closure(closure) => {
                let frame = closure.env.child();
                for (param, arg) in closure.params.iter().zip(args) {
                    frame.set(param.clone(), arg.clone())?;
                }
                self.eval_in(&closure.body, &frame)
            }
            other => Err(EvalError::NotCallable(self.show(other))),
        }
    }

    /// A fresh name no source program can have mentioned; used by the
    /// logic-form expansions to stay capture-free.
    pub fn gensym(&mut self, prefix: &str) -> Rc<str> {
        self.gensym += 1;
        Rc::from(format!("{prefix}%{}", self.gensym))
    }

    // --- special forms ---

    fn quote(&self, items: &[Value]) -> Result<Value, EvalError> {
        match items {
            [_, operand] => Ok(operand.clone()),
            _ => Err(EvalError::malformed("quote", "expected exactly one operand")),
        }
    }

    fn quasiquote_form(&mut self, items: &[Value], env: &Env) -> Result<Value, EvalError> {
        match items {
            [_, operand] => self.quasi(operand, env),
            _ => Err(EvalError::malformed(
                "quasiquote",
                "expected exactly one operand",
            )),
        }
    }

    /// Walk the template; `(unquote e)` subtrees evaluate, everything else
    /// passes through untouched.
    fn quasi(&mut self, template: &Value, env: &Env) -> Result<Value, EvalError> {
        match template {
            Value::List(items) if !items.is_empty() && items[0].is_symbol("unquote") => {
                match items.as_slice() {
                    [_, operand] => self.eval_in(operand, env),
                    _ => Err(EvalError::malformed(
                        "unquote",
                        "expected exactly one operand",
                    )),
                }
            }
            Value::List(items) => {
                let mut out = Vec::with_capacity(items.len());
                for item in items.iter() {
                    out.push(self.quasi(item, env)?);
                }
                Ok(Value::list(out))
            }
            other => Ok(other.clone()),
        }
    }

    /// Top-level `unquote` just evaluates; only meaningful inside
    /// quasiquote but not rejected outside it.
    fn unquote_form(&mut self, items: &[Value], env: &Env) -> Result<Value, EvalError> {
        match items {
            [_, operand] => self.eval_in(operand, env),
            _ => Err(EvalError::malformed(
                "unquote",
                "expected exactly one operand",
            )),
        }
    }

    fn if_form(&mut self, items: &[Value], env: &Env) -> Result<Value, EvalError> {
        match items {
            [_, test, conseq] => {
                if self.eval_in(test, env)?.is_truthy() {
                    self.eval_in(conseq, env)
                } else {
                    Ok(Value::Void)
                }
            }
            [_, test, conseq, alt] => {
                if self.eval_in(test, env)?.is_truthy() {
                    self.eval_in(conseq, env)
                } else {
                    self.eval_in(alt, env)
                }
            }
            _ => Err(EvalError::malformed("if", "expected a test and two branches")),
        }
    }

    /// Clause tests run in order; a literal `else` or any non-`#f` result
    /// wins. No matching clause yields Void, not an error.
    fn cond_form(&mut self, items: &[Value], env: &Env) -> Result<Value, EvalError> {
        for clause in &items[1..] {
            let Some([test, body]) = clause.as_list().and_then(|c| <&[Value; 2]>::try_from(c).ok())
            else {
                return Err(EvalError::malformed(
                    "cond",
                    format!("clause {} should be a test and a result", self.show(clause)),
                ));
            };
            if test.is_symbol("else") || self.eval_in(test, env)?.is_truthy() {
                return self.eval_in(body, env);
            }
        }
        Ok(Value::Void)
    }

    /// Short-circuit conjunction: first `#f` wins, else the last value.
    fn and_form(&mut self, items: &[Value], env: &Env) -> Result<Value, EvalError> {
        let mut last = Value::Bool(true);
        for operand in &items[1..] {
            last = self.eval_in(operand, env)?;
            if !last.is_truthy() {
                return Ok(last);
            }
        }
        Ok(last)
    }

    /// Short-circuit disjunction: first non-`#f` value wins.
    fn or_form(&mut self, items: &[Value], env: &Env) -> Result<Value, EvalError> {
        for operand in &items[1..] {
            let value = self.eval_in(operand, env)?;
            if value.is_truthy() {
                return Ok(value);
            }
        }
        Ok(Value::Bool(false))
    }

    fn let_form(&mut self, items: &[Value], env: &Env) -> Result<Value, EvalError> {
        match items {
            // Binding-list form: inits evaluate in the enclosing
            // environment, so bindings do not see each other.
            [_, Value::List(bindings), body] => {
                let frame = env.child();
                for binding in bindings.iter() {
                    let (name, init) = Self::binding_pair("let", binding)?;
                    let value = self.eval_in(init, env)?;
                    frame.set(name.clone(), value)?;
                }
                self.eval_in(body, &frame)
            }

            // Named form: a recursive procedure bound in a new frame,
            // immediately applied to the evaluated initial values.
            [_, Value::Symbol(name), Value::List(bindings), body] => {
                let mut params = Vec::with_capacity(bindings.len());
                let mut initials = Vec::with_capacity(bindings.len());
                for binding in bindings.iter() {
                    let (param, init) = Self::binding_pair("let", binding)?;
                    params.push(param.clone());
                    initials.push(self.eval_in(init, env)?);
                }

                let frame = env.child();
                let proc = Value::Closure(Rc::new(Closure {
                    params,
                    body: body.clone(),
                    env: frame.clone(),
                }));
                frame.set(name.clone(), proc.clone())?;
                self.apply(&proc, &initials)
            }

            _ => Err(EvalError::malformed(
                "let",
                "expected a binding list (or a name and a binding list) and a body",
            )),
        }
    }

    /// A `(name expr)` pair inside a binding list.
    fn binding_pair<'a>(
        form: &'static str,
        binding: &'a Value,
    ) -> Result<(&'a Rc<str>, &'a Value), EvalError> {
        if let Some([name, init]) = binding.as_list().and_then(|b| <&[Value; 2]>::try_from(b).ok()) {
            if let Some(name) = name.as_symbol() {
                return Ok((name, init));
            }
        }
        Err(EvalError::malformed(form, "bindings take the shape (name expression)"))
    }

    /// `define` binds in the current frame only, and only once: a name
    /// already bound *in this frame* is a redefinition error (shadowing an
    /// outer frame is fine).
    fn define_form(&mut self, items: &[Value], env: &Env) -> Result<Value, EvalError> {
        match items {
            [_, Value::Symbol(name), expr] => {
                self.check_not_defined(name, env)?;
                let value = self.eval_in(expr, env)?;
                env.set(name.clone(), value)?;
                Ok(Value::Void)
            }

            // Procedure shorthand: (define (name p ...) body).
            [_, Value::List(header), body] => {
                let Some((name_datum, param_datums)) = header.split_first() else {
                    return Err(EvalError::malformed("define", "empty procedure header"));
                };
                let Some(name) = name_datum.as_symbol() else {
                    return Err(EvalError::malformed("define", "procedure name should be a symbol"));
                };
                self.check_not_defined(name, env)?;
                let params = Self::param_list("define", param_datums)?;
                let proc = Value::Closure(Rc::new(Closure {
                    params,
                    body: body.clone(),
                    env: env.clone(),
                }));
                env.set(name.clone(), proc)?;
                Ok(Value::Void)
            }

            _ => Err(EvalError::malformed(
                "define",
                "expected a name (or procedure header) and an expression",
            )),
        }
    }

    fn check_not_defined(&self, name: &Rc<str>, env: &Env) -> Result<(), EvalError> {
        if let Some(current) = env.get(name) {
            return Err(EvalError::Redefined {
                name: name.clone(),
                current: self.show(&current),
            });
        }
        Ok(())
    }

    fn param_list(form: &'static str, datums: &[Value]) -> Result<Vec<Rc<str>>, EvalError> {
        datums
            .iter()
            .map(|datum| {
                datum
                    .as_symbol()
                    .cloned()
                    .ok_or_else(|| EvalError::malformed(form, "parameters should be symbols"))
            })
            .collect()
    }

    /// `(local (defs ...) body)`: one fresh frame, every definition
    /// evaluated into it in order, then the body.
    fn local_form(&mut self, items: &[Value], env: &Env) -> Result<Value, EvalError> {
        match items {
            [_, Value::List(defs), body] => {
                let frame = env.child();
                for def in defs.iter() {
                    let is_define = def
                        .as_list()
                        .and_then(|d| d.first())
                        .is_some_and(|head| head.is_symbol("define"));
                    if !is_define {
                        return Err(EvalError::malformed(
                            "local",
                            format!("{} is not a define form", self.show(def)),
                        ));
                    }
                    self.eval_in(def, &frame)?;
                }
                self.eval_in(body, &frame)
            }
            _ => Err(EvalError::malformed(
                "local",
                "expected a list of definitions and a body",
            )),
        }
    }

    fn lambda_form(&mut self, items: &[Value], env: &Env) -> Result<Value, EvalError> {
        match items {
            [_, Value::List(param_datums), body] => {
                let params = Self::param_list("lambda", param_datums)?;
                Ok(Value::Closure(Rc::new(Closure {
                    params,
                    body: body.clone(),
                    env: env.clone(),
                })))
            }
            _ => Err(EvalError::malformed(
                "lambda",
                "expected a parameter list and a body",
            )),
        }
    }

    /// A numbered assertion comparing *printed* results. An error inside
    /// either operand becomes part of the report instead of escaping, but
    /// still fails the test.
    fn check_equal_form(&mut self, items: &[Value], env: &Env) -> Result<Value, EvalError> {
        let [_, actual_expr, expected_expr] = items else {
            return Err(EvalError::malformed(
                "check-equal?",
                "expected an actual and an expected expression",
            ));
        };

        self.tests_run += 1;
        let number = self.tests_run;

        let actual = self.eval_in(actual_expr, env);
        let expected = self.eval_in(expected_expr, env);
        let errored = actual.is_err() || expected.is_err();

        let actual_text = match &actual {
            Ok(value) => self.show(value),
            Err(err) => err.to_string(),
        };
        let expected_text = match &expected {
            Ok(value) => self.show(value),
            Err(err) => err.to_string(),
        };

        if !errored && actual_text == expected_text {
            return Ok(Value::Void);
        }

        Err(EvalError::TestFailure(format!(
            "Test {number} Failed\nat (check-equal? {} {})\nactual:   {actual_text}\nexpected: {expected_text}",
            self.show(actual_expr),
            self.show(expected_expr),
        )))
    }
}

impl Default for Interp {
    fn default() -> Self {
        Self::new()
    }
}
