//! Token-cursor reader.

use rackling_datum::Value;
use rackling_diagnostic::{Diagnostic, ErrorCode, Label};
use rackling_lexer::{Token, TokenKind};

/// The reader: a cursor over the token stream.
pub struct Reader {
    tokens: Vec<Token>,
    pos: usize,
    diagnostics: Vec<Diagnostic>,
}

impl Reader {
    pub fn new(tokens: Vec<Token>) -> Self {
        Self {
            tokens,
            pos: 0,
            diagnostics: Vec::new(),
        }
    }

    pub fn into_diagnostics(self) -> Vec<Diagnostic> {
        self.diagnostics
    }

    /// Read every top-level datum until end of input.
    pub fn read_program(&mut self) -> Vec<Value> {
        let mut datums = Vec::new();
        while !self.at_eof() {
            if let Some(datum) = self.datum() {
                datums.push(datum);
            }
        }
        datums
    }

    fn at_eof(&self) -> bool {
        matches!(self.peek().kind, TokenKind::Eof)
    }

    fn peek(&self) -> &Token {
        &self.tokens[self.pos.min(self.tokens.len() - 1)]
    }

    fn advance(&mut self) -> Token {
        let token = self.peek().clone();
        if self.pos < self.tokens.len() - 1 {
            self.pos += 1;
        }
        token
    }

    /// Read one datum. Returns `None` when the next token cannot start a
    /// datum (the error is recorded and the token skipped).
    fn datum(&mut self) -> Option<Value> {
        let token = self.advance();
        match token.kind {
            TokenKind::Number(n) => Some(Value::Number(n)),
            TokenKind::Bool(b) => Some(Value::Bool(b)),
            TokenKind::Str(s) => Some(Value::text(&s)),
            TokenKind::Symbol(s) => Some(Value::symbol(&s)),
            TokenKind::Dot => Some(Value::symbol(".")),

            TokenKind::LParen | TokenKind::LBracket => {
                self.list(&token, Vec::new())
            }
            TokenKind::HashParen => {
                // `#(a b)` reads as the head-tagged form `(vector a b)`.
                self.list(&token, vec![Value::symbol("vector")])
            }

            TokenKind::Quote => self.quoted(&token, "quote"),
            TokenKind::Quasiquote => self.quoted(&token, "quasiquote"),
            TokenKind::Unquote => self.quoted(&token, "unquote"),

            TokenKind::RParen | TokenKind::RBracket => {
                self.diagnostics.push(
                    Diagnostic::error(
                        ErrorCode::UnexpectedCloseParen,
                        token.span,
                        "closing delimiter with no open list",
                    )
                    .with_label(Label::new(token.span, "nothing to close")),
                );
                None
            }
            TokenKind::Eof => None,
        }
    }

    /// Read list elements up to the closer matching `opener`.
    fn list(&mut self, opener: &Token, mut items: Vec<Value>) -> Option<Value> {
        loop {
            let next = self.peek().clone();
            match next.kind {
                TokenKind::Eof => {
                    self.diagnostics.push(
                        Diagnostic::error(ErrorCode::UnclosedList, opener.span, "list is not closed")
                            .with_label(Label::new(opener.span, "opened here"))
                            .with_help("add `)` to close the list"),
                    );
                    return None;
                }
                TokenKind::RParen | TokenKind::RBracket => {
                    self.advance();
                    self.check_delimiter_match(opener, &next);
                    return Some(Value::list(items));
                }
                _ => {
                    if let Some(datum) = self.datum() {
                        items.push(datum);
                    }
                }
            }
        }
    }

    /// `(` closes with `)`, `[` with `]`; `#(` closes with `)`.
    fn check_delimiter_match(&mut self, opener: &Token, closer: &Token) {
        let matched = matches!(
            (&opener.kind, &closer.kind),
            (TokenKind::LParen, TokenKind::RParen)
                | (TokenKind::HashParen, TokenKind::RParen)
                | (TokenKind::LBracket, TokenKind::RBracket)
        );
        if !matched {
            let span = opener.span.merge(closer.span);
            self.diagnostics.push(
                Diagnostic::error(
                    ErrorCode::MismatchedBracket,
                    span,
                    "closing delimiter does not match the opening one",
                )
                .with_label(Label::new(opener.span, "opened here"))
                .with_label(Label::new(closer.span, "closed here"))
                .with_help("`(` must be closed by `)` and `[` by `]`"),
            );
        }
    }

    /// `'x` and friends expand to a two-element head-tagged list.
    fn quoted(&mut self, mark: &Token, head: &str) -> Option<Value> {
        if self.at_eof() {
            self.diagnostics.push(
                Diagnostic::error(
                    ErrorCode::DanglingQuote,
                    mark.span,
                    "quote mark with nothing to quote",
                )
                .with_label(Label::new(mark.span, "expected a datum after this")),
            );
            return None;
        }
        let datum = self.datum()?;
        Some(Value::list(vec![Value::symbol(head), datum]))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rackling_lexer::Lexer;

    fn read_ok(source: &str) -> Vec<Value> {
        let (tokens, lex_diags) = Lexer::new(source).tokenize();
        assert!(lex_diags.is_empty(), "lex errors in {source:?}");
        let mut reader = Reader::new(tokens);
        let datums = reader.read_program();
        assert!(reader.diagnostics.is_empty(), "read errors in {source:?}");
        datums
    }

    fn read_err(source: &str) -> Vec<Diagnostic> {
        let (tokens, _) = Lexer::new(source).tokenize();
        let mut reader = Reader::new(tokens);
        reader.read_program();
        reader.diagnostics
    }

    #[test]
    fn nested_lists() {
        let datums = read_ok("(1 2 (3 4))");
        assert_eq!(datums.len(), 1);
        assert_eq!(
            datums[0],
            Value::list(vec![
                Value::Number(1.0),
                Value::Number(2.0),
                Value::list(vec![Value::Number(3.0), Value::Number(4.0)]),
            ])
        );
    }

    #[test]
    fn quote_sugar_expands() {
        let datums = read_ok("'x `(a ,b)");
        assert_eq!(datums[0], Value::list(vec![Value::symbol("quote"), Value::symbol("x")]));
        assert_eq!(
            datums[1],
            Value::list(vec![
                Value::symbol("quasiquote"),
                Value::list(vec![
                    Value::symbol("a"),
                    Value::list(vec![Value::symbol("unquote"), Value::symbol("b")]),
                ]),
            ])
        );
    }

    #[test]
    fn vector_literal_is_head_tagged() {
        let datums = read_ok("#(1 2)");
        assert_eq!(
            datums[0],
            Value::list(vec![Value::symbol("vector"), Value::Number(1.0), Value::Number(2.0)])
        );
    }

    #[test]
    fn brackets_interchange_but_must_match() {
        let datums = read_ok("[cond [(= 1 2) 'a]]");
        assert_eq!(datums.len(), 1);
        assert!(!read_err("(1 2]").is_empty());
    }

    #[test]
    fn structural_errors_are_reported() {
        assert!(!read_err("(1 2").is_empty());
        assert!(!read_err(")").is_empty());
        assert!(!read_err("'").is_empty());
    }
}
