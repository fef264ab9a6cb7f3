//! The rackling lexer.
//!
//! Converts source text into a sequence of spanned tokens. The grammar is
//! the usual s-expression surface: delimiters, quote marks, string and
//! number literals, and symbol atoms, with `;` line comments.

use crate::token::{Token, TokenKind};
use rackling_common::Span;
use rackling_diagnostic::{Diagnostic, ErrorCode, Label};

/// The rackling lexer.
pub struct Lexer<'src> {
    /// Character iterator with position info
    chars: std::iter::Peekable<std::str::CharIndices<'src>>,
    /// Current position in source
    pos: usize,
    /// Collected diagnostics
    diagnostics: Vec<Diagnostic>,
}

/// Characters that end an atom.
fn is_atom_terminator(ch: char) -> bool {
    ch.is_whitespace() || matches!(ch, '(' | ')' | '[' | ']' | '\'' | '`' | ',' | '"' | ';')
}

impl<'src> Lexer<'src> {
    /// Create a new lexer for the given source text.
    pub fn new(source: &'src str) -> Self {
        Self {
            chars: source.char_indices().peekable(),
            pos: 0,
            diagnostics: Vec::new(),
        }
    }

    /// Tokenize the entire source and return tokens and diagnostics.
    pub fn tokenize(mut self) -> (Vec<Token>, Vec<Diagnostic>) {
        let mut tokens = Vec::new();

        loop {
            let token = self.next_token();
            let is_eof = token.kind == TokenKind::Eof;
            tokens.push(token);
            if is_eof {
                break;
            }
        }

        (tokens, self.diagnostics)
    }

    fn advance(&mut self) -> Option<(usize, char)> {
        let next = self.chars.next();
        if let Some((pos, ch)) = next {
            self.pos = pos + ch.len_utf8();
        }
        next
    }

    fn peek(&mut self) -> Option<char> {
        self.chars.peek().map(|&(_, ch)| ch)
    }

    /// Skip whitespace and `;` line comments.
    fn skip_trivia(&mut self) {
        while let Some(ch) = self.peek() {
            if ch.is_whitespace() {
                self.advance();
            } else if ch == ';' {
                while let Some(ch) = self.peek() {
                    if ch == '\n' {
                        break;
                    }
                    self.advance();
                }
            } else {
                break;
            }
        }
    }

    /// Get the next token.
    fn next_token(&mut self) -> Token {
        self.skip_trivia();

        let start = self.pos;

        let Some((_pos, ch)) = self.advance() else {
            return Token::new(TokenKind::Eof, Span::from_usize(start, start));
        };

        let kind = match ch {
            '(' => TokenKind::LParen,
            ')' => TokenKind::RParen,
            '[' => TokenKind::LBracket,
            ']' => TokenKind::RBracket,
            '\'' => TokenKind::Quote,
            '`' => TokenKind::Quasiquote,
            ',' => TokenKind::Unquote,
            '"' => self.string(start),
            '#' => self.hash(start),
            _ => self.atom(ch),
        };

        Token::new(kind, Span::from_usize(start, self.pos))
    }

    /// Lex a string literal. The opening `"` has already been consumed.
    fn string(&mut self, start: usize) -> TokenKind {
        let mut text = String::new();

        loop {
            match self.advance() {
                Some((_, '"')) => return TokenKind::Str(text),
                Some((pos, '\\')) => match self.advance() {
                    Some((_, 'n')) => text.push('\n'),
                    Some((_, 't')) => text.push('\t'),
                    Some((_, 'r')) => text.push('\r'),
                    Some((_, '\\')) => text.push('\\'),
                    Some((_, '"')) => text.push('"'),
                    Some((end, other)) => {
                        let span = Span::from_usize(pos, end + other.len_utf8());
                        self.diagnostics.push(
                            Diagnostic::error(
                                ErrorCode::InvalidEscape,
                                span,
                                format!("unknown escape sequence `\\{other}`"),
                            )
                            .with_label(Label::new(span, "not a recognized escape")),
                        );
                        text.push(other);
                    }
                    None => break,
                },
                Some((_, ch)) => text.push(ch),
                None => break,
            }
        }

        // Ran off the end of the source inside the literal.
        let span = Span::from_usize(start, self.pos);
        self.diagnostics.push(
            Diagnostic::error(
                ErrorCode::UnterminatedString,
                span,
                "unterminated string literal",
            )
            .with_label(Label::new(span, "string starts here"))
            .with_help("add a closing quote `\"` to terminate the string"),
        );
        TokenKind::Str(text)
    }

    /// Lex a `#`-prefixed token: `#(`, `#t`, `#f`, `#true`, `#false`.
    fn hash(&mut self, start: usize) -> TokenKind {
        if self.peek() == Some('(') {
            self.advance();
            return TokenKind::HashParen;
        }

        let word = self.take_atom_text();
        match word.as_str() {
            "t" | "true" => TokenKind::Bool(true),
            "f" | "false" => TokenKind::Bool(false),
            _ => {
                let span = Span::from_usize(start, self.pos);
                self.diagnostics.push(
                    Diagnostic::error(
                        ErrorCode::UnexpectedCharacter,
                        span,
                        format!("unknown `#` syntax `#{word}`"),
                    )
                    .with_label(Label::new(span, "expected #t, #f, or #(")),
                );
                TokenKind::Symbol(format!("#{word}"))
            }
        }
    }

    /// Lex a bare atom: number, boolean word, dot, or symbol.
    ///
    /// `first` is the character `next_token` already consumed.
    fn atom(&mut self, first: char) -> TokenKind {
        let mut text = String::from(first);
        text.push_str(&self.take_atom_text());

        match text.as_str() {
            "." => TokenKind::Dot,
            "true" => TokenKind::Bool(true),
            "false" => TokenKind::Bool(false),
            _ => match text.parse::<f64>() {
                // `parse::<f64>` accepts forms like "inf" and "nan" that
                // should stay symbols; restrict to digit-bearing atoms.
                Ok(n) if text.bytes().any(|b| b.is_ascii_digit()) => TokenKind::Number(n),
                _ => TokenKind::Symbol(text),
            },
        }
    }

    /// Consume characters up to the next atom terminator.
    fn take_atom_text(&mut self) -> String {
        let mut text = String::new();
        while let Some(ch) = self.peek() {
            if is_atom_terminator(ch) {
                break;
            }
            text.push(ch);
            self.advance();
        }
        text
    }
}
