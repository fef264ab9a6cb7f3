//! Integration tests for the rackling lexer.

use rackling_lexer::{Lexer, TokenKind};

fn lex(source: &str) -> Vec<TokenKind> {
    let lexer = Lexer::new(source);
    let (tokens, diagnostics) = lexer.tokenize();
    assert!(diagnostics.is_empty(), "lex errors in {source:?}");
    tokens.into_iter().map(|t| t.kind).collect()
}

fn lex_with_errors(source: &str) -> (Vec<TokenKind>, usize) {
    let lexer = Lexer::new(source);
    let (tokens, diagnostics) = lexer.tokenize();
    (tokens.into_iter().map(|t| t.kind).collect(), diagnostics.len())
}

#[test]
fn test_delimiters_and_atoms() {
    assert_eq!(
        lex("(add1 2.5)"),
        vec![
            TokenKind::LParen,
            TokenKind::Symbol("add1".to_string()),
            TokenKind::Number(2.5),
            TokenKind::RParen,
            TokenKind::Eof,
        ]
    );
}

#[test]
fn test_brackets_are_distinct_tokens() {
    assert_eq!(
        lex("[x]"),
        vec![
            TokenKind::LBracket,
            TokenKind::Symbol("x".to_string()),
            TokenKind::RBracket,
            TokenKind::Eof,
        ]
    );
}

#[test]
fn test_quote_marks() {
    assert_eq!(
        lex("'a `b ,c"),
        vec![
            TokenKind::Quote,
            TokenKind::Symbol("a".to_string()),
            TokenKind::Quasiquote,
            TokenKind::Symbol("b".to_string()),
            TokenKind::Unquote,
            TokenKind::Symbol("c".to_string()),
            TokenKind::Eof,
        ]
    );
}

#[test]
fn test_booleans_and_vector_opener() {
    assert_eq!(
        lex("#t #f true false #("),
        vec![
            TokenKind::Bool(true),
            TokenKind::Bool(false),
            TokenKind::Bool(true),
            TokenKind::Bool(false),
            TokenKind::HashParen,
            TokenKind::Eof,
        ]
    );
}

#[test]
fn test_numbers_signs_and_symbols() {
    assert_eq!(
        lex("-3 +4 1e3 - sub1 string->symbol point=?"),
        vec![
            TokenKind::Number(-3.0),
            TokenKind::Number(4.0),
            TokenKind::Number(1000.0),
            TokenKind::Symbol("-".to_string()),
            TokenKind::Symbol("sub1".to_string()),
            TokenKind::Symbol("string->symbol".to_string()),
            TokenKind::Symbol("point=?".to_string()),
            TokenKind::Eof,
        ]
    );
}

#[test]
fn test_dot_is_its_own_token() {
    assert_eq!(
        lex("(1 . 2)"),
        vec![
            TokenKind::LParen,
            TokenKind::Number(1.0),
            TokenKind::Dot,
            TokenKind::Number(2.0),
            TokenKind::RParen,
            TokenKind::Eof,
        ]
    );
}

#[test]
fn test_strings_with_escapes() {
    assert_eq!(
        lex(r#""hi \"there\"\n""#),
        vec![TokenKind::Str("hi \"there\"\n".to_string()), TokenKind::Eof]
    );
}

#[test]
fn test_line_comments_are_skipped() {
    assert_eq!(
        lex("1 ; the rest of this line vanishes (even parens\n2"),
        vec![TokenKind::Number(1.0), TokenKind::Number(2.0), TokenKind::Eof]
    );
}

#[test]
fn test_unterminated_string_is_reported() {
    let (tokens, errors) = lex_with_errors("\"oops");
    assert_eq!(errors, 1);
    // The lexer still produces a token so the reader can continue.
    assert_eq!(tokens[0], TokenKind::Str("oops".to_string()));
}

#[test]
fn test_spans_index_back_into_the_source() {
    let source = "(foo 42)";
    let (tokens, _) = Lexer::new(source).tokenize();
    assert_eq!(&source[tokens[1].span.range()], "foo");
    assert_eq!(&source[tokens[2].span.range()], "42");
}
