//! Integration tests for the rackling reader.

use rackling_datum::{print, ListStyle, Value};
use rackling_reader::read;

fn read_ok(source: &str) -> Vec<Value> {
    let (datums, diagnostics) = read(source);
    assert!(diagnostics.is_empty(), "read errors in {source:?}: {diagnostics:?}");
    datums
}

fn shown_datums(source: &str) -> Vec<String> {
    read_ok(source)
        .iter()
        .map(|d| print(d, ListStyle::Parens))
        .collect()
}

#[test]
fn test_a_program_is_a_sequence_of_datums() {
    assert_eq!(
        shown_datums("(define x 1) x"),
        vec!["(define x 1)".to_string(), "x".to_string()]
    );
}

#[test]
fn test_quote_sugar_round_trips_through_print() {
    assert_eq!(shown_datums("'(1 2)"), vec!["(quote (1 2))".to_string()]);
    assert_eq!(
        shown_datums("`(a ,b)"),
        vec!["(quasiquote (a (unquote b)))".to_string()]
    );
}

#[test]
fn test_vector_marker_distinguishes_vectors_from_lists() {
    assert_eq!(shown_datums("#(1 2)"), vec!["(vector 1 2)".to_string()]);
}

#[test]
fn test_dotted_tail_survives_reading() {
    assert_eq!(shown_datums("(1 . 2)"), vec!["(1 . 2)".to_string()]);
}

#[test]
fn test_brackets_and_parens_nest_freely() {
    assert_eq!(
        shown_datums("(cond [(= 1 2) 'a] [else 'b])"),
        vec!["(cond ((= 1 2) (quote a)) (else (quote b)))".to_string()]
    );
}

#[test]
fn test_structural_errors() {
    for bad in ["(1 2", ")", "(1 2]", "'", "(fn [x) y])"] {
        let (_, diagnostics) = read(bad);
        assert!(!diagnostics.is_empty(), "{bad:?} should not read cleanly");
    }
}
