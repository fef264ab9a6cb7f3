//! Integration tests for the logic engine.
//!
//! Every test bootstraps the relation library into a fresh session, the
//! same way `--logic` does, then runs queries through the ordinary
//! evaluator surface.

use rackling_eval::{evaluate_with, print, EvalOptions, ListStyle, Value};

fn logic_eval(source: &str) -> Value {
    evaluate_with(
        source,
        EvalOptions {
            env: None,
            logic: true,
        },
    )
    .unwrap_or_else(|e| panic!("eval of {source:?} failed: {e}"))
}

fn logic_shown(source: &str) -> String {
    print(&logic_eval(source), ListStyle::Parens)
}

// ============================================================================
// Unification
// ============================================================================

#[test]
fn test_simple_query() {
    assert_eq!(logic_shown("(run* (q) (== q 5))"), "(5)");
}

#[test]
fn test_unification_is_bidirectional() {
    assert_eq!(logic_shown("(run* (q) (== 'olive q))"), "(olive)");
}

#[test]
fn test_failed_unification_is_an_empty_stream() {
    assert_eq!(logic_shown("(run* (q) (== 1 2))"), "()");
}

#[test]
fn test_text_and_symbol_never_unify() {
    assert_eq!(logic_shown("(run* (q) (== \"a\" 'a))"), "()");
}

#[test]
fn test_unify_failure_is_the_false_sentinel_not_an_error() {
    // Failure inside the engine is data: unify returns #f.
    assert_eq!(
        logic_eval("(unify 1 2 empty-s)"),
        Value::Bool(false)
    );
}

#[test]
fn test_occurs_check_rejects_circular_bindings() {
    // Unifying a variable with a term containing it fails outright.
    assert_eq!(
        logic_eval("(let ([v (var 'v)]) (unify v (cons 1 v) empty-s))"),
        Value::Bool(false)
    );
    assert_eq!(
        logic_shown("(run* (q) (fresh (x) (== x (cons 1 x)) (== q x)))"),
        "()"
    );
}

#[test]
fn test_unification_descends_into_pairs() {
    assert_eq!(
        logic_shown("(run* (q) (== (cons q '(2 3)) '(1 2 3)))"),
        "(1)"
    );
}

// ============================================================================
// Streams and fairness
// ============================================================================

#[test]
fn test_run_n_truncates() {
    assert_eq!(logic_shown("(run 3 (q) ((alwayso)))"), "(_0 _0 _0)");
}

#[test]
fn test_fairness_with_an_infinite_disjunct() {
    // One infinite-solution branch, one immediately-failing branch: run 5
    // still produces 5 answers without hanging, either way around.
    assert_eq!(logic_shown("(run 5 (q) (disj2 ((alwayso)) fail))"), "(_0 _0 _0 _0 _0)");
    assert_eq!(logic_shown("(run 5 (q) (disj2 fail ((alwayso))))"), "(_0 _0 _0 _0 _0)");
}

#[test]
fn test_productive_branch_survives_a_never_productive_one() {
    // nevero suspends forever without ever producing a solution;
    // append-inf's operand swap still lets the other branch through.
    assert_eq!(logic_shown("(run 1 (q) (disj2 ((nevero)) (== q 1)))"), "(1)");
}

// ============================================================================
// Goal combinators
// ============================================================================

#[test]
fn test_conde_collects_all_clauses() {
    assert_eq!(
        logic_shown("(run* (q) (conde [(== q 'a)] [(== q 'b)] [(== q 'c)]))"),
        "(a b c)"
    );
}

#[test]
fn test_conj_threads_constraints() {
    assert_eq!(
        logic_shown("(run* (q) (fresh (x y) (== x 1) (== y 2) (== q (list x y))))"),
        "((1 2))"
    );
    assert_eq!(
        logic_shown("(run* (q) (conj (== q 1) (== q 2)))"),
        "()"
    );
}

#[test]
fn test_empty_conj_and_disj() {
    // Zero-argument conj is vacuously true, disj vacuously false.
    assert_eq!(logic_shown("(run* (q) (conj))"), "(_0)");
    assert_eq!(logic_shown("(run* (q) (disj))"), "()");
}

#[test]
fn test_ifte_soft_cut() {
    assert_eq!(logic_shown("(run* (q) (ifte succeed (== q 1) (== q 2)))"), "(1)");
    assert_eq!(logic_shown("(run* (q) (ifte fail (== q 1) (== q 2)))"), "(2)");
    // The then-goal runs across g1's whole stream.
    assert_eq!(
        logic_shown("(run* (q) (ifte (disj2 (== q 1) (== q 2)) succeed fail))"),
        "(1 2)"
    );
}

#[test]
fn test_once_truncates_to_one_solution() {
    assert_eq!(
        logic_shown("(run* (q) (once (disj2 (== q 1) (== q 2))))"),
        "(1)"
    );
}

#[test]
fn test_conda_commits_to_the_first_succeeding_clause() {
    assert_eq!(
        logic_shown("(run* (q) (conda [(== q 1) succeed] [(== q 2) succeed]))"),
        "(1)"
    );
    assert_eq!(
        logic_shown("(run* (q) (conda [fail succeed] [(== q 2) succeed]))"),
        "(2)"
    );
}

#[test]
fn test_condu_truncates_the_committed_head() {
    assert_eq!(
        logic_shown("(run* (q) (condu [((alwayso)) (== q 1)]))"),
        "(1)"
    );
}

// ============================================================================
// fresh and reification
// ============================================================================

#[test]
fn test_unbound_query_reifies_to_underscore_names() {
    assert_eq!(logic_shown("(run 1 (q) succeed)"), "(_0)");
}

#[test]
fn test_reified_names_are_per_answer_and_first_encounter_ordered() {
    assert_eq!(logic_shown("(run* (q w) succeed)"), "((_0 _1))");
    assert_eq!(
        logic_shown("(run* (q) (fresh (x y) (== q (list x y x))))"),
        "((_0 _1 _0))"
    );
    // Two answers each restart the numbering.
    assert_eq!(
        logic_shown("(run* (q) (fresh (x) (conde [(== q (list x 1))] [(== q (list x 2))])))"),
        "((_0 1) (_0 2))"
    );
}

#[test]
fn test_reifying_a_dotted_pair() {
    assert_eq!(
        logic_shown("(run* (q) (fresh (x y) (== q (cons x y))))"),
        "((_0 . _1))"
    );
}

#[test]
fn test_fresh_variables_are_distinct() {
    assert_eq!(
        logic_shown("(run* (q) (fresh (x y) (== x 1) (== q y)))"),
        "(_0)"
    );
}

// ============================================================================
// Relations
// ============================================================================

#[test]
fn test_defrel_defines_callable_relations() {
    assert_eq!(
        logic_shown(
            "(defrel (teacupo t) (disj2 (== t 'tea) (== t 'cup)))
             (run* (q) (teacupo q))"
        ),
        "(tea cup)"
    );
    assert_eq!(
        logic_shown(
            "(defrel (teacupo t) (disj2 (== t 'tea) (== t 'cup)))
             (run 1 (q) (teacupo q))"
        ),
        "(tea)"
    );
}

#[test]
fn test_caro_and_cdro() {
    assert_eq!(logic_shown("(run* (q) (caro '(a c o r n) q))"), "(a)");
    assert_eq!(logic_shown("(run* (q) (cdro '(a c o r n) q))"), "((c o r n))");
    assert_eq!(logic_shown("(run* (q) (conso 1 '(2 3) q))"), "((1 2 3))");
}

#[test]
fn test_appendo_forward() {
    assert_eq!(
        logic_shown("(run* (q) (appendo '(1 2) '(3) q))"),
        "((1 2 3))"
    );
}

#[test]
fn test_appendo_backward_enumerates_splits() {
    assert_eq!(
        logic_shown("(run* (q w) (appendo q w '(1 2)))"),
        "((() (1 2)) ((1) (2)) ((1 2) ()))"
    );
}

#[test]
fn test_recursive_relation_under_run_n() {
    // The suspension wrapping in defrel is what keeps this from eagerly
    // expanding forever.
    assert_eq!(
        logic_shown("(run 3 (q) (fresh (t) (appendo q t '(1 2 3 4))))"),
        "(() (1) (1 2))"
    );
}
