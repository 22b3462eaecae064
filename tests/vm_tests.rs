// ABOUTME: Bytecode subset parity between the compiler/VM pipeline and the tree-walker (§8)

use vesper::value::Value;

fn tree_walk(src: &str) -> Value {
    vesper::eval(src).unwrap_or_else(|e| panic!("tree-walk eval failed for {src:?}: {e}"))
}

fn vm(src: &str) -> Value {
    vesper::eval_bytecode(src).unwrap_or_else(|e| panic!("vm eval failed for {src:?}: {e}"))
}

fn assert_parity(src: &str) {
    match (tree_walk(src), vm(src)) {
        (Value::Integer(a), Value::Integer(b)) => assert_eq!(a, b, "mismatch for {src:?}"),
        (Value::Float(a), Value::Float(b)) => assert_eq!(a, b, "mismatch for {src:?}"),
        (Value::Boolean(a), Value::Boolean(b)) => assert_eq!(a, b, "mismatch for {src:?}"),
        (a, b) => panic!("mismatched value kinds for {src:?}: {a} vs {b}"),
    }
}

#[test]
fn test_integer_arithmetic_matches_tree_walker() {
    assert_parity("1 + 2 * 3");
    assert_parity("(1 + 2) * 3");
    assert_parity("10 - 4 / 2");
    assert_parity("7 % 3");
    assert_parity("-5 + 10");
}

#[test]
fn test_float_arithmetic_matches_tree_walker() {
    assert_parity("1.5 + 2.25");
    assert_parity("10.0 / 4.0");
    assert_parity("-2.5 * 2.0");
}

#[test]
fn test_comparisons_match_tree_walker() {
    assert_parity("1 < 2");
    assert_parity("2 <= 2");
    assert_parity("3 > 9");
    assert_parity("3 >= 3");
    assert_parity("3 == 3");
    assert_parity("3 != 4");
}

#[test]
fn test_boolean_literals_match_tree_walker() {
    assert_parity("true");
    assert_parity("false");
    assert_parity("1 == 1");
}

#[test]
fn test_string_literal_round_trips_through_constant_pool() {
    match vm("\"hi\"") {
        Value::String(s) => assert_eq!(&*s, "hi"),
        other => panic!("expected string, got {other}"),
    }
}

#[test]
fn test_vm_division_by_zero_is_reported_as_eval_error() {
    assert!(vesper::eval_bytecode("1 / 0").is_err());
}

#[test]
fn test_vm_rejects_constructs_outside_the_subset() {
    assert!(vesper::eval_bytecode("x = 1").is_err());
    assert!(vesper::eval_bytecode("if true { 1 } else { 2 }").is_err());
    assert!(vesper::eval_bytecode("[1, 2, 3]").is_err());
    assert!(vesper::eval_bytecode("@(x) { x }").is_err());
}

#[test]
fn test_vm_program_result_is_last_expression_statement() {
    match vm("1 + 1\n2 + 2\n3 + 3") {
        Value::Integer(6) => {}
        other => panic!("expected 6, got {other}"),
    }
}
