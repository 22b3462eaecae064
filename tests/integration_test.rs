// ABOUTME: End-to-end scenarios exercising the full lex/parse/eval pipeline (spec §8)

use vesper::value::Value;

fn run(src: &str) -> Value {
    vesper::eval(src).unwrap_or_else(|e| panic!("eval failed for {src:?}: {e}"))
}

#[test]
fn test_empty_source_returns_null() {
    assert!(matches!(run(""), Value::Null));
}

#[test]
fn test_arithmetic_precedence() {
    match run("1 + 2 * 3") {
        Value::Integer(7) => {}
        other => panic!("expected 7, got {other}"),
    }
}

#[test]
fn test_closures_and_nested_calls() {
    let src = "add = @(x, y) { x + y }\nadd(add(1,2), add(3,4))";
    match run(src) {
        Value::Integer(10) => {}
        other => panic!("expected 10, got {other}"),
    }
}

#[test]
fn test_map_pipeline_squares_each_element() {
    let src = "xs = [1,2,3,4]\nxs -> @(x){ x*x } {}";
    match run(src) {
        Value::List(items) => {
            let nums: Vec<i64> = items
                .borrow()
                .iter()
                .map(|v| match v {
                    Value::Integer(n) => *n,
                    _ => panic!("expected integer"),
                })
                .collect();
            assert_eq!(nums, vec![1, 4, 9, 16]);
        }
        other => panic!("expected list, got {other}"),
    }
}

#[test]
fn test_filter_pipeline_keeps_evens() {
    let src = "xs = [1,2,3,4]\nxs >- @(x){ x % 2 == 0 } {}";
    match run(src) {
        Value::List(items) => {
            let nums: Vec<i64> = items
                .borrow()
                .iter()
                .map(|v| match v {
                    Value::Integer(n) => *n,
                    _ => panic!("expected integer"),
                })
                .collect();
            assert_eq!(nums, vec![2, 4]);
        }
        other => panic!("expected list, got {other}"),
    }
}

#[test]
fn test_pipe_composition_matches_function_composition() {
    let double = "double = @(x) { x * 2 }";
    let inc = "inc = @(x) { x + 1 }";
    let direct = run(&format!("{double}\n{inc}\ninc(double(5))"));
    let piped = run(&format!("{double}\n{inc}\n5 |> double {{}} |> inc {{}}"));
    match (direct, piped) {
        (Value::Integer(a), Value::Integer(b)) => assert_eq!(a, b),
        _ => panic!("expected matching integers"),
    }
}

#[test]
fn test_iter_over_list_accumulates_in_current_scope() {
    let src = "total = 0\niter [1,2,3] as i { total = total + i }\ntotal";
    match run(src) {
        Value::Integer(6) => {}
        other => panic!("expected 6, got {other}"),
    }
}

#[test]
fn test_class_construction_and_method_call() {
    let src = r#"
Point = class()
Point.init = @(self, x, y) { self.x = x  self.y = y }
Point.sum  = @(self) { self.x + self.y }
p = Point(3, 4)
p.sum()
"#;
    match run(src) {
        Value::Integer(7) => {}
        other => panic!("expected 7, got {other}"),
    }
}

#[test]
fn test_ternary_and_logical_operators() {
    match run("1 < 2 ? 10 : 20") {
        Value::Integer(10) => {}
        other => panic!("expected 10, got {other}"),
    }
    assert!(matches!(run("false && (1/0 == 0)"), Value::Boolean(false)));
    assert!(matches!(run("true || (1/0 == 0)"), Value::Boolean(true)));
}

#[test]
fn test_if_else_if_chain() {
    let src = "x = 2\nif x == 1 { \"one\" } else if x == 2 { \"two\" } else { \"other\" }";
    match run(src) {
        Value::String(s) => assert_eq!(&*s, "two"),
        other => panic!("expected string, got {other}"),
    }
}

#[test]
fn test_string_and_list_indexing() {
    assert!(matches!(run(r#""ab"[1]"#), Value::String(s) if &*s == "b"));
    assert!(matches!(run("[10, 20, 30][2]"), Value::Integer(30)));
}

#[test]
fn test_empty_list_index_is_a_fatal_error() {
    assert!(vesper::eval("[][0]").is_err());
}

#[test]
fn test_string_index_at_len_is_fatal() {
    assert!(vesper::eval(r#""ab"[2]"#).is_err());
}

#[test]
fn test_division_by_zero_is_fatal() {
    assert!(vesper::eval("1 / 0").is_err());
}

#[test]
fn test_unsupported_operator_yields_recoverable_error_value_not_a_fatal_error() {
    match run("true < false") {
        Value::Error(_) => {}
        other => panic!("expected Error value, got {other}"),
    }
}

#[test]
fn test_list_concatenation() {
    match run("[1, 2] + [3, 4]") {
        Value::List(items) => assert_eq!(items.borrow().len(), 4),
        other => panic!("expected list, got {other}"),
    }
}

#[test]
fn test_native_collection_helpers() {
    assert!(matches!(run("len([1,2,3])"), Value::Integer(3)));
    assert!(matches!(run("len(\"hello\")"), Value::Integer(5)));
    match run("reverse([1,2,3])") {
        Value::List(items) => {
            let nums: Vec<i64> = items
                .borrow()
                .iter()
                .map(|v| match v {
                    Value::Integer(n) => *n,
                    _ => unreachable!(),
                })
                .collect();
            assert_eq!(nums, vec![3, 2, 1]);
        }
        other => panic!("expected list, got {other}"),
    }
    match run("range_list(0, 3)") {
        Value::List(items) => assert_eq!(items.borrow().len(), 3),
        other => panic!("expected list, got {other}"),
    }
}

#[test]
fn test_reduce_sums_a_list() {
    match run("reduce([1,2,3,4], @(acc, x) { acc + x }, 0)") {
        Value::Integer(10) => {}
        other => panic!("expected 10, got {other}"),
    }
}

#[test]
fn test_math_module_via_import() {
    match run("m = import(\"math\")\nm.sqrt(4.0)") {
        Value::Float(x) => assert_eq!(x, 2.0),
        other => panic!("expected 2.0, got {other}"),
    }
}

#[test]
fn test_class_inheritance_via_parents() {
    let src = r#"
Animal = class()
Animal.speak = @(self) { "..." }
Dog = class(Animal)
Dog.speak = @(self) { "woof" }
Cat = class(Animal)
d = Dog()
c = Cat()
d.speak() + " " + c.speak()
"#;
    match run(src) {
        Value::String(s) => assert_eq!(&*s, "woof ..."),
        other => panic!("expected string, got {other}"),
    }
}

#[test]
fn test_eval_is_deterministic_for_pure_programs() {
    let src = "xs = [1,2,3]\nxs -> @(x) { x + 1 } {}";
    let a = run(src);
    let b = run(src);
    match (a, b) {
        (Value::List(a), Value::List(b)) => assert_eq!(a.borrow().len(), b.borrow().len()),
        _ => panic!("expected lists"),
    }
}
