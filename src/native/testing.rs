// ABOUTME: Testing natives: assert_true, assert_equal

use std::rc::Rc;

use crate::env::Environment;
use crate::error::EvalError;
use crate::native::native;
use crate::value::Value;

pub fn register(env: &Rc<Environment>) {
    env.define("assert_true", native("assert_true", builtin_assert_true));
    env.define("assert_equal", native("assert_equal", builtin_assert_equal));
}

fn builtin_assert_true(args: &[Value]) -> Result<Value, EvalError> {
    match args.first() {
        Some(v) if v.is_truthy() => Ok(Value::Boolean(true)),
        Some(v) => Err(EvalError::runtime_error(
            "assert_true",
            format!("expected a truthy value, got {v}"),
        )),
        None => Err(EvalError::arity_error("assert_true", "1", 0)),
    }
}

fn builtin_assert_equal(args: &[Value]) -> Result<Value, EvalError> {
    match args {
        [a, b] => match a.equal(b) {
            Value::Boolean(true) => Ok(Value::Boolean(true)),
            Value::Boolean(false) => Err(EvalError::runtime_error(
                "assert_equal",
                format!("{a} != {b}"),
            )),
            Value::Error(msg) => Err(EvalError::runtime_error("assert_equal", msg)),
            _ => unreachable!("Value::equal always yields Boolean or Error"),
        },
        _ => Err(EvalError::arity_error("assert_equal", "2", args.len())),
    }
}
