// ABOUTME: Math natives: trig/exp/log functions plus PI and E constants

use std::rc::Rc;

use crate::env::Environment;
use crate::error::EvalError;
use crate::native::native;
use crate::value::Value;

pub fn register(env: &Rc<Environment>) {
    env.define("sqrt", native("sqrt", |a| unary("sqrt", a, f64::sqrt)));
    env.define("abs", native("abs", builtin_abs));
    env.define("sin", native("sin", |a| unary("sin", a, f64::sin)));
    env.define("cos", native("cos", |a| unary("cos", a, f64::cos)));
    env.define("tan", native("tan", |a| unary("tan", a, f64::tan)));
    env.define("asin", native("asin", |a| unary("asin", a, f64::asin)));
    env.define("acos", native("acos", |a| unary("acos", a, f64::acos)));
    env.define("atan", native("atan", |a| unary("atan", a, f64::atan)));
    env.define("exp", native("exp", |a| unary("exp", a, f64::exp)));
    env.define("log", native("log", |a| unary("log", a, f64::ln)));
    env.define("log2", native("log2", |a| unary("log2", a, f64::log2)));
    env.define("log10", native("log10", |a| unary("log10", a, f64::log10)));

    env.define("PI", Value::Float(std::f64::consts::PI));
    env.define("E", Value::Float(std::f64::consts::E));
}

fn as_f64(name: &str, v: &Value) -> Result<f64, EvalError> {
    match v {
        Value::Integer(n) => Ok(*n as f64),
        Value::Float(x) => Ok(*x),
        other => Err(EvalError::type_error(name, "Integer or Float", other, 0)),
    }
}

fn unary(name: &str, args: &[Value], f: impl Fn(f64) -> f64) -> Result<Value, EvalError> {
    match args.first() {
        Some(v) => Ok(Value::Float(f(as_f64(name, v)?))),
        None => Err(EvalError::arity_error(name, "1", 0)),
    }
}

fn builtin_abs(args: &[Value]) -> Result<Value, EvalError> {
    match args.first() {
        Some(Value::Integer(n)) => Ok(Value::Integer(n.abs())),
        Some(Value::Float(x)) => Ok(Value::Float(x.abs())),
        Some(other) => Err(EvalError::type_error("abs", "Integer or Float", other, 0)),
        None => Err(EvalError::arity_error("abs", "1", 0)),
    }
}
