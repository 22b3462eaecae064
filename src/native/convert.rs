// ABOUTME: Conversion natives: int, float

use std::rc::Rc;

use crate::env::Environment;
use crate::error::EvalError;
use crate::native::native;
use crate::value::Value;

pub fn register(env: &Rc<Environment>) {
    env.define("int", native("int", builtin_int));
    env.define("float", native("float", builtin_float));
}

fn builtin_int(args: &[Value]) -> Result<Value, EvalError> {
    match args.first() {
        Some(Value::Integer(n)) => Ok(Value::Integer(*n)),
        Some(Value::Float(x)) => Ok(Value::Integer(*x as i64)),
        Some(Value::String(s)) => s
            .trim()
            .parse::<i64>()
            .map(Value::Integer)
            .map_err(|_| EvalError::runtime_error("int", format!("cannot parse '{s}' as Integer"))),
        Some(other) => Err(EvalError::type_error("int", "Integer, Float, or String", other, 0)),
        None => Err(EvalError::arity_error("int", "1", 0)),
    }
}

fn builtin_float(args: &[Value]) -> Result<Value, EvalError> {
    match args.first() {
        Some(Value::Integer(n)) => Ok(Value::Float(*n as f64)),
        Some(Value::Float(x)) => Ok(Value::Float(*x)),
        Some(Value::String(s)) => s
            .trim()
            .parse::<f64>()
            .map(Value::Float)
            .map_err(|_| EvalError::runtime_error("float", format!("cannot parse '{s}' as Float"))),
        Some(other) => Err(EvalError::type_error("float", "Integer, Float, or String", other, 0)),
        None => Err(EvalError::arity_error("float", "1", 0)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_int_from_string() {
        assert!(matches!(
            builtin_int(&[Value::string("42")]),
            Ok(Value::Integer(42))
        ));
    }

    #[test]
    fn test_int_parse_failure_is_fatal() {
        assert!(builtin_int(&[Value::string("nope")]).is_err());
    }

    #[test]
    fn test_float_from_int() {
        assert!(matches!(builtin_float(&[Value::Integer(3)]), Ok(Value::Float(x)) if x == 3.0));
    }
}
