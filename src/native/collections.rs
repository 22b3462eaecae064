// ABOUTME: Collection natives: len, append, reverse, zip, filter, reduce, range_list

use std::rc::Rc;

use crate::env::Environment;
use crate::error::EvalError;
use crate::eval::call_value;
use crate::native::native;
use crate::value::Value;

pub fn register(env: &Rc<Environment>) {
    env.define("len", native("len", builtin_len));
    env.define("append", native("append", builtin_append));
    env.define("reverse", native("reverse", builtin_reverse));
    env.define("zip", native("zip", builtin_zip));
    env.define("filter", native("filter", builtin_filter));
    env.define("reduce", native("reduce", builtin_reduce));
    env.define("range_list", native("range_list", builtin_range_list));
}

fn builtin_len(args: &[Value]) -> Result<Value, EvalError> {
    match args.first() {
        Some(Value::List(items)) => Ok(Value::Integer(items.borrow().len() as i64)),
        Some(Value::String(s)) => Ok(Value::Integer(s.len() as i64)),
        Some(other) => Err(EvalError::type_error("len", "List or String", other, 0)),
        None => Err(EvalError::arity_error("len", "1", 0)),
    }
}

fn builtin_append(args: &[Value]) -> Result<Value, EvalError> {
    match args {
        [Value::List(items), value] => {
            items.borrow_mut().push(value.clone());
            Ok(Value::List(items.clone()))
        }
        [other, _] => Err(EvalError::type_error("append", "List", other, 0)),
        _ => Err(EvalError::arity_error("append", "2", args.len())),
    }
}

fn builtin_reverse(args: &[Value]) -> Result<Value, EvalError> {
    match args.first() {
        Some(Value::List(items)) => {
            let mut out = items.borrow().clone();
            out.reverse();
            Ok(Value::list(out))
        }
        Some(other) => Err(EvalError::type_error("reverse", "List", other, 0)),
        None => Err(EvalError::arity_error("reverse", "1", 0)),
    }
}

fn builtin_zip(args: &[Value]) -> Result<Value, EvalError> {
    match args {
        [Value::List(a), Value::List(b)] => {
            let a = a.borrow();
            let b = b.borrow();
            if a.len() != b.len() {
                return Err(EvalError::runtime_error(
                    "zip",
                    format!("lists of unequal length: {} and {}", a.len(), b.len()),
                ));
            }
            let pairs = a
                .iter()
                .zip(b.iter())
                .map(|(x, y)| Value::list(vec![x.clone(), y.clone()]))
                .collect();
            Ok(Value::list(pairs))
        }
        [other, _] => Err(EvalError::type_error("zip", "List", other, 0)),
        _ => Err(EvalError::arity_error("zip", "2", args.len())),
    }
}

fn builtin_filter(args: &[Value]) -> Result<Value, EvalError> {
    match args {
        [Value::List(items), predicate] => {
            let mut out = Vec::new();
            for item in items.borrow().iter() {
                let kept = call_value(predicate, vec![item.clone()])?;
                if kept.is_error() {
                    return Ok(kept);
                }
                if kept.is_truthy() {
                    out.push(item.clone());
                }
            }
            Ok(Value::list(out))
        }
        [other, _] => Err(EvalError::type_error("filter", "List", other, 0)),
        _ => Err(EvalError::arity_error("filter", "2", args.len())),
    }
}

fn builtin_reduce(args: &[Value]) -> Result<Value, EvalError> {
    match args {
        [Value::List(items), function, initial] => {
            let mut acc = initial.clone();
            for item in items.borrow().iter() {
                acc = call_value(function, vec![acc, item.clone()])?;
                if acc.is_error() {
                    return Ok(acc);
                }
            }
            Ok(acc)
        }
        [other, _, _] => Err(EvalError::type_error("reduce", "List", other, 0)),
        _ => Err(EvalError::arity_error("reduce", "3", args.len())),
    }
}

fn builtin_range_list(args: &[Value]) -> Result<Value, EvalError> {
    match args {
        [Value::Integer(start), Value::Integer(end)] => {
            let items = (*start..*end).map(Value::Integer).collect();
            Ok(Value::list(items))
        }
        [other, _] => Err(EvalError::type_error("range_list", "Integer", other, 0)),
        _ => Err(EvalError::arity_error("range_list", "2", args.len())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_len_list() {
        let list = Value::list(vec![Value::Integer(1), Value::Integer(2)]);
        assert!(matches!(builtin_len(&[list]), Ok(Value::Integer(2))));
    }

    #[test]
    fn test_append_mutates_in_place() {
        let list = Value::list(vec![Value::Integer(1)]);
        let result = builtin_append(&[list.clone(), Value::Integer(2)]).unwrap();
        match result {
            Value::List(items) => assert_eq!(items.borrow().len(), 2),
            _ => panic!("expected list"),
        }
    }

    #[test]
    fn test_zip_unequal_length_is_error() {
        let a = Value::list(vec![Value::Integer(1)]);
        let b = Value::list(vec![Value::Integer(1), Value::Integer(2)]);
        assert!(builtin_zip(&[a, b]).is_err());
    }

    #[test]
    fn test_range_is_half_open() {
        match builtin_range_list(&[Value::Integer(0), Value::Integer(3)]).unwrap() {
            Value::List(items) => assert_eq!(items.borrow().len(), 3),
            _ => panic!("expected list"),
        }
    }
}
