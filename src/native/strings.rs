// ABOUTME: String natives: split

use std::rc::Rc;

use crate::env::Environment;
use crate::error::EvalError;
use crate::native::native;
use crate::value::Value;

pub fn register(env: &Rc<Environment>) {
    env.define("split", native("split", builtin_split));
}

fn builtin_split(args: &[Value]) -> Result<Value, EvalError> {
    match args {
        [Value::String(s), Value::String(sep)] => {
            let parts = if sep.is_empty() {
                s.chars().map(|c| Value::string(c.to_string())).collect()
            } else {
                s.split(sep.as_ref()).map(Value::string).collect()
            };
            Ok(Value::list(parts))
        }
        [other, _] => Err(EvalError::type_error("split", "String", other, 0)),
        _ => Err(EvalError::arity_error("split", "2", args.len())),
    }
}
