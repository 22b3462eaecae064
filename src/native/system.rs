// ABOUTME: System natives: exit, class

use std::rc::Rc;

use crate::env::Environment;
use crate::error::EvalError;
use crate::native::native;
use crate::value::{ClassData, Value};

pub fn register(env: &Rc<Environment>) {
    env.define("exit", native("exit", builtin_exit));
    env.define("class", native("class", builtin_class));
}

fn builtin_exit(args: &[Value]) -> Result<Value, EvalError> {
    let code = match args.first() {
        Some(Value::Integer(n)) => *n as i32,
        Some(other) => return Err(EvalError::type_error("exit", "Integer", other, 0)),
        None => 0,
    };
    std::process::exit(code);
}

fn builtin_class(args: &[Value]) -> Result<Value, EvalError> {
    let env = Environment::new();
    for (i, parent) in args.iter().enumerate() {
        let parent_env = parent
            .dot_env()
            .ok_or_else(|| EvalError::type_error("class", "Class", parent, i))?;
        for (name, value) in parent_env.local_bindings() {
            env.define(name, value);
        }
    }
    Ok(Value::Class(Rc::new(ClassData {
        name: std::cell::RefCell::new(None),
        env,
    })))
}
