// ABOUTME: Core natives: print, println, import

use std::path::Path;
use std::rc::Rc;

use crate::env::Environment;
use crate::error::EvalError;
use crate::eval::eval_statement;
use crate::lexer::lex;
use crate::native::{native, register_builtins};
use crate::parser::parse;
use crate::stdlib;
use crate::value::{ModuleData, Value};

pub fn register(env: &Rc<Environment>) {
    env.define("print", native("print", builtin_print));
    env.define("println", native("println", builtin_println));

    let importer_env = env.clone();
    env.define(
        "import",
        native("import", move |args| builtin_import(args, &importer_env)),
    );
}

fn render_all(args: &[Value]) -> String {
    args.iter().map(|v| v.to_string()).collect::<Vec<_>>().join("")
}

fn builtin_print(args: &[Value]) -> Result<Value, EvalError> {
    println!("{}", render_all(args));
    Ok(Value::Null)
}

fn builtin_println(args: &[Value]) -> Result<Value, EvalError> {
    println!("{}", render_all(args));
    Ok(Value::Null)
}

fn builtin_import(args: &[Value], importer_env: &Rc<Environment>) -> Result<Value, EvalError> {
    let path = match args.first() {
        Some(Value::String(s)) => s.to_string(),
        Some(other) => {
            return Err(EvalError::type_error("import", "String", other, 0));
        }
        None => return Err(EvalError::arity_error("import", "1", 0)),
    };

    if let Some(module) = stdlib::resolve_builtin(&path) {
        return Ok(module);
    }

    let resolved = Path::new(&importer_env.moddir()).join(&path);
    let source = std::fs::read_to_string(&resolved).map_err(|e| {
        EvalError::runtime_error("import", format!("could not read {}: {e}", resolved.display()))
    })?;

    let module_dir = resolved
        .parent()
        .map(|p| p.to_string_lossy().into_owned())
        .unwrap_or_else(|| ".".to_string());

    let module_env = Environment::new();
    register_builtins(&module_env);
    module_env.set_moddir(module_dir);

    let tokens = lex(&source).map_err(|e| EvalError::runtime_error("import", e.to_string()))?;
    let program = parse(tokens).map_err(|e| EvalError::runtime_error("import", e.to_string()))?;
    eval_statement(&program, &module_env)?;

    Ok(Value::Module(Rc::new(ModuleData {
        path,
        env: module_env,
    })))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_print_returns_null() {
        assert!(matches!(builtin_print(&[Value::Integer(1)]), Ok(Value::Null)));
    }

    #[test]
    fn test_import_missing_file_is_error() {
        let env = Environment::new();
        let result = builtin_import(&[Value::string("/no/such/file.ves")], &env);
        assert!(result.is_err());
    }

    #[test]
    fn test_import_builtin_module_short_circuits() {
        let env = Environment::new();
        let result = builtin_import(&[Value::string("math")], &env).unwrap();
        assert!(matches!(result, Value::Module(_)));
    }
}
