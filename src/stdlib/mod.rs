// ABOUTME: Built-in module table consulted by `import()` before touching the filesystem

use std::rc::Rc;

use crate::env::Environment;
use crate::native;
use crate::value::{ModuleData, Value};

/// Returns the pre-built module for a built-in import name, or `None` if
/// `path` isn't one of the reserved names and should fall through to a
/// plain file-path import.
pub fn resolve_builtin(path: &str) -> Option<Value> {
    match path {
        "io" => Some(io_module()),
        "math" => Some(math_module()),
        "testing" => Some(testing_module()),
        "goplugin" => Some(stub_module("goplugin")),
        "tensor" => Some(stub_module("tensor")),
        _ => None,
    }
}

fn module_of(path: &str, populate: impl FnOnce(&Rc<Environment>)) -> Value {
    let env = Environment::new();
    populate(&env);
    Value::Module(Rc::new(ModuleData {
        path: path.to_string(),
        env,
    }))
}

fn io_module() -> Value {
    module_of("io", |env| {
        native::register_io(env);
    })
}

fn math_module() -> Value {
    module_of("math", |env| {
        native::register_math(env);
    })
}

fn testing_module() -> Value {
    module_of("testing", |env| {
        native::register_testing(env);
    })
}

/// `goplugin` and `tensor` named external subsystems (dynamic Go plugin
/// loading, tensor math) that had no Rust-native counterpart to ground them
/// on; `import`ing either yields a module whose members are all
/// unavailability errors rather than a silent no-op.
fn stub_module(name: &str) -> Value {
    module_of(name, |env| {
        let message = format!("module '{name}' is not available in this build");
        let native_name = name.to_string();
        env.define(
            "unavailable",
            native::native(name, move |_| {
                Err(crate::error::EvalError::runtime_error(
                    &native_name,
                    message.clone(),
                ))
            }),
        );
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_known_builtins() {
        assert!(resolve_builtin("io").is_some());
        assert!(resolve_builtin("math").is_some());
        assert!(resolve_builtin("testing").is_some());
        assert!(resolve_builtin("goplugin").is_some());
        assert!(resolve_builtin("tensor").is_some());
    }

    #[test]
    fn test_resolve_unknown_falls_through() {
        assert!(resolve_builtin("./local_script").is_none());
    }

    #[test]
    fn test_math_module_exposes_constants() {
        match math_module() {
            Value::Module(m) => assert!(matches!(m.env.get("PI"), Some(Value::Float(_)))),
            _ => panic!("expected module"),
        }
    }

    #[test]
    fn test_io_module_exposes_only_read_string_file() {
        match io_module() {
            Value::Module(m) => {
                assert!(matches!(m.env.get("read_string_file"), Some(Value::NativeFunction(_))));
                assert!(m.env.get("print").is_none());
            }
            _ => panic!("expected module"),
        }
    }
}
