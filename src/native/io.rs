// ABOUTME: I/O natives: read_string_file

use std::rc::Rc;

use crate::env::Environment;
use crate::error::EvalError;
use crate::native::native;
use crate::value::Value;

pub fn register(env: &Rc<Environment>) {
    env.define("read_string_file", native("read_string_file", builtin_read_string_file));
}

fn builtin_read_string_file(args: &[Value]) -> Result<Value, EvalError> {
    let path = match args.first() {
        Some(Value::String(s)) => s.to_string(),
        Some(other) => return Err(EvalError::type_error("read_string_file", "String", other, 0)),
        None => return Err(EvalError::arity_error("read_string_file", "1", 0)),
    };
    if args.len() != 1 {
        return Err(EvalError::arity_error("read_string_file", "1", args.len()));
    }

    std::fs::read_to_string(&path)
        .map(Value::string)
        .map_err(|e| EvalError::runtime_error("read_string_file", format!("cannot read {path}: {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_read_string_file_reads_contents() {
        let dir = std::env::temp_dir().join("vesper_read_string_file_test.txt");
        std::fs::write(&dir, "hello").unwrap();
        let result = builtin_read_string_file(&[Value::string(dir.to_string_lossy().into_owned())]);
        std::fs::remove_file(&dir).ok();
        assert!(matches!(result, Ok(Value::String(s)) if &*s == "hello"));
    }

    #[test]
    fn test_read_string_file_missing_path_is_error() {
        assert!(builtin_read_string_file(&[Value::string("/no/such/file")]).is_err());
    }

    #[test]
    fn test_read_string_file_wrong_type_is_error() {
        assert!(builtin_read_string_file(&[Value::Integer(1)]).is_err());
    }

    #[test]
    fn test_read_string_file_wrong_arity_is_error() {
        assert!(builtin_read_string_file(&[]).is_err());
    }
}
