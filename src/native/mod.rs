// ABOUTME: Native function registry: installs host callables into an Environment

use std::rc::Rc;

use crate::env::Environment;
use crate::error::EvalError;
use crate::value::{NativeFunctionData, Value};

pub mod collections;
pub mod convert;
pub mod core;
pub mod io;
pub mod math;
pub mod strings;
pub mod system;
pub mod testing;

pub use collections::register as register_collections;
pub use convert::register as register_convert;
pub use core::register as register_core;
pub use io::register as register_io;
pub use math::register as register_math;
pub use strings::register as register_strings;
pub use system::register as register_system;
pub use testing::register as register_testing;

/// Wraps a closure as a `Value::NativeFunction` callable from interpreted code.
pub fn native(name: &str, f: impl Fn(&[Value]) -> Result<Value, EvalError> + 'static) -> Value {
    Value::NativeFunction(Rc::new(NativeFunctionData {
        name: name.to_string(),
        func: Box::new(f),
    }))
}

/// Registers every native function the core guarantees (§4.5) into `env`. A
/// host extends this set further by calling `Environment::define` with
/// additional natives before evaluating a program (§6.4(a)).
pub fn register_builtins(env: &Rc<Environment>) {
    register_core(env);
    register_collections(env);
    register_strings(env);
    register_convert(env);
    register_math(env);
    register_system(env);
    register_testing(env);
    register_io(env);
}
