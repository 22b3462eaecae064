// ABOUTME: Library module exposing internal components for testing

pub mod ast;
pub mod bytecode;
pub mod env;
pub mod error;
pub mod eval;
pub mod lexer;
pub mod native;
pub mod parser;
pub mod stdlib;
pub mod token;
pub mod value;

use std::rc::Rc;

use env::Environment;
use error::InterpError;
use value::Value;

/// §6.1 embedded evaluation entry: lex, parse, and tree-walk `source` against
/// a fresh root environment pre-populated with the native registry (§4.5).
pub fn eval(source: &str) -> Result<Value, InterpError> {
    let env = Environment::new();
    native::register_builtins(&env);
    env.set_moddir(".");
    eval_in(source, &env)
}

/// Same as [`eval`], but against a caller-supplied root environment. Lets an
/// embedder register additional natives (§6.4(a)) before running `source`.
pub fn eval_in(source: &str, env: &Rc<Environment>) -> Result<Value, InterpError> {
    let tokens = lexer::lex(source)?;
    let program = parser::parse(tokens)?;
    Ok(eval::eval_statement(&program, env)?)
}

/// Compiles `source` to bytecode and runs it on the stack VM (§4.6, §6.3).
/// Only the arithmetic/comparison/literal subset is supported; anything else
/// fails to compile.
pub fn eval_bytecode(source: &str) -> Result<Value, InterpError> {
    let tokens = lexer::lex(source)?;
    let program = parser::parse(tokens)?;
    let compiled = bytecode::compile(&program)?;
    Ok(bytecode::run(compiled)?)
}
