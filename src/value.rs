// ABOUTME: Runtime Value variants and their arithmetic/comparable/dot-accessible capability dispatch

use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

use crate::ast::Statement;
use crate::env::Environment;
use crate::error::EvalError;

pub struct FunctionData {
    pub params: Vec<String>,
    pub body: Rc<Statement>,
    pub env: Rc<Environment>,
    pub name: RefCell<Option<String>>,
}

pub struct ClassData {
    pub name: RefCell<Option<String>>,
    pub env: Rc<Environment>,
}

pub struct ObjectData {
    pub class_name: RefCell<Option<String>>,
    pub env: Rc<Environment>,
}

pub struct ModuleData {
    pub path: String,
    pub env: Rc<Environment>,
}

pub struct ModuleFunctionData {
    pub function: Rc<FunctionData>,
    pub module_env: Rc<Environment>,
    /// The Object this method was retrieved from, implicitly passed as the
    /// function's leading `self` argument on call. `None` for functions
    /// retrieved from a plain Module (no implicit receiver).
    pub receiver: Option<Value>,
}

pub type NativeFn = dyn Fn(&[Value]) -> Result<Value, EvalError>;

pub struct NativeFunctionData {
    pub name: String,
    pub func: Box<NativeFn>,
}

#[derive(Clone)]
pub enum Value {
    Integer(i64),
    Float(f64),
    Boolean(bool),
    String(Rc<str>),
    Null,
    List(Rc<RefCell<Vec<Value>>>),
    Function(Rc<FunctionData>),
    NativeFunction(Rc<NativeFunctionData>),
    Class(Rc<ClassData>),
    Object(Rc<ObjectData>),
    Module(Rc<ModuleData>),
    ModuleFunction(Rc<ModuleFunctionData>),
    Error(String),
}

impl Value {
    pub fn string(s: impl Into<String>) -> Value {
        Value::String(Rc::from(s.into().as_str()))
    }

    pub fn list(items: Vec<Value>) -> Value {
        Value::List(Rc::new(RefCell::new(items)))
    }

    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Integer(_) => "Integer",
            Value::Float(_) => "Float",
            Value::Boolean(_) => "Boolean",
            Value::String(_) => "String",
            Value::Null => "Null",
            Value::List(_) => "List",
            Value::Function(_) => "Function",
            Value::NativeFunction(_) => "NativeFunction",
            Value::Class(_) => "Class",
            Value::Object(_) => "Object",
            Value::Module(_) => "Module",
            Value::ModuleFunction(_) => "ModuleFunction",
            Value::Error(_) => "Error",
        }
    }

    pub fn is_truthy(&self) -> bool {
        match self {
            Value::Null => false,
            Value::Boolean(b) => *b,
            _ => true,
        }
    }

    pub fn is_error(&self) -> bool {
        matches!(self, Value::Error(_))
    }

    fn op_error(op: &str, left: &Value, right: &Value) -> Value {
        Value::Error(format!(
            "Operator '{}' not defined for {} and {}",
            op,
            left.type_name(),
            right.type_name()
        ))
    }

    // --- Arithmetic capability (Integer, Float) -----------------------

    pub fn add(&self, other: &Value) -> Result<Value, EvalError> {
        match (self, other) {
            (Value::Integer(a), Value::Integer(b)) => Ok(Value::Integer(a + b)),
            (Value::Integer(a), Value::Float(b)) => Ok(Value::Float(*a as f64 + b)),
            (Value::Float(a), Value::Integer(b)) => Ok(Value::Float(a + *b as f64)),
            (Value::Float(a), Value::Float(b)) => Ok(Value::Float(a + b)),
            (Value::String(a), Value::String(b)) => Ok(Value::string(format!("{a}{b}"))),
            (Value::List(a), Value::List(b)) => {
                let mut out = a.borrow().clone();
                out.extend(b.borrow().iter().cloned());
                Ok(Value::list(out))
            }
            _ => Ok(Self::op_error("+", self, other)),
        }
    }

    pub fn sub(&self, other: &Value) -> Result<Value, EvalError> {
        match (self, other) {
            (Value::Integer(a), Value::Integer(b)) => Ok(Value::Integer(a - b)),
            (Value::Integer(a), Value::Float(b)) => Ok(Value::Float(*a as f64 - b)),
            (Value::Float(a), Value::Integer(b)) => Ok(Value::Float(a - *b as f64)),
            (Value::Float(a), Value::Float(b)) => Ok(Value::Float(a - b)),
            _ => Ok(Self::op_error("-", self, other)),
        }
    }

    pub fn mul(&self, other: &Value) -> Result<Value, EvalError> {
        match (self, other) {
            (Value::Integer(a), Value::Integer(b)) => Ok(Value::Integer(a * b)),
            (Value::Integer(a), Value::Float(b)) => Ok(Value::Float(*a as f64 * b)),
            (Value::Float(a), Value::Integer(b)) => Ok(Value::Float(a * *b as f64)),
            (Value::Float(a), Value::Float(b)) => Ok(Value::Float(a * b)),
            _ => Ok(Self::op_error("*", self, other)),
        }
    }

    pub fn div(&self, other: &Value) -> Result<Value, EvalError> {
        match (self, other) {
            (Value::Integer(a), Value::Integer(b)) => {
                if *b == 0 {
                    return Err(EvalError::DivisionByZero);
                }
                Ok(Value::Integer(a / b))
            }
            (Value::Integer(a), Value::Float(b)) => Ok(Value::Float(*a as f64 / b)),
            (Value::Float(a), Value::Integer(b)) => Ok(Value::Float(a / *b as f64)),
            (Value::Float(a), Value::Float(b)) => Ok(Value::Float(a / b)),
            _ => Ok(Self::op_error("/", self, other)),
        }
    }

    pub fn modulo(&self, other: &Value) -> Result<Value, EvalError> {
        match (self, other) {
            (Value::Integer(a), Value::Integer(b)) => {
                if *b == 0 {
                    return Err(EvalError::DivisionByZero);
                }
                Ok(Value::Integer(a % b))
            }
            (Value::Float(a), Value::Float(b)) => Ok(Value::Float(a % b)),
            (Value::Float(a), Value::Integer(b)) => Ok(Value::Float(a % *b as f64)),
            _ => Ok(Self::op_error("%", self, other)),
        }
    }

    pub fn neg(&self) -> Result<Value, EvalError> {
        match self {
            Value::Integer(a) => Ok(Value::Integer(-a)),
            Value::Float(a) => Ok(Value::Float(-a)),
            other => Ok(Value::Error(format!(
                "Operator '-' (unary) not defined for {}",
                other.type_name()
            ))),
        }
    }

    // --- Comparable capability (Integer, Float, String, Boolean, Null) -

    pub fn equal(&self, other: &Value) -> Value {
        match (self, other) {
            (Value::Integer(a), Value::Integer(b)) => Value::Boolean(a == b),
            (Value::Integer(a), Value::Float(b)) => Value::Boolean(*a as f64 == *b),
            (Value::Float(a), Value::Integer(b)) => Value::Boolean(*a == *b as f64),
            (Value::Float(a), Value::Float(b)) => Value::Boolean(a == b),
            (Value::String(a), Value::String(b)) => Value::Boolean(a == b),
            (Value::Boolean(a), Value::Boolean(b)) => Value::Boolean(a == b),
            (Value::Null, Value::Null) => Value::Boolean(true),
            _ => Self::op_error("==", self, other),
        }
    }

    pub fn not_equal(&self, other: &Value) -> Value {
        match self.equal(other) {
            Value::Boolean(b) => Value::Boolean(!b),
            err => err,
        }
    }

    fn numeric_cmp(&self, other: &Value, op: &str, f: impl Fn(f64, f64) -> bool) -> Value {
        match (self, other) {
            (Value::Integer(a), Value::Integer(b)) => Value::Boolean(f(*a as f64, *b as f64)),
            (Value::Integer(a), Value::Float(b)) => Value::Boolean(f(*a as f64, *b)),
            (Value::Float(a), Value::Integer(b)) => Value::Boolean(f(*a, *b as f64)),
            (Value::Float(a), Value::Float(b)) => Value::Boolean(f(*a, *b)),
            _ => Self::op_error(op, self, other),
        }
    }

    pub fn less_than(&self, other: &Value) -> Value {
        self.numeric_cmp(other, "<", |a, b| a < b)
    }

    pub fn greater_than(&self, other: &Value) -> Value {
        self.numeric_cmp(other, ">", |a, b| a > b)
    }

    pub fn less_than_eq(&self, other: &Value) -> Value {
        self.numeric_cmp(other, "<=", |a, b| a <= b)
    }

    pub fn greater_than_eq(&self, other: &Value) -> Value {
        self.numeric_cmp(other, ">=", |a, b| a >= b)
    }

    // --- Dot-accessible capability (Module, Class, Object) -------------

    pub fn dot_env(&self) -> Option<&Rc<Environment>> {
        match self {
            Value::Module(m) => Some(&m.env),
            Value::Class(c) => Some(&c.env),
            Value::Object(o) => Some(&o.env),
            _ => None,
        }
    }

    pub fn get(&self, name: &str) -> Value {
        match self.dot_env() {
            Some(env) => env
                .get(name)
                .unwrap_or_else(|| Value::Error(format!("No such member: {name}"))),
            None => Value::Error(format!("{} is not dot-accessible", self.type_name())),
        }
    }

    pub fn set(&self, name: &str, value: Value) -> Result<(), EvalError> {
        if matches!(self, Value::Object(_)) && name == "new" {
            return Err(EvalError::ReservedMember(name.to_string()));
        }
        match self.dot_env() {
            Some(env) => {
                env.define(name, value);
                Ok(())
            }
            None => Err(EvalError::runtime_error(
                "member-assign",
                format!("{} is not dot-accessible", self.type_name()),
            )),
        }
    }
}

impl fmt::Debug for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{self}")
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Integer(i) => write!(f, "{i}"),
            Value::Float(x) => write!(f, "{x}"),
            Value::Boolean(b) => write!(f, "{b}"),
            Value::String(s) => write!(f, "{s}"),
            Value::Null => write!(f, "null"),
            Value::List(items) => {
                write!(f, "[")?;
                for (i, item) in items.borrow().iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{item}")?;
                }
                write!(f, "]")
            }
            Value::Function(func) => match func.name.borrow().as_ref() {
                Some(name) => write!(f, "<function {name}>"),
                None => write!(f, "<function>"),
            },
            Value::NativeFunction(nf) => write!(f, "<native function {}>", nf.name),
            Value::Class(c) => match c.name.borrow().as_ref() {
                Some(name) => write!(f, "<class {name}>"),
                None => write!(f, "<class>"),
            },
            Value::Object(o) => match o.class_name.borrow().as_ref() {
                Some(name) => write!(f, "<object {name}>"),
                None => write!(f, "<object>"),
            },
            Value::Module(m) => write!(f, "<module {}>", m.path),
            Value::ModuleFunction(mf) => match mf.function.name.borrow().as_ref() {
                Some(name) => write!(f, "<function {name}>"),
                None => write!(f, "<function>"),
            },
            Value::Error(msg) => write!(f, "Error: {msg}"),
        }
    }
}
