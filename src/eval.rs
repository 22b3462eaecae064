// ABOUTME: Tree-walking evaluator: recursive eval(node, env) over the AST

use std::cell::RefCell;
use std::rc::Rc;

use crate::ast::{Expression, PipelineKind, PrefixOp, Statement};
use crate::env::Environment;
use crate::error::EvalError;
use crate::value::{ClassData, FunctionData, ModuleFunctionData, ObjectData, Value};

pub fn eval_statement(stmt: &Statement, env: &Rc<Environment>) -> Result<Value, EvalError> {
    match stmt {
        Statement::Program(stmts) | Statement::Block(stmts) => eval_statements(stmts, env),
        Statement::Expression(expr) => eval_expression(expr, env),
        Statement::VarAssignment { name, value } => {
            eprintln!("warning: legacy `@{name} = ...` assignment form is deprecated, use `{name} = ...`");
            let v = eval_expression(value, env)?;
            env.define(name.clone(), v.clone());
            Ok(v)
        }
        Statement::If {
            condition,
            consequence,
            alternative,
        } => {
            let cond = eval_expression(condition, env)?;
            if cond.is_truthy() {
                eval_statement(consequence, env)
            } else if let Some(alt) = alternative {
                eval_statement(alt, env)
            } else {
                Ok(Value::Null)
            }
        }
        Statement::Iter {
            list,
            binding,
            body,
        } => {
            let list_val = eval_expression(list, env)?;
            if list_val.is_error() {
                return Ok(list_val);
            }
            let items = match &list_val {
                Value::List(items) => items.borrow().clone(),
                _ => {
                    return Err(EvalError::IterOverNonList);
                }
            };
            for item in items {
                env.define(binding.clone(), item);
                eval_statement(body, env)?;
            }
            Ok(Value::Null)
        }
    }
}

fn eval_statements(stmts: &[Statement], env: &Rc<Environment>) -> Result<Value, EvalError> {
    let mut result = Value::Null;
    for stmt in stmts {
        result = eval_statement(stmt, env)?;
    }
    Ok(result)
}

pub fn eval_expression(expr: &Expression, env: &Rc<Environment>) -> Result<Value, EvalError> {
    match expr {
        Expression::Identifier(name) => env
            .get(name)
            .ok_or_else(|| EvalError::UndefinedSymbol(name.clone())),
        Expression::IntegerLiteral(n) => Ok(Value::Integer(*n)),
        Expression::FloatLiteral(n) => Ok(Value::Float(*n)),
        Expression::StringLiteral(s) => Ok(Value::string(s.clone())),
        Expression::BooleanLiteral(b) => Ok(Value::Boolean(*b)),
        Expression::ListLiteral(items) => {
            let mut values = Vec::with_capacity(items.len());
            for item in items {
                values.push(eval_expression(item, env)?);
            }
            Ok(Value::list(values))
        }
        Expression::Index { left, index } => eval_index(left, index, env),
        Expression::MemberAccess { left, member } => eval_member_access(left, member, env),
        Expression::Prefix { op, right } => eval_prefix(*op, right, env),
        Expression::Infix { op, left, right } => eval_infix(op, left, right, env),
        Expression::Assign { target, value } => eval_assign(target, value, env),
        Expression::Ternary {
            condition,
            consequence,
            alternative,
        } => {
            let cond = eval_expression(condition, env)?;
            if cond.is_truthy() {
                eval_expression(consequence, env)
            } else {
                eval_expression(alternative, env)
            }
        }
        Expression::FuncLiteral { params, body, name } => Ok(Value::Function(Rc::new(FunctionData {
            params: params.clone(),
            body: Rc::new((**body).clone()),
            env: env.clone(),
            name: RefCell::new(name.clone()),
        }))),
        Expression::Call { callee, args } => {
            let callee_val = eval_expression(callee, env)?;
            if callee_val.is_error() {
                return Ok(callee_val);
            }
            let mut arg_vals = Vec::with_capacity(args.len());
            for arg in args {
                let v = eval_expression(arg, env)?;
                if v.is_error() {
                    return Ok(v);
                }
                arg_vals.push(v);
            }
            call_value(&callee_val, arg_vals)
        }
        Expression::Pipeline {
            list,
            kind,
            callee,
            extra_args,
        } => eval_pipeline(list, *kind, callee, extra_args, env),
    }
}

fn eval_index(left: &Expression, index: &Expression, env: &Rc<Environment>) -> Result<Value, EvalError> {
    let left_val = eval_expression(left, env)?;
    if left_val.is_error() {
        return Ok(left_val);
    }
    let index_val = eval_expression(index, env)?;
    if index_val.is_error() {
        return Ok(index_val);
    }

    match (&left_val, &index_val) {
        (Value::List(items), Value::Integer(i)) => {
            let items = items.borrow();
            let i = *i;
            if i < 0 || i as usize >= items.len() {
                return Err(EvalError::IndexOutOfRange {
                    index: i,
                    len: items.len(),
                });
            }
            Ok(items[i as usize].clone())
        }
        (Value::String(s), Value::Integer(i)) => {
            let bytes = s.as_bytes();
            let i = *i;
            if i < 0 || i as usize >= bytes.len() {
                return Err(EvalError::IndexOutOfRange {
                    index: i,
                    len: bytes.len(),
                });
            }
            Ok(Value::string(String::from_utf8_lossy(&bytes[i as usize..i as usize + 1]).into_owned()))
        }
        (Value::List(_), _) | (Value::String(_), _) => Ok(Value::Error(format!(
            "index must be Integer, got {}",
            index_val.type_name()
        ))),
        _ => Ok(Value::Error(format!(
            "{} is not indexable",
            left_val.type_name()
        ))),
    }
}

fn eval_member_access(
    left: &Expression,
    member: &str,
    env: &Rc<Environment>,
) -> Result<Value, EvalError> {
    let left_val = eval_expression(left, env)?;
    if left_val.is_error() {
        return Ok(left_val);
    }
    let found = left_val.get(member);
    if let (Value::Function(func), Some(container_env)) = (&found, left_val.dot_env()) {
        let receiver = match &left_val {
            Value::Object(_) => Some(left_val.clone()),
            _ => None,
        };
        return Ok(Value::ModuleFunction(Rc::new(ModuleFunctionData {
            function: func.clone(),
            module_env: container_env.clone(),
            receiver,
        })));
    }
    Ok(found)
}

fn eval_prefix(op: PrefixOp, right: &Expression, env: &Rc<Environment>) -> Result<Value, EvalError> {
    let right_val = eval_expression(right, env)?;
    match op {
        PrefixOp::Neg => right_val.neg(),
        PrefixOp::Plus => match right_val {
            Value::Integer(_) | Value::Float(_) => Ok(right_val),
            other => Ok(Value::Error(format!(
                "Operator '+' (unary) not defined for {}",
                other.type_name()
            ))),
        },
        PrefixOp::Not => Ok(Value::Boolean(!right_val.is_truthy())),
    }
}

fn eval_infix(
    op: &str,
    left: &Expression,
    right: &Expression,
    env: &Rc<Environment>,
) -> Result<Value, EvalError> {
    if op == "&&" {
        let left_val = eval_expression(left, env)?;
        if left_val.is_error() {
            return Ok(left_val);
        }
        if matches!(left_val, Value::Boolean(false)) {
            return Ok(left_val);
        }
        return eval_expression(right, env);
    }
    if op == "||" {
        let left_val = eval_expression(left, env)?;
        if left_val.is_error() {
            return Ok(left_val);
        }
        if matches!(left_val, Value::Boolean(true)) {
            return Ok(left_val);
        }
        return eval_expression(right, env);
    }

    let left_val = eval_expression(left, env)?;
    let right_val = eval_expression(right, env)?;

    match op {
        "+" => left_val.add(&right_val),
        "-" => left_val.sub(&right_val),
        "*" => left_val.mul(&right_val),
        "/" => left_val.div(&right_val),
        "%" => left_val.modulo(&right_val),
        "==" => Ok(left_val.equal(&right_val)),
        "!=" => Ok(left_val.not_equal(&right_val)),
        "<" => Ok(left_val.less_than(&right_val)),
        ">" => Ok(left_val.greater_than(&right_val)),
        "<=" => Ok(left_val.less_than_eq(&right_val)),
        ">=" => Ok(left_val.greater_than_eq(&right_val)),
        other => Err(EvalError::Custom(format!("unknown infix operator '{other}'"))),
    }
}

fn eval_assign(target: &Expression, value: &Expression, env: &Rc<Environment>) -> Result<Value, EvalError> {
    let val = eval_expression(value, env)?;
    if val.is_error() {
        return Ok(val);
    }

    match target {
        Expression::Identifier(name) => {
            match &val {
                Value::Class(class) => *class.name.borrow_mut() = Some(name.clone()),
                Value::Function(func) => *func.name.borrow_mut() = Some(name.clone()),
                _ => {}
            }
            env.define(name.clone(), val.clone());
            Ok(val)
        }
        Expression::Index { left, index } => {
            let left_val = eval_expression(left, env)?;
            let index_val = eval_expression(index, env)?;
            match (&left_val, &index_val) {
                (Value::List(items), Value::Integer(i)) => {
                    let mut items = items.borrow_mut();
                    let i = *i;
                    if i < 0 || i as usize >= items.len() {
                        return Err(EvalError::IndexOutOfRange {
                            index: i,
                            len: items.len(),
                        });
                    }
                    items[i as usize] = val.clone();
                    Ok(val)
                }
                _ => Err(EvalError::InvalidAssignmentTarget),
            }
        }
        Expression::MemberAccess { left, member } => {
            let left_val = eval_expression(left, env)?;
            if left_val.dot_env().is_none() {
                return Err(EvalError::runtime_error(
                    "member-assign",
                    format!("{} is not dot-accessible", left_val.type_name()),
                ));
            }
            left_val.set(member, val.clone())?;
            Ok(val)
        }
        _ => Err(EvalError::InvalidAssignmentTarget),
    }
}

/// Dispatches a call to a NativeFunction, ModuleFunction, Class (construction),
/// or user-defined Function (§4.4.4).
pub fn call_value(callee: &Value, args: Vec<Value>) -> Result<Value, EvalError> {
    match callee {
        Value::NativeFunction(nf) => (nf.func)(&args),
        Value::ModuleFunction(mf) => {
            let mut effective_args = Vec::with_capacity(args.len() + 1);
            if let Some(receiver) = &mf.receiver {
                effective_args.push(receiver.clone());
            }
            effective_args.extend(args);
            call_function(&mf.function, &mf.module_env, effective_args)
        }
        Value::Function(func) => {
            let captured = func.env.clone();
            call_function(func, &captured, args)
        }
        Value::Class(class) => construct_object(class, args),
        other => Err(EvalError::NotCallable(other.type_name().to_string())),
    }
}

fn call_function(func: &Rc<FunctionData>, parent: &Rc<Environment>, args: Vec<Value>) -> Result<Value, EvalError> {
    if func.params.len() != args.len() {
        return Err(EvalError::CallArityMismatch {
            name: func
                .name
                .borrow()
                .clone()
                .unwrap_or_else(|| "<anonymous>".to_string()),
            expected: func.params.len(),
            actual: args.len(),
        });
    }
    let call_env = Environment::with_parent(parent.clone());
    for (param, arg) in func.params.iter().zip(args.into_iter()) {
        call_env.define(param.clone(), arg);
    }
    eval_statement(&func.body, &call_env)
}

fn construct_object(class: &Rc<ClassData>, args: Vec<Value>) -> Result<Value, EvalError> {
    let object_env = class.env.sibling();
    for (name, value) in class.env.local_bindings() {
        object_env.define(name, value);
    }

    let class_name = class.name.borrow().clone();
    let obj_data = Rc::new(ObjectData {
        class_name: RefCell::new(class_name),
        env: object_env.clone(),
    });
    let obj_value = Value::Object(obj_data);
    object_env.define("self", obj_value.clone());

    match object_env.get("init") {
        Some(Value::Function(init)) => {
            let mut effective_args = Vec::with_capacity(args.len() + 1);
            effective_args.push(obj_value.clone());
            effective_args.extend(args);
            call_function(&init, &object_env, effective_args)?;
        }
        _ => {
            if !args.is_empty() {
                return Err(EvalError::NoInitForArgs);
            }
        }
    }

    Ok(obj_value)
}

fn eval_pipeline(
    list: &Expression,
    kind: PipelineKind,
    callee: &Expression,
    extra_args: &[Expression],
    env: &Rc<Environment>,
) -> Result<Value, EvalError> {
    let list_val = eval_expression(list, env)?;
    if list_val.is_error() {
        return Ok(list_val);
    }
    let callee_val = eval_expression(callee, env)?;
    if callee_val.is_error() {
        return Ok(callee_val);
    }
    let mut extras = Vec::with_capacity(extra_args.len());
    for expr in extra_args {
        let v = eval_expression(expr, env)?;
        if v.is_error() {
            return Ok(v);
        }
        extras.push(v);
    }

    match kind {
        PipelineKind::Pipe => {
            let mut call_args = Vec::with_capacity(1 + extras.len());
            call_args.push(list_val);
            call_args.extend(extras);
            call_value(&callee_val, call_args)
        }
        PipelineKind::Map => {
            let elements = pipeline_elements(&list_val)?;
            let mut out = Vec::with_capacity(elements.len());
            for elem in elements {
                let mut call_args = Vec::with_capacity(1 + extras.len());
                call_args.push(elem);
                call_args.extend(extras.iter().cloned());
                out.push(call_value(&callee_val, call_args)?);
            }
            Ok(Value::list(out))
        }
        PipelineKind::Filter => {
            let elements = pipeline_elements(&list_val)?;
            let mut out = Vec::new();
            for elem in elements {
                let mut call_args = Vec::with_capacity(1 + extras.len());
                call_args.push(elem.clone());
                call_args.extend(extras.iter().cloned());
                let keep = call_value(&callee_val, call_args)?;
                if keep.is_truthy() {
                    out.push(elem);
                }
            }
            Ok(Value::list(out))
        }
    }
}

fn pipeline_elements(list_val: &Value) -> Result<Vec<Value>, EvalError> {
    match list_val {
        Value::List(items) => Ok(items.borrow().clone()),
        Value::String(s) => Ok(s.chars().map(|c| Value::string(c.to_string())).collect()),
        other => Err(EvalError::runtime_error(
            "pipeline",
            format!("expected a List or String, got {}", other.type_name()),
        )),
    }
}
