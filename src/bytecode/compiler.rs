// ABOUTME: Compiler lowering the AST subset (literals, arithmetic, comparisons) to bytecode

use crate::ast::{Expression, PrefixOp, Statement};
use crate::bytecode::{make, Instructions, Opcode};
use crate::error::CompileError;
use crate::value::Value;

/// The flat instruction stream plus the constant pool it indexes into,
/// ready to hand to a [`crate::bytecode::Vm`].
#[derive(Debug, Clone, Default)]
pub struct Bytecode {
    pub instructions: Instructions,
    pub constants: Vec<Value>,
}

#[derive(Default)]
pub struct Compiler {
    instructions: Instructions,
    constants: Vec<Value>,
}

impl Compiler {
    pub fn new() -> Self {
        Compiler::default()
    }

    pub fn compile_statement(&mut self, stmt: &Statement) -> Result<(), CompileError> {
        match stmt {
            Statement::Program(stmts) | Statement::Block(stmts) => {
                for s in stmts {
                    self.compile_statement(s)?;
                }
                Ok(())
            }
            Statement::Expression(expr) => {
                self.compile_expression(expr)?;
                self.emit(Opcode::Pop, &[]);
                Ok(())
            }
            other => Err(CompileError(format!(
                "bytecode VM subset does not support statement {other:?}"
            ))),
        }
    }

    fn compile_expression(&mut self, expr: &Expression) -> Result<(), CompileError> {
        match expr {
            Expression::IntegerLiteral(n) => {
                let idx = self.add_constant(Value::Integer(*n));
                self.emit(Opcode::Constant, &[idx]);
                Ok(())
            }
            Expression::FloatLiteral(n) => {
                let idx = self.add_constant(Value::Float(*n));
                self.emit(Opcode::Constant, &[idx]);
                Ok(())
            }
            Expression::StringLiteral(s) => {
                let idx = self.add_constant(Value::string(s.clone()));
                self.emit(Opcode::Constant, &[idx]);
                Ok(())
            }
            Expression::BooleanLiteral(true) => {
                self.emit(Opcode::True, &[]);
                Ok(())
            }
            Expression::BooleanLiteral(false) => {
                self.emit(Opcode::False, &[]);
                Ok(())
            }
            Expression::Prefix { op, right } => self.compile_prefix(*op, right),
            Expression::Infix { op, left, right } => self.compile_infix(op, left, right),
            other => Err(CompileError(format!(
                "bytecode VM subset does not support expression {other:?}"
            ))),
        }
    }

    fn compile_prefix(&mut self, op: PrefixOp, right: &Expression) -> Result<(), CompileError> {
        self.compile_expression(right)?;
        match op {
            PrefixOp::Neg => {
                self.emit(Opcode::Neg, &[]);
                Ok(())
            }
            PrefixOp::Plus | PrefixOp::Not => Err(CompileError(format!(
                "unknown operator {op:?}"
            ))),
        }
    }

    fn compile_infix(
        &mut self,
        op: &str,
        left: &Expression,
        right: &Expression,
    ) -> Result<(), CompileError> {
        self.compile_expression(left)?;
        self.compile_expression(right)?;
        let opcode = match op {
            "+" => Opcode::Add,
            "-" => Opcode::Sub,
            "*" => Opcode::Mul,
            "/" => Opcode::Div,
            "%" => Opcode::Mod,
            "==" => Opcode::Equal,
            "!=" => Opcode::NotEqual,
            ">" => Opcode::GreaterThan,
            "<" => Opcode::LessThan,
            ">=" => Opcode::GreaterThanEqual,
            "<=" => Opcode::LessThanEqual,
            other => return Err(CompileError(format!("unknown operator {other}"))),
        };
        self.emit(opcode, &[]);
        Ok(())
    }

    fn emit(&mut self, op: Opcode, operands: &[usize]) -> usize {
        let pos = self.instructions.len();
        self.instructions.extend(&make(op, operands));
        pos
    }

    fn add_constant(&mut self, value: Value) -> usize {
        self.constants.push(value);
        self.constants.len() - 1
    }

    pub fn bytecode(self) -> Bytecode {
        Bytecode {
            instructions: self.instructions,
            constants: self.constants,
        }
    }
}

/// Compiles a full program's AST into bytecode in one call.
pub fn compile(program: &Statement) -> Result<Bytecode, CompileError> {
    let mut compiler = Compiler::new();
    compiler.compile_statement(program)?;
    Ok(compiler.bytecode())
}
