// ABOUTME: Pratt/precedence-climbing parser turning a token stream into an AST

use crate::ast::{Expression, PipelineKind, PrefixOp, Statement};
use crate::error::ParseError;
use crate::token::{Token, TokenKind};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
enum Precedence {
    Lowest,
    Assign,
    Ternary,
    Pipeline,
    Or,
    And,
    Equality,
    Relational,
    Additive,
    Multiplicative,
    Prefix,
    Call,
    Member,
}

fn precedence_of(kind: &TokenKind) -> Precedence {
    match kind {
        TokenKind::Assign => Precedence::Assign,
        TokenKind::Question => Precedence::Ternary,
        TokenKind::Pipe | TokenKind::Arrow | TokenKind::Bind => Precedence::Pipeline,
        TokenKind::Or => Precedence::Or,
        TokenKind::And => Precedence::And,
        TokenKind::Eq | TokenKind::NotEq => Precedence::Equality,
        TokenKind::Lt | TokenKind::Gt | TokenKind::LtEq | TokenKind::GtEq => Precedence::Relational,
        TokenKind::Plus | TokenKind::Minus => Precedence::Additive,
        TokenKind::Star | TokenKind::Slash | TokenKind::Percent => Precedence::Multiplicative,
        TokenKind::LParen => Precedence::Call,
        TokenKind::LBracket | TokenKind::Dot => Precedence::Member,
        _ => Precedence::Lowest,
    }
}

pub struct Parser {
    tokens: Vec<Token>,
    pos: usize,
    errors: Vec<String>,
    stopped: bool,
}

impl Parser {
    pub fn new(tokens: Vec<Token>) -> Self {
        Parser {
            tokens,
            pos: 0,
            errors: Vec::new(),
            stopped: false,
        }
    }

    fn cur(&self) -> &Token {
        &self.tokens[self.pos.min(self.tokens.len() - 1)]
    }

    fn peek(&self) -> &Token {
        let idx = (self.pos + 1).min(self.tokens.len() - 1);
        &self.tokens[idx]
    }

    fn next_token(&mut self) {
        if self.pos < self.tokens.len() - 1 {
            self.pos += 1;
        }
    }

    fn cur_is(&self, kind: &TokenKind) -> bool {
        &self.cur().kind == kind
    }

    fn peek_is(&self, kind: &TokenKind) -> bool {
        &self.peek().kind == kind
    }

    fn expect_peek(&mut self, kind: TokenKind) -> bool {
        if self.peek_is(&kind) {
            self.next_token();
            true
        } else {
            let tok = self.peek();
            self.errors.push(format!(
                "expected next token to be {:?}, got {:?} instead at line {}, col {}",
                kind, tok.kind, tok.line, tok.col
            ));
            self.stopped = true;
            false
        }
    }

    fn peek_precedence(&self) -> Precedence {
        precedence_of(&self.peek().kind)
    }

    fn no_prefix_parse_fn_error(&mut self) {
        let tok = self.cur();
        self.errors.push(format!(
            "no prefix parse function for {:?} found at line {}, col {}",
            tok.kind, tok.line, tok.col
        ));
        self.stopped = true;
    }

    pub fn parse_program(mut self) -> Result<Statement, ParseError> {
        let mut statements = Vec::new();
        while !self.cur_is(&TokenKind::Eof) && !self.stopped {
            if let Some(stmt) = self.parse_statement() {
                statements.push(stmt);
            }
            self.next_token();
        }
        if !self.errors.is_empty() {
            return Err(ParseError(self.errors.join("\n")));
        }
        Ok(Statement::Program(statements))
    }

    fn parse_statement(&mut self) -> Option<Statement> {
        match self.cur().kind {
            TokenKind::If => self.parse_if_statement(),
            TokenKind::Iter => self.parse_iter_statement(),
            TokenKind::At if self.peek_is(&TokenKind::Ident) => {
                self.parse_var_assignment_statement()
            }
            _ => self.parse_expression_statement(),
        }
    }

    /// Legacy `@name = expr` top-level assignment. Distinguished from the
    /// `@(params) { body }` function literal by the token right after `@`:
    /// an identifier here, `(` there.
    fn parse_var_assignment_statement(&mut self) -> Option<Statement> {
        if !self.expect_peek(TokenKind::Ident) {
            return None;
        }
        let name = self.cur().text.clone();
        if !self.expect_peek(TokenKind::Assign) {
            return None;
        }
        self.next_token();
        let value = self.parse_expression(Precedence::Lowest)?;
        if self.peek_is(&TokenKind::Semicolon) {
            self.next_token();
        }
        Some(Statement::VarAssignment { name, value })
    }

    fn parse_expression_statement(&mut self) -> Option<Statement> {
        let expr = self.parse_expression(Precedence::Lowest)?;
        if self.peek_is(&TokenKind::Semicolon) {
            self.next_token();
        }
        Some(Statement::Expression(expr))
    }

    fn parse_block_statement(&mut self) -> Option<Statement> {
        // cur is `{`
        self.next_token();
        let mut statements = Vec::new();
        while !self.cur_is(&TokenKind::RBrace) && !self.cur_is(&TokenKind::Eof) && !self.stopped {
            if let Some(stmt) = self.parse_statement() {
                statements.push(stmt);
            }
            self.next_token();
        }
        Some(Statement::Block(statements))
    }

    fn parse_if_statement(&mut self) -> Option<Statement> {
        self.next_token(); // consume `if`
        let condition = self.parse_expression(Precedence::Lowest)?;

        if !self.expect_peek(TokenKind::LBrace) {
            return None;
        }
        let consequence = Box::new(self.parse_block_statement()?);

        let alternative = if self.peek_is(&TokenKind::Else) {
            self.next_token(); // consume `else`
            if self.peek_is(&TokenKind::If) {
                self.next_token();
                self.parse_if_statement().map(Box::new)
            } else if self.expect_peek(TokenKind::LBrace) {
                self.parse_block_statement().map(Box::new)
            } else {
                return None;
            }
        } else {
            None
        };

        Some(Statement::If {
            condition,
            consequence,
            alternative,
        })
    }

    fn parse_iter_statement(&mut self) -> Option<Statement> {
        self.next_token(); // consume `iter`
        let list = self.parse_expression(Precedence::Lowest)?;

        if !self.expect_peek(TokenKind::As) {
            return None;
        }
        if !self.expect_peek(TokenKind::Ident) {
            return None;
        }
        let binding = self.cur().text.clone();

        if !self.expect_peek(TokenKind::LBrace) {
            return None;
        }
        let body = Box::new(self.parse_block_statement()?);

        Some(Statement::Iter {
            list,
            binding,
            body,
        })
    }

    fn parse_expression(&mut self, precedence: Precedence) -> Option<Expression> {
        let mut left = self.parse_prefix()?;

        while !self.peek_is(&TokenKind::Semicolon) && precedence < self.peek_precedence() {
            self.next_token();
            left = self.parse_infix(left)?;
        }

        Some(left)
    }

    fn parse_prefix(&mut self) -> Option<Expression> {
        match self.cur().kind.clone() {
            TokenKind::Ident => Some(Expression::Identifier(self.cur().text.clone())),
            TokenKind::Int => {
                let text = self.cur().text.clone();
                match text.parse::<i64>() {
                    Ok(n) => Some(Expression::IntegerLiteral(n)),
                    Err(_) => {
                        self.errors.push(format!(
                            "could not parse {text:?} as integer at line {}, col {}",
                            self.cur().line,
                            self.cur().col
                        ));
                        self.stopped = true;
                        None
                    }
                }
            }
            TokenKind::Float => {
                let text = self.cur().text.clone();
                match text.parse::<f64>() {
                    Ok(n) => Some(Expression::FloatLiteral(n)),
                    Err(_) => {
                        self.errors.push(format!(
                            "could not parse {text:?} as float at line {}, col {}",
                            self.cur().line,
                            self.cur().col
                        ));
                        self.stopped = true;
                        None
                    }
                }
            }
            TokenKind::Str => Some(Expression::StringLiteral(self.cur().text.clone())),
            TokenKind::True => Some(Expression::BooleanLiteral(true)),
            TokenKind::False => Some(Expression::BooleanLiteral(false)),
            TokenKind::LBracket => self.parse_list_literal(),
            TokenKind::LParen => self.parse_grouped_expression(),
            TokenKind::Minus => self.parse_prefix_expression(PrefixOp::Neg),
            TokenKind::Plus => self.parse_prefix_expression(PrefixOp::Plus),
            TokenKind::Bang => self.parse_prefix_expression(PrefixOp::Not),
            TokenKind::At | TokenKind::Fn => self.parse_func_literal(),
            _ => {
                self.no_prefix_parse_fn_error();
                None
            }
        }
    }

    fn parse_prefix_expression(&mut self, op: PrefixOp) -> Option<Expression> {
        self.next_token();
        let right = self.parse_expression(Precedence::Prefix)?;
        Some(Expression::Prefix {
            op,
            right: Box::new(right),
        })
    }

    fn parse_grouped_expression(&mut self) -> Option<Expression> {
        self.next_token();
        let expr = self.parse_expression(Precedence::Lowest)?;
        if !self.expect_peek(TokenKind::RParen) {
            return None;
        }
        Some(expr)
    }

    fn parse_list_literal(&mut self) -> Option<Expression> {
        let elements = self.parse_expression_list(TokenKind::RBracket)?;
        Some(Expression::ListLiteral(elements))
    }

    fn parse_expression_list(&mut self, end: TokenKind) -> Option<Vec<Expression>> {
        let mut list = Vec::new();
        if self.peek_is(&end) {
            self.next_token();
            return Some(list);
        }
        self.next_token();
        list.push(self.parse_expression(Precedence::Lowest)?);
        while self.peek_is(&TokenKind::Comma) {
            self.next_token();
            self.next_token();
            list.push(self.parse_expression(Precedence::Lowest)?);
        }
        if !self.expect_peek(end) {
            return None;
        }
        Some(list)
    }

    fn parse_func_literal(&mut self) -> Option<Expression> {
        if !self.expect_peek(TokenKind::LParen) {
            return None;
        }
        let params = self.parse_identifier_list(TokenKind::RParen)?;
        if !self.expect_peek(TokenKind::LBrace) {
            return None;
        }
        let body = Box::new(self.parse_block_statement()?);
        Some(Expression::FuncLiteral {
            params,
            body,
            name: None,
        })
    }

    fn parse_identifier_list(&mut self, end: TokenKind) -> Option<Vec<String>> {
        let mut idents = Vec::new();
        if self.peek_is(&end) {
            self.next_token();
            return Some(idents);
        }
        if !self.expect_peek(TokenKind::Ident) {
            return None;
        }
        idents.push(self.cur().text.clone());
        while self.peek_is(&TokenKind::Comma) {
            self.next_token();
            if !self.expect_peek(TokenKind::Ident) {
                return None;
            }
            idents.push(self.cur().text.clone());
        }
        if !self.expect_peek(end) {
            return None;
        }
        Some(idents)
    }

    fn parse_infix(&mut self, left: Expression) -> Option<Expression> {
        match self.cur().kind.clone() {
            TokenKind::Plus
            | TokenKind::Minus
            | TokenKind::Star
            | TokenKind::Slash
            | TokenKind::Percent
            | TokenKind::Eq
            | TokenKind::NotEq
            | TokenKind::Lt
            | TokenKind::Gt
            | TokenKind::LtEq
            | TokenKind::GtEq
            | TokenKind::And
            | TokenKind::Or => self.parse_infix_expression(left),
            TokenKind::Assign => self.parse_assign_expression(left),
            TokenKind::LParen => self.parse_call_expression(left),
            TokenKind::LBracket => self.parse_index_expression(left),
            TokenKind::Dot => self.parse_member_access(left),
            TokenKind::Question => self.parse_ternary_expression(left),
            TokenKind::Pipe => self.parse_pipeline_expression(left, PipelineKind::Pipe),
            TokenKind::Arrow => self.parse_pipeline_expression(left, PipelineKind::Map),
            TokenKind::Bind => self.parse_pipeline_expression(left, PipelineKind::Filter),
            _ => None,
        }
    }

    fn op_text(kind: &TokenKind) -> &'static str {
        match kind {
            TokenKind::Plus => "+",
            TokenKind::Minus => "-",
            TokenKind::Star => "*",
            TokenKind::Slash => "/",
            TokenKind::Percent => "%",
            TokenKind::Eq => "==",
            TokenKind::NotEq => "!=",
            TokenKind::Lt => "<",
            TokenKind::Gt => ">",
            TokenKind::LtEq => "<=",
            TokenKind::GtEq => ">=",
            TokenKind::And => "&&",
            TokenKind::Or => "||",
            _ => "?",
        }
    }

    fn parse_infix_expression(&mut self, left: Expression) -> Option<Expression> {
        let op = Self::op_text(&self.cur().kind).to_string();
        let precedence = precedence_of(&self.cur().kind);
        self.next_token();
        let right = self.parse_expression(precedence)?;
        Some(Expression::Infix {
            op,
            left: Box::new(left),
            right: Box::new(right),
        })
    }

    fn parse_assign_expression(&mut self, target: Expression) -> Option<Expression> {
        self.next_token();
        let value = self.parse_expression(Precedence::Lowest)?;
        Some(Expression::Assign {
            target: Box::new(target),
            value: Box::new(value),
        })
    }

    fn parse_call_expression(&mut self, callee: Expression) -> Option<Expression> {
        let args = self.parse_expression_list(TokenKind::RParen)?;
        Some(Expression::Call {
            callee: Box::new(callee),
            args,
        })
    }

    fn parse_index_expression(&mut self, left: Expression) -> Option<Expression> {
        self.next_token();
        let index = self.parse_expression(Precedence::Lowest)?;
        if !self.expect_peek(TokenKind::RBracket) {
            return None;
        }
        Some(Expression::Index {
            left: Box::new(left),
            index: Box::new(index),
        })
    }

    fn parse_member_access(&mut self, left: Expression) -> Option<Expression> {
        if !self.expect_peek(TokenKind::Ident) {
            return None;
        }
        let member = self.cur().text.clone();
        Some(Expression::MemberAccess {
            left: Box::new(left),
            member,
        })
    }

    fn parse_ternary_expression(&mut self, condition: Expression) -> Option<Expression> {
        self.next_token();
        let consequence = self.parse_expression(Precedence::Lowest)?;
        if !self.expect_peek(TokenKind::Colon) {
            return None;
        }
        self.next_token();
        let alternative = self.parse_expression(Precedence::Ternary)?;
        Some(Expression::Ternary {
            condition: Box::new(condition),
            consequence: Box::new(consequence),
            alternative: Box::new(alternative),
        })
    }

    fn parse_pipeline_expression(
        &mut self,
        list: Expression,
        kind: PipelineKind,
    ) -> Option<Expression> {
        self.next_token();
        let callee = self.parse_expression(Precedence::Lowest)?;
        if !self.expect_peek(TokenKind::LBrace) {
            return None;
        }
        let extra_args = self.parse_expression_list(TokenKind::RBrace)?;
        Some(Expression::Pipeline {
            list: Box::new(list),
            kind,
            callee: Box::new(callee),
            extra_args,
        })
    }
}

pub fn parse(tokens: Vec<Token>) -> Result<Statement, ParseError> {
    Parser::new(tokens).parse_program()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lexer::lex;

    fn parse_src(src: &str) -> Statement {
        parse(lex(src).unwrap()).unwrap()
    }

    #[test]
    fn test_empty_source_parses_to_empty_program() {
        match parse_src("") {
            Statement::Program(stmts) => assert!(stmts.is_empty()),
            _ => panic!("expected program"),
        }
    }

    #[test]
    fn test_precedence_multiplication_before_addition() {
        match parse_src("1 + 2 * 3") {
            Statement::Program(stmts) => match &stmts[0] {
                Statement::Expression(Expression::Infix { op, right, .. }) => {
                    assert_eq!(op, "+");
                    assert!(matches!(**right, Expression::Infix { .. }));
                }
                other => panic!("unexpected statement: {other:?}"),
            },
            _ => panic!("expected program"),
        }
    }

    #[test]
    fn test_list_literal() {
        match parse_src("[1, 2, 3]") {
            Statement::Program(stmts) => match &stmts[0] {
                Statement::Expression(Expression::ListLiteral(items)) => {
                    assert_eq!(items.len(), 3);
                }
                other => panic!("unexpected statement: {other:?}"),
            },
            _ => panic!("expected program"),
        }
    }

    #[test]
    fn test_func_literal_with_at() {
        match parse_src("@(x, y) { x + y }") {
            Statement::Program(stmts) => match &stmts[0] {
                Statement::Expression(Expression::FuncLiteral { params, .. }) => {
                    assert_eq!(params, &vec!["x".to_string(), "y".to_string()]);
                }
                other => panic!("unexpected statement: {other:?}"),
            },
            _ => panic!("expected program"),
        }
    }

    #[test]
    fn test_legacy_var_assignment_with_at() {
        match parse_src("@x = 1") {
            Statement::Program(stmts) => match &stmts[0] {
                Statement::VarAssignment { name, value } => {
                    assert_eq!(name, "x");
                    assert_eq!(*value, Expression::IntegerLiteral(1));
                }
                other => panic!("unexpected statement: {other:?}"),
            },
            _ => panic!("expected program"),
        }
    }

    #[test]
    fn test_at_followed_by_paren_is_still_a_func_literal_not_legacy_assignment() {
        match parse_src("f = @(x) { x }") {
            Statement::Program(stmts) => match &stmts[0] {
                Statement::Expression(Expression::Assign { value, .. }) => {
                    assert!(matches!(**value, Expression::FuncLiteral { .. }));
                }
                other => panic!("unexpected statement: {other:?}"),
            },
            _ => panic!("expected program"),
        }
    }

    #[test]
    fn test_pipeline_map() {
        match parse_src("xs -> @(x){ x*x } {}") {
            Statement::Program(stmts) => match &stmts[0] {
                Statement::Expression(Expression::Pipeline { kind, extra_args, .. }) => {
                    assert_eq!(*kind, PipelineKind::Map);
                    assert!(extra_args.is_empty());
                }
                other => panic!("unexpected statement: {other:?}"),
            },
            _ => panic!("expected program"),
        }
    }

    #[test]
    fn test_if_else_if_chain() {
        let stmt = parse_src("if a { 1 } else if b { 2 } else { 3 }");
        match stmt {
            Statement::Program(stmts) => {
                assert!(matches!(stmts[0], Statement::If { .. }));
            }
            _ => panic!("expected program"),
        }
    }

    #[test]
    fn test_iter_statement() {
        let stmt = parse_src("iter [1,2,3] as i { print(i) }");
        match stmt {
            Statement::Program(stmts) => match &stmts[0] {
                Statement::Iter { binding, .. } => assert_eq!(binding, "i"),
                other => panic!("unexpected statement: {other:?}"),
            },
            _ => panic!("expected program"),
        }
    }

    #[test]
    fn test_mismatched_token_is_parse_error() {
        let result = Parser::new(lex("if a 1 }").unwrap()).parse_program();
        assert!(result.is_err());
    }

    #[test]
    fn test_member_access_and_call_chain() {
        let stmt = parse_src("p.sum()");
        match stmt {
            Statement::Program(stmts) => match &stmts[0] {
                Statement::Expression(Expression::Call { callee, .. }) => {
                    assert!(matches!(**callee, Expression::MemberAccess { .. }));
                }
                other => panic!("unexpected statement: {other:?}"),
            },
            _ => panic!("expected program"),
        }
    }
}
