//! Recursive-descent parser over the [`lexer`](super::lexer) token stream.
//!
//! Covers the syntactic subset spec.md §3 names: variable declarations,
//! function declarations/expressions/arrow functions, the control-flow
//! statements, try/catch/finally, switch, the expression grammar down to
//! assignment/conditional/logical/binary/unary/call/member, arrays,
//! objects, and sequences. Constructs outside the subset (template
//! literals, regex literals, `new`, classes, destructuring, generators)
//! are rejected with [`AstError::Unsupported`] rather than silently
//! mis-parsed — a caller that hits one is expected to fall back to
//! treating the script as opaque, the same way a malformed-input parse
//! failure is handled upstream.

use super::lexer::{Keyword, LexError, Lexer, SpannedToken, Token};
use super::node::*;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum AstError {
    #[error("{0}")]
    Lex(#[from] LexError),
    #[error("expected {expected} at byte {pos}")]
    UnexpectedToken { expected: String, pos: usize },
    #[error("expected {expected}, found eof")]
    UnexpectedEof { expected: String },
    #[error("unsupported construct `{what}` at byte {pos}")]
    Unsupported { what: String, pos: usize },
}

pub fn parse(src: &str) -> Result<Program, AstError> {
    let tokens = Lexer::tokenize(src)?;
    let mut parser = Parser::new(tokens);
    parser.parse_program()
}

struct Parser {
    tokens: Vec<SpannedToken>,
    pos: usize,
}

#[derive(Clone, Copy, PartialEq)]
enum OpKind {
    Binary(BinaryOp),
    Logical(LogicalOp),
}

/// (token text, precedence, kind). Higher precedence binds tighter.
/// Everything JS puts below `+`/`-` that this crate doesn't fold
/// (bitwise, relational, equality, shift) still parses correctly, it
/// just comes out tagged `BinaryOp::Other`.
fn operator_info(tok: &Token) -> Option<(u8, OpKind)> {
    use BinaryOp::*;
    use LogicalOp::*;
    use OpKind::*;
    Some(match tok {
        Token::Punct("??") => (1, Logical(Nullish)),
        Token::Punct("||") => (1, Logical(Or)),
        Token::Punct("&&") => (2, Logical(And)),
        Token::Punct("|") => (3, Binary(Other)),
        Token::Punct("^") => (4, Binary(Other)),
        Token::Punct("&") => (5, Binary(Other)),
        Token::Punct("==") | Token::Punct("!=") | Token::Punct("===") | Token::Punct("!==") => {
            (6, Binary(Other))
        }
        Token::Punct("<") | Token::Punct(">") | Token::Punct("<=") | Token::Punct(">=") => {
            (7, Binary(Other))
        }
        Token::Keyword(Keyword::In) => (7, Binary(Other)),
        Token::Punct("<<") | Token::Punct(">>") | Token::Punct(">>>") => (8, Binary(Other)),
        Token::Punct("+") => (9, Binary(Add)),
        Token::Punct("-") => (9, Binary(Sub)),
        Token::Punct("*") => (10, Binary(Mul)),
        Token::Punct("/") => (10, Binary(Div)),
        Token::Punct("%") => (10, Binary(Mod)),
        Token::Punct("**") => (11, Binary(Other)),
        _ => return None,
    })
}

const ASSIGN_PUNCTS: &[&str] = &[
    "=", "+=", "-=", "*=", "/=", "%=", "**=", "<<=", ">>=", ">>>=", "&=", "|=", "^=", "&&=",
    "||=", "??=",
];

impl Parser {
    fn new(tokens: Vec<SpannedToken>) -> Self {
        Parser { tokens, pos: 0 }
    }

    fn peek(&self) -> &Token {
        &self.tokens[self.pos].token
    }

    fn peek_at(&self, offset: usize) -> &Token {
        self.tokens
            .get(self.pos + offset)
            .map(|t| &t.token)
            .unwrap_or(&Token::Eof)
    }

    fn pos_here(&self) -> usize {
        self.tokens[self.pos].pos
    }

    fn bump(&mut self) -> Token {
        let tok = self.tokens[self.pos].token.clone();
        if self.pos + 1 < self.tokens.len() {
            self.pos += 1;
        }
        tok
    }

    fn at_punct(&self, p: &str) -> bool {
        matches!(self.peek(), Token::Punct(x) if *x == p)
    }

    fn at_keyword(&self, k: Keyword) -> bool {
        matches!(self.peek(), Token::Keyword(x) if *x == k)
    }

    fn eat_punct(&mut self, p: &str) -> bool {
        if self.at_punct(p) {
            self.bump();
            true
        } else {
            false
        }
    }

    fn expect_punct(&mut self, p: &str) -> Result<(), AstError> {
        if self.eat_punct(p) {
            Ok(())
        } else {
            Err(AstError::UnexpectedToken {
                expected: format!("`{p}`"),
                pos: self.pos_here(),
            })
        }
    }

    fn eat_keyword(&mut self, k: Keyword) -> bool {
        if self.at_keyword(k) {
            self.bump();
            true
        } else {
            false
        }
    }

    fn expect_keyword(&mut self, k: Keyword) -> Result<(), AstError> {
        if self.eat_keyword(k) {
            Ok(())
        } else {
            Err(AstError::UnexpectedToken {
                expected: format!("keyword {k:?}"),
                pos: self.pos_here(),
            })
        }
    }

    fn expect_identifier(&mut self) -> Result<Identifier, AstError> {
        match self.peek().clone() {
            Token::Identifier(name) => {
                self.bump();
                Ok(Identifier::new(name))
            }
            _ => Err(AstError::UnexpectedToken {
                expected: "identifier".to_string(),
                pos: self.pos_here(),
            }),
        }
    }

    // ---- program / statements ----

    fn parse_program(&mut self) -> Result<Program, AstError> {
        let mut body = Vec::new();
        while !matches!(self.peek(), Token::Eof) {
            body.push(self.parse_statement()?);
        }
        Ok(Program { body })
    }

    fn parse_statement(&mut self) -> Result<Stmt, AstError> {
        match self.peek().clone() {
            Token::Punct(";") => {
                self.bump();
                Ok(Stmt::Empty)
            }
            Token::Punct("{") => self.parse_block(),
            Token::Keyword(Keyword::Var) | Token::Keyword(Keyword::Let) | Token::Keyword(Keyword::Const) => {
                let decl = self.parse_variable_declaration()?;
                self.eat_punct(";");
                Ok(decl)
            }
            Token::Keyword(Keyword::Function) => self.parse_function_declaration(),
            Token::Keyword(Keyword::Return) => {
                self.bump();
                let arg = if self.at_punct(";") || self.at_punct("}") || matches!(self.peek(), Token::Eof) {
                    Expr::Missing
                } else {
                    self.parse_expression()?
                };
                self.eat_punct(";");
                Ok(Stmt::Return(Box::new(arg)))
            }
            Token::Keyword(Keyword::If) => self.parse_if(),
            Token::Keyword(Keyword::For) => self.parse_for(),
            Token::Keyword(Keyword::While) => self.parse_while(),
            Token::Keyword(Keyword::Do) => self.parse_do_while(),
            Token::Keyword(Keyword::Try) => self.parse_try(),
            Token::Keyword(Keyword::Switch) => self.parse_switch(),
            Token::Keyword(Keyword::Break) => {
                self.bump();
                self.eat_punct(";");
                Ok(Stmt::Break)
            }
            Token::Keyword(Keyword::Continue) => {
                self.bump();
                self.eat_punct(";");
                Ok(Stmt::Continue)
            }
            _ => {
                let expr = self.parse_expression()?;
                self.eat_punct(";");
                Ok(Stmt::Expression(expr))
            }
        }
    }

    fn parse_block(&mut self) -> Result<Stmt, AstError> {
        self.expect_punct("{")?;
        let mut body = Vec::new();
        while !self.at_punct("}") && !matches!(self.peek(), Token::Eof) {
            body.push(self.parse_statement()?);
        }
        self.expect_punct("}")?;
        Ok(Stmt::Block(body))
    }

    fn parse_block_body(&mut self) -> Result<Vec<Stmt>, AstError> {
        match self.parse_block()? {
            Stmt::Block(body) => Ok(body),
            _ => unreachable!(),
        }
    }

    /// A statement where a bare block is still a block, but any other
    /// single statement is wrapped to keep the `Vec<Stmt>` contract
    /// consistent for loop/if bodies. Non-block bodies become a
    /// single-element vec.
    fn parse_statement_as_body(&mut self) -> Result<Stmt, AstError> {
        self.parse_statement()
    }

    fn parse_variable_declaration(&mut self) -> Result<Stmt, AstError> {
        self.bump(); // var/let/const
        let mut decls = Vec::new();
        loop {
            let name = self.expect_identifier()?;
            let init = if self.eat_punct("=") {
                self.parse_assignment_expr()?
            } else {
                Expr::Missing
            };
            decls.push(VariableDeclarator {
                name,
                init: Box::new(init),
            });
            if !self.eat_punct(",") {
                break;
            }
        }
        Ok(Stmt::VariableDeclaration(decls))
    }

    fn parse_function_declaration(&mut self) -> Result<Stmt, AstError> {
        let func = self.parse_function_literal(false)?;
        Ok(Stmt::FunctionDeclaration(func))
    }

    fn parse_function_literal(&mut self, arrow_like: bool) -> Result<FunctionLiteral, AstError> {
        debug_assert!(!arrow_like);
        self.expect_keyword(Keyword::Function)?;
        let name = if let Token::Identifier(_) = self.peek() {
            Some(self.expect_identifier()?)
        } else {
            None
        };
        let params = self.parse_param_list()?;
        let body = self.parse_block_body()?;
        Ok(FunctionLiteral {
            name,
            params,
            body,
            is_arrow: false,
        })
    }

    fn parse_param_list(&mut self) -> Result<Vec<Identifier>, AstError> {
        self.expect_punct("(")?;
        let mut params = Vec::new();
        while !self.at_punct(")") {
            params.push(self.expect_identifier()?);
            if !self.eat_punct(",") {
                break;
            }
        }
        self.expect_punct(")")?;
        Ok(params)
    }

    fn parse_if(&mut self) -> Result<Stmt, AstError> {
        self.expect_keyword(Keyword::If)?;
        self.expect_punct("(")?;
        let test = self.parse_expression()?;
        self.expect_punct(")")?;
        let consequent = self.parse_statement_as_body()?;
        let alternate = if self.eat_keyword(Keyword::Else) {
            Some(Box::new(self.parse_statement_as_body()?))
        } else {
            None
        };
        Ok(Stmt::If {
            test: Box::new(test),
            consequent: Box::new(consequent),
            alternate,
        })
    }

    fn parse_for(&mut self) -> Result<Stmt, AstError> {
        self.expect_keyword(Keyword::For)?;
        self.expect_punct("(")?;

        let init: Option<Stmt> = if self.at_punct(";") {
            None
        } else if self.at_keyword(Keyword::Var)
            || self.at_keyword(Keyword::Let)
            || self.at_keyword(Keyword::Const)
        {
            let kind_pos = self.pos;
            self.bump();
            let name = self.expect_identifier()?;
            if self.eat_keyword(Keyword::In) {
                let left = Stmt::VariableDeclaration(vec![VariableDeclarator {
                    name,
                    init: Box::new(Expr::Missing),
                }]);
                let right = self.parse_expression()?;
                self.expect_punct(")")?;
                let body = self.parse_statement_as_body()?;
                return Ok(Stmt::ForIn {
                    left: Box::new(left),
                    right: Box::new(right),
                    body: Box::new(body),
                });
            }
            // Not a for-in: rewind and parse as a normal declaration list.
            self.pos = kind_pos;
            Some(self.parse_variable_declaration()?)
        } else {
            let expr = self.parse_expression()?;
            if self.eat_keyword(Keyword::In) {
                let left = Stmt::Expression(expr);
                let right = self.parse_expression()?;
                self.expect_punct(")")?;
                let body = self.parse_statement_as_body()?;
                return Ok(Stmt::ForIn {
                    left: Box::new(left),
                    right: Box::new(right),
                    body: Box::new(body),
                });
            }
            Some(Stmt::Expression(expr))
        };
        self.expect_punct(";")?;

        let test = if self.at_punct(";") {
            Expr::Missing
        } else {
            self.parse_expression()?
        };
        self.expect_punct(";")?;

        let update = if self.at_punct(")") {
            Expr::Missing
        } else {
            self.parse_expression()?
        };
        self.expect_punct(")")?;

        let body = self.parse_statement_as_body()?;
        Ok(Stmt::For {
            init: init.map(Box::new),
            test: Box::new(test),
            update: Box::new(update),
            body: Box::new(body),
        })
    }

    fn parse_while(&mut self) -> Result<Stmt, AstError> {
        self.expect_keyword(Keyword::While)?;
        self.expect_punct("(")?;
        let test = self.parse_expression()?;
        self.expect_punct(")")?;
        let body = self.parse_statement_as_body()?;
        Ok(Stmt::While {
            test: Box::new(test),
            body: Box::new(body),
        })
    }

    fn parse_do_while(&mut self) -> Result<Stmt, AstError> {
        self.expect_keyword(Keyword::Do)?;
        let body = self.parse_statement_as_body()?;
        self.expect_keyword(Keyword::While)?;
        self.expect_punct("(")?;
        let test = self.parse_expression()?;
        self.expect_punct(")")?;
        self.eat_punct(";");
        Ok(Stmt::DoWhile {
            test: Box::new(test),
            body: Box::new(body),
        })
    }

    fn parse_try(&mut self) -> Result<Stmt, AstError> {
        self.expect_keyword(Keyword::Try)?;
        let block = self.parse_block_body()?;
        let catch = if self.eat_keyword(Keyword::Catch) {
            let param = if self.eat_punct("(") {
                let id = self.expect_identifier()?;
                self.expect_punct(")")?;
                Some(id)
            } else {
                None
            };
            let body = self.parse_block_body()?;
            Some(CatchClause { param, body })
        } else {
            None
        };
        let finally = if self.eat_keyword(Keyword::Finally) {
            Some(self.parse_block_body()?)
        } else {
            None
        };
        Ok(Stmt::Try {
            block,
            catch,
            finally,
        })
    }

    fn parse_switch(&mut self) -> Result<Stmt, AstError> {
        self.expect_keyword(Keyword::Switch)?;
        self.expect_punct("(")?;
        let discriminant = self.parse_expression()?;
        self.expect_punct(")")?;
        self.expect_punct("{")?;
        let mut cases = Vec::new();
        while !self.at_punct("}") {
            let test = if self.eat_keyword(Keyword::Case) {
                let e = self.parse_expression()?;
                Some(e)
            } else {
                self.expect_keyword(Keyword::Default)?;
                None
            };
            self.expect_punct(":")?;
            let mut consequent = Vec::new();
            while !self.at_keyword(Keyword::Case)
                && !self.at_keyword(Keyword::Default)
                && !self.at_punct("}")
            {
                consequent.push(self.parse_statement()?);
            }
            cases.push(SwitchCase { test, consequent });
        }
        self.expect_punct("}")?;
        Ok(Stmt::Switch {
            discriminant: Box::new(discriminant),
            cases,
        })
    }

    // ---- expressions ----

    fn parse_expression(&mut self) -> Result<Expr, AstError> {
        let first = self.parse_assignment_expr()?;
        if self.at_punct(",") {
            let mut items = vec![first];
            while self.eat_punct(",") {
                items.push(self.parse_assignment_expr()?);
            }
            return Ok(Expr::Sequence(items));
        }
        Ok(first)
    }

    fn parse_assignment_expr(&mut self) -> Result<Expr, AstError> {
        if let Some(arrow) = self.try_parse_arrow_function()? {
            return Ok(arrow);
        }
        let left = self.parse_conditional_expr()?;
        if let Token::Punct(p) = self.peek() {
            if ASSIGN_PUNCTS.contains(p) {
                let op = if *p == "=" {
                    AssignOp::Assign
                } else {
                    AssignOp::Other
                };
                self.bump();
                let right = self.parse_assignment_expr()?;
                return Ok(Expr::Assign {
                    op,
                    left: Box::new(left),
                    right: Box::new(right),
                });
            }
        }
        Ok(left)
    }

    /// Arrow functions need lookahead past a parenthesized parameter list
    /// to the `=>`. Tries the parse; on failure rewinds and falls through
    /// to ordinary expression parsing.
    fn try_parse_arrow_function(&mut self) -> Result<Option<Expr>, AstError> {
        let start = self.pos;
        // `ident => ...`
        if let Token::Identifier(name) = self.peek().clone() {
            if matches!(self.peek_at(1), Token::Punct("=>")) {
                self.bump();
                self.bump();
                let body = self.parse_arrow_body()?;
                return Ok(Some(Expr::ArrowFunction(FunctionLiteral {
                    name: None,
                    params: vec![Identifier::new(name)],
                    body,
                    is_arrow: true,
                })));
            }
        }
        if self.at_punct("(") {
            if let Ok(params) = self.try_parse_param_list_checked() {
                if self.eat_punct("=>") {
                    let body = self.parse_arrow_body()?;
                    return Ok(Some(Expr::ArrowFunction(FunctionLiteral {
                        name: None,
                        params,
                        body,
                        is_arrow: true,
                    })));
                }
            }
            self.pos = start;
        }
        Ok(None)
    }

    fn try_parse_param_list_checked(&mut self) -> Result<Vec<Identifier>, AstError> {
        let start = self.pos;
        match self.parse_param_list() {
            Ok(params) => Ok(params),
            Err(e) => {
                self.pos = start;
                Err(e)
            }
        }
    }

    fn parse_arrow_body(&mut self) -> Result<Vec<Stmt>, AstError> {
        if self.at_punct("{") {
            self.parse_block_body()
        } else {
            let expr = self.parse_assignment_expr()?;
            Ok(vec![Stmt::Return(Box::new(expr))])
        }
    }

    fn parse_conditional_expr(&mut self) -> Result<Expr, AstError> {
        let test = self.parse_binary_expr(0)?;
        if self.eat_punct("?") {
            let consequent = self.parse_assignment_expr()?;
            self.expect_punct(":")?;
            let alternate = self.parse_assignment_expr()?;
            return Ok(Expr::Conditional {
                test: Box::new(test),
                consequent: Box::new(consequent),
                alternate: Box::new(alternate),
            });
        }
        Ok(test)
    }

    fn parse_binary_expr(&mut self, min_prec: u8) -> Result<Expr, AstError> {
        let mut left = self.parse_unary_expr()?;
        loop {
            let Some((prec, kind)) = operator_info(self.peek()) else {
                break;
            };
            if prec < min_prec {
                break;
            }
            self.bump();
            // left-associative: recurse at prec + 1, except `**` (right-assoc).
            let next_min = if prec == 11 { prec } else { prec + 1 };
            let right = self.parse_binary_expr(next_min)?;
            left = match kind {
                OpKind::Binary(op) => Expr::Binary {
                    op,
                    left: Box::new(left),
                    right: Box::new(right),
                },
                OpKind::Logical(op) => Expr::Logical {
                    op,
                    left: Box::new(left),
                    right: Box::new(right),
                },
            };
        }
        Ok(left)
    }

    fn parse_unary_expr(&mut self) -> Result<Expr, AstError> {
        let op = match self.peek() {
            Token::Punct("+") => Some(UnaryOp::Plus),
            Token::Punct("-") => Some(UnaryOp::Minus),
            Token::Punct("!") => Some(UnaryOp::Not),
            Token::Punct("~") => Some(UnaryOp::BitNot),
            Token::Punct("++") | Token::Punct("--") => Some(UnaryOp::Other),
            Token::Keyword(Keyword::TypeOf) => Some(UnaryOp::TypeOf),
            Token::Keyword(Keyword::Void) => Some(UnaryOp::Void),
            Token::Keyword(Keyword::Delete) => Some(UnaryOp::Delete),
            _ => None,
        };
        if let Some(op) = op {
            self.bump();
            let operand = self.parse_unary_expr()?;
            return Ok(Expr::Unary {
                op,
                operand: Box::new(operand),
            });
        }
        self.parse_postfix_expr()
    }

    fn parse_postfix_expr(&mut self) -> Result<Expr, AstError> {
        let mut expr = self.parse_call_member_expr()?;
        if self.at_punct("++") || self.at_punct("--") {
            self.bump();
            expr = Expr::Unary {
                op: UnaryOp::Other,
                operand: Box::new(expr),
            };
        }
        Ok(expr)
    }

    fn parse_call_member_expr(&mut self) -> Result<Expr, AstError> {
        let mut expr = self.parse_primary_expr()?;
        loop {
            if self.eat_punct(".") {
                let name = self.expect_identifier()?;
                expr = Expr::Member {
                    object: Box::new(expr),
                    property: MemberProperty::Identifier(name.name),
                };
            } else if self.eat_punct("[") {
                let key = self.parse_expression()?;
                self.expect_punct("]")?;
                expr = Expr::Member {
                    object: Box::new(expr),
                    property: MemberProperty::Computed(Box::new(key)),
                };
            } else if self.at_punct("(") {
                let args = self.parse_arguments()?;
                expr = Expr::Call {
                    callee: Box::new(expr),
                    arguments: args,
                };
            } else {
                break;
            }
        }
        Ok(expr)
    }

    fn parse_arguments(&mut self) -> Result<Vec<Expr>, AstError> {
        self.expect_punct("(")?;
        let mut args = Vec::new();
        while !self.at_punct(")") {
            args.push(self.parse_assignment_expr()?);
            if !self.eat_punct(",") {
                break;
            }
        }
        self.expect_punct(")")?;
        Ok(args)
    }

    fn parse_primary_expr(&mut self) -> Result<Expr, AstError> {
        match self.peek().clone() {
            Token::Number(n) => {
                self.bump();
                Ok(Expr::Number(n))
            }
            Token::String(s) => {
                self.bump();
                Ok(Expr::String(s))
            }
            Token::Keyword(Keyword::True) => {
                self.bump();
                Ok(Expr::Boolean(true))
            }
            Token::Keyword(Keyword::False) => {
                self.bump();
                Ok(Expr::Boolean(false))
            }
            Token::Identifier(name) => {
                self.bump();
                Ok(Expr::Identifier(Identifier::new(name)))
            }
            Token::Keyword(Keyword::Function) => {
                let func = self.parse_function_literal(false)?;
                Ok(Expr::Function(func))
            }
            Token::Punct("(") => {
                self.bump();
                let expr = self.parse_expression()?;
                self.expect_punct(")")?;
                Ok(expr)
            }
            Token::Punct("[") => self.parse_array_literal(),
            Token::Punct("{") => self.parse_object_literal(),
            Token::Unsupported(c) => Err(AstError::Unsupported {
                what: c.to_string(),
                pos: self.pos_here(),
            }),
            other => Err(AstError::UnexpectedToken {
                expected: format!("expression, found {other:?}"),
                pos: self.pos_here(),
            }),
        }
    }

    fn parse_array_literal(&mut self) -> Result<Expr, AstError> {
        self.expect_punct("[")?;
        let mut items = Vec::new();
        while !self.at_punct("]") {
            if self.at_punct(",") {
                items.push(Expr::Missing);
                self.bump();
                continue;
            }
            items.push(self.parse_assignment_expr()?);
            if !self.eat_punct(",") {
                break;
            }
        }
        self.expect_punct("]")?;
        Ok(Expr::Array(items))
    }

    fn parse_object_literal(&mut self) -> Result<Expr, AstError> {
        self.expect_punct("{")?;
        let mut props = Vec::new();
        while !self.at_punct("}") {
            let key = self.parse_property_key()?;
            self.expect_punct(":")?;
            let value = self.parse_assignment_expr()?;
            props.push(ObjectProperty {
                key,
                value: Box::new(value),
            });
            if !self.eat_punct(",") {
                break;
            }
        }
        self.expect_punct("}")?;
        Ok(Expr::Object(props))
    }

    fn parse_property_key(&mut self) -> Result<PropertyKey, AstError> {
        match self.peek().clone() {
            Token::Identifier(name) => {
                self.bump();
                Ok(PropertyKey::Identifier(name))
            }
            Token::Keyword(_) => {
                // Keywords are valid (unquoted) property names in object literals.
                let pos = self.pos_here();
                if let Token::Keyword(kw) = self.bump() {
                    Ok(PropertyKey::Identifier(format!("{kw:?}").to_lowercase()))
                } else {
                    unreachable!("pos {pos}")
                }
            }
            Token::String(s) => {
                self.bump();
                Ok(PropertyKey::String(s))
            }
            Token::Number(n) => {
                self.bump();
                Ok(PropertyKey::String(format_numeric_key(n)))
            }
            Token::Punct("[") => {
                self.bump();
                let expr = self.parse_assignment_expr()?;
                self.expect_punct("]")?;
                Ok(PropertyKey::Computed(Box::new(expr)))
            }
            other => Err(AstError::UnexpectedToken {
                expected: format!("property key, found {other:?}"),
                pos: self.pos_here(),
            }),
        }
    }
}

/// Stringifies a numeric object-literal key the way JS's ToString does
/// for the integers this protocol actually uses as keys.
fn format_numeric_key(n: f64) -> String {
    if n.fract() == 0.0 && n.abs() < 1e15 {
        format!("{}", n as i64)
    } else {
        format!("{n}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_simple_assignment() {
        let prog = parse("var x = 1 + 2 * 3;").unwrap();
        assert_eq!(prog.body.len(), 1);
    }

    #[test]
    fn parses_function_and_call() {
        let prog = parse("function f(a, b) { return a + b; } f(1, 2);").unwrap();
        assert_eq!(prog.body.len(), 2);
    }

    #[test]
    fn parses_for_loop_with_empty_parts() {
        let prog = parse("for (;;) { break; }").unwrap();
        match &prog.body[0] {
            Stmt::For { init, test, update, .. } => {
                assert!(init.is_none());
                assert_eq!(**test, Expr::Missing);
                assert_eq!(**update, Expr::Missing);
            }
            _ => panic!("expected for loop"),
        }
    }

    #[test]
    fn parses_member_and_computed_chains() {
        let prog = parse("a.b[c].d(1, 2);").unwrap();
        assert_eq!(prog.body.len(), 1);
    }

    #[test]
    fn parses_arrow_function() {
        let prog = parse("var f = x => x + 1;").unwrap();
        assert_eq!(prog.body.len(), 1);
    }

    #[test]
    fn parses_ternary_and_sequence() {
        let prog = parse("var x = (a, b ? 1 : 2);").unwrap();
        assert_eq!(prog.body.len(), 1);
    }

    #[test]
    fn rejects_template_literals() {
        let err = parse("var x = `hi`;").unwrap_err();
        assert!(matches!(err, AstError::Unsupported { .. }));
    }
}
