//! Recursive-descent / precedence-climbing parser.
//!
//! Grammar (informal):
//!
//! ```text
//! program    := function*
//! function   := type IDENT '(' params? ')' block
//! params     := param (',' param)*
//! param      := type IDENT
//! type       := 'int' | 'double' | 'string' | 'bool' | 'auto'
//! block      := '{' stmt* '}'
//! stmt       := vardecl | assign | if | for | return | cout | cin
//!             | block | exprstmt | ';'
//! vardecl    := type IDENT ('=' expr)? ';'
//! assign     := IDENT '=' expr ';'
//! if         := 'if' '(' expr ')' block ('else' block)?
//! for        := 'for' '(' forinit ';' expr ';' forstep ')' block
//! return     := 'return' expr ';'
//! cout       := 'cout' ('<<' expr)+ ';'
//! cin        := 'cin' ('>>' IDENT)+ ';'
//! exprstmt   := expr ';'
//! expr       := equality
//! equality   := relational (('==' | '!=') relational)*
//! relational := additive (('<' | '>' | '<=' | '>=') additive)*
//! additive   := multiplicative (('+' | '-') multiplicative)*
//! multiplicative := unary (('*' | '/') unary)*
//! unary      := '-' unary | primary
//! primary    := INT | DOUBLE | STRING | 'true' | 'false' | 'null'
//!             | IDENT ('(' args? ')')? | '(' expr ')'
//! ```
//!
//! No semantic validation beyond this shape happens here; type checking is
//! the evaluator's responsibility.

use crate::exception::{syntax_error, TinyResult};
use crate::frontend::ast::{BinOp, Expr, FunctionAst, Literal, ParamAst, Program, Stmt};
use crate::frontend::lexer::{Lexer, Spanned, Token};
use crate::value::ValueType;

pub struct Parser {
    tokens: Vec<Spanned>,
    pos: usize,
}

impl Parser {
    #[must_use]
    pub fn new(tokens: Vec<Spanned>) -> Self {
        Self { tokens, pos: 0 }
    }

    /// Lexes then parses `src` into a [`Program`].
    pub fn parse_source(src: &str) -> TinyResult<Program> {
        let tokens = Lexer::new(src).tokenize()?;
        Parser::new(tokens).parse_program()
    }

    fn peek(&self) -> &Token {
        &self.tokens[self.pos.min(self.tokens.len() - 1)].token
    }

    fn here(&self) -> (usize, usize) {
        let s = &self.tokens[self.pos.min(self.tokens.len() - 1)];
        (s.line, s.col)
    }

    fn advance(&mut self) -> Token {
        let token = self.tokens[self.pos.min(self.tokens.len() - 1)].token.clone();
        if self.pos < self.tokens.len() - 1 {
            self.pos += 1;
        }
        token
    }

    fn expect(&mut self, expected: &Token) -> TinyResult<()> {
        if self.peek() == expected {
            self.advance();
            Ok(())
        } else {
            let (line, col) = self.here();
            Err(syntax_error(format!(
                "expected {expected:?}, found {:?} at line {line}, col {col}",
                self.peek()
            )))
        }
    }

    fn expect_ident(&mut self) -> TinyResult<String> {
        match self.peek().clone() {
            Token::Ident(name) => {
                self.advance();
                Ok(name)
            }
            other => {
                let (line, col) = self.here();
                Err(syntax_error(format!(
                    "expected identifier, found {other:?} at line {line}, col {col}"
                )))
            }
        }
    }

    fn type_token_to_value_type(&mut self) -> TinyResult<Option<ValueType>> {
        let ty = match self.peek() {
            Token::KwInt => ValueType::Int,
            Token::KwDouble => ValueType::Double,
            Token::KwString => ValueType::String,
            Token::KwBool => ValueType::Bool,
            Token::KwAuto => ValueType::Auto,
            _ => return Ok(None),
        };
        self.advance();
        Ok(Some(ty))
    }

    pub fn parse_program(&mut self) -> TinyResult<Program> {
        let mut functions = Vec::new();
        while *self.peek() != Token::Eof {
            functions.push(self.parse_function()?);
        }
        Ok(Program { functions })
    }

    fn parse_function(&mut self) -> TinyResult<FunctionAst> {
        let (line, col) = self.here();
        let return_type = self.type_token_to_value_type()?.ok_or_else(|| {
            syntax_error(format!(
                "expected a return type at line {line}, col {col}"
            ))
        })?;
        let name = self.expect_ident()?;
        self.expect(&Token::LParen)?;
        let mut params = Vec::new();
        if *self.peek() != Token::RParen {
            loop {
                let (line, col) = self.here();
                let ty = self.type_token_to_value_type()?.ok_or_else(|| {
                    syntax_error(format!("expected a parameter type at line {line}, col {col}"))
                })?;
                let name = self.expect_ident()?;
                params.push(ParamAst { name, ty });
                if *self.peek() == Token::Comma {
                    self.advance();
                } else {
                    break;
                }
            }
        }
        self.expect(&Token::RParen)?;
        let body = self.parse_block()?;
        Ok(FunctionAst {
            name,
            return_type,
            params,
            body,
        })
    }

    fn parse_block(&mut self) -> TinyResult<Vec<Stmt>> {
        self.expect(&Token::LBrace)?;
        let mut stmts = Vec::new();
        while *self.peek() != Token::RBrace {
            stmts.push(self.parse_stmt()?);
        }
        self.expect(&Token::RBrace)?;
        Ok(stmts)
    }

    fn parse_stmt(&mut self) -> TinyResult<Stmt> {
        match self.peek().clone() {
            Token::Semicolon => {
                self.advance();
                Ok(Stmt::Empty)
            }
            Token::LBrace => Ok(Stmt::Block(self.parse_block()?)),
            Token::KwIf => self.parse_if(),
            Token::KwFor => self.parse_for(),
            Token::KwReturn => {
                self.advance();
                let value = self.parse_expr()?;
                self.expect(&Token::Semicolon)?;
                Ok(Stmt::Return(value))
            }
            Token::KwCout => {
                self.advance();
                let mut parts = Vec::new();
                loop {
                    self.expect(&Token::Shl)?;
                    parts.push(self.parse_expr()?);
                    if *self.peek() != Token::Shl {
                        break;
                    }
                }
                self.expect(&Token::Semicolon)?;
                Ok(Stmt::Cout(parts))
            }
            Token::KwCin => {
                self.advance();
                let mut targets = Vec::new();
                loop {
                    self.expect(&Token::Shr)?;
                    targets.push(self.expect_ident()?);
                    if *self.peek() != Token::Shr {
                        break;
                    }
                }
                self.expect(&Token::Semicolon)?;
                Ok(Stmt::Cin(targets))
            }
            Token::KwInt | Token::KwDouble | Token::KwString | Token::KwBool | Token::KwAuto => {
                self.parse_var_decl()
            }
            Token::Ident(_) => self.parse_assign_or_expr_stmt(),
            _ => {
                let value = self.parse_expr()?;
                self.expect(&Token::Semicolon)?;
                Ok(Stmt::ExprStmt(value))
            }
        }
    }

    fn parse_var_decl(&mut self) -> TinyResult<Stmt> {
        let ty = self
            .type_token_to_value_type()?
            .expect("caller already matched a type token");
        let name = self.expect_ident()?;
        if *self.peek() == Token::Assign {
            self.advance();
            let value = self.parse_expr()?;
            self.expect(&Token::Semicolon)?;
            Ok(Stmt::VarCreateAssign { name, ty, value })
        } else {
            self.expect(&Token::Semicolon)?;
            Ok(Stmt::VarCreate { name, ty })
        }
    }

    fn parse_assign_or_expr_stmt(&mut self) -> TinyResult<Stmt> {
        // Lookahead: `IDENT '=' ...` is an assignment; anything else
        // starting with an identifier is an expression statement (a bare
        // call, most commonly).
        if let Token::Ident(name) = self.peek().clone() {
            if self.tokens.get(self.pos + 1).map(|s| &s.token) == Some(&Token::Assign) {
                self.advance();
                self.advance();
                let value = self.parse_expr()?;
                self.expect(&Token::Semicolon)?;
                return Ok(Stmt::Assign { name, value });
            }
        }
        let value = self.parse_expr()?;
        self.expect(&Token::Semicolon)?;
        Ok(Stmt::ExprStmt(value))
    }

    fn parse_if(&mut self) -> TinyResult<Stmt> {
        self.expect(&Token::KwIf)?;
        self.expect(&Token::LParen)?;
        let cond = self.parse_expr()?;
        self.expect(&Token::RParen)?;
        let then_branch = self.parse_block()?;
        let else_branch = if *self.peek() == Token::KwElse {
            self.advance();
            if *self.peek() == Token::KwIf {
                vec![self.parse_if()?]
            } else {
                self.parse_block()?
            }
        } else {
            Vec::new()
        };
        Ok(Stmt::If {
            cond,
            then_branch,
            else_branch,
        })
    }

    fn parse_for(&mut self) -> TinyResult<Stmt> {
        self.expect(&Token::KwFor)?;
        self.expect(&Token::LParen)?;
        let init = if matches!(
            self.peek(),
            Token::KwInt | Token::KwDouble | Token::KwString | Token::KwBool | Token::KwAuto
        ) {
            self.parse_var_decl()?
        } else {
            self.parse_assign_or_expr_stmt()?
        };
        let cond = self.parse_expr()?;
        self.expect(&Token::Semicolon)?;
        // The step clause is a bare assignment/expression with no trailing
        // semicolon of its own (the `)` terminates it instead).
        let step = self.parse_step_clause()?;
        self.expect(&Token::RParen)?;
        let body = self.parse_block()?;
        Ok(Stmt::For {
            init: Box::new(init),
            cond,
            step: Box::new(step),
            body,
        })
    }

    fn parse_step_clause(&mut self) -> TinyResult<Stmt> {
        if let Token::Ident(name) = self.peek().clone() {
            if self.tokens.get(self.pos + 1).map(|s| &s.token) == Some(&Token::Assign) {
                self.advance();
                self.advance();
                let value = self.parse_expr()?;
                return Ok(Stmt::Assign { name, value });
            }
        }
        Ok(Stmt::ExprStmt(self.parse_expr()?))
    }

    fn parse_expr(&mut self) -> TinyResult<Expr> {
        self.parse_equality()
    }

    fn parse_equality(&mut self) -> TinyResult<Expr> {
        let mut left = self.parse_relational()?;
        loop {
            let op = match self.peek() {
                Token::EqEq => BinOp::Eq,
                Token::NotEq => BinOp::Ne,
                _ => break,
            };
            self.advance();
            let right = self.parse_relational()?;
            left = Expr::Binary {
                op,
                left: Box::new(left),
                right: Box::new(right),
            };
        }
        Ok(left)
    }

    fn parse_relational(&mut self) -> TinyResult<Expr> {
        let mut left = self.parse_additive()?;
        loop {
            let op = match self.peek() {
                Token::Less => BinOp::Lt,
                Token::Greater => BinOp::Gt,
                Token::LessEq => BinOp::Le,
                Token::GreaterEq => BinOp::Ge,
                _ => break,
            };
            self.advance();
            let right = self.parse_additive()?;
            left = Expr::Binary {
                op,
                left: Box::new(left),
                right: Box::new(right),
            };
        }
        Ok(left)
    }

    fn parse_additive(&mut self) -> TinyResult<Expr> {
        let mut left = self.parse_multiplicative()?;
        loop {
            let op = match self.peek() {
                Token::Plus => BinOp::Add,
                Token::Minus => BinOp::Sub,
                _ => break,
            };
            self.advance();
            let right = self.parse_multiplicative()?;
            left = Expr::Binary {
                op,
                left: Box::new(left),
                right: Box::new(right),
            };
        }
        Ok(left)
    }

    fn parse_multiplicative(&mut self) -> TinyResult<Expr> {
        let mut left = self.parse_unary()?;
        loop {
            let op = match self.peek() {
                Token::Star => BinOp::Mul,
                Token::Slash => BinOp::Div,
                _ => break,
            };
            self.advance();
            let right = self.parse_unary()?;
            left = Expr::Binary {
                op,
                left: Box::new(left),
                right: Box::new(right),
            };
        }
        Ok(left)
    }

    fn parse_unary(&mut self) -> TinyResult<Expr> {
        if *self.peek() == Token::Minus {
            self.advance();
            let operand = self.parse_unary()?;
            // Desugars to `0 - x`; there is no dedicated unary-minus AST
            // node because the evaluator's binary-op dispatch already
            // implements int/double subtraction exactly.
            return Ok(Expr::Binary {
                op: BinOp::Sub,
                left: Box::new(Expr::Literal(Literal::Int(0))),
                right: Box::new(operand),
            });
        }
        self.parse_primary()
    }

    fn parse_primary(&mut self) -> TinyResult<Expr> {
        let (line, col) = self.here();
        match self.advance() {
            Token::IntLit(v) => Ok(Expr::Literal(Literal::Int(v))),
            Token::DoubleLit(v) => Ok(Expr::Literal(Literal::Double(v))),
            Token::StringLit(bytes) => Ok(Expr::Literal(Literal::Str(bytes))),
            Token::True => Ok(Expr::Literal(Literal::Bool(true))),
            Token::False => Ok(Expr::Literal(Literal::Bool(false))),
            Token::Null => Ok(Expr::Literal(Literal::Null)),
            Token::LParen => {
                let inner = self.parse_expr()?;
                self.expect(&Token::RParen)?;
                Ok(inner)
            }
            Token::Ident(name) => {
                if *self.peek() == Token::LParen {
                    self.advance();
                    let mut args = Vec::new();
                    if *self.peek() != Token::RParen {
                        loop {
                            args.push(self.parse_expr()?);
                            if *self.peek() == Token::Comma {
                                self.advance();
                            } else {
                                break;
                            }
                        }
                    }
                    self.expect(&Token::RParen)?;
                    Ok(Expr::Call { name, args })
                } else {
                    Ok(Expr::Var(name))
                }
            }
            other => Err(syntax_error(format!(
                "unexpected token {other:?} at line {line}, col {col}"
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_fibonacci_style_function() {
        let program = Parser::parse_source(
            "int fact(int n) { if (n <= 1) { return 1; } else { return n * fact(n - 1); } } \
             int main() { cout << fact(5); return 0; }",
        )
        .unwrap();
        assert_eq!(program.functions.len(), 2);
        assert_eq!(program.functions[0].name, "fact");
        assert_eq!(program.functions[1].name, "main");
    }

    #[test]
    fn parses_for_loop() {
        let program = Parser::parse_source(
            "int main() { for (int i = 0; i < 3; i = i + 1) { cout << i; } return 0; }",
        )
        .unwrap();
        assert!(matches!(
            program.functions[0].body[0],
            Stmt::For { .. }
        ));
    }

    #[test]
    fn parses_auto_and_builtin_calls() {
        let program = Parser::parse_source(
            "int main() { auto s = \"abc\"; cout << length(s) << sort(\"cba\"); return 0; }",
        )
        .unwrap();
        assert!(matches!(
            program.functions[0].body[0],
            Stmt::VarCreateAssign { ty: ValueType::Auto, .. }
        ));
    }

    #[test]
    fn missing_semicolon_is_syntax_error() {
        let err = Parser::parse_source("int main() { return 0 }").unwrap_err();
        assert_eq!(err.kind, crate::exception::ErrorKind::Syntax);
    }

    #[test]
    fn cin_parses_multiple_targets() {
        let program =
            Parser::parse_source("int main() { int x; int y; cin >> x >> y; return 0; }").unwrap();
        assert!(matches!(&program.functions[0].body[2], Stmt::Cin(targets) if targets.len() == 2));
    }
}
