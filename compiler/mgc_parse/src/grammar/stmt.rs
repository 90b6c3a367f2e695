//! Statement parsing.

use std::rc::Rc;

use mgc_ir::{
    Block, ClassDecl, IfStmt, LetStmt, PrintStmt, ReturnStmt, Stmt, TokenKind, WhileStmt,
};
use mgc_stack::ensure_sufficient_stack;

use crate::{PResult, Parser};

impl Parser<'_> {
    /// Parse one statement and the optional `;` after it.
    pub(crate) fn parse_statement(&mut self) -> PResult<Stmt> {
        let stmt = ensure_sufficient_stack(|| self.parse_statement_inner())?;
        self.eat(TokenKind::Semi);
        Ok(stmt)
    }

    fn parse_statement_inner(&mut self) -> PResult<Stmt> {
        match self.current_kind() {
            TokenKind::Let => self.parse_let().map(Stmt::Let),
            TokenKind::While => self.parse_while(),
            TokenKind::If => self.parse_if().map(Stmt::If),
            TokenKind::Def => self.parse_def(),
            TokenKind::Class => self.parse_class(),
            TokenKind::Return => self.parse_return(),
            TokenKind::Println | TokenKind::Print => self.parse_print(),
            TokenKind::LBrace => {
                let start = self.current_span();
                let statements = self.parse_braced_body()?;
                Ok(Stmt::Block(Block {
                    statements,
                    span: self.span_from(start),
                }))
            }
            _ => self.parse_expr().map(Stmt::Expr),
        }
    }

    /// `{ stmt* }`, returning the statements.
    pub(crate) fn parse_braced_body(&mut self) -> PResult<Vec<Stmt>> {
        self.expect(TokenKind::LBrace)?;
        let mut statements = Vec::new();
        while !self.check(TokenKind::RBrace) && !self.is_at_end() {
            statements.push(self.parse_statement()?);
        }
        self.expect(TokenKind::RBrace)?;
        Ok(statements)
    }

    /// `let name [:= init]`
    fn parse_let(&mut self) -> PResult<LetStmt> {
        let start = self.advance().span;
        let name = self.expect(TokenKind::Ident)?.clone();
        let init = if self.eat(TokenKind::Assign) {
            Some(self.parse_expr()?)
        } else {
            None
        };
        Ok(LetStmt {
            name,
            init,
            span: self.span_from(start),
        })
    }

    /// `while (cond) { body }`
    fn parse_while(&mut self) -> PResult<Stmt> {
        let start = self.advance().span;
        let condition = self.parse_condition()?;
        let body = self.parse_braced_body()?;
        Ok(Stmt::While(WhileStmt {
            condition,
            body,
            span: self.span_from(start),
        }))
    }

    /// `if (cond) { .. } [else { .. } | else if ..]`
    fn parse_if(&mut self) -> PResult<IfStmt> {
        let start = self.advance().span;
        let condition = self.parse_condition()?;
        let then_branch = self.parse_braced_body()?;
        let else_branch = if self.eat(TokenKind::Else) {
            if self.check(TokenKind::If) {
                Some(vec![Stmt::If(self.parse_if()?)])
            } else {
                Some(self.parse_braced_body()?)
            }
        } else {
            None
        };
        Ok(IfStmt {
            condition,
            then_branch,
            else_branch,
            span: self.span_from(start),
        })
    }

    fn parse_condition(&mut self) -> PResult<mgc_ir::Expr> {
        self.expect(TokenKind::LParen)?;
        let condition = self.parse_expr()?;
        self.expect(TokenKind::RParen)?;
        Ok(condition)
    }

    /// `def name(params) { body }`
    fn parse_def(&mut self) -> PResult<Stmt> {
        let start = self.advance().span;
        let name = self.expect(TokenKind::Ident)?.clone();
        let decl = self.parse_function_tail(Some(name), start)?;
        Ok(Stmt::FuncDef(Rc::new(decl)))
    }

    /// `class Name { body }`
    fn parse_class(&mut self) -> PResult<Stmt> {
        let start = self.advance().span;
        let name = self.expect(TokenKind::Ident)?.clone();
        let body = self.parse_braced_body()?;
        Ok(Stmt::ClassDef(Rc::new(ClassDecl {
            name,
            body,
            span: self.span_from(start),
        })))
    }

    /// `return [expr]`; the value is omitted before `;`, `}` or end of input.
    fn parse_return(&mut self) -> PResult<Stmt> {
        let start = self.advance().span;
        let value = if matches!(
            self.current_kind(),
            TokenKind::Semi | TokenKind::RBrace | TokenKind::Eof
        ) {
            None
        } else {
            Some(self.parse_expr()?)
        };
        Ok(Stmt::Return(ReturnStmt {
            value,
            span: self.span_from(start),
        }))
    }

    fn parse_print(&mut self) -> PResult<Stmt> {
        let keyword = self.advance();
        let value = self.parse_expr()?;
        Ok(Stmt::Print(PrintStmt {
            newline: keyword.is(TokenKind::Println),
            value,
            span: self.span_from(keyword.span),
        }))
    }
}
