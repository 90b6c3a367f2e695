//! Human-readable dumps of tokens and syntax trees for `mgc lex`, `mgc parse`
//! and the REPL's `.trace` mode.
//!
//! Identifier references print with their resolved depth: `a@global`, `n@1`.
//! Declarations print bare.

use std::fmt::Write;

use mgc_ir::{Ast, Expr, FunctionDecl, LetStmt, ScopeDepth, Stmt, Token, TokenList};

pub fn tokens(tokens: &TokenList) -> String {
    let mut out = String::new();
    for token in tokens {
        let _ = writeln!(out, "{:?} @ {:?}", token, token.span);
    }
    out
}

pub fn ast(ast: &Ast) -> String {
    let mut printer = Printer::default();
    for stmt in &ast.statements {
        printer.stmt(stmt);
    }
    printer.out
}

#[derive(Default)]
struct Printer {
    out: String,
    indent: usize,
}

impl Printer {
    fn line(&mut self, text: &str) {
        for _ in 0..self.indent {
            self.out.push_str("  ");
        }
        self.out.push_str(text);
        self.out.push('\n');
    }

    fn nested(&mut self, f: impl FnOnce(&mut Self)) {
        self.indent += 1;
        f(self);
        self.indent -= 1;
    }

    fn block(&mut self, label: &str, statements: &[Stmt]) {
        self.line(label);
        self.nested(|p| {
            for stmt in statements {
                p.stmt(stmt);
            }
        });
    }

    fn stmt(&mut self, stmt: &Stmt) {
        match stmt {
            Stmt::Block(block) => self.block("Block", &block.statements),
            Stmt::Print(print) => {
                self.line(if print.newline { "Println" } else { "Print" });
                self.nested(|p| p.expr(&print.value));
            }
            Stmt::Let(stmt) => self.let_stmt("Let", stmt),
            Stmt::While(stmt) => {
                self.line("While");
                self.nested(|p| p.expr(&stmt.condition));
                self.block("Do", &stmt.body);
            }
            Stmt::If(stmt) => {
                self.line("If");
                self.nested(|p| p.expr(&stmt.condition));
                self.block("Then", &stmt.then_branch);
                if let Some(else_branch) = &stmt.else_branch {
                    self.block("Else", else_branch);
                }
            }
            Stmt::FuncDef(decl) => self.function(decl),
            Stmt::Return(stmt) => {
                self.line("Return");
                if let Some(value) = &stmt.value {
                    self.nested(|p| p.expr(value));
                }
            }
            Stmt::Expr(expr) => self.expr(expr),
            Stmt::ClassDef(decl) => {
                self.block(&format!("Class {}", name(&decl.name)), &decl.body);
            }
        }
    }

    fn let_stmt(&mut self, label: &str, stmt: &LetStmt) {
        self.line(&format!("{label} {}", name(&stmt.name)));
        if let Some(init) = &stmt.init {
            self.nested(|p| p.expr(init));
        }
    }

    fn function(&mut self, decl: &FunctionDecl) {
        let label = match &decl.name {
            Some(token) => format!("Def {}", name(token)),
            None => "Lambda".to_string(),
        };
        self.line(&label);
        self.nested(|p| {
            for param in &decl.params {
                p.let_stmt("Param", param);
            }
            p.block("Body", &decl.body);
        });
    }

    fn expr(&mut self, expr: &Expr) {
        match expr {
            Expr::Constant(token) => self.line(&token.text),
            Expr::Ident(token) => self.line(&name(token)),
            Expr::Unary { op, operand, .. } => {
                self.line(&format!("Unary {op:?}"));
                self.nested(|p| p.expr(operand));
            }
            Expr::Binary {
                op, left, right, ..
            } => {
                self.line(&format!("Binary {}", op.as_symbol()));
                self.nested(|p| {
                    p.expr(left);
                    p.expr(right);
                });
            }
            Expr::Assign {
                op, target, value, ..
            } => {
                self.line(&format!("Assign {op:?}"));
                self.nested(|p| {
                    p.expr(target);
                    p.expr(value);
                });
            }
            Expr::Call { callee, args, .. } => {
                self.line("Call");
                self.nested(|p| {
                    p.expr(callee);
                    for arg in args {
                        p.expr(arg);
                    }
                });
            }
            Expr::Subscript { target, index, .. } => {
                self.line("Index");
                self.nested(|p| {
                    p.expr(target);
                    p.expr(index);
                });
            }
            Expr::Array { elements, .. } => {
                self.line("Array");
                self.nested(|p| {
                    for element in elements {
                        p.expr(element);
                    }
                });
            }
            Expr::ListOp { op, list, arg, .. } => {
                self.line(op.name());
                self.nested(|p| {
                    p.expr(list);
                    if let Some(arg) = arg {
                        p.expr(arg);
                    }
                });
            }
            Expr::Lambda(decl) => self.function(decl),
            Expr::New { class, .. } => self.line(&format!("New {}", name(class))),
            Expr::Member { object, name: member, .. } => {
                self.line(&format!("Member {}", member.text));
                self.nested(|p| p.expr(object));
            }
        }
    }
}

fn name(token: &Token) -> String {
    match token.depth() {
        ScopeDepth::Unresolved => token.text.to_string(),
        ScopeDepth::Global => format!("{}@global", token.text),
        ScopeDepth::Local(hops) => format!("{}@{hops}", token.text),
    }
}
