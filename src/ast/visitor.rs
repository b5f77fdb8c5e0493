//! Pre-order traversal with in-place replacement.
//!
//! Mirrors spec.md §4.1: each node's children are visited first
//! (depth-first, left-to-right), then the visitor's own hook runs on
//! return — so a fold that inspects `expr` after `visit_expr` recurses
//! already sees folded children. `replace` is just assigning through the
//! `&mut Expr`/`&mut Stmt` reference; there is no separate indirection.
//!
//! Every `walk_*` function is null-safe: a `Missing` node, or any other
//! leaf with no children, is simply not descended into.

use super::node::*;

pub trait Visitor {
    fn visit_program(&mut self, program: &mut Program) {
        walk_program(self, program);
    }
    fn visit_stmt(&mut self, stmt: &mut Stmt) {
        walk_stmt_children(self, stmt);
    }
    fn visit_expr(&mut self, expr: &mut Expr) {
        walk_expr_children(self, expr);
    }
}

pub fn walk_program<V: Visitor + ?Sized>(v: &mut V, program: &mut Program) {
    for stmt in &mut program.body {
        v.visit_stmt(stmt);
    }
}

pub fn walk_stmt_children<V: Visitor + ?Sized>(v: &mut V, stmt: &mut Stmt) {
    match stmt {
        Stmt::Missing | Stmt::Break | Stmt::Continue | Stmt::Empty => {}
        Stmt::Block(body) => {
            for s in body {
                v.visit_stmt(s);
            }
        }
        Stmt::Expression(expr) => v.visit_expr(expr),
        Stmt::Return(arg) => v.visit_expr(arg),
        Stmt::If {
            test,
            consequent,
            alternate,
        } => {
            v.visit_expr(test);
            v.visit_stmt(consequent);
            if let Some(alt) = alternate {
                v.visit_stmt(alt);
            }
        }
        Stmt::For {
            init,
            test,
            update,
            body,
        } => {
            if let Some(init) = init {
                v.visit_stmt(init);
            }
            v.visit_expr(test);
            v.visit_expr(update);
            v.visit_stmt(body);
        }
        Stmt::ForIn { left, right, body } => {
            v.visit_stmt(left);
            v.visit_expr(right);
            v.visit_stmt(body);
        }
        Stmt::While { test, body } | Stmt::DoWhile { test, body } => {
            v.visit_expr(test);
            v.visit_stmt(body);
        }
        Stmt::Try {
            block,
            catch,
            finally,
        } => {
            for s in block {
                v.visit_stmt(s);
            }
            if let Some(catch) = catch {
                for s in &mut catch.body {
                    v.visit_stmt(s);
                }
            }
            if let Some(finally) = finally {
                for s in finally {
                    v.visit_stmt(s);
                }
            }
        }
        Stmt::Switch {
            discriminant,
            cases,
        } => {
            v.visit_expr(discriminant);
            for case in cases {
                if let Some(test) = &mut case.test {
                    v.visit_expr(test);
                }
                for s in &mut case.consequent {
                    v.visit_stmt(s);
                }
            }
        }
        Stmt::VariableDeclaration(decls) => {
            for decl in decls {
                v.visit_expr(&mut decl.init);
            }
        }
        Stmt::FunctionDeclaration(func) => {
            for s in &mut func.body {
                v.visit_stmt(s);
            }
        }
    }
}

pub fn walk_expr_children<V: Visitor + ?Sized>(v: &mut V, expr: &mut Expr) {
    match expr {
        Expr::Missing
        | Expr::Identifier(_)
        | Expr::Number(_)
        | Expr::String(_)
        | Expr::Boolean(_) => {}
        Expr::Array(items) | Expr::Sequence(items) => {
            for item in items {
                v.visit_expr(item);
            }
        }
        Expr::Object(props) => {
            for prop in props {
                if let PropertyKey::Computed(key) = &mut prop.key {
                    v.visit_expr(key);
                }
                v.visit_expr(&mut prop.value);
            }
        }
        Expr::Unary { operand, .. } => v.visit_expr(operand),
        Expr::Binary { left, right, .. }
        | Expr::Logical { left, right, .. }
        | Expr::Assign { left, right, .. } => {
            v.visit_expr(left);
            v.visit_expr(right);
        }
        Expr::Conditional {
            test,
            consequent,
            alternate,
        } => {
            v.visit_expr(test);
            v.visit_expr(consequent);
            v.visit_expr(alternate);
        }
        Expr::Call { callee, arguments } => {
            v.visit_expr(callee);
            for arg in arguments {
                v.visit_expr(arg);
            }
        }
        Expr::Member { object, property } => {
            v.visit_expr(object);
            if let MemberProperty::Computed(key) = property {
                v.visit_expr(key);
            }
        }
        Expr::Function(func) | Expr::ArrowFunction(func) => {
            for s in &mut func.body {
                v.visit_stmt(s);
            }
        }
    }
}

/// A read-only counterpart of [`Visitor`] for passes that only need to
/// observe the tree (pattern extractors that stop at first match).
pub trait Inspector {
    fn inspect_program(&mut self, program: &Program) {
        for stmt in &program.body {
            self.inspect_stmt(stmt);
        }
    }
    fn inspect_stmt(&mut self, stmt: &Stmt) {
        walk_stmt_ref(self, stmt);
    }
    fn inspect_expr(&mut self, expr: &Expr) {
        walk_expr_ref(self, expr);
    }
}

pub fn walk_stmt_ref<V: Inspector + ?Sized>(v: &mut V, stmt: &Stmt) {
    match stmt {
        Stmt::Missing | Stmt::Break | Stmt::Continue | Stmt::Empty => {}
        Stmt::Block(body) => {
            for s in body {
                v.inspect_stmt(s);
            }
        }
        Stmt::Expression(expr) => v.inspect_expr(expr),
        Stmt::Return(arg) => v.inspect_expr(arg),
        Stmt::If {
            test,
            consequent,
            alternate,
        } => {
            v.inspect_expr(test);
            v.inspect_stmt(consequent);
            if let Some(alt) = alternate {
                v.inspect_stmt(alt);
            }
        }
        Stmt::For {
            init,
            test,
            update,
            body,
        } => {
            if let Some(init) = init {
                v.inspect_stmt(init);
            }
            v.inspect_expr(test);
            v.inspect_expr(update);
            v.inspect_stmt(body);
        }
        Stmt::ForIn { left, right, body } => {
            v.inspect_stmt(left);
            v.inspect_expr(right);
            v.inspect_stmt(body);
        }
        Stmt::While { test, body } | Stmt::DoWhile { test, body } => {
            v.inspect_expr(test);
            v.inspect_stmt(body);
        }
        Stmt::Try {
            block,
            catch,
            finally,
        } => {
            for s in block {
                v.inspect_stmt(s);
            }
            if let Some(catch) = catch {
                for s in &catch.body {
                    v.inspect_stmt(s);
                }
            }
            if let Some(finally) = finally {
                for s in finally {
                    v.inspect_stmt(s);
                }
            }
        }
        Stmt::Switch {
            discriminant,
            cases,
        } => {
            v.inspect_expr(discriminant);
            for case in cases {
                if let Some(test) = &case.test {
                    v.inspect_expr(test);
                }
                for s in &case.consequent {
                    v.inspect_stmt(s);
                }
            }
        }
        Stmt::VariableDeclaration(decls) => {
            for decl in decls {
                v.inspect_expr(&decl.init);
            }
        }
        Stmt::FunctionDeclaration(func) => {
            for s in &func.body {
                v.inspect_stmt(s);
            }
        }
    }
}

pub fn walk_expr_ref<V: Inspector + ?Sized>(v: &mut V, expr: &Expr) {
    match expr {
        Expr::Missing
        | Expr::Identifier(_)
        | Expr::Number(_)
        | Expr::String(_)
        | Expr::Boolean(_) => {}
        Expr::Array(items) | Expr::Sequence(items) => {
            for item in items {
                v.inspect_expr(item);
            }
        }
        Expr::Object(props) => {
            for prop in props {
                if let PropertyKey::Computed(key) = &prop.key {
                    v.inspect_expr(key);
                }
                v.inspect_expr(&prop.value);
            }
        }
        Expr::Unary { operand, .. } => v.inspect_expr(operand),
        Expr::Binary { left, right, .. }
        | Expr::Logical { left, right, .. }
        | Expr::Assign { left, right, .. } => {
            v.inspect_expr(left);
            v.inspect_expr(right);
        }
        Expr::Conditional {
            test,
            consequent,
            alternate,
        } => {
            v.inspect_expr(test);
            v.inspect_expr(consequent);
            v.inspect_expr(alternate);
        }
        Expr::Call { callee, arguments } => {
            v.inspect_expr(callee);
            for arg in arguments {
                v.inspect_expr(arg);
            }
        }
        Expr::Member { object, property } => {
            v.inspect_expr(object);
            if let MemberProperty::Computed(key) = property {
                v.inspect_expr(key);
            }
        }
        Expr::Function(func) | Expr::ArrowFunction(func) => {
            for s in &func.body {
                v.inspect_stmt(s);
            }
        }
    }
}
