//! The script tree: node types, lexer, parser, and traversal.

pub mod lexer;
pub mod node;
pub mod parser;
pub mod visitor;

pub use node::*;
pub use parser::{parse, AstError};
pub use visitor::{Inspector, Visitor};

/// Best-effort source regeneration, used by the CLI's `--debug` output and
/// by tests that want to eyeball a post-fold tree. Not a faithful
/// unparser: it reprints with a fixed, readable style rather than
/// preserving the original formatting, and compound assignment operators
/// collapse to `=` since [`node::AssignOp`] doesn't retain which one was
/// written.
pub fn generate(program: &Program) -> String {
    let mut out = String::new();
    for stmt in &program.body {
        write_stmt(&mut out, stmt, 0);
    }
    out
}

fn indent(out: &mut String, level: usize) {
    for _ in 0..level {
        out.push_str("  ");
    }
}

fn write_stmt(out: &mut String, stmt: &Stmt, level: usize) {
    indent(out, level);
    match stmt {
        Stmt::Missing => out.push_str("/* missing */;\n"),
        Stmt::Empty => out.push_str(";\n"),
        Stmt::Break => out.push_str("break;\n"),
        Stmt::Continue => out.push_str("continue;\n"),
        Stmt::Block(body) => {
            out.push_str("{\n");
            for s in body {
                write_stmt(out, s, level + 1);
            }
            indent(out, level);
            out.push_str("}\n");
        }
        Stmt::Expression(expr) => {
            write_expr(out, expr);
            out.push_str(";\n");
        }
        Stmt::Return(arg) => {
            out.push_str("return ");
            write_expr(out, arg);
            out.push_str(";\n");
        }
        Stmt::If {
            test,
            consequent,
            alternate,
        } => {
            out.push_str("if (");
            write_expr(out, test);
            out.push_str(") {\n");
            write_stmt(out, consequent, level + 1);
            indent(out, level);
            out.push('}');
            if let Some(alt) = alternate {
                out.push_str(" else {\n");
                write_stmt(out, alt, level + 1);
                indent(out, level);
                out.push('}');
            }
            out.push('\n');
        }
        Stmt::For {
            init,
            test,
            update,
            body,
        } => {
            out.push_str("for (");
            if let Some(init) = init {
                write_stmt_inline(out, init);
            }
            out.push_str("; ");
            write_expr(out, test);
            out.push_str("; ");
            write_expr(out, update);
            out.push_str(") {\n");
            write_stmt(out, body, level + 1);
            indent(out, level);
            out.push_str("}\n");
        }
        Stmt::ForIn { left, right, body } => {
            out.push_str("for (");
            write_stmt_inline(out, left);
            out.push_str(" in ");
            write_expr(out, right);
            out.push_str(") {\n");
            write_stmt(out, body, level + 1);
            indent(out, level);
            out.push_str("}\n");
        }
        Stmt::While { test, body } => {
            out.push_str("while (");
            write_expr(out, test);
            out.push_str(") {\n");
            write_stmt(out, body, level + 1);
            indent(out, level);
            out.push_str("}\n");
        }
        Stmt::DoWhile { test, body } => {
            out.push_str("do {\n");
            write_stmt(out, body, level + 1);
            indent(out, level);
            out.push_str("} while (");
            write_expr(out, test);
            out.push_str(");\n");
        }
        Stmt::Try {
            block,
            catch,
            finally,
        } => {
            out.push_str("try {\n");
            for s in block {
                write_stmt(out, s, level + 1);
            }
            indent(out, level);
            out.push('}');
            if let Some(catch) = catch {
                out.push_str(" catch (");
                out.push_str(catch.param.as_ref().map(|i| i.name.as_str()).unwrap_or(""));
                out.push_str(") {\n");
                for s in &catch.body {
                    write_stmt(out, s, level + 1);
                }
                indent(out, level);
                out.push('}');
            }
            if let Some(finally) = finally {
                out.push_str(" finally {\n");
                for s in finally {
                    write_stmt(out, s, level + 1);
                }
                indent(out, level);
                out.push('}');
            }
            out.push('\n');
        }
        Stmt::Switch {
            discriminant,
            cases,
        } => {
            out.push_str("switch (");
            write_expr(out, discriminant);
            out.push_str(") {\n");
            for case in cases {
                indent(out, level + 1);
                match &case.test {
                    Some(test) => {
                        out.push_str("case ");
                        write_expr(out, test);
                        out.push_str(":\n");
                    }
                    None => out.push_str("default:\n"),
                }
                for s in &case.consequent {
                    write_stmt(out, s, level + 2);
                }
            }
            indent(out, level);
            out.push_str("}\n");
        }
        Stmt::VariableDeclaration(decls) => {
            out.push_str("var ");
            for (i, decl) in decls.iter().enumerate() {
                if i > 0 {
                    out.push_str(", ");
                }
                out.push_str(&decl.name.name);
                if !matches!(*decl.init, Expr::Missing) {
                    out.push_str(" = ");
                    write_expr(out, &decl.init);
                }
            }
            out.push_str(";\n");
        }
        Stmt::FunctionDeclaration(func) => {
            write_function(out, func, level);
            out.push('\n');
        }
    }
}

fn write_stmt_inline(out: &mut String, stmt: &Stmt) {
    match stmt {
        Stmt::VariableDeclaration(decls) => {
            out.push_str("var ");
            for (i, decl) in decls.iter().enumerate() {
                if i > 0 {
                    out.push_str(", ");
                }
                out.push_str(&decl.name.name);
                if !matches!(*decl.init, Expr::Missing) {
                    out.push_str(" = ");
                    write_expr(out, &decl.init);
                }
            }
        }
        Stmt::Expression(expr) => write_expr(out, expr),
        _ => {}
    }
}

fn write_function(out: &mut String, func: &FunctionLiteral, level: usize) {
    out.push_str("function ");
    if let Some(name) = &func.name {
        out.push_str(&name.name);
    }
    out.push('(');
    for (i, p) in func.params.iter().enumerate() {
        if i > 0 {
            out.push_str(", ");
        }
        out.push_str(&p.name);
    }
    out.push_str(") {\n");
    for s in &func.body {
        write_stmt(out, s, level + 1);
    }
    indent(out, level);
    out.push('}');
}

fn write_expr(out: &mut String, expr: &Expr) {
    match expr {
        Expr::Missing => out.push_str("/* missing */"),
        Expr::Identifier(id) => out.push_str(&id.name),
        Expr::Number(n) => out.push_str(&format!("{n}")),
        Expr::String(s) => out.push_str(&format!("{s:?}")),
        Expr::Boolean(b) => out.push_str(if *b { "true" } else { "false" }),
        Expr::Array(items) => {
            out.push('[');
            for (i, item) in items.iter().enumerate() {
                if i > 0 {
                    out.push_str(", ");
                }
                write_expr(out, item);
            }
            out.push(']');
        }
        Expr::Object(props) => {
            out.push('{');
            for (i, prop) in props.iter().enumerate() {
                if i > 0 {
                    out.push_str(", ");
                }
                match &prop.key {
                    node::PropertyKey::Identifier(name) => out.push_str(name),
                    node::PropertyKey::String(s) => out.push_str(&format!("{s:?}")),
                    node::PropertyKey::Computed(key) => {
                        out.push('[');
                        write_expr(out, key);
                        out.push(']');
                    }
                }
                out.push_str(": ");
                write_expr(out, &prop.value);
            }
            out.push('}');
        }
        Expr::Unary { op, operand } => {
            out.push_str(unary_op_str(*op));
            write_expr(out, operand);
        }
        Expr::Binary { op, left, right } => {
            out.push('(');
            write_expr(out, left);
            out.push_str(&format!(" {} ", binary_op_str(*op)));
            write_expr(out, right);
            out.push(')');
        }
        Expr::Logical { op, left, right } => {
            out.push('(');
            write_expr(out, left);
            out.push_str(match op {
                node::LogicalOp::And => " && ",
                node::LogicalOp::Or => " || ",
                node::LogicalOp::Nullish => " ?? ",
            });
            write_expr(out, right);
            out.push(')');
        }
        Expr::Assign { left, right, .. } => {
            write_expr(out, left);
            out.push_str(" = ");
            write_expr(out, right);
        }
        Expr::Conditional {
            test,
            consequent,
            alternate,
        } => {
            write_expr(out, test);
            out.push_str(" ? ");
            write_expr(out, consequent);
            out.push_str(" : ");
            write_expr(out, alternate);
        }
        Expr::Sequence(items) => {
            out.push('(');
            for (i, item) in items.iter().enumerate() {
                if i > 0 {
                    out.push_str(", ");
                }
                write_expr(out, item);
            }
            out.push(')');
        }
        Expr::Call { callee, arguments } => {
            write_expr(out, callee);
            out.push('(');
            for (i, arg) in arguments.iter().enumerate() {
                if i > 0 {
                    out.push_str(", ");
                }
                write_expr(out, arg);
            }
            out.push(')');
        }
        Expr::Member { object, property } => {
            write_expr(out, object);
            match property {
                node::MemberProperty::Identifier(name) => {
                    out.push('.');
                    out.push_str(name);
                }
                node::MemberProperty::Computed(key) => {
                    out.push('[');
                    write_expr(out, key);
                    out.push(']');
                }
            }
        }
        Expr::Function(func) => write_function(out, func, 0),
        Expr::ArrowFunction(func) => {
            out.push('(');
            for (i, p) in func.params.iter().enumerate() {
                if i > 0 {
                    out.push_str(", ");
                }
                out.push_str(&p.name);
            }
            out.push_str(") => {\n");
            for s in &func.body {
                write_stmt(out, s, 1);
            }
            out.push('}');
        }
    }
}

fn unary_op_str(op: node::UnaryOp) -> &'static str {
    use node::UnaryOp::*;
    match op {
        Plus => "+",
        Minus => "-",
        Not => "!",
        BitNot => "~",
        TypeOf => "typeof ",
        Void => "void ",
        Delete => "delete ",
        Other => "",
    }
}

fn binary_op_str(op: node::BinaryOp) -> &'static str {
    use node::BinaryOp::*;
    match op {
        Add => "+",
        Sub => "-",
        Mul => "*",
        Div => "/",
        Mod => "%",
        Other => "?",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn generate_round_trips_through_parse() {
        let program = parse("var x = 1 + 2; function f(a) { return a; }").unwrap();
        let text = generate(&program);
        assert!(parse(&text).is_ok());
    }
}
