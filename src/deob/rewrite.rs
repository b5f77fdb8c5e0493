//! String-reference rewriter (spec.md §4.5): the final visitor pass that
//! turns `alias(n)` calls into the resolved string literal.

use crate::ast::visitor::walk_expr_children;
use crate::ast::{Expr, Program, Visitor};
use std::collections::{BTreeMap, HashSet};

use super::constant_fold::fold_scalars;

struct CallRewriter<'a> {
    aliases: &'a HashSet<String>,
    strings: &'a BTreeMap<u64, String>,
}

fn key_for(n: f64) -> u64 {
    n.round().to_bits()
}

impl Visitor for CallRewriter<'_> {
    fn visit_expr(&mut self, expr: &mut Expr) {
        walk_expr_children(self, expr);
        if let Expr::Call { callee, arguments } = expr {
            if let (Expr::Identifier(id), [Expr::Number(n)]) = (callee.as_ref(), arguments.as_slice()) {
                if self.aliases.contains(&id.name) {
                    if let Some(resolved) = self.strings.get(&key_for(*n)) {
                        *expr = Expr::String(resolved.clone());
                    }
                }
            }
        }
    }
}

/// Folds intervening arithmetic first (so `α(2+3)` becomes `α(5)`), then
/// replaces every `alias(n)` call whose `n` is a published string-table
/// index with the resolved string literal.
pub fn rewrite_string_calls(program: &mut Program, aliases: &HashSet<String>, strings: &BTreeMap<u64, String>) {
    fold_scalars(program);
    let mut rewriter = CallRewriter { aliases, strings };
    rewriter.visit_program(program);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::parse;

    #[test]
    fn rewrites_alias_call_with_literal_index() {
        let mut program = parse("x = a(0);").unwrap();
        let aliases: HashSet<String> = ["a".to_string()].into_iter().collect();
        let mut strings = BTreeMap::new();
        strings.insert(key_for(0.0), "hello".to_string());
        rewrite_string_calls(&mut program, &aliases, &strings);
        match &program.body[0] {
            crate::ast::Stmt::Expression(Expr::Assign { right, .. }) => {
                assert_eq!(**right, Expr::String("hello".to_string()));
            }
            other => panic!("unexpected: {other:?}"),
        }
    }

    #[test]
    fn resolves_arithmetic_argument_before_rewriting() {
        let mut program = parse("x = a(2 + 3);").unwrap();
        let aliases: HashSet<String> = ["a".to_string()].into_iter().collect();
        let mut strings = BTreeMap::new();
        strings.insert(key_for(5.0), "world".to_string());
        rewrite_string_calls(&mut program, &aliases, &strings);
        match &program.body[0] {
            crate::ast::Stmt::Expression(Expr::Assign { right, .. }) => {
                assert_eq!(**right, Expr::String("world".to_string()));
            }
            other => panic!("unexpected: {other:?}"),
        }
    }

    #[test]
    fn leaves_unknown_index_untouched() {
        let mut program = parse("x = a(99);").unwrap();
        let aliases: HashSet<String> = ["a".to_string()].into_iter().collect();
        let strings = BTreeMap::new();
        rewrite_string_calls(&mut program, &aliases, &strings);
        match &program.body[0] {
            crate::ast::Stmt::Expression(Expr::Assign { right, .. }) => {
                assert!(matches!(right.as_ref(), Expr::Call { .. }));
            }
            other => panic!("unexpected: {other:?}"),
        }
    }
}
