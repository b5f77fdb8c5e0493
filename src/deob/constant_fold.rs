//! Constant folder & object inliner (spec.md §4.2).
//!
//! Three passes, run in order by [`fold`]: collect numeric object
//! literals, inline member reads against them, then fold scalar
//! arithmetic. Each is cheap enough, and the trees small enough, that a
//! single pass of each suffices — see the idempotence test at the bottom.

use crate::ast::visitor::{walk_expr_children, walk_stmt_ref};
use crate::ast::{Expr, Inspector, PropertyKey, Program, Stmt, UnaryOp, Visitor};
use std::collections::HashMap;

use super::jsparseint::js_parse_int;

pub type NumericObjectMap = HashMap<String, HashMap<String, f64>>;

/// Runs collection, inlining, and scalar folding over `program` in place.
pub fn fold(program: &mut Program) {
    let numbers = collect_numeric_objects(program);
    inline_numeric_members(program, &numbers);
    fold_scalars(program);
}

/// Extracts `f64` from a numeric literal or a unary `+`/`-` applied to
/// one; anything else is not inlineable.
fn eval_numeric_literal(expr: &Expr) -> Option<f64> {
    match expr {
        Expr::Number(n) => Some(*n),
        Expr::Unary {
            op: UnaryOp::Minus,
            operand,
        } => eval_numeric_literal(operand).map(|n| -n),
        Expr::Unary {
            op: UnaryOp::Plus,
            operand,
        } => eval_numeric_literal(operand),
        _ => None,
    }
}

fn object_as_numeric_map(props: &[crate::ast::ObjectProperty]) -> Option<HashMap<String, f64>> {
    if props.len() < 2 {
        return None;
    }
    let mut map = HashMap::with_capacity(props.len());
    for prop in props {
        let key = match &prop.key {
            PropertyKey::Identifier(name) => name.clone(),
            PropertyKey::String(s) => s.clone(),
            PropertyKey::Computed(_) => return None,
        };
        let value = eval_numeric_literal(&prop.value)?;
        map.insert(key, value);
    }
    Some(map)
}

struct NumericObjectCollector {
    numbers: NumericObjectMap,
}

impl Inspector for NumericObjectCollector {
    fn inspect_stmt(&mut self, stmt: &Stmt) {
        match stmt {
            Stmt::VariableDeclaration(decls) => {
                for decl in decls {
                    if let Expr::Object(props) = decl.init.as_ref() {
                        if let Some(map) = object_as_numeric_map(props) {
                            self.numbers.insert(decl.name.name.clone(), map);
                        }
                    }
                }
            }
            _ => {}
        }
        walk_stmt_ref(self, stmt);
    }

    fn inspect_expr(&mut self, expr: &Expr) {
        if let Expr::Assign { left, right, .. } = expr {
            if let (Expr::Identifier(id), Expr::Object(props)) = (left.as_ref(), right.as_ref()) {
                if let Some(map) = object_as_numeric_map(props) {
                    self.numbers.insert(id.name.clone(), map);
                }
            }
        }
        crate::ast::visitor::walk_expr_ref(self, expr);
    }
}

fn collect_numeric_objects(program: &Program) -> NumericObjectMap {
    let mut collector = NumericObjectCollector {
        numbers: HashMap::new(),
    };
    collector.inspect_program(program);
    collector.numbers
}

struct NumericInliner<'a> {
    numbers: &'a NumericObjectMap,
}

impl Visitor for NumericInliner<'_> {
    fn visit_expr(&mut self, expr: &mut Expr) {
        walk_expr_children(self, expr);
        if let Expr::Member { object, property } = expr {
            if let Expr::Identifier(id) = object.as_ref() {
                if let Some(map) = self.numbers.get(&id.name) {
                    let key = match property {
                        crate::ast::MemberProperty::Identifier(name) => Some(name.clone()),
                        crate::ast::MemberProperty::Computed(key) => match key.as_ref() {
                            Expr::String(s) => Some(s.clone()),
                            _ => None,
                        },
                    };
                    if let Some(key) = key {
                        if let Some(value) = map.get(&key) {
                            *expr = Expr::Number(*value);
                        }
                    }
                }
            }
        }
    }
}

fn inline_numeric_members(program: &mut Program, numbers: &NumericObjectMap) {
    let mut inliner = NumericInliner { numbers };
    inliner.visit_program(program);
}

/// Applies the §4.2 scalar folds (unary, binary arithmetic, `parseInt`
/// of a string literal, `Math.floor`) in a single pre-order pass.
/// Exposed standalone because the rewriter (§4.5) re-runs this to
/// resolve call arguments computed arithmetically (`α(2+3)`).
pub fn fold_scalars(program: &mut Program) {
    let mut folder = ScalarFolder;
    folder.visit_program(program);
}

struct ScalarFolder;

impl Visitor for ScalarFolder {
    fn visit_expr(&mut self, expr: &mut Expr) {
        walk_expr_children(self, expr);
        match expr {
            Expr::Unary { op, operand } => {
                let folded = match (*op, operand.as_ref()) {
                    (UnaryOp::Not, Expr::Boolean(b)) => Some(Expr::Boolean(!b)),
                    (UnaryOp::Not, Expr::Array(_)) | (UnaryOp::Not, Expr::Object(_)) => {
                        Some(Expr::Boolean(false))
                    }
                    (UnaryOp::Minus, Expr::Number(n)) => Some(Expr::Number(-n)),
                    (UnaryOp::Plus, Expr::Number(n)) => Some(Expr::Number(*n)),
                    _ => None,
                };
                if let Some(folded) = folded {
                    *expr = folded;
                }
            }
            Expr::Binary { op, left, right } => {
                if let (Expr::Number(l), Expr::Number(r)) = (left.as_ref(), right.as_ref()) {
                    let folded = match op {
                        crate::ast::BinaryOp::Add => Some(l + r),
                        crate::ast::BinaryOp::Sub => Some(l - r),
                        crate::ast::BinaryOp::Mul => Some(l * r),
                        crate::ast::BinaryOp::Div => {
                            if *r != 0.0 {
                                Some(l / r)
                            } else {
                                None
                            }
                        }
                        crate::ast::BinaryOp::Mod => {
                            if *r != 0.0 {
                                Some(js_remainder(*l, *r))
                            } else {
                                None
                            }
                        }
                        crate::ast::BinaryOp::Other => None,
                    };
                    if let Some(value) = folded {
                        *expr = Expr::Number(value);
                    }
                }
            }
            Expr::Call { callee, arguments } => {
                if is_global_call(callee, "parseInt") {
                    if let [Expr::String(s)] = arguments.as_slice() {
                        *expr = Expr::Number(js_parse_int(s));
                    }
                } else if is_math_floor(callee) {
                    if let [Expr::Number(n)] = arguments.as_slice() {
                        *expr = Expr::Number(n.floor());
                    }
                }
            }
            _ => {}
        }
    }
}

/// IEEE-754 remainder: magnitude of the dividend, sign of the dividend —
/// Rust's `%` on `f64` already implements this (unlike e.g. Python).
fn js_remainder(l: f64, r: f64) -> f64 {
    l % r
}

fn is_global_call(callee: &Expr, name: &str) -> bool {
    matches!(callee, Expr::Identifier(id) if id.name == name)
}

fn is_math_floor(callee: &Expr) -> bool {
    matches!(
        callee,
        Expr::Member { object, property }
            if matches!(object.as_ref(), Expr::Identifier(id) if id.name == "Math")
                && matches!(property, crate::ast::MemberProperty::Identifier(name) if name == "floor")
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::parse;

    #[test]
    fn folds_numeric_object_inline_scenario() {
        let mut program = parse("var o={a:1,b:2}; x=o.a+o.b;").unwrap();
        fold(&mut program);
        match &program.body[1] {
            Stmt::Expression(Expr::Assign { right, .. }) => {
                assert_eq!(**right, Expr::Number(3.0));
            }
            other => panic!("unexpected: {other:?}"),
        }
    }

    #[test]
    fn rejects_objects_with_non_numeric_entries() {
        let mut program = parse("var o={a:1,b:\"x\"}; y=o.a;").unwrap();
        fold(&mut program);
        // o.a must remain a member read since the whole object is rejected.
        match &program.body[1] {
            Stmt::Expression(Expr::Assign { right, .. }) => {
                assert!(matches!(right.as_ref(), Expr::Member { .. }));
            }
            other => panic!("unexpected: {other:?}"),
        }
    }

    #[test]
    fn single_entry_object_is_not_inlined() {
        let mut program = parse("var o={a:1}; y=o.a;").unwrap();
        fold(&mut program);
        match &program.body[1] {
            Stmt::Expression(Expr::Assign { right, .. }) => {
                assert!(matches!(right.as_ref(), Expr::Member { .. }));
            }
            other => panic!("unexpected: {other:?}"),
        }
    }

    #[test]
    fn folding_is_idempotent() {
        let mut once = parse("var o={a:1,b:2}; x=o.a+o.b;").unwrap();
        fold(&mut once);
        let mut twice = once.clone();
        fold(&mut twice);
        assert_eq!(once, twice);
    }

    #[test]
    fn parse_int_and_math_floor_fold() {
        let mut program = parse("x=parseInt(\"007\")+Math.floor(2.9);").unwrap();
        fold(&mut program);
        match &program.body[0] {
            Stmt::Expression(Expr::Assign { right, .. }) => {
                assert_eq!(**right, Expr::Number(9.0));
            }
            other => panic!("unexpected: {other:?}"),
        }
    }
}
