//! The rotation engine (spec.md §4.4): iterates the table through its
//! cyclic rotations until the rotation expression evaluates to the
//! target, then publishes the resolved string map.

use crate::ast::{BinaryOp, Expr, MemberProperty, UnaryOp};
use std::collections::HashMap;

use super::jsparseint::js_parse_int;

pub const MAX_ROTATIONS: usize = 20_000;

pub struct RotationContext<'a> {
    pub table: Vec<String>,
    pub offset: f64,
    pub aliases: &'a std::collections::HashSet<String>,
    pub wk_map: Option<&'a HashMap<String, f64>>,
}

impl RotationContext<'_> {
    /// `val(i) = parseInt(table[i - offset])` when `i` falls inside the
    /// table's current window, else `0`.
    fn val(&self, i: f64) -> f64 {
        let idx = i - self.offset;
        if idx < 0.0 {
            return 0.0;
        }
        let idx = idx.round() as usize;
        match self.table.get(idx) {
            Some(s) => js_parse_int(s),
            None => 0.0,
        }
    }

    fn wk_lookup(&self, key: &str) -> f64 {
        self.wk_map
            .and_then(|m| m.get(key))
            .copied()
            .unwrap_or(0.0)
    }

    fn rotate_once(&mut self) {
        if !self.table.is_empty() {
            let head = self.table.remove(0);
            self.table.push(head);
        }
    }

    /// The rotation-expression evaluator (spec.md §4.4's semantics
    /// table). Every construct outside the table evaluates to `0`,
    /// matching the source's runtime behavior of coercing whatever it
    /// doesn't recognize to `NaN`/`0` rather than throwing.
    pub fn eval(&self, expr: &Expr) -> f64 {
        match expr {
            Expr::Number(n) => *n,
            Expr::Unary {
                op: UnaryOp::Plus,
                operand,
            } => self.eval(operand),
            Expr::Unary {
                op: UnaryOp::Minus,
                operand,
            } => -self.eval(operand),
            Expr::Binary { op, left, right } => {
                let l = self.eval(left);
                let r = self.eval(right);
                match op {
                    BinaryOp::Add => l + r,
                    BinaryOp::Sub => l - r,
                    BinaryOp::Mul => l * r,
                    BinaryOp::Div => {
                        if r == 0.0 {
                            0.0
                        } else {
                            l / r
                        }
                    }
                    BinaryOp::Mod | BinaryOp::Other => 0.0,
                }
            }
            Expr::Call { callee, arguments } => self.eval_call(callee, arguments),
            Expr::Member { object, property } if is_wk_object(object) => match property {
                MemberProperty::Identifier(key) => self.wk_lookup(key),
                MemberProperty::Computed(key) => match key.as_ref() {
                    Expr::String(k) => self.wk_lookup(k),
                    _ => 0.0,
                },
            },
            _ => 0.0,
        }
    }

    fn eval_call(&self, callee: &Expr, arguments: &[Expr]) -> f64 {
        if let Expr::Identifier(id) = callee {
            if id.name == "parseInt" {
                return arguments.first().map(|e| self.eval(e)).unwrap_or(0.0);
            }
            if self.aliases.contains(&id.name) && arguments.len() == 1 {
                let index = match &arguments[0] {
                    Expr::Member { object, property } if is_wk_object(object) => match property {
                        MemberProperty::Identifier(key) => self.wk_lookup(key),
                        MemberProperty::Computed(key) => match key.as_ref() {
                            Expr::String(k) => self.wk_lookup(k),
                            _ => 0.0,
                        },
                    },
                    Expr::Number(n) => *n,
                    _ => 0.0,
                };
                return self.val(index);
            }
        }
        0.0
    }
}

/// `evalIndexFromMember` in the Go original gates member lookups on the
/// object literally being the `WK` identifier, returning -1 (here `0`)
/// for anything else rather than treating any `x.k` as a WK lookup.
fn is_wk_object(object: &Expr) -> bool {
    matches!(object, Expr::Identifier(id) if id.name == "WK")
}

pub struct RotationOutcome {
    pub converged: bool,
    pub iterations: usize,
    pub strings: std::collections::BTreeMap<u64, String>,
}

/// Rounds a rotation-index key consistently before bit-casting to an
/// integer map key (spec.md §9: "reimplementers may safely key by int
/// provided they apply round consistently").
fn key_for(offset_plus_i: f64) -> u64 {
    offset_plus_i.round().to_bits()
}

/// Runs up to [`MAX_ROTATIONS`] check-then-rotate steps (spec.md §4.4:
/// "if round(eval(rotationExpr)) == target, stop. Otherwise rotate").
/// Always publishes the string map from whatever table state it ends on,
/// convergent or not — the caller decides whether non-convergence is
/// fatal.
pub fn rotate_until_convergent(mut ctx: RotationContext, rotation_expr: &Expr, target: f64) -> RotationOutcome {
    let mut converged = false;
    let mut iterations = 0;
    for i in 0..MAX_ROTATIONS {
        iterations = i;
        if ctx.eval(rotation_expr).round() == target {
            converged = true;
            break;
        }
        ctx.rotate_once();
    }
    let mut strings = std::collections::BTreeMap::new();
    for (i, entry) in ctx.table.iter().enumerate() {
        strings.insert(key_for(ctx.offset + i as f64), entry.clone());
    }
    RotationOutcome {
        converged,
        iterations,
        strings,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::parse;
    use std::collections::HashSet;

    fn rotation_expr_from(src: &str) -> Expr {
        let program = parse(src).unwrap();
        super::super::patterns::extract_rotation_expr(&program).expect("rotation expr")
    }

    #[test]
    fn scenario_five_converges_after_one_rotation() {
        let aliases: HashSet<String> = ["a".to_string()].into_iter().collect();
        let ctx = RotationContext {
            table: vec!["3".into(), "1".into(), "2".into()],
            offset: 0.0,
            aliases: &aliases,
            wk_map: None,
        };
        let expr = rotation_expr_from("x = parseInt(a(0)) + parseInt(a(1));");
        let outcome = rotate_until_convergent(ctx, &expr, 3.0);
        assert!(outcome.converged);
        assert_eq!(outcome.iterations, 1);
    }

    #[test]
    fn unreachable_target_gives_up_without_crashing() {
        let aliases: HashSet<String> = ["a".to_string()].into_iter().collect();
        let ctx = RotationContext {
            table: vec!["3".into(), "1".into(), "2".into()],
            offset: 0.0,
            aliases: &aliases,
            wk_map: None,
        };
        let expr = rotation_expr_from("x = parseInt(a(0)) + parseInt(a(1));");
        let outcome = rotate_until_convergent(ctx, &expr, 999.0);
        assert!(!outcome.converged);
        assert_eq!(outcome.iterations, MAX_ROTATIONS - 1);
    }

    #[test]
    fn missing_wk_reference_evaluates_to_zero() {
        let aliases: HashSet<String> = HashSet::new();
        let ctx = RotationContext {
            table: vec!["1".into()],
            offset: 0.0,
            aliases: &aliases,
            wk_map: None,
        };
        let expr = Expr::Member {
            object: Box::new(Expr::Identifier("WK".into())),
            property: MemberProperty::Identifier("k".to_string()),
        };
        assert_eq!(ctx.eval(&expr), 0.0);
    }

    #[test]
    fn member_lookup_on_a_non_wk_object_evaluates_to_zero() {
        let aliases: HashSet<String> = HashSet::new();
        let mut wk_map = HashMap::new();
        wk_map.insert("k".to_string(), 42.0);
        let ctx = RotationContext {
            table: vec!["1".into()],
            offset: 0.0,
            aliases: &aliases,
            wk_map: Some(&wk_map),
        };
        let expr = Expr::Member {
            object: Box::new(Expr::Identifier("foo".into())),
            property: MemberProperty::Identifier("k".to_string()),
        };
        assert_eq!(ctx.eval(&expr), 0.0);
    }
}
