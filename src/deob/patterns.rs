//! Pattern extractors (spec.md §4.3): independent structural-match passes,
//! each "a visitor that stops at the first match." None of these care
//! what anything is *named* — only shape.

use crate::ast::visitor::{walk_expr_ref, walk_stmt_ref};
use crate::ast::{AssignOp, Expr, FunctionLiteral, Inspector, MemberProperty, Program, Stmt};
use std::collections::HashSet;

pub const DEFAULT_OFFSET: f64 = 406.0;
pub const DEFAULT_TARGET: f64 = 159_113.0;

fn is_identifier_named(expr: &Expr, name: &str) -> bool {
    matches!(expr, Expr::Identifier(id) if id.name == name)
}

fn is_self_subtraction(expr: &Expr) -> Option<f64> {
    let Expr::Assign {
        op: AssignOp::Assign,
        left,
        right,
    } = expr
    else {
        return None;
    };
    let Expr::Identifier(lhs) = left.as_ref() else {
        return None;
    };
    let Expr::Binary {
        op: crate::ast::BinaryOp::Sub,
        left: rl,
        right: rr,
    } = right.as_ref()
    else {
        return None;
    };
    if !is_identifier_named(rl, &lhs.name) {
        return None;
    }
    let Expr::Number(k) = rr.as_ref() else {
        return None;
    };
    if *k > 50.0 && *k < 2000.0 {
        Some(*k)
    } else {
        None
    }
}

fn is_self_reassignment(expr: &Expr, name: &str) -> bool {
    matches!(
        expr,
        Expr::Assign { op: AssignOp::Assign, left, right }
            if is_identifier_named(left, name) && matches!(right.as_ref(), Expr::Function(_))
    )
}

/// Finds the first `X = X - K` (50 < K < 2000) in a statement list,
/// searching the full subtree including nested function bodies.
struct SelfSubFinder {
    found: Option<f64>,
}

impl Inspector for SelfSubFinder {
    fn inspect_expr(&mut self, expr: &Expr) {
        if self.found.is_none() {
            if let Some(k) = is_self_subtraction(expr) {
                self.found = Some(k);
            }
        }
        walk_expr_ref(self, expr);
    }
}

fn contains_self_subtraction(stmts: &[Stmt]) -> Option<f64> {
    let mut finder = SelfSubFinder { found: None };
    for stmt in stmts {
        finder.inspect_stmt(stmt);
    }
    finder.found
}

struct SelfReassignFinder<'a> {
    name: &'a str,
    found: bool,
}

impl Inspector for SelfReassignFinder<'_> {
    fn inspect_expr(&mut self, expr: &Expr) {
        if !self.found && is_self_reassignment(expr, self.name) {
            self.found = true;
        }
        walk_expr_ref(self, expr);
    }
}

fn contains_self_reassignment(stmts: &[Stmt], name: &str) -> bool {
    let mut finder = SelfReassignFinder { name, found: false };
    for stmt in stmts {
        finder.inspect_stmt(stmt);
    }
    finder.found
}

/// Collects every function literal encountered in the program, in
/// pre-order document order (outer before inner).
struct FunctionCollector<'a> {
    bodies: Vec<&'a [Stmt]>,
}

impl<'a> Inspector for FunctionCollector<'a> {
    fn inspect_stmt(&mut self, stmt: &Stmt) {
        if let Stmt::FunctionDeclaration(func) = stmt {
            self.bodies.push(&func.body);
        }
        walk_stmt_ref(self, stmt);
    }

    fn inspect_expr(&mut self, expr: &Expr) {
        match expr {
            Expr::Function(func) | Expr::ArrowFunction(func) => {
                self.bodies.push(&func.body);
            }
            _ => {}
        }
        walk_expr_ref(self, expr);
    }
}

/// Strategy (a): the first function literal (any, top-level or nested)
/// whose body contains the self-subtraction. Strategy (b): otherwise the
/// entire program. Default `406` if neither matches.
pub fn extract_offset(program: &Program) -> f64 {
    let mut collector = FunctionCollector { bodies: Vec::new() };
    collector.inspect_program(program);
    for body in &collector.bodies {
        if let Some(k) = contains_self_subtraction(body) {
            return k;
        }
    }
    if let Some(k) = contains_self_subtraction(&program.body) {
        return k;
    }
    DEFAULT_OFFSET
}

struct TargetFinder {
    found: Option<f64>,
}

impl Inspector for TargetFinder {
    fn inspect_expr(&mut self, expr: &Expr) {
        if self.found.is_none() {
            if let Expr::Call { arguments, .. } = expr {
                if arguments.len() == 2 {
                    if let Expr::Number(n) = &arguments[1] {
                        if *n > 50_000.0 {
                            self.found = Some(*n);
                        }
                    }
                }
            }
        }
        walk_expr_ref(self, expr);
    }
}

/// First 2-argument call whose second argument is a numeric literal
/// `> 50000`. Default `159113`.
pub fn extract_target(program: &Program) -> f64 {
    let mut finder = TargetFinder { found: None };
    finder.inspect_program(program);
    finder.found.unwrap_or(DEFAULT_TARGET)
}

fn contains_parse_int_call(expr: &Expr) -> bool {
    match expr {
        Expr::Call { callee, arguments } => {
            is_identifier_named(callee, "parseInt") || arguments.iter().any(contains_parse_int_call)
        }
        Expr::Binary { left, right, .. } => {
            contains_parse_int_call(left) || contains_parse_int_call(right)
        }
        Expr::Unary { operand, .. } => contains_parse_int_call(operand),
        _ => false,
    }
}

struct RotationExprFinder {
    found: Option<Expr>,
}

impl Inspector for RotationExprFinder {
    fn inspect_expr(&mut self, expr: &Expr) {
        if self.found.is_none() {
            if let Expr::Assign {
                op: AssignOp::Assign,
                right,
                ..
            } = expr
            {
                if contains_parse_int_call(right) {
                    self.found = Some((**right).clone());
                }
            }
        }
        walk_expr_ref(self, expr);
    }
}

/// The right-hand side of the first `=` assignment whose subtree
/// anywhere contains a `parseInt(...)` call, cloned for later repeated
/// evaluation.
pub fn extract_rotation_expr(program: &Program) -> Option<Expr> {
    let mut finder = RotationExprFinder { found: None };
    finder.inspect_program(program);
    finder.found
}

/// A top-level function declaration is the decoder iff its body contains
/// both a self-reassignment (`F = function(...) {...}`) and the offset
/// self-subtraction.
fn is_decoder_function(func: &FunctionLiteral, name: &str) -> bool {
    contains_self_reassignment(&func.body, name) && contains_self_subtraction(&func.body).is_some()
}

fn find_decoder_name(program: &Program) -> Option<String> {
    for stmt in &program.body {
        if let Stmt::FunctionDeclaration(func) = stmt {
            if let Some(name) = &func.name {
                if is_decoder_function(func, &name.name) {
                    return Some(name.name.clone());
                }
            }
        }
    }
    None
}

/// Unwraps a trailing comma-sequence element: `(a, b, X)` -> `X`.
fn unwrap_sequence_tail(expr: &Expr) -> &Expr {
    match expr {
        Expr::Sequence(items) => items.last().unwrap_or(expr),
        other => other,
    }
}

struct AssignmentPairCollector {
    pairs: Vec<(String, Expr)>,
}

impl Inspector for AssignmentPairCollector {
    fn inspect_stmt(&mut self, stmt: &Stmt) {
        if let Stmt::VariableDeclaration(decls) = stmt {
            for decl in decls {
                self.pairs
                    .push((decl.name.name.clone(), (*decl.init).clone()));
            }
        }
        walk_stmt_ref(self, stmt);
    }

    fn inspect_expr(&mut self, expr: &Expr) {
        if let Expr::Assign {
            op: AssignOp::Assign,
            left,
            right,
        } = expr
        {
            if let Expr::Identifier(id) = left.as_ref() {
                self.pairs.push((id.name.clone(), (**right).clone()));
            }
        }
        walk_expr_ref(self, expr);
    }
}

/// Seeds `aliases = {decoder}` then closes it under: `Y = …, X` or
/// `Y = X` (including `var Y = X`) where `X` is already an alias.
/// Fails (returns `None`) if no decoder function is found at all.
pub fn collect_aliases(program: &Program) -> Option<HashSet<String>> {
    let decoder = find_decoder_name(program)?;
    let mut aliases = HashSet::new();
    aliases.insert(decoder);

    let mut collector = AssignmentPairCollector { pairs: Vec::new() };
    collector.inspect_program(program);

    loop {
        let mut changed = false;
        for (lhs, rhs) in &collector.pairs {
            if aliases.contains(lhs) {
                continue;
            }
            if let Expr::Identifier(id) = unwrap_sequence_tail(rhs) {
                if aliases.contains(&id.name) {
                    aliases.insert(lhs.clone());
                    changed = true;
                }
            }
        }
        if !changed {
            break;
        }
    }
    Some(aliases)
}

struct StringTableFinder {
    best: Option<String>,
}

impl Inspector for StringTableFinder {
    fn inspect_expr(&mut self, expr: &Expr) {
        if let Expr::Call { callee, arguments } = expr {
            if let Expr::Member { object, property } = callee.as_ref() {
                if matches!(property, MemberProperty::Identifier(name) if name == "split")
                    && matches!(arguments.as_slice(), [Expr::String(sep)] if sep == ",")
                {
                    if let Expr::String(s) = object.as_ref() {
                        let is_longer = match &self.best {
                            Some(b) => s.len() > b.len(),
                            None => true,
                        };
                        if is_longer {
                            self.best = Some(s.clone());
                        }
                    }
                }
            }
        }
        walk_expr_ref(self, expr);
    }
}

/// The longest string literal that is the receiver of a `"...".split(",")`
/// call.
pub fn extract_string_table(program: &Program) -> Option<String> {
    let mut finder = StringTableFinder { best: None };
    finder.inspect_program(program);
    finder.best
}

fn is_wk_candidate(props: &[crate::ast::ObjectProperty], offset: f64, table_len: usize) -> bool {
    let hi = offset + table_len as f64;
    (9..=13).contains(&props.len())
        && props.iter().all(|p| {
            let key_literal = !matches!(p.key, crate::ast::PropertyKey::Computed(_));
            let value_in_range = matches!(p.value.as_ref(), Expr::Number(n) if *n >= offset && *n < hi);
            key_literal && value_in_range
        })
}

fn props_to_map(props: &[crate::ast::ObjectProperty]) -> std::collections::HashMap<String, f64> {
    let mut map = std::collections::HashMap::new();
    for prop in props {
        let key = match &prop.key {
            crate::ast::PropertyKey::Identifier(name) => name.clone(),
            crate::ast::PropertyKey::String(s) => s.clone(),
            crate::ast::PropertyKey::Computed(_) => continue,
        };
        if let Expr::Number(n) = prop.value.as_ref() {
            map.insert(key, *n);
        }
    }
    map
}

/// Manual pre-order walk (rather than [`Inspector`]) so the first match
/// can short-circuit instead of merely winning a "first recorded" race.
fn find_wk_in_expr(expr: &Expr, offset: f64, table_len: usize) -> Option<std::collections::HashMap<String, f64>> {
    if let Expr::Object(props) = expr {
        if is_wk_candidate(props, offset, table_len) {
            return Some(props_to_map(props));
        }
    }
    match expr {
        Expr::Array(items) | Expr::Sequence(items) => {
            items.iter().find_map(|e| find_wk_in_expr(e, offset, table_len))
        }
        Expr::Object(props) => props
            .iter()
            .find_map(|p| find_wk_in_expr(&p.value, offset, table_len)),
        Expr::Unary { operand, .. } => find_wk_in_expr(operand, offset, table_len),
        Expr::Binary { left, right, .. }
        | Expr::Logical { left, right, .. }
        | Expr::Assign { left, right, .. } => find_wk_in_expr(left, offset, table_len)
            .or_else(|| find_wk_in_expr(right, offset, table_len)),
        Expr::Conditional {
            test,
            consequent,
            alternate,
        } => find_wk_in_expr(test, offset, table_len)
            .or_else(|| find_wk_in_expr(consequent, offset, table_len))
            .or_else(|| find_wk_in_expr(alternate, offset, table_len)),
        Expr::Call { callee, arguments } => find_wk_in_expr(callee, offset, table_len)
            .or_else(|| arguments.iter().find_map(|a| find_wk_in_expr(a, offset, table_len))),
        Expr::Member { object, property } => {
            find_wk_in_expr(object, offset, table_len).or_else(|| match property {
                MemberProperty::Computed(key) => find_wk_in_expr(key, offset, table_len),
                MemberProperty::Identifier(_) => None,
            })
        }
        Expr::Function(func) | Expr::ArrowFunction(func) => {
            find_wk_in_stmts(&func.body, offset, table_len)
        }
        _ => None,
    }
}

fn find_wk_in_stmts(stmts: &[Stmt], offset: f64, table_len: usize) -> Option<std::collections::HashMap<String, f64>> {
    stmts.iter().find_map(|s| find_wk_in_stmt(s, offset, table_len))
}

fn find_wk_in_stmt(stmt: &Stmt, offset: f64, table_len: usize) -> Option<std::collections::HashMap<String, f64>> {
    match stmt {
        Stmt::Block(body) => find_wk_in_stmts(body, offset, table_len),
        Stmt::Try { block, catch, finally } => find_wk_in_stmts(block, offset, table_len)
            .or_else(|| catch.as_ref().and_then(|c| find_wk_in_stmts(&c.body, offset, table_len)))
            .or_else(|| finally.as_ref().and_then(|f| find_wk_in_stmts(f, offset, table_len))),
        Stmt::Expression(e) => find_wk_in_expr(e, offset, table_len),
        Stmt::Return(e) => find_wk_in_expr(e, offset, table_len),
        Stmt::If {
            test,
            consequent,
            alternate,
        } => find_wk_in_expr(test, offset, table_len)
            .or_else(|| find_wk_in_stmt(consequent, offset, table_len))
            .or_else(|| alternate.as_deref().and_then(|a| find_wk_in_stmt(a, offset, table_len))),
        Stmt::For { test, update, body, .. } => find_wk_in_expr(test, offset, table_len)
            .or_else(|| find_wk_in_expr(update, offset, table_len))
            .or_else(|| find_wk_in_stmt(body, offset, table_len)),
        Stmt::ForIn { right, body, .. } => {
            find_wk_in_expr(right, offset, table_len).or_else(|| find_wk_in_stmt(body, offset, table_len))
        }
        Stmt::While { test, body } | Stmt::DoWhile { test, body } => {
            find_wk_in_expr(test, offset, table_len).or_else(|| find_wk_in_stmt(body, offset, table_len))
        }
        Stmt::Switch { discriminant, cases } => find_wk_in_expr(discriminant, offset, table_len).or_else(|| {
            cases.iter().find_map(|c| find_wk_in_stmts(&c.consequent, offset, table_len))
        }),
        Stmt::VariableDeclaration(decls) => decls
            .iter()
            .find_map(|d| find_wk_in_expr(&d.init, offset, table_len)),
        Stmt::FunctionDeclaration(func) => find_wk_in_stmts(&func.body, offset, table_len),
        Stmt::Missing | Stmt::Break | Stmt::Continue | Stmt::Empty => None,
    }
}

/// An object literal of 9-13 numeric entries, every value within
/// `[offset, offset + table_len)`. First one encountered wins; absence is
/// tolerated (returns `None`).
pub fn extract_wk_map(
    program: &Program,
    offset: f64,
    table_len: usize,
) -> Option<std::collections::HashMap<String, f64>> {
    find_wk_in_stmts(&program.body, offset, table_len)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::parse;

    #[test]
    fn extracts_offset_from_decoder_scenario() {
        let program = parse(
            "function D(a,b){D=function(c,d){return d-406};return D(a,b)}; D=D-406;",
        )
        .unwrap();
        assert_eq!(extract_offset(&program), 406.0);
    }

    #[test]
    fn falls_back_to_default_offset() {
        let program = parse("var x = 1;").unwrap();
        assert_eq!(extract_offset(&program), DEFAULT_OFFSET);
    }

    #[test]
    fn extracts_target_over_50000() {
        let program = parse("foo(1, 159113);").unwrap();
        assert_eq!(extract_target(&program), 159_113.0);
    }

    #[test]
    fn falls_back_to_default_target() {
        let program = parse("foo(1, 2);").unwrap();
        assert_eq!(extract_target(&program), DEFAULT_TARGET);
    }

    #[test]
    fn alias_closure_matches_scenario_three() {
        let program = parse(
            "function D(a,b){D=function(c,d){return d-406};return D(a,b)}; D=D-406; var E=D;",
        )
        .unwrap();
        let aliases = collect_aliases(&program).unwrap();
        assert!(aliases.contains("D"));
        assert!(aliases.contains("E"));
        assert_eq!(aliases.len(), 2);
    }

    #[test]
    fn alias_closure_follows_comma_tail() {
        let program = parse(
            "function D(a,b){D=function(c,d){return d-406};return D(a,b)}; D=D-406; var E=(1,2,D);",
        )
        .unwrap();
        let aliases = collect_aliases(&program).unwrap();
        assert!(aliases.contains("E"));
    }

    #[test]
    fn string_table_picks_longest_split_receiver() {
        let program = parse(r#"a="x,y".split(","); b="aa,bb,cc".split(",");"#).unwrap();
        assert_eq!(extract_string_table(&program).unwrap(), "aa,bb,cc");
    }

    #[test]
    fn rotation_expr_requires_parse_int_in_subtree() {
        let program = parse("x = parseInt(a(0)) + parseInt(a(1));").unwrap();
        assert!(extract_rotation_expr(&program).is_some());
    }
}
