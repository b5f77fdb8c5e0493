//! LZ-alphabet extractor (spec.md §4.6): a narrow scan for the receiver
//! string of any `"...".charAt(...)` call that looks like a 64-character
//! codec alphabet.

use crate::ast::visitor::walk_expr_ref;
use crate::ast::{Expr, Inspector, MemberProperty, Program};
use std::collections::HashSet;

/// An alphabet is exactly 64 characters, duplicate-free, and contains at
/// least one letter and one digit (spec.md §3 invariant 4 / §8).
pub fn is_valid_alphabet(candidate: &str) -> bool {
    let chars: Vec<char> = candidate.chars().collect();
    if chars.len() != 64 {
        return false;
    }
    let unique: HashSet<char> = chars.iter().copied().collect();
    if unique.len() != 64 {
        return false;
    }
    chars.iter().any(|c| c.is_ascii_alphabetic()) && chars.iter().any(|c| c.is_ascii_digit())
}

struct AlphabetFinder {
    found: Option<String>,
}

impl Inspector for AlphabetFinder {
    fn inspect_expr(&mut self, expr: &Expr) {
        if self.found.is_none() {
            if let Expr::Call { callee, .. } = expr {
                if let Expr::Member { object, property } = callee.as_ref() {
                    if matches!(property, MemberProperty::Identifier(name) if name == "charAt") {
                        if let Expr::String(s) = object.as_ref() {
                            if is_valid_alphabet(s) {
                                self.found = Some(s.clone());
                            }
                        }
                    }
                }
            }
        }
        walk_expr_ref(self, expr);
    }
}

/// The first `"...".charAt(...)` receiver that validates as a 64-char
/// codec alphabet.
pub fn extract_alphabet(program: &Program) -> Option<String> {
    let mut finder = AlphabetFinder { found: None };
    finder.inspect_program(program);
    finder.found
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::parse;

    const STANDARD: &str =
        "ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789+/";

    #[test]
    fn validates_standard_alphabet() {
        assert!(is_valid_alphabet(STANDARD));
    }

    #[test]
    fn rejects_wrong_length() {
        assert!(!is_valid_alphabet("abc"));
    }

    #[test]
    fn rejects_duplicates() {
        let dup = format!("{}a", &STANDARD[1..]);
        assert!(!is_valid_alphabet(&dup));
    }

    #[test]
    fn extracts_from_char_at_call() {
        let src = format!(r#"x = "{STANDARD}".charAt(5);"#);
        let program = parse(&src).unwrap();
        assert_eq!(extract_alphabet(&program).unwrap(), STANDARD);
    }
}
