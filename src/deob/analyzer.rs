//! The analyzer pipeline (spec.md §2 control flow / §3 state): parse →
//! inline constants → extract offset/target/rotation expr/aliases/table/
//! WK map → rotate → rewrite calls → extract alphabet.

use std::collections::{BTreeMap, HashSet};

use thiserror::Error;

use crate::ast::{self, AstError, Program};

use super::alphabet;
use super::constant_fold;
use super::patterns;
use super::rewrite;
use super::rotation::{self, RotationContext};

#[derive(Debug, Error)]
pub enum AnalyzeError {
    #[error("script did not parse: {0}")]
    Parse(#[from] AstError),
    #[error("no decoder function found")]
    MissingDecoder,
    #[error("no string table candidate found")]
    MissingStringTable,
    #[error("no 64-character charAt alphabet found")]
    MissingAlphabet,
}

#[derive(Debug, Clone, PartialEq)]
pub enum AnalyzeWarning {
    /// Rotation exhausted `MAX_ROTATIONS` iterations without reaching
    /// `target`. Non-fatal: downstream decoding will produce garbage and
    /// the caller observes it as a beacon rejection (spec.md §7).
    RotationUnconverged { iterations: usize },
    /// The rotation expression references a member lookup but no WK map
    /// was recovered — those lookups silently evaluate to 0, which can
    /// cause a false convergence (spec.md §9 open question).
    MissingWk,
}

pub struct AnalysisResult {
    pub program: Program,
    pub offset: f64,
    pub target: f64,
    pub aliases: HashSet<String>,
    pub strings: BTreeMap<u64, String>,
    pub alphabet: String,
    pub warnings: Vec<AnalyzeWarning>,
}

/// One analyzer instance per script; owns its tree and maps for the
/// lifetime of [`analyze`] and releases them on return (spec.md §3
/// lifecycle, §5 confinement — no cross-request sharing).
pub fn analyze(source: &str) -> Result<AnalysisResult, AnalyzeError> {
    let mut program = ast::parse(source)?;
    constant_fold::fold(&mut program);

    let offset = patterns::extract_offset(&program);
    let target = patterns::extract_target(&program);

    let rotation_expr = patterns::extract_rotation_expr(&program).ok_or(AnalyzeError::MissingDecoder)?;
    let aliases = patterns::collect_aliases(&program).ok_or(AnalyzeError::MissingDecoder)?;

    let raw_table = patterns::extract_string_table(&program).ok_or(AnalyzeError::MissingStringTable)?;
    let table: Vec<String> = raw_table.split(',').map(|s| s.to_string()).collect();

    let wk_map = patterns::extract_wk_map(&program, offset, table.len());

    let mut warnings = Vec::new();
    if wk_map.is_none() && references_member(&rotation_expr) {
        warnings.push(AnalyzeWarning::MissingWk);
    }

    let ctx = RotationContext {
        table,
        offset,
        aliases: &aliases,
        wk_map: wk_map.as_ref(),
    };
    let outcome = rotation::rotate_until_convergent(ctx, &rotation_expr, target);
    if !outcome.converged {
        warnings.push(AnalyzeWarning::RotationUnconverged {
            iterations: outcome.iterations,
        });
        log::warn!(
            "rotation did not converge after {} iterations (target {target})",
            outcome.iterations
        );
    }

    rewrite::rewrite_string_calls(&mut program, &aliases, &outcome.strings);

    let alphabet = alphabet::extract_alphabet(&program).ok_or(AnalyzeError::MissingAlphabet)?;

    Ok(AnalysisResult {
        program,
        offset,
        target,
        aliases,
        strings: outcome.strings,
        alphabet,
        warnings,
    })
}

fn references_member(expr: &ast::Expr) -> bool {
    use ast::Expr::*;
    match expr {
        Member { .. } => true,
        Unary { operand, .. } => references_member(operand),
        Binary { left, right, .. } | Logical { left, right, .. } | Assign { left, right, .. } => {
            references_member(left) || references_member(right)
        }
        Call { callee, arguments } => {
            references_member(callee) || arguments.iter().any(references_member)
        }
        Conditional {
            test,
            consequent,
            alternate,
        } => references_member(test) || references_member(consequent) || references_member(alternate),
        Sequence(items) | Array(items) => items.iter().any(references_member),
        _ => false,
    }
}

/// Runs [`analyze`] over many scripts in parallel, one OS thread per
/// input, confined as spec.md §5's "(added)" concurrency note requires:
/// no shared mutable state crosses the per-analyzer boundary.
pub fn analyze_many(sources: &[String]) -> Vec<Result<AnalysisResult, AnalyzeError>> {
    std::thread::scope(|scope| {
        let handles: Vec<_> = sources
            .iter()
            .map(|src| scope.spawn(move || analyze(src)))
            .collect();
        handles.into_iter().map(|h| h.join().expect("analyzer thread panicked")).collect()
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    const MINIMAL_SCRIPT: &str = r#"
        var WK = {k0:100,k1:101,k2:102,k3:103,k4:104,k5:105,k6:106,k7:107,k8:108};
        function D(a,b){D=function(c,d){return d-100};return D(a,b)}
        D=D-100;
        var table = "3,1,2".split(",");
        x = parseInt(D(0)) + parseInt(D(1));
        y = "ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789+/".charAt(3);
    "#;

    #[test]
    fn analyzes_a_minimal_script_end_to_end() {
        let result = analyze(MINIMAL_SCRIPT).unwrap();
        assert_eq!(result.offset, 100.0);
        assert_eq!(result.alphabet.len(), 64);
        assert!(result.aliases.contains("D"));
    }

    #[test]
    fn missing_decoder_is_fatal() {
        let err = analyze("var x = 1;").unwrap_err();
        assert!(matches!(err, AnalyzeError::MissingDecoder));
    }

    #[test]
    fn parse_errors_propagate() {
        let err = analyze("var x = `bad`;").unwrap_err();
        assert!(matches!(err, AnalyzeError::Parse(_)));
    }
}
