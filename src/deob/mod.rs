//! The challenge-script analyzer: constant folding, pattern extraction,
//! the rotation engine, and the string-reference rewrite (spec.md §2/§4).

pub mod alphabet;
pub mod analyzer;
pub mod constant_fold;
pub mod jsparseint;
pub mod patterns;
pub mod rewrite;
pub mod rotation;

pub use analyzer::{analyze, analyze_many, AnalysisResult, AnalyzeError, AnalyzeWarning};
