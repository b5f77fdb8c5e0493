pub mod ast;
pub mod beacon;
pub mod codec;
pub mod config;
pub mod deob;
pub mod error;
pub mod fetch;
pub mod solver;

pub use deob::{analyze, analyze_many, AnalysisResult, AnalyzeError, AnalyzeWarning};
pub use error::{SolveError, SolveResult};
pub use solver::{solve, solve_from_data, SolveData};
