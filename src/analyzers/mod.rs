//! Dimension analyzers.
//!
//! One analyzer per scored dimension. Each is stateless between calls, so
//! the set can be shared across threads and evaluations.

pub mod correctness;
pub mod edge_cases;
pub mod efficiency;
pub mod readability;
pub mod structural;

use crate::core::{Analyzer, Dimension};

// Re-export analyzer types for convenience
pub use correctness::Analyzer as CorrectnessAnalyzer;
pub use edge_cases::Analyzer as EdgeCaseAnalyzer;
pub use efficiency::Analyzer as EfficiencyAnalyzer;
pub use readability::Analyzer as ReadabilityAnalyzer;
pub use structural::{Analyzer as StructuralAnalyzer, Issue, IssueKind};

/// Analyzers for every dimension, in dimension order.
pub fn all() -> Vec<Box<dyn Analyzer>> {
    vec![
        Box::new(CorrectnessAnalyzer::new()),
        Box::new(StructuralAnalyzer::new()),
        Box::new(EfficiencyAnalyzer::new()),
        Box::new(ReadabilityAnalyzer::new()),
        Box::new(EdgeCaseAnalyzer::new()),
    ]
}

/// Analyzers that only read the source text.
pub fn static_only() -> Vec<Box<dyn Analyzer>> {
    all()
        .into_iter()
        .filter(|a| a.dimension() != Dimension::Correctness)
        .collect()
}
