//! Critique - Multi-dimensional code submission evaluator.
//!
//! Critique scores a code submission on five independent dimensions
//! (correctness, structural quality, efficiency, readability and edge-case
//! handling), combines them into a weighted overall score and attaches
//! categorized feedback.
//!
//! # Supported Languages
//!
//! Python is parsed and executed. Java, C, C++ and JavaScript are accepted as
//! language tags: the language-independent checks apply, tests are not run.
//!
//! # Example
//!
//! ```no_run
//! use critique::config::Config;
//! use critique::core::{Language, TestCase};
//! use critique::engine::Evaluator;
//!
//! let evaluator = Evaluator::new(Config::default()).unwrap();
//! let tests = vec![TestCase::new("add(2, 3)", "5")];
//! let result = evaluator
//!     .evaluate("def add(a, b):\n    return a + b\n", "Add two numbers", &tests, Language::Python)
//!     .unwrap();
//! println!("Overall {} ({})", result.overall_score(), result.grade());
//! ```

pub mod analyzers;
pub mod cli;
pub mod config;
pub mod core;
pub mod engine;
pub mod feedback;
pub mod output;
pub mod parser;
pub mod sandbox;
pub mod score;

pub use core::{AnalysisContext, Analyzer, Outcome};
pub use engine::{EvaluationResult, Evaluator};
