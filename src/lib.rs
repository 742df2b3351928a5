//! Repolens - Repository metrics aggregation across codebases.
//!
//! Repolens clones a set of repositories, runs a fixed family of analyzers
//! over each working tree (cyclomatic complexity, dependency counts,
//! documentation tokens), and folds the per-repository results into a
//! cross-repository summary with JSON and HTML reports.
//!
//! # Supported Languages
//!
//! Go, Rust, Python, TypeScript, JavaScript, TSX/JSX, Java, C, C++, Ruby
//!
//! # Example
//!
//! ```no_run
//! use repolens::config::Config;
//! use repolens::pipeline::Pipeline;
//!
//! let mut config = Config::default();
//! config.repositories.repos = vec!["rust-lang/cargo".to_string()];
//! let pipeline = Pipeline::from_config(config).unwrap();
//! let output = pipeline.run().unwrap();
//! println!("Analyzed {} repositories", output.summary.total_repositories);
//! ```

pub mod analyzers;
pub mod cli;
pub mod complexity;
pub mod config;
pub mod core;
pub mod pipeline;
pub mod repo;
pub mod report;

pub use crate::core::{AnalyzerReport, RepositoryResult};
pub use pipeline::{Pipeline, PipelineOutput};
