//! Core types shared across the pipeline.

mod error;
mod language;
mod metrics;

pub use error::{Error, Result};
pub use language::Language;
pub use metrics::{
    AnalyzedFile, AnalyzerFailure, AnalyzerReport, CodeComplexityMetrics, DependencyFileRecord,
    DependencyMetrics, DocFileRecord, DocTypeBreakdown, DocumentationMetrics,
    HighComplexityFunction, LanguageBreakdown, ManagerBreakdown, RepositoryResult,
};
