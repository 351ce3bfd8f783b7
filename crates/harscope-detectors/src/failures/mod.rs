mod analyzer;
mod catalog;

pub use analyzer::{ErrorAnalysis, ErrorAnalyzer, ErrorDetail};
pub use catalog::{AllowListInfo, DiagnosticRecord, ErrorCatalog};
