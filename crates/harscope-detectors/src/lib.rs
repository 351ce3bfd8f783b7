pub mod anomalies;
pub mod error;
pub mod failures;
pub mod report;

pub use anomalies::{AnomalyDetector, AnomalyReport, Severity};
pub use error::{Error, Result};
pub use failures::{ErrorAnalysis, ErrorAnalyzer, ErrorCatalog};
pub use report::{HarReport, ReportAssembler};
