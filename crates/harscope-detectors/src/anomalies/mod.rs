pub mod duplicates;
pub mod patterns;
pub mod redirects;
pub mod security;
pub mod timing;

pub use duplicates::{DuplicateDetector, DuplicateFinding, DuplicateOccurrence};
pub use patterns::PatternDetector;
pub use redirects::{RedirectDetector, RedirectFinding, RedirectHop};
pub use security::SecurityDetector;
pub use timing::TimingDetector;

use crate::Result;
use harscope_core::har::{Entry, Har};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    High,
    Medium,
    Low,
}

impl Severity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::High => "high",
            Severity::Medium => "medium",
            Severity::Low => "low",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FindingKind {
    RedirectLoop,
    FrequentRedirect,
    DuplicateRequest,
    HighErrorRate,
    OversizedResponse,
    TimeoutRequest,
    SlowDns,
    SlowConnect,
    SlowTlsHandshake,
    InsecureTransport,
    RepeatedAuthFailure,
    SuspiciousUserAgent,
}

impl FindingKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            FindingKind::RedirectLoop => "Redirect loop",
            FindingKind::FrequentRedirect => "Frequent redirects",
            FindingKind::DuplicateRequest => "Duplicate requests",
            FindingKind::HighErrorRate => "High error rate",
            FindingKind::OversizedResponse => "Oversized responses",
            FindingKind::TimeoutRequest => "Timeout-class requests",
            FindingKind::SlowDns => "Slow DNS resolution",
            FindingKind::SlowConnect => "Slow connection setup",
            FindingKind::SlowTlsHandshake => "Slow TLS handshake",
            FindingKind::InsecureTransport => "Insecure HTTP connections",
            FindingKind::RepeatedAuthFailure => "Repeated authentication failures",
            FindingKind::SuspiciousUserAgent => "Suspicious User-Agent",
        }
    }
}

/// Finding raised by the pattern, timing and security passes
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Finding {
    pub kind: FindingKind,
    pub severity: Severity,
    pub description: String,
    pub suggestion: String,
    /// Number of offending entries, even when `entries` is capped
    pub count: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total: Option<usize>,
    pub entries: Vec<FlaggedEntry>,
}

/// One offending entry cited as evidence
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FlaggedEntry {
    pub index: usize,
    pub url: String,
    pub method: String,
    pub status: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
}

impl FlaggedEntry {
    pub(crate) fn new(index: usize, entry: &Entry, detail: Option<String>) -> Self {
        Self {
            index,
            url: entry.request.url.clone(),
            method: entry.request.method.clone(),
            status: entry.response.status,
            detail,
        }
    }
}

/// Results of all five anomaly passes
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnomalyReport {
    pub redirect_loops: Vec<RedirectFinding>,
    pub duplicate_requests: Vec<DuplicateFinding>,
    pub suspicious_patterns: Vec<Finding>,
    pub performance_issues: Vec<Finding>,
    pub security_concerns: Vec<Finding>,
    pub total_anomalies: usize,
    pub has_anomalies: bool,
}

impl AnomalyReport {
    /// Severities of every finding, in report order
    pub fn severities(&self) -> impl Iterator<Item = Severity> + '_ {
        self.redirect_loops
            .iter()
            .map(|f| f.severity)
            .chain(self.duplicate_requests.iter().map(|f| f.severity))
            .chain(self.suspicious_patterns.iter().map(|f| f.severity))
            .chain(self.performance_issues.iter().map(|f| f.severity))
            .chain(self.security_concerns.iter().map(|f| f.severity))
    }
}

pub struct AnomalyDetector;

impl AnomalyDetector {
    /// Run the five independent detectors over the same capture
    pub fn analyze(har: &Har) -> Result<AnomalyReport> {
        tracing::debug!("Starting anomaly detection");

        let redirect_loops = RedirectDetector::detect(har);
        tracing::debug!("Detected {} redirect findings", redirect_loops.len());

        let duplicate_requests = DuplicateDetector::detect(har);
        tracing::debug!("Detected {} duplicate groups", duplicate_requests.len());

        let suspicious_patterns = PatternDetector::detect(har);
        tracing::debug!("Detected {} suspicious patterns", suspicious_patterns.len());

        let performance_issues = TimingDetector::detect(har);
        tracing::debug!("Detected {} performance issues", performance_issues.len());

        let security_concerns = SecurityDetector::detect(har);
        tracing::debug!("Detected {} security concerns", security_concerns.len());

        let total_anomalies = redirect_loops.len()
            + duplicate_requests.len()
            + suspicious_patterns.len()
            + performance_issues.len()
            + security_concerns.len();

        tracing::info!("Anomaly detection complete: {} findings", total_anomalies);

        Ok(AnomalyReport {
            redirect_loops,
            duplicate_requests,
            suspicious_patterns,
            performance_issues,
            security_concerns,
            total_anomalies,
            has_anomalies: total_anomalies > 0,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_document_has_no_anomalies() {
        let report = AnomalyDetector::analyze(&Har::default()).unwrap();

        assert_eq!(report.total_anomalies, 0);
        assert!(!report.has_anomalies);
        assert_eq!(report.severities().count(), 0);
    }

    #[test]
    fn test_severity_serializes_lowercase() {
        assert_eq!(serde_json::to_string(&Severity::High).unwrap(), "\"high\"");
        assert_eq!(
            serde_json::to_string(&FindingKind::SlowTlsHandshake).unwrap(),
            "\"slow_tls_handshake\""
        );
    }
}
