use harscope_core::format::{format_ms, format_percent, format_size};
use harscope_core::har::Har;

use super::{Finding, FindingKind, FlaggedEntry, Severity};

const MAX_FAILURE_RATE: f64 = 0.3;
const OVERSIZED_RESPONSE_BYTES: i64 = 10 * 1024 * 1024;
const TIMEOUT_CLASS_MS: f64 = 30_000.0;

pub struct PatternDetector;

impl PatternDetector {
    /// Document-wide volume, size and duration patterns
    pub fn detect(har: &Har) -> Vec<Finding> {
        let entries = &har.log.entries;
        let mut findings = Vec::new();

        if entries.is_empty() {
            return findings;
        }

        let failed: Vec<FlaggedEntry> = entries
            .iter()
            .enumerate()
            .filter(|(_, entry)| entry.is_failure())
            .map(|(idx, entry)| FlaggedEntry::new(idx + 1, entry, None))
            .collect();
        let failure_rate = failed.len() as f64 / entries.len() as f64;
        if failure_rate > MAX_FAILURE_RATE {
            findings.push(Finding {
                kind: FindingKind::HighErrorRate,
                severity: Severity::High,
                description: format!(
                    "{} of {} requests failed ({})",
                    failed.len(),
                    entries.len(),
                    format_percent(failed.len(), entries.len())
                ),
                suggestion: "Check service health and network connectivity".to_string(),
                count: failed.len(),
                total: Some(entries.len()),
                entries: failed,
            });
        }

        let oversized: Vec<FlaggedEntry> = entries
            .iter()
            .enumerate()
            .filter(|(_, entry)| entry.content_size() > OVERSIZED_RESPONSE_BYTES)
            .map(|(idx, entry)| {
                let size = format_size(entry.content_size() as f64);
                FlaggedEntry::new(idx + 1, entry, Some(size))
            })
            .collect();
        if !oversized.is_empty() {
            findings.push(Finding {
                kind: FindingKind::OversizedResponse,
                severity: Severity::Medium,
                description: format!("{} responses larger than 10MB", oversized.len()),
                suggestion: "Compress, paginate or lazy-load large payloads".to_string(),
                count: oversized.len(),
                total: None,
                entries: oversized,
            });
        }

        let long_running: Vec<FlaggedEntry> = entries
            .iter()
            .enumerate()
            .filter(|(_, entry)| entry.time > TIMEOUT_CLASS_MS)
            .map(|(idx, entry)| FlaggedEntry::new(idx + 1, entry, Some(format_ms(entry.time))))
            .collect();
        if !long_running.is_empty() {
            findings.push(Finding {
                kind: FindingKind::TimeoutRequest,
                severity: Severity::Medium,
                description: format!(
                    "{} requests took longer than 30 seconds",
                    long_running.len()
                ),
                suggestion: "Review server processing time and client timeout settings"
                    .to_string(),
                count: long_running.len(),
                total: None,
                entries: long_running,
            });
        }

        findings
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use harscope_core::har::{Entry, Log};

    fn entry(status: i64, size: i64, time: f64) -> Entry {
        let mut entry = Entry::default();
        entry.request.url = "https://a.test/".to_string();
        entry.response.status = status;
        entry.response.content.size = size;
        entry.time = time;
        entry
    }

    fn har(entries: Vec<Entry>) -> Har {
        Har {
            log: Log {
                entries,
                ..Default::default()
            },
        }
    }

    #[test]
    fn test_empty_document() {
        assert!(PatternDetector::detect(&Har::default()).is_empty());
    }

    #[test]
    fn test_high_failure_rate() {
        let findings = PatternDetector::detect(&har(vec![
            entry(200, 10, 5.0),
            entry(500, 10, 5.0),
            entry(0, 0, 0.0),
        ]));

        assert_eq!(findings.len(), 1);
        let finding = &findings[0];
        assert_eq!(finding.kind, FindingKind::HighErrorRate);
        assert_eq!(finding.severity, Severity::High);
        assert_eq!(finding.count, 2);
        assert_eq!(finding.total, Some(3));
    }

    #[test]
    fn test_failure_rate_at_threshold_not_flagged() {
        let mut entries: Vec<Entry> = (0..7).map(|_| entry(200, 10, 5.0)).collect();
        entries.extend((0..3).map(|_| entry(404, 10, 5.0)));

        assert!(PatternDetector::detect(&har(entries)).is_empty());
    }

    #[test]
    fn test_oversized_and_long_running() {
        let findings = PatternDetector::detect(&har(vec![
            entry(200, 11 * 1024 * 1024, 10.0),
            entry(200, 10 * 1024 * 1024, 30_000.0),
            entry(200, 100, 30_001.0),
            entry(200, 100, 10.0),
        ]));

        assert_eq!(findings.len(), 2);

        assert_eq!(findings[0].kind, FindingKind::OversizedResponse);
        assert_eq!(findings[0].severity, Severity::Medium);
        assert_eq!(findings[0].entries.len(), 1);
        assert_eq!(findings[0].entries[0].index, 1);
        assert_eq!(findings[0].entries[0].detail.as_deref(), Some("11.0MB"));

        assert_eq!(findings[1].kind, FindingKind::TimeoutRequest);
        assert_eq!(findings[1].entries.len(), 1);
        assert_eq!(findings[1].entries[0].index, 3);
    }
}
