use harscope_core::format::format_ms;
use harscope_core::har::{Entry, Har, Timings};

use super::{Finding, FindingKind, FlaggedEntry, Severity};

struct Threshold {
    kind: FindingKind,
    severity: Severity,
    limit_ms: f64,
    phase: fn(&Timings) -> f64,
    label: &'static str,
    suggestion: &'static str,
}

const THRESHOLDS: [Threshold; 3] = [
    Threshold {
        kind: FindingKind::SlowDns,
        severity: Severity::Medium,
        limit_ms: 1000.0,
        phase: |t: &Timings| t.dns,
        label: "DNS resolution",
        suggestion: "Check DNS server response times or enable DNS caching",
    },
    Threshold {
        kind: FindingKind::SlowConnect,
        severity: Severity::High,
        limit_ms: 3000.0,
        phase: |t: &Timings| t.connect,
        label: "connection setup",
        suggestion: "Check network latency and server load",
    },
    Threshold {
        kind: FindingKind::SlowTlsHandshake,
        severity: Severity::Medium,
        limit_ms: 2000.0,
        phase: |t: &Timings| t.ssl,
        label: "TLS handshake",
        suggestion: "Review the TLS configuration and certificate chain",
    },
];

pub struct TimingDetector;

impl TimingDetector {
    /// One finding per timing phase that exceeded its limit on any entry.
    /// Unmeasured phases never trigger.
    pub fn detect(har: &Har) -> Vec<Finding> {
        THRESHOLDS
            .iter()
            .filter_map(|threshold| Self::check(&har.log.entries, threshold))
            .collect()
    }

    fn check(entries: &[Entry], threshold: &Threshold) -> Option<Finding> {
        let offenders: Vec<FlaggedEntry> = entries
            .iter()
            .enumerate()
            .filter_map(|(idx, entry)| {
                let value = Timings::measured((threshold.phase)(&entry.timings))?;
                (value > threshold.limit_ms)
                    .then(|| FlaggedEntry::new(idx + 1, entry, Some(format_ms(value))))
            })
            .collect();

        if offenders.is_empty() {
            return None;
        }

        Some(Finding {
            kind: threshold.kind,
            severity: threshold.severity,
            description: format!(
                "{} requests with {} over {}",
                offenders.len(),
                threshold.label,
                format_ms(threshold.limit_ms)
            ),
            suggestion: threshold.suggestion.to_string(),
            count: offenders.len(),
            total: None,
            entries: offenders,
        })
    }
}
