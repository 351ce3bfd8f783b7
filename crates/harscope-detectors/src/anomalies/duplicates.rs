use harscope_core::analysis::group_by_first_seen;
use harscope_core::format::format_seconds;
use harscope_core::har::Har;
use serde::{Deserialize, Serialize};

use super::{FindingKind, Severity};

/// Groups with more occurrences than this are inspected
const DUPLICATE_THRESHOLD: usize = 3;
const HIGH_INTERVAL_SECS: f64 = 1.0;
const MEDIUM_INTERVAL_SECS: f64 = 10.0;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DuplicateFinding {
    pub kind: FindingKind,
    pub severity: Severity,
    pub url: String,
    pub method: String,
    pub count: usize,
    pub time_span: String,
    pub time_span_secs: f64,
    pub avg_interval: String,
    pub avg_interval_secs: f64,
    pub requests: Vec<DuplicateOccurrence>,
    pub description: String,
    pub suggestion: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DuplicateOccurrence {
    pub index: usize,
    pub url: String,
    pub method: String,
    pub time: String,
    pub status: i64,
    pub duration: f64,
}

pub struct DuplicateDetector;

impl DuplicateDetector {
    /// Flag identical `method:url` requests repeated more than three times.
    /// Severity follows the average spacing between occurrences.
    pub fn detect(har: &Har) -> Vec<DuplicateFinding> {
        let groups = group_by_first_seen(har.log.entries.iter().enumerate(), |(_, entry)| {
            format!("{}:{}", entry.request.method, entry.request.url)
        });

        let mut findings: Vec<DuplicateFinding> = groups
            .into_iter()
            .filter(|(_, group)| group.len() > DUPLICATE_THRESHOLD)
            .filter_map(|(key, group)| {
                let times: Vec<_> = group
                    .iter()
                    .filter_map(|(_, entry)| entry.started_at())
                    .collect();
                if times.len() < 2 {
                    tracing::debug!("Skipping duplicate group {}: too few timestamps", key);
                    return None;
                }

                let earliest = times.iter().min()?;
                let latest = times.iter().max()?;
                let time_span_secs =
                    (*latest - *earliest).num_microseconds().unwrap_or(i64::MAX) as f64 / 1e6;
                let avg_interval_secs = time_span_secs / (times.len() - 1) as f64;

                let severity = if avg_interval_secs < HIGH_INTERVAL_SECS {
                    Severity::High
                } else if avg_interval_secs < MEDIUM_INTERVAL_SECS {
                    Severity::Medium
                } else {
                    Severity::Low
                };

                let requests: Vec<DuplicateOccurrence> = group
                    .iter()
                    .map(|(idx, entry)| DuplicateOccurrence {
                        index: idx + 1,
                        url: entry.request.url.clone(),
                        method: entry.request.method.clone(),
                        time: entry.started_date_time.clone(),
                        status: entry.response.status,
                        duration: entry.time,
                    })
                    .collect();
                let count = requests.len();

                Some(DuplicateFinding {
                    kind: FindingKind::DuplicateRequest,
                    severity,
                    url: requests[0].url.clone(),
                    method: requests[0].method.clone(),
                    count,
                    time_span: format_seconds(time_span_secs),
                    time_span_secs,
                    avg_interval: format_seconds(avg_interval_secs),
                    avg_interval_secs,
                    description: format!(
                        "Identical request repeated {} times, average interval {}",
                        count,
                        format_seconds(avg_interval_secs)
                    ),
                    suggestion: "Look for double submissions, over-eager polling or broken caching"
                        .to_string(),
                    requests,
                })
            })
            .collect();

        findings.sort_by(|a, b| b.count.cmp(&a.count));
        findings
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use harscope_core::har::{Entry, Log};

    fn request(method: &str, url: &str, started: &str) -> Entry {
        let mut entry = Entry::default();
        entry.request.method = method.to_string();
        entry.request.url = url.to_string();
        entry.response.status = 200;
        entry.started_date_time = started.to_string();
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
    fn test_four_rapid_requests_high_severity() {
        let findings = DuplicateDetector::detect(&har(vec![
            request("GET", "https://a.test/x", "2024-03-01T10:00:00.000Z"),
            request("GET", "https://a.test/x", "2024-03-01T10:00:00.500Z"),
            request("GET", "https://a.test/x", "2024-03-01T10:00:01.000Z"),
            request("GET", "https://a.test/x", "2024-03-01T10:00:01.500Z"),
        ]));

        assert_eq!(findings.len(), 1);
        let finding = &findings[0];
        assert_eq!(finding.severity, Severity::High);
        assert_eq!(finding.count, 4);
        assert!((finding.avg_interval_secs - 0.5).abs() < 1e-9);
        assert_eq!(finding.avg_interval, "0.5s");
        assert_eq!(finding.time_span, "1.5s");
    }

    #[test]
    fn test_three_requests_not_flagged() {
        let findings = DuplicateDetector::detect(&har(vec![
            request("GET", "https://a.test/x", "2024-03-01T10:00:00Z"),
            request("GET", "https://a.test/x", "2024-03-01T10:00:01Z"),
            request("GET", "https://a.test/x", "2024-03-01T10:00:02Z"),
        ]));
        assert!(findings.is_empty());
    }

    #[test]
    fn test_method_is_part_of_the_key() {
        let findings = DuplicateDetector::detect(&har(vec![
            request("GET", "https://a.test/x", "2024-03-01T10:00:00Z"),
            request("POST", "https://a.test/x", "2024-03-01T10:00:01Z"),
            request("GET", "https://a.test/x", "2024-03-01T10:00:02Z"),
            request("POST", "https://a.test/x", "2024-03-01T10:00:03Z"),
        ]));
        assert!(findings.is_empty());
    }

    #[test]
    fn test_severity_bands_and_sorting() {
        let mut entries = Vec::new();
        for i in 0..4 {
            entries.push(request(
                "GET",
                "https://a.test/slow",
                &format!("2024-03-01T10:00:{:02}Z", i * 5),
            ));
        }
        for i in 0..5 {
            entries.push(request(
                "GET",
                "https://a.test/poll",
                &format!("2024-03-01T10:{:02}:00Z", i * 2),
            ));
        }

        let findings = DuplicateDetector::detect(&har(entries));

        assert_eq!(findings.len(), 2);
        assert_eq!(findings[0].url, "https://a.test/poll");
        assert_eq!(findings[0].count, 5);
        assert_eq!(findings[0].severity, Severity::Low);
        assert_eq!(findings[1].severity, Severity::Medium);
    }

    #[test]
    fn test_unparsable_times_skip_group() {
        let findings = DuplicateDetector::detect(&har(vec![
            request("GET", "https://a.test/x", "2024-03-01T10:00:00Z"),
            request("GET", "https://a.test/x", "bogus"),
            request("GET", "https://a.test/x", ""),
            request("GET", "https://a.test/x", "later"),
        ]));
        assert!(findings.is_empty());
    }
}
