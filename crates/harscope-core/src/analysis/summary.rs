use super::{Analyzer, total_content_size};
use crate::Result;
use crate::format::{format_ms, format_percent, format_size};
use crate::har::Har;
use serde::{Deserialize, Serialize};

/// Whole-document counts and rates
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SummaryStats {
    pub total_requests: usize,
    pub successful_requests: usize,
    pub failed_requests: usize,
    pub success_rate: String,
    pub avg_response_time: String,
    pub total_size: String,
    pub total_size_bytes: i64,
    pub total_time: String,
    /// Local wall-clock time the report was produced
    pub analysis_time: String,
}

pub struct SummaryAnalyzer;

impl Analyzer for SummaryAnalyzer {
    type Output = SummaryStats;

    fn analyze(&self, har: &Har) -> Result<Self::Output> {
        tracing::debug!("Analyzing HAR summary statistics");

        let entries = &har.log.entries;
        let total_requests = entries.len();
        let failed_requests = entries.iter().filter(|e| e.is_failure()).count();
        let successful_requests = total_requests - failed_requests;

        let total_size_bytes = total_content_size(entries);
        let total_time: f64 = entries.iter().map(|e| e.time).sum();
        let avg_response_time = if total_requests > 0 {
            total_time / total_requests as f64
        } else {
            0.0
        };

        tracing::info!(
            "Summary analysis complete: {} requests, {} failed",
            total_requests,
            failed_requests
        );

        Ok(SummaryStats {
            total_requests,
            successful_requests,
            failed_requests,
            success_rate: format_percent(successful_requests, total_requests),
            avg_response_time: format_ms(avg_response_time),
            total_size: format_size(total_size_bytes as f64),
            total_size_bytes,
            total_time: format_ms(total_time),
            analysis_time: chrono::Local::now()
                .format("%Y-%m-%d %H:%M:%S")
                .to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::har::{Entry, Log};

    fn entry(status: i64, time: f64, size: i64) -> Entry {
        let mut entry = Entry::default();
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
    fn test_empty_document_is_zero_safe() {
        let stats = SummaryAnalyzer.analyze(&Har::default()).unwrap();

        assert_eq!(stats.total_requests, 0);
        assert_eq!(stats.successful_requests, 0);
        assert_eq!(stats.failed_requests, 0);
        assert_eq!(stats.success_rate, "0%");
        assert_eq!(stats.avg_response_time, "0.00ms");
        assert_eq!(stats.total_size, "0B");
        assert_eq!(stats.total_time, "0.00ms");
    }

    #[test]
    fn test_counts_and_rates() {
        let har = har(vec![
            entry(200, 100.0, 1024),
            entry(301, 50.0, 0),
            entry(404, 25.0, 512),
            entry(0, 0.0, 0),
        ]);

        let stats = SummaryAnalyzer.analyze(&har).unwrap();

        assert_eq!(stats.total_requests, 4);
        assert_eq!(stats.successful_requests, 2);
        assert_eq!(stats.failed_requests, 2);
        assert_eq!(
            stats.successful_requests + stats.failed_requests,
            stats.total_requests
        );
        assert_eq!(stats.success_rate, "50.0%");
        assert_eq!(stats.avg_response_time, "43.75ms");
        assert_eq!(stats.total_size, "1.5KB");
        assert_eq!(stats.total_size_bytes, 1536);
        assert_eq!(stats.total_time, "175.00ms");
        assert_eq!(stats.analysis_time.len(), "2024-01-01 00:00:00".len());
    }

    #[test]
    fn test_huge_sizes_do_not_overflow() {
        let half = i64::MAX / 2 + 1;
        let har = har(vec![entry(200, 1.0, half), entry(200, 1.0, half)]);

        let stats = SummaryAnalyzer.analyze(&har).unwrap();

        assert_eq!(stats.total_size_bytes, i64::MAX);
        assert!(stats.total_size.ends_with("GB"));
    }
}
