use super::{Analyzer, total_content_size};
use crate::Result;
use crate::format::{format_ms, format_size};
use crate::har::{Entry, Har};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PerformanceStats {
    pub avg_response_time_ms: f64,
    pub min_response_time_ms: f64,
    pub max_response_time_ms: f64,
    pub total_transfer_size: String,
    pub total_transfer_bytes: i64,
    pub avg_transfer_size: String,
    pub slowest_requests: Vec<SlowRequest>,
    pub largest_requests: Vec<LargeRequest>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SlowRequest {
    pub index: usize,
    pub url: String,
    pub method: String,
    pub status: i64,
    pub time: String,
    pub time_ms: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LargeRequest {
    pub index: usize,
    pub url: String,
    pub method: String,
    pub status: i64,
    pub size: String,
    pub size_bytes: i64,
}

pub struct PerformanceAnalyzer {
    top_n: usize,
}

impl PerformanceAnalyzer {
    pub fn new(top_n: usize) -> Self {
        Self { top_n }
    }

    /// Entries ranked by `key` descending. The sort is stable, so ties keep
    /// their capture order.
    fn ranked<'a, K>(&self, entries: &'a [Entry], key: K) -> Vec<(usize, &'a Entry)>
    where
        K: Fn(&Entry) -> f64,
    {
        let mut ranked: Vec<(usize, &Entry)> = entries
            .iter()
            .enumerate()
            .map(|(idx, entry)| (idx + 1, entry))
            .collect();
        ranked.sort_by(|a, b| key(b.1).total_cmp(&key(a.1)));
        ranked.truncate(self.top_n);
        ranked
    }
}

impl Default for PerformanceAnalyzer {
    fn default() -> Self {
        Self::new(5)
    }
}

impl Analyzer for PerformanceAnalyzer {
    type Output = PerformanceStats;

    fn analyze(&self, har: &Har) -> Result<Self::Output> {
        tracing::debug!("Analyzing HAR performance statistics");

        let entries = &har.log.entries;

        if entries.is_empty() {
            return Ok(PerformanceStats {
                avg_response_time_ms: 0.0,
                min_response_time_ms: 0.0,
                max_response_time_ms: 0.0,
                total_transfer_size: format_size(0.0),
                total_transfer_bytes: 0,
                avg_transfer_size: format_size(0.0),
                slowest_requests: vec![],
                largest_requests: vec![],
            });
        }

        let count = entries.len() as f64;
        let total_time: f64 = entries.iter().map(|e| e.time).sum();
        let min_time = entries.iter().map(|e| e.time).fold(f64::INFINITY, f64::min);
        let max_time = entries
            .iter()
            .map(|e| e.time)
            .fold(f64::NEG_INFINITY, f64::max);
        let total_bytes = total_content_size(entries);

        let slowest_requests = self
            .ranked(entries, |e| e.time)
            .into_iter()
            .map(|(index, e)| SlowRequest {
                index,
                url: e.request.url.clone(),
                method: e.request.method.clone(),
                status: e.response.status,
                time: format_ms(e.time),
                time_ms: e.time,
            })
            .collect();

        let largest_requests = self
            .ranked(entries, |e| e.content_size() as f64)
            .into_iter()
            .map(|(index, e)| LargeRequest {
                index,
                url: e.request.url.clone(),
                method: e.request.method.clone(),
                status: e.response.status,
                size: format_size(e.content_size() as f64),
                size_bytes: e.content_size(),
            })
            .collect();

        let average_time = total_time / count;

        tracing::info!(
            "Performance analysis complete: avg={:.2}ms, min={:.2}ms, max={:.2}ms",
            average_time,
            min_time,
            max_time
        );

        Ok(PerformanceStats {
            avg_response_time_ms: average_time,
            min_response_time_ms: min_time,
            max_response_time_ms: max_time,
            total_transfer_size: format_size(total_bytes as f64),
            total_transfer_bytes: total_bytes,
            avg_transfer_size: format_size(total_bytes as f64 / count),
            slowest_requests,
            largest_requests,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::har::Log;

    fn har(samples: &[(&str, f64, i64)]) -> Har {
        let entries = samples
            .iter()
            .map(|(url, time, size)| {
                let mut entry = Entry::default();
                entry.request.url = url.to_string();
                entry.response.status = 200;
                entry.response.content.size = *size;
                entry.time = *time;
                entry
            })
            .collect();
        Har {
            log: Log {
                entries,
                ..Default::default()
            },
        }
    }

    #[test]
    fn test_empty_document() {
        let stats = PerformanceAnalyzer::default().analyze(&Har::default()).unwrap();

        assert_eq!(stats.avg_response_time_ms, 0.0);
        assert_eq!(stats.total_transfer_size, "0B");
        assert!(stats.slowest_requests.is_empty());
        assert!(stats.largest_requests.is_empty());
    }

    #[test]
    fn test_extremes_and_averages() {
        let har = har(&[("/a", 10.0, 1024), ("/b", 30.0, 2048), ("/c", 20.0, 0)]);
        let stats = PerformanceAnalyzer::default().analyze(&har).unwrap();

        assert_eq!(stats.min_response_time_ms, 10.0);
        assert_eq!(stats.max_response_time_ms, 30.0);
        assert_eq!(stats.avg_response_time_ms, 20.0);
        assert_eq!(stats.total_transfer_size, "3.0KB");
        assert_eq!(stats.avg_transfer_size, "1.0KB");
    }

    #[test]
    fn test_top_five_with_stable_ties() {
        let har = har(&[
            ("/1", 5.0, 10),
            ("/2", 50.0, 10),
            ("/3", 5.0, 30),
            ("/4", 70.0, 20),
            ("/5", 5.0, 10),
            ("/6", 1.0, 10),
            ("/7", 60.0, 10),
        ]);
        let stats = PerformanceAnalyzer::default().analyze(&har).unwrap();

        let slow: Vec<usize> = stats.slowest_requests.iter().map(|r| r.index).collect();
        assert_eq!(slow, vec![4, 7, 2, 1, 3]);
        assert_eq!(stats.slowest_requests[0].time, "70.00ms");

        let large: Vec<usize> = stats.largest_requests.iter().map(|r| r.index).collect();
        assert_eq!(large, vec![3, 4, 1, 2, 5]);
    }
}
