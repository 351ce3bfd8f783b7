use super::{Analyzer, group_by_first_seen, total_content_size};
use crate::Result;
use crate::format::{format_ms, format_percent, format_size};
use crate::har::{Har, UrlParts};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DomainStats {
    pub total_domains: usize,
    pub domain_stats: Vec<DomainStat>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DomainStat {
    pub domain: String,
    pub request_count: usize,
    pub total_size: String,
    pub avg_time: String,
    pub error_count: usize,
    pub error_rate: String,
}

/// Groups entries by URL authority
pub struct DomainAnalyzer;

impl Analyzer for DomainAnalyzer {
    type Output = DomainStats;

    fn analyze(&self, har: &Har) -> Result<Self::Output> {
        tracing::debug!("Analyzing per-domain statistics");

        let groups = group_by_first_seen(&har.log.entries, |entry| {
            UrlParts::parse(&entry.request.url).authority
        });

        let mut domain_stats: Vec<DomainStat> = groups
            .into_iter()
            .map(|(domain, entries)| {
                let request_count = entries.len();
                let total_size = total_content_size(entries.iter().copied());
                let total_time: f64 = entries.iter().map(|e| e.time).sum();
                let error_count = entries.iter().filter(|e| e.is_failure()).count();

                DomainStat {
                    domain,
                    request_count,
                    total_size: format_size(total_size as f64),
                    avg_time: format_ms(total_time / request_count as f64),
                    error_count,
                    error_rate: format_percent(error_count, request_count),
                }
            })
            .collect();

        domain_stats.sort_by(|a, b| b.request_count.cmp(&a.request_count));

        tracing::info!("Domain analysis complete: {} domains", domain_stats.len());

        Ok(DomainStats {
            total_domains: domain_stats.len(),
            domain_stats,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::har::{Entry, Log};

    fn entry(url: &str, status: i64, time: f64) -> Entry {
        let mut entry = Entry::default();
        entry.request.url = url.to_string();
        entry.response.status = status;
        entry.response.content.size = 1024;
        entry.time = time;
        entry
    }

    #[test]
    fn test_groups_by_authority_sorted_by_count() {
        let har = Har {
            log: Log {
                entries: vec![
                    entry("https://cdn.example.com/a.js", 200, 10.0),
                    entry("https://api.example.com/users", 200, 20.0),
                    entry("https://api.example.com/orders", 500, 40.0),
                    entry("http://localhost:3000/", 200, 5.0),
                ],
                ..Default::default()
            },
        };

        let stats = DomainAnalyzer.analyze(&har).unwrap();

        assert_eq!(stats.total_domains, 3);
        let api = &stats.domain_stats[0];
        assert_eq!(api.domain, "api.example.com");
        assert_eq!(api.request_count, 2);
        assert_eq!(api.total_size, "2.0KB");
        assert_eq!(api.avg_time, "30.00ms");
        assert_eq!(api.error_count, 1);
        assert_eq!(api.error_rate, "50.0%");

        // ties keep first-seen order
        assert_eq!(stats.domain_stats[1].domain, "cdn.example.com");
        assert_eq!(stats.domain_stats[2].domain, "localhost:3000");
    }

    #[test]
    fn test_explicit_default_port_is_its_own_domain() {
        let mut huge = entry("https://a.test:443/big", 200, 1.0);
        huge.response.content.size = i64::MAX;
        let har = Har {
            log: Log {
                entries: vec![
                    huge.clone(),
                    huge,
                    entry("https://a.test/", 200, 1.0),
                ],
                ..Default::default()
            },
        };

        let stats = DomainAnalyzer.analyze(&har).unwrap();

        assert_eq!(stats.total_domains, 2);
        assert_eq!(stats.domain_stats[0].domain, "a.test:443");
        assert!(stats.domain_stats[0].total_size.ends_with("GB"));
        assert_eq!(stats.domain_stats[1].domain, "a.test");
    }

    #[test]
    fn test_empty_document() {
        let stats = DomainAnalyzer.analyze(&Har::default()).unwrap();
        assert_eq!(stats.total_domains, 0);
        assert!(stats.domain_stats.is_empty());
    }
}
