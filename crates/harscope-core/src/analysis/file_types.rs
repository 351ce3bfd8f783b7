use super::{Analyzer, group_by_first_seen, total_content_size};
use crate::Result;
use crate::format::{format_percent, format_size};
use crate::har::Har;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FileTypeStat {
    #[serde(rename = "type")]
    pub content_type: String,
    pub count: usize,
    pub total_size: String,
    pub avg_size: String,
    pub percentage: String,
}

/// Groups entries by response content type
pub struct FileTypeAnalyzer;

impl Analyzer for FileTypeAnalyzer {
    type Output = Vec<FileTypeStat>;

    fn analyze(&self, har: &Har) -> Result<Self::Output> {
        tracing::debug!("Analyzing content type distribution");

        let entries = &har.log.entries;
        let total_requests = entries.len();

        let groups = group_by_first_seen(entries, |entry| entry.response.content_type());

        let mut stats: Vec<FileTypeStat> = groups
            .into_iter()
            .map(|(content_type, group)| {
                let count = group.len();
                let total_size = total_content_size(group.iter().copied());

                FileTypeStat {
                    content_type,
                    count,
                    total_size: format_size(total_size as f64),
                    avg_size: format_size(total_size as f64 / count as f64),
                    percentage: format_percent(count, total_requests),
                }
            })
            .collect();

        stats.sort_by(|a, b| b.count.cmp(&a.count));

        tracing::info!("File type analysis complete: {} types", stats.len());

        Ok(stats)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::har::{Entry, Header, Log};

    fn entry(content_type: Option<&str>, size: i64) -> Entry {
        let mut entry = Entry::default();
        entry.response.content.size = size;
        if let Some(value) = content_type {
            entry.response.headers.push(Header {
                name: "Content-Type".to_string(),
                value: value.to_string(),
            });
        }
        entry
    }

    #[test]
    fn test_distribution_by_content_type() {
        let har = Har {
            log: Log {
                entries: vec![
                    entry(Some("text/css"), 100),
                    entry(Some("application/javascript; charset=utf-8"), 1024),
                    entry(Some("application/javascript"), 3072),
                    entry(None, 0),
                ],
                ..Default::default()
            },
        };

        let stats = FileTypeAnalyzer.analyze(&har).unwrap();

        assert_eq!(stats.len(), 3);
        assert_eq!(stats[0].content_type, "application/javascript");
        assert_eq!(stats[0].count, 2);
        assert_eq!(stats[0].total_size, "4.0KB");
        assert_eq!(stats[0].avg_size, "2.0KB");
        assert_eq!(stats[0].percentage, "50.0%");
        assert_eq!(stats[1].content_type, "text/css");
        assert_eq!(stats[2].content_type, "unknown");
        assert_eq!(stats[2].avg_size, "0B");
    }

    #[test]
    fn test_empty_document() {
        assert!(FileTypeAnalyzer.analyze(&Har::default()).unwrap().is_empty());
    }
}
