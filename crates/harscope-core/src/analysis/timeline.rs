use super::Analyzer;
use crate::Result;
use crate::har::Har;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TimelineEvent {
    pub index: usize,
    /// Start time normalised to RFC 3339
    pub time: String,
    pub url: String,
    pub method: String,
    pub status: i64,
    pub duration: f64,
}

/// Chronological view of the capture. Entries whose start time does not
/// parse are left out.
pub struct TimelineAnalyzer;

impl Analyzer for TimelineAnalyzer {
    type Output = Vec<TimelineEvent>;

    fn analyze(&self, har: &Har) -> Result<Self::Output> {
        tracing::debug!("Building request timeline");

        let mut timeline: Vec<_> = har
            .log
            .entries
            .iter()
            .enumerate()
            .filter_map(|(idx, entry)| {
                let started = entry.started_at()?;
                Some((
                    started,
                    TimelineEvent {
                        index: idx + 1,
                        time: started.to_rfc3339(),
                        url: entry.request.url.clone(),
                        method: entry.request.method.clone(),
                        status: entry.response.status,
                        duration: entry.time,
                    },
                ))
            })
            .collect();

        let skipped = har.log.entries.len() - timeline.len();
        if skipped > 0 {
            tracing::debug!("Skipped {} entries without a parsable start time", skipped);
        }

        timeline.sort_by_key(|(started, _)| *started);

        Ok(timeline.into_iter().map(|(_, event)| event).collect())
    }
}
