mod domains;
mod file_types;
mod performance;
mod preview;
mod requests;
mod summary;
mod timeline;

pub use domains::{DomainAnalyzer, DomainStat, DomainStats};
pub use file_types::{FileTypeAnalyzer, FileTypeStat};
pub use performance::{LargeRequest, PerformanceAnalyzer, PerformanceStats, SlowRequest};
pub use preview::{BodyPreview, JSON_PREVIEW_LIMIT, PostDataPreview, RAW_PREVIEW_LIMIT};
pub use requests::{
    ErrorSummary, RequestAnalyzer, RequestDetail, TimingBreakdown, UNKNOWN_SERVER_IP, status_category,
};
pub use summary::{SummaryAnalyzer, SummaryStats};
pub use timeline::{TimelineAnalyzer, TimelineEvent};

use crate::har::{Entry, Har};
use std::collections::HashMap;
use std::hash::Hash;

pub trait Analyzer {
    type Output;

    fn analyze(&self, har: &Har) -> crate::Result<Self::Output>;
}

/// Group items by key. Groups come back in the order their key was first
/// seen and items keep their original order inside each group.
pub fn group_by_first_seen<K, T, I, F>(items: I, key: F) -> Vec<(K, Vec<T>)>
where
    K: Eq + Hash + Clone,
    I: IntoIterator<Item = T>,
    F: Fn(&T) -> K,
{
    let mut positions: HashMap<K, usize> = HashMap::new();
    let mut groups: Vec<(K, Vec<T>)> = Vec::new();

    for item in items {
        let k = key(&item);
        match positions.get(&k) {
            Some(&pos) => groups[pos].1.push(item),
            None => {
                positions.insert(k.clone(), groups.len());
                groups.push((k, vec![item]));
            }
        }
    }

    groups
}

/// Sum of response body sizes, clamped at the `i64` bounds
pub fn total_content_size<'a, I>(entries: I) -> i64
where
    I: IntoIterator<Item = &'a Entry>,
{
    entries
        .into_iter()
        .fold(0i64, |total, entry| total.saturating_add(entry.content_size()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_group_by_first_seen_keeps_order() {
        let groups = group_by_first_seen(["b1", "a1", "b2", "c1", "a2"], |s| &s[..1]);

        let keys: Vec<_> = groups.iter().map(|(k, _)| *k).collect();
        assert_eq!(keys, vec!["b", "a", "c"]);
        assert_eq!(groups[0].1, vec!["b1", "b2"]);
        assert_eq!(groups[1].1, vec!["a1", "a2"]);
    }

    #[test]
    fn test_total_content_size_saturates() {
        let mut big = Entry::default();
        big.response.content.size = i64::MAX;
        let mut small = Entry::default();
        small.response.content.size = 10;

        assert_eq!(total_content_size([&small, &small]), 20);
        assert_eq!(total_content_size([&big, &small, &big]), i64::MAX);
        assert_eq!(total_content_size(std::iter::empty()), 0);
    }
}
