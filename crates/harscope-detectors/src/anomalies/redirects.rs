use harscope_core::analysis::group_by_first_seen;
use harscope_core::har::Har;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

use super::{FindingKind, Severity};

/// Hop counts above this are inspected for loops; up to it they are
/// reported as frequent redirects.
const MAX_REDIRECT_HOPS: usize = 3;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RedirectFinding {
    pub kind: FindingKind,
    pub severity: Severity,
    pub url: String,
    pub chain_length: usize,
    pub chain: Vec<RedirectHop>,
    pub description: String,
    pub suggestion: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RedirectHop {
    pub index: usize,
    pub from_url: String,
    pub to_url: String,
    pub status: i64,
    pub time: String,
}

pub struct RedirectDetector;

impl RedirectDetector {
    /// Group 3xx responses carrying a `Location` header by originating URL
    /// and flag URLs that redirect repeatedly or in a loop.
    pub fn detect(har: &Har) -> Vec<RedirectFinding> {
        let hops = har
            .log
            .entries
            .iter()
            .enumerate()
            .filter(|(_, entry)| entry.response.is_redirect())
            .filter_map(|(idx, entry)| {
                let location = entry.response.location()?;
                Some(RedirectHop {
                    index: idx + 1,
                    from_url: entry.request.url.clone(),
                    to_url: location.to_string(),
                    status: entry.response.status,
                    time: entry.started_date_time.clone(),
                })
            });

        group_by_first_seen(hops, |hop| hop.from_url.clone())
            .into_iter()
            .filter_map(|(url, chain)| Self::classify(url, chain))
            .collect()
    }

    fn classify(url: String, chain: Vec<RedirectHop>) -> Option<RedirectFinding> {
        let chain_length = chain.len();

        if chain_length > MAX_REDIRECT_HOPS {
            if !Self::revisits_origin(&chain) {
                return None;
            }
            return Some(RedirectFinding {
                kind: FindingKind::RedirectLoop,
                severity: Severity::High,
                url,
                chain_length,
                chain,
                description: format!(
                    "Possible redirect loop detected after {} redirects",
                    chain_length
                ),
                suggestion: "Review the server redirect configuration to break the loop"
                    .to_string(),
            });
        }

        if chain_length > 1 {
            return Some(RedirectFinding {
                kind: FindingKind::FrequentRedirect,
                severity: Severity::Medium,
                url,
                chain_length,
                chain,
                description: format!("Frequent redirects detected: {} redirects", chain_length),
                suggestion: "Shorten the redirect chain and drop unnecessary redirects"
                    .to_string(),
            });
        }

        None
    }

    /// True when a hop points back at a URL an earlier hop started from
    fn revisits_origin(chain: &[RedirectHop]) -> bool {
        let mut visited: HashSet<&str> = HashSet::new();
        for hop in chain {
            if visited.contains(hop.to_url.as_str()) {
                return true;
            }
            visited.insert(hop.from_url.as_str());
        }
        false
    }
}
