use harscope_core::har::{Entry, Har};

use super::{Finding, FindingKind, FlaggedEntry, Severity};

const INSECURE_SAMPLE: usize = 10;
const AUTH_FAILURE_THRESHOLD: usize = 5;
const USER_AGENT_SAMPLE: usize = 5;
const MIN_USER_AGENT_CHARS: usize = 20;

pub struct SecurityDetector;

impl SecurityDetector {
    pub fn detect(har: &Har) -> Vec<Finding> {
        let entries = &har.log.entries;
        let mut findings = Vec::new();

        let insecure = Self::flag(entries, |entry| entry.request.url.starts_with("http://"));
        if !insecure.is_empty() {
            let count = insecure.len();
            findings.push(Finding {
                kind: FindingKind::InsecureTransport,
                severity: Severity::Medium,
                description: format!("{} requests sent over plain HTTP", count),
                suggestion: "Serve every resource over HTTPS".to_string(),
                count,
                total: None,
                entries: insecure.into_iter().take(INSECURE_SAMPLE).collect(),
            });
        }

        let auth_failures = Self::flag(entries, |entry| {
            matches!(entry.response.status, 401 | 403)
        });
        if auth_failures.len() > AUTH_FAILURE_THRESHOLD {
            findings.push(Finding {
                kind: FindingKind::RepeatedAuthFailure,
                severity: Severity::High,
                description: format!(
                    "{} requests rejected with 401 or 403",
                    auth_failures.len()
                ),
                suggestion: "Verify credentials and watch for brute-force attempts".to_string(),
                count: auth_failures.len(),
                total: None,
                entries: auth_failures,
            });
        }

        let odd_agents = Self::flag(entries, |entry| match entry.request.user_agent() {
            Some(agent) => agent.chars().count() < MIN_USER_AGENT_CHARS,
            None => true,
        });
        if !odd_agents.is_empty() {
            let count = odd_agents.len();
            findings.push(Finding {
                kind: FindingKind::SuspiciousUserAgent,
                severity: Severity::Low,
                description: format!("{} requests with a missing or unusually short User-Agent", count),
                suggestion: "Confirm these requests come from a legitimate client".to_string(),
                count,
                total: None,
                entries: odd_agents.into_iter().take(USER_AGENT_SAMPLE).collect(),
            });
        }

        findings
    }

    fn flag<F>(entries: &[Entry], predicate: F) -> Vec<FlaggedEntry>
    where
        F: Fn(&Entry) -> bool,
    {
        entries
            .iter()
            .enumerate()
            .filter(|(_, entry)| predicate(entry))
            .map(|(idx, entry)| FlaggedEntry::new(idx + 1, entry, None))
            .collect()
    }
}
