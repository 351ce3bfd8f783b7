use crate::Result;
use harscope_core::analysis::{BodyPreview, UNKNOWN_SERVER_IP};
use harscope_core::format::format_percent;
use harscope_core::har::{Entry, Har, Timings, UrlParts, headers_to_map};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use super::catalog::{DiagnosticRecord, ErrorCatalog};

/// All failed requests of a capture with their diagnoses
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorAnalysis {
    pub total_errors: usize,
    pub error_rate: String,
    /// Failures keyed by `"{status} {status_text}"`
    pub error_breakdown: BTreeMap<String, Vec<ErrorDetail>>,
    pub detailed_errors: Vec<ErrorDetail>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorDetail {
    /// 1-based position of the failed entry in the full capture
    pub index: usize,
    pub url: String,
    pub domain: String,
    pub server_ip: String,
    pub method: String,
    pub time: String,
    pub status: i64,
    pub status_text: String,
    pub error_analysis: DiagnosticRecord,
    pub response_headers: BTreeMap<String, String>,
    pub response_content: BodyPreview,
    pub timings: Timings,
}

pub struct ErrorAnalyzer;

impl ErrorAnalyzer {
    /// Classify every failed request and group them by status line
    pub fn analyze(har: &Har) -> Result<ErrorAnalysis> {
        tracing::debug!("Analyzing failed requests");

        let entries = &har.log.entries;

        let detailed_errors: Vec<ErrorDetail> = entries
            .iter()
            .enumerate()
            .filter(|(_, entry)| entry.is_failure())
            .map(|(idx, entry)| Self::describe(idx + 1, entry))
            .collect();

        let mut error_breakdown: BTreeMap<String, Vec<ErrorDetail>> = BTreeMap::new();
        for detail in &detailed_errors {
            error_breakdown
                .entry(format!("{} {}", detail.status, detail.status_text))
                .or_default()
                .push(detail.clone());
        }

        tracing::info!(
            "Error analysis complete: {} failed requests in {} groups",
            detailed_errors.len(),
            error_breakdown.len()
        );

        Ok(ErrorAnalysis {
            total_errors: detailed_errors.len(),
            error_rate: format_percent(detailed_errors.len(), entries.len()),
            error_breakdown,
            detailed_errors,
        })
    }

    fn describe(index: usize, entry: &Entry) -> ErrorDetail {
        let response = &entry.response;
        let domain = UrlParts::parse(&entry.request.url).authority;
        let server_ip = entry.server_ip();
        let status_text = if response.status_text.trim().is_empty() {
            "Unknown".to_string()
        } else {
            response.status_text.clone()
        };

        ErrorDetail {
            index,
            url: entry.request.url.clone(),
            error_analysis: ErrorCatalog::lookup(response.status, &domain, server_ip),
            domain,
            server_ip: server_ip.unwrap_or(UNKNOWN_SERVER_IP).to_string(),
            method: entry.request.method.clone(),
            time: entry.started_date_time.clone(),
            status: response.status,
            status_text,
            response_headers: headers_to_map(&response.headers),
            response_content: BodyPreview::from_content(&response.content),
            timings: entry.timings,
        }
    }
}
