use super::Analyzer;
use super::preview::{BodyPreview, PostDataPreview};
use crate::Result;
use crate::format::{format_ms, format_size};
use crate::har::{Entry, Har, Timings, UrlParts, headers_to_map, query_to_map};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Shown wherever the capture did not record the server address
pub const UNKNOWN_SERVER_IP: &str = "N/A";

/// Per-request projection of one entry
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RequestDetail {
    /// 1-based position in the capture
    pub index: usize,
    pub method: String,
    pub url: String,
    pub domain: String,
    pub path: String,
    pub status_code: i64,
    pub status_text: String,
    pub is_error: bool,
    pub server_ip: String,
    pub content_size: String,
    pub content_size_bytes: i64,
    pub total_time: String,
    pub total_time_ms: f64,
    pub start_time: String,
    pub content_type: String,
    pub request_headers: BTreeMap<String, String>,
    pub response_headers: BTreeMap<String, String>,
    pub query_params: BTreeMap<String, String>,
    pub post_data: Option<PostDataPreview>,
    pub response_content: BodyPreview,
    pub timings: TimingBreakdown,
    pub cache: serde_json::Value,
    pub error_details: Option<ErrorSummary>,
}

/// The six timing phases, unmeasured phases kept as -1
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TimingBreakdown {
    pub dns: f64,
    pub connect: f64,
    pub ssl: f64,
    pub send: f64,
    pub wait: f64,
    pub receive: f64,
}

impl From<&Timings> for TimingBreakdown {
    fn from(timings: &Timings) -> Self {
        Self {
            dns: timings.dns,
            connect: timings.connect,
            ssl: timings.ssl,
            send: timings.send,
            wait: timings.wait,
            receive: timings.receive,
        }
    }
}

/// Short classification attached to failed requests
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorSummary {
    pub status_code: i64,
    pub status_text: String,
    pub category: String,
    pub url: String,
    pub method: String,
}

/// Category label for a failed status code
pub fn status_category(status: i64) -> &'static str {
    match status {
        400 => "Client error - malformed request",
        401 => "Unauthorized - authentication required",
        403 => "Forbidden - insufficient permissions",
        404 => "Resource not found",
        405 => "Method not allowed",
        408 => "Request timeout",
        429 => "Too many requests",
        500 => "Internal server error",
        502 => "Bad gateway",
        503 => "Service unavailable",
        504 => "Gateway timeout",
        _ => "Unknown error",
    }
}

pub struct RequestAnalyzer;

impl RequestAnalyzer {
    /// Project a single entry; `index` is its 1-based capture position
    pub fn project(index: usize, entry: &Entry) -> RequestDetail {
        let request = &entry.request;
        let response = &entry.response;
        let url_parts = UrlParts::parse(&request.url);
        let is_error = entry.is_failure();

        let error_details = is_error.then(|| ErrorSummary {
            status_code: response.status,
            status_text: response.status_text.clone(),
            category: status_category(response.status).to_string(),
            url: request.url.clone(),
            method: request.method.clone(),
        });

        RequestDetail {
            index,
            method: request.method.clone(),
            url: request.url.clone(),
            domain: url_parts.authority,
            path: url_parts.path,
            status_code: response.status,
            status_text: response.status_text.clone(),
            is_error,
            server_ip: entry.server_ip().unwrap_or(UNKNOWN_SERVER_IP).to_string(),
            content_size: format_size(entry.content_size() as f64),
            content_size_bytes: entry.content_size(),
            total_time: format_ms(entry.time),
            total_time_ms: entry.time,
            start_time: entry.started_date_time.clone(),
            content_type: response.content_type(),
            request_headers: headers_to_map(&request.headers),
            response_headers: headers_to_map(&response.headers),
            query_params: query_to_map(&request.query_string),
            post_data: request
                .post_data
                .as_ref()
                .map(PostDataPreview::from_post_data),
            response_content: BodyPreview::from_content(&response.content),
            timings: TimingBreakdown::from(&entry.timings),
            cache: entry.cache.clone(),
            error_details,
        }
    }
}

impl Analyzer for RequestAnalyzer {
    type Output = Vec<RequestDetail>;

    fn analyze(&self, har: &Har) -> Result<Self::Output> {
        tracing::debug!("Projecting {} requests", har.log.entries.len());

        let details = har
            .log
            .entries
            .iter()
            .enumerate()
            .map(|(idx, entry)| Self::project(idx + 1, entry))
            .collect();

        Ok(details)
    }
}
