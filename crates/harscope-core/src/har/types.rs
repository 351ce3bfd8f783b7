use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Deserializer, Serialize};
use std::collections::BTreeMap;

use super::timestamp::parse_timestamp;

/// Timing value recorded by browsers for a phase that was not measured
pub const UNMEASURED: f64 = -1.0;

/// Top-level HAR object
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Har {
    #[serde(default, deserialize_with = "null_as_default")]
    pub log: Log,
}

/// Main HAR log object
///
/// Only the parts the analyses read are modelled; anything else in the
/// capture is ignored on input.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Log {
    #[serde(default, deserialize_with = "null_as_default")]
    pub version: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub creator: Option<Creator>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub entries: Vec<Entry>,
}

/// Creator/Browser information
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Creator {
    #[serde(default, deserialize_with = "null_as_default")]
    pub name: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub version: String,
}

/// Individual HTTP transaction entry
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Entry {
    #[serde(
        rename = "startedDateTime",
        default,
        deserialize_with = "null_as_default"
    )]
    pub started_date_time: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub time: f64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub request: Request,
    #[serde(default, deserialize_with = "null_as_default")]
    pub response: Response,
    #[serde(default = "empty_object")]
    pub cache: serde_json::Value,
    #[serde(default, deserialize_with = "null_as_default")]
    pub timings: Timings,
    #[serde(rename = "serverIPAddress", default, skip_serializing_if = "Option::is_none")]
    pub server_ip_address: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub connection: Option<String>,
}

/// HTTP request
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Request {
    #[serde(default = "default_method", deserialize_with = "method_or_get")]
    pub method: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub url: String,
    #[serde(rename = "httpVersion", default, deserialize_with = "null_as_default")]
    pub http_version: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub headers: Vec<Header>,
    #[serde(rename = "queryString", default, deserialize_with = "null_as_default")]
    pub query_string: Vec<QueryParam>,
    #[serde(rename = "postData", default, skip_serializing_if = "Option::is_none")]
    pub post_data: Option<PostData>,
}

impl Default for Request {
    fn default() -> Self {
        Self {
            method: default_method(),
            url: String::new(),
            http_version: String::new(),
            headers: Vec::new(),
            query_string: Vec::new(),
            post_data: None,
        }
    }
}

/// HTTP response
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Response {
    /// 0 when no response was received at all
    #[serde(default, deserialize_with = "null_as_default")]
    pub status: i64,
    #[serde(rename = "statusText", default, deserialize_with = "null_as_default")]
    pub status_text: String,
    #[serde(rename = "httpVersion", default, deserialize_with = "null_as_default")]
    pub http_version: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub headers: Vec<Header>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub content: Content,
    #[serde(rename = "redirectURL", default, deserialize_with = "null_as_default")]
    pub redirect_url: String,
}

/// HTTP header
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Header {
    #[serde(default, deserialize_with = "null_as_default")]
    pub name: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub value: String,
}

/// Query parameter
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct QueryParam {
    #[serde(default, deserialize_with = "null_as_default")]
    pub name: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub value: String,
}

/// POST data
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PostData {
    #[serde(rename = "mimeType", default, deserialize_with = "null_as_default")]
    pub mime_type: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub params: Vec<Param>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
}

/// POST parameter
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Param {
    #[serde(default, deserialize_with = "null_as_default")]
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<String>,
    #[serde(rename = "fileName", default, skip_serializing_if = "Option::is_none")]
    pub file_name: Option<String>,
    #[serde(rename = "contentType", default, skip_serializing_if = "Option::is_none")]
    pub content_type: Option<String>,
}

/// Response content
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Content {
    #[serde(default, deserialize_with = "null_as_default")]
    pub size: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub compression: Option<i64>,
    #[serde(rename = "mimeType", default, deserialize_with = "null_as_default")]
    pub mime_type: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub encoding: Option<String>,
}

/// Timing information
///
/// Every phase is in milliseconds; [`UNMEASURED`] marks a phase that does
/// not apply to this entry and must never be read as a duration.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Timings {
    #[serde(default = "unmeasured", deserialize_with = "null_as_unmeasured")]
    pub blocked: f64,
    #[serde(default = "unmeasured", deserialize_with = "null_as_unmeasured")]
    pub dns: f64,
    #[serde(default = "unmeasured", deserialize_with = "null_as_unmeasured")]
    pub connect: f64,
    #[serde(default = "unmeasured", deserialize_with = "null_as_unmeasured")]
    pub ssl: f64,
    #[serde(default = "unmeasured", deserialize_with = "null_as_unmeasured")]
    pub send: f64,
    #[serde(default = "unmeasured", deserialize_with = "null_as_unmeasured")]
    pub wait: f64,
    #[serde(default = "unmeasured", deserialize_with = "null_as_unmeasured")]
    pub receive: f64,
}

impl Default for Timings {
    fn default() -> Self {
        Self {
            blocked: UNMEASURED,
            dns: UNMEASURED,
            connect: UNMEASURED,
            ssl: UNMEASURED,
            send: UNMEASURED,
            wait: UNMEASURED,
            receive: UNMEASURED,
        }
    }
}

impl Timings {
    /// Returns the phase duration, or `None` for the unmeasured sentinel
    pub fn measured(value: f64) -> Option<f64> {
        (value >= 0.0).then_some(value)
    }
}

impl Entry {
    /// A transaction failed when the server answered with an error status
    /// or when no response was received at all (status 0).
    pub fn is_failure(&self) -> bool {
        self.response.status >= 400 || self.response.status == 0
    }

    /// Server IP address, if the capture recorded a non-empty one
    pub fn server_ip(&self) -> Option<&str> {
        self.server_ip_address
            .as_deref()
            .map(str::trim)
            .filter(|ip| !ip.is_empty())
    }

    /// Parsed start time; `None` when absent or unparsable
    pub fn started_at(&self) -> Option<DateTime<FixedOffset>> {
        parse_timestamp(&self.started_date_time)
    }

    pub fn content_size(&self) -> i64 {
        self.response.content.size
    }
}

impl Request {
    pub fn header(&self, name: &str) -> Option<&str> {
        find_header(&self.headers, name)
    }

    pub fn user_agent(&self) -> Option<&str> {
        self.header("user-agent")
    }
}

impl Response {
    pub fn header(&self, name: &str) -> Option<&str> {
        find_header(&self.headers, name)
    }

    /// Redirect target from the `Location` header
    pub fn location(&self) -> Option<&str> {
        self.header("location").filter(|value| !value.is_empty())
    }

    /// Media type from the first `Content-Type` header with parameters
    /// stripped, or `"unknown"` when the header is missing.
    pub fn content_type(&self) -> String {
        match self.header("content-type") {
            Some(value) => value
                .split(';')
                .next()
                .unwrap_or_default()
                .trim()
                .to_string(),
            None => "unknown".to_string(),
        }
    }

    pub fn is_redirect(&self) -> bool {
        (300..400).contains(&self.status)
    }
}

/// Case-insensitive header lookup; the first match in list order wins
pub fn find_header<'a>(headers: &'a [Header], name: &str) -> Option<&'a str> {
    headers
        .iter()
        .find(|h| h.name.eq_ignore_ascii_case(name))
        .map(|h| h.value.as_str())
}

/// Project headers into a name-to-value map. Names keep their exact case,
/// so only an exact-case duplicate overwrites an earlier value.
pub fn headers_to_map(headers: &[Header]) -> BTreeMap<String, String> {
    headers
        .iter()
        .map(|h| (h.name.clone(), h.value.clone()))
        .collect()
}

pub fn query_to_map(params: &[QueryParam]) -> BTreeMap<String, String> {
    params
        .iter()
        .map(|p| (p.name.clone(), p.value.clone()))
        .collect()
}

fn default_method() -> String {
    "GET".to_string()
}

fn unmeasured() -> f64 {
    UNMEASURED
}

fn empty_object() -> serde_json::Value {
    serde_json::Value::Object(serde_json::Map::new())
}

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

fn null_as_unmeasured<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<f64>::deserialize(deserializer)?.unwrap_or(UNMEASURED))
}

fn method_or_get<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?
        .filter(|method| !method.is_empty())
        .unwrap_or_else(default_method))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn header(name: &str, value: &str) -> Header {
        Header {
            name: name.to_string(),
            value: value.to_string(),
        }
    }

    #[test]
    fn test_entry_defaults_absorb_missing_fields() {
        let entry: Entry = serde_json::from_str(r#"{"request": {"url": "https://a.test/"}}"#)
            .unwrap();

        assert_eq!(entry.request.method, "GET");
        assert_eq!(entry.response.status, 0);
        assert_eq!(entry.time, 0.0);
        assert_eq!(entry.timings.dns, UNMEASURED);
        assert_eq!(entry.timings.receive, UNMEASURED);
        assert!(entry.cache.as_object().is_some_and(|o| o.is_empty()));
        assert!(entry.is_failure());
    }

    #[test]
    fn test_null_fields_treated_as_absent() {
        let entry: Entry = serde_json::from_str(
            r#"{"request": {"method": null, "url": null}, "response": {"status": null},
                "timings": {"ssl": null, "wait": 12.5}}"#,
        )
        .unwrap();

        assert_eq!(entry.request.method, "GET");
        assert_eq!(entry.request.url, "");
        assert_eq!(entry.timings.ssl, UNMEASURED);
        assert_eq!(entry.timings.wait, 12.5);
    }

    #[test]
    fn test_header_lookup_first_match_case_insensitive() {
        let response = Response {
            headers: vec![
                header("content-type", "application/json; charset=utf-8"),
                header("Content-Type", "text/html"),
            ],
            ..Default::default()
        };

        assert_eq!(response.content_type(), "application/json");
        assert_eq!(Response::default().content_type(), "unknown");
    }

    #[test]
    fn test_headers_to_map_later_exact_duplicate_wins() {
        let headers = vec![
            header("X-Trace", "first"),
            header("x-trace", "lower"),
            header("X-Trace", "second"),
        ];

        let map = headers_to_map(&headers);
        assert_eq!(map.len(), 2);
        assert_eq!(map["X-Trace"], "second");
        assert_eq!(map["x-trace"], "lower");
    }

    #[test]
    fn test_failure_classification() {
        let mut entry = Entry::default();
        for (status, failed) in [(0, true), (200, false), (302, false), (404, true), (503, true)] {
            entry.response.status = status;
            assert_eq!(entry.is_failure(), failed, "status {}", status);
        }
    }

    #[test]
    fn test_server_ip_ignores_blank() {
        let mut entry = Entry::default();
        assert_eq!(entry.server_ip(), None);
        entry.server_ip_address = Some(" ".to_string());
        assert_eq!(entry.server_ip(), None);
        entry.server_ip_address = Some("10.0.0.1".to_string());
        assert_eq!(entry.server_ip(), Some("10.0.0.1"));
    }
}
