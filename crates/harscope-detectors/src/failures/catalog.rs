use harscope_core::analysis::UNKNOWN_SERVER_IP;
use lazy_static::lazy_static;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Diagnosis and remediation for one failed request
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DiagnosticRecord {
    pub category: String,
    pub title: String,
    pub description: String,
    pub possible_causes: Vec<String>,
    pub solutions: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub allow_list: Option<AllowListInfo>,
}

/// Network allow-list hints, present when the server address is known
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AllowListInfo {
    pub ip: String,
    pub domain: String,
    pub suggestions: Vec<String>,
}

/// Static catalog text. Solutions may contain `{domain}` and `{ip}`
/// placeholders filled in per request.
struct CatalogEntry {
    category: &'static str,
    title: &'static str,
    description: &'static str,
    possible_causes: &'static [&'static str],
    solutions: &'static [&'static str],
}

const CONNECTION_FAILURE: CatalogEntry = CatalogEntry {
    category: "Network connection error",
    title: "Unable to connect to the server",
    description: "The browser could not establish a connection with the server.",
    possible_causes: &[
        "Network connection dropped",
        "DNS resolution failed",
        "Blocked by a firewall",
    ],
    solutions: &[
        "Check the network connection",
        "Confirm that the domain {domain} resolves",
        "Add IP address {ip} to the network allow-list",
        "Add domain {domain} to the firewall allow-list",
        "Ask the network administrator to review the network configuration",
        "Try a different network connection",
    ],
};

lazy_static! {
    static ref CATALOG: HashMap<i64, CatalogEntry> = {
        let mut catalog = HashMap::new();
        catalog.insert(400, CatalogEntry {
            category: "Client error",
            title: "Malformed request",
            description: "The client sent a request the server could not understand.",
            possible_causes: &[
                "Request parameters are malformed",
                "Request headers are incomplete",
                "Invalid JSON payload",
                "Request body is too large",
            ],
            solutions: &[
                "Check that the request parameters are well formed",
                "Verify that all required request headers are present",
                "Validate the JSON payload",
                "Confirm the request body is within the size limit",
            ],
        });
        catalog.insert(401, CatalogEntry {
            category: "Authentication error",
            title: "Unauthorized",
            description: "The request requires authentication but carried no valid credentials.",
            possible_causes: &[
                "No credentials were provided",
                "Credentials have expired",
                "Credentials are malformed",
                "Wrong username or password",
            ],
            solutions: &[
                "Sign in again to obtain fresh credentials",
                "Check whether the token has expired",
                "Confirm the username and password",
                "Ask an administrator to check the account status",
            ],
        });
        catalog.insert(403, CatalogEntry {
            category: "Permission error",
            title: "Forbidden",
            description: "The server understood the request but refused to fulfil it, usually for lack of permission.",
            possible_causes: &[
                "Insufficient permissions or the session has expired",
                "Client IP address is restricted",
                "Request rate is too high",
            ],
            solutions: &[
                "Ask the administrator for the required permissions",
                "Add IP address {ip} to the allow-list",
                "Add domain {domain} to the firewall allow-list",
                "Reduce the request rate",
                "Check the API usage limits",
            ],
        });
        catalog.insert(404, CatalogEntry {
            category: "Resource missing",
            title: "Page or resource not found",
            description: "The server could not find the requested resource.",
            possible_causes: &[
                "Wrong URL",
                "The resource was moved or deleted",
                "Network connectivity problem",
                "DNS resolution failed",
            ],
            solutions: &[
                "Check that the URL is correct",
                "Confirm that the domain {domain} is reachable",
                "Add IP address {ip} to the network allow-list",
                "Add domain {domain} to the firewall allow-list",
                "Ask the network administrator to check connectivity",
                "Check that DNS resolution works",
            ],
        });
        catalog.insert(405, CatalogEntry {
            category: "Method error",
            title: "Method not allowed",
            description: "The resource does not support the HTTP method used.",
            possible_causes: &[
                "The wrong HTTP method was used",
                "The server does not support this method",
                "The API endpoint is misconfigured",
            ],
            solutions: &[
                "Check the API documentation for the correct HTTP method",
                "Ask the developers to confirm the endpoint configuration",
                "Try a different HTTP method",
            ],
        });
        catalog.insert(408, CatalogEntry {
            category: "Timeout error",
            title: "Request timeout",
            description: "The server waited too long for the request and closed the connection.",
            possible_causes: &[
                "Unstable network connection",
                "Slow server response",
                "Request processing took too long",
                "Blocked by a firewall",
            ],
            solutions: &[
                "Check the stability of the network connection",
                "Confirm that {domain} can be reached",
                "Add IP address {ip} to the network allow-list",
                "Add domain {domain} to the firewall allow-list",
                "Increase the request timeout",
                "Ask the network administrator to review the network configuration",
            ],
        });
        catalog.insert(429, CatalogEntry {
            category: "Rate limit error",
            title: "Too many requests",
            description: "Too many requests were sent in a given amount of time.",
            possible_causes: &[
                "API call rate is too high",
                "A rate limit was triggered",
                "Too many concurrent requests",
            ],
            solutions: &[
                "Reduce the API call rate",
                "Queue outgoing requests",
                "Increase the interval between requests",
                "Ask the provider to raise the quota",
            ],
        });
        catalog.insert(500, CatalogEntry {
            category: "Server error",
            title: "Internal server error",
            description: "The server hit an unexpected condition and could not complete the request.",
            possible_causes: &[
                "Bug in the server code",
                "Server misconfiguration",
                "Database connection failure",
                "Server resources exhausted",
            ],
            solutions: &[
                "Report the error to the service provider",
                "Retry the request later",
                "Check the server status",
                "Contact technical support",
            ],
        });
        catalog.insert(502, CatalogEntry {
            category: "Gateway error",
            title: "Bad gateway",
            description: "A gateway or proxy received an invalid response from the upstream server.",
            possible_causes: &[
                "Upstream server failure",
                "Gateway misconfiguration",
                "Network connectivity problem",
                "Load balancer problem",
            ],
            solutions: &[
                "Check whether {domain} can be reached directly",
                "Add IP address {ip} to the network allow-list",
                "Add domain {domain} to the firewall allow-list",
                "Ask the network administrator to review the gateway configuration",
                "Retry the request later",
            ],
        });
        catalog.insert(503, CatalogEntry {
            category: "Service unavailable",
            title: "Service temporarily unavailable",
            description: "The server cannot handle the request right now, usually a temporary condition.",
            possible_causes: &[
                "Server under maintenance",
                "Server overloaded",
                "Service temporarily stopped",
                "Network connectivity problem",
            ],
            solutions: &[
                "Retry the request later",
                "Confirm that the {domain} service is healthy",
                "Check whether IP address {ip} is reachable",
                "Add domain {domain} to the firewall allow-list",
                "Ask the service provider to confirm the service status",
            ],
        });
        catalog.insert(504, CatalogEntry {
            category: "Gateway timeout",
            title: "Gateway timeout",
            description: "A gateway or proxy did not receive a timely response from the upstream server.",
            possible_causes: &[
                "Slow upstream server",
                "High network latency",
                "Blocked by a firewall",
                "Server overloaded",
            ],
            solutions: &[
                "Check connectivity to {domain}",
                "Add IP address {ip} to the network allow-list",
                "Add domain {domain} to the firewall allow-list",
                "Increase the timeout setting",
                "Ask the network administrator to review the network configuration",
            ],
        });
        catalog
    };
}

const UNKNOWN_CAUSES: &[&str] = &["The server returned a non-standard status code"];

const UNKNOWN_SOLUTIONS: &[&str] = &[
    "Ask the developers to investigate the specific error",
    "Confirm that the {domain} service is healthy",
    "Check whether IP address {ip} is reachable",
];

/// Status-code knowledge base for failed requests
pub struct ErrorCatalog;

impl ErrorCatalog {
    /// Resolve the diagnostic record for `status`, filling in the request's
    /// domain and server IP. Status 0 is a connection-level failure; codes
    /// outside the catalog get a generic record naming the code.
    pub fn lookup(status: i64, domain: &str, server_ip: Option<&str>) -> DiagnosticRecord {
        let ip = server_ip.unwrap_or(UNKNOWN_SERVER_IP);

        let mut record = if status == 0 {
            Self::render(&CONNECTION_FAILURE, domain, ip)
        } else if let Some(entry) = CATALOG.get(&status) {
            Self::render(entry, domain, ip)
        } else {
            DiagnosticRecord {
                category: "Unknown error".to_string(),
                title: format!("HTTP {} error", status),
                description: "The server returned an unrecognised HTTP status code.".to_string(),
                possible_causes: fill_all(UNKNOWN_CAUSES, domain, ip),
                solutions: fill_all(UNKNOWN_SOLUTIONS, domain, ip),
                allow_list: None,
            }
        };

        if let Some(ip) = server_ip {
            record.allow_list = Some(AllowListInfo {
                ip: ip.to_string(),
                domain: domain.to_string(),
                suggestions: vec![
                    format!("Firewall allow-list: {}", domain),
                    format!("IP allow-list: {}", ip),
                    "Ports: 443 (HTTPS) or 80 (HTTP)".to_string(),
                ],
            });
        }

        record
    }

    fn render(entry: &CatalogEntry, domain: &str, ip: &str) -> DiagnosticRecord {
        DiagnosticRecord {
            category: entry.category.to_string(),
            title: entry.title.to_string(),
            description: entry.description.to_string(),
            possible_causes: fill_all(entry.possible_causes, domain, ip),
            solutions: fill_all(entry.solutions, domain, ip),
            allow_list: None,
        }
    }
}

fn fill_all(templates: &[&str], domain: &str, ip: &str) -> Vec<String> {
    templates
        .iter()
        .map(|t| t.replace("{domain}", domain).replace("{ip}", ip))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_catalog_covers_expected_statuses() {
        let mut statuses: Vec<i64> = CATALOG.keys().copied().collect();
        statuses.sort_unstable();
        assert_eq!(
            statuses,
            vec![400, 401, 403, 404, 405, 408, 429, 500, 502, 503, 504]
        );
        for status in statuses {
            let record = ErrorCatalog::lookup(status, "a.test", None);
            assert_ne!(record.category, "Unknown error");
        }
    }

    #[test]
    fn test_404_interpolates_domain_and_ip() {
        let record = ErrorCatalog::lookup(404, "api.example.com", Some("203.0.113.7"));

        assert_eq!(record.category, "Resource missing");
        assert!(
            record
                .solutions
                .contains(&"Add IP address 203.0.113.7 to the network allow-list".to_string())
        );
        assert!(
            record
                .solutions
                .contains(&"Add domain api.example.com to the firewall allow-list".to_string())
        );

        let allow_list = record.allow_list.unwrap();
        assert_eq!(allow_list.ip, "203.0.113.7");
        assert_eq!(allow_list.domain, "api.example.com");
        assert_eq!(allow_list.suggestions[2], "Ports: 443 (HTTPS) or 80 (HTTP)");
    }

    #[test]
    fn test_missing_ip_uses_placeholder_without_allow_list() {
        let record = ErrorCatalog::lookup(502, "gw.example.com", None);

        assert!(record.allow_list.is_none());
        assert!(
            record
                .solutions
                .contains(&"Add IP address N/A to the network allow-list".to_string())
        );
    }

    #[test]
    fn test_connection_failure_record() {
        let record = ErrorCatalog::lookup(0, "down.example.com", Some("198.51.100.1"));

        assert_eq!(record.category, "Network connection error");
        assert!(record.allow_list.is_some());
        assert!(
            record
                .solutions
                .contains(&"Confirm that the domain down.example.com resolves".to_string())
        );
    }

    #[test]
    fn test_unknown_status_record() {
        let record = ErrorCatalog::lookup(418, "tea.example.com", None);

        assert_eq!(record.category, "Unknown error");
        assert_eq!(record.title, "HTTP 418 error");
        assert_eq!(
            record.solutions[1],
            "Confirm that the tea.example.com service is healthy"
        );
    }
}
