use url::Url;

/// Authority (`host[:port]`) and path of a request URL
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UrlParts {
    pub authority: String,
    pub path: String,
}

impl UrlParts {
    /// Split a URL into authority and path.
    ///
    /// The authority is taken as written, so an explicit port survives even
    /// when it is the scheme default and the host keeps its case. Userinfo is
    /// never part of it. URLs that do not parse get an empty authority and
    /// everything before the query or fragment as the path.
    pub fn parse(raw: &str) -> Self {
        match Url::parse(raw) {
            Ok(url) => Self {
                authority: raw_authority(raw).to_string(),
                path: url.path().to_string(),
            },
            Err(e) => {
                tracing::debug!("Failed to parse URL {}: {}", raw, e);
                let path = raw.split(['?', '#']).next().unwrap_or_default();
                Self {
                    authority: String::new(),
                    path: path.to_string(),
                }
            }
        }
    }
}

/// Text between `://` and the first `/`, `?` or `#`, minus any `userinfo@`
fn raw_authority(raw: &str) -> &str {
    let Some((_, rest)) = raw.trim().split_once("://") else {
        return "";
    };
    let end = rest.find(['/', '?', '#']).unwrap_or(rest.len());
    let authority = &rest[..end];
    match authority.rfind('@') {
        Some(at) => &authority[at + 1..],
        None => authority,
    }
}
