use crate::format::truncate_chars;
use crate::har::{Content, Param, PostData};
use serde::{Deserialize, Serialize};

/// Maximum characters kept from pretty-printed JSON
pub const JSON_PREVIEW_LIMIT: usize = 2000;
/// Maximum characters kept from any other body
pub const RAW_PREVIEW_LIMIT: usize = 1000;

/// Response body with a display preview
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BodyPreview {
    pub size: i64,
    pub mime_type: String,
    pub preview: String,
    pub full_content: String,
    pub encoding: String,
    pub is_json: bool,
    pub is_html: bool,
    pub is_image: bool,
    pub is_text: bool,
}

/// Request body with a display preview
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PostDataPreview {
    pub mime_type: String,
    pub text: String,
    pub full_content: String,
    pub params: Vec<Param>,
    pub is_json: bool,
    pub is_form: bool,
    pub is_multipart: bool,
}

impl BodyPreview {
    pub fn from_content(content: &Content) -> Self {
        let mime_type = content.mime_type.clone();
        let text = content.text.clone().unwrap_or_default();
        let is_json = mime_type.starts_with(mime::APPLICATION_JSON.essence_str());

        Self {
            size: content.size,
            preview: preview_text(&text, is_json),
            full_content: text,
            encoding: content.encoding.clone().unwrap_or_default(),
            is_json,
            is_html: mime_type.starts_with(mime::TEXT_HTML.essence_str()),
            is_image: mime_type.starts_with(&format!("{}/", mime::IMAGE)),
            is_text: mime_type.starts_with(&format!("{}/", mime::TEXT)),
            mime_type,
        }
    }
}

impl PostDataPreview {
    pub fn from_post_data(post_data: &PostData) -> Self {
        let mime_type = post_data.mime_type.clone();
        let text = post_data.text.clone().unwrap_or_default();
        let is_json = mime_type == mime::APPLICATION_JSON.essence_str();

        Self {
            text: preview_text(&text, is_json),
            full_content: text,
            params: post_data.params.clone(),
            is_json,
            is_form: mime_type == mime::APPLICATION_WWW_FORM_URLENCODED.essence_str(),
            is_multipart: mime_type.starts_with(&format!("{}/", mime::MULTIPART)),
            mime_type,
        }
    }
}

/// JSON bodies are pretty-printed with two-space indentation and capped at
/// [`JSON_PREVIEW_LIMIT`]; invalid JSON and every other body are capped at
/// [`RAW_PREVIEW_LIMIT`] as-is.
fn preview_text(text: &str, is_json: bool) -> String {
    if is_json && !text.is_empty() {
        let pretty = serde_json::from_str::<serde_json::Value>(text)
            .and_then(|value| serde_json::to_string_pretty(&value));
        match pretty {
            Ok(pretty) => return truncate_chars(&pretty, JSON_PREVIEW_LIMIT),
            Err(e) => tracing::debug!("Body declared as JSON failed to parse: {}", e),
        }
    }

    truncate_chars(text, RAW_PREVIEW_LIMIT)
}
