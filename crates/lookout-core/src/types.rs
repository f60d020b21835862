//! Request bodies accepted by the relay endpoints.
//!
//! Field names match what the browser extension sends. Every field is
//! optional on the wire: absent and `null` both read as the empty string.

use serde::{Deserialize, Deserializer, Serialize};

/// Body of `POST /analyze_screenshot`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisRequest {
    /// Base64 PNG, optionally with a `data:image/...;base64,` header
    #[serde(default, deserialize_with = "null_as_empty")]
    pub base64_screenshot: String,

    /// What the user said they are working on
    #[serde(default, deserialize_with = "null_as_empty")]
    pub goal: String,
}

/// Body of `POST /validate_reason`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidationRequest {
    /// Base64 PNG, optionally with a `data:image/...;base64,` header
    #[serde(default, deserialize_with = "null_as_empty")]
    pub base64_screenshot: String,

    /// What the user said they are working on
    #[serde(default, deserialize_with = "null_as_empty")]
    pub goal: String,

    /// The user's justification for the current page
    #[serde(default, deserialize_with = "null_as_empty")]
    pub reason: String,
}

fn null_as_empty<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}
