//! Prompt template catalog.
//!
//! The backend serves predefined prompt templates; selecting one replaces
//! the editable prompt text wholesale. Templates may embed the
//! [`TRANSCRIPTION_PLACEHOLDER`] token, which the backend substitutes with
//! the selected video's transcription. The token is a convention, not
//! something this client enforces.

use serde::{Deserialize, Serialize};

/// Placeholder token a prompt may embed to reference the transcription.
pub const TRANSCRIPTION_PLACEHOLDER: &str = "{transcription}";

/// Path of the template catalog endpoint, relative to the base URL.
pub const PROMPTS_PATH: &str = "/prompts";

/// A predefined prompt template.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PromptTemplate {
    /// Server-assigned identifier.
    pub id: String,
    /// Short human-readable title.
    pub title: String,
    /// Full prompt text used to populate the editable field.
    pub template: String,
}

/// Fetch the prompt template catalog from the backend.
///
/// # Errors
///
/// Returns an error if the request fails, the endpoint answers with a
/// non-success status, or the body is not the expected JSON array.
pub async fn fetch_prompt_templates(
    client: &reqwest::Client,
    base_url: &str,
) -> crate::error::Result<Vec<PromptTemplate>> {
    let url = format!("{}{}", base_url.trim_end_matches('/'), PROMPTS_PATH);
    let response = client
        .get(&url)
        .send()
        .await
        .and_then(reqwest::Response::error_for_status)
        .map_err(|e| crate::error::StudioError::Request(e.to_string()))?;

    response
        .json()
        .await
        .map_err(|e| crate::error::StudioError::Request(e.to_string()))
}
