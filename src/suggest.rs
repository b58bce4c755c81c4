//! Message suggestions from the relational backend's edge function

use serde::{Deserialize, Serialize};

use crate::config::Config;
use crate::store::StoreError;

const FUNCTION_PATH: &str = "functions/v1/generate-greeting";

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct SuggestionRequest<'a> {
    event_type: &'a str,
    sender_name: &'a str,
    receiver_name: &'a str,
    language: &'a str,
}

#[derive(Debug, Deserialize)]
struct SuggestionResponse {
    #[serde(default)]
    suggestions: Vec<String>,
}

async fn request_suggestions(
    config: &Config,
    event: &str,
    sender: &str,
    receiver: &str,
) -> Result<Vec<String>, StoreError> {
    let rel = &config.relational;
    let base = rel.url.as_deref().ok_or(StoreError::NotConfigured {
        backend: "relational",
        missing: "relational.url",
    })?;
    let anon_key = rel.anon_key.as_deref().ok_or(StoreError::NotConfigured {
        backend: "relational",
        missing: "relational.anon_key",
    })?;
    let token = rel.access_token.as_deref().unwrap_or(anon_key);

    let url = format!("{}/{}", base.trim_end_matches('/'), FUNCTION_PATH);
    tracing::debug!("POST {}", url);

    let request = reqwest::Client::new()
        .post(&url)
        .header("apikey", anon_key)
        .bearer_auth(token)
        .json(&SuggestionRequest {
            event_type: event,
            sender_name: sender,
            receiver_name: receiver,
            language: config.language.as_str(),
        });
    let body: SuggestionResponse = crate::store::send_json(request, &url).await?;

    Ok(body
        .suggestions
        .into_iter()
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect())
}

/// Suggested messages for a card, empty when the service is unavailable
pub async fn fetch_suggestions(
    config: &Config,
    event: &str,
    sender: &str,
    receiver: &str,
) -> Vec<String> {
    request_suggestions(config, event, sender, receiver)
        .await
        .unwrap_or_else(|e| {
            tracing::warn!("Failed to fetch suggestions: {}", e);
            Vec::new()
        })
}
