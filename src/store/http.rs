//! Shared HTTP plumbing for the store adapters

use serde::de::DeserializeOwned;

use super::StoreError;

/// Send a request and return the response if its status is a success.
pub async fn send(
    request: reqwest::RequestBuilder,
    url: &str,
) -> Result<reqwest::Response, StoreError> {
    let resp = request
        .send()
        .await
        .map_err(|e| StoreError::transport(url, e))?;
    check_response(resp, url).await
}

/// Send a request and decode a JSON body.
pub async fn send_json<T: DeserializeOwned>(
    request: reqwest::RequestBuilder,
    url: &str,
) -> Result<T, StoreError> {
    let resp = send(request, url).await?;
    let text = resp
        .text()
        .await
        .map_err(|e| StoreError::transport(url, e))?;
    serde_json::from_str(&text).map_err(|e| StoreError::malformed(url, e))
}

/// Check HTTP response status code and return a clear error on failure.
async fn check_response(
    resp: reqwest::Response,
    url: &str,
) -> Result<reqwest::Response, StoreError> {
    let status = resp.status();
    if status == reqwest::StatusCode::UNAUTHORIZED {
        return Err(StoreError::Unauthorized(url.to_string()));
    }
    if !status.is_success() {
        let body = resp.text().await.unwrap_or_default();
        return Err(StoreError::Status {
            status: status.as_u16(),
            url: url.to_string(),
            body,
        });
    }
    Ok(resp)
}
