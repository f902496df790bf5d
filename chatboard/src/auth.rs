//! Bearer-token acquisition.
//!
//! Chat login needs a fresh OAuth token. An external token-exchange
//! service owns the client secret and the refresh token; the overlay
//! only ever GETs its endpoint and reads the `access_token` field. A
//! fresh token is fetched before every (re)connection attempt, so an
//! expired one never survives a reconnect.

use serde::Deserialize;

/// Errors from the token endpoint exchange.
#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    /// The HTTP request failed or the response body was not the
    /// expected JSON shape.
    #[error("token request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// The endpoint answered with a non-success status.
    #[error("token endpoint returned status {0}")]
    Status(reqwest::StatusCode),

    /// The endpoint answered 200 but with an empty token.
    #[error("token endpoint returned an empty access token")]
    EmptyToken,
}

/// Relevant subset of the token endpoint's response.
#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
}

/// Fetch a bearer token from the configured endpoint.
///
/// # Errors
///
/// Returns [`AuthError`] when the request fails, the endpoint answers
/// with a non-success status, or the token is missing/empty.
pub async fn fetch_access_token(client: &reqwest::Client, url: &str) -> Result<String, AuthError> {
    let response = client.get(url).send().await?;
    let status = response.status();
    if !status.is_success() {
        tracing::warn!(%status, url, "token endpoint rejected the request");
        return Err(AuthError::Status(status));
    }
    let body: TokenResponse = response.json().await?;
    if body.access_token.is_empty() {
        return Err(AuthError::EmptyToken);
    }
    Ok(body.access_token)
}
