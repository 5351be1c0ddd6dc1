use cinefetch_domain::FetchError;
use reqwest::{Response, StatusCode};
use std::time::Duration;

pub const USER_AGENT: &str = concat!("cinefetch/", env!("CARGO_PKG_VERSION"));

/// Pooled client with an overall request timeout.
pub fn build_client(timeout: Duration) -> reqwest::Client {
    reqwest::Client::builder()
        .use_rustls_tls()
        .timeout(timeout)
        .connect_timeout(timeout.min(Duration::from_secs(5)))
        .pool_max_idle_per_host(8)
        .user_agent(USER_AGENT)
        .build()
        .unwrap_or_else(|_| reqwest::Client::new())
}

/// Map a reqwest failure onto the fetch taxonomy. The request URL is
/// stripped first since provider URLs carry API keys in the query string.
pub fn classify_error(e: reqwest::Error) -> FetchError {
    let e = e.without_url();
    if e.is_timeout() {
        FetchError::Timeout
    } else if let Some(status) = e.status() {
        FetchError::rejected(status.as_u16(), e.to_string())
    } else if e.is_decode() {
        FetchError::rejected(200, format!("undecodable response body: {}", e))
    } else if e.is_builder() {
        FetchError::MalformedInput(e.to_string())
    } else {
        FetchError::Transport(e.to_string())
    }
}

/// Reject non-2xx responses, keeping a short slice of the body for the log.
pub async fn ensure_success(response: Response) -> Result<Response, FetchError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let body = response.text().await.unwrap_or_default();
    let snippet: String = body.chars().take(200).collect();
    Err(FetchError::rejected(
        status.as_u16(),
        if snippet.is_empty() {
            status.canonical_reason().unwrap_or("Unknown").to_string()
        } else {
            snippet
        },
    ))
}

pub fn is_not_found(status: StatusCode) -> bool {
    status == StatusCode::NOT_FOUND
}
