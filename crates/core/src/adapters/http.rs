use std::time::Duration;

use error_stack::{Result, ResultExt};
use serde::de::DeserializeOwned;
use thiserror::Error;

pub const USER_AGENT: &str = concat!("crypto-portfolio/", env!("CARGO_PKG_VERSION"));

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum HttpError {
    #[error("Failed to build HTTP client")]
    ClientError,
    #[error("HTTP request failed")]
    RequestError,
    #[error("HTTP response had an error status")]
    StatusError,
    #[error("HTTP response body could not be parsed")]
    DataFormatError,
}

/// One client for the whole run, shared by every REST and JSON-RPC adapter.
pub fn build_client(timeout: Duration) -> Result<reqwest::Client, HttpError> {
    reqwest::Client::builder()
        .timeout(timeout)
        .user_agent(USER_AGENT)
        .build()
        .change_context(HttpError::ClientError)
}

/// Sends `request` and parses the body as JSON. Non 2xx answers are errors.
pub async fn send_and_deserialize<T: DeserializeOwned>(
    request: reqwest::RequestBuilder,
) -> Result<T, HttpError> {
    let resp = request
        .send()
        .await
        .change_context(HttpError::RequestError)
        .attach_printable("Failed to send request")?;

    let url = resp.url().to_string();
    let status = resp.status();

    let body = resp
        .text()
        .await
        .change_context(HttpError::RequestError)
        .attach_printable("Failed to get response text")
        .attach_printable_lazy(|| format!("URL: {url}"))?;

    if !status.is_success() {
        return Err(error_stack::report!(HttpError::StatusError)
            .attach_printable(format!("Status: {status}"))
            .attach_printable(format!("URL: {url}"))
            .attach_printable(format!("Response: {body}")));
    }

    parse_json(&body).attach_printable_lazy(|| format!("URL: {url}"))
}

pub fn parse_json<T: DeserializeOwned>(body: &str) -> Result<T, HttpError> {
    serde_json::from_str(body)
        .change_context(HttpError::DataFormatError)
        .attach_printable_lazy(|| format!("Response: {body}"))
}
