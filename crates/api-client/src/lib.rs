//! HTTP client for the filesharer upload API.
//!
//! Async client using `reqwest` with Bearer token authentication. Two
//! collaborators share one explicitly constructed transport handle:
//! [`SessionClient`] negotiates and finalizes upload sessions,
//! [`ChunkTransmitter`] sends one chunk per call as a multipart request.
//! Neither retries; a failed call surfaces as an error to the caller.

mod session;
mod transmit;

use std::time::Duration;

use reqwest::header::{AUTHORIZATION, HeaderMap, HeaderValue};

pub use session::{SessionClient, UploadSession};
pub use transmit::ChunkTransmitter;

/// Default per-request timeout. Chunk uploads on slow links can run long,
/// so this bounds a single HTTP call, not the whole transfer.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(2 * 60 * 60);

/// Errors from the upload API client.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("initiate rejected ({status}): {body}")]
    Session { status: u16, body: String },

    #[error("chunk rejected ({status}): {body}")]
    ChunkRejected { status: u16, body: String },

    #[error("finalize rejected ({status}): {message}")]
    Finalize { status: u16, message: String },

    #[error("malformed server response: {0}")]
    Protocol(String),

    #[error(transparent)]
    Transfer(#[from] filesharer_transfer::TransferError),

    #[error("task join error: {0}")]
    Join(String),

    #[error("invalid API key")]
    InvalidKey,
}

/// Builds the shared transport handle: Bearer auth on every request plus
/// the long per-call timeout.
pub fn build_http_client(api_key: &str, timeout: Duration) -> Result<reqwest::Client, ApiError> {
    let mut headers = HeaderMap::new();
    headers.insert(
        AUTHORIZATION,
        HeaderValue::from_str(&format!("Bearer {api_key}")).map_err(|_| ApiError::InvalidKey)?,
    );

    Ok(reqwest::Client::builder()
        .default_headers(headers)
        .timeout(timeout)
        .build()?)
}
