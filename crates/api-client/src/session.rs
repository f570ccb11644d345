use filesharer_protocol::{
    FinalizeUploadRequest, FinalizeUploadResponse, InitiateUploadRequest, InitiateUploadResponse,
};
use tracing::debug;

use crate::ApiError;

/// A negotiated upload session.
///
/// Immutable for the life of one upload run; `total_chunks` is derived once
/// from the server-chosen chunk size.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadSession {
    pub upload_id: String,
    pub chunk_size: u64,
    pub total_chunks: u32,
}

/// Negotiates upload sessions: one `initiate` and one `finalize` call per
/// upload, single attempt each.
pub struct SessionClient {
    http: reqwest::Client,
    base_url: String,
}

impl SessionClient {
    /// Creates a client over an existing transport handle.
    pub fn new(http: reqwest::Client, base_url: impl Into<String>) -> Self {
        Self {
            http,
            base_url: base_url.into(),
        }
    }

    /// Starts an upload session for a file of `file_size` bytes.
    ///
    /// The server answers with an opaque upload id and the chunk size it
    /// expects. A non-positive chunk size is a malformed reply, not a
    /// session we can upload against.
    pub async fn initiate(
        &self,
        file_name: &str,
        file_size: u64,
        file_hash: &str,
        expiry: &str,
    ) -> Result<UploadSession, ApiError> {
        let req = InitiateUploadRequest {
            file_name: file_name.to_string(),
            file_size,
            file_hash: file_hash.to_string(),
            expiry: expiry.to_string(),
        };

        let url = format!("{}/api/v1/upload/initiate", self.base_url);
        let resp = self.http.post(&url).json(&req).send().await?;
        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(ApiError::Session {
                status: status.as_u16(),
                body,
            });
        }

        let body = resp.bytes().await?;
        let parsed: InitiateUploadResponse = serde_json::from_slice(&body)
            .map_err(|e| ApiError::Protocol(format!("initiate response: {e}")))?;

        if parsed.chunk_size <= 0 {
            return Err(ApiError::Protocol(format!(
                "initiate response: chunkSize must be positive, got {}",
                parsed.chunk_size
            )));
        }

        let chunk_size = parsed.chunk_size as u64;
        let session = UploadSession {
            upload_id: parsed.upload_id,
            chunk_size,
            total_chunks: file_size.div_ceil(chunk_size) as u32,
        };
        debug!(
            upload_id = %session.upload_id,
            chunk_size = session.chunk_size,
            total_chunks = session.total_chunks,
            "upload session negotiated"
        );
        Ok(session)
    }

    /// Finalizes the session after all chunks are in.
    ///
    /// A rejection carries the raw server body for diagnostics (the server
    /// reports missing chunks and hash mismatches there).
    pub async fn finalize(
        &self,
        upload_id: &str,
        total_chunks: u32,
    ) -> Result<FinalizeUploadResponse, ApiError> {
        let req = FinalizeUploadRequest {
            upload_id: upload_id.to_string(),
            total_chunks,
        };

        let url = format!("{}/api/v1/upload/finalize", self.base_url);
        let resp = self.http.post(&url).json(&req).send().await?;
        let status = resp.status();
        if !status.is_success() {
            let message = resp.text().await.unwrap_or_default();
            return Err(ApiError::Finalize {
                status: status.as_u16(),
                message,
            });
        }

        let body = resp.bytes().await?;
        serde_json::from_slice(&body)
            .map_err(|e| ApiError::Protocol(format!("finalize response: {e}")))
    }
}
