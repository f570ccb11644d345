use std::path::{Path, PathBuf};

use filesharer_transfer::ChunkSpec;
use reqwest::multipart::{Form, Part};
use tracing::trace;

use crate::ApiError;

/// Transmits one file chunk per call.
///
/// Each call opens its own read handle on the shared file (positioned read
/// of exactly the chunk's byte range) and sends a single multipart request.
/// Stateless between calls, so any number of transmitter calls can run
/// concurrently against the same file.
pub struct ChunkTransmitter {
    http: reqwest::Client,
    base_url: String,
}

impl ChunkTransmitter {
    /// Creates a transmitter over an existing transport handle.
    pub fn new(http: reqwest::Client, base_url: impl Into<String>) -> Self {
        Self {
            http,
            base_url: base_url.into(),
        }
    }

    /// Reads and transmits the chunk described by `spec`.
    ///
    /// The multipart form carries the session id, the 1-based chunk number,
    /// and the raw chunk bytes. A short final chunk sends only the bytes
    /// the plan assigns it, never padding.
    pub async fn send(
        &self,
        path: &Path,
        upload_id: &str,
        spec: ChunkSpec,
    ) -> Result<(), ApiError> {
        // File I/O is blocking; keep it off the async workers.
        let data = tokio::task::spawn_blocking({
            let path = PathBuf::from(path);
            move || filesharer_transfer::read_chunk(&path, &spec)
        })
        .await
        .map_err(|e| ApiError::Join(e.to_string()))??;

        trace!(
            chunk = spec.number,
            offset = spec.offset,
            bytes = data.len(),
            "sending chunk"
        );

        let form = Form::new()
            .text("uploadId", upload_id.to_string())
            .text("chunkNumber", spec.number.to_string())
            .part("chunk", Part::bytes(data).file_name("chunk"));

        let url = format!("{}/api/v1/upload/chunk", self.base_url);
        let resp = self.http.post(&url).multipart(form).send().await?;
        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(ApiError::ChunkRejected {
                status: status.as_u16(),
                body,
            });
        }
        Ok(())
    }
}
