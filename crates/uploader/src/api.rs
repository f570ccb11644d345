//! The transport seam between the orchestrator and the HTTP client.
//!
//! `UploadApi` keeps the orchestrator decoupled from `reqwest` and
//! testable with mocks; `RemoteUploadApi` bridges it to the real
//! `SessionClient`/`ChunkTransmitter` pair.

use std::future::Future;
use std::path::{Path, PathBuf};
use std::pin::Pin;

use filesharer_api_client::{ApiError, ChunkTransmitter, SessionClient, UploadSession};
use filesharer_protocol::FinalizeUploadResponse;
use filesharer_transfer::ChunkSpec;

/// Abstract upload API.
///
/// One method per wire operation, one attempt per call. Implementations
/// must support concurrent `send_chunk` calls.
pub trait UploadApi: Send + Sync {
    /// Negotiates an upload session.
    fn initiate(
        &self,
        file_name: &str,
        file_size: u64,
        file_hash: &str,
        expiry: &str,
    ) -> Pin<Box<dyn Future<Output = Result<UploadSession, ApiError>> + Send + '_>>;

    /// Transmits one chunk of the file.
    fn send_chunk(
        &self,
        path: &Path,
        upload_id: &str,
        spec: ChunkSpec,
    ) -> Pin<Box<dyn Future<Output = Result<(), ApiError>> + Send + '_>>;

    /// Finalizes the session.
    fn finalize(
        &self,
        upload_id: &str,
        total_chunks: u32,
    ) -> Pin<Box<dyn Future<Output = Result<FinalizeUploadResponse, ApiError>> + Send + '_>>;
}

/// The real upload API over HTTP.
///
/// Both halves share the transport handle they are constructed with.
pub struct RemoteUploadApi {
    session: SessionClient,
    transmitter: ChunkTransmitter,
}

impl RemoteUploadApi {
    /// Creates the API pair over an existing transport handle.
    pub fn new(http: reqwest::Client, base_url: &str) -> Self {
        Self {
            session: SessionClient::new(http.clone(), base_url),
            transmitter: ChunkTransmitter::new(http, base_url),
        }
    }
}

impl UploadApi for RemoteUploadApi {
    fn initiate(
        &self,
        file_name: &str,
        file_size: u64,
        file_hash: &str,
        expiry: &str,
    ) -> Pin<Box<dyn Future<Output = Result<UploadSession, ApiError>> + Send + '_>> {
        let file_name = file_name.to_string();
        let file_hash = file_hash.to_string();
        let expiry = expiry.to_string();
        Box::pin(async move {
            self.session
                .initiate(&file_name, file_size, &file_hash, &expiry)
                .await
        })
    }

    fn send_chunk(
        &self,
        path: &Path,
        upload_id: &str,
        spec: ChunkSpec,
    ) -> Pin<Box<dyn Future<Output = Result<(), ApiError>> + Send + '_>> {
        let path = PathBuf::from(path);
        let upload_id = upload_id.to_string();
        Box::pin(async move { self.transmitter.send(&path, &upload_id, spec).await })
    }

    fn finalize(
        &self,
        upload_id: &str,
        total_chunks: u32,
    ) -> Pin<Box<dyn Future<Output = Result<FinalizeUploadResponse, ApiError>> + Send + '_>> {
        let upload_id = upload_id.to_string();
        Box::pin(async move { self.session.finalize(&upload_id, total_chunks).await })
    }
}
