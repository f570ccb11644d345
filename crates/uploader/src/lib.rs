//! Chunked upload orchestrator.
//!
//! Drives one file through the strict phase sequence
//! hash, initiate, transmit, finalize. Transmission fans the chunk plan
//! out across a bounded worker pool; a single chunk failure stops
//! scheduling and the upload fails without finalizing.
//!
//! The network seam is the [`UploadApi`] trait, implemented for the real
//! HTTP client pair by [`RemoteUploadApi`] and by mocks in tests.

mod api;
mod orchestrator;

use std::path::PathBuf;

use filesharer_api_client::ApiError;

pub use api::{RemoteUploadApi, UploadApi};
pub use filesharer_protocol::FinalizeUploadResponse;
pub use orchestrator::{FileDescriptor, UploadEvent, UploadOrchestrator};

/// Errors produced by an upload run, one variant per failing phase.
#[derive(Debug, thiserror::Error)]
pub enum UploadError {
    #[error("not a regular file: {}", .0.display())]
    NotAFile(PathBuf),

    #[error("file error: {0}")]
    Io(#[from] std::io::Error),

    #[error("hashing failed: {0}")]
    Hash(#[source] filesharer_transfer::TransferError),

    #[error("session negotiation failed: {0}")]
    Session(#[source] ApiError),

    #[error("chunk {number} failed: {source}")]
    Chunk {
        number: u32,
        #[source]
        source: ApiError,
    },

    #[error("finalize failed: {0}")]
    Finalize(#[source] ApiError),

    #[error("task join error: {0}")]
    Join(String),
}
