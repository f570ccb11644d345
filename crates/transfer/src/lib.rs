//! Local file concerns for chunked uploads.
//!
//! Everything here is synchronous and network-free: streaming SHA-256
//! digests, the deterministic chunk plan, positioned chunk reads, and the
//! shared progress counter. The api-client crate wraps the blocking parts
//! in `spawn_blocking`.

mod digest;
mod plan;
mod progress;

pub use digest::{digest_bytes, file_digest};
pub use plan::{ChunkSpec, chunk_plan, read_chunk};
pub use progress::ProgressCounter;

/// Errors produced by the transfer crate.
#[derive(Debug, thiserror::Error)]
pub enum TransferError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("file is shorter than its chunk plan: expected {expected} bytes at offset {offset}, got {actual}")]
    ShortRead {
        offset: u64,
        expected: usize,
        actual: usize,
    },
}
