//! Wire protocol types for the filesharer upload API.
//!
//! JSON payloads for the three upload endpoints (`initiate`, `chunk`,
//! `finalize`), serialized with camelCase field names to match the
//! server's API contract.

mod messages;

pub use messages::{
    FinalizeUploadRequest, FinalizeUploadResponse, InitiateUploadRequest, InitiateUploadResponse,
};
