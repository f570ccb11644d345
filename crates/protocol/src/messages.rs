use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Request payloads
// ---------------------------------------------------------------------------

/// Starts a new upload session.
///
/// `file_hash` is the lowercase hex SHA-256 of the whole file; the server
/// uses it to verify the assembled upload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InitiateUploadRequest {
    pub file_name: String,
    pub file_size: u64,
    pub file_hash: String,
    pub expiry: String,
}

/// Finalizes an upload session.
///
/// The server checks that all `total_chunks` chunks arrived before
/// assembling the file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FinalizeUploadRequest {
    pub upload_id: String,
    pub total_chunks: u32,
}

// ---------------------------------------------------------------------------
// Response payloads
// ---------------------------------------------------------------------------

/// Response to `initiate`: the session token and the server-chosen chunk size.
///
/// `chunk_size` is signed on the wire; the client validates it is positive
/// before deriving a chunk plan from it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InitiateUploadResponse {
    pub upload_id: String,
    pub chunk_size: i64,
}

/// Response to `finalize`: the shareable artifact descriptor.
///
/// All three fields are required; a response missing any of them is a
/// malformed server reply.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FinalizeUploadResponse {
    pub file_name: String,
    pub link: String,
    pub delete_date: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn initiate_request_field_names() {
        let req = InitiateUploadRequest {
            file_name: "backup.zip".into(),
            file_size: 10_485_760,
            file_hash: "ab".repeat(32),
            expiry: "1d".into(),
        };
        let json = serde_json::to_string(&req).unwrap();
        assert!(json.contains("\"fileName\":\"backup.zip\""));
        assert!(json.contains("\"fileSize\":10485760"));
        assert!(json.contains("\"fileHash\""));
        assert!(json.contains("\"expiry\":\"1d\""));
        let parsed: InitiateUploadRequest = serde_json::from_str(&json).unwrap();
        assert_eq!(req, parsed);
    }

    #[test]
    fn initiate_response_parses_server_json() {
        let json = r#"{"uploadId":"abc-123","chunkSize":3145728}"#;
        let resp: InitiateUploadResponse = serde_json::from_str(json).unwrap();
        assert_eq!(resp.upload_id, "abc-123");
        assert_eq!(resp.chunk_size, 3_145_728);
    }

    #[test]
    fn initiate_response_missing_chunk_size_is_error() {
        let json = r#"{"uploadId":"abc-123"}"#;
        assert!(serde_json::from_str::<InitiateUploadResponse>(json).is_err());
    }

    #[test]
    fn finalize_request_field_names() {
        let req = FinalizeUploadRequest {
            upload_id: "abc-123".into(),
            total_chunks: 4,
        };
        let json = serde_json::to_string(&req).unwrap();
        assert!(json.contains("\"uploadId\":\"abc-123\""));
        assert!(json.contains("\"totalChunks\":4"));
    }

    #[test]
    fn finalize_response_parses_server_json() {
        let json = r#"{"fileName":"backup.zip","link":"https://fs.example/d/xyz","deleteDate":"2026-09-01"}"#;
        let resp: FinalizeUploadResponse = serde_json::from_str(json).unwrap();
        assert_eq!(resp.file_name, "backup.zip");
        assert_eq!(resp.link, "https://fs.example/d/xyz");
        assert_eq!(resp.delete_date, "2026-09-01");
    }

    #[test]
    fn finalize_response_missing_link_is_error() {
        let json = r#"{"fileName":"backup.zip","deleteDate":"2026-09-01"}"#;
        assert!(serde_json::from_str::<FinalizeUploadResponse>(json).is_err());
    }
}
