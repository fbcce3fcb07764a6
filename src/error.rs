use axum::http::StatusCode;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ChunkError {
    #[error("chunk size must be greater than zero")]
    InvalidChunkSize,
}

/// Failures a webhook invocation can end in.
///
/// Each variant is reported to the caller as a single JSON error; nothing is retried.
#[derive(Debug, Error)]
pub enum RelayError {
    #[error("malformed payload: {0}")]
    MalformedPayload(String),

    #[error("no workspace record found for email: {email}")]
    LookupNotFound { email: String },

    #[error("workspace query failed: {0}")]
    WorkspaceQuery(String),

    #[error("workspace write failed: {0}")]
    UpstreamWrite(String),

    #[error("failed to notify {recipient}: {reason}")]
    Notification { recipient: String, reason: String },

    #[error("rich text conversion failed: {0}")]
    Chunking(#[from] ChunkError),
}

impl RelayError {
    /// HTTP status returned to the webhook caller
    pub fn status_code(&self) -> StatusCode {
        match self {
            RelayError::LookupNotFound { .. } => StatusCode::NOT_FOUND,
            _ => StatusCode::BAD_REQUEST,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_found_maps_to_404() {
        let err = RelayError::LookupNotFound {
            email: "lead@example.com".to_string(),
        };
        assert_eq!(err.status_code(), StatusCode::NOT_FOUND);
        assert!(err.to_string().contains("lead@example.com"));
    }

    #[test]
    fn test_other_failures_map_to_400() {
        let errors = vec![
            RelayError::MalformedPayload("missing owner".to_string()),
            RelayError::WorkspaceQuery("timeout".to_string()),
            RelayError::UpstreamWrite("500".to_string()),
            RelayError::Notification {
                recipient: "5511999999999".to_string(),
                reason: "connection refused".to_string(),
            },
            RelayError::Chunking(ChunkError::InvalidChunkSize),
        ];

        for err in errors {
            assert_eq!(err.status_code(), StatusCode::BAD_REQUEST, "{}", err);
        }
    }
}
