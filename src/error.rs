//! Error types for the cache layer.

use axum::http::StatusCode;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CacheError {
    #[error("key is required")]
    EmptyKey,

    #[error("no such group: {0}")]
    GroupNotFound(String),

    /// Origin loader failure, surfaced exactly as the loader reported it.
    #[error(transparent)]
    Loader(anyhow::Error),

    #[error("peer {peer} failed: {reason}")]
    Peer { peer: String, reason: String },

    #[error("group '{0}' has no loader")]
    MissingLoader(String),

    #[error("group '{0}' is already registered")]
    DuplicateGroup(String),

    #[error("peers already registered for group '{0}'")]
    PeersAlreadyRegistered(String),

    #[error("codec error: {0}")]
    Codec(#[from] bincode::Error),

    #[error("bad request: {0}")]
    BadRequest(String),
}

impl CacheError {
    pub fn peer(peer: impl Into<String>, reason: impl ToString) -> Self {
        Self::Peer {
            peer: peer.into(),
            reason: reason.to_string(),
        }
    }

    /// HTTP status used when this error answers a request.
    pub fn status_code(&self) -> StatusCode {
        match self {
            CacheError::EmptyKey | CacheError::BadRequest(_) => StatusCode::BAD_REQUEST,
            CacheError::GroupNotFound(_) => StatusCode::NOT_FOUND,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

pub type Result<T> = std::result::Result<T, CacheError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_codes() {
        assert_eq!(CacheError::EmptyKey.status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(
            CacheError::GroupNotFound("scores".to_string()).status_code(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            CacheError::Loader(anyhow::anyhow!("boom")).status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
        assert_eq!(
            CacheError::peer("http://a", "timeout").status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_loader_error_is_verbatim() {
        let err = CacheError::Loader(anyhow::anyhow!("Tom not exist"));
        assert_eq!(err.to_string(), "Tom not exist");
    }
}
