use std::path::PathBuf;

use thiserror::Error;

/// Failure of a single upstream catalog call.
///
/// Cloneable so it can travel inside `Message` back to the update loop.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ApiError {
    #[error("network error: {0}")]
    Network(String),

    #[error("HTTP error: status {0}")]
    Status(u16),

    #[error("resource not found")]
    NotFound,

    #[error("rate limited by upstream")]
    RateLimit,

    #[error("parse error: {0}")]
    Parse(String),
}

impl From<reqwest::Error> for ApiError {
    fn from(error: reqwest::Error) -> Self {
        if error.is_decode() {
            ApiError::Parse(error.to_string())
        } else {
            ApiError::Network(error.to_string())
        }
    }
}

impl From<serde_json::Error> for ApiError {
    fn from(error: serde_json::Error) -> Self {
        ApiError::Parse(error.to_string())
    }
}

#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid settings JSON: {0}")]
    Json(#[from] serde_json::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn json_errors_map_to_parse() {
        let err = serde_json::from_str::<u32>("not json").unwrap_err();
        assert!(matches!(ApiError::from(err), ApiError::Parse(_)));
    }

    #[test]
    fn display_includes_status_code() {
        assert_eq!(ApiError::Status(502).to_string(), "HTTP error: status 502");
    }
}
