use serde::{Deserialize, Serialize};

/// Failure of a request against the remote catalog API.
///
/// Carried inside actions, so it stays serializable and comparable.
#[derive(thiserror::Error, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum FetchError {
    #[error("request failed: {0}")]
    Request(String),
    #[error("{url} returned status {status}")]
    Status { url: String, status: u16 },
    #[error("response decode error: {0}")]
    Decode(String),
}

impl From<reqwest::Error> for FetchError {
    fn from(error: reqwest::Error) -> Self {
        match error.status() {
            Some(status) => FetchError::Status {
                url: error
                    .url()
                    .map(|url| url.to_string())
                    .unwrap_or_default(),
                status: status.as_u16(),
            },
            None => FetchError::Request(error.to_string()),
        }
    }
}

impl From<serde_json::Error> for FetchError {
    fn from(error: serde_json::Error) -> Self {
        FetchError::Decode(error.to_string())
    }
}

#[derive(thiserror::Error, Clone, Debug, PartialEq, Eq)]
pub enum ValidationError {
    #[error("missing id")]
    Missing,
    #[error("id is not a number: {0:?}")]
    NotNumeric(String),
    #[error("id {0} is outside 1..={max}", max = crate::navigator::MAX_ID)]
    OutOfRange(i64),
}

#[derive(thiserror::Error, Debug)]
pub enum StoreError {
    #[error("failed to access flag store {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("flag store {path} is corrupted: {source}")]
    Corrupted {
        path: String,
        #[source]
        source: serde_json::Error,
    },
}
