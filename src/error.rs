// src/error.rs
use thiserror::Error;

/// Why a fetch for a spreadsheet did not produce a payload.
///
/// Cloneable so it can ride along in UI messages and stay in the coordinator's
/// error state after the message that carried it is gone.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FetchError {
    #[error("request to {url} failed: {message}")]
    Transport { url: String, message: String },
    #[error("server answered HTTP {status} for {url}")]
    Status { url: String, status: u16 },
    #[error("spreadsheet id {0:?} cannot be used as a path segment")]
    InvalidIdentifier(String),
    #[error("no response from {url} within {timeout_ms} ms")]
    Timeout { url: String, timeout_ms: u64 },
    #[error("malformed payload: {0}")]
    Malformed(#[from] PayloadError),
}

/// Ways a response body can fail to be a list of scalar rows.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PayloadError {
    #[error("invalid JSON: {0}")]
    Json(String),
    #[error("expected an array of rows, found {0}")]
    NotARowList(&'static str),
    #[error("row {row} is {found}, expected an array or an object")]
    InvalidRow { row: usize, found: &'static str },
    #[error("cell at row {row}, column {column} is {found}, expected a scalar")]
    NestedCell {
        row: usize,
        column: usize,
        found: &'static str,
    },
    #[error("row {row} mixes array and object row shapes")]
    MixedRowShapes { row: usize },
}

impl From<serde_json::Error> for PayloadError {
    fn from(err: serde_json::Error) -> Self {
        PayloadError::Json(err.to_string())
    }
}
