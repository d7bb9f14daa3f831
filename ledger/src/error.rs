use std::path::PathBuf;
use std::time::Duration;

use crate::abi::AbiError;

/// Failure of a single call against the remote product source.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum SourceError {
    #[error("transport error: {0}")]
    Transport(String),
    #[error("rpc error {code}: {message}")]
    Rpc { code: i64, message: String },
    #[error("malformed response: {0}")]
    Malformed(String),
    #[error("abi decode failed: {0}")]
    Abi(#[from] AbiError),
    #[error("no response within {0:?}")]
    Timeout(Duration),
    #[error("{0} is not supported by this source")]
    Unsupported(&'static str),
}

/// A record tuple that does not match the fixed product schema.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DecodeError {
    #[error("expected {expected} fields, found {found}")]
    Arity { expected: usize, found: usize },
    #[error("field {position} ({field}) should be {expected}, found {found}")]
    Kind {
        position: usize,
        field: &'static str,
        expected: &'static str,
        found: &'static str,
    },
    #[error("field {field} is out of range")]
    Overflow { field: &'static str },
    #[error(transparent)]
    Abi(#[from] AbiError),
}

/// Why a fetch produced no result. No variant carries partial data.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum FetchError {
    #[error("product count unavailable: {source}")]
    CountUnavailable { source: SourceError },
    #[error("record {index} unavailable: {source}")]
    RecordUnavailable { index: u64, source: SourceError },
    #[error("record {index} does not match the product schema: {source}")]
    DecodeMismatch { index: u64, source: DecodeError },
    #[error("product #{id} is not on the ledger")]
    NotFound { id: u64 },
    #[error("fetch superseded by a newer request")]
    Cancelled,
}

impl FetchError {
    /// Classify a failed record call. ABI-level garbage is a schema mismatch,
    /// everything else means the record could not be read.
    pub(crate) fn from_record(index: u64, source: SourceError) -> Self {
        match source {
            SourceError::Abi(e) => FetchError::DecodeMismatch {
                index,
                source: DecodeError::Abi(e),
            },
            source => FetchError::RecordUnavailable { index, source },
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read config {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("failed to parse config {path}: {source}")]
    Parse {
        path: PathBuf,
        source: serde_json::Error,
    },
    #[error("invalid config: {0}")]
    Invalid(String),
}
