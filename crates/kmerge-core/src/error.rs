use thiserror::Error;

/// Canonical result for the merger core.
pub type Result<T> = std::result::Result<T, MergeError>;

#[derive(Debug, Error)]
pub enum MergeError {
    #[error("out of memory: failed to allocate {what} ({bytes} bytes)")]
    OutOfMemory { what: &'static str, bytes: usize },

    #[error("invalid key part: {0}")]
    InvalidKeyPart(String),

    #[error("invalid source: {0}")]
    InvalidSource(String),

    #[error("producer fault: {0}")]
    ProducerFault(#[source] Box<dyn std::error::Error + Send + Sync>),
}

impl MergeError {
    pub fn out_of_memory(what: &'static str, bytes: usize) -> Self {
        MergeError::OutOfMemory { what, bytes }
    }

    pub fn invalid_source(msg: impl Into<String>) -> Self {
        MergeError::InvalidSource(msg.into())
    }

    pub fn producer_fault(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        MergeError::ProducerFault(Box::new(err))
    }
}

impl From<std::collections::TryReserveError> for MergeError {
    fn from(_: std::collections::TryReserveError) -> Self {
        MergeError::OutOfMemory {
            what: "collection growth",
            bytes: 0,
        }
    }
}
