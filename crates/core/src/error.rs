//! Error types for the duplex detection engine.

use thiserror::Error;

/// Primary error type for a `compare` invocation.
#[derive(Error, Debug)]
pub enum DuplexError {
    #[error("invalid parameter {which}: {detail}")]
    InvalidParam { which: &'static str, detail: String },

    #[error("document {which:?} yielded no paragraphs after normalization")]
    EmptyDocument { which: DocumentSlot },

    #[error("extractor failed for document {which:?}: {cause}")]
    ExtractorError { which: DocumentSlot, cause: String },

    #[error("comparison was cancelled")]
    Cancelled,

    #[error("internal invariant violation: {detail}")]
    Internal { detail: String },
}

/// Identifies which of the two compared documents an error refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentSlot {
    A,
    B,
}

/// Convenience `Result` alias for `DuplexError`.
pub type Result<T> = std::result::Result<T, DuplexError>;
