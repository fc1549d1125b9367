//! Error types for the deVirgo proof engine.

/// Main error types for the library.
///
/// Verification never produces one of these: a bad proof is a `false`, not an error.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// No suitable group could be found within the bounded search.
    ///
    /// Callers may retry, possibly with a larger bit length.
    #[error("Parameter generation failed: {0}")]
    ParameterGeneration(String),

    /// The secure random source failed. Never retried internally.
    #[error("Secure randomness unavailable: {0}")]
    EntropyUnavailable(String),

    /// Invalid group parameters or configuration were provided.
    #[error("Invalid group parameters: {0}")]
    InvalidParams(String),

    /// A scalar value is invalid or out of range.
    #[error("Invalid scalar: {0}")]
    InvalidScalar(String),

    /// A group element is invalid or not in the correct subgroup.
    #[error("Invalid group element: {0}")]
    InvalidGroupElement(String),

    /// Proof bytes could not be decoded.
    #[error("Invalid proof encoding: {0}")]
    InvalidProof(String),

    /// Reading or writing a persisted value failed.
    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl From<rand_core::Error> for Error {
    fn from(err: rand_core::Error) -> Self {
        Error::EntropyUnavailable(err.to_string())
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::Serialization(err.to_string())
    }
}
