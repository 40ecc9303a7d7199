use std::fmt;

use thiserror::Error;

use super::signer::SignerError;

/// Token section that failed to serialize.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Part {
    Header,
    Claim,
}

impl fmt::Display for Part {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Part::Header => write!(f, "header"),
            Part::Claim => write!(f, "claim"),
        }
    }
}

/// Reasons a token could not be encoded or was rejected when decoding.
///
/// Every variant is terminal. Messages never include the secret, signatures or raw claim bytes.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum TokenError {
    #[error("unable to serialize {0}: `{1}`")]
    SerializationFailed(Part, String),
    #[error("malformed token: `{0}`")]
    Malformed(String),
    #[error("signature verification failed")]
    SignatureInvalid,
    #[error("algorithm mismatch: expected `{expected}`, found `{found}`")]
    AlgorithmMismatch { expected: String, found: String },
    #[error("token expired at `{expired_at}` (now `{now}`)")]
    Expired { expired_at: i64, now: i64 },
    #[error("signing token: `{0}`")]
    Signing(#[from] SignerError),
}

impl TokenError {
    pub(crate) fn malformed(reason: impl Into<String>) -> Self {
        TokenError::Malformed(reason.into())
    }
}
