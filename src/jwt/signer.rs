use std::fmt;
use std::str::FromStr;

use thiserror::Error;

pub mod hmac;

pub use self::hmac::HmacSigner;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum SignerError {
    #[error("unsupported algorithm: `{0}`")]
    UnsupportedAlgorithm(String),
    #[error("initializing keyed hash: `{0}`")]
    InvalidKey(String),
}

/// Produces and checks message authentication codes for a given algorithm.
///
/// Implementations must be deterministic and must compare signatures in constant time.
/// The token codec is generic over this trait, so new algorithms are added by implementing it.
#[cfg_attr(test, mockall::automock)]
pub trait Signer {
    /// Identifier written into the `alg` field of the token header.
    fn algorithm_id(&self) -> &'static str;

    /// Computes the authentication tag of `message` keyed by `secret`.
    fn sign(&self, message: &[u8], secret: &[u8]) -> Result<Vec<u8>, SignerError>;

    /// Recomputes the tag of `message` and checks it against `signature`.
    ///
    /// A mismatch is reported as `false`, never as an error.
    fn verify(&self, message: &[u8], signature: &[u8], secret: &[u8]) -> bool;
}

/// Keyed-hash algorithms supported by [HmacSigner].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Algorithm {
    /// HMAC using SHA-256
    HS256,
    /// HMAC using SHA-384
    HS384,
    /// HMAC using SHA-512
    HS512,
}

impl Algorithm {
    pub const ALL: [Algorithm; 3] = [Algorithm::HS256, Algorithm::HS384, Algorithm::HS512];

    pub const fn as_str(&self) -> &'static str {
        match self {
            Algorithm::HS256 => "HS256",
            Algorithm::HS384 => "HS384",
            Algorithm::HS512 => "HS512",
        }
    }

    /// Length in bytes of the tags produced by this algorithm.
    pub const fn output_len(&self) -> usize {
        match self {
            Algorithm::HS256 => 32,
            Algorithm::HS384 => 48,
            Algorithm::HS512 => 64,
        }
    }
}

impl fmt::Display for Algorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Algorithm {
    type Err = SignerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Algorithm::ALL
            .into_iter()
            .find(|alg| alg.as_str() == s)
            .ok_or_else(|| SignerError::UnsupportedAlgorithm(s.to_string()))
    }
}
