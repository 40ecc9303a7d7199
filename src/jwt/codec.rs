use std::fmt;
use std::marker::PhantomData;

use base64::{Engine, engine::general_purpose::URL_SAFE_NO_PAD};
use serde::{Serialize, de::DeserializeOwned};
use tracing::debug;

use super::claims::Claim;
use super::error::{Part, TokenError};
use super::header::Header;
use super::signer::{HmacSigner, Signer};
use crate::clock::{Clock, SystemClock};
use crate::secret::Secret;

const SEPARATOR: char = '.';

/// Encodes and decodes compact tokens carrying claims of type `C`.
///
/// The signer and the secret are bound at construction. The `alg` header of incoming tokens is
/// only cross-checked against the bound signer, it never selects the verification algorithm.
pub struct TokenCodec<'s, C, S = HmacSigner, K = SystemClock> {
    signer: S,
    secret: &'s Secret,
    clock: K,
    claim: PhantomData<fn() -> C>,
}

impl<'s, C, S> TokenCodec<'s, C, S, SystemClock>
where
    S: Signer,
{
    pub fn new(signer: S, secret: &'s Secret) -> Self {
        Self {
            signer,
            secret,
            clock: SystemClock,
            claim: PhantomData,
        }
    }
}

impl<'s, C, S, K> TokenCodec<'s, C, S, K>
where
    S: Signer,
    K: Clock,
{
    /// Replaces the clock used to check expiration.
    pub fn with_clock<T: Clock>(self, clock: T) -> TokenCodec<'s, C, S, T> {
        TokenCodec {
            signer: self.signer,
            secret: self.secret,
            clock,
            claim: PhantomData,
        }
    }

    pub fn signer(&self) -> &S {
        &self.signer
    }
}

impl<C, S, K> TokenCodec<'_, C, S, K>
where
    C: Claim + Serialize + DeserializeOwned,
    S: Signer,
    K: Clock,
{
    /// Serializes and signs `claim` into `<header>.<claim>.<signature>`.
    pub fn encode(&self, claim: &C) -> Result<String, TokenError> {
        let header = serde_json::to_vec(&Header::new(self.signer.algorithm_id()))
            .map_err(|e| TokenError::SerializationFailed(Part::Header, e.to_string()))?;
        let payload = serde_json::to_vec(claim)
            .map_err(|e| TokenError::SerializationFailed(Part::Claim, e.to_string()))?;

        let signed = format!(
            "{}{SEPARATOR}{}",
            URL_SAFE_NO_PAD.encode(header),
            URL_SAFE_NO_PAD.encode(payload)
        );
        let signature = self
            .signer
            .sign(signed.as_bytes(), self.secret.as_bytes())?;

        debug!(algorithm = self.signer.algorithm_id(), "token encoded");
        Ok(format!("{signed}{SEPARATOR}{}", URL_SAFE_NO_PAD.encode(signature)))
    }

    /// Verifies `token` and returns its claims if the signature matches and it has not expired.
    pub fn decode(&self, token: &str) -> Result<C, TokenError> {
        self.verify(token)
            .inspect(|_| debug!(algorithm = self.signer.algorithm_id(), "token verified"))
            .inspect_err(|e| {
                debug!(
                    algorithm = self.signer.algorithm_id(),
                    "token rejected: {e}"
                )
            })
    }

    fn verify(&self, token: &str) -> Result<C, TokenError> {
        let segments = Segments::split(token)?;

        let signature = URL_SAFE_NO_PAD
            .decode(segments.signature)
            .map_err(|e| TokenError::malformed(format!("decoding signature: {e}")))?;

        if !self.signer.verify(
            segments.signed.as_bytes(),
            &signature,
            self.secret.as_bytes(),
        ) {
            return Err(TokenError::SignatureInvalid);
        }

        self.check_header(segments.header)?;

        let payload = URL_SAFE_NO_PAD
            .decode(segments.payload)
            .map_err(|e| TokenError::malformed(format!("decoding claim: {e}")))?;
        let claim: C = serde_json::from_slice(&payload)
            .map_err(|e| TokenError::malformed(format!("invalid claim: {e}")))?;

        let now = self.clock.now();
        let expired_at = claim.expires_at();
        if expired_at <= now {
            return Err(TokenError::Expired { expired_at, now });
        }

        Ok(claim)
    }

    fn check_header(&self, encoded: &str) -> Result<(), TokenError> {
        let bytes = URL_SAFE_NO_PAD
            .decode(encoded)
            .map_err(|e| TokenError::malformed(format!("decoding header: {e}")))?;
        let header: Header = serde_json::from_slice(&bytes)
            .map_err(|e| TokenError::malformed(format!("invalid header: {e}")))?;

        let expected = self.signer.algorithm_id();
        if header.alg != expected {
            return Err(TokenError::AlgorithmMismatch {
                expected: expected.to_string(),
                found: header.alg,
            });
        }
        Ok(())
    }
}

impl<C, S, K> fmt::Debug for TokenCodec<'_, C, S, K>
where
    S: Signer,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TokenCodec")
            .field("algorithm", &self.signer.algorithm_id())
            .field("secret", self.secret)
            .finish_non_exhaustive()
    }
}

/// The three segments of a compact token, borrowed from the input.
struct Segments<'t> {
    /// `<header>.<claim>`, exactly as received.
    signed: &'t str,
    header: &'t str,
    payload: &'t str,
    signature: &'t str,
}

impl<'t> Segments<'t> {
    fn split(token: &'t str) -> Result<Self, TokenError> {
        let mut parts = token.split(SEPARATOR);
        match (parts.next(), parts.next(), parts.next(), parts.next()) {
            (Some(header), Some(payload), Some(signature), None) => {
                for segment in [header, payload, signature] {
                    if !is_base64url(segment) {
                        return Err(TokenError::malformed(
                            "segments must be non-empty unpadded base64url",
                        ));
                    }
                }
                Ok(Self {
                    signed: &token[..header.len() + SEPARATOR.len_utf8() + payload.len()],
                    header,
                    payload,
                    signature,
                })
            }
            _ => Err(TokenError::malformed("expected three dot-separated segments")),
        }
    }
}

// A length of 1 modulo 4 cannot come out of a base64 encoder.
fn is_base64url(segment: &str) -> bool {
    !segment.is_empty()
        && segment.len() % 4 != 1
        && segment
            .bytes()
            .all(|b| b.is_ascii_alphanumeric() || b == b'-' || b == b'_')
}
