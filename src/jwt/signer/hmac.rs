use ::hmac::digest::KeyInit;
use ::hmac::{Hmac, Mac};
use sha2::{Sha256, Sha384, Sha512};

use super::{Algorithm, Signer, SignerError};

/// Signer based on HMAC over the SHA-2 family.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HmacSigner {
    algorithm: Algorithm,
}

impl HmacSigner {
    pub fn new(algorithm: Algorithm) -> Self {
        Self { algorithm }
    }

    pub fn hs256() -> Self {
        Self::new(Algorithm::HS256)
    }

    pub fn hs384() -> Self {
        Self::new(Algorithm::HS384)
    }

    pub fn hs512() -> Self {
        Self::new(Algorithm::HS512)
    }

    pub fn algorithm(&self) -> Algorithm {
        self.algorithm
    }
}

impl From<Algorithm> for HmacSigner {
    fn from(algorithm: Algorithm) -> Self {
        Self::new(algorithm)
    }
}

impl Signer for HmacSigner {
    fn algorithm_id(&self) -> &'static str {
        self.algorithm.as_str()
    }

    fn sign(&self, message: &[u8], secret: &[u8]) -> Result<Vec<u8>, SignerError> {
        match self.algorithm {
            Algorithm::HS256 => tag::<Hmac<Sha256>>(message, secret),
            Algorithm::HS384 => tag::<Hmac<Sha384>>(message, secret),
            Algorithm::HS512 => tag::<Hmac<Sha512>>(message, secret),
        }
    }

    fn verify(&self, message: &[u8], signature: &[u8], secret: &[u8]) -> bool {
        match self.algorithm {
            Algorithm::HS256 => check::<Hmac<Sha256>>(message, signature, secret),
            Algorithm::HS384 => check::<Hmac<Sha384>>(message, signature, secret),
            Algorithm::HS512 => check::<Hmac<Sha512>>(message, signature, secret),
        }
    }
}

fn keyed<M>(message: &[u8], secret: &[u8]) -> Result<M, SignerError>
where
    M: Mac + KeyInit,
{
    let mut mac = <M as KeyInit>::new_from_slice(secret)
        .map_err(|e| SignerError::InvalidKey(e.to_string()))?;
    mac.update(message);
    Ok(mac)
}

fn tag<M>(message: &[u8], secret: &[u8]) -> Result<Vec<u8>, SignerError>
where
    M: Mac + KeyInit,
{
    Ok(keyed::<M>(message, secret)?.finalize().into_bytes().to_vec())
}

// `verify_slice` compares in constant time and rejects length mismatches up front.
fn check<M>(message: &[u8], signature: &[u8], secret: &[u8]) -> bool
where
    M: Mac + KeyInit,
{
    keyed::<M>(message, secret).is_ok_and(|mac| mac.verify_slice(signature).is_ok())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    const MESSAGE: &[u8] = b"eyJhbGciOiJIUzI1NiIsInR5cCI6IkpXVCJ9.eyJzdWIiOiIxMjM0NTY3ODkwIn0";
    const SECRET: &[u8] = b"your-256-bit-secret";

    #[rstest]
    #[case(Algorithm::HS256)]
    #[case(Algorithm::HS384)]
    #[case(Algorithm::HS512)]
    fn sign_and_verify(#[case] algorithm: Algorithm) {
        let signer = HmacSigner::new(algorithm);
        let signature = signer.sign(MESSAGE, SECRET).unwrap();

        assert_eq!(signature.len(), algorithm.output_len());
        assert!(signer.verify(MESSAGE, &signature, SECRET));
    }

    #[rstest]
    #[case(Algorithm::HS256)]
    #[case(Algorithm::HS384)]
    #[case(Algorithm::HS512)]
    fn sign_is_deterministic(#[case] algorithm: Algorithm) {
        let signer = HmacSigner::new(algorithm);
        assert_eq!(
            signer.sign(MESSAGE, SECRET).unwrap(),
            signer.sign(MESSAGE, SECRET).unwrap()
        );
    }

    #[rstest]
    #[case(Algorithm::HS256)]
    #[case(Algorithm::HS384)]
    #[case(Algorithm::HS512)]
    fn verify_rejects_wrong_secret(#[case] algorithm: Algorithm) {
        let signer = HmacSigner::new(algorithm);
        let signature = signer.sign(MESSAGE, SECRET).unwrap();
        assert!(!signer.verify(MESSAGE, &signature, b"wrong-secret"));
    }

    #[test]
    fn verify_rejects_tampered_message() {
        let signer = HmacSigner::hs256();
        let signature = signer.sign(MESSAGE, SECRET).unwrap();
        assert!(!signer.verify(b"eyJhbGciOiJIUzI1NiJ9.e30", &signature, SECRET));
    }

    #[test]
    fn verify_rejects_truncated_and_extended_signatures() {
        let signer = HmacSigner::hs512();
        let signature = signer.sign(MESSAGE, SECRET).unwrap();

        let mut extended = signature.clone();
        extended.push(0);

        assert!(!signer.verify(MESSAGE, &signature[..signature.len() - 1], SECRET));
        assert!(!signer.verify(MESSAGE, &extended, SECRET));
        assert!(!signer.verify(MESSAGE, &[], SECRET));
    }

    #[test]
    fn verify_rejects_signature_from_other_width() {
        let signature = HmacSigner::hs256().sign(MESSAGE, SECRET).unwrap();
        assert!(!HmacSigner::hs384().verify(MESSAGE, &signature, SECRET));
        assert!(!HmacSigner::hs512().verify(MESSAGE, &signature, SECRET));
    }

    #[test]
    fn empty_secret_is_accepted() {
        let signer = HmacSigner::hs256();
        let signature = signer.sign(MESSAGE, b"").unwrap();
        assert!(signer.verify(MESSAGE, &signature, b""));
    }

    #[test]
    fn algorithm_ids() {
        assert_eq!(HmacSigner::hs256().algorithm_id(), "HS256");
        assert_eq!(HmacSigner::hs384().algorithm_id(), "HS384");
        assert_eq!(HmacSigner::hs512().algorithm_id(), "HS512");
    }

    // RFC 4231, test case 2.
    #[test]
    fn rfc4231_known_answer() {
        let signature = HmacSigner::hs256()
            .sign(b"what do ya want for nothing?", b"Jefe")
            .unwrap();
        let expected = [
            0x5b, 0xdc, 0xc1, 0x46, 0xbf, 0x60, 0x75, 0x4e, 0x6a, 0x04, 0x24, 0x26, 0x08, 0x95,
            0x75, 0xc7, 0x5a, 0x00, 0x3f, 0x08, 0x9d, 0x27, 0x39, 0x83, 0x9d, 0xec, 0x58, 0xb9,
            0x64, 0xec, 0x38, 0x43,
        ];
        assert_eq!(signature, expected);
    }
}
