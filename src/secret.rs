use std::fmt;

/// Shared secret used as HMAC key material.
///
/// Its contents are never printed: `Debug` is redacted and there is no `Display` nor `Serialize`.
#[derive(Clone, PartialEq, Eq)]
pub struct Secret(Vec<u8>);

impl<S: AsRef<[u8]>> From<S> for Secret {
    fn from(secret: S) -> Self {
        Secret(secret.as_ref().to_vec())
    }
}

impl Secret {
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Debug for Secret {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Secret(<redacted>)")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn debug_is_redacted() {
        let secret = Secret::from("supersecret");
        let printed = format!("{secret:?}");
        assert!(!printed.contains("supersecret"));
        assert_eq!(printed, "Secret(<redacted>)");
    }

    #[test]
    fn from_bytes_and_str() {
        assert_eq!(Secret::from(b"abc"), Secret::from("abc"));
        assert_eq!(Secret::from(vec![1u8, 2, 3]).as_bytes(), &[1, 2, 3]);
        assert!(Secret::from("").is_empty());
    }
}
