//! P-256 signing key for HAP request signatures
//!
//! Loads the raw 32-byte private key scalar handed out by the API
//! (url-safe base64) and signs signing strings with ES256. Holds no
//! mutable state, so one key is safe to share across concurrent calls.

use base64::{Engine, engine::general_purpose::URL_SAFE_NO_PAD};
use p256::ecdsa::{Signature, SigningKey, VerifyingKey, signature::Signer};

use crate::error::HapError;

/// ES256 (ECDSA P-256 / SHA-256) signing key for one agent identity.
#[derive(Debug)]
pub struct HapSigningKey {
    inner: SigningKey,
}

impl HapSigningKey {
    /// Load a key from a url-safe base64 string containing the raw
    /// 32-byte scalar. Padding is tolerated on input but never required.
    pub fn from_base64url(encoded: &str) -> Result<Self, HapError> {
        let raw = URL_SAFE_NO_PAD
            .decode(encoded.trim_end_matches('='))
            .map_err(|e| HapError::InvalidKeyEncoding(e.to_string()))?;

        if raw.len() != 32 {
            return Err(HapError::InvalidKeyLength { got: raw.len() });
        }

        let inner = SigningKey::from_bytes(raw.as_slice().into())
            .map_err(|e| HapError::InvalidKeyEncoding(e.to_string()))?;

        Ok(Self { inner })
    }

    /// Sign an arbitrary message, returning the raw 64-byte `r || s`
    /// signature. RFC 6979 deterministic; the server only checks that
    /// verification succeeds, so determinism is not relied on.
    pub fn sign(&self, message: &[u8]) -> Vec<u8> {
        let sig: Signature = self.inner.sign(message);
        sig.to_bytes().to_vec()
    }

    /// Public half of the key, for signature verification.
    pub fn verifying_key(&self) -> VerifyingKey {
        *self.inner.verifying_key()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use p256::ecdsa::signature::Verifier;

    fn b64url(bytes: &[u8]) -> String {
        URL_SAFE_NO_PAD.encode(bytes)
    }

    #[test]
    fn test_from_base64url_32_bytes() {
        // Any in-range scalar works; 0x07 repeated is far below the curve order
        let key = HapSigningKey::from_base64url(&b64url(&[7u8; 32]));
        assert!(key.is_ok());
    }

    #[test]
    fn test_from_base64url_tolerates_padding() {
        let padded = format!("{}=", b64url(&[7u8; 32]));
        assert!(HapSigningKey::from_base64url(&padded).is_ok());
    }

    #[test]
    fn test_rejects_short_key() {
        let err = HapSigningKey::from_base64url(&b64url(&[7u8; 31])).unwrap_err();
        match err {
            HapError::InvalidKeyLength { got } => assert_eq!(got, 31),
            other => panic!("expected InvalidKeyLength, got {}", other),
        }
    }

    #[test]
    fn test_rejects_long_key() {
        let err = HapSigningKey::from_base64url(&b64url(&[7u8; 33])).unwrap_err();
        match err {
            HapError::InvalidKeyLength { got } => assert_eq!(got, 33),
            other => panic!("expected InvalidKeyLength, got {}", other),
        }
    }

    #[test]
    fn test_rejects_garbage_base64() {
        let err = HapSigningKey::from_base64url("not!valid!b64").unwrap_err();
        assert!(matches!(err, HapError::InvalidKeyEncoding(_)));
    }

    #[test]
    fn test_sign_verify_round_trip() {
        let key = HapSigningKey::from_base64url(&b64url(&[7u8; 32])).unwrap();
        let sig_bytes = key.sign(b"GET\n/api/flights/search\n1700000000\nabc");
        assert_eq!(sig_bytes.len(), 64, "raw P-256 signature is r||s, 64 bytes");

        let sig = Signature::from_slice(&sig_bytes).unwrap();
        key.verifying_key()
            .verify(b"GET\n/api/flights/search\n1700000000\nabc", &sig)
            .expect("signature must verify against the signed message");
    }

    #[test]
    fn test_tampered_message_fails_verification() {
        let key = HapSigningKey::from_base64url(&b64url(&[7u8; 32])).unwrap();
        let sig_bytes = key.sign(b"POST\n/a\n1\nhash");
        let sig = Signature::from_slice(&sig_bytes).unwrap();
        assert!(
            key.verifying_key()
                .verify(b"POST\n/b\n1\nhash", &sig)
                .is_err()
        );
    }
}
