//! P-256 ECDSA (ES256) key generation and signing
//!
//! COSE algorithm identifier: -7 (ES256)
//! Spec: <https://www.rfc-editor.org/rfc/rfc8152.html#section-8.1>
//!
//! ES256 uses:
//! - Curve: P-256 (secp256r1 / prime256v1)
//! - Hash: SHA-256
//! - Signature format: raw (r || s) here, DER via [`crate::der`]

use crate::error::{CryptoError, Result};
use crate::jwk::{EcKeyPair, EcPrivateKey, EcPublicKey};

use p256::ecdsa::{Signature, SigningKey, VerifyingKey, signature::Signer, signature::Verifier};
use rand::rngs::OsRng;
use zeroize::Zeroizing;

/// COSE algorithm identifier for ES256
pub const COSE_ALG_ES256: i32 = -7;

/// Generate a new random ES256 key pair
///
/// # Examples
///
/// ```
/// use passkey_crypto::ecdsa;
///
/// let pair = ecdsa::generate_keypair().unwrap();
/// assert_eq!(pair.public.x().len(), 32);
/// assert_ne!(pair.private.scalar(), &[0u8; 32]);
/// ```
pub fn generate_keypair() -> Result<EcKeyPair> {
    let signing_key = SigningKey::random(&mut OsRng);
    let scalar = Zeroizing::new(<[u8; 32]>::from(signing_key.to_bytes()));
    let public = public_key_of(&signing_key)?;

    Ok(EcKeyPair {
        private: EcPrivateKey::from_parts(scalar, public.clone()),
        public,
    })
}

/// Sign `data` with ES256 and return the raw 64-byte `r || s`
///
/// The data is hashed with SHA-256 internally by the signing operation.
///
/// # Examples
///
/// ```
/// use passkey_crypto::ecdsa;
///
/// let pair = ecdsa::generate_keypair().unwrap();
/// let signature = ecdsa::sign_raw(pair.private.scalar(), b"Hello, WebAuthn!").unwrap();
/// assert_eq!(signature.len(), 64);
/// ```
pub fn sign_raw(scalar: &[u8; 32], data: &[u8]) -> Result<[u8; 64]> {
    let signing_key =
        SigningKey::from_bytes(scalar.into()).map_err(|_| CryptoError::InvalidPrivateKey)?;

    let signature: Signature = signing_key
        .try_sign(data)
        .map_err(|_| CryptoError::SigningFailed)?;

    Ok(signature.to_bytes().into())
}

/// Verify a raw ES256 signature against a public key
///
/// The authenticator never verifies its own output; this exists so callers
/// and tests can check what was produced.
pub fn verify_raw(public_key: &EcPublicKey, data: &[u8], signature: &[u8; 64]) -> Result<()> {
    let verifying_key = VerifyingKey::from_sec1_bytes(&public_key.to_sec1_uncompressed())
        .map_err(|_| CryptoError::InvalidPublicKey)?;

    let sig = Signature::from_bytes(signature.into()).map_err(|_| CryptoError::InvalidSignature)?;

    verifying_key
        .verify(data, &sig)
        .map_err(|_| CryptoError::InvalidSignature)
}

/// Derive the public point for a private scalar
pub fn public_from_private(scalar: &[u8; 32]) -> Result<EcPublicKey> {
    let signing_key =
        SigningKey::from_bytes(scalar.into()).map_err(|_| CryptoError::InvalidPrivateKey)?;
    public_key_of(&signing_key)
}

fn public_key_of(signing_key: &SigningKey) -> Result<EcPublicKey> {
    // Uncompressed SEC1: 0x04 || x || y
    let point = signing_key.verifying_key().to_encoded_point(false);
    EcPublicKey::from_sec1_uncompressed(point.as_bytes())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_keypair_generation() {
        let pair = generate_keypair().unwrap();

        assert_ne!(pair.private.scalar(), &[0u8; 32]);
        assert_eq!(pair.private.public_key(), &pair.public);
    }

    #[test]
    fn test_sign_and_verify() {
        let pair = generate_keypair().unwrap();
        let message = b"Hello, WebAuthn!";

        let signature = sign_raw(pair.private.scalar(), message).unwrap();
        assert!(verify_raw(&pair.public, message, &signature).is_ok());
    }

    #[test]
    fn test_verify_wrong_message() {
        let pair = generate_keypair().unwrap();

        let signature = sign_raw(pair.private.scalar(), b"Hello, WebAuthn!").unwrap();
        assert_eq!(
            verify_raw(&pair.public, b"Wrong message", &signature),
            Err(CryptoError::InvalidSignature)
        );
    }

    #[test]
    fn test_verify_wrong_public_key() {
        let pair = generate_keypair().unwrap();
        let other = generate_keypair().unwrap();

        let signature = sign_raw(pair.private.scalar(), b"message").unwrap();
        assert!(verify_raw(&other.public, b"message", &signature).is_err());
    }

    #[test]
    fn test_public_from_private_is_deterministic() {
        let scalar = [42u8; 32];

        let pub1 = public_from_private(&scalar).unwrap();
        let pub2 = public_from_private(&scalar).unwrap();
        assert_eq!(pub1, pub2);
    }

    #[test]
    fn test_invalid_private_key() {
        // All zeros is not a valid scalar
        let invalid_key = [0u8; 32];
        assert_eq!(sign_raw(&invalid_key, b"test"), Err(CryptoError::InvalidPrivateKey));
        assert_eq!(public_from_private(&invalid_key), Err(CryptoError::InvalidPrivateKey));
    }
}
