//! Cryptographic provider capability
//!
//! The authenticator core never constructs provider-specific key handles.
//! It asks a [`CryptoProvider`] for key pairs, signatures, digests, MACs
//! and random bytes, and moves keys around only as [`EcPrivateKey`] /
//! [`Jwk`](crate::Jwk) values. Platforms with a native crypto API plug in
//! their own implementation; [`SoftwareCryptoProvider`] is the pure Rust one.

use crate::error::{CryptoError, Result};
use crate::jwk::{EcKeyPair, EcPrivateKey};
use crate::{ecdsa, hmac_sha256, sha256};

use rand::RngCore;
use rand::rngs::OsRng;

/// Operations the authenticator consumes from its platform
///
/// Implementations must be safe to share across threads; the core calls
/// them concurrently for independent credentials.
pub trait CryptoProvider: Send + Sync {
    /// Generate a fresh P-256 key pair
    fn generate_key_pair(&self) -> Result<EcKeyPair>;

    /// ECDSA/SHA-256 over `data`, returning raw `r || s`
    fn sign(&self, key: &EcPrivateKey, data: &[u8]) -> Result<[u8; 64]>;

    /// SHA-256 digest
    fn sha256(&self, data: &[u8]) -> [u8; 32];

    /// HMAC-SHA-256
    fn hmac_sha256(&self, key: &[u8], data: &[u8]) -> Result<[u8; 32]>;

    /// Fill `dest` from a cryptographically secure source
    fn fill_random(&self, dest: &mut [u8]) -> Result<()>;
}

/// Pure Rust provider: `p256` for ECDSA, `sha2`/`hmac` for digests, the OS RNG
#[derive(Debug, Clone, Copy, Default)]
pub struct SoftwareCryptoProvider;

impl SoftwareCryptoProvider {
    pub const fn new() -> Self {
        Self
    }
}

impl CryptoProvider for SoftwareCryptoProvider {
    fn generate_key_pair(&self) -> Result<EcKeyPair> {
        ecdsa::generate_keypair()
    }

    fn sign(&self, key: &EcPrivateKey, data: &[u8]) -> Result<[u8; 64]> {
        ecdsa::sign_raw(key.scalar(), data)
    }

    fn sha256(&self, data: &[u8]) -> [u8; 32] {
        sha256(data)
    }

    fn hmac_sha256(&self, key: &[u8], data: &[u8]) -> Result<[u8; 32]> {
        hmac_sha256(key, data)
    }

    fn fill_random(&self, dest: &mut [u8]) -> Result<()> {
        OsRng
            .try_fill_bytes(dest)
            .map_err(|_| CryptoError::RandomUnavailable)
    }
}

impl<P: CryptoProvider + ?Sized> CryptoProvider for &P {
    fn generate_key_pair(&self) -> Result<EcKeyPair> {
        (**self).generate_key_pair()
    }

    fn sign(&self, key: &EcPrivateKey, data: &[u8]) -> Result<[u8; 64]> {
        (**self).sign(key, data)
    }

    fn sha256(&self, data: &[u8]) -> [u8; 32] {
        (**self).sha256(data)
    }

    fn hmac_sha256(&self, key: &[u8], data: &[u8]) -> Result<[u8; 32]> {
        (**self).hmac_sha256(key, data)
    }

    fn fill_random(&self, dest: &mut [u8]) -> Result<()> {
        (**self).fill_random(dest)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_software_provider_sign_verifies() {
        let provider = SoftwareCryptoProvider::new();
        let pair = provider.generate_key_pair().unwrap();

        let signature = provider.sign(&pair.private, b"authData||clientDataHash").unwrap();
        assert!(ecdsa::verify_raw(&pair.public, b"authData||clientDataHash", &signature).is_ok());
    }

    #[test]
    fn test_fill_random_produces_distinct_output() {
        let provider = SoftwareCryptoProvider::new();
        let mut a = [0u8; 32];
        let mut b = [0u8; 32];
        provider.fill_random(&mut a).unwrap();
        provider.fill_random(&mut b).unwrap();

        assert_ne!(a, [0u8; 32]);
        assert_ne!(a, b);
    }

    #[test]
    fn test_provider_by_reference() {
        fn digest_with<P: CryptoProvider>(provider: P) -> [u8; 32] {
            provider.sha256(b"example.com")
        }

        let provider = SoftwareCryptoProvider::new();
        assert_eq!(digest_with(&provider), sha256(b"example.com"));
    }
}
