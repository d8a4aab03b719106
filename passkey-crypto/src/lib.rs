//! Pure Rust cryptographic primitives for a software WebAuthn authenticator
//!
//! This crate provides the operations the authenticator core consumes as an
//! external capability:
//!
//! - **ECDSA**: ES256 (P-256 + SHA-256) key generation and signing
//! - **DER**: raw `r || s` ⇄ ASN.1 DER signature codec
//! - **JWK**: `{kty:"EC", crv:"P-256", x, y, d?}` import and export
//! - **Provider**: the [`CryptoProvider`] trait and its software implementation
//!
//! COSE algorithm identifier for everything here: -7 (ES256).
//! Spec: <https://www.rfc-editor.org/rfc/rfc8152.html#section-8.1>

pub mod der;
pub mod ecdsa;
pub mod error;
pub mod jwk;
pub mod provider;

use hmac::{Hmac, Mac};
use sha2::{Digest, Sha256};

pub use error::{CryptoError, Result};
pub use jwk::{EcKeyPair, EcPrivateKey, EcPublicKey, Jwk};
pub use provider::{CryptoProvider, SoftwareCryptoProvider};

type HmacSha256 = Hmac<Sha256>;

/// SHA-256 digest of `data`
pub fn sha256(data: &[u8]) -> [u8; 32] {
    Sha256::digest(data).into()
}

/// HMAC-SHA-256 of `data` under `key`
///
/// HMAC accepts keys of any length, but the error path is kept so a
/// provider backed by a stricter native API can report it.
pub fn hmac_sha256(key: &[u8], data: &[u8]) -> Result<[u8; 32]> {
    let mut mac = HmacSha256::new_from_slice(key).map_err(|_| CryptoError::InvalidHmacKey)?;
    mac.update(data);
    Ok(mac.finalize().into_bytes().into())
}
