//! Key manager
//!
//! ES256 key pairs come from the [`CryptoProvider`]; this module only moves
//! them in and out of the JWK shape the vault persists and mints credential
//! IDs. Every import re-validates the 32-byte coordinate rule.

use crate::error::{Error, Result};
use crate::types::CredentialId;

use passkey_crypto::{CryptoProvider, EcKeyPair, EcPrivateKey, EcPublicKey, Jwk};

/// Generate a fresh P-256 key pair
pub fn generate_key_pair<P: CryptoProvider>(provider: &P) -> Result<EcKeyPair> {
    Ok(provider.generate_key_pair()?)
}

/// Public JWK `{kty, crv, x, y}`
pub fn export_public_jwk(public: &EcPublicKey) -> Jwk {
    Jwk::from_public_key(public)
}

/// Private JWK `{kty, crv, x, y, d}`
pub fn export_private_jwk(private: &EcPrivateKey) -> Jwk {
    Jwk::from_private_key(private)
}

/// Import a stored private JWK
///
/// Any structural or mathematical problem is [`Error::InvalidKeyMaterial`].
pub fn import_private_jwk(jwk: &Jwk) -> Result<EcPrivateKey> {
    jwk.to_private_key()
        .map_err(|e| Error::InvalidKeyMaterial(e.to_string()))
}

/// Import a private key from the opaque blob produced by [`Jwk::to_bytes`]
pub fn import_private_key_blob(blob: &[u8]) -> Result<EcPrivateKey> {
    let jwk = Jwk::from_bytes(blob).map_err(|e| Error::InvalidKeyMaterial(e.to_string()))?;
    import_private_jwk(&jwk)
}

/// 16 random bytes from the provider's secure RNG
pub fn generate_credential_id<P: CryptoProvider>(provider: &P) -> Result<CredentialId> {
    let mut bytes = [0u8; CredentialId::LEN];
    provider.fill_random(&mut bytes)?;
    Ok(CredentialId::new(bytes))
}
