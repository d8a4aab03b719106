//! Per-credential PRF secret storage
//!
//! # Security Guarantees
//!
//! Backed by `SecVec`, which:
//! - `mlock`s the allocation so it is not swapped to disk
//! - zeroes the memory on drop
//!
//! Equality is constant-time and `Debug` never prints the bytes. Temporary
//! copies can still exist inside the HMAC implementation; keep
//! [`PrfSecret::with_bytes`] closures short.

use crate::error::{Error, Result};

use base64::Engine;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use passkey_crypto::CryptoProvider;
use secstr::SecVec;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use subtle::ConstantTimeEq;
use zeroize::Zeroizing;

/// PRF secrets are 32 random bytes
pub const PRF_SECRET_LEN: usize = 32;

/// Secret generated once at registration and reused for every PRF evaluation
#[derive(Clone)]
pub struct PrfSecret {
    inner: SecVec<u8>,
}

impl PrfSecret {
    /// Draw a fresh secret from the provider's secure RNG
    pub fn generate<P: CryptoProvider>(provider: &P) -> Result<Self> {
        let mut bytes = Zeroizing::new([0u8; PRF_SECRET_LEN]);
        provider.fill_random(bytes.as_mut_slice())?;
        Ok(Self {
            inner: SecVec::from(bytes.to_vec()),
        })
    }

    /// Restore a stored secret; anything but 32 bytes is rejected
    pub fn from_slice(bytes: &[u8]) -> Result<Self> {
        if bytes.len() != PRF_SECRET_LEN {
            return Err(Error::InvalidKeyMaterial(format!(
                "PRF secret must be {PRF_SECRET_LEN} bytes, got {}",
                bytes.len()
            )));
        }
        Ok(Self {
            inner: SecVec::from(bytes.to_vec()),
        })
    }

    /// Run `f` with access to the raw secret
    pub fn with_bytes<F, R>(&self, f: F) -> R
    where
        F: FnOnce(&[u8]) -> R,
    {
        f(self.inner.unsecure())
    }

    /// Storage form (base64url, no padding)
    pub fn to_base64url(&self) -> String {
        self.with_bytes(|bytes| URL_SAFE_NO_PAD.encode(bytes))
    }

    pub fn from_base64url(encoded: &str) -> Result<Self> {
        let bytes = Zeroizing::new(
            URL_SAFE_NO_PAD
                .decode(encoded)
                .map_err(|e| Error::InvalidKeyMaterial(format!("PRF secret: {e}")))?,
        );
        Self::from_slice(&bytes)
    }
}

impl core::fmt::Debug for PrfSecret {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("PrfSecret")
            .field("data", &"<redacted>")
            .finish()
    }
}

impl PartialEq for PrfSecret {
    fn eq(&self, other: &Self) -> bool {
        self.inner.unsecure().ct_eq(other.inner.unsecure()).into()
    }
}

impl Eq for PrfSecret {}

impl Serialize for PrfSecret {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let encoded = Zeroizing::new(self.to_base64url());
        serializer.serialize_str(&encoded)
    }
}

impl<'de> Deserialize<'de> for PrfSecret {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let encoded = Zeroizing::new(String::deserialize(deserializer)?);
        PrfSecret::from_base64url(&encoded).map_err(serde::de::Error::custom)
    }
}
