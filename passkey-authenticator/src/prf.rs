//! PRF extension evaluation
//!
//! `prf(secret, salt) = HMAC-SHA-256(secret, SHA-256("WebAuthn PRF" || 0x00 || salt))`
//!
//! The prefix separates PRF salts from hmac-secret salts so the same
//! credential secret can never be coaxed into producing one from the other.
//!
//! Spec: <https://w3c.github.io/webauthn/#prf-extension>

use crate::error::Result;
use crate::secret::PrfSecret;

use passkey_crypto::CryptoProvider;
use zeroize::Zeroizing;

/// Domain separation prefix, including the trailing NUL
pub const PRF_DOMAIN: &[u8] = b"WebAuthn PRF\x00";

/// Caller-supplied salts
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PrfInputs {
    pub first: Vec<u8>,
    pub second: Option<Vec<u8>>,
}

impl PrfInputs {
    pub fn new(first: impl Into<Vec<u8>>) -> Self {
        Self {
            first: first.into(),
            second: None,
        }
    }

    pub fn with_second(mut self, second: impl Into<Vec<u8>>) -> Self {
        self.second = Some(second.into());
        self
    }
}

/// PRF results, one per supplied salt
#[derive(Clone, PartialEq, Eq)]
pub struct PrfOutputs {
    pub first: Zeroizing<[u8; 32]>,
    pub second: Option<Zeroizing<[u8; 32]>>,
}

impl core::fmt::Debug for PrfOutputs {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("PrfOutputs")
            .field("first", &"<redacted>")
            .field("second", &self.second.as_ref().map(|_| "<redacted>"))
            .finish()
    }
}

/// Evaluate the PRF for a single salt
pub fn evaluate<P: CryptoProvider>(
    provider: &P,
    secret: &PrfSecret,
    salt: &[u8],
) -> Result<Zeroizing<[u8; 32]>> {
    let mut message = Vec::with_capacity(PRF_DOMAIN.len() + salt.len());
    message.extend_from_slice(PRF_DOMAIN);
    message.extend_from_slice(salt);
    let salt_hash = provider.sha256(&message);

    let output = secret.with_bytes(|key| provider.hmac_sha256(key, &salt_hash))?;
    Ok(Zeroizing::new(output))
}

/// Evaluate every salt in `inputs` independently
pub fn evaluate_inputs<P: CryptoProvider>(
    provider: &P,
    secret: &PrfSecret,
    inputs: &PrfInputs,
) -> Result<PrfOutputs> {
    let first = evaluate(provider, secret, &inputs.first)?;
    let second = inputs
        .second
        .as_deref()
        .map(|salt| evaluate(provider, secret, salt))
        .transpose()?;

    Ok(PrfOutputs { first, second })
}
