//! Error taxonomy for authenticator operations
//!
//! Every operation either returns a complete, valid structure or one of
//! these errors before any bytes leave the core. Nothing is retried
//! internally.

use passkey_crypto::CryptoError;
use thiserror::Error;

/// Error type for authenticator operations
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    /// Caller-supplied value violates a length or content rule
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Credential ID or base64url text is not in the expected format
    #[error("Invalid format: {0}")]
    InvalidFormat(String),

    /// Key material could not be imported
    #[error("Invalid key material: {0}")]
    InvalidKeyMaterial(String),

    /// Key generation, signing or the random source failed
    #[error("Crypto provider failure: {0}")]
    CryptoProviderFailure(String),
}

impl Error {
    /// Whether the error is a synchronous rejection of caller input
    ///
    /// These are never worth retrying with the same arguments.
    pub fn is_input_error(&self) -> bool {
        matches!(
            self,
            Self::InvalidInput(_) | Self::InvalidFormat(_) | Self::InvalidKeyMaterial(_)
        )
    }

    pub(crate) fn invalid_input(reason: impl Into<String>) -> Self {
        Self::InvalidInput(reason.into())
    }

    pub(crate) fn invalid_format(reason: impl Into<String>) -> Self {
        Self::InvalidFormat(reason.into())
    }
}

impl From<CryptoError> for Error {
    fn from(error: CryptoError) -> Self {
        match error {
            CryptoError::InvalidPublicKey
            | CryptoError::InvalidPrivateKey
            | CryptoError::InvalidKeyLength { .. }
            | CryptoError::InvalidJwk(_) => Error::InvalidKeyMaterial(error.to_string()),
            CryptoError::InvalidSignature => Error::InvalidInput(error.to_string()),
            CryptoError::KeyGenerationFailed
            | CryptoError::SigningFailed
            | CryptoError::RandomUnavailable
            | CryptoError::InvalidHmacKey => Error::CryptoProviderFailure(error.to_string()),
        }
    }
}

/// Result type alias for authenticator operations
pub type Result<T> = std::result::Result<T, Error>;
