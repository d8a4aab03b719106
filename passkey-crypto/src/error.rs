//! Error types for cryptographic operations

use thiserror::Error;

/// Cryptographic operation errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CryptoError {
    /// Invalid public key provided
    #[error("Invalid public key")]
    InvalidPublicKey,

    /// Invalid private key provided
    #[error("Invalid private key")]
    InvalidPrivateKey,

    /// Invalid signature format
    #[error("Invalid signature")]
    InvalidSignature,

    /// Invalid key length
    #[error("Invalid key length: expected {expected}, got {actual}")]
    InvalidKeyLength { expected: usize, actual: usize },

    /// Malformed JSON Web Key
    #[error("Invalid JWK: {0}")]
    InvalidJwk(String),

    /// Key pair generation failed inside the provider
    #[error("Key generation failed")]
    KeyGenerationFailed,

    /// Signing failed inside the provider
    #[error("Signing failed")]
    SigningFailed,

    /// The secure random source could not produce bytes
    #[error("Secure random source unavailable")]
    RandomUnavailable,

    /// HMAC key rejected by the provider
    #[error("Invalid HMAC key")]
    InvalidHmacKey,
}

/// Result type alias for cryptographic operations
pub type Result<T> = core::result::Result<T, CryptoError>;
