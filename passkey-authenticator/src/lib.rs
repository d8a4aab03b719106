//! In-process virtual WebAuthn authenticator
//!
//! This crate is the passkey core of a password-vault client. The client
//! itself acts as the authenticator, so everything a relying party parses is
//! produced here byte for byte: COSE keys, authenticator data, attestation
//! objects, DER signatures and PRF extension outputs.
//!
//! Storage, vault encryption and the platform credential API are outside
//! this crate; it performs no I/O.
//!
//! Implements the WebAuthn Level 3 authenticator model:
//! <https://www.w3.org/TR/webauthn-3/#sctn-authenticator-model>

pub mod attestation;
pub mod authenticator;
pub mod authenticator_data;
pub mod cbor;
pub mod codec;
pub mod commands;
pub mod config;
pub mod error;
pub mod keys;
pub mod prf;
pub mod secret;
pub mod types;
pub mod webauthn;

// Re-export commonly used types
pub use attestation::{AttestationFormat, AttestationStatement};
pub use authenticator::Authenticator;
pub use authenticator_data::Flags;
pub use commands::get_assertion::{GetAssertionRequest, GetAssertionResponse};
pub use commands::make_credential::{MakeCredentialRequest, MakeCredentialResponse};
pub use config::{AuthenticatorConfig, AuthenticatorConfigBuilder, DEFAULT_AAGUID};
pub use error::{Error, Result};
pub use prf::{PrfInputs, PrfOutputs};
pub use secret::PrfSecret;
pub use types::{ClientDataHash, CredentialId, Passkey, UserHandle};
pub use webauthn::{AssertionResponseJson, RegistrationResponseJson};

pub use passkey_crypto::{CryptoProvider, Jwk, SoftwareCryptoProvider};
