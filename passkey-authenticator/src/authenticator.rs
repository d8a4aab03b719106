//! Virtual authenticator
//!
//! Holds the configuration and the crypto provider. There is no other
//! state: every call is a pure function of its request plus the provider,
//! so an `Authenticator` can be shared across threads freely.

use crate::{
    commands::{
        get_assertion::{self, GetAssertionRequest, GetAssertionResponse},
        make_credential::{self, MakeCredentialRequest, MakeCredentialResponse},
    },
    config::AuthenticatorConfig,
    error::Result,
    prf::PrfInputs,
    types::{ClientDataHash, Passkey},
};

use passkey_crypto::{CryptoProvider, SoftwareCryptoProvider};
use tracing::instrument;

/// Software WebAuthn authenticator
///
/// # Examples
///
/// ```
/// use passkey_authenticator::{
///     Authenticator, AuthenticatorConfig, ClientDataHash, MakeCredentialRequest,
/// };
///
/// let auth = Authenticator::new(AuthenticatorConfig::default());
/// let hash = ClientDataHash::from_client_data_json(br#"{"type":"webauthn.create"}"#);
/// let request = MakeCredentialRequest::new("example.com", hash).with_user_verification(true);
///
/// let response = auth.create_passkey(&request).unwrap();
/// assert_eq!(response.authenticator_data[32], 0x5D);
/// ```
#[derive(Debug, Clone)]
pub struct Authenticator<P: CryptoProvider = SoftwareCryptoProvider> {
    config: AuthenticatorConfig,
    provider: P,
}

impl Authenticator<SoftwareCryptoProvider> {
    /// Authenticator backed by the pure Rust provider
    pub fn new(config: AuthenticatorConfig) -> Self {
        Self::with_provider(config, SoftwareCryptoProvider::new())
    }
}

impl<P: CryptoProvider> Authenticator<P> {
    /// Authenticator backed by a platform provider
    pub fn with_provider(config: AuthenticatorConfig, provider: P) -> Self {
        Self { config, provider }
    }

    pub fn config(&self) -> &AuthenticatorConfig {
        &self.config
    }

    pub fn provider(&self) -> &P {
        &self.provider
    }

    /// Register a new passkey
    #[instrument(
        skip_all,
        fields(rp_id = %request.rp_id, credential_id = tracing::field::Empty)
    )]
    pub fn create_passkey(&self, request: &MakeCredentialRequest) -> Result<MakeCredentialResponse> {
        let response = make_credential::handle(self, request)?;
        tracing::Span::current().record(
            "credential_id",
            tracing::field::display(&response.credential_id),
        );
        tracing::debug!("passkey created");
        Ok(response)
    }

    /// Sign an assertion
    #[instrument(
        skip_all,
        fields(rp_id = %request.rp_id, credential_id = %request.credential_id)
    )]
    pub fn get_assertion(&self, request: &GetAssertionRequest) -> Result<GetAssertionResponse> {
        get_assertion::handle(self, request)
    }

    /// Sign an assertion for a stored record
    ///
    /// The record is only read. Deleted records are rejected with
    /// [`Error::InvalidInput`](crate::Error::InvalidInput).
    pub fn get_assertion_for(
        &self,
        passkey: &Passkey,
        client_data_hash: ClientDataHash,
        uv_performed: bool,
        prf_inputs: Option<PrfInputs>,
    ) -> Result<GetAssertionResponse> {
        let mut request = GetAssertionRequest::from_passkey(passkey, client_data_hash)?
            .with_user_verification(uv_performed);
        request.prf_inputs = prf_inputs;
        self.get_assertion(&request)
    }
}
