//! Authentication: sign an assertion with an existing passkey
//!
//! The sign count is always zero. Passkeys here are synced between devices,
//! so no single copy can keep a monotonic counter.
//!
//! Spec: <https://www.w3.org/TR/webauthn-3/#sctn-op-get-assertion>

use crate::{
    authenticator::Authenticator,
    authenticator_data::{Flags, build_authenticator_data},
    commands::{rp_id_hash, signed_data, validate_rp_id},
    error::{Error, Result},
    keys,
    prf::{self, PrfInputs, PrfOutputs},
    secret::PrfSecret,
    types::{ClientDataHash, CredentialId, Passkey, UserHandle},
};

use passkey_crypto::{CryptoProvider, Jwk, der};

/// Assertion request for a stored credential
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GetAssertionRequest {
    pub credential_id: CredentialId,
    pub rp_id: String,
    pub client_data_hash: ClientDataHash,
    /// Stored private JWK
    pub private_key: Jwk,
    pub user_handle: Option<UserHandle>,
    pub uv_performed: bool,
    pub prf_inputs: Option<PrfInputs>,
    /// Secret stored at registration, if PRF was enabled then
    pub prf_secret: Option<PrfSecret>,
}

impl GetAssertionRequest {
    pub fn new(
        credential_id: CredentialId,
        rp_id: impl Into<String>,
        client_data_hash: ClientDataHash,
        private_key: Jwk,
    ) -> Self {
        Self {
            credential_id,
            rp_id: rp_id.into(),
            client_data_hash,
            private_key,
            user_handle: None,
            uv_performed: false,
            prf_inputs: None,
            prf_secret: None,
        }
    }

    /// Replay a stored record; tombstoned records are rejected
    pub fn from_passkey(passkey: &Passkey, client_data_hash: ClientDataHash) -> Result<Self> {
        if passkey.is_deleted {
            return Err(Error::invalid_input(format!(
                "passkey {} has been deleted",
                passkey.id
            )));
        }

        Ok(Self {
            user_handle: passkey.user_handle.clone(),
            prf_secret: passkey.prf_secret.clone(),
            ..Self::new(
                passkey.id,
                passkey.rp_id.clone(),
                client_data_hash,
                passkey.private_key.clone(),
            )
        })
    }

    pub fn with_user_handle(mut self, user_handle: UserHandle) -> Self {
        self.user_handle = Some(user_handle);
        self
    }

    pub fn with_user_verification(mut self, performed: bool) -> Self {
        self.uv_performed = performed;
        self
    }

    pub fn with_prf_inputs(mut self, inputs: PrfInputs) -> Self {
        self.prf_inputs = Some(inputs);
        self
    }

    pub fn with_prf_secret(mut self, secret: PrfSecret) -> Self {
        self.prf_secret = Some(secret);
        self
    }
}

/// Signed assertion
#[derive(Debug, Clone)]
pub struct GetAssertionResponse {
    pub credential_id: CredentialId,
    pub authenticator_data: Vec<u8>,
    /// DER-encoded ECDSA signature
    pub signature: Vec<u8>,
    pub user_handle: Option<UserHandle>,
    pub prf_results: Option<PrfOutputs>,
}

/// Produce an assertion
pub fn handle<P: CryptoProvider>(
    auth: &Authenticator<P>,
    request: &GetAssertionRequest,
) -> Result<GetAssertionResponse> {
    validate_rp_id(&request.rp_id)?;
    let provider = auth.provider();

    // Step 1: Import the stored key before producing any output
    let private_key = keys::import_private_jwk(&request.private_key)?;

    // Step 2: Authenticator data without attested credential data
    let flags = Flags::assertion(request.uv_performed);
    let rp_id_hash = rp_id_hash(provider, &request.rp_id);
    let authenticator_data = build_authenticator_data(&rp_id_hash, flags, None)?;

    // Step 3: Sign authenticatorData || clientDataHash
    let data = signed_data(&authenticator_data, &request.client_data_hash);
    let raw = provider.sign(&private_key, &data)?;
    let signature = der::raw_to_der(&raw);

    // Step 4: PRF
    let prf_results = match (&request.prf_inputs, &request.prf_secret) {
        (Some(inputs), Some(secret)) => Some(prf::evaluate_inputs(provider, secret, inputs)?),
        (Some(_), None) => {
            tracing::warn!(
                credential_id = %request.credential_id,
                "PRF requested but credential has no PRF secret"
            );
            None
        }
        (None, _) => None,
    };

    tracing::debug!(
        flags = ?flags,
        prf = prf_results.is_some(),
        "assertion signed"
    );

    Ok(GetAssertionResponse {
        credential_id: request.credential_id,
        authenticator_data,
        signature,
        user_handle: request.user_handle.clone(),
        prf_results,
    })
}
