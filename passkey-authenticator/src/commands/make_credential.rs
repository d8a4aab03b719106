//! Registration: create a new passkey
//!
//! Spec: <https://www.w3.org/TR/webauthn-3/#sctn-op-make-cred>

use crate::{
    attestation::{AttestationFormat, AttestationStatement, encode_attestation_object},
    authenticator::Authenticator,
    authenticator_data::{AttestedCredentialData, Flags, build_authenticator_data},
    cbor::encode_cose_ec2_key,
    commands::{rp_id_hash, signed_data, validate_rp_id},
    error::Result,
    keys,
    prf::{self, PrfInputs, PrfOutputs},
    secret::PrfSecret,
    types::{ClientDataHash, CredentialId, UserHandle},
};

use passkey_crypto::{CryptoProvider, Jwk, der};

/// Registration request, as forwarded by the platform credential layer
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MakeCredentialRequest {
    pub rp_id: String,
    pub client_data_hash: ClientDataHash,
    pub user_handle: Option<UserHandle>,
    pub user_name: Option<String>,
    pub display_name: Option<String>,
    /// Whether the platform performed user verification
    pub uv_performed: bool,
    /// Generate a PRF secret for this credential
    pub enable_prf: bool,
    /// Salts to evaluate immediately with the new secret
    pub prf_inputs: Option<PrfInputs>,
    /// Overrides the configured attestation format
    pub attestation_format: Option<AttestationFormat>,
}

impl MakeCredentialRequest {
    pub fn new(rp_id: impl Into<String>, client_data_hash: ClientDataHash) -> Self {
        Self {
            rp_id: rp_id.into(),
            client_data_hash,
            user_handle: None,
            user_name: None,
            display_name: None,
            uv_performed: false,
            enable_prf: false,
            prf_inputs: None,
            attestation_format: None,
        }
    }

    pub fn with_user(
        mut self,
        user_handle: UserHandle,
        user_name: Option<String>,
        display_name: Option<String>,
    ) -> Self {
        self.user_handle = Some(user_handle);
        self.user_name = user_name;
        self.display_name = display_name;
        self
    }

    pub fn with_user_verification(mut self, performed: bool) -> Self {
        self.uv_performed = performed;
        self
    }

    pub fn with_prf(mut self) -> Self {
        self.enable_prf = true;
        self
    }

    /// Enable PRF and evaluate `inputs` at creation time
    pub fn with_prf_inputs(mut self, inputs: PrfInputs) -> Self {
        self.enable_prf = true;
        self.prf_inputs = Some(inputs);
        self
    }

    pub fn with_attestation_format(mut self, format: AttestationFormat) -> Self {
        self.attestation_format = Some(format);
        self
    }
}

/// Everything the storage layer needs to persist the new passkey
#[derive(Debug, Clone)]
pub struct MakeCredentialResponse {
    pub credential_id: CredentialId,
    pub attestation_object: Vec<u8>,
    pub authenticator_data: Vec<u8>,
    pub attestation_format: AttestationFormat,
    pub public_key_jwk: Jwk,
    pub private_key_jwk: Jwk,
    pub prf_secret: Option<PrfSecret>,
    /// Outputs for salts supplied at creation
    pub prf_results: Option<PrfOutputs>,
}

impl MakeCredentialResponse {
    /// Opaque private key blob for the vault
    pub fn private_key_blob(&self) -> Result<Vec<u8>> {
        Ok(self.private_key_jwk.to_bytes()?)
    }
}

/// Create a new credential
///
/// Nothing is returned until every step has succeeded, so a provider failure
/// part way through leaves no credential behind.
pub fn handle<P: CryptoProvider>(
    auth: &Authenticator<P>,
    request: &MakeCredentialRequest,
) -> Result<MakeCredentialResponse> {
    validate_rp_id(&request.rp_id)?;
    let provider = auth.provider();

    // Step 1: Generate the ES256 key pair
    let key_pair = keys::generate_key_pair(provider)?;

    // Step 2: Flags (UP | BE | BS | AT, plus UV if verified)
    let flags = Flags::registration(request.uv_performed);

    // Step 3: COSE public key
    let cose_public_key = encode_cose_ec2_key(key_pair.public.x(), key_pair.public.y());

    // Step 4: Attested credential data
    let credential_id = keys::generate_credential_id(provider)?;
    let attested = AttestedCredentialData {
        aaguid: auth.config().aaguid,
        credential_id: credential_id.as_bytes(),
        cose_public_key: &cose_public_key,
    };

    // Step 5: Authenticator data
    let rp_id_hash = rp_id_hash(provider, &request.rp_id);
    let authenticator_data = build_authenticator_data(&rp_id_hash, flags, Some(&attested))?;

    // Step 6: PRF secret, evaluated right away if salts were supplied
    let prf_secret = if request.enable_prf {
        Some(PrfSecret::generate(provider)?)
    } else {
        None
    };
    let prf_results = match (&prf_secret, &request.prf_inputs) {
        (Some(secret), Some(inputs)) => Some(prf::evaluate_inputs(provider, secret, inputs)?),
        _ => None,
    };

    // Step 7: Attestation statement and object
    let attestation_format = request
        .attestation_format
        .unwrap_or(auth.config().attestation_format);
    let att_stmt = match attestation_format {
        AttestationFormat::None => AttestationStatement::None,
        AttestationFormat::Packed => {
            let data = signed_data(&authenticator_data, &request.client_data_hash);
            let raw = provider.sign(&key_pair.private, &data)?;
            AttestationStatement::packed_es256(der::raw_to_der(&raw))
        }
    };
    let attestation_object = encode_attestation_object(&authenticator_data, &att_stmt);

    tracing::debug!(
        flags = ?flags,
        fmt = attestation_format.as_str(),
        prf = request.enable_prf,
        "registration data built"
    );

    Ok(MakeCredentialResponse {
        credential_id,
        attestation_object,
        authenticator_data,
        attestation_format,
        public_key_jwk: keys::export_public_jwk(&key_pair.public),
        private_key_jwk: keys::export_private_jwk(&key_pair.private),
        prf_secret,
        prf_results,
    })
}
