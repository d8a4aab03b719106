//! WebAuthn JSON response shapes
//!
//! `PublicKeyCredential.toJSON()` forms of registration and assertion
//! results, with every binary field base64url-encoded. The platform layer
//! hands these to the relying party's page.
//!
//! Spec: <https://www.w3.org/TR/webauthn-3/#dictdef-registrationresponsejson>

use crate::cbor::cose;
use crate::codec::bytes_to_base64url;
use crate::commands::get_assertion::GetAssertionResponse;
use crate::commands::make_credential::MakeCredentialResponse;
use crate::prf::PrfOutputs;

use serde::{Deserialize, Serialize};

pub const CREDENTIAL_TYPE: &str = "public-key";
pub const ATTACHMENT_PLATFORM: &str = "platform";
pub const TRANSPORTS: [&str; 2] = ["internal", "hybrid"];

/// `RegistrationResponseJSON`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegistrationResponseJson {
    pub id: String,
    pub raw_id: String,
    #[serde(rename = "type")]
    pub credential_type: String,
    pub authenticator_attachment: String,
    pub response: AttestationResponseJson,
    pub client_extension_results: ClientExtensionResults,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AttestationResponseJson {
    #[serde(rename = "clientDataJSON")]
    pub client_data_json: String,
    pub attestation_object: String,
    pub authenticator_data: String,
    pub public_key_algorithm: i64,
    pub transports: Vec<String>,
}

/// `AuthenticationResponseJSON`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssertionResponseJson {
    pub id: String,
    pub raw_id: String,
    #[serde(rename = "type")]
    pub credential_type: String,
    pub authenticator_attachment: String,
    pub response: AuthenticatorAssertionResponseJson,
    pub client_extension_results: ClientExtensionResults,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthenticatorAssertionResponseJson {
    #[serde(rename = "clientDataJSON")]
    pub client_data_json: String,
    pub authenticator_data: String,
    pub signature: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_handle: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClientExtensionResults {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub prf: Option<PrfExtensionOutput>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PrfExtensionOutput {
    /// Registration only
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub enabled: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub results: Option<PrfResultsJson>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PrfResultsJson {
    pub first: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub second: Option<String>,
}

impl From<&PrfOutputs> for PrfResultsJson {
    fn from(outputs: &PrfOutputs) -> Self {
        Self {
            first: bytes_to_base64url(outputs.first.as_slice()),
            second: outputs
                .second
                .as_ref()
                .map(|second| bytes_to_base64url(second.as_slice())),
        }
    }
}

fn transports() -> Vec<String> {
    TRANSPORTS.iter().map(|t| t.to_string()).collect()
}

impl RegistrationResponseJson {
    /// `client_data_json` is passed through unchanged
    pub fn new(response: &MakeCredentialResponse, client_data_json: &[u8]) -> Self {
        let id = response.credential_id.to_base64url();
        let prf = response.prf_secret.as_ref().map(|_| PrfExtensionOutput {
            enabled: Some(true),
            results: response.prf_results.as_ref().map(PrfResultsJson::from),
        });

        Self {
            raw_id: id.clone(),
            id,
            credential_type: CREDENTIAL_TYPE.to_string(),
            authenticator_attachment: ATTACHMENT_PLATFORM.to_string(),
            response: AttestationResponseJson {
                client_data_json: bytes_to_base64url(client_data_json),
                attestation_object: bytes_to_base64url(&response.attestation_object),
                authenticator_data: bytes_to_base64url(&response.authenticator_data),
                public_key_algorithm: cose::ALG_ES256,
                transports: transports(),
            },
            client_extension_results: ClientExtensionResults { prf },
        }
    }
}

impl AssertionResponseJson {
    /// `client_data_json` is passed through unchanged
    pub fn new(response: &GetAssertionResponse, client_data_json: &[u8]) -> Self {
        let id = response.credential_id.to_base64url();
        let prf = response.prf_results.as_ref().map(|outputs| PrfExtensionOutput {
            enabled: None,
            results: Some(outputs.into()),
        });

        Self {
            raw_id: id.clone(),
            id,
            credential_type: CREDENTIAL_TYPE.to_string(),
            authenticator_attachment: ATTACHMENT_PLATFORM.to_string(),
            response: AuthenticatorAssertionResponseJson {
                client_data_json: bytes_to_base64url(client_data_json),
                authenticator_data: bytes_to_base64url(&response.authenticator_data),
                signature: bytes_to_base64url(&response.signature),
                user_handle: response.user_handle.as_ref().map(|h| h.to_base64url()),
            },
            client_extension_results: ClientExtensionResults { prf },
        }
    }
}
