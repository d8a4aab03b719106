//! WebAuthn authenticator operations
//!
//! - [`make_credential`]: registration (`navigator.credentials.create`)
//! - [`get_assertion`]: authentication (`navigator.credentials.get`)
//!
//! Spec: <https://www.w3.org/TR/webauthn-3/#sctn-authenticator-ops>

pub mod get_assertion;
pub mod make_credential;

use crate::error::{Error, Result};
use crate::types::ClientDataHash;

use passkey_crypto::CryptoProvider;

/// Reject RP IDs that cannot name a relying party
pub(crate) fn validate_rp_id(rp_id: &str) -> Result<()> {
    if rp_id.is_empty() {
        return Err(Error::invalid_input("rpId must not be empty"));
    }
    if rp_id.chars().any(char::is_whitespace) {
        return Err(Error::invalid_input(format!(
            "rpId must not contain whitespace: {rp_id:?}"
        )));
    }
    Ok(())
}

pub(crate) fn rp_id_hash<P: CryptoProvider>(provider: &P, rp_id: &str) -> [u8; 32] {
    provider.sha256(rp_id.as_bytes())
}

/// `authenticatorData || clientDataHash`, the bytes covered by every signature
pub(crate) fn signed_data(auth_data: &[u8], client_data_hash: &ClientDataHash) -> Vec<u8> {
    let mut data = Vec::with_capacity(auth_data.len() + ClientDataHash::LEN);
    data.extend_from_slice(auth_data);
    data.extend_from_slice(client_data_hash.as_bytes());
    data
}
