//! Authenticator data types
//!
//! Length-checked newtypes for the values that cross the authenticator
//! boundary, and the [`Passkey`] record handed to the storage layer.

use crate::codec;
use crate::commands::make_credential::{MakeCredentialRequest, MakeCredentialResponse};
use crate::error::{Error, Result};
use crate::secret::PrfSecret;

use core::fmt;
use core::str::FromStr;
use std::time::{SystemTime, UNIX_EPOCH};

use passkey_crypto::Jwk;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// 16-byte credential ID, also the passkey's storage key
///
/// `Display` and serde use the canonical uppercase GUID form; WebAuthn
/// surfaces use [`CredentialId::to_base64url`].
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct CredentialId([u8; codec::CREDENTIAL_ID_LEN]);

impl CredentialId {
    pub const LEN: usize = codec::CREDENTIAL_ID_LEN;

    pub const fn new(bytes: [u8; Self::LEN]) -> Self {
        Self(bytes)
    }

    /// Wrap raw bytes, rejecting anything but 16
    pub fn from_slice(bytes: &[u8]) -> Result<Self> {
        let bytes: [u8; Self::LEN] = bytes.try_into().map_err(|_| {
            Error::invalid_input(format!(
                "credential ID must be {} bytes, got {}",
                Self::LEN,
                bytes.len()
            ))
        })?;
        Ok(Self(bytes))
    }

    pub fn from_base64url(encoded: &str) -> Result<Self> {
        Self::from_slice(&codec::base64url_to_bytes(encoded)?)
    }

    pub fn to_base64url(&self) -> String {
        codec::bytes_to_base64url(&self.0)
    }

    pub fn as_bytes(&self) -> &[u8; Self::LEN] {
        &self.0
    }
}

impl fmt::Display for CredentialId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Infallible for 16 bytes
        let guid = codec::bytes_to_guid(&self.0).map_err(|_| fmt::Error)?;
        f.write_str(&guid)
    }
}

impl fmt::Debug for CredentialId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "CredentialId({self})")
    }
}

impl FromStr for CredentialId {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        codec::guid_to_bytes(s).map(Self)
    }
}

impl Serialize for CredentialId {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for CredentialId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let guid = String::deserialize(deserializer)?;
        guid.parse().map_err(serde::de::Error::custom)
    }
}

/// SHA-256 of the client data JSON
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClientDataHash([u8; 32]);

impl ClientDataHash {
    pub const LEN: usize = 32;

    pub const fn new(hash: [u8; Self::LEN]) -> Self {
        Self(hash)
    }

    /// Wrap a precomputed hash; any length but 32 is [`Error::InvalidInput`]
    pub fn from_slice(hash: &[u8]) -> Result<Self> {
        let hash: [u8; Self::LEN] = hash.try_into().map_err(|_| {
            Error::invalid_input(format!(
                "clientDataHash must be {} bytes, got {}",
                Self::LEN,
                hash.len()
            ))
        })?;
        Ok(Self(hash))
    }

    /// Hash a pass-through clientDataJSON
    ///
    /// The JSON itself is not inspected; origin and challenge checks belong
    /// to the platform layer that assembled it.
    pub fn from_client_data_json(client_data_json: &[u8]) -> Self {
        Self(passkey_crypto::sha256(client_data_json))
    }

    pub fn as_bytes(&self) -> &[u8; Self::LEN] {
        &self.0
    }
}

/// Relying-party supplied user handle, at most 64 bytes
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct UserHandle(Vec<u8>);

impl UserHandle {
    pub const MAX_LEN: usize = 64;

    pub fn new(handle: impl Into<Vec<u8>>) -> Result<Self> {
        let handle = handle.into();
        if handle.len() > Self::MAX_LEN {
            return Err(Error::invalid_input(format!(
                "user handle must be at most {} bytes, got {}",
                Self::MAX_LEN,
                handle.len()
            )));
        }
        Ok(Self(handle))
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    pub fn to_base64url(&self) -> String {
        codec::bytes_to_base64url(&self.0)
    }
}

impl Serialize for UserHandle {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_base64url())
    }
}

impl<'de> Deserialize<'de> for UserHandle {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let encoded = String::deserialize(deserializer)?;
        let bytes = codec::base64url_to_bytes(&encoded).map_err(serde::de::Error::custom)?;
        UserHandle::new(bytes).map_err(serde::de::Error::custom)
    }
}

/// Persisted passkey record
///
/// Produced from a registration, replayed (never mutated) by assertions and
/// tombstoned by the storage layer. Encrypting it at rest is the vault's job.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Passkey {
    /// Credential ID / storage key
    pub id: CredentialId,

    /// Owning vault item (opaque here)
    pub parent_item_id: String,

    pub rp_id: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_handle: Option<UserHandle>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_name: Option<String>,

    pub public_key: Jwk,

    pub private_key: Jwk,

    /// Present only if PRF was enabled at registration
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub prf_secret: Option<PrfSecret>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,

    /// Unix timestamp (seconds)
    pub created_at: i64,

    /// Unix timestamp (seconds)
    pub updated_at: i64,

    #[serde(default)]
    pub is_deleted: bool,
}

impl Passkey {
    /// Assemble the record for a completed registration
    pub fn from_registration(
        parent_item_id: impl Into<String>,
        request: &MakeCredentialRequest,
        response: MakeCredentialResponse,
    ) -> Self {
        let now = current_timestamp();
        Self {
            id: response.credential_id,
            parent_item_id: parent_item_id.into(),
            rp_id: request.rp_id.clone(),
            user_handle: request.user_handle.clone(),
            user_name: request.user_name.clone(),
            public_key: response.public_key_jwk,
            private_key: response.private_key_jwk,
            prf_secret: response.prf_secret,
            display_name: request.display_name.clone(),
            created_at: now,
            updated_at: now,
            is_deleted: false,
        }
    }

    /// Soft-delete tombstone
    pub fn mark_deleted(&mut self) {
        self.is_deleted = true;
        self.updated_at = current_timestamp().max(self.updated_at);
    }
}

fn current_timestamp() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_secs() as i64
}

#[cfg(test)]
mod tests {
    use super::*;

    const GUID: &str = "0F1E2D3C-4B5A-6978-8796-A5B4C3D2E1F0";

    #[test]
    fn test_credential_id_display_and_parse() {
        let id: CredentialId = GUID.parse().unwrap();
        assert_eq!(id.to_string(), GUID);
        assert_eq!(id.as_bytes()[0], 0x0F);
        assert_eq!(id.to_base64url(), "Dx4tPEtaaXiHlqW0w9Lh8A");
        assert_eq!(CredentialId::from_base64url("Dx4tPEtaaXiHlqW0w9Lh8A").unwrap(), id);
    }

    #[test]
    fn test_credential_id_lowercase_input() {
        let id: CredentialId = GUID.to_lowercase().parse().unwrap();
        assert_eq!(id.to_string(), GUID);
    }

    #[test]
    fn test_credential_id_wrong_length() {
        assert!(matches!(
            CredentialId::from_slice(&[0u8; 15]),
            Err(Error::InvalidInput(_))
        ));
        assert!(CredentialId::from_base64url("AAAA").is_err());
    }

    #[test]
    fn test_credential_id_serde_is_guid() {
        let id: CredentialId = GUID.parse().unwrap();
        let json = serde_json::to_string(&id).unwrap();
        assert_eq!(json, format!("\"{GUID}\""));
        assert_eq!(serde_json::from_str::<CredentialId>(&json).unwrap(), id);
    }

    #[test]
    fn test_client_data_hash_length() {
        assert!(ClientDataHash::from_slice(&[0u8; 32]).is_ok());
        assert!(matches!(
            ClientDataHash::from_slice(&[0u8; 31]),
            Err(Error::InvalidInput(_))
        ));
        assert!(ClientDataHash::from_slice(&[0u8; 33]).is_err());
    }

    #[test]
    fn test_client_data_hash_from_json() {
        let json = br#"{"type":"webauthn.create","challenge":"AAAA","origin":"https://example.com"}"#;
        let hash = ClientDataHash::from_client_data_json(json);
        assert_eq!(hash.as_bytes(), &passkey_crypto::sha256(json));
    }

    #[test]
    fn test_user_handle_limit() {
        assert!(UserHandle::new(vec![1u8; 64]).is_ok());
        assert!(UserHandle::new(Vec::<u8>::new()).is_ok());
        assert!(matches!(
            UserHandle::new(vec![1u8; 65]),
            Err(Error::InvalidInput(_))
        ));
    }

    #[test]
    fn test_user_handle_serde() {
        let handle = UserHandle::new(b"user-1".to_vec()).unwrap();
        let json = serde_json::to_string(&handle).unwrap();
        assert_eq!(json, "\"dXNlci0x\"");
        assert_eq!(serde_json::from_str::<UserHandle>(&json).unwrap(), handle);

        let oversized = format!("\"{}\"", codec::bytes_to_base64url(&[0u8; 65]));
        assert!(serde_json::from_str::<UserHandle>(&oversized).is_err());
    }
}
