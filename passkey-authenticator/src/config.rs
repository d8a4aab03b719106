//! Authenticator configuration

use crate::attestation::AttestationFormat;
use crate::error::{Error, Result};

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// AAGUID of this software authenticator
///
/// Embedded in every credential it creates: `B7E1C8D2-5F3A-4E69-9C0B-7A4D2E8F1365`.
pub const DEFAULT_AAGUID: [u8; 16] = [
    0xb7, 0xe1, 0xc8, 0xd2, 0x5f, 0x3a, 0x4e, 0x69, 0x9c, 0x0b, 0x7a, 0x4d, 0x2e, 0x8f, 0x13, 0x65,
];

/// Authenticator configuration
///
/// # Examples
///
/// ```
/// use passkey_authenticator::{AttestationFormat, AuthenticatorConfig};
///
/// let config = AuthenticatorConfig::builder()
///     .aaguid([0x11; 16])
///     .attestation_format(AttestationFormat::Packed)
///     .build();
///
/// assert_eq!(config.aaguid, [0x11; 16]);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AuthenticatorConfig {
    /// Authenticator Attestation GUID (16 bytes)
    #[serde(with = "aaguid_serde")]
    pub aaguid: [u8; 16],

    /// Format used when a registration request does not pick one
    pub attestation_format: AttestationFormat,
}

impl AuthenticatorConfig {
    pub fn new() -> Self {
        Self {
            aaguid: DEFAULT_AAGUID,
            attestation_format: AttestationFormat::None,
        }
    }

    pub fn builder() -> AuthenticatorConfigBuilder {
        AuthenticatorConfigBuilder::default()
    }

    /// Parse a JSON configuration document
    ///
    /// Missing fields fall back to their defaults.
    pub fn from_json(json: &str) -> Result<Self> {
        serde_json::from_str(json)
            .map_err(|e| Error::invalid_input(format!("authenticator config: {e}")))
    }

    /// AAGUID in hyphenated form
    pub fn aaguid_string(&self) -> String {
        Uuid::from_bytes(self.aaguid).hyphenated().to_string()
    }
}

impl Default for AuthenticatorConfig {
    fn default() -> Self {
        Self::new()
    }
}

/// Builder for AuthenticatorConfig
#[derive(Debug, Clone)]
pub struct AuthenticatorConfigBuilder {
    aaguid: [u8; 16],
    attestation_format: AttestationFormat,
}

impl Default for AuthenticatorConfigBuilder {
    fn default() -> Self {
        Self {
            aaguid: DEFAULT_AAGUID,
            attestation_format: AttestationFormat::None,
        }
    }
}

impl AuthenticatorConfigBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn aaguid(mut self, aaguid: [u8; 16]) -> Self {
        self.aaguid = aaguid;
        self
    }

    pub fn attestation_format(mut self, format: AttestationFormat) -> Self {
        self.attestation_format = format;
        self
    }

    pub fn build(self) -> AuthenticatorConfig {
        AuthenticatorConfig {
            aaguid: self.aaguid,
            attestation_format: self.attestation_format,
        }
    }
}

mod aaguid_serde {
    use serde::{Deserialize, Deserializer, Serializer};
    use uuid::Uuid;

    pub fn serialize<S: Serializer>(aaguid: &[u8; 16], serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(&Uuid::from_bytes(*aaguid).hyphenated())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<[u8; 16], D::Error> {
        let text = String::deserialize(deserializer)?;
        Uuid::try_parse(&text)
            .map(Uuid::into_bytes)
            .map_err(serde::de::Error::custom)
    }
}
