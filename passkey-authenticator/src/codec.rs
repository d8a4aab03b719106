//! Credential-identifier codec
//!
//! A passkey's 16-byte credential ID doubles as the storage key. The vault
//! stores it as a canonical uppercase hyphenated GUID, WebAuthn carries the
//! raw bytes, and JSON surfaces carry base64url. All conversions here are
//! exact inverses of each other.

use crate::error::{Error, Result};

use base64::Engine;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use uuid::Uuid;

/// Credential IDs are always 16 bytes
pub const CREDENTIAL_ID_LEN: usize = 16;

/// Parse a GUID string into its 16 bytes
///
/// Dashes are ignored wherever they appear; the remainder must be exactly
/// 32 hex digits in either case.
///
/// # Examples
///
/// ```
/// use passkey_authenticator::codec;
///
/// let bytes = codec::guid_to_bytes("00112233-4455-6677-8899-aabbccddeeff").unwrap();
/// assert_eq!(bytes[0], 0x00);
/// assert_eq!(bytes[15], 0xff);
/// ```
pub fn guid_to_bytes(guid: &str) -> Result<[u8; CREDENTIAL_ID_LEN]> {
    let digits: String = guid.chars().filter(|&c| c != '-').collect();
    if digits.len() != 2 * CREDENTIAL_ID_LEN || !digits.chars().all(|c| c.is_ascii_hexdigit()) {
        return Err(Error::invalid_format(format!(
            "GUID must be 32 hex digits, got {guid:?}"
        )));
    }

    Uuid::try_parse(&digits)
        .map(|uuid| uuid.into_bytes())
        .map_err(|e| Error::invalid_format(e.to_string()))
}

/// Format 16 bytes as `XXXXXXXX-XXXX-XXXX-XXXX-XXXXXXXXXXXX` (uppercase)
pub fn bytes_to_guid(bytes: &[u8]) -> Result<String> {
    let uuid = Uuid::from_slice(bytes).map_err(|_| {
        Error::invalid_format(format!(
            "GUID bytes must be {CREDENTIAL_ID_LEN} long, got {}",
            bytes.len()
        ))
    })?;
    Ok(format!("{:X}", uuid.hyphenated()))
}

/// base64url without padding
pub fn bytes_to_base64url(bytes: &[u8]) -> String {
    URL_SAFE_NO_PAD.encode(bytes)
}

/// Decode base64url
///
/// Trailing `=` padding is tolerated since some relying parties send it;
/// any other non-alphabet character is rejected.
pub fn base64url_to_bytes(encoded: &str) -> Result<Vec<u8>> {
    URL_SAFE_NO_PAD
        .decode(encoded.trim_end_matches('='))
        .map_err(|e| Error::invalid_format(format!("base64url: {e}")))
}

/// GUID string → WebAuthn-facing base64url credential ID
pub fn guid_to_base64url(guid: &str) -> Result<String> {
    Ok(bytes_to_base64url(&guid_to_bytes(guid)?))
}

/// WebAuthn-facing base64url credential ID → canonical GUID string
pub fn base64url_to_guid(encoded: &str) -> Result<String> {
    bytes_to_guid(&base64url_to_bytes(encoded)?)
}
