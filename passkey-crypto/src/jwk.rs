//! EC key material and its JSON Web Key form
//!
//! Keys only ever cross the crate boundary as a JWK-shaped structure
//! `{kty:"EC", crv:"P-256", x, y, d?}` with base64url (no padding)
//! coordinates. Every coordinate is exactly 32 bytes.

use crate::ecdsa;
use crate::error::{CryptoError, Result};

use base64::Engine;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use serde::{Deserialize, Serialize};
use zeroize::Zeroizing;

/// Coordinate and scalar width for P-256
pub const COORDINATE_LEN: usize = 32;

/// JWK key type for elliptic-curve keys
pub const KTY_EC: &str = "EC";

/// JWK curve name for P-256
pub const CRV_P256: &str = "P-256";

/// P-256 public point as affine coordinates
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EcPublicKey {
    x: [u8; COORDINATE_LEN],
    y: [u8; COORDINATE_LEN],
}

impl EcPublicKey {
    /// Build from raw coordinates
    pub fn new(x: [u8; COORDINATE_LEN], y: [u8; COORDINATE_LEN]) -> Self {
        Self { x, y }
    }

    /// Build from coordinate slices, rejecting anything but 32 bytes each
    pub fn from_coordinates(x: &[u8], y: &[u8]) -> Result<Self> {
        Ok(Self {
            x: to_coordinate(x)?,
            y: to_coordinate(y)?,
        })
    }

    /// Parse the 65-byte uncompressed SEC1 form (`0x04 || x || y`)
    pub fn from_sec1_uncompressed(bytes: &[u8]) -> Result<Self> {
        match bytes {
            [0x04, rest @ ..] if rest.len() == 2 * COORDINATE_LEN => {
                let (x, y) = rest.split_at(COORDINATE_LEN);
                Self::from_coordinates(x, y)
            }
            _ => Err(CryptoError::InvalidPublicKey),
        }
    }

    /// 65-byte uncompressed SEC1 form (`0x04 || x || y`)
    pub fn to_sec1_uncompressed(&self) -> [u8; 65] {
        let mut out = [0u8; 65];
        out[0] = 0x04;
        out[1..33].copy_from_slice(&self.x);
        out[33..].copy_from_slice(&self.y);
        out
    }

    pub fn x(&self) -> &[u8; COORDINATE_LEN] {
        &self.x
    }

    pub fn y(&self) -> &[u8; COORDINATE_LEN] {
        &self.y
    }
}

/// P-256 private scalar together with its public point
///
/// The scalar is zeroed on drop.
#[derive(Clone)]
pub struct EcPrivateKey {
    scalar: Zeroizing<[u8; COORDINATE_LEN]>,
    public: EcPublicKey,
}

impl EcPrivateKey {
    /// Pair a scalar with a public point that is already known to match
    pub(crate) fn from_parts(scalar: Zeroizing<[u8; COORDINATE_LEN]>, public: EcPublicKey) -> Self {
        Self { scalar, public }
    }

    /// Build from a raw scalar, deriving the public point
    pub fn from_scalar(scalar: &[u8]) -> Result<Self> {
        let scalar = Zeroizing::new(to_coordinate(scalar)?);
        let public = ecdsa::public_from_private(&scalar)?;
        Ok(Self { scalar, public })
    }

    pub fn scalar(&self) -> &[u8; COORDINATE_LEN] {
        &self.scalar
    }

    pub fn public_key(&self) -> &EcPublicKey {
        &self.public
    }
}

impl core::fmt::Debug for EcPrivateKey {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("EcPrivateKey")
            .field("scalar", &"<redacted>")
            .field("public", &self.public)
            .finish()
    }
}

/// Freshly generated ES256 key pair
#[derive(Debug, Clone)]
pub struct EcKeyPair {
    pub public: EcPublicKey,
    pub private: EcPrivateKey,
}

/// JSON Web Key for a P-256 key (RFC 7517 / RFC 7518 section 6.2)
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Jwk {
    pub kty: String,
    pub crv: String,
    pub x: String,
    pub y: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub d: Option<String>,
}

impl Jwk {
    /// Public JWK for a public point
    pub fn from_public_key(public: &EcPublicKey) -> Self {
        Self {
            kty: KTY_EC.to_string(),
            crv: CRV_P256.to_string(),
            x: URL_SAFE_NO_PAD.encode(public.x),
            y: URL_SAFE_NO_PAD.encode(public.y),
            d: None,
        }
    }

    /// Private JWK (public coordinates plus `d`)
    pub fn from_private_key(private: &EcPrivateKey) -> Self {
        Self {
            d: Some(URL_SAFE_NO_PAD.encode(private.scalar.as_slice())),
            ..Self::from_public_key(&private.public)
        }
    }

    /// Whether this JWK carries a private scalar
    pub fn is_private(&self) -> bool {
        self.d.is_some()
    }

    /// Validate and import the public part
    pub fn to_public_key(&self) -> Result<EcPublicKey> {
        self.check_header()?;
        let x = decode_coordinate(&self.x, "x")?;
        let y = decode_coordinate(&self.y, "y")?;
        Ok(EcPublicKey::new(x, y))
    }

    /// Validate and import the private key
    ///
    /// Beyond shape checks this confirms `d` is a valid scalar and that
    /// `(x, y)` is its public point.
    pub fn to_private_key(&self) -> Result<EcPrivateKey> {
        let public = self.to_public_key()?;
        let d = self
            .d
            .as_deref()
            .ok_or_else(|| CryptoError::InvalidJwk("missing private scalar \"d\"".into()))?;
        let scalar = Zeroizing::new(decode_coordinate(d, "d")?);

        let derived = ecdsa::public_from_private(&scalar)?;
        if derived != public {
            return Err(CryptoError::InvalidJwk(
                "public coordinates do not match private scalar".into(),
            ));
        }

        Ok(EcPrivateKey::from_parts(scalar, public))
    }

    /// Serialize to the opaque JSON blob handed to storage
    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        serde_json::to_vec(self).map_err(|e| CryptoError::InvalidJwk(e.to_string()))
    }

    /// Parse the opaque JSON blob produced by [`Jwk::to_bytes`]
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        serde_json::from_slice(bytes).map_err(|e| CryptoError::InvalidJwk(e.to_string()))
    }

    fn check_header(&self) -> Result<()> {
        if self.kty != KTY_EC {
            return Err(CryptoError::InvalidJwk(format!("unsupported kty {:?}", self.kty)));
        }
        if self.crv != CRV_P256 {
            return Err(CryptoError::InvalidJwk(format!("unsupported crv {:?}", self.crv)));
        }
        Ok(())
    }
}

impl core::fmt::Debug for Jwk {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Jwk")
            .field("kty", &self.kty)
            .field("crv", &self.crv)
            .field("x", &self.x)
            .field("y", &self.y)
            .field("d", &self.d.as_ref().map(|_| "<redacted>"))
            .finish()
    }
}

fn to_coordinate(bytes: &[u8]) -> Result<[u8; COORDINATE_LEN]> {
    bytes.try_into().map_err(|_| CryptoError::InvalidKeyLength {
        expected: COORDINATE_LEN,
        actual: bytes.len(),
    })
}

fn decode_coordinate(encoded: &str, name: &str) -> Result<[u8; COORDINATE_LEN]> {
    let bytes = Zeroizing::new(
        URL_SAFE_NO_PAD
            .decode(encoded)
            .map_err(|e| CryptoError::InvalidJwk(format!("{name}: {e}")))?,
    );
    to_coordinate(&bytes)
}
