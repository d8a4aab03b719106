//! Common test utilities for passkey-authenticator integration tests
//!
//! Independent checks (a strict CBOR decoder and `p256` verification) so the
//! tests do not grade the authenticator with its own encoder.

#![allow(dead_code)]

use std::sync::Once;
use std::sync::atomic::{AtomicUsize, Ordering};

use ciborium::Value;
use p256::ecdsa::signature::Verifier;
use p256::ecdsa::{Signature, VerifyingKey};
use passkey_authenticator::{
    Authenticator, AuthenticatorConfig, ClientDataHash, CryptoProvider, MakeCredentialRequest,
    SoftwareCryptoProvider, UserHandle,
};
use passkey_crypto::{CryptoError, EcKeyPair, EcPrivateKey};

pub const RP_ID: &str = "example.com";
pub const USER_ID: &[u8] = b"user-123";
pub const USER_NAME: &str = "alice@example.com";
pub const USER_DISPLAY_NAME: &str = "Alice";
pub const CREATE_CLIENT_DATA: &[u8] =
    br#"{"type":"webauthn.create","challenge":"dGVzdC1jaGFsbGVuZ2U","origin":"https://example.com"}"#;
pub const GET_CLIENT_DATA: &[u8] =
    br#"{"type":"webauthn.get","challenge":"YW5vdGhlci1jaGFsbGVuZ2U","origin":"https://example.com"}"#;

static TRACING: Once = Once::new();

/// Route `tracing` output through the test harness (`RUST_LOG` filters it)
pub fn init_tracing() {
    TRACING.call_once(|| {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
            .with_test_writer()
            .try_init();
    });
}

pub fn authenticator() -> Authenticator {
    init_tracing();
    Authenticator::new(AuthenticatorConfig::default())
}

/// Registration request with the standard test user
pub fn registration_request() -> MakeCredentialRequest {
    MakeCredentialRequest::new(RP_ID, ClientDataHash::from_client_data_json(CREATE_CLIENT_DATA))
        .with_user(
            UserHandle::new(USER_ID.to_vec()).expect("user handle"),
            Some(USER_NAME.to_string()),
            Some(USER_DISPLAY_NAME.to_string()),
        )
}

/// Which provider call should fail
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Fault {
    KeyGeneration,
    Signing,
    /// Fail the n-th (0-based) random fill
    RandomAfter(usize),
}

/// Software provider with one injected failure
pub struct FaultyProvider {
    fault: Fault,
    random_calls: AtomicUsize,
    inner: SoftwareCryptoProvider,
}

impl FaultyProvider {
    pub fn new(fault: Fault) -> Self {
        Self {
            fault,
            random_calls: AtomicUsize::new(0),
            inner: SoftwareCryptoProvider::new(),
        }
    }
}

impl CryptoProvider for FaultyProvider {
    fn generate_key_pair(&self) -> passkey_crypto::Result<EcKeyPair> {
        if self.fault == Fault::KeyGeneration {
            return Err(CryptoError::KeyGenerationFailed);
        }
        self.inner.generate_key_pair()
    }

    fn sign(&self, key: &EcPrivateKey, data: &[u8]) -> passkey_crypto::Result<[u8; 64]> {
        if self.fault == Fault::Signing {
            return Err(CryptoError::SigningFailed);
        }
        self.inner.sign(key, data)
    }

    fn sha256(&self, data: &[u8]) -> [u8; 32] {
        self.inner.sha256(data)
    }

    fn hmac_sha256(&self, key: &[u8], data: &[u8]) -> passkey_crypto::Result<[u8; 32]> {
        self.inner.hmac_sha256(key, data)
    }

    fn fill_random(&self, dest: &mut [u8]) -> passkey_crypto::Result<()> {
        let call = self.random_calls.fetch_add(1, Ordering::SeqCst);
        if self.fault == Fault::RandomAfter(call) {
            return Err(CryptoError::RandomUnavailable);
        }
        self.inner.fill_random(dest)
    }
}

/// Decode with ciborium, rejecting trailing bytes
pub fn decode_cbor(bytes: &[u8]) -> Value {
    let mut reader = bytes;
    let value: Value = ciborium::from_reader(&mut reader).expect("valid CBOR");
    assert!(reader.is_empty(), "trailing bytes after CBOR item");
    value
}

pub fn map_entries(value: &Value) -> &[(Value, Value)] {
    match value {
        Value::Map(entries) => entries,
        other => panic!("expected CBOR map, got {other:?}"),
    }
}

/// Look up a text key
pub fn text_key<'a>(value: &'a Value, key: &str) -> &'a Value {
    map_entries(value)
        .iter()
        .find(|(k, _)| matches!(k, Value::Text(t) if t == key))
        .map(|(_, v)| v)
        .unwrap_or_else(|| panic!("missing key {key:?}"))
}

/// Look up an integer key
pub fn int_key(value: &Value, key: i128) -> &Value {
    map_entries(value)
        .iter()
        .find(|(k, _)| matches!(k, Value::Integer(i) if i128::from(*i) == key))
        .map(|(_, v)| v)
        .unwrap_or_else(|| panic!("missing key {key}"))
}

pub fn as_bytes(value: &Value) -> &[u8] {
    match value {
        Value::Bytes(bytes) => bytes,
        other => panic!("expected byte string, got {other:?}"),
    }
}

pub fn as_int(value: &Value) -> i128 {
    match value {
        Value::Integer(i) => i128::from(*i),
        other => panic!("expected integer, got {other:?}"),
    }
}

/// Parsed attestation object
pub struct AttestationObject {
    pub fmt: String,
    pub att_stmt: Value,
    pub auth_data: Vec<u8>,
}

pub fn parse_attestation_object(bytes: &[u8]) -> AttestationObject {
    let value = decode_cbor(bytes);
    let fmt = match text_key(&value, "fmt") {
        Value::Text(fmt) => fmt.clone(),
        other => panic!("fmt is not text: {other:?}"),
    };
    AttestationObject {
        fmt,
        att_stmt: text_key(&value, "attStmt").clone(),
        auth_data: as_bytes(text_key(&value, "authData")).to_vec(),
    }
}

/// Offsets into registration authenticator data
pub struct AttestedData<'a> {
    pub aaguid: &'a [u8],
    pub credential_id: &'a [u8],
    pub cose_key: &'a [u8],
}

pub fn split_attested(auth_data: &[u8]) -> AttestedData<'_> {
    let id_len = u16::from_be_bytes([auth_data[53], auth_data[54]]) as usize;
    AttestedData {
        aaguid: &auth_data[37..53],
        credential_id: &auth_data[55..55 + id_len],
        cose_key: &auth_data[55 + id_len..],
    }
}

/// Build a `p256` verifying key from a COSE EC2 key
pub fn verifying_key_from_cose(cose_key: &[u8]) -> VerifyingKey {
    let key = decode_cbor(cose_key);
    assert_eq!(as_int(int_key(&key, 1)), 2, "kty");
    assert_eq!(as_int(int_key(&key, 3)), -7, "alg");
    assert_eq!(as_int(int_key(&key, -1)), 1, "crv");

    let x = as_bytes(int_key(&key, -2));
    let y = as_bytes(int_key(&key, -3));
    assert_eq!(x.len(), 32);
    assert_eq!(y.len(), 32);

    let point = p256::EncodedPoint::from_affine_coordinates(
        p256::FieldBytes::from_slice(x),
        p256::FieldBytes::from_slice(y),
        false,
    );
    VerifyingKey::from_encoded_point(&point).expect("point on curve")
}

/// Verify a DER ES256 signature over `authData || clientDataHash`
pub fn verify_es256(
    key: &VerifyingKey,
    auth_data: &[u8],
    client_data_hash: &ClientDataHash,
    der_sig: &[u8],
) {
    let signature = Signature::from_der(der_sig).expect("strict DER signature");
    let mut message = auth_data.to_vec();
    message.extend_from_slice(client_data_hash.as_bytes());
    key.verify(&message, &signature).expect("signature verifies");
}
