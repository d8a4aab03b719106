//! Attestation statements and the attestation object
//!
//! `attestationObject = { "fmt": text, "attStmt": map, "authData": bytes }`,
//! keys in canonical CTAP2 order (shorter key first).
//!
//! Spec: <https://www.w3.org/TR/webauthn-3/#sctn-attestation>

use crate::cbor::{CborWriter, cose};

use serde::{Deserialize, Serialize};

/// Which attestation statement format registration produces
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AttestationFormat {
    /// No attestation (empty statement)
    #[default]
    None,
    /// Self attestation signed with the new credential's own key
    Packed,
}

impl AttestationFormat {
    /// The `fmt` identifier
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::None => "none",
            Self::Packed => "packed",
        }
    }
}

/// Attestation statement, shaped by its format
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AttestationStatement {
    /// `attStmt = {}`
    None,
    /// `attStmt = { "alg": alg, "sig": DER signature }`
    Packed { alg: i64, sig: Vec<u8> },
}

impl AttestationStatement {
    /// Self-attestation statement for an ES256 DER signature
    pub fn packed_es256(sig: Vec<u8>) -> Self {
        Self::Packed {
            alg: cose::ALG_ES256,
            sig,
        }
    }

    pub fn format(&self) -> AttestationFormat {
        match self {
            Self::None => AttestationFormat::None,
            Self::Packed { .. } => AttestationFormat::Packed,
        }
    }

    fn write(&self, w: &mut CborWriter) {
        match self {
            Self::None => {
                w.map(0);
            }
            Self::Packed { alg, sig } => {
                w.map(2);
                w.text("alg").int(*alg);
                w.text("sig").bytes(sig);
            }
        }
    }
}

/// Encode the attestation object; `fmt` follows the statement variant
pub fn encode_attestation_object(auth_data: &[u8], att_stmt: &AttestationStatement) -> Vec<u8> {
    let mut w = CborWriter::with_capacity(auth_data.len() + 128);
    w.map(3);
    w.text("fmt").text(att_stmt.format().as_str());
    w.text("attStmt");
    att_stmt.write(&mut w);
    w.text("authData").bytes(auth_data);
    w.into_bytes()
}

#[cfg(test)]
mod tests {
    use super::*;
    use ciborium::value::Value;

    fn decode_map(bytes: &[u8]) -> Vec<(Value, Value)> {
        let value: Value = ciborium::from_reader(bytes).expect("must be valid CBOR");
        match value {
            Value::Map(entries) => entries,
            other => panic!("expected map, got {other:?}"),
        }
    }

    #[test]
    fn test_none_attestation_bytes() {
        let auth_data = [0x11u8; 37];
        let encoded = encode_attestation_object(&auth_data, &AttestationStatement::None);

        let mut expected = vec![0xa3];
        expected.extend_from_slice(b"\x63fmt\x64none");
        expected.extend_from_slice(b"\x67attStmt\xa0");
        expected.extend_from_slice(b"\x68authData\x58\x25");
        expected.extend_from_slice(&auth_data);
        assert_eq!(encoded, expected);
    }

    #[test]
    fn test_packed_attestation_structure() {
        let auth_data = vec![0x22u8; 164];
        let sig = vec![0x30, 0x06, 0x02, 0x01, 0x01, 0x02, 0x01, 0x01];
        let encoded =
            encode_attestation_object(&auth_data, &AttestationStatement::packed_es256(sig.clone()));

        let entries = decode_map(&encoded);
        let keys: Vec<&str> = entries
            .iter()
            .map(|(k, _)| k.as_text().expect("text key"))
            .collect();
        assert_eq!(keys, ["fmt", "attStmt", "authData"]);
        assert_eq!(entries[0].1, Value::Text("packed".into()));
        assert_eq!(entries[2].1, Value::Bytes(auth_data));

        let Value::Map(att_stmt) = &entries[1].1 else {
            panic!("attStmt must be a map")
        };
        assert_eq!(att_stmt[0].0, Value::Text("alg".into()));
        assert_eq!(i128::from(att_stmt[0].1.as_integer().unwrap()), -7);
        assert_eq!(att_stmt[1], (Value::Text("sig".into()), Value::Bytes(sig)));
    }

    #[test]
    fn test_format_serde_names() {
        assert_eq!(serde_json::to_string(&AttestationFormat::Packed).unwrap(), "\"packed\"");
        assert_eq!(
            serde_json::from_str::<AttestationFormat>("\"none\"").unwrap(),
            AttestationFormat::None
        );
    }
}
