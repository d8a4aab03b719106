//! Minimal write-only CBOR encoder for WebAuthn structures
//!
//! WebAuthn needs only a handful of fixed map shapes (the COSE EC2 public key
//! and the attestation object), so this encoder writes exactly those item
//! kinds: unsigned and negative integers, text strings, byte strings and map
//! headers. Callers emit map entries in canonical CTAP2 order themselves.
//!
//! Every header uses the shortest form RFC 8949 allows:
//!
//! | argument        | encoding                     |
//! |-----------------|------------------------------|
//! | 0..=23          | folded into the initial byte |
//! | 24..=255        | initial byte + 1 byte        |
//! | 256..=65535     | initial byte + 2 bytes (BE)  |
//! | up to u32::MAX  | initial byte + 4 bytes (BE)  |
//! | larger          | initial byte + 8 bytes (BE)  |

/// CBOR major types used here
mod major {
    pub const UNSIGNED: u8 = 0;
    pub const NEGATIVE: u8 = 1;
    pub const BYTES: u8 = 2;
    pub const TEXT: u8 = 3;
    pub const MAP: u8 = 5;
}

/// COSE key labels and values for an EC2 P-256 ES256 key (RFC 8152)
pub mod cose {
    pub const KEY_KTY: i64 = 1;
    pub const KEY_ALG: i64 = 3;
    pub const KEY_CRV: i64 = -1;
    pub const KEY_X: i64 = -2;
    pub const KEY_Y: i64 = -3;

    pub const KTY_EC2: i64 = 2;
    pub const ALG_ES256: i64 = -7;
    pub const CRV_P256: i64 = 1;
}

/// Append-only CBOR writer
#[derive(Debug, Default, Clone)]
pub struct CborWriter {
    buf: Vec<u8>,
}

impl CborWriter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            buf: Vec::with_capacity(capacity),
        }
    }

    /// Unsigned integer (major type 0)
    pub fn unsigned(&mut self, value: u64) -> &mut Self {
        self.header(major::UNSIGNED, value);
        self
    }

    /// Any integer; negatives use major type 1 with argument `-1 - value`
    pub fn int(&mut self, value: i64) -> &mut Self {
        if value >= 0 {
            self.header(major::UNSIGNED, value as u64);
        } else {
            // -1 - value never overflows for negative i64
            self.header(major::NEGATIVE, (-1 - value) as u64);
        }
        self
    }

    /// Byte string (major type 2)
    pub fn bytes(&mut self, value: &[u8]) -> &mut Self {
        self.header(major::BYTES, value.len() as u64);
        self.buf.extend_from_slice(value);
        self
    }

    /// UTF-8 text string (major type 3); the length counts bytes, not chars
    pub fn text(&mut self, value: &str) -> &mut Self {
        self.header(major::TEXT, value.len() as u64);
        self.buf.extend_from_slice(value.as_bytes());
        self
    }

    /// Definite-length map header (major type 5); the caller writes
    /// exactly `entries` key/value pairs next
    pub fn map(&mut self, entries: usize) -> &mut Self {
        self.header(major::MAP, entries as u64);
        self
    }

    pub fn len(&self) -> usize {
        self.buf.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buf.is_empty()
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.buf
    }

    fn header(&mut self, major: u8, argument: u64) {
        let initial = major << 5;
        match argument {
            0..=23 => self.buf.push(initial | argument as u8),
            24..=0xff => self.buf.extend_from_slice(&[initial | 24, argument as u8]),
            0x100..=0xffff => {
                self.buf.push(initial | 25);
                self.buf.extend_from_slice(&(argument as u16).to_be_bytes());
            }
            0x1_0000..=0xffff_ffff => {
                self.buf.push(initial | 26);
                self.buf.extend_from_slice(&(argument as u32).to_be_bytes());
            }
            _ => {
                self.buf.push(initial | 27);
                self.buf.extend_from_slice(&argument.to_be_bytes());
            }
        }
    }
}

/// Encode a P-256 public key as a COSE_Key
///
/// Emits the canonical 5-entry map `{1: 2, 3: -7, -1: 1, -2: x, -3: y}`
/// (kty=EC2, alg=ES256, crv=P-256). Always 77 bytes.
pub fn encode_cose_ec2_key(x: &[u8; 32], y: &[u8; 32]) -> Vec<u8> {
    let mut w = CborWriter::with_capacity(77);
    w.map(5);
    w.int(cose::KEY_KTY).int(cose::KTY_EC2);
    w.int(cose::KEY_ALG).int(cose::ALG_ES256);
    w.int(cose::KEY_CRV).int(cose::CRV_P256);
    w.int(cose::KEY_X).bytes(x);
    w.int(cose::KEY_Y).bytes(y);
    w.into_bytes()
}
