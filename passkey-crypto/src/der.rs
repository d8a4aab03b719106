//! ECDSA signature codec: raw `r || s` ⇄ ASN.1 DER
//!
//! WebAuthn carries ES256 signatures as
//! `SEQUENCE { r INTEGER, s INTEGER }` with minimal-length integers.
//! Relying parties parse them with strict ASN.1 decoders, so an extra
//! leading `0x00` (or a missing one in front of a set high bit) is fatal.

use crate::error::{CryptoError, Result};

const TAG_SEQUENCE: u8 = 0x30;
const TAG_INTEGER: u8 = 0x02;

/// Scalar width for P-256
const SCALAR_LEN: usize = 32;

/// DER-encode a raw 64-byte P-256 signature (`r || s`)
///
/// # Examples
///
/// ```
/// use passkey_crypto::der;
///
/// let mut raw = [0u8; 64];
/// raw[31] = 0x01; // r = 1
/// raw[63] = 0x80; // s = 128, needs a sign byte
///
/// let encoded = der::raw_to_der(&raw);
/// assert_eq!(encoded, [0x30, 0x07, 0x02, 0x01, 0x01, 0x02, 0x02, 0x00, 0x80]);
/// ```
pub fn raw_to_der(raw: &[u8; 64]) -> Vec<u8> {
    let (r, s) = raw.split_at(SCALAR_LEN);
    let r = encode_integer(r);
    let s = encode_integer(s);

    // At most 2 * (2 + 33) = 70 bytes, so the short length form always fits
    let mut out = Vec::with_capacity(2 + r.len() + s.len());
    out.push(TAG_SEQUENCE);
    out.push((r.len() + s.len()) as u8);
    out.extend_from_slice(&r);
    out.extend_from_slice(&s);
    out
}

/// Decode a DER ES256 signature back into raw `r || s`
///
/// Strict: rejects long-form lengths, trailing data, negative integers and
/// integers carrying more than the single sign byte DER allows.
pub fn der_to_raw(der: &[u8]) -> Result<[u8; 64]> {
    let body = match der {
        [TAG_SEQUENCE, len, body @ ..] if *len < 0x80 && usize::from(*len) == body.len() => body,
        _ => return Err(CryptoError::InvalidSignature),
    };

    let (r, rest) = decode_integer(body)?;
    let (s, rest) = decode_integer(rest)?;
    if !rest.is_empty() {
        return Err(CryptoError::InvalidSignature);
    }

    let mut raw = [0u8; 64];
    raw[SCALAR_LEN - r.len()..SCALAR_LEN].copy_from_slice(r);
    raw[2 * SCALAR_LEN - s.len()..].copy_from_slice(s);
    Ok(raw)
}

/// Minimal DER INTEGER for an unsigned big-endian value
fn encode_integer(value: &[u8]) -> Vec<u8> {
    let first_nonzero = value.iter().position(|&b| b != 0);
    let magnitude = match first_nonzero {
        Some(i) => &value[i..],
        None => &[0u8][..],
    };
    let needs_sign_byte = magnitude.first().is_some_and(|b| b & 0x80 != 0);

    let len = magnitude.len() + usize::from(needs_sign_byte);
    let mut out = Vec::with_capacity(2 + len);
    out.push(TAG_INTEGER);
    out.push(len as u8);
    if needs_sign_byte {
        out.push(0x00);
    }
    out.extend_from_slice(magnitude);
    out
}

/// Parse one INTEGER, returning its magnitude (sign byte removed) and the rest
fn decode_integer(input: &[u8]) -> Result<(&[u8], &[u8])> {
    let (len, rest) = match input {
        [TAG_INTEGER, len, rest @ ..] => (usize::from(*len), rest),
        _ => return Err(CryptoError::InvalidSignature),
    };
    if len == 0 || len > SCALAR_LEN + 1 || len > rest.len() {
        return Err(CryptoError::InvalidSignature);
    }
    let (value, rest) = rest.split_at(len);

    let magnitude = match value {
        // Negative values never appear in ECDSA signatures
        [first, ..] if first & 0x80 != 0 => return Err(CryptoError::InvalidSignature),
        // A leading zero is only allowed in front of a set high bit
        [0x00, second, ..] if second & 0x80 == 0 => return Err(CryptoError::InvalidSignature),
        [0x00, tail @ ..] if !tail.is_empty() => tail,
        _ => value,
    };
    if magnitude.len() > SCALAR_LEN {
        return Err(CryptoError::InvalidSignature);
    }

    Ok((magnitude, rest))
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_der_structure() {
        let mut raw = [0u8; 64];
        raw[0] = 0x01;
        raw[32] = 0x01;

        let der = raw_to_der(&raw);
        assert_eq!(der[0], 0x30, "must start with SEQUENCE tag");
        assert_eq!(der.len(), 2 + der[1] as usize, "sequence length must be exact");
        assert_eq!(der[2], 0x02, "r must be tagged as INTEGER");
        assert_eq!(der[3], 32);
    }

    #[test]
    fn test_high_bit_gets_sign_byte() {
        let mut raw = [0u8; 64];
        raw[0] = 0x80;
        raw[32] = 0xff;

        let der = raw_to_der(&raw);
        assert_eq!(der.len(), 2 + 2 * (2 + 33));
        assert_eq!(&der[2..5], &[0x02, 33, 0x00]);
        assert_eq!(der[5], 0x80);
    }

    #[test]
    fn test_leading_zeros_stripped() {
        let mut raw = [0u8; 64];
        raw[31] = 0x01;
        raw[63] = 0x7f;

        let der = raw_to_der(&raw);
        assert_eq!(der, [0x30, 0x06, 0x02, 0x01, 0x01, 0x02, 0x01, 0x7f]);
    }

    #[test]
    fn test_zero_integer_keeps_one_byte() {
        let der = raw_to_der(&[0u8; 64]);
        assert_eq!(der, [0x30, 0x06, 0x02, 0x01, 0x00, 0x02, 0x01, 0x00]);
        assert_eq!(der_to_raw(&der).unwrap(), [0u8; 64]);
    }

    #[test]
    fn test_rejects_over_padded_integer() {
        // r = 0x00 0x01 carries a redundant leading zero
        let der = [0x30, 0x07, 0x02, 0x02, 0x00, 0x01, 0x02, 0x01, 0x01];
        assert_eq!(der_to_raw(&der), Err(CryptoError::InvalidSignature));
    }

    #[test]
    fn test_rejects_negative_integer() {
        let der = [0x30, 0x06, 0x02, 0x01, 0x80, 0x02, 0x01, 0x01];
        assert_eq!(der_to_raw(&der), Err(CryptoError::InvalidSignature));
    }

    #[test]
    fn test_rejects_trailing_bytes_and_bad_length() {
        let mut der = raw_to_der(&[0x11; 64]);
        der.push(0x00);
        assert!(der_to_raw(&der).is_err());

        let truncated = &raw_to_der(&[0x11; 64])[..10];
        assert!(der_to_raw(truncated).is_err());
        assert!(der_to_raw(&[]).is_err());
    }

    #[test]
    fn test_matches_p256_der_encoding() {
        use p256::ecdsa::{Signature, SigningKey, signature::Signer};

        let key = SigningKey::from_bytes(&[7u8; 32].into()).unwrap();
        let signature: Signature = key.sign(b"interop");
        let raw: [u8; 64] = signature.to_bytes().into();

        assert_eq!(raw_to_der(&raw), signature.to_der().as_bytes());
    }

    proptest! {
        #[test]
        fn prop_raw_der_round_trip(bytes in proptest::collection::vec(any::<u8>(), 64)) {
            let mut raw = [0u8; 64];
            raw.copy_from_slice(&bytes);
            let der = raw_to_der(&raw);
            prop_assert_eq!(der_to_raw(&der).unwrap(), raw);
        }

        #[test]
        fn prop_der_is_minimal(
            r_zeros in 0usize..32,
            s_zeros in 0usize..32,
            bytes in proptest::collection::vec(any::<u8>(), 64),
        ) {
            let mut raw = [0u8; 64];
            raw.copy_from_slice(&bytes);
            raw[..r_zeros].fill(0);
            raw[32..32 + s_zeros].fill(0);

            let der = raw_to_der(&raw);
            let mut rest = &der[2..];
            for _ in 0..2 {
                let len = rest[1] as usize;
                let value = &rest[2..2 + len];
                if len > 1 {
                    // A leading zero is present only to clear the sign bit
                    prop_assert!(value[0] != 0 || value[1] & 0x80 != 0);
                }
                prop_assert!(value[0] & 0x80 == 0);
                rest = &rest[2 + len..];
            }
            prop_assert!(rest.is_empty());
        }
    }
}
