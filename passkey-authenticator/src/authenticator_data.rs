//! Authenticator data
//!
//! Format: rpIdHash (32) || flags (1) || signCount (4) || attestedCredData (optional)
//!
//! attestedCredData: aaguid (16) || credentialIdLength (2, BE) || credentialId || credentialPublicKey
//!
//! Spec: <https://www.w3.org/TR/webauthn-3/#sctn-authenticator-data>

use crate::error::{Error, Result};

use core::fmt;
use core::ops::{BitOr, BitOrAssign};

/// Signature counter written into every authenticator data
///
/// Always 0. Passkeys from this authenticator sync across devices, so no
/// single device can keep a monotonic counter; relying parties treat 0 as
/// "counter not supported".
pub const SIGN_COUNT: u32 = 0;

/// Length of authenticator data without attested credential data
pub const BASE_LEN: usize = 32 + 1 + 4;

/// Fixed part of attested credential data: aaguid (16) + length (2)
pub const ATTESTED_HEADER_LEN: usize = 16 + 2;

/// Authenticator data flags byte
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Flags(u8);

impl Flags {
    /// User present
    pub const UP: Flags = Flags(0x01);
    /// User verified
    pub const UV: Flags = Flags(0x04);
    /// Backup eligible
    pub const BE: Flags = Flags(0x08);
    /// Backup state
    pub const BS: Flags = Flags(0x10);
    /// Attested credential data included
    pub const AT: Flags = Flags(0x40);
    /// Extension data included
    pub const ED: Flags = Flags(0x80);

    /// Flags present on every response from this authenticator
    const ALWAYS: Flags = Flags(Self::UP.0 | Self::BE.0 | Self::BS.0);

    pub const fn empty() -> Self {
        Self(0)
    }

    pub const fn bits(self) -> u8 {
        self.0
    }

    pub const fn contains(self, other: Flags) -> bool {
        self.0 & other.0 == other.0
    }

    pub const fn union(self, other: Flags) -> Self {
        Self(self.0 | other.0)
    }

    pub const fn difference(self, other: Flags) -> Self {
        Self(self.0 & !other.0)
    }

    /// `UP | BE | BS | AT`, plus `UV` when verification was performed
    pub const fn registration(uv_performed: bool) -> Self {
        Self::assertion(uv_performed).union(Self::AT)
    }

    /// `UP | BE | BS`, plus `UV` when verification was performed
    pub const fn assertion(uv_performed: bool) -> Self {
        if uv_performed {
            Self::ALWAYS.union(Self::UV)
        } else {
            Self::ALWAYS
        }
    }
}

impl BitOr for Flags {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self {
        self.union(rhs)
    }
}

impl BitOrAssign for Flags {
    fn bitor_assign(&mut self, rhs: Self) {
        *self = self.union(rhs);
    }
}

impl fmt::Debug for Flags {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        const NAMES: [(Flags, &str); 6] = [
            (Flags::UP, "UP"),
            (Flags::UV, "UV"),
            (Flags::BE, "BE"),
            (Flags::BS, "BS"),
            (Flags::AT, "AT"),
            (Flags::ED, "ED"),
        ];
        let names: Vec<&str> = NAMES
            .iter()
            .filter(|(flag, _)| self.contains(*flag))
            .map(|(_, name)| *name)
            .collect();
        write!(f, "Flags({:#04x} {})", self.0, names.join("|"))
    }
}

/// Attested credential data, present only at registration
#[derive(Debug, Clone, Copy)]
pub struct AttestedCredentialData<'a> {
    pub aaguid: [u8; 16],
    pub credential_id: &'a [u8],
    pub cose_public_key: &'a [u8],
}

impl AttestedCredentialData<'_> {
    /// Encoded length: aaguid + length prefix + credential ID + key
    pub fn encoded_len(&self) -> usize {
        ATTESTED_HEADER_LEN + self.credential_id.len() + self.cose_public_key.len()
    }
}

/// Build authenticator data
///
/// The `AT` flag is derived from whether `attested` is present, and `ED` is
/// always clear since no extension outputs are written into authenticator
/// data. Any other bits are taken from `flags` as given.
pub fn build_authenticator_data(
    rp_id_hash: &[u8; 32],
    flags: Flags,
    attested: Option<&AttestedCredentialData<'_>>,
) -> Result<Vec<u8>> {
    let mut flags = flags.difference(Flags::AT.union(Flags::ED));
    if attested.is_some() {
        flags |= Flags::AT;
    }

    let mut auth_data = Vec::with_capacity(BASE_LEN + attested.map_or(0, |a| a.encoded_len()));

    // RP ID hash (32 bytes)
    auth_data.extend_from_slice(rp_id_hash);

    // Flags (1 byte)
    auth_data.push(flags.bits());

    // Sign count (4 bytes, BE)
    auth_data.extend_from_slice(&SIGN_COUNT.to_be_bytes());

    if let Some(cred) = attested {
        let id_len = u16::try_from(cred.credential_id.len())
            .map_err(|_| Error::invalid_input("credential ID longer than 65535 bytes"))?;

        auth_data.extend_from_slice(&cred.aaguid);
        auth_data.extend_from_slice(&id_len.to_be_bytes());
        auth_data.extend_from_slice(cred.credential_id);
        auth_data.extend_from_slice(cred.cose_public_key);
    }

    Ok(auth_data)
}
