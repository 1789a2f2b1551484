//! lisk32 account addresses.
//!
//! An address is the first 20 bytes of `sha256(public_key)`. Its text form is
//! `"lsk"` followed by 32 base32 symbols of the address and a 6-symbol polymod
//! checksum.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use sha2::{Digest, Sha256};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Prefix of every lisk32 address.
pub const ADDRESS_PREFIX: &str = "lsk";

/// Length of a binary address in bytes.
pub const ADDRESS_LENGTH: usize = 20;

const CHARSET: &[u8; 32] = b"zxvcpmbn3465o978uyrtkqew2adsjhfg";
const GENERATOR: [u32; 5] = [0x3b6a_57b2, 0x2650_8e6d, 0x1ea1_19fa, 0x3d42_33dd, 0x2a14_62b3];
const CHECKSUM_LENGTH: usize = 6;
const DATA_LENGTH: usize = 32;
const ENCODED_LENGTH: usize = ADDRESS_PREFIX.len() + DATA_LENGTH + CHECKSUM_LENGTH;

/// Errors raised while parsing an address.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AddressError {
    #[error("address must start with 'lsk'")]
    MissingPrefix,

    #[error("address must be 41 characters, got {0}")]
    InvalidLength(usize),

    #[error("invalid character '{0}' in address")]
    InvalidCharacter(char),

    #[error("address checksum mismatch")]
    InvalidChecksum,

    #[error("binary address must be 20 bytes, got {0}")]
    InvalidBinaryLength(usize),
}

/// A 20-byte account address.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Address([u8; ADDRESS_LENGTH]);

impl Address {
    /// Build an address from its binary form.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, AddressError> {
        let array: [u8; ADDRESS_LENGTH] = bytes
            .try_into()
            .map_err(|_| AddressError::InvalidBinaryLength(bytes.len()))?;
        Ok(Self(array))
    }

    /// Derive the address owned by a public key.
    pub fn from_public_key(public_key: &[u8]) -> Self {
        let digest = Sha256::digest(public_key);
        let mut bytes = [0u8; ADDRESS_LENGTH];
        bytes.copy_from_slice(&digest[..ADDRESS_LENGTH]);
        Self(bytes)
    }

    /// Parse the lisk32 text form, verifying prefix, alphabet and checksum.
    pub fn from_lisk32(text: &str) -> Result<Self, AddressError> {
        if !text.starts_with(ADDRESS_PREFIX) {
            return Err(AddressError::MissingPrefix);
        }
        if text.len() != ENCODED_LENGTH {
            return Err(AddressError::InvalidLength(text.len()));
        }

        let symbols = text[ADDRESS_PREFIX.len()..]
            .chars()
            .map(|c| {
                CHARSET
                    .iter()
                    .position(|&s| s as char == c)
                    .map(|p| p as u8)
                    .ok_or(AddressError::InvalidCharacter(c))
            })
            .collect::<Result<Vec<u8>, _>>()?;

        if polymod(&symbols) != 1 {
            return Err(AddressError::InvalidChecksum);
        }

        let bytes = convert_bits(&symbols[..DATA_LENGTH], 5, 8, false)
            .ok_or(AddressError::InvalidChecksum)?;
        Self::from_bytes(&bytes)
    }

    /// Render the lisk32 text form.
    pub fn to_lisk32(&self) -> String {
        // 160 bits split evenly into 32 groups of 5, so no padding is involved.
        let mut symbols = convert_bits(&self.0, 8, 5, true).unwrap_or_default();
        let checksum = create_checksum(&symbols);
        symbols.extend_from_slice(&checksum);

        let mut out = String::with_capacity(ENCODED_LENGTH);
        out.push_str(ADDRESS_PREFIX);
        out.extend(symbols.iter().map(|&s| CHARSET[s as usize] as char));
        out
    }

    pub fn as_bytes(&self) -> &[u8; ADDRESS_LENGTH] {
        &self.0
    }
}

impl FromStr for Address {
    type Err = AddressError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_lisk32(s)
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_lisk32())
    }
}

impl fmt::Debug for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Address({})", self.to_lisk32())
    }
}

impl Serialize for Address {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_lisk32())
    }
}

impl<'de> Deserialize<'de> for Address {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let text = String::deserialize(deserializer)?;
        Self::from_lisk32(&text).map_err(serde::de::Error::custom)
    }
}

fn polymod(values: &[u8]) -> u32 {
    let mut chk: u32 = 1;
    for &value in values {
        let top = chk >> 25;
        chk = ((chk & 0x01ff_ffff) << 5) ^ u32::from(value);
        for (i, generator) in GENERATOR.iter().enumerate() {
            if (top >> i) & 1 == 1 {
                chk ^= generator;
            }
        }
    }
    chk
}

fn create_checksum(symbols: &[u8]) -> [u8; CHECKSUM_LENGTH] {
    let mut values = symbols.to_vec();
    values.extend_from_slice(&[0; CHECKSUM_LENGTH]);
    let modulus = polymod(&values) ^ 1;

    let mut checksum = [0u8; CHECKSUM_LENGTH];
    for (p, slot) in checksum.iter_mut().enumerate() {
        *slot = ((modulus >> (5 * (CHECKSUM_LENGTH - 1 - p))) & 31) as u8;
    }
    checksum
}

/// Regroup a bit stream from `from`-bit words into `to`-bit words.
fn convert_bits(data: &[u8], from: u32, to: u32, pad: bool) -> Option<Vec<u8>> {
    let mut acc: u32 = 0;
    let mut bits: u32 = 0;
    let max_value: u32 = (1 << to) - 1;
    let max_acc: u32 = (1 << (from + to - 1)) - 1;
    let mut out = Vec::with_capacity(data.len() * from as usize / to as usize + 1);

    for &value in data {
        let value = u32::from(value);
        if value >> from != 0 {
            return None;
        }
        acc = ((acc << from) | value) & max_acc;
        bits += from;
        while bits >= to {
            bits -= to;
            out.push(((acc >> bits) & max_value) as u8);
        }
    }

    if pad {
        if bits > 0 {
            out.push(((acc << (to - bits)) & max_value) as u8);
        }
    } else if bits >= from || ((acc << (to - bits)) & max_value) != 0 {
        return None;
    }
    Some(out)
}
