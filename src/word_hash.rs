//! Non-unique word hashes for pHash bucket selection.
//!
//! Each function maps a token or n-gram to an integer in `[0, 2^bit_size)`.
//! Collisions are expected: the hash only picks a histogram bucket. All three
//! walk the string's UTF-16 code units so digests stay compatible with other
//! implementations of the same algorithm.
//!
//! They are deterministic and must never change once digests have been
//! stored. DJB is the default because it is the fastest and distributes well
//! enough for this purpose; FNV-1a and Murmur3 mix more thoroughly.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::config::PHashError;

/// Capability to hash an n-gram into a `bit_size`-wide bucket index.
///
/// Implementations must be deterministic and return a value strictly below
/// `2^bit_size`. Any `Fn(&str, u32) -> u32` closure is a `WordHasher`, so
/// callers can plug in their own function.
pub trait WordHasher {
    fn word_hash(&self, gram: &str, bit_size: u32) -> Result<u32, PHashError>;
}

impl<F> WordHasher for F
where
    F: Fn(&str, u32) -> u32,
{
    fn word_hash(&self, gram: &str, bit_size: u32) -> Result<u32, PHashError> {
        Ok(self(gram, bit_size))
    }
}

/// Built-in word-hash functions.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WordHashFunction {
    /// DJB multiplicative rolling hash.
    #[default]
    Djb,
    /// FNV-1a with per-width constants; only supports 2, 4, 8, 16 and 32 bits.
    Fnv1a,
    /// Murmur3-style mixing with avalanche finalization.
    Murmur3,
}

impl WordHashFunction {
    pub const ALL: [WordHashFunction; 3] = [Self::Djb, Self::Fnv1a, Self::Murmur3];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Djb => "djb",
            Self::Fnv1a => "fnv1a",
            Self::Murmur3 => "murmur3",
        }
    }
}

impl WordHasher for WordHashFunction {
    fn word_hash(&self, gram: &str, bit_size: u32) -> Result<u32, PHashError> {
        match self {
            Self::Djb => Ok(word_hash_djb(gram, bit_size)),
            Self::Fnv1a => word_hash_fnv1a(gram, bit_size),
            Self::Murmur3 => Ok(word_hash_murmur3(gram, bit_size)),
        }
    }
}

impl fmt::Display for WordHashFunction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for WordHashFunction {
    type Err = PHashError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "djb" => Ok(Self::Djb),
            "fnv1a" | "fnv-1a" => Ok(Self::Fnv1a),
            "murmur3" => Ok(Self::Murmur3),
            other => Err(PHashError::UnknownWordHash {
                name: other.to_string(),
            }),
        }
    }
}

#[inline]
fn bitmask(bit_size: u32) -> u32 {
    if bit_size >= 32 {
        u32::MAX
    } else {
        (1u32 << bit_size) - 1
    }
}

/// DJB hash (seed 5381, `h * 33 + c`), reduced to `bit_size` bits.
pub fn word_hash_djb(gram: &str, bit_size: u32) -> u32 {
    let hash = gram.encode_utf16().fold(5381u32, |h, unit| {
        (h << 5).wrapping_add(h).wrapping_add(u32::from(unit))
    });
    hash & bitmask(bit_size)
}

/// `(offset basis, prime)` per supported FNV width.
const FNV_PARAMS: [(u32, u64, u64); 5] = [
    (2, 0x3, 0x3),
    (4, 0x7, 0x3),
    (8, 0xA3, 0x13),
    (16, 0x811C, 0x0101),
    (32, 0x811C_9DC5, 0x0100_0193),
];

/// FNV-1a hash with width-specific constants.
///
/// Fails with [`PHashError::UnsupportedBitWidth`] unless `bit_size` is one of
/// 2, 4, 8, 16 or 32.
pub fn word_hash_fnv1a(gram: &str, bit_size: u32) -> Result<u32, PHashError> {
    let (offset, prime) = FNV_PARAMS
        .iter()
        .find(|(bits, _, _)| *bits == bit_size)
        .map(|&(_, offset, prime)| (offset, prime))
        .ok_or(PHashError::UnsupportedBitWidth { bits: bit_size })?;
    let mask = u64::from(bitmask(bit_size));

    let hash = gram.encode_utf16().fold(offset, |h, unit| {
        ((h ^ u64::from(unit)).wrapping_mul(prime)) & mask
    });
    Ok(hash as u32)
}

const MURMUR_SEED: u32 = 0x9747_b28c;
const MURMUR_C1: u32 = 0xcc9e_2d51;
const MURMUR_C2: u32 = 0x1b87_3593;

/// Murmur3-derived hash over UTF-16 code units, reduced to `bit_size` bits.
pub fn word_hash_murmur3(gram: &str, bit_size: u32) -> u32 {
    let len = gram.encode_utf16().count() as u32;
    let mut h = MURMUR_SEED ^ len;

    for unit in gram.encode_utf16() {
        let mut k = u32::from(unit).wrapping_mul(MURMUR_C1);
        k = k.rotate_left(15);
        k = k.wrapping_mul(MURMUR_C2);

        h ^= k;
        h = h.rotate_left(13);
        h = h.wrapping_mul(5).wrapping_add(0xe654_6b64);
    }

    // avalanche
    h ^= h >> 16;
    h = h.wrapping_mul(0x85eb_ca6b);
    h ^= h >> 13;
    h = h.wrapping_mul(0xc2b2_ae35);
    h ^= h >> 16;

    h & bitmask(bit_size)
}
