//! Configuration and error types for text pHash computation.
//!
//! This module defines the public configuration surface. It is free of any
//! I/O or environment-dependent behavior so that a digest is a pure function
//! of `(text, config)`. Loading a configuration from disk lives in
//! [`crate::config_file`].

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::word_hash::WordHashFunction;

/// Largest supported `word_hash_bit_size` (a 1M-bucket histogram).
pub const MAX_WORD_HASH_BIT_SIZE: u32 = 20;

/// Largest supported `hit_value_bits`.
pub const MAX_HIT_VALUE_BITS: u32 = 16;

/// Parameter set governing one fingerprint computation.
///
/// Two digests can only be compared when they were produced with the same
/// `word_hash_bit_size` and `hit_value_bits`. The digest carries no header,
/// so keeping those in agreement is the caller's job.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct PHashConfig {
    /// Bits per word-hash bucket index.
    ///
    /// The histogram holds `2^word_hash_bit_size` counters. Hashes are not
    /// meant to be unique, only to build a histogram of melded n-gram
    /// frequencies.
    pub word_hash_bit_size: u32,
    /// Bits per normalized histogram counter.
    ///
    /// Raw hit counts are rescaled to `0..=2^hit_value_bits - 1` before
    /// packing. This is the "y value" of the histogram.
    pub hit_value_bits: u32,
    /// Number of neighbouring tokens hashed together.
    ///
    /// `1`: ABCDE => [A, B, C, D, E], `2`: ABCDE => [AB, BC, CD, DE].
    pub ngram_words: usize,
    /// Hash applied to every n-gram.
    ///
    /// Changing it for an existing corpus invalidates every stored digest.
    pub word_hash: WordHashFunction,
}

impl PHashConfig {
    /// Create a new configuration with the recommended defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the number of bits per bucket index. Typical values: 6-8.
    pub fn with_word_hash_bit_size(mut self, bits: u32) -> Self {
        self.word_hash_bit_size = bits;
        self
    }

    /// Set the number of bits per normalized counter. Typical values: 2-4.
    pub fn with_hit_value_bits(mut self, bits: u32) -> Self {
        self.hit_value_bits = bits;
        self
    }

    /// Set the n-gram width in tokens.
    /// Larger values are more order sensitive; `1` is a plain bag of words.
    pub fn with_ngram_words(mut self, ngram_words: usize) -> Self {
        self.ngram_words = ngram_words;
        self
    }

    /// Select the word-hash function.
    pub fn with_word_hash(mut self, word_hash: WordHashFunction) -> Self {
        self.word_hash = word_hash;
        self
    }

    /// Number of histogram buckets (`2^word_hash_bit_size`).
    pub fn bucket_count(&self) -> usize {
        1usize
            .checked_shl(self.word_hash_bit_size)
            .unwrap_or(usize::MAX)
    }

    /// Largest normalized counter value (`2^hit_value_bits - 1`).
    pub fn max_hit_value(&self) -> u32 {
        1u32.checked_shl(self.hit_value_bits)
            .map_or(u32::MAX, |v| v - 1)
    }

    /// Length in hex characters of every digest built with this config.
    pub fn digest_len(&self) -> usize {
        self.bucket_count().saturating_mul(self.hit_value_bits as usize) / 4
    }

    /// Validate configuration parameters.
    pub fn validate(&self) -> Result<(), PHashError> {
        if self.word_hash_bit_size == 0 || self.word_hash_bit_size > MAX_WORD_HASH_BIT_SIZE {
            return Err(PHashError::InvalidConfigWordHashBits {
                bits: self.word_hash_bit_size,
            });
        }
        if self.hit_value_bits == 0 || self.hit_value_bits > MAX_HIT_VALUE_BITS {
            return Err(PHashError::InvalidConfigHitValueBits {
                bits: self.hit_value_bits,
            });
        }
        if self.ngram_words == 0 {
            return Err(PHashError::InvalidConfigNgramWords {
                ngram_words: self.ngram_words,
            });
        }

        // Every digest nibble must be fully populated.
        let total_bits = self.bucket_count() * self.hit_value_bits as usize;
        if total_bits % 4 != 0 {
            return Err(PHashError::InvalidConfigDigestWidth {
                word_hash_bit_size: self.word_hash_bit_size,
                hit_value_bits: self.hit_value_bits,
            });
        }

        Ok(())
    }
}

impl Default for PHashConfig {
    fn default() -> Self {
        Self {
            word_hash_bit_size: 6,
            hit_value_bits: 4,
            ngram_words: 2,
            word_hash: WordHashFunction::Djb,
        }
    }
}

/// Errors returned by hashing and comparison.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum PHashError {
    #[error("text is null")]
    InvalidInput,

    #[error("digests must be of the same length (got {left} and {right})")]
    LengthMismatch { left: usize, right: usize },

    #[error("unsupported bit size: {bits}")]
    UnsupportedBitWidth { bits: u32 },

    #[error("word hash returned {value}, outside 0..{buckets}")]
    HashOutOfRange { value: u32, buckets: usize },

    #[error("invalid digest: {reason}")]
    InvalidDigest { reason: String },

    #[error("unknown word hash function `{name}`; expected djb, fnv1a or murmur3")]
    UnknownWordHash { name: String },

    #[error(
        "invalid config: word_hash_bit_size must be in 1..={max} (got {bits})",
        max = MAX_WORD_HASH_BIT_SIZE
    )]
    InvalidConfigWordHashBits { bits: u32 },

    #[error(
        "invalid config: hit_value_bits must be in 1..={max} (got {bits})",
        max = MAX_HIT_VALUE_BITS
    )]
    InvalidConfigHitValueBits { bits: u32 },

    #[error("invalid config: ngram_words must be >= 1 (got {ngram_words})")]
    InvalidConfigNgramWords { ngram_words: usize },

    #[error(
        "invalid config: 2^{word_hash_bit_size} buckets x {hit_value_bits} bits is not a whole number of hex digits"
    )]
    InvalidConfigDigestWidth {
        word_hash_bit_size: u32,
        hit_value_bits: u32,
    },
}
