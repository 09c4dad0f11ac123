//! Fingerprint and metadata types.
//!
//! The digest string is the only artifact meant to cross process or storage
//! boundaries. [`TextFingerprint`] wraps it with the raw histogram and enough
//! metadata to tell which parameters produced it.

use serde::{Deserialize, Serialize};

use crate::word_hash::WordHashFunction;

/// Result of fingerprinting one text.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct TextFingerprint {
    /// Uppercase hex digest of the normalized histogram.
    pub digest: String,
    /// Raw per-bucket hit counts before normalization.
    pub histogram: Vec<u32>,
    /// Number of tokens extracted from the text.
    pub token_count: usize,
    /// Number of n-grams hashed into the histogram.
    pub ngram_count: usize,
    pub meta: PHashMeta,
}

impl TextFingerprint {
    /// True when no n-gram was hashed (empty or tokenless text).
    pub fn is_blank(&self) -> bool {
        self.ngram_count == 0
    }
}

/// Metadata for traceability and determinism.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct PHashMeta {
    /// Algorithm version; bumped whenever a change can alter digests.
    pub version: u16,
    pub algorithm_name: String,
    pub word_hash_bit_size: u32,
    pub hit_value_bits: u32,
    pub ngram_words: usize,
    /// Built-in hash used, or `None` for a caller-supplied hasher.
    pub word_hash: Option<WordHashFunction>,
}
