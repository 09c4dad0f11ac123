//! # textphash
//!
//! Perceptual hashing for text. A pHash is a fixed-length fingerprint that
//! degrades gracefully under reordering, paraphrase or small edits, unlike a
//! cryptographic hash where a one-character change flips the whole output.
//! Two digests can be compared for a similarity percentage.
//!
//! ## Pipeline
//!
//! 1.  **Tokenize**: uppercase the text and extract words; letters of
//!     scripts written without spaces become single-character tokens.
//! 2.  **N-grams**: meld `ngram_words` neighbouring tokens into one unit.
//! 3.  **Histogram**: hash every n-gram into `word_hash_bit_size` bits and
//!     count hits per bucket.
//! 4.  **Normalize**: rescale counts to `0..=2^hit_value_bits - 1`, rounding
//!     up so a bucket with any hit stays non-zero.
//! 5.  **Encode**: pack the values as fixed-width fields and render them as
//!     uppercase hex.
//!
//! [`percent_match`] decodes two digests and measures the overlap of their
//! histograms: the shared area divided by the union area.
//!
//! Everything here is a pure function of `(text, config)`: no I/O, no global
//! state, safe to call from any number of threads.
//!
//! ## Example
//!
//! ```
//! use textphash::{compute_phash, percent_match, PHashConfig};
//!
//! let cfg = PHashConfig::default();
//! let a = compute_phash(Some("The quick brown fox jumped over the black fence."), &cfg).unwrap();
//! let b = compute_phash(Some("Over the black fence, the quick brown fox jumped."), &cfg).unwrap();
//!
//! assert_eq!(a.len(), 64);
//! assert!(percent_match(&a, &b, &cfg).unwrap() > 50.0);
//! ```

use std::time::Instant;

use rayon::prelude::*;
use tracing::{debug, warn, Level};

pub mod compare;
pub mod config;
pub mod config_file;
pub mod fingerprint;
pub mod histogram;
mod ngram;
mod token;
pub mod word_hash;

pub use crate::compare::percent_match;
pub use crate::config::{PHashConfig, PHashError};
pub use crate::config_file::{ConfigLoadError, PHashFileConfig};
pub use crate::fingerprint::{PHashMeta, TextFingerprint};
pub use crate::histogram::Histogram;
pub use crate::ngram::ngrams;
pub use crate::token::tokenize;
pub use crate::word_hash::{
    word_hash_djb, word_hash_fnv1a, word_hash_murmur3, WordHashFunction, WordHasher,
};

/// Current algorithm version.
pub const PHASH_VERSION: u16 = 1;

/// Human-readable algorithm identifier.
pub const PHASH_ALGORITHM: &str = "ngram_histogram_v1";

/// Compute the pHash digest of `text`.
///
/// `None` fails with [`PHashError::InvalidInput`]. Empty text, or text with
/// no word-like tokens, is valid and yields an all-`0` digest.
pub fn compute_phash(text: Option<&str>, cfg: &PHashConfig) -> Result<String, PHashError> {
    let text = text.ok_or(PHashError::InvalidInput)?;
    phash_text(text, cfg)
}

/// [`compute_phash`] for text that is known to be present.
pub fn phash_text(text: &str, cfg: &PHashConfig) -> Result<String, PHashError> {
    fingerprint_text(text, cfg).map(|fp| fp.digest)
}

/// Fingerprint `text` with the configured built-in word hash.
pub fn fingerprint_text(text: &str, cfg: &PHashConfig) -> Result<TextFingerprint, PHashError> {
    fingerprint_inner(text, cfg, &cfg.word_hash, Some(cfg.word_hash))
}

/// Fingerprint `text` with a caller-supplied word hash.
///
/// `cfg.word_hash` is ignored. The hasher must return values below
/// `2^cfg.word_hash_bit_size`; anything else fails with
/// [`PHashError::HashOutOfRange`].
pub fn fingerprint_text_with<H>(
    text: &str,
    cfg: &PHashConfig,
    hasher: &H,
) -> Result<TextFingerprint, PHashError>
where
    H: WordHasher + ?Sized,
{
    fingerprint_inner(text, cfg, hasher, None)
}

/// Digests for many texts, computed in parallel. Output order follows input
/// order; the first failure aborts the batch.
pub fn compute_phash_batch<S>(texts: &[S], cfg: &PHashConfig) -> Result<Vec<String>, PHashError>
where
    S: AsRef<str> + Sync,
{
    cfg.validate()?;
    texts
        .par_iter()
        .map(|text| phash_text(text.as_ref(), cfg))
        .collect()
}

fn fingerprint_inner<H>(
    text: &str,
    cfg: &PHashConfig,
    hasher: &H,
    word_hash: Option<WordHashFunction>,
) -> Result<TextFingerprint, PHashError>
where
    H: WordHasher + ?Sized,
{
    let start = Instant::now();
    let span = tracing::span!(
        Level::DEBUG,
        "phash.fingerprint",
        text_len = text.len(),
        ngram_words = cfg.ngram_words,
        word_hash = word_hash.map_or("custom", |f| f.as_str())
    );
    let _guard = span.enter();

    match build_fingerprint(text, cfg, hasher, word_hash) {
        Ok(fp) => {
            debug!(
                token_count = fp.token_count,
                ngram_count = fp.ngram_count,
                max_hits = fp.histogram.iter().copied().max().unwrap_or(0),
                elapsed_micros = start.elapsed().as_micros() as u64,
                "phash_computed"
            );
            Ok(fp)
        }
        Err(err) => {
            warn!(
                error = %err,
                elapsed_micros = start.elapsed().as_micros() as u64,
                "phash_failure"
            );
            Err(err)
        }
    }
}

fn build_fingerprint<H>(
    text: &str,
    cfg: &PHashConfig,
    hasher: &H,
    word_hash: Option<WordHashFunction>,
) -> Result<TextFingerprint, PHashError>
where
    H: WordHasher + ?Sized,
{
    cfg.validate()?;

    let mut histogram = Histogram::new(cfg);

    // Blank documents, or ones holding only non-word items, skip hashing.
    let tokens = tokenize(text);
    let grams = ngrams(&tokens, cfg.ngram_words);
    for gram in &grams {
        let bucket = hasher.word_hash(gram, cfg.word_hash_bit_size)?;
        if !histogram.record(bucket) {
            return Err(PHashError::HashOutOfRange {
                value: bucket,
                buckets: histogram.len(),
            });
        }
    }

    let digest = histogram.to_digest(cfg);

    Ok(TextFingerprint {
        digest,
        histogram: histogram.counts().to_vec(),
        token_count: tokens.len(),
        ngram_count: grams.len(),
        meta: PHashMeta {
            version: PHASH_VERSION,
            algorithm_name: PHASH_ALGORITHM.to_string(),
            word_hash_bit_size: cfg.word_hash_bit_size,
            hit_value_bits: cfg.hit_value_bits,
            ngram_words: cfg.ngram_words,
            word_hash,
        },
    })
}
