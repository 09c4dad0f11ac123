//! Hit histogram and its packed hex form.
//!
//! Layout of a digest: one `hit_value_bits`-wide field per bucket, most
//! significant bit first, buckets in index order, the resulting bit stream
//! read four bits at a time as uppercase hex digits. Packing and unpacking
//! use shifts and masks over a small accumulator.

use crate::config::{PHashConfig, PHashError};

/// Fixed-size array of hit counters indexed by word-hash value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Histogram {
    counts: Vec<u32>,
}

impl Histogram {
    /// All-zero histogram with `2^word_hash_bit_size` buckets.
    pub fn new(cfg: &PHashConfig) -> Self {
        Self {
            counts: vec![0; cfg.bucket_count()],
        }
    }

    /// Wrap raw counters, one per bucket.
    pub fn from_counts(counts: Vec<u32>) -> Self {
        Self { counts }
    }

    /// Register one hit for `bucket`. Returns `false` if the bucket is out of
    /// range, which means the word hasher broke its contract.
    pub fn record(&mut self, bucket: u32) -> bool {
        match self.counts.get_mut(bucket as usize) {
            Some(count) => {
                *count = count.saturating_add(1);
                true
            }
            None => false,
        }
    }

    pub fn counts(&self) -> &[u32] {
        &self.counts
    }

    pub fn len(&self) -> usize {
        self.counts.len()
    }

    /// True when no bucket has a hit.
    pub fn is_all_zero(&self) -> bool {
        self.counts.iter().all(|&c| c == 0)
    }

    pub fn max_hits(&self) -> u32 {
        self.counts.iter().copied().max().unwrap_or(0)
    }

    /// Rescale counters to `0..=max_value` relative to the busiest bucket.
    ///
    /// Uses the ceiling, so any bucket with at least one hit keeps a value of
    /// at least 1. An all-zero histogram stays all-zero.
    pub fn normalized(&self, max_value: u32) -> Vec<u32> {
        let max_hits = u64::from(self.max_hits());
        if max_hits == 0 {
            return vec![0; self.counts.len()];
        }
        let max_value = u64::from(max_value);
        self.counts
            .iter()
            .map(|&c| {
                let scaled = max_value * u64::from(c);
                scaled.div_ceil(max_hits) as u32
            })
            .collect()
    }

    /// Normalize and pack into an uppercase hex digest.
    pub fn to_digest(&self, cfg: &PHashConfig) -> String {
        encode_fields(&self.normalized(cfg.max_hit_value()), cfg.hit_value_bits)
    }

    /// Unpack a digest into its per-bucket normalized values.
    ///
    /// The digest must be exactly [`PHashConfig::digest_len`] hex digits.
    pub fn from_digest(digest: &str, cfg: &PHashConfig) -> Result<Self, PHashError> {
        let expected = cfg.digest_len();
        let actual = digest.chars().count();
        if actual != expected {
            return Err(PHashError::InvalidDigest {
                reason: format!("expected {expected} hex digits, got {actual}"),
            });
        }
        let counts = decode_fields(digest, cfg.hit_value_bits, cfg.bucket_count())?;
        Ok(Self { counts })
    }
}

const HEX_DIGITS: &[u8; 16] = b"0123456789ABCDEF";

/// Pack `values` as `bits`-wide fields and render them as hex.
///
/// `bits` is at most 16 so the accumulator never holds more than 19 bits.
fn encode_fields(values: &[u32], bits: u32) -> String {
    let mask = (1u64 << bits) - 1;
    let mut out = String::with_capacity(values.len() * bits as usize / 4 + 1);
    let mut acc: u64 = 0;
    let mut pending: u32 = 0;

    for &value in values {
        acc = (acc << bits) | (u64::from(value) & mask);
        pending += bits;
        while pending >= 4 {
            pending -= 4;
            let nibble = (acc >> pending) & 0xF;
            out.push(HEX_DIGITS[nibble as usize] as char);
        }
        acc &= (1u64 << pending) - 1;
    }
    // A trailing partial chunk is emitted as-is, like a short final group.
    if pending > 0 {
        out.push(HEX_DIGITS[(acc & 0xF) as usize] as char);
    }
    out
}

fn decode_fields(digest: &str, bits: u32, fields: usize) -> Result<Vec<u32>, PHashError> {
    let mask = (1u64 << bits) - 1;
    let mut values = Vec::with_capacity(fields);
    let mut acc: u64 = 0;
    let mut pending: u32 = 0;

    for ch in digest.chars() {
        let nibble = ch.to_digit(16).ok_or_else(|| PHashError::InvalidDigest {
            reason: format!("`{ch}` is not a hex digit"),
        })?;
        acc = (acc << 4) | u64::from(nibble);
        pending += 4;
        while pending >= bits && values.len() < fields {
            pending -= bits;
            values.push(((acc >> pending) & mask) as u32);
        }
        acc &= (1u64 << pending) - 1;
    }
    values.resize(fields, 0);
    Ok(values)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cfg(word_bits: u32, hit_bits: u32) -> PHashConfig {
        PHashConfig::new()
            .with_word_hash_bit_size(word_bits)
            .with_hit_value_bits(hit_bits)
    }

    #[test]
    fn new_histogram_is_all_zero() {
        let h = Histogram::new(&PHashConfig::default());
        assert_eq!(h.len(), 64);
        assert!(h.is_all_zero());
        assert_eq!(h.max_hits(), 0);
    }

    #[test]
    fn record_counts_hits_and_rejects_out_of_range() {
        let mut h = Histogram::new(&cfg(2, 4));
        assert!(h.record(1));
        assert!(h.record(1));
        assert!(h.record(3));
        assert!(!h.record(4));
        assert_eq!(h.counts(), &[0, 2, 0, 1]);
        assert_eq!(h.max_hits(), 2);
        assert!(!h.is_all_zero());
    }

    #[test]
    fn normalization_uses_ceiling() {
        let h = Histogram::from_counts(vec![0, 1, 500, 1000]);
        assert_eq!(h.normalized(15), vec![0, 1, 8, 15]);
    }

    #[test]
    fn normalization_of_empty_histogram_is_zero() {
        let h = Histogram::from_counts(vec![0; 8]);
        assert_eq!(h.normalized(15), vec![0; 8]);
    }

    #[test]
    fn single_hit_normalizes_to_max() {
        let h = Histogram::from_counts(vec![0, 0, 1, 0]);
        assert_eq!(h.normalized(3), vec![0, 0, 3, 0]);
    }

    #[test]
    fn four_bit_fields_map_to_one_digit_each() {
        let h = Histogram::from_counts(vec![15, 0, 10, 1]);
        assert_eq!(h.to_digest(&cfg(2, 4)), "F0A1");
    }

    #[test]
    fn two_bit_fields_pack_msb_first() {
        // Normalized [3, 1, 2, 0] -> 11 01 10 00 -> 0xD8.
        let h = Histogram::from_counts(vec![3, 1, 2, 0]);
        assert_eq!(h.to_digest(&cfg(2, 2)), "D8");
    }

    #[test]
    fn six_bit_fields_cross_nibble_boundaries() {
        // 4 x 6 bits: 111111 000001 100000 000010
        // -> 1111 1100 0001 1000 0000 0010 -> FC1802
        let fields = encode_fields(&[63, 1, 32, 2], 6);
        assert_eq!(fields, "FC1802");
        assert_eq!(decode_fields("FC1802", 6, 4), Ok(vec![63, 1, 32, 2]));
    }

    #[test]
    fn digest_decodes_back_to_normalized_values() {
        let config = cfg(3, 4);
        let h = Histogram::from_counts(vec![0, 3, 7, 1, 0, 0, 14, 2]);
        let digest = h.to_digest(&config);
        assert_eq!(digest.len(), config.digest_len());

        let decoded = Histogram::from_digest(&digest, &config).unwrap();
        assert_eq!(decoded.counts(), h.normalized(config.max_hit_value()).as_slice());
        assert!(decoded.counts().iter().all(|&v| v <= config.max_hit_value()));
    }

    #[test]
    fn decoding_accepts_lowercase() {
        let config = cfg(2, 4);
        let decoded = Histogram::from_digest("f0a1", &config).unwrap();
        assert_eq!(decoded.counts(), &[15, 0, 10, 1]);
    }

    #[test]
    fn decoding_rejects_wrong_length() {
        let err = Histogram::from_digest("F0A", &cfg(2, 4)).unwrap_err();
        assert!(matches!(err, PHashError::InvalidDigest { .. }));
    }

    #[test]
    fn decoding_rejects_non_hex() {
        let err = Histogram::from_digest("F0AZ", &cfg(2, 4)).unwrap_err();
        assert!(err.to_string().contains("`Z` is not a hex digit"));
    }

    #[test]
    fn empty_histogram_digest_is_all_zero() {
        let config = PHashConfig::default();
        let digest = Histogram::new(&config).to_digest(&config);
        assert_eq!(digest, "0".repeat(64));
    }
}
