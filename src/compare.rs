//! Digest comparison.
//!
//! Digests are compared by their decoded counter values, not bit patterns:
//! counts 2 (`10`) and 1 (`01`) differ by one, where a bitwise XOR would call
//! both bits mismatched. The score is the shared area under the two
//! histograms divided by their union.

use tracing::debug;

use crate::config::{PHashConfig, PHashError};
use crate::histogram::Histogram;

/// Percent match between two digests, in `[0, 100]`.
///
/// Only `word_hash_bit_size` and `hit_value_bits` of `cfg` are used; they
/// must match the configuration that produced both digests.
///
/// Two all-zero digests score 0, not 100: empty texts never match.
pub fn percent_match(
    digest_a: &str,
    digest_b: &str,
    cfg: &PHashConfig,
) -> Result<f64, PHashError> {
    let (left, right) = (digest_a.chars().count(), digest_b.chars().count());
    if left != right {
        return Err(PHashError::LengthMismatch { left, right });
    }
    cfg.validate()?;

    let hits_a = Histogram::from_digest(digest_a, cfg)?;
    let hits_b = Histogram::from_digest(digest_b, cfg)?;

    let score = overlap_percent(hits_a.counts(), hits_b.counts());
    debug!(score, digest_len = left, "percent_match");
    Ok(score)
}

/// `100 * (area - diff) / area`, where `area` is the sum of per-bucket maxima
/// and `diff` the sum of per-bucket absolute differences.
pub(crate) fn overlap_percent(a: &[u32], b: &[u32]) -> f64 {
    let (area, diff) = a
        .iter()
        .zip(b)
        .fold((0u64, 0u64), |(area, diff), (&x, &y)| {
            (area + u64::from(x.max(y)), diff + u64::from(x.abs_diff(y)))
        });

    if area == 0 {
        return 0.0;
    }
    100.0 * (area - diff) as f64 / area as f64
}
