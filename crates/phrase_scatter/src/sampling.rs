//! Random helpers shared by zone, size, and color selection.
//!
//! Every random decision in the crate goes through a caller-supplied [`RngCore`],
//! so seeding the generator reproduces a layout exactly.
use std::ops::RangeInclusive;

use rand::Rng as RngCore;

/// Generate a random float in the range [0, 1).
#[inline]
pub(crate) fn rand01(rng: &mut dyn RngCore) -> f64 {
    (rng.next_u32() as f64) / ((u32::MAX as f64) + 1.0)
}

/// Uniform index in `0..len`. `len` must be non-zero.
#[inline]
pub(crate) fn rand_index(rng: &mut dyn RngCore, len: usize) -> usize {
    debug_assert!(len > 0, "rand_index needs a non-empty range");
    ((rand01(rng) * len as f64) as usize).min(len - 1)
}

/// Uniform integer in an inclusive range. Empty ranges yield their start.
pub(crate) fn rand_inclusive(rng: &mut dyn RngCore, range: RangeInclusive<i64>) -> i64 {
    let (lo, hi) = range.into_inner();
    if hi <= lo {
        return lo;
    }
    let span = (hi - lo) as u64 + 1;
    let offset = ((rand01(rng) * span as f64) as u64).min(span - 1);
    lo + offset as i64
}

/// Uniformly pick one element of `items`.
pub(crate) fn choose<'a, T>(items: &'a [T], rng: &mut dyn RngCore) -> Option<&'a T> {
    if items.is_empty() {
        None
    } else {
        items.get(rand_index(rng, items.len()))
    }
}

/// Pick an index proportionally to `weights`. Returns `None` when every weight is zero.
pub(crate) fn weighted_index(weights: &[u64], rng: &mut dyn RngCore) -> Option<usize> {
    let total: u64 = weights.iter().sum();
    if total == 0 {
        return None;
    }
    let mut roll = ((rand01(rng) * total as f64) as u64).min(total - 1);
    for (i, &w) in weights.iter().enumerate() {
        if roll < w {
            return Some(i);
        }
        roll -= w;
    }
    None
}
