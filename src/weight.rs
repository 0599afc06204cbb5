//! Edge weight / distance numeric types.
//!
//! Distances are carried in the graph's weight type. Every type has a
//! distinguished `INFINITY` sentinel (max value for integers) and additions
//! saturate to it, so an overflowing path is indistinguishable from no path.

use std::fmt::Debug;

use crate::state::{DistanceSlot, LockedSlot, PackedSlot};

pub trait Weight: Copy + PartialOrd + Debug + Send + Sync + 'static {
    const ZERO: Self;
    const INFINITY: Self;

    /// Per-vertex storage used by the engine for labels.
    type Slot: DistanceSlot<Self>;

    /// `self + other`, saturating at `INFINITY`.
    fn saturating_add(self, other: Self) -> Self;

    /// Accepted as an edge weight: non-negative and not NaN.
    fn is_valid_weight(self) -> bool;

    fn to_f64(self) -> f64;

    #[inline(always)]
    fn is_infinite(self) -> bool {
        self >= Self::INFINITY
    }
}

/// Weights whose non-negative values map onto `u32` keys in order, so a
/// `(dist, via)` pair packs into one `AtomicU64`.
pub trait PackedWeight: Weight {
    fn to_key(self) -> u32;
    fn from_key(key: u32) -> Self;
}

impl Weight for f32 {
    const ZERO: Self = 0.0;
    const INFINITY: Self = f32::INFINITY;
    type Slot = PackedSlot<f32>;

    #[inline(always)]
    fn saturating_add(self, other: Self) -> Self { self + other }
    #[inline(always)]
    fn is_valid_weight(self) -> bool { self >= 0.0 }
    #[inline(always)]
    fn to_f64(self) -> f64 { self as f64 }
}

impl PackedWeight for f32 {
    // adding +0.0 folds -0.0 onto +0.0; positive IEEE floats order like their bit patterns
    #[inline(always)]
    fn to_key(self) -> u32 { (self + 0.0).to_bits() }
    #[inline(always)]
    fn from_key(key: u32) -> Self { f32::from_bits(key) }
}

impl Weight for f64 {
    const ZERO: Self = 0.0;
    const INFINITY: Self = f64::INFINITY;
    type Slot = LockedSlot<f64>;

    #[inline(always)]
    fn saturating_add(self, other: Self) -> Self { self + other }
    #[inline(always)]
    fn is_valid_weight(self) -> bool { self >= 0.0 }
    #[inline(always)]
    fn to_f64(self) -> f64 { self }
}

impl Weight for u32 {
    const ZERO: Self = 0;
    const INFINITY: Self = u32::MAX;
    type Slot = PackedSlot<u32>;

    #[inline(always)]
    fn saturating_add(self, other: Self) -> Self { u32::saturating_add(self, other) }
    #[inline(always)]
    fn is_valid_weight(self) -> bool { true }
    #[inline(always)]
    fn to_f64(self) -> f64 { self as f64 }
}

impl PackedWeight for u32 {
    #[inline(always)]
    fn to_key(self) -> u32 { self }
    #[inline(always)]
    fn from_key(key: u32) -> Self { key }
}

impl Weight for i32 {
    const ZERO: Self = 0;
    const INFINITY: Self = i32::MAX;
    type Slot = PackedSlot<i32>;

    #[inline(always)]
    fn saturating_add(self, other: Self) -> Self { i32::saturating_add(self, other) }
    #[inline(always)]
    fn is_valid_weight(self) -> bool { self >= 0 }
    #[inline(always)]
    fn to_f64(self) -> f64 { self as f64 }
}

impl PackedWeight for i32 {
    #[inline(always)]
    fn to_key(self) -> u32 { self as u32 }
    #[inline(always)]
    fn from_key(key: u32) -> Self { key as i32 }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn float_keys_preserve_order() {
        let xs = [0.0f32, 1e-30, 0.5, 1.0, 3.25, 1e30, f32::INFINITY];
        for w in xs.windows(2) { assert!(w[0].to_key() < w[1].to_key(), "{} vs {}", w[0], w[1]); }
        assert_eq!((-0.0f32).to_key(), 0.0f32.to_key());
    }

    #[test]
    fn integer_addition_saturates_to_infinity() {
        assert_eq!(i32::MAX - 1, (i32::MAX - 3).saturating_add(2));
        assert!((i32::MAX - 1).saturating_add(5).is_infinite());
        assert!(Weight::saturating_add(u32::MAX, 0).is_infinite());
    }

    #[test]
    fn negative_and_nan_weights_rejected() {
        assert!(!(-1.0f32).is_valid_weight());
        assert!(!f64::NAN.is_valid_weight());
        assert!(!(-3i32).is_valid_weight());
        assert!(0i32.is_valid_weight());
    }
}
