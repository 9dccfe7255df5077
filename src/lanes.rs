// src/lanes.rs

//! Fixed-width 16-lane value types.
//!
//! `F32x16` and `Usizex16` are the portable lane vectors the batch loop works
//! in. Every operation is lane-wise; lane *i* always belongs to vertex *i* of
//! the current batch. The arrays are plain `[T; 16]` so the compiler is free
//! to auto-vectorise them, and a hardware path can sit behind the same API.

use core::ops::{Add, Div, Mul, MulAssign, Neg, Sub};

/// Number of lanes in one batch.
pub const LANES: usize = 16;

/// Sixteen `f32` lanes.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
#[repr(transparent)]
pub struct F32x16([f32; LANES]);

impl F32x16 {
    /// Splat a scalar across all lanes.
    #[inline(always)]
    pub const fn splat(val: f32) -> Self {
        Self([val; LANES])
    }

    #[inline(always)]
    pub const fn from_array(lanes: [f32; LANES]) -> Self {
        Self(lanes)
    }

    #[inline(always)]
    pub const fn to_array(self) -> [f32; LANES] {
        self.0
    }

    /// Value held by `lane`. Panics if `lane >= LANES`.
    #[inline(always)]
    pub fn lane(&self, lane: usize) -> f32 {
        self.0[lane]
    }

    #[inline(always)]
    pub fn set_lane(&mut self, lane: usize, val: f32) {
        self.0[lane] = val;
    }

    /// Lane-wise `1.0 / x`. Zero produces infinity, NaN stays NaN.
    #[inline(always)]
    pub fn recip(self) -> Self {
        Self::splat(1.0) / self
    }

    /// `self * b + c`, lane-wise.
    #[inline(always)]
    pub fn mul_add(self, b: Self, c: Self) -> Self {
        self * b + c
    }

    #[inline(always)]
    fn zip_with(self, rhs: Self, f: impl Fn(f32, f32) -> f32) -> Self {
        let mut out = [0.0f32; LANES];
        for (i, o) in out.iter_mut().enumerate() {
            *o = f(self.0[i], rhs.0[i]);
        }
        Self(out)
    }
}

impl From<[f32; LANES]> for F32x16 {
    fn from(lanes: [f32; LANES]) -> Self {
        Self(lanes)
    }
}

// ============================================================================
// Operator Implementations
// ============================================================================

impl Add for F32x16 {
    type Output = Self;
    #[inline(always)]
    fn add(self, rhs: Self) -> Self {
        self.zip_with(rhs, |a, b| a + b)
    }
}

impl Sub for F32x16 {
    type Output = Self;
    #[inline(always)]
    fn sub(self, rhs: Self) -> Self {
        self.zip_with(rhs, |a, b| a - b)
    }
}

impl Mul for F32x16 {
    type Output = Self;
    #[inline(always)]
    fn mul(self, rhs: Self) -> Self {
        self.zip_with(rhs, |a, b| a * b)
    }
}

impl Div for F32x16 {
    type Output = Self;
    #[inline(always)]
    fn div(self, rhs: Self) -> Self {
        self.zip_with(rhs, |a, b| a / b)
    }
}

impl MulAssign for F32x16 {
    #[inline(always)]
    fn mul_assign(&mut self, rhs: Self) {
        *self = *self * rhs;
    }
}

impl Neg for F32x16 {
    type Output = Self;
    #[inline(always)]
    fn neg(self) -> Self {
        Self(self.0.map(|v| -v))
    }
}

/// Sixteen `usize` lanes, used for byte offsets and addresses.
///
/// Arithmetic is checked or saturating; an offset never wraps back into range.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
#[repr(transparent)]
pub struct Usizex16([usize; LANES]);

impl Usizex16 {
    #[inline(always)]
    pub const fn splat(val: usize) -> Self {
        Self([val; LANES])
    }

    /// Step vector scaled by `scale`: lane *i* holds `i * scale`.
    /// `None` if the last lane does not fit in a `usize`.
    pub fn step(scale: usize) -> Option<Self> {
        (LANES - 1).checked_mul(scale)?;
        Some(Self(core::array::from_fn(|i| i * scale)))
    }

    #[inline(always)]
    pub fn lane(&self, lane: usize) -> usize {
        self.0[lane]
    }

    /// Lane-wise add, clamped at `usize::MAX`.
    #[inline(always)]
    pub fn saturating_add(self, rhs: Self) -> Self {
        Self(core::array::from_fn(|i| self.0[i].saturating_add(rhs.0[i])))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test_log::test]
    fn test_step_vector_lanes() {
        let step = Usizex16::step(4).unwrap();
        for i in 0..LANES {
            assert_eq!(step.lane(i), i * 4);
        }
    }

    #[test_log::test]
    fn test_step_rejects_overflowing_scale() {
        assert!(Usizex16::step(usize::MAX / 8).is_none());
        assert!(Usizex16::step(usize::MAX / 15).is_some());
    }

    #[test_log::test]
    fn test_saturating_add_clamps() {
        let sum = Usizex16::splat(usize::MAX - 1).saturating_add(Usizex16::step(1).unwrap());
        assert_eq!(sum.lane(0), usize::MAX - 1);
        assert_eq!(sum.lane(1), usize::MAX);
        assert_eq!(sum.lane(15), usize::MAX);
    }

    #[test_log::test]
    fn test_recip_follows_ieee() {
        let mut v = F32x16::splat(2.0);
        v.set_lane(1, 0.0);
        v.set_lane(2, f32::NAN);
        let r = v.recip();
        assert_eq!(r.lane(0), 0.5);
        assert!(r.lane(1).is_infinite());
        assert!(r.lane(2).is_nan());
    }

    #[test_log::test]
    fn test_lanewise_arithmetic() {
        let a = F32x16::from_array(core::array::from_fn(|i| i as f32));
        let b = F32x16::splat(2.0);
        let sum = a + b;
        let prod = a * b;
        let fused = a.mul_add(b, F32x16::splat(1.0));
        for i in 0..LANES {
            assert_eq!(sum.lane(i), i as f32 + 2.0);
            assert_eq!(prod.lane(i), i as f32 * 2.0);
            assert_eq!(fused.lane(i), i as f32 * 2.0 + 1.0);
            assert_eq!((-a).lane(i), -(i as f32));
        }
    }
}
