// src/mask.rs

//! Active-lane mask for a (possibly partial) batch.
//!
//! Lane 0 lives in the most significant bit, so earlier vertices occupy the
//! high end of the mask. A batch of `n < 16` vertices activates the top `n`
//! bits and leaves the rest clear.

use crate::lanes::LANES;
use bitflags::bitflags;

bitflags! {
    /// One bit per lane, high-order-first: bit 15 is lane 0, bit 0 is lane 15.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct LaneMask: u16 {
        const LANE_0 = 1 << 15;
        const ALL    = 0xffff;
    }
}

impl LaneMask {
    /// Mask for a batch holding `num_vertices` real vertices.
    ///
    /// Anything at or above 16 saturates to all lanes.
    pub fn for_vertex_count(num_vertices: usize) -> Self {
        if num_vertices >= LANES {
            return Self::ALL;
        }
        let bits = (0xffff_0000u32 >> num_vertices) & 0xffff;
        Self::from_bits_retain(bits as u16)
    }

    #[inline(always)]
    fn lane_bit(lane: usize) -> u16 {
        debug_assert!(lane < LANES);
        0x8000 >> lane
    }

    pub fn is_lane_active(self, lane: usize) -> bool {
        lane < LANES && self.bits() & Self::lane_bit(lane) != 0
    }

    pub fn active_count(self) -> usize {
        self.bits().count_ones() as usize
    }

    /// Active lane indices in ascending order.
    pub fn active_lanes(self) -> impl Iterator<Item = usize> {
        (0..LANES).filter(move |&lane| self.is_lane_active(lane))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test_log::test]
    fn test_full_batch_activates_every_lane() {
        let mask = LaneMask::for_vertex_count(16);
        assert_eq!(mask, LaneMask::ALL);
        assert_eq!(mask.active_count(), 16);
        assert!((0..16).all(|lane| mask.is_lane_active(lane)));
    }

    #[test_log::test]
    fn test_partial_batch_is_high_order_first() {
        let mask = LaneMask::for_vertex_count(3);
        assert_eq!(mask.bits(), 0b1110_0000_0000_0000);
        assert_eq!(mask.active_lanes().collect::<Vec<_>>(), vec![0, 1, 2]);
        assert!((3..16).all(|lane| !mask.is_lane_active(lane)));
    }

    #[test_log::test]
    fn test_single_and_fifteen() {
        assert_eq!(LaneMask::for_vertex_count(1), LaneMask::LANE_0);
        assert_eq!(LaneMask::for_vertex_count(15).bits(), 0xfffe);
    }

    #[test_log::test]
    fn test_zero_vertices_is_empty() {
        let mask = LaneMask::for_vertex_count(0);
        assert!(mask.is_empty());
        assert_eq!(mask.active_lanes().count(), 0);
    }

    #[test_log::test]
    fn test_oversized_count_saturates() {
        assert_eq!(LaneMask::for_vertex_count(40), LaneMask::ALL);
    }

    #[test_log::test]
    fn test_out_of_range_lane_is_inactive() {
        assert!(!LaneMask::ALL.is_lane_active(16));
    }
}
