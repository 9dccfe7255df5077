// src/stride.rs

//! Stride/addressing engine.
//!
//! A `StrideVector` is computed once per record size and holds, for each
//! lane, the byte offset of that lane's record from the batch base. Adding a
//! base address yields per-lane gather/scatter addresses; stepping by four
//! bytes moves every lane to the next float of its record.

use crate::lanes::Usizex16;

/// Size of one float in the packed buffers, in bytes.
pub const FLOAT_BYTES: usize = 4;

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct StrideVector {
    floats_per_record: usize,
    offsets: Usizex16,
}

impl StrideVector {
    /// Lane *i* holds `i * 4 * floats_per_record`.
    ///
    /// `None` when the offset of the last lane does not fit in a `usize`.
    pub fn for_record(floats_per_record: usize) -> Option<Self> {
        let record_bytes = floats_per_record.checked_mul(FLOAT_BYTES)?;
        Some(Self {
            floats_per_record,
            offsets: Usizex16::step(record_bytes)?,
        })
    }

    pub fn floats_per_record(&self) -> usize {
        self.floats_per_record
    }

    pub fn offsets(&self) -> Usizex16 {
        self.offsets
    }

    /// Byte offset of `lane`'s record relative to the batch base.
    pub fn lane_offset(&self, lane: usize) -> usize {
        self.offsets.lane(lane)
    }

    /// Per-lane byte addresses of each record's first float, given the
    /// byte address of the batch's first record.
    pub fn lane_addresses(&self, base: usize) -> LaneAddresses {
        LaneAddresses(self.offsets.saturating_add(Usizex16::splat(base)))
    }

    /// Floats spanned by `num_vertices` consecutive records, or `None` on
    /// overflow.
    pub fn span_floats(&self, num_vertices: usize) -> Option<usize> {
        num_vertices.checked_mul(self.floats_per_record)
    }
}

/// Per-lane byte addresses into a packed float buffer.
///
/// Addresses saturate at `usize::MAX`, which is past the end of any slice.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct LaneAddresses(Usizex16);

impl LaneAddresses {
    /// Move every lane to the next float in its record.
    #[inline(always)]
    pub fn advance(&mut self) {
        self.0 = self.0.saturating_add(Usizex16::splat(FLOAT_BYTES));
    }

    /// Float index addressed by `lane`.
    #[inline(always)]
    pub fn float_index(&self, lane: usize) -> usize {
        self.0.lane(lane) / FLOAT_BYTES
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lanes::LANES;

    #[test_log::test]
    fn test_stride_lanes_for_common_sizes() {
        for size in 4..=32 {
            let stride = StrideVector::for_record(size).unwrap();
            assert_eq!(stride.lane_offset(0), 0);
            for lane in 0..LANES {
                assert_eq!(
                    stride.lane_offset(lane),
                    lane * 4 * size,
                    "size {} lane {}",
                    size,
                    lane
                );
            }
        }
    }

    #[cfg(target_pointer_width = "64")]
    #[test_log::test]
    fn test_stride_past_four_gigabytes_is_exact() {
        let stride = StrideVector::for_record(1 << 30).unwrap();
        assert_eq!(stride.lane_offset(1), 4_294_967_296);
        assert_eq!(stride.lane_offset(15), 15 * 4_294_967_296);
    }

    #[test_log::test]
    fn test_stride_rejects_unaddressable_records() {
        assert_eq!(StrideVector::for_record(usize::MAX / 4 + 1), None);
        assert_eq!(StrideVector::for_record(usize::MAX / 32), None);
    }

    #[test_log::test]
    fn test_stride_is_reproducible() {
        assert_eq!(StrideVector::for_record(7), StrideVector::for_record(7));
    }

    #[test_log::test]
    fn test_lane_addresses_advance_by_one_float() {
        let stride = StrideVector::for_record(5).unwrap();
        let mut addrs = stride.lane_addresses(8);
        assert_eq!(addrs.float_index(0), 2);
        assert_eq!(addrs.float_index(3), 2 + 15);
        addrs.advance();
        assert_eq!(addrs.float_index(0), 3);
        assert_eq!(addrs.float_index(3), 3 + 15);
    }

    #[test_log::test]
    fn test_span_floats_checks_overflow() {
        let stride = StrideVector::for_record(6).unwrap();
        assert_eq!(stride.span_floats(3), Some(18));
        assert_eq!(stride.span_floats(40), Some(240));
        assert_eq!(stride.span_floats(usize::MAX / 2), None);
    }
}
