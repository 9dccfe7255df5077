// src/memory.rs

//! Masked gather and scatter over packed float slices.
//!
//! Addresses are byte offsets from the start of the slice. Only active lanes
//! touch memory; an active lane pointing past the slice is reported instead
//! of read or written.

use crate::error::VertexError;
use crate::lanes::F32x16;
use crate::mask::LaneMask;
use crate::stride::LaneAddresses;

/// Load one float per active lane. Inactive lanes come back as `0.0`.
pub fn gather_masked(
    buf: &[f32],
    addrs: &LaneAddresses,
    mask: LaneMask,
) -> Result<F32x16, VertexError> {
    let mut out = F32x16::default();
    for lane in mask.active_lanes() {
        let index = addrs.float_index(lane);
        let val = *buf.get(index).ok_or(VertexError::OutOfBounds {
            lane,
            index,
            len: buf.len(),
        })?;
        out.set_lane(lane, val);
    }
    Ok(out)
}

/// Store one float per active lane. Inactive lanes write nothing.
///
/// Every active address is checked before the first store so a bad lane
/// never leaves the buffer half written.
pub fn scatter_masked(
    buf: &mut [f32],
    addrs: &LaneAddresses,
    values: F32x16,
    mask: LaneMask,
) -> Result<(), VertexError> {
    let len = buf.len();
    if let Some(lane) = mask.active_lanes().find(|&lane| addrs.float_index(lane) >= len) {
        return Err(VertexError::OutOfBounds {
            lane,
            index: addrs.float_index(lane),
            len,
        });
    }
    for lane in mask.active_lanes() {
        buf[addrs.float_index(lane)] = values.lane(lane);
    }
    Ok(())
}
