// src/processor.rs

//! The masked batch loop.
//!
//! `VertexProcessor` shades up to sixteen vertices per call:
//!
//! ```text
//! attribs (interleaved) --gather--> packed attribs --shade--> packed params
//!                                                                  |
//! out_params (interleaved) <--scatter-- perspective divide <-------+
//! ```
//!
//! Stride vectors are fixed at construction. Everything else is batch-local
//! and dropped on return, so one processor can be shared across threads as
//! long as each call writes a disjoint output region.

use crate::error::{RecordKind, VertexError};
use crate::lanes::{F32x16, LANES};
use crate::mask::LaneMask;
use crate::memory::{gather_masked, scatter_masked};
use crate::shader::{VertexShader, MIN_FLOATS_PER_VERTEX, PARAM_W, PARAM_X, PARAM_Y};
use crate::stride::StrideVector;
use log::{debug, trace};

#[derive(Debug, Clone)]
pub struct VertexProcessor<S: VertexShader> {
    attrib_stride: StrideVector,
    param_stride: StrideVector,
    shader: S,
}

impl<S: VertexShader> VertexProcessor<S> {
    /// Build a processor for fixed record sizes.
    ///
    /// Both sizes must cover the four reserved position slots.
    pub fn new(
        attribs_per_vertex: usize,
        params_per_vertex: usize,
        shader: S,
    ) -> Result<Self, VertexError> {
        if attribs_per_vertex < MIN_FLOATS_PER_VERTEX {
            return Err(VertexError::RecordTooSmall {
                kind: RecordKind::Attribute,
                floats: attribs_per_vertex,
            });
        }
        if params_per_vertex < MIN_FLOATS_PER_VERTEX {
            return Err(VertexError::RecordTooSmall {
                kind: RecordKind::Parameter,
                floats: params_per_vertex,
            });
        }

        let attrib_stride = StrideVector::for_record(attribs_per_vertex).ok_or(
            VertexError::RecordTooLarge {
                kind: RecordKind::Attribute,
                floats: attribs_per_vertex,
            },
        )?;
        let param_stride = StrideVector::for_record(params_per_vertex).ok_or(
            VertexError::RecordTooLarge {
                kind: RecordKind::Parameter,
                floats: params_per_vertex,
            },
        )?;
        debug!(
            "VertexProcessor: {} attribs/vertex (stride {:?}), {} params/vertex (stride {:?})",
            attribs_per_vertex,
            attrib_stride.offsets(),
            params_per_vertex,
            param_stride.offsets()
        );

        Ok(Self {
            attrib_stride,
            param_stride,
            shader,
        })
    }

    pub fn attribs_per_vertex(&self) -> usize {
        self.attrib_stride.floats_per_record()
    }

    pub fn params_per_vertex(&self) -> usize {
        self.param_stride.floats_per_record()
    }

    pub fn attrib_stride(&self) -> &StrideVector {
        &self.attrib_stride
    }

    pub fn param_stride(&self) -> &StrideVector {
        &self.param_stride
    }

    pub fn shader(&self) -> &S {
        &self.shader
    }

    /// Shade one batch of `num_vertices` (0..=16) vertices.
    ///
    /// Reads the first `num_vertices` records of `attribs` and writes exactly
    /// the first `num_vertices` records of `out_params`. Nothing else in
    /// either buffer is touched. All checks run before the first write.
    pub fn process_vertices(
        &self,
        out_params: &mut [f32],
        attribs: &[f32],
        num_vertices: usize,
    ) -> Result<(), VertexError> {
        if num_vertices > LANES {
            return Err(VertexError::BatchTooLarge { num_vertices });
        }
        Self::check_len(RecordKind::Attribute, &self.attrib_stride, attribs.len(), num_vertices)?;
        Self::check_len(RecordKind::Parameter, &self.param_stride, out_params.len(), num_vertices)?;

        let mask = LaneMask::for_vertex_count(num_vertices);
        if mask.is_empty() {
            return Ok(());
        }
        trace!("process_vertices: {} vertices, mask {:#06x}", num_vertices, mask.bits());

        // Gather from the attribute buffer into planar lanes
        let mut attrib_addrs = self.attrib_stride.lane_addresses(0);
        let mut packed_attribs = Vec::with_capacity(self.attribs_per_vertex());
        for _ in 0..self.attribs_per_vertex() {
            packed_attribs.push(gather_masked(attribs, &attrib_addrs, mask)?);
            attrib_addrs.advance();
        }

        let mut packed_params = vec![F32x16::default(); self.params_per_vertex()];
        self.shader.shade_vertices(&mut packed_params, &packed_attribs, mask);

        // Perspective division
        let one_over_w = packed_params[PARAM_W].recip();
        packed_params[PARAM_X] *= one_over_w;
        packed_params[PARAM_Y] *= one_over_w;

        // Scatter packed params back out to the parameter buffer
        let mut param_addrs = self.param_stride.lane_addresses(0);
        for param in &packed_params {
            scatter_masked(out_params, &param_addrs, *param, mask)?;
            param_addrs.advance();
        }
        Ok(())
    }

    /// Shade any number of vertices by walking the buffers in batches of
    /// sixteen, advancing both bases by one batch of records each step.
    pub fn process_stream(
        &self,
        out_params: &mut [f32],
        attribs: &[f32],
        num_vertices: usize,
    ) -> Result<(), VertexError> {
        Self::check_len(
            RecordKind::Attribute,
            &self.attrib_stride,
            attribs.len(),
            num_vertices,
        )?;
        Self::check_len(
            RecordKind::Parameter,
            &self.param_stride,
            out_params.len(),
            num_vertices,
        )?;

        let attrib_batch = LANES * self.attribs_per_vertex();
        let param_batch = LANES * self.params_per_vertex();
        let batches = num_vertices.div_ceil(LANES);
        debug!("process_stream: {} vertices in {} batches", num_vertices, batches);

        for batch in 0..batches {
            let count = (num_vertices - batch * LANES).min(LANES);
            let attrib_base = batch * attrib_batch;
            let param_base = batch * param_batch;
            self.process_vertices(
                &mut out_params[param_base..],
                &attribs[attrib_base..],
                count,
            )?;
        }
        Ok(())
    }

    fn check_len(
        kind: RecordKind,
        stride: &StrideVector,
        actual: usize,
        num_vertices: usize,
    ) -> Result<(), VertexError> {
        let required = stride
            .span_floats(num_vertices)
            .ok_or(VertexError::VertexCountOverflow { kind, num_vertices })?;
        if actual < required {
            return Err(VertexError::BufferTooShort {
                kind,
                required,
                actual,
            });
        }
        Ok(())
    }
}
