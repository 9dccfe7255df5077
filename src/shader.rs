// src/shader.rs

//! The per-vertex shading capability and a couple of stock shaders.
//!
//! A shader receives the batch in planar form: `attribs[a]` holds attribute
//! `a` for all sixteen vertices, and it fills `params[p]` the same way. It
//! only has to produce meaningful values for the lanes set in `mask`.
//!
//! Parameters `PARAM_X`, `PARAM_Y`, `PARAM_Z` and `PARAM_W` are reserved for
//! the clip-space position; the batch loop divides X and Y by W after shading.

use crate::lanes::{F32x16, LANES};
use crate::mask::LaneMask;
use core::ops::Mul;

pub const PARAM_X: usize = 0;
pub const PARAM_Y: usize = 1;
pub const PARAM_Z: usize = 2;
pub const PARAM_W: usize = 3;

/// Smallest legal attribute or parameter record, in floats.
pub const MIN_FLOATS_PER_VERTEX: usize = 4;

/// Maps packed attribute lanes to packed parameter lanes.
pub trait VertexShader {
    /// `params.len()` is the parameter count and `attribs.len()` the attribute
    /// count the processor was built with. `params` arrives zeroed.
    fn shade_vertices(&self, params: &mut [F32x16], attribs: &[F32x16], mask: LaneMask);
}

impl<F> VertexShader for F
where
    F: Fn(&mut [F32x16], &[F32x16], LaneMask),
{
    fn shade_vertices(&self, params: &mut [F32x16], attribs: &[F32x16], mask: LaneMask) {
        self(params, attribs, mask)
    }
}

/// Copies attributes straight into parameters.
///
/// Parameters past the last attribute stay zero, except W which defaults to
/// 1.0 so the perspective divide is a no-op.
#[derive(Debug, Clone, Copy, Default)]
pub struct PassThroughShader;

impl VertexShader for PassThroughShader {
    fn shade_vertices(&self, params: &mut [F32x16], attribs: &[F32x16], _mask: LaneMask) {
        let shared = params.len().min(attribs.len());
        params[..shared].copy_from_slice(&attribs[..shared]);
        if shared <= PARAM_W && PARAM_W < params.len() {
            params[PARAM_W] = F32x16::splat(1.0);
        }
    }
}

/// Row-major 4x4 matrix acting on column vectors.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Matrix4(pub [[f32; 4]; 4]);

impl Matrix4 {
    pub const fn identity() -> Self {
        Matrix4([
            [1.0, 0.0, 0.0, 0.0],
            [0.0, 1.0, 0.0, 0.0],
            [0.0, 0.0, 1.0, 0.0],
            [0.0, 0.0, 0.0, 1.0],
        ])
    }

    pub fn translation(x: f32, y: f32, z: f32) -> Self {
        Matrix4([
            [1.0, 0.0, 0.0, x],
            [0.0, 1.0, 0.0, y],
            [0.0, 0.0, 1.0, z],
            [0.0, 0.0, 0.0, 1.0],
        ])
    }

    pub fn scaling(x: f32, y: f32, z: f32) -> Self {
        Matrix4([
            [x, 0.0, 0.0, 0.0],
            [0.0, y, 0.0, 0.0],
            [0.0, 0.0, z, 0.0],
            [0.0, 0.0, 0.0, 1.0],
        ])
    }

    pub fn rotation_x(radians: f32) -> Self {
        let (s, c) = radians.sin_cos();
        Matrix4([
            [1.0, 0.0, 0.0, 0.0],
            [0.0, c, -s, 0.0],
            [0.0, s, c, 0.0],
            [0.0, 0.0, 0.0, 1.0],
        ])
    }

    pub fn rotation_y(radians: f32) -> Self {
        let (s, c) = radians.sin_cos();
        Matrix4([
            [c, 0.0, s, 0.0],
            [0.0, 1.0, 0.0, 0.0],
            [-s, 0.0, c, 0.0],
            [0.0, 0.0, 0.0, 1.0],
        ])
    }

    pub fn rotation_z(radians: f32) -> Self {
        let (s, c) = radians.sin_cos();
        Matrix4([
            [c, -s, 0.0, 0.0],
            [s, c, 0.0, 0.0],
            [0.0, 0.0, 1.0, 0.0],
            [0.0, 0.0, 0.0, 1.0],
        ])
    }

    /// Right-handed perspective projection. W receives `-z` of the eye-space
    /// position, so points in front of the camera (negative z) get positive W.
    pub fn perspective(fov_y_radians: f32, aspect: f32, near: f32, far: f32) -> Self {
        let f = 1.0 / (fov_y_radians / 2.0).tan();
        let range = near - far;
        Matrix4([
            [f / aspect, 0.0, 0.0, 0.0],
            [0.0, f, 0.0, 0.0],
            [0.0, 0.0, (far + near) / range, 2.0 * far * near / range],
            [0.0, 0.0, -1.0, 0.0],
        ])
    }

    /// Transform a packed position (w = 1) and return the four packed outputs.
    pub fn transform_points(&self, x: F32x16, y: F32x16, z: F32x16) -> [F32x16; 4] {
        core::array::from_fn(|row| {
            let [m0, m1, m2, m3] = self.0[row];
            x.mul_add(F32x16::splat(m0), F32x16::splat(m3))
                + y * F32x16::splat(m1)
                + z * F32x16::splat(m2)
        })
    }
}

impl Default for Matrix4 {
    fn default() -> Self {
        Self::identity()
    }
}

impl Mul for Matrix4 {
    type Output = Matrix4;

    fn mul(self, rhs: Matrix4) -> Matrix4 {
        let mut out = [[0.0f32; 4]; 4];
        for (row, out_row) in out.iter_mut().enumerate() {
            for (col, cell) in out_row.iter_mut().enumerate() {
                *cell = (0..4).map(|k| self.0[row][k] * rhs.0[k][col]).sum();
            }
        }
        Matrix4(out)
    }
}

/// Transforms attributes 0..3 (object-space x, y, z) by a model-view-projection
/// matrix into the reserved clip-space parameters.
///
/// Attributes from index 3 on are carried into parameters from index 4 on,
/// as many as fit. Remaining parameters are left zero.
#[derive(Debug, Clone, Copy, Default)]
pub struct TransformShader {
    mvp: Matrix4,
}

impl TransformShader {
    pub fn new(mvp: Matrix4) -> Self {
        Self { mvp }
    }
}

impl VertexShader for TransformShader {
    fn shade_vertices(&self, params: &mut [F32x16], attribs: &[F32x16], _mask: LaneMask) {
        let clip = self.mvp.transform_points(attribs[0], attribs[1], attribs[2]);
        params[PARAM_X..=PARAM_W].copy_from_slice(&clip);

        for (param, attrib) in params[PARAM_W + 1..].iter_mut().zip(&attribs[3..]) {
            *param = *attrib;
        }
    }
}

/// Runs a shader over a single vertex record, outside of any batch.
///
/// Handy for debugging a shader against the batch path; lane 0 carries the
/// vertex and the other lanes are inactive. Records shorter than
/// `MIN_FLOATS_PER_VERTEX` on either side are never shaded: the result is
/// `params_per_vertex` zeros.
pub fn shade_single<S: VertexShader + ?Sized>(
    shader: &S,
    attribs: &[f32],
    params_per_vertex: usize,
) -> Vec<f32> {
    if attribs.len() < MIN_FLOATS_PER_VERTEX || params_per_vertex < MIN_FLOATS_PER_VERTEX {
        return vec![0.0; params_per_vertex];
    }
    let packed_attribs: Vec<F32x16> = attribs
        .iter()
        .map(|&a| {
            let mut lanes = [0.0f32; LANES];
            lanes[0] = a;
            F32x16::from_array(lanes)
        })
        .collect();
    let mut packed_params = vec![F32x16::default(); params_per_vertex];
    shader.shade_vertices(&mut packed_params, &packed_attribs, LaneMask::LANE_0);
    packed_params.iter().map(|p| p.lane(0)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx(a: f32, b: f32) -> bool {
        (a - b).abs() < 1e-5
    }

    #[test_log::test]
    fn test_identity_transform_keeps_position() {
        let out = shade_single(&TransformShader::default(), &[1.0, 2.0, 3.0, 0.5], 5);
        assert_eq!(out, vec![1.0, 2.0, 3.0, 1.0, 0.5]);
    }

    #[test_log::test]
    fn test_translation_then_scaling() {
        let m = Matrix4::scaling(2.0, 2.0, 2.0) * Matrix4::translation(1.0, 0.0, 0.0);
        let out = shade_single(&TransformShader::new(m), &[1.0, 1.0, 1.0, 0.0], 4);
        assert_eq!(out, vec![4.0, 2.0, 2.0, 1.0]);
    }

    #[test_log::test]
    fn test_rotation_z_quarter_turn() {
        let m = Matrix4::rotation_z(core::f32::consts::FRAC_PI_2);
        let out = shade_single(&TransformShader::new(m), &[1.0, 0.0, 0.0, 0.0], 4);
        assert!(approx(out[0], 0.0) && approx(out[1], 1.0), "{:?}", out);
    }

    #[test_log::test]
    fn test_perspective_w_is_negated_eye_z() {
        let m = Matrix4::perspective(core::f32::consts::FRAC_PI_2, 1.0, 0.1, 100.0);
        let out = shade_single(&TransformShader::new(m), &[1.0, 1.0, -5.0, 0.0], 4);
        assert!(approx(out[PARAM_W], 5.0));
        assert!(approx(out[PARAM_X], 1.0));
    }

    #[test_log::test]
    fn test_pass_through_fills_missing_w() {
        let attribs = [F32x16::splat(1.0), F32x16::splat(2.0), F32x16::splat(3.0)];
        let mut params = [F32x16::default(); 6];
        PassThroughShader.shade_vertices(&mut params, &attribs, LaneMask::ALL);
        let lane0: Vec<f32> = params.iter().map(|p| p.lane(0)).collect();
        assert_eq!(lane0, vec![1.0, 2.0, 3.0, 1.0, 0.0, 0.0]);
    }

    #[test_log::test]
    fn test_short_records_are_not_shaded() {
        assert_eq!(shade_single(&TransformShader::default(), &[1.0], 4), vec![0.0; 4]);
        assert_eq!(shade_single(&TransformShader::default(), &[1.0, 2.0, 3.0, 4.0], 2), vec![0.0; 2]);
    }

    #[test_log::test]
    fn test_closure_is_a_shader() {
        let shader = |params: &mut [F32x16], attribs: &[F32x16], _mask: LaneMask| {
            params[0] = attribs[0] * F32x16::splat(3.0);
        };
        let out = shade_single(&shader, &[2.0, 0.0, 0.0, 0.0], 4);
        assert_eq!(out[0], 6.0);
    }
}
