// src/scene.rs

//! Demo geometry for the driver binary: a ring of vertices, the camera
//! matrix for it, and the mapping from normalized device coordinates to
//! viewport pixels.

use crate::config::{CameraConfig, SceneConfig};
use crate::shader::{Matrix4, PARAM_X, PARAM_Y};

/// Interleaved attribute records for `scene.vertex_count` points on a unit
/// circle in the xz plane. Records are `[x, y, z, u, v, shade, 0, ...]`
/// padded to `attribs_per_vertex`.
pub fn ring_vertices(scene: &SceneConfig, attribs_per_vertex: usize) -> Vec<f32> {
    let count = scene.vertex_count;
    let mut attribs = vec![0.0f32; count * attribs_per_vertex];
    for (i, record) in attribs.chunks_exact_mut(attribs_per_vertex).enumerate() {
        let t = i as f32 / count as f32;
        let angle = t * core::f32::consts::TAU;
        let extras = [angle.cos(), 0.0, angle.sin(), t, 0.5, 1.0 - t];
        for (slot, val) in record.iter_mut().zip(extras) {
            *slot = val;
        }
    }
    attribs
}

/// Projection * view * model for the ring.
pub fn model_view_projection(camera: &CameraConfig, scene: &SceneConfig) -> Matrix4 {
    let projection = Matrix4::perspective(
        camera.fov_y_degrees.to_radians(),
        camera.aspect,
        camera.near,
        camera.far,
    );
    let view = Matrix4::translation(0.0, 0.0, -camera.distance);
    let model = Matrix4::rotation_y(scene.rotation_degrees.to_radians())
        * Matrix4::rotation_x(20.0f32.to_radians());
    projection * view * model
}

/// Map a projected parameter record to viewport pixels (y down).
pub fn ndc_to_viewport(record: &[f32], width_px: f32, height_px: f32) -> (f32, f32) {
    let x = (record[PARAM_X] + 1.0) * 0.5 * width_px;
    let y = (1.0 - record[PARAM_Y]) * 0.5 * height_px;
    (x, y)
}
