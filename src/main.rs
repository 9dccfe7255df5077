// src/main.rs

use anyhow::Context;
use log::{debug, info, warn};
use std::path::PathBuf;
use vertex_shade::config::{Config, CONFIG};
use vertex_shade::scene::{model_view_projection, ndc_to_viewport, ring_vertices};
use vertex_shade::{TransformShader, VertexProcessor, PARAM_W};

const VIEWPORT_WIDTH_PX: f32 = 640.0;
const VIEWPORT_HEIGHT_PX: f32 = 480.0;

/// Main entry point for the `vertex-shade` driver.
fn main() -> anyhow::Result<()> {
    // Default filter is "info" if RUST_LOG is not set.
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .format_timestamp_micros()
        .init();

    // --- Configuration ---
    let config = match std::env::args_os().nth(1).map(PathBuf::from) {
        Some(path) => {
            let config = Config::load(&path)?;
            info!("Configuration loaded from {}", path.display());
            config
        }
        None => {
            info!("No config file given, using defaults.");
            CONFIG.clone()
        }
    };

    let attribs_per_vertex = config.pipeline.attribs_per_vertex;
    let params_per_vertex = config.pipeline.params_per_vertex;
    let vertex_count = config.scene.vertex_count;

    // --- Shade ---
    let mvp = model_view_projection(&config.camera, &config.scene);
    let processor =
        VertexProcessor::new(attribs_per_vertex, params_per_vertex, TransformShader::new(mvp))
            .context("Failed to build vertex processor")?;

    let attribs = ring_vertices(&config.scene, attribs_per_vertex);
    let mut params = vec![0.0f32; vertex_count * params_per_vertex];
    processor
        .process_stream(&mut params, &attribs, vertex_count)
        .context("Failed to shade vertices")?;

    // --- Report ---
    let mut min = (f32::INFINITY, f32::INFINITY);
    let mut max = (f32::NEG_INFINITY, f32::NEG_INFINITY);
    for (i, record) in params.chunks_exact(params_per_vertex).enumerate() {
        if record[PARAM_W] <= 0.0 {
            warn!("Vertex {} is behind the camera (w = {})", i, record[PARAM_W]);
            continue;
        }
        let (x, y) = ndc_to_viewport(record, VIEWPORT_WIDTH_PX, VIEWPORT_HEIGHT_PX);
        debug!("Vertex {}: screen ({:.1}, {:.1}) w {:.3}", i, x, y, record[PARAM_W]);
        min = (min.0.min(x), min.1.min(y));
        max = (max.0.max(x), max.1.max(y));
    }

    info!(
        "Shaded {} vertices in {} batches; screen bounds ({:.1}, {:.1}) - ({:.1}, {:.1})",
        vertex_count,
        vertex_count.div_ceil(vertex_shade::LANES),
        min.0,
        min.1,
        max.0,
        max.1
    );
    Ok(())
}
