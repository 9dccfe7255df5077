// src/config.rs

//! Configuration for the `vertex-shade` driver.
//!
//! Settings are deserialized from JSON. Every section carries
//! `#[serde(default)]`, so a config file only needs the keys it changes and an
//! empty object `{}` yields the defaults.

use crate::error::{RecordKind, VertexError};
use crate::shader::MIN_FLOATS_PER_VERTEX;
use anyhow::Context;
use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Process-wide default configuration.
pub static CONFIG: Lazy<Config> = Lazy::new(Config::default);

// --- Top-Level Configuration Structure ---

#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
#[serde(default)]
pub struct Config {
    /// Record layout of the vertex and parameter buffers.
    pub pipeline: PipelineConfig,
    /// Projection used by the transform shader.
    pub camera: CameraConfig,
    /// Generated demo geometry.
    pub scene: SceneConfig,
}

impl Config {
    /// Read and validate a JSON config file.
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        Self::from_json_str(&text)
            .with_context(|| format!("Invalid config file {}", path.display()))
    }

    pub fn from_json_str(text: &str) -> anyhow::Result<Self> {
        let config: Config = serde_json::from_str(text).context("Failed to parse config JSON")?;
        config.validate()?;
        Ok(config)
    }

    /// Reject record sizes that cannot hold a clip-space position.
    pub fn validate(&self) -> Result<(), VertexError> {
        if self.pipeline.attribs_per_vertex < MIN_FLOATS_PER_VERTEX {
            return Err(VertexError::RecordTooSmall {
                kind: RecordKind::Attribute,
                floats: self.pipeline.attribs_per_vertex,
            });
        }
        if self.pipeline.params_per_vertex < MIN_FLOATS_PER_VERTEX {
            return Err(VertexError::RecordTooSmall {
                kind: RecordKind::Parameter,
                floats: self.pipeline.params_per_vertex,
            });
        }
        Ok(())
    }
}

// --- Pipeline Configuration ---

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct PipelineConfig {
    /// Floats per input vertex record: x, y, z, then extra attributes.
    pub attribs_per_vertex: usize,
    /// Floats per output record: clip x, y, z, w, then carried attributes.
    pub params_per_vertex: usize,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        PipelineConfig {
            attribs_per_vertex: 6, // position + (u, v, shade)
            params_per_vertex: 7,
        }
    }
}

// --- Camera Configuration ---

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct CameraConfig {
    pub fov_y_degrees: f32,
    /// Viewport width divided by height.
    pub aspect: f32,
    pub near: f32,
    pub far: f32,
    /// Distance from the eye to the scene origin along -z.
    pub distance: f32,
}

impl Default for CameraConfig {
    fn default() -> Self {
        CameraConfig {
            fov_y_degrees: 60.0,
            aspect: 4.0 / 3.0,
            near: 0.1,
            far: 100.0,
            distance: 4.0,
        }
    }
}

// --- Scene Configuration ---

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct SceneConfig {
    /// Number of vertices on the generated ring.
    pub vertex_count: usize,
    /// Rotation of the ring about the y axis.
    pub rotation_degrees: f32,
}

impl Default for SceneConfig {
    fn default() -> Self {
        SceneConfig {
            vertex_count: 40,
            rotation_degrees: 30.0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test_log::test]
    fn test_empty_object_yields_defaults() {
        let config = Config::from_json_str("{}").unwrap();
        assert_eq!(config, Config::default());
        assert_eq!(*CONFIG, Config::default());
    }

    #[test_log::test]
    fn test_partial_override() {
        let config =
            Config::from_json_str(r#"{ "pipeline": { "params_per_vertex": 9 }, "scene": { "vertex_count": 3 } }"#)
                .unwrap();
        assert_eq!(config.pipeline.params_per_vertex, 9);
        assert_eq!(config.pipeline.attribs_per_vertex, 6);
        assert_eq!(config.scene.vertex_count, 3);
        assert_eq!(config.camera, CameraConfig::default());
    }

    #[test_log::test]
    fn test_rejects_small_records() {
        let err = Config::from_json_str(r#"{ "pipeline": { "attribs_per_vertex": 2 } }"#).unwrap_err();
        assert_eq!(
            err.downcast_ref::<VertexError>(),
            Some(&VertexError::RecordTooSmall {
                kind: RecordKind::Attribute,
                floats: 2
            })
        );
    }

    #[test_log::test]
    fn test_rejects_malformed_json() {
        assert!(Config::from_json_str("{ pipeline: ").is_err());
    }

    #[test_log::test]
    fn test_round_trips_through_serde_json() {
        let config = Config::default();
        let text = serde_json::to_string(&config).unwrap();
        assert_eq!(Config::from_json_str(&text).unwrap(), config);
    }
}
