// src/lib.rs

//! Sixteen-wide vertex processing stage.
//!
//! A `VertexProcessor` gathers interleaved vertex attributes into planar
//! lanes, runs a pluggable `VertexShader` over them, divides clip-space X and
//! Y by W, and scatters the results back into an interleaved parameter
//! buffer. Partial batches are handled with an active-lane mask so lanes past
//! the last vertex never touch memory.

pub mod config;
pub mod error;
pub mod lanes;
pub mod mask;
pub mod memory;
pub mod processor;
pub mod scene;
pub mod shader;
pub mod stride;

pub use error::{RecordKind, VertexError};
pub use lanes::{F32x16, Usizex16, LANES};
pub use mask::LaneMask;
pub use processor::VertexProcessor;
pub use shader::{
    Matrix4, PassThroughShader, TransformShader, VertexShader, PARAM_W, PARAM_X, PARAM_Y, PARAM_Z,
};
pub use stride::StrideVector;
