// src/error.rs

//! Errors reported by the vertex batch loop.
//!
//! Every variant is a broken caller contract detected before memory is
//! touched. Degenerate W values are not errors; they flow through as
//! infinities or NaNs.

use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VertexError {
    /// A per-vertex record is smaller than the four reserved position slots.
    RecordTooSmall { kind: RecordKind, floats: usize },
    /// A record so large that lane byte offsets do not fit in a `usize`.
    RecordTooLarge { kind: RecordKind, floats: usize },
    /// More vertices than lanes were passed to a single batch.
    BatchTooLarge { num_vertices: usize },
    /// A buffer cannot hold `num_vertices` records.
    BufferTooShort {
        kind: RecordKind,
        required: usize,
        actual: usize,
    },
    /// `num_vertices` records span more floats than a `usize` can count.
    VertexCountOverflow {
        kind: RecordKind,
        num_vertices: usize,
    },
    /// An active lane addressed a float outside its buffer.
    OutOfBounds { lane: usize, index: usize, len: usize },
}

/// Which of the two buffers an error refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecordKind {
    Attribute,
    Parameter,
}

impl fmt::Display for RecordKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RecordKind::Attribute => write!(f, "attribute"),
            RecordKind::Parameter => write!(f, "parameter"),
        }
    }
}

impl fmt::Display for VertexError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            VertexError::RecordTooSmall { kind, floats } => write!(
                f,
                "{} record holds {} floats, at least {} required",
                kind,
                floats,
                crate::shader::MIN_FLOATS_PER_VERTEX
            ),
            VertexError::RecordTooLarge { kind, floats } => write!(
                f,
                "{} record of {} floats is too large to address",
                kind, floats
            ),
            VertexError::BatchTooLarge { num_vertices } => write!(
                f,
                "batch of {} vertices exceeds {} lanes",
                num_vertices,
                crate::lanes::LANES
            ),
            VertexError::BufferTooShort {
                kind,
                required,
                actual,
            } => write!(
                f,
                "{} buffer holds {} floats, {} required",
                kind, actual, required
            ),
            VertexError::VertexCountOverflow { kind, num_vertices } => write!(
                f,
                "{} {} records overflow the addressable range",
                num_vertices, kind
            ),
            VertexError::OutOfBounds { lane, index, len } => write!(
                f,
                "lane {} addresses float {} of a {}-float buffer",
                lane, index, len
            ),
        }
    }
}

impl std::error::Error for VertexError {}
