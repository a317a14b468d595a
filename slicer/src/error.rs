use std::{io, path::PathBuf};

use common::plane::Plane;
use thiserror::Error;

/// Failure to compute one cross-section. The exporter treats these like an
/// empty section and moves on to the next offset.
#[derive(Debug, Error)]
pub enum SliceError {
    #[error("non-finite value while slicing at offset {offset}")]
    NonFinite { offset: f32 },

    #[error("face {face} references missing vertex {vertex}")]
    InvalidFace { face: usize, vertex: u32 },
}

#[derive(Debug, Error)]
#[error("failed to write {}: {source}", path.display())]
pub struct WriteError {
    pub path: PathBuf,
    #[source]
    pub source: io::Error,
}

#[derive(Debug, Error)]
pub enum ReadError {
    #[error("failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("{}:{line}: {message}", path.display())]
    Format {
        path: PathBuf,
        line: usize,
        message: String,
    },
}

#[derive(Debug, Error, PartialEq)]
pub enum SweepError {
    #[error("invalid step size {0}, must be a positive number")]
    InvalidStep(f32),

    #[error("invalid sweep range {min} to {max}")]
    InvalidRange { min: f32, max: f32 },

    #[error("sweep of {count} offsets is too large, use a bigger step")]
    TooManyOffsets { count: f64 },
}

/// Errors that stop a whole export run.
#[derive(Debug, Error)]
pub enum ExportError {
    #[error("cannot sweep plane '{plane}': {source}")]
    Sweep {
        plane: Plane,
        #[source]
        source: SweepError,
    },

    #[error("failed to create output directory {}: {source}", path.display())]
    CreateDir {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}
