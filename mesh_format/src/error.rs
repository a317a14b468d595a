use std::{io, path::PathBuf};

use thiserror::Error;

/// Reasons a mesh file could not be turned into a mesh. All of them are fatal
/// for the run that requested the mesh.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("the file {} does not exist", .0.display())]
    NotFound(PathBuf),

    #[error("unsupported mesh format `{0}`, expected `obj` or `stl`")]
    UnsupportedFormat(String),

    #[error("failed to read mesh: {0}")]
    Io(#[from] io::Error),

    #[error("invalid STL data: {0}")]
    Stl(#[source] io::Error),

    #[error("line {line}: {message}")]
    Parse { line: usize, message: String },

    #[error("the file does not contain any mesh with faces")]
    EmptyScene,
}

impl LoadError {
    pub(crate) fn parse(line: usize, message: impl Into<String>) -> Self {
        Self::Parse {
            line,
            message: message.into(),
        }
    }
}
