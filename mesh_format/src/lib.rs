//! Reading of `.obj` and `.stl` files into a [`Scene`] of raw triangle meshes.

use std::{
    fs::File,
    io::{BufReader, Read, Seek},
    path::Path,
};

use common::progress::Progress;
use nalgebra::Vector3;
use tracing::{debug, info};

mod error;
mod obj;
mod stl;

pub use error::LoadError;

/// A triangle mesh as it was read from a file, before any processing.
#[derive(Debug, Default, Clone)]
pub struct RawMesh {
    pub name: String,
    pub verts: Vec<Vector3<f32>>,
    pub faces: Vec<[u32; 3]>,
}

/// Every mesh that had at least one face, in file order.
#[derive(Debug, Default)]
pub struct Scene {
    pub meshes: Vec<RawMesh>,
}

/// The mesh picked out of a scene along with how many others were dropped.
#[derive(Debug)]
pub struct Selection {
    pub mesh: RawMesh,
    pub discarded: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Format {
    Obj,
    Stl,
}

impl Format {
    pub fn from_extension(extension: &str) -> Option<Self> {
        Some(match extension.to_ascii_lowercase().as_str() {
            "obj" => Format::Obj,
            "stl" => Format::Stl,
            _ => return None,
        })
    }

    pub fn from_path(path: &Path) -> Result<Self, LoadError> {
        let ext = path
            .extension()
            .map(|x| x.to_string_lossy().into_owned())
            .unwrap_or_default();
        Self::from_extension(&ext).ok_or(LoadError::UnsupportedFormat(ext))
    }
}

impl Scene {
    /// Reduces the scene to its first mesh. Multi-object files are only ever
    /// sliced as their first object, the rest is reported back in
    /// [`Selection::discarded`].
    pub fn select_first(self) -> Result<Selection, LoadError> {
        let mut meshes = self.meshes.into_iter();
        let mesh = meshes.next().ok_or(LoadError::EmptyScene)?;
        Ok(Selection {
            mesh,
            discarded: meshes.count(),
        })
    }
}

/// Parses a scene from a reader in the given format.
pub fn parse_scene<T: Read + Seek>(
    reader: &mut T,
    format: Format,
    progress: Progress,
) -> Result<Scene, LoadError> {
    let scene = match format {
        Format::Obj => obj::parse(reader, progress.clone()),
        Format::Stl => stl::parse(reader, progress.clone()),
    }?;

    progress.set_finished();
    Ok(scene)
}

/// Opens the file at `path` and parses it based on its extension.
pub fn load_scene(path: &Path, progress: Progress) -> Result<Scene, LoadError> {
    if !path.exists() {
        return Err(LoadError::NotFound(path.to_path_buf()));
    }

    let format = Format::from_path(path)?;
    let mut reader = BufReader::new(File::open(path)?);
    let scene = parse_scene(&mut reader, format, progress)?;

    debug!(
        "Parsed `{}` into {} mesh(es)",
        path.display(),
        scene.meshes.len()
    );
    Ok(scene)
}

/// Loads the first mesh of the file at `path`.
pub fn load_first_mesh(path: &Path, progress: Progress) -> Result<RawMesh, LoadError> {
    let selection = load_scene(path, progress)?.select_first()?;
    if selection.discarded > 0 {
        info!(
            "Using mesh `{}`, ignoring {} other mesh(es) in the scene",
            selection.mesh.name, selection.discarded
        );
    }

    Ok(selection.mesh)
}
