use std::{path::Path, sync::Arc};

use common::progress::Progress;
use mesh_format::{LoadError, RawMesh};
use tracing::info;

use crate::Pos;

/// A mesh made of vertices and triangular faces. Cloning is cheap, the
/// geometry is shared.
#[derive(Debug, Clone)]
pub struct Mesh {
    inner: Arc<MeshInner>,
}

#[derive(Debug)]
struct MeshInner {
    vertices: Box<[Pos]>,
    faces: Box<[[u32; 3]]>,
    bounds: (Pos, Pos),
}

impl Mesh {
    /// Creates a new mesh from the given vertices and faces. Vertices are
    /// kept where they are, the bounding box is in file coordinates.
    pub fn new(vertices: Vec<Pos>, faces: Vec<[u32; 3]>) -> Self {
        let bounds = vertex_bounds(&vertices);
        Self {
            inner: Arc::new(MeshInner {
                vertices: vertices.into_boxed_slice(),
                faces: faces.into_boxed_slice(),
                bounds,
            }),
        }
    }

    pub fn vertices(&self) -> &[Pos] {
        self.inner.vertices.as_ref()
    }

    pub fn faces(&self) -> &[[u32; 3]] {
        self.inner.faces.as_ref()
    }

    pub fn vertex_count(&self) -> usize {
        self.vertices().len()
    }

    pub fn face_count(&self) -> usize {
        self.faces().len()
    }

    /// Get the minimum and maximum of each component of every vertex in the
    /// model. These points define the bounding box of the model.
    pub fn bounds(&self) -> (Pos, Pos) {
        self.inner.bounds
    }

    /// Largest absolute coordinate of the bounding box, at least one. Used to
    /// scale geometric tolerances.
    pub fn scale(&self) -> f32 {
        let (min, max) = self.bounds();
        min.abs().max().max(max.abs().max()).max(1.0)
    }
}

impl Default for Mesh {
    fn default() -> Self {
        Self::new(Vec::new(), Vec::new())
    }
}

impl From<RawMesh> for Mesh {
    fn from(mesh: RawMesh) -> Self {
        Self::new(mesh.verts, mesh.faces)
    }
}

/// Loads the first mesh of a `.obj` or `.stl` file.
pub fn load_mesh(path: &Path) -> Result<Mesh, LoadError> {
    load_mesh_with_progress(path, Progress::new())
}

pub fn load_mesh_with_progress(path: &Path, progress: Progress) -> Result<Mesh, LoadError> {
    let mesh = Mesh::from(mesh_format::load_first_mesh(path, progress)?);
    info!(
        "Loaded `{}` with {} faces",
        path.display(),
        mesh.face_count()
    );
    Ok(mesh)
}

/// Get the minimum and maximum of each component of every vertex.
fn vertex_bounds(vertices: &[Pos]) -> (Pos, Pos) {
    vertices.iter().fold(
        (
            Pos::new(f32::MAX, f32::MAX, f32::MAX),
            Pos::new(f32::MIN, f32::MIN, f32::MIN),
        ),
        |(min, max), v| {
            (
                Pos::new(min.x.min(v.x), min.y.min(v.y), min.z.min(v.z)),
                Pos::new(max.x.max(v.x), max.y.max(v.y), max.z.max(v.z)),
            )
        },
    )
}
