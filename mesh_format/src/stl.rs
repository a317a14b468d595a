use std::io::{Read, Seek};

use common::progress::Progress;
use nalgebra::Vector3;

use crate::{LoadError, RawMesh, Scene};

/// Reads an ASCII or binary STL file. STL has no notion of objects so the
/// scene holds at most one mesh.
pub fn parse<T: Read + Seek>(reader: &mut T, progress: Progress) -> Result<Scene, LoadError> {
    progress.set_total(1);
    let model = stl_io::read_stl(reader).map_err(LoadError::Stl)?;

    let mesh = RawMesh {
        name: "stl".to_owned(),
        verts: (model.vertices.iter())
            .map(|v| Vector3::new(v[0], v[1], v[2]))
            .collect(),
        faces: (model.faces.iter())
            .map(|f| f.vertices.map(|x| x as u32))
            .collect(),
    };

    let meshes = if mesh.faces.is_empty() {
        Vec::new()
    } else {
        vec![mesh]
    };
    Ok(Scene { meshes })
}

#[cfg(test)]
mod tests {
    use std::io::Cursor;

    use super::*;

    const TETRAHEDRON: &str = "solid tetra
facet normal 0 0 -1
  outer loop
    vertex 0 0 0
    vertex 0 1 0
    vertex 1 0 0
  endloop
endfacet
facet normal 0 -1 0
  outer loop
    vertex 0 0 0
    vertex 1 0 0
    vertex 0 0 1
  endloop
endfacet
facet normal -1 0 0
  outer loop
    vertex 0 0 0
    vertex 0 0 1
    vertex 0 1 0
  endloop
endfacet
facet normal 1 1 1
  outer loop
    vertex 1 0 0
    vertex 0 1 0
    vertex 0 0 1
  endloop
endfacet
endsolid tetra
";

    #[test]
    fn ascii_tetrahedron() {
        let mut reader = Cursor::new(TETRAHEDRON.as_bytes().to_vec());
        let scene = parse(&mut reader, Progress::new()).unwrap();

        let mesh = &scene.meshes[0];
        assert_eq!(mesh.faces.len(), 4);
        assert_eq!(mesh.verts.len(), 4);
        for face in &mesh.faces {
            assert!(face.iter().all(|&idx| (idx as usize) < mesh.verts.len()));
        }
    }
}
