use std::{
    collections::HashMap,
    io::{BufRead, BufReader, Read, Seek, SeekFrom},
    mem,
};

use common::progress::Progress;
use nalgebra::Vector3;

use crate::{LoadError, RawMesh, Scene};

const DEFAULT_NAME: &str = "default";

/// Faces of one object. Indices still point into the file wide vertex list.
struct Object {
    name: String,
    material: Option<String>,
    faces: Vec<[u32; 3]>,
}

impl Object {
    fn new(name: String, material: Option<String>) -> Self {
        Self {
            name,
            material,
            faces: Vec::new(),
        }
    }
}

/// Splits the file into objects. A new object starts at every `o` statement
/// and whenever `usemtl` switches to another material. Groups (`g`) are parts
/// of the current object and never split it.
pub fn parse<T: Read + Seek>(reader: &mut T, progress: Progress) -> Result<Scene, LoadError> {
    let size = reader.seek(SeekFrom::End(0))?;
    reader.rewind()?;
    progress.set_total(size);

    let mut verts = Vec::new();
    let mut objects = Vec::new();
    let mut current = Object::new(DEFAULT_NAME.to_owned(), None);

    let mut reader = BufReader::new(reader);
    let mut line = String::new();
    let (mut number, mut complete) = (0, 0);
    loop {
        line.clear();
        let read = reader.read_line(&mut line)?;
        if read == 0 {
            break;
        }

        number += 1;
        complete += read as u64;
        progress.set_complete(complete);

        let mut parts = line.split_whitespace();
        match parts.next() {
            Some("v") => {
                let vert = next_vertex(parts).ok_or_else(|| LoadError::parse(number, "invalid vertex"))?;
                verts.push(vert);
            }
            Some("f") => {
                let indices = parts
                    .map(|x| vertex_index(x, verts.len()))
                    .collect::<Option<Vec<_>>>()
                    .ok_or_else(|| LoadError::parse(number, "invalid face"))?;
                if indices.len() < 3 {
                    return Err(LoadError::parse(number, "face needs at least three vertices"));
                }

                // Polygons are split into a fan around their first vertex.
                for pair in indices[1..].windows(2) {
                    current.faces.push([indices[0], pair[0], pair[1]]);
                }
            }
            Some("o") => {
                let name = parts.collect::<Vec<_>>().join(" ");
                let name = if name.is_empty() { DEFAULT_NAME.to_owned() } else { name };

                if current.faces.is_empty() {
                    current.name = name;
                } else {
                    let next = Object::new(name, current.material.clone());
                    objects.push(mem::replace(&mut current, next));
                }
            }
            Some("usemtl") => {
                let material = Some(parts.collect::<Vec<_>>().join(" "));
                if current.material == material {
                    continue;
                }

                if current.faces.is_empty() {
                    current.material = material;
                } else {
                    let next = Object::new(current.name.clone(), material);
                    objects.push(mem::replace(&mut current, next));
                }
            }
            _ => {}
        }
    }

    if !current.faces.is_empty() {
        objects.push(current);
    }

    let meshes = objects
        .into_iter()
        .map(|object| extract_object(&verts, object))
        .collect();
    Ok(Scene { meshes })
}

/// Copies the vertices used by an object into its own mesh, numbering them in
/// the order the faces first reference them.
fn extract_object(verts: &[Vector3<f32>], object: Object) -> RawMesh {
    let mut remap = HashMap::new();
    let mut mesh = RawMesh {
        name: object.name,
        ..Default::default()
    };

    for face in object.faces {
        let face = face.map(|idx| {
            *remap.entry(idx).or_insert_with(|| {
                mesh.verts.push(verts[idx as usize]);
                mesh.verts.len() as u32 - 1
            })
        });
        mesh.faces.push(face);
    }

    mesh
}

fn next_vertex<'a>(mut parts: impl Iterator<Item = &'a str>) -> Option<Vector3<f32>> {
    Some(Vector3::new(
        parts.next()?.parse().ok()?,
        parts.next()?.parse().ok()?,
        parts.next()?.parse().ok()?,
    ))
}

/// Resolves a face reference (`v`, `v/vt`, `v//vn` or `v/vt/vn`) to a zero
/// based vertex index. Negative references count back from the last vertex.
fn vertex_index(token: &str, vertex_count: usize) -> Option<u32> {
    let number = token.split_once('/').map(|x| x.0).unwrap_or(token);
    let index = number.parse::<i64>().ok()?;

    let index = match index {
        0 => return None,
        1.. => index - 1,
        _ => vertex_count as i64 + index,
    };

    (0..vertex_count as i64)
        .contains(&index)
        .then_some(index as u32)
}
