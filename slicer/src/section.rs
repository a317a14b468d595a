//! Intersection of a [`Mesh`] with an axis-aligned [`Plane`].

use std::collections::VecDeque;

use common::plane::Plane;
use ordered_float::OrderedFloat;

use crate::{error::SliceError, mesh::Mesh, Pos};

/// Distances below `EPSILON * mesh.scale()` are treated as zero.
const EPSILON: f32 = 1e-5;

/// Outcome of slicing a mesh at one offset.
#[derive(Debug, Clone, PartialEq)]
pub enum Section {
    /// Vertices of the intersection curve, polyline after polyline.
    Points(Vec<Pos>),
    /// The plane misses the mesh.
    Empty,
}

impl Section {
    pub fn points(&self) -> &[Pos] {
        match self {
            Section::Points(points) => points,
            Section::Empty => &[],
        }
    }

    pub fn len(&self) -> usize {
        self.points().len()
    }

    pub fn is_empty(&self) -> bool {
        self.points().is_empty()
    }
}

/// Slices `mesh` with `plane` placed at `offset` along its normal axis and
/// returns the ordered vertices of the resulting curve.
pub fn cross_section(mesh: &Mesh, plane: Plane, offset: f32) -> Result<Section, SliceError> {
    let tolerance = EPSILON * mesh.scale();
    let segments = intersect_plane(mesh, plane, offset)?;

    let points = join_segments(segments, tolerance)
        .into_iter()
        .flatten()
        .collect::<Vec<_>>();

    Ok(if points.is_empty() {
        Section::Empty
    } else {
        Section::Points(points)
    })
}

/// Intersect every face of the mesh with the plane, returning one line
/// segment per face that crosses it. Faces lying in the plane are skipped,
/// their outline comes from the faces around them.
pub fn intersect_plane(
    mesh: &Mesh,
    plane: Plane,
    offset: f32,
) -> Result<Vec<[Pos; 2]>, SliceError> {
    if !offset.is_finite() {
        return Err(SliceError::NonFinite { offset });
    }

    let tolerance = EPSILON * mesh.scale();
    let (normal, point) = (plane.normal(), plane.origin(offset));

    let vertices = mesh.vertices();
    let mut segments = Vec::new();

    for (idx, face) in mesh.faces().iter().enumerate() {
        let mut verts = [Pos::zeros(); 3];
        for (vert, &index) in verts.iter_mut().zip(face) {
            *vert = *vertices
                .get(index as usize)
                .ok_or(SliceError::InvalidFace {
                    face: idx,
                    vertex: index,
                })?;
        }

        // Signed distance of each vertex to the plane, snapped to zero when
        // the vertex sits on it.
        let dist = verts.map(|v| (v - point).dot(&normal));
        if dist.iter().any(|x| !x.is_finite()) {
            return Err(SliceError::NonFinite { offset });
        }
        let side = dist.map(|d| {
            if d > tolerance {
                1
            } else if d < -tolerance {
                -1
            } else {
                0
            }
        });

        let mut out = [Pos::zeros(); 3];
        let mut n = 0;
        let mut push = |pos: Pos| {
            if out[..n].iter().all(|x| (x - pos).norm() > tolerance) {
                out[n] = pos;
                n += 1;
            }
        };

        for i in 0..3 {
            if side[i] == 0 {
                push(verts[i]);
            }
        }

        for (a, b) in [(0, 1), (1, 2), (2, 0)] {
            if side[a] * side[b] < 0 {
                let t = dist[a] / (dist[a] - dist[b]);
                push(verts[a] + t * (verts[b] - verts[a]));
            }
        }

        if n == 2 {
            segments.push([out[0], out[1]]);
        }
    }

    Ok(segments)
}

/// Chains line segments into polylines. Chains are started from the first
/// unused segment and grown in both directions by the segment with the
/// nearest endpoint, so the output only depends on the input order.
///
/// This is quadratic in the number of segments, which is fine for the
/// section sizes this is used with.
pub fn join_segments(segments: Vec<[Pos; 2]>, tolerance: f32) -> Vec<Vec<Pos>> {
    let mut segments = dedup_segments(segments, tolerance);

    let mut polylines = Vec::new();
    while !segments.is_empty() {
        let [start, end] = segments.remove(0);
        let mut polyline = VecDeque::from([start, end]);

        let closed = extend_polyline(&mut polyline, &mut segments, tolerance, false)
            || extend_polyline(&mut polyline, &mut segments, tolerance, true);

        polylines.push(simplify(polyline.into(), closed, tolerance));
    }

    polylines
}

/// Grows the polyline from its back (or front) until no segment touches the
/// current end. Returns true if the polyline closed on itself.
fn extend_polyline(
    polyline: &mut VecDeque<Pos>,
    segments: &mut Vec<[Pos; 2]>,
    tolerance: f32,
    front: bool,
) -> bool {
    loop {
        let (last, other_end) = match front {
            false => (polyline[polyline.len() - 1], polyline[0]),
            true => (polyline[0], polyline[polyline.len() - 1]),
        };

        let Some((idx, [a_dist, b_dist])) = segments
            .iter()
            .map(|[a, b]| [(last - a).norm(), (last - b).norm()])
            .enumerate()
            .min_by_key(|(_, [a, b])| OrderedFloat(a.min(*b)))
        else {
            return false;
        };

        if a_dist > tolerance && b_dist > tolerance {
            return false;
        }

        let [a, b] = segments.remove(idx);
        let next = if a_dist <= b_dist { b } else { a };
        if (next - other_end).norm() <= tolerance {
            return true;
        }

        match front {
            false => polyline.push_back(next),
            true => polyline.push_front(next),
        }
    }
}

/// Removes segments that repeat an earlier one in either direction. A plane
/// passing exactly through a mesh edge hits it from both adjacent faces.
fn dedup_segments(segments: Vec<[Pos; 2]>, tolerance: f32) -> Vec<[Pos; 2]> {
    let same = |a: &Pos, b: &Pos| (a - b).norm() <= tolerance;

    let mut out: Vec<[Pos; 2]> = Vec::with_capacity(segments.len());
    for [a, b] in segments {
        let duplicate = out.iter().any(|[c, d]| {
            (same(&a, c) && same(&b, d)) || (same(&a, d) && same(&b, c))
        });

        if !duplicate {
            out.push([a, b]);
        }
    }

    out
}

/// Drops vertices that lie on the straight line between their neighbours.
/// The endpoints of open polylines are always kept.
fn simplify(mut points: Vec<Pos>, closed: bool, tolerance: f32) -> Vec<Pos> {
    let mut changed = true;
    while changed && points.len() > 2 {
        changed = false;

        let mut i = 0;
        while i < points.len() && points.len() > 2 {
            let len = points.len();
            let (prev, next) = if closed {
                ((i + len - 1) % len, (i + 1) % len)
            } else if i == 0 || i == len - 1 {
                i += 1;
                continue;
            } else {
                (i - 1, i + 1)
            };

            if collinear(points[prev], points[i], points[next], tolerance) {
                points.remove(i);
                changed = true;
            } else {
                i += 1;
            }
        }
    }

    points
}

fn collinear(prev: Pos, point: Pos, next: Pos, tolerance: f32) -> bool {
    let (a, b) = (point - prev, next - point);
    a.dot(&b) > 0.0 && a.cross(&b).norm() <= tolerance * (a.norm() + b.norm())
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Axis aligned box from `min` to `max` with two triangles per side.
    fn cuboid(min: Pos, max: Pos) -> Mesh {
        let vertices = (0..8)
            .map(|i| {
                Pos::new(
                    if i & 1 == 0 { min.x } else { max.x },
                    if i & 2 == 0 { min.y } else { max.y },
                    if i & 4 == 0 { min.z } else { max.z },
                )
            })
            .collect();

        let faces = vec![
            [0, 2, 3],
            [0, 3, 1],
            [4, 5, 7],
            [4, 7, 6],
            [0, 1, 5],
            [0, 5, 4],
            [2, 6, 7],
            [2, 7, 3],
            [0, 4, 6],
            [0, 6, 2],
            [1, 3, 7],
            [1, 7, 5],
        ];

        Mesh::new(vertices, faces)
    }

    fn unit_cube() -> Mesh {
        cuboid(Pos::zeros(), Pos::repeat(1.0))
    }

    fn assert_square(points: &[Pos], axis: usize, offset: f32) {
        assert_eq!(points.len(), 4, "{points:?}");
        for point in points {
            assert!((point[axis] - offset).abs() < 1e-6);
            for i in (0..3).filter(|&i| i != axis) {
                assert!(point[i].abs() < 1e-6 || (point[i] - 1.0).abs() < 1e-6);
            }
        }

        // Consecutive corners share an edge of the square.
        for i in 0..4 {
            let edge = points[(i + 1) % 4] - points[i];
            assert!((edge.norm() - 1.0).abs() < 1e-5, "{points:?}");
        }
    }

    #[test]
    fn cube_middle() {
        let mesh = unit_cube();
        for plane in Plane::ALL {
            let section = cross_section(&mesh, plane, 0.5).unwrap();
            assert_square(section.points(), plane.axis(), 0.5);
        }
    }

    #[test]
    fn cube_faces() {
        let mesh = unit_cube();
        for offset in [0.0, 1.0] {
            let section = cross_section(&mesh, Plane::Xy, offset).unwrap();
            assert_square(section.points(), 2, offset);
        }
    }

    #[test]
    fn cube_miss() {
        let mesh = unit_cube();
        assert_eq!(cross_section(&mesh, Plane::Xz, 1.5).unwrap(), Section::Empty);
        assert_eq!(cross_section(&mesh, Plane::Yz, -0.01).unwrap(), Section::Empty);
    }

    #[test]
    fn empty_mesh() {
        let section = cross_section(&Mesh::default(), Plane::Xy, 0.0).unwrap();
        assert!(section.is_empty());
    }

    #[test]
    fn non_finite_offset() {
        let result = cross_section(&unit_cube(), Plane::Xy, f32::NAN);
        assert!(matches!(result, Err(SliceError::NonFinite { .. })));
    }

    #[test]
    fn invalid_face() {
        let mesh = Mesh::new(vec![Pos::zeros(), Pos::z()], vec![[0, 1, 7]]);
        let result = cross_section(&mesh, Plane::Xy, 0.5);
        assert!(matches!(
            result,
            Err(SliceError::InvalidFace { face: 0, vertex: 7 })
        ));
    }

    #[test]
    fn octahedron_through_edges() {
        // The plane runs along the equator edges, each of which is shared by
        // an upper and a lower face.
        let vertices = vec![
            Pos::new(1.0, 0.0, 0.0),
            Pos::new(0.0, 1.0, 0.0),
            Pos::new(-1.0, 0.0, 0.0),
            Pos::new(0.0, -1.0, 0.0),
            Pos::new(0.0, 0.0, 1.0),
            Pos::new(0.0, 0.0, -1.0),
        ];
        let faces = (0..4)
            .flat_map(|i| [[i, (i + 1) % 4, 4], [(i + 1) % 4, i, 5]])
            .collect();
        let mesh = Mesh::new(vertices, faces);

        let section = cross_section(&mesh, Plane::Xy, 0.0).unwrap();
        assert_eq!(section.len(), 4);

        let section = cross_section(&mesh, Plane::Xy, 0.5).unwrap();
        assert_eq!(section.len(), 4);
        assert!(section.points().iter().all(|p| (p.x.abs() + p.y.abs() - 0.5).abs() < 1e-5));
    }

    #[test]
    fn separate_loops() {
        let a = cuboid(Pos::zeros(), Pos::repeat(1.0));
        let b = cuboid(Pos::new(3.0, 0.0, 0.0), Pos::new(4.0, 1.0, 1.0));

        let mut vertices = a.vertices().to_vec();
        vertices.extend_from_slice(b.vertices());
        let mut faces = a.faces().to_vec();
        faces.extend(b.faces().iter().map(|f| f.map(|x| x + 8)));
        let mesh = Mesh::new(vertices, faces);

        let segments = intersect_plane(&mesh, Plane::Xy, 0.5).unwrap();
        let polylines = join_segments(segments, 1e-5);
        assert_eq!(polylines.len(), 2);
        assert!(polylines.iter().all(|x| x.len() == 4));
        assert!(polylines[0].iter().all(|p| p.x < 2.0));
        assert!(polylines[1].iter().all(|p| p.x > 2.0));
    }

    #[test]
    fn open_chain_keeps_endpoints() {
        let segments = vec![
            [Pos::new(1.0, 0.0, 0.0), Pos::new(2.0, 0.0, 0.0)],
            [Pos::new(2.0, 1.0, 0.0), Pos::new(2.0, 0.0, 0.0)],
            [Pos::new(0.0, 0.0, 0.0), Pos::new(1.0, 0.0, 0.0)],
        ];

        let polylines = join_segments(segments, 1e-5);
        assert_eq!(
            polylines,
            vec![vec![
                Pos::new(0.0, 0.0, 0.0),
                Pos::new(2.0, 0.0, 0.0),
                Pos::new(2.0, 1.0, 0.0),
            ]]
        );
    }

    #[test]
    fn repeated_slices_match() {
        let mesh = unit_cube();
        let a = cross_section(&mesh, Plane::Yz, 0.3).unwrap();
        let b = cross_section(&mesh, Plane::Yz, 0.3).unwrap();
        assert_eq!(a, b);
    }
}
