//! Planar cross-sections of triangle meshes, exported as CSV point lists.
//!
//! A [`mesh::Mesh`] is swept along each of the three axis-aligned planes at a
//! fixed step (see [`sweep::Sweep`]); every offset is sliced with
//! [`section::cross_section`] and non-empty results are written by
//! [`export::Exporter`].

use nalgebra::Vector3;

pub mod csv;
pub mod error;
pub mod export;
pub mod mesh;
pub mod section;
pub mod sweep;

pub type Pos = Vector3<f32>;
