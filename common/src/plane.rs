use std::{fmt, str::FromStr};

use nalgebra::Vector3;
use serde::{Deserialize, Serialize};

/// One of the three axis-aligned slicing planes. Each plane is swept along
/// its normal axis.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum Plane {
    Xy,
    Xz,
    Yz,
}

impl Plane {
    pub const ALL: [Plane; 3] = [Plane::Xy, Plane::Xz, Plane::Yz];

    pub fn name(&self) -> &'static str {
        match self {
            Plane::Xy => "xy",
            Plane::Xz => "xz",
            Plane::Yz => "yz",
        }
    }

    /// Index of the bounding box component the plane is swept along.
    pub fn axis(&self) -> usize {
        match self {
            Plane::Xy => 2,
            Plane::Xz => 1,
            Plane::Yz => 0,
        }
    }

    pub fn normal(&self) -> Vector3<f32> {
        let mut normal = Vector3::zeros();
        normal[self.axis()] = 1.0;
        normal
    }

    /// A point on the plane when it is placed at `offset` along its normal.
    pub fn origin(&self, offset: f32) -> Vector3<f32> {
        self.normal() * offset
    }
}

impl fmt::Display for Plane {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownPlane(pub String);

impl fmt::Display for UnknownPlane {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid plane `{}`, use 'xy', 'xz', or 'yz'", self.0)
    }
}

impl std::error::Error for UnknownPlane {}

impl FromStr for Plane {
    type Err = UnknownPlane;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s.trim().to_ascii_lowercase().as_str() {
            "xy" => Plane::Xy,
            "xz" => Plane::Xz,
            "yz" => Plane::Yz,
            _ => return Err(UnknownPlane(s.to_owned())),
        })
    }
}
