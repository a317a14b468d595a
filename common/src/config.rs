use std::{
    fs,
    path::{Path, PathBuf},
};

use anyhow::Result;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::plane::Plane;

/// Parameters of one cross-section export run.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(default)]
pub struct SweepConfig {
    /// Distance between two consecutive cross-sections, in mesh units.
    pub step: f32,
    /// Root directory, one sub-directory per plane is created inside it.
    pub output: PathBuf,
    pub planes: Vec<Plane>,
    /// Extract the sections of a plane on the rayon thread pool. Files are
    /// still written one after another.
    pub parallel: bool,
}

impl SweepConfig {
    /// Reads a TOML config file. Keys missing from the file keep their
    /// default values.
    pub fn load(path: &Path) -> Result<Self> {
        let file = fs::read(path)?;
        let string = String::from_utf8_lossy(&file);
        let config = toml::from_str(&string)?;
        info!("Loaded config from `{}`", path.display());
        Ok(config)
    }
}

impl Default for SweepConfig {
    fn default() -> Self {
        Self {
            step: 0.2,
            output: PathBuf::from("cross_sections"),
            planes: Plane::ALL.to_vec(),
            parallel: false,
        }
    }
}
