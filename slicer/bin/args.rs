use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{ArgAction, Parser};
use common::{config::SweepConfig, plane::Plane};
use tracing::level_filters::LevelFilter;

#[derive(Debug, Parser)]
/// Export planar cross-sections of a mesh as CSV point lists.
pub struct Args {
    /// Path to a .obj or .stl file. Only the first object of a multi-object
    /// file is sliced.
    pub mesh: PathBuf,

    #[arg(long)]
    /// Distance between two cross-sections, in mesh units. [default: 0.2]
    pub step: Option<f32>,

    #[arg(short, long)]
    /// Directory to write the per-plane CSV folders to. [default:
    /// cross_sections]
    pub output: Option<PathBuf>,

    #[arg(long = "plane")]
    /// Plane to sweep (xy, xz or yz). Can be given multiple times, all three
    /// planes are swept if omitted.
    pub planes: Vec<Plane>,

    #[arg(long)]
    /// TOML file with the sweep settings. Command line flags take precedence
    /// over values from the file.
    pub config: Option<PathBuf>,

    #[arg(long)]
    /// Extract the sections of each plane on all cores. Output is identical
    /// to a sequential run.
    pub parallel: bool,

    #[arg(short, long, action = ArgAction::Count)]
    /// Log more details, repeat for even more.
    pub verbose: u8,
}

impl Args {
    pub fn sweep_config(&self) -> Result<SweepConfig> {
        let mut config = match &self.config {
            Some(path) => SweepConfig::load(path)
                .with_context(|| format!("Failed to load config `{}`", path.display()))?,
            None => SweepConfig::default(),
        };

        if let Some(step) = self.step {
            config.step = step;
        }

        if let Some(output) = &self.output {
            config.output = output.clone();
        }

        if !self.planes.is_empty() {
            config.planes = self.planes.clone();
        }

        config.parallel |= self.parallel;
        Ok(config)
    }

    pub fn log_level(&self) -> LevelFilter {
        match self.verbose {
            0 => LevelFilter::WARN,
            1 => LevelFilter::INFO,
            2 => LevelFilter::DEBUG,
            _ => LevelFilter::TRACE,
        }
    }
}
