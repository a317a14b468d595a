use std::{
    collections::HashSet,
    fs,
    path::{Path, PathBuf},
};

use common::{config::SweepConfig, misc::format_offset, plane::Plane, progress::Progress};
use rayon::iter::{IntoParallelIterator, ParallelIterator};
use tracing::{debug, info, warn};

use crate::{
    csv::write_section,
    error::{ExportError, SliceError},
    mesh::Mesh,
    section::{cross_section, Section},
    sweep::Sweep,
};

/// Sweeps a mesh along each configured plane and writes every non-empty
/// cross-section to `<output>/<plane>/cross_section_<plane>_<offset>.csv`.
pub struct Exporter {
    config: SweepConfig,
    progress: Progress,
}

#[derive(Debug, Default, Clone, PartialEq)]
pub struct ExportSummary {
    /// Files written, in the order they were written.
    pub files: Vec<PathBuf>,
    pub empty: usize,
    pub slice_failures: usize,
    pub write_failures: usize,
}

impl ExportSummary {
    pub fn failures(&self) -> usize {
        self.slice_failures + self.write_failures
    }
}

impl Exporter {
    pub fn new(config: SweepConfig) -> Self {
        Self {
            config,
            progress: Progress::new(),
        }
    }

    pub fn config(&self) -> &SweepConfig {
        &self.config
    }

    /// Gets a handle to the progress of the running export, counted in offsets
    /// over all planes.
    pub fn progress(&self) -> Progress {
        self.progress.clone()
    }

    pub fn export(&self, mesh: &Mesh) -> Result<ExportSummary, ExportError> {
        let step = self.config.step;

        // Every sweep is checked before anything is created on disk.
        let sweeps = (self.config.planes.iter())
            .map(|&plane| match Sweep::for_plane(mesh, plane, step) {
                Ok(sweep) => Ok((plane, sweep)),
                Err(source) => Err(ExportError::Sweep { plane, source }),
            })
            .collect::<Result<Vec<_>, _>>()?;

        let total = sweeps.iter().map(|(_, sweep)| sweep.len() as u64).sum();
        self.progress.set_total(total);
        self.progress.set_complete(0);

        let (min, max) = mesh.bounds();
        info!("Mesh bounds: min {:?}, max {:?}", min.as_slice(), max.as_slice());

        let mut summary = ExportSummary::default();
        for (plane, sweep) in sweeps {
            self.export_plane(mesh, plane, &sweep, &mut summary)?;
        }

        self.progress.set_finished();
        Ok(summary)
    }

    fn export_plane(
        &self,
        mesh: &Mesh,
        plane: Plane,
        sweep: &Sweep,
        summary: &mut ExportSummary,
    ) -> Result<(), ExportError> {
        let dir = self.config.output.join(plane.name());
        fs::create_dir_all(&dir).map_err(|source| ExportError::CreateDir {
            path: dir.clone(),
            source,
        })?;

        info!(
            "Processing plane '{}' from {} to {} with step {}",
            plane,
            sweep.start(),
            sweep.offset(sweep.len().saturating_sub(1)),
            sweep.step()
        );

        let mut written = HashSet::new();
        if self.config.parallel {
            let sections = (0..sweep.len())
                .into_par_iter()
                .map(|i| {
                    let offset = sweep.offset(i);
                    (offset, cross_section(mesh, plane, offset))
                })
                .collect::<Vec<_>>();

            for (offset, section) in sections {
                self.save(&dir, plane, offset, section, &mut written, summary);
            }
        } else {
            for offset in sweep.offsets() {
                let section = cross_section(mesh, plane, offset);
                self.save(&dir, plane, offset, section, &mut written, summary);
            }
        }

        Ok(())
    }

    /// Writes one section if it has points. Failures are logged and counted,
    /// they never stop the sweep.
    fn save(
        &self,
        dir: &Path,
        plane: Plane,
        offset: f32,
        section: Result<Section, SliceError>,
        written: &mut HashSet<PathBuf>,
        summary: &mut ExportSummary,
    ) {
        self.progress.add_complete(1);

        let points = match section {
            Ok(Section::Points(points)) => points,
            Ok(Section::Empty) => {
                debug!("No points extracted for plane '{plane}' at {offset}");
                summary.empty += 1;
                return;
            }
            Err(err) => {
                warn!("Error extracting cross-section for plane '{plane}' at {offset}: {err}");
                summary.slice_failures += 1;
                return;
            }
        };

        let path = dir.join(section_file_name(plane, offset));
        if !written.insert(path.clone()) {
            warn!(
                "Offset {offset} rounds to an existing file name, overwriting {}",
                path.display()
            );
        }

        match write_section(&path, &points) {
            Ok(()) => {
                info!(
                    "Saved cross-section for plane '{plane}' at {offset} to {}",
                    path.display()
                );
                summary.files.push(path);
            }
            Err(err) => {
                warn!("Error saving CSV for plane '{plane}' at {offset}: {err}");
                summary.write_failures += 1;
            }
        }
    }
}

/// `cross_section_<plane>_<offset>.csv` with the offset rounded to two
/// decimal places.
pub fn section_file_name(plane: Plane, offset: f32) -> String {
    format!("cross_section_{}_{}.csv", plane, format_offset(offset))
}
