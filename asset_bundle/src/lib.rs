//! Lays out an Android Studio project around a set of web assets and packs
//! it into a zip archive next to the project directory.

use std::{
    fs::{self, File},
    io::{self, Write},
    path::{Path, PathBuf},
};

use thiserror::Error;
use tracing::{debug, info, warn};
use zip::{result::ZipError, write::SimpleFileOptions, CompressionMethod, ZipWriter};

pub const DEFAULT_PROJECT: &str = "p5jsAndroidApp";
pub const DEFAULT_ASSETS: [&str; 3] = ["vector_cam_divergence.js", "index.html", "sketch.properties"];
pub const PLACEHOLDER: &str = "// Placeholder: Add your content here";

pub const ASSET_DIR: &str = "app/src/main/assets";
pub const FOLDERS: [&str; 3] = [
    "app/src/main/java/com/example/p5jsandroidapp",
    "app/src/main/res/layout",
    ASSET_DIR,
];

#[derive(Debug, Error)]
pub enum BundleError {
    #[error("I/O error at {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("asset path `{}` has no file name", .0.display())]
    InvalidAsset(PathBuf),

    #[error("failed to write archive: {0}")]
    Zip(#[from] ZipError),
}

fn io_error(path: &Path) -> impl FnOnce(io::Error) -> BundleError + '_ {
    move |source| BundleError::Io {
        path: path.to_path_buf(),
        source,
    }
}

pub struct Bundle {
    pub root: PathBuf,
    pub name: String,
    pub assets: Vec<PathBuf>,
}

/// Where everything ended up.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BundleOutput {
    pub project: PathBuf,
    pub archive: PathBuf,
    /// Assets that did not exist and were replaced with [`PLACEHOLDER`].
    pub placeholders: Vec<PathBuf>,
}

impl Bundle {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            name: DEFAULT_PROJECT.to_owned(),
            assets: DEFAULT_ASSETS.iter().map(PathBuf::from).collect(),
        }
    }

    pub fn project_dir(&self) -> PathBuf {
        self.root.join(&self.name)
    }

    pub fn archive_path(&self) -> PathBuf {
        self.root.join(format!("{}.zip", self.name))
    }

    pub fn build(&self) -> Result<BundleOutput, BundleError> {
        let project = self.project_dir();
        for folder in FOLDERS {
            let path = project.join(folder);
            fs::create_dir_all(&path).map_err(io_error(&path))?;
        }

        let placeholders = self.copy_assets(&project.join(ASSET_DIR))?;

        let archive = self.archive_path();
        zip_dir(&project, &archive)?;
        info!("Bundled `{}` into {}", project.display(), archive.display());

        Ok(BundleOutput {
            project,
            archive,
            placeholders,
        })
    }

    fn copy_assets(&self, dir: &Path) -> Result<Vec<PathBuf>, BundleError> {
        let mut placeholders = Vec::new();
        for asset in &self.assets {
            let name = asset
                .file_name()
                .ok_or_else(|| BundleError::InvalidAsset(asset.clone()))?;
            let dest = dir.join(name);

            if asset.is_file() {
                fs::copy(asset, &dest).map_err(io_error(asset))?;
                debug!("Copied {} to {}", asset.display(), dest.display());
            } else {
                warn!("Asset {} not found, writing a placeholder", asset.display());
                fs::write(&dest, PLACEHOLDER).map_err(io_error(&dest))?;
                placeholders.push(asset.clone());
            }
        }

        Ok(placeholders)
    }
}

/// Lists every file under `dir`, depth first with entries sorted by name.
fn walk(dir: &Path, out: &mut Vec<PathBuf>) -> Result<(), BundleError> {
    let mut entries = fs::read_dir(dir)
        .map_err(io_error(dir))?
        .map(|x| x.map(|x| x.path()))
        .collect::<Result<Vec<_>, _>>()
        .map_err(io_error(dir))?;
    entries.sort();

    for path in entries {
        if path.is_dir() {
            walk(&path, out)?;
        } else {
            out.push(path);
        }
    }

    Ok(())
}

/// Deflates the files under `dir` into `archive`, named relative to `dir`.
pub fn zip_dir(dir: &Path, archive: &Path) -> Result<usize, BundleError> {
    let mut files = Vec::new();
    walk(dir, &mut files)?;

    let file = File::create(archive).map_err(io_error(archive))?;
    let mut zip = ZipWriter::new(file);
    let options = SimpleFileOptions::default().compression_method(CompressionMethod::Deflated);

    for path in &files {
        let Ok(relative) = path.strip_prefix(dir) else {
            continue;
        };
        let name = (relative.components())
            .map(|x| x.as_os_str().to_string_lossy())
            .collect::<Vec<_>>()
            .join("/");

        zip.start_file(name, options)?;
        let contents = fs::read(path).map_err(io_error(path))?;
        zip.write_all(&contents).map_err(io_error(archive))?;
    }

    zip.finish()?;
    Ok(files.len())
}

#[cfg(test)]
mod tests {
    use std::io::Read;

    use zip::ZipArchive;

    use super::*;

    #[test]
    fn bundle_with_missing_assets() {
        let dir = tempfile::tempdir().unwrap();
        let sketch = dir.path().join("sketch.js");
        fs::write(&sketch, "function setup() {}").unwrap();

        let mut bundle = Bundle::new(dir.path());
        bundle.assets = vec![sketch, dir.path().join("index.html")];
        let output = bundle.build().unwrap();

        assert_eq!(output.archive, dir.path().join("p5jsAndroidApp.zip"));
        assert_eq!(output.placeholders, [dir.path().join("index.html")]);
        for folder in FOLDERS {
            assert!(output.project.join(folder).is_dir());
        }

        let mut archive = ZipArchive::new(File::open(&output.archive).unwrap()).unwrap();
        let mut names = archive.file_names().map(str::to_owned).collect::<Vec<_>>();
        names.sort();
        assert_eq!(
            names,
            [
                "app/src/main/assets/index.html",
                "app/src/main/assets/sketch.js"
            ]
        );

        let mut read = |name: &str| {
            let mut out = String::new();
            archive.by_name(name).unwrap().read_to_string(&mut out).unwrap();
            out
        };
        assert_eq!(read("app/src/main/assets/sketch.js"), "function setup() {}");
        assert_eq!(read("app/src/main/assets/index.html"), PLACEHOLDER);
    }

    #[test]
    fn rebuild_overwrites_archive() {
        let dir = tempfile::tempdir().unwrap();
        let mut bundle = Bundle::new(dir.path());
        bundle.name = "Sketch".into();

        let first = bundle.build().unwrap();
        assert_eq!(first.placeholders.len(), 3);

        let second = bundle.build().unwrap();
        let archive = ZipArchive::new(File::open(second.archive).unwrap()).unwrap();
        assert_eq!(archive.len(), 3);
    }
}
