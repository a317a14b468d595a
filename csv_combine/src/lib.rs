//! Merges cross-section CSV files into one file per group. Files are grouped
//! by the first two characters of the integer part of the offset in their
//! name, so `cross_section_xz_12.4.csv` and `cross_section_xz_127.0.csv` both
//! end up in `combined_cross_section_xz_12.csv`.

use std::{
    collections::BTreeMap,
    fs::{self, File},
    io::{self, BufWriter, Write},
    path::{Path, PathBuf},
};

use thiserror::Error;
use tracing::{info, warn};

pub const DEFAULT_PREFIX: &str = "cross_section_xz_";

#[derive(Debug, Error)]
pub enum CombineError {
    #[error("failed to read {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to write {}: {source}", path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// One output file and the inputs that went into it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CombinedGroup {
    pub key: String,
    pub path: PathBuf,
    pub files: Vec<PathBuf>,
}

/// Derives the group of a file named `<prefix><number>.csv`. The number is
/// truncated towards zero and only the first two characters of its decimal
/// form are kept, a leading minus sign counts as one of them.
pub fn group_key(file_name: &str, prefix: &str) -> Option<String> {
    let number = file_name.strip_prefix(prefix)?.strip_suffix(".csv")?;
    let value = number.parse::<f64>().ok().filter(|x| x.is_finite())?;

    let integer = value.trunc() as i64;
    Some(integer.to_string().chars().take(2).collect())
}

/// Lists the `<prefix>*.csv` files directly inside `dir`, sorted by name.
pub fn find_files(dir: &Path, prefix: &str) -> Result<Vec<PathBuf>, CombineError> {
    let error = |source| CombineError::Read {
        path: dir.to_path_buf(),
        source,
    };

    let mut files = Vec::new();
    for entry in fs::read_dir(dir).map_err(error)? {
        let entry = entry.map_err(error)?;
        let name = entry.file_name();
        let name = name.to_string_lossy();

        if name.starts_with(prefix) && name.ends_with(".csv") && entry.path().is_file() {
            files.push(entry.path());
        }
    }

    files.sort();
    Ok(files)
}

/// Sorts files into groups by [`group_key`]. Files whose name does not hold
/// a number are left out.
pub fn group_files(files: &[PathBuf], prefix: &str) -> BTreeMap<String, Vec<PathBuf>> {
    let mut groups = BTreeMap::<_, Vec<_>>::new();
    for file in files {
        let name = file.file_name().unwrap_or_default().to_string_lossy();
        match group_key(&name, prefix) {
            Some(key) => groups.entry(key).or_default().push(file.clone()),
            None => warn!("Skipping file with invalid number: {}", file.display()),
        }
    }

    groups
}

/// Concatenates `files` into `output`. The header of the first non-empty file
/// is kept, the first line of every other file is dropped.
pub fn combine_files(files: &[PathBuf], output: &Path) -> Result<(), CombineError> {
    let write_error = |source| CombineError::Write {
        path: output.to_path_buf(),
        source,
    };

    let mut writer = BufWriter::new(File::create(output).map_err(write_error)?);
    let mut header_written = false;

    for file in files {
        let contents = fs::read_to_string(file).map_err(|source| CombineError::Read {
            path: file.clone(),
            source,
        })?;

        let mut lines = contents.lines();
        let Some(header) = lines.next() else {
            continue;
        };

        if !header_written {
            writeln!(writer, "{header}").map_err(write_error)?;
            header_written = true;
        }

        for line in lines {
            writeln!(writer, "{line}").map_err(write_error)?;
        }
    }

    writer.flush().map_err(write_error)
}

/// Combines every `<prefix>*.csv` file in `input` into
/// `<output>/combined_<prefix><key>.csv`, one file per group key.
pub fn combine(input: &Path, prefix: &str, output: &Path) -> Result<Vec<CombinedGroup>, CombineError> {
    fs::create_dir_all(output).map_err(|source| CombineError::Write {
        path: output.to_path_buf(),
        source,
    })?;

    let files = find_files(input, prefix)?;
    let mut combined = Vec::new();

    for (key, files) in group_files(&files, prefix) {
        let path = output.join(format!("combined_{prefix}{key}.csv"));
        combine_files(&files, &path)?;
        info!("Combined {} file(s) into {}", files.len(), path.display());

        combined.push(CombinedGroup { key, path, files });
    }

    Ok(combined)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keys() {
        let key = |name: &str| group_key(name, DEFAULT_PREFIX);

        assert_eq!(key("cross_section_xz_0.4.csv").as_deref(), Some("0"));
        assert_eq!(key("cross_section_xz_7.0.csv").as_deref(), Some("7"));
        assert_eq!(key("cross_section_xz_12.4.csv").as_deref(), Some("12"));
        assert_eq!(key("cross_section_xz_127.99.csv").as_deref(), Some("12"));
        assert_eq!(key("cross_section_xz_-0.6.csv").as_deref(), Some("0"));
        assert_eq!(key("cross_section_xz_-3.2.csv").as_deref(), Some("-3"));
        assert_eq!(key("cross_section_xz_-45.0.csv").as_deref(), Some("-4"));

        assert_eq!(key("cross_section_xz_abc.csv"), None);
        assert_eq!(key("cross_section_xz_inf.csv"), None);
        assert_eq!(key("cross_section_xy_1.0.csv"), None);
        assert_eq!(key("cross_section_xz_1.0.txt"), None);
    }

    #[test]
    fn combine_directory() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("xz");
        let output = dir.path().join("combined_csv");
        fs::create_dir_all(&input).unwrap();

        let write = |name: &str, contents: &str| fs::write(input.join(name), contents).unwrap();
        write("cross_section_xz_1.2.csv", "X,Y,Z\n0,1.2,0\n1,1.2,0\n");
        write("cross_section_xz_1.0.csv", "X,Y,Z\n0,1,0\n");
        write("cross_section_xz_10.5.csv", "X,Y,Z\n5,10.5,5\n");
        write("cross_section_xz_108.0.csv", "X,Y,Z\n5,108,5\n");
        write("cross_section_xz_1.4.csv", "");
        write("cross_section_xz_bad.csv", "X,Y,Z\n");
        write("cross_section_xy_1.0.csv", "X,Y,Z\n9,9,1\n");

        let groups = combine(&input, DEFAULT_PREFIX, &output).unwrap();
        let keys = groups.iter().map(|x| x.key.as_str()).collect::<Vec<_>>();
        assert_eq!(keys, ["1", "10"]);
        assert_eq!(groups[0].files.len(), 3);
        assert_eq!(groups[1].files.len(), 2);

        let one = fs::read_to_string(output.join("combined_cross_section_xz_1.csv")).unwrap();
        assert_eq!(one, "X,Y,Z\n0,1,0\n0,1.2,0\n1,1.2,0\n");

        let ten = fs::read_to_string(output.join("combined_cross_section_xz_10.csv")).unwrap();
        assert_eq!(ten, "X,Y,Z\n5,10.5,5\n5,108,5\n");
    }

    #[test]
    fn missing_input_directory() {
        let dir = tempfile::tempdir().unwrap();
        let result = combine(&dir.path().join("missing"), DEFAULT_PREFIX, dir.path());
        assert!(matches!(result, Err(CombineError::Read { .. })));
    }
}
