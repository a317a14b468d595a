//! Cross-section point lists as `X,Y,Z` CSV files.

use std::{
    fs::{self, File},
    io::{BufWriter, Write},
    path::Path,
};

use crate::{
    error::{ReadError, WriteError},
    Pos,
};

pub const HEADER: &str = "X,Y,Z";

/// Writes a header line followed by one `x,y,z` row per point.
pub fn write_section(path: &Path, points: &[Pos]) -> Result<(), WriteError> {
    let error = |source| WriteError {
        path: path.to_path_buf(),
        source,
    };

    let mut writer = BufWriter::new(File::create(path).map_err(error)?);
    writeln!(writer, "{HEADER}").map_err(error)?;
    for point in points {
        writeln!(writer, "{},{},{}", point.x, point.y, point.z).map_err(error)?;
    }

    writer.flush().map_err(error)
}

/// Reads back a file written by [`write_section`].
pub fn read_section(path: &Path) -> Result<Vec<Pos>, ReadError> {
    let contents = fs::read_to_string(path).map_err(|source| ReadError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let error = |line: usize, message: &str| ReadError::Format {
        path: path.to_path_buf(),
        line,
        message: message.to_owned(),
    };

    let mut lines = contents.lines().enumerate().map(|(i, x)| (i + 1, x.trim()));
    match lines.next() {
        Some((_, HEADER)) => {}
        _ => return Err(error(1, "missing `X,Y,Z` header")),
    }

    let mut points = Vec::new();
    for (number, line) in lines.filter(|(_, x)| !x.is_empty()) {
        let values = line
            .split(',')
            .map(|x| x.trim().parse::<f32>())
            .collect::<Result<Vec<_>, _>>()
            .map_err(|_| error(number, "invalid number"))?;

        let [x, y, z] = values[..] else {
            return Err(error(number, "expected three columns"));
        };
        points.push(Pos::new(x, y, z));
    }

    Ok(points)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn write_then_read() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("cross_section_xy_0.5.csv");

        let points = vec![
            Pos::new(0.0, 0.0, 0.5),
            Pos::new(1.0, -0.25, 0.5),
            Pos::new(0.1, 1e-7, 1234.5677),
        ];
        write_section(&path, &points).unwrap();

        let contents = fs::read_to_string(&path).unwrap();
        assert_eq!(contents.lines().count(), points.len() + 1);
        assert!(contents.starts_with("X,Y,Z\n0,0,0.5\n1,-0.25,0.5\n"));

        let read = read_section(&path).unwrap();
        assert_eq!(read.len(), points.len());
        for (a, b) in read.iter().zip(&points) {
            assert!((a - b).norm() < 1e-6);
        }
    }

    #[test]
    fn write_into_missing_directory() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing").join("out.csv");

        let err = write_section(&path, &[Pos::zeros()]).unwrap_err();
        assert_eq!(err.path, path);
    }

    #[test]
    fn read_rejects_bad_rows() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bad.csv");

        fs::write(&path, "X,Y,Z\n1,2,3\n1,2\n").unwrap();
        assert!(matches!(
            read_section(&path),
            Err(ReadError::Format { line: 3, .. })
        ));

        fs::write(&path, "1,2,3\n").unwrap();
        assert!(matches!(
            read_section(&path),
            Err(ReadError::Format { line: 1, .. })
        ));
    }
}
