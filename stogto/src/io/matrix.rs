//! Plain-text matrix files: one row per line, whitespace separated values
//! in `{:.18e}` so a saved matrix re-loads bit for bit.

use crate::error::MatrixIoError;
use crate::io::parse_float;
use nalgebra::DMatrix;
use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::Path;

fn io_error(path: &Path) -> impl FnOnce(std::io::Error) -> MatrixIoError + '_ {
    move |source| MatrixIoError::Io {
        path: path.display().to_string(),
        source,
    }
}

pub fn save_matrix<P: AsRef<Path>>(path: P, matrix: &DMatrix<f64>) -> Result<(), MatrixIoError> {
    let path = path.as_ref();
    let file = File::create(path).map_err(io_error(path))?;
    let mut writer = BufWriter::new(file);
    for row in matrix.row_iter() {
        let line = row
            .iter()
            .map(|v| format!("{:.18e}", v))
            .collect::<Vec<_>>()
            .join(" ");
        writeln!(writer, "{}", line).map_err(io_error(path))?;
    }
    writer.flush().map_err(io_error(path))
}

/// Inverse of [`save_matrix`]. Blank lines and `#` comments are skipped.
pub fn load_matrix<P: AsRef<Path>>(path: P) -> Result<DMatrix<f64>, MatrixIoError> {
    let path = path.as_ref();
    let content = fs::read_to_string(path).map_err(io_error(path))?;

    let mut data = Vec::new();
    let mut ncols = None;
    let mut nrows = 0;
    for (idx, line) in content.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        let row = line
            .split_whitespace()
            .map(|token| {
                parse_float(token).ok_or_else(|| MatrixIoError::Parse {
                    line: idx + 1,
                    token: token.to_string(),
                })
            })
            .collect::<Result<Vec<f64>, _>>()?;

        match ncols {
            None => ncols = Some(row.len()),
            Some(expected) if expected != row.len() => {
                return Err(MatrixIoError::Ragged {
                    line: idx + 1,
                    expected,
                    found: row.len(),
                })
            }
            _ => {}
        }
        data.extend(row);
        nrows += 1;
    }

    match ncols {
        Some(ncols) => Ok(DMatrix::from_row_slice(nrows, ncols, &data)),
        None => Err(MatrixIoError::Empty(path.display().to_string())),
    }
}

/// Labelled table, right aligned in columns of `width` characters with six
/// decimals.
pub fn format_matrix(
    matrix: &DMatrix<f64>,
    row_labels: &[String],
    col_labels: &[String],
    width: usize,
) -> String {
    let mut out = String::new();
    out.push_str(&" ".repeat(width));
    for label in col_labels {
        out.push_str(&format!("{:>width$}", label, width = width));
    }
    out.push('\n');

    for (i, row) in matrix.row_iter().enumerate() {
        let label = row_labels.get(i).map(String::as_str).unwrap_or("");
        out.push_str(&format!("{:>width$}", label, width = width));
        for v in row.iter() {
            out.push_str(&format!("{:>width$.6}", v, width = width));
        }
        out.push('\n');
    }
    out
}

pub fn write_labelled_matrix<P: AsRef<Path>>(
    path: P,
    matrix: &DMatrix<f64>,
    row_labels: &[String],
    col_labels: &[String],
) -> Result<(), MatrixIoError> {
    let path = path.as_ref();
    let mut file = File::create(path).map_err(io_error(path))?;
    file.write_all(format_matrix(matrix, row_labels, col_labels, 12).as_bytes())
        .map_err(io_error(path))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::Rng;

    #[test]
    fn test_save_load_roundtrip_is_exact() {
        let mut rng = rand::thread_rng();
        let matrix = DMatrix::from_fn(5, 3, |_, _| rng.gen_range(-1e3..1e3) * 10f64.powi(rng.gen_range(-12..12)));
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("m.txt");
        save_matrix(&path, &matrix).unwrap();
        let loaded = load_matrix(&path).unwrap();
        assert_eq!(loaded.shape(), (5, 3));
        assert_eq!(loaded, matrix);
    }

    #[test]
    fn test_load_accepts_numpy_and_fortran_text() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("np.txt");
        fs::write(
            &path,
            "# written by numpy\n1.000000000000000000e+00 -2.5e-01\n\n3.0D+00 4\n",
        )
        .unwrap();
        let m = load_matrix(&path).unwrap();
        assert_eq!(m, DMatrix::from_row_slice(2, 2, &[1.0, -0.25, 3.0, 4.0]));
    }

    #[test]
    fn test_load_rejects_bad_input() {
        let dir = tempfile::tempdir().unwrap();
        let ragged = dir.path().join("ragged.txt");
        fs::write(&ragged, "1 2 3\n4 5\n").unwrap();
        assert!(matches!(
            load_matrix(&ragged),
            Err(MatrixIoError::Ragged {
                line: 2,
                expected: 3,
                found: 2
            })
        ));

        let garbage = dir.path().join("garbage.txt");
        fs::write(&garbage, "1 x\n").unwrap();
        assert!(matches!(
            load_matrix(&garbage),
            Err(MatrixIoError::Parse { line: 1, .. })
        ));

        let empty = dir.path().join("empty.txt");
        fs::write(&empty, "\n# nothing\n").unwrap();
        assert!(matches!(load_matrix(&empty), Err(MatrixIoError::Empty(_))));

        assert!(matches!(
            load_matrix(dir.path().join("missing.txt")),
            Err(MatrixIoError::Io { .. })
        ));
    }

    #[test]
    fn test_format_matrix_layout() {
        let m = DMatrix::from_row_slice(1, 2, &[0.5, -1.0]);
        let table = format_matrix(&m, &["O1 2s".to_string()], &["a".to_string(), "b".to_string()], 12);
        let lines: Vec<&str> = table.lines().collect();
        assert_eq!(lines[0], format!("{}{:>12}{:>12}", " ".repeat(12), "a", "b"));
        assert_eq!(lines[1], format!("{:>12}{:>12}{:>12}", "O1 2s", "0.500000", "-1.000000"));
    }
}
