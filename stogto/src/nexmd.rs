//! Readers for the NEXMD trajectory outputs.
//!
//! `vhf.out` holds one line per time step: the time followed by the N×N
//! molecular orbital coefficients in row-major order. The transition
//! density file holds one line per (state, time) pair: the state index, the
//! time, then either the full N×N matrix or only its diagonal.

use crate::error::NexmdError;
use crate::io::parse_float;
use nalgebra::{DMatrix, DVector};
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;
use tracing::debug;

/// Which part of the transition density was written by NEXMD.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TdmLayout {
    #[default]
    Full,
    Diagonal,
}

#[derive(Debug, Clone, PartialEq)]
pub struct MoSnapshot {
    pub time: f64,
    /// AO × MO, one molecular orbital per column.
    pub coefficients: DMatrix<f64>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum TransitionDensity {
    Full(DMatrix<f64>),
    Diagonal(DVector<f64>),
}

impl TransitionDensity {
    pub fn dimension(&self) -> usize {
        match self {
            TransitionDensity::Full(m) => m.nrows(),
            TransitionDensity::Diagonal(d) => d.len(),
        }
    }
}

fn open(path: &Path) -> Result<BufReader<File>, NexmdError> {
    File::open(path)
        .map(BufReader::new)
        .map_err(|source| NexmdError::Io {
            path: path.display().to_string(),
            source,
        })
}

fn parse_values(tokens: &[&str], line: usize) -> Result<Vec<f64>, NexmdError> {
    tokens
        .iter()
        .map(|token| {
            parse_float(token).ok_or_else(|| NexmdError::Parse {
                line,
                token: token.to_string(),
            })
        })
        .collect()
}

fn square_dimension(count: usize, line: usize) -> Result<usize, NexmdError> {
    let n = (count as f64).sqrt().round() as usize;
    if count == 0 || n * n != count {
        return Err(NexmdError::NotSquare { line, count });
    }
    Ok(n)
}

/// Parse one `vhf.out` line: `time c_1 … c_{N²}`.
pub fn parse_mo_line(line: &str, line_no: usize) -> Result<MoSnapshot, NexmdError> {
    let tokens: Vec<&str> = line.split_whitespace().collect();
    let values = parse_values(&tokens, line_no)?;
    let (time, flat) = values
        .split_first()
        .ok_or(NexmdError::NotSquare {
            line: line_no,
            count: 0,
        })?;
    let n = square_dimension(flat.len(), line_no)?;

    // row-major N×N, transposed so columns are orbitals
    let coefficients = DMatrix::from_row_slice(n, n, flat).transpose();
    Ok(MoSnapshot {
        time: *time,
        coefficients,
    })
}

/// MO coefficients stored on line `time_step` (counted from 1) of `path`.
pub fn read_mo_coefficients<P: AsRef<Path>>(
    path: P,
    time_step: usize,
) -> Result<MoSnapshot, NexmdError> {
    let path = path.as_ref();
    if time_step == 0 {
        return Err(NexmdError::InvalidTimeStep);
    }

    let reader = open(path)?;
    let mut lines_read = 0;
    for (idx, line) in reader.lines().enumerate() {
        let line = line.map_err(|source| NexmdError::Io {
            path: path.display().to_string(),
            source,
        })?;
        lines_read = idx + 1;
        if lines_read == time_step {
            let snapshot = parse_mo_line(&line, lines_read)?;
            debug!(
                "MO coefficients at step {} (t = {}): {} basis functions",
                time_step,
                snapshot.time,
                snapshot.coefficients.nrows()
            );
            return Ok(snapshot);
        }
    }

    Err(NexmdError::StepOutOfRange {
        step: time_step,
        lines: lines_read,
        path: path.display().to_string(),
    })
}

fn same_time(a: f64, b: f64) -> bool {
    (a - b).abs() <= 1e-8 * a.abs().max(b.abs()).max(1.0)
}

/// Transition density of `state` at `time`. The first matching line wins.
pub fn read_transition_density<P: AsRef<Path>>(
    path: P,
    state: usize,
    time: f64,
    layout: TdmLayout,
) -> Result<TransitionDensity, NexmdError> {
    let path = path.as_ref();
    let reader = open(path)?;

    for (idx, line) in reader.lines().enumerate() {
        let line_no = idx + 1;
        let line = line.map_err(|source| NexmdError::Io {
            path: path.display().to_string(),
            source,
        })?;
        let tokens: Vec<&str> = line.split_whitespace().collect();
        if tokens.len() < 2 || tokens[0].starts_with('#') {
            continue;
        }

        let line_state = tokens[0].parse::<usize>().map_err(|_| NexmdError::Parse {
            line: line_no,
            token: tokens[0].to_string(),
        })?;
        let line_time = parse_float(tokens[1]).ok_or_else(|| NexmdError::Parse {
            line: line_no,
            token: tokens[1].to_string(),
        })?;
        if line_state != state || !same_time(line_time, time) {
            continue;
        }

        let values = parse_values(&tokens[2..], line_no)?;
        debug!(
            "transition density for state {} at t = {} on line {}",
            state, time, line_no
        );
        return match layout {
            TdmLayout::Full => {
                let n = square_dimension(values.len(), line_no)?;
                Ok(TransitionDensity::Full(DMatrix::from_row_slice(n, n, &values)))
            }
            TdmLayout::Diagonal => Ok(TransitionDensity::Diagonal(DVector::from_vec(values))),
        };
    }

    Err(NexmdError::TransitionNotFound { state, time })
}
