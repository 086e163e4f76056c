//! Error types for the input readers and the density algebra.

use basis::BasisError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum MoldenError {
    #[error("failed to read molden file {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("molden file has no {0} section")]
    MissingSection(&'static str),

    #[error("line {line}: {message}")]
    Malformed { line: usize, message: String },

    #[error("line {line}: atom '{label}' has no element with atomic number {atomic_number}")]
    UnknownElement {
        line: usize,
        label: String,
        atomic_number: usize,
    },

    #[error("line {line}: shell declared for atom {atom}, but the [Atoms] section defines {natoms}")]
    UndeclaredAtom {
        line: usize,
        atom: usize,
        natoms: usize,
    },

    #[error("line {line}: {source}")]
    Shell {
        line: usize,
        #[source]
        source: BasisError,
    },
}

#[derive(Debug, Error)]
pub enum NexmdError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("time steps are counted from 1")]
    InvalidTimeStep,

    #[error("time step {step} requested, but {path} only holds {lines} lines")]
    StepOutOfRange {
        step: usize,
        lines: usize,
        path: String,
    },

    #[error("line {line}: {count} matrix values do not form a square matrix")]
    NotSquare { line: usize, count: usize },

    #[error("line {line}: cannot parse '{token}' as a number")]
    Parse { line: usize, token: String },

    #[error("no transition density for state {state} at time {time}")]
    TransitionNotFound { state: usize, time: f64 },
}

#[derive(Debug, Error)]
pub enum DensityError {
    #[error("{context}: expected a {expected:?} matrix, got {found:?}")]
    DimensionMismatch {
        context: &'static str,
        expected: (usize, usize),
        found: (usize, usize),
    },

    #[error("{n_occ} occupied orbitals requested, but only {n_mo} molecular orbitals exist")]
    TooManyOccupied { n_occ: usize, n_mo: usize },

    #[error("only the diagonal of the transition density is available; a full matrix is required")]
    DiagonalTransitionDensity,

    #[error("transition density has no occupied-virtual component to normalize")]
    ZeroProjection,

    #[error("gaussian overlap matrix is not positive definite")]
    SingularOverlap,
}

#[derive(Debug, Error)]
pub enum MatrixIoError {
    #[error("failed to access {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("line {line}: cannot parse '{token}' as a number")]
    Parse { line: usize, token: String },

    #[error("line {line}: expected {expected} columns, found {found}")]
    Ragged {
        line: usize,
        expected: usize,
        found: usize,
    },

    #[error("{0} holds no matrix rows")]
    Empty(String),
}
