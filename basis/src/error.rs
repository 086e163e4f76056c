use crate::sto::AngularType;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum BasisError {
    #[error("no STO parameters registered for element '{0}'")]
    UnknownElement(String),

    #[error("unsupported angular momentum '{0}': only s and p orbitals are supported")]
    UnsupportedAngularMomentum(String),

    #[error("unsupported shell type '{0}': only s, p and sp shells are supported")]
    UnsupportedShell(String),

    #[error("an axis (x/y/z) is required for the p function of a {0} overlap")]
    MissingAxis(&'static str),

    #[error("no {l} Slater orbital with principal quantum number n={n}")]
    UnsupportedQuantumNumber { n: i32, l: AngularType },

    #[error("Slater exponent must be positive, got {zeta} for {label}")]
    InvalidExponent { zeta: f64, label: String },

    #[error("quadrature order must be at least 1, got {0}")]
    InvalidQuadrature(usize),
}
