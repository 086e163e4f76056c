//! Ground-state, excited-state and transition densities in the AO basis.
//!
//! The AO basis of NEXMD is orthonormal, so ρ = C_occ C_occᵀ is the
//! projector onto the occupied space and 1 − ρ onto the virtual space.
#![allow(non_snake_case)]

use crate::error::DensityError;
use crate::nexmd::TransitionDensity;
use nalgebra::{DMatrix, DVector};

fn expect_shape(
    context: &'static str,
    m: &DMatrix<f64>,
    expected: (usize, usize),
) -> Result<(), DensityError> {
    if m.shape() != expected {
        return Err(DensityError::DimensionMismatch {
            context,
            expected,
            found: m.shape(),
        });
    }
    Ok(())
}

fn occupied(C: &DMatrix<f64>, n_occ: usize) -> Result<DMatrix<f64>, DensityError> {
    if n_occ > C.ncols() {
        return Err(DensityError::TooManyOccupied {
            n_occ,
            n_mo: C.ncols(),
        });
    }
    Ok(C.columns(0, n_occ).into_owned())
}

/// ρ = C_occ C_occᵀ
pub fn occupied_projector(C: &DMatrix<f64>, n_occ: usize) -> Result<DMatrix<f64>, DensityError> {
    let occ = occupied(C, n_occ)?;
    Ok(&occ * occ.transpose())
}

/// P = 2 C_occ C_occᵀ for a closed shell.
pub fn ground_state_density(C: &DMatrix<f64>, n_occ: usize) -> Result<DMatrix<f64>, DensityError> {
    Ok(2.0 * occupied_projector(C, n_occ)?)
}

/// Occupied→virtual part of a transition density,
/// X = (1 − ρ) T ρ + [ρ T (1 − ρ)]ᵀ,
/// scaled to unit Frobenius norm when `normalize` is set.
pub fn particle_hole(
    T: &DMatrix<f64>,
    C: &DMatrix<f64>,
    n_occ: usize,
    normalize: bool,
) -> Result<DMatrix<f64>, DensityError> {
    let n = C.nrows();
    expect_shape("transition density", T, (n, n))?;

    let rho = occupied_projector(C, n_occ)?;
    let q = DMatrix::<f64>::identity(n, n) - &rho;
    let mut X = &q * T * &rho + (&rho * T * &q).transpose();

    if normalize {
        let norm = X.norm();
        if norm < 1e-12 {
            return Err(DensityError::ZeroProjection);
        }
        X /= norm;
    }
    Ok(X)
}

/// ΔP = X Xᵀ − Xᵀ X: electrons added to the virtual space minus holes left in
/// the occupied space. Traceless.
pub fn difference_density(X: &DMatrix<f64>) -> DMatrix<f64> {
    X * X.transpose() - X.transpose() * X
}

/// Excited-state density P_gs + ΔP. Needs the full transition density.
pub fn excited_state_density(
    C: &DMatrix<f64>,
    tdm: &TransitionDensity,
    n_occ: usize,
    normalize: bool,
) -> Result<DMatrix<f64>, DensityError> {
    let T = match tdm {
        TransitionDensity::Full(T) => T,
        TransitionDensity::Diagonal(_) => return Err(DensityError::DiagonalTransitionDensity),
    };
    let ground = ground_state_density(C, n_occ)?;
    let X = particle_hole(T, C, n_occ, normalize)?;
    Ok(ground + difference_density(&X))
}

/// Per-AO transition charges (the diagonal of the transition density).
pub fn transition_charges(tdm: &TransitionDensity) -> DVector<f64> {
    match tdm {
        TransitionDensity::Full(T) => T.diagonal(),
        TransitionDensity::Diagonal(d) => d.clone(),
    }
}

/// Represent a density given over the Slater functions in the Gaussian
/// basis: S_gg⁻¹ S_sgᵀ P S_sg S_gg⁻¹, with both inverses applied through
/// a Cholesky factorization of S_gg.
pub fn project_to_gto(
    P: &DMatrix<f64>,
    S_sg: &DMatrix<f64>,
    S_gg: &DMatrix<f64>,
) -> Result<DMatrix<f64>, DensityError> {
    let (n_sto, n_gto) = S_sg.shape();
    expect_shape("STO density", P, (n_sto, n_sto))?;
    expect_shape("gaussian overlap", S_gg, (n_gto, n_gto))?;

    let chol = S_gg
        .clone()
        .cholesky()
        .ok_or(DensityError::SingularOverlap)?;
    let M = S_sg.transpose() * P * S_sg;
    // S⁻¹ M S⁻¹ = (S⁻¹ (S⁻¹ M)ᵀ)ᵀ for symmetric S
    let left = chol.solve(&M);
    Ok(chol.solve(&left.transpose()).transpose())
}
