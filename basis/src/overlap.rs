//! Overlap integrals between Slater orbitals and contracted gaussian shells.
//!
//! The Slater radial factor is written as a Laplace-type superposition of
//! gaussians,
//!
//! r^{n-1} e^{-ζr} = (2^{-n}/√π) (ζ²/4)^{(1-n)/2} ∫_0^∞ e^{-t} t^{(n-3)/2} H_n(√t) e^{-u r²} dt,
//!
//! with u = ζ²/(4t). Each gaussian–gaussian overlap is closed form, leaving a
//! one dimensional integral that is evaluated by Gauss-Laguerre quadrature.
//! With B = α + u and μ = αu/B the kernel of every s/p case is
//!
//! (ζ²/4)^{a+1} t^{-(a+2)} B^{-b} H_m(√t) e^{-μR²}
//!
//! where R = A - B is the Slater centre minus the gaussian centre.
#![allow(non_snake_case)]

use crate::basis::Basis;
use crate::cgto::Shell;
use crate::error::BasisError;
use crate::gto::{Axis, GTO};
use crate::helper::{hermite_phys, LaguerreRule};
use crate::sto::{AngularType, STOOrbital, N_p, N_s, N_sto_p, N_sto_s};
use itertools::iproduct;
use nalgebra::Vector3;
use serde::{Deserialize, Serialize};
use std::f64::consts::PI;
use std::fmt;
use std::str::FromStr;

pub const DEFAULT_QUADRATURE_POINTS: usize = 128;

fn mu_of_t(zeta: f64, alpha: f64, t: f64) -> f64 {
    (alpha * zeta * zeta) / (zeta * zeta + 4.0 * alpha * t)
}

fn B_of_t(zeta: f64, alpha: f64, t: f64) -> f64 {
    alpha + (zeta * zeta) / (4.0 * t)
}

/// Common kernel without the angular factor.
fn kernel(t: f64, zeta: f64, alpha: f64, a: f64, b: f64, m: i32, R: f64) -> f64 {
    let hm = hermite_phys(m, t.sqrt());
    let pref = (zeta * zeta / 4.0).powf(a + 1.0);
    let pow_t = t.powf(-(a + 2.0));
    let b_fac = B_of_t(zeta, alpha, t).powf(-b);
    let expo = (-mu_of_t(zeta, alpha, t) * R * R).exp();
    pref * pow_t * b_fac * hm * expo
}

pub fn overlap_ss_primitive(n: i32, zeta: f64, alpha: f64, R: f64, rule: &LaguerreRule) -> f64 {
    let a = -0.5 - 0.5 * n as f64;
    let b = 1.5;
    let m = n;
    let C = N_sto_s(n, zeta) * N_s(alpha) * PI * 2.0_f64.powi(-n);

    C * rule.integrate(|t| kernel(t, zeta, alpha, a, b, m, R))
}

pub fn overlap_sp_primitive(
    n: i32,
    zeta: f64,
    alpha: f64,
    Rk: f64,
    R: f64,
    rule: &LaguerreRule,
) -> f64 {
    let a = 0.5 - 0.5 * n as f64;
    let b = 2.5;
    let m = n;
    let C = N_sto_s(n, zeta) * N_p(alpha) * PI * 2.0_f64.powi(-n) * Rk;

    C * rule.integrate(|t| kernel(t, zeta, alpha, a, b, m, R))
}

pub fn overlap_ps_primitive(
    n: i32,
    zeta: f64,
    alpha: f64,
    Rk: f64,
    R: f64,
    rule: &LaguerreRule,
) -> f64 {
    let a = -0.5 * n as f64;
    let b = 2.5;
    let m = n - 1;
    let C = -N_sto_p(n, zeta) * N_s(alpha) * PI * 2.0_f64.powi(-(n - 1)) * alpha * Rk;

    C * rule.integrate(|t| kernel(t, zeta, alpha, a, b, m, R))
}

pub fn overlap_pp_primitive(
    n: i32,
    zeta: f64,
    alpha: f64,
    Rk: f64,
    Rl: f64,
    delta_kl: f64,
    R: f64,
    rule: &LaguerreRule,
) -> f64 {
    let a = -0.5 * n as f64;
    let b = 1.5;
    let m = n - 1;
    let C = N_sto_p(n, zeta) * N_p(alpha) * PI * 2.0_f64.powi(-(n - 1));

    C * rule.integrate(|t| {
        // A_kl(t) = -(4 α ζ² t)/(4 α t + ζ²)² Rk Rl + (2 t)/(4 α t + ζ²) δ_kl
        let denom = 4.0 * alpha * t + zeta * zeta;
        let shift = -(4.0 * alpha * zeta * zeta * t) / (denom * denom) * (Rk * Rl);
        let delta_term = (2.0 * t / denom) * delta_kl;
        kernel(t, zeta, alpha, a, b, m, R) * (shift + delta_term)
    })
}

/// How an STO–GTO overlap is evaluated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OverlapMethod {
    /// Gauss-Laguerre quadrature of the exact Slater function.
    #[default]
    Quadrature,
    /// Slater function replaced by its fixed STO-3G expansion.
    Contracted,
}

impl FromStr for OverlapMethod {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "quadrature" | "laguerre" => Ok(OverlapMethod::Quadrature),
            "contracted" | "sto-3g" | "sto3g" => Ok(OverlapMethod::Contracted),
            other => Err(format!(
                "unknown overlap method '{}': use quadrature or contracted",
                other
            )),
        }
    }
}

impl fmt::Display for OverlapMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OverlapMethod::Quadrature => write!(f, "quadrature"),
            OverlapMethod::Contracted => write!(f, "contracted"),
        }
    }
}

/// Contracted STO–GTO overlap between one Slater function on atom A and one
/// s or p component of a gaussian shell on atom B.
///
/// # Arguments
///
/// * `sto` - Slater orbital (n, l, ζ)
/// * `shell` - gaussian shell; only primitives with a non-zero coefficient of
///   type `l_gto` contribute
/// * `l_gto` - which angular part of the shell to use (an `sp` shell carries both)
/// * `A`, `B` - Slater and gaussian centres (Bohr)
/// * `axis_sto`, `axis_gto` - Cartesian component of p functions
pub fn overlap_sto_gto(
    sto: &STOOrbital,
    shell: &Shell,
    l_gto: AngularType,
    A: &Vector3<f64>,
    B: &Vector3<f64>,
    axis_sto: Option<Axis>,
    axis_gto: Option<Axis>,
    rule: &LaguerreRule,
) -> Result<f64, BasisError> {
    if !shell.has(l_gto) {
        return Err(BasisError::UnsupportedShell(format!(
            "{} component of a {} shell",
            l_gto, shell.kind
        )));
    }

    let Rv = A - B;
    let R = Rv.norm();
    let (n, zeta) = (sto.n, sto.zeta);

    let mut total = 0.0;
    for (i, prim) in shell.primitives.iter().enumerate() {
        let coeff = shell.coefficient(i, l_gto);
        if coeff == 0.0 {
            continue;
        }
        let alpha = prim.alpha;

        let value = match (sto.l, l_gto) {
            (AngularType::S, AngularType::S) => overlap_ss_primitive(n, zeta, alpha, R, rule),
            (AngularType::S, AngularType::P) => {
                let axis = axis_gto.ok_or(BasisError::MissingAxis("s–p"))?;
                overlap_sp_primitive(n, zeta, alpha, axis.component(&Rv), R, rule)
            }
            (AngularType::P, AngularType::S) => {
                let axis = axis_sto.ok_or(BasisError::MissingAxis("p–s"))?;
                overlap_ps_primitive(n, zeta, alpha, axis.component(&Rv), R, rule)
            }
            (AngularType::P, AngularType::P) => {
                let (k, l) = match (axis_sto, axis_gto) {
                    (Some(k), Some(l)) => (k, l),
                    _ => return Err(BasisError::MissingAxis("p–p")),
                };
                let delta = if k == l { 1.0 } else { 0.0 };
                overlap_pp_primitive(
                    n,
                    zeta,
                    alpha,
                    k.component(&Rv),
                    l.component(&Rv),
                    delta,
                    R,
                    rule,
                )
            }
        };
        total += coeff * value;
    }

    Ok(total)
}

// STO-3G least-squares fits for ζ = 1 (Hehre, Stewart and Pople, J. Chem. Phys.
// 51, 2657 (1969)); exponents scale with ζ².
const STO3G_1S: [(f64, f64); 3] = [
    (2.227660584, 0.1543289673),
    (0.4057711562, 0.5353281423),
    (0.1098175104, 0.4446345422),
];
const STO3G_2SP_EXPONENTS: [f64; 3] = [0.994202729, 0.231031333, 0.0751386];
const STO3G_2S_COEFFS: [f64; 3] = [-0.09996722919, 0.3995128261, 0.7001154689];
const STO3G_2P_COEFFS: [f64; 3] = [0.1559162750, 0.6076837186, 0.3919573931];

/// Fixed STO-3G expansion of a Slater orbital: (alpha, coefficient) pairs
/// for normalized primitives.
pub fn sto3g_expansion(sto: &STOOrbital) -> Result<Vec<(f64, f64)>, BasisError> {
    let z2 = sto.zeta * sto.zeta;
    match (sto.n, sto.l) {
        (1, AngularType::S) => Ok(STO3G_1S.iter().map(|&(a, d)| (a * z2, d)).collect()),
        (2, AngularType::S) => Ok(STO3G_2SP_EXPONENTS
            .iter()
            .zip(STO3G_2S_COEFFS.iter())
            .map(|(&a, &d)| (a * z2, d))
            .collect()),
        (2, AngularType::P) => Ok(STO3G_2SP_EXPONENTS
            .iter()
            .zip(STO3G_2P_COEFFS.iter())
            .map(|(&a, &d)| (a * z2, d))
            .collect()),
        (n, l) => Err(BasisError::UnsupportedQuantumNumber { n, l }),
    }
}

/// Same quantity as [`overlap_sto_gto`] with the Slater orbital replaced by its
/// STO-3G expansion and every primitive pair evaluated with `GTO::Sab`.
pub fn overlap_sto_gto_contracted(
    sto: &STOOrbital,
    shell: &Shell,
    l_gto: AngularType,
    A: &Vector3<f64>,
    B: &Vector3<f64>,
    axis_sto: Option<Axis>,
    axis_gto: Option<Axis>,
) -> Result<f64, BasisError> {
    let axis_sto = match sto.l {
        AngularType::S => None,
        AngularType::P => Some(axis_sto.ok_or(BasisError::MissingAxis("Slater p"))?),
    };
    let expansion = sto3g_expansion(sto)?;
    let gaussian = shell.contracted(l_gto, axis_gto, *B)?;

    let total: f64 = iproduct!(
        expansion.iter(),
        gaussian.primitives.iter().zip(gaussian.coefficients.iter())
    )
    .map(|(&(alpha, d), (gb, c))| d * c * GTO::Sab(&GTO::oriented(alpha, axis_sto, *A), gb))
    .sum();
    Ok(total)
}

/// Overlap evaluator that owns its quadrature rule, so a whole matrix build
/// computes the Laguerre nodes once.
#[derive(Debug, Clone)]
pub struct OverlapEngine {
    pub method: OverlapMethod,
    rule: LaguerreRule,
}

impl OverlapEngine {
    pub fn new(method: OverlapMethod, quad_n: usize) -> Result<Self, BasisError> {
        Ok(Self {
            method,
            rule: LaguerreRule::new(quad_n)?,
        })
    }

    pub fn quadrature_points(&self) -> usize {
        self.rule.order()
    }

    pub fn overlap(
        &self,
        sto: &STOOrbital,
        shell: &Shell,
        l_gto: AngularType,
        A: &Vector3<f64>,
        B: &Vector3<f64>,
        axis_sto: Option<Axis>,
        axis_gto: Option<Axis>,
    ) -> Result<f64, BasisError> {
        match self.method {
            OverlapMethod::Quadrature => {
                overlap_sto_gto(sto, shell, l_gto, A, B, axis_sto, axis_gto, &self.rule)
            }
            OverlapMethod::Contracted => {
                overlap_sto_gto_contracted(sto, shell, l_gto, A, B, axis_sto, axis_gto)
            }
        }
    }
}
