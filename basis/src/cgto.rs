/* Contracted gaussian type orbitals (CGTO) as they come out of a molden
   [GTO] block, built on the primitive gaussians in gto.rs.
*/
#![allow(non_snake_case)]

use crate::basis::Basis;
use crate::error::BasisError;
use crate::gto::{Axis, GTO};
use crate::sto::AngularType;
use itertools::iproduct;
use nalgebra::Vector3;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ShellKind {
    S,
    P,
    SP, // s and p share exponents, separate coefficient columns
}

impl ShellKind {
    pub fn carries(&self, l: AngularType) -> bool {
        matches!(
            (self, l),
            (ShellKind::S, AngularType::S)
                | (ShellKind::P, AngularType::P)
                | (ShellKind::SP, _)
        )
    }
}

impl FromStr for ShellKind {
    type Err = BasisError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "s" => Ok(ShellKind::S),
            "p" => Ok(ShellKind::P),
            "sp" => Ok(ShellKind::SP),
            other => Err(BasisError::UnsupportedShell(other.to_string())),
        }
    }
}

impl fmt::Display for ShellKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ShellKind::S => "s",
            ShellKind::P => "p",
            ShellKind::SP => "sp",
        };
        write!(f, "{}", s)
    }
}

/// One primitive exponent with its contraction coefficients. Coefficients
/// multiply normalized primitives.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Primitive {
    pub alpha: f64,
    pub coeff_s: Option<f64>,
    pub coeff_p: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Shell {
    pub kind: ShellKind,
    pub primitives: Vec<Primitive>,
}

impl Shell {
    pub fn new(kind: ShellKind) -> Self {
        Self {
            kind,
            primitives: Vec::new(),
        }
    }

    /// Build a single-kind shell from (alpha, coefficient) pairs.
    pub fn from_pairs(kind: ShellKind, pairs: &[(f64, f64)]) -> Self {
        let primitives = pairs
            .iter()
            .map(|&(alpha, c)| Primitive {
                alpha,
                coeff_s: (kind != ShellKind::P).then_some(c),
                coeff_p: (kind == ShellKind::P).then_some(c),
            })
            .collect();
        Self { kind, primitives }
    }

    pub fn has(&self, l: AngularType) -> bool {
        self.kind.carries(l)
    }

    /// Contraction coefficient of primitive `i` for angular type `l`; zero
    /// when the shell does not carry that type.
    pub fn coefficient(&self, i: usize, l: AngularType) -> f64 {
        let prim = &self.primitives[i];
        match l {
            AngularType::S => prim.coeff_s.unwrap_or(0.0),
            AngularType::P => prim.coeff_p.unwrap_or(0.0),
        }
    }

    pub fn average_alpha(&self) -> f64 {
        if self.primitives.is_empty() {
            return f64::INFINITY;
        }
        self.primitives.iter().map(|p| p.alpha).sum::<f64>() / self.primitives.len() as f64
    }

    /// Expand into normalized primitives for one angular component, placed
    /// at `center`. Zero coefficients are dropped.
    pub fn contracted(
        &self,
        l: AngularType,
        axis: Option<Axis>,
        center: Vector3<f64>,
    ) -> Result<ContractedGTO, BasisError> {
        if !self.has(l) {
            return Err(BasisError::UnsupportedShell(format!(
                "{} component of a {} shell",
                l, self.kind
            )));
        }
        let axis = match l {
            AngularType::S => None,
            AngularType::P => Some(axis.ok_or(BasisError::MissingAxis("gaussian p"))?),
        };

        let mut cgto = ContractedGTO {
            primitives: Vec::new(),
            coefficients: Vec::new(),
        };
        for (i, prim) in self.primitives.iter().enumerate() {
            let c = self.coefficient(i, l);
            if c == 0.0 {
                continue;
            }
            cgto.primitives.push(GTO::oriented(prim.alpha, axis, center));
            cgto.coefficients.push(c);
        }
        Ok(cgto)
    }

    /// <phi|phi> of the contracted function of type `l` (one Cartesian
    /// component for p; all three are equal).
    pub fn self_overlap(&self, l: AngularType) -> Result<f64, BasisError> {
        let axis = (l == AngularType::P).then_some(Axis::X);
        let cgto = self.contracted(l, axis, Vector3::zeros())?;
        Ok(ContractedGTO::Sab(&cgto, &cgto))
    }

    /// Copy with coefficients rescaled so every carried angular type has
    /// unit norm.
    pub fn renormalized(&self) -> Result<Shell, BasisError> {
        let mut shell = self.clone();
        for l in [AngularType::S, AngularType::P] {
            if !self.has(l) {
                continue;
            }
            let norm2 = self.self_overlap(l)?;
            if norm2 <= 0.0 {
                continue;
            }
            let scale = 1.0 / norm2.sqrt();
            for prim in shell.primitives.iter_mut() {
                let coeff = match l {
                    AngularType::S => &mut prim.coeff_s,
                    AngularType::P => &mut prim.coeff_p,
                };
                if let Some(c) = coeff.as_mut() {
                    *c *= scale;
                }
            }
        }
        Ok(shell)
    }
}

// need to consider reuse of primitive integrals, since s and p of an sp shell share exponents
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContractedGTO {
    pub primitives: Vec<GTO>,
    pub coefficients: Vec<f64>,
}

impl Basis for ContractedGTO {
    fn evaluate(&self, r: &Vector3<f64>) -> f64 {
        self.primitives
            .iter()
            .zip(self.coefficients.iter())
            .map(|(g, c)| c * g.evaluate(r))
            .sum()
    }

    fn Sab(a: &ContractedGTO, b: &ContractedGTO) -> f64 {
        iproduct!(
            a.primitives.iter().zip(a.coefficients.iter()),
            b.primitives.iter().zip(b.coefficients.iter())
        )
        .map(|((ga, ca), (gb, cb))| ca * cb * GTO::Sab(ga, gb))
        .sum()
    }
}
