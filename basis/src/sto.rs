#![allow(non_snake_case)]
/* Slater-type orbitals (STO) and the AM1 valence exponent registry.

   Exponents follow Dewar, Zoebisch, Healy and Stewart,
   "AM1: A New General Purpose Quantum Mechanical Molecular Model",
   J. Am. Chem. Soc. 107, 3902 (1985); fluorine from Dewar and Zoebisch (1988).
*/

use crate::error::BasisError;
use crate::gto::Axis;
use crate::helper::factorial;
use nalgebra::Vector3;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::f64::consts::PI;
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum AngularType {
    S, // l = 0
    P, // l = 1
}

impl AngularType {
    pub fn l(&self) -> i32 {
        match self {
            AngularType::S => 0,
            AngularType::P => 1,
        }
    }
}

impl FromStr for AngularType {
    type Err = BasisError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "s" => Ok(AngularType::S),
            "p" => Ok(AngularType::P),
            other => Err(BasisError::UnsupportedAngularMomentum(other.to_string())),
        }
    }
}

impl fmt::Display for AngularType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AngularType::S => write!(f, "s"),
            AngularType::P => write!(f, "p"),
        }
    }
}

// s-type primitive GTO normalization
pub fn N_s(alpha: f64) -> f64 {
    (2.0 * alpha / PI).powf(0.75)
}

// p-type primitive GTO normalization (Cartesian)
pub fn N_p(alpha: f64) -> f64 {
    2.0_f64.sqrt() * (2.0 * alpha).powf(1.25) * PI.powf(-0.75)
}

fn radial_norm(n: i32, zeta: f64) -> f64 {
    ((2.0 * zeta).powi(2 * n + 1) / factorial(2 * n)).sqrt()
}

// STO s normalization, includes the real Y_00 = 1/sqrt(4 pi)
pub fn N_sto_s(n: i32, zeta: f64) -> f64 {
    radial_norm(n, zeta) / (4.0 * PI).sqrt()
}

// STO p normalization, Cartesian real harmonic sqrt(3 / 4 pi)
pub fn N_sto_p(n: i32, zeta: f64) -> f64 {
    radial_norm(n, zeta) * (3.0 / (4.0 * PI)).sqrt()
}

/// One Slater orbital with its label. Normalization is derived from
/// (n, l, zeta) when needed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct STOOrbital {
    pub n: i32,
    pub l: AngularType,
    pub zeta: f64,
    pub label: String,
}

impl STOOrbital {
    pub fn new(n: i32, l: AngularType, zeta: f64, label: &str) -> Result<Self, BasisError> {
        if !(zeta > 0.0) {
            return Err(BasisError::InvalidExponent {
                zeta,
                label: label.to_string(),
            });
        }
        if n < 1 || (l == AngularType::P && n < 2) {
            return Err(BasisError::UnsupportedQuantumNumber { n, l });
        }
        Ok(Self {
            n,
            l,
            zeta,
            label: label.to_string(),
        })
    }

    pub fn norm(&self) -> f64 {
        match self.l {
            AngularType::S => N_sto_s(self.n, self.zeta),
            AngularType::P => N_sto_p(self.n, self.zeta),
        }
    }
}

/// A Slater function placed in space, with its Cartesian axis for p.
#[derive(Debug, Clone)]
pub struct STO {
    pub orbital: STOOrbital,
    pub center: Vector3<f64>,
    pub axis: Option<Axis>,
}

impl STO {
    pub fn new(
        orbital: STOOrbital,
        center: Vector3<f64>,
        axis: Option<Axis>,
    ) -> Result<Self, BasisError> {
        if orbital.l == AngularType::P && axis.is_none() {
            return Err(BasisError::MissingAxis("Slater p"));
        }
        Ok(Self {
            orbital,
            center,
            axis,
        })
    }

    pub fn evaluate(&self, r: &Vector3<f64>) -> f64 {
        let d = r - self.center;
        let dist = d.norm();
        let n = self.orbital.n;
        let radial = (-self.orbital.zeta * dist).exp();
        match (self.orbital.l, self.axis) {
            (AngularType::S, _) => self.orbital.norm() * dist.powi(n - 1) * radial,
            (AngularType::P, Some(ax)) => {
                self.orbital.norm() * ax.component(&d) * dist.powi(n - 2) * radial
            }
            (AngularType::P, None) => 0.0,
        }
    }
}

/// STO parameters for one element: core and valence orbitals.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct STOElementParams {
    pub symbol: String,
    pub orbitals: Vec<STOOrbital>,
}

impl STOElementParams {
    pub fn new(symbol: &str) -> Self {
        Self {
            symbol: symbol.to_string(),
            orbitals: Vec::new(),
        }
    }

    pub fn add(&mut self, n: i32, l: AngularType, zeta: f64, label: &str) -> Result<(), BasisError> {
        self.orbitals.push(STOOrbital::new(n, l, zeta, label)?);
        Ok(())
    }

    /// Highest-n orbital for each angular type present.
    pub fn valence(&self) -> BTreeMap<AngularType, &STOOrbital> {
        let mut result: BTreeMap<AngularType, &STOOrbital> = BTreeMap::new();
        for orbital in &self.orbitals {
            match result.get(&orbital.l) {
                Some(best) if best.n >= orbital.n => {}
                _ => {
                    result.insert(orbital.l, orbital);
                }
            }
        }
        result
    }
}

/// AM1 valence orbitals: (n, l, zeta in Bohr^-1, label) per element.
pub const AM1_EXPONENTS: [(&str, &[(i32, AngularType, f64, &str)]); 5] = [
    ("H", &[(1, AngularType::S, 1.188078, "1s")]),
    (
        "C",
        &[
            (2, AngularType::S, 1.808665, "2s_val"),
            (2, AngularType::P, 1.685116, "2p_val"),
        ],
    ),
    (
        "N",
        &[
            (2, AngularType::S, 2.315410, "2s_val"),
            (2, AngularType::P, 2.157940, "2p_val"),
        ],
    ),
    (
        "O",
        &[
            (2, AngularType::S, 3.108032, "2s_val"),
            (2, AngularType::P, 2.524039, "2p_val"),
        ],
    ),
    (
        "F",
        &[
            (2, AngularType::S, 3.770082, "2s_val"),
            (2, AngularType::P, 2.494670, "2p_val"),
        ],
    ),
];

/// Element symbol -> Slater parameters.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StoRegistry {
    elements: BTreeMap<String, STOElementParams>,
}

impl StoRegistry {
    pub fn empty() -> Self {
        Self::default()
    }

    /// Registry preloaded with the AM1 valence exponents (Bohr^-1).
    pub fn am1() -> Self {
        let mut registry = Self::empty();
        for (symbol, orbitals) in AM1_EXPONENTS {
            registry
                .register_element(symbol, orbitals)
                .expect("AM1 table is valid");
        }
        registry
    }

    /// Bulk register (or replace) an element from (n, l, zeta, label) tuples.
    pub fn register_element(
        &mut self,
        symbol: &str,
        orbitals: &[(i32, AngularType, f64, &str)],
    ) -> Result<(), BasisError> {
        let mut params = STOElementParams::new(symbol);
        for &(n, l, zeta, label) in orbitals {
            params.add(n, l, zeta, label)?;
        }
        self.elements.insert(symbol.to_string(), params);
        Ok(())
    }

    /// Case-insensitive lookup: exact symbol first, then capitalized.
    pub fn get(&self, symbol: &str) -> Result<&STOElementParams, BasisError> {
        self.elements
            .get(symbol)
            .or_else(|| self.elements.get(&capitalize(symbol)))
            .ok_or_else(|| BasisError::UnknownElement(symbol.to_string()))
    }

    pub fn list_registered_elements(&self) -> Vec<String> {
        self.elements.keys().cloned().collect()
    }

    pub fn valence_orbitals(
        &self,
        symbol: &str,
    ) -> Result<BTreeMap<AngularType, &STOOrbital>, BasisError> {
        Ok(self.get(symbol)?.valence())
    }
}

fn capitalize(symbol: &str) -> String {
    let lower = symbol.to_lowercase();
    let mut chars = lower.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
        None => String::new(),
    }
}
