//! Configuration management for overlap and density runs
//!
//! YAML configuration structures, defaults, and merging with the
//! command-line overrides.

mod args;

pub use args::Args;

use crate::nexmd::TdmLayout;
use basis::overlap::{OverlapMethod, DEFAULT_QUADRATURE_POINTS};
use basis::sto::{AngularType, StoRegistry};
use basis::BasisError;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Main configuration structure
#[derive(Debug, Default, Deserialize, Serialize)]
pub struct Config {
    /// Molden file with geometry and Gaussian basis
    pub molden: Option<String>,
    /// Directory receiving the matrix files
    pub output_dir: Option<String>,
    #[serde(default)]
    pub overlap: OverlapParams,
    pub density: Option<DensityParams>,
    /// Per-element replacement of the AM1 Slater exponents
    pub sto_parameters: Option<BTreeMap<String, Vec<StoParameter>>>,
}

#[derive(Debug, Deserialize, Serialize)]
pub struct OverlapParams {
    pub method: Option<OverlapMethod>,
    pub quadrature_points: Option<usize>,
    /// rescale every molden shell to unit norm before use
    pub renormalize: Option<bool>,
}

impl Default for OverlapParams {
    fn default() -> Self {
        OverlapParams {
            method: Some(OverlapMethod::Quadrature),
            quadrature_points: Some(DEFAULT_QUADRATURE_POINTS),
            renormalize: Some(false),
        }
    }
}

impl OverlapParams {
    /// Apply default values to any missing parameters
    pub fn with_defaults(mut self) -> Self {
        let defaults = Self::default();
        if self.method.is_none() {
            self.method = defaults.method;
        }
        if self.quadrature_points.is_none() {
            self.quadrature_points = defaults.quadrature_points;
        }
        if self.renormalize.is_none() {
            self.renormalize = defaults.renormalize;
        }
        self
    }
}

/// NEXMD density parameters
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct DensityParams {
    pub enabled: Option<bool>,
    /// `vhf.out`
    pub mo_file: Option<String>,
    /// `transition-densities.out`
    pub tdm_file: Option<String>,
    /// line of `vhf.out`, counted from 1
    pub time_step: Option<usize>,
    pub state: Option<usize>,
    /// time of the transition density; defaults to the time of the MO line
    pub tdm_time: Option<f64>,
    pub tdm_layout: Option<TdmLayout>,
    /// occupied orbitals; defaults to (valence electrons - charge) / 2
    pub n_occ: Option<usize>,
    pub charge: Option<i32>,
    pub normalize: Option<bool>,
    pub project_to_gto: Option<bool>,
}

impl Default for DensityParams {
    fn default() -> Self {
        DensityParams {
            enabled: Some(true),
            mo_file: Some("vhf.out".to_string()),
            tdm_file: Some("transition-densities.out".to_string()),
            time_step: Some(1),
            state: Some(1),
            tdm_time: None,
            tdm_layout: Some(TdmLayout::Full),
            n_occ: None,
            charge: Some(0),
            normalize: Some(true),
            project_to_gto: Some(true),
        }
    }
}

impl DensityParams {
    /// Apply default values to any missing parameters
    pub fn with_defaults(mut self) -> Self {
        let defaults = Self::default();
        if self.enabled.is_none() {
            self.enabled = defaults.enabled;
        }
        if self.mo_file.is_none() {
            self.mo_file = defaults.mo_file;
        }
        if self.tdm_file.is_none() {
            self.tdm_file = defaults.tdm_file;
        }
        if self.time_step.is_none() {
            self.time_step = defaults.time_step;
        }
        if self.state.is_none() {
            self.state = defaults.state;
        }
        if self.tdm_layout.is_none() {
            self.tdm_layout = defaults.tdm_layout;
        }
        if self.charge.is_none() {
            self.charge = defaults.charge;
        }
        if self.normalize.is_none() {
            self.normalize = defaults.normalize;
        }
        if self.project_to_gto.is_none() {
            self.project_to_gto = defaults.project_to_gto;
        }
        self
    }
}

/// One Slater orbital in `sto_parameters`
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct StoParameter {
    pub n: i32,
    pub l: String,
    pub zeta: f64,
    pub label: Option<String>,
}

impl Config {
    /// Apply defaults to all configuration sections
    pub fn with_defaults(mut self) -> Self {
        self.overlap = self.overlap.with_defaults();
        if let Some(density) = self.density.take() {
            self.density = Some(density.with_defaults());
        }
        if self.output_dir.is_none() {
            self.output_dir = Some(".".to_string());
        }
        self
    }

    pub fn is_density_enabled(&self) -> bool {
        self.density
            .as_ref()
            .and_then(|d| d.enabled)
            .unwrap_or(false)
    }

    /// AM1 registry with the configured elements replaced.
    pub fn sto_registry(&self) -> Result<StoRegistry, BasisError> {
        let mut registry = StoRegistry::am1();
        if let Some(overrides) = &self.sto_parameters {
            for (symbol, orbitals) in overrides {
                let parsed = orbitals
                    .iter()
                    .map(|o| -> Result<(i32, AngularType, f64, String), BasisError> {
                        let l: AngularType = o.l.parse()?;
                        let label = o
                            .label
                            .clone()
                            .unwrap_or_else(|| format!("{}{}", o.n, l));
                        Ok((o.n, l, o.zeta, label))
                    })
                    .collect::<Result<Vec<_>, BasisError>>()?;
                let borrowed: Vec<(i32, AngularType, f64, &str)> = parsed
                    .iter()
                    .map(|(n, l, zeta, label)| (*n, *l, *zeta, label.as_str()))
                    .collect();
                registry.register_element(symbol, &borrowed)?;
            }
        }
        Ok(registry)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_fill_missing_fields() {
        let yaml = "molden: water.molden\ndensity:\n  state: 2\n";
        let config = serde_yml::from_str::<Config>(yaml).unwrap().with_defaults();
        assert_eq!(config.molden.as_deref(), Some("water.molden"));
        assert_eq!(config.overlap.method, Some(OverlapMethod::Quadrature));
        assert_eq!(config.overlap.quadrature_points, Some(128));
        assert_eq!(config.overlap.renormalize, Some(false));
        assert_eq!(config.output_dir.as_deref(), Some("."));

        let density = config.density.as_ref().unwrap();
        assert_eq!(density.state, Some(2));
        assert_eq!(density.time_step, Some(1));
        assert_eq!(density.tdm_layout, Some(TdmLayout::Full));
        assert_eq!(density.n_occ, None);
        assert!(config.is_density_enabled());
    }

    #[test]
    fn test_overlap_section_parsing() {
        let yaml = "overlap:\n  method: contracted\n  quadrature_points: 48\n  renormalize: true\ndensity:\n  enabled: false\n  tdm_layout: diagonal\n";
        let config = serde_yml::from_str::<Config>(yaml).unwrap().with_defaults();
        assert_eq!(config.overlap.method, Some(OverlapMethod::Contracted));
        assert_eq!(config.overlap.quadrature_points, Some(48));
        assert_eq!(config.overlap.renormalize, Some(true));
        assert_eq!(
            config.density.as_ref().unwrap().tdm_layout,
            Some(TdmLayout::Diagonal)
        );
        assert!(!config.is_density_enabled());
    }

    #[test]
    fn test_sto_parameter_override() {
        let yaml = "sto_parameters:\n  H:\n    - { n: 1, l: s, zeta: 1.3 }\n  Si:\n    - { n: 3, l: s, zeta: 1.6, label: 3s_val }\n    - { n: 3, l: p, zeta: 1.3 }\n";
        let config = serde_yml::from_str::<Config>(yaml).unwrap().with_defaults();
        let registry = config.sto_registry().unwrap();

        let h = registry.valence_orbitals("H").unwrap();
        assert!((h[&AngularType::S].zeta - 1.3).abs() < 1e-15);
        let si = registry.valence_orbitals("Si").unwrap();
        assert_eq!(si[&AngularType::S].label, "3s_val");
        assert_eq!(si[&AngularType::P].label, "3p");
        // untouched elements keep AM1
        let c = registry.valence_orbitals("C").unwrap();
        assert!((c[&AngularType::P].zeta - 1.685116).abs() < 1e-12);
    }

    #[test]
    fn test_sto_parameter_override_rejects_d() {
        let yaml = "sto_parameters:\n  Fe:\n    - { n: 3, l: d, zeta: 2.0 }\n";
        let config = serde_yml::from_str::<Config>(yaml).unwrap();
        assert!(matches!(
            config.sto_registry(),
            Err(BasisError::UnsupportedAngularMomentum(_))
        ));
    }
}
