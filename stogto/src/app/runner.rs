#![allow(non_snake_case)]

use crate::config::{Args, Config};
use crate::density::{
    difference_density, ground_state_density, particle_hole, project_to_gto,
    transition_charges,
};
use crate::io::{save_matrix, write_labelled_matrix};
use crate::molden::Molecule;
use crate::nexmd::{read_mo_coefficients, read_transition_density, TdmLayout, TransitionDensity};
use crate::valence::{build_gto_overlap_matrix, build_valence_overlap_matrix, ValenceOverlap};
use basis::overlap::OverlapMethod;
use basis::sto::StoRegistry;
use color_eyre::eyre::{eyre, Result, WrapErr};
use nalgebra::{DMatrix, DVector};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

pub const OVERLAP_FILE: &str = "overlap_sto_gto.txt";
pub const OVERLAP_TABLE_FILE: &str = "overlap_sto_gto_table.txt";
pub const GTO_OVERLAP_FILE: &str = "overlap_gto.txt";
pub const GROUND_DENSITY_FILE: &str = "density_ground.txt";
pub const EXCITED_DENSITY_FILE: &str = "density_excited.txt";
pub const DIFFERENCE_DENSITY_FILE: &str = "density_difference.txt";
pub const TRANSITION_CHARGES_FILE: &str = "transition_charges.txt";
pub const GROUND_DENSITY_GTO_FILE: &str = "density_ground_gto.txt";
pub const EXCITED_DENSITY_GTO_FILE: &str = "density_excited_gto.txt";

/// Everything a run needs, after command-line overrides are applied.
#[derive(Debug, Clone)]
pub struct RunSettings {
    pub molden: PathBuf,
    pub output_dir: PathBuf,
    pub method: OverlapMethod,
    pub quadrature_points: usize,
    pub renormalize: bool,
    pub density: Option<DensitySettings>,
}

#[derive(Debug, Clone)]
pub struct DensitySettings {
    pub mo_file: PathBuf,
    pub tdm_file: PathBuf,
    pub time_step: usize,
    pub state: usize,
    pub tdm_time: Option<f64>,
    pub layout: TdmLayout,
    pub n_occ: Option<usize>,
    pub charge: i32,
    pub normalize: bool,
    pub project_to_gto: bool,
}

impl RunSettings {
    pub fn resolve(args: &Args, config: &Config) -> Result<Self> {
        let molden = args
            .molden
            .clone()
            .or_else(|| config.molden.clone())
            .ok_or_else(|| eyre!("No molden file given (config `molden` or --molden)"))?;
        let output_dir = args
            .output_dir
            .clone()
            .or_else(|| config.output_dir.clone())
            .unwrap_or_else(|| ".".to_string());
        let method = args
            .method
            .or(config.overlap.method)
            .unwrap_or_default();
        let quadrature_points = args
            .quadrature_points
            .or(config.overlap.quadrature_points)
            .unwrap_or(basis::overlap::DEFAULT_QUADRATURE_POINTS);
        let renormalize = config.overlap.renormalize.unwrap_or(false);

        let density = match &config.density {
            Some(params) if config.is_density_enabled() && !args.skip_density => {
                let params = params.clone().with_defaults();
                Some(DensitySettings {
                    mo_file: PathBuf::from(params.mo_file.unwrap_or_default()),
                    tdm_file: PathBuf::from(params.tdm_file.unwrap_or_default()),
                    time_step: args.time_step.or(params.time_step).unwrap_or(1),
                    state: args.state.or(params.state).unwrap_or(1),
                    tdm_time: params.tdm_time,
                    layout: params.tdm_layout.unwrap_or_default(),
                    n_occ: args.n_occ.or(params.n_occ),
                    charge: params.charge.unwrap_or(0),
                    normalize: params.normalize.unwrap_or(true),
                    project_to_gto: params.project_to_gto.unwrap_or(true),
                })
            }
            _ => None,
        };

        Ok(RunSettings {
            molden: PathBuf::from(molden),
            output_dir: PathBuf::from(output_dir),
            method,
            quadrature_points,
            renormalize,
            density,
        })
    }
}

#[derive(Debug, Clone)]
pub struct DensityOutput {
    pub time: f64,
    pub n_occ: usize,
    pub ground: DMatrix<f64>,
    pub transition_charges: DVector<f64>,
    pub excited: Option<DMatrix<f64>>,
    pub difference: Option<DMatrix<f64>>,
    pub ground_gto: Option<DMatrix<f64>>,
    pub excited_gto: Option<DMatrix<f64>>,
}

#[derive(Debug, Clone)]
pub struct RunOutput {
    pub molecule: Molecule,
    pub overlap: ValenceOverlap,
    pub gto_overlap: DMatrix<f64>,
    pub density: Option<DensityOutput>,
}

/// Overlap matrices for the molecule in the molden file.
pub fn run_overlap(
    settings: &RunSettings,
    registry: &StoRegistry,
) -> Result<(Molecule, ValenceOverlap, DMatrix<f64>)> {
    info!("Reading molden file: {}", settings.molden.display());
    let mut molecule = Molecule::from_file(&settings.molden)
        .wrap_err_with(|| format!("Unable to load molden file: {}", settings.molden.display()))?;
    if settings.renormalize {
        info!("Renormalizing molden shells to unit self-overlap");
        molecule = molecule
            .renormalized()
            .wrap_err("Failed to renormalize the molden shells")?;
    }

    let overlap = build_valence_overlap_matrix(
        &molecule,
        registry,
        settings.method,
        settings.quadrature_points,
    )
    .wrap_err("Failed to build the STO-GTO overlap matrix")?;
    let gto_overlap = build_gto_overlap_matrix(&molecule, &overlap.cols)
        .wrap_err("Failed to build the gaussian overlap matrix")?;

    Ok((molecule, overlap, gto_overlap))
}

fn default_occupation(molecule: &Molecule, charge: i32) -> Result<usize> {
    let electrons = molecule.valence_electrons() as i64 - charge as i64;
    if electrons < 0 || electrons % 2 != 0 {
        return Err(eyre!(
            "{} valence electrons at charge {} do not form a closed shell; set `n_occ`",
            molecule.valence_electrons(),
            charge
        ));
    }
    Ok((electrons / 2) as usize)
}

/// Densities from the NEXMD files, optionally projected into the gaussian
/// valence basis.
pub fn run_density(
    settings: &DensitySettings,
    molecule: &Molecule,
    overlap: &ValenceOverlap,
    gto_overlap: &DMatrix<f64>,
) -> Result<DensityOutput> {
    let snapshot = read_mo_coefficients(&settings.mo_file, settings.time_step).wrap_err_with(|| {
        format!(
            "Unable to read MO coefficients from {}",
            settings.mo_file.display()
        )
    })?;
    let n_occ = match settings.n_occ {
        Some(n) => n,
        None => default_occupation(molecule, settings.charge)?,
    };
    info!(
        "MO coefficients at t = {}: {} AOs, {} occupied orbitals",
        snapshot.time,
        snapshot.coefficients.nrows(),
        n_occ
    );
    if snapshot.coefficients.nrows() != overlap.rows.len() {
        warn!(
            "{} AOs in {} but {} Slater valence functions",
            snapshot.coefficients.nrows(),
            settings.mo_file.display(),
            overlap.rows.len()
        );
    }

    let ground = ground_state_density(&snapshot.coefficients, n_occ)?;

    let tdm_time = settings.tdm_time.unwrap_or(snapshot.time);
    let tdm = read_transition_density(&settings.tdm_file, settings.state, tdm_time, settings.layout)
        .wrap_err_with(|| {
            format!(
                "Unable to read the transition density from {}",
                settings.tdm_file.display()
            )
        })?;
    let charges = transition_charges(&tdm);

    let (excited, difference) = match &tdm {
        TransitionDensity::Full(T) => {
            let X = particle_hole(T, &snapshot.coefficients, n_occ, settings.normalize)?;
            let difference = difference_density(&X);
            (Some(&ground + &difference), Some(difference))
        }
        TransitionDensity::Diagonal(_) => {
            warn!("Diagonal transition density: skipping the excited-state density");
            (None, None)
        }
    };

    let (ground_gto, excited_gto) = if settings.project_to_gto {
        let ground_gto = project_to_gto(&ground, &overlap.matrix, gto_overlap)
            .wrap_err("Failed to project the ground-state density")?;
        let excited_gto = excited
            .as_ref()
            .map(|p| project_to_gto(p, &overlap.matrix, gto_overlap))
            .transpose()
            .wrap_err("Failed to project the excited-state density")?;
        (Some(ground_gto), excited_gto)
    } else {
        (None, None)
    };

    Ok(DensityOutput {
        time: snapshot.time,
        n_occ,
        ground,
        transition_charges: charges,
        excited,
        difference,
        ground_gto,
        excited_gto,
    })
}

fn save(dir: &Path, name: &str, matrix: &DMatrix<f64>) -> Result<()> {
    let path = dir.join(name);
    save_matrix(&path, matrix).wrap_err_with(|| format!("Failed to write {}", path.display()))?;
    info!("Saved {}", path.display());
    Ok(())
}

pub fn write_outputs(dir: &Path, output: &RunOutput) -> Result<()> {
    fs::create_dir_all(dir)
        .wrap_err_with(|| format!("Unable to create output directory: {}", dir.display()))?;

    save(dir, OVERLAP_FILE, &output.overlap.matrix)?;
    let table = dir.join(OVERLAP_TABLE_FILE);
    write_labelled_matrix(
        &table,
        &output.overlap.matrix,
        &output.overlap.row_labels(),
        &output.overlap.col_labels(),
    )
    .wrap_err_with(|| format!("Failed to write {}", table.display()))?;
    save(dir, GTO_OVERLAP_FILE, &output.gto_overlap)?;

    if let Some(density) = &output.density {
        save(dir, GROUND_DENSITY_FILE, &density.ground)?;
        let charges = DMatrix::from_column_slice(
            density.transition_charges.len(),
            1,
            density.transition_charges.as_slice(),
        );
        save(dir, TRANSITION_CHARGES_FILE, &charges)?;

        let optional = [
            (EXCITED_DENSITY_FILE, &density.excited),
            (DIFFERENCE_DENSITY_FILE, &density.difference),
            (GROUND_DENSITY_GTO_FILE, &density.ground_gto),
            (EXCITED_DENSITY_GTO_FILE, &density.excited_gto),
        ];
        for (name, matrix) in optional {
            if let Some(matrix) = matrix {
                save(dir, name, matrix)?;
            }
        }
    }
    Ok(())
}

/// Full run: overlaps, densities when configured, files in the output
/// directory.
pub fn run_pipeline(settings: &RunSettings, registry: &StoRegistry) -> Result<RunOutput> {
    let (molecule, overlap, gto_overlap) = run_overlap(settings, registry)?;

    let density = match &settings.density {
        Some(density_settings) => Some(run_density(
            density_settings,
            &molecule,
            &overlap,
            &gto_overlap,
        )?),
        None => None,
    };

    let output = RunOutput {
        molecule,
        overlap,
        gto_overlap,
        density,
    };
    write_outputs(&settings.output_dir, &output)?;
    Ok(output)
}
