//! Command-line arguments

use basis::overlap::OverlapMethod;
use clap::Parser;

/// STO–GTO valence overlaps and NEXMD densities from a YAML configuration
#[derive(Parser, Debug, Default)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Path to the YAML configuration file
    #[arg(short, long, default_value = "config.yaml")]
    pub config_file: String,

    /// Log file (default stdout)
    #[arg(short, long)]
    pub output: Option<String>,

    /// Override the molden file
    #[arg(long)]
    pub molden: Option<String>,

    /// Overlap evaluation: quadrature or contracted (STO-3G)
    #[arg(long)]
    pub method: Option<OverlapMethod>,

    /// Override the number of Gauss-Laguerre points
    #[arg(long)]
    pub quadrature_points: Option<usize>,

    /// Override the directory for matrix files
    #[arg(long)]
    pub output_dir: Option<String>,

    /// Override the vhf.out line to read (from 1)
    #[arg(long)]
    pub time_step: Option<usize>,

    /// Override the excited state of the transition density
    #[arg(long)]
    pub state: Option<usize>,

    /// Override the number of occupied orbitals
    #[arg(long)]
    pub n_occ: Option<usize>,

    /// Skip the density part even when configured
    #[arg(long)]
    pub skip_density: bool,

    /// Debug level logging
    #[arg(short, long)]
    pub verbose: bool,
}
