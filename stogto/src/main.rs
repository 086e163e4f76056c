//! STO–GTO overlap command-line interface
//!
//! Reads a YAML configuration, computes the valence overlap matrices and,
//! when configured, the NEXMD ground and excited state densities.

use color_eyre::eyre::Result;
use stogto::app::StoGtoApplication;

fn main() -> Result<()> {
    color_eyre::install()?;
    StoGtoApplication::from_cli()?.run()
}
