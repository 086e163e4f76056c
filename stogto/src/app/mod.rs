mod report;
mod runner;

pub use runner::{
    run_density, run_overlap, run_pipeline, write_outputs, DensityOutput, DensitySettings,
    RunOutput, RunSettings, DIFFERENCE_DENSITY_FILE, EXCITED_DENSITY_FILE,
    EXCITED_DENSITY_GTO_FILE, GROUND_DENSITY_FILE, GROUND_DENSITY_GTO_FILE, GTO_OVERLAP_FILE,
    OVERLAP_FILE, OVERLAP_TABLE_FILE, TRANSITION_CHARGES_FILE,
};

use self::report::report_overlap_summary;
use crate::config::{Args, Config};
use crate::io::setup_output;
use clap::Parser;
use color_eyre::eyre::{Result, WrapErr};
use std::fs;
use std::path::Path;
use tracing::info;

pub struct StoGtoApplication {
    args: Args,
    config: Config,
}

impl StoGtoApplication {
    pub fn from_cli() -> Result<Self> {
        let args = Args::parse();
        let config = load_config(&args)?;
        Ok(Self { args, config })
    }

    pub fn run(self) -> Result<()> {
        setup_output(self.args.output.as_deref().map(Path::new), self.args.verbose)?;
        info!("Configuration loaded from: {}", self.args.config_file);

        let settings = RunSettings::resolve(&self.args, &self.config)?;
        let registry = self
            .config
            .sto_registry()
            .wrap_err("Invalid `sto_parameters` section")?;

        let output = run_pipeline(&settings, &registry)?;
        report_overlap_summary(&output, settings.method, settings.quadrature_points);
        info!("\nResults written to: {}", settings.output_dir.display());

        Ok(())
    }
}

fn load_config(args: &Args) -> Result<Config> {
    let config_content = fs::read_to_string(&args.config_file)
        .wrap_err_with(|| format!("Unable to read configuration file: {}", args.config_file))?;

    let config = serde_yml::from_str::<Config>(&config_content)
        .wrap_err("Failed to parse configuration file")?
        .with_defaults();

    Ok(config)
}
