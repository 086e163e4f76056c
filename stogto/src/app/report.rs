use super::runner::{DensityOutput, RunOutput};
use basis::overlap::OverlapMethod;
use tracing::info;

pub fn report_overlap_summary(output: &RunOutput, method: OverlapMethod, quadrature_points: usize) {
    info!("\nMolecule:");
    for (idx, atom) in output.molecule.atoms.iter().enumerate() {
        info!(
            "  Atom {:>2} {:>2} ({}): [{:+.6}, {:+.6}, {:+.6}] bohr",
            idx + 1,
            atom.element,
            atom.label,
            atom.coords.x,
            atom.coords.y,
            atom.coords.z
        );
    }

    match method {
        OverlapMethod::Quadrature => info!(
            "\nSTO-GTO valence overlap ({} Gauss-Laguerre points):",
            quadrature_points
        ),
        OverlapMethod::Contracted => info!("\nSTO-GTO valence overlap (STO-3G contraction):"),
    }
    for line in output.overlap.table().lines() {
        info!("{}", line);
    }

    let diagonal = output.gto_overlap.diagonal();
    let worst = diagonal
        .iter()
        .map(|d| (d - 1.0).abs())
        .fold(0.0_f64, f64::max);
    info!(
        "\nGaussian overlap: {}x{}, max |S_ii - 1| = {:.2e}",
        output.gto_overlap.nrows(),
        output.gto_overlap.ncols(),
        worst
    );

    if let Some(density) = &output.density {
        report_density_summary(density);
    }
}

fn report_density_summary(density: &DensityOutput) {
    info!("\nDensities at t = {} ({} occupied orbitals):", density.time, density.n_occ);
    info!("  Tr P_gs  = {:.8}", density.ground.trace());
    if let Some(excited) = &density.excited {
        info!("  Tr P_exc = {:.8}", excited.trace());
    }
    if let Some(difference) = &density.difference {
        info!("  |dP|     = {:.8}", difference.norm());
    }
    info!(
        "  Sum of transition charges = {:+.8}",
        density.transition_charges.sum()
    );
    if let Some(ground_gto) = &density.ground_gto {
        info!("  Tr P_gs (Gaussian basis)  = {:.8}", ground_gto.trace());
    }
    if let Some(excited_gto) = &density.excited_gto {
        info!("  Tr P_exc (Gaussian basis) = {:.8}", excited_gto.trace());
    }
}
