//! Valence function lists and the STO–GTO overlap matrix.
//!
//! Rows are the Slater valence functions of every atom (highest n per
//! angular type from the registry), columns the Gaussian valence functions
//! picked from the molden shells: the most diffuse s-carrying shell and the
//! first p-carrying shell. p functions are expanded into x, y, z.
#![allow(non_snake_case)]

use crate::io::format_matrix;
use crate::molden::Molecule;
use basis::basis::Basis;
use basis::cgto::{ContractedGTO, Shell};
use basis::gto::Axis;
use basis::overlap::{OverlapEngine, OverlapMethod};
use basis::sto::{AngularType, STOOrbital, StoRegistry};
use basis::BasisError;
use itertools::iproduct;
use nalgebra::DMatrix;
use rayon::prelude::*;
use tracing::{debug, info};

/// One Slater row function.
#[derive(Debug, Clone, PartialEq)]
pub struct STOFn {
    pub atom_index: usize,
    pub element: String,
    pub orbital: STOOrbital,
    pub axis: Option<Axis>,
    pub label: String,
}

/// One Gaussian column function: a component of a molden shell.
#[derive(Debug, Clone, PartialEq)]
pub struct GTOFn {
    pub atom_index: usize,
    pub element: String,
    pub l: AngularType,
    pub shell_idx: usize,
    pub axis: Option<Axis>,
    pub label: String,
}

#[derive(Debug, Clone)]
pub struct ValenceOverlap {
    /// n_STO × n_GTO
    pub matrix: DMatrix<f64>,
    pub rows: Vec<STOFn>,
    pub cols: Vec<GTOFn>,
}

impl ValenceOverlap {
    pub fn row_labels(&self) -> Vec<String> {
        self.rows.iter().map(|r| r.label.clone()).collect()
    }

    pub fn col_labels(&self) -> Vec<String> {
        self.cols.iter().map(|c| c.label.clone()).collect()
    }

    pub fn table(&self) -> String {
        format_matrix(&self.matrix, &self.row_labels(), &self.col_labels(), 12)
    }
}

/// Index of the most diffuse (smallest mean exponent) shell carrying s
/// functions. `sp` shells count.
pub fn pick_valence_s_shell(shells: &[Shell]) -> Option<usize> {
    shells
        .iter()
        .enumerate()
        .filter(|(_, shell)| shell.has(AngularType::S))
        .min_by(|(_, a), (_, b)| a.average_alpha().total_cmp(&b.average_alpha()))
        .map(|(i, _)| i)
}

/// Index of the first shell carrying p functions.
pub fn pick_p_shell(shells: &[Shell]) -> Option<usize> {
    shells.iter().position(|shell| shell.has(AngularType::P))
}

pub fn build_valence_function_lists(
    mol: &Molecule,
    registry: &StoRegistry,
) -> Result<(Vec<STOFn>, Vec<GTOFn>), BasisError> {
    let mut sto_funcs = Vec::new();
    let mut gto_funcs = Vec::new();

    for (ai, atom) in mol.atoms.iter().enumerate() {
        let elem = atom.element.as_str();
        let tag = format!("{}{}", elem, ai + 1);

        for (l, orbital) in registry.valence_orbitals(elem)? {
            match l {
                AngularType::S => sto_funcs.push(STOFn {
                    atom_index: ai,
                    element: elem.to_string(),
                    orbital: orbital.clone(),
                    axis: None,
                    label: format!("{} {}s", tag, orbital.n),
                }),
                AngularType::P => {
                    for axis in Axis::ALL {
                        sto_funcs.push(STOFn {
                            atom_index: ai,
                            element: elem.to_string(),
                            orbital: orbital.clone(),
                            axis: Some(axis),
                            label: format!("{} {}p_{}", tag, orbital.n, axis),
                        });
                    }
                }
            }
        }

        let shells = &mol.shells_by_atom[ai];
        if let Some(s_idx) = pick_valence_s_shell(shells) {
            gto_funcs.push(GTOFn {
                atom_index: ai,
                element: elem.to_string(),
                l: AngularType::S,
                shell_idx: s_idx,
                axis: None,
                label: format!("{} s_val", tag),
            });
        }
        if let Some(p_idx) = pick_p_shell(shells) {
            for axis in Axis::ALL {
                gto_funcs.push(GTOFn {
                    atom_index: ai,
                    element: elem.to_string(),
                    l: AngularType::P,
                    shell_idx: p_idx,
                    axis: Some(axis),
                    label: format!("{} p_{}", tag, axis),
                });
            }
        }
    }

    Ok((sto_funcs, gto_funcs))
}

pub fn build_valence_overlap_matrix(
    mol: &Molecule,
    registry: &StoRegistry,
    method: OverlapMethod,
    quad_n: usize,
) -> Result<ValenceOverlap, BasisError> {
    let (rows, cols) = build_valence_function_lists(mol, registry)?;
    let engine = OverlapEngine::new(method, quad_n)?;
    info!(
        "Building {} x {} valence overlap ({} method, {} Laguerre points)",
        rows.len(),
        cols.len(),
        method,
        engine.quadrature_points()
    );

    let values: Vec<Vec<f64>> = rows
        .par_iter()
        .map(|sf| {
            let A = mol.atoms[sf.atom_index].coords;
            cols.iter()
                .map(|gf| {
                    let B = mol.atoms[gf.atom_index].coords;
                    let shell = &mol.shells_by_atom[gf.atom_index][gf.shell_idx];
                    engine.overlap(&sf.orbital, shell, gf.l, &A, &B, sf.axis, gf.axis)
                })
                .collect::<Result<Vec<f64>, BasisError>>()
        })
        .collect::<Result<Vec<_>, BasisError>>()?;

    let matrix = DMatrix::from_fn(rows.len(), cols.len(), |i, j| values[i][j]);
    debug!("valence overlap:\n{}", format_matrix(&matrix, &[], &[], 12));

    Ok(ValenceOverlap { matrix, rows, cols })
}

/// Contracted Gaussian behind one column function.
pub fn contract_column(mol: &Molecule, gf: &GTOFn) -> Result<ContractedGTO, BasisError> {
    let shell = &mol.shells_by_atom[gf.atom_index][gf.shell_idx];
    shell.contracted(gf.l, gf.axis, mol.atoms[gf.atom_index].coords)
}

/// Symmetric Gaussian–Gaussian overlap over the valence columns.
pub fn build_gto_overlap_matrix(mol: &Molecule, cols: &[GTOFn]) -> Result<DMatrix<f64>, BasisError> {
    let functions = cols
        .iter()
        .map(|gf| contract_column(mol, gf))
        .collect::<Result<Vec<_>, _>>()?;

    let n = functions.len();
    let pairs: Vec<(usize, usize)> = iproduct!(0..n, 0..n).filter(|&(i, j)| i <= j).collect();
    let values: Vec<f64> = pairs
        .par_iter()
        .map(|&(i, j)| ContractedGTO::Sab(&functions[i], &functions[j]))
        .collect();

    let mut matrix = DMatrix::zeros(n, n);
    for (&(i, j), &v) in pairs.iter().zip(values.iter()) {
        matrix[(i, j)] = v;
        matrix[(j, i)] = v;
    }
    Ok(matrix)
}
