//! Reader for the geometry and basis sections of a molden file.
//!
//! Only `[Atoms]` and `[GTO]` are interpreted; every other section is
//! skipped. Coordinates are stored in Bohr.

use crate::error::MoldenError;
use crate::io::parse_float;
use basis::cgto::{Primitive, Shell, ShellKind};
use basis::BasisError;
use nalgebra::Vector3;
use periodic_table_on_an_enum::Element;
use std::fs;
use std::path::Path;
use tracing::debug;

pub const ANGSTROM_TO_BOHR: f64 = 1.8897259886;

#[derive(Debug, Clone, PartialEq)]
pub struct Atom {
    /// Label column as written in the file
    pub label: String,
    pub element: String,
    pub atomic_number: u32,
    pub coords: Vector3<f64>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Molecule {
    pub atoms: Vec<Atom>,
    /// Gaussian shells in file order, one list per atom.
    pub shells_by_atom: Vec<Vec<Shell>>,
}

enum Section {
    Atoms { to_bohr: f64 },
    Gto,
    Other,
}

/// Shell whose primitive lines are still being read.
struct PendingShell {
    shell: Shell,
    remaining: usize,
    scale2: f64,
    header_line: usize,
}

impl Molecule {
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, MoldenError> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|source| MoldenError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::parse(&content)
    }

    pub fn parse(content: &str) -> Result<Self, MoldenError> {
        let mut atoms: Vec<Atom> = Vec::new();
        let mut gto_lines: Vec<(usize, &str)> = Vec::new();
        let mut seen_atoms = false;
        let mut seen_gto = false;
        let mut section = Section::Other;

        for (idx, raw) in content.lines().enumerate() {
            let line_no = idx + 1;
            let line = raw.trim();

            if line.starts_with('[') {
                section = parse_section_header(line, line_no)?;
                match section {
                    Section::Atoms { .. } => seen_atoms = true,
                    Section::Gto => seen_gto = true,
                    Section::Other => {}
                }
                continue;
            }

            match section {
                Section::Atoms { to_bohr } => {
                    if !line.is_empty() {
                        atoms.push(parse_atom_line(line, line_no, to_bohr)?);
                    }
                }
                Section::Gto => gto_lines.push((line_no, line)),
                Section::Other => {}
            }
        }

        if !seen_atoms || atoms.is_empty() {
            return Err(MoldenError::MissingSection("[Atoms]"));
        }
        if !seen_gto {
            return Err(MoldenError::MissingSection("[GTO]"));
        }

        let shells_by_atom = parse_gto_section(&gto_lines, atoms.len())?;
        debug!(
            "molden: {} atoms, {} shells",
            atoms.len(),
            shells_by_atom.iter().map(Vec::len).sum::<usize>()
        );

        Ok(Molecule {
            atoms,
            shells_by_atom,
        })
    }

    pub fn num_atoms(&self) -> usize {
        self.atoms.len()
    }

    /// Rigidly shifted copy of the molecule (Bohr).
    pub fn translated(&self, shift: &Vector3<f64>) -> Molecule {
        let mut moved = self.clone();
        for atom in moved.atoms.iter_mut() {
            atom.coords += shift;
        }
        moved
    }

    /// Copy with every shell rescaled to unit self-overlap, for files
    /// whose contraction coefficients are not normalized.
    pub fn renormalized(&self) -> Result<Molecule, BasisError> {
        let shells_by_atom = self
            .shells_by_atom
            .iter()
            .map(|shells| {
                shells
                    .iter()
                    .map(Shell::renormalized)
                    .collect::<Result<Vec<Shell>, BasisError>>()
            })
            .collect::<Result<Vec<Vec<Shell>>, BasisError>>()?;
        Ok(Molecule {
            atoms: self.atoms.clone(),
            shells_by_atom,
        })
    }

    /// Electrons outside the noble-gas core, summed over atoms.
    pub fn valence_electrons(&self) -> usize {
        self.atoms
            .iter()
            .map(|atom| valence_count(atom.atomic_number as usize))
            .sum()
    }
}

fn valence_count(z: usize) -> usize {
    match z {
        0..=2 => z,
        3..=10 => z - 2,
        11..=18 => z - 10,
        19..=36 => z - 18,
        _ => z - 36,
    }
}

fn parse_section_header(line: &str, line_no: usize) -> Result<Section, MoldenError> {
    let close = line.find(']').ok_or_else(|| MoldenError::Malformed {
        line: line_no,
        message: format!("unterminated section header '{}'", line),
    })?;
    let name = line[1..close].trim().to_lowercase();
    let option = line[close + 1..]
        .trim()
        .trim_matches(|c| c == '(' || c == ')')
        .to_lowercase();

    Ok(match name.as_str() {
        "atoms" => match option.as_str() {
            "au" | "bohr" => Section::Atoms { to_bohr: 1.0 },
            "angs" | "angstrom" | "" => Section::Atoms {
                to_bohr: ANGSTROM_TO_BOHR,
            },
            other => {
                return Err(MoldenError::Malformed {
                    line: line_no,
                    message: format!("unknown [Atoms] unit '{}'", other),
                })
            }
        },
        "gto" => Section::Gto,
        _ => Section::Other,
    })
}

fn number(token: &str, line_no: usize) -> Result<f64, MoldenError> {
    parse_float(token).ok_or_else(|| MoldenError::Malformed {
        line: line_no,
        message: format!("cannot parse '{}' as a number", token),
    })
}

fn integer(token: &str, line_no: usize) -> Result<usize, MoldenError> {
    token.parse::<usize>().map_err(|_| MoldenError::Malformed {
        line: line_no,
        message: format!("cannot parse '{}' as an integer", token),
    })
}

/// `label index Z x y z`
fn parse_atom_line(line: &str, line_no: usize, to_bohr: f64) -> Result<Atom, MoldenError> {
    let tokens: Vec<&str> = line.split_whitespace().collect();
    if tokens.len() < 6 {
        return Err(MoldenError::Malformed {
            line: line_no,
            message: format!("expected 'label index Z x y z', got '{}'", line),
        });
    }

    // Z decides the element; the label (OW, O1, ...) is kept for display
    let atomic_number = integer(tokens[2], line_no)?;
    let element = Element::from_atomic_number(atomic_number).ok_or_else(|| {
        MoldenError::UnknownElement {
            line: line_no,
            label: tokens[0].to_string(),
            atomic_number,
        }
    })?;

    let coords = Vector3::new(
        number(tokens[3], line_no)?,
        number(tokens[4], line_no)?,
        number(tokens[5], line_no)?,
    ) * to_bohr;

    Ok(Atom {
        label: tokens[0].to_string(),
        element: element.get_symbol().to_string(),
        atomic_number: element.get_atomic_number() as u32,
        coords,
    })
}

// [GTO] layout:
//   atom_index 0
//   kind nprim scale
//   alpha c_s [c_p]      (nprim lines)
//   ...
//   <blank line closes the atom>
fn parse_gto_section(
    lines: &[(usize, &str)],
    natoms: usize,
) -> Result<Vec<Vec<Shell>>, MoldenError> {
    let mut shells_by_atom: Vec<Vec<Shell>> = vec![Vec::new(); natoms];
    let mut current_atom: Option<usize> = None;
    let mut pending: Option<PendingShell> = None;

    for &(line_no, line) in lines {
        if let Some(mut open) = pending.take() {
            if line.is_empty() {
                return Err(truncated(&open));
            }
            open.shell
                .primitives
                .push(parse_primitive(line, line_no, open.shell.kind, open.scale2)?);
            open.remaining -= 1;
            if open.remaining == 0 {
                if let Some(atom) = current_atom {
                    shells_by_atom[atom].push(open.shell);
                }
            } else {
                pending = Some(open);
            }
            continue;
        }

        if line.is_empty() {
            current_atom = None;
            continue;
        }

        let tokens: Vec<&str> = line.split_whitespace().collect();
        if let Ok(atom) = tokens[0].parse::<usize>() {
            if atom == 0 || atom > natoms {
                return Err(MoldenError::UndeclaredAtom {
                    line: line_no,
                    atom,
                    natoms,
                });
            }
            current_atom = Some(atom - 1);
            continue;
        }

        if current_atom.is_none() {
            return Err(MoldenError::Malformed {
                line: line_no,
                message: format!("shell '{}' appears before an atom header", line),
            });
        }
        if tokens.len() < 2 {
            return Err(MoldenError::Malformed {
                line: line_no,
                message: format!("expected 'kind nprim [scale]', got '{}'", line),
            });
        }

        let kind: ShellKind = tokens[0]
            .parse()
            .map_err(|source| MoldenError::Shell {
                line: line_no,
                source,
            })?;
        let nprim = integer(tokens[1], line_no)?;
        let scale = match tokens.get(2) {
            Some(token) => number(token, line_no)?,
            None => 1.0,
        };
        if nprim == 0 {
            return Err(MoldenError::Malformed {
                line: line_no,
                message: "shell with zero primitives".to_string(),
            });
        }

        pending = Some(PendingShell {
            shell: Shell::new(kind),
            remaining: nprim,
            scale2: scale * scale,
            header_line: line_no,
        });
    }

    if let Some(open) = pending {
        return Err(truncated(&open));
    }
    Ok(shells_by_atom)
}

fn truncated(open: &PendingShell) -> MoldenError {
    MoldenError::Malformed {
        line: open.header_line,
        message: format!(
            "{} shell is missing {} primitive line(s)",
            open.shell.kind, open.remaining
        ),
    }
}

fn parse_primitive(
    line: &str,
    line_no: usize,
    kind: ShellKind,
    scale2: f64,
) -> Result<Primitive, MoldenError> {
    let tokens: Vec<&str> = line.split_whitespace().collect();
    let needed = if kind == ShellKind::SP { 3 } else { 2 };
    if tokens.len() < needed {
        return Err(MoldenError::Malformed {
            line: line_no,
            message: format!(
                "{} primitive needs {} columns, got '{}'",
                kind, needed, line
            ),
        });
    }

    let alpha = number(tokens[0], line_no)? * scale2;
    let first = number(tokens[1], line_no)?;
    let (coeff_s, coeff_p) = match kind {
        ShellKind::S => (Some(first), None),
        ShellKind::P => (None, Some(first)),
        ShellKind::SP => (Some(first), Some(number(tokens[2], line_no)?)),
    };

    Ok(Primitive {
        alpha,
        coeff_s,
        coeff_p,
    })
}
