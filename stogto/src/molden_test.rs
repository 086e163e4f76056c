#[cfg(test)]
mod tests {
    use crate::error::MoldenError;
    use crate::molden::*;
    use basis::cgto::ShellKind;
    use basis::sto::AngularType;
    use basis::BasisError;
    use nalgebra::Vector3;

    const WATER: &str = include_str!("../example/h2o.molden");

    #[test]
    fn test_parse_water_geometry() {
        let mol = Molecule::parse(WATER).unwrap();
        assert_eq!(mol.num_atoms(), 3);
        let symbols: Vec<&str> = mol.atoms.iter().map(|a| a.element.as_str()).collect();
        assert_eq!(symbols, vec!["O", "H", "H"]);
        assert_eq!(mol.atoms[0].atomic_number, 8);

        // Angstrom input is stored in Bohr
        let h = &mol.atoms[1];
        assert!((h.coords.y - 0.7572 * ANGSTROM_TO_BOHR).abs() < 1e-12);
        assert!((h.coords.z + 0.4692 * ANGSTROM_TO_BOHR).abs() < 1e-12);
        assert_eq!(mol.valence_electrons(), 8);
    }

    #[test]
    fn test_parse_water_shells() {
        let mol = Molecule::parse(WATER).unwrap();
        let oxygen = &mol.shells_by_atom[0];
        assert_eq!(oxygen.len(), 2);
        assert_eq!(oxygen[0].kind, ShellKind::S);
        assert_eq!(oxygen[1].kind, ShellKind::SP);
        assert_eq!(oxygen[1].primitives.len(), 3);

        // Fortran exponents
        let first = &oxygen[0].primitives[0];
        assert!((first.alpha - 130.7093214).abs() < 1e-9);
        assert_eq!(first.coeff_p, None);
        let sp = &oxygen[1].primitives[2];
        assert!((sp.alpha - 0.38038896).abs() < 1e-12);
        assert!((sp.coeff_s.unwrap() - 0.7001154689).abs() < 1e-12);
        assert!((sp.coeff_p.unwrap() - 0.3919573931).abs() < 1e-12);

        for h in &mol.shells_by_atom[1..] {
            assert_eq!(h.len(), 1);
            assert_eq!(h[0].kind, ShellKind::S);
        }
    }

    #[test]
    fn test_atomic_units_and_scale_factor() {
        let text = "[Atoms] AU\n\
                    C 1 6 0.0 0.0 1.5\n\
                    [GTO]\n\
                    1 0\n\
                    p 1 2.0\n\
                    0.5 1.0\n";
        let mol = Molecule::parse(text).unwrap();
        assert_eq!(mol.atoms[0].coords, Vector3::new(0.0, 0.0, 1.5));
        let p = &mol.shells_by_atom[0][0];
        assert_eq!(p.kind, ShellKind::P);
        // scale factors multiply exponents by scale²
        assert!((p.primitives[0].alpha - 2.0).abs() < 1e-14);
        assert_eq!(p.primitives[0].coeff_p, Some(1.0));
    }

    #[test]
    fn test_atom_headers_without_blank_separator() {
        let text = "[Atoms] AU\n\
                    H 1 1 0 0 0\n\
                    H2 2 1 0 0 1.4\n\
                    [GTO]\n\
                    1 0\n\
                    s 1 1.0\n\
                    1.0 1.0\n\
                    2 0\n\
                    s 1 1.0\n\
                    0.5 1.0\n";
        let mol = Molecule::parse(text).unwrap();
        assert_eq!(mol.shells_by_atom[0][0].primitives[0].alpha, 1.0);
        assert_eq!(mol.shells_by_atom[1][0].primitives[0].alpha, 0.5);
    }

    #[test]
    fn test_translated_moves_every_atom() {
        let mol = Molecule::parse(WATER).unwrap();
        let shift = Vector3::new(1.0, -2.0, 0.5);
        let moved = mol.translated(&shift);
        for (a, b) in mol.atoms.iter().zip(moved.atoms.iter()) {
            assert!((b.coords - a.coords - shift).norm() < 1e-14);
        }
        assert_eq!(mol.shells_by_atom, moved.shells_by_atom);
    }

    #[test]
    fn test_renormalized_shells_have_unit_norm() {
        let text = "[Atoms] AU\n\
                    C 1 6 0.0 0.0 0.0\n\
                    [GTO]\n\
                    1 0\n\
                    sp 2 1.0\n\
                    1.0 2.0 0.7\n\
                    0.3 1.0 0.4\n";
        let mol = Molecule::parse(text).unwrap();
        let raw = &mol.shells_by_atom[0][0];
        assert!((raw.self_overlap(AngularType::S).unwrap() - 1.0).abs() > 0.1);

        let fixed = mol.renormalized().unwrap();
        assert_eq!(fixed.atoms, mol.atoms);
        let shell = &fixed.shells_by_atom[0][0];
        for l in [AngularType::S, AngularType::P] {
            assert!((shell.self_overlap(l).unwrap() - 1.0).abs() < 1e-12);
        }
        // only the overall scale changes
        let ratio = shell.primitives[0].coeff_s.unwrap() / shell.primitives[1].coeff_s.unwrap();
        assert!((ratio - 2.0).abs() < 1e-12);
        assert_eq!(shell.primitives[1].alpha, 0.3);
    }

    #[test]
    fn test_element_comes_from_atomic_number() {
        // force-field style labels carry no usable element symbol
        let content = "[Atoms] AU\n\
                       OW 1 8 0.0 0.0 0.0\n\
                       HW1 2 1 0.0 1.4 1.1\n\
                       Bq3 3 1 0.0 -1.4 1.1\n\
                       [GTO]\n";
        let mol = Molecule::parse(content).unwrap();
        let labels: Vec<&str> = mol.atoms.iter().map(|a| a.label.as_str()).collect();
        let symbols: Vec<&str> = mol.atoms.iter().map(|a| a.element.as_str()).collect();
        assert_eq!(labels, vec!["OW", "HW1", "Bq3"]);
        assert_eq!(symbols, vec!["O", "H", "H"]);
        assert_eq!(mol.atoms[0].atomic_number, 8);
        assert_eq!(mol.valence_electrons(), 8);
    }

    #[test]
    fn test_missing_sections() {
        assert!(matches!(
            Molecule::parse("[GTO]\n1 0\n"),
            Err(MoldenError::MissingSection("[Atoms]"))
        ));
        assert!(matches!(
            Molecule::parse("[Atoms] AU\nH 1 1 0 0 0\n"),
            Err(MoldenError::MissingSection("[GTO]"))
        ));
    }

    #[test]
    fn test_malformed_input_is_reported() {
        let unknown = "[Atoms] AU\nX 1 200 0 0 0\n[GTO]\n";
        match Molecule::parse(unknown) {
            Err(MoldenError::UnknownElement {
                line,
                label,
                atomic_number,
            }) => {
                assert_eq!(line, 2);
                assert_eq!(label, "X");
                assert_eq!(atomic_number, 200);
            }
            other => panic!("expected an unknown element, got {:?}", other),
        }

        let bad_z = "[Atoms] AU\nH 1 one 0 0 0\n[GTO]\n";
        assert!(matches!(
            Molecule::parse(bad_z),
            Err(MoldenError::Malformed { line: 2, .. })
        ));

        let truncated = "[Atoms] AU\nH 1 1 0 0 0\n[GTO]\n1 0\ns 3 1.0\n1.0 0.5\n\n";
        assert!(matches!(
            Molecule::parse(truncated),
            Err(MoldenError::Malformed { line: 5, .. })
        ));

        let undeclared = "[Atoms] AU\nH 1 1 0 0 0\n[GTO]\n2 0\ns 1 1.0\n1.0 1.0\n";
        assert!(matches!(
            Molecule::parse(undeclared),
            Err(MoldenError::UndeclaredAtom {
                atom: 2,
                natoms: 1,
                ..
            })
        ));

        let d_shell = "[Atoms] AU\nC 1 6 0 0 0\n[GTO]\n1 0\nd 1 1.0\n0.8 1.0\n";
        assert!(matches!(
            Molecule::parse(d_shell),
            Err(MoldenError::Shell {
                line: 5,
                source: BasisError::UnsupportedShell(_)
            })
        ));

        let bad_number = "[Atoms] AU\nH 1 1 0 zero 0\n[GTO]\n";
        assert!(matches!(
            Molecule::parse(bad_number),
            Err(MoldenError::Malformed { line: 2, .. })
        ));
    }

    #[test]
    fn test_missing_file() {
        assert!(matches!(
            Molecule::from_file("/nonexistent/water.molden"),
            Err(MoldenError::Io { .. })
        ));
    }
}
