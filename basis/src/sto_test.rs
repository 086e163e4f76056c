#[cfg(test)]
mod tests {
    use crate::error::BasisError;
    use crate::gto::Axis;
    use crate::helper::simpson_integration;
    use crate::sto::*;
    use nalgebra::Vector3;
    use std::f64::consts::PI;

    #[test]
    fn test_sto_radial_normalization() {
        // ∫ |χ|² d³r = 4π ∫ N² r^{2n} e^{-2ζr} dr for s functions
        for &(n, zeta) in &[(1, 1.188078), (2, 1.808665), (3, 0.9)] {
            let norm = N_sto_s(n, zeta);
            let integral = simpson_integration(
                |r| 4.0 * PI * (norm * r.powi(n - 1) * (-zeta * r).exp()).powi(2) * r * r,
                0.0,
                60.0,
                60_000,
            );
            assert!(
                (integral - 1.0).abs() < 1e-8,
                "n={} zeta={}: norm integral {}",
                n,
                zeta,
                integral
            );
        }
    }

    #[test]
    fn test_sto_p_normalization() {
        // angular average of x² over the sphere is r²/3
        let (n, zeta) = (2, 1.685116);
        let norm = N_sto_p(n, zeta);
        let integral = simpson_integration(
            |r| 4.0 * PI / 3.0 * (norm * r.powi(n - 1) * (-zeta * r).exp()).powi(2) * r * r,
            0.0,
            60.0,
            60_000,
        );
        assert!((integral - 1.0).abs() < 1e-8, "got {}", integral);
    }

    #[test]
    fn test_gaussian_norms_match_primitive_gto() {
        use crate::basis::Basis;
        use crate::gto::GTO;
        let alpha = 0.37;
        let s = GTO::oriented(alpha, None, Vector3::zeros());
        let p = GTO::oriented(alpha, Some(Axis::X), Vector3::zeros());
        assert!((s.norm - N_s(alpha)).abs() < 1e-12);
        assert!((p.norm - N_p(alpha)).abs() < 1e-12);
        assert!((GTO::Sab(&p, &p) - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_sto_evaluate() {
        let orbital = STOOrbital::new(2, AngularType::P, 1.5, "2p").unwrap();
        let sto = STO::new(orbital.clone(), Vector3::new(1.0, 0.0, 0.0), Some(Axis::X)).unwrap();
        // node through the centre, odd along the axis
        let plus = sto.evaluate(&Vector3::new(1.5, 0.0, 0.0));
        let minus = sto.evaluate(&Vector3::new(0.5, 0.0, 0.0));
        assert!(plus > 0.0);
        assert!((plus + minus).abs() < 1e-14);
        let expected = orbital.norm() * 0.5 * (-1.5 * 0.5_f64).exp();
        assert!((plus - expected).abs() < 1e-14);

        assert!(matches!(
            STO::new(orbital, Vector3::zeros(), None),
            Err(BasisError::MissingAxis(_))
        ));
    }

    #[test]
    fn test_angular_type_parsing() {
        assert_eq!("s".parse::<AngularType>().unwrap(), AngularType::S);
        assert_eq!(" P ".parse::<AngularType>().unwrap(), AngularType::P);
        assert!(matches!(
            "d".parse::<AngularType>(),
            Err(BasisError::UnsupportedAngularMomentum(_))
        ));
    }

    #[test]
    fn test_orbital_validation() {
        assert!(matches!(
            STOOrbital::new(1, AngularType::P, 1.0, "1p"),
            Err(BasisError::UnsupportedQuantumNumber { .. })
        ));
        assert!(matches!(
            STOOrbital::new(1, AngularType::S, 0.0, "1s_core"),
            Err(BasisError::InvalidExponent { .. })
        ));
    }

    #[test]
    fn test_am1_registry() {
        let registry = StoRegistry::am1();
        assert_eq!(
            registry.list_registered_elements(),
            vec!["C", "F", "H", "N", "O"]
        );

        let carbon = registry.valence_orbitals("c").unwrap();
        assert_eq!(carbon.len(), 2);
        assert!((carbon[&AngularType::S].zeta - 1.808665).abs() < 1e-12);
        assert!((carbon[&AngularType::P].zeta - 1.685116).abs() < 1e-12);

        let hydrogen = registry.valence_orbitals("H").unwrap();
        assert_eq!(hydrogen.len(), 1);
        assert_eq!(hydrogen[&AngularType::S].n, 1);

        assert!(matches!(
            registry.get("Xe"),
            Err(BasisError::UnknownElement(_))
        ));
    }

    #[test]
    fn test_am1_table_entries_are_valid() {
        let mut registry = StoRegistry::empty();
        for (symbol, orbitals) in AM1_EXPONENTS {
            registry.register_element(symbol, orbitals).unwrap();
            let params = registry.get(symbol).unwrap();
            assert_eq!(params.orbitals.len(), orbitals.len());
        }
        assert_eq!(
            registry.list_registered_elements(),
            StoRegistry::am1().list_registered_elements()
        );
    }

    #[test]
    fn test_valence_picks_highest_n() {
        let mut registry = StoRegistry::empty();
        registry
            .register_element(
                "Si",
                &[
                    (2, AngularType::S, 4.0, "2s_core"),
                    (3, AngularType::S, 1.6, "3s_val"),
                    (3, AngularType::P, 1.3, "3p_val"),
                ],
            )
            .unwrap();
        let valence = registry.valence_orbitals("SI").unwrap();
        assert_eq!(valence[&AngularType::S].label, "3s_val");
        assert_eq!(valence[&AngularType::P].n, 3);
    }
}
