#[cfg(test)]
mod tests {
    use crate::error::NexmdError;
    use crate::nexmd::*;
    use nalgebra::{DMatrix, DVector};
    use std::fs;
    use std::path::PathBuf;
    use tempfile::TempDir;

    fn write(dir: &TempDir, name: &str, content: &str) -> PathBuf {
        let path = dir.path().join(name);
        fs::write(&path, content).unwrap();
        path
    }

    const VHF: &str = "0.00 1.0 2.0 3.0 4.0\n\
                       0.50 5.0 6.0 7.0 8.0\n\
                       1.00 0.9D+00 1.0D-01 -1.0D-01 0.9D+00\n";

    #[test]
    fn test_read_mo_coefficients_transposes() {
        let dir = tempfile::tempdir().unwrap();
        let path = write(&dir, "vhf.out", VHF);

        let snapshot = read_mo_coefficients(&path, 2).unwrap();
        assert_eq!(snapshot.time, 0.5);
        // file rows become columns
        assert_eq!(
            snapshot.coefficients,
            DMatrix::from_row_slice(2, 2, &[5.0, 7.0, 6.0, 8.0])
        );

        let fortran = read_mo_coefficients(&path, 3).unwrap();
        assert!((fortran.coefficients[(1, 0)] - 0.1).abs() < 1e-15);
        assert!((fortran.coefficients[(0, 1)] + 0.1).abs() < 1e-15);
    }

    #[test]
    fn test_read_mo_coefficients_errors() {
        let dir = tempfile::tempdir().unwrap();
        let path = write(&dir, "vhf.out", VHF);
        assert!(matches!(
            read_mo_coefficients(&path, 0),
            Err(NexmdError::InvalidTimeStep)
        ));
        assert!(matches!(
            read_mo_coefficients(&path, 7),
            Err(NexmdError::StepOutOfRange {
                step: 7,
                lines: 3,
                ..
            })
        ));

        let ragged = write(&dir, "ragged.out", "0.0 1 2 3\n");
        assert!(matches!(
            read_mo_coefficients(&ragged, 1),
            Err(NexmdError::NotSquare { line: 1, count: 3 })
        ));

        let garbage = write(&dir, "garbage.out", "0.0 1 x 3 4\n");
        assert!(matches!(
            read_mo_coefficients(&garbage, 1),
            Err(NexmdError::Parse { line: 1, .. })
        ));

        assert!(matches!(
            read_mo_coefficients(dir.path().join("none.out"), 1),
            Err(NexmdError::Io { .. })
        ));
    }

    const TDM: &str = "1 0.00 0.1 0.2 0.3 0.4\n\
                       2 0.00 1.0 0.0 0.0 1.0\n\
                       1 0.50 0.5 0.6 0.7 0.8\n\
                       1 0.50 9.0 9.0 9.0 9.0\n";

    #[test]
    fn test_read_full_transition_density() {
        let dir = tempfile::tempdir().unwrap();
        let path = write(&dir, "transition-densities.out", TDM);

        let tdm = read_transition_density(&path, 1, 0.5, TdmLayout::Full).unwrap();
        assert_eq!(
            tdm,
            TransitionDensity::Full(DMatrix::from_row_slice(2, 2, &[0.5, 0.6, 0.7, 0.8]))
        );
        assert_eq!(tdm.dimension(), 2);

        // time comparison tolerates print rounding
        let tdm = read_transition_density(&path, 2, 1e-12, TdmLayout::Full).unwrap();
        assert_eq!(tdm, TransitionDensity::Full(DMatrix::identity(2, 2)));
    }

    #[test]
    fn test_read_diagonal_transition_density() {
        let dir = tempfile::tempdir().unwrap();
        let path = write(&dir, "tdm_diag.out", "3 2.0 0.25 -0.5 0.125\n");
        let tdm = read_transition_density(&path, 3, 2.0, TdmLayout::Diagonal).unwrap();
        assert_eq!(
            tdm,
            TransitionDensity::Diagonal(DVector::from_vec(vec![0.25, -0.5, 0.125]))
        );
        assert_eq!(tdm.dimension(), 3);
    }

    #[test]
    fn test_transition_density_errors() {
        let dir = tempfile::tempdir().unwrap();
        let path = write(&dir, "transition-densities.out", TDM);
        assert!(matches!(
            read_transition_density(&path, 4, 0.0, TdmLayout::Full),
            Err(NexmdError::TransitionNotFound { state: 4, .. })
        ));
        assert!(matches!(
            read_transition_density(&path, 1, 0.25, TdmLayout::Full),
            Err(NexmdError::TransitionNotFound { .. })
        ));

        let odd = write(&dir, "odd.out", "1 0.0 1 2 3\n");
        assert!(matches!(
            read_transition_density(&odd, 1, 0.0, TdmLayout::Full),
            Err(NexmdError::NotSquare { line: 1, count: 3 })
        ));

        let bad_state = write(&dir, "bad.out", "one 0.0 1\n");
        assert!(matches!(
            read_transition_density(&bad_state, 1, 0.0, TdmLayout::Diagonal),
            Err(NexmdError::Parse { line: 1, .. })
        ));
    }
}
