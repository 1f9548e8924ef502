// crates/peertrust-engine/src/normalize.rs
//
// Column normalization: convert a raw trust matrix into column-stochastic
// form for power iteration.
//
// Every column must sum to 1 afterwards. Columns with no incoming trust
// are replaced by a uniform distribution rather than left at zero, which
// would otherwise create a rank sink and an undefined division.

use peertrust_core::{Result, TrustError};

use crate::matrix::TrustMatrix;

/// Column sums at or below this are treated as zero.
pub const EPSILON_ZERO: f64 = 1e-12;

/// Tolerance for the post-normalization column-sum check.
pub const COLUMN_SUM_TOLERANCE: f64 = 1e-6;

/// Normalize `matrix` to column-stochastic form.
///
/// Pure function: the input is untouched and a fresh matrix is returned
/// with its `normalized` flag set.
///
/// # Errors
/// * `InvalidTrustValue` if any input entry is negative (a builder defect).
/// * `MatrixNormalization` if a column fails to sum to 1 within tolerance
///   after normalization (an internal bug, never suppressed).
pub fn normalize_columns(matrix: &TrustMatrix) -> Result<TrustMatrix> {
    let n = matrix.len();
    if n < 2 {
        return Err(TrustError::InsufficientPeers { peer_count: n });
    }

    for i in 0..n {
        for j in 0..n {
            let value = matrix.get(i, j);
            if value < 0.0 {
                return Err(TrustError::InvalidTrustValue {
                    value,
                    truster: i,
                    trustee: j,
                });
            }
        }
    }

    let uniform = 1.0 / n as f64;
    let mut normalized = TrustMatrix::zeros(n);

    for j in 0..n {
        let sum = matrix.column_sum(j);
        if sum > EPSILON_ZERO {
            for i in 0..n {
                normalized.set(i, j, matrix.get(i, j) / sum);
            }
        } else {
            // Zero-column rule: nobody extended trust to peer j, so every
            // peer extends it a uniform share instead.
            for i in 0..n {
                normalized.set(i, j, uniform);
            }
        }
    }

    // Post-condition is checked, not assumed.
    let column_sums = normalized.column_sums();
    for (j, &sum) in column_sums.iter().enumerate() {
        if (sum - 1.0).abs() > COLUMN_SUM_TOLERANCE {
            return Err(TrustError::MatrixNormalization {
                column: j,
                sum,
                column_sums,
            });
        }
    }

    normalized.set_normalized(true);
    Ok(normalized)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn columns_sum_to_one_after_normalization() {
        let matrix = TrustMatrix::from_rows(&[
            vec![0.0, 0.7, 0.3],
            vec![0.5, 0.0, 0.5],
            vec![0.4, 0.6, 0.0],
        ])
        .unwrap();
        let normalized = normalize_columns(&matrix).unwrap();
        assert!(normalized.is_normalized());
        for j in 0..3 {
            assert!((normalized.column_sum(j) - 1.0).abs() < COLUMN_SUM_TOLERANCE);
        }
    }

    #[test]
    fn zero_column_becomes_uniform() {
        // Peer 2 receives no trust from anyone.
        let matrix = TrustMatrix::from_rows(&[
            vec![0.0, 0.5, 0.0],
            vec![0.5, 0.0, 0.0],
            vec![0.5, 0.5, 0.0],
        ])
        .unwrap();
        let normalized = normalize_columns(&matrix).unwrap();
        for i in 0..3 {
            assert!((normalized.get(i, 2) - 1.0 / 3.0).abs() < 1e-12);
        }
    }

    #[test]
    fn all_zero_matrix_becomes_fully_uniform() {
        let matrix = TrustMatrix::zeros(4);
        let normalized = normalize_columns(&matrix).unwrap();
        for i in 0..4 {
            for j in 0..4 {
                assert!((normalized.get(i, j) - 0.25).abs() < 1e-12);
            }
        }
    }

    #[test]
    fn negative_entry_is_rejected() {
        let matrix =
            TrustMatrix::from_rows(&[vec![0.0, -0.1], vec![0.5, 0.0]]).unwrap();
        let err = normalize_columns(&matrix).unwrap_err();
        match err {
            TrustError::InvalidTrustValue { value, truster, trustee } => {
                assert!((value + 0.1).abs() < 1e-12);
                assert_eq!((truster, trustee), (0, 1));
            }
            other => panic!("expected InvalidTrustValue, got {other:?}"),
        }
    }

    #[test]
    fn input_matrix_is_untouched() {
        let matrix =
            TrustMatrix::from_rows(&[vec![0.0, 2.0], vec![4.0, 0.0]]).unwrap();
        let before = matrix.clone();
        let _ = normalize_columns(&matrix).unwrap();
        assert_eq!(matrix, before);
    }

    #[test]
    fn already_stochastic_matrix_is_preserved() {
        let matrix = TrustMatrix::from_rows(&[
            vec![0.0, 0.5, 0.5],
            vec![0.5, 0.0, 0.5],
            vec![0.5, 0.5, 0.0],
        ])
        .unwrap();
        let normalized = normalize_columns(&matrix).unwrap();
        for i in 0..3 {
            for j in 0..3 {
                assert!((normalized.get(i, j) - matrix.get(i, j)).abs() < 1e-12);
            }
        }
    }
}
