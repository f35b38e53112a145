//! Thin façade over the dense linear-algebra backend.
//!
//! The numerical core only ever needs a handful of operations beyond plain
//! matrix arithmetic: the root-mean-square of a vector and an SVD-backed
//! Moore–Penrose pseudoinverse with a fixed singular-value cutoff. Keeping
//! them here isolates the rest of the crate from backend API details.

use nalgebra::{DMatrix, DVector};

/// Singular values below this threshold are treated as zero when inverting.
///
/// Redundant internal coordinates make `B * B^T` rank-deficient by
/// construction, so the cutoff is load-bearing, not defensive.
pub const SINGULAR_VALUE_CUTOFF: f64 = 1e-6;

/// Root-mean-square of a vector, `sqrt(sum(v_i^2) / n)`.
///
/// Returns `0.0` for an empty vector.
pub fn rms(v: &DVector<f64>) -> f64 {
    if v.is_empty() {
        return 0.0;
    }
    (v.norm_squared() / v.len() as f64).sqrt()
}

/// Moore–Penrose pseudoinverse via singular value decomposition.
///
/// Singular values below [`SINGULAR_VALUE_CUTOFF`] are discarded. Returns
/// `None` when the decomposition produces non-finite singular values, so a
/// near-rank-deficient input can never leak NaN into the caller.
pub fn pseudo_inverse(m: &DMatrix<f64>) -> Option<DMatrix<f64>> {
    if m.iter().any(|v| !v.is_finite()) {
        return None;
    }
    let svd = m.clone().svd(true, true);
    if svd.singular_values.iter().any(|s| !s.is_finite()) {
        return None;
    }
    svd.pseudo_inverse(SINGULAR_VALUE_CUTOFF).ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rms_matches_hand_computed_value() {
        let v = DVector::from_vec(vec![1.0, 2.0, 3.0, 4.0]);
        assert!((rms(&v) - (30.0_f64 / 4.0).sqrt()).abs() < 1e-12);
    }

    #[test]
    fn rms_of_empty_vector_is_zero() {
        let v = DVector::<f64>::zeros(0);
        assert_eq!(rms(&v), 0.0);
    }

    #[test]
    fn pseudo_inverse_inverts_a_regular_matrix() {
        let m = DMatrix::from_row_slice(2, 2, &[2.0, 0.0, 0.0, 4.0]);
        let inv = pseudo_inverse(&m).expect("pseudoinverse");

        assert!((inv[(0, 0)] - 0.5).abs() < 1e-12);
        assert!((inv[(1, 1)] - 0.25).abs() < 1e-12);
        assert!(inv[(0, 1)].abs() < 1e-12);
        assert!(inv[(1, 0)].abs() < 1e-12);
    }

    #[test]
    fn pseudo_inverse_discards_tiny_singular_values() {
        let m = DMatrix::from_row_slice(2, 2, &[1.0, 0.0, 0.0, 1e-9]);
        let inv = pseudo_inverse(&m).expect("pseudoinverse");

        // The near-null direction is projected out instead of amplified.
        assert!((inv[(0, 0)] - 1.0).abs() < 1e-9);
        assert!(inv[(1, 1)].abs() < 1e-6);
    }

    #[test]
    fn pseudo_inverse_of_rank_deficient_matrix_satisfies_penrose_identity() {
        // Rank-one 3x3 matrix.
        let m = DMatrix::from_row_slice(3, 3, &[1.0, 1.0, 1.0, 1.0, 1.0, 1.0, 1.0, 1.0, 1.0]);
        let inv = pseudo_inverse(&m).expect("pseudoinverse");
        let reconstructed = &m * &inv * &m;

        for i in 0..3 {
            for j in 0..3 {
                assert!((reconstructed[(i, j)] - m[(i, j)]).abs() < 1e-10);
            }
        }
    }
}
