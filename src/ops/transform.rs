//! Back-transformation from internal-coordinate displacements to Cartesian
//! geometry.
//!
//! The forward map `q(x)` is nonlinear, so projecting an internal step back
//! onto Cartesian space is iterative: each pass solves the linearized system
//! through the pseudoinverse of `B * B^T` and re-measures the remaining
//! internal displacement, wrapping periodic components. When the single-shot
//! iteration stalls or diverges, the step is bisected and the two halves are
//! applied in sequence, the second aimed at the original target from
//! wherever the first landed.

use nalgebra::DVector;

use crate::model::coordinate::Coordinates;
use crate::ops::error::Error;
use crate::ops::wilson::wilson_matrix;
use crate::utils::linalg;

/// Iteration cap for one Newton loop.
pub const MAX_ITERATIONS: usize = 25;

/// Recursion depth cap for the step-halving fallback.
pub const MAX_HALVINGS: usize = 8;

/// Convergence threshold on the RMS Cartesian step, in bohr.
pub const STEP_TOLERANCE: f64 = 1e-6;

/// Convergence threshold on the RMS remaining internal displacement.
pub const RESIDUAL_TOLERANCE: f64 = 1e-6;

/// Outcome of a back-transformation.
///
/// Non-convergence is not an error: `x` then holds the best geometry seen
/// and the caller decides whether to shrink its step.
#[derive(Debug, Clone)]
pub struct BackTransformResult {
    /// New Cartesian geometry (best-effort when not converged).
    pub x: DVector<f64>,
    /// Whether either convergence criterion was met.
    pub converged: bool,
    /// Total Newton iterations spent, including halved sub-steps.
    pub iterations: usize,
}

/// Evaluates every internal coordinate at the Cartesian geometry `x`.
///
/// Thin companion to [`internal_to_cartesian`]; the forward direction needs
/// no iteration.
pub fn cartesian_to_internal(x: &DVector<f64>, coords: &Coordinates) -> DVector<f64> {
    coords.evaluate(x)
}

/// Projects the internal displacement `dq` from `x_old` onto Cartesian
/// space, with step-halving recovery when the direct iteration fails.
///
/// # Errors
///
/// [`Error::NumericalFailure`] when the pseudoinverse cannot be computed.
pub fn internal_to_cartesian(
    q_old: &DVector<f64>,
    dq: &DVector<f64>,
    x_old: &DVector<f64>,
    coords: &Coordinates,
) -> Result<BackTransformResult, Error> {
    step_with_halving(q_old, dq, x_old, coords, 0)
}

/// One damped Newton loop without the halving fallback.
///
/// Exposed on its own for diagnostics: a caller can observe that a given
/// step is too large for the direct iteration before the fallback masks it.
pub fn internal_to_cartesian_single(
    q_old: &DVector<f64>,
    dq: &DVector<f64>,
    x_old: &DVector<f64>,
    coords: &Coordinates,
) -> Result<BackTransformResult, Error> {
    debug_assert_eq!(q_old.len(), coords.len());
    debug_assert_eq!(dq.len(), coords.len());

    if coords.is_empty() {
        return Ok(BackTransformResult {
            x: x_old.clone(),
            converged: true,
            iterations: 0,
        });
    }

    let target = wrapped_target(q_old, dq, coords);

    let mut x = x_old.clone();
    let mut dq_current = dq.clone();
    let mut best_x = x.clone();
    let mut best_residual = f64::INFINITY;
    let mut previous_step = f64::INFINITY;
    let mut growth_streak = 0;

    for iteration in 1..=MAX_ITERATIONS {
        let b = wilson_matrix(&x, coords);
        let bt = b.transpose();
        let g = &b * &bt;
        let g_inverse = linalg::pseudo_inverse(&g).ok_or(Error::NumericalFailure)?;

        let dx = &bt * (&g_inverse * &dq_current);
        x += &dx;

        let q = coords.evaluate(&x);
        dq_current = coords.difference(&target, &q);

        let step_rms = linalg::rms(&dx);
        let residual_rms = linalg::rms(&dq_current);

        if residual_rms < best_residual {
            best_residual = residual_rms;
            best_x.copy_from(&x);
        }

        if step_rms < STEP_TOLERANCE || residual_rms < RESIDUAL_TOLERANCE {
            return Ok(BackTransformResult {
                x,
                converged: true,
                iterations: iteration,
            });
        }

        // Two consecutive growing steps mean the linearization has left its
        // trust region; bail out and let the halving fallback shorten it.
        if step_rms > previous_step {
            growth_streak += 1;
            if growth_streak >= 2 {
                return Ok(BackTransformResult {
                    x: best_x,
                    converged: false,
                    iterations: iteration,
                });
            }
        } else {
            growth_streak = 0;
        }
        previous_step = step_rms;
    }

    Ok(BackTransformResult {
        x: best_x,
        converged: false,
        iterations: MAX_ITERATIONS,
    })
}

/// Recursive bisection around the single-shot loop.
fn step_with_halving(
    q_old: &DVector<f64>,
    dq: &DVector<f64>,
    x_old: &DVector<f64>,
    coords: &Coordinates,
    depth: usize,
) -> Result<BackTransformResult, Error> {
    let attempt = internal_to_cartesian_single(q_old, dq, x_old, coords)?;
    if attempt.converged || depth >= MAX_HALVINGS {
        return Ok(attempt);
    }

    let half = dq * 0.5;
    let first = step_with_halving(q_old, &half, x_old, coords, depth + 1)?;
    if !first.converged {
        return Ok(BackTransformResult {
            x: first.x,
            converged: false,
            iterations: attempt.iterations + first.iterations,
        });
    }

    // Aim the second half at the original target from wherever the first
    // half landed, so its own convergence error does not accumulate.
    let target = wrapped_target(q_old, dq, coords);
    let q_mid = coords.evaluate(&first.x);
    let remaining = coords.difference(&target, &q_mid);
    let second = step_with_halving(&q_mid, &remaining, &first.x, coords, depth + 1)?;

    Ok(BackTransformResult {
        x: second.x,
        converged: second.converged,
        iterations: attempt.iterations + first.iterations + second.iterations,
    })
}

/// `q_old + dq` with periodic components re-entered into `(-pi, pi]`.
fn wrapped_target(q_old: &DVector<f64>, dq: &DVector<f64>, coords: &Coordinates) -> DVector<f64> {
    let mut target = q_old + dq;
    coords.wrap_periodic(&mut target);
    target
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::element::Element;
    use crate::model::molecule::Molecule;
    use crate::ops::connectivity::ConnectivityBuilder;
    use crate::utils::units::ANGSTROM_TO_BOHR;
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};
    use std::f64::consts::PI;

    const DEG: f64 = PI / 180.0;

    /// Builds connectivity for a molecule given in ångström.
    fn prepare(molecule: &Molecule) -> (Molecule, Coordinates) {
        let mut scaled = molecule.clone();
        scaled.scale_positions(ANGSTROM_TO_BOHR);
        let coords = ConnectivityBuilder::new()
            .build(&scaled)
            .expect("connectivity")
            .into_coordinates();
        (scaled, coords)
    }

    fn hydrogen() -> Molecule {
        Molecule::from_symbols(&[
            (Element::H, [0.0, 0.0, 0.0]),
            (Element::H, [1.0, 0.0, 0.0]),
        ])
    }

    fn water() -> Molecule {
        Molecule::from_symbols(&[
            (Element::O, [0.0, 0.0, 0.0]),
            (Element::H, [0.9572, 0.0, 0.0]),
            (Element::H, [-0.2397, 0.9267, 0.0]),
        ])
    }

    fn right_angle_water() -> Molecule {
        Molecule::from_symbols(&[
            (Element::O, [0.0, 0.0, 0.0]),
            (Element::H, [1.0, 0.0, 0.0]),
            (Element::H, [0.0, 1.0, 0.0]),
        ])
    }

    fn hydrogen_peroxide() -> Molecule {
        Molecule::from_symbols(&[
            (Element::O, [0.0, 0.0, 0.0]),
            (Element::O, [1.475, 0.0, 0.0]),
            (Element::H, [-0.07950, 0.94667, 0.0]),
            (Element::H, [1.55450, -0.34695, 0.88079]),
        ])
    }

    fn carbon_dioxide() -> Molecule {
        Molecule::from_symbols(&[
            (Element::O, [-1.16, 0.0, 0.0]),
            (Element::C, [0.0, 0.0, 0.0]),
            (Element::O, [1.16, 0.0, 0.0]),
        ])
    }

    #[test]
    fn zero_displacement_returns_the_input_geometry() {
        let (molecule, coords) = prepare(&water());
        let x = molecule.to_cartesian();
        let q = coords.evaluate(&x);
        let dq = DVector::zeros(coords.len());

        let result = internal_to_cartesian(&q, &dq, &x, &coords).expect("transform");

        assert!(result.converged);
        assert!(linalg::rms(&(result.x - x)) < 1e-10);
    }

    #[test]
    fn hydrogen_bond_stretch_hits_the_target_length() {
        let (molecule, coords) = prepare(&hydrogen());
        assert_eq!(coords.len(), 1);

        let x = molecule.to_cartesian();
        let q = coords.evaluate(&x);
        let dq = DVector::from_vec(vec![0.1]);

        let result = internal_to_cartesian(&q, &dq, &x, &coords).expect("transform");
        assert!(result.converged);

        let new_length = coords.evaluate(&result.x)[0];
        assert!((new_length - (q[0] + 0.1)).abs() < 1e-6);
    }

    #[test]
    fn water_angle_step_moves_only_the_angle() {
        let (molecule, coords) = prepare(&water());
        assert_eq!(coords.len(), 3);

        let x = molecule.to_cartesian();
        let q = coords.evaluate(&x);
        let dq = DVector::from_vec(vec![0.0, 0.0, DEG]);

        let result = internal_to_cartesian(&q, &dq, &x, &coords).expect("transform");
        assert!(result.converged);

        let q_new = coords.evaluate(&result.x);
        assert!((q_new[0] - q[0]).abs() < 1e-4);
        assert!((q_new[1] - q[1]).abs() < 1e-4);
        assert!((q_new[2] - (q[2] + DEG)).abs() < 1e-4);
    }

    #[test]
    fn peroxide_dihedral_step_moves_only_the_dihedral() {
        let (molecule, coords) = prepare(&hydrogen_peroxide());
        assert_eq!(coords.len(), 6);

        let x = molecule.to_cartesian();
        let q = coords.evaluate(&x);
        let mut dq = DVector::zeros(6);
        dq[5] = DEG;

        let result = internal_to_cartesian(&q, &dq, &x, &coords).expect("transform");
        assert!(result.converged);

        let q_new = coords.evaluate(&result.x);
        let residual = coords.difference(&(q + dq), &q_new);
        for idx in 0..coords.len() {
            assert!(residual[idx].abs() < 1e-4, "component {}", idx);
        }
    }

    #[test]
    fn carbon_dioxide_linear_bend_step_hits_the_wrapped_target() {
        let (molecule, coords) = prepare(&carbon_dioxide());
        // Two bonds plus the two tagged components of the single bend.
        assert_eq!(coords.len(), 4);

        let x = molecule.to_cartesian();
        let q = coords.evaluate(&x);
        assert!((q[2] - PI).abs() < 1e-10);
        assert!((q[3] - PI).abs() < 1e-10);

        let mut dq = DVector::zeros(4);
        dq[3] = DEG;

        let result = internal_to_cartesian(&q, &dq, &x, &coords).expect("transform");
        assert!(result.converged);

        let q_new = coords.evaluate(&result.x);
        let mut target = &q + &dq;
        coords.wrap_periodic(&mut target);
        let residual = coords.difference(&target, &q_new);
        for idx in 0..coords.len() {
            assert!(residual[idx].abs() < 1e-4, "component {}", idx);
        }
    }

    #[test]
    fn big_water_step_needs_the_halving_fallback() {
        let (molecule, coords) = prepare(&right_angle_water());
        let x = molecule.to_cartesian();
        let q = coords.evaluate(&x);
        let dq = DVector::from_vec(vec![0.5, 0.5, 75.0 * DEG]);

        let single = internal_to_cartesian_single(&q, &dq, &x, &coords).expect("single");
        assert!(!single.converged);

        let full = internal_to_cartesian(&q, &dq, &x, &coords).expect("transform");
        assert!(full.converged);

        let q_new = coords.evaluate(&full.x);
        let residual = coords.difference(&(&q + &dq), &q_new);
        for idx in 0..coords.len() {
            assert!(residual[idx].abs() < 1e-4, "component {}", idx);
        }
    }

    #[test]
    fn near_right_angle_sweep_converges_with_halving() {
        let (molecule, coords) = prepare(&right_angle_water());
        let x = molecule.to_cartesian();
        let q = coords.evaluate(&x);
        let dq = DVector::from_vec(vec![0.5, 0.5, 89.0 * DEG]);

        let result = internal_to_cartesian(&q, &dq, &x, &coords).expect("transform");
        assert!(result.converged);

        let q_new = coords.evaluate(&result.x);
        let residual = coords.difference(&(&q + &dq), &q_new);
        for idx in 0..coords.len() {
            assert!(residual[idx].abs() < 1e-4, "component {}", idx);
        }
    }

    #[test]
    fn small_random_steps_round_trip_within_tolerance() {
        let (molecule, coords) = prepare(&hydrogen_peroxide());
        let x = molecule.to_cartesian();
        let q = coords.evaluate(&x);
        let mut rng = StdRng::seed_from_u64(29);

        for _ in 0..5 {
            let mut dq = DVector::from_fn(coords.len(), |_, _| rng.gen_range(-1.0..1.0));
            let norm = dq.norm();
            dq *= 0.05 / norm;

            let result = internal_to_cartesian(&q, &dq, &x, &coords).expect("transform");
            assert!(result.converged);

            let q_new = coords.evaluate(&result.x);
            let residual = coords.difference(&(&q + &dq), &q_new);
            assert!(linalg::rms(&residual) < 1e-4);
        }
    }

    #[test]
    fn ethanol_from_xyz_zero_step_reproduces_the_input() {
        const ETHANOL_XYZ: &str = "9\nethanol\n\
            C   0.00000  0.00000  0.00000\n\
            C   1.51200  0.00000  0.00000\n\
            O   1.98900  1.34916  0.00000\n\
            H   2.95388  1.33280  0.00000\n\
            H   1.87667 -0.51572  0.89325\n\
            H   1.87667 -0.51572 -0.89325\n\
            H  -0.36467 -1.03143  0.00000\n\
            H  -0.36467  0.51572  0.89325\n\
            H  -0.36467  0.51572 -0.89325\n";

        let molecule =
            crate::io::read_xyz(std::io::Cursor::new(ETHANOL_XYZ)).expect("parse ethanol");
        let coords = ConnectivityBuilder::new()
            .build(&molecule)
            .expect("connectivity")
            .into_coordinates();
        // 8 bonds, 13 angles, 12 dihedrals, 8 out-of-plane bends.
        assert_eq!(coords.len(), 41);

        let x = molecule.to_cartesian();
        let q = coords.evaluate(&x);
        let dq = DVector::zeros(coords.len());

        let result = internal_to_cartesian(&q, &dq, &x, &coords).expect("transform");

        assert!(result.converged);
        assert!(linalg::rms(&(result.x - x)) < 1e-10);
    }

    #[test]
    fn empty_coordinate_set_is_a_trivial_transform() {
        let coords = Coordinates::default();
        let x = DVector::from_vec(vec![1.0, 2.0, 3.0]);
        let empty = DVector::zeros(0);

        let result = internal_to_cartesian(&empty, &empty, &x, &coords).expect("transform");

        assert!(result.converged);
        assert_eq!(result.iterations, 0);
        assert_eq!(result.x, x);
    }
}
