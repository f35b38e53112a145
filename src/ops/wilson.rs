//! Wilson B-matrix construction.
//!
//! The B matrix is the Jacobian of the internal coordinates with respect to
//! the Cartesian components: one row per coordinate in canonical order, three
//! columns per atom. Every row comes from the closed-form first derivative
//! of the corresponding value formula in [`crate::model::coordinate`], so
//! `B * dx` matches `q(x + dx) - q(x)` to first order by construction. Rows
//! are independent and assemble in parallel when the `parallel` feature is
//! enabled.

use nalgebra::{DMatrix, DVector, Vector3};

use crate::model::coordinate::{
    position, Angle, Bond, Coordinates, Dihedral, LinearAngle, OutOfPlaneBend,
};
use crate::utils::parallel::*;

/// Per-atom contributions of one coordinate's gradient.
type RowGradients = Vec<(usize, Vector3<f64>)>;

/// Assembles the Wilson B matrix for `coords` at the geometry `x`.
pub fn wilson_matrix(x: &DVector<f64>, coords: &Coordinates) -> DMatrix<f64> {
    let rows: Vec<RowGradients> = (0..coords.len())
        .into_par_iter()
        .map(|row| row_gradients(x, coords, row))
        .collect();

    let mut b = DMatrix::zeros(coords.len(), x.len());
    for (row, gradients) in rows.iter().enumerate() {
        for (atom, gradient) in gradients {
            b[(row, 3 * atom)] = gradient.x;
            b[(row, 3 * atom + 1)] = gradient.y;
            b[(row, 3 * atom + 2)] = gradient.z;
        }
    }
    b
}

/// Dispatches a global row index to the gradient of the owning coordinate.
fn row_gradients(x: &DVector<f64>, coords: &Coordinates, row: usize) -> RowGradients {
    let mut idx = row;

    if idx < coords.bonds().len() {
        return bond_gradients(&coords.bonds()[idx], x);
    }
    idx -= coords.bonds().len();

    if idx < coords.angles().len() {
        return angle_gradients(&coords.angles()[idx], x);
    }
    idx -= coords.angles().len();

    if idx < coords.dihedrals().len() {
        return dihedral_gradients(&coords.dihedrals()[idx], x);
    }
    idx -= coords.dihedrals().len();

    if idx < coords.linear_angles().len() {
        return linear_angle_gradients(&coords.linear_angles()[idx], x);
    }
    idx -= coords.linear_angles().len();

    oop_bend_gradients(&coords.oop_bends()[idx], x)
}

/// Bond gradient: the unit vector along the bond, with opposite signs on the
/// two endpoints.
fn bond_gradients(bond: &Bond, x: &DVector<f64>) -> RowGradients {
    let u = position(x, bond.i) - position(x, bond.j);
    let unit = u / u.norm();

    vec![(bond.i, unit), (bond.j, -unit)]
}

/// Angle gradient at the two terminals and the vertex.
///
/// Terminal rows are the in-plane perpendiculars `(cos t * u - v) / (|u| sin t)`
/// over unit arm vectors; the vertex row follows from translation
/// invariance. Quasi-linear angles never reach this function, so the
/// `sin t` denominator stays well away from zero.
fn angle_gradients(angle: &Angle, x: &DVector<f64>) -> RowGradients {
    let u = position(x, angle.i) - position(x, angle.k);
    let v = position(x, angle.j) - position(x, angle.k);

    let norm_u = u.norm();
    let norm_v = v.norm();
    let unit_u = u / norm_u;
    let unit_v = v / norm_v;

    let cos_t = unit_u.dot(&unit_v).clamp(-1.0, 1.0);
    let sin_t = (1.0 - cos_t * cos_t).sqrt();

    let grad_i = (unit_u * cos_t - unit_v) / (norm_u * sin_t);
    let grad_j = (unit_v * cos_t - unit_u) / (norm_v * sin_t);

    vec![(angle.i, grad_i), (angle.j, grad_j), (angle.k, -grad_i - grad_j)]
}

/// Dihedral gradient in the same sign convention as the atan2 value formula.
///
/// Terminal rows point along the plane normals scaled by `|b2| / |n|^2`; the
/// central rows are the translation-invariant linear combination of the
/// terminal rows (Wilson–Decius–Cross closed form).
fn dihedral_gradients(dihedral: &Dihedral, x: &DVector<f64>) -> RowGradients {
    let b1 = position(x, dihedral.i) - position(x, dihedral.k);
    let b2 = position(x, dihedral.k) - position(x, dihedral.l);
    let b3 = position(x, dihedral.l) - position(x, dihedral.j);

    let n1 = b1.cross(&b2);
    let n2 = b2.cross(&b3);
    let norm_b2 = b2.norm();

    let grad_i = -n1 * (norm_b2 / n1.norm_squared());
    let grad_j = n2 * (norm_b2 / n2.norm_squared());

    let p = -b1.dot(&b2) / b2.norm_squared();
    let q = -b3.dot(&b2) / b2.norm_squared();
    let grad_k = grad_i * (p - 1.0) - grad_j * q;
    let grad_l = grad_j * (q - 1.0) - grad_i * p;

    vec![
        (dihedral.i, grad_i),
        (dihedral.k, grad_k),
        (dihedral.l, grad_l),
        (dihedral.j, grad_j),
    ]
}

/// Linear-bend gradient: the exact differential of the projected-atan2
/// value.
///
/// With `a = u x w`, `b = v x w` the value is `atan2((a x b) . w, a . b)`,
/// whose gradient in `u` is `(c * b - s * (w x b)) / (c^2 + s^2)` (and the
/// mirrored expression in `v`). No term degenerates at linearity.
fn linear_angle_gradients(linear: &LinearAngle, x: &DVector<f64>) -> RowGradients {
    let u = position(x, linear.i) - position(x, linear.k);
    let v = position(x, linear.j) - position(x, linear.k);
    let w = linear.axis;

    let a = u.cross(&w);
    let b = v.cross(&w);

    let cos = a.dot(&b);
    let sin = a.cross(&b).dot(&w);
    let denom = cos * cos + sin * sin;

    let grad_i = (b * cos - w.cross(&b) * sin) / denom;
    let grad_j = (-a * cos - w.cross(&a) * sin) / denom;

    vec![
        (linear.i, grad_i),
        (linear.j, grad_j),
        (linear.k, -grad_i - grad_j),
    ]
}

/// Out-of-plane bend gradient: differential of the arcsine of the
/// normalized triple product.
fn oop_bend_gradients(bend: &OutOfPlaneBend, x: &DVector<f64>) -> RowGradients {
    let vi = position(x, bend.i) - position(x, bend.c);
    let vj = position(x, bend.j) - position(x, bend.c);
    let vk = position(x, bend.k) - position(x, bend.c);

    let normal = vj.cross(&vk);
    let norm_n = normal.norm();
    let norm_i = vi.norm();
    let triple = normal.dot(&vi);

    let sin_psi = (triple / (norm_n * norm_i)).clamp(-1.0, 1.0);
    // A bond exactly perpendicular to the reference plane has no defined
    // bending direction; keep the denominator finite instead of emitting NaN.
    let cos_psi = (1.0 - sin_psi * sin_psi).sqrt().max(1e-12);

    let grad_sin_i = (normal / norm_n - vi * (sin_psi / norm_i)) / norm_i;
    let grad_sin_j =
        (vk.cross(&vi) - vk.cross(&normal) * (triple / (norm_n * norm_n))) / (norm_n * norm_i);
    let grad_sin_k =
        (vi.cross(&vj) - normal.cross(&vj) * (triple / (norm_n * norm_n))) / (norm_n * norm_i);

    let grad_i = grad_sin_i / cos_psi;
    let grad_j = grad_sin_j / cos_psi;
    let grad_k = grad_sin_k / cos_psi;

    vec![
        (bend.i, grad_i),
        (bend.j, grad_j),
        (bend.k, grad_k),
        (bend.c, -grad_i - grad_j - grad_k),
    ]
}
