//! Internal coordinate definitions and their scalar evaluation.
//!
//! Five coordinate kinds cover the redundant internal description of a
//! molecule: bond lengths, bond angles, dihedral torsions, linear bends, and
//! out-of-plane bends. Each type stores atom indices into the flat Cartesian
//! vector and knows how to evaluate its own value; the [`Coordinates`]
//! collection fixes the canonical ordering (bonds, angles, dihedrals, linear
//! bends, out-of-plane bends) used by the Wilson matrix and both transforms.

use nalgebra::{DVector, Vector3};

use crate::utils::math::wrap_to_pi;

/// Extracts the position of atom `idx` from a flat Cartesian vector.
pub(crate) fn position(x: &DVector<f64>, idx: usize) -> Vector3<f64> {
    Vector3::new(x[3 * idx], x[3 * idx + 1], x[3 * idx + 2])
}

/// Angle at `vertex` between the directions toward `a` and `b`, in [0, pi].
pub(crate) fn vertex_angle(a: &Vector3<f64>, vertex: &Vector3<f64>, b: &Vector3<f64>) -> f64 {
    let u = a - vertex;
    let v = b - vertex;
    let cos = (u.dot(&v) / (u.norm() * v.norm())).clamp(-1.0, 1.0);
    cos.acos()
}

/// Bond between atoms `i` and `j`, stored with `i < j`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Bond {
    pub i: usize,
    pub j: usize,
}

impl Bond {
    /// Creates a bond, canonicalizing the endpoint order.
    pub fn new(i: usize, j: usize) -> Self {
        if i <= j {
            Self { i, j }
        } else {
            Self { i: j, j: i }
        }
    }

    /// Bond length `|r_i - r_j|`.
    pub fn value(&self, x: &DVector<f64>) -> f64 {
        (position(x, self.i) - position(x, self.j)).norm()
    }
}

/// Angle over atoms `(i, k, j)` with `k` at the vertex.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Angle {
    pub i: usize,
    pub k: usize,
    pub j: usize,
}

impl Angle {
    /// Creates an angle, canonicalizing the terminal order (`i < j`); the
    /// angle is symmetric under their exchange.
    pub fn new(i: usize, k: usize, j: usize) -> Self {
        if i <= j {
            Self { i, k, j }
        } else {
            Self { i: j, k, j: i }
        }
    }

    /// Angle value in [0, pi] via the clamped arccosine.
    pub fn value(&self, x: &DVector<f64>) -> f64 {
        vertex_angle(
            &position(x, self.i),
            &position(x, self.k),
            &position(x, self.j),
        )
    }
}

/// Dihedral over the chain `i - k - l - j`; `k` and `l` form the central bond.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Dihedral {
    pub i: usize,
    pub k: usize,
    pub l: usize,
    pub j: usize,
}

impl Dihedral {
    pub fn new(i: usize, k: usize, l: usize, j: usize) -> Self {
        Self { i, k, l, j }
    }

    /// Signed torsion in `(-pi, pi]`.
    ///
    /// Computed through the atan2 branch so the sign survives near-planar
    /// configurations that would defeat an arccosine formulation.
    pub fn value(&self, x: &DVector<f64>) -> f64 {
        let b1 = position(x, self.i) - position(x, self.k);
        let b2 = position(x, self.k) - position(x, self.l);
        let b3 = position(x, self.l) - position(x, self.j);

        let n1 = b1.cross(&b2).normalize();
        let n2 = b2.cross(&b3).normalize();
        let m = n1.cross(&(b2 / b2.norm()));

        n2.dot(&m).atan2(n1.dot(&n2))
    }
}

/// One component of a quasi-linear bend over atoms `(i, k, j)`.
///
/// A near-180-degree angle has a derivative that degenerates in the bending
/// direction, so each physical bend is carried as two of these, tagged with
/// orthogonal complement axes. The tag is fixed at enumeration time.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LinearAngle {
    pub i: usize,
    pub k: usize,
    pub j: usize,
    /// Unit complement axis; the coordinate measures bending within the
    /// plane orthogonal to it.
    pub axis: Vector3<f64>,
}

impl LinearAngle {
    pub fn new(i: usize, k: usize, j: usize, axis: Vector3<f64>) -> Self {
        Self { i, k, j, axis }
    }

    /// Signed angle between the two arm vectors after projection into the
    /// plane orthogonal to the tag axis, in `(-pi, pi]`.
    ///
    /// Equals pi at exact linearity and stays smooth through it: bending
    /// within the measured plane moves the value continuously across the
    /// +pi/-pi branch cut, while bending out of the measured plane leaves it
    /// unchanged. The projections are taken by crossing each arm with the
    /// axis, which never degenerates because the axis is orthogonal to the
    /// arms by construction.
    pub fn value(&self, x: &DVector<f64>) -> f64 {
        let u = position(x, self.i) - position(x, self.k);
        let v = position(x, self.j) - position(x, self.k);

        let a = u.cross(&self.axis);
        let b = v.cross(&self.axis);

        let cos = a.dot(&b);
        let sin = a.cross(&b).dot(&self.axis);

        sin.atan2(cos)
    }
}

/// Out-of-plane bend of the bond `c -> i` against the plane spanned by
/// `c -> j` and `c -> k`, with `c` the central atom.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct OutOfPlaneBend {
    pub c: usize,
    pub i: usize,
    pub j: usize,
    pub k: usize,
}

impl OutOfPlaneBend {
    pub fn new(c: usize, i: usize, j: usize, k: usize) -> Self {
        Self { c, i, j, k }
    }

    /// Signed elevation of `c -> i` above the `(c -> j, c -> k)` plane, in
    /// [-pi/2, pi/2], via the arcsine of the normalized triple product.
    pub fn value(&self, x: &DVector<f64>) -> f64 {
        let vi = position(x, self.i) - position(x, self.c);
        let vj = position(x, self.j) - position(x, self.c);
        let vk = position(x, self.k) - position(x, self.c);

        let normal = vj.cross(&vk);
        let sin = (normal.dot(&vi) / (normal.norm() * vi.norm())).clamp(-1.0, 1.0);

        sin.asin()
    }
}

/// The full set of internal coordinates for one molecule, in canonical order.
#[derive(Debug, Clone, Default)]
pub struct Coordinates {
    bonds: Vec<Bond>,
    angles: Vec<Angle>,
    dihedrals: Vec<Dihedral>,
    linear_angles: Vec<LinearAngle>,
    oop_bends: Vec<OutOfPlaneBend>,
}

impl Coordinates {
    pub fn new(
        bonds: Vec<Bond>,
        angles: Vec<Angle>,
        dihedrals: Vec<Dihedral>,
        linear_angles: Vec<LinearAngle>,
        oop_bends: Vec<OutOfPlaneBend>,
    ) -> Self {
        Self {
            bonds,
            angles,
            dihedrals,
            linear_angles,
            oop_bends,
        }
    }

    pub fn bonds(&self) -> &[Bond] {
        &self.bonds
    }

    pub fn angles(&self) -> &[Angle] {
        &self.angles
    }

    pub fn dihedrals(&self) -> &[Dihedral] {
        &self.dihedrals
    }

    pub fn linear_angles(&self) -> &[LinearAngle] {
        &self.linear_angles
    }

    pub fn oop_bends(&self) -> &[OutOfPlaneBend] {
        &self.oop_bends
    }

    /// Total number of internal coordinates.
    pub fn len(&self) -> usize {
        self.bonds.len()
            + self.angles.len()
            + self.dihedrals.len()
            + self.linear_angles.len()
            + self.oop_bends.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Whether the coordinate at `index` is periodic, i.e. lives on the
    /// `(-pi, pi]` circle. True exactly for dihedrals and linear bends;
    /// bond lengths, ordinary angles, and out-of-plane bends are never
    /// wrapped.
    pub fn is_periodic(&self, index: usize) -> bool {
        let start = self.bonds.len() + self.angles.len();
        let end = start + self.dihedrals.len() + self.linear_angles.len();
        (start..end).contains(&index)
    }

    /// Evaluates every coordinate at the Cartesian geometry `x`, in
    /// canonical order.
    pub fn evaluate(&self, x: &DVector<f64>) -> DVector<f64> {
        let mut q = DVector::zeros(self.len());
        let mut offset = 0;

        for bond in &self.bonds {
            q[offset] = bond.value(x);
            offset += 1;
        }
        for angle in &self.angles {
            q[offset] = angle.value(x);
            offset += 1;
        }
        for dihedral in &self.dihedrals {
            q[offset] = dihedral.value(x);
            offset += 1;
        }
        for linear in &self.linear_angles {
            q[offset] = linear.value(x);
            offset += 1;
        }
        for bend in &self.oop_bends {
            q[offset] = bend.value(x);
            offset += 1;
        }

        q
    }

    /// Component-wise `target - current`, re-entering periodic components
    /// into `(-pi, pi]`.
    pub fn difference(&self, target: &DVector<f64>, current: &DVector<f64>) -> DVector<f64> {
        debug_assert_eq!(target.len(), self.len());
        debug_assert_eq!(current.len(), self.len());

        DVector::from_fn(self.len(), |idx, _| {
            let delta = target[idx] - current[idx];
            if self.is_periodic(idx) {
                wrap_to_pi(delta)
            } else {
                delta
            }
        })
    }

    /// Wraps the periodic components of a coordinate vector in place.
    pub fn wrap_periodic(&self, q: &mut DVector<f64>) {
        for idx in 0..q.len() {
            if self.is_periodic(idx) {
                q[idx] = wrap_to_pi(q[idx]);
            }
        }
    }
}
