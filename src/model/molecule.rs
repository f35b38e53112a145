use nalgebra::DVector;

use super::atom::{Atom, Point};
use super::element::Element;

/// Ordered collection of atoms. An atom's index in this sequence is its
/// identity everywhere else in the crate.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Molecule {
    atoms: Vec<Atom>,
}

impl Molecule {
    pub fn new(atoms: Vec<Atom>) -> Self {
        Self { atoms }
    }

    pub fn from_symbols(entries: &[(Element, [f64; 3])]) -> Self {
        Self {
            atoms: entries
                .iter()
                .map(|&(element, [x, y, z])| Atom::new(element, Point::new(x, y, z)))
                .collect(),
        }
    }

    pub fn atom_count(&self) -> usize {
        self.atoms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.atoms.is_empty()
    }

    pub fn atom(&self, idx: usize) -> &Atom {
        &self.atoms[idx]
    }

    pub fn iter_atoms(&self) -> std::slice::Iter<'_, Atom> {
        self.atoms.iter()
    }

    /// Scales every position by `factor`, e.g. for ångström-to-bohr
    /// conversion at ingestion time.
    pub fn scale_positions(&mut self, factor: f64) {
        for atom in &mut self.atoms {
            atom.pos.coords *= factor;
        }
    }

    /// Flattens all positions into the canonical length-3n Cartesian vector
    /// `(x0, y0, z0, x1, ...)`.
    pub fn to_cartesian(&self) -> DVector<f64> {
        let mut x = DVector::zeros(3 * self.atoms.len());
        for (i, atom) in self.atoms.iter().enumerate() {
            x[3 * i] = atom.pos.x;
            x[3 * i + 1] = atom.pos.y;
            x[3 * i + 2] = atom.pos.z;
        }
        x
    }

    /// Replaces every position from a flat Cartesian vector.
    pub fn set_cartesian(&mut self, x: &DVector<f64>) {
        debug_assert_eq!(x.len(), 3 * self.atoms.len(), "Cartesian length mismatch");
        for (i, atom) in self.atoms.iter_mut().enumerate() {
            atom.pos = Point::new(x[3 * i], x[3 * i + 1], x[3 * i + 2]);
        }
    }
}
