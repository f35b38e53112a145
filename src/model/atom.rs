//! Fundamental atom representation comprising element identity and Cartesian position.
//!
//! Atoms are instantiated by the XYZ reader and consumed by connectivity
//! inference and the coordinate transforms. Distance helpers keep vector math
//! inside the type so every caller measures geometry the same way.

use nalgebra::Point3;
use std::fmt;

use super::element::Element;

/// Cartesian coordinate of an atomic position, in bohr after ingestion.
pub type Point = Point3<f64>;

/// An atom: chemical identity plus a position.
///
/// The element is immutable; the position changes only through whole-molecule
/// operations (unit conversion, back-transformation updates).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Atom {
    /// Chemical element, which fixes symbol and atomic number.
    pub element: Element,
    /// Cartesian position.
    pub pos: Point,
}

impl Atom {
    /// Creates an atom from an element and a position.
    pub fn new(element: Element, pos: Point) -> Self {
        Self { element, pos }
    }

    /// Euclidean distance to another atom.
    pub fn distance(&self, other: &Atom) -> f64 {
        nalgebra::distance(&self.pos, &other.pos)
    }

    /// Squared Euclidean distance to another atom.
    ///
    /// Prefer this when only comparing against cutoffs.
    pub fn distance_squared(&self, other: &Atom) -> f64 {
        nalgebra::distance_squared(&self.pos, &other.pos)
    }
}

impl fmt::Display for Atom {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} [{:.6}, {:.6}, {:.6}]",
            self.element, self.pos.x, self.pos.y, self.pos.z
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn atom_new_stores_element_and_position() {
        let atom = Atom::new(Element::O, Point::new(1.0, 2.0, 3.0));

        assert_eq!(atom.element, Element::O);
        assert_eq!(atom.pos, Point::new(1.0, 2.0, 3.0));
    }

    #[test]
    fn atom_distance_calculates_correctly() {
        let a = Atom::new(Element::H, Point::new(0.0, 0.0, 0.0));
        let b = Atom::new(Element::H, Point::new(3.0, 4.0, 0.0));

        assert!((a.distance(&b) - 5.0).abs() < 1e-12);
        assert!((a.distance_squared(&b) - 25.0).abs() < 1e-12);
    }

    #[test]
    fn atom_distance_is_zero_for_identical_positions() {
        let pos = Point::new(1.5, -2.3, 4.7);
        let a = Atom::new(Element::C, pos);
        let b = Atom::new(Element::N, pos);

        assert_eq!(a.distance(&b), 0.0);
    }

    #[test]
    fn atom_display_shows_symbol_and_position() {
        let atom = Atom::new(Element::C, Point::new(1.0, -2.0, 0.5));
        assert_eq!(format!("{}", atom), "C [1.000000, -2.000000, 0.500000]");
    }
}
