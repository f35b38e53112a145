//! Periodic-table data used by connectivity inference.
//!
//! The element type carries its atomic number in the `repr(u8)` discriminant,
//! so symbol and atomic number can never disagree. Covalent and Van der Waals
//! radii are stored as flat tables indexed by atomic number and are the only
//! empirical inputs to bond detection.

use std::fmt;
use std::str::FromStr;

use crate::utils::units::ANGSTROM_TO_BOHR;

/// Chemical element with its atomic number as discriminant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
#[rustfmt::skip]
pub enum Element {
    H = 1, He,
    Li, Be, B, C, N, O, F, Ne,
    Na, Mg, Al, Si, P, S, Cl, Ar,
    K, Ca, Sc, Ti, V, Cr, Mn, Fe, Co, Ni, Cu, Zn, Ga, Ge, As, Se, Br, Kr,
    Rb, Sr, Y, Zr, Nb, Mo, Tc, Ru, Rh, Pd, Ag, Cd, In, Sn, Sb, Te, I, Xe,
    Cs, Ba,
    La, Ce, Pr, Nd, Pm, Sm, Eu, Gd, Tb, Dy, Ho, Er, Tm, Yb, Lu,
    Hf, Ta, W, Re, Os, Ir, Pt, Au, Hg, Tl, Pb, Bi, Po, At, Rn,
    Fr, Ra,
    Ac, Th, Pa, U, Np, Pu, Am, Cm, Bk, Cf, Es, Fm, Md, No, Lr,
    Rf, Db, Sg, Bh, Hs, Mt, Ds, Rg, Cn, Nh, Fl, Mc, Lv, Ts, Og,
}

/// Every element in atomic-number order, for discriminant-based lookup.
#[rustfmt::skip]
const ELEMENTS: [Element; 118] = [
    Element::H, Element::He,
    Element::Li, Element::Be, Element::B, Element::C, Element::N, Element::O,
    Element::F, Element::Ne,
    Element::Na, Element::Mg, Element::Al, Element::Si, Element::P, Element::S,
    Element::Cl, Element::Ar,
    Element::K, Element::Ca, Element::Sc, Element::Ti, Element::V, Element::Cr,
    Element::Mn, Element::Fe, Element::Co, Element::Ni, Element::Cu, Element::Zn,
    Element::Ga, Element::Ge, Element::As, Element::Se, Element::Br, Element::Kr,
    Element::Rb, Element::Sr, Element::Y, Element::Zr, Element::Nb, Element::Mo,
    Element::Tc, Element::Ru, Element::Rh, Element::Pd, Element::Ag, Element::Cd,
    Element::In, Element::Sn, Element::Sb, Element::Te, Element::I, Element::Xe,
    Element::Cs, Element::Ba,
    Element::La, Element::Ce, Element::Pr, Element::Nd, Element::Pm, Element::Sm,
    Element::Eu, Element::Gd, Element::Tb, Element::Dy, Element::Ho, Element::Er,
    Element::Tm, Element::Yb, Element::Lu,
    Element::Hf, Element::Ta, Element::W, Element::Re, Element::Os, Element::Ir,
    Element::Pt, Element::Au, Element::Hg, Element::Tl, Element::Pb, Element::Bi,
    Element::Po, Element::At, Element::Rn,
    Element::Fr, Element::Ra,
    Element::Ac, Element::Th, Element::Pa, Element::U, Element::Np, Element::Pu,
    Element::Am, Element::Cm, Element::Bk, Element::Cf, Element::Es, Element::Fm,
    Element::Md, Element::No, Element::Lr,
    Element::Rf, Element::Db, Element::Sg, Element::Bh, Element::Hs, Element::Mt,
    Element::Ds, Element::Rg, Element::Cn, Element::Nh, Element::Fl, Element::Mc,
    Element::Lv, Element::Ts, Element::Og,
];

/// IUPAC symbols indexed by atomic number minus one.
#[rustfmt::skip]
const SYMBOLS: [&str; 118] = [
    "H", "He",
    "Li", "Be", "B", "C", "N", "O", "F", "Ne",
    "Na", "Mg", "Al", "Si", "P", "S", "Cl", "Ar",
    "K", "Ca", "Sc", "Ti", "V", "Cr", "Mn", "Fe", "Co", "Ni", "Cu", "Zn",
    "Ga", "Ge", "As", "Se", "Br", "Kr",
    "Rb", "Sr", "Y", "Zr", "Nb", "Mo", "Tc", "Ru", "Rh", "Pd", "Ag", "Cd",
    "In", "Sn", "Sb", "Te", "I", "Xe",
    "Cs", "Ba",
    "La", "Ce", "Pr", "Nd", "Pm", "Sm", "Eu", "Gd", "Tb", "Dy", "Ho", "Er",
    "Tm", "Yb", "Lu",
    "Hf", "Ta", "W", "Re", "Os", "Ir", "Pt", "Au", "Hg", "Tl", "Pb", "Bi",
    "Po", "At", "Rn",
    "Fr", "Ra",
    "Ac", "Th", "Pa", "U", "Np", "Pu", "Am", "Cm", "Bk", "Cf", "Es", "Fm",
    "Md", "No", "Lr",
    "Rf", "Db", "Sg", "Bh", "Hs", "Mt", "Ds", "Rg", "Cn", "Nh", "Fl", "Mc",
    "Lv", "Ts", "Og",
];

/// Covalent radii in ångström (Cordero et al., low-spin values for the 3d
/// metals; Pyykkö single-bond radii past curium), indexed by atomic number
/// minus one.
#[rustfmt::skip]
const COVALENT_RADII: [f64; 118] = [
    0.31, 0.28,
    1.28, 0.96, 0.84, 0.76, 0.71, 0.66, 0.57, 0.58,
    1.66, 1.41, 1.21, 1.11, 1.07, 1.05, 1.02, 1.06,
    2.03, 1.76, 1.70, 1.60, 1.53, 1.39, 1.39, 1.32, 1.26, 1.24, 1.32, 1.22,
    1.22, 1.20, 1.19, 1.20, 1.20, 1.16,
    2.20, 1.95, 1.90, 1.75, 1.64, 1.54, 1.47, 1.46, 1.42, 1.39, 1.45, 1.44,
    1.42, 1.39, 1.39, 1.38, 1.39, 1.40,
    2.44, 2.15,
    2.07, 2.04, 2.03, 2.01, 1.99, 1.98, 1.98, 1.96, 1.94, 1.92, 1.92, 1.89,
    1.90, 1.87, 1.87,
    1.75, 1.70, 1.62, 1.51, 1.44, 1.41, 1.36, 1.36, 1.32, 1.45, 1.46, 1.48,
    1.40, 1.50, 1.50,
    2.60, 2.21,
    2.15, 2.06, 2.00, 1.96, 1.90, 1.87, 1.80, 1.69, 1.68, 1.68, 1.65, 1.67,
    1.73, 1.76, 1.61,
    1.57, 1.49, 1.43, 1.41, 1.34, 1.29, 1.28, 1.21, 1.22, 1.36, 1.43, 1.62,
    1.75, 1.65, 1.57,
];

/// Van der Waals radii in ångström (Bondi, with the Alvarez extension for
/// elements Bondi does not cover; a generic 2.0 Å placeholder for the
/// superheavy block), indexed by atomic number minus one.
#[rustfmt::skip]
const VDW_RADII: [f64; 118] = [
    1.20, 1.40,
    1.82, 1.53, 1.92, 1.70, 1.55, 1.52, 1.47, 1.54,
    2.27, 1.73, 1.84, 2.10, 1.80, 1.80, 1.75, 1.88,
    2.75, 2.31, 2.15, 2.11, 2.07, 2.06, 2.05, 2.04, 2.00, 1.97, 1.96, 2.01,
    1.87, 2.11, 1.85, 1.90, 1.85, 2.02,
    3.03, 2.49, 2.32, 2.23, 2.18, 2.17, 2.16, 2.13, 2.10, 2.10, 2.11, 2.18,
    1.93, 2.17, 2.06, 2.06, 1.98, 2.16,
    3.43, 2.68,
    2.43, 2.42, 2.40, 2.39, 2.38, 2.36, 2.35, 2.34, 2.33, 2.31, 2.30, 2.29,
    2.27, 2.26, 2.24,
    2.23, 2.22, 2.18, 2.16, 2.16, 2.13, 2.13, 2.14, 2.23, 1.96, 2.02, 2.07,
    1.97, 2.02, 2.20,
    3.48, 2.83,
    2.47, 2.45, 2.43, 2.41, 2.39, 2.43, 2.44, 2.45, 2.44, 2.45, 2.45, 2.45,
    2.46, 2.46, 2.46,
    2.00, 2.00, 2.00, 2.00, 2.00, 2.00, 2.00, 2.00, 2.00, 2.00, 2.00, 2.00,
    2.00, 2.00, 2.00,
];

impl Element {
    /// Atomic number, 1 through 118.
    pub fn atomic_number(self) -> u8 {
        self as u8
    }

    /// Looks up an element by atomic number.
    pub fn from_atomic_number(z: u8) -> Option<Self> {
        if z == 0 {
            return None;
        }
        ELEMENTS.get(z as usize - 1).copied()
    }

    /// Looks up an element by IUPAC symbol, case-sensitive.
    pub fn from_symbol(symbol: &str) -> Option<Self> {
        SYMBOLS
            .iter()
            .position(|&s| s == symbol)
            .map(|idx| ELEMENTS[idx])
    }

    /// IUPAC element symbol.
    pub fn symbol(self) -> &'static str {
        SYMBOLS[self as usize - 1]
    }

    /// Covalent radius in bohr.
    ///
    /// Bond detection declares two atoms bonded when their distance falls
    /// below a multiple of the sum of their covalent radii.
    pub fn covalent_radius(self) -> f64 {
        COVALENT_RADII[self as usize - 1] * ANGSTROM_TO_BOHR
    }

    /// Van der Waals radius in bohr, used as the outer cutoff for hydrogen
    /// bonds.
    pub fn vdw_radius(self) -> f64 {
        VDW_RADII[self as usize - 1] * ANGSTROM_TO_BOHR
    }

    /// Whether this element is hydrogen.
    pub fn is_hydrogen(self) -> bool {
        self == Element::H
    }

    /// Whether this element can donate or accept a hydrogen bond
    /// (N, O, F, P, S, or Cl).
    pub fn is_hbond_partner(self) -> bool {
        matches!(
            self,
            Element::N | Element::O | Element::F | Element::P | Element::S | Element::Cl
        )
    }
}

impl fmt::Display for Element {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.symbol())
    }
}

impl FromStr for Element {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Element::from_symbol(s).ok_or_else(|| format!("unknown element symbol '{}'", s))
    }
}
