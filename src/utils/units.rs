//! Length-unit conversion constants.
//!
//! All geometry inside the crate is expressed in bohr; ångström appears only
//! at the XYZ boundary and in human-readable reports.

/// Conversion factor from ångström to bohr (CODATA 2018).
pub const ANGSTROM_TO_BOHR: f64 = 1.889_726_133_921_251_7;

/// Conversion factor from bohr to ångström.
pub const BOHR_TO_ANGSTROM: f64 = 1.0 / ANGSTROM_TO_BOHR;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn conversion_factors_are_reciprocal() {
        assert!((ANGSTROM_TO_BOHR * BOHR_TO_ANGSTROM - 1.0).abs() < 1e-15);
    }

    #[test]
    fn angstrom_to_bohr_matches_reference_value() {
        assert!((ANGSTROM_TO_BOHR - 1.8897261339).abs() < 1e-9);
    }
}
