//! Reader for the plain XYZ format.
//!
//! Line one holds the atom count, line two a free-form comment, and every
//! following non-empty line an element symbol with three coordinates in
//! ångström. The returned molecule is converted to bohr; extra columns and
//! trailing lines beyond the declared count are ignored.

use std::io::BufRead;

use crate::io::error::Error;
use crate::model::atom::{Atom, Point};
use crate::model::element::Element;
use crate::model::molecule::Molecule;
use crate::utils::units::ANGSTROM_TO_BOHR;

pub fn read<R: BufRead>(reader: R) -> Result<Molecule, Error> {
    let mut lines = reader.lines().enumerate();

    let declared = loop {
        let (idx, line_res) = lines
            .next()
            .ok_or_else(|| Error::parse(1, "missing atom-count header"))?;
        let line = line_res?;
        let trimmed = line.trim();
        if trimmed.is_empty() {
            continue;
        }
        break trimmed.parse::<usize>().map_err(|_| {
            Error::parse(idx + 1, format!("invalid atom count '{}'", trimmed))
        })?;
    };

    // Comment line, ignored. Its absence only matters when atoms were
    // declared.
    match lines.next() {
        Some((_, line_res)) => {
            line_res?;
        }
        None if declared > 0 => {
            return Err(Error::AtomCountMismatch { declared, found: 0 });
        }
        None => {}
    }

    let mut atoms = Vec::with_capacity(declared);
    for (idx, line_res) in lines {
        if atoms.len() == declared {
            break;
        }
        let line = line_res?;
        let trimmed = line.trim();
        if trimmed.is_empty() {
            continue;
        }
        atoms.push(parse_atom_line(trimmed, idx + 1)?);
    }

    if atoms.len() < declared {
        return Err(Error::AtomCountMismatch {
            declared,
            found: atoms.len(),
        });
    }

    let mut molecule = Molecule::new(atoms);
    molecule.scale_positions(ANGSTROM_TO_BOHR);
    Ok(molecule)
}

fn parse_atom_line(line: &str, line_number: usize) -> Result<Atom, Error> {
    let mut tokens = line.split_whitespace();

    let symbol = tokens
        .next()
        .ok_or_else(|| Error::parse(line_number, "empty atom record"))?;
    let element = Element::from_symbol(symbol)
        .ok_or_else(|| Error::unknown_element(symbol, line_number))?;

    let mut coordinates = [0.0; 3];
    for (axis, slot) in coordinates.iter_mut().enumerate() {
        let token = tokens.next().ok_or_else(|| {
            Error::parse(
                line_number,
                format!("atom record has only {} coordinate(s)", axis),
            )
        })?;
        *slot = token.parse::<f64>().map_err(|_| {
            Error::parse(line_number, format!("invalid coordinate '{}'", token))
        })?;
    }

    Ok(Atom::new(
        element,
        Point::new(coordinates[0], coordinates[1], coordinates[2]),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn read_parses_a_water_file_and_converts_to_bohr() {
        let input = "3\nwater\nO 0.0 0.0 0.0\nH 0.9572 0.0 0.0\nH -0.2397 0.9267 0.0\n";
        let molecule = read(Cursor::new(input)).expect("parse");

        assert_eq!(molecule.atom_count(), 3);
        assert_eq!(molecule.atom(0).element, Element::O);
        assert_eq!(molecule.atom(1).element, Element::H);
        assert!((molecule.atom(1).pos.x - 0.9572 * ANGSTROM_TO_BOHR).abs() < 1e-12);
        assert!((molecule.atom(2).pos.y - 0.9267 * ANGSTROM_TO_BOHR).abs() < 1e-12);
    }

    #[test]
    fn read_ignores_extra_columns_and_trailing_lines() {
        let input = "1\ncomment\nC 1.0 2.0 3.0 extra tokens\nH 0.0 0.0 0.0\n";
        let molecule = read(Cursor::new(input)).expect("parse");

        assert_eq!(molecule.atom_count(), 1);
        assert_eq!(molecule.atom(0).element, Element::C);
    }

    #[test]
    fn read_skips_blank_lines_between_atoms() {
        let input = "2\ncomment\nH 0.0 0.0 0.0\n\nH 1.0 0.0 0.0\n";
        let molecule = read(Cursor::new(input)).expect("parse");

        assert_eq!(molecule.atom_count(), 2);
    }

    #[test]
    fn read_rejects_an_unknown_element_symbol() {
        let input = "1\ncomment\nXx 0.0 0.0 0.0\n";
        let err = read(Cursor::new(input)).unwrap_err();

        match err {
            Error::UnknownElement {
                symbol,
                line_number,
            } => {
                assert_eq!(symbol, "Xx");
                assert_eq!(line_number, 3);
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn read_rejects_fewer_atoms_than_declared() {
        let input = "3\ncomment\nH 0.0 0.0 0.0\nH 1.0 0.0 0.0\n";
        let err = read(Cursor::new(input)).unwrap_err();

        match err {
            Error::AtomCountMismatch { declared, found } => {
                assert_eq!(declared, 3);
                assert_eq!(found, 2);
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn read_rejects_a_malformed_header() {
        let input = "not-a-number\ncomment\n";
        let err = read(Cursor::new(input)).unwrap_err();
        assert!(matches!(err, Error::Parse { line_number: 1, .. }));
    }

    #[test]
    fn read_rejects_a_malformed_coordinate() {
        let input = "1\ncomment\nH 0.0 oops 0.0\n";
        let err = read(Cursor::new(input)).unwrap_err();
        assert!(matches!(err, Error::Parse { line_number: 3, .. }));
    }

    #[test]
    fn read_rejects_a_truncated_atom_record() {
        let input = "1\ncomment\nH 0.0 0.0\n";
        let err = read(Cursor::new(input)).unwrap_err();
        assert!(matches!(err, Error::Parse { line_number: 3, .. }));
    }
}
