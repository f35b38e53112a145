//! Writer for the plain XYZ format, the inverse of the reader: positions are
//! converted from bohr back to ångström.

use std::io::Write;

use crate::io::error::Error;
use crate::model::molecule::Molecule;
use crate::utils::units::BOHR_TO_ANGSTROM;

pub fn write<W: Write>(writer: &mut W, molecule: &Molecule, comment: &str) -> Result<(), Error> {
    writeln!(writer, "{}", molecule.atom_count())?;
    writeln!(writer, "{}", comment)?;

    for atom in molecule.iter_atoms() {
        writeln!(
            writer,
            "{:<2} {:>15.8} {:>15.8} {:>15.8}",
            atom.element.symbol(),
            atom.pos.x * BOHR_TO_ANGSTROM,
            atom.pos.y * BOHR_TO_ANGSTROM,
            atom.pos.z * BOHR_TO_ANGSTROM,
        )?;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::io::xyz::reader;
    use std::io::Cursor;

    #[test]
    fn write_then_read_round_trips_the_molecule() {
        let input = "2\nhydrogen\nH 0.0 0.0 0.0\nH 0.74 0.0 0.0\n";
        let molecule = reader::read(Cursor::new(input)).expect("parse");

        let mut buffer = Vec::new();
        write(&mut buffer, &molecule, "hydrogen").expect("write");
        let reread = reader::read(Cursor::new(buffer)).expect("reparse");

        assert_eq!(reread.atom_count(), molecule.atom_count());
        for (a, b) in molecule.iter_atoms().zip(reread.iter_atoms()) {
            assert_eq!(a.element, b.element);
            assert!((a.pos - b.pos).norm() < 1e-7);
        }
    }

    #[test]
    fn write_emits_header_comment_and_one_line_per_atom() {
        let input = "1\nc\nC 1.0 0.0 0.0\n";
        let molecule = reader::read(Cursor::new(input)).expect("parse");

        let mut buffer = Vec::new();
        write(&mut buffer, &molecule, "one carbon").expect("write");
        let text = String::from_utf8(buffer).expect("utf8");
        let lines: Vec<&str> = text.lines().collect();

        assert_eq!(lines.len(), 3);
        assert_eq!(lines[0], "1");
        assert_eq!(lines[1], "one carbon");
        assert!(lines[2].starts_with("C "));
    }
}
