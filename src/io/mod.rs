//! XYZ ingestion and emission.
//!
//! The reader accepts ångström input and produces molecules in bohr; the
//! writer is its inverse. File-based conveniences attach the offending path
//! to I/O errors.

mod error;
mod xyz;

use std::fs::File;
use std::io::{BufRead, BufReader, Write};
use std::path::Path;

use crate::model::molecule::Molecule;

pub use error::Error;

/// Reads a molecule in XYZ format from any buffered reader.
pub fn read_xyz<R: BufRead>(reader: R) -> Result<Molecule, Error> {
    xyz::reader::read(reader)
}

/// Reads a molecule in XYZ format from a file path.
pub fn read_xyz_file<P: AsRef<Path>>(path: P) -> Result<Molecule, Error> {
    let path = path.as_ref();
    let file = File::open(path).map_err(|e| Error::file(path, e))?;
    read_xyz(BufReader::new(file))
}

/// Writes a molecule in XYZ format (ångström) with the given comment line.
pub fn write_xyz<W: Write>(
    writer: &mut W,
    molecule: &Molecule,
    comment: &str,
) -> Result<(), Error> {
    xyz::writer::write(writer, molecule, comment)
}
