use std::fs::File;
use std::io::{self as stdio, BufReader, BufWriter, Write};
use std::path::PathBuf;

use anyhow::{Context, Result};

use ircoord::{io as xyz_io, Molecule};

pub mod displace;
pub mod info;

/// Loads an XYZ molecule from the given path, or from stdin when absent.
pub fn load_molecule(input: &Option<PathBuf>) -> Result<Molecule> {
    match input {
        Some(path) => xyz_io::read_xyz_file(path)
            .with_context(|| format!("Failed to read molecule from '{}'", path.display())),
        None => {
            let stdin = stdio::stdin();
            xyz_io::read_xyz(BufReader::new(stdin.lock()))
                .context("Failed to read molecule from stdin")
        }
    }
}

/// Writes an XYZ molecule to the given path, or to stdout when absent.
pub fn save_molecule(output: &Option<PathBuf>, molecule: &Molecule, comment: &str) -> Result<()> {
    match output {
        Some(path) => {
            let file = File::create(path)
                .with_context(|| format!("Failed to create '{}'", path.display()))?;
            let mut writer = BufWriter::new(file);
            xyz_io::write_xyz(&mut writer, molecule, comment)
                .with_context(|| format!("Failed to write '{}'", path.display()))?;
            writer.flush().context("Failed to flush output file")
        }
        None => {
            let stdout = stdio::stdout();
            let mut lock = stdout.lock();
            xyz_io::write_xyz(&mut lock, molecule, comment)
                .context("Failed to write molecule to stdout")?;
            lock.flush().context("Failed to flush stdout")
        }
    }
}
