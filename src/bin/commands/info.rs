use std::io::{self, Write};

use anyhow::{Context, Result};
use clap::Args;
use prettytable::{format, row, Table};

use ircoord::utils::units::BOHR_TO_ANGSTROM;
use ircoord::{Connectivity, ConnectivityBuilder, Molecule};

/// Report-only command listing every internal coordinate with its value.
#[derive(Debug, Default, Args)]
pub struct InfoArgs {}

pub fn run(molecule: &Molecule, _args: &InfoArgs) -> Result<()> {
    let connectivity = ConnectivityBuilder::new()
        .build(molecule)
        .context("Failed to infer connectivity")?;

    print_tables(molecule, &connectivity)
}

fn print_tables(molecule: &Molecule, connectivity: &Connectivity) -> Result<()> {
    let coords = connectivity.coordinates();
    let x = molecule.to_cartesian();
    let mut stdout = io::stdout().lock();

    writeln!(
        &mut stdout,
        "{} atoms, {} internal coordinates",
        molecule.atom_count(),
        coords.len()
    )?;
    writeln!(&mut stdout)?;

    let mut bonds = Table::new();
    bonds.set_format(*format::consts::FORMAT_BOX_CHARS);
    bonds.set_titles(row!["Bond", "Atoms", "Length (Å)"]);
    for (idx, bond) in coords.bonds().iter().enumerate() {
        bonds.add_row(row![
            idx,
            format!(
                "{}{} – {}{}",
                molecule.atom(bond.i).element,
                bond.i,
                molecule.atom(bond.j).element,
                bond.j
            ),
            format!("{:.4}", bond.value(&x) * BOHR_TO_ANGSTROM)
        ]);
    }
    print_section(&mut stdout, "Bonds", &bonds, coords.bonds().len())?;

    let mut angles = Table::new();
    angles.set_format(*format::consts::FORMAT_BOX_CHARS);
    angles.set_titles(row!["Angle", "Atoms", "Value (°)"]);
    for (idx, angle) in coords.angles().iter().enumerate() {
        angles.add_row(row![
            idx,
            format!("({}, {}, {})", angle.i, angle.k, angle.j),
            format!("{:.2}", angle.value(&x).to_degrees())
        ]);
    }
    print_section(&mut stdout, "Angles", &angles, coords.angles().len())?;

    let mut dihedrals = Table::new();
    dihedrals.set_format(*format::consts::FORMAT_BOX_CHARS);
    dihedrals.set_titles(row!["Dihedral", "Atoms", "Value (°)"]);
    for (idx, dihedral) in coords.dihedrals().iter().enumerate() {
        dihedrals.add_row(row![
            idx,
            format!(
                "({}, {}, {}, {})",
                dihedral.i, dihedral.k, dihedral.l, dihedral.j
            ),
            format!("{:.2}", dihedral.value(&x).to_degrees())
        ]);
    }
    print_section(&mut stdout, "Dihedrals", &dihedrals, coords.dihedrals().len())?;

    let mut linear = Table::new();
    linear.set_format(*format::consts::FORMAT_BOX_CHARS);
    linear.set_titles(row!["Linear bend", "Atoms", "Axis", "Value (°)"]);
    for (idx, bend) in coords.linear_angles().iter().enumerate() {
        linear.add_row(row![
            idx,
            format!("({}, {}, {})", bend.i, bend.k, bend.j),
            format!(
                "[{:+.2}, {:+.2}, {:+.2}]",
                bend.axis.x, bend.axis.y, bend.axis.z
            ),
            format!("{:.2}", bend.value(&x).to_degrees())
        ]);
    }
    print_section(&mut stdout, "Linear bends", &linear, coords.linear_angles().len())?;

    let mut oop = Table::new();
    oop.set_format(*format::consts::FORMAT_BOX_CHARS);
    oop.set_titles(row!["Out-of-plane", "Atoms", "Value (°)"]);
    for (idx, bend) in coords.oop_bends().iter().enumerate() {
        oop.add_row(row![
            idx,
            format!("({}; {}, {}, {})", bend.c, bend.i, bend.j, bend.k),
            format!("{:.2}", bend.value(&x).to_degrees())
        ]);
    }
    print_section(&mut stdout, "Out-of-plane bends", &oop, coords.oop_bends().len())?;

    Ok(())
}

fn print_section<W: Write>(writer: &mut W, title: &str, table: &Table, count: usize) -> Result<()> {
    writeln!(writer, "{} ({})", title, count)?;
    if count > 0 {
        table
            .print(writer)
            .with_context(|| format!("Failed to render the {} table", title.to_lowercase()))?;
    }
    writeln!(writer)?;
    Ok(())
}
