use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};

mod commands;

use commands::{displace, info};

#[derive(Parser, Debug)]
#[command(
    name = "ircoord",
    about = "Inspect and manipulate molecular geometries through internal redundant coordinates.",
    version,
    arg_required_else_help = true
)]
struct Cli {
    /// Input XYZ file. When omitted, stdin is used.
    #[arg(short, long, value_name = "FILE", global = true)]
    input: Option<PathBuf>,
    /// Output XYZ file. When omitted, stdout is used.
    #[arg(short, long, value_name = "FILE", global = true)]
    output: Option<PathBuf>,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Report bonds, angles, dihedrals, linear bends, and out-of-plane bends.
    Info(info::InfoArgs),
    /// Apply an internal-coordinate displacement and emit the new geometry.
    Displace(displace::DisplaceArgs),
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Command::Info(args) => {
            let molecule = commands::load_molecule(&cli.input)?;
            info::run(&molecule, &args)?;
        }
        Command::Displace(args) => {
            let mut molecule = commands::load_molecule(&cli.input)?;
            displace::run(&mut molecule, &args)?;
            commands::save_molecule(&cli.output, &molecule, "displaced geometry")?;
        }
    }

    Ok(())
}
