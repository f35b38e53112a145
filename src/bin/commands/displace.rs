use std::str::FromStr;

use anyhow::{bail, Context, Result};
use clap::Args;
use nalgebra::DVector;

use ircoord::{internal_to_cartesian, ConnectivityBuilder, Molecule};

/// Applies a displacement in internal coordinates and updates the geometry
/// through the back-transformation.
#[derive(Debug, Args)]
pub struct DisplaceArgs {
    /// Displacement `INDEX=VALUE` for one internal coordinate; repeatable.
    /// Indices follow the `info` report order. Values are bohr for bonds
    /// and degrees for all angle-like coordinates.
    #[arg(short, long = "step", value_name = "INDEX=VALUE", required = true)]
    steps: Vec<StepSpec>,
    /// Interpret angular values as radians instead of degrees.
    #[arg(long)]
    radians: bool,
}

/// One `INDEX=VALUE` displacement component.
#[derive(Debug, Clone)]
pub struct StepSpec {
    index: usize,
    value: f64,
}

impl FromStr for StepSpec {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (index, value) = s
            .split_once('=')
            .ok_or_else(|| format!("expected INDEX=VALUE, got '{}'", s))?;
        Ok(Self {
            index: index
                .trim()
                .parse()
                .map_err(|_| format!("invalid coordinate index '{}'", index))?,
            value: value
                .trim()
                .parse()
                .map_err(|_| format!("invalid displacement value '{}'", value))?,
        })
    }
}

pub fn run(molecule: &mut Molecule, args: &DisplaceArgs) -> Result<()> {
    let coords = ConnectivityBuilder::new()
        .build(molecule)
        .context("Failed to infer connectivity")?
        .into_coordinates();

    let x = molecule.to_cartesian();
    let q = coords.evaluate(&x);

    let mut dq = DVector::zeros(coords.len());
    for step in &args.steps {
        if step.index >= coords.len() {
            bail!(
                "coordinate index {} out of range (molecule has {} internal coordinates)",
                step.index,
                coords.len()
            );
        }
        let angular = step.index >= coords.bonds().len();
        dq[step.index] += if angular && !args.radians {
            step.value.to_radians()
        } else {
            step.value
        };
    }

    let result =
        internal_to_cartesian(&q, &dq, &x, &coords).context("Back-transformation failed")?;
    if !result.converged {
        bail!(
            "back-transformation did not converge after {} iterations; \
             try splitting the displacement into smaller steps",
            result.iterations
        );
    }

    molecule.set_cartesian(&result.x);
    Ok(())
}
