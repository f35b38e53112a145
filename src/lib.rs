//! # ircoord
//!
//! **ircoord** converts molecular geometries between Cartesian positions and *internal redundant coordinates* — bond lengths, bond angles, dihedral torsions, linear bends, and out-of-plane bends. Geometry optimizers and reaction-path followers propose steps in internal space, where chemistry is local and rigid motion is invisible, and this crate projects those steps back onto the Cartesian positions that energy and force evaluators consume.
//!
//! ## Features
//!
//! - **Connectivity inference** – Covalent, inter-fragment, and hydrogen bonds detected from positions and per-element radii, with graph-theoretic enumeration of every angle, dihedral, linear bend, and out-of-plane bend implied by the bond graph.
//! - **Wilson B matrices** – Closed-form analytic first derivatives for every coordinate kind, assembled row by row (in parallel with the `parallel` feature) on top of `nalgebra`.
//! - **Robust back-transformation** – Damped iterative projection through the SVD pseudoinverse with divergence detection and automatic step-halving, reporting convergence as data instead of panicking.
//! - **Quasi-linear handling** – Near-straight angles are promoted to pairs of tagged linear bends whose derivatives stay finite through exact linearity.
//! - **Plain XYZ I/O** – Strict ångström readers and writers with precise line-level diagnostics.

pub mod io;
pub mod ops;
pub mod utils;

mod model;

pub use model::atom::{Atom, Point};
pub use model::coordinate::{
    Angle, Bond, Coordinates, Dihedral, LinearAngle, OutOfPlaneBend,
};
pub use model::element::Element;
pub use model::graph::BondGraph;
pub use model::molecule::Molecule;

pub use ops::{
    cartesian_to_internal, internal_to_cartesian, internal_to_cartesian_single, wilson_matrix,
    BackTransformResult, Connectivity, ConnectivityBuilder,
};

pub use ops::Error as OpsError;
