//! Numerical operations over the molecular model.
//!
//! `connectivity` infers the bond graph and enumerates internal coordinates,
//! `wilson` assembles the Jacobian between coordinate systems, and
//! `transform` projects internal displacements back onto Cartesian space.
//! All operations share one error type.

pub mod connectivity;
pub mod error;
pub mod transform;
pub mod wilson;

pub use connectivity::{Connectivity, ConnectivityBuilder};
pub use error::Error;
pub use transform::{
    cartesian_to_internal, internal_to_cartesian, internal_to_cartesian_single,
    BackTransformResult,
};
pub use wilson::wilson_matrix;
