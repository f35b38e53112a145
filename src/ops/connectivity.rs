//! Connectivity inference: from Cartesian positions to the bond graph and
//! the full list of internal coordinates.
//!
//! Bond detection runs in three phases. Covalent bonds come from covalent
//! radii, fragment stitching guarantees a single connected graph by joining
//! the closest atoms of disconnected fragments, and hydrogen bonds are added
//! for X–H···Y motifs over the usual donor/acceptor elements. Coordinate
//! enumeration then walks the graph-distance matrix: unit distances are
//! bonds, shared unit-distance vertices produce angles (or, past the
//! quasi-linear threshold, pairs of tagged linear bends), the i–k–l–j
//! pattern produces dihedrals, and every atom with three or more neighbors
//! produces out-of-plane bends.

use nalgebra::{DMatrix, Vector3};
use std::f64::consts::PI;

use crate::model::coordinate::{
    vertex_angle, Angle, Bond, Coordinates, Dihedral, LinearAngle, OutOfPlaneBend,
};
use crate::model::graph::BondGraph;
use crate::model::molecule::Molecule;
use crate::ops::error::Error;
use crate::utils::units::ANGSTROM_TO_BOHR;

/// Two atoms closer than this (in bohr) are treated as coincident.
const COINCIDENCE_THRESHOLD: f64 = 1e-10;

/// Dihedrals whose sub-angles are within this of straight are dropped.
const DIHEDRAL_LINEARITY_EPSILON: f64 = 1e-6;

/// Minimum norm accepted for a Gram–Schmidt complement axis.
const AXIS_NORM_THRESHOLD: f64 = 1e-8;

/// Inferred connectivity: the bond graph, its all-pairs distance matrix, and
/// the internal coordinates implied by both.
#[derive(Debug, Clone)]
pub struct Connectivity {
    graph: BondGraph,
    graph_distances: Vec<Vec<usize>>,
    coordinates: Coordinates,
}

impl Connectivity {
    pub fn graph(&self) -> &BondGraph {
        &self.graph
    }

    /// Shortest-path distances in bonds between every atom pair.
    pub fn graph_distances(&self) -> &[Vec<usize>] {
        &self.graph_distances
    }

    pub fn coordinates(&self) -> &Coordinates {
        &self.coordinates
    }

    pub fn into_coordinates(self) -> Coordinates {
        self.coordinates
    }
}

/// Builder for [`Connectivity`] with adjustable detection cutoffs.
///
/// The defaults are the working values for organic and small inorganic
/// systems; the setters exist for callers that need looser or tighter
/// detection (e.g. transition-metal centers).
#[derive(Debug, Clone)]
pub struct ConnectivityBuilder {
    covalent_bond_multiplier: f64,
    interfragment_bond_multiplier: f64,
    vdw_bond_multiplier: f64,
    quasi_linear_threshold: f64,
}

impl Default for ConnectivityBuilder {
    fn default() -> Self {
        Self {
            covalent_bond_multiplier: 1.3,
            interfragment_bond_multiplier: 1.3,
            vdw_bond_multiplier: 0.9,
            quasi_linear_threshold: 175.0 * PI / 180.0,
        }
    }
}

impl ConnectivityBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the multiplier applied to the sum of covalent radii.
    pub fn covalent_bond_multiplier(mut self, multiplier: f64) -> Self {
        self.covalent_bond_multiplier = multiplier;
        self
    }

    /// Sets the multiplier applied to the minimal inter-fragment distance
    /// when stitching extra fragment-to-fragment contacts.
    pub fn interfragment_bond_multiplier(mut self, multiplier: f64) -> Self {
        self.interfragment_bond_multiplier = multiplier;
        self
    }

    /// Sets the multiplier applied to the sum of Van der Waals radii for
    /// hydrogen-bond detection.
    pub fn vdw_bond_multiplier(mut self, multiplier: f64) -> Self {
        self.vdw_bond_multiplier = multiplier;
        self
    }

    /// Sets the angle (radians) above which a bend is promoted to a pair of
    /// tagged linear bends.
    pub fn quasi_linear_threshold(mut self, threshold: f64) -> Self {
        self.quasi_linear_threshold = threshold;
        self
    }

    /// Infers the bond graph and enumerates all internal coordinates.
    ///
    /// # Errors
    ///
    /// [`Error::DegenerateGeometry`] when two atoms coincide or when a
    /// quasi-linear bend has a vanishing arm vector, and
    /// [`Error::DisconnectedGraph`] when stitching cannot produce a single
    /// connected graph.
    pub fn build(&self, molecule: &Molecule) -> Result<Connectivity, Error> {
        let distances = interatomic_distances(molecule)?;

        let mut graph = BondGraph::new(molecule.atom_count());
        self.add_covalent_bonds(molecule, &distances, &mut graph);
        self.stitch_fragments(&distances, &mut graph)?;
        self.add_hydrogen_bonds(molecule, &distances, &mut graph);

        let graph_distances = graph.distance_matrix();

        let bonds = enumerate_bonds(&graph_distances);
        let (angles, linear_angles) = self.enumerate_angles(molecule, &graph_distances)?;
        let dihedrals = enumerate_dihedrals(molecule, &graph_distances);
        let oop_bends = enumerate_oop_bends(&graph);

        Ok(Connectivity {
            graph,
            graph_distances,
            coordinates: Coordinates::new(bonds, angles, dihedrals, linear_angles, oop_bends),
        })
    }

    /// Adds an edge for every pair closer than the scaled sum of covalent
    /// radii.
    fn add_covalent_bonds(
        &self,
        molecule: &Molecule,
        distances: &DMatrix<f64>,
        graph: &mut BondGraph,
    ) {
        let n = molecule.atom_count();
        for j in 0..n {
            for i in (j + 1)..n {
                let radius_sum = molecule.atom(i).element.covalent_radius()
                    + molecule.atom(j).element.covalent_radius();
                if distances[(i, j)] < self.covalent_bond_multiplier * radius_sum {
                    graph.add_edge(i, j);
                }
            }
        }
    }

    /// Joins disconnected fragments through their closest atom pairs.
    ///
    /// For every fragment pair the single closest contact always becomes an
    /// edge; additional contacts join when they are within the scaled
    /// minimal distance, capped at two ångström.
    fn stitch_fragments(
        &self,
        distances: &DMatrix<f64>,
        graph: &mut BondGraph,
    ) -> Result<(), Error> {
        let (labels, fragment_count) = graph.connected_components();
        if fragment_count <= 1 {
            return Ok(());
        }

        let n = graph.vertex_count();
        for a in 0..fragment_count {
            for b in (a + 1)..fragment_count {
                let (k_min, l_min, d_min) =
                    closest_interfragment_pair(a, b, &labels, distances);
                graph.add_edge(k_min, l_min);

                let cutoff = (self.interfragment_bond_multiplier * d_min)
                    .min(2.0 * ANGSTROM_TO_BOHR);
                for k in 0..n {
                    for l in 0..n {
                        if labels[k] == a && labels[l] == b && distances[(k, l)] < cutoff {
                            graph.add_edge(k, l);
                        }
                    }
                }
            }
        }

        let (_, remaining) = graph.connected_components();
        if remaining > 1 {
            return Err(Error::DisconnectedGraph {
                fragments: remaining,
            });
        }
        Ok(())
    }

    /// Detects X–H···Y hydrogen bonds over N, O, F, P, S, and Cl.
    ///
    /// The acceptor must lie outside covalent range of the hydrogen, within
    /// the scaled Van der Waals range, and on the far side of the donor
    /// (X–H–Y angle beyond ninety degrees).
    fn add_hydrogen_bonds(
        &self,
        molecule: &Molecule,
        distances: &DMatrix<f64>,
        graph: &mut BondGraph,
    ) {
        let n = molecule.atom_count();
        for j in 0..n {
            for i in (j + 1)..n {
                let elem_i = molecule.atom(i).element;
                let elem_j = molecule.atom(j).element;

                let radius_sum = elem_i.covalent_radius() + elem_j.covalent_radius();
                if distances[(i, j)] >= self.covalent_bond_multiplier * radius_sum {
                    continue;
                }

                let (donor, hydrogen) = if elem_i.is_hydrogen() && elem_j.is_hbond_partner() {
                    (j, i)
                } else if elem_j.is_hydrogen() && elem_i.is_hbond_partner() {
                    (i, j)
                } else {
                    continue;
                };

                let h_element = molecule.atom(hydrogen).element;
                for acceptor in 0..n {
                    if acceptor == donor || acceptor == hydrogen {
                        continue;
                    }
                    let acceptor_element = molecule.atom(acceptor).element;
                    if !acceptor_element.is_hbond_partner() {
                        continue;
                    }

                    let d = distances[(hydrogen, acceptor)];
                    let covalent_sum =
                        h_element.covalent_radius() + acceptor_element.covalent_radius();
                    let vdw_sum = h_element.vdw_radius() + acceptor_element.vdw_radius();
                    let angle = vertex_angle(
                        &molecule.atom(donor).pos.coords,
                        &molecule.atom(hydrogen).pos.coords,
                        &molecule.atom(acceptor).pos.coords,
                    );

                    if d > covalent_sum && d < self.vdw_bond_multiplier * vdw_sum && angle > PI / 2.0
                    {
                        graph.add_edge(hydrogen, acceptor);
                    }
                }
            }
        }
    }

    /// Enumerates angles, promoting quasi-linear ones to tagged linear-bend
    /// pairs.
    fn enumerate_angles(
        &self,
        molecule: &Molecule,
        graph_distances: &[Vec<usize>],
    ) -> Result<(Vec<Angle>, Vec<LinearAngle>), Error> {
        let n = molecule.atom_count();
        let mut angles = Vec::new();
        let mut linear_angles = Vec::new();

        for j in 0..n {
            for i in 0..j {
                if graph_distances[i][j] > 2 {
                    continue;
                }
                for k in 0..n {
                    if k == i || k == j {
                        continue;
                    }
                    if graph_distances[k][i] != 1 || graph_distances[k][j] != 1 {
                        continue;
                    }

                    let theta = vertex_angle(
                        &molecule.atom(i).pos.coords,
                        &molecule.atom(k).pos.coords,
                        &molecule.atom(j).pos.coords,
                    );

                    if theta < self.quasi_linear_threshold {
                        angles.push(Angle::new(i, k, j));
                    } else {
                        let arm = molecule.atom(i).pos.coords - molecule.atom(k).pos.coords;
                        let (first, second) = complement_axes(&arm, i, k)?;
                        linear_angles.push(LinearAngle::new(i, k, j, first));
                        linear_angles.push(LinearAngle::new(i, k, j, second));
                    }
                }
            }
        }

        Ok((angles, linear_angles))
    }
}

/// Pairwise Euclidean distance matrix, failing on coincident atoms.
fn interatomic_distances(molecule: &Molecule) -> Result<DMatrix<f64>, Error> {
    let n = molecule.atom_count();
    let mut distances = DMatrix::zeros(n, n);

    for j in 0..n {
        for i in (j + 1)..n {
            let d = molecule.atom(i).distance(molecule.atom(j));
            if d < COINCIDENCE_THRESHOLD {
                return Err(Error::degenerate_geometry(j, i));
            }
            distances[(i, j)] = d;
            distances[(j, i)] = d;
        }
    }

    Ok(distances)
}

/// Closest pair of atoms between fragments `a` and `b`.
fn closest_interfragment_pair(
    a: usize,
    b: usize,
    labels: &[usize],
    distances: &DMatrix<f64>,
) -> (usize, usize, f64) {
    let n = labels.len();
    let mut best = (0, 0, f64::MAX);

    for k in 0..n {
        if labels[k] != a {
            continue;
        }
        for l in 0..n {
            if labels[l] != b {
                continue;
            }
            let d = distances[(k, l)];
            if d < best.2 {
                best = (k, l, d);
            }
        }
    }

    best
}

/// Bonds are exactly the unit entries of the graph-distance matrix.
fn enumerate_bonds(graph_distances: &[Vec<usize>]) -> Vec<Bond> {
    let n = graph_distances.len();
    let mut bonds = Vec::new();

    for j in 0..n {
        for i in 0..j {
            if graph_distances[i][j] == 1 {
                bonds.push(Bond::new(i, j));
            }
        }
    }

    bonds
}

/// Dihedrals follow the i–k–l–j pattern in the graph-distance matrix.
///
/// Terminal pairs up to graph distance three are considered: a shortest path
/// of two can still support a dihedral when the atoms sit on a ring. Chains
/// with a straight sub-angle are dropped, since their torsion is undefined.
fn enumerate_dihedrals(molecule: &Molecule, graph_distances: &[Vec<usize>]) -> Vec<Dihedral> {
    let n = molecule.atom_count();
    let mut dihedrals = Vec::new();

    for j in 0..n {
        for i in 0..j {
            if graph_distances[i][j] > 3 {
                continue;
            }
            for k in 0..n {
                if graph_distances[k][i] != 1 || graph_distances[k][j] != 2 {
                    continue;
                }
                for l in 0..n {
                    if graph_distances[l][i] != 2
                        || graph_distances[l][j] != 1
                        || graph_distances[l][k] != 1
                    {
                        continue;
                    }

                    let inner_i = vertex_angle(
                        &molecule.atom(i).pos.coords,
                        &molecule.atom(k).pos.coords,
                        &molecule.atom(l).pos.coords,
                    );
                    let inner_j = vertex_angle(
                        &molecule.atom(k).pos.coords,
                        &molecule.atom(l).pos.coords,
                        &molecule.atom(j).pos.coords,
                    );
                    if (inner_i - PI).abs() < DIHEDRAL_LINEARITY_EPSILON
                        || (inner_j - PI).abs() < DIHEDRAL_LINEARITY_EPSILON
                    {
                        continue;
                    }

                    dihedrals.push(Dihedral::new(i, k, l, j));
                }
            }
        }
    }

    dihedrals
}

/// One out-of-plane bend per unordered neighbor triple of every atom with
/// three or more neighbors.
fn enumerate_oop_bends(graph: &BondGraph) -> Vec<OutOfPlaneBend> {
    let mut bends = Vec::new();

    for c in 0..graph.vertex_count() {
        if graph.degree(c) < 3 {
            continue;
        }
        let mut neighbors = graph.neighbors(c).to_vec();
        neighbors.sort_unstable();

        for a in 0..neighbors.len() {
            for b in (a + 1)..neighbors.len() {
                for d in (b + 1)..neighbors.len() {
                    bends.push(OutOfPlaneBend::new(
                        c,
                        neighbors[a],
                        neighbors[b],
                        neighbors[d],
                    ));
                }
            }
        }
    }

    bends
}

/// Two orthonormal complement axes for a quasi-linear bend whose arm runs
/// from `vertex` to `terminal`.
///
/// The first axis is the world axis least aligned with the arm direction,
/// Gram–Schmidt-orthogonalized against it; the second completes the
/// right-handed frame. A vanishing arm leaves the bending plane undefined
/// and is reported as degenerate geometry between the two atoms.
fn complement_axes(
    arm: &Vector3<f64>,
    terminal: usize,
    vertex: usize,
) -> Result<(Vector3<f64>, Vector3<f64>), Error> {
    let norm = arm.norm();
    if norm < AXIS_NORM_THRESHOLD {
        return Err(Error::degenerate_geometry(terminal, vertex));
    }
    let u = arm / norm;

    let components = [u.x.abs(), u.y.abs(), u.z.abs()];
    let least = components
        .iter()
        .enumerate()
        .min_by(|a, b| a.1.total_cmp(b.1))
        .map(|(idx, _)| idx)
        .unwrap_or(0);
    let mut world = Vector3::zeros();
    world[least] = 1.0;

    let projected = world - u * world.dot(&u);
    let projected_norm = projected.norm();
    if projected_norm < AXIS_NORM_THRESHOLD {
        return Err(Error::degenerate_geometry(terminal, vertex));
    }

    let first = projected / projected_norm;
    let second = u.cross(&first);
    Ok((first, second))
}
