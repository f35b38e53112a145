//! Adjacency-list bond graph with unweighted shortest-path queries.
//!
//! Every edge has implicit weight one, so per-source breadth-first search is
//! both the simplest and the fastest way to obtain the all-pairs
//! graph-distance matrix that drives coordinate enumeration.

use std::collections::VecDeque;

use crate::utils::parallel::*;

/// Marker for vertex pairs with no connecting path.
pub const UNREACHABLE: usize = usize::MAX;

/// Undirected, unweighted graph over atom indices.
#[derive(Debug, Clone)]
pub struct BondGraph {
    adjacency: Vec<Vec<usize>>,
    edge_count: usize,
}

impl BondGraph {
    /// Creates a graph with `n` isolated vertices.
    pub fn new(n: usize) -> Self {
        Self {
            adjacency: vec![Vec::new(); n],
            edge_count: 0,
        }
    }

    pub fn vertex_count(&self) -> usize {
        self.adjacency.len()
    }

    pub fn edge_count(&self) -> usize {
        self.edge_count
    }

    /// Adds the undirected edge `(i, j)`, ignoring duplicates.
    ///
    /// Returns `true` when the edge was newly inserted.
    pub fn add_edge(&mut self, i: usize, j: usize) -> bool {
        debug_assert!(i != j, "self-loop on vertex {}", i);
        debug_assert!(i < self.adjacency.len() && j < self.adjacency.len());

        if self.adjacency[i].contains(&j) {
            return false;
        }
        self.adjacency[i].push(j);
        self.adjacency[j].push(i);
        self.edge_count += 1;
        true
    }

    pub fn has_edge(&self, i: usize, j: usize) -> bool {
        self.adjacency[i].contains(&j)
    }

    pub fn neighbors(&self, i: usize) -> &[usize] {
        &self.adjacency[i]
    }

    pub fn degree(&self, i: usize) -> usize {
        self.adjacency[i].len()
    }

    /// Labels each vertex with its connected-component index and returns the
    /// labels together with the number of components.
    pub fn connected_components(&self) -> (Vec<usize>, usize) {
        let n = self.vertex_count();
        let mut labels = vec![UNREACHABLE; n];
        let mut count = 0;

        for start in 0..n {
            if labels[start] != UNREACHABLE {
                continue;
            }
            let mut queue = VecDeque::from([start]);
            labels[start] = count;
            while let Some(v) = queue.pop_front() {
                for &w in &self.adjacency[v] {
                    if labels[w] == UNREACHABLE {
                        labels[w] = count;
                        queue.push_back(w);
                    }
                }
            }
            count += 1;
        }

        (labels, count)
    }

    pub fn is_connected(&self) -> bool {
        self.vertex_count() <= 1 || self.connected_components().1 == 1
    }

    /// Shortest-path distances (in edges) from `source` to every vertex.
    ///
    /// Unreachable vertices are marked [`UNREACHABLE`].
    pub fn distances_from(&self, source: usize) -> Vec<usize> {
        let mut distances = vec![UNREACHABLE; self.vertex_count()];
        distances[source] = 0;

        let mut queue = VecDeque::from([source]);
        while let Some(v) = queue.pop_front() {
            for &w in &self.adjacency[v] {
                if distances[w] == UNREACHABLE {
                    distances[w] = distances[v] + 1;
                    queue.push_back(w);
                }
            }
        }

        distances
    }

    /// All-pairs shortest-path matrix, one BFS per source vertex.
    ///
    /// Sources are independent, so the sweep parallelizes when the
    /// `parallel` feature is enabled.
    pub fn distance_matrix(&self) -> Vec<Vec<usize>> {
        (0..self.vertex_count())
            .into_par_iter()
            .map(|source| self.distances_from(source))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Path graph 0 - 1 - 2 - 3.
    fn path_graph() -> BondGraph {
        let mut graph = BondGraph::new(4);
        graph.add_edge(0, 1);
        graph.add_edge(1, 2);
        graph.add_edge(2, 3);
        graph
    }

    #[test]
    fn add_edge_ignores_duplicates_in_either_order() {
        let mut graph = BondGraph::new(3);

        assert!(graph.add_edge(0, 1));
        assert!(!graph.add_edge(0, 1));
        assert!(!graph.add_edge(1, 0));
        assert_eq!(graph.edge_count(), 1);
    }

    #[test]
    fn neighbors_are_symmetric() {
        let graph = path_graph();

        assert_eq!(graph.neighbors(0), &[1]);
        assert_eq!(graph.neighbors(1), &[0, 2]);
        assert!(graph.has_edge(2, 1));
        assert!(!graph.has_edge(0, 3));
    }

    #[test]
    fn degree_counts_incident_edges() {
        let graph = path_graph();

        assert_eq!(graph.degree(0), 1);
        assert_eq!(graph.degree(1), 2);
    }

    #[test]
    fn connected_components_labels_fragments() {
        let mut graph = BondGraph::new(5);
        graph.add_edge(0, 1);
        graph.add_edge(3, 4);

        let (labels, count) = graph.connected_components();

        assert_eq!(count, 3);
        assert_eq!(labels[0], labels[1]);
        assert_eq!(labels[3], labels[4]);
        assert_ne!(labels[0], labels[2]);
        assert_ne!(labels[0], labels[3]);
    }

    #[test]
    fn is_connected_detects_single_component() {
        assert!(path_graph().is_connected());

        let mut graph = BondGraph::new(3);
        graph.add_edge(0, 1);
        assert!(!graph.is_connected());
    }

    #[test]
    fn single_vertex_graph_is_connected() {
        assert!(BondGraph::new(1).is_connected());
        assert!(BondGraph::new(0).is_connected());
    }

    #[test]
    fn distances_from_counts_edges_along_shortest_paths() {
        let graph = path_graph();

        assert_eq!(graph.distances_from(0), vec![0, 1, 2, 3]);
        assert_eq!(graph.distances_from(2), vec![2, 1, 0, 1]);
    }

    #[test]
    fn distances_from_marks_unreachable_vertices() {
        let mut graph = BondGraph::new(3);
        graph.add_edge(0, 1);

        let distances = graph.distances_from(0);
        assert_eq!(distances[2], UNREACHABLE);
    }

    #[test]
    fn distance_matrix_is_symmetric_with_zero_diagonal() {
        let graph = path_graph();
        let matrix = graph.distance_matrix();

        for i in 0..4 {
            assert_eq!(matrix[i][i], 0);
            for j in 0..4 {
                assert_eq!(matrix[i][j], matrix[j][i]);
            }
        }
        assert_eq!(matrix[0][3], 3);
    }

    #[test]
    fn distance_matrix_prefers_shortest_route_in_a_cycle() {
        let mut graph = BondGraph::new(4);
        graph.add_edge(0, 1);
        graph.add_edge(1, 2);
        graph.add_edge(2, 3);
        graph.add_edge(3, 0);

        let matrix = graph.distance_matrix();
        assert_eq!(matrix[0][2], 2);
        assert_eq!(matrix[0][3], 1);
    }
}
