//! MinimumSpanningTree - Stroke connectivity via Kruskal's algorithm
//!
//! Strokes of an expression form the vertices of a complete graph whose
//! edge weights are inter-stroke distances. The minimum spanning tree of
//! that graph connects every stroke to its nearest neighbours; connected
//! subsets of the tree are the candidate symbol clusters that the
//! partitioner scores.
//!
//! Edge weights are supplied as the row-major upper triangle of the
//! symmetric distance matrix, excluding the diagonal: for vertices
//! 0..n the vector is `[d01, d02, .., d0(n-1), d12, .., d(n-2)(n-1)]`.

use std::collections::HashSet;

use crate::error::{Error, Result};

/// A minimum spanning tree over stroke indices.
///
/// Stored as an n x n symmetric boolean connectivity matrix with a true
/// diagonal (every vertex is connected to itself by convention). For
/// n > 0 the tree holds exactly n - 1 symmetric off-diagonal
/// connections.
#[derive(Debug, Clone)]
pub struct MinimumSpanningTree {
    vertex_count: usize,
    connections: Vec<bool>,
}

impl MinimumSpanningTree {
    /// Build the tree from pairwise edge weights using Kruskal's
    /// algorithm.
    ///
    /// Edges are taken in ascending weight order; ties keep the original
    /// edge order (stable sort). An edge joining two already mutually
    /// reachable vertices is skipped. The construction stops as soon as
    /// all vertices are reachable from each other.
    ///
    /// # Errors
    ///
    /// Returns [`Error::EdgeWeightCount`] unless
    /// `edge_weights.len() == n * (n - 1) / 2`.
    pub fn kruskal(edge_weights: &[f64], vertex_count: usize) -> Result<Self> {
        let expected = vertex_count * vertex_count.saturating_sub(1) / 2;
        if edge_weights.len() != expected {
            return Err(Error::EdgeWeightCount {
                vertices: vertex_count,
                expected,
                actual: edge_weights.len(),
            });
        }

        let mut tree = Self::disconnected(vertex_count);
        if vertex_count < 2 {
            return Ok(tree);
        }

        // Edge index -> vertex pair, in row-major upper-triangular order.
        let mut edges = Vec::with_capacity(expected);
        for i in 0..vertex_count {
            for j in (i + 1)..vertex_count {
                edges.push((i, j));
            }
        }

        let mut order: Vec<usize> = (0..edges.len()).collect();
        order.sort_by(|&a, &b| edge_weights[a].total_cmp(&edge_weights[b]));

        let mut components = UnionFind::new(vertex_count);
        let mut remaining = vertex_count - 1;
        for index in order {
            let (a, b) = edges[index];
            if components.union(a, b) {
                tree.connect(a, b);
                remaining -= 1;
                if remaining == 0 {
                    break;
                }
            }
        }

        Ok(tree)
    }

    /// An edgeless graph with self-connections only.
    fn disconnected(vertex_count: usize) -> Self {
        let mut connections = vec![false; vertex_count * vertex_count];
        for v in 0..vertex_count {
            connections[v * vertex_count + v] = true;
        }
        Self {
            vertex_count,
            connections,
        }
    }

    fn connect(&mut self, a: usize, b: usize) {
        self.connections[a * self.vertex_count + b] = true;
        self.connections[b * self.vertex_count + a] = true;
    }

    /// Number of vertices.
    #[inline]
    pub fn vertex_count(&self) -> usize {
        self.vertex_count
    }

    /// Whether two vertices are directly connected on the tree.
    ///
    /// # Errors
    ///
    /// Returns [`Error::VertexOutOfBounds`] for out-of-range vertices.
    pub fn are_connected(&self, a: usize, b: usize) -> Result<bool> {
        for vertex in [a, b] {
            if vertex >= self.vertex_count {
                return Err(Error::VertexOutOfBounds {
                    vertex,
                    count: self.vertex_count,
                });
            }
        }
        Ok(self.connections[a * self.vertex_count + b])
    }

    /// All vertices directly tree-connected to any member of `vertices`
    /// but not themselves members, in ascending order.
    pub fn context(&self, vertices: &[usize]) -> Vec<usize> {
        let members: HashSet<usize> = vertices.iter().copied().collect();

        let mut context = Vec::new();
        for candidate in 0..self.vertex_count {
            if members.contains(&candidate) {
                continue;
            }
            let touches = vertices.iter().any(|&v| {
                v < self.vertex_count && self.connections[v * self.vertex_count + candidate]
            });
            if touches {
                context.push(candidate);
            }
        }
        context
    }

    /// Enumerate every unique connected path on the tree with at most
    /// `max_length` vertices.
    ///
    /// Paths are grown one tree neighbour at a time starting from every
    /// single vertex; a path and its reversal are the same path and are
    /// emitted once. The result is deterministic: paths appear shortest
    /// first, ordered by their starting vertex.
    pub fn unique_paths(&self, max_length: usize) -> Vec<Vec<usize>> {
        let mut paths: Vec<Vec<usize>> = Vec::new();
        let mut seen: HashSet<Vec<usize>> = HashSet::new();

        let mut frontier: Vec<Vec<usize>> = Vec::new();
        for vertex in 0..self.vertex_count {
            let path = vec![vertex];
            seen.insert(path.clone());
            paths.push(path.clone());
            frontier.push(path);
        }

        let mut length = 1;
        while !frontier.is_empty() && length < max_length {
            let mut next_frontier = Vec::new();
            for path in &frontier {
                for neighbour in self.context(path) {
                    let mut extended = path.clone();
                    extended.push(neighbour);

                    let mut key = extended.clone();
                    key.sort_unstable();
                    if seen.insert(key) {
                        paths.push(extended.clone());
                        next_frontier.push(extended);
                    }
                }
            }
            frontier = next_frontier;
            length += 1;
        }

        paths
    }
}

/// Union-find over vertex indices, with path compression and union by
/// size.
struct UnionFind {
    parent: Vec<usize>,
    size: Vec<usize>,
}

impl UnionFind {
    fn new(count: usize) -> Self {
        Self {
            parent: (0..count).collect(),
            size: vec![1; count],
        }
    }

    fn find(&mut self, mut v: usize) -> usize {
        while self.parent[v] != v {
            self.parent[v] = self.parent[self.parent[v]];
            v = self.parent[v];
        }
        v
    }

    /// Merge the components of `a` and `b`. Returns false if they were
    /// already in the same component.
    fn union(&mut self, a: usize, b: usize) -> bool {
        let (mut ra, mut rb) = (self.find(a), self.find(b));
        if ra == rb {
            return false;
        }
        if self.size[ra] < self.size[rb] {
            std::mem::swap(&mut ra, &mut rb);
        }
        self.parent[rb] = ra;
        self.size[ra] += self.size[rb];
        true
    }
}
