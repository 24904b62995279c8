use std::fmt;

use fxhash::{FxHashMap, FxHashSet};
use itertools::Itertools;
use thiserror::Error;

use super::*;
use crate::errors::InvariantCheck;

/// An undirected graph with black and red edges that supports contractions.
///
/// Node ids are arbitrary (not necessarily contiguous) and stay fixed for the lifetime of
/// a node; this allows a component of a larger graph to keep the ids of its host. Next to
/// the adjacency, the graph maintains two [`DegreeIndex`]es (red degree and total degree)
/// and the running maximum of all red degrees ever observed, i.e. the twin-width of the
/// contractions carried out so far.
#[derive(Clone, Default)]
pub struct Trigraph {
    adj: FxHashMap<Node, Neighborhood>,
    red_degrees: DegreeIndex,
    total_degrees: DegreeIndex,
    number_of_edges: NumEdges,
    number_of_red_edges: NumEdges,
    width: NumNodes,
}

#[derive(Clone, Default, Debug)]
struct Neighborhood {
    black: FxHashSet<Node>,
    red: FxHashSet<Node>,
}

impl Neighborhood {
    fn contains(&self, v: Node) -> bool {
        self.black.contains(&v) || self.red.contains(&v)
    }

    fn edge_type_with(&self, v: Node) -> EdgeKind {
        if self.black.contains(&v) {
            EdgeKind::Black
        } else if self.red.contains(&v) {
            EdgeKind::Red
        } else {
            EdgeKind::None
        }
    }

    fn degree(&self) -> NumNodes {
        (self.black.len() + self.red.len()) as NumNodes
    }

    fn iter(&self) -> impl Iterator<Item = Node> + '_ {
        self.black.iter().chain(self.red.iter()).copied()
    }
}

macro_rules! forward_degree_index {
    ($name : ident) => {
        paste::paste! {
            #[doc = "Returns (at most) `n` nodes of smallest " $name " in non-decreasing order"]
            pub fn [<lowest_ $name _nodes>](&self, n: usize) -> Vec<Node> {
                self.[<$name s>].lowest_n(n)
            }

            #[doc = "Read access to the bucket index by " $name]
            pub fn [<$name _index>](&self) -> &DegreeIndex {
                &self.[<$name s>]
            }
        }
    };
}

impl Trigraph {
    /// Creates a graph without nodes
    pub fn empty() -> Self {
        Self::default()
    }

    /// Registers a new isolated node.
    /// ** Panics if the node already exists **
    pub fn add_vertex(&mut self, u: Node) {
        assert!(!self.adj.contains_key(&u), "node {u} already exists");
        self.adj.insert(u, Neighborhood::default());
        self.red_degrees.insert(u, 0);
        self.total_degrees.insert(u, 0);
    }

    /// Registers the isolated nodes `0..n`
    pub fn add_vertices(&mut self, n: NumNodes) {
        self.adj.reserve(n as usize);
        for u in 0..n {
            self.add_vertex(u);
        }
    }

    /// Removes all edges at `u` and then `u` itself
    pub fn remove_vertex(&mut self, u: Node) {
        self.remove_edges_at_node(u);
        self.adj.remove(&u);
        self.red_degrees.remove(u);
        self.total_degrees.remove(u);
    }

    /// Largest red degree ever attained by any node of this graph
    pub fn width(&self) -> NumNodes {
        self.width
    }

    /// Largest red degree among the current nodes
    pub fn max_red_degree(&self) -> NumNodes {
        self.red_degrees.max_degree().unwrap_or(0)
    }

    pub fn number_of_red_edges(&self) -> NumEdges {
        self.number_of_red_edges
    }

    forward_degree_index!(red_degree);
    forward_degree_index!(total_degree);

    /// Contracts `twin` into `source`: afterwards `twin` is gone and `source` is adjacent to
    /// the union of both neighborhoods. A neighbor stays black only if it was black to both;
    /// every other neighbor becomes red.
    ///
    /// All neighbor sets are taken before the first modification, so the three phases
    /// (red transfer, recoloring, new red neighbors) do not observe each other.
    ///
    /// ** Panics if source == twin or either is not a node of the graph **
    pub fn merge_vertices(&mut self, source: Node, twin: Node) {
        assert_ne!(source, twin, "cannot merge node {source} into itself");
        self.assert_vertex(source);
        self.assert_vertex(twin);

        // neighbors of the twin may temporarily be red to both source and twin; only the
        // state after the removal of the twin counts towards the width
        let width_before = self.width;

        self.try_remove_edge(source, twin);

        let (transferred, turned_red, new_red) = {
            let src = &self.adj[&source];
            let tw = &self.adj[&twin];

            let transferred = tw
                .red
                .iter()
                .filter(|v| !src.red.contains(v))
                .copied()
                .collect_vec();

            let turned_red = src
                .black
                .iter()
                .filter(|v| !tw.black.contains(v))
                .copied()
                .collect_vec();

            let new_red = tw.iter().filter(|&v| !src.contains(v)).collect_vec();

            (transferred, turned_red, new_red)
        };

        // a red neighbor of the twin that is black to the source is recolored below
        for v in transferred {
            self.add_edge(source, v, EdgeColor::Red);
        }

        for v in turned_red {
            assert!(
                !self.has_red_edge(source, v),
                "black and red edge coexist between {source} and {v}"
            );
            self.try_remove_edge(source, v);
            self.add_edge(source, v, EdgeColor::Red);
        }

        for v in new_red {
            self.add_edge(source, v, EdgeColor::Red);
        }

        self.remove_vertex(twin);

        self.width = width_before.max(self.max_red_degree());
    }

    /// Number of red edges a contraction of `u` and `v` is forced to produce, i.e. the size of
    /// the symmetric difference of their neighborhoods (excluding `u` and `v` themselves).
    /// Does not modify the graph.
    pub fn symmetric_difference_score(&self, u: Node, v: Node) -> NumNodes {
        let nu = self.neighborhood(u);
        let nv = self.neighborhood(v);

        let only_u = nu.iter().filter(|&x| x != v && !nv.contains(x)).count();
        let only_v = nv.iter().filter(|&x| x != u && !nu.contains(x)).count();

        (only_u + only_v) as NumNodes
    }

    /// Width of this graph after contracting `twin` into `source`, computed on a copy
    pub fn width_after_merge(&self, source: Node, twin: Node) -> NumNodes {
        let mut copy = self.clone();
        copy.merge_vertices(source, twin);
        copy.width()
    }

    /// Returns all nodes at distance one or two from `u` (excluding `u`)
    pub fn two_neighborhood(&self, u: Node) -> FxHashSet<Node> {
        let mut result: FxHashSet<Node> = self.neighborhood(u).iter().collect();
        for v in self.neighborhood(u).iter() {
            result.extend(self.neighborhood(v).iter());
        }
        result.remove(&u);
        result
    }

    /// Iterates over all edges `ColoredEdge(u, v, c)` with `u < v`
    pub fn colored_edges(&self) -> impl Iterator<Item = ColoredEdge> + '_ {
        self.adj.iter().flat_map(|(&u, nb)| {
            nb.black
                .iter()
                .filter(move |&&v| u < v)
                .map(move |&v| ColoredEdge(u, v, EdgeColor::Black))
                .chain(
                    nb.red
                        .iter()
                        .filter(move |&&v| u < v)
                        .map(move |&v| ColoredEdge(u, v, EdgeColor::Red)),
                )
        })
    }

    /// Returns the subgraph induced by `nodes`; node ids are kept.
    /// Red edges are copied as red edges, but the width starts at the largest red degree
    /// of the subgraph.
    pub fn vertex_induced(&self, nodes: &[Node]) -> Self {
        let mut subgraph = Self::empty();
        for &u in nodes {
            subgraph.add_vertex(u);
        }

        for &u in nodes {
            for v in self.neighborhood(u).iter() {
                if u < v && subgraph.has_vertex(v) {
                    subgraph.add_edge(u, v, self.edge_color(u, v));
                }
            }
        }

        subgraph
    }

    fn edge_color(&self, u: Node, v: Node) -> EdgeColor {
        if self.neighborhood(u).red.contains(&v) {
            EdgeColor::Red
        } else {
            EdgeColor::Black
        }
    }

    fn neighborhood(&self, u: Node) -> &Neighborhood {
        self.adj
            .get(&u)
            .unwrap_or_else(|| panic!("node {u} is not part of the graph"))
    }

    fn assert_vertex(&self, u: Node) {
        assert!(self.adj.contains_key(&u), "node {u} is not part of the graph");
    }

    fn insert_half_edge(&mut self, u: Node, v: Node, color: EdgeColor) {
        let nb = self.adj.get_mut(&u).unwrap();
        match color {
            EdgeColor::Black => nb.black.insert(v),
            EdgeColor::Red => nb.red.insert(v),
        };

        self.total_degrees.increment(u);
        if color.is_red() {
            self.red_degrees.increment(u);
            self.width = self.width.max(nb.red.len() as NumNodes);
        }
    }

    fn remove_half_edge(&mut self, u: Node, v: Node, color: EdgeColor) {
        let nb = self.adj.get_mut(&u).unwrap();
        let removed = match color {
            EdgeColor::Black => nb.black.remove(&v),
            EdgeColor::Red => nb.red.remove(&v),
        };
        debug_assert!(removed);

        self.total_degrees.decrement(u);
        if color.is_red() {
            self.red_degrees.decrement(u);
        }
    }
}

impl GraphNew for Trigraph {
    fn new(n: NumNodes) -> Self {
        let mut graph = Self::empty();
        graph.add_vertices(n);
        graph
    }
}

impl GraphNodeOrder for Trigraph {
    fn number_of_nodes(&self) -> NumNodes {
        self.adj.len() as NumNodes
    }

    fn vertices(&self) -> impl Iterator<Item = Node> + '_ {
        self.adj.keys().copied()
    }

    fn has_vertex(&self, u: Node) -> bool {
        self.adj.contains_key(&u)
    }
}

impl GraphEdgeOrder for Trigraph {
    fn number_of_edges(&self) -> NumEdges {
        self.number_of_edges
    }
}

impl ColoredAdjacencyList for Trigraph {
    fn black_neighbors_of(&self, u: Node) -> impl Iterator<Item = Node> + '_ {
        self.neighborhood(u).black.iter().copied()
    }

    fn red_neighbors_of(&self, u: Node) -> impl Iterator<Item = Node> + '_ {
        self.neighborhood(u).red.iter().copied()
    }

    fn black_degree_of(&self, u: Node) -> NumNodes {
        self.neighborhood(u).black.len() as NumNodes
    }

    fn red_degree_of(&self, u: Node) -> NumNodes {
        self.neighborhood(u).red.len() as NumNodes
    }

    fn degree_of(&self, u: Node) -> NumNodes {
        self.neighborhood(u).degree()
    }
}

impl ColoredAdjacencyTest for Trigraph {
    fn type_of_edge(&self, u: Node, v: Node) -> EdgeKind {
        self.neighborhood(u).edge_type_with(v)
    }
}

impl GraphEdgeEditing for Trigraph {
    fn try_add_edge(&mut self, u: Node, v: Node, color: EdgeColor) -> EdgeKind {
        assert_ne!(u, v, "self-loops are not supported");
        self.assert_vertex(v);

        let prev = self.type_of_edge(u, v);
        if prev.is_some() {
            return prev;
        }

        self.insert_half_edge(u, v, color);
        self.insert_half_edge(v, u, color);

        self.number_of_edges += 1;
        if color.is_red() {
            self.number_of_red_edges += 1;
        }

        prev
    }

    fn try_remove_edge(&mut self, u: Node, v: Node) -> EdgeKind {
        self.assert_vertex(v);

        let prev = self.type_of_edge(u, v);
        let Some(color) = prev.color() else {
            return prev;
        };

        self.remove_half_edge(u, v, color);
        self.remove_half_edge(v, u, color);

        self.number_of_edges -= 1;
        if color.is_red() {
            self.number_of_red_edges -= 1;
        }

        prev
    }

    fn remove_edges_at_node(&mut self, u: Node) {
        let neighbors = self.neighborhood(u).iter().collect_vec();
        for v in neighbors {
            self.try_remove_edge(u, v);
        }
    }
}

impl fmt::Debug for Trigraph {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let nodes = self.vertices().sorted().collect_vec();
        let edges = self.colored_edges().sorted().collect_vec();
        write!(
            f,
            "Trigraph {{ width: {}, nodes: {:?}, edges: {:?} }}",
            self.width, nodes, edges
        )
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum GraphInvariantError {
    #[error("node {0} has a self-loop")]
    SelfLoop(Node),

    #[error("node {0} has neighbor {1} which is not part of the graph")]
    DanglingNeighbor(Node, Node),

    #[error("edge {0}-{1} is only stored at one endpoint or with different colors")]
    AsymmetricEdge(Node, Node),

    #[error("black and red edge coexist between {0} and {1}")]
    ColorConflict(Node, Node),

    #[error("{index} index files node {node} under {found:?} but its degree is {expected}")]
    DegreeIndexMismatch {
        index: &'static str,
        node: Node,
        expected: NumNodes,
        found: Option<NumNodes>,
    },

    #[error("{index} index holds {found} nodes but the graph has {expected}")]
    DegreeIndexSize {
        index: &'static str,
        expected: usize,
        found: usize,
    },

    #[error("stored edge count {stored} differs from actual count {actual}")]
    EdgeCount { stored: NumEdges, actual: NumEdges },

    #[error("width {width} is below the red degree {red_degree} of node {node}")]
    WidthBelowRedDegree {
        width: NumNodes,
        node: Node,
        red_degree: NumNodes,
    },
}

impl InvariantCheck<GraphInvariantError> for Trigraph {
    fn is_correct(&self) -> Result<(), GraphInvariantError> {
        let mut black_half_edges: NumEdges = 0;
        let mut red_half_edges: NumEdges = 0;

        for (&u, nb) in &self.adj {
            if nb.contains(u) {
                return Err(GraphInvariantError::SelfLoop(u));
            }

            for (neighbors, color) in [(&nb.black, EdgeKind::Black), (&nb.red, EdgeKind::Red)] {
                for &v in neighbors {
                    let other = self
                        .adj
                        .get(&v)
                        .ok_or(GraphInvariantError::DanglingNeighbor(u, v))?;

                    if other.edge_type_with(u) != color {
                        return Err(GraphInvariantError::AsymmetricEdge(u, v));
                    }
                }
            }

            if let Some(&v) = nb.black.iter().find(|v| nb.red.contains(v)) {
                return Err(GraphInvariantError::ColorConflict(u, v));
            }

            black_half_edges += nb.black.len() as NumEdges;
            red_half_edges += nb.red.len() as NumEdges;

            for (index, name, expected) in [
                (&self.red_degrees, "red degree", nb.red.len() as NumNodes),
                (&self.total_degrees, "total degree", nb.degree()),
            ] {
                let found = index.degree_of(u);
                if found != Some(expected) {
                    return Err(GraphInvariantError::DegreeIndexMismatch {
                        index: name,
                        node: u,
                        expected,
                        found,
                    });
                }
            }

            if nb.red.len() as NumNodes > self.width {
                return Err(GraphInvariantError::WidthBelowRedDegree {
                    width: self.width,
                    node: u,
                    red_degree: nb.red.len() as NumNodes,
                });
            }
        }

        for (index, name) in [
            (&self.red_degrees, "red degree"),
            (&self.total_degrees, "total degree"),
        ] {
            if index.len() != self.adj.len() {
                return Err(GraphInvariantError::DegreeIndexSize {
                    index: name,
                    expected: self.adj.len(),
                    found: index.len(),
                });
            }
        }

        let actual = (black_half_edges + red_half_edges) / 2;
        if actual != self.number_of_edges || red_half_edges / 2 != self.number_of_red_edges {
            return Err(GraphInvariantError::EdgeCount {
                stored: self.number_of_edges,
                actual,
            });
        }

        Ok(())
    }
}
