pub mod bipartite;
pub mod complement;
pub mod connectivity;
pub mod degree_index;
pub mod edge;
pub mod gnp;
pub mod trigraph;

pub type Node = u32;
pub type NumNodes = Node;
pub type NumEdges = u64;

pub use bipartite::*;
pub use complement::*;
pub use connectivity::*;
pub use degree_index::*;
pub use edge::*;
pub use gnp::*;
pub use trigraph::*;

/// Provides getters pertaining to the size of a graph
pub trait GraphNodeOrder {
    /// Returns the number of (live) nodes of the graph
    fn number_of_nodes(&self) -> NumNodes;

    /// Return the number of nodes as usize
    fn len(&self) -> usize {
        self.number_of_nodes() as usize
    }

    /// Returns an iterator over V. Node ids need not be contiguous.
    fn vertices(&self) -> impl Iterator<Item = Node> + '_;

    /// Returns true iff `u` is a live node of the graph
    fn has_vertex(&self, u: Node) -> bool;

    /// Returns true if the graph has no nodes (and thus no edges)
    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

pub trait GraphEdgeOrder {
    /// Returns the number of edges of the graph
    fn number_of_edges(&self) -> NumEdges;
}

pub trait ColoredAdjacencyList: GraphNodeOrder {
    /// Returns the black neighbors of a given vertex.
    /// ** Panics if `u` is not a node of the graph **
    fn black_neighbors_of(&self, u: Node) -> impl Iterator<Item = Node> + '_;

    /// Returns the red neighbors of a given vertex.
    /// ** Panics if `u` is not a node of the graph **
    fn red_neighbors_of(&self, u: Node) -> impl Iterator<Item = Node> + '_;

    /// Returns all neighbors (black first, then red) of a given vertex.
    fn neighbors_of(&self, u: Node) -> impl Iterator<Item = Node> + '_ {
        self.black_neighbors_of(u).chain(self.red_neighbors_of(u))
    }

    fn black_degree_of(&self, u: Node) -> NumNodes {
        self.black_neighbors_of(u).count() as NumNodes
    }

    fn red_degree_of(&self, u: Node) -> NumNodes {
        self.red_neighbors_of(u).count() as NumNodes
    }

    fn degree_of(&self, u: Node) -> NumNodes {
        self.black_degree_of(u) + self.red_degree_of(u)
    }
}

pub trait ColoredAdjacencyTest {
    fn type_of_edge(&self, u: Node, v: Node) -> EdgeKind;

    fn has_edge(&self, u: Node, v: Node) -> bool {
        self.type_of_edge(u, v).is_some()
    }

    fn has_black_edge(&self, u: Node, v: Node) -> bool {
        self.type_of_edge(u, v).is_black()
    }

    fn has_red_edge(&self, u: Node, v: Node) -> bool {
        self.type_of_edge(u, v).is_red()
    }
}

pub trait GraphNew {
    /// Creates a graph with the singleton nodes `0..n`
    fn new(n: NumNodes) -> Self;
}

/// Provides functions to insert/delete edges
pub trait GraphEdgeEditing: GraphNew {
    /// Inserts the edge `{u, v}` with the given color unless the pair is already
    /// connected (by an edge of any color). Returns the previous state of the pair, i.e.
    /// `EdgeKind::None` exactly if the edge was inserted.
    /// ** Panics if u == v or if u, v are not nodes of the graph **
    fn try_add_edge(&mut self, u: Node, v: Node, color: EdgeColor) -> EdgeKind;

    /// Removes the edge `{u, v}` of whatever color and returns its previous state.
    /// ** Panics if u, v are not nodes of the graph **
    fn try_remove_edge(&mut self, u: Node, v: Node) -> EdgeKind;

    /// Removes all edges incident to `u`
    fn remove_edges_at_node(&mut self, u: Node);

    /// Idempotent variant of [`GraphEdgeEditing::try_add_edge`]
    fn add_edge(&mut self, u: Node, v: Node, color: EdgeColor) {
        self.try_add_edge(u, v, color);
    }

    /// Removes the edge if it exists; does nothing otherwise
    fn remove_edge(&mut self, u: Node, v: Node) {
        self.try_remove_edge(u, v);
    }

    fn add_edges(&mut self, edges: impl IntoIterator<Item = impl Into<Edge>>, color: EdgeColor) {
        for Edge(u, v) in edges.into_iter().map(|d| d.into()) {
            self.add_edge(u, v, color);
        }
    }
}
