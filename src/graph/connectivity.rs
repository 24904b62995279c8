use std::collections::VecDeque;

use fxhash::FxHashSet;
use itertools::Itertools;

use super::*;

pub trait Connectivity {
    /// Returns the node sets of all connected components (red and black edges both connect).
    /// Components are ordered by their smallest node and each component is sorted, so the
    /// result does not depend on the iteration order of the graph.
    fn connected_components(&self) -> Vec<Vec<Node>>;
}

impl<G> Connectivity for G
where
    G: ColoredAdjacencyList,
{
    fn connected_components(&self) -> Vec<Vec<Node>> {
        let mut visited = FxHashSet::default();
        let mut queue = VecDeque::new();
        let mut components = Vec::new();

        for start in self.vertices().sorted() {
            if !visited.insert(start) {
                continue;
            }

            let mut component = vec![start];
            queue.push_back(start);

            while let Some(u) = queue.pop_front() {
                for v in self.neighbors_of(u) {
                    if visited.insert(v) {
                        component.push(v);
                        queue.push_back(v);
                    }
                }
            }

            component.sort_unstable();
            components.push(component);
        }

        components
    }
}

/// Splits `graph` into one [`Trigraph`] per connected component; node ids are kept
pub fn split_into_components(graph: &Trigraph) -> Vec<Trigraph> {
    graph
        .connected_components()
        .iter()
        .map(|nodes| graph.vertex_induced(nodes))
        .collect()
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn connected_components() {
        let mut graph = Trigraph::new(7);
        graph.add_edges([(1, 2), (2, 3), (4, 5)], EdgeColor::Black);
        graph.add_edge(6, 4, EdgeColor::Red);

        let components = graph.connected_components();
        assert_eq!(components, vec![vec![0], vec![1, 2, 3], vec![4, 5, 6]]);
    }

    #[test]
    fn split() {
        let mut graph = Trigraph::new(6);
        graph.add_edges([(0, 5), (1, 2), (2, 3)], EdgeColor::Black);

        let parts = split_into_components(&graph);
        assert_eq!(parts.len(), 3);
        assert_eq!(
            parts.iter().map(|g| g.number_of_nodes()).collect_vec(),
            [2, 3, 1]
        );
        assert!(parts[0].has_black_edge(0, 5));
        assert!(parts[1].has_black_edge(2, 3));
        assert!(parts[2].has_vertex(4));
        assert_eq!(
            parts.iter().map(|g| g.number_of_edges()).sum::<NumEdges>(),
            graph.number_of_edges()
        );
    }

    #[test]
    fn empty() {
        assert!(Trigraph::empty().connected_components().is_empty());
    }
}
