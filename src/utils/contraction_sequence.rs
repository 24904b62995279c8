use std::io::Write;

use fxhash::FxHashSet;
use log::debug;

use crate::graph::*;

/// Ordered list of merges `(source, twin)`; in each merge `twin` is contracted into `source`
/// and ceases to exist. Node ids are 0-based internally and 1-based when written.
#[derive(Clone, Debug, Default, Eq, PartialEq, Hash)]
pub struct ContractionSequence {
    seq: Vec<(Node, Node)>,
}

impl ContractionSequence {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(num_nodes: NumNodes) -> Self {
        Self {
            seq: Vec::with_capacity((num_nodes as usize).saturating_sub(1)),
        }
    }

    /// Records that `twin` was contracted into `source`
    pub fn push_merge(&mut self, source: Node, twin: Node) {
        debug_assert_ne!(source, twin);
        debug_assert!(
            self.seq
                .iter()
                .all(|&(_, removed)| removed != source && removed != twin)
        );
        self.seq.push((source, twin))
    }

    pub fn merges(&self) -> &[(Node, Node)] {
        &self.seq
    }

    pub fn len(&self) -> NumNodes {
        self.seq.len() as NumNodes
    }

    pub fn is_empty(&self) -> bool {
        self.seq.is_empty()
    }

    /// Survivor of the last merge
    pub fn last_survivor(&self) -> Option<Node> {
        self.seq.last().map(|&(source, _)| source)
    }

    /// Appends another contraction sequence at the end of this one
    pub fn append(&mut self, other: &ContractionSequence) {
        self.seq.reserve(other.seq.len());
        for &(source, twin) in &other.seq {
            self.push_merge(source, twin);
        }
    }

    /// If the sequence is valid for a graph with the given nodes (but possibly incomplete),
    /// this method returns `Some(nodes)` where `nodes` is the set of still unmerged nodes.
    /// If the sequence is infeasible (e.g. because a node is removed twice), returns `None`.
    pub fn remaining_nodes(&self, nodes: impl IntoIterator<Item = Node>) -> Option<FxHashSet<Node>> {
        let mut alive: FxHashSet<Node> = nodes.into_iter().collect();

        for &(source, twin) in &self.seq {
            if source == twin || !alive.contains(&source) || !alive.remove(&twin) {
                debug!("Infeasible merge ({source}, {twin}) in contraction sequence");
                return None;
            }
        }

        Some(alive)
    }

    /// Replays the sequence on `graph` and returns the twin-width it attains, or `None` if the
    /// sequence is infeasible or does not contract the graph into a single node.
    pub fn compute_twin_width(&self, mut graph: Trigraph) -> Option<NumNodes> {
        self.remaining_nodes(graph.vertices())
            .filter(|remaining| remaining.len() <= 1)?;

        // this is a checker; let's make it plain stupid to avoid bugs.
        // red edges removed before the replay still count towards the width
        let mut twin_width = graph.width().max(
            graph
                .vertices()
                .map(|u| graph.red_degree_of(u))
                .max()
                .unwrap_or(0),
        );

        for &(source, twin) in &self.seq {
            graph.merge_vertices(source, twin);
            let max_red_deg = graph
                .vertices()
                .map(|u| graph.red_degree_of(u))
                .max()
                .unwrap_or(0);
            twin_width = twin_width.max(max_red_deg);
        }

        debug_assert_eq!(twin_width, graph.width());
        Some(twin_width)
    }

    /// Writes one line `source twin` (1-based) per merge
    pub fn pace_writer<W: Write>(&self, mut writer: W) -> std::io::Result<()> {
        for &(source, twin) in &self.seq {
            writeln!(writer, "{} {}", source + 1, twin + 1)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod test {
    use super::*;

    fn path(n: NumNodes) -> Trigraph {
        let mut graph = Trigraph::new(n);
        graph.add_edges((1..n).map(|u| (u - 1, u)), EdgeColor::Black);
        graph
    }

    #[test]
    fn remaining_nodes() {
        let mut cs = ContractionSequence::new();
        cs.push_merge(0, 1);
        cs.push_merge(2, 3);

        let remaining = cs.remaining_nodes(0..5).unwrap();
        let mut remaining: Vec<_> = remaining.into_iter().collect();
        remaining.sort();
        assert_eq!(remaining, [0, 2, 4]);

        cs.push_merge(0, 4);
        cs.push_merge(2, 0);
        assert_eq!(cs.remaining_nodes(0..5).unwrap().len(), 1);
        assert_eq!(cs.last_survivor(), Some(2));
        assert_eq!(cs.len(), 4);
    }

    #[test]
    fn infeasible() {
        let cs = ContractionSequence {
            seq: vec![(0, 1), (1, 2)],
        };
        assert!(cs.remaining_nodes(0..3).is_none());
        assert!(cs.compute_twin_width(path(3)).is_none());
    }

    #[test]
    fn compute_twin_width() {
        let mut good = ContractionSequence::new();
        good.push_merge(0, 2);
        good.push_merge(0, 1);
        assert_eq!(good.compute_twin_width(path(3)), Some(0));

        let mut bad = ContractionSequence::new();
        bad.push_merge(0, 1);
        bad.push_merge(0, 2);
        assert_eq!(bad.compute_twin_width(path(3)), Some(1));

        let mut incomplete = ContractionSequence::new();
        incomplete.push_merge(0, 2);
        assert_eq!(incomplete.compute_twin_width(path(3)), None);
    }

    #[test]
    fn width_history_is_kept() {
        let mut graph = Trigraph::new(3);
        graph.add_edge(0, 1, EdgeColor::Red);
        graph.add_edge(0, 2, EdgeColor::Red);
        graph.remove_edge(0, 2);
        assert_eq!(graph.width(), 2);
        assert_eq!(graph.max_red_degree(), 1);

        let mut cs = ContractionSequence::new();
        cs.push_merge(0, 1);
        cs.push_merge(0, 2);
        assert_eq!(cs.compute_twin_width(graph), Some(2));
    }

    #[test]
    fn pace_writer() {
        let mut cs = ContractionSequence::with_capacity(3);
        cs.push_merge(0, 2);
        cs.push_merge(0, 1);

        let mut buffer: Vec<u8> = Vec::new();
        cs.pace_writer(&mut buffer).unwrap();
        assert_eq!(String::from_utf8(buffer).unwrap(), "1 3\n1 2\n");
    }

    #[test]
    fn append() {
        let mut first = ContractionSequence::new();
        first.push_merge(0, 1);
        let mut second = ContractionSequence::new();
        second.push_merge(2, 3);

        first.append(&second);
        assert_eq!(first.merges(), [(0, 1), (2, 3)]);
    }
}
