use std::collections::VecDeque;

use fxhash::{FxHashMap, FxHashSet};
use itertools::Itertools;

use super::*;

/// Nodes contained in the set form one side of the bipartition, all other nodes the other.
pub type Bipartition = FxHashSet<Node>;

pub trait BipartiteTest {
    fn is_bipartition(&self, candidate: &Bipartition) -> bool;
    fn compute_bipartition(&self) -> Option<Bipartition>;
    fn is_bipartite(&self) -> bool {
        self.compute_bipartition().is_some()
    }
}

impl<G> BipartiteTest for G
where
    G: ColoredAdjacencyList,
{
    fn is_bipartition(&self, candidate: &Bipartition) -> bool {
        self.vertices().all(|u| {
            self.neighbors_of(u)
                .all(|v| candidate.contains(&u) != candidate.contains(&v))
        })
    }

    fn compute_bipartition(&self) -> Option<Bipartition> {
        let candidate = propose_possibly_illegal_bipartition(self);
        self.is_bipartition(&candidate).then_some(candidate)
    }
}

// Compute a bipartition of `graph` if `graph` is bipartite; otherwise an arbitrary
// partition is returned
fn propose_possibly_illegal_bipartition<G: ColoredAdjacencyList>(graph: &G) -> Bipartition {
    let mut side: FxHashMap<Node, bool> = FxHashMap::default();
    let mut queue = VecDeque::new();

    for start in graph.vertices().sorted() {
        if side.contains_key(&start) {
            continue;
        }

        side.insert(start, false);
        queue.push_back(start);

        while let Some(u) = queue.pop_front() {
            let other = !side[&u];
            for v in graph.neighbors_of(u) {
                if let std::collections::hash_map::Entry::Vacant(entry) = side.entry(v) {
                    entry.insert(other);
                    queue.push_back(v);
                }
            }
        }
    }

    side.into_iter()
        .filter_map(|(u, right)| right.then_some(u))
        .collect()
}
