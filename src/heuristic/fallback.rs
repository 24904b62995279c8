use itertools::Itertools;
use rand::Rng;

use crate::{graph::*, utils::ContractionSequence};

/// Contracts `graph` down to a single node by merging random pairs; used once the
/// search ran out of time. Each step picks two distinct positions among the remaining
/// nodes, merges the second into the first and drops it. The merges are carried out on
/// `graph`, so its width afterwards is the width of the complete sequence.
///
/// With exactly two remaining nodes the only possible pair is emitted without drawing
/// from `rng`.
pub fn random_contraction_sequence<R: Rng>(
    graph: &mut Trigraph,
    rng: &mut R,
) -> ContractionSequence {
    let mut remaining = graph.vertices().sorted_unstable().collect_vec();
    let mut sequence = ContractionSequence::with_capacity(remaining.len() as NumNodes);

    while remaining.len() > 1 {
        let (first, second) = if remaining.len() == 2 {
            (0, 1)
        } else {
            let first = rng.gen_range(0..remaining.len());
            let second = loop {
                let x = rng.gen_range(0..remaining.len());
                if x != first {
                    break x;
                }
            };
            (first, second)
        };

        let (source, twin) = (remaining[first], remaining[second]);
        graph.merge_vertices(source, twin);
        sequence.push_merge(source, twin);
        remaining.swap_remove(second);
    }

    sequence
}
