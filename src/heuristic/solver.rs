use std::time::{Duration, Instant};

use log::{debug, info};
use rand::SeedableRng;
use rand_pcg::Pcg64;
use serde::Serialize;

use super::{
    candidates::{CandidateKind, DEFAULT_POOL_SIZE},
    score::ScoreKind,
    search::ContractionSearch,
};
use crate::{graph::*, utils::ContractionSequence};

pub const DEFAULT_SEED: u64 = 0x7777_2023;

/// Parameters of [`solve_components`]; the default is the plain greedy search (pool of
/// [`DEFAULT_POOL_SIZE`] lowest red degree nodes, symmetric difference score, no time limit)
#[derive(Clone, Debug, PartialEq)]
pub struct SearchConfig {
    pub pool_size: usize,
    /// Shared by all components; once exceeded the remaining nodes are contracted randomly
    pub time_budget: Option<Duration>,
    pub candidates: CandidateKind,
    pub score: ScoreKind,
    pub seed: u64,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            pool_size: DEFAULT_POOL_SIZE,
            time_budget: None,
            candidates: CandidateKind::default(),
            score: ScoreKind::default(),
            seed: DEFAULT_SEED,
        }
    }
}

#[derive(Clone, Debug, Serialize)]
pub struct ComponentStats {
    pub nodes: NumNodes,
    pub edges: NumEdges,
    pub width: NumNodes,
    pub greedy_merges: NumNodes,
    pub timed_out: bool,
    pub bipartite: Option<bool>,
    pub cache_hits: u64,
    pub cache_misses: u64,
    pub elapsed_ms: u128,
}

#[derive(Clone, Debug, Serialize)]
pub struct SolverStats {
    pub nodes: NumNodes,
    pub edges: NumEdges,
    pub width: NumNodes,
    pub candidates: String,
    pub score: String,
    pub pool_size: usize,
    pub seed: u64,
    pub elapsed_ms: u128,
    pub components: Vec<ComponentStats>,
}

#[derive(Clone, Debug)]
pub struct Solution {
    /// Contracts the whole graph into a single node
    pub sequence: ContractionSequence,
    /// Largest red degree attained by `sequence`
    pub width: NumNodes,
    pub stats: SolverStats,
}

/// Splits `graph` into connected components, contracts each with a [`ContractionSearch`]
/// and finally merges the survivors of all components into the survivor of the first one.
/// These joins only involve isolated nodes and thus create no red edges; the width of the
/// solution is the largest width among the components (or the width `graph` already had).
pub fn solve_components(graph: &Trigraph, config: &SearchConfig) -> Solution {
    let start = Instant::now();
    let deadline = config.time_budget.map(|budget| start + budget);
    let mut rng = Pcg64::seed_from_u64(config.seed);

    let components = split_into_components(graph);
    info!(
        "Graph with n={} m={} has {} components; candidates={} score={} k={}",
        graph.number_of_nodes(),
        graph.number_of_edges(),
        components.len(),
        config.candidates,
        config.score,
        config.pool_size
    );

    let mut sequence = ContractionSequence::with_capacity(graph.number_of_nodes());
    let mut survivors = Vec::with_capacity(components.len());
    let mut component_stats = Vec::with_capacity(components.len());
    // red edges of the input count towards the width even if they were removed since
    let mut width = graph.width();

    for (index, component) in components.into_iter().enumerate() {
        let component_start = Instant::now();
        let nodes = component.number_of_nodes();
        let edges = component.number_of_edges();

        let bipartition = (config.candidates.uses_bipartition() && nodes > 1)
            .then(|| component.compute_bipartition());
        let bipartite = bipartition.as_ref().map(|b| b.is_some());

        debug!(
            "Component {index}: n={nodes} m={edges}{}",
            match bipartite {
                Some(true) => " (bipartite)",
                _ => "",
            }
        );

        let search = ContractionSearch::new(
            component,
            config.candidates.build(config.pool_size, bipartition.flatten()),
            config.score.build(),
            &mut rng,
        );
        let budget = deadline.map(|d| d.saturating_duration_since(Instant::now()));
        let solution = search.run(budget);
        let (cache_hits, cache_misses) = solution.cache_hits_and_misses;

        debug!(
            "Component {index} contracted with width {} in {} ms{}; score cache: {} hits, {} misses",
            solution.width,
            component_start.elapsed().as_millis(),
            if solution.timed_out { " (timed out)" } else { "" },
            cache_hits,
            cache_misses
        );

        width = width.max(solution.width);
        sequence.append(&solution.sequence);
        survivors.extend(solution.survivor);
        component_stats.push(ComponentStats {
            nodes,
            edges,
            width: solution.width,
            greedy_merges: solution.greedy_merges,
            timed_out: solution.timed_out,
            bipartite,
            cache_hits,
            cache_misses,
            elapsed_ms: component_start.elapsed().as_millis(),
        });
    }

    if let Some((&anchor, others)) = survivors.split_first() {
        for &survivor in others {
            sequence.push_merge(anchor, survivor);
        }
    }

    info!(
        "Contraction sequence of width {} found in {} ms",
        width,
        start.elapsed().as_millis()
    );

    Solution {
        sequence,
        width,
        stats: SolverStats {
            nodes: graph.number_of_nodes(),
            edges: graph.number_of_edges(),
            width,
            candidates: config.candidates.to_string(),
            score: config.score.to_string(),
            pool_size: config.pool_size,
            seed: config.seed,
            elapsed_ms: start.elapsed().as_millis(),
            components: component_stats,
        },
    }
}
