use std::time::{Duration, Instant};

use log::{debug, info, trace};
use rand::Rng;

use super::{
    candidates::{CandidateStrategy, LowestRedDegree, DEFAULT_POOL_SIZE},
    fallback::random_contraction_sequence,
    score::{ScoreCache, ScoreStrategy, SymmetricDifferenceScore},
};
use crate::{
    algorithm::{IterativeAlgorithm, TerminatingIterativeAlgorithm},
    graph::*,
    utils::ContractionSequence,
};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SearchState {
    /// More than one node remains and the search may carry out further greedy merges
    Running,
    /// The search was stopped early; the remaining nodes still need to be contracted
    TimedOut,
    /// At most one node remains
    Terminal,
}

/// Outcome of a search on a single (connected) graph
#[derive(Clone, Debug)]
pub struct ComponentSolution {
    pub sequence: ContractionSequence,
    pub width: NumNodes,
    /// The only node left after the contraction; `None` for the empty graph
    pub survivor: Option<Node>,
    pub timed_out: bool,
    /// Number of greedy merges; the remaining merges were chosen by the fallback
    pub greedy_merges: NumNodes,
    /// Score lookups answered by the cache and scores computed, respectively
    pub cache_hits_and_misses: (u64, u64),
}

/// # Greedy contraction search
///
/// Each step asks the [`CandidateStrategy`] for the pairs of the current round, scores them
/// with the [`ScoreStrategy`] (through a [`ScoreCache`]) and contracts the best pair, where
/// ties are broken in favor of the first pair evaluated. The search terminates once a single
/// node is left. If it is stopped before (see [`ContractionSearch::run`]), the remaining
/// nodes are contracted by [`random_contraction_sequence`].
pub struct ContractionSearch<R> {
    graph: Trigraph,
    candidates: Box<dyn CandidateStrategy>,
    scorer: Box<dyn ScoreStrategy>,
    cache: ScoreCache,
    sequence: ContractionSequence,
    rng: R,
    state: SearchState,
    greedy_merges: NumNodes,
}

impl<R: Rng> ContractionSearch<R> {
    pub fn new(
        graph: Trigraph,
        candidates: Box<dyn CandidateStrategy>,
        scorer: Box<dyn ScoreStrategy>,
        rng: R,
    ) -> Self {
        let state = if graph.number_of_nodes() > 1 {
            SearchState::Running
        } else {
            SearchState::Terminal
        };

        Self {
            sequence: ContractionSequence::with_capacity(graph.number_of_nodes()),
            graph,
            candidates,
            scorer,
            cache: ScoreCache::new(),
            rng,
            state,
            greedy_merges: 0,
        }
    }

    /// Search with the lowest red degree pool of default size and the symmetric difference score
    pub fn with_default_strategies(graph: Trigraph, rng: R) -> Self {
        Self::new(
            graph,
            Box::new(LowestRedDegree {
                pool_size: DEFAULT_POOL_SIZE,
            }),
            Box::new(SymmetricDifferenceScore),
            rng,
        )
    }

    pub fn state(&self) -> SearchState {
        self.state
    }

    pub fn graph(&self) -> &Trigraph {
        &self.graph
    }

    pub fn sequence(&self) -> &ContractionSequence {
        &self.sequence
    }

    /// Returns the best pair of the current round and its score
    pub fn best_pair(&mut self) -> Option<((Node, Node), NumNodes)> {
        let mut pairs = self.candidates.candidate_pairs(&self.graph);
        if pairs.is_empty() {
            let pool = self.graph.lowest_red_degree_nodes(2);
            if let &[u, v] = pool.as_slice() {
                pairs.push((u, v));
            }
        }

        let mut best: Option<((Node, Node), NumNodes)> = None;
        for (u, v) in pairs {
            let graph = &self.graph;
            let scorer = &self.scorer;
            let score = self
                .cache
                .get_or_insert_with(u, v, || scorer.score(graph, u, v));

            if best.is_none_or(|(_, best_score)| score < best_score) {
                best = Some(((u, v), score));
            }
        }

        best
    }

    /// Contracts `twin` into `source`, records the merge and updates the score cache
    fn contract(&mut self, source: Node, twin: Node) {
        if self.scorer.is_local() {
            let touched = self
                .graph
                .neighbors_of(source)
                .chain(self.graph.neighbors_of(twin))
                .chain([source, twin])
                .collect::<Vec<_>>();
            self.cache.evict_nodes(touched);
        } else {
            self.cache.clear();
        }

        self.graph.merge_vertices(source, twin);
        self.sequence.push_merge(source, twin);
    }

    /// Contracts all remaining nodes with the random fallback; no-op unless timed out
    fn resolve_remaining(&mut self) {
        if self.state != SearchState::TimedOut {
            return;
        }

        let remaining = self.graph.number_of_nodes();
        let tail = random_contraction_sequence(&mut self.graph, &mut self.rng);
        debug!(
            "Fallback contracted the remaining {} nodes; width {}",
            remaining,
            self.graph.width()
        );
        self.sequence.append(&tail);
        self.state = SearchState::Terminal;
    }

    /// Runs the greedy search until at most one node remains or the time `budget` (if any) is
    /// exhausted. The budget is checked after every merge, so at least one greedy merge is
    /// carried out. A received termination signal is treated as an exhausted budget.
    pub fn run(mut self, budget: Option<Duration>) -> ComponentSolution {
        let start = Instant::now();
        let initial_nodes = self.graph.number_of_nodes();

        match budget {
            Some(budget) => self.run_until_timeout(budget),
            None => self.run_while(|_| true),
        }

        if self.state == SearchState::Running {
            info!(
                "Search stopped after {} ms with {} of {} nodes left; contracting the rest randomly",
                start.elapsed().as_millis(),
                self.graph.number_of_nodes(),
                initial_nodes
            );
            self.state = SearchState::TimedOut;
        }

        let timed_out = self.state == SearchState::TimedOut;
        self.resolve_remaining();
        debug_assert_eq!(self.state, SearchState::Terminal);

        ComponentSolution {
            survivor: self
                .sequence
                .last_survivor()
                .or_else(|| self.graph.vertices().next()),
            width: self.graph.width(),
            greedy_merges: self.greedy_merges,
            cache_hits_and_misses: self.cache.hits_and_misses(),
            timed_out,
            sequence: self.sequence,
        }
    }
}

impl<R: Rng> IterativeAlgorithm<ContractionSequence> for ContractionSearch<R> {
    fn execute_step(&mut self) {
        assert_eq!(self.state, SearchState::Running);

        let Some(((source, twin), score)) = self.best_pair() else {
            self.state = SearchState::Terminal;
            return;
        };

        self.contract(source, twin);
        self.greedy_merges += 1;

        trace!(
            "({} left) contracted {} <- {} with score {}, width {}",
            self.graph.number_of_nodes(),
            source,
            twin,
            score,
            self.graph.width()
        );

        if self.graph.number_of_nodes() <= 1 {
            self.state = SearchState::Terminal;
        }
    }

    fn is_completed(&self) -> bool {
        self.state != SearchState::Running
    }

    fn best_known_solution(&mut self) -> Option<ContractionSequence> {
        (self.state == SearchState::Terminal).then(|| self.sequence.clone())
    }
}

impl<R: Rng> TerminatingIterativeAlgorithm<ContractionSequence> for ContractionSearch<R> {}

#[cfg(test)]
mod test {
    use itertools::Itertools;
    use rand::SeedableRng;
    use rand_pcg::Pcg64;

    use super::*;
    use crate::{
        errors::InvariantCheck,
        heuristic::{CandidateKind, ScoreKind},
    };

    fn rng() -> Pcg64 {
        Pcg64::seed_from_u64(0x7717)
    }

    fn path(n: NumNodes) -> Trigraph {
        let mut graph = Trigraph::new(n);
        graph.add_edges((1..n).map(|u| (u - 1, u)), EdgeColor::Black);
        graph
    }

    #[test]
    fn triangle() {
        let mut triangle = Trigraph::new(3);
        triangle.add_edges([(0, 1), (1, 2), (0, 2)], EdgeColor::Black);

        let solution = ContractionSearch::with_default_strategies(triangle.clone(), rng()).run(None);
        assert_eq!(solution.sequence.len(), 2);
        assert_eq!(solution.width, 0);
        assert!(!solution.timed_out);
        assert_eq!(solution.sequence.compute_twin_width(triangle), Some(0));
    }

    #[test]
    fn path_prefers_twins() {
        let path = path(3);

        let mut search = ContractionSearch::with_default_strategies(path.clone(), rng());
        let ((u, v), score) = search.best_pair().unwrap();
        assert_eq!(score, 0);
        assert_eq!(
            [u, v].into_iter().sorted().collect_vec(),
            [0, 2],
            "end points of the path are twins"
        );

        let solution = search.run(None);
        assert_eq!(solution.width, 0);
        assert_eq!(solution.sequence.compute_twin_width(path), Some(0));
    }

    #[test]
    fn long_path() {
        let graph = path(50);
        let solution = ContractionSearch::with_default_strategies(graph.clone(), rng()).run(None);

        assert_eq!(solution.sequence.len(), 49);
        assert!(!solution.timed_out);
        assert_eq!(solution.greedy_merges, 49);
        assert_eq!(solution.sequence.compute_twin_width(graph), Some(solution.width));
    }

    #[test]
    fn degenerate() {
        let empty = ContractionSearch::with_default_strategies(Trigraph::empty(), rng()).run(None);
        assert!(empty.sequence.is_empty());
        assert_eq!(empty.survivor, None);
        assert_eq!(empty.width, 0);

        let mut single = Trigraph::empty();
        single.add_vertex(42);
        let mut search = ContractionSearch::with_default_strategies(single, rng());
        assert_eq!(search.state(), SearchState::Terminal);
        assert_eq!(search.best_known_solution(), Some(ContractionSequence::new()));

        let single = search.run(Some(Duration::ZERO));
        assert!(single.sequence.is_empty());
        assert_eq!(single.survivor, Some(42));
        assert!(!single.timed_out);
    }

    #[test]
    fn timeout_with_two_remaining_nodes() {
        let graph = path(3);
        let solution =
            ContractionSearch::with_default_strategies(graph.clone(), rng()).run(Some(Duration::ZERO));

        // one greedy merge, the last one is resolved by the fallback
        assert!(solution.timed_out);
        assert_eq!(solution.greedy_merges, 1);
        assert_eq!(solution.sequence.len(), 2);
        assert_eq!(solution.sequence.compute_twin_width(graph), Some(solution.width));
    }

    #[test]
    fn timeout_yields_complete_sequence() {
        let mut gen_rng = Pcg64::seed_from_u64(0x7e57);
        let graph = Trigraph::random_black_gnp(&mut gen_rng, 40, 0.2);

        let solution =
            ContractionSearch::with_default_strategies(graph.clone(), rng()).run(Some(Duration::ZERO));
        assert!(solution.timed_out);
        assert_eq!(solution.sequence.len(), 39);
        assert_eq!(
            solution.sequence.remaining_nodes(graph.vertices()).map(|r| r.len()),
            Some(1)
        );
        assert_eq!(solution.sequence.compute_twin_width(graph), Some(solution.width));
    }

    #[test]
    fn step_by_step() {
        let mut gen_rng = Pcg64::seed_from_u64(0x5739);
        let graph = Trigraph::random_colored_gnp(&mut gen_rng, 30, 0.3, 0.9);

        let mut search = ContractionSearch::with_default_strategies(graph.clone(), rng());
        let mut last_width = search.graph().width();
        let mut nodes = graph.number_of_nodes();

        while !search.is_completed() {
            assert_eq!(search.best_known_solution(), None);
            search.execute_step();

            nodes -= 1;
            assert_eq!(search.graph().number_of_nodes(), nodes);
            assert!(search.graph().width() >= last_width);
            assert!(search.graph().width() >= search.graph().max_red_degree());
            assert!(search.graph().is_correct().is_ok());
            last_width = search.graph().width();
        }

        let sequence = search.best_known_solution().unwrap();
        assert_eq!(sequence.len(), 29);
        assert_eq!(sequence.compute_twin_width(graph), Some(last_width));
    }

    #[test]
    fn cached_scores_stay_valid() {
        let mut gen_rng = Pcg64::seed_from_u64(0xcace);

        for _ in 0..20 {
            let graph = Trigraph::random_black_gnp(&mut gen_rng, 25, 0.25);
            let mut search = ContractionSearch::with_default_strategies(graph, rng());

            while !search.is_completed() {
                let graph = search.graph().clone();
                for (u, v) in graph.vertices().sorted().tuple_combinations() {
                    if let Some(cached) = search.cache.get(u, v) {
                        assert_eq!(cached, graph.symmetric_difference_score(u, v));
                    }
                }
                search.execute_step();
            }
        }
    }

    #[test]
    fn all_strategies() {
        let mut gen_rng = Pcg64::seed_from_u64(0xa11);

        for candidates in [
            CandidateKind::LowestRedDegree,
            CandidateKind::LowestTotalDegree,
            CandidateKind::Partitioned,
            CandidateKind::TwoNeighborhood,
        ] {
            for score in [ScoreKind::SymmetricDifference, ScoreKind::ExactTrial] {
                let graph = Trigraph::random_black_gnp(&mut gen_rng, 20, 0.3);
                let bipartition = graph.compute_bipartition();

                let solution = ContractionSearch::new(
                    graph.clone(),
                    candidates.build(8, bipartition),
                    score.build(),
                    rng(),
                )
                .run(None);

                assert_eq!(solution.sequence.len(), 19, "{candidates} {score}");
                assert_eq!(
                    solution.sequence.compute_twin_width(graph),
                    Some(solution.width)
                );
            }
        }
    }
}
