use std::{fmt, str::FromStr};

use itertools::Itertools;

use crate::graph::*;

/// Default number of nodes taken from the degree index per round
pub const DEFAULT_POOL_SIZE: usize = 20;

/// Number of nodes within distance two that [`TwoNeighborhood`] pairs with each seed
pub const TWO_NEIGHBORHOOD_PARTNERS: usize = 10;

/// Selects the pairs evaluated in one round of the contraction search.
pub trait CandidateStrategy {
    /// Bounded set of nodes the round draws its pairs from
    fn candidate_pool(&self, graph: &Trigraph) -> Vec<Node>;

    /// All pairs to be scored, in the order they are evaluated (ties go to the first pair).
    /// The default returns every pair `(pool[i], pool[j])` with `i < j`.
    fn candidate_pairs(&self, graph: &Trigraph) -> Vec<(Node, Node)> {
        all_pairs(&self.candidate_pool(graph))
    }
}

fn all_pairs(pool: &[Node]) -> Vec<(Node, Node)> {
    pool.iter()
        .enumerate()
        .flat_map(|(i, &u)| pool[i + 1..].iter().map(move |&v| (u, v)))
        .collect()
}

/// The `pool_size` nodes of smallest red degree
#[derive(Clone, Copy, Debug)]
pub struct LowestRedDegree {
    pub pool_size: usize,
}

impl CandidateStrategy for LowestRedDegree {
    fn candidate_pool(&self, graph: &Trigraph) -> Vec<Node> {
        graph.lowest_red_degree_nodes(self.pool_size)
    }
}

/// The `pool_size` nodes of smallest total degree
#[derive(Clone, Copy, Debug)]
pub struct LowestTotalDegree {
    pub pool_size: usize,
}

impl CandidateStrategy for LowestTotalDegree {
    fn candidate_pool(&self, graph: &Trigraph) -> Vec<Node> {
        graph.lowest_total_degree_nodes(self.pool_size)
    }
}

/// Takes half of the pool from each side of a bipartition (lowest red degree first) and only
/// pairs nodes of the same side. Without a bipartition, or if no side holds two nodes anymore,
/// it behaves like [`LowestRedDegree`].
#[derive(Clone, Debug)]
pub struct Partitioned {
    pub pool_size: usize,
    pub bipartition: Option<Bipartition>,
}

impl Partitioned {
    fn sides(&self, graph: &Trigraph) -> Option<(Vec<Node>, Vec<Node>)> {
        let bipartition = self.bipartition.as_ref()?;

        let right_size = self.pool_size / 2;
        let left_size = self.pool_size - right_size;

        let (right, left): (Vec<Node>, Vec<Node>) = graph
            .red_degree_index()
            .iter_ascending()
            .partition(|u| bipartition.contains(u));

        Some((
            left.into_iter().take(left_size).collect(),
            right.into_iter().take(right_size).collect(),
        ))
    }
}

impl CandidateStrategy for Partitioned {
    fn candidate_pool(&self, graph: &Trigraph) -> Vec<Node> {
        match self.sides(graph) {
            Some((left, right)) => left.into_iter().chain(right).collect(),
            None => graph.lowest_red_degree_nodes(self.pool_size),
        }
    }

    fn candidate_pairs(&self, graph: &Trigraph) -> Vec<(Node, Node)> {
        if let Some((left, right)) = self.sides(graph) {
            let pairs = all_pairs(&left).into_iter().chain(all_pairs(&right)).collect_vec();
            if !pairs.is_empty() {
                return pairs;
            }
        }

        all_pairs(&self.candidate_pool(graph))
    }
}

/// Pairs each of the `pool_size` nodes of smallest red degree (the seeds) with up to
/// [`TWO_NEIGHBORHOOD_PARTNERS`] nodes at distance at most two (smallest ids first).
/// Falls back to all pairs among the seeds if no seed has a partner.
#[derive(Clone, Copy, Debug)]
pub struct TwoNeighborhood {
    pub pool_size: usize,
}

impl CandidateStrategy for TwoNeighborhood {
    fn candidate_pool(&self, graph: &Trigraph) -> Vec<Node> {
        graph.lowest_red_degree_nodes(self.pool_size)
    }

    fn candidate_pairs(&self, graph: &Trigraph) -> Vec<(Node, Node)> {
        let seeds = self.candidate_pool(graph);

        let pairs = seeds
            .iter()
            .flat_map(|&u| {
                graph
                    .two_neighborhood(u)
                    .into_iter()
                    .sorted_unstable()
                    .take(TWO_NEIGHBORHOOD_PARTNERS)
                    .map(move |v| (u, v))
            })
            .collect_vec();

        if pairs.is_empty() {
            all_pairs(&seeds)
        } else {
            pairs
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum CandidateKind {
    #[default]
    LowestRedDegree,
    LowestTotalDegree,
    Partitioned,
    TwoNeighborhood,
}

impl CandidateKind {
    /// Instantiates the strategy; `bipartition` is only used by [`CandidateKind::Partitioned`]
    pub fn build(
        self,
        pool_size: usize,
        bipartition: Option<Bipartition>,
    ) -> Box<dyn CandidateStrategy> {
        match self {
            CandidateKind::LowestRedDegree => Box::new(LowestRedDegree { pool_size }),
            CandidateKind::LowestTotalDegree => Box::new(LowestTotalDegree { pool_size }),
            CandidateKind::Partitioned => Box::new(Partitioned {
                pool_size,
                bipartition,
            }),
            CandidateKind::TwoNeighborhood => Box::new(TwoNeighborhood { pool_size }),
        }
    }

    pub fn uses_bipartition(self) -> bool {
        self == CandidateKind::Partitioned
    }
}

impl FromStr for CandidateKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "lowest-red" => Ok(CandidateKind::LowestRedDegree),
            "lowest-total" => Ok(CandidateKind::LowestTotalDegree),
            "partitioned" => Ok(CandidateKind::Partitioned),
            "two-neighborhood" => Ok(CandidateKind::TwoNeighborhood),
            _ => Err(format!(
                "unknown candidate strategy '{s}'; expected lowest-red, lowest-total, partitioned or two-neighborhood"
            )),
        }
    }
}

impl fmt::Display for CandidateKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            CandidateKind::LowestRedDegree => "lowest-red",
            CandidateKind::LowestTotalDegree => "lowest-total",
            CandidateKind::Partitioned => "partitioned",
            CandidateKind::TwoNeighborhood => "two-neighborhood",
        })
    }
}

#[cfg(test)]
mod test {
    use super::*;

    /// Star with center 0 and leaves 1..=4; leaf 4 additionally has a red edge to 5
    fn star() -> Trigraph {
        let mut graph = Trigraph::new(6);
        graph.add_edges([(0, 1), (0, 2), (0, 3), (0, 4)], EdgeColor::Black);
        graph.add_edge(4, 5, EdgeColor::Red);
        graph
    }

    #[test]
    fn all_pairs_order() {
        assert_eq!(all_pairs(&[5, 2, 9]), [(5, 2), (5, 9), (2, 9)]);
        assert!(all_pairs(&[1]).is_empty());
    }

    #[test]
    fn lowest_red_degree() {
        let graph = star();
        let pool = LowestRedDegree { pool_size: 4 }.candidate_pool(&graph);
        assert_eq!(pool.len(), 4);
        assert!(pool.iter().all(|&u| graph.red_degree_of(u) == 0));

        let everything = LowestRedDegree { pool_size: 100 }.candidate_pool(&graph);
        assert_eq!(everything.len(), 6);

        let pairs = LowestRedDegree { pool_size: 4 }.candidate_pairs(&graph);
        assert_eq!(pairs.len(), 6);
    }

    #[test]
    fn lowest_total_degree() {
        let graph = star();
        let pool = LowestTotalDegree { pool_size: 4 }.candidate_pool(&graph);
        assert_eq!(pool.into_iter().sorted().collect_vec(), [1, 2, 3, 5]);
    }

    #[test]
    fn partitioned() {
        let graph = star();
        let bipartition = graph.compute_bipartition().unwrap();
        let strategy = Partitioned {
            pool_size: 4,
            bipartition: Some(bipartition.clone()),
        };

        let pairs = strategy.candidate_pairs(&graph);
        assert!(!pairs.is_empty());
        assert!(
            pairs
                .iter()
                .all(|(u, v)| bipartition.contains(u) == bipartition.contains(v))
        );
        assert!(strategy.candidate_pool(&graph).len() <= 4);

        let without = Partitioned {
            pool_size: 4,
            bipartition: None,
        };
        assert_eq!(
            without.candidate_pool(&graph),
            graph.lowest_red_degree_nodes(4)
        );
    }

    #[test]
    fn partitioned_single_nodes_per_side() {
        let mut graph = Trigraph::new(2);
        graph.add_edge(0, 1, EdgeColor::Black);

        let strategy = Partitioned {
            pool_size: 20,
            bipartition: graph.compute_bipartition(),
        };
        assert_eq!(strategy.candidate_pairs(&graph).len(), 1);
    }

    #[test]
    fn two_neighborhood() {
        let graph = star();
        let strategy = TwoNeighborhood { pool_size: 1 };
        let pairs = strategy.candidate_pairs(&graph);

        let seed = graph.lowest_red_degree_nodes(1)[0];
        assert!(!pairs.is_empty());
        assert!(pairs.iter().all(|&(u, v)| u == seed && u != v));
        assert!(
            pairs
                .iter()
                .all(|&(u, v)| graph.two_neighborhood(u).contains(&v))
        );
    }

    #[test]
    fn two_neighborhood_without_partners() {
        let graph = Trigraph::new(3);
        let pairs = TwoNeighborhood { pool_size: 20 }.candidate_pairs(&graph);
        assert_eq!(pairs.len(), 3);
    }

    #[test]
    fn kinds() {
        for kind in [
            CandidateKind::LowestRedDegree,
            CandidateKind::LowestTotalDegree,
            CandidateKind::Partitioned,
            CandidateKind::TwoNeighborhood,
        ] {
            assert_eq!(kind.to_string().parse::<CandidateKind>(), Ok(kind));
        }
        assert!("random-walk".parse::<CandidateKind>().is_err());
        assert!(CandidateKind::Partitioned.uses_bipartition());
        assert!(!CandidateKind::default().uses_bipartition());
    }
}
