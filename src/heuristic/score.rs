use std::{fmt, str::FromStr};

use fxhash::{FxHashMap, FxHashSet};

use crate::graph::*;

/// Estimates the cost of contracting a pair of nodes without modifying the graph.
/// Smaller scores are better.
pub trait ScoreStrategy {
    fn score(&self, graph: &Trigraph, u: Node, v: Node) -> NumNodes;

    /// Returns true if the score of `(u, v)` only depends on the neighborhoods of `u` and `v`.
    /// Scores of non-local strategies are invalidated by every contraction.
    fn is_local(&self) -> bool {
        true
    }
}

/// Number of red edges the contraction is forced to create: `|N(u) Δ N(v) \ {u, v}|`
#[derive(Clone, Copy, Debug, Default)]
pub struct SymmetricDifferenceScore;

impl ScoreStrategy for SymmetricDifferenceScore {
    fn score(&self, graph: &Trigraph, u: Node, v: Node) -> NumNodes {
        graph.symmetric_difference_score(u, v)
    }
}

/// Width of the graph after carrying out the contraction on a copy; O(graph size) per call
#[derive(Clone, Copy, Debug, Default)]
pub struct ExactTrialScore;

impl ScoreStrategy for ExactTrialScore {
    fn score(&self, graph: &Trigraph, u: Node, v: Node) -> NumNodes {
        graph.width_after_merge(u, v)
    }

    fn is_local(&self) -> bool {
        false
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ScoreKind {
    #[default]
    SymmetricDifference,
    ExactTrial,
}

impl ScoreKind {
    pub fn build(self) -> Box<dyn ScoreStrategy> {
        match self {
            ScoreKind::SymmetricDifference => Box::new(SymmetricDifferenceScore),
            ScoreKind::ExactTrial => Box::new(ExactTrialScore),
        }
    }
}

impl FromStr for ScoreKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "symmetric-difference" | "sd" => Ok(ScoreKind::SymmetricDifference),
            "exact-trial" | "exact" => Ok(ScoreKind::ExactTrial),
            _ => Err(format!(
                "unknown score strategy '{s}'; expected symmetric-difference or exact-trial"
            )),
        }
    }
}

impl fmt::Display for ScoreKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            ScoreKind::SymmetricDifference => "symmetric-difference",
            ScoreKind::ExactTrial => "exact-trial",
        })
    }
}

/// Memoizes scores by unordered pair.
///
/// Entries are evicted per node: before a contraction of `(source, twin)` the caller evicts
/// every node whose neighborhood is about to change (the pair itself and all their
/// neighbors). For non-local strategies the whole cache has to be cleared instead.
#[derive(Clone, Debug, Default)]
pub struct ScoreCache {
    scores: FxHashMap<(Node, Node), NumNodes>,
    partners: FxHashMap<Node, FxHashSet<Node>>,
    hits: u64,
    misses: u64,
}

impl ScoreCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.scores.len()
    }

    pub fn is_empty(&self) -> bool {
        self.scores.is_empty()
    }

    pub fn get(&self, u: Node, v: Node) -> Option<NumNodes> {
        self.scores.get(&Self::key(u, v)).copied()
    }

    /// Returns the cached score of `{u, v}` or computes and stores it
    pub fn get_or_insert_with(
        &mut self,
        u: Node,
        v: Node,
        compute: impl FnOnce() -> NumNodes,
    ) -> NumNodes {
        let key = Self::key(u, v);
        if let Some(&score) = self.scores.get(&key) {
            self.hits += 1;
            return score;
        }

        self.misses += 1;
        let score = compute();
        self.scores.insert(key, score);
        self.partners.entry(key.0).or_default().insert(key.1);
        self.partners.entry(key.1).or_default().insert(key.0);
        score
    }

    /// Drops all entries involving `u`
    pub fn evict_node(&mut self, u: Node) {
        let Some(partners) = self.partners.remove(&u) else {
            return;
        };

        for v in partners {
            self.scores.remove(&Self::key(u, v));
            if let Some(of_v) = self.partners.get_mut(&v) {
                of_v.remove(&u);
                if of_v.is_empty() {
                    self.partners.remove(&v);
                }
            }
        }
    }

    pub fn evict_nodes(&mut self, nodes: impl IntoIterator<Item = Node>) {
        for u in nodes {
            self.evict_node(u);
        }
    }

    pub fn clear(&mut self) {
        self.scores.clear();
        self.partners.clear();
    }

    /// Number of lookups answered from the cache and number of lookups that had to compute
    pub fn hits_and_misses(&self) -> (u64, u64) {
        (self.hits, self.misses)
    }

    fn key(u: Node, v: Node) -> (Node, Node) {
        (u.min(v), u.max(v))
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn path_scores() {
        // 0 - 1 - 2
        let mut path = Trigraph::new(3);
        path.add_edges([(0, 1), (1, 2)], EdgeColor::Black);

        let sd = SymmetricDifferenceScore;
        assert_eq!(sd.score(&path, 0, 2), 0);
        assert_eq!(sd.score(&path, 0, 1), 1);

        let exact = ExactTrialScore;
        assert_eq!(exact.score(&path, 0, 2), 0);
        assert_eq!(exact.score(&path, 1, 0), 1);
        assert!(!exact.is_local());
        assert_eq!(path.number_of_nodes(), 3);
    }

    #[test]
    fn kinds() {
        assert_eq!(ScoreKind::default(), ScoreKind::SymmetricDifference);
        for kind in [ScoreKind::SymmetricDifference, ScoreKind::ExactTrial] {
            assert_eq!(kind.to_string().parse::<ScoreKind>(), Ok(kind));
        }
        assert!("fancy".parse::<ScoreKind>().is_err());
        assert!(ScoreKind::SymmetricDifference.build().is_local());
    }

    #[test]
    fn cache_is_symmetric() {
        let mut cache = ScoreCache::new();
        assert_eq!(cache.get_or_insert_with(3, 1, || 5), 5);
        assert_eq!(cache.get_or_insert_with(1, 3, || panic!("must be cached")), 5);
        assert_eq!(cache.get(3, 1), Some(5));
        assert_eq!(cache.hits_and_misses(), (1, 1));
    }

    #[test]
    fn cache_eviction() {
        let mut cache = ScoreCache::new();
        for (u, v) in [(0, 1), (0, 2), (1, 2), (2, 3)] {
            cache.get_or_insert_with(u, v, || u + v);
        }
        assert_eq!(cache.len(), 4);

        cache.evict_node(2);
        assert_eq!(cache.len(), 1);
        assert_eq!(cache.get(0, 1), Some(1));
        assert_eq!(cache.get(2, 3), None);

        // evicting twice or evicting unknown nodes is fine
        cache.evict_nodes([2, 7]);
        assert_eq!(cache.len(), 1);

        cache.get_or_insert_with(2, 3, || 10);
        assert_eq!(cache.get(3, 2), Some(10));

        cache.clear();
        assert!(cache.is_empty());
    }
}
