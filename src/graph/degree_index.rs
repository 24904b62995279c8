use fxhash::FxHashMap;

use super::*;

/// Buckets all registered nodes by a non-negative degree.
///
/// `buckets[d]` holds every node currently at degree `d`; `pointer` stores for each node
/// its bucket and its position inside the bucket, so that moving a node between adjacent
/// buckets is a `swap_remove` plus a `push`. Trailing empty buckets are dropped, hence the
/// last bucket (if any) always belongs to the maximum degree.
#[derive(Clone, Debug, Default)]
pub struct DegreeIndex {
    buckets: Vec<Vec<Node>>,
    pointer: FxHashMap<Node, (NumNodes, NumNodes)>,
}

impl DegreeIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of nodes in the index
    pub fn len(&self) -> usize {
        self.pointer.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pointer.is_empty()
    }

    pub fn contains(&self, node: Node) -> bool {
        self.pointer.contains_key(&node)
    }

    /// Returns the degree the node is currently filed under
    pub fn degree_of(&self, node: Node) -> Option<NumNodes> {
        self.pointer.get(&node).map(|&(degree, _)| degree)
    }

    /// Registers a new node with the given degree.
    /// ** Panics if the node is already contained **
    pub fn insert(&mut self, node: Node, degree: NumNodes) {
        assert!(
            !self.pointer.contains_key(&node),
            "node {node} already present in degree index"
        );
        self.push_into_bucket(node, degree);
    }

    /// Removes a node and returns the degree it was filed under.
    /// ** Panics if the node is not contained **
    pub fn remove(&mut self, node: Node) -> NumNodes {
        let degree = self.take_from_bucket(node);
        self.trim();
        degree
    }

    /// Moves the node into the next higher bucket
    pub fn increment(&mut self, node: Node) {
        let degree = self.take_from_bucket(node);
        self.push_into_bucket(node, degree + 1);
    }

    /// Moves the node into the next lower bucket.
    /// ** Panics if the node is at degree zero **
    pub fn decrement(&mut self, node: Node) {
        let degree = self.take_from_bucket(node);
        assert!(degree > 0, "cannot decrement degree of node {node} below zero");
        self.push_into_bucket(node, degree - 1);
        self.trim();
    }

    /// Returns all nodes at exactly the given degree
    pub fn nodes_with_degree(&self, degree: NumNodes) -> &[Node] {
        self.buckets
            .get(degree as usize)
            .map_or(&[], |bucket| bucket.as_slice())
    }

    /// Iterates over all nodes in non-decreasing order of their degree
    pub fn iter_ascending(&self) -> impl Iterator<Item = Node> + '_ {
        self.buckets.iter().flat_map(|bucket| bucket.iter().copied())
    }

    /// Returns (at most) `n` nodes of smallest degree in non-decreasing order of degree.
    /// Nodes within a bucket are reported in bucket order, which only depends on the
    /// sequence of prior operations.
    pub fn lowest_n(&self, n: usize) -> Vec<Node> {
        self.iter_ascending().take(n).collect()
    }

    /// Smallest degree of any node in the index
    pub fn min_degree(&self) -> Option<NumNodes> {
        self.buckets
            .iter()
            .position(|bucket| !bucket.is_empty())
            .map(|d| d as NumNodes)
    }

    /// Largest degree of any node in the index
    pub fn max_degree(&self) -> Option<NumNodes> {
        debug_assert!(self.buckets.last().is_none_or(|bucket| !bucket.is_empty()));
        self.buckets.len().checked_sub(1).map(|d| d as NumNodes)
    }

    fn push_into_bucket(&mut self, node: Node, degree: NumNodes) {
        let d = degree as usize;
        if self.buckets.len() <= d {
            self.buckets.resize_with(d + 1, Vec::new);
        }

        self.pointer
            .insert(node, (degree, self.buckets[d].len() as NumNodes));
        self.buckets[d].push(node);
    }

    fn take_from_bucket(&mut self, node: Node) -> NumNodes {
        let (degree, position) = self
            .pointer
            .remove(&node)
            .unwrap_or_else(|| panic!("node {node} not present in degree index"));

        let bucket = &mut self.buckets[degree as usize];
        let position = position as usize;
        bucket.swap_remove(position);
        if let Some(&moved) = bucket.get(position) {
            self.pointer.insert(moved, (degree, position as NumNodes));
        }

        degree
    }

    fn trim(&mut self) {
        while self.buckets.last().is_some_and(|bucket| bucket.is_empty()) {
            self.buckets.pop();
        }
    }
}

#[cfg(test)]
mod test {
    use itertools::Itertools;
    use rand::{Rng, SeedableRng};
    use rand_pcg::Pcg64;

    use super::*;

    #[test]
    fn lowest_n() {
        let mut index = DegreeIndex::new();
        for (u, d) in [(0, 3), (1, 0), (2, 1), (3, 0), (4, 5)] {
            index.insert(u, d);
        }

        assert_eq!(index.lowest_n(2), [1, 3]);
        assert_eq!(index.lowest_n(3), [1, 3, 2]);
        assert_eq!(index.lowest_n(100).len(), 5);
        assert_eq!(index.min_degree(), Some(0));
        assert_eq!(index.max_degree(), Some(5));

        let degrees = index
            .lowest_n(5)
            .into_iter()
            .map(|u| index.degree_of(u).unwrap())
            .collect_vec();
        assert!(degrees.is_sorted());
    }

    #[test]
    fn increment_decrement() {
        let mut index = DegreeIndex::new();
        index.insert(7, 0);
        index.insert(9, 0);

        index.increment(7);
        index.increment(7);
        assert_eq!(index.degree_of(7), Some(2));
        assert_eq!(index.nodes_with_degree(0), [9]);
        assert_eq!(index.max_degree(), Some(2));

        index.decrement(7);
        assert_eq!(index.degree_of(7), Some(1));
        assert_eq!(index.max_degree(), Some(1));

        assert_eq!(index.remove(7), 1);
        assert_eq!(index.max_degree(), Some(0));
        assert!(!index.contains(7));

        index.remove(9);
        assert!(index.is_empty());
        assert_eq!(index.max_degree(), None);
        assert_eq!(index.min_degree(), None);
        assert!(index.lowest_n(3).is_empty());
    }

    #[test]
    #[should_panic]
    fn decrement_below_zero() {
        let mut index = DegreeIndex::new();
        index.insert(0, 0);
        index.decrement(0);
    }

    #[test]
    #[should_panic]
    fn insert_twice() {
        let mut index = DegreeIndex::new();
        index.insert(0, 0);
        index.insert(0, 1);
    }

    #[test]
    fn random_operations() {
        let mut rng = Pcg64::seed_from_u64(0x5eed);
        let n = 50;

        let mut index = DegreeIndex::new();
        let mut degrees = vec![0; n as usize];
        for u in 0..n {
            index.insert(u, 0);
        }

        for _ in 0..10_000 {
            let u = rng.gen_range(0..n);
            if rng.gen_bool(0.55) || degrees[u as usize] == 0 {
                index.increment(u);
                degrees[u as usize] += 1;
            } else {
                index.decrement(u);
                degrees[u as usize] -= 1;
            }

            assert_eq!(index.degree_of(u), Some(degrees[u as usize]));
        }

        for u in 0..n {
            assert_eq!(index.degree_of(u), Some(degrees[u as usize]));
            assert!(index.nodes_with_degree(degrees[u as usize]).contains(&u));
        }

        assert_eq!(index.max_degree(), degrees.iter().copied().max());
        assert_eq!(index.min_degree(), degrees.iter().copied().min());
        assert_eq!(
            index.iter_ascending().map(|u| degrees[u as usize]).collect_vec(),
            degrees.iter().copied().sorted().collect_vec()
        );
    }
}
