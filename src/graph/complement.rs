use itertools::Itertools;

use super::*;

/// Black density above which the solver works on the complement instead
pub const COMPLEMENT_DENSITY_THRESHOLD: f64 = 0.5;

pub trait Complement {
    /// Produces a copy of the graph where every red edge stays while
    /// black edges become non-edges and vice versa. Node ids are kept.
    fn trigraph_complement(&self) -> Self;

    /// Fraction of node pairs connected by an edge (of any color)
    fn density(&self) -> f64;

    /// Returns true if the complement has fewer edges than the graph itself
    fn should_complement(&self) -> bool {
        self.density() > COMPLEMENT_DENSITY_THRESHOLD
    }
}

impl Complement for Trigraph {
    fn trigraph_complement(&self) -> Self {
        let nodes = self.vertices().sorted().collect_vec();

        let mut complement = Trigraph::empty();
        for &u in &nodes {
            complement.add_vertex(u);
        }

        for (i, &u) in nodes.iter().enumerate() {
            for &v in &nodes[i + 1..] {
                match self.type_of_edge(u, v) {
                    EdgeKind::None => complement.add_edge(u, v, EdgeColor::Black),
                    EdgeKind::Red => complement.add_edge(u, v, EdgeColor::Red),
                    EdgeKind::Black => {}
                }
            }
        }

        complement
    }

    fn density(&self) -> f64 {
        let n = self.number_of_nodes() as f64;
        if n < 2.0 {
            return 0.0;
        }
        2.0 * self.number_of_edges() as f64 / (n * (n - 1.0))
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use rand::SeedableRng;
    use rand_pcg::Pcg64;

    #[test]
    fn complement() {
        let mut rng = Pcg64::seed_from_u64(0x263741);

        for n in 0..30 {
            let graph = Trigraph::random_colored_gnp(&mut rng, n, 0.5, 0.5);
            let complement = graph.trigraph_complement();

            // identical red edges
            let red_edges = |g: &Trigraph| {
                g.colored_edges()
                    .filter(|e| e.2.is_red())
                    .sorted()
                    .collect_vec()
            };
            assert_eq!(red_edges(&graph), red_edges(&complement));

            for u in 0..n {
                for v in (u + 1)..n {
                    assert_eq!(graph.has_black_edge(u, v), !complement.has_edge(u, v));
                }
            }

            assert_eq!(
                complement.trigraph_complement().colored_edges().sorted().collect_vec(),
                graph.colored_edges().sorted().collect_vec()
            );
        }
    }

    #[test]
    fn density() {
        let mut graph = Trigraph::new(4);
        assert_eq!(graph.density(), 0.0);
        assert!(!graph.should_complement());

        graph.add_edges([(0, 1), (0, 2), (0, 3), (1, 2)], EdgeColor::Black);
        assert!(graph.should_complement());

        let complement = graph.trigraph_complement();
        assert_eq!(complement.number_of_edges(), 2);
        assert!(!complement.should_complement());

        assert_eq!(Trigraph::new(1).density(), 0.0);
    }

    #[test]
    fn sparse_ids() {
        let mut graph = Trigraph::empty();
        for u in [3, 8, 11] {
            graph.add_vertex(u);
        }
        graph.add_edge(3, 8, EdgeColor::Black);

        let complement = graph.trigraph_complement();
        assert!(!complement.has_edge(3, 8));
        assert!(complement.has_black_edge(3, 11));
        assert!(complement.has_black_edge(8, 11));
    }
}
