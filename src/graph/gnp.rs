use crate::graph::*;
use rand::Rng;
use rand_distr::Geometric;

pub trait GnpGenerator: Sized {
    /// Generates a Gilbert (also, wrongly, known as Erdos-Reyni) graph
    /// The `G(n,p)` contains n nodes and each of the `n(n-1)/2` edges exists
    /// independently with probability `p`. Each edge is black independently
    /// with probability `prob_black` and red otherwise
    fn random_colored_gnp<R: Rng>(rng: &mut R, n: Node, p: f64, prob_black: f64) -> Self;

    fn random_black_gnp<R: Rng>(rng: &mut R, n: Node, p: f64) -> Self {
        Self::random_colored_gnp(rng, n, p, 1.0)
    }
}

impl<G> GnpGenerator for G
where
    G: GraphNew + GraphEdgeEditing,
{
    fn random_colored_gnp<R: Rng>(rng: &mut R, n: Node, p: f64, prob_black: f64) -> Self {
        let mut result = Self::new(n);

        // indirection via vector as we need a &mut for rng and edge color also needs rng
        let edges: Vec<_> = BernoulliSamplingRange::new(rng, 0, (n as i64) * (n as i64), p)
            .filter_map(|x| {
                let u = x / (n as i64);
                let v = x % (n as i64);
                (u < v).then_some((u as Node, v as Node))
            })
            .collect();

        for (u, v) in edges {
            let color = if prob_black >= 1.0 || rng.gen_bool(prob_black) {
                EdgeColor::Black
            } else {
                EdgeColor::Red
            };
            result.add_edge(u, v, color);
        }

        result
    }
}

/// Provides an iterator similarly to Range, but
/// includes each element i.i.d. with probability of p
pub struct BernoulliSamplingRange<'a, R: Rng> {
    current: i64,
    end: i64,
    distr: Option<Geometric>,
    rng: &'a mut R,
}

impl<'a, R: Rng> BernoulliSamplingRange<'a, R> {
    /// ** Panics if `prob` is not a probability **
    pub fn new(rng: &'a mut R, begin: i64, end: i64, prob: f64) -> Self {
        debug_assert!(begin <= end);
        assert!((0.0..=1.0).contains(&prob), "{prob} is not a probability");
        Self {
            rng,
            current: begin - 1,
            end,
            distr: (prob > 0.0).then(|| Geometric::new(prob).unwrap()),
        }
    }

    fn try_advance(&mut self) {
        if self.current >= self.end {
            return;
        }

        let Some(distr) = self.distr else {
            self.current = self.end;
            return;
        };

        let skip = self.rng.sample(distr);
        if skip > i64::MAX as u64 {
            self.current = self.end;
        } else {
            self.current += 1;
            self.current = match self.current.checked_add(skip as i64) {
                Some(x) => x,
                None => self.end,
            }
        }
    }
}

impl<R: Rng> Iterator for BernoulliSamplingRange<'_, R> {
    type Item = i64;
    fn next(&mut self) -> Option<Self::Item> {
        self.try_advance();

        if self.current >= self.end {
            None
        } else {
            Some(self.current)
        }
    }
}
