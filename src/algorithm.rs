//! Long-running searches are implemented using the [`IterativeAlgorithm`] trait.
//!
//! An algorithm does a small, bounded amount of work per step (for the contraction search:
//! one merge) and then yields. The caller decides after each step whether to continue,
//! which gives us cooperative time budgets and signal handling in a single place.

use crate::utils::signal_handling;
use std::time::{Duration, Instant};

/// [`IterativeAlgorithm`] provides a consistent interface to execute our searches. It does
/// not prescribe a constructor, which is left to the algorithm designer as each algorithm
/// has specific parameters. Construction should be cheap.
///
/// As an adopter of [`IterativeAlgorithm`], you have to implement at least the methods
///   [`IterativeAlgorithm::execute_step`],
///   [`IterativeAlgorithm::is_completed`] and [`IterativeAlgorithm::best_known_solution`].
///
/// If your algorithm is known to eventually terminate please also implement the marker trait
/// [`TerminatingIterativeAlgorithm`].
///
/// # Example
/// ```
/// use tww::algorithm::IterativeAlgorithm;
/// use tww::graph::{ColoredAdjacencyList, Node, NumNodes};
///
/// struct MaxRedDegree<'a, G> {
///    graph: &'a G,
///    pending: Vec<Node>,
///    best: Option<NumNodes>,
/// }
///
/// impl<'a, G> IterativeAlgorithm<NumNodes> for MaxRedDegree<'a, G> where G: 'a + ColoredAdjacencyList {
///     fn execute_step(&mut self) {
///         if let Some(u) = self.pending.pop() {
///             let d = self.graph.red_degree_of(u);
///             self.best = Some(self.best.map_or(d, |b| b.max(d)));
///         }
///     }
///
///     fn is_completed(&self) -> bool {
///         self.pending.is_empty()
///     }
///
///     fn best_known_solution(&mut self) -> Option<NumNodes> {
///         self.best
///     }
/// }
/// ```
pub trait IterativeAlgorithm<Result> {
    /// Advances the computation of this algorithm by one bounded unit of work.
    fn execute_step(&mut self);

    /// Returns true iff the algorithm is completed and [`IterativeAlgorithm::execute_step`] may not
    /// be called again.
    fn is_completed(&self) -> bool;

    /// Returns the currently best known solution or None if no solution is known yet.
    fn best_known_solution(&mut self) -> Option<Result>;

    /// Execute the algorithm and keeps calling [`IterativeAlgorithm::execute_step`] until the
    /// `predicate` becomes false, a termination signal was received, or [`IterativeAlgorithm::is_completed`]
    /// becomes true. The function `predicate` is evaluated after each iteration, i.e. a step is
    /// carried out even if the predicate always returns false.
    fn run_while<F: FnMut(&mut Self) -> bool>(&mut self, mut predicate: F) {
        while !self.is_completed() && !signal_handling::received_ctrl_c() {
            self.execute_step();

            if !predicate(self) {
                break;
            }
        }
    }

    /// Execute the algorithm and keeps calling [`IterativeAlgorithm::execute_step`] until either a
    /// timeout occurred, a termination signal was received, or [`IterativeAlgorithm::is_completed`]
    /// is true. Observe that the timeout is guaranteed only in the sense that
    /// [`IterativeAlgorithm::execute_step`] is not called again after the timeout; if the function
    /// should take too long the timeout will be violated.
    fn run_until_timeout(&mut self, timeout: Duration) {
        let start = Instant::now();
        self.run_while(|_| start.elapsed() < timeout);
    }
}

/// [`TerminatingIterativeAlgorithm`] is a marker trait for algorithms that will eventually
/// terminate (i.e. in contrast to an algorithm that does not know when to stop).
pub trait TerminatingIterativeAlgorithm<Result>: IterativeAlgorithm<Result> {
    /// Execute the algorithm until it completed (or the termination signal was received) and
    /// return the solution if it was found.
    fn run_to_completion(&mut self) -> Option<Result> {
        while !self.is_completed() && !signal_handling::received_ctrl_c() {
            self.execute_step();
        }
        self.best_known_solution()
    }
}
