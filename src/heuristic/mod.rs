pub mod candidates;
pub mod fallback;
pub mod score;
pub mod search;
pub mod solver;

pub use candidates::*;
pub use fallback::random_contraction_sequence;
pub use score::*;
pub use search::*;
pub use solver::*;
