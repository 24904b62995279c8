pub mod contraction_sequence;
pub mod signal_handling;

pub use contraction_sequence::ContractionSequence;
