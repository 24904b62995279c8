pub mod pace_reader;
pub use pace_reader::*;
pub mod pace_writer;
pub use pace_writer::PaceWriter;
