use std::{
    fs::File,
    io::{BufWriter, Write},
    path::Path,
};

use itertools::Itertools;

use super::super::{graph::*, utils::ContractionSequence};

pub trait PaceWriter {
    fn try_write_pace<W: Write>(&self, writer: W) -> Result<(), std::io::Error>;
    fn try_write_pace_file<P: AsRef<Path>>(&self, path: P) -> Result<(), std::io::Error> {
        let mut writer = BufWriter::new(File::create(path)?);
        self.try_write_pace(&mut writer)?;
        writer.flush()
    }
}

/// Writes the graph as a `p tww` instance. Only black edges are written and
/// the nodes have to be `0..n`.
impl PaceWriter for Trigraph {
    fn try_write_pace<W: Write>(&self, mut writer: W) -> Result<(), std::io::Error> {
        debug_assert!(self.vertices().all(|u| u < self.number_of_nodes()));
        debug_assert_eq!(self.number_of_red_edges(), 0);

        writeln!(
            writer,
            "p tww {} {}",
            self.number_of_nodes(),
            self.number_of_edges()
        )?;

        for ColoredEdge(u, v, _) in self.colored_edges().sorted() {
            writeln!(writer, "{} {}", u + 1, v + 1)?;
        }

        Ok(())
    }
}

/// Writes one line `source twin` (1-based) per merge
impl PaceWriter for ContractionSequence {
    fn try_write_pace<W: Write>(&self, writer: W) -> Result<(), std::io::Error> {
        self.pace_writer(writer)
    }
}
