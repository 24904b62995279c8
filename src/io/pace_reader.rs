use std::{
    fs::File,
    io::{BufRead, BufReader, ErrorKind, Lines},
    path::Path,
};

use crate::graph::{Edge, EdgeColor, GraphEdgeEditing, GraphNew, Node, NumEdges, NumNodes};

pub type Result<T> = std::io::Result<T>;

pub trait GraphPaceReader: Sized {
    /// Reads a graph in the PACE `p tww` format; all edges are black
    fn try_read_pace<R: BufRead>(reader: R) -> Result<Self>;
    fn try_read_pace_file<P: AsRef<Path>>(path: P) -> Result<Self>;
}

impl<G> GraphPaceReader for G
where
    G: GraphNew + GraphEdgeEditing,
{
    fn try_read_pace<R: BufRead>(reader: R) -> Result<Self> {
        let mut pace_reader = PaceReader::try_new(reader)?;
        let mut graph = Self::new(pace_reader.number_of_nodes());
        while let Some(Edge(u, v)) = pace_reader.try_next_edge()? {
            graph.add_edge(u, v, EdgeColor::Black);
        }
        Ok(graph)
    }

    fn try_read_pace_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let reader = File::open(path)?;
        let buf_reader = BufReader::new(reader);
        Self::try_read_pace(buf_reader)
    }
}

/// Streams the edges of a PACE twin-width instance. Node ids are 1-based in the file and
/// 0-based in the returned [`Edge`]s; comment lines (starting with `c`) and blank lines are
/// skipped.
pub struct PaceReader<R> {
    lines: Lines<R>,
    number_of_nodes: NumNodes,
    number_of_edges: NumEdges,
}

impl<R: BufRead> PaceReader<R> {
    pub fn try_new(reader: R) -> Result<Self> {
        let mut pace_reader = Self {
            lines: reader.lines(),
            number_of_nodes: 0,
            number_of_edges: 0,
        };

        (pace_reader.number_of_nodes, pace_reader.number_of_edges) = pace_reader.parse_header()?;
        Ok(pace_reader)
    }

    /// Number of nodes as announced in the header
    pub fn number_of_nodes(&self) -> NumNodes {
        self.number_of_nodes
    }

    /// Number of edges as announced in the header
    pub fn number_of_edges(&self) -> NumEdges {
        self.number_of_edges
    }

    /// Returns the next (0-based) edge or `None` at the end of the input
    pub fn try_next_edge(&mut self) -> Result<Option<Edge>> {
        Ok(self.parse_edge_line()?.map(|Edge(u, v)| Edge(u - 1, v - 1)))
    }
}

impl<R: BufRead> Iterator for PaceReader<R> {
    type Item = Result<Edge>;

    fn next(&mut self) -> Option<Self::Item> {
        self.try_next_edge().transpose()
    }
}

macro_rules! raise_error_unless {
    ($cond : expr, $kind : expr, $info : expr) => {
        if !($cond) {
            return Err(std::io::Error::new($kind, $info));
        }
    };
}

macro_rules! parse_next_value {
    ($iterator : expr, $name : expr) => {{
        let next = $iterator.next();
        raise_error_unless!(
            next.is_some(),
            ErrorKind::InvalidData,
            format!("Premature end of line when parsing {}.", $name)
        );

        let parsed = next.unwrap().parse();
        raise_error_unless!(
            parsed.is_ok(),
            ErrorKind::InvalidData,
            format!("Invalid value found. Cannot parse {}.", $name)
        );

        parsed.unwrap()
    }};
}

impl<R: BufRead> PaceReader<R> {
    fn next_non_comment_line(&mut self) -> Result<Option<String>> {
        loop {
            let line = self.lines.next();
            match line {
                None => return Ok(None),
                Some(Err(x)) => return Err(x),
                Some(Ok(line)) if line.starts_with('c') || line.trim().is_empty() => continue,
                Some(Ok(line)) => return Ok(Some(line)),
            }
        }
    }

    fn parse_header(&mut self) -> Result<(NumNodes, NumEdges)> {
        let line = self.next_non_comment_line()?;

        raise_error_unless!(line.is_some(), ErrorKind::InvalidData, "No header found");
        let line = line.unwrap();

        let mut parts = line.split_whitespace();

        raise_error_unless!(
            parts.next() == Some("p"),
            ErrorKind::InvalidData,
            "Invalid header found; line should start with p"
        );

        raise_error_unless!(
            parts.next() == Some("tww"),
            ErrorKind::InvalidData,
            "Invalid header found; file type should be \"tww\""
        );

        let number_of_nodes = parse_next_value!(parts, "Header>Number of nodes");
        let number_of_edges = parse_next_value!(parts, "Header>Number of edges");

        raise_error_unless!(
            parts.next().is_none(),
            ErrorKind::InvalidData,
            "Invalid header found; expected end of line"
        );

        Ok((number_of_nodes, number_of_edges))
    }

    fn parse_edge_line(&mut self) -> Result<Option<Edge>> {
        let Some(line) = self.next_non_comment_line()? else {
            return Ok(None);
        };

        let mut parts = line.split_whitespace();

        let from: Node = parse_next_value!(parts, "Source node");
        let dest: Node = parse_next_value!(parts, "Target node");

        raise_error_unless!(
            parts.next().is_none(),
            ErrorKind::InvalidData,
            format!("Invalid edge line \"{line}\"; expected two nodes")
        );

        raise_error_unless!(
            (1..=self.number_of_nodes).contains(&from)
                && (1..=self.number_of_nodes).contains(&dest),
            ErrorKind::InvalidData,
            format!(
                "Edge {from} {dest} references a node outside of 1..={}",
                self.number_of_nodes
            )
        );

        raise_error_unless!(
            from != dest,
            ErrorKind::InvalidData,
            format!("Self-loop at node {from}")
        );

        Ok(Some(Edge(from, dest)))
    }
}
