use std::{
    fs::File,
    io::{BufWriter, Write},
    path::PathBuf,
    time::Duration,
};

use anyhow::Context;
use log::{LevelFilter, info};
use structopt::{StructOpt, clap};
use tww::{
    heuristic::{CandidateKind, ScoreKind, SearchConfig, solve_components},
    log::build_pace_logger_for_verbosity,
    prelude::*,
    utils::signal_handling,
};

#[derive(StructOpt, Default)]
struct Opts {
    /// Input graph in the PACE `p tww` format; reads stdin if omitted
    #[structopt(short = "i", parse(from_os_str))]
    input: Option<PathBuf>,

    /// Output file for the contraction sequence; writes to stdout if omitted
    #[structopt(short = "o", parse(from_os_str))]
    output: Option<PathBuf>,

    /// Time budget in seconds; afterwards the remaining nodes are contracted randomly
    #[structopt(short = "T")]
    timeout: Option<f64>,

    /// Number of low degree nodes considered per round
    #[structopt(short = "k")]
    pool_size: Option<usize>,

    /// lowest-red, lowest-total, partitioned or two-neighborhood
    #[structopt(long)]
    candidates: Option<CandidateKind>,

    /// symmetric-difference or exact-trial
    #[structopt(long)]
    score: Option<ScoreKind>,

    #[structopt(long)]
    seed: Option<u64>,

    /// Never solve on the complement of dense graphs
    #[structopt(long)]
    no_complement: bool,

    /// Export statistics on the search as JSON
    #[structopt(long, parse(from_os_str))]
    stats: Option<PathBuf>,

    #[structopt(short, long, parse(from_occurrences))]
    verbose: usize,
}

impl Opts {
    fn search_config(&self) -> SearchConfig {
        let default = SearchConfig::default();
        SearchConfig {
            pool_size: self.pool_size.unwrap_or(default.pool_size),
            time_budget: self.timeout.map(Duration::from_secs_f64),
            candidates: self.candidates.unwrap_or(default.candidates),
            score: self.score.unwrap_or(default.score),
            seed: self.seed.unwrap_or(default.seed),
        }
    }
}

fn load_graph(path: &Option<PathBuf>) -> anyhow::Result<Trigraph> {
    if let Some(path) = path {
        Trigraph::try_read_pace_file(path).with_context(|| format!("Cannot read {path:?}"))
    } else {
        let stdin = std::io::stdin().lock();
        Ok(Trigraph::try_read_pace(stdin)?)
    }
}

fn main() -> anyhow::Result<()> {
    signal_handling::initialize();

    // while I love to have an error message here, this clashes with optil.io
    // hence, we ignore parsing errors and only terminate if the user explictly asks for help
    let opts = match Opts::from_args_safe() {
        Ok(x) => x,
        Err(e) if e.kind == clap::ErrorKind::HelpDisplayed => return Ok(()),
        _ => Default::default(),
    };

    build_pace_logger_for_verbosity(LevelFilter::Warn, opts.verbose);

    let graph = load_graph(&opts.input)?;
    info!(
        "Read graph with n={} m={}",
        graph.number_of_nodes(),
        graph.number_of_edges()
    );

    // twin-width and contraction sequences are invariant under complementation
    let graph = if !opts.no_complement && graph.should_complement() {
        info!("Density {:.3}; solving on the complement", graph.density());
        graph.trigraph_complement()
    } else {
        graph
    };

    let solution = solve_components(&graph, &opts.search_config());
    info!("Width of the contraction sequence: {}", solution.width);

    if let Some(path) = &opts.output {
        solution
            .sequence
            .try_write_pace_file(path)
            .with_context(|| format!("Cannot write solution to {path:?}"))?;
    } else {
        let mut writer = BufWriter::new(std::io::stdout().lock());
        solution.sequence.try_write_pace(&mut writer)?;
        writer.flush()?;
    }

    if let Some(path) = &opts.stats {
        let writer = BufWriter::new(File::create(path)?);
        serde_json::to_writer_pretty(writer, &solution.stats)
            .with_context(|| format!("Cannot write statistics to {path:?}"))?;
    }

    Ok(())
}
