//! Reads a query problem from a text file, runs a 1-nearest-neighbour and a
//! k-nearest-neighbour query against a k-d tree of the data, and prints the
//! ranked results to stdout.
use std::io::{self, BufWriter, Write};
use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;

use kdknn::input::Problem;
use kdknn::report::write_report;

#[cfg(feature = "tracing")]
use tracing::{event, Level};
#[cfg(feature = "tracing")]
use tracing_subscriber::fmt;

#[derive(Parser, Debug)]
#[clap(author, version, about, long_about = None)]
struct Cli {
    /// File holding the dimension, k, the point count, the query point and the data points
    #[clap(default_value = "input.txt")]
    input: PathBuf,

    /// Log more detail to stderr; repeat for more
    #[clap(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    #[cfg(feature = "tracing")]
    {
        let level = match cli.verbose {
            0 => Level::WARN,
            1 => Level::INFO,
            2 => Level::DEBUG,
            _ => Level::TRACE,
        };
        let subscriber = fmt()
            .with_max_level(level)
            .without_time()
            .with_writer(io::stderr)
            .finish();
        tracing::subscriber::set_global_default(subscriber)?;
    }

    let problem = Problem::from_path(&cli.input)
        .with_context(|| format!("failed to load a problem from {}", cli.input.display()))?;

    let tree = problem.build_tree();
    #[cfg(feature = "tracing")]
    event!(
        Level::INFO,
        size = tree.size(),
        depth = tree.depth(),
        "built tree"
    );

    let stdout = io::stdout();
    let mut out = BufWriter::new(stdout.lock());
    write_report(&mut out, &tree, &problem.query, problem.qty)
        .and_then(|()| out.flush())
        .context("failed to write the report")?;

    Ok(())
}
