use anyhow::Result;
use clap::Parser;
use nsscache_index::index::{IndexConfig, build_index};
use nsscache_index::utils::init_logging;
use std::path::PathBuf;
use std::process;

#[derive(Parser)]
#[command(name = "nsscache-index")]
#[command(about = "Build a sorted fixed-stride index for a passwd-like file")]
struct Cli {
    /// Log JSON to stderr
    #[arg(short = 'J', long)]
    log_json: bool,

    /// passwd-like file to read from
    #[arg(short, long, value_name = "PATH")]
    source_file: PathBuf,

    /// Index file to create
    #[arg(short, long, value_name = "PATH")]
    dest_file: PathBuf,

    /// Column in --source-file to index (1 to 9)
    #[arg(short, long, value_name = "N")]
    column: u8,

    /// Set if the specified column is numeric
    #[arg(short, long)]
    numeric: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.log_json)?;

    let result = IndexConfig::new(cli.source_file, cli.dest_file, cli.column, cli.numeric)
        .and_then(|config| build_index(&config));

    match result {
        Ok(stats) => {
            tracing::debug!(
                records = stats.records,
                duplicates = stats.duplicates,
                stride = stats.stride,
                bytes = stats.bytes_written,
                "done"
            );
            Ok(())
        }
        Err(err) => {
            err.report();
            process::exit(1);
        }
    }
}
