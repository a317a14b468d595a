use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{ArgAction, Parser};
use tracing::level_filters::LevelFilter;
use tracing_subscriber::{filter, layer::SubscriberExt, util::SubscriberInitExt};

use csv_combine::{combine, DEFAULT_PREFIX};

#[derive(Debug, Parser)]
/// Merge cross-section CSV files into one file per group of offsets.
struct Args {
    #[arg(short, long, default_value = ".")]
    /// Directory holding the cross-section CSV files.
    input: PathBuf,

    #[arg(short, long, default_value = DEFAULT_PREFIX)]
    /// File name prefix of the files to combine.
    prefix: String,

    #[arg(short, long, default_value = "combined_csv")]
    /// Directory to write the combined files to.
    output: PathBuf,

    #[arg(short, long, action = ArgAction::Count)]
    /// Log more details, repeat for even more.
    verbose: u8,
}

fn main() -> Result<()> {
    let args = Args::parse();

    let level = match args.verbose {
        0 => LevelFilter::INFO,
        1 => LevelFilter::DEBUG,
        _ => LevelFilter::TRACE,
    };
    let filter = filter::Targets::new().with_target("csv_combine", level);
    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer())
        .init();

    let groups = combine(&args.input, &args.prefix, &args.output).with_context(|| {
        format!(
            "Failed to combine `{}*.csv` files in `{}`",
            args.prefix,
            args.input.display()
        )
    })?;

    let files = groups.iter().map(|x| x.files.len()).sum::<usize>();
    println!(
        "Combined {files} file(s) into {} group(s) in `{}`.",
        groups.len(),
        args.output.display()
    );

    Ok(())
}
