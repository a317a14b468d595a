use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{ArgAction, Parser};
use tracing::level_filters::LevelFilter;
use tracing_subscriber::{filter, layer::SubscriberExt, util::SubscriberInitExt};

use asset_bundle::{Bundle, DEFAULT_PROJECT};

#[derive(Debug, Parser)]
/// Bundle web sketch assets into a zipped Android Studio project.
struct Args {
    /// Asset files to place in `app/src/main/assets`. Missing files are
    /// replaced with a placeholder. [default: vector_cam_divergence.js
    /// index.html sketch.properties]
    assets: Vec<PathBuf>,

    #[arg(long, default_value = ".")]
    /// Directory to create the project and archive in.
    root: PathBuf,

    #[arg(long, default_value = DEFAULT_PROJECT)]
    /// Name of the project directory and archive.
    name: String,

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
    let filter = filter::Targets::new().with_target("asset_bundle", level);
    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer())
        .init();

    let mut bundle = Bundle::new(args.root);
    bundle.name = args.name;
    if !args.assets.is_empty() {
        bundle.assets = args.assets;
    }

    let output = bundle
        .build()
        .with_context(|| format!("Failed to bundle `{}`", bundle.project_dir().display()))?;

    println!(
        "Android Studio project bundled successfully: {}",
        output.archive.display()
    );
    Ok(())
}
