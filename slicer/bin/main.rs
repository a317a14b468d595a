use std::{
    io::{stdout, Write},
    thread,
    time::{Duration, Instant},
};

use anyhow::{anyhow, Context, Result};
use clap::Parser;
use tracing_subscriber::{filter, layer::SubscriberExt, util::SubscriberInitExt};

use args::Args;
use common::misc::human_duration;
use slicer::{export::Exporter, mesh::load_mesh};

mod args;

fn main() -> Result<()> {
    let args = Args::parse();

    let level = args.log_level();
    let filter = filter::Targets::new()
        .with_target("slicer", level)
        .with_target("mesh_format", level)
        .with_target("common", level);
    let format = tracing_subscriber::fmt::layer().with_writer(std::io::stderr);
    tracing_subscriber::registry()
        .with(filter)
        .with(format)
        .init();

    let config = args.sweep_config()?;
    let now = Instant::now();

    // Nothing is written to disk unless the mesh loads.
    let mesh = load_mesh(&args.mesh)
        .with_context(|| format!("Failed to load mesh `{}`", args.mesh.display()))?;
    println!(
        "Loaded `{}`. {{ vert: {}, face: {} }}",
        args.mesh.display(),
        mesh.vertex_count(),
        mesh.face_count()
    );

    let exporter = Exporter::new(config);
    let output = exporter.config().output.clone();
    let progress = exporter.progress();

    let export = thread::spawn(move || exporter.export(&mesh));
    while !export.is_finished() {
        print!(
            "\rSection: {}/{}, {:.1}%",
            progress.completed(),
            progress.total(),
            progress.progress() * 100.0
        );
        stdout().flush()?;
        thread::sleep(Duration::from_millis(50));
    }

    let summary = export
        .join()
        .map_err(|_| anyhow!("Export thread panicked"))??;

    println!(
        "\nDone. Wrote {} file(s) to `{}`, {} offset(s) without a section. Elapsed: {}",
        summary.files.len(),
        output.display(),
        summary.empty,
        human_duration(now.elapsed())
    );

    if summary.failures() > 0 {
        println!(
            " \\ {} section(s) could not be extracted and {} file(s) could not be written, run with -v for details.",
            summary.slice_failures, summary.write_failures
        );
    }

    Ok(())
}
