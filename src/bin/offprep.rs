use std::path::PathBuf;

use clap::Parser;
use offprep::{
    params::PrepParams,
    pipeline::prepare_seeded,
    viz::{SceneGeometry, TextSummaryViewer, Viewer},
};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[clap(about = "Loads an OFF file, optionally perturbs it and summarizes the result")]
struct Args {
    /// Path to the .off file
    path: PathBuf,
    /// JSON file with run parameters. Flags override its values.
    #[clap(long, short)]
    config: Option<PathBuf>,
    /// Standard deviation of the gaussian noise added to every coordinate
    #[clap(long)]
    noise_std: Option<f32>,
    /// Fraction of vertices, in [0, 1], removed around a random anchor
    #[clap(long)]
    occlusion: Option<f64>,
    /// Seed of the random source
    #[clap(long)]
    seed: Option<u64>,
    /// Writes the resulting points to a .pts file next to the input
    #[clap(long, short, action)]
    write_points: bool,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();

    let mut params = match &args.config {
        Some(config) => PrepParams::from_json_file(config)?,
        None => PrepParams::default(),
    };
    if args.noise_std.is_some() {
        params = params.with_noise(args.noise_std);
    }
    if args.occlusion.is_some() {
        params = params.with_occlusion(args.occlusion);
    }
    if args.seed.is_some() {
        params = params.with_seed(args.seed);
    }
    if args.write_points {
        params = params.with_write_points(true);
    }

    let output = prepare_seeded(&args.path, &params)?;

    TextSummaryViewer::new(std::io::stdout()).show(&[
        SceneGeometry::from(&output.original),
        SceneGeometry::from(&output.geometry),
    ])?;
    if let Some(written) = output.written {
        println!("points written to {}", written.display());
    }
    Ok(())
}
