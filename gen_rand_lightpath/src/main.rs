use std::{fs::File, io::BufWriter, path::PathBuf};

use anyhow::{ensure, Context, Result};
use clap::Parser;
use lightpath::*;
use lightpath_json::{serde_json, JsonSer, Scene};
use lightpath_random::{
    rand::{rngs::StdRng, SeedableRng},
    random_scene, DEFAULT_EXTENT,
};

#[macro_use]
extern crate log;

/// Generates a random scene, and writes it as JSON.
#[derive(Parser)]
#[command(version)]
struct Args {
    /// Where to write the scene.
    path: PathBuf,

    #[arg(long, default_value_t = 12)]
    mirrors: usize,

    #[arg(long, default_value_t = 4)]
    rays: usize,

    /// Every coordinate is generated in `[-extent, extent]`.
    #[arg(long, default_value_t = DEFAULT_EXTENT)]
    extent: Float,

    /// Encloses the scene in four walls, so rays can't escape.
    #[arg(long)]
    bounded: bool,

    #[arg(long, default_value_t = DEFAULT_MAX_REFLECTIONS)]
    max_reflections: usize,

    /// Seed for the random number generator, picked at random if omitted.
    #[arg(long)]
    seed: Option<u64>,
}

fn generate_random_scene(args: &Args) -> Result<Scene> {
    ensure!(args.rays > 0, "at least one ray is required");
    ensure!(
        args.extent.is_finite() && args.extent != 0.0,
        "extent must be finite and non-zero"
    );

    let mut rng = match args.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };

    let (mut mirrors, rays) = random_scene(&mut rng, args.mirrors, args.rays, args.extent);

    if args.bounded {
        let m = args.extent.abs() + 1.0;
        mirrors.extend(bounding_box([-m, -m], [m, m]));
    }

    let scene = Scene {
        mirrors,
        rays,
        max_reflections: args.max_reflections,
        reflection_distance: 0.0,
    };

    // refuse to write scenes that can't be traced
    scene.tracer()?;

    Ok(scene)
}

fn main() -> Result<()> {
    env_logger::init();

    let args = Args::parse();

    let scene = generate_random_scene(&args)?;

    let file = File::create(&args.path)
        .with_context(|| format!("failed to create {}", args.path.display()))?;

    serde_json::to_writer_pretty(BufWriter::new(file), &scene.to_json())
        .with_context(|| format!("failed to write {}", args.path.display()))?;

    info!(
        "wrote {} mirror(s) and {} ray(s) to {}",
        scene.mirrors.len(),
        scene.rays.len(),
        args.path.display(),
    );

    Ok(())
}
