use std::{f64::consts::FRAC_PI_4, fs::File, io::BufReader, path::PathBuf};

use anyhow::{anyhow, Context, Result};
use clap::Parser;
use lightpath::*;
use lightpath_json::{serde_json, JsonDes, Scene};
use rayon::prelude::*;

#[macro_use]
extern crate log;

/// Traces rays of light bouncing off straight mirrors, and prints their paths.
#[derive(Parser)]
#[command(version)]
struct Args {
    /// JSON scene to trace. A built-in scene is traced if omitted.
    scene: Option<PathBuf>,

    /// Overrides the scene's reflection budget.
    #[arg(long)]
    max_reflections: Option<usize>,

    /// Overrides how far before mirrors rays bounce.
    #[arg(long)]
    reflection_distance: Option<Float>,

    /// Distance under which two reflection points are considered
    /// the same, when looking for periodic orbits.
    #[arg(long, default_value_t = 1e-9)]
    loop_eps: Float,
}

/// A single ray, heading up-right, missing a single mirror below it.
fn default_scene() -> Scene {
    Scene::new(
        vec![Segment::from_coords([25.0, 0.0, 25.0, 10.0])],
        vec![Ray::new([20.0, 20.0], FRAC_PI_4, 500.0)],
    )
}

fn load_scene(file_path: &std::path::Path) -> Result<Scene> {
    let file = File::open(file_path)
        .with_context(|| format!("failed to open {}", file_path.display()))?;

    let json: serde_json::Value = serde_json::from_reader(BufReader::new(file))
        .with_context(|| format!("{} is not valid JSON", file_path.display()))?;

    Scene::from_json(&json).map_err(|e| anyhow!("invalid scene {}: {e}", file_path.display()))
}

fn main() -> Result<()> {
    env_logger::init();

    let args = Args::parse();

    let mut scene = match &args.scene {
        Some(file_path) => load_scene(file_path)?,
        None => {
            info!("no scene given, tracing the default one");
            default_scene()
        }
    };

    if let Some(max_reflections) = args.max_reflections {
        scene.max_reflections = max_reflections;
    }

    if let Some(reflection_distance) = args.reflection_distance {
        scene.reflection_distance = reflection_distance;
    }

    let tracer = scene.tracer()?;

    info!(
        "{} mirror(s), {} ray(s), up to {} reflections per ray, bouncing {} before mirrors",
        tracer.mirrors().len(),
        scene.rays.len(),
        tracer.max_reflections(),
        tracer.reflection_distance(),
    );

    let traces = scene
        .rays
        .par_iter()
        .enumerate()
        .map(|(i, &ray)| tracer.trace(ray).with_context(|| format!("ray {i}")))
        .collect::<Result<Vec<_>>>()?;

    for (i, trace) in traces.iter().enumerate() {
        if let Some(start) = trace.loop_index(args.loop_eps) {
            warn!("ray {i} is trapped in a periodic orbit, starting at reflection {start}");
        }

        if traces.len() > 1 {
            println!("ray {i}:");
        }
        print!("{trace}");
    }

    Ok(())
}
