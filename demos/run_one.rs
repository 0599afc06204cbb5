use std::time::Instant;

use sssp_delta::{compute_with, generate, Descriptor, EngineConfig, ResultOptions};
use tracing_subscriber::EnvFilter;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("info".parse()?))
        .init();

    let args: Vec<String> = std::env::args().collect();
    if args.len() < 4 {
        eprintln!("usage: run_one <n> <avg_degree> <seed> [delta] [workers]");
        std::process::exit(1);
    }
    let n: u32 = args[1].parse()?;
    let degree: f64 = args[2].parse()?;
    let seed: u64 = args[3].parse()?;
    let delta: f64 = args.get(4).map(|s| s.parse()).transpose()?.unwrap_or(2.5);
    let mut config = EngineConfig::from_env();
    if let Some(w) = args.get(5) { config.workers = w.parse()?; }

    let g = generate::random_uniform(n, degree, seed, 1.0, 4.0)?;
    let desc = Descriptor::new(0, delta).with_optional_results(ResultOptions::ALL);
    let t0 = Instant::now();
    let r = compute_with(&desc, &g, &config)?;
    let ms = t0.elapsed().as_secs_f64() * 1000.0;

    let dist = r.distances()?.as_slice();
    let reached = dist.iter().filter(|d| d.is_finite()).count();
    let farthest = dist.iter().copied().filter(|d| d.is_finite()).fold(0.0, f64::max);
    let report = serde_json::json!({
        "n": n,
        "m": g.edge_count(),
        "seed": seed,
        "ms": ms,
        "reached": reached,
        "farthest": farthest,
        "stats": r.stats(),
        "bucket_stats": r.stats().bucket_stats(),
    });
    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(())
}
