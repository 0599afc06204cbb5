use std::time::Instant;

use sssp_delta::{compute_with, generate, Descriptor, EngineConfig, ResultOptions};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args: Vec<String> = std::env::args().collect();
    let n: u32 = args.get(1).map(|s| s.parse()).transpose()?.unwrap_or(200_000);
    let degree: f64 = args.get(2).map(|s| s.parse()).transpose()?.unwrap_or(8.0);
    let seed: u64 = args.get(3).map(|s| s.parse()).transpose()?.unwrap_or(42);
    let max_workers = std::thread::available_parallelism().map(|p| p.get()).unwrap_or(1);

    let g = generate::random_uniform(n, degree, seed, 1.0, 5.0)?;
    let mut rows = Vec::new();
    let mut reference: Option<(Vec<f64>, Vec<i64>)> = None;
    for delta in [0.5, 2.0, 8.0] {
        let desc = Descriptor::new(0, delta).with_optional_results(ResultOptions::ALL);
        let mut workers = 1;
        while workers <= max_workers {
            let cfg = EngineConfig::from_env().with_workers(workers);
            let t0 = Instant::now();
            let r = compute_with(&desc, &g, &cfg)?;
            let ms = t0.elapsed().as_secs_f64() * 1000.0;
            let out = (r.distances()?.as_slice().to_vec(), r.predecessors()?.as_slice().to_vec());
            let parity = match &reference {
                Some(base) => *base == out,
                None => {
                    reference = Some(out);
                    true
                }
            };
            rows.push(serde_json::json!({
                "delta": delta,
                "workers": workers,
                "ms": ms,
                "parity": parity,
                "stats": r.stats().bucket_stats(),
                "relaxations": r.stats().relaxations(),
            }));
            workers *= 2;
        }
    }
    let report = serde_json::json!({ "n": n, "m": g.edge_count(), "seed": seed, "runs": rows });
    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(())
}
