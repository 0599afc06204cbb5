//! Four-vertex walkthrough: delta = 2 splits the edges into light `0->1`,
//! `1->2` and heavy `0->2`, `1->3`, `2->3`.

use sssp_delta::{compute_with, CsrGraph, Descriptor, EngineConfig, ResultOptions};
use tracing_subscriber::EnvFilter;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("sssp_delta=trace".parse()?))
        .with_target(false)
        .without_time()
        .init();

    let g = CsrGraph::from_edges(4, &[(0, 1, 1.0f32), (0, 2, 4.0), (1, 2, 2.0), (1, 3, 6.0), (2, 3, 3.0)])?;
    let desc = Descriptor::new(0, 2.0).with_optional_results(ResultOptions::ALL);
    let r = compute_with(&desc, &g, &EngineConfig::single_threaded())?;

    let dist = r.distances()?;
    let pred = r.predecessors()?;
    for v in 0..g.vertex_count() {
        let path = r.path_to(v as u32)?.map(|p| format!("{p:?}")).unwrap_or_else(|| "-".into());
        println!("v={v} dist={} pred={} path={path}", dist.row(v)[0], pred.row(v)[0]);
    }
    println!("{}", serde_json::to_string(r.stats())?);
    Ok(())
}
