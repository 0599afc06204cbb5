//! Parallel delta-stepping single-source shortest paths over CSR graphs.
//!
//! ```
//! use sssp_delta::{compute, CsrGraph, Descriptor, ResultOptions};
//!
//! let g = CsrGraph::from_edges(4, &[(0, 1, 1.0f32), (0, 2, 4.0), (1, 2, 2.0), (1, 3, 6.0), (2, 3, 3.0)])?;
//! let desc = Descriptor::new(0, 2.0).with_optional_results(ResultOptions::ALL);
//! let r = compute(&desc, &g)?;
//! assert_eq!(r.distances()?.as_slice(), &[0.0, 1.0, 3.0, 6.0]);
//! assert_eq!(r.path_to(3)?, Some(vec![0, 1, 2, 3]));
//! # Ok::<(), sssp_delta::Error>(())
//! ```
//!
//! Results are deterministic. Among equal-distance proposals the proposer
//! closest to the source wins, then the route with the fewest trailing
//! zero-weight edges, then the lowest index, so `dist` and `pred` do not
//! depend on the worker count or scheduling and the predecessors always form
//! a tree rooted at the source. Run counters in [`RunStats`] do vary.

pub mod bucket;
pub mod config;
pub mod descriptor;
pub mod engine;
pub mod error;
pub mod ffi;
pub mod generate;
pub mod graph;
pub mod result;
pub mod state;
pub mod stats;
pub mod weight;

use tracing::info;

pub use config::{CancelToken, EngineConfig};
pub use descriptor::{Descriptor, ResultOptions};
pub use engine::{DeltaStepping, Phase};
pub use error::{Error, Result};
pub use graph::{CsrGraph, LightHeavySplit};
pub use result::{ShortestPathsResult, Table, NO_PREDECESSOR};
pub use stats::{RunStats, SsspBucketStats, SsspResultInfo};
pub use weight::Weight;

/// Shortest paths from `desc.source()` with workers and chunking taken from
/// the environment (see [`EngineConfig::from_env`]).
///
/// The environment is read again on every call, and with more than one
/// worker each call builds a fresh rayon pool. Callers running many queries
/// should build an [`EngineConfig`] once, attach a pool with
/// [`EngineConfig::with_pool`], and use [`compute_with`].
pub fn compute<W: Weight>(desc: &Descriptor, graph: &CsrGraph<W>) -> Result<ShortestPathsResult> {
    compute_with(desc, graph, &EngineConfig::from_env())
}

/// Shortest paths with an explicit engine configuration.
pub fn compute_with<W: Weight>(desc: &Descriptor, graph: &CsrGraph<W>, config: &EngineConfig) -> Result<ShortestPathsResult> {
    config.validate()?;
    let source = desc.validate(graph.vertex_count())?;
    let (state, stats) = DeltaStepping::new(graph, source, desc.delta(), config.clone())?.run()?;
    info!(
        source,
        settled = stats.settled,
        relaxations = stats.relaxations(),
        buckets = stats.buckets_visited,
        "shortest paths computed"
    );
    Ok(result::assemble(state, desc.optional_results(), stats))
}
