//! C ABI over flat CSR buffers (`f32` weights).
//!
//! Return codes: `0` success, `-1` empty graph, `-3` null pointer, otherwise
//! [`Error::code`]. On failure `info.error_code` carries the same value and the
//! output buffers are left untouched.

use std::slice;

use crate::config::EngineConfig;
use crate::descriptor::{Descriptor, ResultOptions};
use crate::error::{Error, Result};
use crate::graph::CsrGraph;
use crate::stats::{SsspBucketStats, SsspResultInfo};

#[no_mangle]
pub extern "C" fn sssp_version() -> u32 { 5 }

/// # Safety
/// `offsets` must point to `n + 1` values; `targets` and `weights` to
/// `offsets[n]` values each; `out_dist` and `out_pred` to `n` writable slots.
/// `info` and `buckets` may be null. `workers == 0` picks the default from
/// the environment.
#[no_mangle]
pub unsafe extern "C" fn sssp_run_delta_stepping(
    n: u32,
    offsets: *const u32, // len n+1
    targets: *const u32, // len m
    weights: *const f32, // len m
    source: u32,
    delta: f32,
    workers: u32,
    out_dist: *mut f32, // len n
    out_pred: *mut i32, // len n
    info: *mut SsspResultInfo,
    buckets: *mut SsspBucketStats,
) -> i32 {
    let rc = if n == 0 {
        -1
    } else if offsets.is_null() || targets.is_null() || weights.is_null() || out_dist.is_null() || out_pred.is_null() {
        -3
    } else {
        let n = n as usize;
        let off = slice::from_raw_parts(offsets, n + 1);
        let m = off[n] as usize;
        let graph = CsrGraph::from_csr_parts(
            off.iter().map(|&o| o as usize).collect(),
            slice::from_raw_parts(targets, m).to_vec(),
            slice::from_raw_parts(weights, m).to_vec(),
        );
        let dist = slice::from_raw_parts_mut(out_dist, n);
        let pred = slice::from_raw_parts_mut(out_pred, n);
        match graph.and_then(|g| run_into(&g, source, delta, workers, dist, pred)) {
            Ok((i, b)) => {
                if !info.is_null() { *info = i; }
                if !buckets.is_null() { *buckets = b; }
                0
            }
            Err(e) => e.code(),
        }
    };
    if rc != 0 && !info.is_null() {
        *info = SsspResultInfo { error_code: rc, ..SsspResultInfo::default() };
    }
    rc
}

fn run_into(
    graph: &CsrGraph<f32>,
    source: u32,
    delta: f32,
    workers: u32,
    dist: &mut [f32],
    pred: &mut [i32],
) -> Result<(SsspResultInfo, SsspBucketStats)> {
    let mut config = EngineConfig::from_env();
    if workers > 0 { config.workers = workers as usize; }
    let desc = Descriptor::new(source as i64, delta as f64).with_optional_results(ResultOptions::ALL);
    let r = crate::compute_with(&desc, graph, &config)?;
    for (out, &d) in dist.iter_mut().zip(r.distances()?.as_slice()) { *out = d as f32; }
    for (out, &p) in pred.iter_mut().zip(r.predecessors()?.as_slice()) {
        *out = i32::try_from(p).map_err(|_| Error::InvalidTable(format!("predecessor {p} does not fit i32")))?;
    }
    Ok((r.stats().info(), r.stats().bucket_stats()))
}
