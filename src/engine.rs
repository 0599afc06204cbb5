//! Delta-stepping relaxation engine.
//!
//! The run is an explicit state machine:
//!
//! ```text
//! Idle -> Running(from) -> Draining(i) -> Running(i + 1) -> ... -> Finished
//! ```
//!
//! `Running(from)` looks up the lowest non-empty bucket `i >= from` (and is the
//! only place cancellation is observed). `Draining(i)` settles bucket `i`:
//!
//! 1. pop every member, relax their light edges in parallel, repeat while the
//!    pass put vertices back into bucket `i`;
//! 2. relax the heavy edges of every vertex drained in step 1, once.
//!
//! Each pass is a fork-join over the drained batch on a rayon pool, so the
//! join is the phase barrier and the bucket arena is only drained by the
//! coordinating thread.

use std::sync::Arc;
use std::time::Instant;

use rayon::prelude::*;
use rayon::ThreadPool;
use tracing::{debug, trace, warn};

use crate::bucket::{index_of, BucketArena};
use crate::config::EngineConfig;
use crate::error::{Error, Result};
use crate::graph::{CsrGraph, EdgeClass, LightHeavySplit};
use crate::state::{Offer, PathState};
use crate::stats::{PassCounters, RunStats};
use crate::weight::Weight;

const NOT_SETTLED: usize = usize::MAX;

/// Where the engine is in its fixpoint loop.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Phase {
    Idle,
    /// Looking for the lowest non-empty bucket at or above the index.
    Running(usize),
    /// Settling the bucket with this index.
    Draining(usize),
    Finished,
}

pub struct DeltaStepping<'g, W: Weight> {
    split: LightHeavySplit<'g, W>,
    delta: f64,
    state: PathState<W>,
    buckets: BucketArena,
    config: EngineConfig,
    pool: Option<Arc<ThreadPool>>,
    phase: Phase,
    // bucket in which each vertex was last drained; dedups the settled set
    settled_in: Vec<usize>,
    stats: RunStats,
}

impl<'g, W: Weight> DeltaStepping<'g, W> {
    /// Validates the run parameters and prepares state, buckets and workers.
    /// Nothing is relaxed until [`DeltaStepping::run`].
    pub fn new(graph: &'g CsrGraph<W>, source: u32, delta: f64, config: EngineConfig) -> Result<Self> {
        config.validate()?;
        let n = graph.vertex_count();
        if source as usize >= n {
            return Err(Error::InvalidSource { vertex: source as i64, vertex_count: n });
        }
        let delta_ok = delta.is_finite() && delta > 0.0;
        if !delta_ok {
            return Err(Error::InvalidParameter(format!("Delta parameter must be positive and finite, got {delta}")));
        }
        let pool = match &config.pool {
            Some(shared) => Some(Arc::clone(shared)),
            None if config.workers > 1 => Some(Arc::new(
                rayon::ThreadPoolBuilder::new()
                    .num_threads(config.workers)
                    .thread_name(|i| format!("sssp-worker-{i}"))
                    .build()?,
            )),
            None => None,
        };
        let stats = RunStats { delta, workers: config.workers, ..RunStats::default() };
        Ok(Self {
            split: LightHeavySplit::new(graph, delta),
            delta,
            state: PathState::new(n, source),
            buckets: BucketArena::new(n),
            config,
            pool,
            phase: Phase::Idle,
            settled_in: vec![NOT_SETTLED; n],
            stats,
        })
    }

    pub fn phase(&self) -> Phase { self.phase }

    pub fn state(&self) -> &PathState<W> { &self.state }

    /// Runs to the fixpoint and hands back the final state and counters.
    pub fn run(mut self) -> Result<(PathState<W>, RunStats)> {
        let span = tracing::debug_span!(
            "delta_stepping",
            vertices = self.state.len(),
            source = self.state.source(),
            delta = self.delta,
            workers = self.config.workers
        );
        let _enter = span.enter();
        let started = Instant::now();
        debug!(
            light_edges = self.split.light_edge_count(),
            heavy_edges = self.split.heavy_edge_count(),
            "edge split"
        );

        loop {
            self.phase = match self.phase {
                Phase::Idle => {
                    self.buckets.insert(self.state.source(), 0);
                    Phase::Running(0)
                }
                Phase::Running(from) => match self.buckets.lowest_nonempty(from) {
                    None => Phase::Finished,
                    Some(i) if self.config.is_cancelled() => {
                        warn!(bucket = i, "cancelled at bucket boundary");
                        return Err(Error::Cancelled { bucket: i });
                    }
                    Some(i) => Phase::Draining(i),
                },
                Phase::Draining(i) => {
                    self.drain(i);
                    Phase::Running(i + 1)
                }
                Phase::Finished => break,
            };
        }

        let s = &self.stats;
        debug!(
            settled = s.settled,
            buckets = s.buckets_visited,
            light = s.light_relaxations,
            heavy = s.heavy_relaxations,
            ties = s.predecessor_ties,
            elapsed_us = started.elapsed().as_micros() as u64,
            "run finished"
        );
        Ok((self.state, self.stats))
    }

    fn drain(&mut self, current: usize) {
        let mut settled: Vec<u32> = Vec::new();
        let mut passes = 0u64;
        loop {
            let batch = self.buckets.pop_all(current);
            if batch.is_empty() { break; }
            passes += 1;
            for &v in &batch {
                let mark = &mut self.settled_in[v as usize];
                if *mark != current {
                    *mark = current;
                    settled.push(v);
                }
            }
            let c = self.relax(&batch, EdgeClass::Light, current);
            self.stats.light_relaxations += c.improved;
            self.stats.predecessor_ties += c.ties;
            trace!(bucket = current, pass = passes, batch = batch.len(), reinserted = c.into_current, "light pass");
        }

        let c = self.relax(&settled, EdgeClass::Heavy, current);
        self.stats.heavy_relaxations += c.improved;
        self.stats.predecessor_ties += c.ties;

        self.stats.settled += settled.len() as u64;
        self.stats.buckets_visited += 1;
        self.stats.light_pass_repeats += passes;
        self.stats.max_bucket_index = self.stats.max_bucket_index.max(current as u64);
        trace!(bucket = current, passes, settled = settled.len(), heavy = c.improved, "bucket settled");
    }

    /// One fork-join pass over `batch`.
    fn relax(&self, batch: &[u32], class: EdgeClass, current: usize) -> PassCounters {
        let chunk = self.config.chunk_size;
        match &self.pool {
            Some(pool) if batch.len() > chunk => pool.install(|| {
                batch
                    .par_chunks(chunk)
                    .map(|part| self.relax_chunk(part, class, current))
                    .reduce(PassCounters::default, |mut a, b| {
                        a += b;
                        a
                    })
            }),
            _ => self.relax_chunk(batch, class, current),
        }
    }

    fn relax_chunk(&self, part: &[u32], class: EdgeClass, current: usize) -> PassCounters {
        let mut c = PassCounters::default();
        let source = self.state.source();
        for &u in part {
            let from = self.state.label(u);
            let Some(from_bucket) = index_of(from.dist, self.delta) else { continue };
            let (targets, weights) = self.split.edges(u, class);
            for (&v, &w) in targets.iter().zip(weights) {
                if v == u || v == source { continue; }
                let cand = from.extend(u, w);
                match self.state.offer(v, cand) {
                    Offer::Rejected => continue,
                    Offer::Tied { hops_changed } => {
                        c.ties += 1;
                        if !hops_changed { continue; }
                    }
                    Offer::Improved { .. } => c.improved += 1,
                }
                let Some(b) = index_of(cand.dist, self.delta) else { continue };
                assert!(b >= from_bucket, "relaxing {u} -> {v} moved bucket {from_bucket} back to {b}");
                let b = match class {
                    EdgeClass::Light => b.max(current),
                    // w > delta puts the target at least one band up; rounding can hide that
                    EdgeClass::Heavy => b.max(current + 1),
                };
                if self.buckets.insert(v, b) && b == current { c.into_current += 1; }
            }
        }
        c
    }
}
