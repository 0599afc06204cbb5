//! Run instrumentation, mirrored into the C ABI structs.

use std::ops::AddAssign;

use serde::Serialize;

#[repr(C)]
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct SsspResultInfo {
    pub relaxations: u64,       // successful distance decreases
    pub light_relaxations: u64, // of which via light edges
    pub heavy_relaxations: u64, // of which via heavy edges
    pub settled: u32,           // vertices settled (reached)
    pub error_code: i32,        // 0 == success
}

#[repr(C)]
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct SsspBucketStats {
    pub buckets_visited: u32,    // non-empty bucket indices processed
    pub light_pass_repeats: u32, // settle-loop passes summed over buckets
    pub max_bucket_index: u32,   // highest bucket index processed
    pub delta_x1000: u32,        // delta * 1000 (for quick inspection)
    pub heavy_ratio_x1000: u32,  // (heavy_relax / total_relax) * 1000
}

/// Counters for one run. Not part of the result's determinism contract:
/// relaxation counts depend on worker interleaving.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct RunStats {
    pub delta: f64,
    pub workers: usize,
    pub light_relaxations: u64,
    pub heavy_relaxations: u64,
    pub predecessor_ties: u64,
    pub settled: u64,
    pub buckets_visited: u64,
    pub light_pass_repeats: u64,
    pub max_bucket_index: u64,
}

impl RunStats {
    pub fn relaxations(&self) -> u64 { self.light_relaxations + self.heavy_relaxations }

    pub fn heavy_ratio(&self) -> f64 {
        match self.relaxations() {
            0 => 0.0,
            r => self.heavy_relaxations as f64 / r as f64,
        }
    }

    pub fn info(&self) -> SsspResultInfo {
        SsspResultInfo {
            relaxations: self.relaxations(),
            light_relaxations: self.light_relaxations,
            heavy_relaxations: self.heavy_relaxations,
            settled: self.settled.min(u32::MAX as u64) as u32,
            error_code: 0,
        }
    }

    pub fn bucket_stats(&self) -> SsspBucketStats {
        let sat = |x: u64| x.min(u32::MAX as u64) as u32;
        SsspBucketStats {
            buckets_visited: sat(self.buckets_visited),
            light_pass_repeats: sat(self.light_pass_repeats),
            max_bucket_index: sat(self.max_bucket_index),
            delta_x1000: (self.delta * 1000.0) as u32,
            heavy_ratio_x1000: (self.heavy_ratio() * 1000.0) as u32,
        }
    }
}

/// Per-worker tallies of one relaxation pass, summed after the join.
#[derive(Copy, Clone, Debug, Default)]
pub(crate) struct PassCounters {
    pub improved: u64,
    pub ties: u64,
    pub into_current: u64,
}

impl AddAssign for PassCounters {
    fn add_assign(&mut self, o: Self) {
        self.improved += o.improved;
        self.ties += o.ties;
        self.into_current += o.into_current;
    }
}
