//! Per-invocation descriptor: source vertex, bucket width and the mask of
//! results to materialise.

use std::fmt;
use std::ops::{BitAnd, BitOr, BitOrAssign};

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Bit mask over the optional outputs of a run. Combine with `|`.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ResultOptions(u8);

impl ResultOptions {
    pub const NONE: Self = Self(0);
    pub const DISTANCES: Self = Self(1 << 0);
    pub const PREDECESSORS: Self = Self(1 << 1);
    pub const ALL: Self = Self(Self::DISTANCES.0 | Self::PREDECESSORS.0);

    #[inline]
    pub fn contains(self, other: Self) -> bool { self.0 & other.0 == other.0 && other.0 != 0 }

    #[inline]
    pub fn is_empty(self) -> bool { self.0 & Self::ALL.0 == 0 }

    pub fn bits(self) -> u8 { self.0 }

    pub fn from_bits(bits: u8) -> Self { Self(bits & Self::ALL.0) }
}

impl BitOr for ResultOptions {
    type Output = Self;
    fn bitor(self, rhs: Self) -> Self { Self(self.0 | rhs.0) }
}

impl BitOrAssign for ResultOptions {
    fn bitor_assign(&mut self, rhs: Self) { self.0 |= rhs.0; }
}

impl BitAnd for ResultOptions {
    type Output = Self;
    fn bitand(self, rhs: Self) -> Self { Self(self.0 & rhs.0) }
}

impl fmt::Display for ResultOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (self.contains(Self::DISTANCES), self.contains(Self::PREDECESSORS)) {
            (true, true) => f.write_str("Distances and predecessors"),
            (true, false) => f.write_str("Distances"),
            (false, true) => f.write_str("Predecessors"),
            (false, false) => f.write_str("No results"),
        }
    }
}

impl fmt::Debug for ResultOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ResultOptions({self})")
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Descriptor {
    source: i64,
    delta: f64,
    #[serde(default = "default_results")]
    optional_results: ResultOptions,
}

fn default_results() -> ResultOptions { ResultOptions::DISTANCES }

impl Descriptor {
    /// Distances only, unless changed with [`Descriptor::with_optional_results`].
    pub fn new(source: i64, delta: f64) -> Self {
        Self { source, delta, optional_results: default_results() }
    }

    /// Parses a descriptor such as `{"source": 0, "delta": 2.0, "optional_results": 3}`.
    pub fn from_json(text: &str) -> Result<Self> { Ok(serde_json::from_str(text)?) }

    pub fn with_source(mut self, source: i64) -> Self { self.source = source; self }
    pub fn with_delta(mut self, delta: f64) -> Self { self.delta = delta; self }
    pub fn with_optional_results(mut self, results: ResultOptions) -> Self { self.optional_results = results; self }

    pub fn source(&self) -> i64 { self.source }
    pub fn delta(&self) -> f64 { self.delta }
    pub fn optional_results(&self) -> ResultOptions { self.optional_results }

    /// Checks the descriptor against a graph of `vertex_count` vertices and
    /// returns the source as a vertex id.
    pub fn validate(&self, vertex_count: usize) -> Result<u32> {
        let delta_ok = self.delta.is_finite() && self.delta > 0.0;
        if !delta_ok {
            return Err(Error::InvalidParameter(format!("Delta parameter must be positive and finite, got {}", self.delta)));
        }
        if self.optional_results.is_empty() { return Err(Error::NothingToCompute); }
        if self.source < 0 || self.source as u64 >= vertex_count as u64 {
            return Err(Error::InvalidSource { vertex: self.source, vertex_count });
        }
        Ok(self.source as u32)
    }
}
