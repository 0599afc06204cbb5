//! Output tables and the mask-driven result assembler.

use serde::Serialize;

use crate::descriptor::ResultOptions;
use crate::error::{Error, Result};
use crate::state::{PathState, NO_PRED};
use crate::stats::RunStats;
use crate::weight::Weight;

/// Predecessor table entry for unreached vertices and the source.
pub const NO_PREDECESSOR: i64 = -1;

/// Dense row-major table built from a flat buffer plus dimensions.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Table<T> {
    data: Vec<T>,
    row_count: usize,
    column_count: usize,
}

impl<T> Table<T> {
    pub fn from_flat(data: Vec<T>, row_count: usize, column_count: usize) -> Result<Self> {
        match row_count.checked_mul(column_count) {
            Some(len) if len == data.len() => Ok(Self { data, row_count, column_count }),
            _ => Err(Error::InvalidTable(format!(
                "buffer of {} elements does not fit {row_count} x {column_count}",
                data.len()
            ))),
        }
    }

    /// `len x 1` table.
    pub fn column(data: Vec<T>) -> Self {
        let row_count = data.len();
        Self { data, row_count, column_count: 1 }
    }

    pub fn row_count(&self) -> usize { self.row_count }
    pub fn column_count(&self) -> usize { self.column_count }

    pub fn row(&self, i: usize) -> &[T] {
        &self.data[i * self.column_count..(i + 1) * self.column_count]
    }

    pub fn as_slice(&self) -> &[T] { &self.data }
    pub fn into_vec(self) -> Vec<T> { self.data }
}

#[derive(Clone, Debug, Serialize)]
pub struct ShortestPathsResult {
    source: u32,
    options: ResultOptions,
    distances: Option<Table<f64>>,
    predecessors: Option<Table<i64>>,
    stats: RunStats,
}

impl ShortestPathsResult {
    /// `vertex_count x 1` distances; unreached vertices hold `f64::INFINITY`.
    pub fn distances(&self) -> Result<&Table<f64>> {
        self.distances.as_ref().ok_or(Error::ResultNotComputed(ResultOptions::DISTANCES))
    }

    /// `vertex_count x 1` predecessors; [`NO_PREDECESSOR`] for the source and unreached vertices.
    pub fn predecessors(&self) -> Result<&Table<i64>> {
        self.predecessors.as_ref().ok_or(Error::ResultNotComputed(ResultOptions::PREDECESSORS))
    }

    pub fn source(&self) -> u32 { self.source }
    pub fn options(&self) -> ResultOptions { self.options }
    pub fn stats(&self) -> &RunStats { &self.stats }

    /// Vertices from the source to `target`, or `None` when `target` is unreached.
    /// Requires predecessors.
    ///
    /// # Panics
    /// If the chain from `target` loops or stops short of the source; the
    /// engine never produces such a table.
    pub fn path_to(&self, target: u32) -> Result<Option<Vec<u32>>> {
        let pred = self.predecessors()?.as_slice();
        if target as usize >= pred.len() {
            return Err(Error::InvalidParameter(format!("target vertex {target} outside [0, {})", pred.len())));
        }
        if target != self.source && pred[target as usize] == NO_PREDECESSOR { return Ok(None); }
        let mut path = vec![target];
        let mut v = target;
        while v != self.source {
            let p = pred[v as usize];
            assert!(p != NO_PREDECESSOR, "predecessor chain from {target} stops at {v} before the source");
            assert!(path.len() < pred.len(), "predecessor cycle on the chain from {target}");
            v = p as u32;
            path.push(v);
        }
        path.reverse();
        Ok(Some(path))
    }
}

/// Converts final engine state into the requested tables.
pub fn assemble<W: Weight>(state: PathState<W>, options: ResultOptions, stats: RunStats) -> ShortestPathsResult {
    let source = state.source();
    let (dist, pred) = state.into_parts();
    let distances = options.contains(ResultOptions::DISTANCES).then(|| {
        Table::column(dist.iter().map(|&d| if d.is_infinite() { f64::INFINITY } else { d.to_f64() }).collect())
    });
    let predecessors = options.contains(ResultOptions::PREDECESSORS).then(|| {
        Table::column(
            pred.iter()
                .enumerate()
                .map(|(v, &p)| if p == NO_PRED || v == source as usize { NO_PREDECESSOR } else { p as i64 })
                .collect(),
        )
    });
    ShortestPathsResult { source, options, distances, predecessors, stats }
}
