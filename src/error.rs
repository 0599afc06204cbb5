//! Error taxonomy shared by graph construction, descriptor validation, the
//! engine and result access.

use thiserror::Error;

use crate::descriptor::ResultOptions;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    /// Malformed adjacency data: bad offsets, out-of-range endpoints, negative weights.
    #[error("invalid graph: {0}")]
    InvalidGraph(String),

    /// Source below zero or not below the vertex count.
    #[error("{}", source_message(.vertex, .vertex_count))]
    InvalidSource { vertex: i64, vertex_count: usize },

    #[error("invalid parameter: {0}")]
    InvalidParameter(String),

    #[error("Invalid combination of optional results: nothing to compute")]
    NothingToCompute,

    #[error("{0} are not set as an optional result")]
    ResultNotComputed(ResultOptions),

    #[error("invalid table: {0}")]
    InvalidTable(String),

    #[error("run cancelled before bucket {bucket}")]
    Cancelled { bucket: usize },

    #[error("failed to build worker pool: {0}")]
    WorkerPool(#[from] rayon::ThreadPoolBuildError),

    #[error("invalid configuration: {0}")]
    Config(#[from] serde_json::Error),
}

impl Error {
    /// Stable integer code used by the C ABI (0 is success).
    pub fn code(&self) -> i32 {
        match self {
            Error::InvalidSource { .. } => -2,
            Error::InvalidGraph(_) => -4,
            Error::InvalidParameter(_) | Error::Config(_) => -5,
            Error::NothingToCompute | Error::ResultNotComputed(_) => -6,
            Error::InvalidTable(_) => -7,
            Error::Cancelled { .. } => -8,
            Error::WorkerPool(_) => -9,
        }
    }
}

fn source_message(vertex: &i64, vertex_count: &usize) -> String {
    if *vertex < 0 {
        format!("Source vertex is lower than zero (source={vertex})")
    } else {
        format!("Source vertex is out of range (source={vertex}, vertex_count={vertex_count})")
    }
}
