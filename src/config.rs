//! Engine configuration: worker count, batch chunking and cancellation.
//!
//! Environment knobs (read by [`EngineConfig::from_env`]):
//!   SSSP_WORKERS     (default: rayon's thread count) - parallel workers per phase
//!   SSSP_CHUNK_SIZE  (default 256)                   - vertices handed to a worker at a time

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use rayon::ThreadPool;
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

pub const DEFAULT_CHUNK_SIZE: usize = 256;

/// Cooperative cancellation flag, observed only at bucket boundaries.
#[derive(Clone, Debug, Default)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
    pub fn new() -> Self { Self::default() }
    pub fn cancel(&self) { self.0.store(true, Ordering::Release); }
    pub fn is_cancelled(&self) -> bool { self.0.load(Ordering::Acquire) }
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    pub workers: usize,
    pub chunk_size: usize,
    #[serde(skip)]
    pub cancel: Option<CancelToken>,
    /// Worker pool reused across runs. Without one every engine with more
    /// than one worker builds and tears down its own.
    #[serde(skip)]
    pub pool: Option<Arc<ThreadPool>>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self { workers: rayon::current_num_threads().max(1), chunk_size: DEFAULT_CHUNK_SIZE, cancel: None, pool: None }
    }
}

impl EngineConfig {
    /// Runs every phase inline on the calling thread.
    pub fn single_threaded() -> Self { Self { workers: 1, ..Self::default() } }

    pub fn with_workers(mut self, workers: usize) -> Self { self.workers = workers; self }
    pub fn with_chunk_size(mut self, chunk_size: usize) -> Self { self.chunk_size = chunk_size; self }
    pub fn with_cancel(mut self, token: CancelToken) -> Self { self.cancel = Some(token); self }

    /// Runs on `pool`; the worker count follows its thread count.
    pub fn with_pool(mut self, pool: Arc<ThreadPool>) -> Self {
        self.workers = pool.current_num_threads();
        self.pool = Some(pool);
        self
    }

    /// Defaults overridden by `SSSP_WORKERS` / `SSSP_CHUNK_SIZE`; unparsable values are ignored.
    pub fn from_env() -> Self {
        let mut cfg = Self::default();
        if let Some(w) = std::env::var("SSSP_WORKERS").ok().and_then(|v| v.trim().parse().ok()) { cfg.workers = w; }
        if let Some(c) = std::env::var("SSSP_CHUNK_SIZE").ok().and_then(|v| v.trim().parse().ok()) { cfg.chunk_size = c; }
        cfg
    }

    pub fn from_json(text: &str) -> Result<Self> { Ok(serde_json::from_str(text)?) }

    pub fn validate(&self) -> Result<()> {
        if self.workers == 0 { return Err(Error::InvalidParameter("worker count must be at least 1".into())); }
        if self.chunk_size == 0 { return Err(Error::InvalidParameter("chunk size must be at least 1".into())); }
        Ok(())
    }

    pub(crate) fn is_cancelled(&self) -> bool {
        self.cancel.as_ref().is_some_and(CancelToken::is_cancelled)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn json_fills_missing_fields_from_defaults() {
        let cfg = EngineConfig::from_json(r#"{"workers": 3}"#).unwrap();
        assert_eq!(cfg.workers, 3);
        assert_eq!(cfg.chunk_size, DEFAULT_CHUNK_SIZE);
        assert!(cfg.cancel.is_none());
    }

    #[test]
    fn zero_workers_or_chunk_rejected() {
        assert!(EngineConfig::default().with_workers(0).validate().is_err());
        assert!(EngineConfig::default().with_chunk_size(0).validate().is_err());
        assert!(EngineConfig::single_threaded().validate().is_ok());
    }

    #[test]
    fn shared_pool_sets_worker_count() {
        let pool = Arc::new(rayon::ThreadPoolBuilder::new().num_threads(3).build().unwrap());
        let cfg = EngineConfig::single_threaded().with_pool(Arc::clone(&pool));
        assert_eq!(cfg.workers, 3);
        assert!(Arc::ptr_eq(cfg.clone().pool.as_ref().unwrap(), &pool));
    }

    #[test]
    fn cancel_token_is_shared_between_clones() {
        let t = CancelToken::new();
        let cfg = EngineConfig::single_threaded().with_cancel(t.clone());
        assert!(!cfg.is_cancelled());
        t.cancel();
        assert!(cfg.is_cancelled());
    }
}
