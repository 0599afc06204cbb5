//! Shared distance/predecessor state.
//!
//! Each vertex owns one slot holding its [`Label`]. The only mutation is
//! [`DistanceSlot::offer`]: a candidate replaces the stored label iff it
//! [precedes](Label::precedes) it. All fields change in a single step so no
//! reader ever sees a distance paired with a stale predecessor.
//!
//! Labels are ordered by `(dist, via, hops, pred)`:
//!
//! * `via` is the proposer's own distance, so among equal distances the
//!   closest predecessor wins and a proposal made from an outdated distance
//!   always loses to the same proposer's later one;
//! * `hops` counts consecutive zero-length steps (`via == dist`) and resets to
//!   zero on any step that adds length. Along a run of equal distances it
//!   strictly grows from predecessor to successor, so the `pred` links can
//!   never close a loop;
//! * `pred` settles what is left by lowest index.
//!
//! The order is a function of the final distances alone, so the chosen
//! predecessors do not depend on scheduling.

use std::sync::atomic::{AtomicU64, Ordering};

use parking_lot::Mutex;

use crate::weight::{PackedWeight, Weight};

/// Predecessor sentinel for unreached vertices and the source.
pub const NO_PRED: u32 = u32::MAX;

/// What a slot stores for one vertex.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Label<W> {
    pub dist: W,
    /// Distance of `pred` when it made the proposal.
    pub via: W,
    /// Zero-length steps since the last step that added length.
    pub hops: u32,
    pub pred: u32,
}

impl<W: Weight> Label<W> {
    pub fn unreached() -> Self {
        Self { dist: W::INFINITY, via: W::INFINITY, hops: 0, pred: NO_PRED }
    }

    pub fn source() -> Self {
        Self { dist: W::ZERO, via: W::ZERO, hops: 0, pred: NO_PRED }
    }

    /// What vertex `from`, holding `self`, proposes across an edge of weight `w`.
    #[inline(always)]
    pub fn extend(&self, from: u32, w: W) -> Self {
        let dist = self.dist.saturating_add(w);
        let hops = if dist == self.dist { self.hops.saturating_add(1) } else { 0 };
        Self { dist, via: self.dist, hops, pred: from }
    }

    /// Strict lexicographic `(dist, via, hops, pred)` comparison.
    #[inline(always)]
    pub fn precedes(&self, other: &Self) -> bool {
        if self.dist != other.dist { return self.dist < other.dist; }
        if self.via != other.via { return self.via < other.via; }
        (self.hops, self.pred) < (other.hops, other.pred)
    }
}

/// Outcome of offering a candidate to a slot.
#[derive(Copy, Clone, Debug, PartialEq)]
pub enum Offer<W> {
    /// Candidate did not precede the stored label; slot unchanged.
    Rejected,
    /// Same distance, different route. Successors only need another look when
    /// `hops` changed, since that is what they inherit.
    Tied { hops_changed: bool },
    /// Distance strictly decreased from `previous`.
    Improved { previous: W },
}

pub trait DistanceSlot<W>: Send + Sync {
    fn new(label: Label<W>) -> Self;
    fn load(&self) -> Label<W>;
    fn offer(&self, cand: Label<W>) -> Offer<W>;
}

#[inline(always)]
fn replace_if_preceding<W: Weight>(cur: &mut Label<W>, cand: Label<W>) -> Offer<W> {
    if !cand.precedes(cur) { return Offer::Rejected; }
    let prev = std::mem::replace(cur, cand);
    if cand.dist < prev.dist {
        Offer::Improved { previous: prev.dist }
    } else {
        Offer::Tied { hops_changed: cand.hops != prev.hops }
    }
}

/// Slot for 32-bit weights. The label sits behind a lock; a packed
/// `(dist, via)` key mirrors it in an `AtomicU64` so that candidates which
/// cannot win are turned away without locking.
pub struct PackedSlot<W> {
    key: AtomicU64,
    label: Mutex<Label<W>>,
}

#[inline(always)]
fn pack<W: PackedWeight>(l: &Label<W>) -> u64 { ((l.dist.to_key() as u64) << 32) | l.via.to_key() as u64 }

impl<W: PackedWeight> DistanceSlot<W> for PackedSlot<W> {
    fn new(label: Label<W>) -> Self {
        Self { key: AtomicU64::new(pack(&label)), label: Mutex::new(label) }
    }

    #[inline]
    fn load(&self) -> Label<W> { *self.label.lock() }

    #[inline]
    fn offer(&self, cand: Label<W>) -> Offer<W> {
        // the mirror only moves down and is written under the lock, so a stale
        // read is an upper bound of the stored key
        if pack(&cand) > self.key.load(Ordering::Acquire) { return Offer::Rejected; }
        let mut cur = self.label.lock();
        let out = replace_if_preceding(&mut cur, cand);
        if out != Offer::Rejected { self.key.store(pack(&cur), Ordering::Release); }
        out
    }
}

/// Per-vertex lock for weight types too wide to pack.
pub struct LockedSlot<W> {
    label: Mutex<Label<W>>,
}

impl<W: Weight> DistanceSlot<W> for LockedSlot<W> {
    fn new(label: Label<W>) -> Self { Self { label: Mutex::new(label) } }

    #[inline]
    fn load(&self) -> Label<W> { *self.label.lock() }

    #[inline]
    fn offer(&self, cand: Label<W>) -> Offer<W> { replace_if_preceding(&mut self.label.lock(), cand) }
}

/// Distance/predecessor arrays for one run.
pub struct PathState<W: Weight> {
    slots: Vec<W::Slot>,
    source: u32,
}

impl<W: Weight> PathState<W> {
    /// All vertices at `INFINITY` except `source` at zero; no predecessors.
    pub fn new(vertex_count: usize, source: u32) -> Self {
        let slots = (0..vertex_count)
            .map(|v| {
                let l = if v == source as usize { Label::source() } else { Label::unreached() };
                <W::Slot as DistanceSlot<W>>::new(l)
            })
            .collect();
        Self { slots, source }
    }

    #[inline]
    pub fn len(&self) -> usize { self.slots.len() }

    #[inline]
    pub fn is_empty(&self) -> bool { self.slots.is_empty() }

    #[inline]
    pub fn source(&self) -> u32 { self.source }

    #[inline(always)]
    pub fn dist(&self, v: u32) -> W { self.slots[v as usize].load().dist }

    /// `(dist, pred)` of `v`.
    #[inline(always)]
    pub fn load(&self, v: u32) -> (W, u32) {
        let l = self.slots[v as usize].load();
        (l.dist, l.pred)
    }

    #[inline(always)]
    pub fn label(&self, v: u32) -> Label<W> { self.slots[v as usize].load() }

    /// Atomic-minimum update of `v` with a label proposed by `cand.pred`.
    #[inline(always)]
    pub fn offer(&self, v: u32, cand: Label<W>) -> Offer<W> {
        if cand.dist.is_infinite() { return Offer::Rejected; }
        let out = self.slots[v as usize].offer(cand);
        if let Offer::Improved { previous } = out {
            assert!(cand.dist < previous, "distance of vertex {v} increased: {previous:?} -> {:?}", cand.dist);
        }
        out
    }

    /// Snapshot of both arrays, unreached vertices at `INFINITY` / [`NO_PRED`].
    pub fn into_parts(self) -> (Vec<W>, Vec<u32>) {
        self.slots.iter().map(|s| s.load()).map(|l| (l.dist, l.pred)).unzip()
    }
}
