//! Sparse, lazily grown bucket arena.
//!
//! Buckets are addressed by index (`floor(dist / delta)`) in an ordered map of
//! slot lists. Every vertex additionally owns one atomic membership word
//! holding the index of the bucket it currently belongs to, which is what makes
//! a vertex a member of at most one bucket: moving a vertex only lowers its
//! membership word and appends it to the new list, and the entry left behind in
//! the old list is discarded as stale when that list is drained.
//!
//! Insertion is safe from any number of workers at once (`&self`). Draining and
//! scanning take `&mut self`, so a drain is always a single hand-off that no
//! worker can race with.

use std::collections::BTreeMap;
use std::sync::atomic::{AtomicUsize, Ordering};

use parking_lot::{Mutex, RwLock};

use crate::weight::Weight;

const NOT_QUEUED: usize = usize::MAX;

/// `floor(distance / delta)`, or `None` for an unreached (infinite) distance.
#[inline(always)]
pub fn index_of<W: Weight>(distance: W, delta: f64) -> Option<usize> {
    if distance.is_infinite() { return None; }
    Some((distance.to_f64() / delta).floor() as usize)
}

pub struct BucketArena {
    lists: RwLock<BTreeMap<usize, Mutex<Vec<u32>>>>,
    membership: Vec<AtomicUsize>,
}

impl BucketArena {
    pub fn new(vertex_count: usize) -> Self {
        Self {
            lists: RwLock::new(BTreeMap::new()),
            membership: (0..vertex_count).map(|_| AtomicUsize::new(NOT_QUEUED)).collect(),
        }
    }

    /// Bucket `v` currently belongs to, if any.
    #[inline]
    pub fn bucket_of(&self, v: u32) -> Option<usize> {
        match self.membership[v as usize].load(Ordering::Acquire) {
            NOT_QUEUED => None,
            b => Some(b),
        }
    }

    /// Places `v` in `bucket`, implicitly leaving any higher bucket it was in.
    /// Returns `false` when `v` already sits in `bucket` or lower (a concurrent
    /// improvement won), in which case nothing changes.
    pub fn insert(&self, v: u32, bucket: usize) -> bool {
        let prev = self.membership[v as usize].fetch_min(bucket, Ordering::AcqRel);
        if prev <= bucket { return false; }
        {
            let lists = self.lists.read();
            if let Some(list) = lists.get(&bucket) {
                list.lock().push(v);
                return true;
            }
        }
        self.lists.write().entry(bucket).or_default().get_mut().push(v);
        true
    }

    /// Takes every current member of `bucket` and clears their membership.
    pub fn pop_all(&mut self, bucket: usize) -> Vec<u32> {
        let Some(list) = self.lists.get_mut().remove(&bucket) else { return Vec::new() };
        let mut batch = list.into_inner();
        batch.retain(|&v| self.take_member(v, bucket));
        batch
    }

    /// `true` if no vertex currently belongs to `bucket`.
    pub fn is_empty(&self, bucket: usize) -> bool {
        let lists = self.lists.read();
        match lists.get(&bucket) {
            Some(list) => !list.lock().iter().any(|&v| self.membership[v as usize].load(Ordering::Acquire) == bucket),
            None => true,
        }
    }

    /// Lowest bucket index `>= from` with at least one member. Lists holding
    /// only stale entries are dropped along the way, as is everything below `from`.
    pub fn lowest_nonempty(&mut self, from: usize) -> Option<usize> {
        let lists = self.lists.get_mut();
        while let Some((&b, _)) = lists.first_key_value() {
            if b < from {
                lists.remove(&b);
                continue;
            }
            let list = lists.get_mut(&b).map(|l| l.get_mut())?;
            let membership = &self.membership;
            list.retain(|&v| {
                let m = membership[v as usize].load(Ordering::Relaxed);
                assert!(m <= b || m == NOT_QUEUED, "vertex {v} listed in bucket {b} but member of bucket {m}");
                m == b
            });
            if !list.is_empty() { return Some(b); }
            lists.remove(&b);
        }
        None
    }

    /// Number of allocated bucket lists (including ones holding stale entries).
    pub fn allocated(&self) -> usize { self.lists.read().len() }

    #[inline]
    fn take_member(&self, v: u32, bucket: usize) -> bool {
        match self.membership[v as usize].compare_exchange(bucket, NOT_QUEUED, Ordering::AcqRel, Ordering::Acquire) {
            Ok(_) => true,
            Err(m) => {
                assert!(m < bucket || m == NOT_QUEUED, "vertex {v} listed in bucket {bucket} but member of bucket {m}");
                false
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn index_of_floors_and_skips_infinity() {
        assert_eq!(index_of(0.0f32, 2.0), Some(0));
        assert_eq!(index_of(1.999f32, 2.0), Some(0));
        assert_eq!(index_of(2.0f32, 2.0), Some(1));
        assert_eq!(index_of(7u32, 3.0), Some(2));
        assert_eq!(index_of(f32::INFINITY, 2.0), None);
        assert_eq!(index_of(i32::MAX, 0.5), None);
    }

    #[test]
    fn moving_a_vertex_leaves_a_stale_entry_behind() {
        let mut b = BucketArena::new(4);
        assert!(b.insert(1, 5));
        assert!(b.insert(2, 5));
        assert!(b.insert(1, 3));
        assert_eq!(b.bucket_of(1), Some(3));
        assert!(!b.insert(1, 4), "higher bucket must not steal membership");
        assert!(!b.insert(1, 3), "re-insert into the same bucket is a no-op");
        assert_eq!(b.lowest_nonempty(0), Some(3));
        assert_eq!(b.pop_all(3), vec![1]);
        assert!(b.is_empty(3));
        assert_eq!(b.lowest_nonempty(4), Some(5));
        assert_eq!(b.pop_all(5), vec![2]);
        assert_eq!(b.lowest_nonempty(0), None);
    }

    #[test]
    fn bucket_repopulated_after_drain() {
        let mut b = BucketArena::new(3);
        b.insert(0, 0);
        assert_eq!(b.pop_all(0), vec![0]);
        assert!(b.is_empty(0));
        assert!(b.insert(0, 0));
        assert!(b.insert(2, 0));
        assert!(!b.is_empty(0));
        assert_eq!(b.pop_all(0), vec![0, 2]);
    }

    #[test]
    fn stale_only_lists_are_skipped() {
        let mut b = BucketArena::new(2);
        b.insert(0, 9);
        b.insert(0, 4);
        b.pop_all(4);
        assert_eq!(b.lowest_nonempty(0), None);
        assert_eq!(b.allocated(), 0);
    }

    #[test]
    fn concurrent_inserts_list_each_vertex_once() {
        let mut b = BucketArena::new(1000);
        std::thread::scope(|s| {
            for t in 0..4 {
                let b = &b;
                s.spawn(move || {
                    for v in 0..1000u32 { b.insert(v, 10 + ((v as usize + t) % 3)); }
                });
            }
        });
        let mut seen = Vec::new();
        while let Some(i) = b.lowest_nonempty(0) { seen.extend(b.pop_all(i)); }
        seen.sort_unstable();
        assert_eq!(seen, (0..1000).collect::<Vec<u32>>());
    }
}
