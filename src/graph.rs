//! Immutable CSR graph store and the per-run light/heavy edge split.
//!
//! Memory layout:
//! - `offsets`: length `n + 1`, non-decreasing, `offsets[0] == 0`, `offsets[n] == m`
//! - `targets` / `weights`: paired arrays of length `m`, grouped by source vertex
//!
//! Construction validates everything up front and is all-or-nothing; nothing
//! mutates a graph afterwards.

use serde::Serialize;

use crate::error::{Error, Result};
use crate::weight::Weight;

#[derive(Clone, Debug, Serialize)]
pub struct CsrGraph<W> {
    offsets: Vec<usize>,
    targets: Vec<u32>,
    weights: Vec<W>,
}

impl<W: Weight> CsrGraph<W> {
    /// Builds a graph from `(source, target, weight)` triples. Edges keep
    /// their relative order within each source vertex.
    pub fn from_edges(vertex_count: usize, edges: &[(u32, u32, W)]) -> Result<Self> {
        if vertex_count > MAX_VERTICES {
            return Err(Error::InvalidGraph(format!("vertex count {vertex_count} exceeds {MAX_VERTICES}")));
        }
        let mut degree = vec![0usize; vertex_count + 1];
        for (i, &(u, v, w)) in edges.iter().enumerate() {
            check_edge(i, u, v, w, vertex_count)?;
            degree[u as usize + 1] += 1;
        }
        for i in 1..degree.len() { degree[i] += degree[i - 1]; }
        let offsets = degree;
        let mut cursor = offsets.clone();
        let mut targets = vec![0u32; edges.len()];
        let mut weights = vec![W::ZERO; edges.len()];
        for &(u, v, w) in edges {
            let slot = &mut cursor[u as usize];
            targets[*slot] = v;
            weights[*slot] = w;
            *slot += 1;
        }
        Ok(Self { offsets, targets, weights })
    }

    /// Adopts caller-supplied CSR buffers after validating them.
    pub fn from_csr_parts(offsets: Vec<usize>, targets: Vec<u32>, weights: Vec<W>) -> Result<Self> {
        let Some((&first, _)) = offsets.split_first() else {
            return Err(Error::InvalidGraph("offsets must have length vertex_count + 1".into()));
        };
        if first != 0 {
            return Err(Error::InvalidGraph(format!("offsets must start at 0, found {first}")));
        }
        if let Some(i) = offsets.windows(2).position(|w| w[0] > w[1]) {
            return Err(Error::InvalidGraph(format!("offsets decrease at vertex {i}: {} > {}", offsets[i], offsets[i + 1])));
        }
        if targets.len() != weights.len() {
            return Err(Error::InvalidGraph(format!("{} targets but {} weights", targets.len(), weights.len())));
        }
        let m = offsets[offsets.len() - 1];
        if m != targets.len() {
            return Err(Error::InvalidGraph(format!("offsets end at {m} but there are {} edges", targets.len())));
        }
        let n = offsets.len() - 1;
        if n > MAX_VERTICES {
            return Err(Error::InvalidGraph(format!("vertex count {n} exceeds {MAX_VERTICES}")));
        }
        for u in 0..n {
            for e in offsets[u]..offsets[u + 1] { check_edge(e, u as u32, targets[e], weights[e], n)?; }
        }
        Ok(Self { offsets, targets, weights })
    }

    #[inline]
    pub fn vertex_count(&self) -> usize { self.offsets.len() - 1 }

    #[inline]
    pub fn edge_count(&self) -> usize { self.targets.len() }

    #[inline]
    pub fn out_degree(&self, v: u32) -> usize {
        self.offsets[v as usize + 1] - self.offsets[v as usize]
    }

    /// Outgoing `(target, weight)` pairs of `v`.
    #[inline]
    pub fn out_edges(&self, v: u32) -> impl Iterator<Item = (u32, W)> + '_ {
        let r = self.offsets[v as usize]..self.offsets[v as usize + 1];
        self.targets[r.clone()].iter().copied().zip(self.weights[r].iter().copied())
    }

    /// Largest edge weight, `None` for an edgeless graph.
    pub fn max_weight(&self) -> Option<W> {
        self.weights.iter().copied().fold(None, |acc, w| match acc {
            Some(m) if m >= w => Some(m),
            _ => Some(w),
        })
    }

    pub fn offsets(&self) -> &[usize] { &self.offsets }
    pub fn targets(&self) -> &[u32] { &self.targets }
    pub fn weights(&self) -> &[W] { &self.weights }
}

/// Vertex ids are `u32` and `u32::MAX` is reserved as the "no predecessor" sentinel.
const MAX_VERTICES: usize = u32::MAX as usize;

#[inline]
fn check_edge<W: Weight>(i: usize, u: u32, v: u32, w: W, n: usize) -> Result<()> {
    if u as usize >= n || v as usize >= n {
        return Err(Error::InvalidGraph(format!("edge {i} ({u} -> {v}) has an endpoint outside [0, {n})")));
    }
    if !w.is_valid_weight() {
        return Err(Error::InvalidGraph(format!("edge {i} ({u} -> {v}) has invalid weight {w:?}")));
    }
    Ok(())
}

/// Which half of a vertex's adjacency a relaxation pass walks.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum EdgeClass {
    /// `weight <= delta`
    Light,
    /// `weight > delta`
    Heavy,
}

/// Adjacency reordered once per run so each vertex's light edges precede its
/// heavy edges; `light_end[v]` is the split point.
pub struct LightHeavySplit<'g, W> {
    offsets: &'g [usize],
    targets: Vec<u32>,
    weights: Vec<W>,
    light_end: Vec<usize>,
    light_edges: usize,
}

impl<'g, W: Weight> LightHeavySplit<'g, W> {
    pub fn new(graph: &'g CsrGraph<W>, delta: f64) -> Self {
        let n = graph.vertex_count();
        let mut targets = Vec::with_capacity(graph.edge_count());
        let mut weights = Vec::with_capacity(graph.edge_count());
        let mut light_end = Vec::with_capacity(n);
        let mut heavy: Vec<(u32, W)> = Vec::new();
        for u in 0..n as u32 {
            heavy.clear();
            for (v, w) in graph.out_edges(u) {
                if w.to_f64() <= delta { targets.push(v); weights.push(w); } else { heavy.push((v, w)); }
            }
            light_end.push(targets.len());
            for &(v, w) in &heavy { targets.push(v); weights.push(w); }
        }
        let light_edges = light_end.iter().zip(&graph.offsets).map(|(end, start)| end - start).sum();
        Self { offsets: &graph.offsets, targets, weights, light_end, light_edges }
    }

    #[inline(always)]
    pub fn edges(&self, v: u32, class: EdgeClass) -> (&[u32], &[W]) {
        let v = v as usize;
        let r = match class {
            EdgeClass::Light => self.offsets[v]..self.light_end[v],
            EdgeClass::Heavy => self.light_end[v]..self.offsets[v + 1],
        };
        (&self.targets[r.clone()], &self.weights[r])
    }

    #[inline]
    pub fn light_edges(&self, v: u32) -> (&[u32], &[W]) { self.edges(v, EdgeClass::Light) }

    #[inline]
    pub fn heavy_edges(&self, v: u32) -> (&[u32], &[W]) { self.edges(v, EdgeClass::Heavy) }

    pub fn light_edge_count(&self) -> usize { self.light_edges }

    pub fn heavy_edge_count(&self) -> usize { self.targets.len() - self.light_edges }
}
