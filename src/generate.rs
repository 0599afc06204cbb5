//! Deterministic graph generators for demos, benchmarks and tests.

use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

use crate::error::Result;
use crate::graph::CsrGraph;
use crate::weight::Weight;

/// `0 -> 1 -> ... -> n-1`, every edge weighted `w`.
pub fn path<W: Weight>(n: u32, w: W) -> Result<CsrGraph<W>> {
    let edges: Vec<_> = (1..n).map(|v| (v - 1, v, w)).collect();
    CsrGraph::from_edges(n as usize, &edges)
}

/// Center 0 with an edge to each of the leaves `1..=k`.
pub fn star<W: Weight>(k: u32, w: W) -> Result<CsrGraph<W>> {
    let edges: Vec<_> = (1..=k).map(|leaf| (0, leaf, w)).collect();
    CsrGraph::from_edges(k as usize + 1, &edges)
}

pub fn complete<W: Weight>(n: u32, w: W) -> Result<CsrGraph<W>> {
    let edges: Vec<_> = (0..n).flat_map(|u| (0..n).filter(move |&v| v != u).map(move |v| (u, v, w))).collect();
    CsrGraph::from_edges(n as usize, &edges)
}

/// Two cliques of `a` and `b` vertices joined by the single edge `a-1 -> a`.
pub fn bridge_cliques<W: Weight>(a: u32, b: u32, w: W) -> Result<CsrGraph<W>> {
    let n = a + b;
    let mut edges = Vec::new();
    for (lo, hi) in [(0, a), (a, n)] {
        for u in lo..hi {
            edges.extend((lo..hi).filter(|&v| v != u).map(|v| (u, v, w)));
        }
    }
    if a > 0 && b > 0 { edges.push((a - 1, a, w)); }
    CsrGraph::from_edges(n as usize, &edges)
}

/// `n` vertices, `n * avg_degree` edges with uniform endpoints (self-loops and
/// parallel edges included) and weights drawn by `weight`.
pub fn random<W: Weight>(n: u32, avg_degree: f64, seed: u64, mut weight: impl FnMut(&mut SmallRng) -> W) -> Result<CsrGraph<W>> {
    let mut rng = SmallRng::seed_from_u64(seed);
    let m = if n == 0 { 0 } else { (n as f64 * avg_degree.max(0.0)) as usize };
    let mut edges = Vec::with_capacity(m);
    for _ in 0..m {
        let u = rng.gen_range(0..n);
        let v = rng.gen_range(0..n);
        edges.push((u, v, weight(&mut rng)));
    }
    CsrGraph::from_edges(n as usize, &edges)
}

/// [`random`] with `f32` weights uniform in `[lo, hi)`.
pub fn random_uniform(n: u32, avg_degree: f64, seed: u64, lo: f32, hi: f32) -> Result<CsrGraph<f32>> {
    random(n, avg_degree, seed, |rng| rng.gen_range(lo..hi))
}
