//! Visvalingam-Whyatt elimination engine.
//!
//! Purpose
//! - Compute, once and eagerly, every vertex's *effective area*: the running
//!   maximum of triangle areas at the moment each vertex is eliminated.
//!   Simplification queries are then plain filters over that table.
//!
//! Model
//! - Interior vertices whose initial triangle area exceeds `NEARLY_ZERO` get
//!   a live chain node and a heap entry; the rest keep effective area 0 and
//!   act as fixed anchors. Popping the minimum-area vertex relinks its two
//!   chain neighbors, recomputes their areas against the shortened chain,
//!   and reheaps them in place.
//! - Recording the running maximum (not the raw popped area) keeps the
//!   elimination order monotonic: a vertex eliminated later never carries a
//!   smaller area than one eliminated before it.

use std::io;
use std::io::Write;

use crate::geom::{
    cross_product_norm, vector_sub, Linestring, MultiPolygon, Point, Polygon, VertexIndex,
};
use crate::heap::{HeapKey, IndexedHeap};

/// Initial triangle areas at or below this are treated as exactly zero.
const NEARLY_ZERO: f64 = 1e-7;

/// Area of the triangle spanned by a vertex `c` and its neighbors `p`, `n`.
#[inline]
pub fn triangle_area(c: &Point, p: &Point, n: &Point) -> f64 {
    0.5 * cross_product_norm(vector_sub(n, c), vector_sub(p, c))
}

/// One live interior vertex and its current triangle area, as stored in the
/// heap. The vertex index is the lookup handle for `reheap`.
#[derive(Clone, Copy, Debug)]
struct AreaEntry {
    vertex: VertexIndex,
    area: f64,
}

impl HeapKey for AreaEntry {
    type Key = VertexIndex;
    fn heap_key(&self) -> VertexIndex {
        self.vertex
    }
}

/// Chain neighbors of a vertex not yet eliminated. Slots in the arena are
/// `Some` exactly while the vertex is heap-resident.
#[derive(Clone, Copy, Debug)]
struct ChainNode {
    prev: VertexIndex,
    next: VertexIndex,
}

/// Precomputed elimination over one borrowed `Linestring`.
///
/// Construction runs the full elimination loop; queries afterwards are
/// read-only. The input must outlive the engine and stay unmodified.
pub struct Visvalingam<'a> {
    input: &'a Linestring,
    effective_areas: Vec<f64>,
    forced_keep: Vec<bool>,
}

impl<'a> Visvalingam<'a> {
    pub fn new(input: &'a Linestring) -> Self {
        Self::build(input, vec![false; input.len()])
    }

    /// Like `new`, but vertices flagged by `keep` are never enqueued: they
    /// stay chain anchors for the whole run, so their neighbors' areas are
    /// always computed against them, and every query retains them no matter
    /// their effective area.
    pub fn with_keep<F>(input: &'a Linestring, keep: F) -> Self
    where
        F: Fn(VertexIndex) -> bool,
    {
        let forced_keep = (0..input.len()).map(keep).collect();
        Self::build(input, forced_keep)
    }

    fn build(input: &'a Linestring, forced_keep: Vec<bool>) -> Self {
        let n = input.len();
        let mut effective_areas = vec![0.0; n];
        let mut chain: Vec<Option<ChainNode>> = vec![None; n];
        let mut heap =
            IndexedHeap::with_comparator(n, |a: &AreaEntry, b: &AreaEntry| a.area < b.area);

        if n >= 3 {
            for i in 1..n - 1 {
                if forced_keep[i] {
                    continue;
                }
                let area = triangle_area(&input[i], &input[i - 1], &input[i + 1]);
                if area > NEARLY_ZERO {
                    chain[i] = Some(ChainNode {
                        prev: i - 1,
                        next: i + 1,
                    });
                    heap.insert(AreaEntry { vertex: i, area });
                }
            }
        }

        let mut min_area = f64::NEG_INFINITY;
        while let Some(curr) = heap.pop() {
            let node = chain[curr.vertex]
                .take()
                .expect("heap-resident vertex lost its chain node");

            // A vertex cannot be eliminated more cheaply than any vertex
            // eliminated before it.
            min_area = min_area.max(curr.area);

            if let Some(prev) = chain[node.prev].as_mut() {
                prev.next = node.next;
                let area = triangle_area(&input[node.prev], &input[prev.prev], &input[prev.next]);
                heap.reheap(AreaEntry {
                    vertex: node.prev,
                    area,
                });
            }
            if let Some(next) = chain[node.next].as_mut() {
                next.prev = node.prev;
                let area = triangle_area(&input[node.next], &input[next.prev], &input[next.next]);
                heap.reheap(AreaEntry {
                    vertex: node.next,
                    area,
                });
            }

            effective_areas[curr.vertex] = min_area;
        }

        Self {
            input,
            effective_areas,
            forced_keep,
        }
    }

    #[inline]
    fn contains_vertex(&self, i: VertexIndex, area_threshold: f64) -> bool {
        assert!(i < self.effective_areas.len());
        if i == 0 || i == self.effective_areas.len() - 1 {
            // endpoints always survive; their areas are never evaluated
            return true;
        }
        self.forced_keep[i] || self.effective_areas[i] > area_threshold
    }

    /// Keep endpoints and vertices with effective area strictly above the
    /// threshold. A result with fewer than 4 points collapses to empty.
    pub fn simplify(&self, area_threshold: f64) -> Linestring {
        self.simplify_indexed(area_threshold).0
    }

    /// `simplify` plus the kept original indices, ascending, matching the
    /// output line position for position.
    pub fn simplify_indexed(&self, area_threshold: f64) -> (Linestring, Vec<VertexIndex>) {
        let mut line = Linestring::new();
        let mut kept = Vec::new();
        for i in 0..self.input.len() {
            if self.contains_vertex(i, area_threshold) {
                line.push(self.input[i]);
                kept.push(i);
            }
        }
        if line.len() < 4 {
            line.clear();
            kept.clear();
        }
        (line, kept)
    }

    /// Area cutoff that removes roughly `ratio` percent of the vertices:
    /// the `len * ratio / 100`-th smallest effective area. `ratio` must lie
    /// in (0, 100) exclusive.
    pub fn area_threshold_for_ratio(&self, ratio: usize) -> f64 {
        assert!(ratio > 0 && ratio < 100, "ratio must be in (0, 100)");
        let mut ordered = self.effective_areas.clone();
        ordered.sort_by(|a, b| a.total_cmp(b));
        let idx = ordered.len() * ratio / 100;
        assert!(idx < ordered.len());
        ordered[idx]
    }

    /// Derive the threshold for `ratio` and simplify with it.
    pub fn simplify_ratio(&self, ratio: usize) -> Linestring {
        self.simplify(self.area_threshold_for_ratio(ratio))
    }

    /// Effective area of one vertex. Panics when out of range.
    #[inline]
    pub fn effective_area(&self, i: VertexIndex) -> f64 {
        self.effective_areas[i]
    }

    /// The full per-vertex table, indexed by `VertexIndex`.
    #[inline]
    pub fn effective_areas(&self) -> &[f64] {
        &self.effective_areas
    }

    /// Diagnostic dump, one `index: area` line per vertex.
    pub fn print_areas<W: Write>(&self, out: &mut W) -> io::Result<()> {
        for (i, area) in self.effective_areas.iter().enumerate() {
            writeln!(out, "{}: {}", i, area)?;
        }
        Ok(())
    }
}

/// Simplify every ring of a polygon independently. Rings that collapse come
/// back empty; interpreting that is the caller's call.
pub fn simplify_polygon(poly: &Polygon, area_threshold: f64) -> Polygon {
    Polygon {
        exterior_ring: Visvalingam::new(&poly.exterior_ring).simplify(area_threshold),
        interior_rings: poly
            .interior_rings
            .iter()
            .map(|ring| Visvalingam::new(ring).simplify(area_threshold))
            .collect(),
    }
}

/// `simplify_polygon` over each member, preserving order.
pub fn simplify_multi_polygon(shape: &MultiPolygon, area_threshold: f64) -> MultiPolygon {
    shape
        .iter()
        .map(|poly| simplify_polygon(poly, area_threshold))
        .collect()
}
