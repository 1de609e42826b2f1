//! Polyline and polygon simplification (Visvalingam-Whyatt).
//!
//! The engine repeatedly removes the vertex whose elimination changes the
//! shape least, measured by the area of the triangle it forms with its live
//! neighbors, and records for every vertex the area at which it disappears.
//! Simplification queries are then plain filters over that table.
//!
//! Modules
//! - `geom`: points, linestrings, polygons, and the two vector ops.
//! - `heap`: indexed binary min-heap with logarithmic update-in-place.
//! - `simplify`: the elimination engine and per-ring drivers.

pub mod geom;
pub mod heap;
pub mod simplify;

/// Library version string.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Common exports for quick imports in callers.
pub mod prelude {
    pub use crate::geom::rand::{draw_polyline_walk, ReplayToken, WalkCfg};
    pub use crate::geom::{
        cross_product_norm, vector_sub, Linestring, MultiPolygon, Point, Polygon, Vec3,
        VertexIndex,
    };
    pub use crate::heap::{HeapKey, IndexedHeap};
    pub use crate::simplify::{
        simplify_multi_polygon, simplify_polygon, triangle_area, Visvalingam,
    };
}
