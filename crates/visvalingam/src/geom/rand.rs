//! Deterministic random polylines (random walk + replay tokens).
//!
//! Purpose
//! - Small reproducible sampler for benches and property tests. Same token,
//!   same polyline, across runs and platforms.
//!
//! Model
//! - Start at the origin and take `len - 1` steps, each with uniform per-axis
//!   jitter plus a constant drift along +x so the walk does not fold back on
//!   itself too aggressively.
//! - Determinism uses a replay token `(seed, index)` mixed into a single RNG.

use nalgebra::Vector3;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use super::{Linestring, Point};

/// Random-walk sampler configuration.
#[derive(Clone, Copy, Debug)]
pub struct WalkCfg {
    /// Number of vertices (clamped to >= 2).
    pub len: usize,
    /// Maximum per-axis jitter per step.
    pub step: f64,
    /// Constant drift along +x per step.
    pub drift: f64,
    /// Sample z as well? When false all points stay in the XY plane.
    pub spatial: bool,
}

impl Default for WalkCfg {
    fn default() -> Self {
        Self {
            len: 64,
            step: 1.0,
            drift: 0.5,
            spatial: false,
        }
    }
}

/// Replay token to make draws reproducible and indexable.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ReplayToken {
    pub seed: u64,
    pub index: u64,
}

impl ReplayToken {
    #[inline]
    fn to_std_rng(self) -> StdRng {
        // SplitMix64-style mixing, cheap and stable.
        fn mix(mut x: u64) -> u64 {
            x ^= x >> 30;
            x = x.wrapping_mul(0xbf58476d1ce4e5b9);
            x ^= x >> 27;
            x = x.wrapping_mul(0x94d049bb133111eb);
            x ^ (x >> 31)
        }
        let k = mix(self.seed ^ mix(self.index.wrapping_add(0x9e3779b97f4a7c15)));
        StdRng::seed_from_u64(k)
    }
}

/// Draw a random-walk polyline. Vertex ids are the running index.
pub fn draw_polyline_walk(cfg: WalkCfg, tok: ReplayToken) -> Linestring {
    let mut rng = tok.to_std_rng();
    let n = cfg.len.max(2);
    let mut points = Vec::with_capacity(n);
    let mut cur = Vector3::zeros();
    points.push(Point { id: 0, coord: cur });
    for k in 1..n {
        cur.x += cfg.drift + (rng.gen::<f64>() * 2.0 - 1.0) * cfg.step;
        cur.y += (rng.gen::<f64>() * 2.0 - 1.0) * cfg.step;
        if cfg.spatial {
            cur.z += (rng.gen::<f64>() * 2.0 - 1.0) * cfg.step;
        }
        points.push(Point {
            id: k as i64,
            coord: cur,
        });
    }
    Linestring { points }
}
