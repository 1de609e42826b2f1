//! Geometry primitives shared by the engine and the I/O layer.
//!
//! Purpose
//! - Plain data: `Point`, `Linestring`, `Polygon`, `MultiPolygon`.
//! - Two vector operations (`vector_sub`, `cross_product_norm`) backed by
//!   nalgebra; everything else here is indexing and iteration.
//!
//! Invariants
//! - A `Linestring` is an ordered point sequence; positions `0..n-1` are the
//!   vertex identity (`VertexIndex`) used throughout the engine.
//! - Ring closure for polygons is an I/O-adapter concern, not enforced here.

pub mod rand;

use nalgebra::Vector3;

/// Index of a vertex within one `Linestring`.
pub type VertexIndex = usize;

/// 3-component coordinate vector.
pub type Vec3 = Vector3<f64>;

/// A 3-D point with an optional stable source identifier (0 when absent).
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Point {
    pub id: i64,
    pub coord: Vec3,
}

impl Default for Point {
    fn default() -> Self {
        Self {
            id: 0,
            coord: Vector3::zeros(),
        }
    }
}

impl Point {
    /// Point in the XY plane, id 0.
    #[inline]
    pub fn new(x: f64, y: f64) -> Self {
        Self::with_z(x, y, 0.0)
    }

    #[inline]
    pub fn with_z(x: f64, y: f64, z: f64) -> Self {
        Self {
            id: 0,
            coord: Vector3::new(x, y, z),
        }
    }

    #[inline]
    pub fn with_id(id: i64, x: f64, y: f64, z: f64) -> Self {
        Self {
            id,
            coord: Vector3::new(x, y, z),
        }
    }

    #[inline]
    pub fn x(&self) -> f64 {
        self.coord.x
    }
    #[inline]
    pub fn y(&self) -> f64 {
        self.coord.y
    }
    #[inline]
    pub fn z(&self) -> f64 {
        self.coord.z
    }
}

/// Ordered point sequence. The engine borrows one of these for a whole
/// simplification run and derives all vertex indices from it.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Linestring {
    pub points: Vec<Point>,
}

impl Linestring {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_points(points: Vec<Point>) -> Self {
        Self { points }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.points.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    #[inline]
    pub fn push(&mut self, p: Point) {
        self.points.push(p);
    }

    #[inline]
    pub fn iter(&self) -> std::slice::Iter<'_, Point> {
        self.points.iter()
    }

    #[inline]
    pub fn clear(&mut self) {
        self.points.clear();
    }
}

impl std::ops::Index<VertexIndex> for Linestring {
    type Output = Point;
    #[inline]
    fn index(&self, i: VertexIndex) -> &Point {
        &self.points[i]
    }
}

impl FromIterator<Point> for Linestring {
    fn from_iter<I: IntoIterator<Item = Point>>(iter: I) -> Self {
        Self {
            points: iter.into_iter().collect(),
        }
    }
}

impl<'a> IntoIterator for &'a Linestring {
    type Item = &'a Point;
    type IntoIter = std::slice::Iter<'a, Point>;
    fn into_iter(self) -> Self::IntoIter {
        self.points.iter()
    }
}

/// One exterior ring plus zero or more interior rings (holes).
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Polygon {
    pub exterior_ring: Linestring,
    pub interior_rings: Vec<Linestring>,
}

/// Collection of polygons; order matters for output only.
pub type MultiPolygon = Vec<Polygon>;

/// Component-wise `a - b` on point coordinates.
#[inline]
pub fn vector_sub(a: &Point, b: &Point) -> Vec3 {
    a.coord - b.coord
}

/// Magnitude of the 3-D cross product `v1 x v2`.
///
/// For vectors in the XY plane this is the absolute value of the z
/// component, i.e. twice the area of the triangle they span.
#[inline]
pub fn cross_product_norm(v1: Vec3, v2: Vec3) -> f64 {
    v1.cross(&v2).norm()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn vector_sub_componentwise() {
        let a = Point::new(10.0, 20.0);
        let b = Point::new(5.0, 1.0);
        let d = vector_sub(&a, &b);
        assert!((d.x - 5.0).abs() < 1e-12);
        assert!((d.y - 19.0).abs() < 1e-12);
        assert!(d.z.abs() < 1e-12);
    }

    #[test]
    fn cross_product_norm_planar_pairs() {
        let a = Vec3::new(10.0, 8.0, 0.0);
        let b = Vec3::new(2.0, 5.0, 0.0);
        let c = Vec3::new(-100.0, 8.0, 0.0);
        assert!((cross_product_norm(a, b) - 34.0).abs() < 1e-12);
        // the norm is symmetric, unlike the signed 2-D cross product
        assert!((cross_product_norm(b, a) - 34.0).abs() < 1e-12);
        assert!((cross_product_norm(a, c) - 880.0).abs() < 1e-12);
    }

    #[test]
    fn linestring_indexing_and_collect() {
        let line: Linestring = [(0.0, 0.0), (1.0, 2.0), (3.0, 4.0)]
            .into_iter()
            .map(|(x, y)| Point::new(x, y))
            .collect();
        assert_eq!(line.len(), 3);
        assert!((line[1].y() - 2.0).abs() < 1e-12);
        assert_eq!(line.iter().count(), 3);
    }
}
