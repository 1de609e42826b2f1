//! Well-known-text output for simplified geometry.
//!
//! Rings are closed on output (first coordinate repeated when the input
//! ring is open); empty geometry prints as `EMPTY`. Coordinates carry a z
//! term only when the geometry leaves the XY plane.

use visvalingam::prelude::{Linestring, MultiPolygon, Point, Polygon};

fn coord(out: &mut String, p: &Point, spatial: bool) {
    if spatial {
        out.push_str(&format!("{} {} {}", p.x(), p.y(), p.z()));
    } else {
        out.push_str(&format!("{} {}", p.x(), p.y()));
    }
}

fn coord_seq(line: &Linestring, close: bool) -> String {
    let spatial = line.iter().any(|p| p.z() != 0.0);
    let mut out = String::new();
    for (k, p) in line.iter().enumerate() {
        if k > 0 {
            out.push_str(", ");
        }
        coord(&mut out, p, spatial);
    }
    if close && line.len() > 1 && line[0].coord != line[line.len() - 1].coord {
        out.push_str(", ");
        coord(&mut out, &line[0], spatial);
    }
    out
}

pub fn linestring_wkt(line: &Linestring) -> String {
    if line.is_empty() {
        return "LINESTRING EMPTY".to_string();
    }
    format!("LINESTRING ({})", coord_seq(line, false))
}

fn rings_text(poly: &Polygon) -> String {
    let mut rings = vec![format!("({})", coord_seq(&poly.exterior_ring, true))];
    for ring in &poly.interior_rings {
        if !ring.is_empty() {
            rings.push(format!("({})", coord_seq(ring, true)));
        }
    }
    rings.join(", ")
}

pub fn polygon_wkt(poly: &Polygon) -> String {
    if poly.exterior_ring.is_empty() {
        return "POLYGON EMPTY".to_string();
    }
    format!("POLYGON ({})", rings_text(poly))
}

pub fn multi_polygon_wkt(shape: &MultiPolygon) -> String {
    let parts: Vec<String> = shape
        .iter()
        .filter(|poly| !poly.exterior_ring.is_empty())
        .map(|poly| format!("({})", rings_text(poly)))
        .collect();
    if parts.is_empty() {
        return "MULTIPOLYGON EMPTY".to_string();
    }
    format!("MULTIPOLYGON ({})", parts.join(", "))
}
