//! Sprinkler coverage clipping.
//!
//! A coverage circle is discretised into a ring of points and clipped against
//! the zone outline with Sutherland–Hodgman. Results are exact for convex
//! zones; for concave zones the output is the usual Sutherland–Hodgman
//! approximation, which is good enough for display and avoidance checks.

use std::f64::consts::PI;

use serde::Serialize;

use crate::logic::geo::{
    meters_per_degree_lat, meters_per_degree_lng, point_in_polygon, polygon_area, signed_area_deg,
};
use crate::models::Coordinate;

pub const DEFAULT_CIRCLE_SAMPLES: usize = 72;

/// Largest ring discretisation accepted; anything above clips to nothing.
pub const MAX_CIRCLE_SAMPLES: usize = 4096;

/// Share of ring samples that must be inside before the circle counts as whole.
pub const FULL_CIRCLE_RATIO: f64 = 0.95;

/// Points closer than this (in degrees, per axis) are merged after clipping.
pub const DEDUP_EPSILON_DEG: f64 = 1e-8;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", content = "points", rename_all = "camelCase")]
pub enum ClipResult {
    /// Draw the entire circle.
    FullCircle,
    /// The clipped ring, counter-clockwise in lng/lat space.
    Polygon(Vec<Coordinate>),
    Empty,
}

impl ClipResult {
    pub fn is_empty(&self) -> bool {
        matches!(self, ClipResult::Empty)
    }
}

/// Discretises a circle of `radius_m` metres into `samples` counter-clockwise points.
///
/// `samples` is capped at [`MAX_CIRCLE_SAMPLES`].
pub fn circle_points(center: Coordinate, radius_m: f64, samples: usize) -> Vec<Coordinate> {
    let samples = samples.min(MAX_CIRCLE_SAMPLES);
    let lat_scale = meters_per_degree_lat(center.lat);
    let lng_scale = meters_per_degree_lng(center.lat);
    (0..samples)
        .map(|i| {
            let theta = 2.0 * PI * i as f64 / samples as f64;
            Coordinate::new(
                center.lat + radius_m * theta.sin() / lat_scale,
                center.lng + radius_m * theta.cos() / lng_scale,
            )
        })
        .collect()
}

/// Portion of the circle at `center`/`radius_m` lying inside `polygon`.
///
/// Never fails: a non-positive radius, a polygon with fewer than three
/// vertices, or a sample count outside `3..=MAX_CIRCLE_SAMPLES` yields
/// [`ClipResult::Empty`].
pub fn clip_circle_to_polygon(
    center: Coordinate,
    radius_m: f64,
    polygon: &[Coordinate],
    samples: usize,
) -> ClipResult {
    if polygon.len() < 3 || !(3..=MAX_CIRCLE_SAMPLES).contains(&samples) {
        return ClipResult::Empty;
    }
    if !radius_m.is_finite() || radius_m <= 0.0 {
        return ClipResult::Empty;
    }
    if !center.is_finite() || polygon.iter().any(|p| !p.is_finite()) {
        return ClipResult::Empty;
    }

    let circle = circle_points(center, radius_m, samples);
    let inside = circle
        .iter()
        .filter(|p| point_in_polygon(**p, polygon))
        .count();

    if inside == 0 {
        return ClipResult::Empty;
    }
    if inside as f64 >= FULL_CIRCLE_RATIO * samples as f64 {
        return ClipResult::FullCircle;
    }

    let clipped = dedup_points(sutherland_hodgman(circle, polygon));
    if clipped.len() < 3 {
        ClipResult::Empty
    } else {
        ClipResult::Polygon(clipped)
    }
}

/// Fraction of the nominal circle area kept by a clip result, in `[0, 1]`.
pub fn coverage_fraction(result: &ClipResult, radius_m: f64) -> f64 {
    match result {
        ClipResult::FullCircle => 1.0,
        ClipResult::Empty => 0.0,
        ClipResult::Polygon(points) => {
            let circle_area = PI * radius_m * radius_m;
            if circle_area <= 0.0 {
                return 0.0;
            }
            (polygon_area(points) / circle_area).clamp(0.0, 1.0)
        }
    }
}

fn sutherland_hodgman(subject: Vec<Coordinate>, clip: &[Coordinate]) -> Vec<Coordinate> {
    // Inside is the left side of each edge for counter-clockwise zones.
    let ccw = signed_area_deg(clip) >= 0.0;
    let mut output = subject;

    let clip_n = clip.len();
    for i in 0..clip_n {
        if output.is_empty() {
            break;
        }
        let edge_start = clip[i];
        let edge_end = clip[(i + 1) % clip_n];

        let input = output;
        output = Vec::with_capacity(input.len() + 2);

        let input_n = input.len();
        for j in 0..input_n {
            let current = input[j];
            let next = input[(j + 1) % input_n];

            let current_inside = is_inside(current, edge_start, edge_end, ccw);
            let next_inside = is_inside(next, edge_start, edge_end, ccw);

            if current_inside {
                output.push(current);
                if !next_inside {
                    if let Some(p) = line_intersection(current, next, edge_start, edge_end) {
                        output.push(p);
                    }
                }
            } else if next_inside {
                if let Some(p) = line_intersection(current, next, edge_start, edge_end) {
                    output.push(p);
                }
            }
        }
    }
    output
}

#[inline]
fn is_inside(point: Coordinate, edge_start: Coordinate, edge_end: Coordinate, ccw: bool) -> bool {
    let cross = (edge_end.lng - edge_start.lng) * (point.lat - edge_start.lat)
        - (edge_end.lat - edge_start.lat) * (point.lng - edge_start.lng);
    if ccw {
        cross >= 0.0
    } else {
        cross <= 0.0
    }
}

/// Intersection of segment `p1 → p2` with the infinite line through `p3 → p4`.
fn line_intersection(
    p1: Coordinate,
    p2: Coordinate,
    p3: Coordinate,
    p4: Coordinate,
) -> Option<Coordinate> {
    let d1x = p2.lng - p1.lng;
    let d1y = p2.lat - p1.lat;
    let d2x = p4.lng - p3.lng;
    let d2y = p4.lat - p3.lat;

    let denom = d1x * d2y - d1y * d2x;
    if denom == 0.0 {
        return None;
    }

    let t = ((p3.lng - p1.lng) * d2y - (p3.lat - p1.lat) * d2x) / denom;
    Some(Coordinate::new(p1.lat + t * d1y, p1.lng + t * d1x))
}

#[inline]
fn coincident(a: Coordinate, b: Coordinate) -> bool {
    (a.lat - b.lat).abs() < DEDUP_EPSILON_DEG && (a.lng - b.lng).abs() < DEDUP_EPSILON_DEG
}

/// Collapses consecutive near-duplicates, including across the closing edge.
fn dedup_points(points: Vec<Coordinate>) -> Vec<Coordinate> {
    let mut out: Vec<Coordinate> = Vec::with_capacity(points.len());
    for p in points {
        if out.last().map_or(true, |q| !coincident(*q, p)) {
            out.push(p);
        }
    }
    while out.len() > 1 && coincident(out[0], out[out.len() - 1]) {
        out.pop();
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::logic::geo::{closest_point_on_polyline, distance, offset};

    const ORIGIN: Coordinate = Coordinate::new(48.85, 2.35);

    /// 20 m × 20 m square, counter-clockwise.
    fn square() -> Vec<Coordinate> {
        vec![
            ORIGIN,
            offset(ORIGIN, 20.0, 0.0),
            offset(ORIGIN, 20.0, 20.0),
            offset(ORIGIN, 0.0, 20.0),
        ]
    }

    fn on_boundary(point: Coordinate, polygon: &[Coordinate]) -> bool {
        let mut ring = polygon.to_vec();
        ring.push(polygon[0]);
        distance(point, closest_point_on_polyline(point, &ring)) < 0.01
    }

    #[test]
    fn test_circle_inside_is_full() {
        let result = clip_circle_to_polygon(offset(ORIGIN, 10.0, 10.0), 4.0, &square(), 72);
        assert_eq!(result, ClipResult::FullCircle);
    }

    #[test]
    fn test_circle_outside_is_empty() {
        let result = clip_circle_to_polygon(offset(ORIGIN, 60.0, 10.0), 4.0, &square(), 72);
        assert_eq!(result, ClipResult::Empty);
    }

    #[test]
    fn test_circle_straddling_edge_is_clipped() {
        let poly = square();
        let result = clip_circle_to_polygon(offset(ORIGIN, 20.0, 10.0), 4.0, &poly, 72);
        let ClipResult::Polygon(points) = result else {
            panic!("expected a partial polygon, got {result:?}");
        };
        assert!(points.len() >= 3);
        assert!(points.len() <= 72 + 1, "got {} vertices", points.len());
        for p in &points {
            assert!(
                point_in_polygon(*p, &poly) || on_boundary(*p, &poly),
                "vertex {p:?} is outside the zone"
            );
        }
        let kept = coverage_fraction(&ClipResult::Polygon(points), 4.0);
        assert!((0.4..0.6).contains(&kept), "about half should remain, got {kept}");
    }

    #[test]
    fn test_clockwise_zone_clips_the_same_way() {
        let mut poly = square();
        poly.reverse();
        let result = clip_circle_to_polygon(offset(ORIGIN, 20.0, 10.0), 4.0, &poly, 72);
        let ClipResult::Polygon(points) = result else {
            panic!("expected a partial polygon, got {result:?}");
        };
        for p in &points {
            assert!(point_in_polygon(*p, &poly) || on_boundary(*p, &poly));
        }
    }

    #[test]
    fn test_corner_circle_keeps_a_quarter() {
        let result = clip_circle_to_polygon(ORIGIN, 4.0, &square(), 72);
        let kept = coverage_fraction(&result, 4.0);
        assert!((0.2..0.3).contains(&kept), "expected about a quarter, got {kept}");
    }

    #[test]
    fn test_degenerate_inputs_are_empty() {
        let poly = square();
        let center = offset(ORIGIN, 10.0, 10.0);
        assert!(clip_circle_to_polygon(center, 0.0, &poly, 72).is_empty());
        assert!(clip_circle_to_polygon(center, -1.0, &poly, 72).is_empty());
        assert!(clip_circle_to_polygon(center, f64::NAN, &poly, 72).is_empty());
        assert!(clip_circle_to_polygon(center, 4.0, &poly[..2], 72).is_empty());
        assert!(clip_circle_to_polygon(center, 4.0, &poly, 2).is_empty());
    }

    #[test]
    fn test_oversized_sample_counts_are_empty() {
        let poly = square();
        let center = offset(ORIGIN, 10.0, 10.0);
        assert!(clip_circle_to_polygon(center, 4.0, &poly, MAX_CIRCLE_SAMPLES + 1).is_empty());
        assert!(clip_circle_to_polygon(center, 4.0, &poly, 1usize << 40).is_empty());
        assert!(clip_circle_to_polygon(center, 4.0, &poly, usize::MAX).is_empty());
        assert_eq!(
            clip_circle_to_polygon(center, 4.0, &poly, MAX_CIRCLE_SAMPLES),
            ClipResult::FullCircle
        );
    }

    #[test]
    fn test_circle_points_are_capped() {
        let points = circle_points(offset(ORIGIN, 10.0, 10.0), 4.0, usize::MAX);
        assert_eq!(points.len(), MAX_CIRCLE_SAMPLES);
    }

    #[test]
    fn test_circle_points_are_at_radius() {
        let center = offset(ORIGIN, 10.0, 10.0);
        let ring = circle_points(center, 5.0, 36);
        assert_eq!(ring.len(), 36);
        for p in ring {
            assert!((distance(center, p) - 5.0).abs() < 0.05);
        }
    }

    #[test]
    fn test_dedup_collapses_near_duplicates() {
        let a = Coordinate::new(1.0, 1.0);
        let b = Coordinate::new(1.0 + 1e-10, 1.0);
        let c = Coordinate::new(2.0, 2.0);
        let d = Coordinate::new(3.0, 1.0);
        assert_eq!(dedup_points(vec![a, b, c, d, a]), vec![a, c, d]);
    }
}
