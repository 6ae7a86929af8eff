//! Planar and great-circle helpers over lat/lng coordinates.
//!
//! Everything here assumes garden-sized extents: areas and projections are
//! computed in degree space with a latitude-dependent scale, which is accurate
//! to well under a percent for polygons a few hundred metres across.

use crate::models::Coordinate;

pub const EARTH_RADIUS_M: f64 = 6_371_000.0;

/// Flat scale used by the shoelace area approximation.
pub const METERS_PER_DEGREE: f64 = 111_000.0;

const METERS_PER_DEGREE_LNG_AT_EQUATOR: f64 = 111_320.0;

/// Haversine great-circle distance in metres.
pub fn distance(a: Coordinate, b: Coordinate) -> f64 {
    let phi1 = a.lat.to_radians();
    let phi2 = b.lat.to_radians();
    let d_phi = (b.lat - a.lat).to_radians();
    let d_lambda = (b.lng - a.lng).to_radians();

    let h = (d_phi / 2.0).sin().powi(2)
        + phi1.cos() * phi2.cos() * (d_lambda / 2.0).sin().powi(2);
    2.0 * EARTH_RADIUS_M * h.sqrt().min(1.0).asin()
}

/// Sum of segment lengths along an open polyline.
pub fn polyline_length(points: &[Coordinate]) -> f64 {
    points.windows(2).map(|w| distance(w[0], w[1])).sum()
}

/// Area in m² via the shoelace formula, scaled by `111000² · cos(lat₀)`
/// where `lat₀` is the first vertex's latitude.
pub fn polygon_area(points: &[Coordinate]) -> f64 {
    if points.len() < 3 {
        return 0.0;
    }
    let degrees_sq = signed_area_deg(points).abs();
    degrees_sq * METERS_PER_DEGREE * METERS_PER_DEGREE * points[0].lat.to_radians().cos()
}

/// Signed shoelace area in degree² with `lng` as x and `lat` as y.
/// Positive for counter-clockwise rings.
pub fn signed_area_deg(points: &[Coordinate]) -> f64 {
    let n = points.len();
    if n < 3 {
        return 0.0;
    }
    let mut area = 0.0;
    for i in 0..n {
        let j = (i + 1) % n;
        area += points[i].lng * points[j].lat;
        area -= points[j].lng * points[i].lat;
    }
    area / 2.0
}

/// Even-odd ray casting; the ring is implicitly closed.
#[inline]
pub fn point_in_polygon(point: Coordinate, polygon: &[Coordinate]) -> bool {
    let n = polygon.len();
    if n < 3 {
        return false;
    }

    let (px, py) = (point.lng, point.lat);
    let mut inside = false;
    let mut j = n - 1;
    for i in 0..n {
        let (xi, yi) = (polygon[i].lng, polygon[i].lat);
        let (xj, yj) = (polygon[j].lng, polygon[j].lat);
        if ((yi > py) != (yj > py)) && (px < (xj - xi) * (py - yi) / (yj - yi) + xi) {
            inside = !inside;
        }
        j = i;
    }
    inside
}

/// Metres per degree of latitude (WGS84 ellipsoid series).
pub fn meters_per_degree_lat(lat: f64) -> f64 {
    let phi = lat.to_radians();
    111_132.92 - 559.82 * (2.0 * phi).cos() + 1.175 * (4.0 * phi).cos()
        - 0.0023 * (6.0 * phi).cos()
}

/// Metres per degree of longitude at the given latitude.
pub fn meters_per_degree_lng(lat: f64) -> f64 {
    METERS_PER_DEGREE_LNG_AT_EQUATOR * lat.to_radians().cos()
}

/// Moves `origin` by metre offsets, using the scale at `origin`'s latitude.
pub fn offset(origin: Coordinate, east_m: f64, north_m: f64) -> Coordinate {
    Coordinate::new(
        origin.lat + north_m / meters_per_degree_lat(origin.lat),
        origin.lng + east_m / meters_per_degree_lng(origin.lat),
    )
}

/// Inverse of [`offset`]: `(east_m, north_m)` of `point` relative to `origin`.
pub fn to_local_meters(origin: Coordinate, point: Coordinate) -> (f64, f64) {
    (
        (point.lng - origin.lng) * meters_per_degree_lng(origin.lat),
        (point.lat - origin.lat) * meters_per_degree_lat(origin.lat),
    )
}

/// Direction of `a → b` in degrees, counter-clockwise from east.
pub fn edge_angle(a: Coordinate, b: Coordinate) -> f64 {
    let mid_lat = (a.lat + b.lat) / 2.0;
    let east = (b.lng - a.lng) * meters_per_degree_lng(mid_lat);
    let north = (b.lat - a.lat) * meters_per_degree_lat(mid_lat);
    north.atan2(east).to_degrees()
}

/// Vertex average.
pub fn centroid(points: &[Coordinate]) -> Option<Coordinate> {
    if points.is_empty() {
        return None;
    }
    let n = points.len() as f64;
    let (lat, lng) = points
        .iter()
        .fold((0.0, 0.0), |(lat, lng), p| (lat + p.lat, lng + p.lng));
    Some(Coordinate::new(lat / n, lng / n))
}

/// Projection of `point` onto the segment, clamped to its endpoints.
pub fn closest_point_on_segment(
    point: Coordinate,
    seg_start: Coordinate,
    seg_end: Coordinate,
) -> Coordinate {
    let dx = seg_end.lng - seg_start.lng;
    let dy = seg_end.lat - seg_start.lat;
    let len_sq = dx * dx + dy * dy;
    if len_sq == 0.0 {
        return seg_start;
    }
    let t = (((point.lng - seg_start.lng) * dx + (point.lat - seg_start.lat) * dy) / len_sq)
        .clamp(0.0, 1.0);
    Coordinate::new(seg_start.lat + t * dy, seg_start.lng + t * dx)
}

/// Nearest point on a polyline: every vertex, then every segment projection.
/// The first strictly-closer candidate wins. An empty polyline yields `point`.
pub fn closest_point_on_polyline(point: Coordinate, polyline: &[Coordinate]) -> Coordinate {
    let Some(&first) = polyline.first() else {
        return point;
    };

    let mut best = first;
    let mut best_distance = distance(point, first);

    let vertices = polyline.iter().skip(1).copied();
    let projections = polyline
        .windows(2)
        .map(|w| closest_point_on_segment(point, w[0], w[1]));

    for candidate in vertices.chain(projections) {
        let d = distance(point, candidate);
        if d < best_distance {
            best = candidate;
            best_distance = d;
        }
    }
    best
}
