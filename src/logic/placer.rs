use std::collections::BTreeMap;

use log::{debug, info, warn};

use crate::data::sprinkler_types::get_sprinkler_type_by_id;
use crate::error::{PlannerError, Result};
use crate::logic::geo::{
    centroid, distance, edge_angle, offset, point_in_polygon, to_local_meters,
};
use crate::models::{
    sprinkler::{Sprinkler, SprinklerType, UNASSIGNED_ZONE_ID},
    zone::{Zone, ZoneType},
    Coordinate,
};

/// Grid points closer than this fraction of the spacing to a corner sprinkler are dropped.
pub const CORNER_CLEARANCE_RATIO: f64 = 0.9;

/// Upper bound on lattice samples per zone, so a tiny radius cannot stall a request.
pub const MAX_GRID_SAMPLES: usize = 250_000;

/// Direction of the zone's longest edge, in degrees counter-clockwise from east.
///
/// Edges are visited in order, closing edge last; only a strictly longer edge
/// replaces the current best.
pub fn dominant_edge_angle(polygon: &[Coordinate]) -> f64 {
    let n = polygon.len();
    if n < 2 {
        return 0.0;
    }

    let mut best_length = f64::NEG_INFINITY;
    let mut best_angle = 0.0;
    for i in 0..n {
        let start = polygon[i];
        let end = polygon[(i + 1) % n];
        let length = distance(start, end);
        if length > best_length {
            best_length = length;
            best_angle = edge_angle(start, end);
        }
    }
    best_angle
}

/// Regions a zone's sprinklers must stay out of.
///
/// Grass zones avoid their own nested sub-zones; every other zone avoids the
/// top-level forbidden zones.
pub fn avoidance_zones<'a>(zone: &Zone, all_zones: &'a [Zone]) -> Vec<&'a Zone> {
    all_zones
        .iter()
        .filter(|other| other.id != zone.id)
        .filter(|other| match zone.zone_type {
            ZoneType::Grass => other.parent_zone_id.as_deref() == Some(zone.id.as_str()),
            _ => other.is_top_level() && other.is_forbidden(),
        })
        .collect()
}

fn in_any_zone(point: Coordinate, zones: &[&Zone]) -> bool {
    zones.iter().any(|z| point_in_polygon(point, &z.coordinates))
}

/// One sprinkler on every vertex that is not inside an avoidance region.
pub fn place_corners(
    zone: &Zone,
    sprinkler_type: &SprinklerType,
    radius_m: f64,
    avoidance: &[&Zone],
) -> Vec<Sprinkler> {
    let orientation = dominant_edge_angle(&zone.coordinates);
    zone.coordinates
        .iter()
        .enumerate()
        .filter(|(_, vertex)| !in_any_zone(**vertex, avoidance))
        .map(|(i, vertex)| Sprinkler {
            id: format!("{}-corner-{i}", zone.id),
            position: *vertex,
            sprinkler_type_id: sprinkler_type.id.clone(),
            radius_meters: radius_m,
            zone_id: zone.id.clone(),
            orientation: Some(orientation),
        })
        .collect()
}

/// Lattice sprinklers aligned with the zone's longest edge.
///
/// The outline is projected to local metres around its centroid and rotated
/// so the dominant edge lies along the first axis. Rows and columns are
/// `radius_m` apart, starting half a spacing in from the rotated bounding
/// box's minimum corner. A lattice point is kept when it lies inside the zone,
/// outside every avoidance region, and at least
/// `CORNER_CLEARANCE_RATIO · radius_m` from every corner sprinkler.
pub fn place_grid(
    zone: &Zone,
    sprinkler_type: &SprinklerType,
    radius_m: f64,
    avoidance: &[&Zone],
    corners: &[Sprinkler],
) -> Vec<Sprinkler> {
    if zone.coordinates.len() < 3 || !(radius_m.is_finite() && radius_m > 0.0) {
        return Vec::new();
    }
    let Some(origin) = centroid(&zone.coordinates) else {
        return Vec::new();
    };

    let angle_deg = dominant_edge_angle(&zone.coordinates);
    let (sin, cos) = angle_deg.to_radians().sin_cos();

    // Rotated frame: u runs along the dominant edge, v across it.
    let (mut min_u, mut max_u) = (f64::INFINITY, f64::NEG_INFINITY);
    let (mut min_v, mut max_v) = (f64::INFINITY, f64::NEG_INFINITY);
    for vertex in &zone.coordinates {
        let (x, y) = to_local_meters(origin, *vertex);
        let u = x * cos + y * sin;
        let v = -x * sin + y * cos;
        min_u = min_u.min(u);
        max_u = max_u.max(u);
        min_v = min_v.min(v);
        max_v = max_v.max(v);
    }

    let spacing = radius_m;
    let (cols, start_u) = lattice_axis(min_u, max_u, spacing);
    let (rows, start_v) = lattice_axis(min_v, max_v, spacing);
    if rows.saturating_mul(cols) > MAX_GRID_SAMPLES {
        warn!(
            "Zone '{}': {rows}×{cols} lattice exceeds {MAX_GRID_SAMPLES} samples, skipping grid",
            zone.id
        );
        return Vec::new();
    }

    let clearance = CORNER_CLEARANCE_RATIO * spacing;
    let mut placed = Vec::new();
    for row in 0..rows {
        let v = start_v + row as f64 * spacing;
        for col in 0..cols {
            let u = start_u + col as f64 * spacing;
            let x = u * cos - v * sin;
            let y = u * sin + v * cos;
            let position = offset(origin, x, y);

            if !point_in_polygon(position, &zone.coordinates) {
                continue;
            }
            if corners
                .iter()
                .any(|c| distance(c.position, position) < clearance)
            {
                continue;
            }
            if in_any_zone(position, avoidance) {
                continue;
            }

            placed.push(Sprinkler {
                id: format!("{}-grid-{row}-{col}", zone.id),
                position,
                sprinkler_type_id: sprinkler_type.id.clone(),
                radius_meters: radius_m,
                zone_id: zone.id.clone(),
                orientation: Some(angle_deg),
            });
        }
    }
    placed
}

/// Tolerance on the last lattice line, so one landing exactly on `max` survives rounding.
const LATTICE_EPSILON: f64 = 1e-9;

/// Number of lattice lines across `[min, max]` and the first one's offset.
///
/// Lines start half a spacing in from `min` and repeat every `spacing` up to
/// and including `max`.
fn lattice_axis(min: f64, max: f64, spacing: f64) -> (usize, f64) {
    let start = min + spacing / 2.0;
    let reach = max - start;
    if !(reach.is_finite() && reach >= -LATTICE_EPSILON) {
        return (0, start);
    }
    let count = (reach / spacing + LATTICE_EPSILON).floor() as usize + 1;
    (count, start)
}

/// Sprinkler type and effective radius for a configured zone.
fn resolve_sprinkler(zone: &Zone) -> Option<(SprinklerType, f64)> {
    let config = zone.sprinkler_config.as_ref()?;
    let Some(sprinkler_type) = get_sprinkler_type_by_id(&config.sprinkler_type_id) else {
        warn!(
            "Zone '{}' references unknown sprinkler type '{}'",
            zone.id, config.sprinkler_type_id
        );
        return None;
    };
    if !sprinkler_type.is_compatible_with(zone.zone_type) {
        warn!(
            "Zone '{}' uses '{}', which is not meant for {:?} zones",
            zone.id, sprinkler_type.id, zone.zone_type
        );
    }
    let radius = if config.radius_meters.is_finite() && config.radius_meters > 0.0 {
        config.radius_meters
    } else {
        sprinkler_type.default_radius_meters
    };
    Some((sprinkler_type, radius))
}

/// Corner sprinklers followed by grid sprinklers for one zone.
///
/// Deterministic: ids derive from the zone id and lattice indices, so calling
/// this twice on the same inputs yields identical sets.
pub fn auto_place_zone(zone: &Zone, avoidance: &[&Zone]) -> Vec<Sprinkler> {
    let Some((sprinkler_type, radius)) = resolve_sprinkler(zone) else {
        return Vec::new();
    };

    let mut sprinklers = place_corners(zone, &sprinkler_type, radius, avoidance);
    let grid = place_grid(zone, &sprinkler_type, radius, avoidance, &sprinklers);
    debug!(
        "Zone '{}': {} corner + {} grid sprinklers (radius {radius} m)",
        zone.id,
        sprinklers.len(),
        grid.len()
    );
    sprinklers.extend(grid);
    sprinklers
}

/// Places every top-level, non-forbidden, configured zone in creation order.
pub fn auto_place_all(zones: &[Zone]) -> BTreeMap<String, Vec<Sprinkler>> {
    let placements: BTreeMap<String, Vec<Sprinkler>> = zones
        .iter()
        .filter(|zone| zone.is_placement_target())
        .map(|zone| {
            let avoidance = avoidance_zones(zone, zones);
            (zone.id.clone(), auto_place_zone(zone, &avoidance))
        })
        .collect();
    info!(
        "Auto-placed {} sprinklers across {} zones",
        placements.values().map(Vec::len).sum::<usize>(),
        placements.len()
    );
    placements
}

/// Manual single placement, bypassing the grid.
///
/// Rejected inside nested sub-zones and top-level forbidden zones. Otherwise
/// owned by the first top-level zone containing it, or by the unassigned
/// bucket when no zone does.
pub fn place_manual(
    id: impl Into<String>,
    position: Coordinate,
    sprinkler_type: &SprinklerType,
    radius_m: f64,
    zones: &[Zone],
) -> Result<Sprinkler> {
    if !position.is_finite() {
        return Err(PlannerError::NonFiniteCoordinate(position));
    }
    if let Some(blocking) = zones
        .iter()
        .filter(|z| !z.is_top_level() || z.is_forbidden())
        .find(|z| point_in_polygon(position, &z.coordinates))
    {
        return Err(PlannerError::InsideAvoidanceZone(blocking.id.clone()));
    }

    let owner = zones
        .iter()
        .filter(|z| z.is_top_level())
        .find(|z| point_in_polygon(position, &z.coordinates));
    let (zone_id, orientation) = match owner {
        Some(zone) => (zone.id.clone(), Some(dominant_edge_angle(&zone.coordinates))),
        None => (UNASSIGNED_ZONE_ID.to_string(), None),
    };

    let radius_meters = if radius_m.is_finite() && radius_m > 0.0 {
        radius_m
    } else {
        sprinkler_type.default_radius_meters
    };

    Ok(Sprinkler {
        id: id.into(),
        position,
        sprinkler_type_id: sprinkler_type.id.clone(),
        radius_meters,
        zone_id,
        orientation,
    })
}
