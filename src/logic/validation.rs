use crate::error::{PlannerError, Result};
use crate::logic::geo::polygon_area;
use crate::models::{
    zone::{Zone, ZoneType},
    Coordinate,
};

/// Checks a drawn outline before it becomes a zone and returns its area in m².
pub fn validate_zone_polygon(points: &[Coordinate], max_area_m2: f64) -> Result<f64> {
    if points.len() < 3 {
        return Err(PlannerError::TooFewVertices(points.len()));
    }
    if let Some(bad) = points.iter().find(|p| !p.is_finite()) {
        return Err(PlannerError::NonFiniteCoordinate(*bad));
    }
    let area_m2 = polygon_area(points);
    if area_m2 > max_area_m2 {
        return Err(PlannerError::ZoneTooLarge {
            area_m2,
            max_m2: max_area_m2,
        });
    }
    Ok(area_m2)
}

/// A nested zone must sit in an existing top-level grass zone and must not be grass itself.
pub fn validate_nesting(zone: &Zone, existing: &[Zone]) -> Result<()> {
    let Some(parent_id) = zone.parent_zone_id.as_deref() else {
        return Ok(());
    };
    if zone.zone_type == ZoneType::Grass {
        return Err(PlannerError::InvalidNestedType(zone.zone_type));
    }
    let parent_ok = parent_id != zone.id
        && existing.iter().any(|p| {
            p.id == parent_id && p.is_top_level() && p.zone_type == ZoneType::Grass
        });
    if !parent_ok {
        return Err(PlannerError::InvalidParent(parent_id.to_string()));
    }
    Ok(())
}
