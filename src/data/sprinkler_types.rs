use crate::models::{sprinkler::SprinklerType, zone::ZoneType};

/// (id, name, description, default radius in metres, compatible zones, colour)
type CatalogEntry = (&'static str, &'static str, &'static str, f64, &'static [ZoneType], &'static str);

const CATALOG: &[CatalogEntry] = &[
    (
        "rotor",
        "Rotor",
        "Gear-driven rotating stream for large lawns.",
        8.0,
        &[ZoneType::Grass],
        "#2e7d32",
    ),
    (
        "spray",
        "Pop-up spray",
        "Fixed-pattern spray nozzle for small and medium lawns and beds.",
        4.0,
        &[ZoneType::Grass, ZoneType::Flowers],
        "#1976d2",
    ),
    (
        "micro-spray",
        "Micro-spray",
        "Low-flow stake-mounted spray for flower beds and shrubs.",
        2.0,
        &[ZoneType::Flowers, ZoneType::Trees],
        "#8e24aa",
    ),
    (
        "bubbler",
        "Bubbler",
        "Flood-pattern emitter for tree wells.",
        1.0,
        &[ZoneType::Trees],
        "#6d4c41",
    ),
    (
        "drip",
        "Drip emitter",
        "Point-source emitter for dense planting.",
        0.5,
        &[ZoneType::Flowers, ZoneType::Trees],
        "#00897b",
    ),
];

fn to_sprinkler_type(entry: &CatalogEntry) -> SprinklerType {
    let (id, name, description, radius, zones, color) = *entry;
    SprinklerType {
        id: id.into(),
        name: name.into(),
        description: description.into(),
        default_radius_meters: radius,
        compatible_zone_types: zones.to_vec(),
        color: color.into(),
    }
}

/// The full static catalog, in display order.
pub fn get_all_sprinkler_types() -> Vec<SprinklerType> {
    CATALOG.iter().map(to_sprinkler_type).collect()
}

pub fn get_sprinkler_type_by_id(id: &str) -> Option<SprinklerType> {
    CATALOG
        .iter()
        .find(|entry| entry.0 == id)
        .map(to_sprinkler_type)
}

/// Catalog entries suited to a zone type; empty for forbidden zones.
pub fn compatible_types(zone_type: ZoneType) -> Vec<SprinklerType> {
    CATALOG
        .iter()
        .filter(|entry| entry.4.contains(&zone_type))
        .map(to_sprinkler_type)
        .collect()
}

/// First compatible catalog entry, used when a zone is drawn without a choice.
pub fn default_type_for(zone_type: ZoneType) -> Option<SprinklerType> {
    compatible_types(zone_type).into_iter().next()
}
