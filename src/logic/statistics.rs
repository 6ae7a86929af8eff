use std::collections::HashSet;

use crate::logic::geo::polygon_area;
use crate::models::{
    pipe::{MainPipe, Pipe, PipeKind},
    sprinkler::Sprinkler,
    statistics::{LongestPipe, PipeLengths, Summary, ZoneStatistics},
    zone::Zone,
};

/// Read-only reduction over the current project collections.
///
/// Recomputed from scratch on every call. Coverage is `Σ π·r²` over
/// zone-assigned sprinklers divided by the usable area, clamped to
/// `[0, 100]`: an upper-bound estimate that ignores overlap and clipping.
pub fn compute_statistics(
    zones: &[Zone],
    sprinklers: &[Sprinkler],
    pipes: &[Pipe],
    main_pipe: Option<&MainPipe>,
) -> Summary {
    let zone_stats: Vec<ZoneStatistics> = zones
        .iter()
        .map(|zone| ZoneStatistics {
            zone_id: zone.id.clone(),
            zone_type: zone.zone_type,
            area_m2: polygon_area(&zone.coordinates),
            sprinkler_count: sprinklers.iter().filter(|s| s.zone_id == zone.id).count(),
            nested: !zone.is_top_level(),
        })
        .collect();

    let total_zone_area_m2: f64 = zone_stats.iter().map(|z| z.area_m2).sum();
    let usable_area_m2 = usable_area(zones, &zone_stats);

    let unassigned_sprinkler_count = sprinklers.iter().filter(|s| s.is_unassigned()).count();
    let covered_m2: f64 = sprinklers
        .iter()
        .filter(|s| !s.is_unassigned())
        .map(Sprinkler::coverage_area_m2)
        .sum();
    let coverage_percentage = if usable_area_m2 > 0.0 {
        (covered_m2 / usable_area_m2 * 100.0).clamp(0.0, 100.0)
    } else {
        0.0
    };

    let main_meters = main_pipe.map_or(0.0, |m| m.length_meters);
    let submain_meters = total_length(pipes, PipeKind::Submain);
    let lateral_meters = total_length(pipes, PipeKind::Lateral);

    Summary {
        zones: zone_stats,
        total_zone_area_m2,
        usable_area_m2,
        sprinkler_count: sprinklers.len(),
        unassigned_sprinkler_count,
        submain_count: pipes.iter().filter(|p| p.kind == PipeKind::Submain).count(),
        lateral_count: pipes.iter().filter(|p| p.kind == PipeKind::Lateral).count(),
        pipe_lengths: PipeLengths {
            main_meters,
            submain_meters,
            lateral_meters,
            total_meters: main_meters + submain_meters + lateral_meters,
        },
        longest_submain: longest(pipes, PipeKind::Submain),
        longest_lateral: longest(pipes, PipeKind::Lateral),
        coverage_percentage,
    }
}

/// Top-level non-forbidden area minus the sub-zones nested in it, floored at zero.
fn usable_area(zones: &[Zone], stats: &[ZoneStatistics]) -> f64 {
    let irrigated: HashSet<&str> = zones
        .iter()
        .filter(|z| z.is_top_level() && !z.is_forbidden())
        .map(|z| z.id.as_str())
        .collect();

    let mut area = 0.0;
    for (zone, stat) in zones.iter().zip(stats) {
        match zone.parent_zone_id.as_deref() {
            None if irrigated.contains(zone.id.as_str()) => area += stat.area_m2,
            Some(parent) if irrigated.contains(parent) => area -= stat.area_m2,
            _ => {}
        }
    }
    area.max(0.0)
}

fn total_length(pipes: &[Pipe], kind: PipeKind) -> f64 {
    pipes
        .iter()
        .filter(|p| p.kind == kind)
        .map(|p| p.length_meters)
        .sum()
}

/// First pipe of maximal length for the kind.
fn longest(pipes: &[Pipe], kind: PipeKind) -> Option<LongestPipe> {
    let mut best: Option<&Pipe> = None;
    for pipe in pipes.iter().filter(|p| p.kind == kind) {
        if best.map_or(true, |b| pipe.length_meters > b.length_meters) {
            best = Some(pipe);
        }
    }
    best.map(|p| LongestPipe {
        id: p.id.clone(),
        length_meters: p.length_meters,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::logic::geo::METERS_PER_DEGREE;
    use crate::models::{sprinkler::UNASSIGNED_ZONE_ID, zone::ZoneType, Coordinate};

    /// Axis-aligned rectangle near the equator, where the area scale is exact.
    fn rect(id: &str, zone_type: ZoneType, east: f64, north: f64, w: f64, h: f64) -> Zone {
        let c = |x: f64, y: f64| Coordinate::new(y / METERS_PER_DEGREE, x / METERS_PER_DEGREE);
        Zone::new(
            id,
            zone_type,
            vec![
                c(east, north),
                c(east + w, north),
                c(east + w, north + h),
                c(east, north + h),
            ],
        )
    }

    fn sprinkler(id: &str, zone_id: &str, radius: f64) -> Sprinkler {
        Sprinkler {
            id: id.into(),
            position: Coordinate::new(0.0, 0.0),
            sprinkler_type_id: "spray".into(),
            radius_meters: radius,
            zone_id: zone_id.into(),
            orientation: None,
        }
    }

    fn pipe(id: &str, kind: PipeKind, length_m: f64) -> Pipe {
        let end = Coordinate::new(0.0, length_m / METERS_PER_DEGREE);
        Pipe::new(id, Coordinate::new(0.0, 0.0), end, kind, "lawn", vec![])
    }

    #[test]
    fn test_areas_and_usable_area() {
        let zones = vec![
            rect("lawn", ZoneType::Grass, 0.0, 0.0, 20.0, 10.0),
            rect("bed", ZoneType::Flowers, 2.0, 2.0, 5.0, 2.0).with_parent("lawn"),
            rect("pond", ZoneType::Forbidden, 40.0, 0.0, 5.0, 5.0),
        ];
        let summary = compute_statistics(&zones, &[], &[], None);
        assert!((summary.zones[0].area_m2 - 200.0).abs() < 1e-6);
        assert!((summary.total_zone_area_m2 - 235.0).abs() < 1e-6);
        assert!((summary.usable_area_m2 - 190.0).abs() < 1e-6);
        assert!(summary.zones[1].nested);
        assert_eq!(summary.coverage_percentage, 0.0);
    }

    #[test]
    fn test_coverage_is_capped_at_100() {
        let zones = vec![rect("lawn", ZoneType::Grass, 0.0, 0.0, 5.0, 5.0)];
        let sprinklers: Vec<_> = (0..20)
            .map(|i| sprinkler(&format!("s{i}"), "lawn", 8.0))
            .collect();
        let summary = compute_statistics(&zones, &sprinklers, &[], None);
        assert_eq!(summary.coverage_percentage, 100.0);
        assert_eq!(summary.zones[0].sprinkler_count, 20);
    }

    #[test]
    fn test_coverage_ignores_unassigned() {
        let zones = vec![rect("lawn", ZoneType::Grass, 0.0, 0.0, 100.0, 100.0)];
        let sprinklers = vec![
            sprinkler("a", "lawn", 1.0),
            sprinkler("b", UNASSIGNED_ZONE_ID, 50.0),
        ];
        let summary = compute_statistics(&zones, &sprinklers, &[], None);
        let expected = std::f64::consts::PI / 10_000.0 * 100.0;
        assert!((summary.coverage_percentage - expected).abs() < 1e-6);
        assert_eq!(summary.unassigned_sprinkler_count, 1);
        assert_eq!(summary.sprinkler_count, 2);
    }

    #[test]
    fn test_no_usable_area_means_zero_coverage() {
        let zones = vec![rect("pond", ZoneType::Forbidden, 0.0, 0.0, 5.0, 5.0)];
        let summary = compute_statistics(&zones, &[sprinkler("a", "pond", 3.0)], &[], None);
        assert_eq!(summary.coverage_percentage, 0.0);
    }

    #[test]
    fn test_pipe_lengths_and_longest() {
        let main = MainPipe::new(vec![
            Coordinate::new(0.0, 0.0),
            Coordinate::new(0.0, 30.0 / METERS_PER_DEGREE),
        ])
        .unwrap();
        let pipes = vec![
            pipe("sub-a", PipeKind::Submain, 10.0),
            pipe("sub-b", PipeKind::Submain, 12.0),
            pipe("lat-a", PipeKind::Lateral, 4.0),
            pipe("lat-b", PipeKind::Lateral, 4.0),
        ];
        let summary = compute_statistics(&[], &[], &pipes, Some(&main));
        let lengths = &summary.pipe_lengths;
        assert!((lengths.main_meters - 30.0).abs() < 0.1);
        assert!((lengths.submain_meters - 22.0).abs() < 0.1);
        assert!((lengths.lateral_meters - 8.0).abs() < 0.1);
        assert!(
            (lengths.total_meters - (lengths.main_meters + lengths.submain_meters + lengths.lateral_meters)).abs()
                < 1e-9
        );
        assert_eq!(summary.submain_count, 2);
        assert_eq!(summary.lateral_count, 2);
        assert_eq!(summary.longest_submain.unwrap().id, "sub-b");
        // ties keep the first
        assert_eq!(summary.longest_lateral.unwrap().id, "lat-a");
    }

    #[test]
    fn test_empty_project() {
        let summary = compute_statistics(&[], &[], &[], None);
        assert_eq!(summary.sprinkler_count, 0);
        assert!(summary.longest_submain.is_none());
        assert!(summary.longest_lateral.is_none());
        assert_eq!(summary.pipe_lengths, PipeLengths::default());
    }
}
