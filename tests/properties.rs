use std::collections::BTreeMap;

use irrigation::{
    logic::{
        clipper::{clip_circle_to_polygon, ClipResult, DEFAULT_CIRCLE_SAMPLES},
        geo::{offset, point_in_polygon},
        router::{group_by_zone, route_network},
        statistics::compute_statistics,
    },
    models::{
        pipe::MainPipe,
        sprinkler::Sprinkler,
        zone::{Zone, ZoneType},
        Coordinate,
    },
};
use proptest::prelude::*;

const ORIGIN: Coordinate = Coordinate::new(45.0, 5.0);

fn square(side_m: f64) -> Vec<Coordinate> {
    vec![
        ORIGIN,
        offset(ORIGIN, side_m, 0.0),
        offset(ORIGIN, side_m, side_m),
        offset(ORIGIN, 0.0, side_m),
    ]
}

fn sprinkler(id: usize, zone_id: &str, east: f64, north: f64, radius: f64) -> Sprinkler {
    Sprinkler {
        id: format!("s{id}"),
        position: offset(ORIGIN, east, north),
        sprinkler_type_id: "spray".into(),
        radius_meters: radius,
        zone_id: zone_id.into(),
        orientation: None,
    }
}

proptest! {
    #[test]
    fn circle_far_inside_is_full(
        east in 20.0f64..80.0,
        north in 20.0f64..80.0,
        radius in 0.5f64..15.0,
    ) {
        let center = offset(ORIGIN, east, north);
        let result = clip_circle_to_polygon(center, radius, &square(100.0), DEFAULT_CIRCLE_SAMPLES);
        prop_assert_eq!(result, ClipResult::FullCircle);
    }

    #[test]
    fn circle_far_outside_is_empty(
        east in 150.0f64..400.0,
        north in -200.0f64..300.0,
        radius in 0.5f64..40.0,
    ) {
        let center = offset(ORIGIN, east, north);
        let result = clip_circle_to_polygon(center, radius, &square(100.0), DEFAULT_CIRCLE_SAMPLES);
        prop_assert!(result.is_empty());
    }

    #[test]
    fn clipped_ring_stays_near_zone(
        east in -5.0f64..5.0,
        north in 10.0f64..90.0,
        radius in 6.0f64..10.0,
    ) {
        let zone = square(100.0);
        let center = offset(ORIGIN, east, north);
        if let ClipResult::Polygon(points) = clip_circle_to_polygon(center, radius, &zone, DEFAULT_CIRCLE_SAMPLES) {
            prop_assert!(points.len() >= 3);
            // Every vertex is inside the zone or on its west edge.
            for p in points {
                prop_assert!(point_in_polygon(p, &zone) || (p.lng - ORIGIN.lng).abs() < 1e-7);
            }
        }
    }

    #[test]
    fn coverage_is_a_percentage(
        side in 2.0f64..60.0,
        radii in prop::collection::vec(0.1f64..20.0, 0..30),
    ) {
        let zones = vec![Zone::new("lawn", ZoneType::Grass, square(side))];
        let sprinklers: Vec<Sprinkler> = radii
            .iter()
            .enumerate()
            .map(|(i, r)| sprinkler(i, "lawn", 1.0, 1.0, *r))
            .collect();
        let summary = compute_statistics(&zones, &sprinklers, &[], None);
        prop_assert!((0.0..=100.0).contains(&summary.coverage_percentage));
    }

    #[test]
    fn routing_is_idempotent_and_connects_everyone(
        positions in prop::collection::vec((0.0f64..40.0, 0.0f64..40.0), 1..25),
    ) {
        let sprinklers: Vec<Sprinkler> = positions
            .iter()
            .enumerate()
            .map(|(i, (e, n))| sprinkler(i, "lawn", *e, *n, 4.0))
            .collect();
        let main_pipe = MainPipe::new(vec![offset(ORIGIN, -10.0, -10.0), offset(ORIGIN, 50.0, -10.0)]).unwrap();
        let by_zone: BTreeMap<_, _> = group_by_zone(&sprinklers);

        let first = route_network(Some(&main_pipe), &by_zone);
        let second = route_network(Some(&main_pipe), &by_zone);
        prop_assert_eq!(&first, &second);

        // One sub-main plus a spanning tree of laterals.
        prop_assert_eq!(first.len(), sprinklers.len());
        for s in &sprinklers {
            prop_assert!(first.iter().any(|p| p.touches(&s.id)), "{} left unconnected", s.id);
        }
    }
}
