use proptest::prelude::*;
use swimbots_core::SpatialHash;

prop_compose! {
    fn arb_points()(
        points in prop::collection::vec((0.0f64..1920.0, 0.0f64..1080.0), 0..200)
    ) -> Vec<(f64, f64)> {
        points
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    #[test]
    fn test_query_is_superset_of_exact_radius(
        points in arb_points(),
        (qx, qy) in (0.0f64..1920.0, 0.0f64..1080.0),
        radius in 0.0f64..400.0,
        cell_size in 10.0f64..120.0
    ) {
        let mut hash = SpatialHash::new(cell_size);
        hash.rebuild(&points, |&p| p);
        let found = hash.query_radius(qx, qy, radius);

        for (i, &(x, y)) in points.iter().enumerate() {
            let d2 = (x - qx).powi(2) + (y - qy).powi(2);
            if d2 <= radius * radius {
                prop_assert!(found.contains(&i), "point {} at distance {} missed", i, d2.sqrt());
            }
        }
    }

    #[test]
    fn test_filtered_query_matches_brute_force(
        points in arb_points(),
        (qx, qy) in (0.0f64..1920.0, 0.0f64..1080.0),
        radius in 0.0f64..400.0
    ) {
        let mut hash = SpatialHash::new(56.0);
        hash.rebuild(&points, |&p| p);
        let within = |&(x, y): &(f64, f64)| (x - qx).powi(2) + (y - qy).powi(2) < radius * radius;

        let mut via_hash: Vec<usize> = hash
            .query_radius(qx, qy, radius)
            .into_iter()
            .filter(|&i| within(&points[i]))
            .collect();
        via_hash.sort_unstable();
        let brute: Vec<usize> = (0..points.len()).filter(|&i| within(&points[i])).collect();
        prop_assert_eq!(via_hash, brute);
    }

    #[test]
    fn test_query_never_reports_duplicates(
        points in arb_points(),
        (qx, qy) in (0.0f64..1920.0, 0.0f64..1080.0),
        radius in 0.0f64..2000.0
    ) {
        let mut hash = SpatialHash::new(80.0);
        hash.rebuild(&points, |&p| p);
        let mut found = hash.query_radius(qx, qy, radius);
        let n = found.len();
        found.sort_unstable();
        found.dedup();
        prop_assert_eq!(found.len(), n);
    }

    #[test]
    fn test_rebuild_is_idempotent(
        points in arb_points(),
        (qx, qy) in (0.0f64..1920.0, 0.0f64..1080.0),
        radius in 0.0f64..400.0
    ) {
        let mut hash = SpatialHash::new(56.0);
        hash.rebuild(&points, |&p| p);
        let mut first = hash.query_radius(qx, qy, radius);
        hash.rebuild(&points, |&p| p);
        let mut second = hash.query_radius(qx, qy, radius);
        first.sort_unstable();
        second.sort_unstable();
        prop_assert_eq!(first, second);
    }

    #[test]
    fn test_rebuild_replaces_previous_contents(
        first in arb_points(),
        second in arb_points()
    ) {
        let mut hash = SpatialHash::new(40.0);
        hash.rebuild(&first, |&p| p);
        hash.rebuild(&second, |&p| p);
        prop_assert_eq!(hash.len(), second.len());

        let all = hash.query_radius(960.0, 540.0, 3000.0);
        prop_assert_eq!(all.len(), second.len());
        prop_assert!(all.iter().all(|&i| i < second.len()));
    }
}
