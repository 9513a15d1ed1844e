//! Nearest-neighbor queries against a brute-force oracle.

use rtree2d::{BoundingBox, RTreeConfig, SpatialIndex};
use rtree2d_int_test::test_util::{
    cleanup, create_test_context, create_test_context_with, random_point, random_rect, run_test,
    LinearIndex,
};

#[test]
fn test_nearest_distance_matches_linear_scan() {
    run_test(
        create_test_context,
        |ctx| {
            let mut tree = ctx.tree()?;
            let mut oracle = LinearIndex::new();
            let mut rng = ctx.rng();

            for i in 0..2000u32 {
                let rect = random_rect(&mut rng, 1000.0, 15.0);
                tree.add(rect, i);
                oracle.add(rect, i);
            }

            for _ in 0..300 {
                let (x, y) = random_point(&mut rng, 1200.0);
                let found = tree.nearest_neighbor(x, y).expect("tree is not empty");
                let expected = oracle.find_nearest(x, y, 1, None)[0];

                assert_eq!(found.distance, expected.1, "query ({}, {})", x, y);
                // On ties any closest entry is acceptable
                assert_eq!(found.entry.rect.min_distance(x, y), expected.1);
            }
            Ok(())
        },
        cleanup,
    )
}

#[test]
fn test_k_nearest_matches_linear_scan() {
    let config = RTreeConfig::new().with_max_entries(12).with_min_entries(4);
    run_test(
        || create_test_context_with(config, 99),
        |ctx| {
            let mut tree = ctx.tree()?;
            let mut oracle = LinearIndex::new();
            let mut rng = ctx.rng();

            for i in 0..1500u32 {
                let rect = random_rect(&mut rng, 300.0, 4.0);
                tree.add(rect, i);
                oracle.add(rect, i);
            }

            for k in [1usize, 5, 20] {
                for _ in 0..40 {
                    let (x, y) = random_point(&mut rng, 320.0);
                    let found: Vec<f64> = tree
                        .find_nearest(x, y, k, None)
                        .into_iter()
                        .map(|(_, d)| d)
                        .collect();
                    let expected: Vec<f64> = oracle
                        .find_nearest(x, y, k, None)
                        .into_iter()
                        .map(|(_, d)| d)
                        .collect();
                    assert_eq!(found, expected, "k={} query ({}, {})", k, x, y);
                }
            }
            Ok(())
        },
        cleanup,
    )
}

#[test]
fn test_within_distance_matches_linear_scan() {
    run_test(
        create_test_context,
        |ctx| {
            let mut tree = ctx.tree()?;
            let mut oracle = LinearIndex::new();
            let mut rng = ctx.rng();

            for i in 0..600u32 {
                let rect = random_rect(&mut rng, 200.0, 2.0);
                tree.add(rect, i);
                oracle.add(rect, i);
            }

            let mut found: Vec<_> = tree.find_within_distance(100.0, 100.0, 15.0);
            let mut expected: Vec<_> = oracle.find_within_distance(100.0, 100.0, 15.0);
            found.sort_by_key(|(id, _)| *id);
            expected.sort_by_key(|(id, _)| *id);
            assert_eq!(found, expected);
            Ok(())
        },
        cleanup,
    )
}

#[test]
fn test_nearest_across_diagonal_gap() {
    run_test(
        create_test_context,
        |ctx| {
            let mut tree = ctx.tree()?;
            let near = tree.insert(BoundingBox::new(0.0, 0.0, 1.0, 1.0), "near");
            tree.insert(BoundingBox::new(10.0, 10.0, 11.0, 11.0), "far");

            let found = tree.nearest_neighbor(2.0, 2.0).expect("tree is not empty");
            assert_eq!(found.entry.id, near);
            assert!((found.distance - std::f64::consts::SQRT_2).abs() < 1e-12);
            Ok(())
        },
        cleanup,
    )
}

#[test]
fn test_nearest_from_origin() {
    run_test(
        create_test_context,
        |ctx| {
            let mut tree = ctx.tree()?;
            tree.insert(BoundingBox::new(5.0, 5.0, 6.0, 6.0), "far");
            let near = tree.insert(BoundingBox::new(1.0, 1.0, 2.0, 2.0), "near");

            let found = tree.nearest_neighbor(0.0, 0.0).expect("tree is not empty");
            assert_eq!(found.entry.id, near);
            assert!((found.distance - std::f64::consts::SQRT_2).abs() < 1e-12);
            Ok(())
        },
        cleanup,
    )
}

#[test]
fn test_nearest_tracks_deletions() {
    run_test(
        create_test_context,
        |ctx| {
            let mut tree = ctx.tree()?;
            let mut placed = Vec::new();
            for i in 0..100u32 {
                let v = i as f32;
                let rect = BoundingBox::from_point(v, 0.0);
                placed.push((rect, tree.insert(rect, i)));
            }

            // Drop the ten points closest to the origin one at a time
            for (rect, id) in placed.iter().take(10) {
                let found = tree.nearest_neighbor(0.0, 0.0).expect("tree is not empty");
                assert_eq!(found.entry.id, *id);
                assert!(tree.remove_entry(rect, *id));
            }

            let found = tree.nearest_neighbor(0.0, 0.0).expect("tree is not empty");
            assert_eq!(found.entry.payload, Some(&10));
            assert_eq!(found.distance, 10.0);
            Ok(())
        },
        cleanup,
    )
}

#[test]
fn test_nearest_on_empty_and_cleared_tree() {
    run_test(
        create_test_context,
        |ctx| {
            let mut tree = ctx.tree::<u32>()?;
            assert!(tree.nearest_neighbor(0.0, 0.0).is_none());

            tree.insert(BoundingBox::new(1.0, 1.0, 2.0, 2.0), 1);
            assert!(tree.nearest_neighbor(0.0, 0.0).is_some());

            SpatialIndex::clear(&mut tree);
            assert!(tree.nearest_neighbor(0.0, 0.0).is_none());
            assert!(tree.nearest_neighbors(0.0, 0.0, 5).is_empty());
            Ok(())
        },
        cleanup,
    )
}
