//! Overlap and containment queries against a brute-force oracle.

use rtree2d::{BoundingBox, RTreeConfig, SpatialIndex};
use rtree2d_int_test::test_util::{
    cleanup, create_test_context, create_test_context_with, random_rect, run_test, sorted,
    LinearIndex,
};

#[test]
fn test_every_inserted_rect_finds_itself() {
    run_test(
        create_test_context,
        |ctx| {
            let mut tree = ctx.tree()?;
            let mut rng = ctx.rng();
            let mut inserted = Vec::new();

            for i in 0..1000u32 {
                let rect = random_rect(&mut rng, 1000.0, 25.0);
                inserted.push((rect, tree.insert(rect, i)));
            }

            for (rect, id) in &inserted {
                let hits = tree.find_intersecting(rect);
                assert!(hits.contains(id), "entry {} not found under {}", id, rect);
            }
            assert!(tree.check_integrity().is_valid);
            Ok(())
        },
        cleanup,
    )
}

#[test]
fn test_search_matches_linear_scan() {
    for max_entries in [4usize, 9, 32] {
        let config = RTreeConfig::new()
            .with_max_entries(max_entries)
            .with_min_entries(max_entries / 2);

        run_test(
            || create_test_context_with(config, max_entries as u64),
            |ctx| {
                let mut tree = ctx.tree()?;
                let mut oracle = LinearIndex::new();
                let mut rng = ctx.rng();

                for i in 0..800u32 {
                    let rect = random_rect(&mut rng, 500.0, 30.0);
                    assert_eq!(tree.add(rect, i), oracle.add(rect, i));
                }

                for _ in 0..200 {
                    let query = random_rect(&mut rng, 500.0, 120.0);
                    assert_eq!(
                        sorted(tree.find_intersecting_keys(&query)),
                        sorted(oracle.find_intersecting_keys(&query)),
                        "intersecting {}",
                        query
                    );
                    assert_eq!(
                        sorted(tree.find_contained_keys(&query)),
                        sorted(oracle.find_contained_keys(&query)),
                        "contained {}",
                        query
                    );
                }
                Ok(())
            },
            cleanup,
        )
    }
}

#[test]
fn test_search_callback_sees_payloads() {
    run_test(
        create_test_context,
        |ctx| {
            let mut tree = ctx.tree()?;
            for i in 0..50u32 {
                let v = i as f32;
                tree.insert(BoundingBox::new(v, v, v + 0.5, v + 0.5), format!("cell-{}", i));
            }

            let mut names = Vec::new();
            tree.search(&BoundingBox::new(10.0, 10.0, 12.0, 12.0), |entry| {
                if let Some(name) = entry.payload {
                    names.push(name.clone());
                }
            });
            names.sort();
            assert_eq!(names, vec!["cell-10", "cell-11", "cell-12"]);
            Ok(())
        },
        cleanup,
    )
}

#[test]
fn test_touching_edges_intersect() {
    run_test(
        create_test_context,
        |ctx| {
            let mut tree = ctx.tree()?;
            let id = tree.insert(BoundingBox::new(0.0, 0.0, 1.0, 1.0), ());
            for i in 0..20u32 {
                let v = 10.0 + i as f32;
                tree.insert(BoundingBox::new(v, v, v + 1.0, v + 1.0), ());
            }

            assert_eq!(tree.find_intersecting(&BoundingBox::new(1.0, 1.0, 2.0, 2.0)), vec![id]);
            assert_eq!(tree.find_intersecting(&BoundingBox::from_point(1.0, 0.5)), vec![id]);
            assert!(tree
                .find_intersecting(&BoundingBox::new(1.0001, 0.0, 2.0, 1.0))
                .is_empty());
            Ok(())
        },
        cleanup,
    )
}

#[test]
fn test_shape_after_growth() {
    run_test(
        create_test_context,
        |ctx| {
            let mut tree = ctx.tree()?;
            let mut rng = ctx.rng();
            for i in 0..5000u32 {
                tree.insert(random_rect(&mut rng, 10000.0, 5.0), i);
            }

            let stats = tree.stats();
            assert_eq!(stats.total_entries, 5000);
            assert!(stats.tree_height >= 6, "height {}", stats.tree_height);
            assert!(stats.leaf_count < stats.node_count);

            let report = tree.check_integrity();
            assert!(report.is_valid, "{:?}", report.errors);
            assert_eq!(report.nodes_checked, stats.node_count);
            Ok(())
        },
        cleanup,
    )
}
