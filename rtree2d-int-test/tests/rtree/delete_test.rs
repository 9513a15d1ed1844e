//! Mixed insert/delete workloads.

use rand::seq::SliceRandom;
use rand::Rng;
use rtree2d::{BoundingBox, EntryId, RTreeConfig, SpatialIndex};
use rtree2d_int_test::test_util::{
    cleanup, create_test_context, create_test_context_with, random_rect, run_test, sorted,
    LinearIndex,
};

#[test]
fn test_mixed_workload_matches_linear_scan() {
    for (max_entries, min_entries) in [(4usize, 2usize), (8, 3), (16, 8)] {
        let config = RTreeConfig::new()
            .with_max_entries(max_entries)
            .with_min_entries(min_entries);

        run_test(
            || create_test_context_with(config, 7 + max_entries as u64),
            |ctx| {
                let mut tree = ctx.tree()?;
                let mut oracle = LinearIndex::new();
                let mut live: Vec<(BoundingBox, EntryId, u32)> = Vec::new();
                let mut rng = ctx.rng();

                for step in 0..3000u32 {
                    if live.is_empty() || rng.random_bool(0.55) {
                        let rect = random_rect(&mut rng, 800.0, 20.0);
                        let id = tree.add(rect, step);
                        assert_eq!(oracle.add(rect, step), id);
                        live.push((rect, id, step));
                    } else {
                        let idx = rng.random_range(0..live.len());
                        let (rect, id, payload) = live.swap_remove(idx);
                        assert_eq!(tree.remove(&rect, id), Some(payload));
                        assert!(oracle.remove(&rect, id));
                    }

                    if step % 250 == 0 {
                        let report = tree.check_integrity();
                        assert!(report.is_valid, "step {}: {:?}", step, report.errors);

                        let query = random_rect(&mut rng, 800.0, 200.0);
                        assert_eq!(
                            sorted(tree.find_intersecting_keys(&query)),
                            sorted(oracle.find_intersecting_keys(&query))
                        );
                    }
                }

                assert_eq!(SpatialIndex::size(&tree), oracle.size());
                for (rect, id) in oracle.rects() {
                    assert!(tree.get(rect, id).is_some(), "lost entry {}", id);
                }
                Ok(())
            },
            cleanup,
        )
    }
}

#[test]
fn test_delete_everything_in_random_order() {
    run_test(
        create_test_context,
        |ctx| {
            let mut tree = ctx.tree()?;
            let mut rng = ctx.rng();
            let mut inserted: Vec<(BoundingBox, EntryId)> = (0..700u32)
                .map(|i| {
                    let rect = random_rect(&mut rng, 400.0, 10.0);
                    (rect, tree.insert(rect, i))
                })
                .collect();
            inserted.shuffle(&mut rng);

            for (n, (rect, id)) in inserted.iter().enumerate() {
                assert!(tree.remove_entry(rect, *id), "entry {} missing", id);
                assert_eq!(tree.len(), inserted.len() - n - 1);
                if n % 50 == 0 {
                    let report = tree.check_integrity();
                    assert!(report.is_valid, "{:?}", report.errors);
                }
            }

            assert!(tree.is_empty());
            assert_eq!(tree.height(), 1);
            assert!(tree.root().is_leaf());
            assert_eq!(tree.stats().node_count, 1);
            Ok(())
        },
        cleanup,
    )
}

#[test]
fn test_remove_unknown_entries_leaves_tree_untouched() {
    run_test(
        create_test_context,
        |ctx| {
            let mut tree = ctx.tree()?;
            let mut rng = ctx.rng();
            let mut inserted = Vec::new();
            for i in 0..100u32 {
                let rect = random_rect(&mut rng, 100.0, 3.0);
                inserted.push((rect, tree.insert(rect, i)));
            }
            let before = tree.stats();

            // Unknown id, rectangle outside the data, and a mismatched pair
            assert!(!tree.remove_entry(&inserted[0].0, 10_000));
            assert_eq!(tree.remove(&BoundingBox::new(500.0, 500.0, 501.0, 501.0), inserted[0].1), None);
            assert!(!tree.remove_entry(&inserted[1].0, inserted[2].1));

            assert_eq!(tree.stats(), before);
            assert!(tree.check_integrity().is_valid);
            Ok(())
        },
        cleanup,
    )
}

#[test]
fn test_reinsert_after_delete() {
    run_test(
        create_test_context,
        |ctx| {
            let mut tree = ctx.tree()?;
            let rect = BoundingBox::new(5.0, 5.0, 6.0, 6.0);
            for i in 0..30u32 {
                tree.insert(BoundingBox::from_point(i as f32, i as f32), i);
            }

            let first = tree.insert(rect, 100);
            assert_eq!(tree.remove(&rect, first), Some(100));
            let second = tree.insert(rect, 200);

            assert_ne!(first, second);
            assert_eq!(tree.get(&rect, second).and_then(|e| e.payload.copied()), Some(200));
            assert!(tree.get(&rect, first).is_none());
            Ok(())
        },
        cleanup,
    )
}
