use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rtree2d::{BoundingBox, EntryId, RTree, RTreeConfig, SpatialIndex, SpatialResult};
use std::panic::{self, AssertUnwindSafe};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;
use tempfile::TempDir;

/// Runs a test between a setup and a teardown step.
///
/// `after` runs even when `test` fails or panics; the failure is reported
/// afterwards with the elapsed time.
pub fn run_test<T, B, A>(before: B, test: T, after: A)
where
    T: Fn(TestContext) -> SpatialResult<()>,
    B: Fn() -> SpatialResult<TestContext>,
    A: Fn(TestContext) -> SpatialResult<()>,
{
    let start_time = Instant::now();
    let ctx = match before() {
        Ok(ctx) => ctx,
        Err(e) => panic!("Before run failed: {:?}", e),
    };

    let result = panic::catch_unwind(AssertUnwindSafe(|| test(ctx.clone())));
    let after_result = after(ctx);
    let elapsed = start_time.elapsed();

    match result {
        Ok(Ok(())) => log::debug!("test passed in {:?}", elapsed),
        Ok(Err(e)) => panic!("Test failed after {:?}: {:?}", elapsed, e),
        Err(panic_err) => {
            let err_msg = if let Some(s) = panic_err.downcast_ref::<&str>() {
                s.to_string()
            } else if let Some(s) = panic_err.downcast_ref::<String>() {
                s.clone()
            } else {
                "Unknown panic".to_string()
            };
            panic!("Test panicked after {:?}: {}", elapsed, err_msg);
        }
    }

    if let Err(e) = after_result {
        panic!("After run failed: {:?}", e);
    }
}

/// Scratch directory, tree thresholds and a seeded generator shared by one
/// test.
#[derive(Clone)]
pub struct TestContext {
    dir: Arc<TempDir>,
    config: RTreeConfig,
    seed: u64,
}

impl TestContext {
    pub fn new(dir: TempDir, config: RTreeConfig, seed: u64) -> Self {
        Self {
            dir: Arc::new(dir),
            config,
            seed,
        }
    }

    /// Path of a file inside the scratch directory
    pub fn path(&self, file_name: &str) -> PathBuf {
        self.dir.path().join(file_name)
    }

    pub fn config(&self) -> RTreeConfig {
        self.config
    }

    pub fn rng(&self) -> StdRng {
        StdRng::seed_from_u64(self.seed)
    }

    pub fn tree<P>(&self) -> SpatialResult<RTree<P>> {
        RTree::with_config(self.config)
    }
}

pub fn create_test_context() -> SpatialResult<TestContext> {
    create_test_context_with(RTreeConfig::default(), 42)
}

pub fn create_test_context_with(config: RTreeConfig, seed: u64) -> SpatialResult<TestContext> {
    let dir = tempfile::tempdir()?;
    Ok(TestContext::new(dir, config, seed))
}

pub fn cleanup(ctx: TestContext) -> SpatialResult<()> {
    // Other clones may still hold the directory; the last one removes it
    if let Ok(dir) = Arc::try_unwrap(ctx.dir) {
        dir.close()?;
    }
    Ok(())
}

/// A rectangle with its corner in `[0, extent)` and sides up to `max_side`.
pub fn random_rect(rng: &mut StdRng, extent: f32, max_side: f32) -> BoundingBox {
    let x = rng.random_range(0.0..extent);
    let y = rng.random_range(0.0..extent);
    let w = rng.random_range(0.0..=max_side);
    let h = rng.random_range(0.0..=max_side);
    BoundingBox::new(x, y, x + w, y + h)
}

pub fn random_point(rng: &mut StdRng, extent: f64) -> (f64, f64) {
    (rng.random_range(-extent..extent), rng.random_range(-extent..extent))
}

/// Brute-force index used as an oracle for tree queries.
#[derive(Debug, Default)]
pub struct LinearIndex<P> {
    entries: Vec<(BoundingBox, EntryId, P)>,
    next_id: EntryId,
}

impl<P> LinearIndex<P> {
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
            next_id: 0,
        }
    }

    pub fn rects(&self) -> impl Iterator<Item = (&BoundingBox, EntryId)> + '_ {
        self.entries.iter().map(|(rect, id, _)| (rect, *id))
    }
}

impl<P> SpatialIndex<P> for LinearIndex<P> {
    fn add(&mut self, key: BoundingBox, payload: P) -> EntryId {
        let id = self.next_id;
        self.next_id += 1;
        self.entries.push((key, id, payload));
        id
    }

    fn remove(&mut self, key: &BoundingBox, id: EntryId) -> bool {
        match self
            .entries
            .iter()
            .position(|(rect, entry_id, _)| rect == key && *entry_id == id)
        {
            Some(idx) => {
                self.entries.remove(idx);
                true
            }
            None => false,
        }
    }

    fn find_intersecting_keys(&self, key: &BoundingBox) -> Vec<EntryId> {
        self.entries
            .iter()
            .filter(|(rect, _, _)| rect.intersects(key))
            .map(|(_, id, _)| *id)
            .collect()
    }

    fn find_contained_keys(&self, key: &BoundingBox) -> Vec<EntryId> {
        self.entries
            .iter()
            .filter(|(rect, _, _)| key.contains(rect))
            .map(|(_, id, _)| *id)
            .collect()
    }

    fn find_nearest(
        &self,
        center_x: f64,
        center_y: f64,
        k: usize,
        max_distance: Option<f64>,
    ) -> Vec<(EntryId, f64)> {
        let limit = max_distance.unwrap_or(f64::INFINITY);
        let mut found: Vec<(EntryId, f64)> = self
            .entries
            .iter()
            .map(|(rect, id, _)| (*id, rect.min_distance(center_x, center_y)))
            .filter(|(_, distance)| *distance <= limit)
            .collect();
        found.sort_by(|a, b| a.1.total_cmp(&b.1));
        found.truncate(k);
        found
    }

    fn size(&self) -> u64 {
        self.entries.len() as u64
    }

    fn clear(&mut self) {
        self.entries.clear();
    }
}

/// Sorted copy of a result list, for order-insensitive comparison
pub fn sorted(mut ids: Vec<EntryId>) -> Vec<EntryId> {
    ids.sort_unstable();
    ids
}
