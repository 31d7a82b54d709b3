//! Memoization of parametric cells.
//!
//! The cache maps a [`CellSignature`] to one shared [`Cell`]. Each signature
//! owns a [`OnceCell`] slot: the map lock is held only long enough to find or
//! create the slot, and the build itself runs under the slot's own
//! initialization lock. Concurrent requests for the same signature therefore
//! block on the first build and then observe its result, while builds for
//! different signatures proceed in parallel.
//!
//! Published cells are never evicted; a cache lives as long as its session.
//! A failed build leaves no entry behind.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};

use once_cell::sync::OnceCell;

use crate::cell::Cell;
use crate::error::Result;
use crate::signature::CellSignature;

type Slot = Arc<OnceCell<Arc<Cell>>>;

#[derive(Debug, Default)]
pub struct CellCache {
    slots: Mutex<HashMap<CellSignature, Slot>>,
}

impl CellCache {
    pub fn new() -> Self {
        Self::default()
    }

    fn slots(&self) -> MutexGuard<'_, HashMap<CellSignature, Slot>> {
        // Slots are inserted and removed whole, so a poisoned map is still consistent.
        self.slots.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Returns the cell for `signature`, running `build` on a fresh cell if
    /// no cell has been published for it yet.
    ///
    /// `build` runs at most once per successful signature. If it fails, the
    /// error is returned, nothing is published, and a later call retries.
    pub fn get_or_build<F>(&self, signature: CellSignature, build: F) -> Result<Arc<Cell>>
    where
        F: FnOnce(&mut Cell) -> Result<()>,
    {
        signature.validate()?;
        let slot = self.slots().entry(signature.clone()).or_default().clone();

        if let Some(cell) = slot.get() {
            log::debug!("cache hit: {}", signature);
            return Ok(cell.clone());
        }

        let result = slot.get_or_try_init(|| {
            log::debug!("cache miss: {}", signature);
            let mut cell = Cell::new(signature.clone());
            match build(&mut cell) {
                Ok(()) => {
                    log::info!(
                        "registered cell {} ({} polygons, {} ports)",
                        cell.name,
                        cell.polygon_count(),
                        cell.ports().len()
                    );
                    Ok(Arc::new(cell))
                }
                Err(e) => {
                    log::warn!("build of {} failed: {}", signature, e);
                    Err(e)
                }
            }
        });
        match result {
            Ok(cell) => Ok(cell.clone()),
            Err(e) => {
                self.discard_empty_slot(&signature, &slot);
                Err(e)
            }
        }
    }

    /// Drops the slot for `signature` after a failed build, unless another
    /// caller still holds it or it has been initialized since.
    fn discard_empty_slot(&self, signature: &CellSignature, slot: &Slot) {
        let mut slots = self.slots();
        let unused = slots.get(signature).is_some_and(|s| {
            Arc::ptr_eq(s, slot) && s.get().is_none() && Arc::strong_count(s) == 2
        });
        if unused {
            slots.remove(signature);
        }
    }

    /// Looks up a published cell without building.
    pub fn get(&self, signature: &CellSignature) -> Option<Arc<Cell>> {
        self.slots().get(signature).and_then(|slot| slot.get().cloned())
    }

    pub fn contains(&self, signature: &CellSignature) -> bool {
        self.get(signature).is_some()
    }

    /// Number of published cells.
    pub fn len(&self) -> usize {
        self.slots().values().filter(|slot| slot.get().is_some()).count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Snapshot of all published cells.
    pub fn cells(&self) -> Vec<Arc<Cell>> {
        self.slots().values().filter_map(|slot| slot.get().cloned()).collect()
    }
}

/// Runs `build` through `cache`, the composition every cell builder uses.
pub fn build_cached<F>(cache: &CellCache, signature: CellSignature, build: F) -> Result<Arc<Cell>>
where
    F: FnOnce(&mut Cell) -> Result<()>,
{
    cache.get_or_build(signature, build)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::PcellError;
    use crate::geometry::Polygon;
    use crate::layer::LayerKey;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Barrier;
    use std::thread;
    use std::time::Duration;

    fn sig(width: f64) -> CellSignature {
        CellSignature::new("box").with("width", width)
    }

    fn fill(cell: &mut Cell) -> Result<()> {
        cell.add_polygon(LayerKey(1), Polygon::from_box(0, 0, 10, 10));
        Ok(())
    }

    #[test]
    fn test_hit_returns_same_instance() {
        let cache = CellCache::new();
        let a = cache.get_or_build(sig(1.0), fill).unwrap();
        let b = cache.get_or_build(sig(1.0), |_| panic!("must not rebuild")).unwrap();
        assert!(Arc::ptr_eq(&a, &b));
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn test_different_params_are_distinct() {
        let cache = CellCache::new();
        let a = cache.get_or_build(sig(1.0), fill).unwrap();
        let b = cache.get_or_build(sig(2.0), fill).unwrap();
        assert!(!Arc::ptr_eq(&a, &b));
        assert_ne!(a.id, b.id);
        assert_eq!(cache.len(), 2);
    }

    #[test]
    fn test_failed_build_not_cached() {
        let cache = CellCache::new();
        let err = cache
            .get_or_build(sig(1.0), |_| {
                Err(PcellError::NonPositive {
                    name: "width",
                    value: 0.0,
                })
            })
            .unwrap_err();
        assert!(matches!(err, PcellError::NonPositive { .. }));
        assert!(!cache.contains(&sig(1.0)));
        assert!(cache.is_empty());

        let cell = cache.get_or_build(sig(1.0), fill).unwrap();
        assert_eq!(cell.polygon_count(), 1);
        assert!(cache.contains(&sig(1.0)));
    }

    #[test]
    fn test_failed_builds_leave_no_slots() {
        let cache = CellCache::new();
        for i in 0..16 {
            let failed = cache.get_or_build(sig(i as f64), |_| {
                Err(PcellError::DegenerateBackbone("empty".to_string()))
            });
            assert!(failed.is_err());
        }
        assert_eq!(cache.slots().len(), 0);

        cache.get_or_build(sig(1.0), fill).unwrap();
        assert_eq!(cache.slots().len(), 1);
    }

    #[test]
    fn test_nan_signature_rejected() {
        let cache = CellCache::new();
        assert!(cache.get_or_build(sig(f64::NAN), fill).is_err());
        assert!(cache.is_empty());
    }

    #[test]
    fn test_concurrent_requests_build_once() {
        const THREADS: usize = 8;
        let cache = Arc::new(CellCache::new());
        let builds = Arc::new(AtomicUsize::new(0));
        let barrier = Arc::new(Barrier::new(THREADS));

        let handles: Vec<_> = (0..THREADS)
            .map(|_| {
                let cache = cache.clone();
                let builds = builds.clone();
                let barrier = barrier.clone();
                thread::spawn(move || {
                    barrier.wait();
                    cache
                        .get_or_build(sig(3.0), |cell| {
                            builds.fetch_add(1, Ordering::SeqCst);
                            thread::sleep(Duration::from_millis(50));
                            fill(cell)
                        })
                        .unwrap()
                })
            })
            .collect();

        let cells: Vec<Arc<Cell>> = handles.into_iter().map(|h| h.join().unwrap()).collect();
        assert_eq!(builds.load(Ordering::SeqCst), 1);
        for cell in &cells[1..] {
            assert!(Arc::ptr_eq(&cells[0], cell));
            assert_eq!(cell.polygon_count(), 1);
        }
    }

    #[test]
    fn test_build_cached_composes() {
        let cache = CellCache::new();
        let a = build_cached(&cache, sig(4.0), fill).unwrap();
        assert!(Arc::ptr_eq(&a, &cache.get(&sig(4.0)).unwrap()));
        assert_eq!(cache.cells().len(), 1);
    }
}
