//! Threaded collision evaluator
//!
//! Runs the grid scan on its own thread, continuously, against whatever
//! entity snapshot the simulation last published. The simulation hands the
//! evaluator immutable [`Arc`] snapshots, so a scan can never observe a
//! torn entity or dereference freed state; at worst it reports a stale hit
//! for an entity that was just removed, which the resolution logic ignores.
//!
//! Shutdown is a flag-and-join handshake: the loop checks the flag once per
//! scan cycle, so a shutdown request is observed within one cycle and the
//! joining thread knows no scan is in flight afterwards.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::thread::{self, JoinHandle};
use std::time::Duration;

use super::collision::{self, CollisionListener};
use super::entity::Entity;
use super::grid::SpatialGrid;

/// Shared slot holding the latest copy-on-write entity snapshot.
///
/// The simulation publishes a fresh `Arc<Vec<Entity>>` after each tick; the
/// evaluator (and any renderer) loads whichever snapshot is current. The
/// lock is held only for the pointer swap, never across a scan.
#[derive(Clone, Default)]
pub struct SnapshotSlot {
    inner: Arc<Mutex<Arc<Vec<Entity>>>>,
}

impl SnapshotSlot {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the current snapshot.
    pub fn publish(&self, snapshot: Arc<Vec<Entity>>) {
        // A poisoned lock only means a publisher panicked mid-swap; the
        // stored Arc is still intact either way.
        *self.inner.lock().unwrap_or_else(|e| e.into_inner()) = snapshot;
    }

    /// Fetch the current snapshot.
    pub fn load(&self) -> Arc<Vec<Entity>> {
        self.inner
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .clone()
    }
}

/// Handle to the evaluator thread.
pub struct CollisionEvaluator {
    running: Arc<AtomicBool>,
    handle: Option<JoinHandle<()>>,
}

impl CollisionEvaluator {
    /// Spawn the evaluator thread. `scan_interval` throttles the loop;
    /// `None` scans back-to-back (best-effort freshness).
    pub fn spawn(
        slot: SnapshotSlot,
        mut grid: SpatialGrid,
        mut listener: Box<dyn CollisionListener>,
        scan_interval: Option<Duration>,
    ) -> Self {
        let running = Arc::new(AtomicBool::new(true));
        let thread_running = Arc::clone(&running);

        let handle = thread::Builder::new()
            .name("collision-evaluator".into())
            .spawn(move || {
                log::debug!("collision evaluator started");
                while thread_running.load(Ordering::Acquire) {
                    let snapshot = slot.load();
                    collision::scan(&snapshot, &mut grid, listener.as_mut());
                    if let Some(interval) = scan_interval {
                        thread::sleep(interval);
                    }
                }
                log::debug!("collision evaluator stopped");
            })
            .expect("failed to spawn collision evaluator thread");

        Self {
            running,
            handle: Some(handle),
        }
    }

    /// Request shutdown and join the thread. Idempotent; returns once the
    /// loop has observed the flag and exited, so no scan is in flight
    /// after this call.
    pub fn shutdown(&mut self) {
        self.running.store(false, Ordering::Release);
        if let Some(handle) = self.handle.take() {
            if handle.join().is_err() {
                log::warn!("collision evaluator thread panicked");
            }
        }
    }

    /// Whether the thread has not yet been shut down.
    pub fn is_running(&self) -> bool {
        self.handle.is_some()
    }
}

impl Drop for CollisionEvaluator {
    fn drop(&mut self) {
        self.shutdown();
    }
}
