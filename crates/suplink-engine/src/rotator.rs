//! Round-robin rotation over advisory items while a search is loading.

use std::sync::{Arc, Mutex, Weak};
use std::time::Duration;

use suplink_core::AdvisoryItem;

use crate::lock;
use crate::scheduler::{ScheduleHandle, Scheduler};

/// Time each advisory item stays current.
pub const ADVISORY_INTERVAL: Duration = Duration::from_millis(10_000);

/// Items past this many are never shown.
pub const MAX_ROTATION_ITEMS: usize = 5;

#[derive(Default)]
struct Rotation {
    items: Vec<AdvisoryItem>,
    index: usize,
    /// Bumped on every start/stop so a timer armed for an older rotation
    /// does nothing when it fires.
    epoch: u64,
    pending: Option<ScheduleHandle>,
}

struct Inner {
    scheduler: Arc<dyn Scheduler>,
    interval: Duration,
    rotation: Mutex<Rotation>,
}

/// Advances through a bounded list of advisory items on a fixed interval.
///
/// The interval is measured from when the current item became active, so a
/// stop/start resets the phase. At most one advance is scheduled at a time.
#[derive(Clone)]
pub struct AdvisoryRotator {
    inner: Arc<Inner>,
}

impl AdvisoryRotator {
    #[must_use]
    pub fn new(scheduler: Arc<dyn Scheduler>) -> Self {
        Self::with_interval(scheduler, ADVISORY_INTERVAL)
    }

    #[must_use]
    pub fn with_interval(scheduler: Arc<dyn Scheduler>, interval: Duration) -> Self {
        Self {
            inner: Arc::new(Inner {
                scheduler,
                interval,
                rotation: Mutex::new(Rotation::default()),
            }),
        }
    }

    /// Starts rotating over `items` from the first one, replacing any
    /// rotation already running. An empty list is ignored.
    pub fn start(&self, items: &[AdvisoryItem]) {
        if items.is_empty() {
            return;
        }
        let mut rotation = lock(&self.inner.rotation);
        if let Some(pending) = rotation.pending.take() {
            pending.cancel();
        }
        rotation.epoch = rotation.epoch.wrapping_add(1);
        rotation.items = items.iter().take(MAX_ROTATION_ITEMS).cloned().collect();
        rotation.index = 0;
        rotation.pending = Some(arm(&self.inner, rotation.epoch));
        tracing::debug!(items = rotation.items.len(), "advisory rotation started");
    }

    /// Cancels the pending advance. [`AdvisoryRotator::current`] returns
    /// `None` until the next start.
    pub fn stop(&self) {
        let mut rotation = lock(&self.inner.rotation);
        if let Some(pending) = rotation.pending.take() {
            pending.cancel();
        }
        if !rotation.items.is_empty() {
            tracing::debug!("advisory rotation stopped");
        }
        rotation.epoch = rotation.epoch.wrapping_add(1);
        rotation.items.clear();
        rotation.index = 0;
    }

    #[must_use]
    pub fn current(&self) -> Option<AdvisoryItem> {
        let rotation = lock(&self.inner.rotation);
        rotation.items.get(rotation.index).cloned()
    }

    #[must_use]
    pub fn is_active(&self) -> bool {
        !lock(&self.inner.rotation).items.is_empty()
    }
}

/// Schedules the next advance for rotation `epoch`. Called with the rotation
/// lock held; the scheduler never runs the task inline.
fn arm(inner: &Arc<Inner>, epoch: u64) -> ScheduleHandle {
    let weak: Weak<Inner> = Arc::downgrade(inner);
    inner.scheduler.schedule(
        inner.interval,
        Box::new(move || {
            if let Some(inner) = weak.upgrade() {
                advance(&inner, epoch);
            }
        }),
    )
}

fn advance(inner: &Arc<Inner>, epoch: u64) {
    let mut rotation = lock(&inner.rotation);
    if rotation.epoch != epoch || rotation.items.is_empty() {
        return;
    }
    rotation.index = (rotation.index + 1) % rotation.items.len();
    rotation.pending = Some(arm(inner, epoch));
}
