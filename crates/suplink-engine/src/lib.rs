//! Result acquisition and consolidation for supplier discovery.
//!
//! Deduplicates concurrent identical searches, merges search hits with
//! stored supplier analyses, ranks the merged set, fires the save-and-analyze
//! trigger once per distinct query, and rotates advisory content while a
//! search is loading.

pub mod association;
pub mod coalescer;
pub mod engine;
pub mod error;
pub mod merge;
pub mod ports;
pub mod rank;
pub mod rotator;
pub mod scheduler;
pub mod session;

use std::sync::{Mutex, MutexGuard, PoisonError};

pub use coalescer::RequestCoalescer;
pub use engine::ConsolidationEngine;
pub use error::{EngineError, SourceError};
pub use merge::merge;
pub use ports::{
    AdvisorySource, AnalysisTrigger, EmptyEnrichmentStore, EnrichmentStore, HitSource,
    PgEnrichmentStore, Ports,
};
pub use rank::{rank, split_groups};
pub use rotator::{AdvisoryRotator, ADVISORY_INTERVAL, MAX_ROTATION_ITEMS};
pub use scheduler::{ScheduleHandle, Scheduler, TokioScheduler};
pub use session::{SearchSessionController, SessionView};

/// Locks `mutex`, recovering the data if a previous holder panicked.
///
/// Every critical section in this crate is a handful of field updates with
/// no `.await` inside, so the protected state is never left half-written.
pub(crate) fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}
