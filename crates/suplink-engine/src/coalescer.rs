//! Single-flight guard: concurrent requests for the same key share one
//! in-flight operation.
//!
//! This is not a cache. The entry for a key is removed as soon as its
//! operation completes, successfully or not, so the next `acquire` for that
//! key starts a fresh operation.

use std::collections::HashMap;
use std::future::Future;
use std::hash::Hash;
use std::sync::{Arc, Mutex};

use futures::future::{BoxFuture, FutureExt, Shared};

use crate::lock;

/// Future handed to every caller coalesced onto one operation.
pub type SharedOperation<T> = Shared<BoxFuture<'static, T>>;

struct Entry<T> {
    ticket: u64,
    operation: SharedOperation<T>,
}

struct InFlight<K, T> {
    next_ticket: u64,
    entries: HashMap<K, Entry<T>>,
}

/// Collapses concurrent identical requests into one operation per key.
pub struct RequestCoalescer<K, T> {
    in_flight: Arc<Mutex<InFlight<K, T>>>,
}

impl<K, T> Default for RequestCoalescer<K, T> {
    fn default() -> Self {
        Self {
            in_flight: Arc::new(Mutex::new(InFlight {
                next_ticket: 0,
                entries: HashMap::new(),
            })),
        }
    }
}

impl<K, T> RequestCoalescer<K, T>
where
    K: Eq + Hash + Clone + Send + 'static,
    T: Clone + Send + Sync + 'static,
{
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the in-flight operation for `key`, or starts one with
    /// `producer` if there is none.
    ///
    /// `producer` is invoked at most once per in-flight window and must not
    /// call back into this coalescer. The operation only makes progress
    /// while at least one caller polls the returned future.
    pub fn acquire<F, Fut>(&self, key: K, producer: F) -> SharedOperation<T>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = T> + Send + 'static,
    {
        let mut in_flight = lock(&self.in_flight);
        if let Some(entry) = in_flight.entries.get(&key) {
            tracing::trace!("joining in-flight operation");
            return entry.operation.clone();
        }

        let ticket = in_flight.next_ticket;
        in_flight.next_ticket = in_flight.next_ticket.wrapping_add(1);

        let registry = Arc::clone(&self.in_flight);
        let entry_key = key.clone();
        let pending = producer();
        let operation = async move {
            let output = pending.await;
            let mut in_flight = lock(&registry);
            // Only remove the entry this operation owns.
            if in_flight
                .entries
                .get(&entry_key)
                .is_some_and(|entry| entry.ticket == ticket)
            {
                in_flight.entries.remove(&entry_key);
            }
            output
        }
        .boxed()
        .shared();

        in_flight.entries.insert(
            key,
            Entry {
                ticket,
                operation: operation.clone(),
            },
        );
        operation
    }

    /// Number of keys with an operation currently in flight.
    #[must_use]
    pub fn in_flight(&self) -> usize {
        lock(&self.in_flight).entries.len()
    }
}
