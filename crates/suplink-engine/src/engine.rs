//! Per-process owner of the state shared between search sessions.

use std::collections::HashSet;
use std::sync::{Arc, Mutex};

use suplink_client::SaveSearchRequest;
use suplink_core::{AdvisoryItem, EnrichmentRecord, RawHit, SearchKey};
use tokio::task::JoinSet;

use crate::association::associated_with;
use crate::coalescer::{RequestCoalescer, SharedOperation};
use crate::error::EngineError;
use crate::lock;
use crate::merge::merge;
use crate::ports::Ports;

/// Outcome of one Search API call, shared by every coalesced caller.
pub type HitsResult = Result<Arc<Vec<RawHit>>, EngineError>;

/// Holds the in-flight search map, the set of keys whose analysis has been
/// triggered, and the external collaborators. Controllers share one engine
/// through an `Arc`.
pub struct ConsolidationEngine {
    ports: Ports,
    coalescer: RequestCoalescer<SearchKey, HitsResult>,
    triggered: Mutex<HashSet<SearchKey>>,
    pending_triggers: Mutex<JoinSet<()>>,
}

impl ConsolidationEngine {
    #[must_use]
    pub fn new(ports: Ports) -> Self {
        Self {
            ports,
            coalescer: RequestCoalescer::new(),
            triggered: Mutex::new(HashSet::new()),
            pending_triggers: Mutex::new(JoinSet::new()),
        }
    }

    /// Raw hits for `key`, joining the call already in flight if there is one.
    pub fn fetch_hits(&self, key: &SearchKey) -> SharedOperation<HitsResult> {
        let hits = Arc::clone(&self.ports.hits);
        let request_key = key.clone();
        self.coalescer.acquire(key.clone(), move || {
            tracing::debug!(key = %request_key, "requesting search hits");
            let call = hits.fetch_hits(request_key);
            async move {
                call.await
                    .map(Arc::new)
                    .map_err(EngineError::fetch)
            }
        })
    }

    /// Number of searches currently in flight.
    #[must_use]
    pub fn searches_in_flight(&self) -> usize {
        self.coalescer.in_flight()
    }

    /// Scored analyses whose stored query matches `key`.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::Enrichment`] when the store cannot be read.
    pub async fn load_enrichment(
        &self,
        key: &SearchKey,
    ) -> Result<Vec<EnrichmentRecord>, EngineError> {
        let rows = self
            .ports
            .enrichment
            .load_all()
            .await
            .map_err(|e| EngineError::Enrichment(e.to_string()))?;
        let total = rows.len();
        let associated = associated_with(rows, key);
        tracing::debug!(
            key = %key,
            total,
            associated = associated.len(),
            "loaded supplier analyses"
        );
        Ok(associated)
    }

    /// Advisory items for `product`. Failures are logged and yield no items.
    pub async fn fetch_advisories(&self, product: &str) -> Vec<AdvisoryItem> {
        match self
            .ports
            .advisories
            .fetch_advisories(product.to_owned())
            .await
        {
            Ok(items) => items,
            Err(e) => {
                tracing::debug!(product, error = %e, "advisories unavailable");
                Vec::new()
            }
        }
    }

    /// Fires the save-and-analyze request for `key` unless it already fired
    /// in this process. Returns whether a request was sent.
    ///
    /// Only the search's own `hits` are sent, deduplicated by identity: the
    /// backend records them as the saved search's results and analyzes each
    /// URL, so stored analyses from earlier searches stay out of the payload.
    ///
    /// The request runs in the background; its outcome is only logged. Must
    /// be called from within a tokio runtime.
    pub fn trigger_once(
        &self,
        key: &SearchKey,
        hits: &[RawHit],
        user_id: Option<String>,
    ) -> bool {
        let label = key.to_string();
        if !lock(&self.triggered).insert(key.clone()) {
            tracing::debug!(key = %label, "analysis already triggered");
            return false;
        }

        let request = SaveSearchRequest {
            search_term: key.display_product().to_owned(),
            country: key.display_country().to_owned(),
            results: merge(hits, &[]),
            mode: key.mode(),
            user_id,
        };
        let count = request.results.len();
        let call = self.ports.trigger.save_and_analyze(request);

        let mut pending = lock(&self.pending_triggers);
        while pending.try_join_next().is_some() {}
        pending.spawn(async move {
            match call.await {
                Ok(reply) => {
                    let search_id = reply.search_id().unwrap_or_default();
                    tracing::info!(
                        key = %label,
                        results = count,
                        search_id = %search_id,
                        new_urls = ?reply.new_urls_count,
                        message = reply.message.as_deref().unwrap_or_default(),
                        "analysis triggered"
                    );
                }
                Err(e) => tracing::warn!(key = %label, error = %e, "save-and-analyze failed"),
            }
        });
        true
    }

    /// Whether the analysis for `key` has been triggered.
    #[must_use]
    pub fn has_triggered(&self, key: &SearchKey) -> bool {
        lock(&self.triggered).contains(key)
    }

    /// Waits for every background save-and-analyze request started so far.
    pub async fn drain_triggers(&self) {
        let mut pending = std::mem::take(&mut *lock(&self.pending_triggers));
        while pending.join_next().await.is_some() {}
    }
}
