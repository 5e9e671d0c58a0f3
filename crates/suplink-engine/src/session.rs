//! Drives one search through loading, merging, ranking and publishing.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use suplink_core::{AdvisoryItem, SearchKey, SearchQuery, SessionState, SupplierRecord};
use tokio::sync::watch;
use tracing::Instrument;

use crate::engine::ConsolidationEngine;
use crate::error::EngineError;
use crate::lock;
use crate::merge::merge;
use crate::rank::{rank, split_groups};
use crate::rotator::AdvisoryRotator;
use crate::scheduler::Scheduler;

/// Snapshot of the current session, published on every state change.
#[derive(Debug, Clone, Default)]
pub struct SessionView {
    /// Increments with every session started; `0` before the first one.
    pub session_id: u64,
    pub key: Option<SearchKey>,
    pub state: SessionState,
    /// Ranked records. Empty unless `state` is `Ready`.
    pub results: Vec<SupplierRecord>,
    /// User-visible failure message when `state` is `Failed`.
    pub error: Option<String>,
}

impl SessionView {
    /// Records that already carry a score.
    #[must_use]
    pub fn previously_analyzed(&self) -> &[SupplierRecord] {
        split_groups(&self.results).0
    }

    /// Records with no analysis yet.
    #[must_use]
    pub fn new_suppliers(&self) -> &[SupplierRecord] {
        split_groups(&self.results).1
    }
}

struct Active {
    generation: u64,
    key: Option<SearchKey>,
    state: SessionState,
}

struct Shared {
    active: Mutex<Active>,
    view: watch::Sender<SessionView>,
    rotator: AdvisoryRotator,
}

impl Shared {
    fn is_current(&self, generation: u64) -> bool {
        lock(&self.active).generation == generation
    }

    /// Publishes the outcome of session `generation` and stops the rotation.
    /// Returns `false`, publishing nothing, if a newer session has started.
    fn settle(
        &self,
        generation: u64,
        state: SessionState,
        results: Vec<SupplierRecord>,
        error: Option<String>,
    ) -> bool {
        let mut active = lock(&self.active);
        if active.generation != generation {
            return false;
        }
        active.state = state;
        self.rotator.stop();
        self.view.send_replace(SessionView {
            session_id: generation,
            key: active.key.clone(),
            state,
            results,
            error,
        });
        true
    }

    /// Starts the rotation if session `generation` is still loading.
    fn start_rotation(&self, generation: u64, items: &[AdvisoryItem]) {
        let active = lock(&self.active);
        if active.generation == generation && active.state == SessionState::Loading {
            self.rotator.start(items);
        }
    }
}

/// Runs searches one at a time and publishes each session's outcome.
///
/// The last query submitted is authoritative: completions from a superseded
/// session are dropped. All work happens on spawned tasks, so `submit` must be
/// called from within a tokio runtime.
pub struct SearchSessionController {
    engine: Arc<ConsolidationEngine>,
    shared: Arc<Shared>,
}

impl SearchSessionController {
    #[must_use]
    pub fn new(
        engine: Arc<ConsolidationEngine>,
        scheduler: Arc<dyn Scheduler>,
        advisory_interval: Duration,
    ) -> Self {
        let (view, _) = watch::channel(SessionView::default());
        Self {
            engine,
            shared: Arc::new(Shared {
                active: Mutex::new(Active {
                    generation: 0,
                    key: None,
                    state: SessionState::Idle,
                }),
                view,
                rotator: AdvisoryRotator::with_interval(scheduler, advisory_interval),
            }),
        }
    }

    /// Starts a session for `query` and returns its id.
    ///
    /// Submitting the key of the current session while it is loading or
    /// ready does nothing and returns the current id. After a failure the
    /// same key starts a fresh attempt.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::InvalidQuery`] when product or country is
    /// blank; the current session is left untouched.
    pub fn submit(&self, query: SearchQuery) -> Result<u64, EngineError> {
        let key = query.key().ok_or(EngineError::InvalidQuery)?;

        let generation = {
            let mut active = lock(&self.shared.active);
            if active.key.as_ref() == Some(&key)
                && matches!(active.state, SessionState::Loading | SessionState::Ready)
            {
                tracing::debug!(key = %key, session = active.generation, "query unchanged");
                return Ok(active.generation);
            }
            active.generation += 1;
            active.key = Some(key.clone());
            active.state = SessionState::Loading;
            self.shared.rotator.stop();
            self.shared.view.send_replace(SessionView {
                session_id: active.generation,
                key: Some(key.clone()),
                state: SessionState::Loading,
                ..SessionView::default()
            });
            active.generation
        };

        let span = tracing::info_span!("search_session", session = generation, key = %key);
        tracing::info!(parent: &span, "search started");

        tokio::spawn(
            load_advisories(
                Arc::clone(&self.engine),
                Arc::clone(&self.shared),
                generation,
                key.display_product().to_owned(),
            )
            .instrument(span.clone()),
        );
        tokio::spawn(
            run_search(
                Arc::clone(&self.engine),
                Arc::clone(&self.shared),
                generation,
                key,
                query.user_id,
            )
            .instrument(span),
        );

        Ok(generation)
    }

    /// Receiver that observes every published [`SessionView`].
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<SessionView> {
        self.shared.view.subscribe()
    }

    #[must_use]
    pub fn view(&self) -> SessionView {
        self.shared.view.borrow().clone()
    }

    #[must_use]
    pub fn state(&self) -> SessionState {
        self.shared.view.borrow().state
    }

    /// Advisory item to show right now, if the rotation is running.
    #[must_use]
    pub fn current_advisory(&self) -> Option<AdvisoryItem> {
        self.shared.rotator.current()
    }

    #[must_use]
    pub fn engine(&self) -> &Arc<ConsolidationEngine> {
        &self.engine
    }

    /// Resolves with the first published view whose session is ready or
    /// failed. Returns immediately when no session was ever started.
    pub async fn wait_settled(&self) -> SessionView {
        let mut views = self.shared.view.subscribe();
        let settled = views
            .wait_for(|view| view.session_id == 0 || view.state.is_settled())
            .await
            .map(|view| view.clone());
        settled.unwrap_or_else(|_| self.view())
    }
}

impl Drop for SearchSessionController {
    fn drop(&mut self) {
        self.shared.rotator.stop();
    }
}

async fn load_advisories(
    engine: Arc<ConsolidationEngine>,
    shared: Arc<Shared>,
    generation: u64,
    product: String,
) {
    let items = engine.fetch_advisories(&product).await;
    if items.is_empty() {
        return;
    }
    tracing::debug!(items = items.len(), "advisories loaded");
    shared.start_rotation(generation, &items);
}

async fn run_search(
    engine: Arc<ConsolidationEngine>,
    shared: Arc<Shared>,
    generation: u64,
    key: SearchKey,
    user_id: Option<String>,
) {
    let hits = match engine.fetch_hits(&key).await {
        Ok(hits) => hits,
        Err(e) => {
            tracing::warn!(error = %e, "search failed");
            shared.settle(generation, SessionState::Failed, Vec::new(), Some(e.to_string()));
            return;
        }
    };
    if !shared.is_current(generation) {
        tracing::debug!("dropping results of superseded search");
        return;
    }

    let enrichment = match engine.load_enrichment(&key).await {
        Ok(records) => records,
        Err(e) => {
            tracing::warn!(error = %e, "showing results without analyses");
            Vec::new()
        }
    };

    let ranked = rank(merge(&hits, &enrichment));
    let (scored, unscored) = split_groups(&ranked);
    let (scored, unscored) = (scored.len(), unscored.len());
    if !shared.settle(generation, SessionState::Ready, ranked, None) {
        tracing::debug!("dropping results of superseded search");
        return;
    }
    tracing::info!(scored, unscored, "search results published");
    engine.trigger_once(&key, &hits, user_id);
}
