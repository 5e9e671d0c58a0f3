//! In-memory port fakes shared by the controller tests.

#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use futures::future::{BoxFuture, FutureExt};
use suplink_client::{SaveSearchRequest, SaveSearchResponse};
use suplink_core::{AdvisoryItem, EnrichmentRecord, RawHit, SearchKey};
use suplink_engine::{
    AdvisorySource, AnalysisTrigger, ConsolidationEngine, EnrichmentStore, HitSource, Ports,
    SearchSessionController, SourceError, TokioScheduler, ADVISORY_INTERVAL,
};
use tokio::sync::oneshot;

type HitsReply = Result<Vec<RawHit>, String>;

/// Search API fake. Answers with `reply` unless a gate is registered for the
/// product, in which case the call waits until the gate is released.
pub struct FakeHits {
    reply: HitsReply,
    gates: Mutex<HashMap<String, oneshot::Receiver<HitsReply>>>,
    calls: AtomicUsize,
}

impl FakeHits {
    pub fn returning(hits: Vec<RawHit>) -> Self {
        Self {
            reply: Ok(hits),
            gates: Mutex::new(HashMap::new()),
            calls: AtomicUsize::new(0),
        }
    }

    pub fn failing(message: &str) -> Self {
        Self {
            reply: Err(message.to_owned()),
            ..Self::returning(Vec::new())
        }
    }

    /// Holds the next call for `product` until the returned sender fires.
    pub fn gate(&self, product: &str) -> oneshot::Sender<HitsReply> {
        let (release, gate) = oneshot::channel();
        self.gates.lock().unwrap().insert(product.to_lowercase(), gate);
        release
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl HitSource for FakeHits {
    fn fetch_hits(&self, key: SearchKey) -> BoxFuture<'static, Result<Vec<RawHit>, SourceError>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let gate = self.gates.lock().unwrap().remove(key.product());
        let reply = self.reply.clone();
        async move {
            let reply = match gate {
                Some(gate) => gate.await.unwrap_or_else(|_| Err("gate dropped".to_owned())),
                None => reply,
            };
            reply.map_err(SourceError::from)
        }
        .boxed()
    }
}

pub struct FakeEnrichment {
    records: Result<Vec<EnrichmentRecord>, String>,
}

impl FakeEnrichment {
    pub fn with(records: Vec<EnrichmentRecord>) -> Self {
        Self {
            records: Ok(records),
        }
    }

    pub fn failing() -> Self {
        Self {
            records: Err("connection refused".to_owned()),
        }
    }
}

impl EnrichmentStore for FakeEnrichment {
    fn load_all(&self) -> BoxFuture<'static, Result<Vec<EnrichmentRecord>, SourceError>> {
        futures::future::ready(self.records.clone().map_err(SourceError::from)).boxed()
    }
}

type AdvisoriesReply = Result<Vec<AdvisoryItem>, String>;

/// Advisory API fake. Answers with `items` unless a gate is registered for
/// the product.
pub struct FakeAdvisories {
    items: AdvisoriesReply,
    gates: Mutex<HashMap<String, oneshot::Receiver<AdvisoriesReply>>>,
}

impl FakeAdvisories {
    pub fn with(items: Vec<AdvisoryItem>) -> Self {
        Self::replying(Ok(items))
    }

    pub fn none() -> Self {
        Self::with(Vec::new())
    }

    pub fn failing() -> Self {
        Self::replying(Err("faq endpoint returned 500".to_owned()))
    }

    fn replying(items: AdvisoriesReply) -> Self {
        Self {
            items,
            gates: Mutex::new(HashMap::new()),
        }
    }

    /// Holds the next call for `product` until the returned sender fires.
    pub fn gate(&self, product: &str) -> oneshot::Sender<AdvisoriesReply> {
        let (release, gate) = oneshot::channel();
        self.gates.lock().unwrap().insert(product.to_lowercase(), gate);
        release
    }
}

impl AdvisorySource for FakeAdvisories {
    fn fetch_advisories(
        &self,
        product: String,
    ) -> BoxFuture<'static, Result<Vec<AdvisoryItem>, SourceError>> {
        let gate = self.gates.lock().unwrap().remove(&product.to_lowercase());
        let items = self.items.clone();
        async move {
            let items = match gate {
                Some(gate) => gate.await.unwrap_or_else(|_| Err("gate dropped".to_owned())),
                None => items,
            };
            items.map_err(SourceError::from)
        }
        .boxed()
    }
}

/// Records each save-and-analyze request at call time.
#[derive(Default)]
pub struct RecordingTrigger {
    requests: Mutex<Vec<SaveSearchRequest>>,
    fail: bool,
}

impl RecordingTrigger {
    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Self::default()
        }
    }

    pub fn requests(&self) -> Vec<SaveSearchRequest> {
        self.requests.lock().unwrap().clone()
    }
}

impl AnalysisTrigger for RecordingTrigger {
    fn save_and_analyze(
        &self,
        request: SaveSearchRequest,
    ) -> BoxFuture<'static, Result<SaveSearchResponse, SourceError>> {
        self.requests.lock().unwrap().push(request);
        let reply = if self.fail {
            Err(SourceError::from("save-search-and-analyze returned 500"))
        } else {
            Ok(SaveSearchResponse {
                message: Some("Search saved".to_owned()),
                new_urls_count: Some(1),
                ..SaveSearchResponse::default()
            })
        };
        futures::future::ready(reply).boxed()
    }
}

pub struct Harness {
    pub hits: Arc<FakeHits>,
    pub advisories: Arc<FakeAdvisories>,
    pub trigger: Arc<RecordingTrigger>,
    pub engine: Arc<ConsolidationEngine>,
}

impl Harness {
    pub fn new(hits: FakeHits, enrichment: FakeEnrichment, advisories: FakeAdvisories) -> Self {
        Self::with_trigger(hits, enrichment, advisories, RecordingTrigger::default())
    }

    pub fn with_trigger(
        hits: FakeHits,
        enrichment: FakeEnrichment,
        advisories: FakeAdvisories,
        trigger: RecordingTrigger,
    ) -> Self {
        let hits = Arc::new(hits);
        let advisories = Arc::new(advisories);
        let trigger = Arc::new(trigger);
        let engine = Arc::new(ConsolidationEngine::new(Ports {
            hits: hits.clone(),
            enrichment: Arc::new(enrichment),
            advisories: advisories.clone(),
            trigger: trigger.clone(),
        }));
        Self {
            hits,
            advisories,
            trigger,
            engine,
        }
    }

    /// A controller on the current runtime sharing this harness's engine.
    pub fn controller(&self) -> SearchSessionController {
        SearchSessionController::new(
            Arc::clone(&self.engine),
            Arc::new(TokioScheduler::current()),
            ADVISORY_INTERVAL,
        )
    }
}

pub fn hit(url: &str, name: &str) -> RawHit {
    RawHit::new(url, name)
}

/// A scored analysis stored for `query` in `country`.
pub fn analysis(url: &str, score: i32, query: &str, country: &str) -> EnrichmentRecord {
    EnrichmentRecord {
        search_query: Some(query.to_owned()),
        search_country: Some(country.to_owned()),
        ..EnrichmentRecord::new(url).with_score(score)
    }
}

pub fn advisory(n: usize) -> Vec<AdvisoryItem> {
    (0..n)
        .map(|i| AdvisoryItem::new(format!("Tip {i}"), format!("Advice {i}")))
        .collect()
}

/// Lets spawned session tasks run up to their next pending point.
pub async fn run_pending_tasks() {
    for _ in 0..16 {
        tokio::task::yield_now().await;
    }
}

pub const JUST_PAST_INTERVAL: Duration = Duration::from_millis(10_001);
