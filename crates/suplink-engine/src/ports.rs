//! Seams between the engine and the outside world.
//!
//! Each port returns a `'static` boxed future so implementations can be held
//! as trait objects and their calls spawned onto the runtime.

use std::sync::Arc;

use futures::future::{BoxFuture, FutureExt};
use sqlx::PgPool;
use suplink_client::{SaveSearchRequest, SaveSearchResponse, SuplinkClient};
use suplink_core::{AdvisoryItem, EnrichmentRecord, RawHit, SearchKey};

use crate::error::SourceError;

/// Raw supplier hits for a search.
pub trait HitSource: Send + Sync {
    fn fetch_hits(&self, key: SearchKey) -> BoxFuture<'static, Result<Vec<RawHit>, SourceError>>;
}

/// Every stored supplier analysis, unfiltered.
pub trait EnrichmentStore: Send + Sync {
    fn load_all(&self) -> BoxFuture<'static, Result<Vec<EnrichmentRecord>, SourceError>>;
}

/// Advisory notes for a product.
pub trait AdvisorySource: Send + Sync {
    fn fetch_advisories(
        &self,
        product: String,
    ) -> BoxFuture<'static, Result<Vec<AdvisoryItem>, SourceError>>;
}

/// Persists a search and starts supplier analysis for it.
pub trait AnalysisTrigger: Send + Sync {
    fn save_and_analyze(
        &self,
        request: SaveSearchRequest,
    ) -> BoxFuture<'static, Result<SaveSearchResponse, SourceError>>;
}

/// The collaborators a [`crate::ConsolidationEngine`] is built from.
#[derive(Clone)]
pub struct Ports {
    pub hits: Arc<dyn HitSource>,
    pub enrichment: Arc<dyn EnrichmentStore>,
    pub advisories: Arc<dyn AdvisorySource>,
    pub trigger: Arc<dyn AnalysisTrigger>,
}

impl Ports {
    /// Wires every HTTP-backed port to `client` and reads analyses from
    /// `enrichment`.
    #[must_use]
    pub fn from_client(client: &SuplinkClient, enrichment: Arc<dyn EnrichmentStore>) -> Self {
        let client = Arc::new(client.clone());
        Self {
            hits: client.clone(),
            enrichment,
            advisories: client.clone(),
            trigger: client,
        }
    }
}

impl HitSource for SuplinkClient {
    fn fetch_hits(&self, key: SearchKey) -> BoxFuture<'static, Result<Vec<RawHit>, SourceError>> {
        let client = self.clone();
        async move { client.search(&key).await.map_err(SourceError::from) }.boxed()
    }
}

impl AdvisorySource for SuplinkClient {
    fn fetch_advisories(
        &self,
        product: String,
    ) -> BoxFuture<'static, Result<Vec<AdvisoryItem>, SourceError>> {
        let client = self.clone();
        async move { client.advisories(&product).await.map_err(SourceError::from) }.boxed()
    }
}

impl AnalysisTrigger for SuplinkClient {
    fn save_and_analyze(
        &self,
        request: SaveSearchRequest,
    ) -> BoxFuture<'static, Result<SaveSearchResponse, SourceError>> {
        let client = self.clone();
        async move {
            client
                .save_search_and_analyze(&request)
                .await
                .map_err(SourceError::from)
        }
        .boxed()
    }
}

/// Reads analyses from the `suplink_discovered` table.
#[derive(Clone)]
pub struct PgEnrichmentStore {
    pool: PgPool,
}

impl PgEnrichmentStore {
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

impl EnrichmentStore for PgEnrichmentStore {
    fn load_all(&self) -> BoxFuture<'static, Result<Vec<EnrichmentRecord>, SourceError>> {
        let pool = self.pool.clone();
        async move {
            let rows = suplink_db::list_enrichment_rows(&pool).await?;
            Ok::<_, SourceError>(rows.into_iter().map(EnrichmentRecord::from).collect())
        }
        .boxed()
    }
}

/// Store used when no database is configured: never has any analyses.
#[derive(Debug, Clone, Copy, Default)]
pub struct EmptyEnrichmentStore;

impl EnrichmentStore for EmptyEnrichmentStore {
    fn load_all(&self) -> BoxFuture<'static, Result<Vec<EnrichmentRecord>, SourceError>> {
        futures::future::ready(Ok(Vec::new())).boxed()
    }
}
