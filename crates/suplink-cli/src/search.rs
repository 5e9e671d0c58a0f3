//! `search` and `analyzed` subcommand handlers.
//!
//! `search` runs one search session and prints the outcome. Advisory tips
//! are printed to stderr while the search is loading; the results go to
//! stdout once the session settles. `analyzed` reads back the suppliers the
//! analysis pipeline stored for a saved search.

use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use suplink_client::SuplinkClient;
use suplink_core::{AppConfig, SearchMode, SearchQuery, SessionState, SupplierRecord};
use suplink_engine::{
    ConsolidationEngine, EmptyEnrichmentStore, EnrichmentStore, PgEnrichmentStore, Ports,
    SearchSessionController, SessionView, TokioScheduler,
};

/// How often the loading loop checks for a new advisory tip.
const ADVISORY_POLL: Duration = Duration::from_millis(250);

#[derive(Debug)]
pub(crate) struct SearchArgs {
    pub product: String,
    pub country: String,
    pub mode: SearchMode,
    pub user_id: Option<String>,
    pub json: bool,
}

/// Run a search to completion and print the grouped results.
///
/// # Errors
///
/// Returns an error if the client or database pool cannot be built, the
/// query is blank, or the search itself fails.
pub(crate) async fn run_search(config: &AppConfig, args: SearchArgs) -> anyhow::Result<()> {
    let client = build_client(config)?;

    let enrichment: Arc<dyn EnrichmentStore> = if config.database_url.is_some() {
        let pool = suplink_db::connect_pool_from_config(config).await?;
        Arc::new(PgEnrichmentStore::new(pool))
    } else {
        tracing::info!("DATABASE_URL not set; results will not include stored analyses");
        Arc::new(EmptyEnrichmentStore)
    };

    let engine = Arc::new(ConsolidationEngine::new(Ports::from_client(
        &client, enrichment,
    )));
    let controller = SearchSessionController::new(
        Arc::clone(&engine),
        Arc::new(TokioScheduler::current()),
        Duration::from_millis(config.advisory_interval_ms),
    );

    let mut query = SearchQuery::new(args.product, args.country).with_mode(args.mode);
    if let Some(user_id) = args.user_id.or_else(|| config.user_id.clone()) {
        query = query.with_user_id(user_id);
    }
    controller.submit(query)?;

    let view = wait_showing_advisories(&controller).await;
    let outcome = print_view(&view, args.json);

    // The save-and-analyze request is fire-and-forget inside the engine;
    // the process still has to outlive it.
    engine.drain_triggers().await;
    outcome
}

/// Print the analyzed suppliers of a saved search.
///
/// # Errors
///
/// Returns an error if the client cannot be built or the request fails.
pub(crate) async fn run_analyzed(
    config: &AppConfig,
    search_id: &str,
    json: bool,
) -> anyhow::Result<()> {
    let client = build_client(config)?;
    let records: Vec<SupplierRecord> = client
        .suppliers_by_search(search_id)
        .await
        .with_context(|| format!("failed to load suppliers for search {search_id}"))?
        .iter()
        .map(SupplierRecord::from_enrichment)
        .collect();

    if json {
        println!("{}", serde_json::to_string_pretty(&records)?);
    } else if records.is_empty() {
        println!("no analyzed suppliers yet for search {search_id}");
    } else {
        print_analyzed(&records);
    }
    Ok(())
}

fn build_client(config: &AppConfig) -> anyhow::Result<SuplinkClient> {
    let base_url = config.require_api_base_url()?;
    SuplinkClient::new(base_url, config.request_timeout_secs, &config.user_agent)
        .context("failed to build Suplink client")
}

async fn wait_showing_advisories(controller: &SearchSessionController) -> SessionView {
    let settled = controller.wait_settled();
    tokio::pin!(settled);
    let mut ticker = tokio::time::interval(ADVISORY_POLL);
    let mut shown: Option<String> = None;

    loop {
        tokio::select! {
            view = &mut settled => return view,
            _ = ticker.tick() => {
                let Some(item) = controller.current_advisory() else {
                    continue;
                };
                if shown.as_deref() != Some(item.title.as_str()) {
                    eprintln!("tip: {}\n     {}", item.title, item.body);
                    shown = Some(item.title);
                }
            }
        }
    }
}

fn print_view(view: &SessionView, json: bool) -> anyhow::Result<()> {
    match view.state {
        SessionState::Ready => {}
        SessionState::Failed => {
            anyhow::bail!(view
                .error
                .clone()
                .unwrap_or_else(|| "search failed".to_owned()));
        }
        SessionState::Idle | SessionState::Loading => {
            anyhow::bail!("search ended in unexpected state {}", view.state);
        }
    }

    if json {
        println!("{}", serde_json::to_string_pretty(&view.results)?);
        return Ok(());
    }

    if view.results.is_empty() {
        println!("no suppliers found");
        return Ok(());
    }

    let analyzed = view.previously_analyzed();
    if !analyzed.is_empty() {
        println!("PREVIOUSLY ANALYZED ({})", analyzed.len());
        print_analyzed(analyzed);
        println!();
    }

    let fresh = view.new_suppliers();
    if !fresh.is_empty() {
        println!("NEW SUPPLIERS ({})", fresh.len());
        println!("{:<32}{:<32}URL", "NAME", "CONTACT");
        for record in fresh {
            println!(
                "{:<32}{:<32}{}",
                truncate(&record.display_name, 30),
                truncate(&contact(record), 30),
                record.identity
            );
        }
    }
    Ok(())
}

fn print_analyzed(records: &[SupplierRecord]) {
    println!("{:<7}{:<7}{:<32}URL", "SCORE", "STARS", "NAME");
    for record in records {
        println!(
            "{:<7}{:<7}{:<32}{}",
            fmt_opt(record.overall_score),
            fmt_opt(record.star_rating),
            truncate(&record.display_name, 30),
            record.identity
        );
    }
}

fn fmt_opt(value: Option<i32>) -> String {
    value.map_or_else(|| "\u{2014}".to_owned(), |v| v.to_string())
}

fn contact(record: &SupplierRecord) -> String {
    record
        .email
        .as_deref()
        .or(record.phone.as_deref())
        .unwrap_or("\u{2014}")
        .to_owned()
}

/// Truncate to at most `max` characters, marking the cut with `…`.
fn truncate(value: &str, max: usize) -> String {
    if value.chars().count() <= max {
        return value.to_owned();
    }
    let mut cut: String = value.chars().take(max.saturating_sub(1)).collect();
    cut.push('\u{2026}');
    cut
}
