pub mod config;
pub mod models;
pub mod reconcile;
pub mod render;
pub mod source;
pub mod store;
pub mod utils;

use anyhow::Context;
use chrono::Utc;
use tracing::{info, warn};

use config::AppConfig;
use reconcile::Reconciler;
use source::{JsonScheduleSource, ScheduleSource};
use store::EventStore;

/// Counters from one reconciliation run.
#[derive(Debug)]
pub struct RunSummary {
    pub ingested: usize,
    pub persisted: usize,
    pub displayed: usize,
}

/// One full cycle: load store → fetch batch → reconcile → persist →
/// render. Source and store failures degrade (empty batch, backup or
/// empty store); only an unwritable output page fails the run, because
/// without it the run produced nothing.
pub fn run(config: &AppConfig) -> anyhow::Result<RunSummary> {
    let store = EventStore::new(&config.store_path, &config.backup_path);
    let previous = store.load();
    info!("loaded {} events from store", previous.len());

    let source = JsonScheduleSource::new(config.source_url.clone());
    let batch = match source.fetch() {
        Ok(batch) => {
            info!("fetched {} raw events", batch.len());
            batch
        }
        Err(err) => {
            warn!("schedule source unavailable, reconciling stored events only: {err}");
            Vec::new()
        }
    };
    let ingested = batch.len();

    let outcome = Reconciler::new(config).run(Utc::now().naive_utc(), previous, batch);
    let summary = RunSummary {
        ingested,
        persisted: outcome.persisted.len(),
        displayed: outcome.display.values().map(Vec::len).sum(),
    };

    if let Err(err) = store.save(&outcome.persisted) {
        warn!("could not persist store, next run will reuse the old one: {err}");
    }

    let page = render::render_page(&outcome.display, Utc::now());
    render::write_page(&config.output_path, &page)
        .with_context(|| format!("writing page to {:?}", config.output_path))?;
    info!(
        "run complete: {} ingested, {} persisted, {} displayed",
        summary.ingested, summary.persisted, summary.displayed
    );

    Ok(summary)
}
