//! One full refresh of the board.
//!
//! A run clears the board, loads each brand in registry order, renders one
//! card per brand whatever the outcome, and finally sets the global label
//! from the newest `generated_at` seen. A failing brand only affects its own
//! card. A feed whose `generated_at` cannot be parsed counts as failed.

use crate::dates::{format_date, normalize_timestamp};
use crate::error::FeedError;
use crate::loader::LoadFeed;
use crate::models::FeedPayload;
use crate::outputs::page::Board;
use crate::registry::BrandRegistry;
use crate::render::render;
use chrono::TimeZone;
use futures::future::join_all;
use std::time::Instant;
use tracing::{info, instrument, warn};

/// How sources are fetched within a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FetchStrategy {
    /// Await each source before starting the next.
    #[default]
    Sequential,
    /// Fetch every source at once and join before rendering.
    Concurrent,
}

/// Counts and the newest timestamp from a completed run.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct RunReport {
    pub loaded: usize,
    pub failed: usize,
    /// Newest normalized `generated_at`, if any source supplied one.
    pub newest: Option<String>,
}

/// Keep the greater of two normalized timestamps. Equal values are no update.
fn track_newest(newest: &mut Option<String>, candidate: String) {
    if newest.as_deref().is_none_or(|current| candidate.as_str() > current) {
        *newest = Some(candidate);
    }
}

/// Rebuild `board` from every brand in `registry`.
#[instrument(level = "info", skip_all, fields(brands = registry.len(), ?strategy))]
pub async fn refresh<L, Tz>(
    registry: &BrandRegistry,
    loader: &L,
    board: &mut Board,
    strategy: FetchStrategy,
    tz: &Tz,
) -> RunReport
where
    L: LoadFeed,
    Tz: TimeZone,
    Tz::Offset: std::fmt::Display,
{
    let t0 = Instant::now();
    board.clear();

    let outcomes = match strategy {
        FetchStrategy::Sequential => {
            let mut outcomes = Vec::with_capacity(registry.len());
            for source in registry.iter() {
                outcomes.push(loader.load(source).await);
            }
            outcomes
        }
        // join_all yields results in input order, so cards keep registry order.
        FetchStrategy::Concurrent => {
            join_all(registry.iter().map(|source| loader.load(source))).await
        }
    };

    let mut report = RunReport::default();
    for (source, outcome) in registry.iter().zip(outcomes) {
        let outcome = outcome.and_then(|payload| {
            let invalid = payload.generated_at().and_then(|generated_at| {
                match normalize_timestamp(generated_at) {
                    Some(normalized) => {
                        track_newest(&mut report.newest, normalized);
                        None
                    }
                    None => Some(generated_at.to_string()),
                }
            });
            match invalid {
                Some(value) => Err(FeedError::Timestamp {
                    location: source.location.clone(),
                    value,
                }),
                None => Ok(payload),
            }
        });
        let payload = match outcome {
            Ok(payload) => {
                report.loaded += 1;
                payload
            }
            Err(e) => {
                report.failed += 1;
                warn!(brand = %source.key, error = %e, "Rendering error card");
                FeedPayload::failed(e.to_string())
            }
        };
        board.mount(render(&source.name, &payload, tz));
    }

    match &report.newest {
        Some(newest) => board.set_last_updated(format!(
            "Last updated: {}",
            format_date(Some(newest.as_str()), tz)
        )),
        None => board.set_last_updated(""),
    }

    info!(
        loaded = report.loaded,
        failed = report.failed,
        newest = ?report.newest,
        elapsed_ms = t0.elapsed().as_millis(),
        "Board refreshed"
    );
    report
}
