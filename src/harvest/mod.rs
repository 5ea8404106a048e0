// src/harvest/mod.rs
//! The multi-source harvest pipeline: route adapters by rank, resolve the
//! reference-table identifier once per query, fetch every routed source
//! concurrently, and merge the partial results into one record. A failing
//! source degrades to an empty result and never disturbs its siblings.

pub mod error;
pub mod heuristics;
pub mod routing;
pub mod sources;
pub mod types;

use anyhow::Context;
use futures::future::join_all;

use crate::config::{AppConfig, Credentials};
use crate::harvest::routing::Registry;
use crate::harvest::types::{Rank, SourceResult, TaxonQuery, TaxonRecord};
use crate::resolver::ReferenceTable;

pub struct Harvester {
    table: ReferenceTable,
    registry: Registry,
}

impl Harvester {
    pub fn new(table: ReferenceTable, registry: Registry) -> Self {
        Self { table, registry }
    }

    /// Wire up the production pipeline: reference table, credentials and a
    /// shared HTTP client with the per-request timeout.
    pub fn from_config(cfg: &AppConfig) -> anyhow::Result<Self> {
        let table = ReferenceTable::load_or_empty(&cfg.reference_table);
        let credentials = Credentials::load(&cfg.secrets);
        let client = reqwest::Client::builder()
            .timeout(cfg.request_timeout)
            .build()
            .context("building http client")?;
        Ok(Self::new(table, Registry::standard(&client, &credentials)))
    }

    /// Fetch every routed source for one taxon and merge the outcomes.
    /// Always returns a record; a taxon nobody knows yields all-empty
    /// results, not an error.
    pub async fn aggregate(&self, query: &TaxonQuery) -> TaxonRecord {
        let route = self.registry.route(query.rank);

        // Resolve at most once per query, and only when the route has an
        // identifier-gated adapter. Genus lookups are rank-restricted;
        // species lookups take any row.
        let identifier = if route.iter().any(|a| a.needs_identifier()) {
            let rank_filter = match query.rank {
                Rank::Genus => Some(Rank::Genus),
                _ => None,
            };
            let resolved = self.table.resolve(&query.name, rank_filter);
            if resolved.is_none() {
                tracing::debug!(taxon = %query.name, "no reference-table identifier");
            }
            resolved
        } else {
            None
        };

        let fetches = route.iter().map(|adapter| {
            let identifier = identifier.as_ref();
            async move {
                match adapter.fetch(query, identifier).await {
                    Ok(result) => result,
                    Err(e) => {
                        tracing::warn!(
                            source = adapter.name(),
                            taxon = %query.name,
                            error = %e,
                            "source failed, keeping an empty result"
                        );
                        SourceResult::empty(adapter.name())
                    }
                }
            }
        });
        let outcomes = join_all(fetches).await;

        // Keyed by source name, last write wins, first occurrence keeps
        // its position.
        let mut results: Vec<SourceResult> = Vec::with_capacity(outcomes.len());
        for outcome in outcomes {
            match results.iter_mut().find(|r| r.source == outcome.source) {
                Some(slot) => *slot = outcome,
                None => results.push(outcome),
            }
        }

        TaxonRecord {
            taxon: query.name.clone(),
            rank: query.rank,
            results,
        }
    }
}
