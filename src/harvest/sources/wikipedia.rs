// src/harvest/sources/wikipedia.rs
//! Wikipedia plaintext extracts via the MediaWiki action API. Articles are
//! scanned for a description-like section; species pages also accept the
//! lepidopterist's "Imago" heading. Without a usable section the whole
//! article text stands in.

use std::collections::HashMap;

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;

use crate::harvest::error::HarvestError;
use crate::harvest::heuristics::section_with_keyword;
use crate::harvest::types::{Rank, SourceAdapter, SourceResult, TaxonIdentifier, TaxonQuery};

pub const SOURCE_NAME: &str = "wikipedia.org";
const DEFAULT_BASE_URL: &str = "https://en.wikipedia.org";

/// Sections shorter than this are headings-only stubs, not descriptions.
const MIN_SECTION_LEN: usize = 20;

#[derive(Debug, Deserialize)]
struct ApiResponse {
    query: Option<Query>,
}

#[derive(Debug, Deserialize)]
struct Query {
    #[serde(default)]
    pages: HashMap<String, Page>,
}

#[derive(Debug, Deserialize)]
struct Page {
    extract: Option<String>,
    missing: Option<serde_json::Value>,
    #[serde(default)]
    pageprops: HashMap<String, serde_json::Value>,
}

pub struct Wikipedia {
    client: Client,
    base_url: String,
}

impl Wikipedia {
    pub fn new(client: Client) -> Self {
        Self::with_base_url(client, DEFAULT_BASE_URL)
    }

    pub fn with_base_url(client: Client, base_url: impl Into<String>) -> Self {
        Self {
            client,
            base_url: base_url.into(),
        }
    }
}

fn section_keywords(rank: Rank) -> &'static [&'static str] {
    match rank {
        Rank::Species => &["description", "imago"],
        _ => &["description"],
    }
}

#[async_trait]
impl SourceAdapter for Wikipedia {
    fn name(&self) -> &'static str {
        SOURCE_NAME
    }

    async fn fetch(
        &self,
        query: &TaxonQuery,
        _identifier: Option<&TaxonIdentifier>,
    ) -> Result<SourceResult, HarvestError> {
        let url = format!("{}/w/api.php", self.base_url);
        let response = self
            .client
            .get(&url)
            .query(&[
                ("action", "query"),
                ("format", "json"),
                ("prop", "extracts|pageprops"),
                ("explaintext", "1"),
                ("redirects", "1"),
                ("titles", query.name.trim()),
            ])
            .send()
            .await
            .map_err(|e| HarvestError::from_request(&url, e))?;
        let status = response.status();
        if !status.is_success() {
            return Err(HarvestError::Status { url, status });
        }
        let api: ApiResponse = response
            .json()
            .await
            .map_err(|_| HarvestError::parse_miss(&url, "query response json"))?;

        let page = api
            .query
            .and_then(|q| q.pages.into_values().next())
            .ok_or_else(|| HarvestError::parse_miss(&url, "page entry"))?;
        if page.missing.is_some() {
            return Err(HarvestError::parse_miss(&url, "page not found"));
        }
        if page.pageprops.contains_key("disambiguation") {
            return Err(HarvestError::parse_miss(&url, "disambiguation page"));
        }
        let content = page
            .extract
            .ok_or_else(|| HarvestError::parse_miss(&url, "plaintext extract"))?;

        let text = section_with_keyword(&content, section_keywords(query.rank), MIN_SECTION_LEN)
            .unwrap_or_else(|| content.trim().to_string());
        Ok(SourceResult::new(SOURCE_NAME, text))
    }
}
