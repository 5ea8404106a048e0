// src/harvest/sources/bamona.rs
//! Butterflies and Moths of North America. Two page shapes share one source
//! label: the taxonomy article used for families and genera, and the
//! field-pair species page. When both run in one record the later one wins.

use async_trait::async_trait;
use once_cell::sync::Lazy;
use reqwest::Client;
use scraper::{Html, Selector};

use crate::harvest::error::HarvestError;
use crate::harvest::heuristics::flat_text;
use crate::harvest::sources::fetch_page;
use crate::harvest::types::{SourceAdapter, SourceResult, TaxonIdentifier, TaxonQuery};

pub const SOURCE_NAME: &str = "butterfliesandmoths.org";
const DEFAULT_BASE_URL: &str = "https://www.butterfliesandmoths.org";

static BODY_FIELD: Lazy<Selector> = Lazy::new(|| {
    // Drupal body field; the full class signature keeps sidebar fields out.
    Selector::parse("div.field.field-name-body.field-type-text-with-summary.field-label-hidden")
        .unwrap()
});
static PANE_CONTENT: Lazy<Selector> = Lazy::new(|| Selector::parse("div.pane-content").unwrap());
static VIEWS_FIELD: Lazy<Selector> = Lazy::new(|| Selector::parse("div.views-field").unwrap());
static VIEWS_LABEL: Lazy<Selector> =
    Lazy::new(|| Selector::parse("strong.views-label").unwrap());
static FIELD_CONTENT: Lazy<Selector> =
    Lazy::new(|| Selector::parse("span.field-content").unwrap());

/// Taxonomy article page: one body container, flattened to a single line.
pub struct BamonaTaxonomy {
    client: Client,
    base_url: String,
}

impl BamonaTaxonomy {
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

#[async_trait]
impl SourceAdapter for BamonaTaxonomy {
    fn name(&self) -> &'static str {
        SOURCE_NAME
    }

    async fn fetch(
        &self,
        query: &TaxonQuery,
        _identifier: Option<&TaxonIdentifier>,
    ) -> Result<SourceResult, HarvestError> {
        let url = format!("{}/taxonomy/{}", self.base_url, query.name.trim());
        let body = fetch_page(&self.client, &url).await?;
        let document = Html::parse_document(&body);
        let container = document
            .select(&BODY_FIELD)
            .next()
            .ok_or_else(|| HarvestError::parse_miss(&url, "body field container"))?;
        Ok(SourceResult::new(SOURCE_NAME, flat_text(container)))
    }
}

/// Species page: labeled field blocks harvested as `"label: value"` lines.
pub struct BamonaSpecies {
    client: Client,
    base_url: String,
}

impl BamonaSpecies {
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

#[async_trait]
impl SourceAdapter for BamonaSpecies {
    fn name(&self) -> &'static str {
        SOURCE_NAME
    }

    async fn fetch(
        &self,
        query: &TaxonQuery,
        _identifier: Option<&TaxonIdentifier>,
    ) -> Result<SourceResult, HarvestError> {
        let slug = query.name.trim().replace(' ', "-");
        let url = format!("{}/species/{}", self.base_url, slug);
        let body = fetch_page(&self.client, &url).await?;
        let document = Html::parse_document(&body);
        let block = document
            .select(&PANE_CONTENT)
            .next()
            .ok_or_else(|| HarvestError::parse_miss(&url, "pane-content block"))?;

        // Field blocks need both a label and a non-empty value to count;
        // a block present with no pairs is a legitimate empty result.
        let mut lines = Vec::new();
        for field in block.select(&VIEWS_FIELD) {
            let (Some(label_el), Some(value_el)) = (
                field.select(&VIEWS_LABEL).next(),
                field.select(&FIELD_CONTENT).next(),
            ) else {
                continue;
            };
            let label = flat_text(label_el);
            let value = flat_text(value_el);
            if !value.is_empty() {
                lines.push(format!("{}: {}", label.trim_end_matches(':'), value));
            }
        }
        Ok(SourceResult::new(SOURCE_NAME, lines.join("\n")))
    }
}
