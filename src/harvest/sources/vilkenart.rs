// src/harvest/sources/vilkenart.rs
//! Vilken art? — Swedish higher-taxa pages. One ASP.NET panel holds the
//! whole description text.

use async_trait::async_trait;
use once_cell::sync::Lazy;
use reqwest::Client;
use scraper::{Html, Selector};

use crate::harvest::error::HarvestError;
use crate::harvest::heuristics::flat_text;
use crate::harvest::sources::fetch_page;
use crate::harvest::types::{SourceAdapter, SourceResult, TaxonIdentifier, TaxonQuery};

pub const SOURCE_NAME: &str = "vilkenart.se";
const DEFAULT_BASE_URL: &str = "https://www.vilkenart.se";

static TAXON_PANEL: Lazy<Selector> =
    Lazy::new(|| Selector::parse("div#ctl00_ContentPlaceHolder1_pnlTaxonText").unwrap());

pub struct Vilkenart {
    client: Client,
    base_url: String,
}

impl Vilkenart {
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
impl SourceAdapter for Vilkenart {
    fn name(&self) -> &'static str {
        SOURCE_NAME
    }

    async fn fetch(
        &self,
        query: &TaxonQuery,
        _identifier: Option<&TaxonIdentifier>,
    ) -> Result<SourceResult, HarvestError> {
        let url = format!("{}/HogreTaxa.aspx?Namn={}", self.base_url, query.name.trim());
        let body = fetch_page(&self.client, &url).await?;
        let document = Html::parse_document(&body);
        let panel = document
            .select(&TAXON_PANEL)
            .next()
            .ok_or_else(|| HarvestError::parse_miss(&url, "taxon text panel"))?;
        Ok(SourceResult::new(SOURCE_NAME, flat_text(panel)))
    }
}
