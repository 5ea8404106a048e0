// src/harvest/sources/ukmoths.rs
//! UKMoths species pages. Text lives in a fixed column div, either as
//! paragraphs or as loose text with `<br>` breaks; the leading authority
//! citation is trimmed off afterwards.

use async_trait::async_trait;
use once_cell::sync::Lazy;
use reqwest::Client;
use scraper::{Html, Selector};

use crate::harvest::error::HarvestError;
use crate::harvest::heuristics::{flat_text, strip_through_paren, text_with_breaks};
use crate::harvest::sources::fetch_page;
use crate::harvest::types::{SourceAdapter, SourceResult, TaxonIdentifier, TaxonQuery};

pub const SOURCE_NAME: &str = "ukmoths.org.uk";
const DEFAULT_BASE_URL: &str = "https://ukmoths.org.uk";

static SPECIES_TEXT: Lazy<Selector> =
    Lazy::new(|| Selector::parse("div.span7.speciestext").unwrap());
static PARAGRAPH: Lazy<Selector> = Lazy::new(|| Selector::parse("p").unwrap());

pub struct UkMoths {
    client: Client,
    base_url: String,
}

impl UkMoths {
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
impl SourceAdapter for UkMoths {
    fn name(&self) -> &'static str {
        SOURCE_NAME
    }

    async fn fetch(
        &self,
        query: &TaxonQuery,
        _identifier: Option<&TaxonIdentifier>,
    ) -> Result<SourceResult, HarvestError> {
        let slug = query.name.trim().to_lowercase().replace(' ', "-");
        let url = format!("{}/species/{}/", self.base_url, slug);
        let body = fetch_page(&self.client, &url).await?;
        let document = Html::parse_document(&body);
        let container = document
            .select(&SPECIES_TEXT)
            .next()
            .ok_or_else(|| HarvestError::parse_miss(&url, "species text column"))?;

        // Prefer paragraph children; fall back to the raw column text with
        // <br> breaks kept as newlines.
        let paragraphs: Vec<String> = container
            .select(&PARAGRAPH)
            .map(flat_text)
            .filter(|p| !p.is_empty())
            .collect();
        let text = if paragraphs.is_empty() {
            text_with_breaks(container).trim().to_string()
        } else {
            paragraphs.join("\n\n")
        };

        Ok(SourceResult::new(
            SOURCE_NAME,
            strip_through_paren(&text).to_string(),
        ))
    }
}
