// src/harvest/sources/adw.rs
//! Animal Diversity Web. Sections are anchored by `<h3>` headings; the
//! physical description is every paragraph between its heading and the
//! next one.

use async_trait::async_trait;
use once_cell::sync::Lazy;
use reqwest::Client;
use scraper::{ElementRef, Html, Selector};

use crate::harvest::error::HarvestError;
use crate::harvest::heuristics::flat_text;
use crate::harvest::sources::fetch_page;
use crate::harvest::types::{SourceAdapter, SourceResult, TaxonIdentifier, TaxonQuery};

pub const SOURCE_NAME: &str = "animaldiversity.org";
const DEFAULT_BASE_URL: &str = "https://animaldiversity.org";

static SECTION_HEADING: Lazy<Selector> =
    Lazy::new(|| Selector::parse("h3#physical_description").unwrap());

pub struct Adw {
    client: Client,
    base_url: String,
}

impl Adw {
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

/// Sibling paragraphs after the heading, up to the next same-level heading.
fn section_paragraphs(heading: ElementRef<'_>) -> Vec<String> {
    let mut paragraphs = Vec::new();
    for sibling in heading.next_siblings() {
        let Some(el) = ElementRef::wrap(sibling) else {
            continue;
        };
        match el.value().name() {
            "h3" => break,
            "p" => {
                let text = flat_text(el);
                if !text.is_empty() {
                    paragraphs.push(text);
                }
            }
            _ => {}
        }
    }
    paragraphs
}

#[async_trait]
impl SourceAdapter for Adw {
    fn name(&self) -> &'static str {
        SOURCE_NAME
    }

    async fn fetch(
        &self,
        query: &TaxonQuery,
        _identifier: Option<&TaxonIdentifier>,
    ) -> Result<SourceResult, HarvestError> {
        let slug = query.name.trim().replace(' ', "_");
        let url = format!("{}/accounts/{}/", self.base_url, slug);
        let body = fetch_page(&self.client, &url).await?;
        let document = Html::parse_document(&body);
        let heading = document
            .select(&SECTION_HEADING)
            .next()
            .ok_or_else(|| HarvestError::parse_miss(&url, "physical description heading"))?;
        Ok(SourceResult::new(
            SOURCE_NAME,
            section_paragraphs(heading).join("\n\n"),
        ))
    }
}
