// src/harvest/sources/nrm.rs
//! NRM Svenska fjärilar. Old table-layout pages in Swedish: the description
//! cell either carries `Kännetecken:`/`Utbredning:` markers, or free text
//! where the first parenthesized line is the scientific-name line.

use async_trait::async_trait;
use once_cell::sync::Lazy;
use reqwest::Client;
use scraper::{Html, Selector};

use crate::harvest::error::HarvestError;
use crate::harvest::heuristics::{from_parenthesized_line, slice_between_markers, text_with_breaks};
use crate::harvest::sources::fetch_page;
use crate::harvest::types::{SourceAdapter, SourceResult, TaxonIdentifier, TaxonQuery};

pub const SOURCE_NAME: &str = "nrm.se";
const DEFAULT_BASE_URL: &str = "http://www2.nrm.se/en/svenska_fjarilar";

const START_MARKER: &str = "Kännetecken:";
const END_MARKER: &str = "Utbredning:";
const SEE_MORE_MARKER: &str = "Mer om denna art på";

static CELL: Lazy<Selector> = Lazy::new(|| Selector::parse("td").unwrap());

pub struct Nrm {
    client: Client,
    base_url: String,
}

impl Nrm {
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

/// The description cell is the `<td valign="TOP" align="LEFT">` of the
/// layout table; attribute values compare case-insensitively.
fn description_cell<'a>(document: &'a Html) -> Option<scraper::ElementRef<'a>> {
    document.select(&CELL).find(|td| {
        let attr = |name: &str| td.value().attr(name);
        attr("valign").is_some_and(|v| v.eq_ignore_ascii_case("top"))
            && attr("align").is_some_and(|v| v.eq_ignore_ascii_case("left"))
    })
}

#[async_trait]
impl SourceAdapter for Nrm {
    fn name(&self) -> &'static str {
        SOURCE_NAME
    }

    async fn fetch(
        &self,
        query: &TaxonQuery,
        _identifier: Option<&TaxonIdentifier>,
    ) -> Result<SourceResult, HarvestError> {
        let slug = query.name.trim().to_lowercase().replace(' ', "_");
        let Some(first_letter) = slug.chars().next() else {
            return Ok(SourceResult::empty(SOURCE_NAME));
        };
        let url = format!("{}/{}/{}.html", self.base_url, first_letter, slug);
        let body = fetch_page(&self.client, &url).await?;
        let document = Html::parse_document(&body);
        let cell = description_cell(&document)
            .ok_or_else(|| HarvestError::parse_miss(&url, "description cell"))?;

        let full_text = text_with_breaks(cell);
        // Marker slice keeps the start marker and excludes the end marker;
        // pages without markers fall back to the scientific-name line scan.
        let text = slice_between_markers(&full_text, START_MARKER, END_MARKER)
            .unwrap_or_else(|| from_parenthesized_line(&full_text, SEE_MORE_MARKER));

        Ok(SourceResult::new(SOURCE_NAME, text))
    }
}
