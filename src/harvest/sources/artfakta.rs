// src/harvest/sources/artfakta.rs
//! Artfakta species-data API. The only identifier-gated source: without a
//! resolved Dyntaxa id (or without a subscription key) it answers empty
//! without touching the network.

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;

use crate::harvest::error::HarvestError;
use crate::harvest::types::{SourceAdapter, SourceResult, TaxonIdentifier, TaxonQuery};

pub const SOURCE_NAME: &str = "artfakta.se";
const DEFAULT_BASE_URL: &str = "https://api.artdatabanken.se";

const KEY_HEADER: &str = "Ocp-Apim-Subscription-Key";

#[derive(Debug, Deserialize)]
struct TaxonTexts {
    #[serde(rename = "speciesData")]
    species_data: Option<SpeciesData>,
}

#[derive(Debug, Deserialize)]
struct SpeciesData {
    characteristic: Option<String>,
}

pub struct Artfakta {
    client: Client,
    base_url: String,
    api_key: Option<String>,
}

impl Artfakta {
    pub fn new(client: Client, api_key: Option<String>) -> Self {
        Self::with_base_url(client, api_key, DEFAULT_BASE_URL)
    }

    pub fn with_base_url(
        client: Client,
        api_key: Option<String>,
        base_url: impl Into<String>,
    ) -> Self {
        Self {
            client,
            base_url: base_url.into(),
            api_key,
        }
    }
}

#[async_trait]
impl SourceAdapter for Artfakta {
    fn name(&self) -> &'static str {
        SOURCE_NAME
    }

    fn needs_identifier(&self) -> bool {
        true
    }

    async fn fetch(
        &self,
        query: &TaxonQuery,
        identifier: Option<&TaxonIdentifier>,
    ) -> Result<SourceResult, HarvestError> {
        let (Some(identifier), Some(api_key)) = (identifier, self.api_key.as_deref()) else {
            tracing::debug!(taxon = %query.name, "artfakta skipped: no identifier or no key");
            return Ok(SourceResult::empty(SOURCE_NAME));
        };

        let url = format!(
            "{}/information/v1/speciesdataservice/v1/speciesdata/texts?taxa={}",
            self.base_url, identifier.source_id
        );
        let response = self
            .client
            .get(&url)
            .header(KEY_HEADER, api_key)
            .header("Cache-Control", "no-cache")
            .send()
            .await
            .map_err(|e| HarvestError::from_request(&url, e))?;
        let status = response.status();
        if !status.is_success() {
            return Err(HarvestError::Status {
                url,
                status,
            });
        }
        let texts: Vec<TaxonTexts> = response
            .json()
            .await
            .map_err(|_| HarvestError::parse_miss(&url, "species data json"))?;

        // Empty array, missing speciesData or a null characteristic are
        // all "nothing recorded for this taxon", not failures.
        let characteristic = texts
            .first()
            .and_then(|t| t.species_data.as_ref())
            .and_then(|d| d.characteristic.as_deref())
            .unwrap_or_default();
        Ok(SourceResult::new(
            SOURCE_NAME,
            characteristic.trim().to_string(),
        ))
    }
}
