// src/harvest/sources/mod.rs
//! One adapter per external source. Each holds fixed configuration only
//! (base URL, shared client, credentials) and performs exactly one outbound
//! request per call — no retries, no state across calls.

pub mod adw;
pub mod artfakta;
pub mod bamona;
pub mod nrm;
pub mod ukmoths;
pub mod vilkenart;
pub mod wikipedia;

use reqwest::Client;

use crate::harvest::error::HarvestError;

/// GET a page and hand back its body; non-2xx and transport errors map to
/// the typed failure taxonomy.
pub(crate) async fn fetch_page(client: &Client, url: &str) -> Result<String, HarvestError> {
    let response = client
        .get(url)
        .send()
        .await
        .map_err(|e| HarvestError::from_request(url, e))?;
    let status = response.status();
    if !status.is_success() {
        return Err(HarvestError::Status {
            url: url.to_string(),
            status,
        });
    }
    response
        .text()
        .await
        .map_err(|e| HarvestError::from_request(url, e))
}
