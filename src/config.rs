// src/config.rs
//! Process-wide configuration, built once in `main` and passed by reference.
//! No ambient globals: the reference table and the API key travel inside
//! explicit objects.

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::Deserialize;

/// Every outbound request shares this bound; exceeding it degrades to an
/// empty result like any other fetch failure.
pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// Env fallback when no secrets file is present.
const API_KEY_ENV: &str = "ARTFAKTA_API_KEY";

#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Dyntaxa `Taxon.csv` export (tab-separated).
    pub reference_table: PathBuf,
    /// JSON secrets file, see [`Credentials`].
    pub secrets: PathBuf,
    pub request_timeout: Duration,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            reference_table: PathBuf::from("dyntaxa/Taxon.csv"),
            secrets: PathBuf::from("secrets.json"),
            request_timeout: REQUEST_TIMEOUT,
        }
    }
}

/// Keys for the identifier-gated Artfakta API. Absence is non-fatal: the
/// adapter short-circuits to empty results for the whole run.
#[derive(Debug, Clone, Default)]
pub struct Credentials {
    pub artfakta_api_key: Option<String>,
}

#[derive(Debug, Deserialize)]
struct SecretsFile {
    artfakta_api_key: Option<String>,
}

impl Credentials {
    /// Load from a `secrets.json` (`{"artfakta_api_key": "..."}`), falling
    /// back to the `ARTFAKTA_API_KEY` env var when the file is missing or
    /// does not carry the key.
    pub fn load(path: &Path) -> Self {
        let from_file = std::fs::read_to_string(path)
            .ok()
            .and_then(|s| serde_json::from_str::<SecretsFile>(&s).ok())
            .and_then(|s| s.artfakta_api_key);
        let key = from_file
            .or_else(|| std::env::var(API_KEY_ENV).ok())
            .map(|k| k.trim().to_string())
            .filter(|k| !k.is_empty());
        if key.is_none() {
            tracing::warn!(
                path = %path.display(),
                "no Artfakta API key found, artfakta.se results will stay empty"
            );
        }
        Self {
            artfakta_api_key: key,
        }
    }
}
