// src/harvest/error.rs
use reqwest::StatusCode;

/// Failure taxonomy for a single adapter call. All variants degrade to an
/// empty `SourceResult` at the aggregator boundary; the typed split exists
/// so tests can tell a timeout from a redesigned page.
#[derive(Debug, thiserror::Error)]
pub enum HarvestError {
    #[error("request to {url} failed: {source}")]
    Fetch {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("request to {url} timed out")]
    Timeout { url: String },

    #[error("{url} answered {status}")]
    Status { url: String, status: StatusCode },

    #[error("expected content missing at {url}: {what}")]
    ParseMiss { url: String, what: &'static str },
}

impl HarvestError {
    pub fn from_request(url: &str, err: reqwest::Error) -> Self {
        if err.is_timeout() {
            HarvestError::Timeout {
                url: url.to_string(),
            }
        } else {
            HarvestError::Fetch {
                url: url.to_string(),
                source: err,
            }
        }
    }

    pub fn parse_miss(url: &str, what: &'static str) -> Self {
        HarvestError::ParseMiss {
            url: url.to_string(),
            what,
        }
    }
}
