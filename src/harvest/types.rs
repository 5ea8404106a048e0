// src/harvest/types.rs
use std::fmt;
use std::str::FromStr;

use crate::harvest::error::HarvestError;

/// Taxonomic level of a query. Decides which sources get routed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Rank {
    Family,
    Genus,
    Species,
}

impl Rank {
    pub fn as_str(&self) -> &'static str {
        match self {
            Rank::Family => "family",
            Rank::Genus => "genus",
            Rank::Species => "species",
        }
    }
}

impl fmt::Display for Rank {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, thiserror::Error)]
#[error("unsupported taxonomic rank '{0}' (expected family, genus or species)")]
pub struct RankParseError(String);

impl FromStr for Rank {
    type Err = RankParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "family" => Ok(Rank::Family),
            "genus" => Ok(Rank::Genus),
            "species" => Ok(Rank::Species),
            _ => Err(RankParseError(s.to_string())),
        }
    }
}

/// Immutable pipeline input: one scientific name at one rank.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaxonQuery {
    pub name: String,
    pub rank: Rank,
}

impl TaxonQuery {
    pub fn new(name: impl Into<String>, rank: Rank) -> Self {
        Self {
            name: name.into(),
            rank,
        }
    }
}

/// Source-specific taxon key resolved from the reference table.
/// Derived per query, never cached across queries.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaxonIdentifier {
    pub source_id: String,
    pub resolved_rank: Option<Rank>,
}

/// Outcome of one source for one taxon. Always produced, possibly empty;
/// an empty text is a first-class "nothing found there", not an error.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
pub struct SourceResult {
    pub source: String,
    pub text: String,
}

impl SourceResult {
    pub fn new(source: &str, text: String) -> Self {
        Self {
            source: source.to_string(),
            text,
        }
    }

    pub fn empty(source: &str) -> Self {
        Self::new(source, String::new())
    }

    pub fn found(&self) -> bool {
        !self.text.is_empty()
    }
}

/// Merged per-taxon record; results keep the route's invocation order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaxonRecord {
    pub taxon: String,
    pub rank: Rank,
    pub results: Vec<SourceResult>,
}

#[async_trait::async_trait]
pub trait SourceAdapter: Send + Sync {
    /// Human-readable source label; duplicate labels merge last-write-wins.
    fn name(&self) -> &'static str;

    /// Whether the adapter needs a resolved reference-table identifier.
    fn needs_identifier(&self) -> bool {
        false
    }

    /// One outbound request, one result. Errors are absorbed at the
    /// aggregator boundary, never raised past it.
    async fn fetch(
        &self,
        query: &TaxonQuery,
        identifier: Option<&TaxonIdentifier>,
    ) -> Result<SourceResult, HarvestError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rank_parses_case_insensitively() {
        assert_eq!("FAMILY".parse::<Rank>().unwrap(), Rank::Family);
        assert_eq!(" species ".parse::<Rank>().unwrap(), Rank::Species);
        assert!("order".parse::<Rank>().is_err());
    }

    #[test]
    fn found_iff_text_nonempty() {
        assert!(!SourceResult::empty("nrm.se").found());
        assert!(SourceResult::new("nrm.se", "wingspan 20mm".into()).found());
    }
}
