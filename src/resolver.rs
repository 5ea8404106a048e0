// src/resolver.rs
//! # Identifier Resolver
//!
//! Maps a scientific name to the Artfakta taxon id using the Dyntaxa
//! `Taxon.csv` export (tab-separated, UTF-8).
//!
//! - Names are trimmed + case-folded; the table column is normalized once
//!   at load time so per-call lookups stay cheap.
//! - Optional rank filter (genus-level lookups); species lookups are
//!   unrestricted.
//! - Multiple matches resolve to the first row in table order.
//! - `acceptedNameUsageID` is colon-delimited (`urn:lsid:dyntaxa.se:Taxon:222441`);
//!   the id is the part after the final colon.
//! - A missing table file degrades to an always-miss resolver.

use std::fs;
use std::path::Path;

use anyhow::{bail, Context, Result};

use crate::harvest::types::{Rank, TaxonIdentifier};

const NAME_COLUMN: &str = "scientificName";
const RANK_COLUMN: &str = "taxonRank";
const ID_COLUMN: &str = "acceptedNameUsageID";

#[derive(Debug, Clone)]
struct TableRow {
    /// Trimmed + lowercased scientific name.
    name: String,
    /// Trimmed + lowercased rank label.
    rank: String,
    accepted_id: String,
}

/// In-memory reference table, read-only after load.
#[derive(Debug, Clone, Default)]
pub struct ReferenceTable {
    rows: Vec<TableRow>,
}

impl ReferenceTable {
    pub fn empty() -> Self {
        Self::default()
    }

    /// Parse a tab-separated export with a header row. The three required
    /// columns may sit at any position; extra columns are ignored.
    pub fn parse(text: &str) -> Result<Self> {
        let mut lines = text.lines();
        let header = lines.next().context("reference table is empty")?;
        let columns: Vec<&str> = header.split('\t').map(str::trim).collect();
        let col = |wanted: &str| columns.iter().position(|c| *c == wanted);
        let (Some(name_idx), Some(rank_idx), Some(id_idx)) =
            (col(NAME_COLUMN), col(RANK_COLUMN), col(ID_COLUMN))
        else {
            bail!(
                "reference table header lacks one of {NAME_COLUMN}/{RANK_COLUMN}/{ID_COLUMN}: {header}"
            );
        };

        let mut rows = Vec::new();
        for line in lines {
            if line.trim().is_empty() {
                continue;
            }
            let fields: Vec<&str> = line.split('\t').collect();
            let field = |idx: usize| fields.get(idx).copied().unwrap_or_default();
            rows.push(TableRow {
                name: field(name_idx).trim().to_lowercase(),
                rank: field(rank_idx).trim().to_lowercase(),
                accepted_id: field(id_idx).trim().to_string(),
            });
        }
        Ok(Self { rows })
    }

    pub fn load(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path)
            .with_context(|| format!("reading reference table from {}", path.display()))?;
        Self::parse(&text).with_context(|| format!("parsing reference table {}", path.display()))
    }

    /// Missing or unreadable table is non-fatal: identifier-gated sources
    /// simply stay empty for the whole run.
    pub fn load_or_empty(path: &Path) -> Self {
        match Self::load(path) {
            Ok(table) => {
                tracing::info!(rows = table.rows.len(), path = %path.display(), "reference table loaded");
                table
            }
            Err(e) => {
                tracing::warn!(error = %e, "reference table unavailable, identifier lookups will miss");
                Self::empty()
            }
        }
    }

    /// Resolve a name to its source identifier. `required_rank` restricts
    /// matches to rows of that rank; `None` matches any rank. A miss is a
    /// value, not an error.
    pub fn resolve(&self, name: &str, required_rank: Option<Rank>) -> Option<TaxonIdentifier> {
        let wanted = name.trim().to_lowercase();
        let row = self.rows.iter().find(|row| {
            row.name == wanted
                && required_rank.is_none_or(|rank| row.rank == rank.as_str())
        })?;

        // Part after the final colon; plain ids pass through whole.
        let source_id = row.accepted_id.rsplit(':').next().unwrap_or_default();
        if source_id.is_empty() {
            return None;
        }
        Some(TaxonIdentifier {
            source_id: source_id.to_string(),
            resolved_rank: row.rank.parse().ok(),
        })
    }
}
