// src/batch.rs
//! Batch driver glue: read a name list, aggregate each taxon, flatten the
//! records into rows and write one delimited table. Taxa with nothing found
//! anywhere still produce their rows; an all-empty run exits successfully.

use std::fs;
use std::io::{self, Write};
use std::path::Path;

use anyhow::{Context, Result};

use crate::harvest::types::{Rank, TaxonQuery, TaxonRecord};
use crate::harvest::Harvester;

pub const HEADER: &str = "taxon,rank,source,description,desc_len";

/// One output row per (taxon, source) pair.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputRow {
    pub taxon: String,
    pub rank: Rank,
    pub source: String,
    pub description: String,
}

impl OutputRow {
    pub fn desc_len(&self) -> usize {
        self.description.chars().count()
    }
}

/// Flatten a record into rows, empty descriptions included.
pub fn flatten(record: &TaxonRecord) -> Vec<OutputRow> {
    record
        .results
        .iter()
        .map(|r| OutputRow {
            taxon: record.taxon.clone(),
            rank: record.rank,
            source: r.source.clone(),
            description: r.text.clone(),
        })
        .collect()
}

/// One name per line; blank lines and surrounding whitespace are dropped.
pub fn parse_names(text: &str) -> Vec<String> {
    text.lines()
        .map(str::trim)
        .filter(|l| !l.is_empty())
        .map(str::to_string)
        .collect()
}

pub fn read_names(path: &Path) -> Result<Vec<String>> {
    let text = fs::read_to_string(path)
        .with_context(|| format!("reading taxon list from {}", path.display()))?;
    Ok(parse_names(&text))
}

/// RFC-4180 style quoting: descriptions carry commas and newlines.
fn csv_field(field: &str) -> String {
    if field.contains(',') || field.contains('"') || field.contains('\n') || field.contains('\r') {
        format!("\"{}\"", field.replace('"', "\"\""))
    } else {
        field.to_string()
    }
}

pub fn write_table<W: Write>(mut w: W, rows: &[OutputRow]) -> io::Result<()> {
    writeln!(w, "{HEADER}")?;
    for row in rows {
        writeln!(
            w,
            "{},{},{},{},{}",
            csv_field(&row.taxon),
            row.rank,
            csv_field(&row.source),
            csv_field(&row.description),
            row.desc_len()
        )?;
    }
    Ok(())
}

/// Process the whole list sequentially; per-taxon source fetches run
/// concurrently inside `aggregate`.
pub async fn run(harvester: &Harvester, rank: Rank, input: &Path, output: &Path) -> Result<()> {
    let names = read_names(input)?;
    tracing::info!(taxa = names.len(), rank = %rank, "starting harvest");

    let mut rows = Vec::new();
    for name in names {
        let query = TaxonQuery::new(name, rank);
        let record = harvester.aggregate(&query).await;
        let found = record.results.iter().filter(|r| r.found()).count();
        tracing::info!(
            taxon = %record.taxon,
            sources = record.results.len(),
            found,
            "taxon done"
        );
        rows.extend(flatten(&record));
    }

    let file = fs::File::create(output)
        .with_context(|| format!("creating output table {}", output.display()))?;
    write_table(io::BufWriter::new(file), &rows)
        .with_context(|| format!("writing output table {}", output.display()))?;
    tracing::info!(rows = rows.len(), path = %output.display(), "table written");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::harvest::types::SourceResult;

    fn record() -> TaxonRecord {
        TaxonRecord {
            taxon: "Korscheltellus lupulina".into(),
            rank: Rank::Species,
            results: vec![
                SourceResult::new("wikipedia.org", "The wingspan is 25–40 mm.".into()),
                SourceResult::new("ukmoths.org.uk", "A common moth.\n\nFlies in May.".into()),
                SourceResult::new("butterfliesandmoths.org", "Wing Span: 2.5 cm".into()),
                SourceResult::empty("nrm.se"),
                SourceResult::empty("artfakta.se"),
            ],
        }
    }

    #[test]
    fn flatten_keeps_empty_sources_as_rows() {
        let rows = flatten(&record());
        assert_eq!(rows.len(), 5);
        assert_eq!(rows[3].source, "nrm.se");
        assert_eq!(rows[3].desc_len(), 0);
        assert_eq!(rows[0].desc_len(), "The wingspan is 25–40 mm.".chars().count());
    }

    #[test]
    fn parse_names_drops_blanks_and_trims() {
        let names = parse_names("Hesperiidae\n\n  Pieridae  \n\t\nLycaenidae\n");
        assert_eq!(names, vec!["Hesperiidae", "Pieridae", "Lycaenidae"]);
    }

    #[test]
    fn table_quotes_delimiters_and_newlines() {
        let rows = flatten(&record());
        let mut out = Vec::new();
        write_table(&mut out, &rows).unwrap();
        let text = String::from_utf8(out).unwrap();
        let mut lines = text.lines();
        assert_eq!(lines.next().unwrap(), HEADER);
        // Multi-line description gets quoted, so the row spans two lines.
        assert!(text.contains("\"A common moth.\n\nFlies in May.\""));
        // Plain fields stay unquoted.
        assert!(text.contains("Korscheltellus lupulina,species,nrm.se,,0"));
    }

    #[test]
    fn quotes_inside_fields_are_doubled() {
        assert_eq!(csv_field(r#"said "brown""#), r#""said ""brown""""#);
        assert_eq!(csv_field("plain"), "plain");
    }
}
