// tests/batch_export.rs
// End-to-end batch run against stub adapters: list in, CSV table out.

use std::fs;
use std::sync::Arc;

use async_trait::async_trait;

use taxon_harvester::batch;
use taxon_harvester::harvest::error::HarvestError;
use taxon_harvester::harvest::routing::Registry;
use taxon_harvester::{
    Harvester, Rank, ReferenceTable, SourceAdapter, SourceResult, TaxonIdentifier, TaxonQuery,
};

/// Answers with a per-taxon description; one name stays empty.
struct EchoAdapter {
    name: &'static str,
}

#[async_trait]
impl SourceAdapter for EchoAdapter {
    fn name(&self) -> &'static str {
        self.name
    }

    async fn fetch(
        &self,
        query: &TaxonQuery,
        _identifier: Option<&TaxonIdentifier>,
    ) -> Result<SourceResult, HarvestError> {
        if query.name == "Nodataia" {
            return Ok(SourceResult::empty(self.name));
        }
        Ok(SourceResult::new(
            self.name,
            format!("notes on {}, with commas", query.name),
        ))
    }
}

#[tokio::test]
async fn batch_run_writes_one_row_per_taxon_and_source() {
    let registry = Registry::from_routes(vec![(
        Rank::Family,
        vec![
            Arc::new(EchoAdapter {
                name: "alpha.example",
            }) as Arc<dyn SourceAdapter>,
            Arc::new(EchoAdapter {
                name: "beta.example",
            }),
        ],
    )]);
    let harvester = Harvester::new(ReferenceTable::empty(), registry);

    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("families.txt");
    let output = dir.path().join("descriptions.csv");
    fs::write(&input, "Hesperiidae\n\n  Nodataia \n").unwrap();

    batch::run(&harvester, Rank::Family, &input, &output)
        .await
        .expect("batch run ok");

    let table = fs::read_to_string(&output).unwrap();
    let lines: Vec<&str> = table.lines().collect();
    assert_eq!(lines[0], batch::HEADER);
    // 2 taxa x 2 sources, empty records included.
    assert_eq!(lines.len(), 5);
    assert_eq!(
        lines[1],
        "Hesperiidae,family,alpha.example,\"notes on Hesperiidae, with commas\",33"
    );
    assert_eq!(lines[3], "Nodataia,family,alpha.example,,0");
    assert_eq!(lines[4], "Nodataia,family,beta.example,,0");
}
