// tests/sources_scrape.rs
// HTTP-level tests for the scraping adapters, served from canned fixture
// pages on a local mock server.

use std::fs;
use std::time::Duration;

use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use taxon_harvester::harvest::error::HarvestError;
use taxon_harvester::harvest::sources::{
    adw::Adw,
    bamona::{BamonaSpecies, BamonaTaxonomy},
    nrm::Nrm,
    ukmoths::UkMoths,
    vilkenart::Vilkenart,
};
use taxon_harvester::{Rank, SourceAdapter, TaxonQuery};

fn client() -> reqwest::Client {
    reqwest::Client::builder()
        .timeout(Duration::from_millis(500))
        .build()
        .expect("client")
}

fn fixture(name: &str) -> String {
    fs::read_to_string(format!("tests/fixtures/{name}"))
        .unwrap_or_else(|_| panic!("missing tests/fixtures/{name}"))
}

async fn serve(route: &str, body: String) -> MockServer {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(route))
        .respond_with(ResponseTemplate::new(200).set_body_string(body))
        .mount(&server)
        .await;
    server
}

#[tokio::test]
async fn bamona_taxonomy_flattens_the_body_field() {
    let server = serve("/taxonomy/Hesperiidae", fixture("bamona_taxonomy.html")).await;
    let adapter = BamonaTaxonomy::with_base_url(client(), server.uri());

    let result = adapter
        .fetch(&TaxonQuery::new("Hesperiidae", Rank::Family), None)
        .await
        .expect("fetch ok");
    assert!(result.found());
    assert_eq!(
        result.text,
        "The skippers are a family of small, quick butterflies with hooked antennae."
    );
}

#[tokio::test]
async fn bamona_taxonomy_missing_container_is_a_parse_miss() {
    let server = serve("/taxonomy/Hesperiidae", "<html><body>redesigned</body></html>".into()).await;
    let adapter = BamonaTaxonomy::with_base_url(client(), server.uri());

    let err = adapter
        .fetch(&TaxonQuery::new("Hesperiidae", Rank::Family), None)
        .await
        .unwrap_err();
    assert!(matches!(err, HarvestError::ParseMiss { .. }));
}

#[tokio::test]
async fn bamona_species_harvests_label_value_pairs() {
    let server = serve(
        "/species/Korscheltellus-lupulina",
        fixture("bamona_species.html"),
    )
    .await;
    let adapter = BamonaSpecies::with_base_url(client(), server.uri());

    let result = adapter
        .fetch(&TaxonQuery::new("Korscheltellus lupulina", Rank::Species), None)
        .await
        .expect("fetch ok");
    // Empty-valued and label-less blocks are dropped.
    assert_eq!(
        result.text,
        "Wing Span: 2.5-3.1 cm\nIdentification: Upperside of male is brown with darker markings."
    );
}

#[tokio::test]
async fn vilkenart_reads_the_taxon_panel() {
    let html = r##"<html><body>
        <div id="ctl00_ContentPlaceHolder1_pnlTaxonText">Tjockhuvuden är
        små, snabba fjärilar.</div></body></html>"##;
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/HogreTaxa.aspx"))
        .and(query_param("Namn", "Hesperiidae"))
        .respond_with(ResponseTemplate::new(200).set_body_string(html))
        .mount(&server)
        .await;
    let adapter = Vilkenart::with_base_url(client(), server.uri());

    let result = adapter
        .fetch(&TaxonQuery::new("Hesperiidae", Rank::Family), None)
        .await
        .expect("fetch ok");
    assert_eq!(result.text, "Tjockhuvuden är små, snabba fjärilar.");
}

#[tokio::test]
async fn ukmoths_prefers_paragraphs_and_strips_the_authority() {
    let server = serve(
        "/species/korscheltellus-lupulina/",
        fixture("ukmoths_paragraphs.html"),
    )
    .await;
    let adapter = UkMoths::with_base_url(client(), server.uri());

    let result = adapter
        .fetch(&TaxonQuery::new("Korscheltellus lupulina", Rank::Species), None)
        .await
        .expect("fetch ok");
    assert_eq!(result.text, "A common species throughout much of Britain.");
}

#[tokio::test]
async fn ukmoths_falls_back_to_break_separated_text() {
    let server = serve(
        "/species/korscheltellus-lupulina/",
        fixture("ukmoths_breaks.html"),
    )
    .await;
    let adapter = UkMoths::with_base_url(client(), server.uri());

    let result = adapter
        .fetch(&TaxonQuery::new("Korscheltellus lupulina", Rank::Species), None)
        .await
        .expect("fetch ok");
    assert_eq!(result.text, "A common species.\nFlies in May and June.");
}

#[tokio::test]
async fn ukmoths_not_found_is_a_status_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;
    let adapter = UkMoths::with_base_url(client(), server.uri());

    let err = adapter
        .fetch(&TaxonQuery::new("Nosuchmoth atall", Rank::Species), None)
        .await
        .unwrap_err();
    assert!(matches!(err, HarvestError::Status { status, .. } if status.as_u16() == 404));
}

#[tokio::test]
async fn slow_pages_surface_as_timeouts() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string("late")
                .set_delay(Duration::from_secs(2)),
        )
        .mount(&server)
        .await;
    let adapter = UkMoths::with_base_url(client(), server.uri());

    let err = adapter
        .fetch(&TaxonQuery::new("Korscheltellus lupulina", Rank::Species), None)
        .await
        .unwrap_err();
    assert!(matches!(err, HarvestError::Timeout { .. }));
}

#[tokio::test]
async fn nrm_slices_between_the_bilingual_markers() {
    // Slug is lowercased, underscored, and filed under its first letter.
    let server = serve("/a/archiearis_parthenias.html", fixture("nrm_markers.html")).await;
    let adapter = Nrm::with_base_url(client(), server.uri());

    let result = adapter
        .fetch(&TaxonQuery::new("Archiearis parthenias", Rank::Species), None)
        .await
        .expect("fetch ok");
    // Start marker kept, end marker excluded.
    assert_eq!(
        result.text,
        "Kännetecken: Vingspann 35-40 mm. Flyger på dagen."
    );
}

#[tokio::test]
async fn nrm_without_markers_keeps_from_the_name_line() {
    let server = serve("/a/archiearis_parthenias.html", fixture("nrm_fallback.html")).await;
    let adapter = Nrm::with_base_url(client(), server.uri());

    let result = adapter
        .fetch(&TaxonQuery::new("Archiearis parthenias", Rank::Species), None)
        .await
        .expect("fetch ok");
    assert_eq!(
        result.text,
        "Archiearis parthenias (Linnaeus, 1761)\nA day-flying moth of birch woodland."
    );
}

#[tokio::test]
async fn adw_collects_paragraphs_until_the_next_heading() {
    let server = serve("/accounts/Attacus_atlas/", fixture("adw_account.html")).await;
    let adapter = Adw::with_base_url(client(), server.uri());

    let result = adapter
        .fetch(&TaxonQuery::new("Attacus atlas", Rank::Species), None)
        .await
        .expect("fetch ok");
    assert_eq!(
        result.text,
        "Atlas moths are among the largest insects on the planet.\n\nWingspans reach 25 cm or more."
    );
}
