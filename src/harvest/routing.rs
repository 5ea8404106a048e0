// src/harvest/routing.rs
//! Declarative rank routing: one registry maps each rank to its ordered
//! adapter route. The route order is the record order, so output stays
//! reproducible across runs.

use std::collections::HashMap;
use std::sync::Arc;

use reqwest::Client;

use crate::config::Credentials;
use crate::harvest::sources::{
    adw::Adw,
    artfakta::Artfakta,
    bamona::{BamonaSpecies, BamonaTaxonomy},
    nrm::Nrm,
    ukmoths::UkMoths,
    vilkenart::Vilkenart,
    wikipedia::Wikipedia,
};
use crate::harvest::types::{Rank, SourceAdapter};

pub struct Registry {
    routes: HashMap<Rank, Vec<Arc<dyn SourceAdapter>>>,
}

impl Registry {
    /// The production source roster.
    pub fn standard(client: &Client, credentials: &Credentials) -> Self {
        let bamona_taxonomy: Arc<dyn SourceAdapter> =
            Arc::new(BamonaTaxonomy::new(client.clone()));
        let bamona_species: Arc<dyn SourceAdapter> = Arc::new(BamonaSpecies::new(client.clone()));
        let vilkenart: Arc<dyn SourceAdapter> = Arc::new(Vilkenart::new(client.clone()));
        let wikipedia: Arc<dyn SourceAdapter> = Arc::new(Wikipedia::new(client.clone()));
        let ukmoths: Arc<dyn SourceAdapter> = Arc::new(UkMoths::new(client.clone()));
        let nrm: Arc<dyn SourceAdapter> = Arc::new(Nrm::new(client.clone()));
        let artfakta: Arc<dyn SourceAdapter> = Arc::new(Artfakta::new(
            client.clone(),
            credentials.artfakta_api_key.clone(),
        ));
        let adw: Arc<dyn SourceAdapter> = Arc::new(Adw::new(client.clone()));

        Self::from_routes(vec![
            (
                Rank::Family,
                vec![
                    bamona_taxonomy.clone(),
                    vilkenart,
                    wikipedia.clone(),
                ],
            ),
            (
                Rank::Genus,
                vec![bamona_taxonomy, wikipedia.clone(), artfakta.clone()],
            ),
            (
                Rank::Species,
                vec![wikipedia, ukmoths, bamona_species, nrm, adw, artfakta],
            ),
        ])
    }

    /// Build a registry from explicit routes; used by tests to inject stubs.
    pub fn from_routes(routes: Vec<(Rank, Vec<Arc<dyn SourceAdapter>>)>) -> Self {
        Self {
            routes: routes.into_iter().collect(),
        }
    }

    pub fn route(&self, rank: Rank) -> &[Arc<dyn SourceAdapter>] {
        self.routes.get(&rank).map(Vec::as_slice).unwrap_or(&[])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn registry() -> Registry {
        Registry::standard(&Client::new(), &Credentials::default())
    }

    #[test]
    fn every_rank_has_its_route() {
        let r = registry();
        assert_eq!(r.route(Rank::Family).len(), 3);
        assert_eq!(r.route(Rank::Genus).len(), 3);
        assert_eq!(r.route(Rank::Species).len(), 6);
    }

    #[test]
    fn identifier_gated_source_routes_to_genus_and_species_only() {
        let r = registry();
        let gated = |rank| r.route(rank).iter().filter(|a| a.needs_identifier()).count();
        assert_eq!(gated(Rank::Family), 0);
        assert_eq!(gated(Rank::Genus), 1);
        assert_eq!(gated(Rank::Species), 1);
    }

    #[test]
    fn species_route_starts_with_the_encyclopedia() {
        let r = registry();
        assert_eq!(r.route(Rank::Species)[0].name(), "wikipedia.org");
        assert_eq!(r.route(Rank::Family)[0].name(), "butterfliesandmoths.org");
    }
}
