// Library exports for testing and reusability

pub mod config;
pub mod constants;
pub mod data;
pub mod error;
pub mod models;
pub mod ratings;
pub mod routes;
pub mod services;

// Re-export commonly used types
pub use error::{AppError, Result};

use config::Config;
use constants::{DEFAULT_GEOCODE_CACHE_MAX_ENTRIES, ORS_TRUCK_PROFILE};
use models::RatingTables;
use ratings::{RatingsArtifact, RatingsStore};
use services::assessment::AssessmentService;
use services::facility_finder::FacilityFinder;
use services::geocoder::{CachedGeocoder, Geocoder, NominatimClient};
use services::isochrone::{IsochroneProvider, OrsIsochroneClient};
use services::recommendation::RecommendationEngine;
use services::risk_evaluator::RiskEvaluator;
use std::sync::Arc;

/// Provenance of the rating tables the service was started with.
#[derive(Debug, Clone, serde::Serialize)]
pub struct RatingsSource {
    /// File the tables came from; `None` when running with empty tables
    pub artifact: Option<String>,
    pub generated_at: Option<String>,
    pub relevant_incident_count: Option<usize>,
}

impl RatingsSource {
    pub fn empty() -> Self {
        RatingsSource {
            artifact: None,
            generated_at: None,
            relevant_incident_count: None,
        }
    }

    pub fn from_artifact(path: &std::path::Path, artifact: &RatingsArtifact) -> Self {
        RatingsSource {
            artifact: path
                .file_name()
                .map(|name| name.to_string_lossy().into_owned()),
            generated_at: Some(artifact.generated_at.clone()),
            relevant_incident_count: Some(artifact.relevant_incident_count),
        }
    }
}

// App state for sharing across the application
pub struct AppState {
    pub assessments: AssessmentService,
    pub ratings_source: RatingsSource,
    /// Present when the geocoder is wrapped in the in-memory cache
    pub geocode_cache: Option<Arc<CachedGeocoder>>,
}

impl AppState {
    /// Load the catalog and the latest ratings, and wire the HTTP clients.
    ///
    /// A missing ratings artifact is not an error: every lookup then resolves
    /// to Low risk. A missing or malformed catalog is.
    pub fn from_config(config: &Config) -> Result<Self> {
        let facilities = Arc::new(data::load_facilities(&config.facility_catalog_path)?);

        let store = RatingsStore::new(&config.ratings_dir);
        let (tables, ratings_source) = match store.resolve_latest()? {
            Some(path) => {
                let artifact = store.load(&path)?;
                let source = RatingsSource::from_artifact(&path, &artifact);
                tracing::info!(
                    artifact = %path.display(),
                    routes = artifact.tables.routes.len(),
                    liable_parties = artifact.tables.liable_parties.len(),
                    "Loaded ratings from {}",
                    path.display()
                );
                (artifact.tables, source)
            }
            None => {
                tracing::warn!(
                    dir = %store.dir().display(),
                    "No ratings artifact found; all lookups will report Low risk"
                );
                (RatingTables::default(), RatingsSource::empty())
            }
        };

        let nominatim: Arc<dyn Geocoder> = Arc::new(NominatimClient::new(
            config.nominatim_base_url.clone(),
            config.geocoder_user_agent.clone(),
        ));
        let geocode_cache = Arc::new(CachedGeocoder::new(
            nominatim,
            config.geocode_cache_ttl,
            DEFAULT_GEOCODE_CACHE_MAX_ENTRIES,
        ));

        let isochrone: Option<Arc<dyn IsochroneProvider>> = match config.ors_api_key {
            Some(ref key) => Some(Arc::new(OrsIsochroneClient::new(
                key.clone(),
                config.ors_base_url.clone(),
                ORS_TRUCK_PROFILE.to_string(),
            ))),
            None => {
                tracing::info!("ORS_API_KEY not configured. Isochrones disabled.");
                None
            }
        };

        let assessments = AssessmentService::new(
            facilities,
            RiskEvaluator::new(Arc::new(tables)),
            FacilityFinder::new(config.facility_search.clone(), config.detour_cost.clone()),
            RecommendationEngine::new(config.recommendation.clone()),
            geocode_cache.clone(),
            isochrone,
        );

        Ok(AppState {
            assessments,
            ratings_source,
            geocode_cache: Some(geocode_cache),
        })
    }
}
