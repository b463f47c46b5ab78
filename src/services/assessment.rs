use crate::error::{AppError, Result};
use crate::models::{
    Assessment, AssessmentOutcome, AssessmentRequest, CityState, Coordinates, Facility,
    FacilitySelection, ResolvedShipment, RouteKey, UnresolvedLocation,
};
use crate::services::facility_finder::FacilityFinder;
use crate::services::geocoder::Geocoder;
use crate::services::isochrone::{facilities_in_isochrone, IsochroneProvider};
use crate::services::recommendation::RecommendationEngine;
use crate::services::risk_evaluator::RiskEvaluator;
use std::sync::Arc;
use uuid::Uuid;

/// End-to-end shipment assessment: geocode, look up risk, pick a facility,
/// recommend.
pub struct AssessmentService {
    facilities: Arc<Vec<Facility>>,
    evaluator: RiskEvaluator,
    finder: FacilityFinder,
    engine: RecommendationEngine,
    geocoder: Arc<dyn Geocoder>,
    isochrone: Option<Arc<dyn IsochroneProvider>>,
}

impl AssessmentService {
    pub fn new(
        facilities: Arc<Vec<Facility>>,
        evaluator: RiskEvaluator,
        finder: FacilityFinder,
        engine: RecommendationEngine,
        geocoder: Arc<dyn Geocoder>,
        isochrone: Option<Arc<dyn IsochroneProvider>>,
    ) -> Self {
        AssessmentService {
            facilities,
            evaluator,
            finder,
            engine,
            geocoder,
            isochrone,
        }
    }

    pub fn facilities(&self) -> &[Facility] {
        &self.facilities
    }

    pub fn evaluator(&self) -> &RiskEvaluator {
        &self.evaluator
    }

    pub fn finder(&self) -> &FacilityFinder {
        &self.finder
    }

    pub fn geocoder(&self) -> &dyn Geocoder {
        self.geocoder.as_ref()
    }

    pub fn isochrone_enabled(&self) -> bool {
        self.isochrone.is_some()
    }

    pub async fn assess(&self, request: &AssessmentRequest) -> Result<AssessmentOutcome> {
        request.validate().map_err(AppError::InvalidRequest)?;

        let ship_from: CityState = request
            .ship_from
            .parse()
            .map_err(|e| AppError::InvalidRequest(format!("ship_from: {}", e)))?;
        let ship_to: CityState = request
            .ship_to
            .parse()
            .map_err(|e| AppError::InvalidRequest(format!("ship_to: {}", e)))?;

        let (origin, destination) = tokio::join!(
            self.resolve("ship_from", &request.ship_from),
            self.resolve("ship_to", &request.ship_to)
        );

        let (origin, destination) = match (origin, destination) {
            (Ok(origin), Ok(destination)) => (origin, destination),
            (origin, destination) => {
                let unresolved: Vec<UnresolvedLocation> =
                    [origin.err(), destination.err()].into_iter().flatten().collect();
                tracing::info!(
                    unresolved = unresolved.len(),
                    "Assessment stopped: {} location(s) could not be geocoded",
                    unresolved.len()
                );
                return Ok(AssessmentOutcome::Unresolved { unresolved });
            }
        };

        let shipment = ResolvedShipment {
            route_key: RouteKey::new(ship_from, ship_to),
            origin,
            destination,
            liable_party: request.liable_party.trim().to_string(),
        };

        let risk = self
            .evaluator
            .profile(&shipment.route_key, &shipment.liable_party);

        let facility = self.finder.find_best(
            &shipment.origin,
            &shipment.destination,
            &self.facilities,
            risk.route.risk_score,
            Some(shipment.origin_state()),
        )?;

        // Without a facility there is nothing to detour to
        let detour_cost = facility
            .as_ref()
            .map_or(f64::INFINITY, FacilitySelection::detour_cost);
        let recommendation =
            self.engine
                .recommend(risk.route.risk_score, risk.liable_party.risk_score, detour_cost);

        let (isochrone, facilities_in_range) = match request.isochrone_minutes {
            Some(minutes) => self.isochrone_around(&shipment.origin, minutes).await,
            None => (None, None),
        };

        let assessment = Assessment {
            id: Uuid::new_v4(),
            shipment,
            risk,
            facility,
            recommendation,
            facilities_in_range,
            isochrone,
        };

        tracing::info!(
            assessment_id = %assessment.id,
            route = %assessment.shipment.route_key,
            liable_party = %assessment.shipment.liable_party,
            should_scale = assessment.recommendation.should_scale,
            confidence = %assessment.recommendation.confidence,
            "Assessed {}: {}",
            assessment.shipment.route_key,
            assessment.recommendation.reason
        );

        Ok(AssessmentOutcome::Assessed(Box::new(assessment)))
    }

    /// Geocoder failures count as "not found" here; the caller reports the
    /// location back instead of failing the whole request.
    async fn resolve(
        &self,
        field: &str,
        query: &str,
    ) -> std::result::Result<Coordinates, UnresolvedLocation> {
        let query = query.trim();
        let unresolved = || UnresolvedLocation {
            field: field.to_string(),
            query: query.to_string(),
        };

        match self.geocoder.geocode(query).await {
            Ok(Some(coordinates)) => Ok(coordinates),
            Ok(None) => {
                tracing::info!(field, query, "No geocoding result for '{}'", query);
                Err(unresolved())
            }
            Err(e) => {
                tracing::warn!(field, query, error = %e, "Geocoding '{}' failed: {}", query, e);
                Err(unresolved())
            }
        }
    }

    /// Isochrone failures never fail the assessment.
    async fn isochrone_around(
        &self,
        origin: &Coordinates,
        minutes: u32,
    ) -> (Option<geojson::Geometry>, Option<Vec<Facility>>) {
        let Some(provider) = self.isochrone.as_ref() else {
            tracing::debug!("Isochrone requested but no provider is configured");
            return (None, None);
        };

        match provider.isochrone(origin, minutes).await {
            Ok(iso) => {
                let in_range = facilities_in_isochrone(&iso.polygon, &self.facilities);
                tracing::debug!(
                    minutes,
                    in_range = in_range.len(),
                    "{} facilities within {} min of origin",
                    in_range.len(),
                    minutes
                );
                (Some(iso.geometry), Some(in_range))
            }
            Err(e) => {
                tracing::warn!(minutes, error = %e, "Isochrone unavailable: {}", e);
                (None, None)
            }
        }
    }
}
