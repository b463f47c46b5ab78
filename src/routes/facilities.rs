use crate::error::{AppError, Result};
use crate::models::{BestFacilityRequest, BestFacilityResponse};
use crate::AppState;
use axum::{extract::State, Json};
use std::sync::Arc;

/// POST /facilities/best
/// Corridor search for already-geocoded endpoints
pub async fn best_facility(
    State(state): State<Arc<AppState>>,
    Json(request): Json<BestFacilityRequest>,
) -> Result<Json<BestFacilityResponse>> {
    request
        .origin
        .validate()
        .map_err(|e| AppError::InvalidCoordinates(format!("origin: {}", e)))?;
    request
        .destination
        .validate()
        .map_err(|e| AppError::InvalidCoordinates(format!("destination: {}", e)))?;

    tracing::info!(
        origin_lat = request.origin.lat,
        origin_lng = request.origin.lng,
        destination_lat = request.destination.lat,
        destination_lng = request.destination.lng,
        route_risk = request.route_risk,
        "Best facility request: ({:.4}, {:.4}) -> ({:.4}, {:.4})",
        request.origin.lat, request.origin.lng,
        request.destination.lat, request.destination.lng
    );

    let selection = state.assessments.finder().find_best(
        &request.origin,
        &request.destination,
        state.assessments.facilities(),
        request.route_risk,
        request.origin_state.as_deref(),
    )?;

    Ok(Json(BestFacilityResponse { selection }))
}
