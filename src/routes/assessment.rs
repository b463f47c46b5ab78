use crate::error::Result;
use crate::models::{AssessmentOutcome, AssessmentRequest};
use crate::AppState;
use axum::{extract::State, Json};
use std::sync::Arc;

/// POST /assessments
/// Geocode a shipment, look up its risk and recommend whether to weigh it
pub async fn create_assessment(
    State(state): State<Arc<AppState>>,
    Json(request): Json<AssessmentRequest>,
) -> Result<Json<AssessmentOutcome>> {
    tracing::info!(
        ship_from = %request.ship_from,
        ship_to = %request.ship_to,
        liable_party = %request.liable_party,
        isochrone_minutes = ?request.isochrone_minutes,
        "Assessment request: {} -> {} for '{}'",
        request.ship_from, request.ship_to, request.liable_party
    );

    let outcome = state.assessments.assess(&request).await?;
    Ok(Json(outcome))
}
