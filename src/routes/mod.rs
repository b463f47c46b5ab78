pub mod assessment;
pub mod debug;
pub mod facilities;
pub mod ratings;

use axum::{routing::{get, post}, Router};
use std::sync::Arc;

use crate::AppState;

pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/assessments", post(assessment::create_assessment))
        .route("/facilities/best", post(facilities::best_facility))
        .route("/ratings/summary", get(ratings::ratings_summary))
        .route("/debug/health", get(debug::health_check))
        .with_state(state)
}
