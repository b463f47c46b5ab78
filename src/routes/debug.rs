use crate::AppState;
use axum::{extract::State, Json};
use serde_json::{json, Value};
use std::sync::Arc;

/// GET /debug/health - Report what the service is running with
pub async fn health_check(State(state): State<Arc<AppState>>) -> Json<Value> {
    let mut status = json!({
        "status": "ok",
        "checks": {}
    });

    let facility_count = state.assessments.facilities().len();
    status["checks"]["facilities"] = json!(facility_count);
    if facility_count == 0 {
        status["status"] = json!("degraded");
    }

    let tables = state.assessments.evaluator().tables();
    status["checks"]["ratings"] = json!({
        "loaded": !tables.is_empty(),
        "artifact": state.ratings_source.artifact,
        "routes": tables.routes.len(),
        "liable_parties": tables.liable_parties.len(),
    });
    if tables.is_empty() {
        status["status"] = json!("degraded");
    }

    status["checks"]["geocoder"] = json!(state.assessments.geocoder().backend_name());
    if let Some(ref cache) = state.geocode_cache {
        status["checks"]["geocode_cache"] = json!(cache.stats());
    }
    status["checks"]["isochrone"] = json!(state.assessments.isochrone_enabled());

    Json(status)
}
