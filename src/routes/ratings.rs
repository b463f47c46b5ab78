use crate::models::{RiskLevel, RiskRating};
use crate::AppState;
use axum::{extract::State, Json};
use serde_json::{json, Value};
use std::sync::Arc;

const TOP_N: usize = 5;

/// GET /ratings/summary
/// Table sizes, rating distribution and the riskiest rows of each table
pub async fn ratings_summary(State(state): State<Arc<AppState>>) -> Json<Value> {
    let tables = state.assessments.evaluator().tables();

    Json(json!({
        "source": state.ratings_source,
        "routes": summarize(&tables.routes),
        "liable_parties": summarize(&tables.liable_parties),
        "loss_locations": summarize(&tables.loss_locations),
    }))
}

fn summarize<K: serde::Serialize>(ratings: &[RiskRating<K>]) -> Value {
    let count = |level: RiskLevel| ratings.iter().filter(|r| r.risk_rating == level).count();

    json!({
        "count": ratings.len(),
        "distribution": {
            "High": count(RiskLevel::High),
            "Medium": count(RiskLevel::Medium),
            "Low": count(RiskLevel::Low),
        },
        // Tables are stored sorted by descending risk
        "top": ratings.iter().take(TOP_N).collect::<Vec<_>>(),
    })
}
