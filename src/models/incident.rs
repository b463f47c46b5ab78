use crate::models::CityState;
use serde::{Deserialize, Serialize};

/// One historical cargo claim.
///
/// Currency fields are already coerced to zero when absent; gross weight stays
/// optional so that unknown weights do not drag the per-group mean down.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct IncidentRecord {
    pub loss_location: CityState,
    pub ship_from: CityState,
    pub ship_to: CityState,
    pub liable_party: String,
    pub total_expense: f64,
    pub total_incurred: f64,
    pub gross_weight: Option<f64>,
    pub cause: String,
}

impl IncidentRecord {
    /// Penalties attributed to this incident. Total incurred mirrors total
    /// expense in the claims data and is not added on top.
    pub fn penalties(&self) -> f64 {
        self.total_expense
    }

    /// Whether the record feeds the risk aggregation: an overweight violation
    /// or any record with money attached.
    pub fn is_relevant(&self, overweight_cause: &str) -> bool {
        self.cause == overweight_cause || self.total_expense > 0.0 || self.total_incurred > 0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(cause: &str, expense: f64, incurred: f64) -> IncidentRecord {
        IncidentRecord {
            loss_location: CityState::new("Sikeston", "MO"),
            ship_from: CityState::new("Memphis", "TN"),
            ship_to: CityState::new("St. Louis", "MO"),
            liable_party: "Acme Freight".to_string(),
            total_expense: expense,
            total_incurred: incurred,
            gross_weight: Some(79_000.0),
            cause: cause.to_string(),
        }
    }

    #[test]
    fn relevance_filter() {
        assert!(record("overweight", 0.0, 0.0).is_relevant("overweight"));
        assert!(record("shortage", 120.0, 0.0).is_relevant("overweight"));
        assert!(record("shortage", 0.0, 45.0).is_relevant("overweight"));
        assert!(!record("shortage", 0.0, 0.0).is_relevant("overweight"));
        // Exact label match only
        assert!(!record("Overweight", 0.0, 0.0).is_relevant("overweight"));
    }

    #[test]
    fn penalties_do_not_double_count_incurred() {
        assert_eq!(record("overweight", 250.0, 250.0).penalties(), 250.0);
    }
}
