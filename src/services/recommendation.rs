use crate::config::RecommendationConfig;
use crate::constants::{HIGH_RISK_THRESHOLD, MEDIUM_RISK_THRESHOLD};
use crate::models::{Recommendation, RiskLevel};

/// Trades detour cost against the expected violation risk of a shipment.
#[derive(Debug, Clone)]
pub struct RecommendationEngine {
    config: RecommendationConfig,
}

impl RecommendationEngine {
    pub fn new(config: RecommendationConfig) -> Self {
        Self { config }
    }

    /// Combined risk is the mean of route and liable-party risk:
    /// - >= 0.7, or either side alone >= 0.7: scale, High confidence
    /// - >= 0.4: scale only when the detour is cheaper than the threshold
    /// - otherwise: don't scale, Low confidence
    pub fn recommend(&self, route_risk: f64, liable_risk: f64, detour_cost: f64) -> Recommendation {
        let combined = (route_risk + liable_risk) / 2.0;
        let high = combined >= HIGH_RISK_THRESHOLD
            || route_risk >= HIGH_RISK_THRESHOLD
            || liable_risk >= HIGH_RISK_THRESHOLD;

        let recommendation = if high {
            Recommendation {
                should_scale: true,
                confidence: RiskLevel::High,
                reason: "High risk route and/or liable party history".to_string(),
            }
        } else if combined >= MEDIUM_RISK_THRESHOLD {
            if detour_cost < self.config.detour_cost_threshold {
                Recommendation {
                    should_scale: true,
                    confidence: RiskLevel::Medium,
                    reason: "Medium risk with reasonable detour cost".to_string(),
                }
            } else {
                Recommendation {
                    should_scale: false,
                    confidence: RiskLevel::Medium,
                    reason: "Medium risk but high detour cost".to_string(),
                }
            }
        } else {
            Recommendation {
                should_scale: false,
                confidence: RiskLevel::Low,
                reason: "Low risk route and liable party history".to_string(),
            }
        };

        tracing::debug!(
            combined_risk = %format!("{:.3}", combined),
            detour_cost = %format!("{:.2}", detour_cost),
            should_scale = recommendation.should_scale,
            confidence = %recommendation.confidence,
            "Recommendation: {}",
            recommendation.reason
        );

        recommendation
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn engine() -> RecommendationEngine {
        RecommendationEngine::new(RecommendationConfig::default())
    }

    #[test]
    fn high_combined_risk_always_scales() {
        let rec = engine().recommend(0.9, 0.5, 1000.0);
        assert!(rec.should_scale);
        assert_eq!(rec.confidence, RiskLevel::High);
    }

    #[test]
    fn one_high_side_escalates() {
        let rec = engine().recommend(0.9, 0.0, 1000.0);
        assert!(rec.should_scale);
        assert_eq!(rec.confidence, RiskLevel::High);

        let rec = engine().recommend(0.0, 0.75, 1000.0);
        assert_eq!(rec.confidence, RiskLevel::High);
    }

    #[test]
    fn low_mean_without_a_high_side_stays_low() {
        let rec = engine().recommend(0.6, 0.0, 0.0);
        assert!(!rec.should_scale);
        assert_eq!(rec.confidence, RiskLevel::Low);
    }

    #[test]
    fn medium_risk_depends_on_detour_cost() {
        assert!(engine().recommend(0.5, 0.3, 99.99).should_scale);
        assert!(!engine().recommend(0.5, 0.3, 100.0).should_scale);
        assert!(!engine().recommend(0.5, 0.3, f64::INFINITY).should_scale);
    }

    #[test]
    fn configured_threshold_is_used() {
        let engine = RecommendationEngine::new(RecommendationConfig {
            detour_cost_threshold: 600.0,
        });
        assert!(engine.recommend(0.5, 0.3, 500.0).should_scale);
    }

    #[test]
    fn band_edges() {
        assert_eq!(engine().recommend(0.7, 0.7, 0.0).confidence, RiskLevel::High);
        assert_eq!(engine().recommend(0.4, 0.4, 0.0).confidence, RiskLevel::Medium);
        assert_eq!(engine().recommend(0.39, 0.39, 0.0).confidence, RiskLevel::Low);
    }
}
