use crate::config::{RatingsConfig, RouteBlend};
use crate::models::{
    CityState, IncidentRecord, PartyKey, RatingTables, RiskLevel, RiskRating, RouteKey,
};
use std::cmp::Ordering;
use std::collections::{BTreeMap, HashMap};

/// Output of one batch run, before it is written anywhere.
#[derive(Debug, Clone, PartialEq)]
pub struct RatingBuild {
    pub tables: RatingTables,
    pub route_blend: RouteBlend,
    pub total_incidents: usize,
    pub relevant_incidents: usize,
}

/// Turns raw incident history into normalized risk ratings per route,
/// liable party and loss location.
#[derive(Debug, Clone)]
pub struct RiskRatingBuilder {
    config: RatingsConfig,
}

impl RiskRatingBuilder {
    pub fn new(config: RatingsConfig) -> Self {
        Self { config }
    }

    pub fn build(&self, incidents: &[IncidentRecord]) -> RatingBuild {
        let relevant: Vec<&IncidentRecord> = incidents
            .iter()
            .filter(|r| r.is_relevant(&self.config.overweight_cause))
            .collect();

        tracing::info!(
            total = incidents.len(),
            relevant = relevant.len(),
            overweight_cause = %self.config.overweight_cause,
            "Rating build: {} of {} incidents are relevant",
            relevant.len(), incidents.len()
        );

        // Loss locations are rated first so routes can blend them in
        let loss_locations = rate_groups(&relevant, |r| r.loss_location.clone(), None);
        let loss_index = LossLocationIndex::new(&loss_locations);

        let route_blend_source = match self.config.route_blend {
            RouteBlend::WithLossLocation => Some(&loss_index),
            RouteBlend::TwoFactor => None,
        };
        let routes = rate_groups(
            &relevant,
            |r| RouteKey::new(r.ship_from.clone(), r.ship_to.clone()),
            route_blend_source,
        );
        let liable_parties = rate_groups(&relevant, |r| PartyKey::new(r.liable_party.clone()), None);

        tracing::info!(
            routes = routes.len(),
            liable_parties = liable_parties.len(),
            loss_locations = loss_locations.len(),
            route_blend = ?self.config.route_blend,
            "Rated {} routes, {} liable parties, {} loss locations",
            routes.len(), liable_parties.len(), loss_locations.len()
        );

        RatingBuild {
            tables: RatingTables {
                routes,
                liable_parties,
                loss_locations,
            },
            route_blend: self.config.route_blend,
            total_incidents: incidents.len(),
            relevant_incidents: relevant.len(),
        }
    }
}

/// Currency amounts that are missing, non-numeric or negative count as zero.
fn amount(value: f64) -> f64 {
    if value.is_finite() {
        value.max(0.0)
    } else {
        0.0
    }
}

/// Min-max scale into [0, 1]. When every value is equal the range is empty
/// and all rows scale to 0.
pub fn min_max_normalize(values: &[f64]) -> Vec<f64> {
    let min = values.iter().copied().fold(f64::INFINITY, f64::min);
    let max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    let range = max - min;

    if !(range > 0.0 && range.is_finite()) {
        return vec![0.0; values.len()];
    }

    values
        .iter()
        .map(|v| ((v - min) / range).clamp(0.0, 1.0))
        .collect()
}

/// Loss-location risk scores keyed by city/state.
struct LossLocationIndex {
    scores: HashMap<CityState, f64>,
}

impl LossLocationIndex {
    fn new(ratings: &[RiskRating<CityState>]) -> Self {
        Self {
            scores: ratings
                .iter()
                .map(|r| (r.key.clone(), r.risk_score))
                .collect(),
        }
    }

    /// Mean loss-location risk over a group's incidents.
    fn mean_risk(&self, members: &[&IncidentRecord]) -> f64 {
        if members.is_empty() {
            return 0.0;
        }
        let total: f64 = members
            .iter()
            .map(|r| self.scores.get(&r.loss_location).copied().unwrap_or(0.0))
            .sum();
        (total / members.len() as f64).clamp(0.0, 1.0)
    }
}

/// Aggregate, normalize, blend and rate one grouping. Rows come back sorted
/// by descending risk score; ties keep key order.
fn rate_groups<K, F>(
    relevant: &[&IncidentRecord],
    key_of: F,
    loss_index: Option<&LossLocationIndex>,
) -> Vec<RiskRating<K>>
where
    K: Ord,
    F: Fn(&IncidentRecord) -> K,
{
    let mut groups: BTreeMap<K, Vec<&IncidentRecord>> = BTreeMap::new();
    for &record in relevant {
        groups.entry(key_of(record)).or_default().push(record);
    }
    if groups.is_empty() {
        return Vec::new();
    }

    let counts: Vec<f64> = groups.values().map(|g| g.len() as f64).collect();
    let penalties: Vec<f64> = groups
        .values()
        .map(|g| g.iter().map(|r| amount(r.penalties())).sum())
        .collect();
    let count_norms = min_max_normalize(&counts);
    let penalty_norms = min_max_normalize(&penalties);

    let mut ratings: Vec<RiskRating<K>> = groups
        .into_iter()
        .enumerate()
        .map(|(i, (key, members))| {
            let count_norm = count_norms[i];
            let penalties_norm = penalty_norms[i];
            let loss_location_risk = loss_index.map(|index| index.mean_risk(&members));

            let risk_score = match loss_location_risk {
                Some(loss_risk) => (count_norm + penalties_norm + loss_risk) / 3.0,
                None => (count_norm + penalties_norm) / 2.0,
            }
            .clamp(0.0, 1.0);

            RiskRating {
                key,
                incident_count: members.len() as u64,
                total_penalties: penalties[i],
                avg_gross_weight: mean_gross_weight(&members),
                count_norm,
                penalties_norm,
                loss_location_risk,
                risk_score,
                risk_rating: RiskLevel::from_score(risk_score),
            }
        })
        .collect();

    ratings.sort_by(|a, b| {
        b.risk_score
            .partial_cmp(&a.risk_score)
            .unwrap_or(Ordering::Equal)
    });
    ratings
}

fn mean_gross_weight(members: &[&IncidentRecord]) -> Option<f64> {
    let weights: Vec<f64> = members
        .iter()
        .filter_map(|r| r.gross_weight)
        .filter(|w| w.is_finite())
        .collect();
    if weights.is_empty() {
        None
    } else {
        Some(weights.iter().sum::<f64>() / weights.len() as f64)
    }
}
