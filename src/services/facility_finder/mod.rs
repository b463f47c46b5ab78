mod detour_cost;
mod envelope;
mod scoring;

use crate::config::{DetourCostConfig, FacilitySearchConfig};
use crate::error::{AppError, Result};
use crate::models::{Coordinates, DetourCandidate, Facility, FacilitySelection, SearchPool};
use crate::services::geometry;

pub use detour_cost::DetourCostModel;
pub use envelope::DeviationEnvelope;
use scoring::{CandidateScorer, ScoringContext};

/// Corridor-constrained search for the best weighing facility on a trip.
#[derive(Debug, Clone)]
pub struct FacilityFinder {
    envelope: DeviationEnvelope,
    cost_model: DetourCostModel,
    scorer: CandidateScorer,
}

/// Result of scanning one candidate pool.
struct PoolScan {
    best: Option<DetourCandidate>,
    viable: usize,
}

impl FacilityFinder {
    pub fn new(search: FacilitySearchConfig, cost: DetourCostConfig) -> Self {
        FacilityFinder {
            envelope: DeviationEnvelope::new(&search),
            cost_model: DetourCostModel::new(cost),
            scorer: CandidateScorer::new(search),
        }
    }

    /// Find the lowest-scoring facility whose path deviation fits the stepped
    /// cap for this trip.
    ///
    /// With `origin_state`, facilities in that state are tried first and the
    /// full catalog only when none of them qualifies. `Ok(None)` means no
    /// facility lies inside the corridor, which callers must handle. A
    /// zero-length route is an error, distinct from "nothing found".
    pub fn find_best(
        &self,
        origin: &Coordinates,
        destination: &Coordinates,
        facilities: &[Facility],
        route_risk: f64,
        origin_state: Option<&str>,
    ) -> Result<Option<FacilitySelection>> {
        if !(0.0..=1.0).contains(&route_risk) {
            return Err(AppError::InvalidRequest(format!(
                "route_risk must be between 0 and 1, got {}",
                route_risk
            )));
        }

        let direct_miles = geometry::direct_route_miles(origin, destination)?;
        let deviation_cap = self.envelope.cap_for(direct_miles);

        tracing::debug!(
            direct_miles = %format!("{:.1}", direct_miles),
            deviation_cap,
            catalog_size = facilities.len(),
            "Facility search: {:.1} mi route, deviation cap {:.2}, {} facilities",
            direct_miles, deviation_cap, facilities.len()
        );

        // Regional pool first, then the whole catalog as a superset retry
        let mut passes: Vec<(SearchPool, Vec<&Facility>)> = Vec::with_capacity(2);
        if let Some(state) = origin_state.filter(|s| !s.trim().is_empty()) {
            let regional: Vec<&Facility> = facilities.iter().filter(|f| f.in_state(state)).collect();
            passes.push((SearchPool::OriginState, regional));
        }
        passes.push((SearchPool::FullCatalog, facilities.iter().collect()));

        for (pool, candidates) in passes {
            let scan = self.scan_pool(origin, destination, &candidates, route_risk, deviation_cap);

            if let Some(best) = scan.best {
                tracing::info!(
                    pool = ?pool,
                    facility = %best.facility,
                    viable = scan.viable,
                    detour_miles = %format!("{:.1}", best.cost.detour_distance_miles),
                    detour_cost = %format!("{:.2}", best.cost.total_cost),
                    "Selected {} from {} viable candidates ({:?})",
                    best.facility, scan.viable, pool
                );
                return Ok(Some(FacilitySelection {
                    candidate: best,
                    pool,
                    deviation_cap,
                    candidates_considered: candidates.len(),
                }));
            }

            tracing::debug!(
                pool = ?pool,
                pool_size = candidates.len(),
                "No facility within deviation cap {:.2} in {:?} pool ({} checked)",
                deviation_cap, pool, candidates.len()
            );
        }

        tracing::info!(
            direct_miles = %format!("{:.1}", direct_miles),
            deviation_cap,
            "No suitable facility inside the corridor"
        );
        Ok(None)
    }

    /// Linear scan with early rejection on the deviation cap. Ties keep the
    /// first candidate encountered.
    fn scan_pool(
        &self,
        origin: &Coordinates,
        destination: &Coordinates,
        candidates: &[&Facility],
        route_risk: f64,
        deviation_cap: f64,
    ) -> PoolScan {
        let mut best: Option<DetourCandidate> = None;
        let mut viable = 0;

        for facility in candidates {
            let legs = match geometry::detour_legs(&facility.coordinates, origin, destination) {
                Ok(legs) => legs,
                Err(e) => {
                    tracing::warn!(
                        facility = %facility,
                        error = %e,
                        "Skipping facility with unusable coordinates"
                    );
                    continue;
                }
            };

            let path_deviation = legs.deviation();
            if path_deviation > deviation_cap {
                continue;
            }
            viable += 1;

            let cost = self.cost_model.breakdown(&legs);
            let score = self.scorer.score(&ScoringContext {
                path_deviation,
                detour_cost: cost.total_cost,
                origin_distance_miles: legs.to_point_miles,
                route_risk,
            });

            if best.as_ref().map_or(true, |b| score < b.score) {
                best = Some(DetourCandidate {
                    facility: (*facility).clone(),
                    path_deviation,
                    origin_distance_miles: legs.to_point_miles,
                    cost,
                    score,
                });
            }
        }

        PoolScan { best, viable }
    }
}
