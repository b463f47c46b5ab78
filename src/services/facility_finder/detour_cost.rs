use crate::config::DetourCostConfig;
use crate::models::CostBreakdown;
use crate::services::geometry::DetourLegs;

/// Hourly-plus-per-mile detour pricing:
/// fee + (detour_miles / speed) * hourly_rate + detour_miles * mile_rate
#[derive(Debug, Clone)]
pub struct DetourCostModel {
    config: DetourCostConfig,
}

impl DetourCostModel {
    pub fn new(config: DetourCostConfig) -> Self {
        Self { config }
    }

    pub fn breakdown(&self, legs: &DetourLegs) -> CostBreakdown {
        let detour_distance_miles = legs.detour_miles();
        let detour_time_hours = detour_distance_miles / self.config.average_speed_mph;
        let driver_cost = detour_time_hours * self.config.driver_hourly_rate;
        let mileage_cost = detour_distance_miles * self.config.out_of_route_mile_rate;
        let total_cost = self.config.facility_fee + driver_cost + mileage_cost;

        CostBreakdown {
            direct_distance_miles: legs.direct_miles,
            via_distance_miles: legs.via_miles(),
            detour_distance_miles,
            detour_time_hours,
            facility_fee: self.config.facility_fee,
            driver_cost,
            mileage_cost,
            total_cost,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn legs(direct: f64, to_point: f64, from_point: f64) -> DetourLegs {
        DetourLegs {
            direct_miles: direct,
            to_point_miles: to_point,
            from_point_miles: from_point,
        }
    }

    #[test]
    fn prices_a_ten_mile_detour() {
        let model = DetourCostModel::new(DetourCostConfig::default());
        let cost = model.breakdown(&legs(100.0, 60.0, 50.0));

        assert!((cost.detour_distance_miles - 10.0).abs() < 1e-9);
        assert!((cost.detour_time_hours - 0.2).abs() < 1e-9);
        assert!((cost.driver_cost - 6.0).abs() < 1e-9);
        assert!((cost.mileage_cost - 20.0).abs() < 1e-9);
        // 14 fee + 6 driver + 20 mileage
        assert!((cost.total_cost - 40.0).abs() < 1e-9);
    }

    #[test]
    fn on_route_facility_costs_only_the_fee() {
        let model = DetourCostModel::new(DetourCostConfig::default());
        let cost = model.breakdown(&legs(100.0, 40.0, 60.0));
        assert_eq!(cost.detour_distance_miles, 0.0);
        assert_eq!(cost.total_cost, 14.0);
    }

    #[test]
    fn rates_come_from_config() {
        let model = DetourCostModel::new(DetourCostConfig {
            facility_fee: 0.0,
            driver_hourly_rate: 60.0,
            out_of_route_mile_rate: 0.0,
            average_speed_mph: 30.0,
        });
        let cost = model.breakdown(&legs(100.0, 60.0, 70.0));
        // 30 extra miles at 30 mph = 1h at 60/h
        assert!((cost.total_cost - 60.0).abs() < 1e-9);
    }
}
