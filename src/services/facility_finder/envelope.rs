use crate::config::FacilitySearchConfig;

/// Stepped corridor envelope: how far (as a fraction of the direct distance) a
/// detour may stretch the trip. A fixed fraction is a larger absolute detour on
/// long routes, so the allowance loosens in steps as trip length grows.
#[derive(Debug, Clone)]
pub struct DeviationEnvelope {
    bands: [(f64, f64); 2],
    long_route_cap: f64,
}

impl DeviationEnvelope {
    pub fn new(config: &FacilitySearchConfig) -> Self {
        Self {
            bands: [
                (config.short_route_max_miles, config.short_route_deviation_cap),
                (config.medium_route_max_miles, config.medium_route_deviation_cap),
            ],
            long_route_cap: config.long_route_deviation_cap,
        }
    }

    /// Maximum allowed path deviation for a route of `direct_miles`.
    pub fn cap_for(&self, direct_miles: f64) -> f64 {
        self.bands
            .iter()
            .find(|(max_miles, _)| direct_miles <= *max_miles)
            .map(|(_, cap)| *cap)
            .unwrap_or(self.long_route_cap)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn envelope() -> DeviationEnvelope {
        DeviationEnvelope::new(&FacilitySearchConfig::default())
    }

    #[test]
    fn short_routes_use_fifteen_percent() {
        let envelope = envelope();
        assert_eq!(envelope.cap_for(1.0), 0.15);
        assert_eq!(envelope.cap_for(180.0), 0.15);
        assert_eq!(envelope.cap_for(500.0), 0.15);
    }

    #[test]
    fn medium_routes_use_twenty_percent() {
        let envelope = envelope();
        assert_eq!(envelope.cap_for(500.5), 0.20);
        assert_eq!(envelope.cap_for(1000.0), 0.20);
    }

    #[test]
    fn long_routes_use_twenty_five_percent() {
        let envelope = envelope();
        assert_eq!(envelope.cap_for(1000.1), 0.25);
        assert_eq!(envelope.cap_for(2800.0), 0.25);
    }
}
