use crate::constants::*;
use serde::{Deserialize, Serialize};
use std::env;
use std::str::FromStr;

/// How route risk scores are blended from their components.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RouteBlend {
    /// (count_norm + penalties_norm + loss_location_risk) / 3
    #[default]
    WithLossLocation,
    /// (count_norm + penalties_norm) / 2, same as liable parties
    TwoFactor,
}

impl FromStr for RouteBlend {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "loss_location" | "with_loss_location" | "three_factor" => {
                Ok(RouteBlend::WithLossLocation)
            }
            "two_factor" => Ok(RouteBlend::TwoFactor),
            _ => Err(format!(
                "Invalid route blend: {}. Use 'loss_location' or 'two_factor'",
                s
            )),
        }
    }
}

/// Read `name` from the environment, falling back to `default`, and parse it.
fn parse_env<T: FromStr>(name: &str, default: T) -> Result<T, String> {
    match env::var(name) {
        Ok(raw) => raw.trim().parse().map_err(|_| format!("Invalid {}", name)),
        Err(_) => Ok(default),
    }
}

#[derive(Debug, Clone)]
pub struct Config {
    pub host: String,
    pub port: u16,
    pub facility_catalog_path: String,
    pub incident_history_path: String,
    pub ratings_dir: String,
    pub nominatim_base_url: String,
    pub geocoder_user_agent: String,
    pub geocode_cache_ttl: u64,
    pub ors_api_key: Option<String>, // Isochrones are skipped without a key
    pub ors_base_url: String,
    pub detour_cost: DetourCostConfig,
    pub facility_search: FacilitySearchConfig,
    pub ratings: RatingsConfig,
    pub recommendation: RecommendationConfig,
}

/// Rates that turn a detour distance into money.
#[derive(Debug, Clone, PartialEq)]
pub struct DetourCostConfig {
    /// Flat fee for one weighing
    pub facility_fee: f64,

    /// Driver pay per hour of extra driving
    pub driver_hourly_rate: f64,

    /// Bonus per mile driven off the direct route
    pub out_of_route_mile_rate: f64,

    /// Average speed used to convert extra miles into hours
    pub average_speed_mph: f64,
}

impl Default for DetourCostConfig {
    fn default() -> Self {
        Self {
            facility_fee: DEFAULT_FACILITY_FEE,
            driver_hourly_rate: DEFAULT_DRIVER_HOURLY_RATE,
            out_of_route_mile_rate: DEFAULT_OUT_OF_ROUTE_MILE_RATE,
            average_speed_mph: DEFAULT_AVERAGE_SPEED_MPH,
        }
    }
}

impl DetourCostConfig {
    pub fn from_env() -> Result<Self, String> {
        let defaults = Self::default();

        let config = Self {
            facility_fee: parse_env("DETOUR_FACILITY_FEE", defaults.facility_fee)?,
            driver_hourly_rate: parse_env(
                "DETOUR_DRIVER_HOURLY_RATE",
                defaults.driver_hourly_rate,
            )?,
            out_of_route_mile_rate: parse_env(
                "DETOUR_OUT_OF_ROUTE_MILE_RATE",
                defaults.out_of_route_mile_rate,
            )?,
            average_speed_mph: parse_env("DETOUR_AVERAGE_SPEED_MPH", defaults.average_speed_mph)?,
        };
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), String> {
        if !(self.average_speed_mph > 0.0 && self.average_speed_mph.is_finite()) {
            return Err("DETOUR_AVERAGE_SPEED_MPH must be a positive number".to_string());
        }
        for (name, value) in [
            ("DETOUR_FACILITY_FEE", self.facility_fee),
            ("DETOUR_DRIVER_HOURLY_RATE", self.driver_hourly_rate),
            ("DETOUR_OUT_OF_ROUTE_MILE_RATE", self.out_of_route_mile_rate),
        ] {
            if value < 0.0 || !value.is_finite() {
                return Err(format!("{} must be a non-negative number", name));
            }
        }
        Ok(())
    }
}

/// Corridor envelope and candidate scoring parameters.
#[derive(Debug, Clone, PartialEq)]
pub struct FacilitySearchConfig {
    /// Routes up to this length (miles) use `short_route_deviation_cap`
    pub short_route_max_miles: f64,

    /// Routes up to this length (miles) use `medium_route_deviation_cap`
    pub medium_route_max_miles: f64,

    /// Max path deviation fraction for short routes (e.g., 0.15 = 15% longer)
    pub short_route_deviation_cap: f64,

    /// Max path deviation fraction for medium routes
    pub medium_route_deviation_cap: f64,

    /// Max path deviation fraction for anything longer
    pub long_route_deviation_cap: f64,

    /// Route risk at or above which early facilities get no proximity penalty
    pub early_weigh_risk_threshold: f64,

    /// Radius (miles) around the origin that counts as "early"
    pub early_weigh_radius_miles: f64,

    /// Score weight applied to the deviation fraction
    pub deviation_weight: f64,

    /// Detour cost divisor in the score
    pub cost_divisor: f64,

    /// Origin distance divisor in the score
    pub proximity_divisor: f64,
}

impl Default for FacilitySearchConfig {
    fn default() -> Self {
        Self {
            short_route_max_miles: DEFAULT_SHORT_ROUTE_MAX_MILES,
            medium_route_max_miles: DEFAULT_MEDIUM_ROUTE_MAX_MILES,
            short_route_deviation_cap: DEFAULT_SHORT_ROUTE_DEVIATION_CAP,
            medium_route_deviation_cap: DEFAULT_MEDIUM_ROUTE_DEVIATION_CAP,
            long_route_deviation_cap: DEFAULT_LONG_ROUTE_DEVIATION_CAP,
            early_weigh_risk_threshold: DEFAULT_EARLY_WEIGH_RISK_THRESHOLD,
            early_weigh_radius_miles: DEFAULT_EARLY_WEIGH_RADIUS_MILES,
            deviation_weight: DEFAULT_DEVIATION_WEIGHT,
            cost_divisor: DEFAULT_COST_DIVISOR,
            proximity_divisor: DEFAULT_PROXIMITY_DIVISOR,
        }
    }
}

impl FacilitySearchConfig {
    pub fn from_env() -> Result<Self, String> {
        let defaults = Self::default();

        let config = Self {
            short_route_max_miles: parse_env(
                "SEARCH_SHORT_ROUTE_MAX_MILES",
                defaults.short_route_max_miles,
            )?,
            medium_route_max_miles: parse_env(
                "SEARCH_MEDIUM_ROUTE_MAX_MILES",
                defaults.medium_route_max_miles,
            )?,
            short_route_deviation_cap: parse_env(
                "SEARCH_SHORT_ROUTE_DEVIATION_CAP",
                defaults.short_route_deviation_cap,
            )?,
            medium_route_deviation_cap: parse_env(
                "SEARCH_MEDIUM_ROUTE_DEVIATION_CAP",
                defaults.medium_route_deviation_cap,
            )?,
            long_route_deviation_cap: parse_env(
                "SEARCH_LONG_ROUTE_DEVIATION_CAP",
                defaults.long_route_deviation_cap,
            )?,
            early_weigh_risk_threshold: parse_env(
                "SEARCH_EARLY_WEIGH_RISK_THRESHOLD",
                defaults.early_weigh_risk_threshold,
            )?,
            early_weigh_radius_miles: parse_env(
                "SEARCH_EARLY_WEIGH_RADIUS_MILES",
                defaults.early_weigh_radius_miles,
            )?,
            deviation_weight: parse_env("SEARCH_DEVIATION_WEIGHT", defaults.deviation_weight)?,
            cost_divisor: parse_env("SEARCH_COST_DIVISOR", defaults.cost_divisor)?,
            proximity_divisor: parse_env("SEARCH_PROXIMITY_DIVISOR", defaults.proximity_divisor)?,
        };
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), String> {
        if self.short_route_max_miles <= 0.0
            || self.medium_route_max_miles <= self.short_route_max_miles
        {
            return Err(
                "SEARCH_MEDIUM_ROUTE_MAX_MILES must exceed SEARCH_SHORT_ROUTE_MAX_MILES (> 0)"
                    .to_string(),
            );
        }
        for (name, cap) in [
            ("SEARCH_SHORT_ROUTE_DEVIATION_CAP", self.short_route_deviation_cap),
            ("SEARCH_MEDIUM_ROUTE_DEVIATION_CAP", self.medium_route_deviation_cap),
            ("SEARCH_LONG_ROUTE_DEVIATION_CAP", self.long_route_deviation_cap),
        ] {
            if cap <= 0.0 || !cap.is_finite() {
                return Err(format!("{} must be a positive fraction", name));
            }
        }
        if !(0.0..=1.0).contains(&self.early_weigh_risk_threshold) {
            return Err("SEARCH_EARLY_WEIGH_RISK_THRESHOLD must be between 0 and 1".to_string());
        }
        if self.cost_divisor <= 0.0 || self.proximity_divisor <= 0.0 {
            return Err("SEARCH_COST_DIVISOR and SEARCH_PROXIMITY_DIVISOR must be positive".to_string());
        }
        Ok(())
    }
}

/// Batch rating build parameters.
#[derive(Debug, Clone, PartialEq)]
pub struct RatingsConfig {
    /// Incident cause that marks an overweight violation (exact match)
    pub overweight_cause: String,

    /// Component blend used for route risk scores
    pub route_blend: RouteBlend,
}

impl Default for RatingsConfig {
    fn default() -> Self {
        Self {
            overweight_cause: DEFAULT_OVERWEIGHT_CAUSE.to_string(),
            route_blend: RouteBlend::default(),
        }
    }
}

impl RatingsConfig {
    pub fn from_env() -> Result<Self, String> {
        let defaults = Self::default();

        Ok(Self {
            overweight_cause: env::var("RATINGS_OVERWEIGHT_CAUSE")
                .unwrap_or(defaults.overweight_cause),
            route_blend: env::var("RATINGS_ROUTE_BLEND")
                .unwrap_or_else(|_| "loss_location".to_string())
                .parse()?,
        })
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct RecommendationConfig {
    /// Medium-risk shipments scale only below this detour cost
    pub detour_cost_threshold: f64,
}

impl Default for RecommendationConfig {
    fn default() -> Self {
        Self {
            detour_cost_threshold: DEFAULT_DETOUR_COST_THRESHOLD,
        }
    }
}

impl RecommendationConfig {
    pub fn from_env() -> Result<Self, String> {
        let defaults = Self::default();
        let detour_cost_threshold =
            parse_env("DETOUR_COST_THRESHOLD", defaults.detour_cost_threshold)?;

        if detour_cost_threshold < 0.0 || !detour_cost_threshold.is_finite() {
            return Err("DETOUR_COST_THRESHOLD must be a non-negative number".to_string());
        }

        Ok(Self {
            detour_cost_threshold,
        })
    }
}

impl Config {
    pub fn from_env() -> Result<Self, String> {
        dotenv::dotenv().ok();

        Ok(Config {
            host: env::var("HOST").unwrap_or_else(|_| DEFAULT_HOST.to_string()),
            port: env::var("PORT")
                .unwrap_or_else(|_| DEFAULT_PORT.to_string())
                .parse()
                .map_err(|_| "Invalid PORT")?,
            facility_catalog_path: env::var("FACILITY_CATALOG_PATH")
                .unwrap_or_else(|_| DEFAULT_FACILITY_CATALOG_PATH.to_string()),
            incident_history_path: env::var("INCIDENT_HISTORY_PATH")
                .unwrap_or_else(|_| DEFAULT_INCIDENT_HISTORY_PATH.to_string()),
            ratings_dir: env::var("RATINGS_DIR").unwrap_or_else(|_| DEFAULT_RATINGS_DIR.to_string()),
            nominatim_base_url: env::var("NOMINATIM_BASE_URL")
                .unwrap_or_else(|_| DEFAULT_NOMINATIM_BASE_URL.to_string()),
            geocoder_user_agent: env::var("GEOCODER_USER_AGENT")
                .unwrap_or_else(|_| DEFAULT_GEOCODER_USER_AGENT.to_string()),
            geocode_cache_ttl: parse_env("GEOCODE_CACHE_TTL", DEFAULT_GEOCODE_CACHE_TTL_SECONDS)?,
            ors_api_key: env::var("ORS_API_KEY").ok().filter(|k| !k.trim().is_empty()),
            ors_base_url: env::var("ORS_BASE_URL").unwrap_or_else(|_| DEFAULT_ORS_BASE_URL.to_string()),
            detour_cost: DetourCostConfig::from_env()?,
            facility_search: FacilitySearchConfig::from_env()?,
            ratings: RatingsConfig::from_env()?,
            recommendation: RecommendationConfig::from_env()?,
        })
    }

    pub fn server_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}
