//! Stable application-wide constants.
//!
//! Values here are structural invariants, algorithm coefficients, and default
//! fallbacks for env-var-based configuration. They should rarely change.
//! Tuning knobs that operators adjust per deployment live in
//! [`Config`](crate::config::Config) and its sub-configs instead.

// --- Server defaults (used when HOST / PORT env vars are absent) ---

/// Default bind address for the HTTP server.
pub const DEFAULT_HOST: &str = "0.0.0.0";
/// Default port for the HTTP server.
pub const DEFAULT_PORT: &str = "3000";

// --- Data locations ---

/// Default facility catalog (JSON array of facility rows).
pub const DEFAULT_FACILITY_CATALOG_PATH: &str = "data/cat_scales.json";
/// Default incident history (JSON array of incident rows).
pub const DEFAULT_INCIDENT_HISTORY_PATH: &str = "data/incidents.json";
/// Default directory holding ratings artifacts and the "latest" pointer.
pub const DEFAULT_RATINGS_DIR: &str = "data";

// --- Ratings artifact naming ---

/// File name prefix of every ratings artifact.
pub const RATINGS_ARTIFACT_PREFIX: &str = "risk_ratings_";
/// File extension of every ratings artifact.
pub const RATINGS_ARTIFACT_EXTENSION: &str = "json";
/// Name of the pointer file identifying the most recent artifact.
pub const LATEST_RATINGS_POINTER: &str = "latest_risk_ratings.txt";
/// Schema version written into every artifact.
pub const RATINGS_ARTIFACT_VERSION: u32 = 1;

// --- Risk rating cut points ---
// Applied identically to every rating table and to the recommendation bands.

/// Scores at or above this value are rated High.
pub const HIGH_RISK_THRESHOLD: f64 = 0.7;
/// Scores at or above this value (and below High) are rated Medium.
pub const MEDIUM_RISK_THRESHOLD: f64 = 0.4;

/// Incident cause label that marks a record as an overweight violation.
pub const DEFAULT_OVERWEIGHT_CAUSE: &str = "overweight";

// --- Detour cost model defaults ---

/// Flat fee charged for one weighing at a facility.
pub const DEFAULT_FACILITY_FEE: f64 = 14.0;
/// Driver pay per hour of detour time.
pub const DEFAULT_DRIVER_HOURLY_RATE: f64 = 30.0;
/// Bonus paid per mile driven off the direct route.
pub const DEFAULT_OUT_OF_ROUTE_MILE_RATE: f64 = 2.0;
/// Assumed average truck speed used to convert detour miles into hours.
pub const DEFAULT_AVERAGE_SPEED_MPH: f64 = 50.0;

// --- Facility search defaults ---

/// Routes up to this many miles use the short-route deviation cap.
pub const DEFAULT_SHORT_ROUTE_MAX_MILES: f64 = 500.0;
/// Routes up to this many miles (and above the short limit) use the medium cap.
pub const DEFAULT_MEDIUM_ROUTE_MAX_MILES: f64 = 1000.0;
/// Maximum path deviation fraction for short routes.
pub const DEFAULT_SHORT_ROUTE_DEVIATION_CAP: f64 = 0.15;
/// Maximum path deviation fraction for medium routes.
pub const DEFAULT_MEDIUM_ROUTE_DEVIATION_CAP: f64 = 0.20;
/// Maximum path deviation fraction for long routes.
pub const DEFAULT_LONG_ROUTE_DEVIATION_CAP: f64 = 0.25;

/// Route risk at or above which nearby facilities lose their proximity penalty.
pub const DEFAULT_EARLY_WEIGH_RISK_THRESHOLD: f64 = 0.7;
/// Facilities within this many miles of the origin count as "early" stops.
pub const DEFAULT_EARLY_WEIGH_RADIUS_MILES: f64 = 100.0;

/// Score points per unit of path deviation fraction.
pub const DEFAULT_DEVIATION_WEIGHT: f64 = 100.0;
/// Detour cost is divided by this before entering the score.
pub const DEFAULT_COST_DIVISOR: f64 = 50.0;
/// Origin distance (miles) is divided by this before entering the score.
pub const DEFAULT_PROXIMITY_DIVISOR: f64 = 100.0;

// --- Recommendation defaults ---

/// Medium-risk shipments scale only when the detour costs less than this.
pub const DEFAULT_DETOUR_COST_THRESHOLD: f64 = 100.0;

// --- Geometry ---

/// Meters in one statute mile.
pub const METERS_PER_MILE: f64 = 1609.344;
/// Direct distances below this (miles) are treated as a zero-length route.
pub const DEGENERATE_ROUTE_EPSILON_MILES: f64 = 1e-9;

// --- External collaborators ---

/// Public Nominatim search endpoint.
pub const DEFAULT_NOMINATIM_BASE_URL: &str = "https://nominatim.openstreetmap.org/search";
/// User agent sent to Nominatim, which rejects anonymous clients.
pub const DEFAULT_GEOCODER_USER_AGENT: &str = "scalewise/0.1";
/// OpenRouteService isochrone endpoint (profile appended).
pub const DEFAULT_ORS_BASE_URL: &str = "https://api.openrouteservice.org/v2/isochrones";
/// Routing profile used for isochrones; heavy goods vehicles.
pub const ORS_TRUCK_PROFILE: &str = "driving-hgv";
/// Default isochrone drive time in minutes.
pub const DEFAULT_ISOCHRONE_MINUTES: u32 = 30;
/// Upper bound on requested isochrone drive time in minutes.
pub const MAX_ISOCHRONE_MINUTES: u32 = 120;

// --- Geocode cache defaults ---

/// Default geocode cache TTL: 7 days. Overridden by `GEOCODE_CACHE_TTL`.
pub const DEFAULT_GEOCODE_CACHE_TTL_SECONDS: u64 = 604_800;
/// Maximum entries in the in-memory geocode cache.
pub const DEFAULT_GEOCODE_CACHE_MAX_ENTRIES: u64 = 10_000;
