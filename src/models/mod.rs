pub mod assessment;
pub mod coordinates;
pub mod facility;
pub mod incident;
pub mod location;
pub mod rating;

pub use assessment::{
    Assessment, AssessmentOutcome, AssessmentRequest, BestFacilityRequest, BestFacilityResponse,
    CostBreakdown, DetourCandidate,
    FacilitySelection, Recommendation, ResolvedShipment, RiskLookup, RiskProfile, SearchPool,
    UnresolvedLocation,
};
pub use coordinates::Coordinates;
pub use facility::Facility;
pub use incident::IncidentRecord;
pub use location::CityState;
pub use rating::{PartyKey, RatingTables, RiskLevel, RiskRating, RouteKey};
