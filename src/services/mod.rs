pub mod assessment;
pub mod facility_finder;
pub mod geocoder;
pub mod geometry;
pub mod isochrone;
pub mod recommendation;
pub mod risk_evaluator;
