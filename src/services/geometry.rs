use crate::constants::{DEGENERATE_ROUTE_EPSILON_MILES, METERS_PER_MILE};
use crate::error::{AppError, Result};
use crate::models::Coordinates;
use geo::{Distance, Geodesic, Point};

/// Ellipsoidal (WGS84) geodesic distance in statute miles.
///
/// Fails only when either coordinate is not a number or out of range.
pub fn distance(a: &Coordinates, b: &Coordinates) -> Result<f64> {
    a.validate().map_err(AppError::InvalidCoordinates)?;
    b.validate().map_err(AppError::InvalidCoordinates)?;
    Ok(geodesic_miles(a, b))
}

/// Distance for already-validated coordinates.
fn geodesic_miles(a: &Coordinates, b: &Coordinates) -> f64 {
    let origin: Point<f64> = (*a).into();
    let destination: Point<f64> = (*b).into();
    Geodesic.distance(origin, destination) / METERS_PER_MILE
}

/// The three legs of a detour through `point`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DetourLegs {
    pub direct_miles: f64,
    pub to_point_miles: f64,
    pub from_point_miles: f64,
}

impl DetourLegs {
    pub fn via_miles(&self) -> f64 {
        self.to_point_miles + self.from_point_miles
    }

    /// Extra miles driven compared to the direct route. Never negative: the
    /// triangle inequality holds for geodesics, and floating point noise on
    /// collinear points is clamped away.
    pub fn detour_miles(&self) -> f64 {
        let raw = self.via_miles() - self.direct_miles;
        debug_assert!(
            raw > -1e-6,
            "triangle inequality violated: via {} < direct {}",
            self.via_miles(),
            self.direct_miles
        );
        raw.max(0.0)
    }

    /// Fractional increase of the via route over the direct one.
    pub fn deviation(&self) -> f64 {
        self.detour_miles() / self.direct_miles
    }
}

/// Measure the direct route and both legs through `point`.
///
/// Errors with [`AppError::DegenerateRoute`] when `from` and `to` coincide,
/// since the deviation fraction is undefined for a zero-length route.
pub fn detour_legs(point: &Coordinates, from: &Coordinates, to: &Coordinates) -> Result<DetourLegs> {
    let direct_miles = direct_route_miles(from, to)?;
    point.validate().map_err(AppError::InvalidCoordinates)?;

    Ok(DetourLegs {
        direct_miles,
        to_point_miles: geodesic_miles(from, point),
        from_point_miles: geodesic_miles(point, to),
    })
}

/// Direct distance of a route, rejecting zero-length routes.
pub fn direct_route_miles(from: &Coordinates, to: &Coordinates) -> Result<f64> {
    let direct_miles = distance(from, to)?;
    if direct_miles < DEGENERATE_ROUTE_EPSILON_MILES {
        return Err(AppError::DegenerateRoute(format!(
            "origin ({:.5}, {:.5}) and destination ({:.5}, {:.5}) coincide",
            from.lat, from.lng, to.lat, to.lng
        )));
    }
    Ok(direct_miles)
}

/// ((d(from, point) + d(point, to)) - d(from, to)) / d(from, to)
pub fn path_deviation(point: &Coordinates, from: &Coordinates, to: &Coordinates) -> Result<f64> {
    Ok(detour_legs(point, from, to)?.deviation())
}
