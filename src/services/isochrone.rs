use crate::error::{AppError, Result};
use crate::models::{Coordinates, Facility};
use async_trait::async_trait;
use geo::{Contains, LineString, Point, Polygon};
use reqwest::Client;
use serde::Serialize;

/// Area reachable from a point within a drive-time budget.
#[derive(Debug, Clone)]
pub struct Isochrone {
    pub polygon: Polygon<f64>,
    /// Same shape as returned by the routing service, for rendering
    pub geometry: geojson::Geometry,
    pub area_m2: Option<f64>,
}

#[async_trait]
pub trait IsochroneProvider: Send + Sync {
    async fn isochrone(&self, center: &Coordinates, minutes: u32) -> Result<Isochrone>;
}

/// OpenRouteService isochrones for heavy goods vehicles.
#[derive(Clone)]
pub struct OrsIsochroneClient {
    client: Client,
    api_key: String,
    base_url: String,
    profile: String,
}

#[derive(Debug, Serialize)]
struct IsochroneRequest<'a> {
    /// [lng, lat] pairs
    locations: Vec<[f64; 2]>,
    /// Seconds
    range: Vec<u32>,
    attributes: [&'a str; 2],
}

impl OrsIsochroneClient {
    pub fn new(api_key: String, base_url: String, profile: String) -> Self {
        OrsIsochroneClient {
            client: Client::new(),
            api_key,
            base_url,
            profile,
        }
    }
}

#[async_trait]
impl IsochroneProvider for OrsIsochroneClient {
    async fn isochrone(&self, center: &Coordinates, minutes: u32) -> Result<Isochrone> {
        let url = format!("{}/{}", self.base_url.trim_end_matches('/'), self.profile);
        let body = IsochroneRequest {
            locations: vec![[center.lng, center.lat]],
            range: vec![minutes * 60],
            attributes: ["area", "reachfactor"],
        };

        tracing::debug!(
            lat = center.lat,
            lng = center.lng,
            minutes,
            profile = %self.profile,
            "ORS isochrone request: {} min ({})",
            minutes, self.profile
        );

        let response = self
            .client
            .post(&url)
            .header(reqwest::header::AUTHORIZATION, &self.api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| AppError::Isochrone(format!("Request failed: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            tracing::warn!(status = %status, "ORS HTTP error {}: {}", status, error_text);
            return Err(AppError::Isochrone(format!("HTTP {}: {}", status, error_text)));
        }

        let collection: geojson::FeatureCollection = response
            .json()
            .await
            .map_err(|e| AppError::Isochrone(format!("Failed to parse response: {}", e)))?;

        isochrone_from_collection(collection)
    }
}

/// First feature of the response, which is the single requested range.
pub fn isochrone_from_collection(collection: geojson::FeatureCollection) -> Result<Isochrone> {
    let feature = collection
        .features
        .into_iter()
        .next()
        .ok_or_else(|| AppError::Isochrone("Response contained no features".to_string()))?;

    let area_m2 = feature
        .properties
        .as_ref()
        .and_then(|props| props.get("area"))
        .and_then(|v| v.as_f64());

    let geometry = feature
        .geometry
        .ok_or_else(|| AppError::Isochrone("Feature has no geometry".to_string()))?;
    let polygon = polygon_from_geometry(&geometry)?;

    Ok(Isochrone {
        polygon,
        geometry,
        area_m2,
    })
}

fn polygon_from_geometry(geometry: &geojson::Geometry) -> Result<Polygon<f64>> {
    let rings = match &geometry.value {
        geojson::Value::Polygon(rings) => rings,
        _ => {
            return Err(AppError::Isochrone(
                "Expected a Polygon geometry".to_string(),
            ))
        }
    };

    let mut rings = rings.iter().map(|ring| ring_to_line_string(ring.as_slice()));
    let exterior = rings
        .next()
        .ok_or_else(|| AppError::Isochrone("Polygon has no rings".to_string()))??;
    let interiors = rings.collect::<Result<Vec<_>>>()?;
    Ok(Polygon::new(exterior, interiors))
}

fn ring_to_line_string(ring: &[Vec<f64>]) -> Result<LineString<f64>> {
    ring.iter()
        .map(|position| match position.as_slice() {
            [lng, lat, ..] => Ok((*lng, *lat)),
            _ => Err(AppError::Isochrone("Position with fewer than 2 values".to_string())),
        })
        .collect::<Result<Vec<(f64, f64)>>>()
        .map(LineString::from)
}

/// Catalog rows strictly inside the polygon, in catalog order.
pub fn facilities_in_isochrone(polygon: &Polygon<f64>, facilities: &[Facility]) -> Vec<Facility> {
    facilities
        .iter()
        .filter(|f| polygon.contains(&Point::new(f.coordinates.lng, f.coordinates.lat)))
        .cloned()
        .collect()
}
