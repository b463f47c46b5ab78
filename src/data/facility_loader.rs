use super::{read_rows, text};
use crate::error::Result;
use crate::models::{Coordinates, Facility};
use serde::Deserialize;
use std::path::Path;

/// Catalog row as it appears in the JSON export, before validation.
#[derive(Debug, Deserialize)]
struct RawFacilityRow {
    #[serde(alias = "CAT Scale Number")]
    catalog_number: Option<serde_json::Value>,
    #[serde(alias = "State")]
    state: Option<String>,
    #[serde(alias = "City")]
    city: Option<String>,
    #[serde(alias = "Name")]
    name: Option<String>,
    #[serde(alias = "Address")]
    address: Option<String>,
    #[serde(alias = "Latitude", alias = "lat")]
    latitude: Option<f64>,
    #[serde(alias = "Longitude", alias = "lng", alias = "lon")]
    longitude: Option<f64>,
}

impl RawFacilityRow {
    /// `None` when the row cannot be placed on the map.
    fn into_facility(self, index: usize) -> Option<Facility> {
        let coordinates = match (self.latitude, self.longitude) {
            (Some(lat), Some(lng)) => match Coordinates::new(lat, lng) {
                Ok(c) => c,
                Err(e) => {
                    tracing::warn!(row = index, "Skipping facility row {}: {}", index, e);
                    return None;
                }
            },
            _ => {
                tracing::warn!(row = index, "Skipping facility row {}: missing coordinates", index);
                return None;
            }
        };

        // Catalog numbers are numeric in some exports and text in others
        let catalog_number = match self.catalog_number {
            Some(serde_json::Value::String(s)) if !s.trim().is_empty() => s.trim().to_string(),
            Some(serde_json::Value::Number(n)) => n.to_string(),
            _ => format!("row-{}", index),
        };

        Some(Facility {
            catalog_number,
            state: text(self.state).unwrap_or_default(),
            city: text(self.city).unwrap_or_default(),
            name: text(self.name).unwrap_or_else(|| "Unknown".to_string()),
            address: text(self.address).unwrap_or_default(),
            coordinates,
        })
    }
}

/// Parse catalog rows, dropping the ones without usable coordinates.
/// Returns the facilities and the number of skipped rows.
pub fn parse_facilities(json: &str) -> Result<(Vec<Facility>, usize)> {
    let rows: Vec<RawFacilityRow> = serde_json::from_str(json)?;
    Ok(convert(rows))
}

pub fn load_facilities(path: impl AsRef<Path>) -> Result<Vec<Facility>> {
    let path = path.as_ref();
    tracing::info!("Loading facility catalog from {}", path.display());

    let rows: Vec<RawFacilityRow> = read_rows(path, "facility catalog")?;
    let (facilities, skipped) = convert(rows);

    tracing::info!(
        loaded = facilities.len(),
        skipped,
        "Facility catalog: loaded {} ({} skipped)",
        facilities.len(),
        skipped
    );
    Ok(facilities)
}

fn convert(rows: Vec<RawFacilityRow>) -> (Vec<Facility>, usize) {
    let total = rows.len();
    let facilities: Vec<Facility> = rows
        .into_iter()
        .enumerate()
        .filter_map(|(i, row)| row.into_facility(i))
        .collect();
    let skipped = total - facilities.len();
    (facilities, skipped)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn skips_rows_without_usable_coordinates() {
        let json = r#"[
            {"catalog_number": "1018", "state": "MO", "city": "Sikeston", "name": "Travel Center",
             "address": "1 I-55", "latitude": 36.88, "longitude": -89.58},
            {"catalog_number": "1019", "state": "MO", "city": "Nowhere", "name": "Ghost",
             "address": "", "latitude": null, "longitude": -89.0},
            {"catalog_number": "1020", "state": "TN", "city": "Bad", "name": "Out of range",
             "address": "", "latitude": 123.0, "longitude": -89.0}
        ]"#;
        let (facilities, skipped) = parse_facilities(json).unwrap();
        assert_eq!(facilities.len(), 1);
        assert_eq!(skipped, 2);
        assert_eq!(facilities[0].catalog_number, "1018");
        assert_eq!(facilities[0].coordinates.lat, 36.88);
    }

    #[test]
    fn accepts_export_column_names() {
        let json = r#"[{"CAT Scale Number": 2211, "State": "AR", "City": "West Memphis",
            "Name": "Flying J", "Address": "3400 Service Loop", "Latitude": 35.15, "Longitude": -90.18}]"#;
        let (facilities, skipped) = parse_facilities(json).unwrap();
        assert_eq!(skipped, 0);
        assert_eq!(facilities[0].catalog_number, "2211");
        assert!(facilities[0].in_state("ar"));
    }

    #[test]
    fn malformed_json_is_an_error() {
        assert!(parse_facilities("{not json").is_err());
    }
}
