use super::{read_rows, text};
use crate::error::Result;
use crate::models::{CityState, IncidentRecord};
use serde::Deserialize;
use serde_json::Value;
use std::path::Path;

/// Claims export row. Every field is optional; numeric fields may arrive as
/// numbers, numeric strings or garbage.
#[derive(Debug, Deserialize)]
struct RawIncidentRow {
    #[serde(alias = "Loss City")]
    loss_city: Option<String>,
    #[serde(alias = "Loss State")]
    loss_state: Option<String>,
    #[serde(alias = "Ship From City")]
    ship_from_city: Option<String>,
    #[serde(alias = "Ship From State")]
    ship_from_state: Option<String>,
    #[serde(alias = "Ship To City")]
    ship_to_city: Option<String>,
    #[serde(alias = "Ship To State")]
    ship_to_state: Option<String>,
    #[serde(alias = "Liable Party Name")]
    liable_party: Option<String>,
    #[serde(alias = "Total Expense")]
    total_expense: Option<Value>,
    #[serde(alias = "Total Incurred")]
    total_incurred: Option<Value>,
    #[serde(alias = "Gross Weight")]
    gross_weight: Option<Value>,
    #[serde(alias = "Primary Incident Cause Desc")]
    cause: Option<String>,
}

/// Finite number out of a loosely typed cell.
fn numeric(value: Option<&Value>) -> Option<f64> {
    let n = match value? {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().replace(['$', ','], "").parse::<f64>().ok(),
        _ => None,
    }?;
    n.is_finite().then_some(n)
}

impl RawIncidentRow {
    /// `None` when a grouping key is missing; such rows cannot be attributed.
    fn into_record(self) -> Option<IncidentRecord> {
        let loss_location = CityState::new(text(self.loss_city)?, text(self.loss_state)?);
        let ship_from = CityState::new(text(self.ship_from_city)?, text(self.ship_from_state)?);
        let ship_to = CityState::new(text(self.ship_to_city)?, text(self.ship_to_state)?);
        let liable_party = text(self.liable_party)?;

        Some(IncidentRecord {
            loss_location,
            ship_from,
            ship_to,
            liable_party,
            total_expense: numeric(self.total_expense.as_ref()).unwrap_or(0.0),
            total_incurred: numeric(self.total_incurred.as_ref()).unwrap_or(0.0),
            gross_weight: numeric(self.gross_weight.as_ref()),
            cause: self.cause.map(|c| c.trim().to_string()).unwrap_or_default(),
        })
    }
}

/// Parse incident rows. Returns the records and the number of rows dropped
/// for missing grouping keys.
pub fn parse_incidents(json: &str) -> Result<(Vec<IncidentRecord>, usize)> {
    let rows: Vec<RawIncidentRow> = serde_json::from_str(json)?;
    Ok(convert(rows))
}

pub fn load_incidents(path: impl AsRef<Path>) -> Result<Vec<IncidentRecord>> {
    let path = path.as_ref();
    tracing::info!("Loading incident history from {}", path.display());

    let rows: Vec<RawIncidentRow> = read_rows(path, "incident history")?;
    let (records, skipped) = convert(rows);

    tracing::info!(
        loaded = records.len(),
        skipped,
        "Incident history: loaded {} ({} skipped)",
        records.len(),
        skipped
    );
    Ok(records)
}

fn convert(rows: Vec<RawIncidentRow>) -> (Vec<IncidentRecord>, usize) {
    let total = rows.len();
    let records: Vec<IncidentRecord> = rows
        .into_iter()
        .filter_map(RawIncidentRow::into_record)
        .collect();
    let skipped = total - records.len();
    if skipped > 0 {
        tracing::warn!("{} incident rows lack a location or liable party", skipped);
    }
    (records, skipped)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn coerces_amounts_and_keeps_missing_weight_absent() {
        let json = r#"[{
            "Loss City": "Sikeston", "Loss State": "MO",
            "Ship From City": "Memphis", "Ship From State": "TN",
            "Ship To City": "St. Louis", "Ship To State": "MO",
            "Liable Party Name": "Acme Freight",
            "Total Expense": "$1,250.50", "Total Incurred": "n/a",
            "Primary Incident Cause Desc": "overweight"
        }]"#;
        let (records, skipped) = parse_incidents(json).unwrap();
        assert_eq!(skipped, 0);
        let r = &records[0];
        assert_eq!(r.total_expense, 1250.5);
        assert_eq!(r.total_incurred, 0.0);
        assert_eq!(r.gross_weight, None);
        assert_eq!(r.cause, "overweight");
        assert_eq!(r.ship_to, CityState::new("St. Louis", "MO"));
    }

    #[test]
    fn drops_rows_missing_a_grouping_key() {
        let json = r#"[{
            "loss_city": "Sikeston", "loss_state": "MO",
            "ship_from_city": "Memphis", "ship_from_state": "TN",
            "ship_to_city": "", "ship_to_state": "MO",
            "liable_party": "Acme Freight", "total_expense": 10, "gross_weight": 80000
        }]"#;
        let (records, skipped) = parse_incidents(json).unwrap();
        assert!(records.is_empty());
        assert_eq!(skipped, 1);
    }

    #[test]
    fn numeric_cells() {
        assert_eq!(numeric(Some(&Value::from(12))), Some(12.0));
        assert_eq!(numeric(Some(&Value::from("7.5"))), Some(7.5));
        assert_eq!(numeric(Some(&Value::Bool(true))), None);
        assert_eq!(numeric(None), None);
    }
}
