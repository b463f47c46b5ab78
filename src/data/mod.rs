//! Loaders for the facility catalog and the incident history.

mod facility_loader;
mod incident_loader;

pub use facility_loader::{load_facilities, parse_facilities};
pub use incident_loader::{load_incidents, parse_incidents};

use crate::error::{AppError, Result};
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

/// Open a JSON array of rows. Unreadable files and malformed JSON are fatal.
fn read_rows<T: serde::de::DeserializeOwned>(path: &Path, what: &str) -> Result<Vec<T>> {
    let file = File::open(path).map_err(|e| {
        AppError::DataLoad(format!("Cannot open {} at {}: {}", what, path.display(), e))
    })?;
    serde_json::from_reader(BufReader::new(file)).map_err(|e| {
        AppError::DataLoad(format!("Malformed {} at {}: {}", what, path.display(), e))
    })
}

/// Trimmed, non-empty text or nothing.
fn text(value: Option<String>) -> Option<String> {
    value
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
}
