use crate::models::Coordinates;
use serde::{Deserialize, Serialize};
use std::fmt;

/// A certified weighing station from the facility catalog.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Facility {
    pub catalog_number: String,
    pub state: String,
    pub city: String,
    pub name: String,
    pub address: String,
    pub coordinates: Coordinates,
}

impl Facility {
    pub fn new(
        catalog_number: impl Into<String>,
        state: impl Into<String>,
        city: impl Into<String>,
        name: impl Into<String>,
        address: impl Into<String>,
        coordinates: Coordinates,
    ) -> Self {
        Facility {
            catalog_number: catalog_number.into(),
            state: state.into(),
            city: city.into(),
            name: name.into(),
            address: address.into(),
            coordinates,
        }
    }

    pub fn in_state(&self, state: &str) -> bool {
        self.state.trim().eq_ignore_ascii_case(state.trim())
    }
}

impl fmt::Display for Facility {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} - {}, {} (#{})",
            self.name, self.city, self.state, self.catalog_number
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_reads_like_a_directory_entry() {
        let facility = Facility::new(
            "1018",
            "MO",
            "Poplar Bluff",
            "Heartland Express",
            "4155 S Westwood Blvd",
            Coordinates::new(36.73, -90.42).unwrap(),
        );
        assert_eq!(
            facility.to_string(),
            "Heartland Express - Poplar Bluff, MO (#1018)"
        );
        assert!(facility.in_state("mo"));
        assert!(!facility.in_state("AR"));
    }
}
