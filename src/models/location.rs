use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A city/state pair such as `Memphis, TN`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CityState {
    pub city: String,
    pub state: String,
}

impl CityState {
    pub fn new(city: impl Into<String>, state: impl Into<String>) -> Self {
        CityState {
            city: city.into(),
            state: state.into(),
        }
    }

    /// Case-insensitive comparison, ignoring surrounding whitespace.
    pub fn matches(&self, other: &CityState) -> bool {
        eq_ignore_case(&self.city, &other.city) && eq_ignore_case(&self.state, &other.state)
    }
}

pub(crate) fn eq_ignore_case(a: &str, b: &str) -> bool {
    a.trim().to_uppercase() == b.trim().to_uppercase()
}

impl fmt::Display for CityState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}, {}", self.city, self.state)
    }
}

impl FromStr for CityState {
    type Err = String;

    /// Parses `City, ST`. The last comma separates the state, so
    /// `Winston-Salem, Forsyth County, NC` keeps everything before it as city.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (city, state) = s
            .rsplit_once(',')
            .ok_or_else(|| format!("Expected 'City, State' but got '{}'", s))?;
        let city = city.trim();
        let state = state.trim();
        if city.is_empty() || state.is_empty() {
            return Err(format!("Expected 'City, State' but got '{}'", s));
        }
        Ok(CityState::new(city, state))
    }
}
