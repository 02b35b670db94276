use serde::{Deserialize, Serialize};

use crate::errors::InternalError;

/// Postal address owned by a user profile
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Address {
    pub label: String,
    pub line1: String,
    pub line2: Option<String>,
    pub city: String,
    pub region: Option<String>,
    pub postal_code: String,
    /// ISO 3166 alpha-2 code (`UK` accepted for Great Britain)
    pub country: String,
}

/// Shopping preferences owned by a user profile
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Preferences {
    #[serde(default)]
    pub preferred_sizes: Vec<String>,
    #[serde(default)]
    pub favourite_brands: Vec<String>,
    pub preferred_currency: Option<String>,
    #[serde(default)]
    pub newsletter: bool,
}

pub fn addresses_to_json(addresses: &[Address]) -> Result<String, InternalError> {
    serde_json::to_string(addresses).map_err(|e| InternalError::parse("addresses", e.to_string()))
}

pub fn addresses_from_json(json: &str) -> Result<Vec<Address>, InternalError> {
    serde_json::from_str(json).map_err(|e| InternalError::parse("addresses", e.to_string()))
}

pub fn preferences_to_json(preferences: &Preferences) -> Result<String, InternalError> {
    serde_json::to_string(preferences).map_err(|e| InternalError::parse("preferences", e.to_string()))
}

pub fn preferences_from_json(json: &str) -> Result<Preferences, InternalError> {
    serde_json::from_str(json).map_err(|e| InternalError::parse("preferences", e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_preferences_object_parses_to_defaults() {
        assert_eq!(preferences_from_json("{}").unwrap(), Preferences::default());
    }

    #[test]
    fn test_malformed_addresses_report_parse_error() {
        let err = addresses_from_json("not json").unwrap_err();
        assert!(matches!(err, InternalError::Parse { .. }));
    }
}
