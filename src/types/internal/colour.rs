use std::fmt;

use serde::{Deserialize, Serialize};

/// Palette accepted for todo lists, as (name, hex code)
const SUPPORTED: &[(&str, &str)] = &[
    ("White", "#FFFFFF"),
    ("Red", "#FF5733"),
    ("Orange", "#FFC300"),
    ("Yellow", "#FFFF66"),
    ("Green", "#CCFF99"),
    ("Blue", "#6666FF"),
    ("Purple", "#9966CC"),
    ("Grey", "#999999"),
];

/// Colour value object; only palette colours can be constructed
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Colour(&'static str);

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Colour \"{0}\" is unsupported")]
pub struct UnsupportedColour(pub String);

impl Colour {
    /// Parse a hex code, case-insensitive, with or without the leading '#'
    pub fn from_code(code: &str) -> Result<Self, UnsupportedColour> {
        let trimmed = code.trim();
        let normalized = if trimmed.starts_with('#') {
            trimmed.to_ascii_uppercase()
        } else {
            format!("#{}", trimmed.to_ascii_uppercase())
        };

        SUPPORTED
            .iter()
            .find(|(_, hex)| *hex == normalized)
            .map(|(_, hex)| Colour(hex))
            .ok_or_else(|| UnsupportedColour(code.to_string()))
    }

    pub fn white() -> Self {
        Colour(SUPPORTED[0].1)
    }

    pub fn code(&self) -> &'static str {
        self.0
    }

    pub fn name(&self) -> &'static str {
        SUPPORTED
            .iter()
            .find(|(_, hex)| *hex == self.0)
            .map(|(name, _)| *name)
            .unwrap_or("Unknown")
    }

    pub fn supported() -> Vec<Colour> {
        SUPPORTED.iter().map(|(_, hex)| Colour(hex)).collect()
    }
}

impl Default for Colour {
    fn default() -> Self {
        Self::white()
    }
}

impl fmt::Display for Colour {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.0)
    }
}

impl TryFrom<String> for Colour {
    type Error = UnsupportedColour;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Colour::from_code(&value)
    }
}

impl From<Colour> for String {
    fn from(colour: Colour) -> Self {
        colour.0.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_is_case_insensitive_and_prefix_optional() {
        assert_eq!(Colour::from_code("ff5733").unwrap().code(), "#FF5733");
        assert_eq!(Colour::from_code("#ff5733").unwrap().name(), "Red");
    }

    #[test]
    fn test_unsupported_colour_rejected() {
        assert_eq!(
            Colour::from_code("#123456"),
            Err(UnsupportedColour("#123456".to_string()))
        );
    }

    #[test]
    fn test_equal_codes_are_equal_values() {
        assert_eq!(Colour::from_code("#FFFFFF").unwrap(), Colour::white());
        assert_eq!(Colour::supported().len(), 8);
    }
}
