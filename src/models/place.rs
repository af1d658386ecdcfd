use serde::{Deserialize, Serialize};

use super::Coordinate;

/// Name shown when the search service returns a feature without one
pub const PLACEHOLDER_NAME: &str = "Unknown Place";

/// A single point of interest returned by a place search.
///
/// Rebuilt on every search; never cached.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlaceResult {
    /// Upstream identifier, or the feature's index when the service omits one
    pub id: String,
    pub coordinate: Coordinate,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    /// POI categories in upstream order (e.g., ["cafe", "coffee shop"])
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub categories: Vec<String>,
}

impl PlaceResult {
    /// Create a place with only the required fields
    pub fn new(id: impl Into<String>, coordinate: Coordinate, name: Option<String>) -> Self {
        let name = name
            .map(|n| n.trim().to_string())
            .filter(|n| !n.is_empty())
            .unwrap_or_else(|| PLACEHOLDER_NAME.to_string());

        Self {
            id: id.into(),
            coordinate,
            name,
            address: None,
            categories: Vec::new(),
        }
    }

    pub fn with_address(mut self, address: Option<String>) -> Self {
        self.address = address.filter(|a| !a.trim().is_empty());
        self
    }

    pub fn with_categories(mut self, categories: Vec<String>) -> Self {
        self.categories = categories;
        self
    }

    /// Comma-joined categories, or "N/A" when there are none
    pub fn category_line(&self) -> String {
        if self.categories.is_empty() {
            "N/A".to_string()
        } else {
            self.categories.join(", ")
        }
    }

    /// Address, or "N/A" when the service did not provide one
    pub fn address_line(&self) -> &str {
        self.address.as_deref().unwrap_or("N/A")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn here() -> Coordinate {
        Coordinate::new(77.2, 28.6).unwrap()
    }

    #[test]
    fn test_placeholder_name() {
        assert_eq!(PlaceResult::new("0", here(), None).name, PLACEHOLDER_NAME);
        assert_eq!(
            PlaceResult::new("0", here(), Some("  ".into())).name,
            PLACEHOLDER_NAME
        );
    }

    #[test]
    fn test_category_line() {
        let place = PlaceResult::new("a", here(), Some("Cup Co".into()))
            .with_categories(vec!["cafe".into(), "coffee shop".into()]);
        assert_eq!(place.category_line(), "cafe, coffee shop");

        let bare = PlaceResult::new("b", here(), Some("Bare".into()));
        assert_eq!(bare.category_line(), "N/A");
        assert_eq!(bare.address_line(), "N/A");
    }
}
