//! Search Box API response parsing.

use serde::Deserialize;
use tracing::{debug, warn};

use crate::error::SearchError;
use crate::models::{Coordinate, PlaceResult};

#[derive(Debug, Deserialize)]
struct FeatureCollection {
    #[serde(default)]
    features: Vec<Feature>,
}

#[derive(Debug, Deserialize)]
struct Feature {
    geometry: Geometry,
    #[serde(default)]
    properties: Properties,
}

#[derive(Debug, Deserialize)]
struct Geometry {
    coordinates: [f64; 2],
}

#[derive(Debug, Default, Deserialize)]
struct Properties {
    mapbox_id: Option<String>,
    name: Option<String>,
    full_address: Option<String>,
    place_formatted: Option<String>,
    #[serde(default)]
    poi_category: Option<Vec<String>>,
}

/// Parse a Search Box `forward` response body into places.
///
/// A body without `features` is an empty result. Features whose coordinates
/// are out of range are skipped.
pub fn parse_features(body: &str) -> Result<Vec<PlaceResult>, SearchError> {
    let collection: FeatureCollection = serde_json::from_str(body)?;
    debug!("Search response has {} features", collection.features.len());

    let places = collection
        .features
        .into_iter()
        .enumerate()
        .filter_map(|(index, feature)| {
            let coordinate = match Coordinate::try_from(feature.geometry.coordinates) {
                Ok(c) => c,
                Err(e) => {
                    warn!("Skipping feature {}: {}", index, e);
                    return None;
                }
            };

            let props = feature.properties;
            let id = props.mapbox_id.unwrap_or_else(|| index.to_string());
            let address = props.full_address.or(props.place_formatted);

            Some(
                PlaceResult::new(id, coordinate, props.name)
                    .with_address(address)
                    .with_categories(props.poi_category.unwrap_or_default()),
            )
        })
        .collect();

    Ok(places)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::PLACEHOLDER_NAME;

    const BODY: &str = r#"{
        "type": "FeatureCollection",
        "features": [
            {
                "type": "Feature",
                "geometry": { "type": "Point", "coordinates": [77.2167, 28.6315] },
                "properties": {
                    "mapbox_id": "dXJuOm1ieHBvaTox",
                    "name": "Green Refill Store",
                    "full_address": "Block A, Connaught Place, New Delhi, 110001, India",
                    "place_formatted": "New Delhi, 110001, India",
                    "poi_category": ["shopping", "grocery"]
                }
            },
            {
                "type": "Feature",
                "geometry": { "type": "Point", "coordinates": [77.1, 28.5] },
                "properties": {
                    "place_formatted": "Gurugram, Haryana, India"
                }
            }
        ],
        "attribution": "© 2024 Mapbox and its suppliers."
    }"#;

    #[test]
    fn test_parse_features() {
        let places = parse_features(BODY).unwrap();
        assert_eq!(places.len(), 2);

        let first = &places[0];
        assert_eq!(first.id, "dXJuOm1ieHBvaTox");
        assert_eq!(first.name, "Green Refill Store");
        assert_eq!(
            first.address.as_deref(),
            Some("Block A, Connaught Place, New Delhi, 110001, India")
        );
        assert_eq!(first.categories, vec!["shopping", "grocery"]);
        assert_eq!(first.coordinate.longitude, 77.2167);

        let second = &places[1];
        assert_eq!(second.id, "1");
        assert_eq!(second.name, PLACEHOLDER_NAME);
        assert_eq!(second.address.as_deref(), Some("Gurugram, Haryana, India"));
        assert_eq!(second.category_line(), "N/A");
    }

    #[test]
    fn test_missing_features_is_empty() {
        assert!(parse_features(r#"{"type": "FeatureCollection"}"#)
            .unwrap()
            .is_empty());
    }

    #[test]
    fn test_malformed_body() {
        let err = parse_features("<html>Bad Gateway</html>").unwrap_err();
        assert!(err.is_parse());

        let err = parse_features(r#"{"features": [{"geometry": {}}]}"#).unwrap_err();
        assert!(err.is_parse());
    }

    #[test]
    fn test_skips_out_of_range_coordinates() {
        let body = r#"{"features": [
            {"geometry": {"coordinates": [500.0, 10.0]}, "properties": {"name": "Nowhere"}},
            {"geometry": {"coordinates": [10.0, 10.0]}, "properties": {"name": "Somewhere"}}
        ]}"#;
        let places = parse_features(body).unwrap();
        assert_eq!(places.len(), 1);
        assert_eq!(places[0].name, "Somewhere");
    }
}
