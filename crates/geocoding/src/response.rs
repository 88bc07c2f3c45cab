use model::Coordinate;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::ApiError;

/// One match of a forward lookup.
#[derive(Debug, Clone, PartialEq, Serialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct GeocodedPlace {
    pub display_name: String,
    pub location: Coordinate,
}

/// Entry of the `/search` response. Nominatim sends coordinates as strings.
#[derive(Debug, Clone, Deserialize)]
pub(crate) struct SearchResult {
    pub lat: String,
    pub lon: String,
    pub display_name: String,
}

/// `/reverse` answers with an `error` object when nothing is found.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub(crate) enum ReverseResponse {
    Found { display_name: String },
    NotFound { error: String },
}

pub(crate) fn parse_search(body: &str) -> Result<Vec<GeocodedPlace>, ApiError> {
    let results: Vec<SearchResult> = serde_json::from_str(body)?;
    let places = results
        .into_iter()
        .filter_map(|result| {
            let location = match (result.lat.parse::<f64>(), result.lon.parse::<f64>()) {
                (Ok(latitude), Ok(longitude)) => Coordinate::new(latitude, longitude).ok(),
                _ => None,
            };
            if location.is_none() {
                log::warn!(
                    "skipping geocoding result '{}' with unusable coordinates {}, {}",
                    result.display_name,
                    result.lat,
                    result.lon
                );
            }
            location.map(|location| GeocodedPlace {
                display_name: result.display_name,
                location,
            })
        })
        .collect::<Vec<_>>();
    Ok(places)
}

pub(crate) fn parse_reverse(body: &str) -> Result<Option<String>, ApiError> {
    match serde_json::from_str::<ReverseResponse>(body)? {
        ReverseResponse::Found { display_name } => Ok(Some(display_name)),
        ReverseResponse::NotFound { error } => {
            log::debug!("reverse geocoding found nothing: {error}");
            Ok(None)
        }
    }
}
