use chrono::{DateTime, Utc};
use schemars::JsonSchema;
use serde::Serialize;
use utility::id::{HasId, Id};

use crate::{coordinate::Coordinate, place::Place};

/// A user's accepted visit to a place.
#[derive(Debug, Clone, PartialEq, Serialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct Checkin {
    pub place_id: Id<Place>,
    pub user_id: String,
    /// Device location the check-in was submitted from.
    pub location: Coordinate,
    /// Distance between `location` and the place when the check-in was accepted.
    pub distance_meters: f64,
    pub created_at: DateTime<Utc>,
}

impl HasId for Checkin {
    type IdType = String;
}
