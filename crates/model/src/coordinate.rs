use schemars::JsonSchema;
use serde::Serialize;
use utility::geo::{self, BoundingBox};

use crate::error::ValidationError;

/// A WGS84 position. Can only be constructed with in-range, finite values.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct Coordinate {
    latitude: f64,
    longitude: f64,
}

impl Coordinate {
    pub fn new(latitude: f64, longitude: f64) -> Result<Self, ValidationError> {
        if !latitude.is_finite() || !(-90.0..=90.0).contains(&latitude) {
            return Err(ValidationError::LatitudeOutOfRange(latitude));
        }
        if !longitude.is_finite() || !(-180.0..=180.0).contains(&longitude) {
            return Err(ValidationError::LongitudeOutOfRange(longitude));
        }
        Ok(Self {
            latitude,
            longitude,
        })
    }

    pub fn latitude(&self) -> f64 {
        self.latitude
    }

    pub fn longitude(&self) -> f64 {
        self.longitude
    }

    /// Great-circle distance in meters.
    pub fn distance_to(&self, other: &Coordinate) -> f64 {
        geo::haversine_distance(
            self.latitude,
            self.longitude,
            other.latitude,
            other.longitude,
        )
    }

    pub fn is_within(&self, bounding_box: &BoundingBox) -> bool {
        bounding_box.contains(self.latitude, self.longitude)
    }
}

/// Scopes a search to a circle around `center`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct LocationFilter {
    center: Coordinate,
    radius_km: f64,
}

impl LocationFilter {
    pub fn new(center: Coordinate, radius_km: f64) -> Result<Self, ValidationError> {
        if !radius_km.is_finite() || radius_km <= 0.0 {
            return Err(ValidationError::InvalidRadius(radius_km));
        }
        Ok(Self { center, radius_km })
    }

    pub fn center(&self) -> Coordinate {
        self.center
    }

    pub fn radius_km(&self) -> f64 {
        self.radius_km
    }

    pub fn radius_meters(&self) -> f64 {
        self.radius_km * 1000.0
    }

    pub fn bounding_box(&self) -> BoundingBox {
        geo::calculate_bounding_box(
            self.center.latitude,
            self.center.longitude,
            self.radius_km,
        )
    }
}

/// Implemented by everything that can be found by a location search.
pub trait Locatable {
    fn coordinate(&self) -> Option<Coordinate>;
}
