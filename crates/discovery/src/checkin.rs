//! Location gate for check-ins: a user may only check in to a place they are
//! physically close to.

use std::{env, fmt};

use model::{Coordinate, ValidationError};
use serde::Serialize;

pub const DEFAULT_MAX_DISTANCE_METERS: u32 = 100;
pub const MAX_DISTANCE_LIMIT_METERS: u32 = 1000;

/// How far from a place check-ins are accepted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CheckinPolicy {
    default_max_distance_meters: u32,
    max_distance_limit_meters: u32,
}

impl CheckinPolicy {
    pub fn new(
        default_max_distance_meters: u32,
        max_distance_limit_meters: u32,
    ) -> Result<Self, ValidationError> {
        if default_max_distance_meters == 0
            || default_max_distance_meters > max_distance_limit_meters
        {
            return Err(ValidationError::MaxDistanceOutOfRange {
                requested: default_max_distance_meters,
                limit: max_distance_limit_meters,
            });
        }
        Ok(Self {
            default_max_distance_meters,
            max_distance_limit_meters,
        })
    }

    /// Reads `CHECKIN_DEFAULT_MAX_DISTANCE_METERS` and
    /// `CHECKIN_MAX_DISTANCE_LIMIT_METERS`.
    pub fn from_env() -> Result<Self, ValidationError> {
        fn read(key: &str, default: u32) -> u32 {
            match env::var(key).map(|value| value.parse::<u32>()) {
                Ok(Ok(value)) => value,
                Ok(Err(why)) => {
                    log::warn!("ignoring {key}: {why}");
                    default
                }
                Err(_) => default,
            }
        }

        Self::new(
            read(
                "CHECKIN_DEFAULT_MAX_DISTANCE_METERS",
                DEFAULT_MAX_DISTANCE_METERS,
            ),
            read("CHECKIN_MAX_DISTANCE_LIMIT_METERS", MAX_DISTANCE_LIMIT_METERS),
        )
    }

    pub fn default_max_distance_meters(&self) -> u32 {
        self.default_max_distance_meters
    }

    pub fn max_distance_limit_meters(&self) -> u32 {
        self.max_distance_limit_meters
    }

    /// The threshold for one request: the requested one if given and in
    /// `1..=limit`, otherwise the default.
    pub fn resolve_max_distance(&self, requested: Option<u32>) -> Result<u32, ValidationError> {
        match requested {
            None => Ok(self.default_max_distance_meters),
            Some(requested) if (1..=self.max_distance_limit_meters).contains(&requested) => {
                Ok(requested)
            }
            Some(requested) => Err(ValidationError::MaxDistanceOutOfRange {
                requested,
                limit: self.max_distance_limit_meters,
            }),
        }
    }
}

impl Default for CheckinPolicy {
    fn default() -> Self {
        Self {
            default_max_distance_meters: DEFAULT_MAX_DISTANCE_METERS,
            max_distance_limit_meters: MAX_DISTANCE_LIMIT_METERS,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ValidateLocationParams {
    pub user_location: Coordinate,
    pub place_location: Coordinate,
    pub max_distance_meters: u32,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Allowed {
    pub distance_meters: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(tag = "reason", rename_all = "camelCase")]
pub enum ProximityRejection {
    #[serde(rename_all = "camelCase")]
    TooFar {
        distance_meters: f64,
        max_distance_meters: u32,
    },
    /// The place has no coordinate, so proximity can not be verified.
    PlaceLocationUnknown,
}

impl ProximityRejection {
    pub fn distance_meters(&self) -> Option<f64> {
        match self {
            ProximityRejection::TooFar {
                distance_meters, ..
            } => Some(*distance_meters),
            ProximityRejection::PlaceLocationUnknown => None,
        }
    }
}

impl fmt::Display for ProximityRejection {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            ProximityRejection::TooFar {
                distance_meters,
                max_distance_meters,
            } => write!(
                f,
                "you are {:.0}m away, must be within {}m",
                distance_meters, max_distance_meters
            ),
            ProximityRejection::PlaceLocationUnknown => {
                write!(f, "the place has no known location")
            }
        }
    }
}

/// Accepts when the user is at most `max_distance_meters` from the place.
/// The boundary itself is accepted.
pub fn validate(params: &ValidateLocationParams) -> Result<Allowed, ProximityRejection> {
    let distance_meters = params.user_location.distance_to(&params.place_location);
    if distance_meters <= f64::from(params.max_distance_meters) {
        Ok(Allowed { distance_meters })
    } else {
        Err(ProximityRejection::TooFar {
            distance_meters,
            max_distance_meters: params.max_distance_meters,
        })
    }
}

/// Like [`validate`], for places whose coordinate may be missing.
pub fn validate_place_location(
    user_location: Coordinate,
    place_location: Option<Coordinate>,
    max_distance_meters: u32,
) -> Result<Allowed, ProximityRejection> {
    let place_location = place_location.ok_or(ProximityRejection::PlaceLocationUnknown)?;
    validate(&ValidateLocationParams {
        user_location,
        place_location,
        max_distance_meters,
    })
}
