use std::{error, fmt};

/// Input rejected before it reaches search or check-in logic.
#[derive(Debug, Clone, PartialEq)]
pub enum ValidationError {
    LatitudeOutOfRange(f64),
    LongitudeOutOfRange(f64),
    InvalidRadius(f64),
    /// Only one of latitude and longitude was given.
    IncompleteCenter,
    RadiusWithoutCenter,
    InvalidPage(usize),
    InvalidLimit { limit: usize, max: usize },
    UnknownSort(String),
    MaxDistanceOutOfRange { requested: u32, limit: u32 },
}

impl error::Error for ValidationError {}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            ValidationError::LatitudeOutOfRange(value) => {
                write!(f, "latitude must be between -90 and 90, got {value}")
            }
            ValidationError::LongitudeOutOfRange(value) => {
                write!(f, "longitude must be between -180 and 180, got {value}")
            }
            ValidationError::InvalidRadius(value) => {
                write!(f, "radius must be a positive number of kilometers, got {value}")
            }
            ValidationError::IncompleteCenter => {
                write!(f, "latitude and longitude must be given together")
            }
            ValidationError::RadiusWithoutCenter => {
                write!(f, "a radius requires latitude and longitude")
            }
            ValidationError::InvalidPage(page) => {
                write!(f, "page must be at least 1, got {page}")
            }
            ValidationError::InvalidLimit { limit, max } => {
                write!(f, "limit must be between 1 and {max}, got {limit}")
            }
            ValidationError::UnknownSort(sort) => write!(f, "unknown sort '{sort}'"),
            ValidationError::MaxDistanceOutOfRange { requested, limit } => write!(
                f,
                "max distance must be between 1 and {limit} meters, got {requested}"
            ),
        }
    }
}
