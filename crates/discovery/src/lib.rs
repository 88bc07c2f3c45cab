use std::{error::Error, fmt};

use model::ValidationError;

pub mod checkin;
pub mod client;
pub mod database;
pub mod search;

#[cfg(test)]
pub(crate) mod memory;

#[derive(Debug)]
pub enum RequestError {
    NotFound,
    Validation(ValidationError),
    Other(Box<dyn Error + Send + Sync>),
}

impl fmt::Display for RequestError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            RequestError::NotFound => write!(f, "not found"),
            RequestError::Validation(why) => write!(f, "invalid request: {why}"),
            RequestError::Other(why) => write!(f, "{why}"),
        }
    }
}

impl Error for RequestError {}

impl From<database::DatabaseError> for RequestError {
    fn from(value: database::DatabaseError) -> Self {
        match value {
            database::DatabaseError::NotFound => Self::NotFound,
            database::DatabaseError::Other(why) => Self::Other(why),
        }
    }
}

impl From<ValidationError> for RequestError {
    fn from(value: ValidationError) -> Self {
        Self::Validation(value)
    }
}

pub type RequestResult<O> = Result<O, RequestError>;
