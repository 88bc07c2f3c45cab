use chrono::{DateTime, Utc};
use schemars::JsonSchema;
use serde::Serialize;
use utility::id::HasId;

use crate::{
    coordinate::{Coordinate, Locatable},
    status::Status,
    ExampleData,
};

#[serde_with::skip_serializing_none]
#[derive(Debug, Clone, PartialEq, Serialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct Region {
    pub name: String,
    pub description: Option<String>,
    pub status: Status,
    pub location: Option<Coordinate>,
    pub created_at: DateTime<Utc>,
}

impl HasId for Region {
    type IdType = String;
}

impl Locatable for Region {
    fn coordinate(&self) -> Option<Coordinate> {
        self.location
    }
}

impl ExampleData for Region {
    fn example_data() -> Self {
        Region {
            name: "Kyoto".to_owned(),
            description: Some("Temples, gardens and the old capital.".to_owned()),
            status: Status::Published,
            location: Coordinate::new(35.0116, 135.7681).ok(),
            created_at: DateTime::from_timestamp(1_711_962_000, 0).unwrap_or_default(),
        }
    }
}
