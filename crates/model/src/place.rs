use chrono::{DateTime, Utc};
use schemars::JsonSchema;
use serde::Serialize;
use utility::id::{HasId, Id};

use crate::{
    coordinate::{Coordinate, Locatable},
    region::Region,
    status::Status,
    ExampleData,
};

#[serde_with::skip_serializing_none]
#[derive(Debug, Clone, PartialEq, Serialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct Place {
    pub region_id: Id<Region>,
    pub name: String,
    pub description: Option<String>,
    pub address: Option<String>,
    pub status: Status,
    pub location: Option<Coordinate>,
    pub created_at: DateTime<Utc>,
}

impl HasId for Place {
    type IdType = String;
}

impl Locatable for Place {
    fn coordinate(&self) -> Option<Coordinate> {
        self.location
    }
}

impl ExampleData for Place {
    fn example_data() -> Self {
        Place {
            region_id: Id::new("6f1c2b8e-0d4a-4a53-9d57-3f1f5c0e9a11".to_owned()),
            name: "Fushimi Inari Taisha".to_owned(),
            description: None,
            address: Some("68 Fukakusa Yabunouchicho, Fushimi Ward, Kyoto".to_owned()),
            status: Status::Published,
            location: Coordinate::new(34.9671, 135.7727).ok(),
            created_at: DateTime::from_timestamp(1_712_061_000, 0).unwrap_or_default(),
        }
    }
}
