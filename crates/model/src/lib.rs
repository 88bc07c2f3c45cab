use schemars::JsonSchema;
use std::fmt::Debug;

use serde::Serialize;
pub use serde_with;
use utility::id::{HasId, Id};

pub mod checkin;
pub mod coordinate;
pub mod error;
pub mod pagination;
pub mod place;
pub mod region;
pub mod status;

pub use coordinate::{Coordinate, Locatable, LocationFilter};
pub use error::ValidationError;
pub use pagination::{Page, Pagination, Sort};
pub use utility::geo::BoundingBox;

pub trait ExampleData {
    fn example_data() -> Self;
}

/// A search result, annotated with its distance to the search center when the
/// search was scoped to a location.
#[serde_with::skip_serializing_none]
#[derive(Debug, Clone, PartialEq, Serialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct WithDistance<T> {
    pub distance_meters: Option<f64>,
    #[serde(flatten)]
    pub content: T,
}

impl<T> WithDistance<T> {
    pub fn new(distance_meters: f64, content: T) -> Self {
        Self {
            distance_meters: Some(distance_meters),
            content,
        }
    }

    pub fn unranked(content: T) -> Self {
        Self {
            distance_meters: None,
            content,
        }
    }
}

#[derive(Debug, Clone, Serialize, JsonSchema)]
pub struct WithId<V>
where
    V: HasId,
    V::IdType: Serialize + Debug + Clone,
{
    pub id: Id<V>,
    #[serde(flatten)]
    pub content: V,
}

impl<V> WithId<V>
where
    V: HasId,
    V::IdType: Serialize + Debug + Clone,
{
    pub fn new(id: Id<V>, content: V) -> Self {
        Self { id, content }
    }
}

impl<V> Locatable for WithId<V>
where
    V: HasId + Locatable,
    V::IdType: Serialize + Debug + Clone,
{
    fn coordinate(&self) -> Option<Coordinate> {
        self.content.coordinate()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::region::Region;

    #[test]
    fn with_distance_flattens_content() {
        let region = WithId::new(Id::<Region>::new("r-1".to_owned()), Region::example_data());
        let json = serde_json::to_value(WithDistance::new(12.5, region)).unwrap();
        assert_eq!(json["distanceMeters"], 12.5);
        assert_eq!(json["id"], "r-1");
        assert_eq!(json["name"], "Kyoto");
        assert_eq!(json["location"]["latitude"], 35.0116);
    }

    #[test]
    fn unranked_results_omit_distance() {
        let json = serde_json::to_value(WithDistance::unranked(Region::example_data())).unwrap();
        assert!(json.get("distanceMeters").is_none());
        assert_eq!(json["status"], "published");
    }
}
