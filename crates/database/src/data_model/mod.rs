use std::fmt::Debug;

use discovery::database::Result;
use model::{Coordinate, WithId};
use serde::Serialize;
use utility::id::{HasId, Id};

pub mod checkin;
pub mod place;
pub mod region;

pub trait DatabaseRow {
    type Model: Serialize + HasId;

    fn get_id(&self) -> Id<Self::Model>;
    fn to_model(self) -> Result<Self::Model>;
}

pub fn with_ids<R: DatabaseRow>(rows: Vec<R>) -> Result<Vec<WithId<R::Model>>>
where
    <R::Model as HasId>::IdType: Debug + Clone + Serialize,
{
    rows.into_iter().map(with_id).collect()
}

pub fn with_id<R: DatabaseRow>(row: R) -> Result<WithId<R::Model>>
where
    <R::Model as HasId>::IdType: Debug + Clone + Serialize,
{
    let id = row.get_id();
    Ok(WithId::new(id, row.to_model()?))
}

/// Reads an optional stored position. Rows with only one of the two columns
/// set, or with values out of range, are treated as unlocated.
pub(crate) fn optional_coordinate(
    table: &str,
    id: &str,
    latitude: Option<f64>,
    longitude: Option<f64>,
) -> Option<Coordinate> {
    match (latitude, longitude) {
        (Some(latitude), Some(longitude)) => match Coordinate::new(latitude, longitude) {
            Ok(coordinate) => Some(coordinate),
            Err(why) => {
                log::warn!("{table} {id} has an invalid location: {why}");
                None
            }
        },
        (None, None) => None,
        _ => {
            log::warn!("{table} {id} has only half a location");
            None
        }
    }
}
