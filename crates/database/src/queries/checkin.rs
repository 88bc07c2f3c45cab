use model::{checkin::Checkin, place::Place, WithId};
use sqlx::{Executor, Postgres};
use utility::{id::Id, let_also::LetAlso};

use discovery::database::Result;

use crate::data_model::{checkin::CheckinRow, with_id, with_ids};

use super::convert_error;

pub async fn insert<'c, E>(executor: E, checkin: Checkin) -> Result<WithId<Checkin>>
where
    E: Executor<'c, Database = Postgres>,
{
    sqlx::query_as::<_, CheckinRow>(
        "
        INSERT INTO checkins(
            place_id,
            user_id,
            latitude,
            longitude,
            distance_meters,
            created_at
        )
        VALUES ($1, $2, $3, $4, $5, $6)
        RETURNING
            id, place_id, user_id, latitude, longitude,
            distance_meters, created_at;
        ",
    )
    .bind(checkin.place_id.raw())
    .bind(&checkin.user_id)
    .bind(checkin.location.latitude())
    .bind(checkin.location.longitude())
    .bind(checkin.distance_meters)
    .bind(checkin.created_at)
    .fetch_one(executor)
    .await
    .map_err(convert_error)?
    .let_owned(|row: CheckinRow| with_id(row))
}

pub async fn by_place<'c, E>(executor: E, place_id: &Id<Place>) -> Result<Vec<WithId<Checkin>>>
where
    E: Executor<'c, Database = Postgres>,
{
    sqlx::query_as(
        "
        SELECT
            id, place_id, user_id, latitude, longitude,
            distance_meters, created_at
        FROM
            checkins
        WHERE place_id = $1
        ORDER BY created_at DESC, id ASC;
        ",
    )
    .bind(place_id.raw_ref::<str>())
    .fetch_all(executor)
    .await
    .map_err(convert_error)?
    .let_owned(|rows: Vec<CheckinRow>| with_ids(rows))
}
