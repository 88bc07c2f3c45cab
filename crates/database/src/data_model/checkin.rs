use async_trait::async_trait;
use chrono::{DateTime, Utc};
use discovery::database::{CheckinRepo, DatabaseError, Result};
use model::{checkin::Checkin, place::Place, Coordinate, WithId};
use sqlx::prelude::FromRow;
use utility::id::Id;

use super::DatabaseRow;
use crate::{
    queries::checkin::{by_place, insert},
    PgDatabaseAutocommit, PgDatabaseTransaction,
};

#[derive(Debug, Clone, FromRow)]
pub struct CheckinRow {
    pub id: String,
    pub place_id: String,
    pub user_id: String,
    pub latitude: f64,
    pub longitude: f64,
    pub distance_meters: f64,
    pub created_at: DateTime<Utc>,
}

impl DatabaseRow for CheckinRow {
    type Model = Checkin;

    fn get_id(&self) -> Id<Self::Model> {
        Id::new(self.id.clone())
    }

    fn to_model(self) -> Result<Self::Model> {
        let location = Coordinate::new(self.latitude, self.longitude)
            .map_err(|why| DatabaseError::Other(Box::new(why)))?;
        Ok(Checkin {
            place_id: Id::new(self.place_id),
            user_id: self.user_id,
            location,
            distance_meters: self.distance_meters,
            created_at: self.created_at,
        })
    }
}

#[async_trait]
impl CheckinRepo for PgDatabaseAutocommit {
    async fn insert_checkin(&mut self, checkin: Checkin) -> Result<WithId<Checkin>> {
        insert(&self.pool, checkin).await
    }

    async fn checkins_by_place(
        &mut self,
        place_id: &Id<Place>,
    ) -> Result<Vec<WithId<Checkin>>> {
        by_place(&self.pool, place_id).await
    }
}

#[async_trait]
impl<'a> CheckinRepo for PgDatabaseTransaction<'a> {
    async fn insert_checkin(&mut self, checkin: Checkin) -> Result<WithId<Checkin>> {
        insert(&mut *self.tx, checkin).await
    }

    async fn checkins_by_place(
        &mut self,
        place_id: &Id<Place>,
    ) -> Result<Vec<WithId<Checkin>>> {
        by_place(&mut *self.tx, place_id).await
    }
}
