use model::{
    checkin::Checkin, place::Place, region::Region, status::Status, Coordinate, Page,
    WithDistance, WithId,
};
use utility::{id::Id, let_also::LetAlso};

use crate::{
    checkin::{validate_place_location, CheckinPolicy, ProximityRejection},
    database::{CheckinRepo, Database, DatabaseTransaction, Repo},
    search::{search, SearchQuery},
    RequestError, RequestResult,
};

/// A check-in attempt as submitted by a user.
#[derive(Debug, Clone, PartialEq)]
pub struct CheckinRequest {
    pub user_id: String,
    pub location: Coordinate,
    /// Overrides the policy's default threshold, bounded by its limit.
    pub max_distance_meters: Option<u32>,
}

#[derive(Debug, Clone)]
pub struct Client<D>
where
    D: Database + Send + Sync + Sized + 'static,
{
    pub database: D,
    checkin_policy: CheckinPolicy,
}

impl<D> Client<D>
where
    D: Database,
{
    pub fn new(database: D, checkin_policy: CheckinPolicy) -> Self {
        Self {
            database,
            checkin_policy,
        }
    }

    pub fn checkin_policy(&self) -> &CheckinPolicy {
        &self.checkin_policy
    }
}

impl<D> Client<D>
where
    D: Database,
{
    pub async fn search_regions(
        &self,
        query: &SearchQuery,
    ) -> RequestResult<Page<WithDistance<WithId<Region>>>> {
        search::<Region, _>(&mut self.database.auto(), query).await
    }

    /// Published regions only.
    pub async fn get_region(&self, id: Id<Region>) -> RequestResult<WithId<Region>> {
        Repo::<Region>::get(&mut self.database.auto(), &id)
            .await?
            .let_owned(|region| published(region, |region| region.content.status))
    }
}

impl<D> Client<D>
where
    D: Database,
{
    pub async fn search_places(
        &self,
        query: &SearchQuery,
    ) -> RequestResult<Page<WithDistance<WithId<Place>>>> {
        search::<Place, _>(&mut self.database.auto(), query).await
    }

    /// Published places only.
    pub async fn get_place(&self, id: Id<Place>) -> RequestResult<WithId<Place>> {
        Repo::<Place>::get(&mut self.database.auto(), &id)
            .await?
            .let_owned(|place| published(place, |place| place.content.status))
    }
}

impl<D> Client<D>
where
    D: Database,
{
    /// Records a check-in if the user is close enough to the place.
    ///
    /// The outer result carries validation and storage failures, the inner
    /// one whether the location gate let the user through. Rejected attempts
    /// are not stored.
    pub async fn create_checkin(
        &self,
        place_id: Id<Place>,
        request: CheckinRequest,
    ) -> RequestResult<Result<WithId<Checkin>, ProximityRejection>> {
        let max_distance_meters = self
            .checkin_policy
            .resolve_max_distance(request.max_distance_meters)?;

        let mut tx = self.database.transaction().await?;
        let place = Repo::<Place>::get(&mut tx, &place_id)
            .await?
            .let_owned(|place| published(place, |place| place.content.status))?;

        let allowed = match validate_place_location(
            request.location,
            place.content.location,
            max_distance_meters,
        ) {
            Ok(allowed) => allowed,
            Err(rejection) => {
                log::info!(
                    "check-in of {} at place {} rejected: {}",
                    request.user_id,
                    place.id,
                    rejection
                );
                return Ok(Err(rejection));
            }
        };

        let checkin = tx
            .insert_checkin(Checkin {
                place_id: place.id,
                user_id: request.user_id,
                location: request.location,
                distance_meters: allowed.distance_meters,
                created_at: chrono::Utc::now(),
            })
            .await?;
        tx.commit().await?;

        log::info!(
            "check-in {} of {} accepted at {:.1}m",
            checkin.id,
            checkin.content.user_id,
            checkin.content.distance_meters
        );
        Ok(Ok(checkin))
    }

    /// Check-ins of a published place, latest first.
    pub async fn checkins_for_place(
        &self,
        place_id: Id<Place>,
    ) -> RequestResult<Vec<WithId<Checkin>>> {
        let mut db = self.database.auto();
        Repo::<Place>::get(&mut db, &place_id)
            .await?
            .let_owned(|place| published(place, |place| place.content.status))?;
        Ok(db.checkins_by_place(&place_id).await?)
    }
}

fn published<T, F>(entry: T, status: F) -> RequestResult<T>
where
    F: FnOnce(&T) -> Status,
{
    if status(&entry) == Status::Published {
        Ok(entry)
    } else {
        Err(RequestError::NotFound)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory::{place, region, MemoryDatabase};
    use model::ValidationError;

    fn client(database: &MemoryDatabase) -> Client<MemoryDatabase> {
        Client::new(database.clone(), CheckinPolicy::default())
    }

    fn request(latitude: f64, longitude: f64, max: Option<u32>) -> CheckinRequest {
        CheckinRequest {
            user_id: "user-1".to_owned(),
            location: Coordinate::new(latitude, longitude).unwrap(),
            max_distance_meters: max,
        }
    }

    #[tokio::test]
    async fn accepted_checkin_is_stored_with_distance() {
        let database = MemoryDatabase::default();
        database.add_place(place("p-1", "Shrine", Some((35.0, 135.0))));

        let checkin = client(&database)
            .create_checkin(Id::new("p-1".to_owned()), request(35.0003, 135.0, None))
            .await
            .unwrap()
            .unwrap();

        assert_eq!(checkin.content.place_id.raw(), "p-1");
        assert!((checkin.content.distance_meters - 33.4).abs() < 0.5);
        assert_eq!(database.checkins().len(), 1);
        assert_eq!(database.commits(), 1);
    }

    #[tokio::test]
    async fn rejected_checkin_is_not_stored() {
        let database = MemoryDatabase::default();
        database.add_place(place("p-1", "Shrine", Some((35.0, 135.0))));

        let rejection = client(&database)
            .create_checkin(Id::new("p-1".to_owned()), request(35.01, 135.0, Some(500)))
            .await
            .unwrap()
            .unwrap_err();

        match rejection {
            ProximityRejection::TooFar {
                distance_meters,
                max_distance_meters,
            } => {
                assert!((distance_meters - 1112.0).abs() < 1.0);
                assert_eq!(max_distance_meters, 500);
            }
            other => panic!("unexpected rejection {other:?}"),
        }
        assert!(database.checkins().is_empty());
        assert_eq!(database.commits(), 0);
    }

    #[tokio::test]
    async fn place_without_location_rejects() {
        let database = MemoryDatabase::default();
        database.add_place(place("p-1", "Somewhere", None));

        let result = client(&database)
            .create_checkin(Id::new("p-1".to_owned()), request(35.0, 135.0, None))
            .await
            .unwrap();
        assert_eq!(result.unwrap_err(), ProximityRejection::PlaceLocationUnknown);
    }

    #[tokio::test]
    async fn threshold_above_limit_is_invalid() {
        let database = MemoryDatabase::default();
        database.add_place(place("p-1", "Shrine", Some((35.0, 135.0))));

        let result = client(&database)
            .create_checkin(Id::new("p-1".to_owned()), request(35.0, 135.0, Some(5000)))
            .await;
        assert!(matches!(
            result,
            Err(RequestError::Validation(
                ValidationError::MaxDistanceOutOfRange { requested: 5000, .. }
            ))
        ));
    }

    #[tokio::test]
    async fn unpublished_or_missing_place_is_not_found() {
        let database = MemoryDatabase::default();
        let mut hidden = place("p-hidden", "Closed", Some((35.0, 135.0)));
        hidden.content.status = Status::Hidden;
        database.add_place(hidden);

        let client = client(&database);
        let hidden = client
            .create_checkin(Id::new("p-hidden".to_owned()), request(35.0, 135.0, None))
            .await;
        assert!(matches!(hidden, Err(RequestError::NotFound)));
        let missing = client
            .create_checkin(Id::new("p-missing".to_owned()), request(35.0, 135.0, None))
            .await;
        assert!(matches!(missing, Err(RequestError::NotFound)));
        assert!(matches!(
            client.get_place(Id::new("p-hidden".to_owned())).await,
            Err(RequestError::NotFound)
        ));
    }

    #[tokio::test]
    async fn lists_checkins_latest_first() {
        let database = MemoryDatabase::default();
        database.add_place(place("p-1", "Shrine", Some((35.0, 135.0))));
        let client = client(&database);
        for user in ["first", "second"] {
            let mut request = request(35.0, 135.0, None);
            request.user_id = user.to_owned();
            client
                .create_checkin(Id::new("p-1".to_owned()), request)
                .await
                .unwrap()
                .unwrap();
        }

        let users = client
            .checkins_for_place(Id::new("p-1".to_owned()))
            .await
            .unwrap()
            .into_iter()
            .map(|checkin| checkin.content.user_id)
            .collect::<Vec<_>>();
        assert_eq!(users, vec!["second", "first"]);
    }

    #[tokio::test]
    async fn gets_published_region() {
        let database = MemoryDatabase::default();
        database.add_region(region("kyoto", Some((35.0116, 135.7681))));
        let region = client(&database)
            .get_region(Id::new("kyoto".to_owned()))
            .await
            .unwrap();
        assert_eq!(region.content.name, "kyoto");
    }
}
