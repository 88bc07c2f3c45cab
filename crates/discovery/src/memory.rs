//! In-memory database used by the unit tests of this crate.

use std::sync::{Arc, Mutex, MutexGuard};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use model::{
    checkin::Checkin, place::Place, region::Region, status::Status, Coordinate, Page,
    Pagination, Sort, WithId,
};
use utility::id::Id;

use crate::database::{
    CandidateRepo, CheckinRepo, Database, DatabaseAutocommit, DatabaseError,
    DatabaseTransaction, Repo, Result,
};

#[derive(Default)]
struct MemoryState {
    regions: Vec<WithId<Region>>,
    places: Vec<WithId<Place>>,
    checkins: Vec<WithId<Checkin>>,
    full_fetches: usize,
    paged_fetches: usize,
    commits: usize,
}

#[derive(Clone, Default)]
pub struct MemoryDatabase {
    state: Arc<Mutex<MemoryState>>,
}

pub struct MemoryHandle {
    state: Arc<Mutex<MemoryState>>,
}

impl MemoryDatabase {
    fn lock(&self) -> MutexGuard<'_, MemoryState> {
        self.state.lock().unwrap()
    }

    pub fn add_region(&self, region: WithId<Region>) {
        self.lock().regions.push(region);
    }

    pub fn add_place(&self, place: WithId<Place>) {
        self.lock().places.push(place);
    }

    pub fn checkins(&self) -> Vec<WithId<Checkin>> {
        self.lock().checkins.clone()
    }

    pub fn full_fetches(&self) -> usize {
        self.lock().full_fetches
    }

    pub fn paged_fetches(&self) -> usize {
        self.lock().paged_fetches
    }

    pub fn commits(&self) -> usize {
        self.lock().commits
    }
}

impl MemoryHandle {
    fn lock(&self) -> MutexGuard<'_, MemoryState> {
        self.state.lock().unwrap()
    }
}

#[async_trait]
impl Database for MemoryDatabase {
    type Transaction = MemoryHandle;
    type Autocommit = MemoryHandle;

    async fn transaction(&self) -> Result<Self::Transaction> {
        Ok(self.auto())
    }

    fn auto(&self) -> Self::Autocommit {
        MemoryHandle {
            state: self.state.clone(),
        }
    }
}

#[async_trait]
impl DatabaseTransaction for MemoryHandle {
    async fn commit(self) -> Result<()> {
        self.lock().commits += 1;
        Ok(())
    }
}

impl DatabaseAutocommit for MemoryHandle {}

/// Fields the fake needs to filter and sort an entity.
trait Listed: Clone {
    fn name(&self) -> &str;
    fn status(&self) -> Status;
    fn created_at(&self) -> DateTime<Utc>;
}

impl Listed for Region {
    fn name(&self) -> &str {
        &self.name
    }

    fn status(&self) -> Status {
        self.status
    }

    fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }
}

impl Listed for Place {
    fn name(&self) -> &str {
        &self.name
    }

    fn status(&self) -> Status {
        self.status
    }

    fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }
}

fn matching<T>(
    rows: &[WithId<T>],
    keyword: Option<&str>,
    status: Option<Status>,
) -> Vec<WithId<T>>
where
    T: Listed + utility::id::HasId<IdType = String>,
{
    let keyword = keyword.map(str::to_lowercase);
    rows.iter()
        .filter(|row| {
            keyword
                .as_ref()
                .map_or(true, |keyword| row.content.name().to_lowercase().contains(keyword))
        })
        .filter(|row| status.map_or(true, |status| row.content.status() == status))
        .cloned()
        .collect()
}

fn sorted<T>(mut rows: Vec<WithId<T>>, sort: Sort) -> Vec<WithId<T>>
where
    T: Listed + utility::id::HasId<IdType = String>,
{
    match sort {
        Sort::Newest => rows.sort_by(|a, b| b.content.created_at().cmp(&a.content.created_at())),
        Sort::Oldest => rows.sort_by_key(|row| row.content.created_at()),
        Sort::NameAsc => rows.sort_by(|a, b| a.content.name().cmp(b.content.name())),
        Sort::NameDesc => rows.sort_by(|a, b| b.content.name().cmp(a.content.name())),
    }
    rows
}

#[async_trait]
impl Repo<Region> for MemoryHandle {
    async fn get(&mut self, id: &Id<Region>) -> Result<WithId<Region>> {
        self.lock()
            .regions
            .iter()
            .find(|region| region.id == *id)
            .cloned()
            .ok_or(DatabaseError::NotFound)
    }
}

#[async_trait]
impl CandidateRepo<Region> for MemoryHandle {
    async fn find_by_keyword_and_status(
        &mut self,
        keyword: Option<&str>,
        status: Option<Status>,
    ) -> Result<Vec<WithId<Region>>> {
        let mut state = self.lock();
        state.full_fetches += 1;
        Ok(matching(&state.regions, keyword, status))
    }

    async fn find_page_by_keyword_and_status(
        &mut self,
        keyword: Option<&str>,
        status: Option<Status>,
        pagination: &Pagination,
    ) -> Result<Page<WithId<Region>>> {
        let mut state = self.lock();
        state.paged_fetches += 1;
        let rows = sorted(matching(&state.regions, keyword, status), pagination.sort());
        Ok(Page::slice(rows, pagination))
    }
}

#[async_trait]
impl Repo<Place> for MemoryHandle {
    async fn get(&mut self, id: &Id<Place>) -> Result<WithId<Place>> {
        self.lock()
            .places
            .iter()
            .find(|place| place.id == *id)
            .cloned()
            .ok_or(DatabaseError::NotFound)
    }
}

#[async_trait]
impl CandidateRepo<Place> for MemoryHandle {
    async fn find_by_keyword_and_status(
        &mut self,
        keyword: Option<&str>,
        status: Option<Status>,
    ) -> Result<Vec<WithId<Place>>> {
        let mut state = self.lock();
        state.full_fetches += 1;
        Ok(matching(&state.places, keyword, status))
    }

    async fn find_page_by_keyword_and_status(
        &mut self,
        keyword: Option<&str>,
        status: Option<Status>,
        pagination: &Pagination,
    ) -> Result<Page<WithId<Place>>> {
        let mut state = self.lock();
        state.paged_fetches += 1;
        let rows = sorted(matching(&state.places, keyword, status), pagination.sort());
        Ok(Page::slice(rows, pagination))
    }
}

#[async_trait]
impl CheckinRepo for MemoryHandle {
    async fn insert_checkin(&mut self, checkin: Checkin) -> Result<WithId<Checkin>> {
        let mut state = self.lock();
        let id = Id::new(format!("checkin-{}", state.checkins.len() + 1));
        let checkin = WithId::new(id, checkin);
        state.checkins.push(checkin.clone());
        Ok(checkin)
    }

    async fn checkins_by_place(
        &mut self,
        place_id: &Id<Place>,
    ) -> Result<Vec<WithId<Checkin>>> {
        let mut checkins = self
            .lock()
            .checkins
            .iter()
            .filter(|checkin| checkin.content.place_id == *place_id)
            .cloned()
            .collect::<Vec<_>>();
        checkins.reverse();
        Ok(checkins)
    }
}

fn coordinate(location: Option<(f64, f64)>) -> Option<Coordinate> {
    location.map(|(latitude, longitude)| Coordinate::new(latitude, longitude).unwrap())
}

/// A published region named after its id.
pub fn region(id: &str, location: Option<(f64, f64)>) -> WithId<Region> {
    WithId::new(
        Id::new(id.to_owned()),
        Region {
            name: id.to_owned(),
            description: None,
            status: Status::Published,
            location: coordinate(location),
            created_at: Utc::now(),
        },
    )
}

/// A published place in region `r-1`.
pub fn place(id: &str, name: &str, location: Option<(f64, f64)>) -> WithId<Place> {
    WithId::new(
        Id::new(id.to_owned()),
        Place {
            region_id: Id::new("r-1".to_owned()),
            name: name.to_owned(),
            description: None,
            address: None,
            status: Status::Published,
            location: coordinate(location),
            created_at: Utc::now(),
        },
    )
}
