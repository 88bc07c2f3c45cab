use std::{error, fmt, fmt::Debug, result};

use async_trait::async_trait;
use model::{
    checkin::Checkin, place::Place, region::Region, status::Status, Page, Pagination,
    WithId,
};
use serde::Serialize;
use utility::id::{HasId, Id};

#[derive(Debug)]
pub enum DatabaseError {
    NotFound,
    Other(Box<dyn error::Error + Send + Sync>),
}

impl fmt::Display for DatabaseError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            DatabaseError::NotFound => write!(f, "row not found"),
            DatabaseError::Other(why) => write!(f, "database error: {why}"),
        }
    }
}

impl error::Error for DatabaseError {}

pub type Result<T> = result::Result<T, DatabaseError>;

#[async_trait]
pub trait Repo<T: Serialize + HasId>
where
    <T as HasId>::IdType: Debug + Clone + Serialize,
{
    async fn get(&mut self, id: &Id<T>) -> Result<WithId<T>>;
}

/// Source of search candidates for one entity type.
#[async_trait]
pub trait CandidateRepo<T: Serialize + HasId>: Repo<T>
where
    <T as HasId>::IdType: Debug + Clone + Serialize,
{
    /// Returns every entity matching the keyword (if any) and status (if any),
    /// with its location populated. No pagination is applied, the caller
    /// refines the set in memory.
    async fn find_by_keyword_and_status(
        &mut self,
        keyword: Option<&str>,
        status: Option<Status>,
    ) -> Result<Vec<WithId<T>>>;

    /// Like [`CandidateRepo::find_by_keyword_and_status`], but sorted and
    /// paginated by the repository itself.
    async fn find_page_by_keyword_and_status(
        &mut self,
        keyword: Option<&str>,
        status: Option<Status>,
        pagination: &Pagination,
    ) -> Result<Page<WithId<T>>>;
}

#[async_trait]
pub trait CheckinRepo {
    async fn insert_checkin(&mut self, checkin: Checkin) -> Result<WithId<Checkin>>;

    /// Latest check-ins first.
    async fn checkins_by_place(
        &mut self,
        place_id: &Id<Place>,
    ) -> Result<Vec<WithId<Checkin>>>;
}

pub trait DatabaseOperations:
    CandidateRepo<Region> + CandidateRepo<Place> + CheckinRepo + Send
{
}

impl<T> DatabaseOperations for T where
    T: CandidateRepo<Region> + CandidateRepo<Place> + CheckinRepo + Send
{
}

#[async_trait]
pub trait DatabaseTransaction: DatabaseOperations {
    async fn commit(self) -> Result<()>;
}

pub trait DatabaseAutocommit: DatabaseOperations {}

/// Storage backing the discovery client.
/// Concurrent access happens by cloning the database object.
#[async_trait]
pub trait Database: Clone + Send + Sync + Sized + 'static {
    type Transaction: DatabaseTransaction + Send;
    type Autocommit: DatabaseAutocommit + Send;

    async fn transaction(&self) -> Result<Self::Transaction>;

    fn auto(&self) -> Self::Autocommit;
}
