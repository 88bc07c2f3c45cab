use async_trait::async_trait;
use chrono::{DateTime, Utc};
use discovery::database::{CandidateRepo, Repo, Result};
use model::{region::Region, status::Status, Page, Pagination, WithId};
use sqlx::prelude::FromRow;
use utility::id::Id;

use super::{optional_coordinate, DatabaseRow};
use crate::{
    queries::{
        convert_error,
        region::{find_by_keyword_and_status, find_page_by_keyword_and_status, get},
    },
    PgDatabaseAutocommit, PgDatabaseTransaction,
};

#[derive(Debug, Clone, FromRow)]
pub struct RegionRow {
    pub id: String,
    pub name: String,
    pub description: Option<String>,
    pub status: String,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub created_at: DateTime<Utc>,
}

impl DatabaseRow for RegionRow {
    type Model = Region;

    fn get_id(&self) -> Id<Self::Model> {
        Id::new(self.id.clone())
    }

    fn to_model(self) -> Result<Self::Model> {
        let location = optional_coordinate("region", &self.id, self.latitude, self.longitude);
        let status = self.status.parse::<Status>().unwrap_or_else(|why| {
            log::warn!("region {}: {}", self.id, why);
            Status::default()
        });
        Ok(Region {
            name: self.name,
            description: self.description,
            status,
            location,
            created_at: self.created_at,
        })
    }
}

#[async_trait]
impl Repo<Region> for PgDatabaseAutocommit {
    async fn get(&mut self, id: &Id<Region>) -> Result<WithId<Region>> {
        get(&self.pool, id).await
    }
}

#[async_trait]
impl CandidateRepo<Region> for PgDatabaseAutocommit {
    async fn find_by_keyword_and_status(
        &mut self,
        keyword: Option<&str>,
        status: Option<Status>,
    ) -> Result<Vec<WithId<Region>>> {
        find_by_keyword_and_status(&self.pool, keyword, status).await
    }

    async fn find_page_by_keyword_and_status(
        &mut self,
        keyword: Option<&str>,
        status: Option<Status>,
        pagination: &Pagination,
    ) -> Result<Page<WithId<Region>>> {
        let mut conn = self.pool.acquire().await.map_err(convert_error)?;
        find_page_by_keyword_and_status(&mut conn, keyword, status, pagination).await
    }
}

#[async_trait]
impl<'a> Repo<Region> for PgDatabaseTransaction<'a> {
    async fn get(&mut self, id: &Id<Region>) -> Result<WithId<Region>> {
        get(&mut *self.tx, id).await
    }
}

#[async_trait]
impl<'a> CandidateRepo<Region> for PgDatabaseTransaction<'a> {
    async fn find_by_keyword_and_status(
        &mut self,
        keyword: Option<&str>,
        status: Option<Status>,
    ) -> Result<Vec<WithId<Region>>> {
        find_by_keyword_and_status(&mut *self.tx, keyword, status).await
    }

    async fn find_page_by_keyword_and_status(
        &mut self,
        keyword: Option<&str>,
        status: Option<Status>,
        pagination: &Pagination,
    ) -> Result<Page<WithId<Region>>> {
        find_page_by_keyword_and_status(&mut self.tx, keyword, status, pagination).await
    }
}
