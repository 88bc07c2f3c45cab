use std::str::FromStr;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

pub const DEFAULT_PAGE_SIZE: usize = 20;
pub const MAX_PAGE_SIZE: usize = 100;

/// Ordering of a listing when it is not ranked by distance.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub enum Sort {
    #[default]
    Newest,
    Oldest,
    NameAsc,
    NameDesc,
}

impl Sort {
    pub fn query_token(&self) -> &'static str {
        match self {
            Sort::Newest => "-createdAt",
            Sort::Oldest => "createdAt",
            Sort::NameAsc => "name",
            Sort::NameDesc => "-name",
        }
    }
}

impl FromStr for Sort {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "-createdAt" => Ok(Sort::Newest),
            "createdAt" => Ok(Sort::Oldest),
            "name" => Ok(Sort::NameAsc),
            "-name" => Ok(Sort::NameDesc),
            other => Err(ValidationError::UnknownSort(other.to_owned())),
        }
    }
}

/// A 1-based page request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pagination {
    page: usize,
    limit: usize,
    sort: Sort,
}

impl Pagination {
    pub fn new(page: usize, limit: usize, sort: Sort) -> Result<Self, ValidationError> {
        if page == 0 {
            return Err(ValidationError::InvalidPage(page));
        }
        if limit == 0 || limit > MAX_PAGE_SIZE {
            return Err(ValidationError::InvalidLimit {
                limit,
                max: MAX_PAGE_SIZE,
            });
        }
        Ok(Self { page, limit, sort })
    }

    pub fn page(&self) -> usize {
        self.page
    }

    pub fn limit(&self) -> usize {
        self.limit
    }

    pub fn sort(&self) -> Sort {
        self.sort
    }

    pub fn offset(&self) -> usize {
        (self.page - 1).saturating_mul(self.limit)
    }

    pub fn total_pages(&self, count: usize) -> usize {
        count.div_ceil(self.limit)
    }
}

impl Default for Pagination {
    fn default() -> Self {
        Self {
            page: 1,
            limit: DEFAULT_PAGE_SIZE,
            sort: Sort::default(),
        }
    }
}

/// One page of a listing together with the size of the whole listing.
#[derive(Debug, Clone, PartialEq, Serialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct Page<T> {
    pub items: Vec<T>,
    pub count: usize,
    pub total_pages: usize,
    pub current_page: usize,
}

impl<T> Page<T> {
    /// Builds a page from one already fetched page of items.
    pub fn new(items: Vec<T>, count: usize, pagination: &Pagination) -> Self {
        Self {
            items,
            count,
            total_pages: pagination.total_pages(count),
            current_page: pagination.page(),
        }
    }

    /// Cuts the requested page out of the complete, ordered listing.
    ///
    /// Pages past the end are empty rather than an error.
    pub fn slice(all: Vec<T>, pagination: &Pagination) -> Self {
        let count = all.len();
        let items = all
            .into_iter()
            .skip(pagination.offset())
            .take(pagination.limit())
            .collect::<Vec<_>>();
        Self::new(items, count, pagination)
    }

    pub fn map<U, F>(self, f: F) -> Page<U>
    where
        F: FnMut(T) -> U,
    {
        Page {
            items: self.items.into_iter().map(f).collect(),
            count: self.count,
            total_pages: self.total_pages,
            current_page: self.current_page,
        }
    }
}
