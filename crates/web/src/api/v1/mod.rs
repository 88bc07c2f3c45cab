use axum::{routing::on, Router};
use discovery::search::{SearchDefaults, SearchQuery};
use model::{
    pagination::DEFAULT_PAGE_SIZE, status::Status, Coordinate, LocationFilter, Pagination,
    Sort, ValidationError,
};
use serde::Deserialize;

use crate::{
    common::{route_not_found, METHOD_FILTER_ALL},
    middleware::base_url::base_url_middleware,
    WebState,
};

mod geocode;
mod places;
mod regions;

macro_rules! resource {
    ($($arg:tt)*) => {
        crate::api::resource!("/v1{}", format_args!($($arg)*))
    };
}
pub(crate) use resource;

pub(crate) fn routes(state: WebState) -> Router {
    Router::new()
        .nest_service("/regions", regions::routes(state.clone()))
        .nest_service("/places", places::routes(state.clone()))
        .nest_service("/geocode", geocode::routes(state.clone()))
        .layer(axum::middleware::from_fn(base_url_middleware))
        .with_state(state)
        .fallback_service(on(METHOD_FILTER_ALL, route_not_found))
}

/// Query parameters shared by the region and place listings.
#[derive(Debug, Default, Deserialize)]
pub(crate) struct SearchParams {
    keyword: Option<String>,
    latitude: Option<f64>,
    longitude: Option<f64>,
    /// Kilometers.
    radius: Option<f64>,
    page: Option<usize>,
    limit: Option<usize>,
    sort: Option<String>,
}

impl SearchParams {
    /// Public listings only ever show published entries.
    pub(crate) fn to_query(
        &self,
        defaults: &SearchDefaults,
    ) -> Result<SearchQuery, ValidationError> {
        let location = match (self.latitude, self.longitude, self.radius) {
            (Some(latitude), Some(longitude), radius) => Some(LocationFilter::new(
                Coordinate::new(latitude, longitude)?,
                radius.unwrap_or(defaults.radius_km),
            )?),
            (None, None, None) => None,
            (None, None, Some(_)) => return Err(ValidationError::RadiusWithoutCenter),
            _ => return Err(ValidationError::IncompleteCenter),
        };
        let sort = match self.sort.as_deref() {
            Some(sort) => sort.parse::<Sort>()?,
            None => Sort::default(),
        };
        let pagination = Pagination::new(
            self.page.unwrap_or(1),
            self.limit.unwrap_or(DEFAULT_PAGE_SIZE),
            sort,
        )?;

        Ok(SearchQuery {
            keyword: self.keyword.clone(),
            location,
            status: Some(Status::Published),
            pagination,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn params() -> SearchParams {
        SearchParams::default()
    }

    #[test]
    fn empty_params_list_newest_published() {
        let query = params().to_query(&SearchDefaults::default()).unwrap();
        assert_eq!(query.location, None);
        assert_eq!(query.status, Some(Status::Published));
        assert_eq!(query.pagination, Pagination::default());
    }

    #[test]
    fn center_without_radius_uses_default() {
        let query = SearchParams {
            latitude: Some(35.0116),
            longitude: Some(135.7681),
            ..params()
        }
        .to_query(&SearchDefaults { radius_km: 7.5 })
        .unwrap();
        assert_eq!(query.location.unwrap().radius_km(), 7.5);
    }

    #[test]
    fn center_must_be_complete() {
        let result = SearchParams {
            latitude: Some(35.0),
            ..params()
        }
        .to_query(&SearchDefaults::default());
        assert_eq!(result, Err(ValidationError::IncompleteCenter));

        let result = SearchParams {
            radius: Some(3.0),
            ..params()
        }
        .to_query(&SearchDefaults::default());
        assert_eq!(result, Err(ValidationError::RadiusWithoutCenter));
    }

    #[test]
    fn rejects_out_of_range_values() {
        let defaults = SearchDefaults::default();
        let far_north = SearchParams {
            latitude: Some(95.0),
            longitude: Some(0.0),
            ..params()
        };
        assert_eq!(
            far_north.to_query(&defaults),
            Err(ValidationError::LatitudeOutOfRange(95.0))
        );
        let negative_radius = SearchParams {
            latitude: Some(0.0),
            longitude: Some(0.0),
            radius: Some(-1.0),
            ..params()
        };
        assert_eq!(
            negative_radius.to_query(&defaults),
            Err(ValidationError::InvalidRadius(-1.0))
        );
        let huge_page = SearchParams {
            limit: Some(1000),
            ..params()
        };
        assert!(huge_page.to_query(&defaults).is_err());
    }

    #[test]
    fn parses_sort_and_keyword() {
        let query = SearchParams {
            keyword: Some("shrine".to_owned()),
            sort: Some("-name".to_owned()),
            page: Some(2),
            limit: Some(5),
            ..params()
        }
        .to_query(&SearchDefaults::default())
        .unwrap();
        assert_eq!(query.keyword(), Some("shrine"));
        assert_eq!(query.pagination, Pagination::new(2, 5, Sort::NameDesc).unwrap());
    }
}
