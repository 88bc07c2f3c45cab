use std::sync::Arc;

use axum::{
    extract::{OriginalUri, Path, Query, State},
    http::{Method, StatusCode},
    routing::{get, on},
    Extension, Json, Router,
};
use discovery::client::CheckinRequest;
use model::{checkin::Checkin, place::Place, Coordinate, WithDistance, WithId};
use serde::Deserialize;
use utility::{id::Id, let_also::LetAlso};

use crate::{
    common::{
        route_not_found, schema, HateoasResult, RouteErrorResponse, RouteResult,
        VecResponse, METHOD_FILTER_ALL,
    },
    hateoas,
    middleware::base_url::{base_url_middleware, BaseUrl},
    WebState,
};

use super::SearchParams;

macro_rules! resource {
    ($($arg:tt)*) => {
        crate::api::v1::resource!("/places{}", format_args!($($arg)*))
    };
}
pub(crate) use resource;

pub(crate) fn routes(state: WebState) -> Router {
    Router::new()
        .route("/schema", get(schema::<Place>))
        .route("/:id", get(get_place))
        .route("/:id/checkins", get(get_checkins).post(create_checkin))
        .route("/", get(search_places))
        .layer(axum::middleware::from_fn(base_url_middleware))
        .with_state(state)
        .fallback_service(on(METHOD_FILTER_ALL, route_not_found))
}

async fn search_places(
    OriginalUri(original_uri): OriginalUri,
    State(WebState {
        discovery_client,
        search_defaults,
        ..
    }): State<WebState>,
    Query(params): Query<SearchParams>,
    Extension(base_url): Extension<Arc<BaseUrl>>,
) -> HateoasResult<VecResponse<hateoas::Response<WithDistance<WithId<Place>>>>> {
    let error = |why: RouteErrorResponse| {
        why.with_method(&Method::GET)
            .with_uri(original_uri.path())
    };
    let query = params
        .to_query(&search_defaults)
        .map_err(|why| error(why.into()))?;
    let page = discovery_client
        .search_places(&query)
        .await
        .map_err(|why| error(why.into()))?;

    let response = VecResponse::from_page(page, query.pagination.limit(), |place| {
        place_hateoas(place, base_url.clone())
    });
    Ok(hateoas::Response::builder(response, base_url)
        .debug_info_option("location", query.location)
        .build()
        .json())
}

async fn get_place(
    OriginalUri(original_uri): OriginalUri,
    Path(id): Path<String>,
    State(WebState {
        discovery_client, ..
    }): State<WebState>,
    Extension(base_url): Extension<Arc<BaseUrl>>,
) -> HateoasResult<WithDistance<WithId<Place>>> {
    discovery_client
        .get_place(Id::new(id))
        .await
        .map(|place| place_hateoas(WithDistance::unranked(place), base_url).json())
        .map_err(|why| {
            RouteErrorResponse::from(why)
                .with_method(&Method::GET)
                .with_uri(original_uri.path())
        })
}

async fn get_checkins(
    OriginalUri(original_uri): OriginalUri,
    Path(id): Path<String>,
    State(WebState {
        discovery_client, ..
    }): State<WebState>,
    Extension(base_url): Extension<Arc<BaseUrl>>,
) -> HateoasResult<VecResponse<hateoas::Response<WithId<Checkin>>>> {
    discovery_client
        .checkins_for_place(Id::new(id))
        .await
        .map(|checkins| {
            checkins
                .into_iter()
                .map(|checkin| checkin_hateoas(checkin, base_url.clone()))
                .collect::<Vec<_>>()
                .let_owned(|data| VecResponse::non_paginated(data).hateoas().json())
        })
        .map_err(|why| {
            RouteErrorResponse::from(why)
                .with_method(&Method::GET)
                .with_uri(original_uri.path())
        })
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CheckinBody {
    user_id: String,
    latitude: f64,
    longitude: f64,
    max_distance_meters: Option<u32>,
}

impl CheckinBody {
    fn into_request(self) -> RouteResult<CheckinRequest> {
        let user_id = self.user_id.trim().to_owned();
        if user_id.is_empty() {
            return Err(RouteErrorResponse::new(StatusCode::BAD_REQUEST)
                .with_message("userId must not be empty"));
        }
        Ok(CheckinRequest {
            user_id,
            location: Coordinate::new(self.latitude, self.longitude)?,
            max_distance_meters: self.max_distance_meters,
        })
    }
}

async fn create_checkin(
    OriginalUri(original_uri): OriginalUri,
    Path(id): Path<String>,
    State(WebState {
        discovery_client, ..
    }): State<WebState>,
    Extension(base_url): Extension<Arc<BaseUrl>>,
    Json(body): Json<CheckinBody>,
) -> RouteResult<(StatusCode, Json<hateoas::Response<WithId<Checkin>>>)> {
    let error = |why: RouteErrorResponse| {
        why.with_method(&Method::POST)
            .with_uri(original_uri.path())
    };
    let request = body.into_request().map_err(|why| error(why))?;

    match discovery_client.create_checkin(Id::new(id), request).await {
        Ok(Ok(checkin)) => Ok((
            StatusCode::CREATED,
            checkin_hateoas(checkin, base_url).json(),
        )),
        Ok(Err(rejection)) => Err(error(rejection.into())),
        Err(why) => Err(error(why.into())),
    }
}

fn place_hateoas(
    place: WithDistance<WithId<Place>>,
    base_url: Arc<BaseUrl>,
) -> hateoas::Response<WithDistance<WithId<Place>>> {
    let id = place.content.id.raw();
    let region_id = place.content.content.region_id.raw();
    let location = place.content.content.location;
    hateoas::Response::builder(place, base_url)
        .link("self", resource!("/{}", id))
        .link("region", super::regions::resource!("/{}", region_id))
        .link("checkins", resource!("/{}/checkins", id))
        .link_option(
            "nearby",
            location.map(|location| {
                resource!(
                    "?latitude={}&longitude={}",
                    location.latitude(),
                    location.longitude()
                )
            }),
        )
        .link_option(
            "address",
            location.map(|location| {
                super::geocode::resource!(
                    "/reverse?latitude={}&longitude={}",
                    location.latitude(),
                    location.longitude()
                )
            }),
        )
        .build()
}

fn checkin_hateoas(
    checkin: WithId<Checkin>,
    base_url: Arc<BaseUrl>,
) -> hateoas::Response<WithId<Checkin>> {
    let place_id = checkin.content.place_id.raw();
    hateoas::Response::builder(checkin, base_url)
        .link("place", resource!("/{}", place_id))
        .build()
}
