use std::sync::Arc;

use axum::{
    extract::{OriginalUri, Query, State},
    http::Method,
    routing::{get, on},
    Extension, Router,
};
use geocoding::{GeocodedPlace, NominatimClient};
use model::Coordinate;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use utility::let_also::LetAlso;

use crate::{
    common::{
        route_not_found, HateoasResult, RouteErrorResponse, VecResponse, METHOD_FILTER_ALL,
    },
    hateoas,
    middleware::base_url::{base_url_middleware, BaseUrl},
    WebState,
};

macro_rules! resource {
    ($($arg:tt)*) => {
        crate::api::v1::resource!("/geocode{}", format_args!($($arg)*))
    };
}
pub(crate) use resource;

pub(crate) fn routes(state: WebState) -> Router {
    Router::new()
        .route("/search", get(search))
        .route("/reverse", get(reverse))
        .layer(axum::middleware::from_fn(base_url_middleware))
        .with_state(state)
        .fallback_service(on(METHOD_FILTER_ALL, route_not_found))
}

#[derive(Deserialize)]
struct SearchQuery {
    q: String,
}

async fn search(
    OriginalUri(original_uri): OriginalUri,
    State(geocoder): State<Arc<NominatimClient>>,
    Query(params): Query<SearchQuery>,
    Extension(base_url): Extension<Arc<BaseUrl>>,
) -> HateoasResult<VecResponse<hateoas::Response<GeocodedPlace>>> {
    geocoder
        .search(&params.q)
        .await
        .map(|places| {
            places
                .into_iter()
                .map(|place| geocoded_place_hateoas(place, base_url.clone()))
                .collect::<Vec<_>>()
                .let_owned(|data| VecResponse::non_paginated(data).hateoas().json())
        })
        .map_err(|why| {
            RouteErrorResponse::from(why)
                .with_method(&Method::GET)
                .with_uri(original_uri.path())
        })
}

#[derive(Deserialize)]
struct ReverseQuery {
    latitude: f64,
    longitude: f64,
}

#[derive(Debug, Clone, Serialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
struct ReverseDto {
    location: Coordinate,
    /// Falls back to `"lat, lon"` when no address is known.
    display_name: String,
}

async fn reverse(
    OriginalUri(original_uri): OriginalUri,
    State(geocoder): State<Arc<NominatimClient>>,
    Query(params): Query<ReverseQuery>,
    Extension(base_url): Extension<Arc<BaseUrl>>,
) -> HateoasResult<ReverseDto> {
    let location = Coordinate::new(params.latitude, params.longitude).map_err(|why| {
        RouteErrorResponse::from(why)
            .with_method(&Method::GET)
            .with_uri(original_uri.path())
    })?;
    let display_name = geocoder.display_name_or_coordinates(location).await;

    hateoas::Response::builder(
        ReverseDto {
            location,
            display_name,
        },
        base_url,
    )
    .link("nearbyPlaces", nearby_places(location))
    .build()
    .json()
    .let_owned(Ok)
}

fn geocoded_place_hateoas(
    place: GeocodedPlace,
    base_url: Arc<BaseUrl>,
) -> hateoas::Response<GeocodedPlace> {
    let location = place.location;
    hateoas::Response::builder(place, base_url)
        .link("nearbyPlaces", nearby_places(location))
        .link(
            "nearbyRegions",
            super::regions::resource!(
                "?latitude={}&longitude={}",
                location.latitude(),
                location.longitude()
            ),
        )
        .build()
}

fn nearby_places(location: Coordinate) -> String {
    super::places::resource!(
        "?latitude={}&longitude={}",
        location.latitude(),
        location.longitude()
    )
}
