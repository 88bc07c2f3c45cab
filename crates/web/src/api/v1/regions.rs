use std::sync::Arc;

use axum::{
    extract::{OriginalUri, Path, Query, State},
    http::Method,
    routing::{get, on},
    Extension, Router,
};
use model::{region::Region, WithDistance, WithId};
use utility::id::Id;

use crate::{
    common::{
        route_not_found, schema, HateoasResult, RouteErrorResponse, VecResponse,
        METHOD_FILTER_ALL,
    },
    hateoas,
    middleware::base_url::{base_url_middleware, BaseUrl},
    WebState,
};

use super::SearchParams;

macro_rules! resource {
    ($($arg:tt)*) => {
        crate::api::v1::resource!("/regions{}", format_args!($($arg)*))
    };
}
pub(crate) use resource;

pub(crate) fn routes(state: WebState) -> Router {
    Router::new()
        .route("/schema", get(schema::<Region>))
        .route("/:id", get(get_region))
        .route("/", get(search_regions))
        .layer(axum::middleware::from_fn(base_url_middleware))
        .with_state(state)
        .fallback_service(on(METHOD_FILTER_ALL, route_not_found))
}

async fn search_regions(
    OriginalUri(original_uri): OriginalUri,
    State(WebState {
        discovery_client,
        search_defaults,
        ..
    }): State<WebState>,
    Query(params): Query<SearchParams>,
    Extension(base_url): Extension<Arc<BaseUrl>>,
) -> HateoasResult<VecResponse<hateoas::Response<WithDistance<WithId<Region>>>>> {
    let error = |why: RouteErrorResponse| {
        why.with_method(&Method::GET)
            .with_uri(original_uri.path())
    };
    let query = params
        .to_query(&search_defaults)
        .map_err(|why| error(why.into()))?;
    let page = discovery_client
        .search_regions(&query)
        .await
        .map_err(|why| error(why.into()))?;

    let response = VecResponse::from_page(page, query.pagination.limit(), |region| {
        region_hateoas(region, base_url.clone())
    });
    Ok(hateoas::Response::builder(response, base_url)
        .debug_info_option("location", query.location)
        .build()
        .json())
}

async fn get_region(
    OriginalUri(original_uri): OriginalUri,
    Path(id): Path<String>,
    State(WebState {
        discovery_client, ..
    }): State<WebState>,
    Extension(base_url): Extension<Arc<BaseUrl>>,
) -> HateoasResult<WithDistance<WithId<Region>>> {
    discovery_client
        .get_region(Id::new(id))
        .await
        .map(|region| region_hateoas(WithDistance::unranked(region), base_url).json())
        .map_err(|why| {
            RouteErrorResponse::from(why)
                .with_method(&Method::GET)
                .with_uri(original_uri.path())
        })
}

fn region_hateoas(
    region: WithDistance<WithId<Region>>,
    base_url: Arc<BaseUrl>,
) -> hateoas::Response<WithDistance<WithId<Region>>> {
    let id = region.content.id.raw();
    let location = region.content.content.location;
    hateoas::Response::builder(region, base_url)
        .link("self", resource!("/{}", id))
        .link_option(
            "nearbyRegions",
            location.map(|location| {
                resource!(
                    "?latitude={}&longitude={}",
                    location.latitude(),
                    location.longitude()
                )
            }),
        )
        .link_option(
            "nearbyPlaces",
            location.map(|location| {
                super::places::resource!(
                    "?latitude={}&longitude={}",
                    location.latitude(),
                    location.longitude()
                )
            }),
        )
        .build()
}
