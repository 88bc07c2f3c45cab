pub use crate::common::RouteResult;

use std::sync::Arc;

use axum::{extract::FromRef, routing::on, Router};
use database::PgDatabase;
use discovery::{client::Client, search::SearchDefaults};
use geocoding::NominatimClient;
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;

use crate::common::{route_not_found, METHOD_FILTER_ALL};

pub mod api;
pub mod common;
pub mod hateoas;
pub mod middleware;

pub const DEFAULT_BIND_ADDRESS: &str = "0.0.0.0:8080";

#[derive(Clone, FromRef)]
pub struct WebState {
    pub discovery_client: Client<PgDatabase>,
    pub geocoder: Arc<NominatimClient>,
    pub search_defaults: SearchDefaults,
}

pub async fn start_web_server(state: WebState, bind_address: &str) -> std::io::Result<()> {
    let routes = Router::new()
        .nest_service("/api", api::routes(state))
        .fallback_service(on(METHOD_FILTER_ALL, route_not_found))
        .layer(TraceLayer::new_for_http());

    let listener = TcpListener::bind(bind_address).await?;
    log::info!("listening on {}", listener.local_addr()?);
    axum::serve(listener, routes.into_make_service()).await?;

    Ok(())
}
