use std::{env, sync::Arc};

use database::{DatabaseConnectionInfo, PgDatabase};
use discovery::{checkin::CheckinPolicy, client::Client, search::SearchDefaults};
use geocoding::{NominatimClient, NominatimConfig};
use web::{start_web_server, WebState, DEFAULT_BIND_ADDRESS};

#[tokio::main]
async fn main() {
    env_logger::init();

    // database
    let database_connection_info = DatabaseConnectionInfo::from_env()
        .expect("expected database connection info in env.");
    let database = PgDatabase::connect(database_connection_info)
        .await
        .expect("could not connect to database.");

    // discovery
    let checkin_policy =
        CheckinPolicy::from_env().expect("invalid check-in distance configuration.");
    let search_defaults = SearchDefaults::from_env();
    log::info!(
        "check-ins within {}m (at most {}m), searches within {} km by default",
        checkin_policy.default_max_distance_meters(),
        checkin_policy.max_distance_limit_meters(),
        search_defaults.radius_km
    );

    // geocoding
    let geocoder = NominatimClient::new(NominatimConfig::from_env())
        .expect("could not build geocoding client.");

    // web server
    let bind_address =
        env::var("WEB_BIND_ADDRESS").unwrap_or_else(|_| DEFAULT_BIND_ADDRESS.to_owned());
    let web_future = start_web_server(
        WebState {
            discovery_client: Client::new(database, checkin_policy),
            geocoder: Arc::new(geocoder),
            search_defaults,
        },
        &bind_address,
    );

    if let Err(why) = web_future.await {
        log::error!("web server stopped: {why}");
    }
}
