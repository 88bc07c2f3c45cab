use std::env;

use chrono::{DateTime, Utc};
use model::Coordinate;
use tokio::sync::RwLock;

use crate::{
    response::{parse_reverse, parse_search},
    ApiError, GeocodedPlace,
};

pub const NOMINATIM_URL: &str = "https://nominatim.openstreetmap.org";
pub const DEFAULT_USER_AGENT: &str =
    concat!("region-discovery/", env!("CARGO_PKG_VERSION"));
pub const SEARCH_RESULT_LIMIT: usize = 5;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NominatimConfig {
    pub base_url: String,
    /// Nominatim's usage policy asks for an identifying user agent.
    pub user_agent: String,
    pub rate_limit_per_minute: Option<u64>,
}

impl NominatimConfig {
    /// Reads `NOMINATIM_BASE_URL`, `NOMINATIM_USER_AGENT` and
    /// `NOMINATIM_RATE_LIMIT_PER_MINUTE`; all optional.
    pub fn from_env() -> Self {
        let base_url = env::var("NOMINATIM_BASE_URL")
            .map(|url| url.trim_end_matches('/').to_owned())
            .unwrap_or_else(|_| NOMINATIM_URL.to_owned());
        let user_agent =
            env::var("NOMINATIM_USER_AGENT").unwrap_or_else(|_| DEFAULT_USER_AGENT.to_owned());
        let rate_limit_per_minute = env::var("NOMINATIM_RATE_LIMIT_PER_MINUTE")
            .ok()
            .and_then(|limit| limit.parse().ok());

        Self {
            base_url,
            user_agent,
            rate_limit_per_minute,
        }
    }
}

impl Default for NominatimConfig {
    fn default() -> Self {
        Self {
            base_url: NOMINATIM_URL.to_owned(),
            user_agent: DEFAULT_USER_AGENT.to_owned(),
            rate_limit_per_minute: None,
        }
    }
}

struct RateLimitState {
    pub available_requests: u64,
    pub last_refill: DateTime<Utc>,
}

pub struct NominatimClient {
    pub config: NominatimConfig,
    http: reqwest::Client,
    state: RwLock<RateLimitState>,
}

impl NominatimClient {
    pub fn new(config: NominatimConfig) -> Result<Self, ApiError> {
        let http = reqwest::Client::builder()
            .user_agent(config.user_agent.clone())
            .build()?;
        Ok(Self {
            state: RwLock::new(RateLimitState {
                available_requests: config.rate_limit_per_minute.unwrap_or(0),
                last_refill: Utc::now(),
            }),
            config,
            http,
        })
    }

    pub async fn available_requests(&self) -> u64 {
        self.state.read().await.available_requests
    }

    async fn try_decrement_available_requests(&self) -> Result<(), ApiError> {
        if let Some(rate_limit_per_minute) = self.config.rate_limit_per_minute {
            let mut state = self.state.write().await;

            let minutes_since_refill = (Utc::now() - state.last_refill).num_minutes();
            if minutes_since_refill >= 1 {
                state.available_requests = rate_limit_per_minute;
                state.last_refill = Utc::now();
            }

            if state.available_requests != 0 {
                state.available_requests -= 1;
            } else {
                return Err(ApiError::RateLimitReached);
            }
        }
        Ok(())
    }

    /// Fetches `endpoint` with the given query and returns the raw body.
    async fn get(&self, endpoint: &str, query: &[(&str, String)]) -> Result<String, ApiError> {
        self.try_decrement_available_requests().await?;

        let url = format!("{}/{endpoint}", self.config.base_url);
        log::debug!("requesting endpoint '{url}'");
        let response = self
            .http
            .get(&url)
            .query(query)
            .query(&[("format", "jsonv2")])
            .header("accept", "application/json")
            .send()
            .await?;

        match response.status() {
            reqwest::StatusCode::OK => Ok(response.text().await?),
            reqwest::StatusCode::TOO_MANY_REQUESTS => Err(ApiError::RateLimitReached),
            other => match response.text().await {
                Ok(val) => Err(ApiError::InvalidResponse {
                    status_code: other,
                    url,
                    response: Some(val),
                }),
                Err(_) => Err(ApiError::InvalidResponse {
                    status_code: other,
                    url,
                    response: None,
                }),
            },
        }
    }

    /// Free-form forward lookup.
    pub async fn search(&self, address: &str) -> Result<Vec<GeocodedPlace>, ApiError> {
        let address = address.trim();
        if address.is_empty() {
            return Ok(vec![]);
        }
        let body = self
            .get(
                "search",
                &[
                    ("q", address.to_owned()),
                    ("limit", SEARCH_RESULT_LIMIT.to_string()),
                ],
            )
            .await?;
        parse_search(&body)
    }

    /// Name of the closest address, `None` when there is nothing nearby.
    pub async fn reverse(&self, coordinate: Coordinate) -> Result<Option<String>, ApiError> {
        let body = self
            .get(
                "reverse",
                &[
                    ("lat", coordinate.latitude().to_string()),
                    ("lon", coordinate.longitude().to_string()),
                ],
            )
            .await?;
        parse_reverse(&body)
    }

    /// Like [`NominatimClient::reverse`], but never fails: any error or
    /// missing result yields the coordinate itself as `"lat, lon"`.
    pub async fn display_name_or_coordinates(&self, coordinate: Coordinate) -> String {
        match self.reverse(coordinate).await {
            Ok(Some(display_name)) => display_name,
            Ok(None) => format_coordinates(coordinate),
            Err(why) => {
                log::warn!("reverse geocoding failed, using coordinates: {why}");
                format_coordinates(coordinate)
            }
        }
    }
}

pub fn format_coordinates(coordinate: Coordinate) -> String {
    format!("{}, {}", coordinate.latitude(), coordinate.longitude())
}
