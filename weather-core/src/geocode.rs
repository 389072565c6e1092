//! Forward geocoding: free-text place name to coordinates.
//! Uses Nominatim (OpenStreetMap), identified by the configured user agent.

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use std::fmt::Debug;
use tracing::instrument;

use crate::{
    config::Config,
    error::{ConfigError, LookupError},
    model::Location,
};

const NOMINATIM_URL: &str = "https://nominatim.openstreetmap.org";

#[async_trait]
pub trait Geocoder: Send + Sync + Debug {
    /// Resolve a query to its single best match.
    async fn resolve(&self, query: &str) -> Result<Location, LookupError>;
}

#[derive(Debug, Clone)]
pub struct NominatimGeocoder {
    base_url: String,
    http: Client,
}

#[derive(Debug, Deserialize)]
struct NominatimPlace {
    lat: String,
    lon: String,
    display_name: Option<String>,
}

impl NominatimGeocoder {
    pub fn from_config(config: &Config) -> Result<Self, ConfigError> {
        let user_agent = config.require_user_agent()?;
        let http = Client::builder()
            .timeout(config.timeout())
            .user_agent(user_agent)
            .build()
            .map_err(|e| ConfigError::InvalidClient(e.to_string()))?;

        let base_url = config
            .geocoding_url
            .clone()
            .unwrap_or_else(|| NOMINATIM_URL.to_string());

        Ok(Self { base_url, http })
    }

    fn search_url(&self) -> String {
        format!("{}/search", self.base_url.trim_end_matches('/'))
    }
}

#[async_trait]
impl Geocoder for NominatimGeocoder {
    #[instrument(skip(self), level = "info")]
    async fn resolve(&self, query: &str) -> Result<Location, LookupError> {
        let query = query.trim();
        if query.is_empty() {
            return Err(LookupError::GeocodingQueryError(
                "query must not be empty".to_string(),
            ));
        }

        let res = self
            .http
            .get(self.search_url())
            .query(&[("q", query), ("format", "json"), ("limit", "1")])
            .send()
            .await
            .map_err(transport_error)?;

        let status = res.status();
        let body = res.text().await.map_err(transport_error)?;

        if !status.is_success() {
            tracing::debug!("Geocoding returned status {}: {}", status, body);
            return Err(status_error(status, &body));
        }

        let places: Vec<NominatimPlace> = serde_json::from_str(&body).map_err(|e| {
            LookupError::GeocodingServiceError(format!("unreadable geocoding response: {e}"))
        })?;

        let place = places.into_iter().next().ok_or_else(|| {
            LookupError::GeocodingQueryError(format!("no match for '{query}'"))
        })?;

        let location = Location {
            latitude: parse_coordinate(&place.lat, "lat")?,
            longitude: parse_coordinate(&place.lon, "lon")?,
            display_name: place.display_name,
        };

        tracing::info!(
            "Geocoded '{}' to {}, {}",
            query,
            location.latitude,
            location.longitude
        );
        Ok(location)
    }
}

fn parse_coordinate(raw: &str, field: &str) -> Result<f64, LookupError> {
    raw.trim().parse::<f64>().map_err(|_| {
        LookupError::GeocodingServiceError(format!("invalid {field} value '{raw}'"))
    })
}

fn transport_error(err: reqwest::Error) -> LookupError {
    if err.is_timeout() {
        LookupError::GeocodingTimeout
    } else {
        LookupError::GeocodingUnavailable(err.to_string())
    }
}

fn status_error(status: StatusCode, body: &str) -> LookupError {
    let detail = format!("{status}: {}", crate::truncate_body(body));
    match status {
        StatusCode::BAD_REQUEST => LookupError::GeocodingQueryError(detail),
        StatusCode::SERVICE_UNAVAILABLE => LookupError::GeocodingUnavailable(detail),
        _ => LookupError::GeocodingServiceError(detail),
    }
}
