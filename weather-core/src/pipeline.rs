//! One search: geocode, resolve the timezone, fetch current weather, present.

use chrono::{DateTime, Utc};
use std::sync::Arc;
use tracing::instrument;

use crate::{
    config::Config,
    error::{ConfigError, LookupError},
    geocode::{Geocoder, NominatimGeocoder},
    model::SearchResult,
    present::present,
    provider::{WeatherProvider, provider_from_config},
    timezone::{BoundaryResolver, TimezoneLookup},
};

/// Stateless lookup pipeline. Each search issues fresh requests.
#[derive(Debug)]
pub struct WeatherPipeline {
    geocoder: Box<dyn Geocoder>,
    provider: Box<dyn WeatherProvider>,
    timezones: Arc<dyn TimezoneLookup>,
}

impl WeatherPipeline {
    pub fn new(
        geocoder: Box<dyn Geocoder>,
        provider: Box<dyn WeatherProvider>,
        timezones: Arc<dyn TimezoneLookup>,
    ) -> Self {
        Self {
            geocoder,
            provider,
            timezones,
        }
    }

    /// Build the production pipeline. Missing credentials fail here, before any search.
    pub fn from_config(config: &Config) -> Result<Self, ConfigError> {
        let geocoder = NominatimGeocoder::from_config(config)?;
        let provider = provider_from_config(config)?;

        Ok(Self::new(
            Box::new(geocoder),
            provider,
            Arc::new(BoundaryResolver::new()),
        ))
    }

    pub async fn search(&self, query: &str) -> Result<SearchResult, LookupError> {
        self.search_at(query, Utc::now()).await
    }

    /// Run a search as of `now`. Any hard error stops the remaining stages.
    #[instrument(skip(self), level = "info")]
    pub async fn search_at(
        &self,
        query: &str,
        now: DateTime<Utc>,
    ) -> Result<SearchResult, LookupError> {
        let location = self.geocoder.resolve(query).await?;

        let tz = self.timezones.timezone_for(&location);
        let soft_error = match tz {
            Some(_) => None,
            None => {
                let err = LookupError::TimezoneUnresolved {
                    latitude: location.latitude,
                    longitude: location.longitude,
                };
                tracing::warn!("{}", err);
                Some(err)
            }
        };

        let raw = self.provider.fetch(&location).await?;
        let display = present(&raw, tz, now);

        Ok(SearchResult {
            location,
            display,
            soft_error,
        })
    }
}
