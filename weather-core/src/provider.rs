use crate::{
    Config, Location, LookupError, RawWeather, error::ConfigError,
    provider::openweather::OpenWeatherProvider,
};
use async_trait::async_trait;
use std::fmt::Debug;

pub mod openweather;

#[async_trait]
pub trait WeatherProvider: Send + Sync + Debug {
    /// Fetch current conditions. Every call goes to the network; nothing is cached.
    async fn fetch(&self, location: &Location) -> Result<RawWeather, LookupError>;
}

/// Construct the weather provider from config, failing fast on a missing credential.
pub fn provider_from_config(config: &Config) -> Result<Box<dyn WeatherProvider>, ConfigError> {
    Ok(Box::new(OpenWeatherProvider::from_config(config)?))
}
