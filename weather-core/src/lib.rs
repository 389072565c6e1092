//! Core library for the `weather` widget.
//!
//! This crate defines:
//! - Configuration & credentials handling
//! - The lookup pipeline: geocoder, timezone resolver, weather provider, presenter
//! - Shared domain models (locations, raw readings, display snapshots)
//! - A search service that runs lookups off the interface thread
//!
//! It is used by `weather-cli`, but can also be reused by other front ends.

pub mod config;
pub mod error;
pub mod geocode;
pub mod model;
pub mod pipeline;
pub mod present;
pub mod provider;
pub mod service;
pub mod timezone;

pub use config::Config;
pub use error::{ConfigError, LookupError};
pub use geocode::{Geocoder, NominatimGeocoder};
pub use model::{DisplaySnapshot, Location, RawWeather, SearchResult};
pub use pipeline::WeatherPipeline;
pub use provider::WeatherProvider;
pub use service::{SearchMessage, SearchService};
pub use timezone::{BoundaryResolver, TimezoneLookup};

/// Shorten a response body for error messages without splitting a character.
pub(crate) fn truncate_body(body: &str) -> String {
    const MAX: usize = 200;
    match body.char_indices().nth(MAX) {
        Some((idx, _)) => format!("{}...", &body[..idx]),
        None => body.to_string(),
    }
}
