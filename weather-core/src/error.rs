//! Error taxonomy for the lookup pipeline and for configuration.

use thiserror::Error;

/// Every way a single search can fail.
///
/// The set is flat on purpose: each variant maps to exactly one user-facing message
/// and none of them is retried. `TimezoneUnresolved` is the only soft failure; the
/// pipeline reports it alongside a snapshot instead of aborting.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum LookupError {
    #[error("Geocoding service error: {0}")]
    GeocodingServiceError(String),

    #[error("Geocoding service timed out")]
    GeocodingTimeout,

    #[error("Geocoding service unavailable: {0}")]
    GeocodingUnavailable(String),

    #[error("Geocoding query error: {0}")]
    GeocodingQueryError(String),

    #[error("Weather request failed with status {status}: {message}")]
    WeatherHttpError { status: u16, message: String },

    #[error("Weather request timed out")]
    WeatherTimeout,

    #[error("Weather network error: {0}")]
    WeatherNetworkError(String),

    #[error("Malformed weather response: {0}")]
    WeatherMalformedResponse(String),

    #[error("No timezone found at latitude {latitude}, longitude {longitude}")]
    TimezoneUnresolved { latitude: f64, longitude: f64 },
}

impl LookupError {
    /// Soft errors leave the rest of the snapshot displayable.
    pub fn is_soft(&self) -> bool {
        matches!(self, Self::TimezoneUnresolved { .. })
    }

    /// Message shown to the user in place of the widget update.
    pub fn user_message(&self) -> String {
        match self {
            Self::GeocodingServiceError(cause) => format!("Geocoding service error: {cause}"),
            Self::GeocodingTimeout => "Geocoding service timed out".to_string(),
            Self::GeocodingUnavailable(cause) => {
                format!("Geocoding service unavailable: {cause}")
            }
            Self::GeocodingQueryError(cause) => format!("Geocoding service query error: {cause}"),
            Self::WeatherHttpError { status, message } => {
                format!("HTTP error: {status} {message}")
            }
            Self::WeatherTimeout => "Timeout error: the weather service did not answer".to_string(),
            Self::WeatherNetworkError(cause) => format!("Request error: {cause}"),
            Self::WeatherMalformedResponse(cause) => {
                format!("Unexpected weather data: {cause}")
            }
            Self::TimezoneUnresolved { .. } => {
                "Timezone could not be determined for this location".to_string()
            }
        }
    }
}

/// Configuration problems detected before any network call is made.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Missing configuration value {key}.\nHint: {hint}")]
    Missing { key: &'static str, hint: &'static str },

    #[error("Failed to build HTTP client: {0}")]
    InvalidClient(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_timezone_is_soft() {
        assert!(
            LookupError::TimezoneUnresolved {
                latitude: 0.0,
                longitude: -140.0
            }
            .is_soft()
        );
        assert!(!LookupError::GeocodingTimeout.is_soft());
        assert!(!LookupError::WeatherTimeout.is_soft());
        assert!(!LookupError::WeatherMalformedResponse("main.temp".into()).is_soft());
    }

    #[test]
    fn user_messages_are_distinct_per_kind() {
        let errors = [
            LookupError::GeocodingServiceError("x".into()),
            LookupError::GeocodingTimeout,
            LookupError::GeocodingUnavailable("x".into()),
            LookupError::GeocodingQueryError("x".into()),
            LookupError::WeatherHttpError {
                status: 401,
                message: "x".into(),
            },
            LookupError::WeatherTimeout,
            LookupError::WeatherNetworkError("x".into()),
            LookupError::WeatherMalformedResponse("x".into()),
            LookupError::TimezoneUnresolved {
                latitude: 0.0,
                longitude: 0.0,
            },
        ];

        let messages: std::collections::HashSet<String> =
            errors.iter().map(LookupError::user_message).collect();
        assert_eq!(messages.len(), errors.len());
    }

    #[test]
    fn user_message_carries_cause() {
        let err = LookupError::WeatherHttpError {
            status: 401,
            message: "Invalid API key".into(),
        };
        let msg = err.user_message();
        assert!(msg.contains("401"));
        assert!(msg.contains("Invalid API key"));

        let err = LookupError::GeocodingQueryError("no match for 'Atlantis'".into());
        assert!(err.user_message().contains("Atlantis"));
    }

    #[test]
    fn missing_config_mentions_key_and_hint() {
        let err = ConfigError::Missing {
            key: "API_KEY",
            hint: "run `weather configure`",
        };
        let msg = err.to_string();
        assert!(msg.contains("API_KEY"));
        assert!(msg.contains("weather configure"));
    }
}
