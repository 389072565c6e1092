use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use tracing::instrument;

use crate::{
    config::Config,
    error::{ConfigError, LookupError},
    model::{Location, RawWeather},
    truncate_body,
};

use super::WeatherProvider;

const OPENWEATHER_URL: &str = "https://api.openweathermap.org";

#[derive(Debug, Clone)]
pub struct OpenWeatherProvider {
    api_key: String,
    base_url: String,
    http: Client,
}

impl OpenWeatherProvider {
    pub fn from_config(config: &Config) -> Result<Self, ConfigError> {
        let api_key = config.require_api_key()?.to_owned();
        let http = Client::builder()
            .timeout(config.timeout())
            .build()
            .map_err(|e| ConfigError::InvalidClient(e.to_string()))?;

        let base_url = config
            .weather_url
            .clone()
            .unwrap_or_else(|| OPENWEATHER_URL.to_string());

        Ok(Self {
            api_key,
            base_url,
            http,
        })
    }

    fn current_url(&self) -> String {
        format!("{}/data/2.5/weather", self.base_url.trim_end_matches('/'))
    }
}

// Every field is required: a response missing any of them is rejected as a whole.
#[derive(Debug, Deserialize)]
struct OwMain {
    temp: f64,
    humidity: u8,
    pressure: f64,
}

#[derive(Debug, Deserialize)]
struct OwWeather {
    description: String,
    icon: String,
}

#[derive(Debug, Deserialize)]
struct OwWind {
    speed: f64,
}

#[derive(Debug, Deserialize)]
struct OwCurrentResponse {
    main: OwMain,
    weather: Vec<OwWeather>,
    wind: OwWind,
}

#[derive(Debug, Deserialize)]
struct OwErrorBody {
    message: String,
}

#[async_trait]
impl WeatherProvider for OpenWeatherProvider {
    #[instrument(skip(self), level = "info")]
    async fn fetch(&self, location: &Location) -> Result<RawWeather, LookupError> {
        let lat = location.latitude.to_string();
        let lon = location.longitude.to_string();

        let res = self
            .http
            .get(self.current_url())
            .query(&[
                ("lat", lat.as_str()),
                ("lon", lon.as_str()),
                ("appid", self.api_key.as_str()),
            ])
            .send()
            .await
            .map_err(transport_error)?;

        let status = res.status();
        let body = res.text().await.map_err(transport_error)?;

        if !status.is_success() {
            tracing::debug!("OpenWeather returned status {}: {}", status, body);
            return Err(LookupError::WeatherHttpError {
                status: status.as_u16(),
                message: error_message(&body),
            });
        }

        parse_current(&body)
    }
}

fn parse_current(body: &str) -> Result<RawWeather, LookupError> {
    let parsed: OwCurrentResponse = serde_json::from_str(body)
        .map_err(|e| LookupError::WeatherMalformedResponse(e.to_string()))?;

    let first = parsed.weather.into_iter().next().ok_or_else(|| {
        LookupError::WeatherMalformedResponse("`weather` array is empty".to_string())
    })?;

    Ok(RawWeather {
        temperature_kelvin: parsed.main.temp,
        humidity_pct: parsed.main.humidity,
        pressure_hpa: parsed.main.pressure,
        wind_speed_mps: parsed.wind.speed,
        description: first.description,
        icon_code: first.icon,
    })
}

/// OpenWeather error bodies look like `{"cod":401,"message":"Invalid API key..."}`.
fn error_message(body: &str) -> String {
    serde_json::from_str::<OwErrorBody>(body)
        .map(|b| b.message)
        .unwrap_or_else(|_| truncate_body(body))
}

// The request URL carries `appid`, so it never goes into the message.
fn transport_error(err: reqwest::Error) -> LookupError {
    if err.is_timeout() {
        LookupError::WeatherTimeout
    } else {
        LookupError::WeatherNetworkError(err.without_url().to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn sample_body() -> serde_json::Value {
        serde_json::json!({
            "coord": {"lon": 2.35, "lat": 48.86},
            "weather": [{"id": 800, "main": "Clear", "description": "clear sky", "icon": "01d"}],
            "main": {"temp": 295.15, "feels_like": 294.8, "pressure": 1013, "humidity": 45},
            "wind": {"speed": 3.6, "deg": 250},
            "name": "Paris"
        })
    }

    fn provider_for(server: &MockServer) -> OpenWeatherProvider {
        let cfg = Config {
            api_key: Some("TEST_KEY".into()),
            weather_url: Some(server.uri()),
            timeout_secs: Some(1),
            ..Config::default()
        };
        OpenWeatherProvider::from_config(&cfg).unwrap()
    }

    fn paris() -> Location {
        Location::new(48.86, 2.35)
    }

    #[test]
    fn requires_api_key() {
        let err = OpenWeatherProvider::from_config(&Config::default()).unwrap_err();
        assert!(err.to_string().contains("API_KEY"));
    }

    #[tokio::test]
    async fn fetches_current_weather_in_kelvin() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/data/2.5/weather"))
            .and(query_param("lat", "48.86"))
            .and(query_param("lon", "2.35"))
            .and(query_param("appid", "TEST_KEY"))
            .respond_with(ResponseTemplate::new(200).set_body_json(sample_body()))
            .expect(1)
            .mount(&server)
            .await;

        let raw = provider_for(&server).fetch(&paris()).await.unwrap();

        assert_eq!(
            raw,
            RawWeather {
                temperature_kelvin: 295.15,
                humidity_pct: 45,
                pressure_hpa: 1013.0,
                wind_speed_mps: 3.6,
                description: "clear sky".into(),
                icon_code: "01d".into(),
            }
        );
    }

    #[tokio::test]
    async fn identical_lookups_are_never_cached() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/data/2.5/weather"))
            .respond_with(ResponseTemplate::new(200).set_body_json(sample_body()))
            .expect(2)
            .mount(&server)
            .await;

        let provider = provider_for(&server);
        provider.fetch(&paris()).await.unwrap();
        provider.fetch(&paris()).await.unwrap();
    }

    #[tokio::test]
    async fn http_error_carries_status_and_message() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(401).set_body_json(serde_json::json!({
                "cod": 401,
                "message": "Invalid API key."
            })))
            .mount(&server)
            .await;

        let err = provider_for(&server).fetch(&paris()).await.unwrap_err();
        assert_eq!(
            err,
            LookupError::WeatherHttpError {
                status: 401,
                message: "Invalid API key.".into()
            }
        );
    }

    #[tokio::test]
    async fn http_error_with_plain_body_keeps_text() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(502).set_body_string("Bad Gateway"))
            .mount(&server)
            .await;

        let err = provider_for(&server).fetch(&paris()).await.unwrap_err();
        assert_eq!(
            err,
            LookupError::WeatherHttpError {
                status: 502,
                message: "Bad Gateway".into()
            }
        );
    }

    #[tokio::test]
    async fn slow_service_times_out() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(sample_body())
                    .set_delay(Duration::from_secs(3)),
            )
            .mount(&server)
            .await;

        let err = provider_for(&server).fetch(&paris()).await.unwrap_err();
        assert_eq!(err, LookupError::WeatherTimeout);
    }

    #[tokio::test]
    async fn unreachable_service_is_network_error() {
        let cfg = Config {
            api_key: Some("TEST_KEY".into()),
            weather_url: Some("http://127.0.0.1:1".into()),
            timeout_secs: Some(1),
            ..Config::default()
        };
        let provider = OpenWeatherProvider::from_config(&cfg).unwrap();

        let err = provider.fetch(&paris()).await.unwrap_err();
        assert!(matches!(err, LookupError::WeatherNetworkError(_)));
    }

    #[tokio::test]
    async fn network_error_does_not_expose_api_key() {
        let cfg = Config {
            api_key: Some("SECRET_KEY_123".into()),
            weather_url: Some("http://127.0.0.1:1".into()),
            timeout_secs: Some(1),
            ..Config::default()
        };
        let provider = OpenWeatherProvider::from_config(&cfg).unwrap();

        let err = provider.fetch(&paris()).await.unwrap_err();
        assert!(!err.to_string().contains("SECRET_KEY_123"));
        assert!(!err.user_message().contains("SECRET_KEY_123"));
        assert!(!format!("{err:?}").contains("SECRET_KEY_123"));
    }

    #[test]
    fn every_required_field_is_enforced() {
        let removals = [
            ("main", "temp"),
            ("main", "humidity"),
            ("main", "pressure"),
            ("wind", "speed"),
            ("weather", "description"),
            ("weather", "icon"),
        ];

        for (section, key) in removals {
            let mut body = sample_body();
            let target = match section {
                "weather" => &mut body["weather"][0],
                other => &mut body[other],
            };
            if let Some(obj) = target.as_object_mut() {
                obj.remove(key);
            }

            let err = parse_current(&body.to_string()).unwrap_err();
            assert!(
                matches!(err, LookupError::WeatherMalformedResponse(_)),
                "removing {section}.{key} should be malformed, got {err:?}"
            );
        }
    }

    #[test]
    fn empty_weather_array_is_malformed() {
        let mut body = sample_body();
        body["weather"] = serde_json::json!([]);

        let err = parse_current(&body.to_string()).unwrap_err();
        assert!(matches!(err, LookupError::WeatherMalformedResponse(_)));
    }

    #[test]
    fn non_json_body_is_malformed() {
        let err = parse_current("<html>maintenance</html>").unwrap_err();
        assert!(matches!(err, LookupError::WeatherMalformedResponse(_)));
    }
}
