use serde::{Deserialize, Serialize, Serializer};

/// Geographic coordinates produced by the geocoder.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Location {
    pub latitude: f64,
    pub longitude: f64,
    /// Place name as the geocoding backend spelled it, if it returned one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,
}

impl Location {
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
            display_name: None,
        }
    }

    /// Coordinate caption shown under the timezone name.
    pub fn coordinates_label(&self) -> String {
        format!(
            "Longitude: {:.4}°N, Latitude: {:.4}°E",
            self.longitude, self.latitude
        )
    }
}

/// Current conditions exactly as the weather service reported them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawWeather {
    pub temperature_kelvin: f64,
    pub humidity_pct: u8,
    pub pressure_hpa: f64,
    pub wind_speed_mps: f64,
    pub description: String,
    pub icon_code: String,
}

/// Display-ready snapshot handed to the presentation layer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DisplaySnapshot {
    /// Rounded to one decimal place.
    pub temperature_celsius: f64,
    pub humidity_pct: u8,
    pub pressure_hpa: f64,
    pub wind_speed_mps: f64,
    pub description: String,
    /// `hh:mm AM/PM` in the resolved zone; `None` when the zone is unknown.
    pub local_time: Option<String>,
    pub timezone_id: Option<String>,
    pub icon_code: String,
    /// Five consecutive weekday names starting at "today" on the system clock.
    pub day_labels: [String; 5],
}

impl DisplaySnapshot {
    pub fn temperature_label(&self) -> String {
        format!("{:.1}°C", self.temperature_celsius)
    }

    pub fn humidity_label(&self) -> String {
        format!("{}%", self.humidity_pct)
    }

    pub fn pressure_label(&self) -> String {
        format!("{} hPa", self.pressure_hpa)
    }

    pub fn wind_label(&self) -> String {
        format!("{} m/s", self.wind_speed_mps)
    }

    /// Local image asset for the day icon. Whether it exists is the renderer's problem.
    pub fn icon_asset_name(&self) -> String {
        format!("{}@2x.png", self.icon_code)
    }
}

/// Outcome of one successful search.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SearchResult {
    pub location: Location,
    pub display: DisplaySnapshot,
    /// Non-aborting failure encountered on the way, e.g. an unresolved timezone.
    #[serde(serialize_with = "soft_error_message")]
    pub soft_error: Option<crate::LookupError>,
}

fn soft_error_message<S: Serializer>(
    err: &Option<crate::LookupError>,
    serializer: S,
) -> Result<S::Ok, S::Error> {
    match err {
        Some(err) => serializer.serialize_some(&err.user_message()),
        None => serializer.serialize_none(),
    }
}
