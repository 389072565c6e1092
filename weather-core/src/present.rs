//! Turns a raw reading into display-ready values.
//!
//! Presentation never fails: an unknown timezone only blanks the time fields.

use chrono::{DateTime, Duration, Local, TimeZone, Utc};
use chrono_tz::Tz;

use crate::model::{DisplaySnapshot, RawWeather};

pub const KELVIN_OFFSET: f64 = 273.15;

const LOCAL_TIME_FORMAT: &str = "%I:%M %p";

/// Kelvin to Celsius rounded to one decimal place.
///
/// Ties round half away from zero (`f64::round`): an exact 27.25 becomes 27.3 and an
/// exact -0.25 becomes -0.3.
pub fn kelvin_to_celsius(kelvin: f64) -> f64 {
    ((kelvin - KELVIN_OFFSET) * 10.0).round() / 10.0
}

/// Wall-clock time at `now` in `tz`, e.g. `"03:07 PM"`.
pub fn local_time(tz: Tz, now: DateTime<Utc>) -> String {
    now.with_timezone(&tz).format(LOCAL_TIME_FORMAT).to_string()
}

/// Five full weekday names starting with the weekday of `now` in `zone`.
pub fn day_labels<Z: TimeZone>(now: DateTime<Utc>, zone: &Z) -> [String; 5] {
    let today = now.with_timezone(zone).date_naive();
    std::array::from_fn(|offset| {
        (today + Duration::days(offset as i64))
            .format("%A")
            .to_string()
    })
}

/// Build the snapshot using the process's local clock for the weekday labels.
///
/// The labels follow the machine running the widget, not the searched city, so near
/// midnight they can disagree with `local_time`.
pub fn present(raw: &RawWeather, tz: Option<Tz>, now: DateTime<Utc>) -> DisplaySnapshot {
    present_in(raw, tz, now, &Local)
}

/// Same as [`present`] with the "system" zone supplied explicitly.
pub fn present_in<Z: TimeZone>(
    raw: &RawWeather,
    tz: Option<Tz>,
    now: DateTime<Utc>,
    system_zone: &Z,
) -> DisplaySnapshot {
    DisplaySnapshot {
        temperature_celsius: kelvin_to_celsius(raw.temperature_kelvin),
        humidity_pct: raw.humidity_pct,
        pressure_hpa: raw.pressure_hpa,
        wind_speed_mps: raw.wind_speed_mps,
        description: raw.description.clone(),
        local_time: tz.map(|tz| local_time(tz, now)),
        timezone_id: tz.map(|tz| tz.name().to_string()),
        icon_code: raw.icon_code.clone(),
        day_labels: day_labels(now, system_zone),
    }
}
