//! Widget state and its text rendering.

use weather_core::{LookupError, SearchResult};

/// Everything the widget shows. Lookups produce data; this is the only place it lands.
#[derive(Debug, Default)]
pub struct WidgetState {
    /// Query that produced the current snapshot.
    pub city: Option<String>,
    pub current: Option<SearchResult>,
    /// Last hard failure, shown instead of updating the fields.
    pub error: Option<String>,
    /// Soft failure attached to the current snapshot.
    pub notice: Option<String>,
}

impl WidgetState {
    pub fn apply(&mut self, query: &str, result: Result<SearchResult, LookupError>) {
        match result {
            Ok(found) => {
                self.notice = found.soft_error.as_ref().map(LookupError::user_message);
                self.city = Some(query.to_string());
                self.current = Some(found);
                self.error = None;
            }
            Err(err) => {
                tracing::debug!("Keeping previous widget state after error: {}", err);
                self.error = Some(err.user_message());
            }
        }
    }

    pub fn render(&self) -> String {
        let mut lines = Vec::new();

        if let Some(err) = &self.error {
            lines.push(format!("Error: {err}"));
        }

        let Some(found) = &self.current else {
            if self.error.is_none() {
                lines.push("Search for a city to see its weather.".to_string());
            }
            return finish(lines);
        };
        let display = &found.display;

        let title = found
            .location
            .display_name
            .as_deref()
            .or(self.city.as_deref())
            .unwrap_or_default();
        lines.push(title.to_string());
        lines.push(format!(
            "{:<12}{}",
            display.local_time.as_deref().unwrap_or(""),
            display.timezone_id.as_deref().unwrap_or("")
        ));
        lines.push(found.location.coordinates_label());
        lines.push(String::new());

        let rows = [
            ("Temperature", display.temperature_label()),
            ("Humidity", display.humidity_label()),
            ("Pressure", display.pressure_label()),
            ("Wind Speed", display.wind_label()),
            ("Description", display.description.clone()),
        ];
        lines.extend(
            rows.into_iter()
                .map(|(label, value)| format!("  {label:<12} {value}")),
        );
        lines.push(String::new());

        lines.push(format!(
            "  {} [{}] {}",
            display.day_labels[0],
            display.icon_asset_name(),
            display.temperature_label()
        ));
        lines.push(format!("  {}", display.day_labels[1..].join("  ")));

        if let Some(notice) = &self.notice {
            lines.push(String::new());
            lines.push(format!("Note: {notice}"));
        }

        finish(lines)
    }
}

fn finish(lines: Vec<String>) -> String {
    let mut out = lines.join("\n");
    out.push('\n');
    out
}
