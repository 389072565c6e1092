//! Offline coordinate to IANA timezone lookup.

pub use chrono_tz::Tz;
use std::fmt::Debug;
use tzf_rs::DefaultFinder;

use crate::model::Location;

pub trait TimezoneLookup: Send + Sync + Debug {
    /// `None` when the point falls outside every known zone boundary.
    fn timezone_for(&self, location: &Location) -> Option<Tz>;
}

/// Lookup backed by the timezone-boundary dataset bundled with `tzf-rs`.
///
/// Loading the dataset takes a noticeable moment, so build this once and share it.
pub struct BoundaryResolver {
    finder: DefaultFinder,
}

impl BoundaryResolver {
    pub fn new() -> Self {
        Self {
            finder: DefaultFinder::new(),
        }
    }
}

impl Default for BoundaryResolver {
    fn default() -> Self {
        Self::new()
    }
}

impl Debug for BoundaryResolver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BoundaryResolver").finish_non_exhaustive()
    }
}

impl TimezoneLookup for BoundaryResolver {
    fn timezone_for(&self, location: &Location) -> Option<Tz> {
        let name = self
            .finder
            .get_tz_name(location.longitude, location.latitude);
        let tz = zone_from_name(name);

        match tz {
            Some(tz) => tracing::info!("Resolved timezone {}", tz.name()),
            None => tracing::debug!("No land timezone for '{}'", name),
        }
        tz
    }
}

/// Open-water areas come back as synthetic `Etc/GMT±N` zones; those count as unresolved.
pub fn zone_from_name(name: &str) -> Option<Tz> {
    if name.is_empty() || name.starts_with("Etc/") {
        return None;
    }
    name.parse::<Tz>().ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zone_from_name_accepts_land_zones() {
        assert_eq!(zone_from_name("Europe/Paris"), Some(chrono_tz::Europe::Paris));
        assert_eq!(zone_from_name("Asia/Tokyo"), Some(chrono_tz::Asia::Tokyo));
    }

    #[test]
    fn zone_from_name_rejects_ocean_and_unknown() {
        assert_eq!(zone_from_name(""), None);
        assert_eq!(zone_from_name("Etc/GMT+9"), None);
        assert_eq!(zone_from_name("Mars/Olympus_Mons"), None);
    }

    #[test]
    fn resolves_paris() {
        let resolver = BoundaryResolver::new();
        let tz = resolver.timezone_for(&Location::new(48.8566, 2.3522));
        assert_eq!(tz, Some(chrono_tz::Europe::Paris));
    }

    #[test]
    fn open_ocean_is_unresolved() {
        let resolver = BoundaryResolver::new();
        assert_eq!(resolver.timezone_for(&Location::new(0.0, -140.0)), None);
    }

    #[test]
    fn lookup_is_deterministic() {
        let resolver = BoundaryResolver::new();
        let tokyo = Location::new(35.6762, 139.6503);
        assert_eq!(resolver.timezone_for(&tokyo), resolver.timezone_for(&tokyo));
    }
}
