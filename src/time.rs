//! Time and Timezone Utilities Module
//!
//! Timezone resolution and duration formatting for the report layer.

use chrono_tz::Tz;
use iana_time_zone::get_timezone;
use std::sync::OnceLock;
use tzf_rs::DefaultFinder;

// tzf-rs DefaultFinder is pre-compiled and very fast
static TZF_FINDER: OnceLock<DefaultFinder> = OnceLock::new();

// ===================== TIMEZONE UTILITIES =====================

/// Get the system's configured timezone.
///
/// Falls back to UTC if the system timezone cannot be determined.
pub fn system_timezone() -> Tz {
    get_timezone().ok().and_then(|s| s.parse().ok()).unwrap_or(Tz::UTC)
}

/// Resolve timezone from geographic coordinates.
///
/// # Arguments
/// * `lon` - Longitude in degrees
/// * `lat` - Latitude in degrees
///
/// # Returns
/// The resolved timezone, or UTC if resolution fails
pub fn resolve_timezone(lon: f64, lat: f64) -> Tz {
    let finder = TZF_FINDER.get_or_init(DefaultFinder::new);

    // Get the IANA string (e.g., "Europe/Rome")
    let tzid = finder.get_tz_name(lon, lat);

    // Parse into chrono_tz::Tz to get historical correctness
    tzid.parse::<Tz>().unwrap_or(Tz::UTC)
}

// ===================== FORMATTING =====================

/// Format a duration in seconds as "Xh Ym Zs".
///
/// # Arguments
/// * `seconds` - Duration in seconds (can be negative, abs value is used)
pub fn format_hms(seconds: i64) -> String {
    let total_seconds = seconds.abs();
    if total_seconds == 0 {
        return "0s".to_string();
    }

    let h = total_seconds / 3600;
    let m = (total_seconds % 3600) / 60;
    let s = total_seconds % 60;

    let mut parts = Vec::new();
    if h > 0 {
        parts.push(format!("{}h", h));
    }
    if m > 0 {
        parts.push(format!("{}m", m));
    }
    if s > 0 {
        parts.push(format!("{}s", s));
    }

    parts.join(" ")
}

// ===================== TESTS =====================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_hms() {
        assert_eq!(format_hms(3661), "1h 1m 1s");
        assert_eq!(format_hms(7200), "2h");
        assert_eq!(format_hms(45), "45s");
        assert_eq!(format_hms(60), "1m");
        assert_eq!(format_hms(0), "0s");
        assert_eq!(format_hms(-3660), "1h 1m"); // Negative handled via abs
    }

    #[test]
    fn test_resolve_timezone_rome() {
        use chrono_tz::Europe::Rome;
        let tz = resolve_timezone(12.5, 41.9);
        assert_eq!(tz, Rome);
    }

    #[test]
    fn test_resolve_timezone_new_york() {
        use chrono_tz::America::New_York;
        let tz = resolve_timezone(-77.0365, 38.8977);
        assert_eq!(tz, New_York);
    }

    #[test]
    fn test_resolve_timezone_sydney() {
        use chrono_tz::Australia::Sydney;
        let tz = resolve_timezone(149.1165, -35.3108);
        assert_eq!(tz, Sydney);
    }
}
