//! Pure display-formatting helpers.
//!
//! Converts raw metric values into display strings carrying imperial
//! units, humanizes timestamps and icon codes, and labels quality
//! scores. No I/O — everything here is deterministic except the
//! wall-clock wrappers `time_ago` and `format_local_time`.

use chrono::{DateTime, Local, Utc};

/// The 16 cardinal wind-direction labels, clockwise from north.
const CARDINAL_DIRECTIONS: [&str; 16] = [
    "N", "NNE", "NE", "ENE", "E", "ESE", "SE", "SSE", "S", "SSW", "SW", "WSW", "W", "WNW", "NW",
    "NNW",
];

/// Celsius → `"<F>°F (<C>°C)"`, both rounded to 1 decimal.
pub fn format_temperature(celsius: f64) -> String {
    let fahrenheit = celsius * 9.0 / 5.0 + 32.0;
    format!("{fahrenheit:.1}°F ({celsius:.1}°C)")
}

/// Meters per second → `"<mph> mph"`, rounded to 1 decimal.
pub fn format_wind_speed(meters_per_second: f64) -> String {
    format!("{:.1} mph", meters_per_second * 2.237)
}

/// Hectopascals → `"<inHg> inHg"`, rounded to 2 decimals.
pub fn format_pressure(hectopascals: f64) -> String {
    format!("{:.2} inHg", hectopascals * 0.02953)
}

/// Millimeters → `"<in> in"`, rounded to 2 decimals.
pub fn format_precipitation(millimeters: f64) -> String {
    format!("{:.2} in", millimeters / 25.4)
}

/// Degrees → one of the 16 cardinal labels, `round(deg/22.5) mod 16`.
pub fn wind_direction(degrees: f64) -> &'static str {
    let sector = (degrees / 22.5).round() as i64;
    CARDINAL_DIRECTIONS[sector.rem_euclid(16) as usize]
}

/// ISO timestamp → `"<Mon> <Day>, <Year>, <H>:<MM> <AM/PM>"` in the
/// viewer's local timezone. Unparseable input is returned verbatim.
pub fn format_local_time(timestamp: &str) -> String {
    match DateTime::parse_from_rfc3339(timestamp) {
        Ok(dt) => dt
            .with_timezone(&Local)
            .format("%b %-d, %Y, %-I:%M %p")
            .to_string(),
        Err(_) => timestamp.to_string(),
    }
}

/// ISO timestamp → relative age against wall-clock now.
pub fn time_ago(timestamp: &str) -> String {
    time_ago_at(timestamp, Utc::now())
}

/// Deterministic core of [`time_ago`]: age of `timestamp` as of `now`.
fn time_ago_at(timestamp: &str, now: DateTime<Utc>) -> String {
    let Ok(dt) = DateTime::parse_from_rfc3339(timestamp) else {
        return timestamp.to_string();
    };

    let minutes = now.signed_duration_since(dt.with_timezone(&Utc)).num_minutes();
    if minutes < 1 {
        "just now".to_string()
    } else if minutes < 60 {
        format!("{minutes}m ago")
    } else {
        let hours = minutes / 60;
        let remainder = minutes % 60;
        if remainder == 0 {
            format!("{hours}h ago")
        } else {
            format!("{hours}h {remainder}m ago")
        }
    }
}

/// WeatherXM icon code → display label. Unknown codes map to `"Unknown"`.
pub fn weather_icon_description(icon: &str) -> &'static str {
    match icon {
        "clear-day" => "Clear",
        "clear-night" => "Clear Night",
        "partly-cloudy-day" => "Partly Cloudy",
        "partly-cloudy-night" => "Partly Cloudy Night",
        "cloudy" => "Cloudy",
        "fog" => "Foggy",
        "rain" => "Rainy",
        "sleet" => "Sleet",
        "snow" => "Snowy",
        "wind" => "Windy",
        "thunderstorm" => "Thunderstorm",
        _ => "Unknown",
    }
}

/// Data-quality score → qualitative tier. Thresholds are inclusive
/// lower bounds.
pub fn data_quality_label(score: f64) -> &'static str {
    if score >= 0.8 {
        "Excellent"
    } else if score >= 0.6 {
        "Good"
    } else if score >= 0.4 {
        "Fair"
    } else {
        "Poor — use with caution"
    }
}

// ── Tests ───────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn temperature_contains_both_units() {
        assert_eq!(format_temperature(22.5), "72.5°F (22.5°C)");
        assert_eq!(format_temperature(0.0), "32.0°F (0.0°C)");
        assert_eq!(format_temperature(-40.0), "-40.0°F (-40.0°C)");
    }

    #[test]
    fn wind_speed_in_mph() {
        assert_eq!(format_wind_speed(10.0), "22.4 mph");
        assert_eq!(format_wind_speed(0.0), "0.0 mph");
    }

    #[test]
    fn pressure_in_inhg() {
        assert_eq!(format_pressure(1013.25), "29.92 inHg");
    }

    #[test]
    fn precipitation_in_inches() {
        assert_eq!(format_precipitation(25.4), "1.00 in");
        assert_eq!(format_precipitation(0.0), "0.00 in");
    }

    #[test]
    fn wind_direction_cardinal_labels() {
        assert_eq!(wind_direction(0.0), "N");
        assert_eq!(wind_direction(22.5), "NNE");
        assert_eq!(wind_direction(90.0), "E");
        assert_eq!(wind_direction(180.0), "S");
        assert_eq!(wind_direction(270.0), "W");
        assert_eq!(wind_direction(337.5), "NNW");
        // Rounds up into the next sector and wraps back to north.
        assert_eq!(wind_direction(355.0), "N");
    }

    #[test]
    fn wind_direction_periodic_in_360() {
        for d in [0.0, 11.24, 101.0, 259.9, 359.0] {
            assert_eq!(wind_direction(d), wind_direction(d + 360.0));
        }
    }

    #[test]
    fn time_ago_buckets() {
        let now = Utc.with_ymd_and_hms(2024, 6, 1, 12, 0, 0).unwrap();
        assert_eq!(time_ago_at("2024-06-01T11:59:30Z", now), "just now");
        assert_eq!(time_ago_at("2024-06-01T11:45:00Z", now), "15m ago");
        assert_eq!(time_ago_at("2024-06-01T10:00:00Z", now), "2h ago");
        assert_eq!(time_ago_at("2024-06-01T09:45:00Z", now), "2h 15m ago");
    }

    #[test]
    fn time_ago_bad_timestamp_is_returned_verbatim() {
        let now = Utc.with_ymd_and_hms(2024, 6, 1, 12, 0, 0).unwrap();
        assert_eq!(time_ago_at("not-a-time", now), "not-a-time");
    }

    #[test]
    fn icon_descriptions() {
        assert_eq!(weather_icon_description("thunderstorm"), "Thunderstorm");
        assert_eq!(weather_icon_description("clear-day"), "Clear");
        assert_eq!(weather_icon_description("partly-cloudy-night"), "Partly Cloudy Night");
        assert_eq!(weather_icon_description("volcanic-ash"), "Unknown");
        assert_eq!(weather_icon_description(""), "Unknown");
    }

    #[test]
    fn quality_label_inclusive_bounds() {
        assert_eq!(data_quality_label(1.0), "Excellent");
        assert_eq!(data_quality_label(0.8), "Excellent");
        assert_eq!(data_quality_label(0.79999), "Good");
        assert_eq!(data_quality_label(0.6), "Good");
        assert_eq!(data_quality_label(0.4), "Fair");
        assert_eq!(data_quality_label(0.39), "Poor — use with caution");
        assert_eq!(data_quality_label(0.0), "Poor — use with caution");
    }
}
