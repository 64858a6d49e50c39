//! Input validation at the tool boundary.
//!
//! Station ids are interpolated into URL paths, so they get a charset
//! check before any request is built. Dates must be `YYYY-MM-DD` as the
//! upstream historical endpoint requires. Numeric range bounds (hours,
//! days, radius, limit) are documented in the tool schemas but passed
//! through to the upstream API unchecked.

use chrono::NaiveDate;

/// Validate a station id: 1-64 chars, `[a-zA-Z0-9_-]` only.
pub fn validate_station_id(id: &str) -> Result<(), String> {
    if id.is_empty() || id.len() > 64 {
        return Err(format!(
            "Station ID must be 1-64 characters, got {}",
            id.len()
        ));
    }
    if !id
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
    {
        return Err(
            "Station ID may only contain alphanumeric characters, hyphens, and underscores"
                .to_string(),
        );
    }
    Ok(())
}

/// Validate a `YYYY-MM-DD` date string.
pub fn validate_date(date: &str) -> Result<(), String> {
    NaiveDate::parse_from_str(date, "%Y-%m-%d")
        .map(|_| ())
        .map_err(|_| format!("Invalid date: {date}. Use YYYY-MM-DD."))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn station_id_valid() {
        assert!(validate_station_id("e63f7e10-2ab9-11ee").is_ok());
        assert!(validate_station_id("my_station").is_ok());
        assert!(validate_station_id("a").is_ok());
        assert!(validate_station_id(&"a".repeat(64)).is_ok());
    }

    #[test]
    fn station_id_invalid() {
        assert!(validate_station_id("").is_err());
        assert!(validate_station_id(&"a".repeat(65)).is_err());
        assert!(validate_station_id("id/with/slashes").is_err());
        assert!(validate_station_id("id with spaces").is_err());
        assert!(validate_station_id("../../etc").is_err());
    }

    #[test]
    fn date_valid() {
        assert!(validate_date("2024-01-15").is_ok());
        assert!(validate_date("2024-02-29").is_ok());
    }

    #[test]
    fn date_invalid() {
        assert!(validate_date("2024-13-01").is_err());
        assert!(validate_date("15-01-2024").is_err());
        assert!(validate_date("not-a-date").is_err());
        assert!(validate_date("").is_err());
    }
}
