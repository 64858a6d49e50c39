//! Markdown renderers for tool results.
//!
//! Pure functions over the typed models: every tool handler fetches one
//! response, deserializes it, and hands it to a renderer here. Array
//! order is preserved as received — forecasts are assumed chronological
//! and are not re-sorted.

use chrono::{DateTime, Utc};

use crate::format::{
    data_quality_label, format_local_time, format_precipitation, format_pressure,
    format_temperature, format_wind_speed, time_ago, weather_icon_description, wind_direction,
};
use crate::models::{
    Cell, DailyForecastPoint, HourlyForecastPoint, Observation, Station, StationLatest,
    StationSearchResults, WeatherAlert,
};

/// How many historical points the "recent observations" tail lists.
const RECENT_OBSERVATIONS: usize = 10;

fn location_line(lat: f64, lon: f64, elevation: f64) -> String {
    format!("{lat:.4}, {lon:.4} (elevation {elevation:.0} m)")
}

/// Current-weather snapshot for one station.
pub fn render_current_weather(station_id: &str, latest: &StationLatest) -> String {
    let obs = &latest.observation;
    let mut out = format!("# Current Weather for Station {station_id}\n\n");

    out.push_str(&format!(
        "**Conditions:** {}\n",
        weather_icon_description(&obs.icon)
    ));
    out.push_str(&format!(
        "**Temperature:** {}\n",
        format_temperature(obs.temperature)
    ));
    out.push_str(&format!(
        "**Feels Like:** {}\n",
        format_temperature(obs.feels_like)
    ));
    out.push_str(&format!(
        "**Dew Point:** {}\n",
        format_temperature(obs.dew_point)
    ));
    out.push_str(&format!("**Humidity:** {:.0}%\n", obs.humidity));

    let mut wind = format!(
        "**Wind:** {} {}",
        format_wind_speed(obs.wind_speed),
        wind_direction(obs.wind_direction)
    );
    if obs.wind_gust > obs.wind_speed {
        wind.push_str(&format!(" (gusts {})", format_wind_speed(obs.wind_gust)));
    }
    wind.push('\n');
    out.push_str(&wind);

    out.push_str(&format!(
        "**Pressure:** {}\n",
        format_pressure(obs.pressure)
    ));
    if obs.uv_index > 0.0 {
        out.push_str(&format!("**UV Index:** {:.0}\n", obs.uv_index));
    }
    if obs.solar_irradiance > 0.0 {
        out.push_str(&format!(
            "**Solar Irradiance:** {:.1} W/m²\n",
            obs.solar_irradiance
        ));
    }
    if obs.precipitation_rate > 0.0 {
        out.push_str(&format!(
            "**Precipitation Rate:** {}/hr\n",
            format_precipitation(obs.precipitation_rate)
        ));
    }

    if let Some(location) = &latest.location {
        out.push_str(&format!(
            "**Location:** {}\n",
            location_line(location.lat, location.lon, location.elevation)
        ));
    }

    out.push_str(&format!(
        "**Observed:** {} ({})\n",
        time_ago(&obs.timestamp),
        format_local_time(&obs.timestamp)
    ));
    out
}

/// Hourly forecast, one section per point in array order.
pub fn render_hourly_forecast(station_id: &str, points: &[HourlyForecastPoint]) -> String {
    if points.is_empty() {
        return format!("No hourly forecast available for station {station_id}.");
    }

    let mut out = format!("# Hourly Forecast for Station {station_id}\n");
    for point in points {
        out.push_str(&format!("\n## {}\n", format_local_time(&point.timestamp)));
        out.push_str(&format!(
            "**Conditions:** {}\n",
            weather_icon_description(&point.icon)
        ));
        out.push_str(&format!(
            "**Temperature:** {} (feels like {})\n",
            format_temperature(point.temperature),
            format_temperature(point.feels_like)
        ));
        out.push_str(&format!(
            "**Precipitation:** {} ({:.0}% chance)\n",
            format_precipitation(point.precipitation),
            point.precipitation_probability
        ));
        out.push_str(&format!("**Humidity:** {:.0}%\n", point.humidity));
        out.push_str(&format!(
            "**Wind:** {} {}\n",
            format_wind_speed(point.wind_speed),
            wind_direction(point.wind_direction)
        ));
        out.push_str(&format!(
            "**Pressure:** {}\n",
            format_pressure(point.pressure)
        ));
    }
    out
}

/// Daily forecast, one section per point in array order.
pub fn render_daily_forecast(station_id: &str, points: &[DailyForecastPoint]) -> String {
    if points.is_empty() {
        return format!("No daily forecast available for station {station_id}.");
    }

    let mut out = format!("# Daily Forecast for Station {station_id}\n");
    for point in points {
        out.push_str(&format!("\n## {}\n", format_local_time(&point.timestamp)));
        out.push_str(&format!(
            "**Conditions:** {}\n",
            weather_icon_description(&point.icon)
        ));
        out.push_str(&format!(
            "**High:** {}\n",
            format_temperature(point.temperature_max)
        ));
        out.push_str(&format!(
            "**Low:** {}\n",
            format_temperature(point.temperature_min)
        ));
        out.push_str(&format!(
            "**Precipitation:** {} ({:.0}% chance)\n",
            format_precipitation(point.precipitation_intensity),
            point.precipitation_probability
        ));
        out.push_str(&format!("**Humidity:** {:.0}%\n", point.humidity));
        out.push_str(&format!(
            "**Wind:** {} {}\n",
            format_wind_speed(point.wind_speed),
            wind_direction(point.wind_direction)
        ));
        if point.uv_index > 0.0 {
            out.push_str(&format!("**UV Index:** {:.0}\n", point.uv_index));
        }
    }
    out
}

/// Historical observations: summary statistics plus the tail of the
/// array as "recent observations" (at most [`RECENT_OBSERVATIONS`]).
pub fn render_historical(
    station_id: &str,
    start_date: &str,
    end_date: &str,
    points: &[Observation],
) -> String {
    if points.is_empty() {
        return format!(
            "No historical data available for station {station_id} between {start_date} and {end_date}."
        );
    }

    let mut min_temp = f64::INFINITY;
    let mut max_temp = f64::NEG_INFINITY;
    let mut temp_sum = 0.0;
    let mut precipitation_total = 0.0;
    for point in points {
        min_temp = min_temp.min(point.temperature);
        max_temp = max_temp.max(point.temperature);
        temp_sum += point.temperature;
        precipitation_total += point.precipitation_accumulated;
    }
    let mean_temp = temp_sum / points.len() as f64;

    let mut out = format!(
        "# Historical Weather for Station {station_id}\n{start_date} to {end_date}\n\n"
    );
    out.push_str("## Summary\n");
    out.push_str(&format!("**Observations:** {}\n", points.len()));
    out.push_str(&format!(
        "**Temperature:** low {}, high {}, average {}\n",
        format_temperature(min_temp),
        format_temperature(max_temp),
        format_temperature(mean_temp)
    ));
    out.push_str(&format!(
        "**Total Precipitation:** {}\n",
        format_precipitation(precipitation_total)
    ));

    out.push_str("\n## Recent Observations\n");
    let tail_start = points.len().saturating_sub(RECENT_OBSERVATIONS);
    for point in &points[tail_start..] {
        out.push_str(&format!(
            "- {}: {}, wind {} {}, precipitation {}\n",
            format_local_time(&point.timestamp),
            format_temperature(point.temperature),
            format_wind_speed(point.wind_speed),
            wind_direction(point.wind_direction),
            format_precipitation(point.precipitation_accumulated)
        ));
    }
    out
}

/// Active alerts for a location, one section per alert.
pub fn render_alerts(lat: f64, lon: f64, alerts: &[WeatherAlert]) -> String {
    if alerts.is_empty() {
        return format!("No active weather alerts for ({lat:.4}, {lon:.4}).");
    }

    let mut out = format!("# Weather Alerts for ({lat:.4}, {lon:.4})\n");
    for alert in alerts {
        out.push_str(&format!("\n## {} ({})\n", alert.title, alert.severity));
        out.push_str(&format!("**Type:** {}\n", alert.alert_type));
        out.push_str(&format!(
            "**Effective:** {}\n",
            format_local_time(&alert.effective)
        ));
        out.push_str(&format!(
            "**Expires:** {}\n",
            format_local_time(&alert.expires)
        ));
        out.push_str(&format!("**Areas:** {}\n", alert.areas.join(", ")));
        if !alert.description.is_empty() {
            out.push_str(&format!("\n{}\n", alert.description));
        }
    }
    out
}

/// Stations found by geo-radius lookup.
pub fn render_stations_found(lat: f64, lon: f64, radius: f64, stations: &[Station]) -> String {
    if stations.is_empty() {
        return format!("No weather stations found within {radius} km of ({lat:.4}, {lon:.4}).");
    }

    let mut out = format!(
        "# Weather Stations near ({lat:.4}, {lon:.4})\nFound {} station(s) within {radius} km.\n",
        stations.len()
    );
    for station in stations {
        out.push_str(&station_section(station));
    }
    out
}

/// Paginated free-text station search results.
pub fn render_station_search(
    query: &str,
    page: u32,
    limit: u32,
    results: &StationSearchResults,
) -> String {
    if results.stations.is_empty() {
        return format!("No weather stations match \"{query}\".");
    }

    let pages = if limit == 0 {
        0
    } else {
        results.total.div_ceil(limit)
    };
    let mut out = format!(
        "# Station Search: \"{query}\"\n{} station(s) total, page {page} of {pages}.\n",
        results.total
    );
    for station in &results.stations {
        out.push_str(&station_section(station));
    }
    out
}

fn station_section(station: &Station) -> String {
    let mut section = format!("\n## {}\n", station.name);
    section.push_str(&format!("**ID:** {}\n", station.id));
    if !station.cell_index.is_empty() {
        section.push_str(&format!("**Cell:** {}\n", station.cell_index));
    }
    if let Some(location) = &station.location {
        section.push_str(&format!(
            "**Location:** {}\n",
            location_line(location.lat, location.lon, location.elevation)
        ));
    }
    if !station.created_at.is_empty() {
        section.push_str(&format!(
            "**Active Since:** {}\n",
            format_local_time(&station.created_at)
        ));
    }
    section
}

/// Network coverage cells around a location.
pub fn render_cells(lat: f64, lon: f64, radius: f64, cells: &[Cell]) -> String {
    if cells.is_empty() {
        return format!("No weather cells found within {radius} km of ({lat:.4}, {lon:.4}).");
    }

    let mut out = format!("# Weather Cells near ({lat:.4}, {lon:.4})\n");
    for cell in cells {
        out.push_str(&format!("\n## Cell {}\n", cell.index));
        out.push_str(&format!(
            "**Center:** {}\n",
            location_line(cell.center.lat, cell.center.lon, cell.center.elevation)
        ));
        out.push_str(&format!("**Stations:** {}\n", cell.station_count));
    }
    out
}

/// Per-station reliability report with a qualitative tier.
pub fn render_station_health(station_id: &str, latest: &StationLatest) -> String {
    let Some(health) = &latest.health else {
        return format!("No health data available for station {station_id}.");
    };

    let mut out = format!("# Station Health for {station_id}\n\n");
    out.push_str(&format!(
        "**Data Quality:** {:.0}% ({})\n",
        health.data_quality.score * 100.0,
        data_quality_label(health.data_quality.score)
    ));
    out.push_str(&format!(
        "**Location Quality:** {:.0}%",
        health.location_quality.score * 100.0
    ));
    if !health.location_quality.reason.is_empty() {
        out.push_str(&format!(" ({})", health.location_quality.reason));
    }
    out.push('\n');
    if !health.timestamp.is_empty() {
        out.push_str(&format!(
            "**Checked:** {} ({})\n",
            time_ago(&health.timestamp),
            format_local_time(&health.timestamp)
        ));
    }
    out
}

/// Approximate station local time: the current instant re-expressed in
/// the UTC offset carried by the latest observation's timestamp. Not a
/// coordinate-based timezone lookup.
pub fn render_station_local_time(station_id: &str, observation: &Observation) -> String {
    render_station_local_time_at(station_id, observation, Utc::now())
}

fn render_station_local_time_at(
    station_id: &str,
    observation: &Observation,
    now: DateTime<Utc>,
) -> String {
    let Ok(observed) = DateTime::parse_from_rfc3339(&observation.timestamp) else {
        return format!(
            "Could not determine local time for station {station_id}: the latest observation has no usable timestamp."
        );
    };

    let local = now.with_timezone(observed.offset());
    format!(
        "# Station Local Time\n\n**Station:** {station_id}\n**Local Time:** {}\n\nBased on the station's reported UTC offset.",
        local.format("%b %-d, %Y, %-I:%M %p")
    )
}

// ── Tests ───────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{DataQuality, HealthReport, Location, LocationQuality};
    use chrono::TimeZone;

    fn observation() -> Observation {
        Observation {
            timestamp: "2024-06-01T11:55:00Z".to_string(),
            temperature: 22.5,
            feels_like: 21.0,
            dew_point: 10.0,
            humidity: 45.0,
            wind_speed: 5.0,
            wind_gust: 8.0,
            wind_direction: 22.5,
            uv_index: 5.0,
            pressure: 1013.25,
            solar_irradiance: 612.0,
            precipitation_rate: 0.0,
            precipitation_accumulated: 0.0,
            icon: "partly-cloudy-day".to_string(),
        }
    }

    #[test]
    fn current_weather_includes_gusts_when_above_sustained() {
        let latest = StationLatest {
            observation: observation(),
            ..Default::default()
        };
        let text = render_current_weather("st-1", &latest);
        assert!(text.contains("Station st-1"));
        assert!(text.contains("**Temperature:** 72.5°F (22.5°C)"));
        assert!(text.contains("(gusts 17.9 mph)"));
        assert!(text.contains("**UV Index:** 5"));
        assert!(text.contains("**Solar Irradiance:** 612.0 W/m²"));
    }

    #[test]
    fn current_weather_omits_gusts_and_zero_lines() {
        let mut obs = observation();
        obs.wind_gust = 4.0;
        obs.uv_index = 0.0;
        obs.solar_irradiance = 0.0;
        obs.precipitation_rate = 0.0;
        let latest = StationLatest {
            observation: obs,
            ..Default::default()
        };
        let text = render_current_weather("st-1", &latest);
        assert!(!text.contains("gusts"));
        assert!(!text.contains("UV Index"));
        assert!(!text.contains("Solar Irradiance"));
        assert!(!text.contains("Precipitation Rate"));
    }

    #[test]
    fn empty_hourly_forecast_names_the_station() {
        let text = render_hourly_forecast("abc-123", &[]);
        assert_eq!(text, "No hourly forecast available for station abc-123.");
    }

    #[test]
    fn empty_daily_forecast_names_the_station() {
        let text = render_daily_forecast("abc-123", &[]);
        assert_eq!(text, "No daily forecast available for station abc-123.");
    }

    #[test]
    fn hourly_forecast_one_section_per_point() {
        let points = vec![
            HourlyForecastPoint {
                timestamp: "2024-06-01T13:00:00Z".to_string(),
                temperature: 20.0,
                ..Default::default()
            },
            HourlyForecastPoint {
                timestamp: "2024-06-01T14:00:00Z".to_string(),
                temperature: 21.0,
                ..Default::default()
            },
        ];
        let text = render_hourly_forecast("st-1", &points);
        assert_eq!(text.matches("\n## ").count(), 2);
    }

    #[test]
    fn historical_summary_and_tail() {
        let points: Vec<Observation> = (0..25)
            .map(|i| Observation {
                timestamp: format!("2024-06-01T{:02}:00:00Z", i % 24),
                temperature: 10.0 + i as f64,
                precipitation_accumulated: 1.0,
                ..Default::default()
            })
            .collect();
        let text = render_historical("st-1", "2024-06-01", "2024-06-02", &points);
        assert!(text.contains("**Observations:** 25"));
        // min 10, max 34, mean 22
        assert!(text.contains("low 50.0°F (10.0°C)"));
        assert!(text.contains("high 93.2°F (34.0°C)"));
        assert!(text.contains("average 71.6°F (22.0°C)"));
        // 25 mm total accumulated
        assert!(text.contains("**Total Precipitation:** 0.98 in"));
        // Exactly the last 10 entries, in original order.
        assert_eq!(text.matches("\n- ").count(), 10);
        assert!(text.contains("77.0°F (25.0°C)")); // point 15, first of the tail
        assert!(!text.contains("75.2°F (24.0°C)")); // point 14, dropped
    }

    #[test]
    fn historical_shorter_than_tail_lists_everything() {
        let points: Vec<Observation> = (0..3)
            .map(|i| Observation {
                timestamp: format!("2024-06-01T0{i}:00:00Z"),
                temperature: 15.0,
                ..Default::default()
            })
            .collect();
        let text = render_historical("st-1", "2024-06-01", "2024-06-01", &points);
        assert_eq!(text.matches("\n- ").count(), 3);
    }

    #[test]
    fn empty_historical_names_station_and_range() {
        let text = render_historical("st-9", "2024-01-01", "2024-01-02", &[]);
        assert!(text.contains("st-9"));
        assert!(text.contains("2024-01-01"));
    }

    #[test]
    fn alerts_join_areas_with_comma() {
        let alerts = vec![WeatherAlert {
            id: "a1".to_string(),
            alert_type: "wind".to_string(),
            severity: "severe".to_string(),
            title: "High Wind Warning".to_string(),
            description: "Gusts up to 60 mph.".to_string(),
            effective: "2024-06-01T00:00:00Z".to_string(),
            expires: "2024-06-02T00:00:00Z".to_string(),
            areas: vec!["Attica".to_string(), "Euboea".to_string()],
        }];
        let text = render_alerts(37.98, 23.72, &alerts);
        assert!(text.contains("High Wind Warning (severe)"));
        assert!(text.contains("**Areas:** Attica, Euboea"));
    }

    #[test]
    fn alert_with_no_areas_still_renders_the_line() {
        let alerts = vec![WeatherAlert {
            title: "Heat Advisory".to_string(),
            severity: "moderate".to_string(),
            ..Default::default()
        }];
        let text = render_alerts(37.98, 23.72, &alerts);
        assert!(text.contains("**Areas:** \n"));
    }

    #[test]
    fn no_alerts_message() {
        let text = render_alerts(37.98, 23.72, &[]);
        assert!(text.starts_with("No active weather alerts"));
    }

    #[test]
    fn search_reports_page_count() {
        let results = StationSearchResults {
            stations: vec![Station {
                id: "st-1".to_string(),
                name: "Rooftop".to_string(),
                ..Default::default()
            }],
            total: 25,
        };
        let text = render_station_search("athens", 1, 10, &results);
        assert!(text.contains("25 station(s) total, page 1 of 3."));
    }

    #[test]
    fn search_zero_total_reports_zero_pages() {
        // An inconsistent upstream payload: results listed but total 0.
        let results = StationSearchResults {
            stations: vec![Station {
                id: "st-1".to_string(),
                name: "Rooftop".to_string(),
                ..Default::default()
            }],
            total: 0,
        };
        let text = render_station_search("athens", 1, 10, &results);
        assert!(text.contains("0 station(s) total, page 1 of 0."));
    }

    #[test]
    fn search_zero_limit_does_not_divide() {
        let results = StationSearchResults {
            stations: vec![Station {
                id: "st-1".to_string(),
                name: "Rooftop".to_string(),
                ..Default::default()
            }],
            total: 25,
        };
        let text = render_station_search("athens", 1, 0, &results);
        assert!(text.contains("25 station(s) total, page 1 of 0."));
    }

    #[test]
    fn find_stations_lists_location() {
        let stations = vec![Station {
            id: "st-1".to_string(),
            name: "Rooftop".to_string(),
            cell_index: "871e82c1".to_string(),
            location: Some(Location {
                lat: 37.9838,
                lon: 23.7275,
                elevation: 120.0,
            }),
            created_at: String::new(),
        }];
        let text = render_stations_found(37.98, 23.72, 50.0, &stations);
        assert!(text.contains("Found 1 station(s) within 50 km."));
        assert!(text.contains("37.9838, 23.7275 (elevation 120 m)"));
        assert!(text.contains("**Cell:** 871e82c1"));
    }

    #[test]
    fn cells_list_center_and_count() {
        let cells = vec![Cell {
            index: "871e82c1".to_string(),
            center: Location {
                lat: 37.98,
                lon: 23.72,
                elevation: 90.0,
            },
            station_count: 4,
        }];
        let text = render_cells(37.98, 23.72, 50.0, &cells);
        assert!(text.contains("## Cell 871e82c1"));
        assert!(text.contains("**Stations:** 4"));
    }

    #[test]
    fn health_tiers_at_boundaries() {
        let mut latest = StationLatest {
            health: Some(HealthReport {
                timestamp: String::new(),
                data_quality: DataQuality { score: 0.8 },
                location_quality: LocationQuality {
                    score: 0.9,
                    reason: "verified".to_string(),
                },
            }),
            ..Default::default()
        };
        let text = render_station_health("st-1", &latest);
        assert!(text.contains("**Data Quality:** 80% (Excellent)"));
        assert!(text.contains("**Location Quality:** 90% (verified)"));

        if let Some(health) = latest.health.as_mut() {
            health.data_quality.score = 0.39;
        }
        let text = render_station_health("st-1", &latest);
        assert!(text.contains("(Poor — use with caution)"));
    }

    #[test]
    fn health_missing_yields_message() {
        let latest = StationLatest::default();
        let text = render_station_health("st-1", &latest);
        assert_eq!(text, "No health data available for station st-1.");
    }

    #[test]
    fn station_local_time_applies_observation_offset() {
        let obs = Observation {
            timestamp: "2024-06-01T14:55:00+03:00".to_string(),
            ..Default::default()
        };
        let now = Utc.with_ymd_and_hms(2024, 6, 1, 12, 0, 0).unwrap();
        let text = render_station_local_time_at("st-1", &obs, now);
        // 12:00 UTC shifted by +03:00.
        assert!(text.contains("3:00 PM"));
        assert!(text.contains("Jun 1, 2024"));
    }

    #[test]
    fn station_local_time_bad_timestamp() {
        let obs = Observation::default();
        let text = render_station_local_time_at(
            "st-1",
            &obs,
            Utc.with_ymd_and_hms(2024, 6, 1, 12, 0, 0).unwrap(),
        );
        assert!(text.contains("no usable timestamp"));
    }
}
