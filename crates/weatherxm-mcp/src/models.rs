//! Typed shapes for WeatherXM Pro API responses.
//!
//! All shapes are request-scoped values deserialized from a single
//! response body; nothing here is cached or shared between tool calls.
//! Numeric fields default to 0 and strings to empty when the upstream
//! payload omits them, so sparse responses render instead of erroring.

use serde::Deserialize;

/// Geographic position of a station or cell center.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Location {
    pub lat: f64,
    pub lon: f64,
    /// Elevation in meters.
    pub elevation: f64,
}

/// One timestamped weather reading. Metric units throughout: °C, m/s,
/// hPa, mm, W/m².
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Observation {
    pub timestamp: String,
    pub temperature: f64,
    pub feels_like: f64,
    pub dew_point: f64,
    pub precipitation_rate: f64,
    pub precipitation_accumulated: f64,
    pub humidity: f64,
    pub wind_speed: f64,
    pub wind_gust: f64,
    pub wind_direction: f64,
    pub uv_index: f64,
    pub pressure: f64,
    pub solar_irradiance: f64,
    pub icon: String,
}

/// Provider-computed reliability score in [0, 1].
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct DataQuality {
    pub score: f64,
}

/// Location-quality score plus the provider's reason code.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct LocationQuality {
    pub score: f64,
    pub reason: String,
}

/// Per-station data/location quality metadata.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct HealthReport {
    pub timestamp: String,
    pub data_quality: DataQuality,
    pub location_quality: LocationQuality,
}

/// Response of `/stations/{id}/latest`: current observation plus health
/// and location metadata.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct StationLatest {
    pub observation: Observation,
    pub health: Option<HealthReport>,
    pub location: Option<Location>,
}

/// A single physical weather-sensing device.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Station {
    pub id: String,
    pub name: String,
    #[serde(rename = "cellIndex")]
    pub cell_index: String,
    pub location: Option<Location>,
    #[serde(rename = "createdAt")]
    pub created_at: String,
}

/// Paginated result of `/stations/search`.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct StationSearchResults {
    pub stations: Vec<Station>,
    pub total: u32,
}

/// A geographic aggregation unit covering one or more stations.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Cell {
    pub index: String,
    pub center: Location,
    #[serde(rename = "stationCount")]
    pub station_count: u32,
}

/// One hourly forecast entry.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct HourlyForecastPoint {
    pub timestamp: String,
    pub temperature: f64,
    pub feels_like: f64,
    pub precipitation: f64,
    pub precipitation_probability: f64,
    pub humidity: f64,
    pub wind_speed: f64,
    pub wind_direction: f64,
    pub uv_index: f64,
    pub pressure: f64,
    pub icon: String,
}

/// One daily forecast entry with min/max variants.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct DailyForecastPoint {
    pub timestamp: String,
    pub temperature_min: f64,
    pub temperature_max: f64,
    pub precipitation_intensity: f64,
    pub precipitation_probability: f64,
    pub humidity: f64,
    pub wind_speed: f64,
    pub wind_direction: f64,
    pub uv_index: f64,
    pub pressure: f64,
    pub icon: String,
}

/// An active weather alert, keyed by location rather than station.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct WeatherAlert {
    pub id: String,
    #[serde(rename = "type")]
    pub alert_type: String,
    pub severity: String,
    pub title: String,
    pub description: String,
    pub effective: String,
    pub expires: String,
    pub areas: Vec<String>,
}
