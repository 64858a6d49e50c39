//! MCP (Model Context Protocol) server for AI assistant integration.
//!
//! Exposes the WeatherXM Pro API as ten MCP tools. Every tool performs
//! exactly one upstream request and returns a markdown text block; any
//! failure is flattened to a single `"Error: <message>"` line returned
//! as a successful tool result, so the protocol layer never sees a hard
//! failure.

use rmcp::handler::server::tool::ToolRouter;
use rmcp::handler::server::wrapper::Parameters;
use rmcp::model::*;
use rmcp::{tool, tool_handler, tool_router, ServerHandler};
use schemars::JsonSchema;
use serde::Deserialize;

use crate::api::{self, WxmClient};
use crate::config::Config;
use crate::models::{
    Cell, DailyForecastPoint, HourlyForecastPoint, Observation, Station, StationLatest,
    StationSearchResults, WeatherAlert,
};
use crate::{render, validation};

/// Default port for the MCP HTTP transport.
pub const MCP_PORT: u16 = 8088;

const DEFAULT_HOURS: u32 = 48;
const DEFAULT_DAYS: u32 = 7;
const DEFAULT_RADIUS_KM: f64 = 50.0;
const DEFAULT_PAGE: u32 = 1;
const DEFAULT_LIMIT: u32 = 10;

// ── Tool parameter types ──────────────────────────────────────────

#[derive(Deserialize, JsonSchema)]
struct StationRequest {
    /// WeatherXM station ID (e.g., "e63f7e10-2ab9-11ee")
    station_id: String,
}

#[derive(Deserialize, JsonSchema)]
struct HourlyForecastRequest {
    /// WeatherXM station ID
    station_id: String,
    /// Number of forecast hours (1-48, default 48)
    hours: Option<u32>,
}

#[derive(Deserialize, JsonSchema)]
struct DailyForecastRequest {
    /// WeatherXM station ID
    station_id: String,
    /// Number of forecast days (1-7, default 7)
    days: Option<u32>,
}

#[derive(Deserialize, JsonSchema)]
struct HistoricalRequest {
    /// WeatherXM station ID
    station_id: String,
    /// Start date in YYYY-MM-DD format
    start_date: String,
    /// End date in YYYY-MM-DD format
    end_date: String,
}

#[derive(Deserialize, JsonSchema)]
struct CoordinatesRequest {
    /// Latitude coordinate (-90 to 90)
    lat: f64,
    /// Longitude coordinate (-180 to 180)
    lon: f64,
}

#[derive(Deserialize, JsonSchema)]
struct RadiusRequest {
    /// Latitude coordinate (-90 to 90)
    lat: f64,
    /// Longitude coordinate (-180 to 180)
    lon: f64,
    /// Search radius in kilometers (1-100, default 50)
    radius: Option<f64>,
}

#[derive(Deserialize, JsonSchema)]
struct SearchRequest {
    /// Free-text search query (station name, city, region)
    query: String,
    /// Result page, 1-based (default 1)
    page: Option<u32>,
    /// Results per page (1-100, default 10)
    limit: Option<u32>,
}

// ── Server ────────────────────────────────────────────────────────

/// WeatherXM MCP server — wraps the Pro API as MCP tools.
#[derive(Clone)]
pub struct WeatherXmMcpServer {
    client: WxmClient,
    tool_router: ToolRouter<Self>,
}

/// Flatten a failure into the single-line text every tool returns.
fn error_text(e: api::ApiError) -> String {
    format!("Error: {e}")
}

fn text_result(text: String) -> CallToolResult {
    CallToolResult::success(vec![Content::text(text)])
}

#[tool_router]
impl WeatherXmMcpServer {
    pub fn new(client: WxmClient) -> Self {
        Self {
            client,
            tool_router: Self::tool_router(),
        }
    }

    #[tool(description = "Get the current weather observation from a WeatherXM station: temperature, wind, pressure, humidity, UV, solar irradiance, and precipitation, in imperial and metric units.")]
    async fn get_current_weather(
        &self,
        Parameters(req): Parameters<StationRequest>,
    ) -> Result<CallToolResult, rmcp::ErrorData> {
        if let Err(e) = validation::validate_station_id(&req.station_id) {
            return Ok(text_result(format!("Error: {e}")));
        }
        let text = self
            .current_weather(&req.station_id)
            .await
            .unwrap_or_else(error_text);
        Ok(text_result(text))
    }

    #[tool(description = "Get the hourly weather forecast for a WeatherXM station. Returns one section per forecast hour in chronological order.")]
    async fn get_hourly_forecast(
        &self,
        Parameters(req): Parameters<HourlyForecastRequest>,
    ) -> Result<CallToolResult, rmcp::ErrorData> {
        if let Err(e) = validation::validate_station_id(&req.station_id) {
            return Ok(text_result(format!("Error: {e}")));
        }
        let hours = req.hours.unwrap_or(DEFAULT_HOURS);
        let text = self
            .hourly_forecast(&req.station_id, hours)
            .await
            .unwrap_or_else(error_text);
        Ok(text_result(text))
    }

    #[tool(description = "Get the daily weather forecast for a WeatherXM station with high/low temperatures and precipitation probability.")]
    async fn get_daily_forecast(
        &self,
        Parameters(req): Parameters<DailyForecastRequest>,
    ) -> Result<CallToolResult, rmcp::ErrorData> {
        if let Err(e) = validation::validate_station_id(&req.station_id) {
            return Ok(text_result(format!("Error: {e}")));
        }
        let days = req.days.unwrap_or(DEFAULT_DAYS);
        let text = self
            .daily_forecast(&req.station_id, days)
            .await
            .unwrap_or_else(error_text);
        Ok(text_result(text))
    }

    #[tool(description = "Get historical weather observations for a WeatherXM station between two dates (YYYY-MM-DD). Returns summary statistics plus the most recent observations.")]
    async fn get_historical_weather(
        &self,
        Parameters(req): Parameters<HistoricalRequest>,
    ) -> Result<CallToolResult, rmcp::ErrorData> {
        if let Err(e) = validation::validate_station_id(&req.station_id) {
            return Ok(text_result(format!("Error: {e}")));
        }
        for date in [&req.start_date, &req.end_date] {
            if let Err(e) = validation::validate_date(date) {
                return Ok(text_result(format!("Error: {e}")));
            }
        }
        let text = self
            .historical_weather(&req.station_id, &req.start_date, &req.end_date)
            .await
            .unwrap_or_else(error_text);
        Ok(text_result(text))
    }

    #[tool(description = "Get active weather alerts for a location. Returns one section per alert with severity, validity window, and affected areas.")]
    async fn get_weather_alerts(
        &self,
        Parameters(req): Parameters<CoordinatesRequest>,
    ) -> Result<CallToolResult, rmcp::ErrorData> {
        let text = self
            .weather_alerts(req.lat, req.lon)
            .await
            .unwrap_or_else(error_text);
        Ok(text_result(text))
    }

    #[tool(description = "Find WeatherXM stations within a radius of a coordinate. Returns station IDs, names, cells, and locations.")]
    async fn find_weather_stations(
        &self,
        Parameters(req): Parameters<RadiusRequest>,
    ) -> Result<CallToolResult, rmcp::ErrorData> {
        let radius = req.radius.unwrap_or(DEFAULT_RADIUS_KM);
        let text = self
            .find_stations(req.lat, req.lon, radius)
            .await
            .unwrap_or_else(error_text);
        Ok(text_result(text))
    }

    #[tool(description = "Search WeatherXM stations by free text with pagination. Reports the total match count and page count.")]
    async fn search_weather_stations(
        &self,
        Parameters(req): Parameters<SearchRequest>,
    ) -> Result<CallToolResult, rmcp::ErrorData> {
        let page = req.page.unwrap_or(DEFAULT_PAGE);
        let limit = req.limit.unwrap_or(DEFAULT_LIMIT);
        let text = self
            .search_stations(&req.query, page, limit)
            .await
            .unwrap_or_else(error_text);
        Ok(text_result(text))
    }

    #[tool(description = "Get WeatherXM network coverage cells around a coordinate, with cell centers and station counts.")]
    async fn get_weather_cells(
        &self,
        Parameters(req): Parameters<RadiusRequest>,
    ) -> Result<CallToolResult, rmcp::ErrorData> {
        let radius = req.radius.unwrap_or(DEFAULT_RADIUS_KM);
        let text = self
            .weather_cells(req.lat, req.lon, radius)
            .await
            .unwrap_or_else(error_text);
        Ok(text_result(text))
    }

    #[tool(description = "Get the data-quality and location-quality health report for a WeatherXM station, with a qualitative reliability tier.")]
    async fn get_station_health(
        &self,
        Parameters(req): Parameters<StationRequest>,
    ) -> Result<CallToolResult, rmcp::ErrorData> {
        if let Err(e) = validation::validate_station_id(&req.station_id) {
            return Ok(text_result(format!("Error: {e}")));
        }
        let text = self
            .station_health(&req.station_id)
            .await
            .unwrap_or_else(error_text);
        Ok(text_result(text))
    }

    #[tool(description = "Get the approximate local time at a WeatherXM station, derived from the UTC offset of its latest observation.")]
    async fn get_station_local_time(
        &self,
        Parameters(req): Parameters<StationRequest>,
    ) -> Result<CallToolResult, rmcp::ErrorData> {
        if let Err(e) = validation::validate_station_id(&req.station_id) {
            return Ok(text_result(format!("Error: {e}")));
        }
        let text = self
            .station_local_time(&req.station_id)
            .await
            .unwrap_or_else(error_text);
        Ok(text_result(text))
    }
}

// ── ServerHandler implementation ──────────────────────────────────

#[tool_handler]
impl ServerHandler for WeatherXmMcpServer {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            protocol_version: ProtocolVersion::V_2024_11_05,
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            server_info: Implementation::from_build_env(),
            instructions: Some(
                "WeatherXM weather data via station-owned sensors. Recommended workflow:\n\
                 1) find_weather_stations or search_weather_stations — locate a station ID\n\
                 2) get_current_weather — latest observation for that station\n\
                 3) get_hourly_forecast / get_daily_forecast — upcoming conditions\n\
                 4) get_historical_weather — past observations between two dates\n\
                 Location-based: get_weather_alerts, get_weather_cells\n\
                 Station metadata: get_station_health, get_station_local_time"
                    .into(),
            ),
        }
    }
}

// ── Tool handlers (typed, flattened to text at the tool boundary) ──

impl WeatherXmMcpServer {
    async fn current_weather(&self, station_id: &str) -> api::Result<String> {
        let value = self
            .client
            .get(&format!("/stations/{station_id}/latest"), &[])
            .await?;
        let latest: StationLatest = serde_json::from_value(value)?;
        Ok(render::render_current_weather(station_id, &latest))
    }

    async fn hourly_forecast(&self, station_id: &str, hours: u32) -> api::Result<String> {
        let value = self
            .client
            .get(
                &format!("/stations/{station_id}/forecast/hourly"),
                &[("hours", hours.to_string())],
            )
            .await?;
        let points: Vec<HourlyForecastPoint> = serde_json::from_value(value)?;
        Ok(render::render_hourly_forecast(station_id, &points))
    }

    async fn daily_forecast(&self, station_id: &str, days: u32) -> api::Result<String> {
        let value = self
            .client
            .get(
                &format!("/stations/{station_id}/forecast/daily"),
                &[("days", days.to_string())],
            )
            .await?;
        let points: Vec<DailyForecastPoint> = serde_json::from_value(value)?;
        Ok(render::render_daily_forecast(station_id, &points))
    }

    async fn historical_weather(
        &self,
        station_id: &str,
        start_date: &str,
        end_date: &str,
    ) -> api::Result<String> {
        let value = self
            .client
            .get(
                &format!("/stations/{station_id}/historical"),
                &[
                    ("start", start_date.to_string()),
                    ("end", end_date.to_string()),
                ],
            )
            .await?;
        let points: Vec<Observation> = serde_json::from_value(value)?;
        Ok(render::render_historical(
            station_id, start_date, end_date, &points,
        ))
    }

    async fn weather_alerts(&self, lat: f64, lon: f64) -> api::Result<String> {
        let value = self
            .client
            .get(
                "/alerts",
                &[("lat", lat.to_string()), ("lon", lon.to_string())],
            )
            .await?;
        let alerts: Vec<WeatherAlert> = serde_json::from_value(value)?;
        Ok(render::render_alerts(lat, lon, &alerts))
    }

    async fn find_stations(&self, lat: f64, lon: f64, radius: f64) -> api::Result<String> {
        let value = self
            .client
            .get(
                "/stations",
                &[
                    ("lat", lat.to_string()),
                    ("lon", lon.to_string()),
                    ("radius", radius.to_string()),
                ],
            )
            .await?;
        let stations: Vec<Station> = serde_json::from_value(value)?;
        Ok(render::render_stations_found(lat, lon, radius, &stations))
    }

    async fn search_stations(&self, query: &str, page: u32, limit: u32) -> api::Result<String> {
        let value = self
            .client
            .get(
                "/stations/search",
                &[
                    ("q", query.to_string()),
                    ("page", page.to_string()),
                    ("limit", limit.to_string()),
                ],
            )
            .await?;
        let results: StationSearchResults = serde_json::from_value(value)?;
        Ok(render::render_station_search(query, page, limit, &results))
    }

    async fn weather_cells(&self, lat: f64, lon: f64, radius: f64) -> api::Result<String> {
        let value = self
            .client
            .get(
                "/cells",
                &[
                    ("lat", lat.to_string()),
                    ("lon", lon.to_string()),
                    ("radius", radius.to_string()),
                ],
            )
            .await?;
        let cells: Vec<Cell> = serde_json::from_value(value)?;
        Ok(render::render_cells(lat, lon, radius, &cells))
    }

    async fn station_health(&self, station_id: &str) -> api::Result<String> {
        let value = self
            .client
            .get(&format!("/stations/{station_id}/latest"), &[])
            .await?;
        let latest: StationLatest = serde_json::from_value(value)?;
        Ok(render::render_station_health(station_id, &latest))
    }

    async fn station_local_time(&self, station_id: &str) -> api::Result<String> {
        let value = self
            .client
            .get(&format!("/stations/{station_id}/latest"), &[])
            .await?;
        let latest: StationLatest = serde_json::from_value(value)?;
        Ok(render::render_station_local_time(
            station_id,
            &latest.observation,
        ))
    }
}

// ── Tests ──────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_flattening_prefixes_error() {
        assert_eq!(
            error_text(api::ApiError::InvalidApiKey),
            "Error: Invalid API key. Please check your WeatherXM API key."
        );
        assert_eq!(
            error_text(api::ApiError::Upstream {
                status: 503,
                message: "Service Unavailable".to_string(),
            }),
            "Error: WeatherXM API error 503: Service Unavailable"
        );
    }

    #[test]
    fn tool_router_registers_all_ten_tools() {
        let router = WeatherXmMcpServer::tool_router();
        let mut names: Vec<String> = router
            .list_all()
            .into_iter()
            .map(|t| t.name.to_string())
            .collect();
        names.sort();
        assert_eq!(
            names,
            vec![
                "find_weather_stations",
                "get_current_weather",
                "get_daily_forecast",
                "get_historical_weather",
                "get_hourly_forecast",
                "get_station_health",
                "get_station_local_time",
                "get_weather_alerts",
                "get_weather_cells",
                "search_weather_stations",
            ]
        );
    }
}

// ── Transports ─────────────────────────────────────────────────────

/// Run the MCP server over stdio. Blocks until the client disconnects.
pub async fn run_stdio_server(config: &Config) -> anyhow::Result<()> {
    use rmcp::{transport::stdio, ServiceExt};

    let server = WeatherXmMcpServer::new(WxmClient::new(config));
    log::info!("MCP server ready, listening on stdio...");

    let service = server.serve(stdio()).await?;
    service.waiting().await?;
    Ok(())
}

/// Start the MCP HTTP server on the given port.
///
/// Mounts the StreamableHttpService at `/mcp` and blocks until Ctrl-C.
pub async fn run_http_server(config: &Config, port: u16) -> anyhow::Result<()> {
    use rmcp::transport::streamable_http_server::{
        session::local::LocalSessionManager, StreamableHttpService,
    };

    let client = WxmClient::new(config);
    let mcp_service = StreamableHttpService::new(
        move || Ok(WeatherXmMcpServer::new(client.clone())),
        LocalSessionManager::default().into(),
        Default::default(),
    );

    let router = axum::Router::new().nest_service("/mcp", mcp_service);

    let bind_addr = format!("127.0.0.1:{port}");
    let listener = tokio::net::TcpListener::bind(&bind_addr).await?;
    log::info!("MCP server listening on http://{}/mcp", bind_addr);

    axum::serve(listener, router)
        .with_graceful_shutdown(async {
            tokio::signal::ctrl_c().await.ok();
        })
        .await?;

    log::info!("MCP server stopped.");
    Ok(())
}
