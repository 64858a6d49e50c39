//! WeatherXM MCP server.
//!
//! Exposes the WeatherXM Pro REST API as tools for AI assistants via the
//! Model Context Protocol. Each tool issues one outbound HTTPS GET, maps
//! the JSON response onto typed shapes, and renders a markdown text block.
//! Stateless — no caching, retries, or background tasks.

pub mod api;
pub mod config;
pub mod format;
pub mod mcp;
pub mod models;
pub mod render;
pub mod validation;
