//! WeatherXM MCP Server - Entry Point
//!
//! Runs the MCP server over stdio (default) or streamable HTTP.

use anyhow::Result;
use argh::FromArgs;
use weatherxm_mcp::config::Config;
use weatherxm_mcp::mcp;

/// WeatherXM MCP Server - Expose WeatherXM weather data to AI assistants
#[derive(FromArgs)]
struct Args {
    /// transport to use: "stdio" (default) or "http"
    #[argh(option, default = "String::from(\"stdio\")")]
    transport: String,

    /// port for the http transport (default: 8088)
    #[argh(option, default = "mcp::MCP_PORT")]
    port: u16,

    /// override the WeatherXM Pro API base URL
    #[argh(option)]
    base_url: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args: Args = argh::from_env();

    // Initialize logging to stderr (stdout is used for MCP protocol)
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .target(env_logger::Target::Stderr)
        .init();

    log::info!("Starting WeatherXM MCP server");

    let config = Config::from_env(args.base_url.as_deref())?;

    match args.transport.as_str() {
        "stdio" => mcp::run_stdio_server(&config).await?,
        "http" => mcp::run_http_server(&config, args.port).await?,
        other => anyhow::bail!("unknown transport '{other}', expected 'stdio' or 'http'"),
    }

    Ok(())
}
