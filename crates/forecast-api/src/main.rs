//! Forecast API - Entry point

use std::path::PathBuf;

use anyhow::Context;
use forecast_config::{ConfigLoader, DEFAULT_ENV_PREFIX};

/// Command-line arguments.
struct Args {
    /// Path to configuration file.
    config: Option<PathBuf>,
}

impl Args {
    fn parse() -> Self {
        let mut args = std::env::args().skip(1);
        let mut config = None;

        while let Some(arg) = args.next() {
            match arg.as_str() {
                "--config" | "-c" => {
                    config = args.next().map(PathBuf::from);
                }
                "--help" | "-h" => {
                    print_help();
                    std::process::exit(0);
                }
                "--version" | "-v" => {
                    println!("forecast-api {}", forecast_api::VERSION);
                    std::process::exit(0);
                }
                other => {
                    eprintln!("Unknown argument: {other}");
                    eprintln!("Use --help for usage information");
                    std::process::exit(1);
                }
            }
        }

        Self { config }
    }
}

fn print_help() {
    println!(
        r"Forecast API - Versioned weather forecast service

USAGE:
    forecast-api [OPTIONS]

OPTIONS:
    -c, --config <PATH>    Path to configuration file (TOML or JSON)
    -h, --help             Print help information
    -v, --version          Print version information

ENVIRONMENT VARIABLES:
    FORECAST_ENVIRONMENT              Deployment environment (production disables docs)
    FORECAST__SERVER__HTTP_ADDR       Bind address (default: 0.0.0.0:8080)
    FORECAST__API__REVISIONS          Declared revisions, comma separated (default: 1.0,2.0)
    FORECAST__API__DEFAULT_REVISION   Revision for paths without one (default: 1.0)
    FORECAST__DOCS__BASE_PATH         Documentation base path (default: /swagger)
    FORECAST__TELEMETRY__LOGGING__LEVEL  Log level or filter directive (default: info)

EXAMPLES:
    # Run with configuration file
    forecast-api --config /etc/forecast/forecast.toml

    # Run in production mode
    FORECAST_ENVIRONMENT=production forecast-api
"
    );
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let mut loader = ConfigLoader::new().with_defaults();
    if let Some(path) = &args.config {
        loader = loader
            .with_file(path)
            .with_context(|| format!("failed to load configuration from {}", path.display()))?;
    }
    let config = loader
        .with_dotenv()
        .with_env_prefix(DEFAULT_ENV_PREFIX)
        .load()
        .context("invalid configuration")?;

    let metrics = forecast_telemetry::init_telemetry(&forecast_api::telemetry_config(&config))
        .context("failed to initialize telemetry")?;

    tracing::info!(
        version = forecast_api::VERSION,
        environment = %config.telemetry.environment,
        addr = %config.server.http_addr,
        "Starting forecast API"
    );

    let server = forecast_api::build_server(&config, metrics)?;
    server.run().await.context("server error")?;

    tracing::info!("Forecast API stopped");
    Ok(())
}
