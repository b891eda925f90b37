//! Assembling the server from configuration.

use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use forecast_config::{ForecastConfig, LogFormat};
use forecast_server::{CorsPolicy, DocsSettings, DocumentServer, Server, ServerConfig};
use forecast_telemetry::{LogConfig, MetricsConfig, MetricsRegistry, TelemetryConfig};

use crate::{handlers, routes};

/// Maps the `[telemetry]` section onto the telemetry crate's settings.
#[must_use]
pub fn telemetry_config(config: &ForecastConfig) -> TelemetryConfig {
    let section = &config.telemetry;
    let logging = LogConfig {
        enabled: section.logging.enabled,
        level: section.logging.level.clone(),
        json_format: section.logging.format == LogFormat::Json,
        ansi: section.logging.ansi_enabled,
        file_line_info: section.logging.include_location,
        ..LogConfig::default()
    };
    let metrics = MetricsConfig {
        enabled: section.metrics.enabled,
        ..MetricsConfig::default()
    };
    TelemetryConfig::builder()
        .service_name(&section.service_name)
        .environment(&section.environment)
        .logging(logging)
        .metrics(metrics)
        .build()
}

/// Builds the server: routes, handlers, documentation and CORS.
///
/// # Errors
///
/// Fails when the revision list is invalid, a route cannot be registered,
/// or the server cannot be assembled.
pub fn build_server(config: &ForecastConfig, metrics: Option<MetricsRegistry>) -> anyhow::Result<Server> {
    let revisions = config.revision_set().context("invalid [api] revisions")?;
    let default_revision = config
        .default_revision()
        .context("invalid [api] default_revision")?;
    let prefix = config.api.path_prefix.as_str();

    let table = Arc::new(
        routes::route_table(prefix, &revisions).context("failed to declare forecast routes")?,
    );

    let settings = DocsSettings {
        enabled: config.docs.enabled,
        production: config.is_production(),
        base_path: config.docs.base_path.clone(),
        trust_forwarded_headers: config.docs.trust_forwarded_headers,
    };
    let docs = DocumentServer::mount(&settings, routes::synthesizer(config, Arc::clone(&table)));

    let server_config = ServerConfig::builder()
        .http_addr(config.server.http_addr.clone())
        .shutdown_timeout(Duration::from_secs(config.server.shutdown_timeout_secs))
        .request_timeout(Duration::from_millis(config.server.request_timeout_ms))
        .path_prefix(prefix)
        .build();

    let mut builder = Server::builder()
        .config(server_config)
        .routes(table)
        .handlers(handlers::registry(prefix))
        .default_revision(default_revision)
        .docs(docs);
    if config.cors.allow_any_origin {
        builder = builder.cors(CorsPolicy::allow_any());
    }
    if let Some(metrics) = metrics {
        builder = builder.metrics(metrics);
    }

    let server = builder.build().context("failed to assemble server")?;
    tracing::info!(
        revisions = %revisions.to_header_value(),
        default_revision = %default_revision,
        docs = server.docs_mounted(),
        "Forecast API assembled"
    );
    Ok(server)
}

#[cfg(test)]
mod tests {
    use super::*;
    use forecast_config::PRODUCTION_ENVIRONMENT;

    #[test]
    fn test_build_default_server() {
        let server = build_server(&ForecastConfig::default(), None).unwrap();
        assert!(server.docs_mounted());
        assert_eq!(server.routes().len(), 5);
    }

    #[test]
    fn test_production_has_no_docs() {
        let mut config = ForecastConfig::default();
        config.telemetry.environment = PRODUCTION_ENVIRONMENT.to_string();
        let server = build_server(&config, None).unwrap();
        assert!(!server.docs_mounted());
    }

    #[test]
    fn test_invalid_revisions_fail() {
        let mut config = ForecastConfig::default();
        config.api.revisions = vec!["one".to_string()];
        assert!(build_server(&config, None).is_err());
    }

    #[test]
    fn test_telemetry_mapping() {
        let telemetry = telemetry_config(&ForecastConfig::development());
        assert_eq!(telemetry.logging.level, "debug");
        assert!(!telemetry.logging.json_format);
        assert_eq!(telemetry.service_name, "forecast-api");
    }
}
