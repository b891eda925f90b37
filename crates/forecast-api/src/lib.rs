//! # Forecast API
//!
//! A versioned weather forecast resource served by `forecast-server`.
//!
//! | Method | Path | Revisions |
//! |---|---|---|
//! | `GET` | `/api/v{revision}/weatherforecast` | all |
//! | `GET` | `/api/v{revision}/weatherforecast/summaries` | 2.0 and later |
//! | `POST` | `/api/v{revision}/weatherforecast` | all |
//! | `PUT` | `/api/v{revision}/weatherforecast/{date}` | all |
//! | `DELETE` | `/api/v{revision}/weatherforecast/{date}` | all |
//!
//! Outside production the interface documents are published at
//! `/swagger/{group}/swagger.json` with a viewer at `/swagger`.
//!
//! ## Example
//!
//! ```rust
//! use forecast_config::ForecastConfig;
//!
//! let server = forecast_api::build_server(&ForecastConfig::default(), None).unwrap();
//! assert!(server.docs_mounted());
//! ```

#![doc(html_root_url = "https://docs.rs/forecast-api/0.1.0")]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod app;
pub mod handlers;
pub mod model;
pub mod routes;

pub use app::{build_server, telemetry_config};
pub use model::{ForecastInput, WeatherForecast};

/// Crate version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
