//! Forecast resource handlers.
//!
//! Each handler is a single synchronous computation; [`registry`] wraps
//! them into the server's async handler shape.

use std::future::ready;
use std::sync::Arc;

use forecast_core::{ApiError, ApiResult, RequestContext};
use forecast_server::{HandlerRegistry, HandlerResponse};

use crate::model::{self, ForecastInput, SUMMARIES};
use crate::routes::ops;

/// `GET /weatherforecast`: five random forecasts starting tomorrow.
pub fn list(ctx: &RequestContext) -> ApiResult<HandlerResponse> {
    let forecasts = model::upcoming(model::now());
    tracing::debug!(
        request_id = %ctx.request_id(),
        revision = %ctx.revision(),
        count = forecasts.len(),
        "Generated forecasts"
    );
    HandlerResponse::ok(&forecasts)
}

/// `GET /weatherforecast/summaries`: the summary vocabulary.
pub fn summaries(_ctx: &RequestContext) -> ApiResult<HandlerResponse> {
    HandlerResponse::ok(&SUMMARIES)
}

/// `POST /weatherforecast`: validates and echoes the forecast with
/// `201 Created` and a `Location` pointing at the list operation.
pub fn create(prefix: &str, ctx: &RequestContext, input: ForecastInput) -> ApiResult<HandlerResponse> {
    let forecast = input.into_forecast()?;
    let location = format!(
        "{}/v{}/weatherforecast?id={}",
        prefix.trim_end_matches('/'),
        ctx.revision(),
        forecast.date.format("%Y-%m-%dT%H:%M:%S")
    );
    tracing::info!(request_id = %ctx.request_id(), location = %location, "Forecast created");
    HandlerResponse::created(&location, &forecast)
}

/// `PUT /weatherforecast/{date}`: updates the forecast for a date inside
/// the forecast window, else `404`.
pub fn update(ctx: &RequestContext, input: ForecastInput) -> ApiResult<HandlerResponse> {
    let raw = ctx.path_param("date").unwrap_or_default();
    let date = model::parse_date(raw)
        .ok_or_else(|| ApiError::validation(format!("The value '{raw}' is not valid for date.")))?;
    let (temperature_c, summary) = input.into_update()?;

    let mut existing = model::find_by_date(date, model::now().date())
        .ok_or_else(|| ApiError::not_found_resource("WeatherForecast", raw))?;
    existing.temperature_c = temperature_c;
    existing.summary = summary;

    HandlerResponse::ok(&existing)
}

/// `DELETE /weatherforecast/{date}`: always `204`, whether or not a
/// forecast existed.
pub fn delete(ctx: &RequestContext) -> ApiResult<HandlerResponse> {
    tracing::debug!(
        request_id = %ctx.request_id(),
        date = ctx.path_param("date").unwrap_or_default(),
        "Forecast delete acknowledged"
    );
    Ok(HandlerResponse::no_content())
}

/// Registers every forecast handler. `prefix` is the API path prefix used
/// when building `Location` headers.
#[must_use]
pub fn registry(prefix: &str) -> HandlerRegistry {
    let prefix: Arc<str> = Arc::from(prefix);
    let mut registry = HandlerRegistry::new();

    registry.register_no_body(ops::LIST, |ctx: RequestContext| ready(list(&ctx)));
    registry.register_no_body(ops::SUMMARIES, |ctx: RequestContext| ready(summaries(&ctx)));
    registry.register_json(ops::CREATE, move |ctx: RequestContext, input: ForecastInput| {
        ready(create(&prefix, &ctx, input))
    });
    registry.register_json(ops::UPDATE, |ctx: RequestContext, input: ForecastInput| {
        ready(update(&ctx, input))
    });
    registry.register_no_body(ops::DELETE, |ctx: RequestContext| ready(delete(&ctx)));

    registry
}
