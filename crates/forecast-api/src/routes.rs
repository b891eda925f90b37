//! Route declarations and the documentation synthesizer for the forecast
//! resource.

use std::sync::Arc;

use forecast_config::ForecastConfig;
use forecast_core::{ApiResult, Revision, RevisionSet, REVISION_PLACEHOLDER};
use forecast_docs::{Contact, DocumentSynthesizer, Schema};
use forecast_router::{ParameterSpec, PayloadSpec, ResponseSpec, RouteDescriptor, RouteTable};
use http::Method;
use serde_json::json;

/// Operation ids, shared by route declarations and handler registration.
pub mod ops {
    /// `GET /weatherforecast`
    pub const LIST: &str = "getWeatherForecast";
    /// `GET /weatherforecast/summaries`
    pub const SUMMARIES: &str = "getSummaryList";
    /// `POST /weatherforecast`
    pub const CREATE: &str = "createWeatherForecast";
    /// `PUT /weatherforecast/{date}`
    pub const UPDATE: &str = "updateWeatherForecast";
    /// `DELETE /weatherforecast/{date}`
    pub const DELETE: &str = "deleteWeatherForecast";
}

/// First revision serving the summaries list.
pub const SUMMARIES_SINCE: Revision = Revision::new(2, 0);

const TAG: &str = "WeatherForecast";
const FORECAST_REF: &str = "#/components/schemas/WeatherForecast";
const ERROR_REF: &str = "#/components/schemas/ErrorResponse";

/// Builds the template for `resource` under `prefix`, e.g.
/// `/api/v{revision}/weatherforecast`.
#[must_use]
pub fn template(prefix: &str, resource: &str) -> String {
    format!("{}/v{REVISION_PLACEHOLDER}/{resource}", prefix.trim_end_matches('/'))
}

/// Declares every forecast route.
///
/// The summaries list is bound to the declared revisions from
/// [`SUMMARIES_SINCE`] on and left out entirely when there are none.
///
/// # Errors
///
/// Propagates registration failures from the route table.
pub fn route_table(prefix: &str, revisions: &RevisionSet) -> ApiResult<RouteTable> {
    let collection = template(prefix, "weatherforecast");
    let item = template(prefix, "weatherforecast/{date}");
    let date_param = ParameterSpec::path("date")
        .description("The date of the forecast")
        .schema(json!({"type": "string", "format": "date-time"}));

    let mut table = RouteTable::new(revisions.clone());

    table.register(
        RouteDescriptor::new(Method::GET, collection.clone(), ops::LIST)
            .summary("Retrieve a list of weather forecasts")
            .description("Returns five random forecasts starting tomorrow.")
            .tag(TAG)
            .response(ResponseSpec::json(
                200,
                "The upcoming forecasts",
                json!({"type": "array", "items": {"$ref": FORECAST_REF}}),
            )),
    )?;

    let summary_revisions: Vec<Revision> = revisions
        .iter()
        .copied()
        .filter(|r| *r >= SUMMARIES_SINCE)
        .collect();
    if !summary_revisions.is_empty() {
        table.register(
            RouteDescriptor::new(Method::GET, template(prefix, "weatherforecast/summaries"), ops::SUMMARIES)
                .revisions(summary_revisions)
                .summary("Retrieve the list of weather summaries")
                .tag(TAG)
                .response(ResponseSpec::json(
                    200,
                    "Every summary a forecast may carry",
                    json!({"type": "array", "items": {"type": "string"}}),
                )),
        )?;
    }

    table.register(
        RouteDescriptor::new(Method::POST, collection, ops::CREATE)
            .summary("Add a new weather forecast")
            .tag(TAG)
            .request_body(PayloadSpec::json(json!({"$ref": FORECAST_REF})))
            .response(ResponseSpec::json(201, "The created forecast", json!({"$ref": FORECAST_REF})))
            .response(ResponseSpec::json(400, "The forecast is invalid", json!({"$ref": ERROR_REF}))),
    )?;

    table.register(
        RouteDescriptor::new(Method::PUT, item.clone(), ops::UPDATE)
            .summary("Update an existing weather forecast")
            .tag(TAG)
            .parameter(date_param.clone())
            .request_body(PayloadSpec::json(json!({"$ref": FORECAST_REF})))
            .response(ResponseSpec::json(200, "The updated forecast", json!({"$ref": FORECAST_REF})))
            .response(ResponseSpec::json(400, "The forecast is invalid", json!({"$ref": ERROR_REF})))
            .response(ResponseSpec::json(404, "No forecast exists for the date", json!({"$ref": ERROR_REF}))),
    )?;

    table.register(
        RouteDescriptor::new(Method::DELETE, item, ops::DELETE)
            .summary("Remove a weather forecast")
            .description("Always succeeds, whether or not a forecast existed for the date.")
            .tag(TAG)
            .parameter(date_param)
            .response(ResponseSpec::new(204, "The forecast was removed")),
    )?;

    Ok(table)
}

/// Component schemas referenced by the route declarations.
#[must_use]
pub fn schemas() -> Vec<(&'static str, Schema)> {
    let forecast = Schema::object()
        .property(
            "date",
            Schema::string()
                .with_format("date-time")
                .with_description("The date of the forecast."),
        )
        .property(
            "temperatureC",
            Schema::integer()
                .with_format("int32")
                .with_description("Temperature in Celsius."),
        )
        .property(
            "temperatureF",
            Schema::integer()
                .with_format("int64")
                .with_description("Temperature in Fahrenheit, derived from temperatureC.")
                .read_only(),
        )
        .property(
            "summary",
            Schema::string()
                .with_description("A short weather description.")
                .nullable(),
        )
        .required_property("date")
        .required_property("temperatureC");

    let detail = Schema::object()
        .property("code", Schema::string())
        .property("message", Schema::string())
        .property("category", Schema::string())
        .property("details", Schema::object().nullable())
        .required_property("code")
        .required_property("message")
        .required_property("category");
    let error = Schema::object()
        .property("error", detail)
        .property("request_id", Schema::string().nullable())
        .required_property("error");

    vec![("WeatherForecast", forecast), ("ErrorResponse", error)]
}

/// Builds the synthesizer from the `[api]` and `[docs]` configuration.
#[must_use]
pub fn synthesizer(config: &ForecastConfig, table: Arc<RouteTable>) -> DocumentSynthesizer {
    let api = &config.api;
    let mut synthesizer = DocumentSynthesizer::new(table).title(api.title.clone());

    if let Some(description) = &api.description {
        synthesizer = synthesizer.description(description.clone());
    }
    let contact = Contact {
        name: api.contact_name.clone(),
        url: api.contact_url.clone(),
        email: api.contact_email.clone(),
    };
    if !contact.is_empty() {
        synthesizer = synthesizer.contact(contact);
    }
    for url in &config.docs.static_servers {
        synthesizer = synthesizer.server(url.clone(), None);
    }
    for (name, schema) in schemas() {
        synthesizer = synthesizer.schema(name, schema);
    }
    synthesizer
}
