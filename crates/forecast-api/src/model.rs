//! The weather forecast resource.

use chrono::{DateTime, Days, Local, NaiveDate, NaiveDateTime};
use forecast_core::{ApiError, ApiResult, FieldErrors};
use serde::ser::SerializeStruct;
use serde::{Deserialize, Serialize, Serializer};
use rand::Rng;

/// Summaries a random forecast picks from.
pub const SUMMARIES: [&str; 10] = [
    "Freezing",
    "Bracing",
    "Chilly",
    "Cool",
    "Mild",
    "Warm",
    "Balmy",
    "Hot",
    "Sweltering",
    "Scorching",
];

/// Days ahead the forecast window covers, starting tomorrow.
pub const FORECAST_DAYS: u64 = 5;

/// Lowest random temperature, inclusive.
pub const MIN_TEMPERATURE_C: i32 = -20;
/// Highest random temperature, exclusive.
pub const MAX_TEMPERATURE_C: i32 = 55;

const DATE_TIME_FORMAT: &str = "%Y-%m-%dT%H:%M:%S";

/// One day's forecast.
///
/// Serialized as `{"date", "temperatureC", "temperatureF", "summary"}`;
/// `temperatureF` is always derived from `temperatureC`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WeatherForecast {
    /// The date of the forecast.
    pub date: NaiveDateTime,
    /// Temperature in Celsius.
    pub temperature_c: i32,
    /// A short weather description.
    pub summary: Option<String>,
}

impl WeatherForecast {
    /// Creates a forecast.
    #[must_use]
    pub fn new(date: NaiveDateTime, temperature_c: i32, summary: Option<String>) -> Self {
        Self {
            date,
            temperature_c,
            summary,
        }
    }

    /// Temperature in Fahrenheit, truncated toward zero.
    ///
    /// Widened to `i64`: the quotient exceeds `i32` for large inputs.
    #[must_use]
    pub fn temperature_f(&self) -> i64 {
        32 + (f64::from(self.temperature_c) / 0.5556) as i64
    }

    /// A random forecast for `date`.
    #[must_use]
    pub fn random(date: NaiveDateTime) -> Self {
        let mut rng = rand::rng();
        let temperature_c = rng.random_range(MIN_TEMPERATURE_C..MAX_TEMPERATURE_C);
        let summary = SUMMARIES[rng.random_range(0..SUMMARIES.len())];
        Self::new(date, temperature_c, Some(summary.to_string()))
    }
}

impl Serialize for WeatherForecast {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut state = serializer.serialize_struct("WeatherForecast", 4)?;
        state.serialize_field("date", &self.date.format(DATE_TIME_FORMAT).to_string())?;
        state.serialize_field("temperatureC", &self.temperature_c)?;
        state.serialize_field("temperatureF", &self.temperature_f())?;
        state.serialize_field("summary", &self.summary)?;
        state.end()
    }
}

/// Request body for creating or updating a forecast.
///
/// Every field is optional at the wire level so that missing fields become
/// field-level validation messages instead of a decode failure.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ForecastInput {
    /// Date of the forecast.
    #[serde(default, alias = "Date")]
    pub date: Option<String>,
    /// Temperature in Celsius.
    #[serde(default, rename = "temperatureC", alias = "TemperatureC")]
    pub temperature_c: Option<i32>,
    /// Short description.
    #[serde(default, alias = "Summary")]
    pub summary: Option<String>,
}

impl ForecastInput {
    /// Validates a creation request.
    ///
    /// # Errors
    ///
    /// Returns a validation error naming every missing or malformed field.
    pub fn into_forecast(self) -> ApiResult<WeatherForecast> {
        let mut errors = FieldErrors::new();

        let date = match self.date.as_deref() {
            None => {
                errors.add("Date", required("Date"));
                None
            }
            Some(raw) => {
                let parsed = parse_date(raw);
                if parsed.is_none() {
                    errors.add("Date", format!("The value '{raw}' is not valid for Date."));
                }
                parsed
            }
        };
        if self.temperature_c.is_none() {
            errors.add("TemperatureC", required("TemperatureC"));
        }

        match (date, self.temperature_c) {
            (Some(date), Some(temperature_c)) if errors.is_empty() => {
                Ok(WeatherForecast::new(date, temperature_c, self.summary))
            }
            _ => Err(invalid(errors)),
        }
    }

    /// Validates an update request; the date comes from the path.
    ///
    /// # Errors
    ///
    /// Returns a validation error when `temperatureC` is missing.
    pub fn into_update(self) -> ApiResult<(i32, Option<String>)> {
        match self.temperature_c {
            Some(temperature_c) => Ok((temperature_c, self.summary)),
            None => {
                let mut errors = FieldErrors::new();
                errors.add("TemperatureC", required("TemperatureC"));
                Err(invalid(errors))
            }
        }
    }
}

fn required(field: &str) -> String {
    format!("The {field} field is required.")
}

fn invalid(errors: FieldErrors) -> ApiError {
    ApiError::validation_with_fields("One or more validation errors occurred.", errors)
}

/// Parses `2030-01-01`, `2030-01-01T06:00:00` or an RFC 3339 timestamp.
#[must_use]
pub fn parse_date(raw: &str) -> Option<NaiveDateTime> {
    let raw = raw.trim();
    NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f")
        .ok()
        .or_else(|| DateTime::parse_from_rfc3339(raw).ok().map(|dt| dt.naive_utc()))
        .or_else(|| {
            NaiveDate::parse_from_str(raw, "%Y-%m-%d")
                .ok()
                .and_then(|d| d.and_hms_opt(0, 0, 0))
        })
}

/// The forecasts for the next [`FORECAST_DAYS`] days after `now`.
#[must_use]
pub fn upcoming(now: NaiveDateTime) -> Vec<WeatherForecast> {
    (1..=FORECAST_DAYS)
        .filter_map(|offset| now.checked_add_days(Days::new(offset)))
        .map(WeatherForecast::random)
        .collect()
}

/// Looks up the forecast for `date`.
///
/// Forecasts exist for the days inside the window, tomorrow through
/// [`FORECAST_DAYS`] days out, and start as 20°C "Sunny".
#[must_use]
pub fn find_by_date(date: NaiveDateTime, today: NaiveDate) -> Option<WeatherForecast> {
    let first = today.checked_add_days(Days::new(1))?;
    let last = today.checked_add_days(Days::new(FORECAST_DAYS))?;
    (first..=last)
        .contains(&date.date())
        .then(|| WeatherForecast::new(date, 20, Some("Sunny".to_string())))
}

/// The local wall-clock time.
#[must_use]
pub fn now() -> NaiveDateTime {
    Local::now().naive_local()
}
