//! Defines the request parameters sent to the Open-Meteo archive endpoint.
//!
//! Every field of [`ArchiveQuery`] has a default, so `ArchiveQuery::default()`
//! reproduces the fixed request this crate was built around: daily temperatures
//! for Sacramento, CA from 1940 through 2024, in Fahrenheit, local time.

use crate::utils::ymd;
use bon::Builder;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;

pub const DEFAULT_LOCATION: LatLon = LatLon(38.5816, -121.4944);
pub const DEFAULT_START_DATE: NaiveDate = ymd(1940, 1, 1);
pub const DEFAULT_END_DATE: NaiveDate = ymd(2024, 12, 31);
pub const DEFAULT_TIMEZONE: &str = "America/Los_Angeles";

/// Represents a geographical coordinate using latitude and longitude.
///
/// Latitude is the first element (index 0), and longitude is the second (index 1).
///
/// # Examples
///
/// ```
/// use weather_archive::LatLon;
///
/// let sacramento = LatLon(38.5816, -121.4944);
/// assert_eq!(sacramento.0, 38.5816); // Latitude
/// assert_eq!(sacramento.1, -121.4944); // Longitude
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LatLon(pub f64, pub f64);

/// Unit the archive reports temperatures in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TemperatureUnit {
    Celsius,
    #[default]
    Fahrenheit,
}

impl TemperatureUnit {
    pub fn as_str(&self) -> &'static str {
        match self {
            TemperatureUnit::Celsius => "celsius",
            TemperatureUnit::Fahrenheit => "fahrenheit",
        }
    }
}

impl fmt::Display for TemperatureUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A named daily time series offered by the archive API.
///
/// The archive answers with one array per requested variable under the
/// response's `"daily"` object, keyed by [`DailyVariable::as_str`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DailyVariable {
    /// WMO weather interpretation code for the most severe condition of the day.
    WeatherCode,
    #[serde(rename = "temperature_2m_max")]
    Temperature2mMax,
    #[serde(rename = "temperature_2m_min")]
    Temperature2mMin,
    #[serde(rename = "temperature_2m_mean")]
    Temperature2mMean,
    PrecipitationSum,
    RainSum,
    SnowfallSum,
    #[serde(rename = "wind_speed_10m_max")]
    WindSpeed10mMax,
    Sunrise,
    Sunset,
}

impl DailyVariable {
    pub fn as_str(&self) -> &'static str {
        match self {
            DailyVariable::WeatherCode => "weather_code",
            DailyVariable::Temperature2mMax => "temperature_2m_max",
            DailyVariable::Temperature2mMin => "temperature_2m_min",
            DailyVariable::Temperature2mMean => "temperature_2m_mean",
            DailyVariable::PrecipitationSum => "precipitation_sum",
            DailyVariable::RainSum => "rain_sum",
            DailyVariable::SnowfallSum => "snowfall_sum",
            DailyVariable::WindSpeed10mMax => "wind_speed_10m_max",
            DailyVariable::Sunrise => "sunrise",
            DailyVariable::Sunset => "sunset",
        }
    }
}

impl fmt::Display for DailyVariable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

fn default_variables() -> Vec<DailyVariable> {
    vec![
        DailyVariable::WeatherCode,
        DailyVariable::Temperature2mMax,
        DailyVariable::Temperature2mMin,
        DailyVariable::Temperature2mMean,
    ]
}

/// The parameter set for one archive request.
///
/// Built once per run and never mutated afterwards. Any field not set on the
/// builder falls back to its default.
///
/// # Examples
///
/// ```
/// use chrono::NaiveDate;
/// use weather_archive::{ArchiveQuery, TemperatureUnit};
///
/// // The full default request
/// let query = ArchiveQuery::default();
/// assert_eq!(query.temperature_unit(), TemperatureUnit::Fahrenheit);
///
/// // Only the last few days of 2024, in Celsius
/// let recent = ArchiveQuery::builder()
///     .start_date(NaiveDate::from_ymd_opt(2024, 12, 28).unwrap())
///     .temperature_unit(TemperatureUnit::Celsius)
///     .build();
/// assert_eq!(recent.end_date(), query.end_date());
/// ```
#[derive(Debug, Clone, PartialEq, Builder)]
pub struct ArchiveQuery {
    #[builder(default = DEFAULT_LOCATION)]
    location: LatLon,
    #[builder(default = DEFAULT_START_DATE)]
    start_date: NaiveDate,
    #[builder(default = DEFAULT_END_DATE)]
    end_date: NaiveDate,
    #[builder(default = default_variables())]
    variables: Vec<DailyVariable>,
    #[builder(default)]
    temperature_unit: TemperatureUnit,
    #[builder(into, default = DEFAULT_TIMEZONE.to_string())]
    timezone: String,
}

impl Default for ArchiveQuery {
    fn default() -> Self {
        Self::builder().build()
    }
}

impl ArchiveQuery {
    pub fn location(&self) -> LatLon {
        self.location
    }

    pub fn start_date(&self) -> NaiveDate {
        self.start_date
    }

    pub fn end_date(&self) -> NaiveDate {
        self.end_date
    }

    pub fn variables(&self) -> &[DailyVariable] {
        &self.variables
    }

    pub fn temperature_unit(&self) -> TemperatureUnit {
        self.temperature_unit
    }

    pub fn timezone(&self) -> &str {
        &self.timezone
    }

    /// Flattens the query into URL parameter pairs.
    ///
    /// List-valued parameters repeat their key once per entry
    /// (`daily=weather_code&daily=temperature_2m_max&...`).
    pub fn to_query_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = vec![
            ("latitude", self.location.0.to_string()),
            ("longitude", self.location.1.to_string()),
            ("start_date", self.start_date.format("%Y-%m-%d").to_string()),
            ("end_date", self.end_date.format("%Y-%m-%d").to_string()),
        ];
        pairs.extend(
            self.variables
                .iter()
                .map(|variable| ("daily", variable.as_str().to_string())),
        );
        pairs.push(("temperature_unit", self.temperature_unit.to_string()));
        pairs.push(("timezone", self.timezone.clone()));
        pairs
    }
}
