//! Flattens the archive's nested `"daily"` arrays into a row-oriented table and
//! converts that table to and from Polars `DataFrame`s for export.

use crate::table::error::TableError;
use crate::types::daily_temperature::DailyTemperature;
use crate::types::query::DailyVariable;
use chrono::NaiveDate;
use polars::prelude::*;
use serde_json::Value;

pub const DATE_FORMAT: &str = "%Y-%m-%d";

const DAILY_KEY: &str = "daily";
const TIME_KEY: &str = "time";

pub const MIN_TEMP_COLUMN: &str = "min_temp";
pub const MAX_TEMP_COLUMN: &str = "max_temp";
pub const AVG_TEMP_COLUMN: &str = "avg_temp";
pub const DATE_COLUMN: &str = "date";

/// Column order of every exported file.
pub const COLUMN_NAMES: [&str; 4] = [MIN_TEMP_COLUMN, MAX_TEMP_COLUMN, AVG_TEMP_COLUMN, DATE_COLUMN];

/// Parses an archive `time` entry (`YYYY-MM-DD`).
pub fn parse_date(value: &str) -> Result<NaiveDate, chrono::ParseError> {
    NaiveDate::parse_from_str(value, DATE_FORMAT)
}

/// The typed schema shared by the CSV and parquet outputs.
pub fn table_schema() -> Schema {
    Schema::from_iter([
        (PlSmallStr::from_static(MIN_TEMP_COLUMN), DataType::Float64),
        (PlSmallStr::from_static(MAX_TEMP_COLUMN), DataType::Float64),
        (PlSmallStr::from_static(AVG_TEMP_COLUMN), DataType::Float64),
        (PlSmallStr::from_static(DATE_COLUMN), DataType::Date),
    ])
}

/// Daily temperature rows in the order the archive returned them (chronological).
#[derive(Debug, Clone, PartialEq, Default)]
pub struct WeatherTable {
    rows: Vec<DailyTemperature>,
}

impl From<Vec<DailyTemperature>> for WeatherTable {
    fn from(rows: Vec<DailyTemperature>) -> Self {
        Self { rows }
    }
}

impl WeatherTable {
    /// Builds the table from a parsed archive response.
    ///
    /// Reads `daily.temperature_2m_min`, `daily.temperature_2m_max`,
    /// `daily.temperature_2m_mean` and `daily.time` as parallel arrays and zips
    /// them into one row per day.
    ///
    /// # Errors
    ///
    /// * [`TableError::MissingKey`] if `daily` or one of the four arrays is absent.
    /// * [`TableError::NotAnArray`] if one of them is present but not an array.
    /// * [`TableError::LengthMismatch`] if a temperature array is not as long as `time`.
    /// * [`TableError::InvalidValue`] if a temperature is neither a number nor `null`,
    ///   or a `time` entry is not a string.
    /// * [`TableError::DateParse`] if a `time` entry is not a `YYYY-MM-DD` date.
    ///
    /// # Examples
    ///
    /// ```
    /// use serde_json::json;
    /// use weather_archive::WeatherTable;
    ///
    /// let response = json!({"daily": {
    ///     "time": ["2024-12-31"],
    ///     "temperature_2m_min": [38.0],
    ///     "temperature_2m_max": [53.5],
    ///     "temperature_2m_mean": [45.7],
    /// }});
    /// let table = WeatherTable::from_response(&response).unwrap();
    /// assert_eq!(table.len(), 1);
    /// assert_eq!(table.rows()[0].max_temp, Some(53.5));
    /// ```
    pub fn from_response(response: &Value) -> Result<Self, TableError> {
        let daily = response.get(DAILY_KEY).ok_or_else(|| TableError::MissingKey {
            key: DAILY_KEY.to_string(),
            reason: archive_reason(response),
        })?;

        let mins = daily_array(response, daily, DailyVariable::Temperature2mMin.as_str())?;
        let maxs = daily_array(response, daily, DailyVariable::Temperature2mMax.as_str())?;
        let means = daily_array(response, daily, DailyVariable::Temperature2mMean.as_str())?;
        let times = daily_array(response, daily, TIME_KEY)?;

        for (name, values) in [
            (DailyVariable::Temperature2mMin, mins),
            (DailyVariable::Temperature2mMax, maxs),
            (DailyVariable::Temperature2mMean, means),
        ] {
            if values.len() != times.len() {
                return Err(TableError::LengthMismatch {
                    column: name.as_str().to_string(),
                    expected: times.len(),
                    found: values.len(),
                });
            }
        }

        let mut rows = Vec::with_capacity(times.len());
        for (index, time) in times.iter().enumerate() {
            let value = time.as_str().ok_or_else(|| TableError::InvalidValue {
                column: TIME_KEY.to_string(),
                index,
            })?;
            let date = parse_date(value).map_err(|source| TableError::DateParse {
                value: value.to_string(),
                index,
                source,
            })?;

            rows.push(DailyTemperature {
                date,
                min_temp: temperature(&mins[index], DailyVariable::Temperature2mMin, index)?,
                max_temp: temperature(&maxs[index], DailyVariable::Temperature2mMax, index)?,
                avg_temp: temperature(&means[index], DailyVariable::Temperature2mMean, index)?,
            });
        }

        Ok(Self { rows })
    }

    pub fn rows(&self) -> &[DailyTemperature] {
        &self.rows
    }

    pub fn into_rows(self) -> Vec<DailyTemperature> {
        self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Converts the rows into a `DataFrame` with columns
    /// `min_temp, max_temp, avg_temp` (Float64) and `date` (Date), in that order.
    pub fn to_frame(&self) -> Result<DataFrame, TableError> {
        let mins: Vec<Option<f64>> = self.rows.iter().map(|r| r.min_temp).collect();
        let maxs: Vec<Option<f64>> = self.rows.iter().map(|r| r.max_temp).collect();
        let avgs: Vec<Option<f64>> = self.rows.iter().map(|r| r.avg_temp).collect();
        let dates: Vec<NaiveDate> = self.rows.iter().map(|r| r.date).collect();

        Ok(df!(
            MIN_TEMP_COLUMN => mins,
            MAX_TEMP_COLUMN => maxs,
            AVG_TEMP_COLUMN => avgs,
            DATE_COLUMN => dates
        )?)
    }

    /// Reads rows back out of a `DataFrame` laid out like [`WeatherTable::to_frame`].
    pub fn from_frame(df: &DataFrame) -> Result<Self, TableError> {
        let mins = frame_column(df, MIN_TEMP_COLUMN)?.f64()?;
        let maxs = frame_column(df, MAX_TEMP_COLUMN)?.f64()?;
        let avgs = frame_column(df, AVG_TEMP_COLUMN)?.f64()?;
        let dates = frame_column(df, DATE_COLUMN)?.date()?;

        let rows = dates
            .as_date_iter()
            .zip(mins.into_iter())
            .zip(maxs.into_iter())
            .zip(avgs.into_iter())
            .enumerate()
            .map(|(index, (((date, min_temp), max_temp), avg_temp))| {
                let date = date.ok_or_else(|| TableError::InvalidValue {
                    column: DATE_COLUMN.to_string(),
                    index,
                })?;
                Ok(DailyTemperature {
                    date,
                    min_temp,
                    max_temp,
                    avg_temp,
                })
            })
            .collect::<Result<Vec<_>, TableError>>()?;

        Ok(Self { rows })
    }
}

fn archive_reason(response: &Value) -> Option<String> {
    response
        .get("reason")
        .and_then(Value::as_str)
        .map(str::to_string)
}

fn daily_array<'a>(
    response: &Value,
    daily: &'a Value,
    key: &str,
) -> Result<&'a Vec<Value>, TableError> {
    daily
        .get(key)
        .ok_or_else(|| TableError::MissingKey {
            key: format!("{DAILY_KEY}.{key}"),
            reason: archive_reason(response),
        })?
        .as_array()
        .ok_or_else(|| TableError::NotAnArray(format!("{DAILY_KEY}.{key}")))
}

fn temperature(
    value: &Value,
    variable: DailyVariable,
    index: usize,
) -> Result<Option<f64>, TableError> {
    match value {
        Value::Null => Ok(None),
        Value::Number(number) => Ok(number.as_f64()),
        _ => Err(TableError::InvalidValue {
            column: variable.as_str().to_string(),
            index,
        }),
    }
}

fn frame_column<'a>(df: &'a DataFrame, name: &str) -> Result<&'a Column, TableError> {
    df.column(name)
        .map_err(|e| TableError::ColumnNotFound(name.to_string(), e))
}
