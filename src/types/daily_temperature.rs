use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// One row of the exported table: the temperature summary for a single day.
///
/// Temperatures are in whatever unit the query asked for (Fahrenheit by
/// default). The archive reports `null` for days it has no reanalysis data for;
/// those surface as `None`.
#[derive(Debug, PartialEq, Clone, Copy, Serialize, Deserialize)]
pub struct DailyTemperature {
    pub date: NaiveDate,       // time
    pub min_temp: Option<f64>, // temperature_2m_min
    pub max_temp: Option<f64>, // temperature_2m_max
    pub avg_temp: Option<f64>, // temperature_2m_mean
}
