pub mod daily_temperature;
pub mod query;
