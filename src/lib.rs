//! Fetch historic daily temperatures for one location from the
//! [Open-Meteo archive](https://open-meteo.com/en/docs/historical-weather-api)
//! and export them as JSON, CSV and parquet.
//!
//! ```no_run
//! use weather_archive::{ArchiveError, FetchAndExport};
//!
//! #[tokio::main(flavor = "current_thread")]
//! async fn main() -> Result<(), ArchiveError> {
//!     let summary = FetchAndExport::builder().build().run().await?;
//!     println!("Wrote {} days to {:?}", summary.rows, summary.csv_path);
//!     Ok(())
//! }
//! ```

mod archive;
mod error;
mod export;
mod fetch_and_export;
mod table;
mod types;
mod utils;

pub use error::ArchiveError;
pub use fetch_and_export::*;
pub use utils::default_data_dir;

pub use types::daily_temperature::DailyTemperature;
pub use types::query::*;

pub use table::weather_table::{parse_date, table_schema, WeatherTable, COLUMN_NAMES, DATE_FORMAT};

pub use archive::fetcher::{parse_response, ArchiveFetcher, ARCHIVE_URL};
pub use export::writer::{
    ensure_dir, read_csv, read_parquet, write_csv, write_parquet, write_raw_json,
};

pub use archive::error::FetchError;
pub use export::error::ExportError;
pub use table::error::TableError;
