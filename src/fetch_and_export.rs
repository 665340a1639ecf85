//! The end-to-end run: one archive request, three output files.

use crate::archive::fetcher::{parse_response, ArchiveFetcher, ARCHIVE_URL};
use crate::error::ArchiveError;
use crate::export::writer::{ensure_dir, write_csv, write_parquet, write_raw_json};
use crate::table::weather_table::WeatherTable;
use crate::types::query::ArchiveQuery;
use crate::utils::default_data_dir;
use bon::Builder;
use log::info;
use reqwest::Client;
use std::path::PathBuf;
use std::time::Duration;

pub const JSON_FILE_NAME: &str = "weather.json";
pub const CSV_FILE_NAME: &str = "weather.csv";
pub const PARQUET_FILE_NAME: &str = "weather.parquet";

/// Where a run wrote its artifacts, and how many days the table holds.
#[derive(Debug, Clone, PartialEq)]
pub struct ExportSummary {
    pub json_path: PathBuf,
    pub csv_path: PathBuf,
    pub parquet_path: PathBuf,
    pub rows: usize,
}

/// Fetches the archive response for one query and exports it.
///
/// Every step runs to completion before the next begins, and the first
/// failure ends the run. Nothing is retried and nothing already written is
/// cleaned up, so after an error any of the three files may be missing, stale
/// or partially written. Rerun to try again.
///
/// Create one with [`FetchAndExport::builder()`]; every option has a default:
///
/// * `.query(ArchiveQuery)`: the request parameters. Defaults to [`ArchiveQuery::default()`].
/// * `.output_dir(PathBuf)`: where the files go. Defaults to the `data` directory at the crate root.
/// * `.endpoint(String)`: archive URL. Defaults to the public Open-Meteo archive.
/// * `.timeout(Duration)`: request timeout. By default there is none.
/// * `.client(reqwest::Client)`: a preconfigured HTTP client; `timeout` is ignored when set.
///
/// # Examples
///
/// ```no_run
/// # use weather_archive::{ArchiveError, FetchAndExport};
/// # use std::time::Duration;
/// # #[tokio::main]
/// # async fn main() -> Result<(), ArchiveError> {
/// let summary = FetchAndExport::builder()
///     .output_dir("/tmp/weather")
///     .timeout(Duration::from_secs(120))
///     .build()
///     .run()
///     .await?;
/// println!("{} days written to {:?}", summary.rows, summary.parquet_path);
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Builder)]
pub struct FetchAndExport {
    #[builder(default)]
    query: ArchiveQuery,
    #[builder(into, default = default_data_dir())]
    output_dir: PathBuf,
    #[builder(into, default = ARCHIVE_URL.to_string())]
    endpoint: String,
    timeout: Option<Duration>,
    client: Option<Client>,
}

impl FetchAndExport {
    pub fn query(&self) -> &ArchiveQuery {
        &self.query
    }

    pub fn output_dir(&self) -> &PathBuf {
        &self.output_dir
    }

    /// Issues the archive request and exports whatever body comes back.
    ///
    /// # Errors
    ///
    /// * [`ArchiveError::Fetch`] if the request cannot be sent or the body is not JSON.
    /// * [`ArchiveError::Table`] if the response lacks the expected daily arrays;
    ///   an HTTP error status from the archive usually ends up here.
    /// * [`ArchiveError::Export`] if a directory or file cannot be written.
    pub async fn run(&self) -> Result<ExportSummary, ArchiveError> {
        let fetcher = match &self.client {
            Some(client) => ArchiveFetcher::with_client(&self.endpoint, client.clone()),
            None => ArchiveFetcher::new(&self.endpoint, self.timeout)?,
        };
        let body = fetcher.fetch(&self.query).await?;
        self.export_body(&body).await
    }

    /// Runs every step after the request on a body obtained elsewhere.
    ///
    /// The raw JSON file is written before the table is built, so a body that
    /// parses but lacks the daily arrays still leaves `weather.json` behind.
    pub async fn export_body(&self, body: &str) -> Result<ExportSummary, ArchiveError> {
        let response = parse_response(body)?;

        ensure_dir(&self.output_dir).await?;

        let json_path = self.output_dir.join(JSON_FILE_NAME);
        write_raw_json(&response, &json_path).await?;

        let table = WeatherTable::from_response(&response)?;
        let frame = table.to_frame()?;

        let csv_path = self.output_dir.join(CSV_FILE_NAME);
        write_csv(frame.clone(), &csv_path).await?;

        let parquet_path = self.output_dir.join(PARQUET_FILE_NAME);
        write_parquet(frame, &parquet_path).await?;

        info!(
            "Exported {} days ({} to {}) to {:?}",
            table.len(),
            self.query.start_date(),
            self.query.end_date(),
            self.output_dir
        );

        Ok(ExportSummary {
            json_path,
            csv_path,
            parquet_path,
            rows: table.len(),
        })
    }
}
