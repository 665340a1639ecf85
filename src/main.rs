use log::info;
use weather_archive::{ArchiveError, FetchAndExport};

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<(), ArchiveError> {
    // RUST_LOG=info (or debug) shows progress
    env_logger::init();

    let summary = FetchAndExport::builder().build().run().await?;

    info!(
        "Wrote {} days to {:?}, {:?} and {:?}",
        summary.rows, summary.json_path, summary.csv_path, summary.parquet_path
    );
    Ok(())
}
