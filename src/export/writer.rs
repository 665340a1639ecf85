use crate::export::error::ExportError;
use crate::table::weather_table::table_schema;
use log::info;
use polars::prelude::*;
use serde_json::Value;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::{fs, task};

/// Makes sure `path` is a directory, creating it and any missing parents.
///
/// Calling this on a directory that already exists is a no-op.
pub async fn ensure_dir(path: &Path) -> Result<(), ExportError> {
    match fs::metadata(path).await {
        Ok(metadata) => {
            if !metadata.is_dir() {
                return Err(ExportError::NotADirectory(path.to_path_buf()));
            }
            Ok(())
        }
        Err(e) if e.kind() == io::ErrorKind::NotFound => {
            info!("Creating output directory: {}", path.display());
            fs::create_dir_all(path)
                .await
                .map_err(|e| ExportError::DirCreation(path.to_path_buf(), e))
        }
        Err(e) => Err(ExportError::Metadata(path.to_path_buf(), e)),
    }
}

/// Writes the parsed archive response back out as JSON, replacing any existing file.
pub async fn write_raw_json(response: &Value, path: &Path) -> Result<(), ExportError> {
    let bytes =
        serde_json::to_vec(response).map_err(|e| ExportError::JsonWrite(path.to_path_buf(), e))?;
    fs::write(path, &bytes)
        .await
        .map_err(|e| ExportError::FileWrite(path.to_path_buf(), e))?;
    info!("Wrote {} bytes of raw JSON to {:?}", bytes.len(), path);
    Ok(())
}

/// Writes `df` as comma-separated text with a header row and no index column.
pub async fn write_csv(mut df: DataFrame, path: &Path) -> Result<(), ExportError> {
    let path_buf = path.to_path_buf();
    let rows = df.height();
    task::spawn_blocking(move || {
        let mut file = std::fs::File::create(&path_buf)
            .map_err(|e| ExportError::FileWrite(path_buf.clone(), e))?;
        CsvWriter::new(&mut file)
            .include_header(true)
            .finish(&mut df)
            .map_err(|e| ExportError::CsvWrite(path_buf, e))?;
        Ok::<(), ExportError>(())
    })
    .await??;
    info!("Wrote {} rows to {:?}", rows, path);
    Ok(())
}

/// Writes `df` as a Snappy-compressed parquet file.
pub async fn write_parquet(mut df: DataFrame, path: &Path) -> Result<(), ExportError> {
    let path_buf = path.to_path_buf();
    let rows = df.height();
    task::spawn_blocking(move || {
        let file = std::fs::File::create(&path_buf)
            .map_err(|e| ExportError::FileWrite(path_buf.clone(), e))?;
        ParquetWriter::new(file)
            .with_compression(ParquetCompression::Snappy)
            .finish(&mut df)
            .map_err(|e| ExportError::ParquetWrite(path_buf, e))?;
        Ok::<(), ExportError>(())
    })
    .await??;
    info!("Wrote {} rows to {:?}", rows, path);
    Ok(())
}

/// Loads a CSV file written by [`write_csv`], typing columns with the table schema.
pub async fn read_csv(path: &Path) -> Result<DataFrame, ExportError> {
    let path_buf: PathBuf = path.to_path_buf();
    task::spawn_blocking(move || {
        CsvReadOptions::default()
            .with_has_header(true)
            .with_schema(Some(Arc::new(table_schema())))
            .try_into_reader_with_file_path(Some(path_buf.clone()))
            .and_then(|reader| reader.finish())
            .map_err(|e| ExportError::CsvRead(path_buf, e))
    })
    .await?
}

/// Loads a parquet file written by [`write_parquet`].
pub async fn read_parquet(path: &Path) -> Result<DataFrame, ExportError> {
    let path_buf: PathBuf = path.to_path_buf();
    task::spawn_blocking(move || {
        LazyFrame::scan_parquet(&path_buf, Default::default())
            .and_then(|frame| frame.collect())
            .map_err(|e| ExportError::ParquetScan(path_buf, e))
    })
    .await?
}
