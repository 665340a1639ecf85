use chrono::NaiveDate;
use std::path::{Path, PathBuf};

const DATA_DIR_NAME: &str = "data";

/// Builds a calendar date in a const context. Only called for constants, so an
/// invalid date is a compile error rather than a runtime panic.
pub(crate) const fn ymd(year: i32, month: u32, day: u32) -> NaiveDate {
    match NaiveDate::from_ymd_opt(year, month, day) {
        Some(date) => date,
        None => panic!("invalid calendar date"),
    }
}

/// The `data` directory next to the crate sources.
pub fn default_data_dir() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join(DATA_DIR_NAME)
}
