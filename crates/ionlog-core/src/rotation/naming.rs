//! Log file naming and calendar boundary checks

use chrono::{Datelike, NaiveDate};
use lazy_static::lazy_static;
use regex::Regex;
use tracing::warn;

use super::RotationPeriod;
use crate::error::{RotationError, RotationResult};

lazy_static! {
    static ref LOG_FILE_NAME: Regex = Regex::new(r"^logfile-(\d{4}-\d{2}-\d{2})\.log$").unwrap();
}

/// Name of the log file for `date`: `logfile-YYYY-MM-DD.log`
pub fn file_name_for(date: NaiveDate) -> String {
    format!("logfile-{}.log", date.format("%Y-%m-%d"))
}

/// Date encoded in a log file name
pub fn file_date(name: &str) -> RotationResult<NaiveDate> {
    LOG_FILE_NAME
        .captures(name)
        .and_then(|caps| caps.get(1))
        .and_then(|date| NaiveDate::parse_from_str(date.as_str(), "%Y-%m-%d").ok())
        .ok_or_else(|| RotationError::InvalidFileName(name.to_string()))
}

/// Whether `name` is a valid dated log file name
pub fn is_log_file_name(name: &str) -> bool {
    file_date(name).is_ok()
}

/// Whether a name resembles a log file closely enough that skipping it is
/// worth a diagnostic
fn looks_like_log_file(name: &str) -> bool {
    name.starts_with("logfile") || name.ends_with(".log")
}

/// Keep the valid dated log files from a folder listing.
///
/// Names that resemble log files without matching the pattern are reported
/// and skipped; anything else is ignored silently.
pub fn dated_files<'a>(names: impl IntoIterator<Item = &'a str>) -> Vec<(&'a str, NaiveDate)> {
    names
        .into_iter()
        .filter_map(|name| match file_date(name) {
            Ok(date) => Some((name, date)),
            Err(_) => {
                if looks_like_log_file(name) {
                    warn!(file = name, "[RotationEngine] File is not a valid log file, skipping");
                }
                None
            }
        })
        .collect()
}

/// The newest dated file
pub fn most_recent<'a>(files: &[(&'a str, NaiveDate)]) -> Option<(&'a str, NaiveDate)> {
    files.iter().copied().max_by_key(|(_, date)| *date)
}

/// The oldest dated file
pub fn oldest<'a>(files: &[(&'a str, NaiveDate)]) -> Option<(&'a str, NaiveDate)> {
    files.iter().copied().min_by_key(|(_, date)| *date)
}

/// Whether a file dated `file_date` belongs to a different period than
/// `today`. Compares calendar units, never elapsed time.
pub fn needs_rotation(period: RotationPeriod, file_date: NaiveDate, today: NaiveDate) -> bool {
    match period {
        RotationPeriod::None => false,
        RotationPeriod::Daily => file_date != today,
        RotationPeriod::Weekly => {
            let (a, b) = (file_date.iso_week(), today.iso_week());
            (a.year(), a.week()) != (b.year(), b.week())
        }
        RotationPeriod::Monthly => {
            (file_date.year(), file_date.month()) != (today.year(), today.month())
        }
    }
}
