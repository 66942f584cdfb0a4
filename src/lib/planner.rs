use std::{
    fs, io,
    path::{Path, PathBuf},
};

use chrono::{Local, NaiveDate};
use log::debug;

use crate::error::SalesError;

/// Source of the current calendar date.
pub trait Clock {
    fn today(&self) -> NaiveDate;
}

/// Local wall-clock date.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn today(&self) -> NaiveDate {
        Local::now().date_naive()
    }
}

#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub NaiveDate);

impl Clock for FixedClock {
    fn today(&self) -> NaiveDate {
        self.0
    }
}

pub fn output_dir_name(date: NaiveDate) -> String {
    format!("orders_{}", date.format("%Y-%m-%d"))
}

/// Returns `<absolute parent of input>/orders_<YYYY-MM-DD>`, creating it when absent. Calling
/// it again on the same day returns the same, already existing, directory.
pub fn plan_output_dir<C: Clock + ?Sized>(
    input_path: &Path,
    clock: &C,
) -> Result<PathBuf, SalesError> {
    let fs_error = |path: &Path| {
        let path = path.to_path_buf();
        move |source: io::Error| SalesError::Filesystem { path, source }
    };

    let absolute = std::path::absolute(input_path).map_err(fs_error(input_path))?;
    let parent = absolute.parent().unwrap_or_else(|| Path::new("/"));
    let orders_dir = parent.join(output_dir_name(clock.today()));

    if !orders_dir.is_dir() {
        debug!("creating output directory {}", orders_dir.display());
        fs::create_dir_all(&orders_dir).map_err(fs_error(&orders_dir))?;
    }
    Ok(orders_dir)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn clock() -> FixedClock {
        FixedClock(NaiveDate::from_ymd_opt(2024, 3, 7).unwrap())
    }

    #[test]
    fn name_is_prefixed_iso_date() {
        assert_eq!(output_dir_name(clock().0), "orders_2024-03-07");
    }

    #[test]
    fn creates_dated_sibling_directory() {
        let dir = tempfile::tempdir().unwrap();
        let ledger = dir.path().join("sales_data.csv");
        let sut = plan_output_dir(&ledger, &clock()).unwrap();
        assert_eq!(sut, dir.path().join("orders_2024-03-07"));
        assert!(sut.is_dir());
    }

    #[test]
    fn is_idempotent_on_the_same_day() {
        let dir = tempfile::tempdir().unwrap();
        let ledger = dir.path().join("sales_data.csv");
        let first = plan_output_dir(&ledger, &clock()).unwrap();
        fs::write(first.join("A1.xlsx"), b"kept").unwrap();
        let second = plan_output_dir(&ledger, &clock()).unwrap();
        assert_eq!(first, second);
        assert!(second.join("A1.xlsx").is_file());
    }

    #[test]
    fn creates_missing_intermediate_directories() {
        let dir = tempfile::tempdir().unwrap();
        let ledger = dir.path().join("nested").join("deeper").join("sales_data.csv");
        let sut = plan_output_dir(&ledger, &clock()).unwrap();
        assert!(sut.is_dir());
        assert!(sut.starts_with(dir.path().join("nested").join("deeper")));
    }

    #[test]
    fn blocked_location_is_a_filesystem_error() {
        let dir = tempfile::tempdir().unwrap();
        let blocker = dir.path().join("orders_2024-03-07");
        fs::write(&blocker, b"not a directory").unwrap();
        let sut = plan_output_dir(&dir.path().join("sales_data.csv"), &clock());
        assert!(matches!(sut, Err(SalesError::Filesystem { .. })));
    }
}
