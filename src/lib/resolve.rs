use std::{ffi::OsString, path::PathBuf};

use crate::error::SalesError;

/// Picks the ledger path out of the positional arguments (program name already skipped) and
/// checks that it names an existing regular file.
pub fn resolve_input_path<I>(args: I) -> Result<PathBuf, SalesError>
where
    I: IntoIterator<Item = OsString>,
{
    let path = args
        .into_iter()
        .next()
        .map(PathBuf::from)
        .ok_or(SalesError::Usage)?;

    if !path.is_file() {
        return Err(SalesError::NotFound { path });
    }
    Ok(path)
}
