pub mod error;
pub mod io;
pub mod orders;
pub mod planner;
pub mod resolve;
pub mod sheet;
pub mod types;
mod utils;

use std::path::{Path, PathBuf};

use log::info;

pub use error::{ParseError, SalesError, WriteError};
pub use planner::{plan_output_dir, Clock, FixedClock, SystemClock};
pub use resolve::resolve_input_path;
pub use sheet::SheetLayout;

use io::load_ledger;
use orders::create_order_sheets;
use sheet::write_order_sheet;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunSummary {
    pub output_dir: PathBuf,
    pub sheets_written: usize,
}

/// Splits the ledger at `input_path` into one sheet per order inside `output_dir`. The first
/// sheet that cannot be written stops the run; sheets already written stay in place.
pub fn transform(input_path: &Path, output_dir: &Path) -> Result<usize, SalesError> {
    let layout = SheetLayout::default();
    let sheets = create_order_sheets(load_ledger(input_path)?)?;

    for sheet in &sheets {
        write_order_sheet(sheet, output_dir, &layout).map_err(|source| SalesError::Write {
            order: sheet.order_id.clone(),
            source,
        })?;
    }
    Ok(sheets.len())
}

/// Plans the dated output directory next to the ledger, then transforms the ledger into it.
pub fn process_sales<C: Clock + ?Sized>(
    input_path: &Path,
    clock: &C,
) -> Result<RunSummary, SalesError> {
    let output_dir = plan_output_dir(input_path, clock)?;
    info!("writing order sheets to {}", output_dir.display());

    let sheets_written = transform(input_path, &output_dir)?;
    info!("wrote {} order sheets", sheets_written);

    Ok(RunSummary {
        output_dir,
        sheets_written,
    })
}
