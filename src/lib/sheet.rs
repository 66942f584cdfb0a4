use std::path::{Path, PathBuf};

use log::debug;
use rust_decimal::{prelude::ToPrimitive, Decimal};
use rust_xlsxwriter::{Format, Workbook, Worksheet};

use crate::error::WriteError;
use crate::io::{ITEM_NUMBER, ITEM_PRICE, ITEM_QUANTITY};
use crate::types::{ItemNumber, LedgerRow, MonetaryAmount, OrderId, OrderSheet, SheetRow};

pub const TOTAL_PRICE: &str = "TOTAL PRICE";
pub const GRAND_TOTAL_LABEL: &str = "GRAND TOTAL:";
pub const SHEET_EXTENSION: &str = "xlsx";

const ITEM_NUMBER_COL: u16 = 0;
const ITEM_QUANTITY_COL: u16 = 1;
const ITEM_PRICE_COL: u16 = 2;
const FIRST_DETAIL_COL: usize = 3;

/// Fixed presentation of every order sheet. Widths follow the role of a column, not its
/// position, so `TOTAL PRICE` keeps its width however many descriptive columns precede it.
#[derive(Debug, Clone)]
pub struct SheetLayout {
    pub sheet_name: String,
    pub currency_format: String,
    pub item_number_width: f64,
    pub item_quantity_width: f64,
    pub item_price_width: f64,
    /// Widths of the leading descriptive columns. Any further ones keep the default width.
    pub detail_widths: Vec<f64>,
    pub total_price_width: f64,
}

impl Default for SheetLayout {
    fn default() -> Self {
        Self {
            sheet_name: "Dataofsales".to_string(),
            currency_format: "$#,##0.00".to_string(),
            item_number_width: 11.0,
            item_quantity_width: 13.0,
            item_price_width: 15.0,
            detail_widths: vec![15.0, 15.0],
            total_price_width: 13.0,
        }
    }
}

/// Header row of a sheet: the key columns, the pass-through details, then the derived total.
pub fn sheet_headers(sheet: &OrderSheet) -> Vec<String> {
    let mut headers = vec![
        ITEM_NUMBER.to_string(),
        ITEM_QUANTITY.to_string(),
        ITEM_PRICE.to_string(),
    ];
    headers.extend(sheet.detail_headers.iter().cloned());
    headers.push(TOTAL_PRICE.to_string());
    headers
}

/// `<order id>.xlsx`, refusing identifiers that would not stay a single file inside the output
/// directory.
pub fn sheet_file_name(order_id: &OrderId) -> Result<String, WriteError> {
    let id = order_id.value();
    let unusable = id.is_empty()
        || id == "."
        || id == ".."
        || id.contains(|c: char| c == '/' || c == '\\' || c == '\0');
    if unusable {
        return Err(WriteError::InvalidFileName(id.to_string()));
    }
    Ok(format!("{}.{}", id, SHEET_EXTENSION))
}

/// Zero-based column number as the writer expects it.
pub fn column(idx: usize) -> Result<u16, WriteError> {
    u16::try_from(idx).map_err(|_| WriteError::TooManyColumns(idx))
}

fn detail_column(offset: usize) -> Result<u16, WriteError> {
    column(FIRST_DETAIL_COL + offset)
}

fn to_number(value: Decimal) -> Result<f64, WriteError> {
    value.to_f64().ok_or(WriteError::Unrepresentable(value))
}

fn write_item(
    worksheet: &mut Worksheet,
    row: u32,
    item: &LedgerRow,
    total_col: u16,
    currency: &Format,
) -> Result<(), WriteError> {
    match &item.item_number {
        ItemNumber::Numeric(n) => worksheet.write_number(row, ITEM_NUMBER_COL, to_number(*n)?)?,
        ItemNumber::Text(t) => worksheet.write_string(row, ITEM_NUMBER_COL, t)?,
    };
    worksheet.write_number(row, ITEM_QUANTITY_COL, item.quantity as f64)?;
    worksheet.write_number_with_format(
        row,
        ITEM_PRICE_COL,
        to_number(item.unit_price.value())?,
        currency,
    )?;

    for (offset, value) in item.details.iter().enumerate() {
        if !value.is_empty() {
            worksheet.write_string(row, detail_column(offset)?, value)?;
        }
    }

    worksheet.write_number_with_format(
        row,
        total_col,
        to_number(item.total_price.value())?,
        currency,
    )?;
    Ok(())
}

fn write_total(
    worksheet: &mut Worksheet,
    row: u32,
    total_col: u16,
    total: MonetaryAmount,
    currency: &Format,
) -> Result<(), WriteError> {
    worksheet.write_string_with_format(row, ITEM_PRICE_COL, GRAND_TOTAL_LABEL, currency)?;
    worksheet.write_string_with_format(row, total_col, total.to_currency_string(), currency)?;
    Ok(())
}

fn set_column_widths(
    worksheet: &mut Worksheet,
    layout: &SheetLayout,
    detail_count: usize,
    total_col: u16,
) -> Result<(), WriteError> {
    worksheet.set_column_width(ITEM_NUMBER_COL, layout.item_number_width)?;
    worksheet.set_column_width(ITEM_QUANTITY_COL, layout.item_quantity_width)?;
    worksheet.set_column_width(ITEM_PRICE_COL, layout.item_price_width)?;
    for (offset, width) in layout.detail_widths.iter().take(detail_count).enumerate() {
        worksheet.set_column_width(detail_column(offset)?, *width)?;
    }
    worksheet.set_column_width(total_col, layout.total_price_width)?;
    Ok(())
}

/// Renders one order into a single-worksheet workbook.
pub fn build_worksheet(
    sheet: &OrderSheet,
    layout: &SheetLayout,
) -> Result<Worksheet, WriteError> {
    let detail_count = sheet.detail_headers.len();
    let total_col = detail_column(detail_count)?;

    let mut worksheet = Worksheet::new();
    worksheet.set_name(&layout.sheet_name)?;

    let header_format = Format::new().set_bold();
    let currency = Format::new().set_num_format(&layout.currency_format);

    set_column_widths(&mut worksheet, layout, detail_count, total_col)?;
    worksheet.set_column_format(ITEM_PRICE_COL, &currency)?;
    worksheet.set_column_format(total_col, &currency)?;

    for (idx, header) in sheet_headers(sheet).iter().enumerate() {
        worksheet.write_string_with_format(0, column(idx)?, header, &header_format)?;
    }

    for (idx, sheet_row) in sheet.rows.iter().enumerate() {
        let row = u32::try_from(idx + 1).map_err(|_| WriteError::TooManyRows(idx + 1))?;
        match sheet_row {
            SheetRow::Item(item) => write_item(&mut worksheet, row, item, total_col, &currency)?,
            SheetRow::Total(total) => {
                write_total(&mut worksheet, row, total_col, *total, &currency)?
            }
        }
    }

    Ok(worksheet)
}

/// Writes `<order id>.xlsx` into `output_dir`, replacing any file of the same name.
pub fn write_order_sheet(
    sheet: &OrderSheet,
    output_dir: &Path,
    layout: &SheetLayout,
) -> Result<PathBuf, WriteError> {
    let path = output_dir.join(sheet_file_name(&sheet.order_id)?);

    let mut workbook = Workbook::new();
    workbook.push_worksheet(build_worksheet(sheet, layout)?);
    workbook.save(&path)?;

    debug!(
        "wrote {} line items for order {} to {}",
        sheet.rows.len().saturating_sub(1),
        sheet.order_id,
        path.display()
    );
    Ok(path)
}
