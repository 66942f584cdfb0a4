use std::{fs::File, io::Read, path::Path};

use ::serde::Deserialize;
use im::Vector;
use log::debug;
use rust_decimal::Decimal;

use crate::error::{ParseError, SalesError};
use crate::types::{ItemNumber, Ledger, LineItem, MonetaryAmount, OrderId};

pub const ORDER_ID: &str = "ORDER ID";
pub const ITEM_NUMBER: &str = "ITEM NUMBER";
pub const ITEM_QUANTITY: &str = "ITEM QUANTITY";
pub const ITEM_PRICE: &str = "ITEM PRICE";

const REQUIRED_COLUMNS: [&str; 4] = [ORDER_ID, ITEM_NUMBER, ITEM_QUANTITY, ITEM_PRICE];

#[derive(Debug, Deserialize)]
pub struct LedgerRowEntity {
    #[serde(rename = "ORDER ID")]
    pub order_id: String,
    #[serde(rename = "ITEM NUMBER")]
    pub item_number: String,
    #[serde(rename = "ITEM QUANTITY")]
    pub quantity: u64,
    #[serde(rename = "ITEM PRICE", with = "rust_decimal::serde::str")]
    pub price: Decimal,
}

impl LedgerRowEntity {
    fn into_domain(self, line: u64, details: Vector<String>) -> Result<LineItem, ParseError> {
        if self.order_id.is_empty() {
            return Err(ParseError::EmptyField {
                line,
                column: ORDER_ID,
            });
        }
        if self.item_number.is_empty() {
            return Err(ParseError::EmptyField {
                line,
                column: ITEM_NUMBER,
            });
        }
        Ok(LineItem {
            line,
            order_id: OrderId::new(self.order_id),
            item_number: ItemNumber::parse(&self.item_number),
            quantity: self.quantity,
            unit_price: MonetaryAmount::new(self.price),
            details,
        })
    }
}

pub fn load_ledger(csv_path: &Path) -> Result<Ledger<LineItem>, SalesError> {
    let file = File::open(csv_path).map_err(|e| ParseError::Csv(e.into()))?;
    let ledger = read_ledger(file)?;
    debug!(
        "loaded {} line items with {} detail columns from {}",
        ledger.rows.len(),
        ledger.detail_headers.len(),
        csv_path.display()
    );
    Ok(ledger)
}

/// Reads a ledger with a header row. The four key columns are required; every other column is
/// carried along as text in source order.
pub fn read_ledger<R: Read>(source: R) -> Result<Ledger<LineItem>, ParseError> {
    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(source);

    let headers = reader.headers()?.clone();
    if let Some(missing) = REQUIRED_COLUMNS
        .iter()
        .find(|required| !headers.iter().any(|h| h == **required))
    {
        return Err(ParseError::MissingColumn(*missing));
    }

    let detail_columns: Vec<usize> = headers
        .iter()
        .enumerate()
        .filter(|(_, h)| !REQUIRED_COLUMNS.iter().any(|r| r == h))
        .map(|(i, _)| i)
        .collect();
    let detail_headers: Vector<String> = detail_columns
        .iter()
        .map(|i| headers[*i].to_string())
        .collect();

    let mut rows: Vector<LineItem> = Vector::new();
    for record in reader.records() {
        // fail on the first bad row, a partial ledger would produce wrong totals
        let record = record?;
        let line = record.position().map(|p| p.line()).unwrap_or_default();
        let entity: LedgerRowEntity = record.deserialize(Some(&headers))?;
        let details = detail_columns
            .iter()
            .map(|i| record.get(*i).unwrap_or_default().to_string())
            .collect();
        rows.push_back(entity.into_domain(line, details)?);
    }

    Ok(Ledger {
        detail_headers,
        rows,
    })
}
