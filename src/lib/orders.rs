use im::{OrdMap, Vector};

use crate::error::ParseError;
use crate::types::{Ledger, LedgerRow, LineItem, MonetaryAmount, OrderId, OrderSheet, SheetRow};
use crate::utils::{OrDefault, PushImmut, RemoveImmut};

/// Location-only columns with no place in an order sheet.
pub const DROPPED_COLUMNS: [&str; 5] = ["ADDRESS", "CITY", "STATE", "POSTAL CODE", "COUNTRY"];

/// Attaches `quantity x unit price` to every line item. A product that does not fit a decimal
/// fails with the line it came from.
pub fn derive_total_prices(ledger: Ledger<LineItem>) -> Result<Ledger<LedgerRow>, ParseError> {
    let totals: Vector<MonetaryAmount> = ledger
        .rows
        .iter()
        .map(|item| item.unit_price)
        .zip(ledger.rows.iter().map(|item| item.quantity))
        .zip(ledger.rows.iter().map(|item| item.line))
        .map(|((price, quantity), line)| {
            price
                .checked_times(quantity)
                .ok_or(ParseError::AmountOverflow { line })
        })
        .collect::<Result<_, _>>()?;

    Ok(Ledger {
        detail_headers: ledger.detail_headers,
        rows: ledger
            .rows
            .into_iter()
            .zip(totals)
            .map(|(item, total)| LedgerRow::from_item(item, total))
            .collect(),
    })
}

/// Removes the location columns from the headers and from every row. Columns that are not
/// present are simply skipped.
pub fn drop_location_columns(ledger: Ledger<LedgerRow>) -> Ledger<LedgerRow> {
    let dropped: Vec<usize> = ledger
        .detail_headers
        .iter()
        .enumerate()
        .filter(|(_, h)| DROPPED_COLUMNS.iter().any(|d| d == h))
        .map(|(i, _)| i)
        .collect();

    if dropped.is_empty() {
        return ledger;
    }

    // highest index first so the remaining indices stay valid
    let strip = |values: &Vector<String>| {
        dropped
            .iter()
            .rev()
            .fold(values.clone(), |acc, idx| acc.remove_idx(*idx))
    };

    Ledger {
        detail_headers: strip(&ledger.detail_headers),
        rows: ledger
            .rows
            .iter()
            .map(|row| LedgerRow {
                details: strip(&row.details),
                ..row.clone()
            })
            .collect(),
    }
}

/// Partitions the rows by order identifier, keeping source order inside each group.
pub fn group_by_order(rows: &Vector<LedgerRow>) -> OrdMap<OrderId, Vector<LedgerRow>> {
    rows.iter().fold(OrdMap::new(), |groups, row| {
        let group = groups.get_or_default(&row.order_id).push(row.clone());
        groups.update(row.order_id.clone(), group)
    })
}

/// Sorts one order's rows by item number (stable) and appends its Total Row.
pub fn build_order_sheet(
    order_id: OrderId,
    detail_headers: Vector<String>,
    group: Vector<LedgerRow>,
) -> Result<OrderSheet, ParseError> {
    let mut items: Vec<LedgerRow> = group.into_iter().collect();
    items.sort_by(|a, b| a.item_number.cmp(&b.item_number));

    let grand_total = items
        .iter()
        .try_fold(MonetaryAmount::ZERO, |acc, row| acc.checked_add(row.total_price))
        .ok_or_else(|| ParseError::TotalOverflow {
            order: order_id.clone(),
        })?;

    let rows: Vector<SheetRow> = items.into_iter().map(SheetRow::Item).collect();
    Ok(OrderSheet {
        order_id,
        detail_headers,
        rows: rows.push(SheetRow::Total(grand_total)),
    })
}

/// Runs every in-memory step of the transform, yielding one sheet per distinct order in
/// identifier order.
pub fn create_order_sheets(ledger: Ledger<LineItem>) -> Result<Vec<OrderSheet>, ParseError> {
    let ledger = drop_location_columns(derive_total_prices(ledger)?);
    group_by_order(&ledger.rows)
        .into_iter()
        .map(|(order_id, group)| {
            build_order_sheet(order_id, ledger.detail_headers.clone(), group)
        })
        .collect()
}
