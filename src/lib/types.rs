use std::{cmp::Ordering, fmt};

use im::Vector;
use rust_decimal::{Decimal, RoundingStrategy};

/// The grouping key uniting the line items of one customer order.
#[derive(Default, Debug, Hash, Eq, PartialEq, Ord, PartialOrd, Clone)]
pub struct OrderId(String);

impl OrderId {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn value(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for OrderId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Position of a line item within its order. Numeric item numbers sort by value and before any
/// free-text item number; free-text ones sort lexicographically.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ItemNumber {
    Numeric(Decimal),
    Text(String),
}

impl ItemNumber {
    pub fn parse(raw: &str) -> Self {
        match raw.parse::<Decimal>() {
            Ok(n) => ItemNumber::Numeric(n),
            Err(_) => ItemNumber::Text(raw.to_string()),
        }
    }
}

impl Ord for ItemNumber {
    fn cmp(&self, other: &Self) -> Ordering {
        match (self, other) {
            (ItemNumber::Numeric(a), ItemNumber::Numeric(b)) => a.cmp(b),
            (ItemNumber::Numeric(_), ItemNumber::Text(_)) => Ordering::Less,
            (ItemNumber::Text(_), ItemNumber::Numeric(_)) => Ordering::Greater,
            (ItemNumber::Text(a), ItemNumber::Text(b)) => a.cmp(b),
        }
    }
}

impl PartialOrd for ItemNumber {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl fmt::Display for ItemNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ItemNumber::Numeric(n) => n.fmt(f),
            ItemNumber::Text(t) => t.fmt(f),
        }
    }
}

#[derive(Default, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Debug)]
pub struct MonetaryAmount(Decimal);

impl MonetaryAmount {
    pub const ZERO: Self = Self(Decimal::ZERO);

    pub fn new(value: Decimal) -> Self {
        Self(value)
    }

    pub fn value(&self) -> Decimal {
        self.0
    }

    /// Currency text with exactly two decimal places, e.g. `$13.00`.
    pub fn to_currency_string(&self) -> String {
        let rounded = self
            .0
            .round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
        format!("${:.2}", rounded)
    }

    /// `None` when the sum does not fit a decimal.
    pub fn checked_add(self, rhs: Self) -> Option<Self> {
        self.0.checked_add(rhs.0).map(MonetaryAmount)
    }

    /// Price of `quantity` units, `None` on overflow.
    pub fn checked_times(self, quantity: u64) -> Option<Self> {
        self.0.checked_mul(Decimal::from(quantity)).map(MonetaryAmount)
    }
}

/// One line item as it was read from the ledger, before any derived values.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LineItem {
    /// Line of the ledger file the item was read from.
    pub line: u64,
    pub order_id: OrderId,
    pub item_number: ItemNumber,
    pub quantity: u64,
    pub unit_price: MonetaryAmount,
    /// Values of the descriptive columns, aligned with [Ledger::detail_headers].
    pub details: Vector<String>,
}

/// A line item carrying its derived total price.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LedgerRow {
    pub line: u64,
    pub order_id: OrderId,
    pub item_number: ItemNumber,
    pub quantity: u64,
    pub unit_price: MonetaryAmount,
    pub details: Vector<String>,
    pub total_price: MonetaryAmount,
}

impl LedgerRow {
    pub fn from_item(item: LineItem, total_price: MonetaryAmount) -> Self {
        Self {
            line: item.line,
            order_id: item.order_id,
            item_number: item.item_number,
            quantity: item.quantity,
            unit_price: item.unit_price,
            details: item.details,
            total_price,
        }
    }
}

/// The whole source ledger. Every column that is not one of the four key columns is a detail
/// column, kept in source order.
#[derive(Debug, Clone)]
pub struct Ledger<R: Clone> {
    pub detail_headers: Vector<String>,
    pub rows: Vector<R>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SheetRow {
    Item(LedgerRow),
    /// Synthetic trailing row holding the order's grand total.
    Total(MonetaryAmount),
}

/// Everything needed to render one order's spreadsheet. The order identifier names the file
/// and is not part of the rows.
#[derive(Debug, Clone)]
pub struct OrderSheet {
    pub order_id: OrderId,
    pub detail_headers: Vector<String>,
    pub rows: Vector<SheetRow>,
}

impl OrderSheet {
    pub fn items(&self) -> impl Iterator<Item = &LedgerRow> {
        self.rows.iter().filter_map(|r| match r {
            SheetRow::Item(row) => Some(row),
            SheetRow::Total(_) => None,
        })
    }

    pub fn grand_total(&self) -> Option<MonetaryAmount> {
        match self.rows.last() {
            Some(SheetRow::Total(total)) => Some(*total),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal::Decimal;
    use std::str::FromStr;

    fn amount(s: &str) -> MonetaryAmount {
        MonetaryAmount::new(Decimal::from_str(s).unwrap())
    }

    #[test]
    fn currency_string_has_two_decimals() {
        assert_eq!(amount("13").to_currency_string(), "$13.00");
        assert_eq!(amount("6.5").to_currency_string(), "$6.50");
        assert_eq!(amount("0").to_currency_string(), "$0.00");
    }

    #[test]
    fn currency_string_rounds_half_away_from_zero() {
        assert_eq!(amount("2.345").to_currency_string(), "$2.35");
        assert_eq!(amount("2.344").to_currency_string(), "$2.34");
    }

    #[test]
    fn multiplication_is_exact() {
        assert_eq!(amount("0.1").checked_times(3), Some(amount("0.3")));
    }

    #[test]
    fn amounts_add() {
        assert_eq!(amount("10.00").checked_add(amount("3.00")), Some(amount("13")));
    }

    #[test]
    fn overflowing_product_is_none() {
        let huge = MonetaryAmount::new(Decimal::MAX);
        assert_eq!(huge.checked_times(2), None);
        assert_eq!(huge.checked_times(1), Some(huge));
        assert_eq!(huge.checked_times(0), Some(MonetaryAmount::ZERO));
    }

    #[test]
    fn overflowing_sum_is_none() {
        let huge = MonetaryAmount::new(Decimal::MAX);
        assert_eq!(huge.checked_add(amount("1")), None);
    }

    #[test]
    fn numeric_item_numbers_sort_by_value() {
        assert!(ItemNumber::parse("2") < ItemNumber::parse("10"));
        assert!(ItemNumber::parse("10") < ItemNumber::parse("A1"));
        assert!(ItemNumber::parse("A1") < ItemNumber::parse("B0"));
    }
}
