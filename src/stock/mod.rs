//! Stock module: purchase expense view and the CSV import/export boundary

pub mod csv_io;

pub use csv_io::*;

use bigdecimal::BigDecimal;
use chrono::NaiveDate;

use crate::types::StockMovement;

/// Total purchase expense represented by `movements` within `[start, end]`
///
/// Only inbound movements with a purchase reason count; everything else
/// (sales, expiry write-offs, counts, transfers) is ignored.
pub fn purchase_expense(
    movements: &[StockMovement],
    start: NaiveDate,
    end: NaiveDate,
) -> BigDecimal {
    movements
        .iter()
        .filter(|m| m.date >= start && m.date <= end)
        .filter_map(|m| m.purchase_cost())
        .sum()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{MovementReason, MovementType};
    use uuid::Uuid;

    #[test]
    fn test_purchase_expense_filters_reason_and_range() {
        let date = |d| NaiveDate::from_ymd_opt(2024, 3, d).unwrap();
        let item = Uuid::new_v4();
        let movements = vec![
            StockMovement::new(
                item,
                MovementType::In,
                BigDecimal::from(2),
                date(10),
                BigDecimal::from(30),
                MovementReason::Purchase,
            ),
            StockMovement::new(
                item,
                MovementType::In,
                BigDecimal::from(5),
                date(12),
                BigDecimal::from(30),
                MovementReason::InventoryCount,
            ),
            StockMovement::new(
                item,
                MovementType::In,
                BigDecimal::from(1),
                NaiveDate::from_ymd_opt(2024, 4, 1).unwrap(),
                BigDecimal::from(30),
                MovementReason::Purchase,
            ),
        ];

        assert_eq!(
            purchase_expense(&movements, date(1), date(31)),
            BigDecimal::from(60)
        );
    }
}
