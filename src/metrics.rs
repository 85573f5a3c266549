//! Pure aggregate computations over the local record collection.
//!
//! Recomputed on every call, O(n) in the record count. Sums are carried as
//! `Decimal`; the balance may be negative even though individual amounts never
//! are.

use crate::model::{Transaction, TransactionKind};
use rust_decimal::Decimal;

/// Sum of amounts over records of `kind`, ignoring the other kind.
fn total_of(records: &[Transaction], kind: TransactionKind) -> Decimal {
    records
        .iter()
        .filter(|t| t.kind == kind)
        .map(|t| t.amount.value())
        .sum()
}

/// Sum of all income amounts.
pub fn total_income(records: &[Transaction]) -> Decimal {
    total_of(records, TransactionKind::Income)
}

/// Sum of all expense amounts.
pub fn total_expense(records: &[Transaction]) -> Decimal {
    total_of(records, TransactionKind::Expense)
}

/// Balance: income minus expense.
pub fn balance(records: &[Transaction]) -> Decimal {
    total_income(records) - total_expense(records)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Amount;
    use chrono::NaiveDate;
    use std::str::FromStr;

    fn record(id: &str, kind: TransactionKind, amount: &str) -> Transaction {
        Transaction {
            id: id.to_string(),
            kind,
            amount: Amount::from_str(amount).unwrap(),
            category: "General".to_string(),
            note: None,
            date: NaiveDate::from_ymd_opt(2025, 1, 1).unwrap(),
            created_at: None,
        }
    }

    #[test]
    fn empty_collection_is_all_zero() {
        assert_eq!(total_income(&[]), Decimal::ZERO);
        assert_eq!(total_expense(&[]), Decimal::ZERO);
        assert_eq!(balance(&[]), Decimal::ZERO);
    }

    #[test]
    fn totals_ignore_the_other_kind() {
        let records = vec![
            record("1", TransactionKind::Income, "1000"),
            record("2", TransactionKind::Expense, "300"),
        ];
        assert_eq!(total_income(&records), Decimal::from(1000));
        assert_eq!(total_expense(&records), Decimal::from(300));
        assert_eq!(balance(&records), Decimal::from(700));
    }

    #[test]
    fn balance_identity_holds() {
        let records = vec![
            record("1", TransactionKind::Income, "10.25"),
            record("2", TransactionKind::Expense, "3.75"),
            record("3", TransactionKind::Expense, "20"),
            record("4", TransactionKind::Income, "0.50"),
        ];
        assert_eq!(
            balance(&records),
            total_income(&records) - total_expense(&records)
        );
    }

    #[test]
    fn balance_can_go_negative() {
        let records = vec![record("1", TransactionKind::Expense, "42")];
        assert_eq!(balance(&records), Decimal::from(-42));
    }
}
