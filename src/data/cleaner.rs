use std::collections::HashSet;

use chrono::{Datelike, NaiveDate};

use super::loader::LoadedRows;
use super::model::{Dataset, Gender, PaymentMethod, RawTransaction, Transaction, ValueColumn};

/// Placeholder for transactions without a shopping mall.
pub const UNKNOWN_MALL: &str = "Unknown";

// ---------------------------------------------------------------------------
// Duplicate detection
// ---------------------------------------------------------------------------

/// Equality key over the whole canonical record. Prices compare by bit
/// pattern so the key can be hashed.
#[derive(Hash, PartialEq, Eq)]
struct RowKey<'a> {
    gender: Gender,
    invoice_date: NaiveDate,
    price_bits: u64,
    quantity: Option<u32>,
    age: u32,
    category: &'a str,
    shopping_mall: Option<&'a str>,
    payment_method: PaymentMethod,
}

impl<'a> RowKey<'a> {
    fn of(row: &'a RawTransaction) -> Self {
        RowKey {
            gender: row.gender,
            invoice_date: row.invoice_date,
            price_bits: row.unit_price.to_bits(),
            quantity: row.quantity,
            age: row.age,
            category: &row.category,
            shopping_mall: row.shopping_mall.as_deref(),
            payment_method: row.payment_method,
        }
    }
}

/// Keep the first occurrence of every distinct row, preserving order.
pub fn drop_duplicates(rows: Vec<RawTransaction>) -> Vec<RawTransaction> {
    let keep: Vec<bool> = {
        let mut seen = HashSet::with_capacity(rows.len());
        rows.iter().map(|row| seen.insert(RowKey::of(row))).collect()
    };
    rows.into_iter()
        .zip(keep)
        .filter_map(|(row, keep)| keep.then_some(row))
        .collect()
}

// ---------------------------------------------------------------------------
// Row cleaning
// ---------------------------------------------------------------------------

/// Normalise one row: mall placeholder, year truncation, derived total.
pub fn clean_row(row: RawTransaction) -> Transaction {
    let total = row.quantity.map(|q| row.unit_price * f64::from(q));
    Transaction {
        gender: row.gender,
        invoice_year: row.invoice_date.year(),
        quantity: row.quantity,
        unit_price: row.unit_price,
        age: row.age,
        category: row.category,
        shopping_mall: row
            .shopping_mall
            .unwrap_or_else(|| UNKNOWN_MALL.to_string()),
        payment_method: row.payment_method,
        total,
    }
}

/// Run the full cleaning pass over the loader's output.
pub fn clean(loaded: LoadedRows) -> Dataset {
    let rows_read = loaded.rows.len();
    let value_column = if loaded.has_quantity {
        ValueColumn::Total
    } else {
        ValueColumn::UnitPrice
    };
    let transactions: Vec<Transaction> = drop_duplicates(loaded.rows)
        .into_iter()
        .map(clean_row)
        .collect();
    Dataset::new(transactions, value_column, rows_read)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn raw(price: f64, quantity: Option<u32>, mall: Option<&str>) -> RawTransaction {
        RawTransaction {
            gender: Gender::Female,
            invoice_date: NaiveDate::from_ymd_opt(2021, 11, 5).unwrap(),
            unit_price: price,
            quantity,
            age: 33,
            category: "Shoes".to_string(),
            shopping_mall: mall.map(str::to_string),
            payment_method: PaymentMethod::Cash,
        }
    }

    #[test]
    fn derived_total_is_price_times_quantity() {
        let tx = clean_row(raw(50.0, Some(3), Some("Kanyon")));
        assert_eq!(tx.total, Some(150.0));
        assert_eq!(tx.value(), 150.0);
    }

    #[test]
    fn date_truncates_to_year() {
        let tx = clean_row(raw(1.0, Some(1), None));
        assert_eq!(tx.invoice_year, 2021);
    }

    #[test]
    fn missing_mall_becomes_unknown() {
        let tx = clean_row(raw(1.0, Some(1), None));
        assert_eq!(tx.shopping_mall, UNKNOWN_MALL);
    }

    #[test]
    fn duplicates_keep_first_occurrence_in_order() {
        let a = raw(10.0, Some(1), Some("A"));
        let b = raw(20.0, Some(1), Some("B"));
        let rows = vec![a.clone(), b.clone(), a.clone(), b.clone(), a.clone()];
        assert_eq!(drop_duplicates(rows), vec![a, b]);
    }

    #[test]
    fn missing_mall_differs_from_literal_unknown() {
        // Dedup runs on the raw record, before placeholder substitution.
        let rows = vec![raw(1.0, Some(1), None), raw(1.0, Some(1), Some(UNKNOWN_MALL))];
        assert_eq!(drop_duplicates(rows).len(), 2);
    }

    #[test]
    fn clean_without_quantity_uses_unit_price() {
        let dataset = clean(LoadedRows {
            rows: vec![raw(42.0, None, Some("Kanyon"))],
            has_quantity: false,
        });
        assert_eq!(dataset.value_column, ValueColumn::UnitPrice);
        assert_eq!(dataset.transactions[0].value(), 42.0);
    }

    #[test]
    fn clean_counts_removed_duplicates() {
        let a = raw(10.0, Some(2), Some("A"));
        let dataset = clean(LoadedRows {
            rows: vec![a.clone(), a.clone(), a],
            has_quantity: true,
        });
        assert_eq!(dataset.len(), 1);
        assert_eq!(dataset.duplicates_removed(), 2);
        assert_eq!(dataset.distinct.malls.iter().collect::<Vec<_>>(), vec!["A"]);
    }

    proptest! {
        #[test]
        fn every_duplicated_row_survives_exactly_once(
            prices in proptest::collection::vec(0u32..20, 1..40),
            copies in 2usize..5,
        ) {
            let mut rows = Vec::new();
            for _ in 0..copies {
                rows.extend(prices.iter().map(|&p| raw(f64::from(p), Some(1), Some("M"))));
            }
            let cleaned = drop_duplicates(rows);

            let mut distinct: Vec<u32> = Vec::new();
            for p in &prices {
                if !distinct.contains(p) {
                    distinct.push(*p);
                }
            }
            let got: Vec<u32> = cleaned.iter().map(|r| r.unit_price as u32).collect();
            prop_assert_eq!(got, distinct);
        }
    }
}
