use std::collections::BTreeSet;
use std::fmt;

use chrono::NaiveDate;

// ---------------------------------------------------------------------------
// Gender / PaymentMethod – the closed categorical columns
// ---------------------------------------------------------------------------

/// Customer gender as recorded on the invoice.
/// Ordered `Female < Male` so pivot rows sort the way the source data does.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Gender {
    Female,
    Male,
}

impl Gender {
    pub const ALL: [Gender; 2] = [Gender::Female, Gender::Male];

    /// Case-insensitive parse of the `gender` cell.
    pub fn parse(s: &str) -> Option<Gender> {
        match s.trim().to_ascii_lowercase().as_str() {
            "female" => Some(Gender::Female),
            "male" => Some(Gender::Male),
            _ => None,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Gender::Female => "Female",
            Gender::Male => "Male",
        }
    }
}

impl fmt::Display for Gender {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Payment method. The pivot always carries one column per variant, in
/// [`PaymentMethod::ALL`] order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum PaymentMethod {
    Cash,
    CreditCard,
    DebitCard,
}

impl PaymentMethod {
    pub const ALL: [PaymentMethod; 3] = [
        PaymentMethod::Cash,
        PaymentMethod::CreditCard,
        PaymentMethod::DebitCard,
    ];

    /// Accepts `Cash`, `Credit Card`, `credit_card`, ... (case-insensitive).
    pub fn parse(s: &str) -> Option<PaymentMethod> {
        let norm: String = s
            .trim()
            .chars()
            .map(|c| if c == '_' || c == '-' { ' ' } else { c.to_ascii_lowercase() })
            .collect();
        match norm.as_str() {
            "cash" => Some(PaymentMethod::Cash),
            "credit card" => Some(PaymentMethod::CreditCard),
            "debit card" => Some(PaymentMethod::DebitCard),
            _ => None,
        }
    }

    /// Position of this method's column in the pivot.
    pub fn index(self) -> usize {
        match self {
            PaymentMethod::Cash => 0,
            PaymentMethod::CreditCard => 1,
            PaymentMethod::DebitCard => 2,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            PaymentMethod::Cash => "Cash",
            PaymentMethod::CreditCard => "Credit Card",
            PaymentMethod::DebitCard => "Debit Card",
        }
    }
}

impl fmt::Display for PaymentMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

// ---------------------------------------------------------------------------
// RawTransaction – one parsed CSV row, before cleaning
// ---------------------------------------------------------------------------

/// A row as the loader produced it: full invoice date, mall possibly missing,
/// quantity present only when the file has that column.
#[derive(Debug, Clone, PartialEq)]
pub struct RawTransaction {
    pub gender: Gender,
    pub invoice_date: NaiveDate,
    pub unit_price: f64,
    pub quantity: Option<u32>,
    pub age: u32,
    pub category: String,
    pub shopping_mall: Option<String>,
    pub payment_method: PaymentMethod,
}

// ---------------------------------------------------------------------------
// Transaction – one cleaned row
// ---------------------------------------------------------------------------

/// A cleaned transaction: date truncated to the year, mall normalised,
/// `total` derived from price and quantity.
#[derive(Debug, Clone, PartialEq)]
pub struct Transaction {
    pub gender: Gender,
    pub invoice_year: i32,
    pub quantity: Option<u32>,
    pub unit_price: f64,
    pub age: u32,
    pub category: String,
    pub shopping_mall: String,
    pub payment_method: PaymentMethod,
    /// `unit_price * quantity`, `None` when the file has no quantity column.
    pub total: Option<f64>,
}

impl Transaction {
    /// The figure the dashboard averages: `total` when available, otherwise
    /// the bare unit price.
    pub fn value(&self) -> f64 {
        self.total.unwrap_or(self.unit_price)
    }
}

/// Which figure [`Transaction::value`] reports for a dataset.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueColumn {
    Total,
    UnitPrice,
}

impl fmt::Display for ValueColumn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValueColumn::Total => f.write_str("total"),
            ValueColumn::UnitPrice => f.write_str("price"),
        }
    }
}

// ---------------------------------------------------------------------------
// DistinctIndex – option lists for the filter controls
// ---------------------------------------------------------------------------

/// Sorted distinct values per filterable column, taken from the unfiltered
/// cleaned dataset.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DistinctIndex {
    pub ages: BTreeSet<u32>,
    pub categories: BTreeSet<String>,
    pub malls: BTreeSet<String>,
}

impl DistinctIndex {
    pub fn from_transactions(transactions: &[Transaction]) -> Self {
        let mut index = DistinctIndex::default();
        for tx in transactions {
            index.ages.insert(tx.age);
            if !index.categories.contains(&tx.category) {
                index.categories.insert(tx.category.clone());
            }
            if !index.malls.contains(&tx.shopping_mall) {
                index.malls.insert(tx.shopping_mall.clone());
            }
        }
        index
    }
}

// ---------------------------------------------------------------------------
// Dataset – the cleaned, immutable table
// ---------------------------------------------------------------------------

/// The cleaned dataset with its pre-computed distinct-value index.
#[derive(Debug, Clone, PartialEq)]
pub struct Dataset {
    pub transactions: Vec<Transaction>,
    pub value_column: ValueColumn,
    pub distinct: DistinctIndex,
    /// Rows read from the file before duplicate removal.
    pub rows_read: usize,
}

impl Dataset {
    pub fn new(transactions: Vec<Transaction>, value_column: ValueColumn, rows_read: usize) -> Self {
        let distinct = DistinctIndex::from_transactions(&transactions);
        Dataset {
            transactions,
            value_column,
            distinct,
            rows_read,
        }
    }

    /// Number of cleaned transactions.
    pub fn len(&self) -> usize {
        self.transactions.len()
    }

    /// Whether the dataset is empty.
    pub fn is_empty(&self) -> bool {
        self.transactions.is_empty()
    }

    pub fn duplicates_removed(&self) -> usize {
        self.rows_read.saturating_sub(self.transactions.len())
    }
}
