use std::collections::BTreeMap;

use super::model::{Dataset, Gender, PaymentMethod};

// ---------------------------------------------------------------------------
// Pivot table: (year, gender) rows × payment-method columns
// ---------------------------------------------------------------------------

/// One (year, gender) row of the pivot. `cells[m.index()]` is the mean value
/// for payment method `m`, `None` when no transaction used that method.
#[derive(Debug, Clone, PartialEq)]
pub struct PivotRow {
    pub year: i32,
    pub gender: Gender,
    pub cells: [Option<f64>; 3],
}

impl PivotRow {
    pub fn cell(&self, method: PaymentMethod) -> Option<f64> {
        self.cells[method.index()]
    }

    /// Bar label, e.g. `2022 Female`.
    pub fn label(&self) -> String {
        format!("{} {}", self.year, self.gender)
    }
}

/// Mean value per (year, gender, payment method), pivoted so every row has a
/// column for each of [`PaymentMethod::ALL`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PivotTable {
    pub rows: Vec<PivotRow>,
}

impl PivotTable {
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Methods with at least one value anywhere in the table.
    pub fn observed_methods(&self) -> Vec<PaymentMethod> {
        PaymentMethod::ALL
            .into_iter()
            .filter(|m| self.rows.iter().any(|r| r.cell(*m).is_some()))
            .collect()
    }

    /// Every present cell, row by row.
    pub fn present_cells(&self) -> impl Iterator<Item = (&PivotRow, PaymentMethod, f64)> + '_ {
        self.rows.iter().flat_map(|row| {
            PaymentMethod::ALL
                .into_iter()
                .filter_map(move |m| row.cell(m).map(|v| (row, m, v)))
        })
    }
}

#[derive(Default, Clone, Copy)]
struct MeanAcc {
    sum: f64,
    count: usize,
}

impl MeanAcc {
    fn push(&mut self, v: f64) {
        self.sum += v;
        self.count += 1;
    }

    fn mean(self) -> Option<f64> {
        (self.count > 0).then(|| self.sum / self.count as f64)
    }
}

/// Group the transactions at `indices` by (year, gender, payment method),
/// average their value, and pivot payment method into columns.
pub fn aggregate(dataset: &Dataset, indices: &[usize]) -> PivotTable {
    let mut groups: BTreeMap<(i32, Gender), [MeanAcc; 3]> = BTreeMap::new();

    for &i in indices {
        let Some(tx) = dataset.transactions.get(i) else {
            continue;
        };
        groups.entry((tx.invoice_year, tx.gender)).or_default()[tx.payment_method.index()]
            .push(tx.value());
    }

    let rows = groups
        .into_iter()
        .map(|((year, gender), accs)| PivotRow {
            year,
            gender,
            cells: accs.map(MeanAcc::mean),
        })
        .collect();

    PivotTable { rows }
}
