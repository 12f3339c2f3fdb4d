use super::model::{Dataset, DistinctIndex, Transaction};

// ---------------------------------------------------------------------------
// Filter selection: one optional equality predicate per column
// ---------------------------------------------------------------------------

/// The three dashboard filters. `None` means "All" (no restriction).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterSelection {
    pub age: Option<u32>,
    pub category: Option<String>,
    pub mall: Option<String>,
}

impl FilterSelection {
    /// Whether a transaction passes every active filter.
    pub fn matches(&self, tx: &Transaction) -> bool {
        self.age.map_or(true, |age| tx.age == age)
            && self.category.as_deref().map_or(true, |c| tx.category == c)
            && self.mall.as_deref().map_or(true, |m| tx.shopping_mall == m)
    }

    pub fn is_unfiltered(&self) -> bool {
        self.active_count() == 0
    }

    pub fn active_count(&self) -> usize {
        usize::from(self.age.is_some())
            + usize::from(self.category.is_some())
            + usize::from(self.mall.is_some())
    }

    /// Reset all three filters to "All".
    pub fn reset(&mut self) {
        *self = FilterSelection::default();
    }

    /// Drop selections that are no longer offered by `index` (after the
    /// source file changed). Returns `true` if anything was reset.
    pub fn retain_known(&mut self, index: &DistinctIndex) -> bool {
        let mut changed = false;
        if self.age.is_some_and(|a| !index.ages.contains(&a)) {
            self.age = None;
            changed = true;
        }
        if self.category.as_ref().is_some_and(|c| !index.categories.contains(c)) {
            self.category = None;
            changed = true;
        }
        if self.mall.as_ref().is_some_and(|m| !index.malls.contains(m)) {
            self.mall = None;
            changed = true;
        }
        changed
    }
}

/// Return indices of transactions that pass all active filters, in dataset
/// order. An empty result is valid.
pub fn filtered_indices(dataset: &Dataset, selection: &FilterSelection) -> Vec<usize> {
    if selection.is_unfiltered() {
        return (0..dataset.len()).collect();
    }
    dataset
        .transactions
        .iter()
        .enumerate()
        .filter(|(_, tx)| selection.matches(tx))
        .map(|(i, _)| i)
        .collect()
}
