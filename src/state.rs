use std::path::Path;

use crate::color::PaymentColors;
use crate::config::DashboardConfig;
use crate::data::aggregate::{aggregate, PivotTable};
use crate::data::cache::DatasetCache;
use crate::data::filter::{filtered_indices, FilterSelection};
use crate::data::model::Dataset;
use crate::data::summary::SummaryStats;
use crate::error::DataError;

// ---------------------------------------------------------------------------
// DashboardView – the result of one filter → aggregate → summarise run
// ---------------------------------------------------------------------------

/// Everything the renderer needs for the current selection.
#[derive(Debug, Clone, PartialEq)]
pub struct DashboardView {
    /// Indices of transactions passing the current filters.
    pub visible_indices: Vec<usize>,
    pub pivot: PivotTable,
    pub summary: SummaryStats,
}

impl DashboardView {
    pub fn compute(dataset: &Dataset, selection: &FilterSelection) -> Self {
        let visible_indices = filtered_indices(dataset, selection);
        let pivot = aggregate(dataset, &visible_indices);
        let summary = SummaryStats::compute(&pivot, selection);
        log::debug!(
            "Pipeline run: {selection:?} → {} rows, {} pivot rows, methods {:?}",
            visible_indices.len(),
            pivot.rows.len(),
            pivot.observed_methods()
        );
        DashboardView {
            visible_indices,
            pivot,
            summary,
        }
    }

    /// `Err(EmptyResultSet)` when nothing matched.
    pub fn check_non_empty(&self) -> Result<(), DataError> {
        if self.visible_indices.is_empty() {
            Err(DataError::EmptyResultSet)
        } else {
            Ok(())
        }
    }
}

// ---------------------------------------------------------------------------
// Application state
// ---------------------------------------------------------------------------

/// The full UI state, independent of rendering.
pub struct AppState {
    pub config: DashboardConfig,

    /// Cleaned dataset (None until a load succeeds).
    pub cache: Option<DatasetCache>,

    /// Current filter selection.
    pub filters: FilterSelection,

    /// Output of the last pipeline run (None without a dataset).
    pub view: Option<DashboardView>,

    pub colors: PaymentColors,

    /// Fatal error from the last load attempt, shown in red.
    pub status_message: Option<String>,

    /// Recoverable notice, e.g. an empty filter result.
    pub notice: Option<String>,
}

impl AppState {
    pub fn new(config: DashboardConfig) -> Self {
        Self {
            config,
            cache: None,
            filters: FilterSelection::default(),
            view: None,
            colors: PaymentColors::default(),
            status_message: None,
            notice: None,
        }
    }

    pub fn dataset(&self) -> Option<&Dataset> {
        self.cache.as_ref().map(DatasetCache::dataset)
    }

    /// Load (or replace) the dataset from `path` and reset the filters.
    pub fn open(&mut self, path: &Path) {
        match DatasetCache::load(path) {
            Ok(cache) => {
                if cache.dataset().is_empty() {
                    log::warn!("{} contains no transactions", path.display());
                }
                self.cache = Some(cache);
                self.filters.reset();
                self.status_message = None;
                self.recompute();
            }
            Err(e) => {
                log::error!("Failed to load {}: {e}", path.display());
                self.status_message = Some(format!("Error: {e}"));
            }
        }
    }

    /// Load the configured data file.
    pub fn open_configured(&mut self) {
        let path = self.config.data_path.clone();
        self.open(&path);
    }

    /// Force a reload of the current file, keeping filters that still apply.
    pub fn reload(&mut self) {
        let Some(path) = self.cache.as_ref().map(|c| c.path().to_path_buf()) else {
            self.open_configured();
            return;
        };
        match DatasetCache::load(&path) {
            Ok(cache) => {
                self.cache = Some(cache);
                self.after_reload();
            }
            Err(e) => {
                log::error!("Reload of {} failed: {e}", path.display());
                self.status_message = Some(format!("Error: {e}"));
            }
        }
    }

    /// Reload only if the source file changed since it was cached. Returns
    /// `true` when a reload happened (the view is then already recomputed).
    pub fn refresh_if_changed(&mut self) -> bool {
        let Some(cache) = self.cache.as_mut() else {
            return false;
        };
        match cache.refresh() {
            Ok(true) => {
                self.after_reload();
                true
            }
            Ok(false) => false,
            Err(e) => {
                log::error!("Refresh failed, keeping cached data: {e}");
                self.status_message = Some(format!("Error: {e}"));
                false
            }
        }
    }

    fn after_reload(&mut self) {
        self.status_message = None;
        if let Some(ds) = self.cache.as_ref().map(DatasetCache::dataset) {
            if self.filters.retain_known(&ds.distinct) {
                log::info!("Some filter values disappeared after reload; reset to All");
            }
        }
        self.recompute();
    }

    /// Re-run filter → aggregate → summary on the cached dataset.
    pub fn recompute(&mut self) {
        let Some(ds) = self.dataset() else {
            self.view = None;
            return;
        };
        let view = DashboardView::compute(ds, &self.filters);
        self.notice = match view.check_non_empty() {
            Ok(()) => None,
            Err(e) => {
                log::warn!("{e} ({:?})", self.filters);
                Some(e.to_string())
            }
        };
        self.view = Some(view);
    }

    /// Apply a new selection: check the source file, then re-run.
    pub fn set_filters(&mut self, filters: FilterSelection) {
        if filters == self.filters {
            return;
        }
        self.filters = filters;
        if !self.refresh_if_changed() {
            self.recompute();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn state_with(rows: &[&str]) -> (tempfile::TempDir, AppState) {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("data.csv");
        let mut file = std::fs::File::create(&path).unwrap();
        writeln!(file, "gender,age,category,quantity,price,payment_method,invoice_date,shopping_mall").unwrap();
        for row in rows {
            writeln!(file, "{row}").unwrap();
        }
        drop(file);

        let mut state = AppState::new(DashboardConfig {
            data_path: path,
            ..Default::default()
        });
        state.open_configured();
        (dir, state)
    }

    const ROWS: [&str; 5] = [
        "Female,30,Books,1,100.0,Cash,01/02/2022,Kanyon",
        "Female,30,Books,1,200.0,Cash,05/06/2022,Kanyon",
        "Male,45,Toys,2,50.0,Credit Card,01/02/2022,",
        "Male,45,Toys,2,50.0,Credit Card,01/02/2022,",
        "Female,22,Shoes,3,50.0,Debit Card,10/10/2023,Metrocity",
    ];

    #[test]
    fn open_runs_the_pipeline() {
        let (_dir, state) = state_with(&ROWS);
        assert!(state.status_message.is_none());
        let ds = state.dataset().unwrap();
        assert_eq!(ds.len(), 4);
        assert_eq!(ds.duplicates_removed(), 1);
        let view = state.view.as_ref().unwrap();
        assert_eq!(view.visible_indices.len(), 4);
        assert_eq!(view.pivot.rows.len(), 3);
        assert_eq!(view.pivot.rows[0].cells[0], Some(150.0));
    }

    #[test]
    fn same_selection_twice_gives_identical_view() {
        let (_dir, state) = state_with(&ROWS);
        let ds = state.dataset().unwrap();
        let sel = FilterSelection {
            category: Some("Books".into()),
            ..Default::default()
        };
        assert_eq!(DashboardView::compute(ds, &sel), DashboardView::compute(ds, &sel));
    }

    #[test]
    fn empty_combination_sets_notice_not_error() {
        let (_dir, mut state) = state_with(&ROWS);
        state.set_filters(FilterSelection {
            category: Some("Toys".into()),
            ..Default::default()
        });
        assert!(state.notice.is_none());

        // 22 exists in the full dataset but not among Toys buyers
        let mut sel = state.filters.clone();
        sel.age = Some(22);
        state.set_filters(sel);

        let view = state.view.as_ref().unwrap();
        assert!(view.pivot.is_empty());
        assert!(!view.summary.has_data());
        assert!(state.notice.is_some());
        assert!(state.status_message.is_none());
        // options still come from the unfiltered data
        assert!(state.dataset().unwrap().distinct.ages.contains(&30));
    }

    #[test]
    fn reload_resets_filter_values_that_disappeared() {
        let (dir, mut state) = state_with(&ROWS);
        state.set_filters(FilterSelection {
            mall: Some("Metrocity".into()),
            ..Default::default()
        });
        assert_eq!(state.view.as_ref().unwrap().visible_indices.len(), 1);

        // rewrite without Metrocity, with a later mtime
        let path = dir.path().join("data.csv");
        let mut file = std::fs::File::create(&path).unwrap();
        writeln!(file, "gender,age,category,quantity,price,payment_method,invoice_date,shopping_mall").unwrap();
        for row in &ROWS[..4] {
            writeln!(file, "{row}").unwrap();
        }
        let later = std::fs::metadata(&path).unwrap().modified().unwrap()
            + std::time::Duration::from_secs(120);
        file.set_modified(later).unwrap();
        drop(file);

        state.set_filters(FilterSelection {
            mall: Some("Metrocity".into()),
            category: Some("Books".into()),
            ..Default::default()
        });

        assert_eq!(state.filters.mall, None);
        assert_eq!(state.filters.category.as_deref(), Some("Books"));
        assert!(!state.dataset().unwrap().distinct.malls.contains("Metrocity"));
        let view = state.view.as_ref().unwrap();
        assert_eq!(view.visible_indices, vec![0, 1]);
        assert!(state.notice.is_none());
    }

    #[test]
    fn missing_file_sets_status_message() {
        let mut state = AppState::new(DashboardConfig {
            data_path: "/definitely/not/here.csv".into(),
            ..Default::default()
        });
        state.open_configured();
        assert!(state.cache.is_none());
        assert!(state.view.is_none());
        assert!(state.status_message.unwrap().contains("cannot read data file"));
    }
}
