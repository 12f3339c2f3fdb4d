use super::aggregate::PivotTable;
use super::filter::FilterSelection;
use super::model::{Gender, PaymentMethod};

/// Summary statistics shown under the chart.
///
/// All means are taken over the pivot's cells (one per year/gender/method
/// group), not over raw transactions. `None` renders as "no data".
#[derive(Debug, Clone, PartialEq)]
pub struct SummaryStats {
    pub overall: Option<f64>,
    pub by_payment: Vec<(PaymentMethod, Option<f64>)>,
    pub by_gender: Vec<(Gender, Option<f64>)>,
    /// Present only while the category filter is active.
    pub by_category: Option<(String, Option<f64>)>,
    /// Present only while the mall filter is active.
    pub by_mall: Option<(String, Option<f64>)>,
}

fn mean(values: impl IntoIterator<Item = f64>) -> Option<f64> {
    let (sum, count) = values
        .into_iter()
        .fold((0.0, 0usize), |(s, n), v| (s + v, n + 1));
    (count > 0).then(|| sum / count as f64)
}

impl SummaryStats {
    pub fn compute(pivot: &PivotTable, selection: &FilterSelection) -> Self {
        let overall = mean(pivot.present_cells().map(|(_, _, v)| v));

        let by_payment = PaymentMethod::ALL
            .into_iter()
            .map(|m| (m, mean(pivot.rows.iter().filter_map(|r| r.cell(m)))))
            .collect();

        let by_gender = Gender::ALL
            .into_iter()
            .map(|g| {
                let cells = pivot
                    .present_cells()
                    .filter(|(row, _, _)| row.gender == g)
                    .map(|(_, _, v)| v);
                (g, mean(cells))
            })
            .collect();

        // With the filter active every pivot cell belongs to the one
        // selected value, so its group mean is the overall mean.
        let by_category = selection.category.clone().map(|c| (c, overall));
        let by_mall = selection.mall.clone().map(|m| (m, overall));

        SummaryStats {
            overall,
            by_payment,
            by_gender,
            by_category,
            by_mall,
        }
    }

    pub fn has_data(&self) -> bool {
        self.overall.is_some()
    }
}
