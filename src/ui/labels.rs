use crate::data::filter::FilterSelection;
use crate::data::summary::SummaryStats;

pub const NO_DATA: &str = "no data";

/// `₺ 150.00`
pub fn format_currency(symbol: &str, value: f64) -> String {
    format!("{symbol} {value:.2}")
}

pub fn format_optional(symbol: &str, value: Option<f64>) -> String {
    value.map_or_else(|| NO_DATA.to_string(), |v| format_currency(symbol, v))
}

/// Chart title for the active filters. The age filter replaces the base
/// clause; category and mall are appended in that order.
pub fn chart_title(base: &str, filters: &FilterSelection) -> String {
    let mut title = match filters.age {
        Some(age) => format!(
            "Average Spending of {age}-Year-Old Consumers at Shopping Mall in Istanbul, Turkey"
        ),
        None => base.to_string(),
    };
    if let Some(category) = &filters.category {
        title.push_str(&format!(" - Category: {category}"));
    }
    if let Some(mall) = &filters.mall {
        title.push_str(&format!(" - Shopping Mall: {mall}"));
    }
    title
}

/// A titled block of `label: value` lines.
#[derive(Debug, Clone, PartialEq)]
pub struct SummaryBlock {
    pub heading: String,
    pub lines: Vec<(String, String)>,
}

/// Text blocks for the summary panel, in display order.
pub fn summary_blocks(stats: &SummaryStats, symbol: &str) -> Vec<SummaryBlock> {
    let mut blocks = vec![
        SummaryBlock {
            heading: "Overall average spending".to_string(),
            lines: vec![("All".to_string(), format_optional(symbol, stats.overall))],
        },
        SummaryBlock {
            heading: "Average spending by payment method".to_string(),
            lines: stats
                .by_payment
                .iter()
                .map(|(m, v)| (m.to_string(), format_optional(symbol, *v)))
                .collect(),
        },
        SummaryBlock {
            heading: "Average spending by gender".to_string(),
            lines: stats
                .by_gender
                .iter()
                .map(|(g, v)| (g.to_string(), format_optional(symbol, *v)))
                .collect(),
        },
    ];
    if let Some((category, v)) = &stats.by_category {
        blocks.push(SummaryBlock {
            heading: "Average spending by category".to_string(),
            lines: vec![(category.clone(), format_optional(symbol, *v))],
        });
    }
    if let Some((mall, v)) = &stats.by_mall {
        blocks.push(SummaryBlock {
            heading: "Average spending by shopping mall".to_string(),
            lines: vec![(mall.clone(), format_optional(symbol, *v))],
        });
    }
    blocks
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::DEFAULT_BASE_TITLE;
    use crate::data::aggregate::PivotTable;

    #[test]
    fn currency_has_two_decimals_and_prefix() {
        assert_eq!(format_currency("₺", 150.0), "₺ 150.00");
        assert_eq!(format_currency("₺", 1234.5678), "₺ 1234.57");
        assert_eq!(format_optional("₺", None), NO_DATA);
    }

    #[test]
    fn title_without_filters_is_base() {
        assert_eq!(chart_title(DEFAULT_BASE_TITLE, &FilterSelection::default()), DEFAULT_BASE_TITLE);
    }

    #[test]
    fn title_suffix_order() {
        let sel = FilterSelection {
            age: None,
            category: Some("Books".into()),
            mall: Some("Kanyon".into()),
        };
        assert_eq!(
            chart_title(DEFAULT_BASE_TITLE, &sel),
            format!("{DEFAULT_BASE_TITLE} - Category: Books - Shopping Mall: Kanyon")
        );
    }

    #[test]
    fn age_replaces_base_clause() {
        let sel = FilterSelection {
            age: Some(35),
            category: None,
            mall: Some("Kanyon".into()),
        };
        assert_eq!(
            chart_title(DEFAULT_BASE_TITLE, &sel),
            "Average Spending of 35-Year-Old Consumers at Shopping Mall in Istanbul, Turkey - Shopping Mall: Kanyon"
        );
    }

    #[test]
    fn empty_stats_print_no_data() {
        let sel = FilterSelection {
            age: Some(22),
            category: Some("Toys".into()),
            mall: None,
        };
        let stats = SummaryStats::compute(&PivotTable::default(), &sel);
        let blocks = summary_blocks(&stats, "₺");
        assert_eq!(blocks.len(), 4);
        assert_eq!(blocks[3].heading, "Average spending by category");
        assert!(blocks
            .iter()
            .flat_map(|b| b.lines.iter())
            .all(|(_, v)| v == NO_DATA));
    }
}
