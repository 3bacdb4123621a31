// Formats a `FilterSummary` for display and export: labeled metric rows for
// the console, a key-labeled structure for JSON, and pie slices for the
// reason breakdown.
use crate::filter::FilterSummary;
use crate::util::{format_int, format_number};
use serde::Serialize;
use tabled::Tabled;

/// Marker rendered when an average is undefined (e.g. no surviving rows).
pub const NOT_AVAILABLE: &str = "n/a";

/// One labeled metric of the summary table.
#[derive(Debug, Clone, Serialize, Tabled)]
pub struct MetricRow {
    #[serde(rename = "Metric")]
    #[tabled(rename = "Metric")]
    pub metric: String,
    #[serde(rename = "Value")]
    #[tabled(rename = "Value")]
    pub value: String,
}

fn metric(metric: &str, value: String) -> MetricRow {
    MetricRow {
        metric: metric.to_string(),
        value,
    }
}

fn format_avg(avg: Option<f64>) -> String {
    avg.map(|v| format_number(v, 2))
        .unwrap_or_else(|| NOT_AVAILABLE.to_string())
}

/// The summary as ordered, human-labeled metric rows. Absent averages
/// render as [`NOT_AVAILABLE`], never as zero.
pub fn summary_rows(summary: &FilterSummary) -> Vec<MetricRow> {
    vec![
        metric("Total Reviews", format_int(summary.total_reviews)),
        metric("Filtered Reviews", format_int(summary.filtered_reviews)),
        metric("Dropped Reviews", format_int(summary.dropped_reviews)),
        metric(
            "Percent Filtered",
            format!("{}%", format_number(summary.percent_filtered, 2)),
        ),
        metric("Avg Rating Before", format_avg(summary.avg_rating_before)),
        metric("Avg Rating After", format_avg(summary.avg_rating_after)),
    ]
}

/// One reason tally. Tallies are independent per reason, so they may sum to
/// more than the dropped total.
#[derive(Debug, Clone, Serialize, Tabled)]
pub struct ReasonRow {
    #[serde(rename = "Filter Reason")]
    #[tabled(rename = "Filter Reason")]
    pub reason: String,
    #[serde(rename = "Rows Matching")]
    #[tabled(rename = "Rows Matching")]
    pub count: String,
}

/// Every active reason in build order, zero tallies included.
pub fn reason_rows(summary: &FilterSummary) -> Vec<ReasonRow> {
    summary
        .reason_counts
        .iter()
        .map(|rc| ReasonRow {
            reason: rc.reason.label().to_string(),
            count: format_int(rc.count),
        })
        .collect()
}

/// One slice of the reason-breakdown pie.
#[derive(Debug, Clone, Serialize, Tabled)]
pub struct PieSlice {
    #[serde(rename = "Reason")]
    #[tabled(rename = "Reason")]
    pub label: String,
    #[serde(rename = "Count")]
    #[tabled(rename = "Count")]
    pub count: usize,
    #[serde(rename = "Share")]
    #[tabled(rename = "Share")]
    pub share: String,
}

/// Pie slices for the reason breakdown: zero-count reasons are excluded
/// (they break percentage legends), and shares are percentages of the
/// nonzero tally total. Empty when nothing was dropped, which is a valid
/// "nothing to show" state.
pub fn pie_slices(summary: &FilterSummary) -> Vec<PieSlice> {
    let nonzero: Vec<_> = summary
        .reason_counts
        .iter()
        .filter(|rc| rc.count > 0)
        .collect();
    let total: usize = nonzero.iter().map(|rc| rc.count).sum();
    if total == 0 {
        return Vec::new();
    }
    nonzero
        .into_iter()
        .map(|rc| PieSlice {
            label: rc.reason.label().to_string(),
            count: rc.count,
            share: format!("{:.1}%", rc.count as f64 / total as f64 * 100.0),
        })
        .collect()
}

#[derive(Debug, Clone, Serialize)]
pub struct ReasonExport {
    #[serde(rename = "Reason")]
    pub reason: String,
    #[serde(rename = "Count")]
    pub count: usize,
}

/// The summary under its stable display labels, safe to serialize or
/// print. Reason counts stay ordered; absent averages serialize as null.
#[derive(Debug, Clone, Serialize)]
pub struct SummaryExport {
    #[serde(rename = "Total Reviews")]
    pub total_reviews: usize,
    #[serde(rename = "Filtered Reviews")]
    pub filtered_reviews: usize,
    #[serde(rename = "Dropped Reviews")]
    pub dropped_reviews: usize,
    #[serde(rename = "Percent Filtered")]
    pub percent_filtered: f64,
    #[serde(rename = "Avg Rating Before")]
    pub avg_rating_before: Option<f64>,
    #[serde(rename = "Avg Rating After")]
    pub avg_rating_after: Option<f64>,
    #[serde(rename = "Filter Reason Counts")]
    pub filter_reason_counts: Vec<ReasonExport>,
}

pub fn export(summary: &FilterSummary) -> SummaryExport {
    SummaryExport {
        total_reviews: summary.total_reviews,
        filtered_reviews: summary.filtered_reviews,
        dropped_reviews: summary.dropped_reviews,
        percent_filtered: summary.percent_filtered,
        avg_rating_before: summary.avg_rating_before,
        avg_rating_after: summary.avg_rating_after,
        filter_reason_counts: summary
            .reason_counts
            .iter()
            .map(|rc| ReasonExport {
                reason: rc.reason.label().to_string(),
                count: rc.count,
            })
            .collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::filter::{DropReason, ReasonCount};
    use pretty_assertions::assert_eq;

    fn summary_with(reasons: Vec<ReasonCount>) -> FilterSummary {
        FilterSummary {
            total_reviews: 4,
            filtered_reviews: 2,
            dropped_reviews: 2,
            percent_filtered: 50.0,
            avg_rating_before: Some(3.0),
            avg_rating_after: None,
            reason_counts: reasons,
        }
    }

    #[test]
    fn summary_rows_use_stable_labels_and_na_markers() {
        let rows = summary_rows(&summary_with(Vec::new()));
        let labels: Vec<&str> = rows.iter().map(|r| r.metric.as_str()).collect();
        assert_eq!(
            labels,
            vec![
                "Total Reviews",
                "Filtered Reviews",
                "Dropped Reviews",
                "Percent Filtered",
                "Avg Rating Before",
                "Avg Rating After",
            ]
        );
        assert_eq!(rows[3].value, "50.00%");
        assert_eq!(rows[4].value, "3.00");
        assert_eq!(rows[5].value, NOT_AVAILABLE);
    }

    #[test]
    fn reason_rows_keep_zero_tallies() {
        let rows = reason_rows(&summary_with(vec![
            ReasonCount {
                reason: DropReason::RatingBelowMin,
                count: 2,
            },
            ReasonCount {
                reason: DropReason::TextTooShort,
                count: 0,
            },
        ]));
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].reason, "Rating Below Min");
        assert_eq!(rows[1].reason, "Text Too Short");
        assert_eq!(rows[1].count, "0");
    }

    #[test]
    fn pie_slices_skip_zero_counts_and_share_the_nonzero_total() {
        let slices = pie_slices(&summary_with(vec![
            ReasonCount {
                reason: DropReason::RatingBelowMin,
                count: 3,
            },
            ReasonCount {
                reason: DropReason::TextTooShort,
                count: 0,
            },
            ReasonCount {
                reason: DropReason::AfterEndMonth,
                count: 1,
            },
        ]));
        assert_eq!(slices.len(), 2);
        assert_eq!(slices[0].label, "Rating Below Min");
        assert_eq!(slices[0].share, "75.0%");
        assert_eq!(slices[1].share, "25.0%");
    }

    #[test]
    fn pie_slices_are_empty_when_nothing_was_dropped() {
        let slices = pie_slices(&summary_with(vec![ReasonCount {
            reason: DropReason::RatingBelowMin,
            count: 0,
        }]));
        assert!(slices.is_empty());
    }

    #[test]
    fn export_serializes_under_display_labels() {
        let exported = export(&summary_with(vec![ReasonCount {
            reason: DropReason::RatingBelowMin,
            count: 2,
        }]));
        let json = serde_json::to_value(&exported).unwrap();
        assert_eq!(json["Total Reviews"], 4);
        assert_eq!(json["Avg Rating After"], serde_json::Value::Null);
        assert_eq!(json["Filter Reason Counts"][0]["Reason"], "Rating Below Min");
        assert_eq!(json["Filter Reason Counts"][0]["Count"], 2);
    }
}
