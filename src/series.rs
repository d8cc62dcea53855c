//! Read-only projections of a history page for the table and the chart.
//!
//! The table shows newest-first regardless of how the backend ordered the
//! page; the chart plots the samples exactly as delivered so the line
//! follows the server's ordering.

use chrono::{DateTime, Local};

use crate::types::HistorySample;

/// One rendered table row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableRow {
    pub time: String,
    pub amount: String,
}

pub const NO_DATA: &str = "no data";

/// Table projection: samples sorted descending by time. An empty page
/// yields exactly one placeholder row.
pub fn table_rows(samples: &[HistorySample]) -> Vec<TableRow> {
    if samples.is_empty() {
        return vec![TableRow {
            time: NO_DATA.to_string(),
            amount: NO_DATA.to_string(),
        }];
    }

    let mut sorted: Vec<&HistorySample> = samples.iter().collect();
    // Secondary key keeps the order identical across input permutations
    // even when two samples share a timestamp.
    sorted.sort_by(|a, b| b.time.cmp(&a.time).then_with(|| b.amount.cmp(&a.amount)));
    sorted
        .into_iter()
        .map(|s| TableRow {
            time: format_timestamp(s),
            amount: s.amount.to_string(),
        })
        .collect()
}

/// Chart projection: `(time, amount)` pairs in server-delivered order.
pub fn chart_points(samples: &[HistorySample]) -> Vec<(f64, f64)> {
    samples
        .iter()
        .map(|s| (s.time as f64, s.amount as f64))
        .collect()
}

/// X-axis bounds spanning all plotted times, widened a little when the page
/// holds a single sample so the chart still has a drawable domain.
pub fn x_bounds(points: &[(f64, f64)]) -> [f64; 2] {
    let min = points.iter().map(|p| p.0).fold(f64::INFINITY, f64::min);
    let max = points.iter().map(|p| p.0).fold(f64::NEG_INFINITY, f64::max);
    if !min.is_finite() || !max.is_finite() {
        return [0.0, 1.0];
    }
    if min == max {
        return [min - 1.0, max + 1.0];
    }
    [min, max]
}

/// Y-axis bounds from zero to the highest count, padded by one so the top
/// of the line never touches the frame.
pub fn y_bounds(points: &[(f64, f64)]) -> [f64; 2] {
    let max = points.iter().map(|p| p.1).fold(0.0_f64, f64::max);
    [0.0, max + 1.0]
}

/// Integer tick labels for the Y axis: low, middle, high. Counts are whole
/// people, so no decimals.
pub fn y_labels(bounds: [f64; 2]) -> Vec<String> {
    let mid = (bounds[0] + bounds[1]) / 2.0;
    vec![
        format!("{:.0}", bounds[0]),
        format!("{:.0}", mid.round()),
        format!("{:.0}", bounds[1]),
    ]
}

/// Date + time-of-day tick labels for the X axis at the left edge, middle
/// and right edge of the domain.
pub fn x_labels(bounds: [f64; 2]) -> Vec<String> {
    let mid = (bounds[0] + bounds[1]) / 2.0;
    [bounds[0], mid, bounds[1]]
        .iter()
        .map(|&ms| format_axis_time(ms as i64))
        .collect()
}

/// Full table rendering of a sample's moment: localized date plus
/// time-of-day. Out-of-range timestamps render as a literal marker instead
/// of failing the whole row.
pub fn format_timestamp(sample: &HistorySample) -> String {
    match sample.timestamp() {
        Some(dt) => format_local(dt),
        None => "invalid time".to_string(),
    }
}

fn format_local(dt: DateTime<Local>) -> String {
    dt.format("%d-%m-%Y %H:%M").to_string()
}

fn format_axis_time(ms: i64) -> String {
    match (HistorySample { time: ms, amount: 0 }).timestamp() {
        Some(dt) => dt.format("%d-%m %H:%M").to_string(),
        None => "?".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample(time: i64, amount: u64) -> HistorySample {
        HistorySample { time, amount }
    }

    #[test]
    fn table_is_sorted_descending_by_time() {
        let samples = vec![sample(100, 3), sample(50, 1)];
        let rows = table_rows(&samples);
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].amount, "3");
        assert_eq!(rows[1].amount, "1");
    }

    #[test]
    fn table_order_is_permutation_invariant() {
        let a = vec![sample(10, 1), sample(30, 3), sample(20, 2)];
        let b = vec![sample(30, 3), sample(20, 2), sample(10, 1)];
        let c = vec![sample(20, 2), sample(10, 1), sample(30, 3)];
        let expected = table_rows(&a);
        assert_eq!(table_rows(&b), expected);
        assert_eq!(table_rows(&c), expected);
        assert_eq!(
            expected.iter().map(|r| r.amount.as_str()).collect::<Vec<_>>(),
            vec!["3", "2", "1"]
        );
    }

    #[test]
    fn duplicate_timestamps_still_order_deterministically() {
        let a = vec![sample(10, 2), sample(10, 5), sample(20, 1)];
        let b = vec![sample(10, 5), sample(20, 1), sample(10, 2)];
        assert_eq!(table_rows(&a), table_rows(&b));
    }

    #[test]
    fn empty_page_renders_exactly_one_placeholder_row() {
        let rows = table_rows(&[]);
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].time, NO_DATA);
        assert_eq!(rows[0].amount, NO_DATA);
    }

    #[test]
    fn chart_keeps_server_order() {
        let samples = vec![sample(100, 3), sample(50, 1)];
        let points = chart_points(&samples);
        assert_eq!(points, vec![(100.0, 3.0), (50.0, 1.0)]);
    }

    #[test]
    fn table_and_chart_disagree_on_order_by_design() {
        // The end-to-end shape from the pager contract: table newest-first,
        // chart untouched.
        let samples = vec![sample(100, 3), sample(50, 1)];
        let rows = table_rows(&samples);
        let points = chart_points(&samples);
        assert_eq!(rows[0].amount, "3");
        assert_eq!(points[0], (100.0, 3.0));
        assert_eq!(points[1], (50.0, 1.0));
    }

    #[test]
    fn x_bounds_span_the_data() {
        let points = chart_points(&[sample(50, 1), sample(100, 3), sample(75, 2)]);
        assert_eq!(x_bounds(&points), [50.0, 100.0]);
    }

    #[test]
    fn x_bounds_widen_single_sample_domain() {
        let points = chart_points(&[sample(60, 4)]);
        assert_eq!(x_bounds(&points), [59.0, 61.0]);
        assert_eq!(x_bounds(&[]), [0.0, 1.0]);
    }

    #[test]
    fn y_axis_is_integer_labelled_from_zero() {
        let points = chart_points(&[sample(1, 7), sample(2, 3)]);
        let bounds = y_bounds(&points);
        assert_eq!(bounds, [0.0, 8.0]);
        for label in y_labels(bounds) {
            assert!(!label.contains('.'), "unexpected decimal in {label}");
        }
    }

    #[test]
    fn invalid_timestamp_formats_as_marker() {
        let row = format_timestamp(&sample(i64::MAX, 1));
        assert_eq!(row, "invalid time");
    }

    #[test]
    fn axis_has_three_time_labels() {
        let points = chart_points(&[sample(1_700_000_000_000, 1), sample(1_700_000_600_000, 2)]);
        let labels = x_labels(x_bounds(&points));
        assert_eq!(labels.len(), 3);
        assert!(labels.iter().all(|l| !l.is_empty()));
    }
}
