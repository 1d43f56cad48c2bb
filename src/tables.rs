//! Terminal tables for the metrics records.

use analytics::{IntervalSummary, SignalMetrics, SpreadSummary, TradeMetrics};
use comfy_table::presets::UTF8_FULL;
use comfy_table::{Cell, CellAlignment, ContentArrangement, Table};

fn new_table(header: Vec<&str>) -> Table {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(header);
    table
}

fn number(value: f64) -> Cell {
    let text = if value.is_nan() {
        "-".to_string()
    } else {
        format!("{value:.3}")
    };
    Cell::new(text).set_alignment(CellAlignment::Right)
}

fn count(value: usize) -> Cell {
    Cell::new(value).set_alignment(CellAlignment::Right)
}

pub fn signal_metrics_table(metrics: &[SignalMetrics]) -> Table {
    let mut table = new_table(vec![
        "Window", "Threshold", "Intervals", "Mean (s)", "Median (s)", "Std Dev", "Max (s)", "Min (s)",
        "< 1s", "= 1s", "2-5s", "<= 10s",
    ]);
    for m in metrics {
        table.add_row(vec![
            count(m.rolling_mean_window),
            Cell::new(m.threshold),
            count(m.interval_count),
            number(m.durations.mean),
            number(m.durations.median),
            number(m.durations.std_dev),
            number(m.durations.max),
            number(m.durations.min),
            count(m.buckets.within_1_sec),
            count(m.buckets.in_1_sec),
            count(m.buckets.in_2_to_5_secs),
            count(m.buckets.within_10_secs),
        ]);
    }
    table
}

pub fn trade_metrics_table(metrics: &[TradeMetrics]) -> Table {
    let mut table = new_table(vec![
        "Window", "Threshold", "Trades", "Average (s)", "Median (s)", "Std Dev", "Max (s)", "Min (s)",
    ]);
    for m in metrics {
        table.add_row(vec![
            count(m.rolling_mean_window),
            Cell::new(m.threshold),
            count(m.trade_count),
            number(m.average_duration),
            number(m.durations.median),
            number(m.durations.std_dev),
            number(m.durations.max),
            number(m.durations.min),
        ]);
    }
    table
}

pub fn interval_summary_table(summary: &IntervalSummary) -> Table {
    let mut table = new_table(vec![
        "Intervals", "Mean (s)", "Median (s)", "Std Dev", "Max (s)", "Min (s)", "< 1s", "= 1s", "2-5s",
        "<= 10s",
    ]);
    table.add_row(vec![
        count(summary.interval_count),
        number(summary.durations.mean),
        number(summary.durations.median),
        number(summary.durations.std_dev),
        number(summary.durations.max),
        number(summary.durations.min),
        count(summary.buckets.within_1_sec),
        count(summary.buckets.in_1_sec),
        count(summary.buckets.in_2_to_5_secs),
        count(summary.buckets.within_10_secs),
    ]);
    table
}

pub fn spread_summary_table(summary: &SpreadSummary) -> Table {
    let (low, high) = summary.two_sigma_range;
    let mut table = new_table(vec!["Statistic", "Value"]);
    for (name, value) in [
        ("Mean", summary.mean_spread),
        ("Median", summary.median_spread),
        ("Std Dev", summary.std_spread),
        ("Min", summary.min_spread),
        ("Max", summary.max_spread),
        ("Mean - 2σ", low),
        ("Mean + 2σ", high),
    ] {
        let text = if value.is_nan() { "-".to_string() } else { format!("{value:.6}") };
        table.add_row(vec![Cell::new(name), Cell::new(text).set_alignment(CellAlignment::Right)]);
    }
    table.add_row(vec![Cell::new("Observations"), count(summary.total_count)]);
    table
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_interval_summary_renders_dashes_and_zero_buckets() {
        let summary = analytics::AnalyticsEngine::new().interval_summary(&[]).unwrap();
        let rendered = interval_summary_table(&summary).to_string();
        assert!(rendered.contains("2-5s"));
        assert!(rendered.contains('-'));
        assert!(!rendered.contains("NaN"));
    }
}
