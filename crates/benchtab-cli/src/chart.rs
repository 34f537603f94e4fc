//! ASCII bar charts of mean time and throughput, one block per payload bucket.

use std::cmp::Ordering;
use std::fmt::Write as _;

use benchtab_core::{
    Baseline, BenchCase, Bucket, DEFAULT_BAR_WIDTH, Delta, Series, fmt_bytes, fmt_seconds,
    group_by_bucket, human_bar,
};

/// Chart rendering controls.
#[derive(Debug, Clone, Copy)]
pub struct ChartOptions {
    pub bar_width: usize,
}

impl Default for ChartOptions {
    fn default() -> Self {
        Self {
            bar_width: DEFAULT_BAR_WIDTH,
        }
    }
}

impl ChartOptions {
    pub fn with_bar_width(mut self, bar_width: usize) -> Self {
        self.bar_width = bar_width;
        self
    }
}

struct ChartRow<'a> {
    case: &'a BenchCase,
    value: f64,
    delta: Delta,
}

fn collect_rows<'a>(
    cases: &[&'a BenchCase],
    series: Series<'_>,
    baseline: Option<&Baseline>,
) -> Vec<ChartRow<'a>> {
    cases
        .iter()
        .filter_map(|&case| {
            let value = series.mean_of(case)?;
            let delta = baseline.map_or(Delta::Missing, |baseline| baseline.delta(case, series));
            Some(ChartRow { case, value, delta })
        })
        .collect()
}

fn write_rows(
    out: &mut String,
    rows: &[ChartRow<'_>],
    options: &ChartOptions,
    format_value: impl Fn(f64) -> String,
) {
    let max_value = rows.iter().map(|row| row.value).fold(f64::MIN, f64::max);
    for row in rows {
        let bar = human_bar(row.value, max_value, options.bar_width);
        let _ = writeln!(
            out,
            "{}  {}  {:>9}  {}",
            format_value(row.value),
            bar,
            row.delta.render(),
            row.case.name
        );
    }
}

/// Render the time and throughput charts for one bucket.
pub fn render_bucket(
    out: &mut String,
    bucket: Bucket,
    cases: &[&BenchCase],
    baseline: Option<&Baseline>,
    options: &ChartOptions,
) {
    if cases.is_empty() {
        return;
    }
    let _ = write!(out, "\n{}\n\n", bucket.title());

    let mut time_rows = collect_rows(cases, Series::Time, baseline);
    if !time_rows.is_empty() {
        time_rows.sort_by(|a, b| a.value.partial_cmp(&b.value).unwrap_or(Ordering::Equal));
        out.push_str("Mean time (lower is better)\n\n");
        write_rows(out, &time_rows, options, |value| {
            format!("{:>10}", fmt_seconds(value))
        });
    }

    let mut throughput_rows = collect_rows(cases, Series::Throughput, baseline);
    if !throughput_rows.is_empty() {
        throughput_rows.sort_by(|a, b| b.value.partial_cmp(&a.value).unwrap_or(Ordering::Equal));
        out.push_str("\nMean throughput (higher is better)\n\n");
        write_rows(out, &throughput_rows, options, |value| {
            format!("{:>10}/s", fmt_bytes(value))
        });
    }
}

/// Render every non-empty bucket in display order.
pub fn render_charts(
    cases: &[BenchCase],
    baseline: Option<&Baseline>,
    options: &ChartOptions,
) -> String {
    let mut out = String::new();
    for (bucket, members) in group_by_bucket(cases) {
        tracing::debug!(
            component = "chart",
            operation = "render_bucket",
            bucket = %bucket,
            cases = members.len(),
            "Rendering bucket"
        );
        render_bucket(&mut out, bucket, &members, baseline, options);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use benchtab_core::StatRow;

    fn case(name: &str, time_mean: Option<f64>, throughput_mean: Option<f64>) -> BenchCase {
        let mut case = BenchCase::new(
            name,
            None,
            StatRow {
                mean: time_mean,
                ..StatRow::default()
            },
        );
        case.throughput_bps.mean = throughput_mean;
        case
    }

    #[test]
    fn renders_sorted_tables_with_bars() {
        let cases = vec![
            case("a server: Small, client: Small", Some(0.5), Some(1024.0)),
            case("b server: Small, client: Small", Some(0.25), Some(2048.0)),
        ];
        let text = render_charts(&cases, None, &ChartOptions::default().with_bar_width(4));
        let expected = [
            "",
            "Payload group: small / small",
            "",
            "Mean time (lower is better)",
            "",
            "    250 ms  ██    ",
            "    500 ms  ████  ",
            "",
            "Mean throughput (higher is better)",
            "",
            "      2 KB/s  ████  ",
            "      1 KB/s  ██    ",
        ];
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), expected.len());
        for (line, prefix) in lines.iter().zip(expected) {
            assert!(line.starts_with(prefix), "{line:?} should start with {prefix:?}");
        }
        assert!(lines[5].ends_with("  b server: Small, client: Small"));
        assert!(lines[10].ends_with("  b server: Small, client: Small"));
    }

    #[test]
    fn delta_column_reflects_baseline() {
        let cases = vec![
            case("fast server: Large, client: Large", Some(0.3), None),
            case("new server: Large, client: Large", Some(0.6), None),
            case("zero server: Large, client: Large", Some(0.9), None),
        ];
        let baseline = Baseline::from_json_str(
            r#"{"cases": [
                {"name": "fast server: Large, client: Large", "time_s": {"mean": 0.2}},
                {"name": "zero server: Large, client: Large", "time_s": {"mean": 0.0}}
            ]}"#,
        )
        .unwrap();
        let text = render_charts(&cases, Some(&baseline), &ChartOptions::default());
        let rows: Vec<&str> = text.lines().filter(|line| line.contains("server:")).collect();
        assert_eq!(rows.len(), 3);
        assert!(rows[0].contains("    +50.00%  fast"));
        assert!(rows[1].ends_with(&format!("  {:>9}  new server: Large, client: Large", "")));
        assert!(rows[2].contains("        n/a  zero"));
        assert!(!text.contains("Mean throughput"));
    }

    #[test]
    fn cases_without_means_are_left_out() {
        let cases = vec![
            case("x server: Small, client: Large", None, Some(10.0)),
            case("y server: Large, client: Small", Some(1.0), None),
        ];
        let text = render_charts(&cases, None, &ChartOptions::default());
        let time_at = text.find("Mean time").unwrap();
        let throughput_at = text.find("Mean throughput").unwrap();
        let time_block = &text[time_at..throughput_at];
        assert!(time_block.contains("y server"));
        assert!(!time_block.contains("x server"));
        assert!(text[throughput_at..].contains("10 B/s"));
        assert!(text.starts_with("\nPayload group: small / big or big / small\n\n"));
    }

    #[test]
    fn buckets_print_in_display_order() {
        let cases = vec![
            case("unknown", Some(1.0), None),
            case("server: Large, client: Large", Some(1.0), None),
            case("server: Small, client: Small", Some(1.0), None),
        ];
        let text = render_charts(&cases, None, &ChartOptions::default());
        let small = text.find("Payload group: small / small").unwrap();
        let big = text.find("Payload group: big / big").unwrap();
        let unknown = text.find("Payload group: unknown").unwrap();
        assert!(small < big && big < unknown);
        assert!(!text.contains("small / big or big / small"));
    }
}
