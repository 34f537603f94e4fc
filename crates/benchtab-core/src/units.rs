//! Conversions between report tokens and SI-base numbers.
//!
//! Parsers return `None` for anything they do not recognize; the report
//! format is rendered for humans and a bad cell must never abort a run.

use std::sync::LazyLock;

use regex::Regex;

const SIG_FIGS: i32 = 3;

const TIME_UNITS: &[(&str, f64)] = &[
    ("ns", 1e-9),
    ("\u{00b5}s", 1e-6),
    ("\u{03bc}s", 1e-6),
    ("us", 1e-6),
    ("ms", 1e-3),
    ("s", 1.0),
];

const BYTE_UNITS: &[(&str, f64)] = &[
    ("B", 1.0),
    ("KB", 1024.0),
    ("MB", 1024.0 * 1024.0),
    ("GB", 1024.0 * 1024.0 * 1024.0),
    ("TB", 1024.0 * 1024.0 * 1024.0 * 1024.0),
];

static TIME_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\s*([0-9]+(?:\.[0-9]+)?)\s*([a-zA-Z\x{00b5}\x{03bc}]+)\s*$")
        .expect("time token pattern is valid")
});

static BYTES_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\s*([0-9]+(?:\.[0-9]+)?)\s*([KMGTP]?B)\s*$").expect("byte token pattern is valid")
});

static THROUGHPUT_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\s*([0-9]+(?:\.[0-9]+)?)\s*([KMGTP]?B)/s\s*$")
        .expect("throughput token pattern is valid")
});

static COUNT_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[0-9]+(?:\.[0-9]+)?$").expect("count token pattern is valid"));

fn lookup(unit: &str, table: &[(&str, f64)]) -> Option<f64> {
    table.iter().find(|(u, _)| *u == unit).map(|(_, mul)| *mul)
}

fn scaled(re: &Regex, token: &str, table: &[(&str, f64)]) -> Option<f64> {
    let caps = re.captures(token)?;
    let value: f64 = caps.get(1)?.as_str().parse().ok()?;
    let mul = lookup(caps.get(2)?.as_str(), table)?;
    Some(value * mul)
}

/// Parse a duration such as `12.3 ms` or `850ns` into seconds.
pub fn parse_time_to_seconds(token: &str) -> Option<f64> {
    scaled(&TIME_RE, token, TIME_UNITS)
}

/// Parse a size such as `1.5 MB` into bytes (binary multiples).
pub fn parse_bytes(token: &str) -> Option<f64> {
    scaled(&BYTES_RE, token, BYTE_UNITS)
}

/// Parse a rate such as `80.1 MB/s` into bytes per second.
pub fn parse_throughput(token: &str) -> Option<f64> {
    scaled(&THROUGHPUT_RE, token, BYTE_UNITS)
}

/// Returns true for a bare `digits[.digits]` token.
pub fn is_count_token(token: &str) -> bool {
    COUNT_RE.is_match(token)
}

/// Parse a bare count such as `45` or `45.07`.
pub fn parse_count(token: &str) -> Option<f64> {
    let token = token.trim();
    if !is_count_token(token) {
        return None;
    }
    token.parse().ok()
}

/// Parse a non-negative integer cell (`samples`, `iters`).
pub fn parse_integer(token: &str) -> Option<u64> {
    if token.is_empty() || !token.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    token.parse().ok()
}

/// Round to three significant figures.
fn round_sig(value: f64) -> f64 {
    if value == 0.0 || !value.is_finite() {
        return value;
    }
    let exponent = value.abs().log10().floor() as i32;
    let scale = 10f64.powi(exponent - (SIG_FIGS - 1));
    (value / scale).round() * scale
}

/// Render with three significant figures, trimming trailing zeros like `%g`.
fn fmt_sig(value: f64) -> String {
    if value == 0.0 || !value.is_finite() {
        return format!("{value}");
    }
    let exponent = value.abs().log10().floor() as i32;
    if exponent >= SIG_FIGS {
        return format!("{:.0}", round_sig(value));
    }
    let decimals = (SIG_FIGS - 1 - exponent).max(0) as usize;
    let text = format!("{value:.decimals$}");
    if text.contains('.') {
        text.trim_end_matches('0').trim_end_matches('.').to_string()
    } else {
        text
    }
}

/// A unit fits while the value rounds below 1000 in it.
fn fits_unit(value: f64, limit: f64) -> bool {
    value < limit && round_sig(value) < 1000.0
}

/// Format seconds using the largest of ns/µs/ms/s that keeps the value ≥ 1.
///
/// A value that rounds to 1000 moves up a unit, so 999.6 ns prints as `1 µs`.
pub fn fmt_seconds(seconds: f64) -> String {
    for (unit, factor) in [("ns", 1e9), ("\u{00b5}s", 1e6), ("ms", 1e3)] {
        let value = seconds * factor;
        if fits_unit(value, 1000.0) {
            return format!("{} {unit}", fmt_sig(value));
        }
    }
    format!("{} s", fmt_sig(seconds))
}

/// Format bytes using the largest of B/KB/MB/GB/TB that keeps the value ≥ 1.
pub fn fmt_bytes(bytes: f64) -> String {
    let mut value = bytes;
    for unit in ["B", "KB", "MB", "GB"] {
        if fits_unit(value, 1024.0) {
            return format!("{} {unit}", fmt_sig(value));
        }
        value /= 1024.0;
    }
    format!("{} TB", fmt_sig(value))
}

/// Percentage change from `old` to `new`; `None` when `old` is zero.
pub fn pct_change(new: f64, old: f64) -> Option<f64> {
    if old.abs() <= f64::EPSILON {
        return None;
    }
    Some(((new - old) / old) * 100.0)
}

/// Signed two-decimal percentage, or `n/a`.
pub fn fmt_pct(delta: Option<f64>) -> String {
    delta.map_or_else(|| "n/a".to_string(), |pct| format!("{pct:+.2}%"))
}
