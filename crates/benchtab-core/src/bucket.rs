//! Payload-size grouping and bar rendering for chart output.

use std::sync::LazyLock;

use regex::Regex;

use crate::model::BenchCase;

/// Default bar width in characters.
pub const DEFAULT_BAR_WIDTH: usize = 28;

const BAR_FILL: char = '\u{2588}'; // █

static SERVER_TAG_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\bserver:\s*(Small|Large)\b").expect("server tag pattern is valid")
});

static CLIENT_TAG_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\bclient:\s*(Small|Large)\b").expect("client tag pattern is valid")
});

/// Payload-size class derived from the `server:`/`client:` tags in a case name.
///
/// Variant order is the display order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Bucket {
    SmallSmall,
    Mixed,
    BigBig,
    Unknown,
}

impl Bucket {
    pub const DISPLAY_ORDER: [Bucket; 4] = [
        Bucket::SmallSmall,
        Bucket::Mixed,
        Bucket::BigBig,
        Bucket::Unknown,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Bucket::SmallSmall => "small/small",
            Bucket::Mixed => "mixed",
            Bucket::BigBig => "big/big",
            Bucket::Unknown => "unknown",
        }
    }

    /// Heading printed above the bucket's charts.
    pub fn title(self) -> &'static str {
        match self {
            Bucket::SmallSmall => "Payload group: small / small",
            Bucket::Mixed => "Payload group: small / big or big / small",
            Bucket::BigBig => "Payload group: big / big",
            Bucket::Unknown => "Payload group: unknown",
        }
    }
}

impl std::fmt::Display for Bucket {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

fn tag_is_small(re: &Regex, name: &str) -> Option<bool> {
    let caps = re.captures(name)?;
    Some(caps.get(1)?.as_str() == "Small")
}

/// Classify a case name into a payload bucket.
pub fn payload_bucket(name: &str) -> Bucket {
    let (Some(server_small), Some(client_small)) = (
        tag_is_small(&SERVER_TAG_RE, name),
        tag_is_small(&CLIENT_TAG_RE, name),
    ) else {
        return Bucket::Unknown;
    };
    match (server_small, client_small) {
        (true, true) => Bucket::SmallSmall,
        (false, false) => Bucket::BigBig,
        _ => Bucket::Mixed,
    }
}

/// Split cases into buckets in display order, keeping source order inside each.
///
/// Buckets without cases are left out.
pub fn group_by_bucket(cases: &[BenchCase]) -> Vec<(Bucket, Vec<&BenchCase>)> {
    Bucket::DISPLAY_ORDER
        .iter()
        .map(|bucket| {
            let members: Vec<&BenchCase> = cases
                .iter()
                .filter(|case| payload_bucket(&case.name) == *bucket)
                .collect();
            (*bucket, members)
        })
        .filter(|(_, members)| !members.is_empty())
        .collect()
}

/// Bar of `width` cells filled in proportion to `value / max_value`.
pub fn human_bar(value: f64, max_value: f64, width: usize) -> String {
    if max_value <= 0.0 {
        return " ".repeat(width);
    }
    let ratio = (value / max_value).clamp(0.0, 1.0);
    let filled = ((ratio * width as f64).round_ties_even() as usize).min(width);
    let mut bar = String::with_capacity(width * BAR_FILL.len_utf8());
    bar.extend(std::iter::repeat_n(BAR_FILL, filled));
    bar.extend(std::iter::repeat_n(' ', width - filled));
    bar
}
