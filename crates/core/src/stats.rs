//! Pure shaping of the dashboard statistics.
//!
//! The SQL side (in `dermalens-db`) only counts; everything about how the
//! numbers are presented -- the fixed twelve-month histogram with explicit
//! zeros, the percentage string, the `"Unknown"` label -- lives here so it
//! can be tested without a database.

use chrono::{Datelike, NaiveDate};

/// Chart labels, indexed by `month - 1`.
pub const MONTH_LABELS: [&str; 12] = [
    "Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Dec",
];

/// Which twelve months the histogram covers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StatsWindow {
    /// January through December of the current year.
    #[default]
    CalendarYear,
    /// The twelve months ending with the current month.
    Trailing,
}

impl StatsWindow {
    /// Parse the `STATS_WINDOW` configuration value.
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "calendar-year" => Some(Self::CalendarYear),
            "trailing" => Some(Self::Trailing),
            _ => None,
        }
    }

    /// First day covered by the window, used to bound the counting query.
    pub fn start(self, today: NaiveDate) -> NaiveDate {
        match self {
            Self::CalendarYear => NaiveDate::from_ymd_opt(today.year(), 1, 1)
                .expect("January 1st always exists"),
            Self::Trailing => {
                let (year, month) = months_back(today.year(), today.month(), 11);
                NaiveDate::from_ymd_opt(year, month, 1)
                    .expect("first of month always exists")
            }
        }
    }
}

/// One `(year, month)` group from the counting query.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MonthCount {
    pub year: i32,
    pub month: u32,
    pub count: i64,
}

/// One histogram bucket as served to the client.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
pub struct MonthBucket {
    pub month: &'static str,
    pub scans: i64,
}

/// Step a `(year, month)` pair back by `back` months.
fn months_back(year: i32, month: u32, back: u32) -> (i32, u32) {
    let zero_based = year as i64 * 12 + (month as i64 - 1) - back as i64;
    ((zero_based.div_euclid(12)) as i32, (zero_based.rem_euclid(12) + 1) as u32)
}

/// Expand raw month counts into exactly twelve buckets for the window,
/// with months that have no records explicitly present as zero.
pub fn monthly_buckets(
    window: StatsWindow,
    today: NaiveDate,
    counts: &[MonthCount],
) -> Vec<MonthBucket> {
    let months: Vec<(i32, u32)> = match window {
        StatsWindow::CalendarYear => (1..=12).map(|m| (today.year(), m)).collect(),
        StatsWindow::Trailing => (0..12)
            .rev()
            .map(|back| months_back(today.year(), today.month(), back))
            .collect(),
    };

    months
        .into_iter()
        .map(|(year, month)| MonthBucket {
            month: MONTH_LABELS[(month - 1) as usize],
            scans: counts
                .iter()
                .find(|c| c.year == year && c.month == month)
                .map(|c| c.count)
                .unwrap_or(0),
        })
        .collect()
}

/// Format the mean confidence as a percentage string with one decimal place,
/// rounding half away from zero. `None` (no confidence values at all)
/// formats as `"0%"`.
pub fn format_accuracy_rate(avg_confidence: Option<f64>) -> String {
    match avg_confidence {
        Some(avg) => {
            let pct = (avg * 1000.0).round() / 10.0;
            format!("{pct:.1}%")
        }
        None => "0%".to_string(),
    }
}

/// Display label for a condition value; the empty condition (stored when the
/// model result had none) is shown as `"Unknown"`.
pub fn condition_label(condition: &str) -> &str {
    if condition.is_empty() {
        "Unknown"
    } else {
        condition
    }
}
