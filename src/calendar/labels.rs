//! Display strings and colors for the heatmap.

use num_format::{Locale, ToFormattedString};

use super::CalendarDay;
use crate::models::MAX_LEVEL;

pub const MONTH_LABELS: [&str; 12] = [
    "Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Dec",
];

/// Row labels, Sunday first; only alternate rows are labelled.
pub const DAY_LABELS: [&str; 7] = ["", "Mon", "", "Wed", "", "Fri", ""];

/// Fill colors for intensity levels 0 through 4.
pub const LEVEL_COLORS: [&str; 5] = ["#161b22", "#0e4429", "#006d32", "#26a641", "#39d353"];

/// `"1,234 contributions in the last year"`
pub fn heading(total: u64) -> String {
    format!(
        "{} contributions in the last year",
        total.to_formatted_string(&Locale::en)
    )
}

/// `"1 contribution"` or `"N contributions"`.
pub fn count_label(count: u64) -> String {
    if count == 1 {
        "1 contribution".to_string()
    } else {
        format!("{} contributions", count.to_formatted_string(&Locale::en))
    }
}

/// Hover text for a cell, e.g. `"5 contributions on March 1, 2024"`.
pub fn tooltip(day: &CalendarDay) -> String {
    format!(
        "{} on {}",
        count_label(day.count),
        day.date.format("%B %-d, %Y")
    )
}

/// Fill color for a level; out-of-range levels clamp to the nearest bucket.
pub fn level_color(level: u8) -> &'static str {
    LEVEL_COLORS[usize::from(level.min(MAX_LEVEL))]
}
