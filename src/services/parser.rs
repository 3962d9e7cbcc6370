// src/services/parser.rs

//! Contribution calendar markup parser.
//!
//! Reads the total from the activity heading, the per-day cells of the
//! calendar table and the tooltips that carry each cell's count. Nothing in
//! here fails: markup that does not match degrades to empty or default values.
//!
//! Cells are matched at the tag level rather than through a DOM so that bare
//! `<td>` fragments, which an HTML5 tree builder discards outside a table,
//! still parse. Inner text is extracted with `scraper` to strip nested tags
//! and decode entities.

use std::collections::HashMap;
use std::sync::LazyLock;

use chrono::NaiveDate;
use regex::Regex;
use scraper::Html;

use crate::models::{ContributionDay, MAX_LEVEL, ParsedCalendar};

/// Element id of the heading that states the yearly total.
pub const HEADING_ID: &str = "js-contribution-activity-description";

/// CSS class of a calendar day cell.
pub const DAY_CLASS: &str = "ContributionCalendar-day";

static HEADING: LazyLock<Regex> = LazyLock::new(|| {
    let pattern = format!(r#"(?is)<h2\b[^>]*\bid\s*=\s*"{HEADING_ID}"[^>]*>(.*?)</h2\s*>"#);
    Regex::new(&pattern).expect("valid heading regex")
});

static TOTAL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)([\d,]+)\s+contributions?\s+in\s+the\s+last\s+year")
        .expect("valid total regex")
});

static CELL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?is)<td\b([^>]*)>").expect("valid cell regex"));

static TOOLTIP: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?is)<tool-tip\b([^>]*)>(.*?)</tool-tip\s*>").expect("valid tooltip regex")
});

static ATTRIBUTE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"([A-Za-z_:][-A-Za-z0-9_:.]*)\s*=\s*(?:"([^"]*)"|'([^']*)')"#)
        .expect("valid attribute regex")
});

static NO_CONTRIBUTIONS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)^no\s+contributions\s+on\s").expect("valid regex"));

static SOME_CONTRIBUTIONS: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^([\d,]+)\s+contributions?\s+on\s").expect("valid count regex")
});

/// Parse a full contribution page.
pub fn parse_calendar(markup: &str) -> ParsedCalendar {
    ParsedCalendar {
        declared_total: parse_total(markup),
        days: parse_days(markup),
    }
}

/// Read the declared yearly total from the activity heading.
///
/// Returns `None` when the heading is missing or its text does not state a
/// total, which is distinct from a stated total of zero.
pub fn parse_total(markup: &str) -> Option<u64> {
    let heading = HEADING.captures(markup)?.get(1)?;
    let text = inner_text(heading.as_str());
    let digits = TOTAL.captures(&text)?.get(1)?.as_str().replace(',', "");
    digits.parse().ok()
}

/// Read a day count from tooltip text.
///
/// `"No contributions on ..."` and anything unrecognized read as 0.
pub fn parse_count(tooltip_text: &str) -> u64 {
    let text = collapse_whitespace(tooltip_text);
    if NO_CONTRIBUTIONS.is_match(&text) {
        return 0;
    }
    SOME_CONTRIBUTIONS
        .captures(&text)
        .and_then(|caps| caps.get(1))
        .and_then(|m| m.as_str().replace(',', "").parse().ok())
        .unwrap_or(0)
}

/// Extract day records sorted ascending by date.
pub fn parse_days(markup: &str) -> Vec<ContributionDay> {
    let mut days = Vec::new();
    let mut index_by_id: HashMap<String, usize> = HashMap::new();

    for cell in CELL.captures_iter(markup) {
        let attrs = attributes(cell.get(1).map_or("", |m| m.as_str()));
        if !is_day_cell(&attrs) {
            continue;
        }

        let Some(date) = attrs.get("data-date").and_then(|raw| parse_date(raw)) else {
            log::debug!("Skipping calendar cell without a usable data-date");
            continue;
        };
        let level = attrs.get("data-level").map_or(0, |raw| parse_level(raw));

        if let Some(id) = attrs.get("id").filter(|id| !id.is_empty()) {
            index_by_id.insert((*id).to_string(), days.len());
        }
        days.push(ContributionDay::new(date, 0, level));
    }

    for tooltip in TOOLTIP.captures_iter(markup) {
        let attrs = attributes(tooltip.get(1).map_or("", |m| m.as_str()));
        let Some(target) = attrs.get("for") else {
            continue;
        };
        let Some(&index) = index_by_id.get(*target) else {
            log::debug!("Ignoring tooltip for unknown cell {target:?}");
            continue;
        };
        let text = inner_text(tooltip.get(2).map_or("", |m| m.as_str()));
        days[index].count = parse_count(&text);
    }

    days.sort_by_key(|day| day.date);
    let before = days.len();
    days.dedup_by_key(|day| day.date);
    if days.len() != before {
        log::debug!("Dropped {} duplicate calendar dates", before - days.len());
    }
    days
}

/// A `<td>` is a day cell when it carries the calendar class or a date.
fn is_day_cell(attrs: &HashMap<String, &str>) -> bool {
    let has_class = attrs
        .get("class")
        .is_some_and(|class| class.split_whitespace().any(|c| c == DAY_CLASS));
    has_class || attrs.contains_key("data-date")
}

fn parse_date(raw: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d").ok()
}

fn parse_level(raw: &str) -> u8 {
    match raw.trim().parse::<u8>() {
        Ok(level) => level.min(MAX_LEVEL),
        Err(_) => {
            log::debug!("Unparseable data-level {raw:?}, using 0");
            0
        }
    }
}

/// Collect the attributes of a start tag, lower-casing names. First wins.
fn attributes(tag_body: &str) -> HashMap<String, &str> {
    let mut attrs = HashMap::new();
    for caps in ATTRIBUTE.captures_iter(tag_body) {
        let (Some(name), Some(value)) = (caps.get(1), caps.get(2).or_else(|| caps.get(3))) else {
            continue;
        };
        attrs
            .entry(name.as_str().to_ascii_lowercase())
            .or_insert(value.as_str());
    }
    attrs
}

/// Visible text of an HTML fragment with whitespace collapsed.
fn inner_text(fragment: &str) -> String {
    let parsed = Html::parse_fragment(fragment);
    let text: Vec<&str> = parsed.root_element().text().collect();
    collapse_whitespace(&text.join(" "))
}

fn collapse_whitespace(s: &str) -> String {
    s.split_whitespace().collect::<Vec<_>>().join(" ")
}
